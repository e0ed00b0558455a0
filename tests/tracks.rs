use rand::rngs::StdRng;
use rand::SeedableRng;
use wcsim::core::trajectory::{self, in_bounds, Termination};
use wcsim::core::vec3::{cross, norm, sub};
use wcsim::core::{DetectorGeometry, ParticleKind};
use wcsim::error::Result;

fn tank() -> Result<DetectorGeometry> {
    DetectorGeometry::new(40.0, 80.0)
}

/// Muon tracks: exactly 30 collinear points starting at the origin.
#[test]
fn muon_tracks_are_collinear() -> Result<()> {
    let geo = tank()?;
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..100 {
        let traj = trajectory::generate(ParticleKind::Muon, &geo, &mut rng);
        let pts = &traj.primary.points;
        assert_eq!(pts.len(), 30);
        assert_eq!(pts[0], [0.0, 0.0, 0.0]);
        assert!(traj.secondaries.is_empty());
        for w in pts.windows(3) {
            let a = sub(&w[1], &w[0]);
            let b = sub(&w[2], &w[0]);
            assert!(norm(&cross(&a, &b)) < 1e-9, "non-collinear chord at {:?}", w);
        }
    }
    Ok(())
}

/// Electron tracks: at most 50 points, every recorded point inside the fiducial bounds.
#[test]
fn electron_tracks_stay_in_bounds() -> Result<()> {
    let geo = tank()?;
    let mut rng = StdRng::seed_from_u64(31337);
    for _ in 0..200 {
        let traj = trajectory::generate(ParticleKind::Electron, &geo, &mut rng);
        let pts = &traj.primary.points;
        assert!(!pts.is_empty() && pts.len() <= 50);
        for p in pts {
            assert!(in_bounds(&geo, p), "point {:?} out of bounds", p);
        }
        assert_ne!(traj.primary.termination, Termination::Captured);
    }
    Ok(())
}

/// Neutron tracks: at most 40 points; terminate at the capture distance or on exit.
#[test]
fn neutron_tracks_capture_or_exit() -> Result<()> {
    let geo = tank()?;
    let mut rng = StdRng::seed_from_u64(555);
    let mut captures = 0usize;
    for _ in 0..200 {
        let traj = trajectory::generate(ParticleKind::Neutron, &geo, &mut rng);
        let capture = traj.capture_distance.expect("capture distance drawn");
        assert!((10.0..=30.0).contains(&capture));
        assert!(traj.primary.len() <= 40);
        let length = traj.primary.path_length();
        match traj.primary.termination {
            Termination::Captured => {
                captures += 1;
                // The recorded path stops one step short of the capture distance
                assert!(traj.primary.traveled >= capture);
                assert!(length < capture);
                assert!((3..=5).contains(&traj.secondaries.len()));
            }
            Termination::Escaped => {
                assert!(traj.primary.traveled < capture);
                assert!(traj.secondaries.is_empty());
            }
            Termination::StepLimit => panic!("neutron walk ran out of steps before capture"),
        }
    }
    // Paths shorter than 31.5 cannot reach the fiducial edge at 0.9 * 40 from the axis
    assert_eq!(captures, 200);
    Ok(())
}

/// No walk records the position that ended it: every track ends inside the bounds.
#[test]
fn tracks_end_inside_fiducial_region() -> Result<()> {
    let geo = tank()?;
    let mut rng = StdRng::seed_from_u64(4242);
    let mut out_of_bounds = 0usize;
    for kind in [ParticleKind::Electron, ParticleKind::Neutron] {
        for _ in 0..200 {
            let traj = trajectory::generate(kind, &geo, &mut rng);
            for track in std::iter::once(&traj.primary).chain(&traj.secondaries) {
                let last = track.end().expect("non-empty track");
                if !in_bounds(&geo, last) {
                    out_of_bounds += 1;
                }
                assert!(track.traveled > track.path_length());
            }
        }
    }
    assert_eq!(out_of_bounds, 0);
    Ok(())
}

/// Secondary tracks: electron-tagged, start at the capture point, at most 15 points, unit headings.
#[test]
fn secondaries_start_at_capture_point() -> Result<()> {
    let geo = tank()?;
    let mut rng = StdRng::seed_from_u64(8080);
    let mut seen = 0usize;
    while seen < 20 {
        let traj = trajectory::generate(ParticleKind::Neutron, &geo, &mut rng);
        if traj.primary.termination != Termination::Captured {
            continue;
        }
        seen += 1;
        let capture_point = *traj.primary.end().expect("non-empty track");
        for s in &traj.secondaries {
            assert_eq!(s.kind, ParticleKind::Electron);
            assert_eq!(s.points[0], capture_point);
            assert!(s.len() <= 15);
            assert_eq!(s.headings.len(), s.len());
            for h in &s.headings {
                assert!((norm(h) - 1.0).abs() < 1e-9);
            }
            for w in s.points.windows(2) {
                let step = norm(&sub(&w[1], &w[0]));
                assert!((0.5 - 1e-9..=1.0 + 1e-9).contains(&step));
            }
        }
    }
    Ok(())
}
