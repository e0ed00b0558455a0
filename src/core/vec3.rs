//! Small fixed-size vector helpers over `[f64; 3]`.

use rand::Rng;

/// Fixed spatial dimension (3D).
pub const DIM: usize = 3;

/// A point or vector in detector coordinates (x, y, z), Y along the cylinder axis.
pub type Vec3 = [f64; DIM];

/// Lengths below this are treated as zero when normalizing.
pub const EPS_LEN: f64 = 1e-9;

#[inline]
pub fn dot(a: &Vec3, b: &Vec3) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

#[inline]
pub fn norm(a: &Vec3) -> f64 {
    dot(a, a).sqrt()
}

#[inline]
pub fn sub(a: &Vec3, b: &Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
pub fn add_scaled(a: &Vec3, dir: &Vec3, s: f64) -> Vec3 {
    [a[0] + dir[0] * s, a[1] + dir[1] * s, a[2] + dir[2] * s]
}

#[inline]
pub fn cross(a: &Vec3, b: &Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline]
pub fn distance_sq(a: &Vec3, b: &Vec3) -> f64 {
    let d = sub(a, b);
    dot(&d, &d)
}

#[inline]
pub fn distance(a: &Vec3, b: &Vec3) -> f64 {
    distance_sq(a, b).sqrt()
}

/// Unit vector along `v`, or `None` when `v` is (near) zero length.
#[inline]
pub fn normalize(v: &Vec3) -> Option<Vec3> {
    let n = norm(v);
    if !n.is_finite() || n <= EPS_LEN {
        return None;
    }
    Some([v[0] / n, v[1] / n, v[2] / n])
}

/// Unit vector along `v`, falling back to `fallback` for a degenerate `v`.
#[inline]
pub fn normalize_or(v: &Vec3, fallback: Vec3) -> Vec3 {
    normalize(v).unwrap_or(fallback)
}

/// Angle between two unit vectors in radians, robust to rounding just outside [-1, 1].
#[inline]
pub fn angle_between(a: &Vec3, b: &Vec3) -> f64 {
    dot(a, b).clamp(-1.0, 1.0).acos()
}

/// Distance of `p` from the Y axis.
#[inline]
pub fn radial(p: &Vec3) -> f64 {
    (p[0] * p[0] + p[2] * p[2]).sqrt()
}

/// Draw each component uniformly in [-1, 1] and normalize.
///
/// A degenerate draw is re-drawn; after a bounded number of attempts the +Y axis is used.
pub fn random_unit<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    const MAX_ATTEMPTS: usize = 16;
    for _ in 0..MAX_ATTEMPTS {
        let v = [
            rng.random_range(-1.0..=1.0),
            rng.random_range(-1.0..=1.0),
            rng.random_range(-1.0..=1.0),
        ];
        if let Some(u) = normalize(&v) {
            return u;
        }
    }
    [0.0, 1.0, 0.0]
}
