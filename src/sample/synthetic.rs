use rand::Rng;
use rand::distributions::Distribution;
use statrs::distribution::Normal;

use super::{Pair, Sample};

/// `rows` draws from a standard bivariate normal with correlation `rho`.
///
/// `x = z₁`, `y = ρ·z₁ + √(1-ρ²)·z₂` with independent standard normals `z₁, z₂`.
/// `rho` is clamped to `[-1, 1]`.
pub fn correlated_normal<R: Rng + ?Sized>(rows: usize, rho: f64, rng: &mut R) -> Sample<Pair> {
    let rho = rho.clamp(-1.0, 1.0);
    let tail = (1.0 - rho * rho).sqrt();
    let z = Normal::standard();
    (0..rows)
        .map(|_| {
            let z1: f64 = z.sample(rng);
            let z2: f64 = z.sample(rng);
            Pair::new(z1, rho * z1 + tail * z2)
        })
        .collect()
}
