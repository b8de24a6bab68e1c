//! Perlin gradient noise.

use lumen_math::sampling::random_unit_vector;
use lumen_math::Vec3;
use rand::seq::SliceRandom;
use rand::RngCore;

const POINT_COUNT: usize = 256;

/// Default number of octaves summed by [`Perlin::turb`].
pub const DEFAULT_TURBULENCE_DEPTH: u32 = 7;

/// Lattice of random unit gradients addressed through three permutations.
///
/// Tables are generated once at construction; evaluation is pure.
#[derive(Debug, Clone)]
pub struct Perlin {
    gradients: Vec<Vec3>,
    perm_x: Vec<usize>,
    perm_y: Vec<usize>,
    perm_z: Vec<usize>,
}

impl Perlin {
    pub fn new(rng: &mut dyn RngCore) -> Self {
        let gradients = (0..POINT_COUNT).map(|_| random_unit_vector(rng)).collect();

        Self {
            gradients,
            perm_x: Self::generate_perm(rng),
            perm_y: Self::generate_perm(rng),
            perm_z: Self::generate_perm(rng),
        }
    }

    fn generate_perm(rng: &mut dyn RngCore) -> Vec<usize> {
        let mut perm: Vec<usize> = (0..POINT_COUNT).collect();
        perm.shuffle(rng);
        perm
    }

    /// Smoothed noise at `p`, roughly in [-1, 1].
    pub fn noise(&self, p: Vec3) -> f32 {
        let floor = p.floor();
        let frac = p - floor;
        let (i, j, k) = (floor.x as i64, floor.y as i64, floor.z as i64);

        let mut c = [[[Vec3::ZERO; 2]; 2]; 2];
        for (di, plane) in c.iter_mut().enumerate() {
            for (dj, row) in plane.iter_mut().enumerate() {
                for (dk, cell) in row.iter_mut().enumerate() {
                    let idx = self.perm_x[Self::wrap(i + di as i64)]
                        ^ self.perm_y[Self::wrap(j + dj as i64)]
                        ^ self.perm_z[Self::wrap(k + dk as i64)];
                    *cell = self.gradients[idx];
                }
            }
        }

        Self::trilinear(&c, frac)
    }

    /// Turbulence: absolute value of `depth` octaves of noise, each at
    /// double the frequency and half the weight of the previous one.
    pub fn turb(&self, p: Vec3, depth: u32) -> f32 {
        let mut accum = 0.0;
        let mut temp_p = p;
        let mut weight = 1.0;

        for _ in 0..depth {
            accum += weight * self.noise(temp_p);
            weight *= 0.5;
            temp_p *= 2.0;
        }

        accum.abs()
    }

    #[inline]
    fn wrap(i: i64) -> usize {
        (i & (POINT_COUNT as i64 - 1)) as usize
    }

    /// Gradient interpolation with Hermite smoothing of the weights.
    fn trilinear(c: &[[[Vec3; 2]; 2]; 2], frac: Vec3) -> f32 {
        let smooth = frac * frac * (Vec3::splat(3.0) - 2.0 * frac);
        let mut accum = 0.0;

        for (i, plane) in c.iter().enumerate() {
            for (j, row) in plane.iter().enumerate() {
                for (k, gradient) in row.iter().enumerate() {
                    let (fi, fj, fk) = (i as f32, j as f32, k as f32);
                    let weight_v = frac - Vec3::new(fi, fj, fk);
                    accum += (fi * smooth.x + (1.0 - fi) * (1.0 - smooth.x))
                        * (fj * smooth.y + (1.0 - fj) * (1.0 - smooth.y))
                        * (fk * smooth.z + (1.0 - fk) * (1.0 - smooth.z))
                        * gradient.dot(weight_v);
                }
            }
        }

        accum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_noise_is_bounded() {
        let perlin = Perlin::new(&mut StdRng::seed_from_u64(1));
        let mut rng = StdRng::seed_from_u64(2);

        for _ in 0..2000 {
            let p = lumen_math::sampling::random_vec3(&mut rng, -50.0, 50.0);
            let n = perlin.noise(p);
            assert!(n.is_finite());
            assert!((-1.5..=1.5).contains(&n), "noise {} out of range", n);
        }
    }

    #[test]
    fn test_noise_vanishes_on_lattice_points() {
        // Gradient noise is zero wherever the fractional offset is zero
        let perlin = Perlin::new(&mut StdRng::seed_from_u64(3));
        for p in [Vec3::ZERO, Vec3::new(3.0, -2.0, 7.0), Vec3::new(-11.0, 5.0, 0.0)] {
            assert!(perlin.noise(p).abs() < 1e-6);
        }
    }

    #[test]
    fn test_noise_is_deterministic_per_seed() {
        let a = Perlin::new(&mut StdRng::seed_from_u64(9));
        let b = Perlin::new(&mut StdRng::seed_from_u64(9));
        let p = Vec3::new(0.3, 1.7, -2.2);

        assert_eq!(a.noise(p), b.noise(p));
        assert_eq!(a.turb(p, DEFAULT_TURBULENCE_DEPTH), b.turb(p, DEFAULT_TURBULENCE_DEPTH));
    }

    #[test]
    fn test_noise_is_continuous() {
        let perlin = Perlin::new(&mut StdRng::seed_from_u64(4));
        let p = Vec3::new(1.25, 0.5, -0.75);
        let q = p + Vec3::splat(1e-4);

        assert!((perlin.noise(p) - perlin.noise(q)).abs() < 1e-2);
    }

    #[test]
    fn test_turbulence_is_non_negative() {
        let perlin = Perlin::new(&mut StdRng::seed_from_u64(5));
        for i in 0..100 {
            let p = Vec3::new(i as f32 * 0.37, i as f32 * -0.11, 2.0);
            assert!(perlin.turb(p, DEFAULT_TURBULENCE_DEPTH) >= 0.0);
        }
        assert_eq!(perlin.turb(Vec3::new(0.5, 0.5, 0.5), 0), 0.0);
    }
}
