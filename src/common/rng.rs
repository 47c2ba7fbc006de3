/// Random number generator trait for deterministic tracking runs.
///
/// The particle filter draws a standard-normal noise vector per particle and
/// per part every step. Routing all of that through this minimal interface
/// keeps whole tracking sessions bit-for-bit reproducible from a seed, which
/// is what the regression tests rely on.
pub trait Rng {
    /// Generate the next uint64 value
    fn next_u64(&mut self) -> u64;

    /// Generate a random f64 in [0, 1)
    fn rand(&mut self) -> f64 {
        self.next_u64() as f64 / (u64::MAX as f64 + 1.0)
    }

    /// Generate a random f64 from standard normal distribution N(0, 1)
    /// Using Box-Muller transform
    fn randn(&mut self) -> f64 {
        let u1 = self.rand();
        let u2 = self.rand();
        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }

    /// Draw a standard-normal noise vector of the given dimension.
    ///
    /// This is the shape consumed by
    /// [`StochasticMap::map_standard_normal`](crate::process::StochasticMap);
    /// the stochastic map never mutates the vector, so one draw can be fed to
    /// coupled position/velocity samplers.
    fn standard_normal_vector(&mut self, dimension: usize) -> nalgebra::DVector<f64> {
        nalgebra::DVector::from_fn(dimension, |_, _| self.randn())
    }
}

/// Simple deterministic random number generator using Xorshift64.
///
/// This PRNG is:
/// - Minimal (~5 lines of bit operations)
/// - Fast (no lookup tables, no heavy math)
/// - Deterministic (identical output for same seed on every platform)
/// - Good enough quality for particle-filter noise injection
pub struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    /// Create a new SimpleRng with the given seed.
    /// If seed is 0, uses 1 instead to avoid degenerate state.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }
}

impl Rng for SimpleRng {
    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

// Implement rand::RngCore so SimpleRng can drive rand_distr samplers, e.g.
// when generating synthetic observation noise in tests and demos.
impl rand::RngCore for SimpleRng {
    fn next_u32(&mut self) -> u32 {
        Rng::next_u64(self) as u32
    }

    fn next_u64(&mut self) -> u64 {
        Rng::next_u64(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut i = 0;
        let len = dest.len();
        while i + 8 <= len {
            let bytes = Rng::next_u64(self).to_le_bytes();
            dest[i..i + 8].copy_from_slice(&bytes);
            i += 8;
        }
        if i < len {
            let bytes = Rng::next_u64(self).to_le_bytes();
            let remaining = len - i;
            dest[i..].copy_from_slice(&bytes[..remaining]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_rng_seed_zero() {
        let mut rng = SimpleRng::new(0);
        // Should use state = 1 when seed is 0
        assert_eq!(rng.state, 1);
        let val = rng.next_u64();
        assert_ne!(val, 0);
    }

    #[test]
    fn test_simple_rng_deterministic() {
        let mut rng1 = SimpleRng::new(42);
        let mut rng2 = SimpleRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.next_u64(), rng2.next_u64());
        }
    }

    #[test]
    fn test_rand_range() {
        let mut rng = SimpleRng::new(42);

        for _ in 0..100 {
            let val = rng.rand();
            assert!(val >= 0.0 && val < 1.0, "rand() should return [0, 1)");
        }
    }

    #[test]
    fn test_randn_distribution() {
        let mut rng = SimpleRng::new(42);
        let n = 10000;

        let mut sum = 0.0;
        let mut sum_sq = 0.0;
        for _ in 0..n {
            let x = rng.randn();
            sum += x;
            sum_sq += x * x;
        }

        let mean = sum / n as f64;
        let variance = sum_sq / n as f64 - mean * mean;
        assert!(mean.abs() < 0.1, "randn() mean should be close to 0");
        assert!(
            (variance - 1.0).abs() < 0.1,
            "randn() variance should be close to 1"
        );
    }

    #[test]
    fn test_standard_normal_vector() {
        let mut rng = SimpleRng::new(7);
        let noise = rng.standard_normal_vector(6);
        assert_eq!(noise.len(), 6);

        // Same seed, same vector
        let mut rng2 = SimpleRng::new(7);
        let noise2 = rng2.standard_normal_vector(6);
        assert_eq!(noise, noise2);
    }
}
