//! Random source for randomized products
//!
//! Reaction and decomposition products draw from a caller-owned source
//! rather than a global one. Hosts seed it for reproducible runs.

pub trait SimRng {
    /// Uniform f32 in [0.0, 1.0)
    fn gen_f32(&mut self) -> f32;

    /// Roll a percentage chance (0 never, 100 always)
    fn check_percent(&mut self, percent: u8) -> bool {
        self.gen_f32() < f32::from(percent) / 100.0
    }
}

impl<T: ?Sized + rand::Rng> SimRng for T {
    fn gen_f32(&mut self) -> f32 {
        rand::Rng::r#gen(self)
    }
}
