//! Deterministic random source carried by each event context.
//!
//! Proc-chance conditions draw from this stream, so replaying the same
//! events with the same seeds yields the same procs.

/// PCG-XSH-RR stream: 64-bit state, 32-bit output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProcRng {
    state: u64,
}

impl ProcRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    pub fn new(seed: u64) -> Self {
        Self {
            state: mix_seed(seed, 0),
        }
    }

    /// Next 32-bit output; advances the stream.
    pub fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
        let state = self.state;
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    /// Roll a d100 (1-100 inclusive).
    pub fn roll_d100(&mut self) -> u32 {
        (self.next_u32() % 100) + 1
    }

    /// Independent stream derived from this one, e.g. one per event handler.
    pub fn fork(&self, salt: u64) -> ProcRng {
        Self {
            state: mix_seed(self.state, salt),
        }
    }
}

/// SplitMix-style avalanche of a seed and a salt.
fn mix_seed(seed: u64, salt: u64) -> u64 {
    let mut hash = seed;
    hash ^= salt.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = ProcRng::new(42);
        let mut b = ProcRng::new(42);
        for _ in 0..16 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn d100_in_bounds() {
        let mut rng = ProcRng::new(7);
        for _ in 0..1_000 {
            let roll = rng.roll_d100();
            assert!((1..=100).contains(&roll));
        }
    }

    #[test]
    fn forks_diverge() {
        let rng = ProcRng::new(9);
        let mut a = rng.fork(0);
        let mut b = rng.fork(1);
        let xs: Vec<u32> = (0..4).map(|_| a.next_u32()).collect();
        let ys: Vec<u32> = (0..4).map(|_| b.next_u32()).collect();
        assert_ne!(xs, ys);
    }
}
