use rand::{RngCore, SeedableRng};

use crate::hash::{GOLDEN_GAMMA, mix64, slot_seed};

/// Small deterministic RNG used for reproducible generation runs.
///
/// SplitMix64 over a single `u64` of state: cheap to fork per trend slot and
/// identical across platforms for the same seed.
#[derive(Debug, Clone)]
pub struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    /// Generator starting from raw state `seed`.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Generator dedicated to one trend slot of a run seeded with `seed`.
    pub fn for_slot(seed: u64, slot: usize) -> Self {
        Self::new(slot_seed(seed, slot))
    }

    /// Current internal state; `new(state)` resumes the stream.
    pub fn state(&self) -> u64 {
        self.state
    }

    fn next_u64_internal(&mut self) -> u64 {
        let value = mix64(self.state);
        self.state = self.state.wrapping_add(GOLDEN_GAMMA);
        value
    }
}

impl RngCore for DeterministicRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64_internal() as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.next_u64_internal()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut offset = 0;
        while offset < dest.len() {
            let value = self.next_u64_internal();
            let bytes = value.to_le_bytes();
            let remaining = dest.len() - offset;
            let copy_len = remaining.min(bytes.len());
            dest[offset..offset + copy_len].copy_from_slice(&bytes[..copy_len]);
            offset += copy_len;
        }
    }
}

impl SeedableRng for DeterministicRng {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(state)
    }
}
