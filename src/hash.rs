//! Seed derivation for slots and named streams.
//!
//! Only fixed integer arithmetic is used here (SplitMix64 mixing and 64-bit
//! FNV-1a over labels), so a seed derives the same sub-seeds on every
//! toolchain and platform.

/// SplitMix64 state increment.
pub const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;
const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// One SplitMix64 step: advance `value` by the golden gamma and finalize.
pub fn mix64(value: u64) -> u64 {
    let mut z = value.wrapping_add(GOLDEN_GAMMA);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// 64-bit FNV-1a over `bytes`.
pub fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Seed for one trend slot, independent of the order slots are generated in.
pub fn slot_seed(seed: u64, slot: usize) -> u64 {
    mix64(seed ^ mix64(fnv1a(b"trend_slot") ^ slot as u64))
}

/// Seed for a named song-level stream (metadata, streaming stats, ...).
pub fn stream_seed(seed: u64, label: &str) -> u64 {
    mix64(seed ^ fnv1a(label.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_seeds_are_stable_and_distinct() {
        assert_eq!(slot_seed(42, 0), slot_seed(42, 0));
        assert_ne!(slot_seed(42, 0), slot_seed(42, 1));
        assert_ne!(slot_seed(42, 0), slot_seed(43, 0));
        assert_ne!(stream_seed(42, "song"), stream_seed(42, "streaming"));
        assert_ne!(stream_seed(42, "music_id"), slot_seed(42, 0));
    }

    #[test]
    fn derived_seeds_are_pinned_across_toolchains() {
        assert_eq!(mix64(0), 0xE220_A839_7B1D_CDAF);
        assert_eq!(fnv1a(b""), FNV_OFFSET);
        assert_eq!(slot_seed(42, 0), 11_335_297_959_801_581_577);
        assert_eq!(slot_seed(42, 1), 764_314_342_940_600_874);
        assert_eq!(stream_seed(42, "music_id"), 10_108_804_871_412_875_202);
    }
}
