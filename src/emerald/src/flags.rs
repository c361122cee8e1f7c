//! Bit-flag queries over the global flag array
//!
//! Flag `n` lives in bit `n % 8` of byte `n / 8`. Queries are total: ids
//! outside the array read as unset, because callers probe ids speculatively
//! (e.g. flags that only exist in later game versions).

use crate::symbols::{
    DAILY_FLAGS_START, SCRIPT_FLAGS_START, SYSTEM_FLAGS_START, TRAINER_FLAGS_START,
};
use std::ops::Range;

/// Read one flag, `false` for negative or out-of-range ids
pub fn get_flag(flags: &[u8], flag_id: i64) -> bool {
    if flag_id < 0 {
        return false;
    }
    let Ok(byte) = usize::try_from(flag_id / 8) else {
        return false;
    };
    flags
        .get(byte)
        .is_some_and(|b| (b >> (flag_id % 8)) & 1 == 1)
}

/// Number of set bits in a slice
pub fn count_set_bits(flags: &[u8]) -> u32 {
    flags.iter().map(|b| b.count_ones()).sum()
}

/// Number of bits that differ between two snapshots of the same range
///
/// Returns 0 when either side is absent: no prior snapshot means no change
/// has been observed yet.
pub fn count_changed_bits(prev: Option<&[u8]>, curr: Option<&[u8]>) -> u32 {
    match (prev, curr) {
        (Some(prev), Some(curr)) => prev
            .iter()
            .zip(curr)
            .map(|(a, b)| (a ^ b).count_ones())
            .sum(),
        _ => 0,
    }
}

/// A contiguous range of flag ids
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagSection {
    /// One-off story and event flags
    Script,
    /// One flag per trainer, set once defeated
    Trainer,
    /// Progress flags: badges, visited towns, key items
    System,
}

impl FlagSection {
    pub const ALL: [FlagSection; 3] = [
        FlagSection::Script,
        FlagSection::Trainer,
        FlagSection::System,
    ];

    /// Flag ids covered by this section
    pub const fn ids(self) -> Range<u32> {
        match self {
            FlagSection::Script => SCRIPT_FLAGS_START..TRAINER_FLAGS_START,
            FlagSection::Trainer => TRAINER_FLAGS_START..SYSTEM_FLAGS_START,
            FlagSection::System => SYSTEM_FLAGS_START..DAILY_FLAGS_START,
        }
    }

    /// Byte range of this section within the flag array
    pub const fn bytes(self) -> Range<usize> {
        let ids = self.ids();
        (ids.start / 8) as usize..(ids.end / 8) as usize
    }

    /// Slice this section out of the flag array
    ///
    /// Clamped to the array, so a truncated array yields a shorter slice.
    pub fn slice(self, flags: &[u8]) -> &[u8] {
        let range = self.bytes();
        let end = range.end.min(flags.len());
        let start = range.start.min(end);
        &flags[start..end]
    }

    pub const fn name(self) -> &'static str {
        match self {
            FlagSection::Script => "script",
            FlagSection::Trainer => "trainer",
            FlagSection::System => "system",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_flag_bit_order() {
        let flags = [0b0000_0101, 0b1000_0000];
        assert!(get_flag(&flags, 0));
        assert!(!get_flag(&flags, 1));
        assert!(get_flag(&flags, 2));
        assert!(get_flag(&flags, 15));
        assert!(!get_flag(&flags, 8));
    }

    #[test]
    fn test_get_flag_is_total() {
        for len in 0..=64usize {
            let flags = vec![0xFFu8; len];
            for id in -1000i64..=100_000 {
                let expected = id >= 0 && (id / 8) < len as i64;
                assert_eq!(get_flag(&flags, id), expected, "id {id} len {len}");
            }
        }
    }

    #[test]
    fn test_get_flag_extreme_ids() {
        let flags = [0xFF; 4];
        assert!(!get_flag(&flags, i64::MIN));
        assert!(!get_flag(&flags, i64::MAX));
    }

    #[test]
    fn test_count_set_bits() {
        assert_eq!(count_set_bits(&[]), 0);
        assert_eq!(count_set_bits(&[0xFF, 0x01, 0x80]), 10);
    }

    #[test]
    fn test_count_changed_bits_absent_side() {
        assert_eq!(count_changed_bits(None, Some(&[0xFF][..])), 0);
        assert_eq!(count_changed_bits(Some(&[0xFF][..]), None), 0);
        assert_eq!(count_changed_bits(None, None), 0);
    }

    #[test]
    fn test_count_changed_bits_symmetric_and_reflexive() {
        let samples: Vec<Vec<u8>> = (0u8..=40)
            .map(|seed| {
                (0..seed as usize % 9)
                    .map(|i| seed.wrapping_mul(37).wrapping_add((i as u8).wrapping_mul(91)))
                    .collect()
            })
            .collect();

        for a in &samples {
            assert_eq!(count_changed_bits(Some(a.as_slice()), Some(a.as_slice())), 0);
            for b in samples.iter().filter(|b| b.len() == a.len()) {
                assert_eq!(
                    count_changed_bits(Some(a.as_slice()), Some(b.as_slice())),
                    count_changed_bits(Some(b.as_slice()), Some(a.as_slice()))
                );
            }
        }
    }

    #[test]
    fn test_count_changed_bits_counts_both_directions() {
        // One bit set, one bit cleared
        assert_eq!(count_changed_bits(Some(&[0b01][..]), Some(&[0b10][..])), 2);
    }

    #[test]
    fn test_section_bytes() {
        assert_eq!(FlagSection::Script.bytes(), 0x0A..0xA0);
        assert_eq!(FlagSection::Trainer.bytes(), 0xA0..0x10C);
        assert_eq!(FlagSection::System.bytes(), 0x10C..0x124);
    }

    #[test]
    fn test_section_slice_clamped() {
        let flags = vec![0u8; 0xB0];
        assert_eq!(FlagSection::Script.slice(&flags).len(), 0x96);
        assert_eq!(FlagSection::Trainer.slice(&flags).len(), 0x10);
        assert!(FlagSection::System.slice(&flags).is_empty());
    }
}
