//! Substructure encryption for Pokemon records
//!
//! The last 48 bytes of a `BoxPokemon` hold four 12-byte substructures
//! (growth, attacks, EVs/condition, miscellaneous). They are stored:
//! 1. In a personality-dependent order: `personality % 24` selects one of the
//!    24 orderings of the four blocks
//! 2. XOR-encrypted word by word with `otId ^ personality`
//!
//! Both steps are deterministic functions of two plaintext header fields, so
//! no key material beyond the record itself is needed.

use byteorder::{ByteOrder, LE};
use serde::Serialize;

/// Number of 32-bit words in the substructure block
pub const SUBSTRUCT_BLOCK_WORDS: usize = 12;

/// Number of 32-bit words per substructure
pub const SUBSTRUCT_WORDS: usize = 3;

/// Physical block index of each logical substructure, by `personality % 24`
///
/// Row `n` gives, for growth/attacks/condition/misc in that order, which of
/// the four 3-word blocks holds the data.
pub const SUBSTRUCT_ORDER: [[usize; 4]; 24] = [
    [0, 1, 2, 3],
    [0, 1, 3, 2],
    [0, 2, 1, 3],
    [0, 3, 1, 2],
    [0, 2, 3, 1],
    [0, 3, 2, 1],
    [1, 0, 2, 3],
    [1, 0, 3, 2],
    [2, 0, 1, 3],
    [3, 0, 1, 2],
    [2, 0, 3, 1],
    [3, 0, 2, 1],
    [1, 2, 0, 3],
    [1, 3, 0, 2],
    [2, 1, 0, 3],
    [3, 1, 0, 2],
    [2, 3, 0, 1],
    [3, 2, 0, 1],
    [1, 2, 3, 0],
    [1, 3, 2, 0],
    [2, 1, 3, 0],
    [3, 1, 2, 0],
    [2, 3, 1, 0],
    [3, 2, 1, 0],
];

// Bit layout of the miscellaneous substructure, word 0 (origin info)
const POKERUS_MASK: u32 = 0xFF;
const MET_LOCATION_SHIFT: u32 = 8;
const MET_LOCATION_MASK: u32 = 0xFFFF;
const MET_LEVEL_SHIFT: u32 = 16;
const MET_LEVEL_MASK: u32 = 0x7F;
const MET_GAME_SHIFT: u32 = 23;
const MET_GAME_MASK: u32 = 0xF;
const POKEBALL_SHIFT: u32 = 27;
const POKEBALL_MASK: u32 = 0xF;
const OT_GENDER_SHIFT: u32 = 31;

// Word 1 (IVs, egg, ability)
const IV_BITS: u32 = 5;
const IV_MASK: u32 = 0x1F;
const IS_EGG_SHIFT: u32 = 30;
const ABILITY_NUM_SHIFT: u32 = 31;

/// XOR key for a record's substructures
pub fn encryption_key(personality: u32, ot_id: u32) -> u32 {
    ot_id ^ personality
}

/// Block ordering for a personality value
pub fn substruct_order(personality: u32) -> &'static [usize; 4] {
    &SUBSTRUCT_ORDER[(personality % 24) as usize]
}

/// Decrypt the substructure block and regroup it by logical substructure
///
/// Returns `[growth, attacks, condition, misc]`, three plaintext words each.
pub fn decrypt_substructs(personality: u32, ot_id: u32, payload: &[u8; 48]) -> [[u32; 3]; 4] {
    let key = encryption_key(personality, ot_id);
    let mut words = [0u32; SUBSTRUCT_BLOCK_WORDS];
    LE::read_u32_into(payload, &mut words);
    for word in &mut words {
        *word ^= key;
    }

    let order = substruct_order(personality);
    let mut logical = [[0u32; 3]; 4];
    for (sub, &block) in logical.iter_mut().zip(order.iter()) {
        let start = SUBSTRUCT_WORDS * block;
        sub.copy_from_slice(&words[start..start + SUBSTRUCT_WORDS]);
    }
    logical
}

/// Inverse of `decrypt_substructs`: place each substructure at its physical
/// block and encrypt
pub fn encrypt_substructs(personality: u32, ot_id: u32, logical: &[[u32; 3]; 4]) -> [u8; 48] {
    let key = encryption_key(personality, ot_id);
    let order = substruct_order(personality);

    let mut words = [0u32; SUBSTRUCT_BLOCK_WORDS];
    for (sub, &block) in logical.iter().zip(order.iter()) {
        let start = SUBSTRUCT_WORDS * block;
        for (dst, src) in words[start..start + SUBSTRUCT_WORDS].iter_mut().zip(sub) {
            *dst = src ^ key;
        }
    }

    let mut payload = [0u8; 48];
    LE::write_u32_into(&words, &mut payload);
    payload
}

/// 16-bit checksum the game stores alongside the encrypted block
///
/// Sum of all plaintext halfwords. Block order does not affect the sum.
pub fn checksum(logical: &[[u32; 3]; 4]) -> u16 {
    logical
        .iter()
        .flatten()
        .fold(0u16, |sum, &word| {
            sum.wrapping_add(word as u16)
                .wrapping_add((word >> 16) as u16)
        })
}

fn word_bytes(words: &[u32; 3]) -> [u8; 12] {
    let mut bytes = [0u8; 12];
    LE::write_u32_into(words, &mut bytes);
    bytes
}

fn bytes_words(bytes: &[u8; 12]) -> [u32; 3] {
    let mut words = [0u32; 3];
    LE::read_u32_into(bytes, &mut words);
    words
}

/// Species, held item, experience, friendship
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Growth {
    pub species: u16,
    pub held_item: u16,
    pub experience: u32,
    pub pp_bonuses: u8,
    pub friendship: u8,
}

impl Growth {
    pub fn from_words(words: &[u32; 3]) -> Self {
        Self {
            species: words[0] as u16,
            held_item: (words[0] >> 16) as u16,
            experience: words[1],
            pp_bonuses: words[2] as u8,
            friendship: (words[2] >> 8) as u8,
        }
    }

    /// Pack into words, leaving the unused upper half of word 2 zeroed
    pub fn to_words(&self) -> [u32; 3] {
        [
            u32::from(self.species) | u32::from(self.held_item) << 16,
            self.experience,
            u32::from(self.pp_bonuses) | u32::from(self.friendship) << 8,
        ]
    }
}

/// Move ids and remaining PP
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Attacks {
    pub moves: [u16; 4],
    pub pp: [u8; 4],
}

impl Attacks {
    pub fn from_words(words: &[u32; 3]) -> Self {
        Self {
            moves: [
                words[0] as u16,
                (words[0] >> 16) as u16,
                words[1] as u16,
                (words[1] >> 16) as u16,
            ],
            pp: words[2].to_le_bytes(),
        }
    }

    pub fn to_words(&self) -> [u32; 3] {
        [
            u32::from(self.moves[0]) | u32::from(self.moves[1]) << 16,
            u32::from(self.moves[2]) | u32::from(self.moves[3]) << 16,
            u32::from_le_bytes(self.pp),
        ]
    }
}

/// Effort values and contest stats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub hp_ev: u8,
    pub attack_ev: u8,
    pub defense_ev: u8,
    pub speed_ev: u8,
    pub sp_attack_ev: u8,
    pub sp_defense_ev: u8,
    pub cool: u8,
    pub beauty: u8,
    pub cute: u8,
    pub smart: u8,
    pub tough: u8,
    pub sheen: u8,
}

impl Condition {
    pub fn from_words(words: &[u32; 3]) -> Self {
        let b = word_bytes(words);
        Self {
            hp_ev: b[0],
            attack_ev: b[1],
            defense_ev: b[2],
            speed_ev: b[3],
            sp_attack_ev: b[4],
            sp_defense_ev: b[5],
            cool: b[6],
            beauty: b[7],
            cute: b[8],
            smart: b[9],
            tough: b[10],
            sheen: b[11],
        }
    }

    pub fn to_words(&self) -> [u32; 3] {
        bytes_words(&[
            self.hp_ev,
            self.attack_ev,
            self.defense_ev,
            self.speed_ev,
            self.sp_attack_ev,
            self.sp_defense_ev,
            self.cool,
            self.beauty,
            self.cute,
            self.smart,
            self.tough,
            self.sheen,
        ])
    }

    /// Sum of all six effort values
    pub fn total_evs(&self) -> u32 {
        [
            self.hp_ev,
            self.attack_ev,
            self.defense_ev,
            self.speed_ev,
            self.sp_attack_ev,
            self.sp_defense_ev,
        ]
        .iter()
        .map(|&ev| u32::from(ev))
        .sum()
    }
}

/// Individual values, 0-31 each
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ivs {
    pub hp: u8,
    pub attack: u8,
    pub defense: u8,
    pub speed: u8,
    pub sp_attack: u8,
    pub sp_defense: u8,
}

/// Pokerus, origin, IVs, ability, ribbons
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Misc {
    pub pokerus: u8,
    pub met_location: u16,
    pub met_level: u8,
    pub met_game: u8,
    pub pokeball: u8,
    pub ot_gender: u8,
    pub ivs: Ivs,
    pub is_egg: bool,
    pub ability_num: u8,
    pub ribbons: u32,
}

impl Misc {
    pub fn from_words(words: &[u32; 3]) -> Self {
        let origin = words[0];
        let genes = words[1];
        let iv = |index: u32| ((genes >> (index * IV_BITS)) & IV_MASK) as u8;

        Self {
            pokerus: (origin & POKERUS_MASK) as u8,
            met_location: ((origin >> MET_LOCATION_SHIFT) & MET_LOCATION_MASK) as u16,
            met_level: ((origin >> MET_LEVEL_SHIFT) & MET_LEVEL_MASK) as u8,
            met_game: ((origin >> MET_GAME_SHIFT) & MET_GAME_MASK) as u8,
            pokeball: ((origin >> POKEBALL_SHIFT) & POKEBALL_MASK) as u8,
            ot_gender: ((origin >> OT_GENDER_SHIFT) & 1) as u8,
            ivs: Ivs {
                hp: iv(0),
                attack: iv(1),
                defense: iv(2),
                speed: iv(3),
                sp_attack: iv(4),
                sp_defense: iv(5),
            },
            is_egg: (genes >> IS_EGG_SHIFT) & 1 == 1,
            ability_num: ((genes >> ABILITY_NUM_SHIFT) & 1) as u8,
            ribbons: words[2],
        }
    }
}

/// The four decrypted substructures of one Pokemon
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Substructs {
    pub growth: Growth,
    pub attacks: Attacks,
    pub condition: Condition,
    pub misc: Misc,
}

impl Substructs {
    /// Unpack plaintext words grouped by logical substructure
    pub fn from_words(logical: &[[u32; 3]; 4]) -> Self {
        Self {
            growth: Growth::from_words(&logical[0]),
            attacks: Attacks::from_words(&logical[1]),
            condition: Condition::from_words(&logical[2]),
            misc: Misc::from_words(&logical[3]),
        }
    }

    /// Decrypt and unpack an encrypted block
    pub fn decrypt(personality: u32, ot_id: u32, payload: &[u8; 48]) -> Self {
        Self::from_words(&decrypt_substructs(personality, ot_id, payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_words() -> [[u32; 3]; 4] {
        [
            Growth {
                species: 280,
                held_item: 13,
                experience: 1_250,
                pp_bonuses: 0b0100_0001,
                friendship: 70,
            }
            .to_words(),
            Attacks {
                moves: [33, 45, 336, 0xFFFF],
                pp: [35, 40, 20, 1],
            }
            .to_words(),
            Condition {
                hp_ev: 4,
                attack_ev: 252,
                defense_ev: 0,
                speed_ev: 252,
                sp_attack_ev: 1,
                sp_defense_ev: 2,
                cool: 10,
                beauty: 20,
                cute: 30,
                smart: 40,
                tough: 50,
                sheen: 255,
            }
            .to_words(),
            // origin: pokerus 0x12, met level 5, game 3, ball 4, female
            [
                0x12 | 5 << 16 | 3 << 23 | 4 << 27 | 1 << 31,
                31 | 30 << 5 | 29 << 10 | 28 << 15 | 27 << 20 | 26 << 25 | 1 << 31,
                0xA5A5_0F0F,
            ],
        ]
    }

    #[test]
    fn test_order_table_rows_are_permutations() {
        for row in SUBSTRUCT_ORDER.iter() {
            let mut sorted = *row;
            sorted.sort_unstable();
            assert_eq!(sorted, [0, 1, 2, 3]);
        }
    }

    #[test]
    fn test_order_table_rows_are_distinct() {
        for (i, a) in SUBSTRUCT_ORDER.iter().enumerate() {
            for b in &SUBSTRUCT_ORDER[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_roundtrip_all_orders() {
        let words = sample_words();
        let expected = Substructs::from_words(&words);

        for index in 0..24u32 {
            for (base, ot_id) in [(0u32, 0u32), (0xFFFF_FFE8, 0xFFFF_FFFF), (0x1234_5670, 0x0BAD_F00D)] {
                // Keep `personality % 24 == index` while varying the high bits
                let personality = base - base % 24 + index;
                let payload = encrypt_substructs(personality, ot_id, &words);
                assert_eq!(decrypt_substructs(personality, ot_id, &payload), words);
                assert_eq!(Substructs::decrypt(personality, ot_id, &payload), expected);
            }
        }
    }

    #[test]
    fn test_roundtrip_boundary_personality() {
        let words = sample_words();
        for personality in [0u32, 0xFFFF_FFFF] {
            for ot_id in [0u32, 0xFFFF_FFFF] {
                let payload = encrypt_substructs(personality, ot_id, &words);
                assert_eq!(decrypt_substructs(personality, ot_id, &payload), words);
            }
        }
    }

    #[test]
    fn test_known_fixture_order_one() {
        // personality % 24 == 1: growth, attacks, misc, condition on disk
        let personality = 25;
        let ot_id = 0;
        let mut payload = [0u8; 48];
        let key = encryption_key(personality, ot_id);
        // Physical block 0: growth word 0 = species 1, item 2
        LE::write_u32(&mut payload[0..4], 0x0002_0001 ^ key);
        // Physical block 2 (words 6..9) is misc: met level 7 in word 0
        LE::write_u32(&mut payload[24..28], (7 << 16) ^ key);
        // Physical block 3 (words 9..12) is condition: hp EV 9
        LE::write_u32(&mut payload[36..40], 9 ^ key);
        for i in [1usize, 2, 3, 4, 5, 7, 8, 10, 11] {
            LE::write_u32(&mut payload[i * 4..i * 4 + 4], key);
        }

        let subs = Substructs::decrypt(personality, ot_id, &payload);
        assert_eq!(subs.growth.species, 1);
        assert_eq!(subs.growth.held_item, 2);
        assert_eq!(subs.misc.met_level, 7);
        assert_eq!(subs.condition.hp_ev, 9);
    }

    #[test]
    fn test_xor_key_applied_to_every_word() {
        let personality = 0; // identity order
        let ot_id = 0xFFFF_FFFF;
        let payload = [0xFFu8; 48];
        let words = decrypt_substructs(personality, ot_id, &payload);
        assert_eq!(words, [[0; 3]; 4]);
    }

    #[test]
    fn test_growth_fields() {
        let growth = Growth::from_words(&[0x000D_0118, 1_250, 0xBEEF_4641]);
        assert_eq!(growth.species, 0x118);
        assert_eq!(growth.held_item, 0xD);
        assert_eq!(growth.experience, 1_250);
        assert_eq!(growth.pp_bonuses, 0x41);
        assert_eq!(growth.friendship, 0x46);
        // The unused halfword is dropped
        assert_eq!(growth.to_words()[2], 0x4641);
    }

    #[test]
    fn test_attack_slots_cover_both_words() {
        let attacks = Attacks::from_words(&[0x0002_0001, 0x0004_0003, 0x0807_0605]);
        assert_eq!(attacks.moves, [1, 2, 3, 4]);
        assert_eq!(attacks.pp, [5, 6, 7, 8]);
    }

    #[test]
    fn test_condition_bytes_in_order() {
        let condition = Condition::from_words(&[0x0403_0201, 0x0807_0605, 0x0C0B_0A09]);
        assert_eq!(condition.hp_ev, 1);
        assert_eq!(condition.sp_defense_ev, 6);
        assert_eq!(condition.cool, 7);
        assert_eq!(condition.sheen, 12);
        assert_eq!(condition.total_evs(), 21);
    }

    #[test]
    fn test_misc_bitfields() {
        let words = sample_words();
        let misc = Misc::from_words(&words[3]);
        assert_eq!(misc.pokerus, 0x12);
        assert_eq!(misc.met_level, 5);
        assert_eq!(misc.met_game, 3);
        assert_eq!(misc.pokeball, 4);
        assert_eq!(misc.ot_gender, 1);
        assert_eq!(
            misc.ivs,
            Ivs {
                hp: 31,
                attack: 30,
                defense: 29,
                speed: 28,
                sp_attack: 27,
                sp_defense: 26
            }
        );
        assert!(!misc.is_egg);
        assert_eq!(misc.ability_num, 1);
        assert_eq!(misc.ribbons, 0xA5A5_0F0F);
    }

    #[test]
    fn test_misc_met_location_mask() {
        // Location reads 16 bits starting at bit 8, so it overlaps the level bits
        let misc = Misc::from_words(&[0x0005_2A00, 0, 0]);
        assert_eq!(misc.met_location, 0x052A);
        assert_eq!(misc.met_level, 5);
    }

    #[test]
    fn test_egg_flag() {
        let misc = Misc::from_words(&[0, 1 << 30, 0]);
        assert!(misc.is_egg);
        assert_eq!(misc.ability_num, 0);
    }

    #[test]
    fn test_checksum_ignores_block_order() {
        let words = sample_words();
        let mut swapped = words;
        swapped.swap(0, 3);
        assert_eq!(checksum(&words), checksum(&swapped));
    }

    #[test]
    fn test_checksum_sums_halfwords() {
        let mut words = [[0u32; 3]; 4];
        words[0][0] = 0x0001_0002;
        words[3][2] = 0xFFFF_0000;
        // 1 + 2 + 0xFFFF wraps to 2
        assert_eq!(checksum(&words), 2);
    }
}
