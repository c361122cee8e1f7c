//! Pokemon Emerald (US) memory layout constants
//!
//! Symbol addresses, structure sizes and flag ids for the English release.
//! Addresses match the pokeemerald symbol map; structure sizes and flag ids
//! match `include/global.h`, `include/pokemon.h` and
//! `include/constants/flags.h` from the same decompilation.

// -- Symbol addresses --

/// `gPlayerPartyCount` (EWRAM, live party size)
pub const PLAYER_PARTY_COUNT: u32 = 0x0202_44e9;

/// `gPlayerParty` (EWRAM, live party array)
pub const PLAYER_PARTY: u32 = 0x0202_44ec;

/// `gSaveBlock1Ptr` (IWRAM, pointer into EWRAM)
pub const SAVE_BLOCK_1_PTR: u32 = 0x0300_5d8c;

/// `gSaveBlock2Ptr` (IWRAM, pointer into EWRAM)
pub const SAVE_BLOCK_2_PTR: u32 = 0x0300_5d90;

/// `gPokemonStoragePtr` (IWRAM, pointer into EWRAM)
pub const POKEMON_STORAGE_PTR: u32 = 0x0300_5d94;

/// `gSpeciesNames` (ROM, `NUM_SPECIES` x 11 bytes)
pub const SPECIES_NAMES: u32 = 0x0831_85c8;

/// `sSpeciesToHoennPokedexNum` (ROM, u16 per species, starting at species 1)
pub const SPECIES_TO_HOENN_DEX: u32 = 0x0831_d94c;

/// `sSpeciesToNationalPokedexNum` (ROM, u16 per species, starting at species 1)
pub const SPECIES_TO_NATIONAL_DEX: u32 = 0x0831_dc82;

/// `sHoennToNationalOrder` (ROM)
pub const HOENN_TO_NATIONAL_ORDER: u32 = 0x0831_dfb8;

/// `gExperienceTables` (ROM, 6 growth rates x 101 levels of u32)
pub const EXPERIENCE_TABLES: u32 = 0x0831_f72c;

/// `gSpeciesInfo` (ROM, `NUM_SPECIES` x 28 bytes)
pub const SPECIES_INFO: u32 = 0x0832_03cc;

/// `gItems` (ROM)
pub const ITEMS: u32 = 0x0858_39a0;

// -- Bus layout --

/// Bits to shift an address right by to obtain its region id
pub const REGION_SHIFT: u32 = 24;

/// Region id of external work RAM (`0x02xxxxxx`)
pub const REGION_EWRAM: u32 = 0x02;

/// Region id of internal work RAM (`0x03xxxxxx`)
pub const REGION_IWRAM: u32 = 0x03;

/// Region id of the cartridge ROM (`0x08xxxxxx`)
pub const REGION_ROM: u32 = 0x08;

// -- Sizes and counts --

pub const POKEMON_NAME_LENGTH: usize = 10;
pub const PLAYER_NAME_LENGTH: usize = 7;
pub const BOX_NAME_LENGTH: usize = 8;

pub const PARTY_SIZE: usize = 6;
pub const TOTAL_BOXES_COUNT: usize = 14;
pub const IN_BOX_COUNT: usize = 30;

pub const PC_ITEMS_COUNT: usize = 50;
pub const BAG_ITEMS_COUNT: usize = 30;
pub const BAG_KEYITEMS_COUNT: usize = 30;
pub const BAG_POKEBALLS_COUNT: usize = 16;
pub const BAG_TMHM_COUNT: usize = 64;
pub const BAG_BERRIES_COUNT: usize = 46;

/// Species ids run from 0 (none) to `NUM_SPECIES - 1`
pub const NUM_SPECIES: usize = 412;
pub const NUM_DEX_FLAG_BYTES: usize = NUM_SPECIES.div_ceil(8);

/// Highest level reachable in game
pub const MAX_LEVEL: u8 = 100;
/// Number of growth rate curves in `gExperienceTables`
pub const NUM_GROWTH_RATES: usize = 6;
/// Size of one `SpeciesInfo` entry
pub const SPECIES_INFO_SIZE: usize = 28;
/// Offset of `growthRate` inside `SpeciesInfo`
pub const SPECIES_INFO_GROWTH_RATE_OFFSET: usize = 0x13;

// -- Flag ranges --
//
// The flag array in SaveBlock1 is partitioned into contiguous id ranges.
// Each boundary is a multiple of 8, so every range maps to whole bytes.

pub const SCRIPT_FLAGS_START: u32 = 0x50;
pub const TRAINER_FLAGS_START: u32 = 0x500;
pub const SYSTEM_FLAGS_START: u32 = 0x860;
pub const DAILY_FLAGS_START: u32 = 0x920;

// -- Flag ids --

pub const FLAG_DEFEATED_RUSTBORO_GYM: u32 = 0x4F0;
pub const FLAG_DEFEATED_DEWFORD_GYM: u32 = 0x4F1;
pub const FLAG_DEFEATED_MAUVILLE_GYM: u32 = 0x4F2;
pub const FLAG_DEFEATED_LAVARIDGE_GYM: u32 = 0x4F3;
pub const FLAG_DEFEATED_PETALBURG_GYM: u32 = 0x4F4;
pub const FLAG_DEFEATED_FORTREE_GYM: u32 = 0x4F5;
pub const FLAG_DEFEATED_MOSSDEEP_GYM: u32 = 0x4F6;
pub const FLAG_DEFEATED_SOOTOPOLIS_GYM: u32 = 0x4F7;
pub const FLAG_DEFEATED_METEOR_FALLS_STEVEN: u32 = 0x4F8;

pub const FLAG_DEFEATED_ELITE_4_SIDNEY: u32 = 0x4FB;
pub const FLAG_DEFEATED_ELITE_4_PHOEBE: u32 = 0x4FC;
pub const FLAG_DEFEATED_ELITE_4_GLACIA: u32 = 0x4FD;
pub const FLAG_DEFEATED_ELITE_4_DRAKE: u32 = 0x4FE;

pub const FLAG_SYS_POKEMON_GET: u32 = SYSTEM_FLAGS_START;
pub const FLAG_SYS_POKEDEX_GET: u32 = SYSTEM_FLAGS_START + 0x1;
pub const FLAG_SYS_POKENAV_GET: u32 = SYSTEM_FLAGS_START + 0x2;
pub const FLAG_RECEIVED_POKEDEX_FROM_BIRCH: u32 = SYSTEM_FLAGS_START + 0x84;

pub const FLAG_BADGE01_GET: u32 = SYSTEM_FLAGS_START + 0x7;
pub const FLAG_BADGE02_GET: u32 = SYSTEM_FLAGS_START + 0x8;
pub const FLAG_BADGE03_GET: u32 = SYSTEM_FLAGS_START + 0x9;
pub const FLAG_BADGE04_GET: u32 = SYSTEM_FLAGS_START + 0xA;
pub const FLAG_BADGE05_GET: u32 = SYSTEM_FLAGS_START + 0xB;
pub const FLAG_BADGE06_GET: u32 = SYSTEM_FLAGS_START + 0xC;
pub const FLAG_BADGE07_GET: u32 = SYSTEM_FLAGS_START + 0xD;
pub const FLAG_BADGE08_GET: u32 = SYSTEM_FLAGS_START + 0xE;

pub const FLAG_VISITED_LITTLEROOT_TOWN: u32 = SYSTEM_FLAGS_START + 0xF;
pub const FLAG_VISITED_OLDALE_TOWN: u32 = SYSTEM_FLAGS_START + 0x10;
pub const FLAG_VISITED_DEWFORD_TOWN: u32 = SYSTEM_FLAGS_START + 0x11;
pub const FLAG_VISITED_LAVARIDGE_TOWN: u32 = SYSTEM_FLAGS_START + 0x12;
pub const FLAG_VISITED_FALLARBOR_TOWN: u32 = SYSTEM_FLAGS_START + 0x13;
pub const FLAG_VISITED_VERDANTURF_TOWN: u32 = SYSTEM_FLAGS_START + 0x14;
pub const FLAG_VISITED_PACIFIDLOG_TOWN: u32 = SYSTEM_FLAGS_START + 0x15;
pub const FLAG_VISITED_PETALBURG_CITY: u32 = SYSTEM_FLAGS_START + 0x16;
pub const FLAG_VISITED_SLATEPORT_CITY: u32 = SYSTEM_FLAGS_START + 0x17;
pub const FLAG_VISITED_MAUVILLE_CITY: u32 = SYSTEM_FLAGS_START + 0x18;
pub const FLAG_VISITED_RUSTBORO_CITY: u32 = SYSTEM_FLAGS_START + 0x19;
pub const FLAG_VISITED_FORTREE_CITY: u32 = SYSTEM_FLAGS_START + 0x1A;
pub const FLAG_VISITED_LILYCOVE_CITY: u32 = SYSTEM_FLAGS_START + 0x1B;
pub const FLAG_VISITED_MOSSDEEP_CITY: u32 = SYSTEM_FLAGS_START + 0x1C;
pub const FLAG_VISITED_SOOTOPOLIS_CITY: u32 = SYSTEM_FLAGS_START + 0x1D;
pub const FLAG_VISITED_EVER_GRANDE_CITY: u32 = SYSTEM_FLAGS_START + 0x1E;

pub const FLAG_IS_CHAMPION: u32 = SYSTEM_FLAGS_START + 0x1F;

/// Badge flags in badge order
pub const BADGE_FLAGS: [u32; 8] = [
    FLAG_BADGE01_GET,
    FLAG_BADGE02_GET,
    FLAG_BADGE03_GET,
    FLAG_BADGE04_GET,
    FLAG_BADGE05_GET,
    FLAG_BADGE06_GET,
    FLAG_BADGE07_GET,
    FLAG_BADGE08_GET,
];

/// Town/city visit flags, keyed by a lowercase location name
pub const CITY_FLAGS: [(&str, u32); 16] = [
    ("littleroot", FLAG_VISITED_LITTLEROOT_TOWN),
    ("oldale", FLAG_VISITED_OLDALE_TOWN),
    ("dewford", FLAG_VISITED_DEWFORD_TOWN),
    ("lavaridge", FLAG_VISITED_LAVARIDGE_TOWN),
    ("fallarbor", FLAG_VISITED_FALLARBOR_TOWN),
    ("verdanturf", FLAG_VISITED_VERDANTURF_TOWN),
    ("pacifidlog", FLAG_VISITED_PACIFIDLOG_TOWN),
    ("petalburg", FLAG_VISITED_PETALBURG_CITY),
    ("slateport", FLAG_VISITED_SLATEPORT_CITY),
    ("mauville", FLAG_VISITED_MAUVILLE_CITY),
    ("rustboro", FLAG_VISITED_RUSTBORO_CITY),
    ("fortree", FLAG_VISITED_FORTREE_CITY),
    ("lilycove", FLAG_VISITED_LILYCOVE_CITY),
    ("mossdeep", FLAG_VISITED_MOSSDEEP_CITY),
    ("sootopolis", FLAG_VISITED_SOOTOPOLIS_CITY),
    ("evergrande", FLAG_VISITED_EVER_GRANDE_CITY),
];

/// Gym leader defeat flags, keyed by gym town
pub const GYM_FLAGS: [(&str, u32); 8] = [
    ("rustboro", FLAG_DEFEATED_RUSTBORO_GYM),
    ("dewford", FLAG_DEFEATED_DEWFORD_GYM),
    ("mauville", FLAG_DEFEATED_MAUVILLE_GYM),
    ("lavaridge", FLAG_DEFEATED_LAVARIDGE_GYM),
    ("petalburg", FLAG_DEFEATED_PETALBURG_GYM),
    ("fortree", FLAG_DEFEATED_FORTREE_GYM),
    ("mossdeep", FLAG_DEFEATED_MOSSDEEP_GYM),
    ("sootopolis", FLAG_DEFEATED_SOOTOPOLIS_GYM),
];

/// Elite Four defeat flags in battle order
pub const ELITE_FOUR_FLAGS: [u32; 4] = [
    FLAG_DEFEATED_ELITE_4_SIDNEY,
    FLAG_DEFEATED_ELITE_4_PHOEBE,
    FLAG_DEFEATED_ELITE_4_GLACIA,
    FLAG_DEFEATED_ELITE_4_DRAKE,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_ranges_are_byte_aligned() {
        for start in [
            SCRIPT_FLAGS_START,
            TRAINER_FLAGS_START,
            SYSTEM_FLAGS_START,
            DAILY_FLAGS_START,
        ] {
            assert_eq!(start % 8, 0, "range start {:#x} not byte aligned", start);
        }
    }

    #[test]
    fn test_flag_ranges_are_ordered() {
        assert!(SCRIPT_FLAGS_START < TRAINER_FLAGS_START);
        assert!(TRAINER_FLAGS_START < SYSTEM_FLAGS_START);
        assert!(SYSTEM_FLAGS_START < DAILY_FLAGS_START);
    }

    #[test]
    fn test_pointer_symbols_live_in_iwram() {
        for addr in [SAVE_BLOCK_1_PTR, SAVE_BLOCK_2_PTR, POKEMON_STORAGE_PTR] {
            assert_eq!(addr >> REGION_SHIFT, REGION_IWRAM);
        }
    }

    #[test]
    fn test_rom_tables_live_in_rom() {
        for addr in [
            SPECIES_NAMES,
            SPECIES_TO_NATIONAL_DEX,
            EXPERIENCE_TABLES,
            SPECIES_INFO,
        ] {
            assert_eq!(addr >> REGION_SHIFT, REGION_ROM);
        }
    }

    #[test]
    fn test_dex_flag_bytes() {
        assert_eq!(NUM_DEX_FLAG_BYTES, 52);
    }
}
