//! Synthetic emulator memory for tests
//!
//! Lays out save blocks, storage and ROM tables at realistic addresses so
//! reader and reward tests exercise the same pointer chasing as a live game.

use crate::charmap;
use crate::crypt::{self, Attacks, Condition, Growth};
use crate::layout::{BOX_POKEMON, POKEDEX, POKEMON, POKEMON_STORAGE, SAVE_BLOCK_1, SAVE_BLOCK_2};
use crate::memory::RegionMemory;
use crate::symbols::{
    EXPERIENCE_TABLES, MAX_LEVEL, NUM_GROWTH_RATES, NUM_SPECIES, PLAYER_NAME_LENGTH,
    POKEMON_NAME_LENGTH, POKEMON_STORAGE_PTR, REGION_EWRAM, REGION_SHIFT, REGION_IWRAM, REGION_ROM,
    SAVE_BLOCK_1_PTR, SAVE_BLOCK_2_PTR, SPECIES_INFO, SPECIES_INFO_GROWTH_RATE_OFFSET,
    SPECIES_INFO_SIZE, SPECIES_NAMES, SPECIES_TO_NATIONAL_DEX,
};

pub const EWRAM_SIZE: usize = 0x40000;
pub const IWRAM_SIZE: usize = 0x8000;
/// Large enough for every table the reader touches
pub const ROM_SIZE: usize = 0x40_0000;

pub const SAVE_BLOCK_1_ADDR: u32 = 0x0202_5a00;
pub const SAVE_BLOCK_2_ADDR: u32 = 0x0202_4a54;
pub const STORAGE_ADDR: u32 = 0x0202_9808;

/// Length of one species name entry in ROM
const SPECIES_NAME_SIZE: usize = POKEMON_NAME_LENGTH + 1;

fn offset(layout: &crate::layout::RecordLayout, field: &str) -> u32 {
    layout.offset_of(field).unwrap_or_else(|| panic!("{} has no {}", layout.name, field)) as u32
}

/// Fields chosen for a synthetic Pokemon
#[derive(Debug, Clone)]
pub struct MonSpec {
    pub personality: u32,
    pub ot_id: u32,
    pub nickname: &'static str,
    pub species: u16,
    pub experience: u32,
    pub met_level: u8,
}

impl MonSpec {
    pub fn new(personality: u32, species: u16, experience: u32, met_level: u8) -> Self {
        Self {
            personality,
            ot_id: 0x1234_5678,
            nickname: "MON",
            species,
            experience,
            met_level,
        }
    }

    pub fn logical_words(&self) -> [[u32; 3]; 4] {
        [
            Growth {
                species: self.species,
                experience: self.experience,
                friendship: 70,
                ..Growth::default()
            }
            .to_words(),
            Attacks {
                moves: [33, 45, 0, 0],
                pp: [35, 40, 0, 0],
            }
            .to_words(),
            Condition::default().to_words(),
            [u32::from(self.met_level) << 16 | 4 << 27, 0x1F, 0],
        ]
    }

    /// Encode into an 80-byte `BoxPokemon` with a valid checksum
    pub fn box_bytes(&self) -> Vec<u8> {
        let words = self.logical_words();
        let mut bytes = vec![0u8; BOX_POKEMON.size];
        bytes[0..4].copy_from_slice(&self.personality.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.ot_id.to_le_bytes());
        let nickname = charmap::encode_padded(self.nickname, POKEMON_NAME_LENGTH)
            .unwrap_or_else(|| panic!("cannot encode {}", self.nickname));
        bytes[8..18].copy_from_slice(&nickname);
        bytes[18] = 2; // English
        let ot_name = charmap::encode_padded("BRENDAN", PLAYER_NAME_LENGTH)
            .unwrap_or_else(|| panic!("cannot encode trainer name"));
        bytes[20..27].copy_from_slice(&ot_name);
        bytes[28..30].copy_from_slice(&crypt::checksum(&words).to_le_bytes());
        bytes[32..80].copy_from_slice(&crypt::encrypt_substructs(
            self.personality,
            self.ot_id,
            &words,
        ));
        bytes
    }

    /// Encode into a 100-byte party `Pokemon`
    pub fn party_bytes(&self, level: u8, hp: u16, max_hp: u16) -> Vec<u8> {
        let mut bytes = self.box_bytes();
        bytes.resize(POKEMON.size, 0);
        bytes[84] = level;
        bytes[86..88].copy_from_slice(&hp.to_le_bytes());
        bytes[88..90].copy_from_slice(&max_hp.to_le_bytes());
        for (i, stat) in [10u16, 11, 12, 13, 14].iter().enumerate() {
            let at = 90 + i * 2;
            bytes[at..at + 2].copy_from_slice(&stat.to_le_bytes());
        }
        bytes
    }
}

/// Experience needed for a level in the synthetic tables: `level^3 * (rate + 1)`
pub fn table_exp(growth_rate: usize, level: u8) -> u32 {
    u32::from(level).pow(3) * (growth_rate as u32 + 1)
}

/// Builder over a `RegionMemory` holding a synthetic game
pub struct Fixture {
    mem: RegionMemory,
}

impl Fixture {
    /// Empty RAM with all pointers null, no ROM
    pub fn new() -> Self {
        Self {
            mem: RegionMemory::new()
                .with_zeroed_region(REGION_EWRAM, EWRAM_SIZE)
                .with_zeroed_region(REGION_IWRAM, IWRAM_SIZE),
        }
    }

    /// Everything resolved: save blocks, storage and ROM tables
    pub fn loaded() -> Self {
        Self::new()
            .with_save_block_1()
            .with_save_block_2(0)
            .with_storage()
            .with_rom()
    }

    pub fn memory(&self) -> &RegionMemory {
        &self.mem
    }

    pub fn memory_mut(&mut self) -> &mut RegionMemory {
        &mut self.mem
    }

    pub fn into_memory(self) -> RegionMemory {
        self.mem
    }

    fn write(&mut self, address: u32, bytes: &[u8]) {
        self.mem.write(address, bytes).unwrap();
    }

    pub fn with_save_block_1(mut self) -> Self {
        self.mem.write_u32(SAVE_BLOCK_1_PTR, SAVE_BLOCK_1_ADDR).unwrap();
        self
    }

    pub fn with_save_block_2(mut self, encryption_key: u32) -> Self {
        self.mem.write_u32(SAVE_BLOCK_2_PTR, SAVE_BLOCK_2_ADDR).unwrap();
        self.set_encryption_key(encryption_key);
        let name = charmap::encode_padded("MAY", PLAYER_NAME_LENGTH + 1).unwrap();
        self.write(SAVE_BLOCK_2_ADDR, &name);
        self
    }

    pub fn with_storage(mut self) -> Self {
        self.mem.write_u32(POKEMON_STORAGE_PTR, STORAGE_ADDR).unwrap();
        self
    }

    /// ROM tables: identity species to dex mapping, species `i` uses growth
    /// rate `i % 6`, and `table_exp` experience curves
    pub fn with_rom(mut self) -> Self {
        let mut rom = vec![0u8; ROM_SIZE];
        let mask = ROM_SIZE - 1;

        for species in 0..NUM_SPECIES {
            let name = charmap::encode_padded(&format!("SPECIES{species}"), SPECIES_NAME_SIZE)
                .unwrap();
            let at = (SPECIES_NAMES as usize & mask) + species * SPECIES_NAME_SIZE;
            rom[at..at + SPECIES_NAME_SIZE].copy_from_slice(&name);

            let at = (SPECIES_INFO as usize & mask)
                + species * SPECIES_INFO_SIZE
                + SPECIES_INFO_GROWTH_RATE_OFFSET;
            rom[at] = (species % NUM_GROWTH_RATES) as u8;
        }

        for species in 1..NUM_SPECIES {
            let at = (SPECIES_TO_NATIONAL_DEX as usize & mask) + (species - 1) * 2;
            rom[at..at + 2].copy_from_slice(&(species as u16).to_le_bytes());
        }

        for rate in 0..NUM_GROWTH_RATES {
            for level in 0..=MAX_LEVEL {
                let at = (EXPERIENCE_TABLES as usize & mask)
                    + (rate * (usize::from(MAX_LEVEL) + 1) + usize::from(level)) * 4;
                rom[at..at + 4].copy_from_slice(&table_exp(rate, level).to_le_bytes());
            }
        }

        self.mem.set_region(REGION_ROM, rom);
        self
    }

    pub fn set_encryption_key(&mut self, key: u32) {
        let at = SAVE_BLOCK_2_ADDR + offset(&SAVE_BLOCK_2, "encryptionKey");
        self.mem.write_u32(at, key).unwrap();
    }

    /// Store already-encrypted money, as the game does
    pub fn set_raw_money(&mut self, raw: u32) {
        let at = SAVE_BLOCK_1_ADDR + offset(&SAVE_BLOCK_1, "money");
        self.mem.write_u32(at, raw).unwrap();
    }

    pub fn set_flag(&mut self, flag_id: u32, value: bool) {
        let at = SAVE_BLOCK_1_ADDR + offset(&SAVE_BLOCK_1, "flags") + flag_id / 8;
        let mask = 1u8 << (flag_id % 8);
        let current = self.byte(at);
        let updated = if value { current | mask } else { current & !mask };
        self.write(at, &[updated]);
    }

    fn byte(&mut self, address: u32) -> u8 {
        let region = self.mem.region_mut(address >> REGION_SHIFT).unwrap();
        let len = region.len();
        region[address as usize & (len - 1)]
    }

    pub fn set_party(&mut self, members: &[Vec<u8>]) {
        self.set_party_count(members.len() as u8);
        let base = SAVE_BLOCK_1_ADDR + offset(&SAVE_BLOCK_1, "playerParty");
        for (i, member) in members.iter().enumerate() {
            self.write(base + (i * POKEMON.size) as u32, member);
        }
    }

    /// Overwrite only the count byte, e.g. with a corrupt value
    pub fn set_party_count(&mut self, count: u8) {
        let at = SAVE_BLOCK_1_ADDR + offset(&SAVE_BLOCK_1, "playerPartyCount");
        self.mem.write_u8(at, count).unwrap();
    }

    pub fn set_box_slot(&mut self, box_index: usize, slot: usize, bytes: &[u8]) {
        let base = STORAGE_ADDR + offset(&POKEMON_STORAGE, "boxes");
        let index = box_index * crate::symbols::IN_BOX_COUNT + slot;
        self.write(base + (index * BOX_POKEMON.size) as u32, bytes);
    }

    fn dex_bit(&mut self, field: &str, dex_number: u16) {
        let index = u32::from(dex_number - 1);
        let at = SAVE_BLOCK_2_ADDR
            + offset(&SAVE_BLOCK_2, "pokedex")
            + offset(&POKEDEX, field)
            + index / 8;
        let value = self.byte(at) | 1 << (index % 8);
        self.write(at, &[value]);
    }

    pub fn set_seen(&mut self, dex_number: u16) {
        self.dex_bit("seen", dex_number);
    }

    pub fn set_owned(&mut self, dex_number: u16) {
        self.dex_bit("owned", dex_number);
    }

    /// Bump the frame counter so cached regions are dropped
    pub fn advance_frame(&mut self) {
        self.mem.advance_frame();
    }
}
