//! Game state reader
//!
//! Follows the save block pointers, decodes each block and folds them into a
//! `GameState`. A null pointer or failed read removes the fields that depend
//! on it and nothing else; `snapshot` never fails.

use crate::blocks::{PokedexFlags, PokemonStorage, SaveBlock1, SaveBlock2};
use crate::config::ReaderConfig;
use crate::layout::{POKEMON_STORAGE, SAVE_BLOCK_1, SAVE_BLOCK_2};
use crate::memory::{MemoryAccessor, MemoryError, MemorySource};
use crate::record::DecodeError;
use crate::rom::{GrowthTables, RomTables};
use crate::state::{
    DexEntry, FlagSections, GameState, Pokedex, Progress, StorageInfo, TrainerInfo, WorldInfo,
};
use crate::symbols::{POKEMON_STORAGE_PTR, REGION_ROM, SAVE_BLOCK_1_PTR, SAVE_BLOCK_2_PTR};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    #[error(transparent)]
    Memory(#[from] MemoryError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Unwrap a block read, logging why it is unavailable
fn available<T>(block: &'static str, result: Result<Option<T>, ReadError>) -> Option<T> {
    match result {
        Ok(Some(value)) => Some(value),
        Ok(None) => {
            tracing::debug!(block, "pointer not set");
            None
        }
        Err(e) => {
            tracing::debug!(block, error = %e, "read failed");
            None
        }
    }
}

/// Seen/caught status per species, indexed through the national dex table
fn build_pokedex(rom: &RomTables, flags: &PokedexFlags) -> Pokedex {
    let mut entries = Vec::new();
    for species in rom.species() {
        let Some(national_dex) = rom.national_dex(species) else {
            continue;
        };
        if usize::from(national_dex - 1) / 8 >= flags.seen.len() {
            continue;
        }
        entries.push(DexEntry {
            species,
            name: rom.species_name(species).unwrap_or_default().to_lowercase(),
            national_dex,
            seen: flags.is_seen(national_dex),
            caught: flags.is_owned(national_dex),
        });
    }

    Pokedex {
        num_seen: entries.iter().filter(|e| e.seen).count() as u32,
        num_caught: entries.iter().filter(|e| e.caught).count() as u32,
        entries,
    }
}

/// Decodes snapshots from one emulator session
pub struct GameStateReader<S> {
    memory: MemoryAccessor<S>,
    config: ReaderConfig,
    /// Loaded on first use, kept for the whole session
    rom: Option<RomTables>,
}

impl<S: MemorySource> GameStateReader<S> {
    pub fn new(source: S) -> Self {
        Self::with_config(source, ReaderConfig::default())
    }

    pub fn with_config(source: S, config: ReaderConfig) -> Self {
        Self {
            memory: MemoryAccessor::new(source),
            config,
            rom: None,
        }
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    pub fn memory(&self) -> &MemoryAccessor<S> {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut MemoryAccessor<S> {
        &mut self.memory
    }

    pub fn into_inner(self) -> S {
        self.memory.into_inner()
    }

    /// Frame callback for hosts that are notified by the emulator
    pub fn on_frame_advance(&mut self) {
        self.memory.on_frame_advance();
    }

    fn read_pointed(&mut self, pointer: u32, size: usize) -> Result<Option<Vec<u8>>, MemoryError> {
        let Some(address) = self.memory.read_pointer(pointer)? else {
            return Ok(None);
        };
        self.memory.read(address, size).map(Some)
    }

    pub fn read_save_block_1(&mut self) -> Result<Option<SaveBlock1>, ReadError> {
        let Some(bytes) = self.read_pointed(SAVE_BLOCK_1_PTR, SAVE_BLOCK_1.size)? else {
            return Ok(None);
        };
        Ok(Some(SaveBlock1::decode(&bytes, self.config.parse_items)?))
    }

    pub fn read_save_block_2(&mut self) -> Result<Option<SaveBlock2>, ReadError> {
        let Some(bytes) = self.read_pointed(SAVE_BLOCK_2_PTR, SAVE_BLOCK_2.size)? else {
            return Ok(None);
        };
        Ok(Some(SaveBlock2::decode(&bytes)?))
    }

    pub fn read_pokemon_storage(&mut self) -> Result<Option<PokemonStorage>, ReadError> {
        let Some(bytes) = self.read_pointed(POKEMON_STORAGE_PTR, POKEMON_STORAGE.size)? else {
            return Ok(None);
        };
        Ok(Some(PokemonStorage::decode(&bytes)?))
    }

    /// ROM tables, read on first call
    pub fn rom_tables(&mut self) -> Result<&RomTables, MemoryError> {
        if self.rom.is_none() {
            self.rom = Some(RomTables::read(&mut self.memory)?);
        }
        self.rom
            .as_ref()
            .ok_or(MemoryError::RegionUnavailable(REGION_ROM))
    }

    /// Growth tables, `None` (logged) if ROM is not mapped
    pub fn growth_tables(&mut self) -> Option<&GrowthTables> {
        match self.rom_tables() {
            Ok(rom) => Some(&rom.growth),
            Err(e) => {
                tracing::debug!(error = %e, "ROM tables unavailable");
                None
            }
        }
    }

    /// Decode everything currently readable
    pub fn snapshot(&mut self) -> GameState {
        let save_block_1 = available("SaveBlock1", self.read_save_block_1());
        let save_block_2 = available("SaveBlock2", self.read_save_block_2());
        let storage = available("PokemonStorage", self.read_pokemon_storage());
        let have_rom = self.growth_tables().is_some();

        let mut state = GameState::default();

        if let Some(block) = save_block_1 {
            if let Some(key_block) = &save_block_2 {
                // Money reads as zero until the save is loaded
                if block.raw_money != 0 {
                    state.money = Some(key_block.unmask_money(block.raw_money));
                }
                state.bag = block.pockets.map(|mut pockets| {
                    pockets.unmask_quantities(key_block.encryption_key);
                    pockets
                });
            }
            state.world = Some(WorldInfo {
                pos: block.pos,
                location: block.location,
                last_heal_location: block.last_heal_location,
                weather: block.weather,
            });
            state.progress = Some(Progress::from_flags(&block.flags));
            state.flags = Some(FlagSections::from_flags(&block.flags));
            state.party = Some(block.party);
        }

        if let Some(storage) = storage {
            state.boxes = Some(
                storage
                    .pokemon
                    .into_iter()
                    .filter(|stored| stored.pokemon.species() != 0)
                    .collect(),
            );
            state.storage = Some(StorageInfo {
                current_box: storage.current_box,
                box_names: storage.box_names,
                wallpapers: storage.wallpapers,
            });
        }

        if let Some(block) = save_block_2 {
            if have_rom {
                state.pokedex = self
                    .rom
                    .as_ref()
                    .map(|rom| build_pokedex(rom, &block.pokedex));
            }
            state.trainer = Some(TrainerInfo {
                name: block.player_name,
                gender: block.player_gender,
                trainer_id: block.trainer_id,
                play_time_hours: block.play_time_hours,
                play_time_minutes: block.play_time_minutes,
                play_time_seconds: block.play_time_seconds,
            });
        }

        state
    }
}
