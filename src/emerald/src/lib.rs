//! # emerald
//!
//! Pokemon Emerald memory decoding and reward shaping for emulator-driven
//! reinforcement learning.
//!
//! This library provides functionality to:
//! - Read the GBA address space through a per-frame region cache
//! - Decode save blocks, the party, PC boxes and the Pokedex
//! - Decrypt the shuffled and XOR-encrypted Pokemon substructures
//! - Turn successive game state snapshots into a shaped reward
//!
//! ## Example
//!
//! ```no_run
//! use emerald::{RegionMemory, RewardConfig, RewardEngine};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Regions are refreshed by the host after every emulated frame
//! let memory = RegionMemory::new()
//!     .with_zeroed_region(0x02, 0x40000)
//!     .with_zeroed_region(0x03, 0x8000);
//!
//! let config = RewardConfig::load("reward.yaml")?;
//! let mut engine = RewardEngine::new(memory, config);
//! engine.reset();
//!
//! let reward = engine.step(true);
//! println!("reward {reward}, total {}", engine.info().rewards.total);
//! # Ok(())
//! # }
//! ```

pub mod blocks;
pub mod charmap;
pub mod config;
pub mod crypt;
pub mod flags;
pub mod layout;
pub mod memory;
pub mod pokemon;
pub mod reader;
pub mod record;
pub mod reward;
pub mod rom;
pub mod state;
pub mod symbols;

#[cfg(test)]
mod testing;

// Re-export commonly used items
#[doc(inline)]
pub use blocks::{ItemPockets, ItemSlot, PokemonStorage, SaveBlock1, SaveBlock2, StoredPokemon};
#[doc(inline)]
pub use config::{ConfigError, ReaderConfig, RewardConfig};
#[doc(inline)]
pub use crypt::{decrypt_substructs, encrypt_substructs, Substructs};
#[doc(inline)]
pub use flags::{count_changed_bits, count_set_bits, get_flag, FlagSection};
#[doc(inline)]
pub use memory::{MemoryAccessor, MemoryError, MemorySource, RegionMemory};
#[doc(inline)]
pub use pokemon::{BoxPokemon, PartyPokemon};
#[doc(inline)]
pub use reader::{GameStateReader, ReadError};
#[doc(inline)]
pub use record::{DecodeError, Record, Value};
#[doc(inline)]
pub use reward::{RewardBreakdown, RewardEngine, RewardInfo, RewardTracker};
#[doc(inline)]
pub use rom::{GrowthTables, RomTables};
#[doc(inline)]
pub use state::GameState;
