//! Game state snapshots
//!
//! A `GameState` is one decoded view of save memory. Every field is optional:
//! `None` means the data was unavailable when the snapshot was taken (null
//! save block pointer, loading screen, failed read), never "zero".

use crate::blocks::{Coords, ItemPockets, StoredPokemon, WarpData};
use crate::flags::{get_flag, FlagSection};
use crate::pokemon::{BoxPokemon, PartyPokemon};
use crate::symbols::{
    BADGE_FLAGS, CITY_FLAGS, ELITE_FOUR_FLAGS, FLAG_IS_CHAMPION, FLAG_SYS_POKEDEX_GET,
    FLAG_SYS_POKENAV_GET, GYM_FLAGS,
};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

fn serialize_hex<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(bytes))
}

fn flag(flags: &[u8], id: u32) -> bool {
    get_flag(flags, i64::from(id))
}

/// Player position and warp targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldInfo {
    pub pos: Coords,
    pub location: WarpData,
    pub last_heal_location: WarpData,
    pub weather: u8,
}

/// Story progress read from the flag array
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub badges: [bool; 8],
    pub has_pokedex: bool,
    pub has_pokenav: bool,
    pub is_champion: bool,
    pub visited_cities: BTreeMap<&'static str, bool>,
    pub defeated_gyms: BTreeMap<&'static str, bool>,
    pub defeated_elite_four: [bool; 4],
}

impl Progress {
    pub fn from_flags(flags: &[u8]) -> Self {
        Self {
            badges: BADGE_FLAGS.map(|id| flag(flags, id)),
            has_pokedex: flag(flags, FLAG_SYS_POKEDEX_GET),
            has_pokenav: flag(flags, FLAG_SYS_POKENAV_GET),
            is_champion: flag(flags, FLAG_IS_CHAMPION),
            visited_cities: CITY_FLAGS
                .iter()
                .map(|&(name, id)| (name, flag(flags, id)))
                .collect(),
            defeated_gyms: GYM_FLAGS
                .iter()
                .map(|&(name, id)| (name, flag(flags, id)))
                .collect(),
            defeated_elite_four: ELITE_FOUR_FLAGS.map(|id| flag(flags, id)),
        }
    }

    pub fn num_badges(&self) -> u32 {
        self.badges.iter().filter(|&&b| b).count() as u32
    }

    pub fn num_visited_cities(&self) -> u32 {
        self.visited_cities.values().filter(|&&v| v).count() as u32
    }
}

/// Raw flag ranges kept for diffing between snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlagSections {
    #[serde(serialize_with = "serialize_hex")]
    pub script: Vec<u8>,
    #[serde(serialize_with = "serialize_hex")]
    pub trainer: Vec<u8>,
    #[serde(serialize_with = "serialize_hex")]
    pub system: Vec<u8>,
}

impl FlagSections {
    pub fn from_flags(flags: &[u8]) -> Self {
        Self {
            script: FlagSection::Script.slice(flags).to_vec(),
            trainer: FlagSection::Trainer.slice(flags).to_vec(),
            system: FlagSection::System.slice(flags).to_vec(),
        }
    }

    pub fn section(&self, section: FlagSection) -> &[u8] {
        match section {
            FlagSection::Script => &self.script,
            FlagSection::Trainer => &self.trainer,
            FlagSection::System => &self.system,
        }
    }
}

/// Seen/caught status of one species
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DexEntry {
    pub species: u16,
    pub name: String,
    pub national_dex: u16,
    pub seen: bool,
    pub caught: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pokedex {
    pub num_seen: u32,
    pub num_caught: u32,
    pub entries: Vec<DexEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerInfo {
    pub name: String,
    pub gender: u8,
    pub trainer_id: u32,
    pub play_time_hours: u16,
    pub play_time_minutes: u8,
    pub play_time_seconds: u8,
}

/// PC box metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageInfo {
    pub current_box: u8,
    pub box_names: Vec<String>,
    pub wallpapers: Vec<u8>,
}

/// One decoded view of save memory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Decrypted money; absent without both save blocks or while still zero
    #[serde(skip_serializing_if = "Option::is_none")]
    pub money: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub world: Option<WorldInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<Progress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<FlagSections>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub party: Option<Vec<PartyPokemon>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boxes: Option<Vec<StoredPokemon>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pokedex: Option<Pokedex>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trainer: Option<TrainerInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bag: Option<ItemPockets>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageInfo>,
}

macro_rules! merge_fields {
    ($dst:expr, $src:expr, $($field:ident),+ $(,)?) => {
        $(
            if $src.$field.is_some() {
                $dst.$field = $src.$field;
            }
        )+
    };
}

impl GameState {
    /// Overlay the fields present in a newer snapshot
    ///
    /// Fields the newer snapshot lacks keep their last known value, so a
    /// transient loading screen does not make progress disappear.
    pub fn merge_from(&mut self, newer: GameState) {
        merge_fields!(
            self, newer, money, world, progress, flags, party, boxes, pokedex, trainer, bag,
            storage,
        );
    }

    /// True when no field could be read
    pub fn is_empty(&self) -> bool {
        *self == GameState::default()
    }

    pub fn num_badges(&self) -> u32 {
        self.progress.as_ref().map_or(0, Progress::num_badges)
    }

    pub fn num_visited_cities(&self) -> u32 {
        self.progress.as_ref().map_or(0, Progress::num_visited_cities)
    }

    pub fn has_pokedex(&self) -> bool {
        self.progress.as_ref().is_some_and(|p| p.has_pokedex)
    }

    pub fn has_pokenav(&self) -> bool {
        self.progress.as_ref().is_some_and(|p| p.has_pokenav)
    }

    pub fn is_champion(&self) -> bool {
        self.progress.as_ref().is_some_and(|p| p.is_champion)
    }

    pub fn num_seen(&self) -> u32 {
        self.pokedex.as_ref().map_or(0, |d| d.num_seen)
    }

    pub fn num_caught(&self) -> u32 {
        self.pokedex.as_ref().map_or(0, |d| d.num_caught)
    }

    /// A flag range, absent before the first SaveBlock1 read
    pub fn flag_section(&self, section: FlagSection) -> Option<&[u8]> {
        self.flags.as_ref().map(|f| f.section(section))
    }

    /// Every owned Pokemon: party members first, then boxes
    pub fn all_pokemon(&self) -> impl Iterator<Item = &BoxPokemon> {
        let party = self.party.iter().flatten().map(|p| &p.boxed);
        let boxed = self.boxes.iter().flatten().map(|s| &s.pokemon);
        party.chain(boxed)
    }
}
