//! Save block records
//!
//! Typed views of `SaveBlock1` (world, party, money, bag, flags),
//! `SaveBlock2` (trainer, pokedex, encryption key) and `PokemonStorage`
//! (PC boxes). Each is decoded from one contiguous buffer read through the
//! save block pointers.

use crate::charmap;
use crate::layout::{
    BOX_POKEMON, COORDS16, ITEM_SLOT, POKEDEX, POKEMON, POKEMON_STORAGE,
    SAVE_BLOCK_1, SAVE_BLOCK_2, WARP_DATA,
};
use crate::pokemon::{BoxPokemon, PartyPokemon};
use crate::record::{decode_array, DecodeError, Record};
use crate::symbols::{BOX_NAME_LENGTH, IN_BOX_COUNT, PARTY_SIZE};
use byteorder::{ByteOrder, LE};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Coords {
    pub x: u16,
    pub y: u16,
}

impl Coords {
    fn decode(record: &Record) -> Result<Self, DecodeError> {
        Ok(Self {
            x: record.u16("x")?,
            y: record.u16("y")?,
        })
    }
}

/// A map location, as used by warps and the player position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarpData {
    pub map_group: i8,
    pub map_num: i8,
    pub warp_id: i8,
    pub x: u16,
    pub y: u16,
}

impl WarpData {
    fn decode(record: &Record) -> Result<Self, DecodeError> {
        Ok(Self {
            map_group: record.i8("mapGroup")?,
            map_num: record.i8("mapNum")?,
            warp_id: record.i8("warpId")?,
            x: record.u16("x")?,
            y: record.u16("y")?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSlot {
    pub item_id: u16,
    pub quantity: u16,
}

/// Decode an item pocket, dropping empty slots
fn decode_pocket(record: &Record, field: &str) -> Result<Vec<ItemSlot>, DecodeError> {
    let bytes = record.bytes(field)?;
    let slots = decode_array(bytes, ITEM_SLOT.size, usize::MAX, |b| {
        let slot = Record::decode(&ITEM_SLOT, b)?;
        Ok::<_, DecodeError>(ItemSlot {
            item_id: slot.u16("itemId")?,
            quantity: slot.u16("quantity")?,
        })
    })?;
    Ok(slots.into_iter().filter(|s| s.item_id != 0).collect())
}

/// PC item storage and the five bag pockets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPockets {
    pub pc_items: Vec<ItemSlot>,
    pub items: Vec<ItemSlot>,
    pub key_items: Vec<ItemSlot>,
    pub poke_balls: Vec<ItemSlot>,
    pub tm_hm: Vec<ItemSlot>,
    pub berries: Vec<ItemSlot>,
}

impl ItemPockets {
    fn decode(record: &Record) -> Result<Self, DecodeError> {
        Ok(Self {
            pc_items: decode_pocket(record, "pcItems")?,
            items: decode_pocket(record, "bagPocket_Items")?,
            key_items: decode_pocket(record, "bagPocket_KeyItems")?,
            poke_balls: decode_pocket(record, "bagPocket_PokeBalls")?,
            tm_hm: decode_pocket(record, "bagPocket_TMHM")?,
            berries: decode_pocket(record, "bagPocket_Berries")?,
        })
    }

    /// Decode bag quantities, which the game XORs with the low half of the
    /// save encryption key (PC items are stored in the clear)
    pub fn unmask_quantities(&mut self, encryption_key: u32) {
        let mask = encryption_key as u16;
        for pocket in [
            &mut self.items,
            &mut self.key_items,
            &mut self.poke_balls,
            &mut self.tm_hm,
            &mut self.berries,
        ] {
            for slot in pocket.iter_mut() {
                slot.quantity ^= mask;
            }
        }
    }
}

/// World state, party, money, bag and the global flag array
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveBlock1 {
    pub pos: Coords,
    pub location: WarpData,
    pub continue_game_warp: WarpData,
    pub dynamic_warp: WarpData,
    pub last_heal_location: WarpData,
    pub escape_warp: WarpData,
    pub saved_music: u16,
    pub weather: u8,
    pub map_layout_id: u16,
    /// Party count byte as stored (may exceed `PARTY_SIZE` on a bad read)
    pub party_count: u8,
    /// Non-empty party members, at most `PARTY_SIZE`
    pub party: Vec<PartyPokemon>,
    /// Money as stored, XORed with `SaveBlock2::encryption_key`
    pub raw_money: u32,
    pub raw_coins: u16,
    pub registered_item: u16,
    /// Only decoded on request
    pub pockets: Option<ItemPockets>,
    pub flags: Vec<u8>,
}

impl SaveBlock1 {
    pub fn decode(bytes: &[u8], with_items: bool) -> Result<Self, DecodeError> {
        let record = Record::decode(&SAVE_BLOCK_1, bytes)?;
        let warp = |name: &str| -> Result<WarpData, DecodeError> {
            WarpData::decode(&record.nested(name, &WARP_DATA)?)
        };

        let party_count = record.u8("playerPartyCount")?;
        let count = usize::from(party_count).min(PARTY_SIZE);
        let party = decode_array(
            record.bytes("playerParty")?,
            POKEMON.size,
            count,
            PartyPokemon::decode,
        )?
        .into_iter()
        .flatten()
        .collect();

        let pockets = if with_items {
            Some(ItemPockets::decode(&record)?)
        } else {
            None
        };

        Ok(Self {
            pos: Coords::decode(&record.nested("pos", &COORDS16)?)?,
            location: warp("location")?,
            continue_game_warp: warp("continueGameWarp")?,
            dynamic_warp: warp("dynamicWarp")?,
            last_heal_location: warp("lastHealLocation")?,
            escape_warp: warp("escapeWarp")?,
            saved_music: record.u16("savedMusic")?,
            weather: record.u8("weather")?,
            map_layout_id: record.u16("mapLayoutId")?,
            party_count,
            party,
            raw_money: record.u32("money")?,
            raw_coins: record.u16("coins")?,
            registered_item: record.u16("registeredItem")?,
            pockets,
            flags: record.bytes("flags")?.to_vec(),
        })
    }
}

/// Seen/owned bitsets indexed by national dex number - 1
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PokedexFlags {
    pub owned: Vec<u8>,
    pub seen: Vec<u8>,
}

impl PokedexFlags {
    fn decode(record: &Record) -> Result<Self, DecodeError> {
        Ok(Self {
            owned: record.bytes("owned")?.to_vec(),
            seen: record.bytes("seen")?.to_vec(),
        })
    }

    fn bit(bits: &[u8], dex_number: u16) -> bool {
        let Some(index) = dex_number.checked_sub(1) else {
            return false;
        };
        crate::flags::get_flag(bits, i64::from(index))
    }

    pub fn is_seen(&self, dex_number: u16) -> bool {
        Self::bit(&self.seen, dex_number)
    }

    pub fn is_owned(&self, dex_number: u16) -> bool {
        Self::bit(&self.owned, dex_number)
    }
}

/// Trainer profile, pokedex and the per-save encryption key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveBlock2 {
    pub player_name: String,
    pub player_gender: u8,
    /// Public id in the low half, secret id in the high half
    pub trainer_id: u32,
    pub play_time_hours: u16,
    pub play_time_minutes: u8,
    pub play_time_seconds: u8,
    pub pokedex: PokedexFlags,
    pub encryption_key: u32,
}

impl SaveBlock2 {
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let record = Record::decode(&SAVE_BLOCK_2, bytes)?;

        Ok(Self {
            player_name: record.text("playerName")?.to_string(),
            player_gender: record.u8("playerGender")?,
            trainer_id: LE::read_u32(record.bytes("playerTrainerId")?),
            play_time_hours: record.u16("playTimeHours")?,
            play_time_minutes: record.u8("playTimeMinutes")?,
            play_time_seconds: record.u8("playTimeSeconds")?,
            pokedex: PokedexFlags::decode(&record.nested("pokedex", &POKEDEX)?)?,
            encryption_key: record.u32("encryptionKey")?,
        })
    }

    /// Decode money stored in SaveBlock1
    pub fn unmask_money(&self, raw_money: u32) -> u32 {
        raw_money ^ self.encryption_key
    }
}

/// One PC box slot that holds a Pokemon
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredPokemon {
    #[serde(rename = "box")]
    pub box_index: usize,
    pub slot: usize,
    pub pokemon: BoxPokemon,
}

/// PC boxes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PokemonStorage {
    pub current_box: u8,
    /// Occupied slots in box order
    pub pokemon: Vec<StoredPokemon>,
    pub box_names: Vec<String>,
    pub wallpapers: Vec<u8>,
}

impl PokemonStorage {
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let record = Record::decode(&POKEMON_STORAGE, bytes)?;

        let slots = decode_array(
            record.bytes("boxes")?,
            BOX_POKEMON.size,
            usize::MAX,
            BoxPokemon::decode,
        )?;
        let pokemon = slots
            .into_iter()
            .enumerate()
            .filter_map(|(index, mon)| {
                mon.map(|pokemon| StoredPokemon {
                    box_index: index / IN_BOX_COUNT,
                    slot: index % IN_BOX_COUNT,
                    pokemon,
                })
            })
            .collect();

        let box_names = record
            .bytes("boxNames")?
            .chunks_exact(BOX_NAME_LENGTH + 1)
            .map(charmap::decode)
            .collect();

        Ok(Self {
            current_box: record.u8("currentBox")?,
            pokemon,
            box_names,
            wallpapers: record.bytes("boxWallpapers")?.to_vec(),
        })
    }
}
