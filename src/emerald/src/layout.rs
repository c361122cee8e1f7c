//! Binary record layouts
//!
//! Declarative descriptions of the fixed-size structures the game keeps in
//! memory. Each layout lists its fields in order with their encodings; field
//! offsets are implied by the widths of the fields before them.
//!
//! Layouts follow `include/global.h` and `include/pokemon.h` from the
//! pokeemerald decompilation. Every declared size is checked against the sum
//! of its field widths at compile time, so a mis-transcribed field fails the
//! build instead of shifting every field after it.

use crate::symbols::{
    BAG_BERRIES_COUNT, BAG_ITEMS_COUNT, BAG_KEYITEMS_COUNT, BAG_POKEBALLS_COUNT, BAG_TMHM_COUNT,
    BOX_NAME_LENGTH, IN_BOX_COUNT, NUM_DEX_FLAG_BYTES, PC_ITEMS_COUNT, PLAYER_NAME_LENGTH,
    POKEMON_NAME_LENGTH, TOTAL_BOXES_COUNT,
};

/// How a field's bytes are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    U8,
    U16,
    U32,
    I8,
    /// Opaque bytes, usually a nested record or array decoded separately
    Bytes(usize),
    /// Text in the game's character map, terminated by `0xFF`
    Text(usize),
}

impl Encoding {
    /// Width of the encoded field in bytes
    pub const fn width(self) -> usize {
        match self {
            Encoding::U8 | Encoding::I8 => 1,
            Encoding::U16 => 2,
            Encoding::U32 => 4,
            Encoding::Bytes(n) | Encoding::Text(n) => n,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Encoding::U8 => "u8",
            Encoding::U16 => "u16",
            Encoding::U32 => "u32",
            Encoding::I8 => "i8",
            Encoding::Bytes(_) => "bytes",
            Encoding::Text(_) => "text",
        }
    }
}

/// A named field within a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub encoding: Encoding,
}

const fn field(name: &'static str, encoding: Encoding) -> Field {
    Field { name, encoding }
}

/// An ordered field list with a declared total size
#[derive(Debug, PartialEq, Eq)]
pub struct RecordLayout {
    pub name: &'static str,
    pub size: usize,
    pub fields: &'static [Field],
}

impl RecordLayout {
    /// Sum of all field widths
    pub const fn fields_size(&self) -> usize {
        let mut total = 0;
        let mut i = 0;
        while i < self.fields.len() {
            total += self.fields[i].encoding.width();
            i += 1;
        }
        total
    }

    /// Look up a field with its byte offset
    pub fn field(&self, name: &str) -> Option<(usize, Field)> {
        let mut offset = 0;
        for field in self.fields {
            if field.name == name {
                return Some((offset, *field));
            }
            offset += field.encoding.width();
        }
        None
    }

    /// Byte offset of a field
    pub fn offset_of(&self, name: &str) -> Option<usize> {
        self.field(name).map(|(offset, _)| offset)
    }

    /// Iterate over `(offset, field)` pairs in layout order
    pub fn offsets(&self) -> impl Iterator<Item = (usize, Field)> + '_ {
        self.fields.iter().scan(0usize, |offset, field| {
            let current = *offset;
            *offset += field.encoding.width();
            Some((current, *field))
        })
    }
}

use Encoding::{Bytes, Text, I8, U16, U32, U8};

pub const COORDS16: RecordLayout = RecordLayout {
    name: "Coords16",
    size: 4,
    fields: &[field("x", U16), field("y", U16)],
};

pub const WARP_DATA: RecordLayout = RecordLayout {
    name: "WarpData",
    size: 8,
    fields: &[
        field("mapGroup", I8),
        field("mapNum", I8),
        field("warpId", I8),
        field("padding", Bytes(1)),
        field("x", U16),
        field("y", U16),
    ],
};

pub const ITEM_SLOT: RecordLayout = RecordLayout {
    name: "ItemSlot",
    size: 4,
    fields: &[field("itemId", U16), field("quantity", U16)],
};

/// Size of the encrypted substructure block inside a `BoxPokemon`
pub const SUBSTRUCTS_SIZE: usize = 48;

pub const BOX_POKEMON: RecordLayout = RecordLayout {
    name: "BoxPokemon",
    size: 80,
    fields: &[
        field("personality", U32),
        field("otId", U32),
        field("nickname", Text(POKEMON_NAME_LENGTH)),
        field("language", U8),
        field("flags", U8),
        field("otName", Text(PLAYER_NAME_LENGTH)),
        field("markings", U8),
        field("checksum", U16),
        field("unknown", U16),
        field("substructs", Bytes(SUBSTRUCTS_SIZE)),
    ],
};

pub const POKEMON: RecordLayout = RecordLayout {
    name: "Pokemon",
    size: 100,
    fields: &[
        field("box", Bytes(BOX_POKEMON.size)),
        field("status", U32),
        field("level", U8),
        field("mail", U8),
        field("hp", U16),
        field("maxHp", U16),
        field("attack", U16),
        field("defense", U16),
        field("speed", U16),
        field("spAttack", U16),
        field("spDefense", U16),
    ],
};

pub const POKEDEX: RecordLayout = RecordLayout {
    name: "Pokedex",
    size: 0x78,
    fields: &[
        field("order", U8),
        field("mode", U8),
        field("nationalMagic", U8),
        field("padding1", Bytes(1)),
        field("unownPersonality", U32),
        field("spindaPersonality", U32),
        field("padding2", Bytes(4)),
        field("owned", Bytes(NUM_DEX_FLAG_BYTES)),
        field("seen", Bytes(NUM_DEX_FLAG_BYTES)),
    ],
};

pub const SAVE_BLOCK_2: RecordLayout = RecordLayout {
    name: "SaveBlock2",
    size: 0xF2C,
    fields: &[
        field("playerName", Text(PLAYER_NAME_LENGTH + 1)),
        field("playerGender", U8),
        field("specialSaveWarpFlags", U8),
        field("playerTrainerId", Bytes(4)),
        field("playTimeHours", U16),
        field("playTimeMinutes", U8),
        field("playTimeSeconds", U8),
        field("playTimeVBlanks", U8),
        field("optionsButtonMode", U8),
        field("options", U16),
        field("padding1", Bytes(2)),
        field("pokedex", Bytes(POKEDEX.size)),
        field("filler_90", Bytes(8)),
        field("localTimeOffset", Bytes(8)),
        field("lastBerryTreeUpdate", Bytes(8)),
        field("gcnLinkFlags", U32),
        field("encryptionKey", U32),
        field("rest", Bytes(0xE7C)),
    ],
};

/// Capacity of the party array in SaveBlock1
pub const PARTY_BYTES: usize = 600;
/// Size of the global flag array in SaveBlock1
pub const FLAGS_BYTES: usize = 300;

pub const SAVE_BLOCK_1: RecordLayout = RecordLayout {
    name: "SaveBlock1",
    size: 0x3D88,
    fields: &[
        field("pos", Bytes(COORDS16.size)),
        field("location", Bytes(WARP_DATA.size)),
        field("continueGameWarp", Bytes(WARP_DATA.size)),
        field("dynamicWarp", Bytes(WARP_DATA.size)),
        field("lastHealLocation", Bytes(WARP_DATA.size)),
        field("escapeWarp", Bytes(WARP_DATA.size)),
        field("savedMusic", U16),
        field("weather", U8),
        field("weatherCycleStage", U8),
        field("flashLevel", U8),
        field("padding1", Bytes(1)),
        field("mapLayoutId", U16),
        field("mapView", Bytes(0x200)),
        field("playerPartyCount", U8),
        field("padding2", Bytes(3)),
        field("playerParty", Bytes(PARTY_BYTES)),
        field("money", U32),
        field("coins", U16),
        field("registeredItem", U16),
        field("pcItems", Bytes(ITEM_SLOT.size * PC_ITEMS_COUNT)),
        field("bagPocket_Items", Bytes(ITEM_SLOT.size * BAG_ITEMS_COUNT)),
        field("bagPocket_KeyItems", Bytes(ITEM_SLOT.size * BAG_KEYITEMS_COUNT)),
        field("bagPocket_PokeBalls", Bytes(ITEM_SLOT.size * BAG_POKEBALLS_COUNT)),
        field("bagPocket_TMHM", Bytes(ITEM_SLOT.size * BAG_TMHM_COUNT)),
        field("bagPocket_Berries", Bytes(ITEM_SLOT.size * BAG_BERRIES_COUNT)),
        field("pokeblocks", Bytes(320)),
        field("seen1", Bytes(NUM_DEX_FLAG_BYTES)),
        field("berryBlenderRecords", Bytes(6)),
        field("unused", Bytes(6)),
        field("trainerRematchStepCounter", U16),
        field("trainerRematches", Bytes(100)),
        field("padding3", Bytes(2)),
        field("objectEvents", Bytes(576)),
        field("objectEventTemplates", Bytes(1536)),
        field("flags", Bytes(FLAGS_BYTES)),
        field("rest", Bytes(0x29EC)),
    ],
};

pub const POKEMON_STORAGE: RecordLayout = RecordLayout {
    name: "PokemonStorage",
    size: 1 + BOX_POKEMON.size * TOTAL_BOXES_COUNT * IN_BOX_COUNT
        + TOTAL_BOXES_COUNT * (BOX_NAME_LENGTH + 1)
        + TOTAL_BOXES_COUNT,
    fields: &[
        field("currentBox", U8),
        field(
            "boxes",
            Bytes(BOX_POKEMON.size * TOTAL_BOXES_COUNT * IN_BOX_COUNT),
        ),
        field("boxNames", Bytes(TOTAL_BOXES_COUNT * (BOX_NAME_LENGTH + 1))),
        field("boxWallpapers", Bytes(TOTAL_BOXES_COUNT)),
    ],
};

/// Every layout in the catalog
pub const ALL_LAYOUTS: &[&RecordLayout] = &[
    &COORDS16,
    &WARP_DATA,
    &ITEM_SLOT,
    &BOX_POKEMON,
    &POKEMON,
    &POKEDEX,
    &SAVE_BLOCK_2,
    &SAVE_BLOCK_1,
    &POKEMON_STORAGE,
];

const fn check_catalog() {
    let mut i = 0;
    while i < ALL_LAYOUTS.len() {
        assert!(
            ALL_LAYOUTS[i].fields_size() == ALL_LAYOUTS[i].size,
            "record layout size does not match its fields"
        );
        i += 1;
    }
}

const _: () = check_catalog();
const _: () = assert!(PARTY_BYTES == POKEMON.size * crate::symbols::PARTY_SIZE);
