//! Pokemon records
//!
//! `BoxPokemon` is the 80-byte record shared by the party and the PC boxes.
//! Party members carry an extra 20 bytes of battle stats (`PartyPokemon`).

use crate::crypt::{self, Substructs};
use crate::layout::{BOX_POKEMON, POKEMON, SUBSTRUCTS_SIZE};
use crate::record::{DecodeError, Record};
use byteorder::{ByteOrder, LE};
use serde::Serialize;

/// A decoded, decrypted Pokemon
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxPokemon {
    pub personality: u32,
    pub ot_id: u32,
    pub nickname: String,
    pub language: u8,
    pub flags: u8,
    pub ot_name: String,
    pub markings: u8,
    /// Checksum as stored in the record
    pub checksum: u16,
    pub substructs: Substructs,
    #[serde(skip)]
    computed_checksum: u16,
}

impl BoxPokemon {
    /// Whether raw record bytes describe an empty slot
    ///
    /// A slot is empty iff its personality is zero, whatever the other bytes
    /// contain.
    pub fn is_empty_slot(bytes: &[u8]) -> bool {
        bytes.len() >= 4 && LE::read_u32(bytes) == 0
    }

    /// Decode an 80-byte record, returning `None` for an empty slot
    pub fn decode(bytes: &[u8]) -> Result<Option<Self>, DecodeError> {
        let record = Record::decode(&BOX_POKEMON, bytes)?;
        let personality = record.u32("personality")?;
        if personality == 0 {
            return Ok(None);
        }
        let ot_id = record.u32("otId")?;

        let payload = record.bytes("substructs")?;
        let payload: &[u8; SUBSTRUCTS_SIZE] =
            payload.try_into().map_err(|_| DecodeError::SizeMismatch {
                layout: BOX_POKEMON.name,
                expected: SUBSTRUCTS_SIZE,
                actual: payload.len(),
            })?;
        let words = crypt::decrypt_substructs(personality, ot_id, payload);

        Ok(Some(Self {
            personality,
            ot_id,
            nickname: record.text("nickname")?.to_string(),
            language: record.u8("language")?,
            flags: record.u8("flags")?,
            ot_name: record.text("otName")?.to_string(),
            markings: record.u8("markings")?,
            checksum: record.u16("checksum")?,
            substructs: Substructs::from_words(&words),
            computed_checksum: crypt::checksum(&words),
        }))
    }

    /// Whether the stored checksum matches the decrypted substructures
    ///
    /// A mismatch usually means the record was read mid-write or is a
    /// "Bad Egg".
    pub fn checksum_valid(&self) -> bool {
        self.checksum == self.computed_checksum
    }

    pub fn species(&self) -> u16 {
        self.substructs.growth.species
    }

    pub fn experience(&self) -> u32 {
        self.substructs.growth.experience
    }

    pub fn met_level(&self) -> u8 {
        self.substructs.misc.met_level
    }

    pub fn is_egg(&self) -> bool {
        self.substructs.misc.is_egg
    }
}

/// Battle stats computed when a Pokemon joins the party
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub attack: u16,
    pub defense: u16,
    pub speed: u16,
    pub sp_attack: u16,
    pub sp_defense: u16,
}

/// A party member: the boxed record plus runtime state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyPokemon {
    #[serde(rename = "box")]
    pub boxed: BoxPokemon,
    pub status: u32,
    pub level: u8,
    pub mail: u8,
    pub hp: u16,
    pub max_hp: u16,
    pub stats: Stats,
}

impl PartyPokemon {
    /// Decode a 100-byte party record, returning `None` for an empty slot
    pub fn decode(bytes: &[u8]) -> Result<Option<Self>, DecodeError> {
        let record = Record::decode(&POKEMON, bytes)?;
        let Some(boxed) = BoxPokemon::decode(record.bytes("box")?)? else {
            return Ok(None);
        };

        Ok(Some(Self {
            boxed,
            status: record.u32("status")?,
            level: record.u8("level")?,
            mail: record.u8("mail")?,
            hp: record.u16("hp")?,
            max_hp: record.u16("maxHp")?,
            stats: Stats {
                attack: record.u16("attack")?,
                defense: record.u16("defense")?,
                speed: record.u16("speed")?,
                sp_attack: record.u16("spAttack")?,
                sp_defense: record.u16("spDefense")?,
            },
        }))
    }

    pub fn is_fainted(&self) -> bool {
        self.hp == 0
    }
}
