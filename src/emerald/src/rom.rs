//! Static ROM tables
//!
//! Species names, the species to national dex mapping, growth rates and
//! experience curves. ROM never changes during a session, so these are read
//! once and kept by the reader.

use crate::charmap;
use crate::memory::{MemoryAccessor, MemoryError, MemorySource};
use crate::pokemon::BoxPokemon;
use crate::symbols::{
    EXPERIENCE_TABLES, MAX_LEVEL, NUM_GROWTH_RATES, NUM_SPECIES, POKEMON_NAME_LENGTH,
    SPECIES_INFO, SPECIES_INFO_GROWTH_RATE_OFFSET, SPECIES_INFO_SIZE, SPECIES_NAMES,
    SPECIES_TO_NATIONAL_DEX,
};
use byteorder::{ByteOrder, LE};

const SPECIES_NAME_SIZE: usize = POKEMON_NAME_LENGTH + 1;
const LEVELS_PER_TABLE: usize = MAX_LEVEL as usize + 1;

/// Growth rate per species and experience per level per growth rate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrowthTables {
    growth_rates: Vec<u8>,
    experience: Vec<[u32; LEVELS_PER_TABLE]>,
}

impl GrowthTables {
    pub fn read<S: MemorySource>(memory: &mut MemoryAccessor<S>) -> Result<Self, MemoryError> {
        let info = memory.read(SPECIES_INFO, NUM_SPECIES * SPECIES_INFO_SIZE)?;
        let growth_rates = info
            .chunks_exact(SPECIES_INFO_SIZE)
            .map(|entry| entry[SPECIES_INFO_GROWTH_RATE_OFFSET])
            .collect();

        let raw = memory.read(EXPERIENCE_TABLES, NUM_GROWTH_RATES * LEVELS_PER_TABLE * 4)?;
        let experience = raw
            .chunks_exact(LEVELS_PER_TABLE * 4)
            .map(|table| {
                let mut levels = [0u32; LEVELS_PER_TABLE];
                LE::read_u32_into(table, &mut levels);
                levels
            })
            .collect();

        Ok(Self {
            growth_rates,
            experience,
        })
    }

    pub fn growth_rate(&self, species: u16) -> Option<u8> {
        self.growth_rates.get(usize::from(species)).copied()
    }

    /// Total experience needed to reach `level` on a growth curve
    pub fn experience_at(&self, growth_rate: u8, level: u8) -> Option<u32> {
        self.experience
            .get(usize::from(growth_rate))?
            .get(usize::from(level))
            .copied()
    }

    /// Experience earned since the Pokemon was caught
    ///
    /// Baseline is the experience for its met level. Records with an
    /// impossible met level, species or growth rate contribute nothing.
    pub fn gained_experience(&self, mon: &BoxPokemon) -> i64 {
        let level = mon.met_level();
        if level > MAX_LEVEL {
            tracing::warn!(level, personality = mon.personality, "invalid met level");
            return 0;
        }

        let species = mon.species();
        let Some(growth_rate) = self.growth_rate(species) else {
            tracing::warn!(species, personality = mon.personality, "invalid species id");
            return 0;
        };

        let Some(baseline) = self.experience_at(growth_rate, level) else {
            tracing::warn!(growth_rate, species, "invalid growth rate");
            return 0;
        };

        i64::from(mon.experience()) - i64::from(baseline)
    }
}

/// Every ROM table the reader uses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomTables {
    species_names: Vec<String>,
    /// National dex number by species id; index 0 (no species) maps to 0
    national_dex: Vec<u16>,
    pub growth: GrowthTables,
}

impl RomTables {
    pub fn read<S: MemorySource>(memory: &mut MemoryAccessor<S>) -> Result<Self, MemoryError> {
        let names = memory.read(SPECIES_NAMES, NUM_SPECIES * SPECIES_NAME_SIZE)?;
        let species_names = names
            .chunks_exact(SPECIES_NAME_SIZE)
            .map(charmap::decode)
            .collect();

        // The table starts at species 1
        let raw = memory.read(SPECIES_TO_NATIONAL_DEX, (NUM_SPECIES - 1) * 2)?;
        let mut national_dex = vec![0u16; NUM_SPECIES];
        LE::read_u16_into(&raw, &mut national_dex[1..]);

        let growth = GrowthTables::read(memory)?;
        tracing::debug!(species = NUM_SPECIES, "loaded ROM tables");

        Ok(Self {
            species_names,
            national_dex,
            growth,
        })
    }

    pub fn species_name(&self, species: u16) -> Option<&str> {
        self.species_names.get(usize::from(species)).map(String::as_str)
    }

    /// National dex number, `None` for species without one
    pub fn national_dex(&self, species: u16) -> Option<u16> {
        self.national_dex
            .get(usize::from(species))
            .copied()
            .filter(|&n| n != 0)
    }

    /// Species ids with a name, in id order (species 0 is the empty marker)
    pub fn species(&self) -> impl Iterator<Item = u16> {
        1..NUM_SPECIES as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{table_exp, Fixture, MonSpec};

    fn tables() -> RomTables {
        let mut memory = MemoryAccessor::new(Fixture::new().with_rom().into_memory());
        RomTables::read(&mut memory).unwrap()
    }

    #[test]
    fn test_read_tables() {
        let rom = tables();
        assert_eq!(rom.species_name(0), Some("SPECIES0"));
        assert_eq!(rom.species_name(411), Some("SPECIES411"));
        assert_eq!(rom.species_name(412), None);
        assert_eq!(rom.national_dex(0), None);
        assert_eq!(rom.national_dex(1), Some(1));
        assert_eq!(rom.national_dex(411), Some(411));
        assert_eq!(rom.growth.growth_rate(7), Some(1));
        assert_eq!(rom.growth.experience_at(2, 10), Some(3_000));
        assert_eq!(rom.growth.experience_at(6, 10), None);
        assert_eq!(rom.growth.experience_at(0, 101), None);
        assert_eq!(rom.species().count(), NUM_SPECIES - 1);
    }

    #[test]
    fn test_missing_rom_is_an_error() {
        let mut memory = MemoryAccessor::new(Fixture::new().into_memory());
        assert!(RomTables::read(&mut memory).is_err());
    }

    #[test]
    fn test_gained_experience() {
        let rom = tables();
        // Species 13 uses growth rate 1: level 5 needs 250 exp
        let mon = BoxPokemon::decode(&MonSpec::new(1, 13, 400, 5).box_bytes())
            .unwrap()
            .unwrap();
        assert_eq!(table_exp(1, 5), 250);
        assert_eq!(rom.growth.gained_experience(&mon), 150);
    }

    #[test]
    fn test_gained_experience_can_be_negative() {
        let rom = tables();
        let mon = BoxPokemon::decode(&MonSpec::new(1, 12, 0, 5).box_bytes())
            .unwrap()
            .unwrap();
        assert_eq!(rom.growth.gained_experience(&mon), -125);
    }

    #[test]
    fn test_gained_experience_skips_bad_records() {
        let rom = tables();
        let bad_level = BoxPokemon::decode(&MonSpec::new(1, 12, 9_999, 127).box_bytes())
            .unwrap()
            .unwrap();
        assert_eq!(rom.growth.gained_experience(&bad_level), 0);

        let bad_species = BoxPokemon::decode(&MonSpec::new(1, 999, 9_999, 5).box_bytes())
            .unwrap()
            .unwrap();
        assert_eq!(rom.growth.gained_experience(&bad_species), 0);
    }

    #[test]
    fn test_gained_experience_bad_growth_rate() {
        let mut fixture = Fixture::new().with_rom();
        let at = SPECIES_INFO + 12 * SPECIES_INFO_SIZE as u32 + SPECIES_INFO_GROWTH_RATE_OFFSET as u32;
        fixture.memory_mut().write_u8(at, 9).unwrap();
        let mut memory = MemoryAccessor::new(fixture.into_memory());
        let rom = RomTables::read(&mut memory).unwrap();

        let mon = BoxPokemon::decode(&MonSpec::new(1, 12, 9_999, 5).box_bytes())
            .unwrap()
            .unwrap();
        assert_eq!(rom.growth.gained_experience(&mon), 0);
    }
}
