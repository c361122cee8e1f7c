//! Memory Source Trait
//!
//! The emulator side of memory access.

use super::MemoryError;

/// Trait for the emulation engine that owns the GBA memory map
///
/// Regions are addressed by the top byte of a bus address (`address >> 24`),
/// e.g. `0x02` for EWRAM, `0x03` for IWRAM and `0x08` for ROM.
pub trait MemorySource {
    /// Copy out the full backing buffer of a memory region
    fn read_region(&self, region_id: u32) -> Result<Vec<u8>, MemoryError>;

    /// Number of frames emulated so far
    ///
    /// Must change every time the emulator produces a frame. Readers use it to
    /// drop region copies taken during an earlier frame.
    fn frame(&self) -> u64;
}

impl<T: MemorySource + ?Sized> MemorySource for Box<T> {
    fn read_region(&self, region_id: u32) -> Result<Vec<u8>, MemoryError> {
        (**self).read_region(region_id)
    }

    fn frame(&self) -> u64 {
        (**self).frame()
    }
}

impl<T: MemorySource + ?Sized> MemorySource for &T {
    fn read_region(&self, region_id: u32) -> Result<Vec<u8>, MemoryError> {
        (**self).read_region(region_id)
    }

    fn frame(&self) -> u64 {
        (**self).frame()
    }
}
