//! Host-fed memory source
//!
//! A `MemorySource` whose region buffers are pushed in by the host, e.g. a
//! training loop that copies mGBA memory blocks after every frame, or a test
//! that lays out a synthetic save.

use super::{MemoryError, MemorySource};
use crate::symbols::REGION_SHIFT;
use std::collections::HashMap;

/// Memory regions held in process, keyed by region id
#[derive(Debug, Clone, Default)]
pub struct RegionMemory {
    regions: HashMap<u32, Vec<u8>>,
    frame: u64,
}

impl RegionMemory {
    /// Create an empty source at frame 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of `set_region`
    pub fn with_region(mut self, region_id: u32, data: Vec<u8>) -> Self {
        self.set_region(region_id, data);
        self
    }

    /// Create a zero-filled region of the given size
    pub fn with_zeroed_region(self, region_id: u32, size: usize) -> Self {
        self.with_region(region_id, vec![0; size])
    }

    /// Replace the backing buffer of a region
    pub fn set_region(&mut self, region_id: u32, data: Vec<u8>) {
        self.regions.insert(region_id, data);
    }

    /// Drop a region, making it unavailable
    pub fn remove_region(&mut self, region_id: u32) -> Option<Vec<u8>> {
        self.regions.remove(&region_id)
    }

    /// Mutable access to a region buffer
    pub fn region_mut(&mut self, region_id: u32) -> Option<&mut Vec<u8>> {
        self.regions.get_mut(&region_id)
    }

    /// Write bytes at a bus address, masking into the region like the hardware does
    pub fn write(&mut self, address: u32, bytes: &[u8]) -> Result<(), MemoryError> {
        let region_id = address >> REGION_SHIFT;
        let region = self
            .regions
            .get_mut(&region_id)
            .ok_or(MemoryError::RegionUnavailable(region_id))?;

        let offset = region_offset(address, region.len());
        let end = offset + bytes.len();
        if end > region.len() {
            return Err(MemoryError::OutOfBounds {
                address,
                size: bytes.len(),
                region_len: region.len(),
            });
        }

        region[offset..end].copy_from_slice(bytes);
        Ok(())
    }

    pub fn write_u8(&mut self, address: u32, value: u8) -> Result<(), MemoryError> {
        self.write(address, &[value])
    }

    pub fn write_u16(&mut self, address: u32, value: u16) -> Result<(), MemoryError> {
        self.write(address, &value.to_le_bytes())
    }

    pub fn write_u32(&mut self, address: u32, value: u32) -> Result<(), MemoryError> {
        self.write(address, &value.to_le_bytes())
    }

    /// Signal that the emulator produced a new frame
    pub fn advance_frame(&mut self) {
        self.frame += 1;
    }
}

impl MemorySource for RegionMemory {
    fn read_region(&self, region_id: u32) -> Result<Vec<u8>, MemoryError> {
        self.regions
            .get(&region_id)
            .cloned()
            .ok_or(MemoryError::RegionUnavailable(region_id))
    }

    fn frame(&self) -> u64 {
        self.frame
    }
}

/// Translate a bus address into an offset inside a region of `region_len` bytes
///
/// Region sizes on the GBA bus are powers of two and addresses mirror inside
/// them, so the offset is `address & (size - 1)`.
pub(crate) fn region_offset(address: u32, region_len: usize) -> usize {
    let mask = region_len.next_power_of_two().saturating_sub(1);
    address as usize & mask
}
