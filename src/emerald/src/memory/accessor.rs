//! Per-frame memory accessor
//!
//! Resolves bus addresses to region offsets and keeps one copy of each region
//! for the duration of a frame. Pointers such as `gSaveBlock1Ptr` move when
//! the game shuffles its save blocks, so a copy taken during an older frame
//! must never be served once the emulator has advanced.

use super::regions::region_offset;
use super::{MemoryError, MemorySource};
use crate::symbols::REGION_SHIFT;
use byteorder::{ByteOrder, LE};
use std::collections::HashMap;

/// Cached reader over a `MemorySource`
pub struct MemoryAccessor<S> {
    source: S,
    cache: HashMap<u32, Vec<u8>>,
    /// Frame the cached regions were copied during
    cached_frame: Option<u64>,
}

impl<S: MemorySource> MemoryAccessor<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: HashMap::new(),
            cached_frame: None,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Mutable access to the source, e.g. to step the emulator
    ///
    /// The cache is checked against the source frame counter on the next read,
    /// so stepping through this handle needs no explicit invalidation.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    /// Drop every cached region
    ///
    /// Hosts that receive a frame callback from the emulator call this from it.
    pub fn on_frame_advance(&mut self) {
        if !self.cache.is_empty() {
            tracing::trace!(regions = self.cache.len(), "invalidating memory cache");
        }
        self.cache.clear();
        self.cached_frame = None;
    }

    /// Number of regions currently cached
    pub fn cached_regions(&self) -> usize {
        self.cache.len()
    }

    fn sync_frame(&mut self) {
        let frame = self.source.frame();
        if self.cached_frame != Some(frame) {
            self.on_frame_advance();
            self.cached_frame = Some(frame);
        }
    }

    fn region(&mut self, region_id: u32) -> Result<&[u8], MemoryError> {
        self.sync_frame();

        if !self.cache.contains_key(&region_id) {
            let data = self.source.read_region(region_id)?;
            if data.is_empty() {
                return Err(MemoryError::RegionUnavailable(region_id));
            }
            tracing::trace!(region = region_id, len = data.len(), "fetched memory region");
            self.cache.insert(region_id, data);
        }

        self.cache
            .get(&region_id)
            .map(Vec::as_slice)
            .ok_or(MemoryError::RegionUnavailable(region_id))
    }

    /// Read `size` bytes starting at a bus address
    pub fn read(&mut self, address: u32, size: usize) -> Result<Vec<u8>, MemoryError> {
        let region = self.region(address >> REGION_SHIFT)?;
        let offset = region_offset(address, region.len());
        let end = offset + size;
        if end > region.len() {
            return Err(MemoryError::OutOfBounds {
                address,
                size,
                region_len: region.len(),
            });
        }
        Ok(region[offset..end].to_vec())
    }

    pub fn read_u8(&mut self, address: u32) -> Result<u8, MemoryError> {
        let bytes = self.read(address, 1)?;
        Ok(bytes[0])
    }

    pub fn read_u16(&mut self, address: u32) -> Result<u16, MemoryError> {
        let bytes = self.read(address, 2)?;
        Ok(LE::read_u16(&bytes))
    }

    pub fn read_u32(&mut self, address: u32) -> Result<u32, MemoryError> {
        let bytes = self.read(address, 4)?;
        Ok(LE::read_u32(&bytes))
    }

    /// Read a pointer, mapping a null pointer to `None`
    ///
    /// The game leaves its save block pointers at zero until the save has been
    /// loaded, so `None` means "no data yet" rather than an error.
    pub fn read_pointer(&mut self, address: u32) -> Result<Option<u32>, MemoryError> {
        let ptr = self.read_u32(address)?;
        Ok((ptr != 0).then_some(ptr))
    }
}
