//! Emulated memory access
//!
//! Core abstractions for reading the GBA address space:
//! - `MemorySource`: the emulator collaborator, handing out whole regions
//! - `RegionMemory`: an in-process source fed by the host
//! - `MemoryAccessor`: per-frame region cache with address resolution

mod accessor;
mod regions;
mod traits;

pub use accessor::MemoryAccessor;
pub use regions::RegionMemory;
pub use traits::MemorySource;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    #[error("Memory region {0:#04x} is not available")]
    RegionUnavailable(u32),

    #[error("Read of {size} bytes at {address:#010x} exceeds region of {region_len} bytes")]
    OutOfBounds {
        address: u32,
        size: usize,
        region_len: usize,
    },
}
