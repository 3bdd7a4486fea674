use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the interpreter core and its ROM loader.
#[derive(Debug, Error)]
pub enum Error {
    #[error("ROM is too large ({size} bytes), max size is {max_size} bytes")]
    RomTooLarge { size: usize, max_size: usize },

    #[error("Failed to read ROM {}: {source}", .path.display())]
    RomRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Memory access out of bounds at address {address:#06X}")]
    MemoryOutOfBounds { address: usize },

    #[error("Pixel ({x}, {y}) is outside the display")]
    DisplayOutOfBounds { x: usize, y: usize },
}

impl Error {
    /// Load errors are fatal at startup; everything else is raised by a tick.
    pub fn is_load_error(&self) -> bool {
        matches!(self, Error::RomTooLarge { .. } | Error::RomRead { .. })
    }
}
