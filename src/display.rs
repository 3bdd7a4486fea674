use bitvec::{BitArr, array::BitArray};

use crate::error::{Error, Result};

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Highest sprite bit that is drawn. Bit 0 of every sprite row is skipped.
const SPRITE_HIGH_BIT: usize = 7;
const SPRITE_LOW_BIT: usize = 1;

/// 64x32 monochrome pixel grid, stored row-major.
pub struct Framebuffer {
    pixels: BitArr!(for DISPLAY_WIDTH * DISPLAY_HEIGHT),
}

impl Framebuffer {
    pub fn new() -> Self {
        Framebuffer {
            pixels: BitArray::ZERO,
        }
    }

    fn offset(x: usize, y: usize) -> Result<usize> {
        if x >= DISPLAY_WIDTH || y >= DISPLAY_HEIGHT {
            return Err(Error::DisplayOutOfBounds { x, y });
        }
        Ok(y * DISPLAY_WIDTH + x)
    }

    /// Returns false for coordinates outside the grid.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        Self::offset(x, y).is_ok_and(|index| self.pixels[index])
    }

    pub fn rows(&self) -> impl Iterator<Item = impl Iterator<Item = bool> + '_> + '_ {
        self.pixels
            .chunks(DISPLAY_WIDTH)
            .take(DISPLAY_HEIGHT)
            .map(|row| row.iter().by_vals())
    }

    pub fn lit_count(&self) -> usize {
        self.pixels.count_ones()
    }

    /// XOR-blits `sprite` with its top-left corner at (`x`, `y`).
    ///
    /// For each row byte, bits 7 down to 1 map to columns `x + (7 - bit)`; bit 0 is never
    /// drawn. Coordinates do not wrap. If any lit pixel lands outside the grid the whole
    /// draw fails with [`Error::DisplayOutOfBounds`] and nothing is toggled. No collision
    /// flag is reported.
    pub fn draw_sprite(&mut self, x: usize, y: usize, sprite: &[u8]) -> Result<()> {
        let targets = sprite
            .iter()
            .enumerate()
            .flat_map(|(row, &byte)| {
                (SPRITE_LOW_BIT..=SPRITE_HIGH_BIT)
                    .rev()
                    .filter(move |&bit| (byte >> bit) & 1 == 1)
                    .map(move |bit| (x + (SPRITE_HIGH_BIT - bit), y + row))
            })
            .map(|(px, py)| Self::offset(px, py))
            .collect::<Result<Vec<_>>>()?;

        for index in targets {
            let current = self.pixels[index];
            self.pixels.set(index, !current);
        }
        Ok(())
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}
