use std::fmt;

use crate::display::Framebuffer;
use crate::error::{Error, Result};

pub type Address = u16;

pub const MEM_SIZE: usize = 4096;
pub const FONT_ADDR: usize = 0x000;
pub const FONT_HEIGHT: usize = 5;
pub const PC_START_ADDR: Address = 0x200;
pub const MAX_ROM_SIZE: usize = MEM_SIZE - PC_START_ADDR as usize;
pub const NUM_REGISTERS: usize = 16;
pub const STACK_DEPTH: usize = 16;

pub const FONT_DATA: [u8; 16 * FONT_HEIGHT] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// The 4KB address space. Font glyphs live at the bottom, programs at 0x200.
pub struct Memory {
    data: [u8; MEM_SIZE],
}
impl Memory {
    pub fn new() -> Self {
        let data = {
            let mut data = [0; MEM_SIZE];
            data[FONT_ADDR..FONT_ADDR + FONT_DATA.len()].copy_from_slice(&FONT_DATA);
            data
        };

        Memory { data }
    }

    pub fn read(&self, addr: usize) -> Result<u8> {
        self.data
            .get(addr)
            .copied()
            .ok_or(Error::MemoryOutOfBounds { address: addr })
    }

    /// Reads the big-endian instruction word at `addr`.
    pub fn read_word(&self, addr: usize) -> Result<u16> {
        let high_byte = u16::from(self.read(addr)?);
        let low_byte = u16::from(self.read(addr + 1)?);
        Ok((high_byte << 8) | low_byte)
    }

    pub fn load_rom(&mut self, rom: &[u8]) -> Result<()> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(Error::RomTooLarge {
                size: rom.len(),
                max_size: MAX_ROM_SIZE,
            });
        }
        let start = usize::from(PC_START_ADDR);
        self.data[start..start + rom.len()].copy_from_slice(rom);
        Ok(())
    }

    pub fn read_sprite(&self, index: Address, rows: u8) -> Result<&[u8]> {
        let start = usize::from(index);
        let sprite_slice = start..start + usize::from(rows);

        if sprite_slice.end > MEM_SIZE {
            return Err(Error::MemoryOutOfBounds {
                address: sprite_slice.end - 1,
            });
        }
        Ok(&self.data[sprite_slice])
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Register {
    V0,
    V1,
    V2,
    V3,
    V4,
    V5,
    V6,
    V7,
    V8,
    V9,
    VA,
    VB,
    VC,
    VD,
    VE,
    VF,
}
impl Register {
    pub const ALL: [Register; NUM_REGISTERS] = [
        Register::V0,
        Register::V1,
        Register::V2,
        Register::V3,
        Register::V4,
        Register::V5,
        Register::V6,
        Register::V7,
        Register::V8,
        Register::V9,
        Register::VA,
        Register::VB,
        Register::VC,
        Register::VD,
        Register::VE,
        Register::VF,
    ];

    /// Maps the low nibble of `value` to a register.
    pub fn from_nibble(value: u8) -> Self {
        Self::ALL[usize::from(value & 0x0F)]
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{:X}", *self as usize)
    }
}

pub struct RegisterBank {
    registers: [u8; NUM_REGISTERS],
}
impl RegisterBank {
    pub fn new() -> Self {
        RegisterBank {
            registers: [0; NUM_REGISTERS],
        }
    }

    pub fn read(&self, reg: Register) -> u8 {
        self.registers[reg as usize]
    }

    pub fn write(&mut self, reg: Register, value: u8) {
        self.registers[reg as usize] = value;
    }

    pub fn as_array(&self) -> &[u8; NUM_REGISTERS] {
        &self.registers
    }
}

impl Default for RegisterBank {
    fn default() -> Self {
        Self::new()
    }
}

/// Return-address storage for call/return. No opcode in this core pushes to it yet.
pub type CallStack = [Address; STACK_DEPTH];

pub struct Chip8State {
    pub memory: Memory,
    pub registers: RegisterBank,
    pub pc: Address,
    pub index: Address,
    pub sp: u8,
    pub stack: CallStack,
    pub rom_size: usize,
    pub display: Framebuffer,
}
impl Chip8State {
    pub fn new() -> Self {
        Chip8State {
            memory: Memory::new(),
            registers: RegisterBank::new(),
            pc: PC_START_ADDR,
            index: 0,
            sp: 0,
            stack: [0; STACK_DEPTH],
            rom_size: 0,
            display: Framebuffer::new(),
        }
    }

    /// Zero-fills memory and registers, reloads the font and resets PC, I and SP.
    pub fn initialize(&mut self) {
        *self = Chip8State::new();
    }

    pub fn load_program(&mut self, rom: &[u8]) -> Result<()> {
        self.memory.load_rom(rom)?;
        self.rom_size = rom.len();
        Ok(())
    }

    pub fn draw_sprite(&mut self, x: usize, y: usize, rows: u8) -> Result<()> {
        let sprite = self.memory.read_sprite(self.index, rows)?;
        self.display.draw_sprite(x, y, sprite)
    }
}

impl Default for Chip8State {
    fn default() -> Self {
        Self::new()
    }
}
