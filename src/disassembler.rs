//! Static disassembly and register dumps for the debug views. Nothing here mutates the engine.

use std::fmt::{self, Write};

use crate::chip8::Chip8;
use crate::error::Result;
use crate::instruction::{DecodedInstruction, decode};
use crate::state::{Address, NUM_REGISTERS, PC_START_ADDR};

pub fn mnemonic(decoded: &DecodedInstruction) -> String {
    decoded.opcode.to_string()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisassembledLine {
    pub address: Address,
    pub raw: u16,
    pub mnemonic: String,
    /// True for the instruction PC currently points at.
    pub is_current: bool,
}

impl fmt::Display for DisassembledLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#05X}: {:04X} {}", self.address, self.raw, self.mnemonic)
    }
}

/// Disassembles the `rom_size / 2` instructions of the loaded program.
pub fn disassemble(chip8: &Chip8) -> Result<Vec<DisassembledLine>> {
    let count = chip8.rom_size() / 2;
    (0..count)
        .map(|i| {
            let address = PC_START_ADDR + (i as Address) * 2;
            let decoded = decode(chip8.memory(), address)?;
            Ok(DisassembledLine {
                address,
                raw: decoded.raw,
                mnemonic: mnemonic(&decoded),
                is_current: address == chip8.pc(),
            })
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegisterDump {
    pub registers: [u8; NUM_REGISTERS],
    pub index: Address,
    pub pc: Address,
    pub sp: u8,
}

impl RegisterDump {
    pub fn capture(chip8: &Chip8) -> Self {
        RegisterDump {
            registers: *chip8.registers(),
            index: chip8.index(),
            pc: chip8.pc(),
            sp: chip8.sp(),
        }
    }
}

impl fmt::Display for RegisterDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.registers.iter().enumerate() {
            if i > 0 {
                f.write_char(if i % 4 == 0 { '\n' } else { ' ' })?;
            }
            write!(f, "V{i:X}: {value:02X}")?;
        }
        write!(
            f,
            "\nI: {:#05X} PC: {:#05X} SP: {}",
            self.index, self.pc, self.sp
        )
    }
}

/// Plain-text debug dump: the disassembly with the current line marked by `>`, then the
/// register file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextDump {
    pub lines: Vec<DisassembledLine>,
    pub registers: RegisterDump,
}

impl TextDump {
    pub fn capture(chip8: &Chip8) -> Result<Self> {
        Ok(TextDump {
            lines: disassemble(chip8)?,
            registers: RegisterDump::capture(chip8),
        })
    }
}

impl fmt::Display for TextDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            let marker = if line.is_current { '>' } else { ' ' };
            writeln!(f, "{marker} {line}")?;
        }
        write!(f, "\n{}", self.registers)
    }
}

pub fn render_text(chip8: &Chip8) -> Result<String> {
    Ok(TextDump::capture(chip8)?.to_string())
}
