use std::fmt;

use crate::error::Result;
use crate::state::{Address, Memory, Register};

/// The operation selected by an instruction word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Opcode {
    /// 1nnn
    Jump { nnn: Address },
    /// 3xkk
    JumpEqX { x: Register, kk: u8 },
    /// 6xkk
    SetImmediate { x: Register, kk: u8 },
    /// 7xkk
    Add { x: Register, kk: u8 },
    /// 8xy0
    SetXToY { x: Register, y: Register },
    /// Annn
    SetIndex { nnn: Address },
    /// Cxkk
    Random { x: Register, kk: u8 },
    /// Dxyn
    Display { x: Register, y: Register, n: u8 },
    Unknown,
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Opcode::Jump { nnn } => write!(f, "JP {nnn:03X}"),
            Opcode::JumpEqX { x, kk } => write!(f, "SE {x}, {kk:02X}"),
            Opcode::SetImmediate { x, kk } => write!(f, "LD {x}, {kk:02X}"),
            Opcode::Add { x, kk } => write!(f, "ADD {x}, {kk:02X}"),
            Opcode::SetXToY { x, y } => write!(f, "LD {x}, {y}"),
            Opcode::SetIndex { nnn } => write!(f, "LD I, {nnn:03X}"),
            Opcode::Random { x, kk } => write!(f, "RND {x}, {kk:02X}"),
            Opcode::Display { x, y, n } => write!(f, "DRW {x}, {y}, {n:X}"),
            Opcode::Unknown => write!(f, "UNK"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodedInstruction {
    /// The full 16-bit instruction word.
    pub raw: u16,
    /// First nibble. Selects the instruction family.
    pub op1: u8,
    /// Second nibble. Usually register X.
    pub op2: u8,
    /// Third nibble. Usually register Y.
    pub op3: u8,
    /// Fourth nibble. Sub-opcode or sprite height.
    pub op4: u8,
    /// The second byte. An 8-bit immediate.
    pub kk: u8,
    /// The lower three nibbles. A 12-bit address.
    pub nnn: Address,
    pub opcode: Opcode,
}

impl DecodedInstruction {
    pub fn new(raw: u16) -> Self {
        let op1 = (raw >> 12) as u8;
        let op2 = ((raw >> 8) & 0x0F) as u8;
        let op3 = ((raw >> 4) & 0x0F) as u8;
        let op4 = (raw & 0x0F) as u8;
        let kk = (raw & 0x00FF) as u8;
        let nnn = raw & 0x0FFF;

        let x = Register::from_nibble(op2);
        let y = Register::from_nibble(op3);

        let opcode = match op1 {
            0x1 => Opcode::Jump { nnn },
            0x3 => Opcode::JumpEqX { x, kk },
            0x6 => Opcode::SetImmediate { x, kk },
            0x7 => Opcode::Add { x, kk },
            0x8 => match op4 {
                0x0 => Opcode::SetXToY { x, y },
                _ => Opcode::Unknown,
            },
            0xA => Opcode::SetIndex { nnn },
            0xC => Opcode::Random { x, kk },
            0xD => Opcode::Display { x, y, n: op4 },
            _ => Opcode::Unknown,
        };

        DecodedInstruction {
            raw,
            op1,
            op2,
            op3,
            op4,
            kk,
            nnn,
            opcode,
        }
    }
}

/// Decodes the instruction stored at `pc`. Fails if `pc + 1` is past the end of memory.
pub fn decode(memory: &Memory, pc: Address) -> Result<DecodedInstruction> {
    let raw = memory.read_word(usize::from(pc))?;
    Ok(DecodedInstruction::new(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::state::{MEM_SIZE, PC_START_ADDR};

    fn decode_raw(raw: u16) -> DecodedInstruction {
        DecodedInstruction::new(raw)
    }

    #[test]
    fn splits_word_into_fields() {
        let decoded = decode_raw(0xD12F);
        assert_eq!(decoded.op1, 0xD);
        assert_eq!(decoded.op2, 0x1);
        assert_eq!(decoded.op3, 0x2);
        assert_eq!(decoded.op4, 0xF);
        assert_eq!(decoded.kk, 0x2F);
        assert_eq!(decoded.nnn, 0x12F);
        assert_eq!(
            decoded.opcode,
            Opcode::Display {
                x: Register::V1,
                y: Register::V2,
                n: 0xF
            }
        );
    }

    #[test]
    fn opcode_translation() {
        let cases = [
            (0x1234, Opcode::Jump { nnn: 0x234 }),
            (
                0x3A42,
                Opcode::JumpEqX {
                    x: Register::VA,
                    kk: 0x42,
                },
            ),
            (
                0x600A,
                Opcode::SetImmediate {
                    x: Register::V0,
                    kk: 0x0A,
                },
            ),
            (
                0x7F01,
                Opcode::Add {
                    x: Register::VF,
                    kk: 0x01,
                },
            ),
            (
                0x8120,
                Opcode::SetXToY {
                    x: Register::V1,
                    y: Register::V2,
                },
            ),
            (0x8124, Opcode::Unknown),
            (0xA210, Opcode::SetIndex { nnn: 0x210 }),
            (
                0xC3FF,
                Opcode::Random {
                    x: Register::V3,
                    kk: 0xFF,
                },
            ),
            (0x0000, Opcode::Unknown),
            (0x00E0, Opcode::Unknown),
            (0x2200, Opcode::Unknown),
            (0xF155, Opcode::Unknown),
        ];

        for (raw, expected) in cases {
            assert_eq!(decode_raw(raw).opcode, expected, "raw {raw:#06X}");
        }
    }

    #[test]
    fn decode_reads_big_endian_word_at_pc() {
        let mut memory = Memory::new();
        memory.load_rom(&[0x60, 0x0A, 0x70, 0x05]).unwrap();

        let first = decode(&memory, PC_START_ADDR).unwrap();
        let second = decode(&memory, PC_START_ADDR + 2).unwrap();
        assert_eq!(first.raw, 0x600A);
        assert_eq!(second.raw, 0x7005);

        assert_eq!(decode(&memory, PC_START_ADDR).unwrap(), first);
    }

    #[test]
    fn decode_past_end_of_memory_fails() {
        let memory = Memory::new();
        let last = (MEM_SIZE - 1) as Address;
        assert!(matches!(
            decode(&memory, last),
            Err(Error::MemoryOutOfBounds { address: 4096 })
        ));
        assert!(decode(&memory, last - 1).is_ok());
    }
}
