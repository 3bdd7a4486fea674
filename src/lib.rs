pub mod chip8;
pub mod disassembler;
pub mod display;
pub mod emulator;
pub mod error;
pub mod instruction;
pub mod state;

pub use chip8::Chip8;
pub use display::Framebuffer;
pub use error::{Error, Result};
pub use instruction::{DecodedInstruction, Opcode};
