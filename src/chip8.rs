use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::display::Framebuffer;
use crate::error::Result;
use crate::instruction::{DecodedInstruction, Opcode, decode};
use crate::state::{Address, CallStack, Chip8State, Memory, NUM_REGISTERS, Register};

/// Exclusive upper bound of the raw RND draw. 255 itself is never produced.
pub const RANDOM_BOUND: u8 = 255;

/// Size of one instruction in bytes.
const INSTRUCTION_SIZE: Address = 2;

/// The fetch-decode-execute engine. Owns all machine state.
pub struct Chip8 {
    state: Chip8State,
    rng: StdRng,
}

impl Chip8 {
    pub fn new() -> Self {
        Chip8 {
            state: Chip8State::new(),
            rng: StdRng::from_os_rng(),
        }
    }

    /// Builds an engine whose RND instruction draws from a deterministic sequence.
    pub fn with_seed(seed: u64) -> Self {
        Chip8 {
            state: Chip8State::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn initialize(&mut self) {
        self.state.initialize();
    }

    pub fn load_program(&mut self, rom: &[u8]) -> Result<()> {
        self.state.load_program(rom)?;
        info!("Loaded ROM [size: {}]", rom.len());
        Ok(())
    }

    /// Runs one fetch-decode-execute cycle and returns the executed instruction.
    ///
    /// PC advances by 2 after the handler runs, whatever the handler did to it. A failed
    /// tick leaves the machine untouched.
    pub fn tick(&mut self) -> Result<DecodedInstruction> {
        let pc = self.state.pc;
        let decoded = decode(&self.state.memory, pc)?;
        debug!("{pc:#05X}: {:04X} {}", decoded.raw, decoded.opcode);

        self.execute(&decoded)?;
        self.state.pc = self.state.pc.wrapping_add(INSTRUCTION_SIZE);

        Ok(decoded)
    }

    fn execute(&mut self, decoded: &DecodedInstruction) -> Result<()> {
        let state = &mut self.state;
        match decoded.opcode {
            // The tick adds 2 afterwards, so land 2 short of the target.
            Opcode::Jump { nnn } => {
                state.pc = nnn.wrapping_sub(INSTRUCTION_SIZE);
            }
            Opcode::JumpEqX { x, kk } => {
                if state.registers.read(x) == kk {
                    state.pc = state.pc.wrapping_add(INSTRUCTION_SIZE);
                }
            }
            Opcode::SetImmediate { x, kk } => {
                state.registers.write(x, kk);
            }
            Opcode::Add { x, kk } => {
                let value_x = state.registers.read(x);
                state.registers.write(x, value_x.wrapping_add(kk));
            }
            Opcode::SetXToY { x, y } => {
                let value_y = state.registers.read(y);
                state.registers.write(x, value_y);
            }
            Opcode::SetIndex { nnn } => {
                state.index = nnn;
            }
            Opcode::Random { x, kk } => {
                let random_value = self.rng.random_range(0..RANDOM_BOUND);
                state.registers.write(x, random_value & kk);
            }
            Opcode::Display { x, y, n } => {
                let x = usize::from(state.registers.read(x));
                let y = usize::from(state.registers.read(y));
                state.draw_sprite(x, y, n)?;
            }
            Opcode::Unknown if decoded.op1 == 0x8 => {
                warn!("Unknown 8xy* instruction: {:04X}", decoded.raw);
            }
            Opcode::Unknown => {
                warn!("Unknown instruction: {:04X}", decoded.raw);
            }
        }
        Ok(())
    }

    pub fn pc(&self) -> Address {
        self.state.pc
    }

    pub fn index(&self) -> Address {
        self.state.index
    }

    pub fn sp(&self) -> u8 {
        self.state.sp
    }

    pub fn stack(&self) -> &CallStack {
        &self.state.stack
    }

    pub fn register(&self, reg: Register) -> u8 {
        self.state.registers.read(reg)
    }

    pub fn registers(&self) -> &[u8; NUM_REGISTERS] {
        self.state.registers.as_array()
    }

    pub fn memory(&self) -> &Memory {
        &self.state.memory
    }

    pub fn rom_size(&self) -> usize {
        self.state.rom_size
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.state.display
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}
