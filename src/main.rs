use std::path::PathBuf;

use chip8_vm::emulator::{DEFAULT_FRAME_RATE, Emulator, Mode, Settings};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CHIP-8 ROM
    rom: PathBuf,

    /// Ticks (and rendered frames) per second
    #[arg(short, long, default_value_t = DEFAULT_FRAME_RATE)]
    frame_rate: u64,

    /// What to show while the program runs
    #[arg(short, long, value_enum, default_value_t = Mode::Display)]
    mode: Mode,

    /// Seed for the RND instruction
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(args.mode.default_log_filter()),
    )
    .init();

    let settings = Settings::new(args.frame_rate, args.rom, args.mode, args.seed);
    let mut emulator = Emulator::new(settings);

    emulator.run()
}
