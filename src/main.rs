use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::path::PathBuf;

use chip8_vm::config::{Config, DEFAULT_FRAME_RATE, DEFAULT_INSTRUCTIONS_PER_SECOND};
use chip8_vm::display::MonoTermDisplay;
use chip8_vm::environment::Environment;
use chip8_vm::input::TermInput;
use chip8_vm::sound::{Mute, SimpleBeep, Sound};

/// Run a CHIP-8 program in the terminal. Esc quits.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the ROM file to run
    rom: PathBuf,

    /// Instructions per second
    #[arg(long, default_value_t = DEFAULT_INSTRUCTIONS_PER_SECOND)]
    ips: u32,

    /// Frames presented per second
    #[arg(long, default_value_t = DEFAULT_FRAME_RATE)]
    frame_rate: u32,

    /// Stop after this many instructions
    #[arg(long)]
    max_steps: Option<u64>,

    /// Seed for the random number instruction
    #[arg(long)]
    seed: Option<u64>,

    /// Never beep
    #[arg(long)]
    mute: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = Config {
        instructions_per_second: args.ips,
        frame_rate: args.frame_rate,
        max_steps: args.max_steps,
        seed: args.seed,
        mute: args.mute,
    };

    // open the ROM before touching the terminal, so errors print cleanly
    let mut rom = File::open(&args.rom)
        .map_err(chip8_vm::Chip8Error::RomUnreadable)
        .with_context(|| format!("opening {}", args.rom.display()))?;

    let mut input = TermInput::new()?;
    // dropped before input, so the cursor is parked while still in raw mode
    let mut display = MonoTermDisplay::new()?;
    let (mut beeper, mut mute) = (SimpleBeep, Mute);
    let sound: &mut dyn Sound = if config.mute { &mut mute } else { &mut beeper };
    let mut env = Environment::new(config, &mut display, &mut input, sound);
    env.load_program(&mut rom)
        .with_context(|| format!("loading {}", args.rom.display()))?;
    env.main_loop()?;
    Ok(())
}
