//! sharkflash - GameShark cartridge EEPROM programmer
//!
//! Reflashes the firmware EEPROM inside a GameShark/Action Replay cartridge
//! through the console's parallel cartridge bus.
//!
//! # Architecture
//!
//! The programming engine lives in `sharkflash-core` and talks to hardware
//! only through the `BusMaster` trait, so the same engine drives a real
//! console-side bus backend or the in-memory cartridge emulator shipped in
//! `sharkflash-dummy`. This binary wires the engine to a programmer backend
//! selected on the command line; the emulator is the only built-in backend,
//! since a real bus master is necessarily console-side code.

mod cli;
mod commands;
mod programmers;

use clap::Parser;
use cli::{Cli, Commands};
use sharkflash_core::flash::WriteOptions;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Set log level based on verbosity
    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    match cli.command {
        Commands::Probe { programmer } => {
            let master = programmers::open_programmer(&programmer)?;
            commands::probe::run_probe(master)
        }
        Commands::Write {
            programmer,
            input,
            verify,
            poll_limit,
            word_delay_us,
        } => {
            let master = programmers::open_programmer(&programmer)?;
            let options = WriteOptions {
                poll_limit,
                word_program_delay_us: word_delay_us,
            };
            commands::write::run_write(master, &input, verify, &options)
        }
        Commands::Erase {
            programmer,
            poll_limit,
        } => {
            let master = programmers::open_programmer(&programmer)?;
            let options = WriteOptions {
                poll_limit,
                ..Default::default()
            };
            commands::erase::run_erase(master, &options)
        }
        Commands::Verify { programmer, input } => {
            let master = programmers::open_programmer(&programmer)?;
            commands::verify::run_verify(master, &input)
        }
    }
}
