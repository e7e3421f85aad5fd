//! CLI argument parsing

use crate::programmers;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Generate dynamic help text for the programmer argument
fn programmer_help() -> String {
    format!(
        "Programmer to use [available: {}]",
        programmers::programmer_names_short()
    )
}

#[derive(Parser)]
#[command(name = "sharkflash")]
#[command(author, version, about = "GameShark cartridge EEPROM programmer", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Probe for the fitted EEPROM
    Probe {
        /// Programmer to use
        #[arg(short, long, help = programmer_help())]
        programmer: String,
    },

    /// Write a firmware image to the EEPROM
    Write {
        /// Programmer to use
        #[arg(short, long, help = programmer_help())]
        programmer: String,

        /// Input firmware image
        #[arg(short, long)]
        input: PathBuf,

        /// Verify after writing
        #[arg(long, default_value = "true")]
        verify: bool,

        /// Bound completion polling to this many samples instead of
        /// waiting indefinitely
        #[arg(long)]
        poll_limit: Option<u32>,

        /// Extra settle delay between per-word program writes, in
        /// microseconds (28LF040 only)
        #[arg(long, default_value = "0")]
        word_delay_us: u32,
    },

    /// Erase the EEPROM
    Erase {
        /// Programmer to use
        #[arg(short, long, help = programmer_help())]
        programmer: String,

        /// Bound completion polling to this many samples instead of
        /// waiting indefinitely
        #[arg(long)]
        poll_limit: Option<u32>,
    },

    /// Verify EEPROM contents against an image file
    Verify {
        /// Programmer to use
        #[arg(short, long, help = programmer_help())]
        programmer: String,

        /// Input file path to verify against
        #[arg(short, long)]
        input: PathBuf,
    },
}
