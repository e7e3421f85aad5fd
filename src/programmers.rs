//! Programmer backend registry
//!
//! Backends are selected by a `name[:params]` specification string. The
//! in-memory cartridge emulator is the only backend built into the host
//! binary; a real console-side bus master would register here when this
//! code is built for the target.

use sharkflash_dummy::{DummyCart, DummyConfig};
use thiserror::Error;

/// Available programmer specifications.
const AVAILABLE: &str = "dummy[:sst29le010|sst28lf040]";

/// Errors opening a programmer from its specification string.
#[derive(Debug, Error)]
pub enum ProgrammerError {
    /// The backend name is not registered.
    #[error("unknown programmer '{name}' (available: {available})")]
    UnknownProgrammer {
        /// The requested backend name
        name: String,
        /// The registered backends
        available: &'static str,
    },
    /// The dummy backend was asked to emulate an unknown chip.
    #[error("unknown dummy chip '{0}' (available: sst29le010, sst28lf040)")]
    UnknownChip(String),
}

/// Short list of available programmers for help text.
pub fn programmer_names_short() -> &'static str {
    AVAILABLE
}

/// Open a programmer from a `name[:params]` specification string.
pub fn open_programmer(spec: &str) -> Result<DummyCart, ProgrammerError> {
    let (name, params) = match spec.split_once(':') {
        Some((name, params)) => (name, Some(params)),
        None => (spec, None),
    };

    match name {
        "dummy" => {
            let config = match params.unwrap_or("sst29le010") {
                "sst29le010" | "29le010" => DummyConfig::sst29le010(),
                "sst28lf040" | "28lf040" => DummyConfig::sst28lf040(),
                other => return Err(ProgrammerError::UnknownChip(other.to_string())),
            };
            log::debug!("Opening dummy cartridge ({})", config.variant.name());
            Ok(DummyCart::new(config))
        }
        _ => Err(ProgrammerError::UnknownProgrammer {
            name: name.to_string(),
            available: AVAILABLE,
        }),
    }
}
