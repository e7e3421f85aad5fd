//! Erase command implementation

use indicatif::{ProgressBar, ProgressStyle};
use sharkflash_core::bus::CartBus;
use sharkflash_core::flash::{self, WriteOptions};
use sharkflash_core::programmer::{BusMaster, PresenceHandoff};
use std::time::Duration;

/// Run the erase command
pub fn run_erase<M: BusMaster + PresenceHandoff>(
    mut master: M,
    options: &WriteOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    master.await_device();
    let mut bus = CartBus::new(master);

    let variant = flash::probe(&mut bus)?;
    println!(
        "Found: {} ({} bytes)",
        variant.name(),
        variant.capacity()
    );

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message("Erasing chip...");
    pb.enable_steady_tick(Duration::from_millis(100));

    flash::erase_chip(&mut bus, variant, options)?;

    pb.finish_with_message("Erase complete");
    Ok(())
}
