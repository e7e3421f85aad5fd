//! Probe command implementation

use sharkflash_core::bus::CartBus;
use sharkflash_core::flash;
use sharkflash_core::programmer::{BusMaster, PresenceHandoff};

/// Run the probe command
pub fn run_probe<M: BusMaster + PresenceHandoff>(
    mut master: M,
) -> Result<(), Box<dyn std::error::Error>> {
    master.await_device();
    let mut bus = CartBus::new(master);

    let variant = flash::probe(&mut bus)?;

    println!(
        "Found: {} (0x{:08X}, {} bytes, {}-byte pages)",
        variant.name(),
        variant.id(),
        variant.capacity(),
        variant.page_size()
    );

    Ok(())
}
