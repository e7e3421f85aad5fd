//! Verify command implementation

use sharkflash_core::bus::CartBus;
use sharkflash_core::flash;
use sharkflash_core::programmer::{BusMaster, PresenceHandoff};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Run the verify command
pub fn run_verify<M: BusMaster + PresenceHandoff>(
    mut master: M,
    input: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    master.await_device();
    let mut bus = CartBus::new(master);

    let variant = flash::probe(&mut bus)?;
    println!(
        "Found: {} ({} bytes)",
        variant.name(),
        variant.capacity()
    );

    let mut file = File::open(input)?;
    let mut data = Vec::new();
    file.read_to_end(&mut data)?;

    println!("Verifying {} bytes against {:?}", data.len(), input);

    flash::verify_firmware(&mut bus, &data)?;

    println!("Verify OK: {} bytes match", data.len());
    Ok(())
}
