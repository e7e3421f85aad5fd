//! Write command implementation

use indicatif::{ProgressBar, ProgressStyle};
use sharkflash_core::bus::CartBus;
use sharkflash_core::flash::{self, WriteOptions, WriteProgress};
use sharkflash_core::programmer::{BusMaster, PresenceHandoff};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Progress reporter using indicatif progress bars
pub struct IndicatifProgress {
    current_bar: Option<ProgressBar>,
}

impl IndicatifProgress {
    pub fn new() -> Self {
        Self { current_bar: None }
    }

    fn create_bar(&mut self, total: u64, phase: &'static str) {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(&format!(
                    "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{bytes}}/{{total_bytes}} ({{bytes_per_sec}}, {{eta}}) {}",
                    phase
                ))
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        self.current_bar = Some(pb);
    }

    fn create_spinner(&mut self, message: String) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(100));
        self.current_bar = Some(pb);
    }

    fn finish(&mut self, message: &str) {
        if let Some(pb) = self.current_bar.take() {
            pb.finish_with_message(message.to_string());
        }
    }
}

impl WriteProgress for IndicatifProgress {
    fn erasing(&mut self) {
        self.create_spinner("Erasing chip...".to_string());
    }

    fn writing(&mut self, bytes_to_write: usize) {
        self.finish("Erase complete");
        self.create_bar(bytes_to_write as u64, "Writing");
    }

    fn write_progress(&mut self, bytes_written: usize) {
        if let Some(pb) = &self.current_bar {
            pb.set_position(bytes_written as u64);
        }
    }

    fn complete(&mut self) {
        self.finish("Write complete");
    }
}

/// Run the write command
pub fn run_write<M: BusMaster + PresenceHandoff>(
    mut master: M,
    input: &Path,
    do_verify: bool,
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

    // Read input file
    let mut file = File::open(input)?;
    let mut data = Vec::new();
    file.read_to_end(&mut data)?;

    println!("Read {} bytes from {:?}", data.len(), input);

    let mut progress = IndicatifProgress::new();
    flash::write_firmware(&mut bus, variant, &data, options, &mut progress)?;

    if do_verify {
        println!("Verifying...");
        flash::verify_firmware(&mut bus, &data)?;
        println!("Verify OK: {} bytes match", data.len());
    }

    Ok(())
}
