//! Programming orchestration
//!
//! A session runs `unprotect -> erase -> program loop -> protect` against
//! whichever chip variant the identity probe selected. There is no pause or
//! resume: an interruption mid-sequence leaves the device in an undefined
//! programming state that requires a full re-erase to recover, and a failure
//! during the loop leaves it partially written with no rollback. Both are
//! properties of the write medium, not of this code.

use crate::bus::{CartBus, EepromAddress};
use crate::chip::ChipVariant;
use crate::error::{Error, Result};
use crate::programmer::BusMaster;
use crate::protocol::{self, sst28lf040, sst29le010};

/// I/O port that unlocks the cartridge's front-panel display.
const DISPLAY_UNLOCK_PORT: u16 = 0x0600;
/// I/O port driving the LED ring on the front panel.
const LED_PORT: u16 = 0x0800;
/// The LED ring advances once per this many image bytes.
const LED_STEP_INTERVAL: usize = 0x1000;

/// Tunables for a programming session.
///
/// The defaults reproduce the hardware protocol exactly: untimed completion
/// polls and no extra settle delay between per-word program writes. Both
/// knobs exist because the 28LF040 datasheet is unclear about inter-write
/// timing; they are safety margins, not corrections.
#[derive(Debug, Clone, Copy)]
pub struct WriteOptions {
    /// Bound on completion polling, in samples. `None` waits indefinitely.
    pub poll_limit: Option<u32>,
    /// Extra delay between a Byte_Program data write and its completion
    /// poll (28LF040 only), in microseconds.
    pub word_program_delay_us: u32,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            poll_limit: None,
            word_program_delay_us: 0,
        }
    }
}

/// Progress callbacks for a programming session.
pub trait WriteProgress {
    /// Called when starting the unprotect/erase phase.
    fn erasing(&mut self);

    /// Called when starting the program loop.
    fn writing(&mut self, bytes_to_write: usize);

    /// Called after each page is programmed.
    fn write_progress(&mut self, bytes_written: usize);

    /// Called when the session is complete.
    fn complete(&mut self);
}

/// No-op progress reporter.
pub struct NoProgress;

impl WriteProgress for NoProgress {
    fn erasing(&mut self) {}
    fn writing(&mut self, _bytes_to_write: usize) {}
    fn write_progress(&mut self, _bytes_written: usize) {}
    fn complete(&mut self) {}
}

/// Identify the fitted chip and select its programming variant.
pub fn probe<M: BusMaster>(bus: &mut CartBus<M>) -> Result<ChipVariant> {
    let id = protocol::read_chip_id(bus)?;
    log::debug!("EEPROM identity: 0x{:08X}", id);
    ChipVariant::from_id(id)
}

/// Assemble a big-endian 16-bit word from up to two image bytes.
///
/// An odd-length image pads its final word with 0xFF, the erased value, so
/// the trailing half-word is left blank rather than read out of bounds.
fn assemble_word(pair: &[u8]) -> u16 {
    let hi = pair[0] as u16;
    let lo = pair.get(1).copied().unwrap_or(0xFF) as u16;
    (hi << 8) | lo
}

/// Draw one frame of the rotating LED indicator.
fn led_ring<M: BusMaster>(bus: &mut CartBus<M>, active: u32) -> Result<()> {
    for i in 0..8u32 {
        let led: u16 = if i == active { 0x0000 } else { 0x0200 };
        bus.write_io_port(LED_PORT, led, led | 0x0400)?;
    }
    Ok(())
}

/// Return the display to its idle state.
fn restore_display<M: BusMaster>(bus: &mut CartBus<M>) -> Result<()> {
    for _ in 0..8 {
        bus.write_io_port(LED_PORT, 0x0200, 0x0600)?;
    }
    Ok(())
}

fn unprotect_and_erase<M: BusMaster>(
    bus: &mut CartBus<M>,
    variant: ChipVariant,
    options: &WriteOptions,
) -> Result<()> {
    match variant {
        ChipVariant::Sst28lf040 => {
            sst28lf040::software_data_unprotect(bus)?;
            sst28lf040::chip_erase(bus, options.poll_limit)
        }
        ChipVariant::Sst29le010 => {
            sst29le010::software_data_unprotect(bus, options.poll_limit)?;
            sst29le010::software_chip_erase(bus, options.poll_limit)
        }
    }
}

fn protect<M: BusMaster>(
    bus: &mut CartBus<M>,
    variant: ChipVariant,
    options: &WriteOptions,
) -> Result<()> {
    match variant {
        ChipVariant::Sst28lf040 => sst28lf040::software_data_protect(bus),
        ChipVariant::Sst29le010 => {
            sst29le010::software_data_protect(bus)?;
            // Twc: the device must not see any other access for 200us after
            // the protect sequence
            bus.delay_ms(1);
            protocol::wait_ready_bounded(bus, options.poll_limit)
        }
    }
}

/// Erase the chip, leaving it protected again afterwards.
pub fn erase_chip<M: BusMaster>(
    bus: &mut CartBus<M>,
    variant: ChipVariant,
    options: &WriteOptions,
) -> Result<()> {
    log::info!("Erasing {}", variant.name());
    unprotect_and_erase(bus, variant, options)?;
    protect(bus, variant, options)
}

/// Program a firmware image: unprotect, chip erase, paged program loop,
/// re-protect.
///
/// Returns [`Error::FirmwareTooLarge`] before touching the device if the
/// image exceeds the variant's capacity.
pub fn write_firmware<M: BusMaster, P: WriteProgress>(
    bus: &mut CartBus<M>,
    variant: ChipVariant,
    image: &[u8],
    options: &WriteOptions,
    progress: &mut P,
) -> Result<()> {
    let capacity = variant.capacity();
    if image.len() > capacity {
        return Err(Error::FirmwareTooLarge {
            len: image.len(),
            capacity,
        });
    }

    log::info!(
        "Programming {} bytes to {}",
        image.len(),
        variant.name()
    );

    progress.erasing();
    unprotect_and_erase(bus, variant, options)?;

    // unlock the front-panel display for the progress indicator
    bus.write_io_port(DISPLAY_UNLOCK_PORT, 0x0600, 0x0600)?;

    progress.writing(image.len());

    // pages are page_size * 2 bytes wide because each word spans both
    // ganged chips
    let page_bytes = variant.page_size() * 2;
    let mut led_status: u32 = 0;
    let mut written = 0usize;

    while written < image.len() {
        let chunk_len = core::cmp::min(page_bytes, image.len() - written);
        let chunk = &image[written..written + chunk_len];

        if written % LED_STEP_INTERVAL == 0 {
            led_ring(bus, led_status)?;
            led_status = (led_status + 1) % 7;
            if led_status == 2 {
                led_status = 3;
            }
        }

        // every page after the first full one starts at a page boundary;
        // a misaligned start would program the wrong words
        assert!(
            written % page_bytes == 0,
            "page start not aligned to page boundary"
        );

        match variant {
            ChipVariant::Sst28lf040 => {
                for (i, pair) in chunk.chunks(2).enumerate() {
                    let addr = EepromAddress::new(((written + i * 2) / 2) as u32);
                    sst28lf040::byte_program(
                        bus,
                        addr,
                        assemble_word(pair),
                        options.word_program_delay_us,
                        options.poll_limit,
                    )?;
                }
            }
            ChipVariant::Sst29le010 => {
                let mut last = (EepromAddress::new(0), 0u16);
                for (i, pair) in chunk.chunks(2).enumerate() {
                    let addr = EepromAddress::new(((written + i * 2) / 2) as u32);
                    let word = assemble_word(pair);
                    bus.write_eeprom(addr, word)?;
                    last = (addr, word);
                }
                sst29le010::complete_page_write(bus, last.0, last.1, options.poll_limit)?;
            }
        }

        written += chunk_len;
        progress.write_progress(written);
    }

    restore_display(bus)?;

    protect(bus, variant, options)?;

    progress.complete();
    Ok(())
}

/// Read back the start of the array into `buf`, word by word.
///
/// The chip must be idle (no command sequence in progress). The cartridge
/// also exposes the array through a linear DMA window, but that window is
/// platform-plumbing; word reads through the EEPROM window see the same
/// bytes.
pub fn read_firmware<M: BusMaster>(bus: &mut CartBus<M>, buf: &mut [u8]) -> Result<()> {
    for (word_idx, pair) in buf.chunks_mut(2).enumerate() {
        let word = bus.read_eeprom(EepromAddress::new(word_idx as u32))?;
        pair[0] = (word >> 8) as u8;
        if let Some(b) = pair.get_mut(1) {
            *b = word as u8;
        }
    }
    Ok(())
}

/// Compare the array contents against `image`.
///
/// Returns [`Error::VerifyMismatch`] for the first differing byte.
pub fn verify_firmware<M: BusMaster>(bus: &mut CartBus<M>, image: &[u8]) -> Result<()> {
    for (word_idx, pair) in image.chunks(2).enumerate() {
        let word = bus.read_eeprom(EepromAddress::new(word_idx as u32))?;
        let found = [(word >> 8) as u8, word as u8];
        for (i, &expected) in pair.iter().enumerate() {
            if found[i] != expected {
                return Err(Error::VerifyMismatch {
                    offset: word_idx * 2 + i,
                    expected,
                    found: found[i],
                });
            }
        }
    }
    Ok(())
}
