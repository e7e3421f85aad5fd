//! SST 29LE010 command sequences
//!
//! Page-write 128 KiB flash (256 KiB as a ganged pair). Privileged commands
//! are unlocked by writing `0xAA` to 0x5555 and `0x55` to 0x2AAA (doubled
//! across the pair); some commands take a second unlock round with an
//! `0x80` escape in between. Data within an unprotected page is written
//! directly, with completion polled once per page.

use super::{wait_ready_bounded, DQ7_MASK};
use crate::bus::{CartBus, EepromAddress};
use crate::error::{Error, Result};
use crate::programmer::BusMaster;

/// First unlock cycle: this data word at 0x5555.
pub const UNLOCK_DATA1: u16 = 0xAAAA;
/// Second unlock cycle: this data word at 0x2AAA.
pub const UNLOCK_DATA2: u16 = 0x5555;
/// Escape command extending the unlock to the six-write form.
pub const CMD_EXTEND: u16 = 0x8080;
/// "Software Chip Erase" tail command.
pub const CMD_CHIP_ERASE: u16 = 0x1010;
/// "Software Data Protect Enable & Page Write" tail command.
pub const CMD_PROTECT: u16 = 0xA0A0;
/// "Software Data Protect Disable" tail command.
pub const CMD_UNPROTECT: u16 = 0x2020;
/// "Software ID Entry" tail command.
pub const CMD_ID_ENTRY: u16 = 0x6060;
/// "Software ID Exit" tail command.
pub const CMD_ID_EXIT: u16 = 0xF0F0;

/// Chip-erase settle time Tsce, in milliseconds.
const T_SCE_MS: u32 = 20;
/// Write-cycle settle time Twc, in milliseconds.
const T_WC_MS: u32 = 1;
/// Protect-disable settle time Tblco, in milliseconds.
const T_BLCO_MS: u32 = 1;

const UNLOCK_ADDR1: EepromAddress = EepromAddress::new(0x5555);
const UNLOCK_ADDR2: EepromAddress = EepromAddress::new(0x2AAA);

fn unlock_prefix<M: BusMaster>(bus: &mut CartBus<M>) -> Result<()> {
    bus.write_eeprom(UNLOCK_ADDR1, UNLOCK_DATA1)?;
    bus.write_eeprom(UNLOCK_ADDR2, UNLOCK_DATA2)
}

/// Issue a three-write command: unlock prefix, then the command at 0x5555.
fn command<M: BusMaster>(bus: &mut CartBus<M>, cmd: u16) -> Result<()> {
    unlock_prefix(bus)?;
    bus.write_eeprom(UNLOCK_ADDR1, cmd)
}

/// Issue a six-write command: two unlock rounds around the 0x80 escape.
fn extended_command<M: BusMaster>(bus: &mut CartBus<M>, cmd: u16) -> Result<()> {
    unlock_prefix(bus)?;
    bus.write_eeprom(UNLOCK_ADDR1, CMD_EXTEND)?;
    unlock_prefix(bus)?;
    bus.write_eeprom(UNLOCK_ADDR1, cmd)
}

/// "Software Chip Erase": sets the whole array to 0xFF.
pub fn software_chip_erase<M: BusMaster>(
    bus: &mut CartBus<M>,
    poll_limit: Option<u32>,
) -> Result<()> {
    extended_command(bus, CMD_CHIP_ERASE)?;

    bus.delay_ms(T_SCE_MS);

    wait_ready_bounded(bus, poll_limit)
}

/// "Software Data Protect Enable & Page Write".
///
/// After this sequence the device expects either page data or a 200us
/// quiet period; the caller must wait (and ideally poll ready) before any
/// non-programming access.
pub fn software_data_protect<M: BusMaster>(bus: &mut CartBus<M>) -> Result<()> {
    command(bus, CMD_PROTECT)
}

/// "Software Data Protect Disable".
pub fn software_data_unprotect<M: BusMaster>(
    bus: &mut CartBus<M>,
    poll_limit: Option<u32>,
) -> Result<()> {
    extended_command(bus, CMD_UNPROTECT)?;

    bus.delay_ms(T_BLCO_MS);

    wait_ready_bounded(bus, poll_limit)
}

/// "Software ID Entry". Words 0 and 1 then read as the identity codes.
pub fn software_id_entry<M: BusMaster>(bus: &mut CartBus<M>) -> Result<()> {
    extended_command(bus, CMD_ID_ENTRY)
}

/// "Software ID Exit".
pub fn software_id_exit<M: BusMaster>(bus: &mut CartBus<M>) -> Result<()> {
    command(bus, CMD_ID_EXIT)
}

/// Wait out a page write issued as direct word writes.
///
/// Waits the Twc settle time and polls DQ6, then data-polls DQ7 of the last
/// word written against the programmed value - the datasheet warns the
/// toggle bit can go stable slightly before the data is actually valid.
pub fn complete_page_write<M: BusMaster>(
    bus: &mut CartBus<M>,
    last_addr: EepromAddress,
    last_word: u16,
    poll_limit: Option<u32>,
) -> Result<()> {
    bus.delay_ms(T_WC_MS);

    wait_ready_bounded(bus, poll_limit)?;

    let expected = last_word & DQ7_MASK;
    let mut polls = 0u32;
    while bus.read_eeprom(last_addr)? & DQ7_MASK != expected {
        polls += 1;
        if let Some(limit) = poll_limit {
            if polls >= limit {
                return Err(Error::Timeout);
            }
        }
    }

    Ok(())
}
