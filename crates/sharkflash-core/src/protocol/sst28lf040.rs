//! SST 28LF040 command sequences
//!
//! Byte-alterable 512 KiB flash (1 MiB as a ganged pair). Commands are
//! two-write pairs at address 0, except protection, which is controlled by
//! fixed sequences of *reads* at magic addresses - the chip decodes the
//! address pattern, no data is involved.

use super::wait_ready_bounded;
use crate::bus::{CartBus, EepromAddress};
use crate::error::Result;
use crate::programmer::BusMaster;

/// "Chip_Erase" command word, issued twice.
pub const CMD_CHIP_ERASE: u16 = 0x3030;
/// "Byte_Program" command word, followed by the data write.
pub const CMD_BYTE_PROGRAM: u16 = 0x1010;
/// "Read_ID" command word.
pub const CMD_READ_ID: u16 = 0x9090;
/// "Reset" command word, leaves ID mode.
pub const CMD_RESET: u16 = 0xFFFF;

/// Chip-erase settle time Tsce, in milliseconds.
const T_SCE_MS: u32 = 20;

/// Magic read addresses for "Software_Data_Unprotect".
const UNPROTECT_READS: [u32; 7] = [0x1823, 0x1820, 0x1822, 0x0418, 0x041B, 0x0419, 0x041A];

/// Magic read addresses for "Software_Data_Protect".
///
/// Identical to the unprotect sequence except for the final address.
const PROTECT_READS: [u32; 7] = [0x1823, 0x1820, 0x1822, 0x0418, 0x041B, 0x0419, 0x040A];

fn read_sequence<M: BusMaster>(bus: &mut CartBus<M>, addrs: &[u32]) -> Result<()> {
    for &addr in addrs {
        bus.read_eeprom(EepromAddress::new(addr))?;
    }
    Ok(())
}

/// "Software_Data_Unprotect": seven fixed-address reads.
pub fn software_data_unprotect<M: BusMaster>(bus: &mut CartBus<M>) -> Result<()> {
    read_sequence(bus, &UNPROTECT_READS)
}

/// "Software_Data_Protect": seven fixed-address reads.
pub fn software_data_protect<M: BusMaster>(bus: &mut CartBus<M>) -> Result<()> {
    read_sequence(bus, &PROTECT_READS)
}

/// "Chip_Erase": sets the whole array to 0xFF.
pub fn chip_erase<M: BusMaster>(bus: &mut CartBus<M>, poll_limit: Option<u32>) -> Result<()> {
    bus.write_eeprom(EepromAddress::new(0), CMD_CHIP_ERASE)?;
    bus.write_eeprom(EepromAddress::new(0), CMD_CHIP_ERASE)?;

    bus.delay_ms(T_SCE_MS);

    wait_ready_bounded(bus, poll_limit)
}

/// "Byte_Program": program one 16-bit word (one byte per ganged chip).
///
/// The chip is byte-alterable, so each word is its own command/data pair
/// with its own completion poll. `extra_delay_us` inserts a settle delay
/// between the data write and the poll; the hardware appears not to need
/// one, but the datasheet is unclear, so it is left tunable.
pub fn byte_program<M: BusMaster>(
    bus: &mut CartBus<M>,
    addr: EepromAddress,
    word: u16,
    extra_delay_us: u32,
    poll_limit: Option<u32>,
) -> Result<()> {
    bus.write_eeprom(EepromAddress::new(0), CMD_BYTE_PROGRAM)?;
    bus.write_eeprom(addr, word)?;

    if extra_delay_us > 0 {
        bus.delay_us(extra_delay_us);
    }

    wait_ready_bounded(bus, poll_limit)
}

/// "Read_ID": enter ID mode. Words 0 and 1 then read as the identity codes.
pub fn read_id_entry<M: BusMaster>(bus: &mut CartBus<M>) -> Result<()> {
    bus.write_eeprom(EepromAddress::new(0), CMD_READ_ID)
}

/// "Reset": leave ID mode and return to array reads.
pub fn reset<M: BusMaster>(bus: &mut CartBus<M>) -> Result<()> {
    bus.write_eeprom(EepromAddress::new(0), CMD_RESET)
}
