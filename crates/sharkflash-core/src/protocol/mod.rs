//! EEPROM command protocol implementations
//!
//! This module holds the pieces shared by both chip families - completion
//! polling and identity queries - plus one submodule per family with that
//! part's datasheet command sequences. Every sequence is order-sensitive:
//! the chips decode commands by watching the exact series of addresses and
//! data on the bus, so nothing here may be reordered or coalesced.

pub mod sst28lf040;
pub mod sst29le010;

use crate::bus::{CartBus, EepromAddress};
use crate::error::{Error, Result};
use crate::programmer::BusMaster;

/// DQ6 toggle-status mask, doubled across the ganged pair.
///
/// While a write or erase is in progress DQ6 flips on every read and goes
/// stable on completion. DQ7 is also a status bit (it reads back the inverse
/// of the written bit until completion), but DQ6 works identically on both
/// families and for erase, so it is the one polled here.
pub const DQ6_MASK: u16 = 0b0100_0000_0100_0000;

/// DQ7 data-polling mask, doubled across the ganged pair.
pub const DQ7_MASK: u16 = 0b1000_0000_1000_0000;

/// Low identity word shared by both supported families (SST manufacturer
/// code 0xBF, doubled).
pub const MANUFACTURER_SST: u16 = 0xBFBF;

/// Block until the device reports operation completion.
///
/// Reads word 0 once to establish a baseline, then keeps reading until two
/// consecutive masked samples match. This never times out: the datasheet
/// worst-case completion times are short, and an unresponsive device hangs
/// the call, matching the hardware protocol.
pub fn wait_ready<M: BusMaster>(bus: &mut CartBus<M>) -> Result<()> {
    wait_ready_bounded(bus, None)
}

/// [`wait_ready`] with an optional bound on the number of polls.
///
/// With `poll_limit = None` this is the untimed hardware-fidelity wait.
/// With `Some(n)`, gives up with [`Error::Timeout`] after observing `n`
/// unstable samples.
pub fn wait_ready_bounded<M: BusMaster>(
    bus: &mut CartBus<M>,
    poll_limit: Option<u32>,
) -> Result<()> {
    let status = EepromAddress::new(0);
    let mut prev = bus.read_eeprom(status)? & DQ6_MASK;
    let mut polls = 0u32;
    loop {
        let next = bus.read_eeprom(status)? & DQ6_MASK;
        if next == prev {
            return Ok(());
        }
        prev = next;
        polls += 1;
        if let Some(limit) = poll_limit {
            if polls >= limit {
                return Err(Error::Timeout);
            }
        }
    }
}

/// Query the device identity.
///
/// Tries the six-write Software ID Entry protocol first (the 29LE010
/// understands it; on a 28LF040 the writes are inert and the reads return
/// array data). If the low identity word is not the SST manufacturer code,
/// falls back to the 28LF040's single-command Read_ID protocol.
///
/// Returns the composite `(low_word << 16) | high_word` identity, where the
/// low word is the doubled manufacturer code and the high word the doubled
/// device code. The caller dispatches on this value; see
/// [`crate::chip::ChipVariant::from_id`].
pub fn read_chip_id<M: BusMaster>(bus: &mut CartBus<M>) -> Result<u32> {
    sst29le010::software_id_entry(bus)?;

    let ids_lo = bus.read_eeprom(EepromAddress::new(0))?;
    let ids_hi = bus.read_eeprom(EepromAddress::new(1))?;

    sst29le010::software_id_exit(bus)?;

    if ids_lo != MANUFACTURER_SST {
        return read_chip_id_alt(bus);
    }

    Ok(((ids_lo as u32) << 16) | (ids_hi as u32))
}

/// The 28LF040-family identity query ("Read_ID" / "Reset").
pub fn read_chip_id_alt<M: BusMaster>(bus: &mut CartBus<M>) -> Result<u32> {
    sst28lf040::read_id_entry(bus)?;

    let ids_lo = bus.read_eeprom(EepromAddress::new(0))?;
    let ids_hi = bus.read_eeprom(EepromAddress::new(1))?;

    sst28lf040::reset(bus)?;

    Ok(((ids_lo as u32) << 16) | (ids_hi as u32))
}
