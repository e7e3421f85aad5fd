//! Bus master trait definitions
//!
//! The engine never touches hardware directly; everything goes through a
//! [`BusMaster`], which models the console's memory-mapped cartridge bus.
//! On real hardware this is backed by uncached 32-bit I/O to the parallel
//! interface; in tests it is backed by the `sharkflash-dummy` emulator.

/// Memory-mapped cartridge bus access.
///
/// All transactions are 32 bits wide, blocking, and uncached. The bus is
/// assumed reliable but slow; implementations must not cache, reorder, or
/// retry accesses, since the flash command decoder is sensitive to the exact
/// transaction sequence.
pub trait BusMaster {
    /// Check whether a physical bus address falls inside an addressable window.
    fn is_accessible(&self, addr: u32) -> bool;

    /// Perform a single 32-bit read transaction.
    ///
    /// The address must already have passed [`Self::is_accessible`].
    fn read32(&mut self, addr: u32) -> u32;

    /// Perform a single 32-bit write transaction.
    ///
    /// The address must already have passed [`Self::is_accessible`].
    fn write32(&mut self, addr: u32, value: u32);

    /// Block for the specified number of microseconds.
    ///
    /// Used for the datasheet settle times (Tsce, Twc, Tblco) between
    /// command issuance and completion polling.
    fn delay_us(&mut self, us: u32);

    /// Block for the specified number of milliseconds.
    fn delay_ms(&mut self, ms: u32) {
        self.delay_us(ms.saturating_mul(1000));
    }
}

impl<M: BusMaster + ?Sized> BusMaster for &mut M {
    fn is_accessible(&self, addr: u32) -> bool {
        (**self).is_accessible(addr)
    }

    fn read32(&mut self, addr: u32) -> u32 {
        (**self).read32(addr)
    }

    fn write32(&mut self, addr: u32, value: u32) {
        (**self).write32(addr, value)
    }

    fn delay_us(&mut self, us: u32) {
        (**self).delay_us(us)
    }

    fn delay_ms(&mut self, ms: u32) {
        (**self).delay_ms(ms)
    }
}

/// Device-presence handoff.
///
/// The target cartridge is physically swapped in after the host has booted,
/// so the engine must not touch the bus until the swap has happened. How the
/// swap is detected is entirely platform-specific (on a real console it is
/// a one-shot CPU watchpoint trick; a simulator just returns). Any
/// state the mechanism needs is created when the call starts and discarded
/// when it returns.
pub trait PresenceHandoff {
    /// Block until the target device is present and addressable on the bus.
    fn await_device(&mut self);
}
