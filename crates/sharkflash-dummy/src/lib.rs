//! sharkflash-dummy - In-memory cartridge emulator for testing
//!
//! This crate provides a dummy bus master that emulates the cartridge end to
//! end: the parallel-bus window decode, the interleaved EEPROM addressing,
//! both supported SST chips' command state machines, and the DQ6 toggle-bit
//! busy status. It's useful for testing and development without real
//! hardware, and it counts bus transactions so tests can assert on exactly
//! what hit the wire.

use sharkflash_core::bus::{EepromAddress, CART_SELECT, EEPROM_BASE, IO_SELECT, OFFSET_MASK};
use sharkflash_core::chip::{ChipVariant, ID_SST_28LF040, ID_SST_29LE010};
use sharkflash_core::programmer::{BusMaster, PresenceHandoff};

/// DQ6 status bit, doubled across the emulated pair.
const DQ6: u16 = 0x4040;

/// 28LF040 "Software_Data_Unprotect" read-address sequence.
const LF040_UNPROTECT_READS: [u32; 7] = [0x1823, 0x1820, 0x1822, 0x0418, 0x041B, 0x0419, 0x041A];
/// 28LF040 "Software_Data_Protect" read-address sequence.
const LF040_PROTECT_READS: [u32; 7] = [0x1823, 0x1820, 0x1822, 0x0418, 0x041B, 0x0419, 0x040A];

/// Configuration for the emulated cartridge
#[derive(Debug, Clone)]
pub struct DummyConfig {
    /// Which chip family to emulate
    pub variant: ChipVariant,
    /// Identity returned while in software-ID mode
    pub chip_id: u32,
    /// How many busy (toggling) status samples each operation produces
    /// before going stable
    pub busy_polls: u32,
}

impl DummyConfig {
    /// An SST 29LE010 pair with its real identity.
    pub fn sst29le010() -> Self {
        Self {
            variant: ChipVariant::Sst29le010,
            chip_id: ID_SST_29LE010,
            busy_polls: 4,
        }
    }

    /// An SST 28LF040 pair with its real identity.
    pub fn sst28lf040() -> Self {
        Self {
            variant: ChipVariant::Sst28lf040,
            chip_id: ID_SST_28LF040,
            busy_polls: 4,
        }
    }

    /// Override the identity, e.g. to emulate an unsupported part.
    pub fn with_chip_id(mut self, chip_id: u32) -> Self {
        self.chip_id = chip_id;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadMode {
    Array,
    SoftwareId,
}

/// Decode state for the 29LE010's 0x5555/0x2AAA unlock sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UnlockState {
    Idle,
    Prefix1,
    Prefix2,
    Extend,
    ExtendPrefix1,
    ExtendPrefix2,
}

/// Emulated cartridge
///
/// Implements [`BusMaster`] over an in-memory EEPROM array with the real
/// chips' command decoding, so the engine's exact transaction sequences are
/// what drive it.
pub struct DummyCart {
    config: DummyConfig,
    data: Vec<u8>,

    protected: bool,
    mode: ReadMode,
    unlock: UnlockState,
    /// 28LF040: a Byte_Program command word has been seen, the next write
    /// carries the data
    program_armed: bool,
    /// 28LF040: the first of the two Chip_Erase words has been seen
    erase_armed: bool,
    /// 28LF040: shift register of recent read addresses, for the
    /// read-sequence protect commands
    recent_reads: [u32; 7],

    /// Remaining busy status samples for the operation in flight
    pending: u32,
    toggle: bool,

    reads: u64,
    writes: u64,
    io_writes: Vec<(u16, u32)>,
}

impl DummyCart {
    /// Create an emulated cartridge, array fully erased.
    pub fn new(config: DummyConfig) -> Self {
        let data = vec![0xFF; config.variant.capacity()];
        Self {
            config,
            data,
            protected: true,
            mode: ReadMode::Array,
            unlock: UnlockState::Idle,
            program_armed: false,
            erase_armed: false,
            recent_reads: [0; 7],
            pending: 0,
            toggle: false,
            reads: 0,
            writes: 0,
            io_writes: Vec::new(),
        }
    }

    /// The emulated array contents.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable access to the emulated array contents.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// The configuration.
    pub fn config(&self) -> &DummyConfig {
        &self.config
    }

    /// Whether software data protection is currently enabled.
    pub fn protected(&self) -> bool {
        self.protected
    }

    /// Number of 32-bit bus read transactions so far.
    pub fn reads(&self) -> u64 {
        self.reads
    }

    /// Number of 32-bit bus write transactions so far.
    pub fn writes(&self) -> u64 {
        self.writes
    }

    /// Log of writes to the I/O-port window, as `(port, value)` pairs.
    pub fn io_writes(&self) -> &[(u16, u32)] {
        &self.io_writes
    }

    /// Force the busy status active for the next `polls` samples.
    pub fn begin_busy(&mut self, polls: u32) {
        self.pending = polls;
    }

    fn start_busy(&mut self) {
        self.pending = self.config.busy_polls;
    }

    fn array_word(&self, addr: EepromAddress) -> u16 {
        let i = (addr.value() as usize) * 2;
        if i + 1 >= self.data.len() {
            return 0xFFFF;
        }
        ((self.data[i] as u16) << 8) | (self.data[i + 1] as u16)
    }

    fn store_word(&mut self, addr: EepromAddress, value: u16, byte_alterable: bool) {
        let i = (addr.value() as usize) * 2;
        if i + 1 >= self.data.len() {
            return;
        }
        let bytes = [(value >> 8) as u8, value as u8];
        for (j, b) in bytes.iter().enumerate() {
            if byte_alterable {
                // flash programming only clears bits
                self.data[i + j] &= b;
            } else {
                self.data[i + j] = *b;
            }
        }
        self.start_busy();
    }

    fn erase_array(&mut self) {
        self.data.fill(0xFF);
        self.start_busy();
    }

    fn eeprom_read(&mut self, addr: EepromAddress) -> u16 {
        if self.pending > 0 {
            self.pending -= 1;
            self.toggle = !self.toggle;
            return if self.toggle { DQ6 } else { 0 };
        }

        if self.config.variant == ChipVariant::Sst28lf040 {
            self.track_lf040_read(addr.value());
        }

        match (self.mode, addr.value()) {
            (ReadMode::SoftwareId, 0) => (self.config.chip_id >> 16) as u16,
            (ReadMode::SoftwareId, 1) => self.config.chip_id as u16,
            _ => self.array_word(addr),
        }
    }

    fn track_lf040_read(&mut self, addr: u32) {
        self.recent_reads.rotate_left(1);
        self.recent_reads[6] = addr;
        if self.recent_reads == LF040_UNPROTECT_READS {
            self.protected = false;
        } else if self.recent_reads == LF040_PROTECT_READS {
            self.protected = true;
        }
    }

    fn eeprom_write(&mut self, addr: EepromAddress, value: u16) {
        match self.config.variant {
            ChipVariant::Sst28lf040 => self.lf040_write(addr, value),
            ChipVariant::Sst29le010 => self.le010_write(addr, value),
        }
    }

    fn lf040_write(&mut self, addr: EepromAddress, value: u16) {
        if self.program_armed {
            self.program_armed = false;
            if !self.protected {
                self.store_word(addr, value, true);
            }
            return;
        }

        let was_erase_armed = self.erase_armed;
        self.erase_armed = false;

        match (addr.value(), value) {
            (0, 0x3030) => {
                if was_erase_armed {
                    if !self.protected {
                        self.erase_array();
                    }
                } else {
                    self.erase_armed = true;
                }
            }
            (0, 0x1010) => self.program_armed = true,
            (0, 0x9090) => self.mode = ReadMode::SoftwareId,
            (0, 0xFFFF) => self.mode = ReadMode::Array,
            // anything else is not a command and, without a preceding
            // Byte_Program word, not data either
            _ => {}
        }
    }

    fn le010_write(&mut self, addr: EepromAddress, value: u16) {
        use UnlockState::*;

        match (self.unlock, addr.value(), value) {
            (Idle, 0x5555, 0xAAAA) => {
                self.unlock = Prefix1;
                return;
            }
            (Prefix1, 0x2AAA, 0x5555) => {
                self.unlock = Prefix2;
                return;
            }
            (Prefix2, 0x5555, cmd) => {
                self.unlock = Idle;
                match cmd {
                    0x8080 => self.unlock = Extend,
                    0xA0A0 => {
                        self.protected = true;
                        self.start_busy();
                    }
                    0xF0F0 => self.mode = ReadMode::Array,
                    _ => {}
                }
                return;
            }
            (Extend, 0x5555, 0xAAAA) => {
                self.unlock = ExtendPrefix1;
                return;
            }
            (ExtendPrefix1, 0x2AAA, 0x5555) => {
                self.unlock = ExtendPrefix2;
                return;
            }
            (ExtendPrefix2, 0x5555, cmd) => {
                self.unlock = Idle;
                match cmd {
                    0x1010 => self.erase_array(),
                    0x2020 => {
                        self.protected = false;
                        self.start_busy();
                    }
                    0x6060 => self.mode = ReadMode::SoftwareId,
                    _ => {}
                }
                return;
            }
            _ => self.unlock = Idle,
        }

        // plain data write: loads the page directly when unprotected
        if !self.protected && self.mode == ReadMode::Array {
            self.store_word(addr, value, false);
        }
    }
}

impl BusMaster for DummyCart {
    fn is_accessible(&self, addr: u32) -> bool {
        (addr >> 24) == CART_SELECT as u32
    }

    fn read32(&mut self, addr: u32) -> u32 {
        self.reads += 1;
        let offset = addr & OFFSET_MASK;

        if (offset & EEPROM_BASE) == EEPROM_BASE {
            let word = self.eeprom_read(EepromAddress::from_bus_offset(offset));
            ((word as u32) << 16) | (word as u32)
        } else if (offset >> 16) == IO_SELECT as u32 {
            0
        } else {
            0
        }
    }

    fn write32(&mut self, addr: u32, value: u32) {
        self.writes += 1;
        let offset = addr & OFFSET_MASK;

        if (offset & EEPROM_BASE) == EEPROM_BASE {
            let hi = (value >> 16) as u16;
            let lo = value as u16;
            // both ganged chips must see the same value
            debug_assert_eq!(hi, lo, "EEPROM write halves differ");
            self.eeprom_write(EepromAddress::from_bus_offset(offset), hi);
        } else if (offset >> 16) == IO_SELECT as u32 {
            self.io_writes.push(((offset & 0xFFFF) as u16, value));
        }
    }

    fn delay_us(&mut self, _us: u32) {
        // time does not pass in the emulator
    }
}

impl PresenceHandoff for DummyCart {
    fn await_device(&mut self) {
        // always present
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharkflash_core::bus::CartBus;
    use sharkflash_core::error::Error;
    use sharkflash_core::flash::{self, NoProgress, WriteOptions};
    use sharkflash_core::protocol;

    fn test_image(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i.wrapping_mul(31) >> 3) as u8).collect()
    }

    #[test]
    fn probe_identifies_29le010() {
        let mut bus = CartBus::new(DummyCart::new(DummyConfig::sst29le010()));
        assert_eq!(flash::probe(&mut bus).unwrap(), ChipVariant::Sst29le010);
    }

    #[test]
    fn probe_identifies_28lf040_via_fallback() {
        let mut bus = CartBus::new(DummyCart::new(DummyConfig::sst28lf040()));
        assert_eq!(flash::probe(&mut bus).unwrap(), ChipVariant::Sst28lf040);
    }

    #[test]
    fn probe_rejects_unknown_chip() {
        let config = DummyConfig::sst29le010().with_chip_id(0x1234_5678);
        let mut bus = CartBus::new(DummyCart::new(config));
        assert!(matches!(
            flash::probe(&mut bus),
            Err(Error::UnrecognizedChip { .. })
        ));
    }

    #[test]
    fn roundtrip_29le010() {
        let mut bus = CartBus::new(DummyCart::new(DummyConfig::sst29le010()));
        let image = test_image(0x3000);

        flash::write_firmware(
            &mut bus,
            ChipVariant::Sst29le010,
            &image,
            &WriteOptions::default(),
            &mut NoProgress,
        )
        .unwrap();

        assert!(bus.master().protected());
        assert_eq!(&bus.master().data()[..image.len()], &image[..]);
        // the rest of the array stays erased
        assert!(bus.master().data()[image.len()..].iter().all(|&b| b == 0xFF));

        let mut readback = vec![0u8; image.len()];
        flash::read_firmware(&mut bus, &mut readback).unwrap();
        assert_eq!(readback, image);

        flash::verify_firmware(&mut bus, &image).unwrap();
    }

    #[test]
    fn roundtrip_28lf040() {
        let mut bus = CartBus::new(DummyCart::new(DummyConfig::sst28lf040()));
        let image = test_image(0x2400);

        flash::write_firmware(
            &mut bus,
            ChipVariant::Sst28lf040,
            &image,
            &WriteOptions::default(),
            &mut NoProgress,
        )
        .unwrap();

        assert!(bus.master().protected());

        let mut readback = vec![0u8; image.len()];
        flash::read_firmware(&mut bus, &mut readback).unwrap();
        assert_eq!(readback, image);
    }

    #[test]
    fn unaligned_image_lengths_complete() {
        // lengths that are not multiples of the doubled page size, including
        // an odd one: the last page is short, the final word padded
        for &len in &[1usize, 0x101, 0x1FF, 0x2FE, 0x2FF] {
            let mut bus = CartBus::new(DummyCart::new(DummyConfig::sst29le010()));
            let image = test_image(len);

            flash::write_firmware(
                &mut bus,
                ChipVariant::Sst29le010,
                &image,
                &WriteOptions::default(),
                &mut NoProgress,
            )
            .unwrap();

            flash::verify_firmware(&mut bus, &image).unwrap();
            if len % 2 == 1 {
                // padded half of the final word stays erased
                assert_eq!(bus.master().data()[len], 0xFF);
            }
        }
    }

    #[test]
    fn oversize_image_rejected_before_any_write() {
        let mut bus = CartBus::new(DummyCart::new(DummyConfig::sst29le010()));
        let image = vec![0u8; ChipVariant::Sst29le010.capacity() + 1];

        let err = flash::write_firmware(
            &mut bus,
            ChipVariant::Sst29le010,
            &image,
            &WriteOptions::default(),
            &mut NoProgress,
        )
        .unwrap_err();

        assert_eq!(
            err,
            Error::FirmwareTooLarge {
                len: image.len(),
                capacity: ChipVariant::Sst29le010.capacity(),
            }
        );
        assert_eq!(bus.master().writes(), 0);
        assert_eq!(bus.master().reads(), 0);
    }

    #[test]
    fn poller_waits_for_toggle_to_stabilize() {
        let mut cart = DummyCart::new(DummyConfig::sst29le010());
        cart.begin_busy(5);
        let mut bus = CartBus::new(cart);

        let before = bus.master().reads();
        protocol::wait_ready(&mut bus).unwrap();
        let sampled = bus.master().reads() - before;

        // baseline + 5 busy samples, then at least one stable sample to
        // match its predecessor
        assert!(sampled >= 6, "poller exited after only {} reads", sampled);
    }

    #[test]
    fn bounded_poll_times_out() {
        let mut cart = DummyCart::new(DummyConfig::sst29le010());
        cart.begin_busy(100);
        let mut bus = CartBus::new(cart);

        assert_eq!(
            protocol::wait_ready_bounded(&mut bus, Some(10)),
            Err(Error::Timeout)
        );
    }

    #[test]
    fn writes_ignored_while_protected() {
        let mut bus = CartBus::new(DummyCart::new(DummyConfig::sst29le010()));
        bus.write_eeprom(EepromAddress::new(0x10), 0x1234).unwrap();
        assert!(bus.master().data().iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn display_side_channel_sequence() {
        let mut bus = CartBus::new(DummyCart::new(DummyConfig::sst29le010()));
        let image = test_image(0x2000);

        flash::write_firmware(
            &mut bus,
            ChipVariant::Sst29le010,
            &image,
            &WriteOptions::default(),
            &mut NoProgress,
        )
        .unwrap();

        let io = bus.master().io_writes();
        assert_eq!(io[0], (0x0600, 0x0600_0600));
        // 0x2000 bytes = two LED ring frames of 8 writes, plus the 8
        // restore writes at the end
        let ring: Vec<_> = io.iter().filter(|(port, _)| *port == 0x0800).collect();
        assert_eq!(ring.len(), 2 * 8 + 8);
        assert!(io[io.len() - 8..]
            .iter()
            .all(|&(port, value)| port == 0x0800 && value == 0x0200_0600));
    }

    #[test]
    fn erase_chip_resets_array() {
        let mut bus = CartBus::new(DummyCart::new(DummyConfig::sst28lf040()));
        let image = test_image(0x400);

        flash::write_firmware(
            &mut bus,
            ChipVariant::Sst28lf040,
            &image,
            &WriteOptions::default(),
            &mut NoProgress,
        )
        .unwrap();
        assert_eq!(&bus.master().data()[..image.len()], &image[..]);

        flash::erase_chip(
            &mut bus,
            ChipVariant::Sst28lf040,
            &WriteOptions::default(),
        )
        .unwrap();
        assert!(bus.master().data().iter().all(|&b| b == 0xFF));
        assert!(bus.master().protected());
    }
}
