//! Interrupt-driven I2C master on an eUSCI_B module.
//!
//! Bytes are moved one per interrupt (TXIFG / RXIFG); STOP is requested by
//! software so a write-then-read can switch direction with a repeated START.
//!
//! # Example
//!
//! ```ignore
//! let mut master: I2cMaster<'static, Mmio> =
//!     I2cMaster::new(unsafe { Mmio::new(USCIB1_BASE) }, I2cSpeed::KHz400);
//! master.init(SMCLK_HZ)?;
//! let i2c: &'static I2cMaster<'static, Mmio> = BUS.init(master);
//!
//! i2c.write_read(I2cAddress::Seven(0x76), &REG, buf, &on_sample)?;
//!
//! // EUSCIB1 interrupt handler:
//! BUS.get().on_interrupt();
//! ```

use core::fmt;

use embedded_hal::i2c::{self as hal_i2c, NoAcknowledgeSource};

use crate::constants::{I2C_MAX_TRANSFER_LEN, JOB_QUEUE_DEPTH};
use crate::error::{Error, Result};
use crate::hal::register::Registers;
use crate::hal::usci::usci_b::{
    i2c_ctlw0, i2c_ctlw1, i2c_ifg, BRW, CTLW0, CTLW1, I2CSA, IE, IFG, RXBUF, TXBUF,
};
use crate::hal::usci::{mode, SSEL_SMCLK};
use crate::sched::{Callback, Job, JobKind, Phase, Step, TransactionScheduler, Transport};

// ── Public types ───────────────────────────────────────────────────────────

/// Bus failures reported through job callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cError {
    /// The target did not acknowledge its address or a data byte.
    Nack,
    /// Another master won the bus.
    ArbitrationLost,
    /// SCL was held low for too long.
    ClockLowTimeout,
}

impl hal_i2c::Error for I2cError {
    fn kind(&self) -> hal_i2c::ErrorKind {
        match self {
            I2cError::Nack => hal_i2c::ErrorKind::NoAcknowledge(NoAcknowledgeSource::Unknown),
            I2cError::ArbitrationLost => hal_i2c::ErrorKind::ArbitrationLoss,
            I2cError::ClockLowTimeout => hal_i2c::ErrorKind::Bus,
        }
    }
}

impl fmt::Display for I2cError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            I2cError::Nack => "no acknowledge",
            I2cError::ArbitrationLost => "arbitration lost",
            I2cError::ClockLowTimeout => "clock low timeout",
        };
        f.write_str(msg)
    }
}

/// SCL frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cSpeed {
    KHz100,
    KHz400,
}

impl I2cSpeed {
    pub const fn hz(self) -> u32 {
        match self {
            I2cSpeed::KHz100 => 100_000,
            I2cSpeed::KHz400 => 400_000,
        }
    }
}

/// Target address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cAddress {
    /// 7-bit address, `0x00..=0x7F`.
    Seven(u8),
    /// 10-bit address, `0x000..=0x3FF`.
    Ten(u16),
}

impl I2cAddress {
    fn is_valid(self) -> bool {
        match self {
            I2cAddress::Seven(addr) => addr <= 0x7F,
            I2cAddress::Ten(addr) => addr <= 0x3FF,
        }
    }

    fn raw(self) -> (u16, bool) {
        match self {
            I2cAddress::Seven(addr) => (addr as u16, false),
            I2cAddress::Ten(addr) => (addr, true),
        }
    }
}

pub type I2cCallback<'a> = Callback<'a, I2cError>;

// ── Transport ──────────────────────────────────────────────────────────────

/// Interrupts that abort a job; enabled whenever a job is active.
const ERROR_IE: u16 = i2c_ifg::NACK.mask() | i2c_ifg::AL.mask() | i2c_ifg::CLTO.mask();

/// Byte-wise eUSCI_B I2C state machine.
pub struct I2cTransport<R> {
    regs: R,
    speed: I2cSpeed,
}

impl<R: Registers> I2cTransport<R> {
    pub const fn new(regs: R, speed: I2cSpeed) -> Self {
        I2cTransport { regs, speed }
    }

    /// Single-master I2C on SMCLK at the configured speed.
    ///
    /// Returns [`Error::OutOfRange`] if the prescaler does not fit 16 bits.
    pub fn init(&mut self, smclk_hz: u32) -> Result<()> {
        let prescaler = smclk_hz / self.speed.hz();
        if !(1..=0xFFFF).contains(&prescaler) {
            return Err(Error::OutOfRange);
        }

        // Hold in reset; clears every other CTLW0 setting.
        self.regs.set(CTLW0, i2c_ctlw0::SWRST.set().bits);
        self.regs.set(BRW, prescaler as u16);
        self.regs.apply(
            CTLW1,
            i2c_ctlw1::ASTP.value(0) | i2c_ctlw1::CLTO.value(0),
        );
        self.regs.apply(
            CTLW0,
            i2c_ctlw0::MM.clear()
                | i2c_ctlw0::MST.set()
                | i2c_ctlw0::MODE.value(mode::I2C)
                | i2c_ctlw0::SYNC.set()
                | i2c_ctlw0::SSEL.value(SSEL_SMCLK)
                | i2c_ctlw0::SWRST.clear(),
        );

        log_debug!("i2c: prescaler {}", prescaler);
        Ok(())
    }

    fn enable_irqs(&mut self, extra: u16) {
        self.regs.set(IE, ERROR_IE | extra);
    }

    /// Switch to receiving and issue a (repeated) START.
    fn start_receive(&mut self, job: &mut Job<'_, Self>) {
        job.set_cursor(0);
        job.set_phase(Phase::Reading);
        self.enable_irqs(i2c_ifg::RX0.mask());
        self.regs.apply(CTLW0, i2c_ctlw0::TR.clear() | i2c_ctlw0::TXSTT.set());
        if job.rx().len() == 1 {
            // The only byte is also the last one: STOP right behind START.
            self.regs.apply(CTLW0, i2c_ctlw0::TXSTP.set());
        }
    }

    fn request_stop(&mut self, job: &mut Job<'_, Self>) {
        job.set_phase(Phase::Completing);
        self.regs.apply(CTLW0, i2c_ctlw0::TXSTP.set());
        self.enable_irqs(i2c_ifg::STP.mask());
    }

    fn on_rx(&mut self, job: &mut Job<'_, Self>) {
        let byte = self.regs.get(RXBUF) as u8;
        let at = job.cursor();
        if let Some(slot) = job.rx_mut().get_mut(at) {
            *slot = byte;
            job.advance_cursor();
        }

        let remaining = job.rx().len() - job.cursor();
        if remaining == 1 {
            // STOP goes out after the byte currently being received.
            self.regs.apply(CTLW0, i2c_ctlw0::TXSTP.set());
        } else if remaining == 0 {
            job.set_phase(Phase::Completing);
            self.enable_irqs(i2c_ifg::STP.mask());
        }
    }

    fn on_tx(&mut self, job: &mut Job<'_, Self>) {
        let at = job.cursor();
        if let Some(&byte) = job.tx().get(at) {
            job.set_phase(Phase::Writing);
            self.regs.set(TXBUF, byte as u16);
            job.advance_cursor();
        } else if job.kind() == JobKind::WriteRead {
            self.start_receive(job);
        } else {
            self.request_stop(job);
        }
    }
}

impl<R: Registers> Transport for I2cTransport<R> {
    type Address<'a> = I2cAddress;
    type Error = I2cError;

    fn validate(job: &Job<'_, Self>) -> Result<()> {
        if !job.address().is_valid() {
            return Err(Error::OutOfRange);
        }
        if job.tx().len() + job.rx().len() > I2C_MAX_TRANSFER_LEN {
            return Err(Error::Overflow);
        }
        let missing = match job.kind() {
            JobKind::Write => job.tx().is_empty(),
            JobKind::Read => job.rx().is_empty(),
            JobKind::WriteRead => job.tx().is_empty() || job.rx().is_empty(),
        };
        if missing {
            return Err(Error::NullPtr);
        }
        Ok(())
    }

    fn start(&mut self, job: &mut Job<'_, Self>) -> core::result::Result<(), I2cError> {
        let (addr, ten_bit) = job.address().raw();

        self.regs.set(IFG, 0);
        self.regs.set(I2CSA, addr);
        self.regs.apply(CTLW0, i2c_ctlw0::SLA10.value(ten_bit as u16));

        if job.kind() == JobKind::Read {
            self.start_receive(job);
        } else {
            job.set_phase(Phase::Addressing);
            self.enable_irqs(i2c_ifg::TX0.mask());
            self.regs.apply(CTLW0, i2c_ctlw0::TR.set() | i2c_ctlw0::TXSTT.set());
        }
        Ok(())
    }

    fn advance(&mut self, job: &mut Job<'_, Self>) -> Step<I2cError> {
        let flags = self.regs.get(IFG);
        self.regs.set(IFG, 0);

        if i2c_ifg::NACK.is_set(flags) {
            // Release the bus before the job is restarted or dropped.
            self.regs.apply(CTLW0, i2c_ctlw0::TXSTP.set());
            Step::Error(I2cError::Nack)
        } else if i2c_ifg::AL.is_set(flags) {
            Step::Error(I2cError::ArbitrationLost)
        } else if i2c_ifg::CLTO.is_set(flags) {
            Step::Error(I2cError::ClockLowTimeout)
        } else {
            let data = flags & (i2c_ifg::RX0.mask() | i2c_ifg::TX0.mask());
            if i2c_ifg::RX0.is_set(flags) {
                self.on_rx(job);
            } else if i2c_ifg::TX0.is_set(flags) && job.phase() != Phase::Completing {
                self.on_tx(job);
            }

            // STOP can be flagged together with the last data byte; it is
            // not raised again once cleared.
            if i2c_ifg::STP.is_set(flags) && (job.phase() == Phase::Completing || data == 0) {
                Step::Done
            } else {
                Step::Pending
            }
        }
    }

    fn idle(&mut self) {
        self.regs.set(IE, 0);
    }
}

// ── Driver ─────────────────────────────────────────────────────────────────

/// I2C master with a queue of up to `N` jobs.
pub struct I2cMaster<'a, R: Registers, const N: usize = JOB_QUEUE_DEPTH> {
    sched: TransactionScheduler<'a, I2cTransport<R>, N>,
}

impl<'a, R: Registers, const N: usize> I2cMaster<'a, R, N> {
    pub const fn new(regs: R, speed: I2cSpeed) -> Self {
        I2cMaster {
            sched: TransactionScheduler::new(I2cTransport::new(regs, speed)),
        }
    }

    /// Configure the module for SMCLK = `smclk_hz` and open the job queue.
    pub fn init(&mut self, smclk_hz: u32) -> Result<()> {
        if self.sched.is_initialized() {
            return Err(Error::AlreadyInitialized);
        }
        self.sched.transport_mut().init(smclk_hz)?;
        self.sched.set_initialized()
    }

    pub fn write(
        &self,
        address: I2cAddress,
        data: &'a [u8],
        callback: I2cCallback<'a>,
    ) -> Result<()> {
        self.sched.enqueue(Job::write(address, data, callback))
    }

    pub fn read(
        &self,
        address: I2cAddress,
        buffer: &'a mut [u8],
        callback: I2cCallback<'a>,
    ) -> Result<()> {
        self.sched.enqueue(Job::read(address, buffer, callback))
    }

    /// Write `tx`, then read into `rx` after a repeated START.
    pub fn write_read(
        &self,
        address: I2cAddress,
        tx: &'a [u8],
        rx: &'a mut [u8],
        callback: I2cCallback<'a>,
    ) -> Result<()> {
        self.sched.enqueue(Job::write_read(address, tx, rx, callback))
    }

    /// eUSCI_B interrupt handler.
    pub fn on_interrupt(&self) {
        self.sched.on_interrupt();
    }

    pub fn is_busy(&self) -> bool {
        self.sched.is_busy()
    }

    pub fn pending(&self) -> usize {
        self.sched.pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::mock::RegisterFile;
    use crate::sched::Completion;
    use std::sync::Mutex;
    use std::vec::Vec;

    type Report = (JobKind, core::result::Result<(), I2cError>, Vec<u8>);

    fn recorder(reports: &Mutex<Vec<Report>>) -> impl Fn(Completion<'_, I2cError>) + Sync + '_ {
        move |c| reports.lock().unwrap().push((c.kind, c.result, c.rx.to_vec()))
    }

    fn ready<'a>(file: &'a RegisterFile) -> I2cMaster<'a, &'a RegisterFile, 4> {
        let mut master = I2cMaster::new(file, I2cSpeed::KHz100);
        master.init(12_000_000).unwrap();
        file.clear_log();
        master
    }

    /// Raise `flags` and run the handler, as the hardware would.
    fn fire(file: &RegisterFile, master: &I2cMaster<'_, &RegisterFile, 4>, flags: u16) {
        file.raise(IFG, flags);
        master.on_interrupt();
    }

    fn ctl_bits_set(file: &RegisterFile, bits: u16) -> bool {
        file.read(CTLW0) & bits == bits
    }

    // ── Init ──────────────────────────────────────────────────────────

    #[test]
    fn init_programs_prescaler_and_master_mode() {
        let file = RegisterFile::new();
        let mut master: I2cMaster<'_, &RegisterFile, 4> = I2cMaster::new(&file, I2cSpeed::KHz100);

        master.init(12_000_000).unwrap();

        assert_eq!(file.read(BRW), 120);
        let ctl = file.read(CTLW0);
        assert!(!i2c_ctlw0::SWRST.is_set(ctl));
        assert!(i2c_ctlw0::MST.is_set(ctl));
        assert_eq!(i2c_ctlw0::MODE.read(ctl), mode::I2C);
        assert_eq!(i2c_ctlw0::SSEL.read(ctl), SSEL_SMCLK);
        // Reset asserted before anything else is written.
        assert_eq!(file.writes_to(CTLW0)[0], 0x0001);

        assert_eq!(master.init(12_000_000), Err(Error::AlreadyInitialized));
    }

    #[test]
    fn init_rejects_unreachable_prescaler() {
        let file = RegisterFile::new();
        let mut fast: I2cMaster<'_, &RegisterFile, 4> = I2cMaster::new(&file, I2cSpeed::KHz400);
        assert_eq!(fast.init(300_000), Err(Error::OutOfRange));
        assert!(!fast.sched.is_initialized());
    }

    // ── Validation ────────────────────────────────────────────────────

    #[test]
    fn malformed_requests_are_rejected() {
        let file = RegisterFile::new();
        let data = [0u8; 4];
        let mut empty: [u8; 0] = [];
        let reports = Mutex::new(Vec::new());
        let cb = recorder(&reports);
        let master = ready(&file);

        assert_eq!(master.write(I2cAddress::Seven(0x80), &data, &cb), Err(Error::OutOfRange));
        assert_eq!(master.write(I2cAddress::Ten(0x400), &data, &cb), Err(Error::OutOfRange));
        assert_eq!(master.write(I2cAddress::Seven(0x10), &[], &cb), Err(Error::NullPtr));
        assert_eq!(master.read(I2cAddress::Seven(0x10), &mut empty, &cb), Err(Error::NullPtr));

        assert!(!master.is_busy());
        assert_eq!(file.write_count(), 0);
        assert!(reports.lock().unwrap().is_empty());
    }

    #[test]
    fn oversized_transfer_overflows() {
        let file = RegisterFile::new();
        let big = std::vec![0u8; I2C_MAX_TRANSFER_LEN];
        let mut one = [0u8; 1];
        let reports = Mutex::new(Vec::new());
        let cb = recorder(&reports);
        let master = ready(&file);

        assert_eq!(
            master.write_read(I2cAddress::Seven(0x10), &big, &mut one, &cb),
            Err(Error::Overflow)
        );
    }

    #[test]
    fn ten_bit_address_accepted_up_to_0x3ff() {
        let file = RegisterFile::new();
        let data = [0u8; 1];
        let reports = Mutex::new(Vec::new());
        let cb = recorder(&reports);
        let master = ready(&file);

        master.write(I2cAddress::Ten(0x3FF), &data, &cb).unwrap();

        assert_eq!(file.read(I2CSA), 0x3FF);
        assert!(ctl_bits_set(&file, i2c_ctlw0::SLA10.mask()));
    }

    // ── Byte flow ─────────────────────────────────────────────────────

    #[test]
    fn write_sends_bytes_then_stop() {
        let file = RegisterFile::new();
        let data = [0xAA, 0xBB];
        let reports = Mutex::new(Vec::new());
        let cb = recorder(&reports);
        let master = ready(&file);

        master.write(I2cAddress::Seven(0x48), &data, &cb).unwrap();
        assert_eq!(file.read(I2CSA), 0x48);
        assert!(ctl_bits_set(&file, i2c_ctlw0::TR.mask() | i2c_ctlw0::TXSTT.mask()));
        assert_eq!(file.read(IE), ERROR_IE | i2c_ifg::TX0.mask());

        fire(&file, &master, i2c_ifg::TX0.mask());
        fire(&file, &master, i2c_ifg::TX0.mask());
        assert_eq!(file.writes_to(TXBUF), [0xAA, 0xBB]);
        assert!(!ctl_bits_set(&file, i2c_ctlw0::TXSTP.mask()));

        fire(&file, &master, i2c_ifg::TX0.mask());
        assert!(ctl_bits_set(&file, i2c_ctlw0::TXSTP.mask()));
        assert_eq!(file.read(IE), ERROR_IE | i2c_ifg::STP.mask());
        assert!(reports.lock().unwrap().is_empty());

        fire(&file, &master, i2c_ifg::STP.mask());
        assert_eq!(*reports.lock().unwrap(), [(JobKind::Write, Ok(()), Vec::new())]);
        assert!(!master.is_busy());
        assert_eq!(file.read(IE), 0);
    }

    #[test]
    fn write_read_uses_repeated_start() {
        let file = RegisterFile::new();
        let reg = [0xF7];
        let mut rx = [0u8; 3];
        let reports = Mutex::new(Vec::new());
        let cb = recorder(&reports);
        let master = ready(&file);

        master.write_read(I2cAddress::Seven(0x76), &reg, &mut rx, &cb).unwrap();
        fire(&file, &master, i2c_ifg::TX0.mask());
        assert_eq!(file.writes_to(TXBUF), [0xF7]);

        // Write part done: switch to receive with a repeated START.
        file.clear_log();
        fire(&file, &master, i2c_ifg::TX0.mask());
        assert!(!ctl_bits_set(&file, i2c_ctlw0::TR.mask()));
        assert!(ctl_bits_set(&file, i2c_ctlw0::TXSTT.mask()));
        assert_eq!(file.read(IE), ERROR_IE | i2c_ifg::RX0.mask());

        for (i, byte) in [0x11u16, 0x22, 0x33].into_iter().enumerate() {
            file.poke(RXBUF, byte);
            fire(&file, &master, i2c_ifg::RX0.mask());
            // STOP is requested while the second-to-last byte is handled.
            assert_eq!(ctl_bits_set(&file, i2c_ctlw0::TXSTP.mask()), i >= 1);
        }
        assert_eq!(file.read(IE), ERROR_IE | i2c_ifg::STP.mask());

        fire(&file, &master, i2c_ifg::STP.mask());
        assert_eq!(
            *reports.lock().unwrap(),
            [(JobKind::WriteRead, Ok(()), std::vec![0x11, 0x22, 0x33])]
        );
    }

    #[test]
    fn single_byte_read_requests_stop_with_start() {
        let file = RegisterFile::new();
        let mut rx = [0u8; 1];
        let reports = Mutex::new(Vec::new());
        let cb = recorder(&reports);
        let master = ready(&file);

        master.read(I2cAddress::Seven(0x20), &mut rx, &cb).unwrap();
        assert!(ctl_bits_set(&file, i2c_ctlw0::TXSTT.mask() | i2c_ctlw0::TXSTP.mask()));
        assert!(!ctl_bits_set(&file, i2c_ctlw0::TR.mask()));

        file.poke(RXBUF, 0x5A);
        fire(&file, &master, i2c_ifg::RX0.mask());
        fire(&file, &master, i2c_ifg::STP.mask());

        assert_eq!(*reports.lock().unwrap(), [(JobKind::Read, Ok(()), std::vec![0x5A])]);
    }

    #[test]
    fn last_byte_and_stop_in_one_interrupt_complete_the_read() {
        let file = RegisterFile::new();
        let mut rx = [0u8; 1];
        let reports = Mutex::new(Vec::new());
        let cb = recorder(&reports);
        let master = ready(&file);

        master.read(I2cAddress::Seven(0x20), &mut rx, &cb).unwrap();
        file.poke(RXBUF, 0x5A);
        fire(&file, &master, i2c_ifg::RX0.mask() | i2c_ifg::STP.mask());

        assert_eq!(*reports.lock().unwrap(), [(JobKind::Read, Ok(()), std::vec![0x5A])]);
        assert!(!master.is_busy());
    }

    #[test]
    fn stop_with_stale_tx_flag_completes_the_write() {
        let file = RegisterFile::new();
        let data = [0xAA];
        let reports = Mutex::new(Vec::new());
        let cb = recorder(&reports);
        let master = ready(&file);

        master.write(I2cAddress::Seven(0x48), &data, &cb).unwrap();
        fire(&file, &master, i2c_ifg::TX0.mask());
        fire(&file, &master, i2c_ifg::TX0.mask());
        let stops = file.writes_to(CTLW0).len();

        fire(&file, &master, i2c_ifg::TX0.mask() | i2c_ifg::STP.mask());

        assert_eq!(*reports.lock().unwrap(), [(JobKind::Write, Ok(()), Vec::new())]);
        // No second STOP request for the stale TXIFG.
        assert_eq!(file.writes_to(CTLW0).len(), stops);
        assert_eq!(file.writes_to(TXBUF), [0xAA]);
    }

    // ── Errors ────────────────────────────────────────────────────────

    #[test]
    fn nack_restarts_from_the_first_byte() {
        let file = RegisterFile::new();
        let data = [1, 2, 3];
        let reports = Mutex::new(Vec::new());
        let cb = recorder(&reports);
        let master = ready(&file);

        master.write(I2cAddress::Seven(0x50), &data, &cb).unwrap();
        fire(&file, &master, i2c_ifg::TX0.mask());
        fire(&file, &master, i2c_ifg::TX0.mask());

        fire(&file, &master, i2c_ifg::NACK.mask());
        assert_eq!(master.sched.head_state(), Some((Phase::Addressing, 0, 1)));

        file.clear_log();
        for _ in 0..4 {
            fire(&file, &master, i2c_ifg::TX0.mask());
        }
        fire(&file, &master, i2c_ifg::STP.mask());

        assert_eq!(file.writes_to(TXBUF), [1, 2, 3]);
        assert_eq!(*reports.lock().unwrap(), [(JobKind::Write, Ok(()), Vec::new())]);
    }

    #[test]
    fn persistent_nack_fails_job_and_starts_next() {
        let file = RegisterFile::new();
        let first = [0x01];
        let second = [0x02];
        let reports = Mutex::new(Vec::new());
        let cb = recorder(&reports);
        let master = ready(&file);

        master.write(I2cAddress::Seven(0x50), &first, &cb).unwrap();
        master.write(I2cAddress::Seven(0x51), &second, &cb).unwrap();

        for _ in 0..4 {
            fire(&file, &master, i2c_ifg::NACK.mask());
        }

        assert_eq!(
            *reports.lock().unwrap(),
            [(JobKind::Write, Err(I2cError::Nack), Vec::new())]
        );
        assert_eq!(file.read(I2CSA), 0x51);
        assert_eq!(master.pending(), 1);
        assert!(master.is_busy());
    }

    #[test]
    fn arbitration_and_timeout_are_distinguished() {
        let file = RegisterFile::new();
        let data = [0u8];
        let reports = Mutex::new(Vec::new());
        let cb = recorder(&reports);
        let master = ready(&file);

        master.write(I2cAddress::Seven(0x10), &data, &cb).unwrap();
        for _ in 0..3 {
            fire(&file, &master, i2c_ifg::AL.mask());
        }
        fire(&file, &master, i2c_ifg::CLTO.mask());

        assert_eq!(
            *reports.lock().unwrap(),
            [(JobKind::Write, Err(I2cError::ClockLowTimeout), Vec::new())]
        );
    }

    #[test]
    fn error_kinds_map_to_embedded_hal() {
        use embedded_hal::i2c::Error as _;
        assert_eq!(
            I2cError::Nack.kind(),
            hal_i2c::ErrorKind::NoAcknowledge(NoAcknowledgeSource::Unknown)
        );
        assert_eq!(I2cError::ArbitrationLost.kind(), hal_i2c::ErrorKind::ArbitrationLoss);
    }
}
