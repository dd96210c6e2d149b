//! DMA-driven SPI master on an eUSCI module (A or B) in 3-pin mode.
//!
//! Each job is a single DMA burst. Reading clocks out [`SPI_IDLE_BYTE`] from
//! a fixed source address while the RX channel fills the buffer. Chip
//! select is optional and per job; it is driven low when the job starts and
//! high when it ends.

use core::convert::Infallible;
use core::fmt;

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::{self as hal_spi};

use crate::constants::{DMA_MAX_TRANSFER_LEN, JOB_QUEUE_DEPTH, SPI_IDLE_BYTE};
use crate::error::{Error, Result};
use crate::hal::dma::{DmaChannel, DmaConfig, PtrIncrement};
use crate::hal::register::Registers;
use crate::hal::usci::{mode, spi_ctlw0, spi_statw, UsciLayout, SSEL_SMCLK};
use crate::sched::{Callback, Job, JobKind, Phase, Step, TransactionScheduler, Transport};

/// Source byte of the TX channel while only reading.
static IDLE_BYTE: u8 = SPI_IDLE_BYTE;

/// Failures reported through job callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiError {
    /// A received byte was overwritten before the RX channel fetched it.
    Overrun,
    /// A DMA channel refused the transfer.
    Dma,
}

impl hal_spi::Error for SpiError {
    fn kind(&self) -> hal_spi::ErrorKind {
        match self {
            SpiError::Overrun => hal_spi::ErrorKind::Overrun,
            SpiError::Dma => hal_spi::ErrorKind::Other,
        }
    }
}

impl fmt::Display for SpiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpiError::Overrun => f.write_str("receive overrun"),
            SpiError::Dma => f.write_str("dma transfer refused"),
        }
    }
}

/// Clock polarity (bit 0) and phase (bit 1) of the eUSCI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiMode {
    Mode0 = 0,
    Mode1 = 1,
    Mode2 = 2,
    Mode3 = 3,
}

impl SpiMode {
    /// `UCCKPL`: clock idles high.
    pub const fn polarity(self) -> u16 {
        self as u16 & 0x01
    }

    /// `UCCKPH`: data captured on the first edge.
    pub const fn phase(self) -> u16 {
        (self as u16 & 0x02) >> 1
    }
}

/// Chip-select line of one job.
pub type ChipSelect<'a> = &'a mut (dyn OutputPin<Error = Infallible> + Send + 'a);

pub type SpiCallback<'a> = Callback<'a, SpiError>;

/// Divider giving the frequency closest to `freq_hz` (ties go to the lower
/// divider, i.e. the faster clock).
fn nearest_divider(smclk_hz: u32, freq_hz: u32) -> Result<u16> {
    if freq_hz == 0 || freq_hz > smclk_hz {
        return Err(Error::OutOfRange);
    }
    let mut div = smclk_hz / freq_hz;
    let above = smclk_hz / div - freq_hz;
    let below = freq_hz - smclk_hz / (div + 1);
    if below < above {
        div += 1;
    }
    u16::try_from(div).map_err(|_| Error::OutOfRange)
}

// ── Transport ──────────────────────────────────────────────────────────────

/// Two-channel DMA SPI transfer engine.
pub struct SpiTransport<R, TX, RX> {
    regs: R,
    layout: UsciLayout,
    tx_dma: TX,
    rx_dma: RX,
    mode: SpiMode,
    freq_hz: u32,
    tx_trigger: u8,
    rx_trigger: u8,
}

impl<R, TX, RX> SpiTransport<R, TX, RX>
where
    R: Registers,
    TX: DmaChannel,
    RX: DmaChannel,
{
    /// Configure the module and both DMA channels. Returns the actual SCK
    /// frequency.
    pub fn init(&mut self, smclk_hz: u32) -> Result<u32> {
        let div = nearest_divider(smclk_hz, self.freq_hz)?;
        let ctlw0 = self.layout.ctlw0;

        self.regs.set(ctlw0, spi_ctlw0::SWRST.set().bits);
        self.regs.apply(
            ctlw0,
            spi_ctlw0::STEM.clear()
                | spi_ctlw0::SSEL.value(SSEL_SMCLK)
                | spi_ctlw0::SYNC.set()
                | spi_ctlw0::MODE.value(mode::SPI_3PIN)
                | spi_ctlw0::MST.set()
                | spi_ctlw0::SEVENBIT.clear()
                | spi_ctlw0::MSB.set()
                | spi_ctlw0::CKPL.value(self.mode.polarity())
                | spi_ctlw0::CKPH.value(self.mode.phase()),
        );
        self.regs.set(self.layout.brw, div);
        self.regs.apply(ctlw0, spi_ctlw0::SWRST.clear());

        self.tx_dma.setup(&DmaConfig::mem_to_periph(self.tx_trigger))?;
        self.rx_dma.setup(&DmaConfig::periph_to_mem(self.rx_trigger))?;

        let actual = smclk_hz / div as u32;
        log_debug!("spi: divider {}, sck {} Hz", div, actual);
        Ok(actual)
    }

    fn transfer_len(job: &Job<'_, Self>) -> usize {
        match job.kind() {
            JobKind::Write => job.tx().len(),
            JobKind::Read => job.rx().len(),
            JobKind::WriteRead => job.tx().len().min(job.rx().len()),
        }
    }

    fn release_cs(job: &mut Job<'_, Self>) {
        if let Some(cs) = job.address_mut() {
            let _ = cs.set_high();
        }
    }

    fn arm(&mut self, job: &mut Job<'_, Self>) -> Result<()> {
        let len = Self::transfer_len(job);
        let txbuf = self.regs.addr_of(self.layout.txbuf);
        let rxbuf = self.regs.addr_of(self.layout.rxbuf);

        // SAFETY: the job's buffers are borrowed for the scheduler lifetime
        // and stay in place until the job is popped, which only happens
        // once both channels are idle or have been aborted.
        unsafe {
            match job.kind() {
                JobKind::Write => self.tx_dma.transfer_mem_to_periph(job.tx().as_ptr(), txbuf, len),
                JobKind::Read => {
                    self.rx_dma.transfer_periph_to_mem(rxbuf, job.rx_mut().as_mut_ptr(), len)?;
                    self.tx_dma.transfer_custom(
                        &IDLE_BYTE,
                        PtrIncrement::NoIncr,
                        txbuf.0 as *mut u8,
                        PtrIncrement::NoIncr,
                        len,
                    )
                }
                JobKind::WriteRead => {
                    self.rx_dma.transfer_periph_to_mem(rxbuf, job.rx_mut().as_mut_ptr(), len)?;
                    self.tx_dma.transfer_mem_to_periph(job.tx().as_ptr(), txbuf, len)
                }
            }
        }
    }

    fn abort(&mut self, job: &mut Job<'_, Self>) {
        self.tx_dma.abort();
        self.rx_dma.abort();
        Self::release_cs(job);
    }
}

impl<R, TX, RX> Transport for SpiTransport<R, TX, RX>
where
    R: Registers,
    TX: DmaChannel,
    RX: DmaChannel,
{
    type Address<'a> = Option<ChipSelect<'a>>;
    type Error = SpiError;

    fn validate(job: &Job<'_, Self>) -> Result<()> {
        let missing = match job.kind() {
            JobKind::Write => job.tx().is_empty(),
            JobKind::Read => job.rx().is_empty(),
            JobKind::WriteRead => job.tx().is_empty() || job.rx().is_empty(),
        };
        if missing {
            return Err(Error::NullPtr);
        }
        if Self::transfer_len(job) > DMA_MAX_TRANSFER_LEN {
            return Err(Error::OutOfRange);
        }
        Ok(())
    }

    fn start(&mut self, job: &mut Job<'_, Self>) -> core::result::Result<(), SpiError> {
        // Reading RXBUF clears a stale overrun flag.
        let _ = self.regs.get(self.layout.rxbuf);

        if let Some(cs) = job.address_mut() {
            let _ = cs.set_low();
        }

        job.set_phase(match job.kind() {
            JobKind::Write => Phase::Writing,
            JobKind::Read | JobKind::WriteRead => Phase::Reading,
        });

        if let Err(err) = self.arm(job) {
            log_debug!("spi: dma refused transfer: {}", err);
            self.abort(job);
            return Err(SpiError::Dma);
        }
        Ok(())
    }

    fn advance(&mut self, job: &mut Job<'_, Self>) -> Step<SpiError> {
        let status = self.regs.get(self.layout.statw);
        if spi_statw::OE.is_set(status) {
            let _ = self.regs.get(self.layout.rxbuf);
            self.abort(job);
            return Step::Error(SpiError::Overrun);
        }

        // Reads complete on the RX channel; their TX-done interrupt is noise.
        let running = match job.kind() {
            JobKind::Write => self.tx_dma.is_busy(),
            JobKind::Read | JobKind::WriteRead => self.rx_dma.is_busy(),
        };
        if running {
            return Step::Pending;
        }

        job.set_cursor(Self::transfer_len(job));
        job.set_phase(Phase::Completing);
        Step::Done
    }

    fn finish(&mut self, job: &mut Job<'_, Self>) {
        Self::release_cs(job);
    }

    fn received_len(job: &Job<'_, Self>) -> usize {
        match job.kind() {
            JobKind::Write => 0,
            JobKind::Read | JobKind::WriteRead => Self::transfer_len(job),
        }
    }
}

// ── Driver ─────────────────────────────────────────────────────────────────

/// SPI master with a queue of up to `N` jobs.
///
/// Route the TX and RX DMA channel interrupts, and the eUSCI interrupt if
/// overrun reporting is wanted, to [`on_interrupt`](Self::on_interrupt).
pub struct SpiMaster<'a, R, TX, RX, const N: usize = JOB_QUEUE_DEPTH>
where
    R: Registers,
    TX: DmaChannel,
    RX: DmaChannel,
{
    sched: TransactionScheduler<'a, SpiTransport<R, TX, RX>, N>,
    actual_freq_hz: u32,
}

impl<'a, R, TX, RX, const N: usize> SpiMaster<'a, R, TX, RX, N>
where
    R: Registers,
    TX: DmaChannel,
    RX: DmaChannel,
{
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        regs: R,
        layout: UsciLayout,
        tx_dma: TX,
        rx_dma: RX,
        mode: SpiMode,
        freq_hz: u32,
        tx_trigger: u8,
        rx_trigger: u8,
    ) -> Self {
        SpiMaster {
            sched: TransactionScheduler::new(SpiTransport {
                regs,
                layout,
                tx_dma,
                rx_dma,
                mode,
                freq_hz,
                tx_trigger,
                rx_trigger,
            }),
            actual_freq_hz: 0,
        }
    }

    /// Configure for SMCLK = `smclk_hz` and open the job queue.
    pub fn init(&mut self, smclk_hz: u32) -> Result<()> {
        if self.sched.is_initialized() {
            return Err(Error::AlreadyInitialized);
        }
        self.actual_freq_hz = self.sched.transport_mut().init(smclk_hz)?;
        self.sched.set_initialized()
    }

    /// SCK frequency after rounding to the nearest divider; 0 before `init`.
    pub fn actual_freq_hz(&self) -> u32 {
        self.actual_freq_hz
    }

    pub fn write(
        &self,
        cs: Option<ChipSelect<'a>>,
        data: &'a [u8],
        callback: SpiCallback<'a>,
    ) -> Result<()> {
        self.sched.enqueue(Job::write(cs, data, callback))
    }

    pub fn read(
        &self,
        cs: Option<ChipSelect<'a>>,
        buffer: &'a mut [u8],
        callback: SpiCallback<'a>,
    ) -> Result<()> {
        self.sched.enqueue(Job::read(cs, buffer, callback))
    }

    /// Full-duplex transfer of `min(tx.len(), rx.len())` bytes.
    pub fn write_read(
        &self,
        cs: Option<ChipSelect<'a>>,
        tx: &'a [u8],
        rx: &'a mut [u8],
        callback: SpiCallback<'a>,
    ) -> Result<()> {
        self.sched.enqueue(Job::write_read(cs, tx, rx, callback))
    }

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
