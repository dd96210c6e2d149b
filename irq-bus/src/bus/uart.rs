//! DMA-driven UART on an eUSCI_A module: baud generator and job driver.
//!
//! 8N1 framing, LSB first. Transmit jobs stream the buffer to TXBUF; receive
//! jobs fill the buffer from RXBUF. Receive errors flagged in STATW are
//! reported as bus errors and retried by the scheduler.

use core::fmt;

use crate::constants::{DMA_MAX_TRANSFER_LEN, JOB_QUEUE_DEPTH};
use crate::error::{Error, Result};
use crate::hal::dma::{DmaChannel, DmaConfig};
use crate::hal::register::Registers;
use crate::hal::usci::usci_a::{self, mctlw, uart_ctlw0, uart_statw};
use crate::hal::usci::{mode, SSEL_SMCLK};
use crate::sched::{Callback, Job, JobKind, Phase, Step, TransactionScheduler, Transport};

/// Failures reported through job callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartError {
    Overrun,
    Framing,
    Parity,
    /// A DMA channel refused the transfer.
    Dma,
}

impl fmt::Display for UartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UartError::Overrun => f.write_str("receive overrun"),
            UartError::Framing => f.write_str("framing error"),
            UartError::Parity => f.write_str("parity error"),
            UartError::Dma => f.write_str("dma transfer refused"),
        }
    }
}

pub type UartCallback<'a> = Callback<'a, UartError>;

// ── Baud-rate generator ────────────────────────────────────────────────────

/// Register values of the baud-rate generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BaudConfig {
    /// `UCBRx` prescaler.
    pub brw: u16,
    /// `UCBRFx` first modulation stage (oversampling only).
    pub brf: u8,
    /// `UCBRSx` second modulation stage.
    pub brs: u8,
    /// `UCOS16` oversampling.
    pub os16: bool,
}

impl BaudConfig {
    /// `UCAxMCTLW` value.
    pub const fn mctlw(self) -> u16 {
        mctlw::BRS.value(self.brs as u16).bits
            | mctlw::BRF.value(self.brf as u16).bits
            | mctlw::OS16.value(self.os16 as u16).bits
    }
}

/// `UCBRSx` correction by fractional part of N, in 1/65536. The entry with
/// the largest threshold not above the fraction applies.
const BRS_TABLE: [(u16, u8); 36] = [
    (0, 0x00),
    (3466, 0x01),
    (4685, 0x02),
    (5472, 0x04),
    (6560, 0x08),
    (8205, 0x10),
    (9371, 0x20),
    (10944, 0x11),
    (14070, 0x21),
    (14575, 0x22),
    (16403, 0x44),
    (19660, 0x25),
    (21856, 0x49),
    (23429, 0x4A),
    (24595, 0x52),
    (26234, 0x92),
    (28088, 0x53),
    (28691, 0x55),
    (32781, 0xAA),
    (37453, 0x6B),
    (39341, 0xAD),
    (40986, 0xB5),
    (42152, 0xB6),
    (43692, 0xD6),
    (45881, 0xB7),
    (46838, 0xBB),
    (49171, 0xDD),
    (51517, 0xED),
    (52455, 0xEE),
    (54611, 0xBF),
    (55469, 0xDF),
    (56177, 0xEF),
    (57350, 0xF7),
    (59008, 0xFB),
    (60096, 0xFD),
    (60869, 0xFE),
];

fn brs_for(fraction: u32) -> u8 {
    BRS_TABLE
        .iter()
        .take_while(|&&(threshold, _)| u32::from(threshold) <= fraction)
        .last()
        .map_or(0, |&(_, brs)| brs)
}

/// Compute the baud-rate generator settings for `baud` from an SMCLK of
/// `smclk_hz`.
///
/// N = smclk / baud. Above 16 the module oversamples: `UCBRx = N / 16` and
/// `UCBRFx` is the fractional part of N / 16 in sixteenths. `UCBRSx` always
/// comes from the fractional part of N.
pub fn baud_config(smclk_hz: u32, baud: u32) -> Result<BaudConfig> {
    if baud == 0 || baud > smclk_hz {
        return Err(Error::OutOfRange);
    }

    let n = smclk_hz / baud;
    // N in 16.16 fixed point.
    let n_fixed = (u64::from(smclk_hz) << 16) / u64::from(baud);
    let fraction = (n_fixed - (u64::from(n) << 16)) as u32;

    let (brw, brf, os16) = if n > 16 {
        let brw = n >> 4;
        let brf = (((n_fixed >> 4) - (u64::from(brw) << 16)) >> 12) as u8;
        (brw, brf, true)
    } else {
        (n, 0, false)
    };

    Ok(BaudConfig {
        brw: u16::try_from(brw).map_err(|_| Error::OutOfRange)?,
        brf,
        brs: brs_for(fraction),
        os16,
    })
}

/// Put the module into UART mode (8N1, LSB first, SMCLK) at `baud`.
///
/// Leaves the module out of reset. Shared by [`Uart`] and
/// [`UartStream`](super::uart_stream::UartStream).
pub(crate) fn configure<R: Registers>(
    regs: &mut R,
    smclk_hz: u32,
    baud: u32,
) -> Result<BaudConfig> {
    let cfg = baud_config(smclk_hz, baud)?;

    regs.set(usci_a::CTLW0, uart_ctlw0::SWRST.set().bits);
    regs.apply(
        usci_a::CTLW0,
        uart_ctlw0::MODE.value(mode::UART)
            | uart_ctlw0::SYNC.clear()
            | uart_ctlw0::SSEL.value(SSEL_SMCLK)
            | uart_ctlw0::SEVENBIT.clear()
            | uart_ctlw0::SPB.clear()
            | uart_ctlw0::PEN.clear()
            | uart_ctlw0::MSB.clear(),
    );
    regs.set(usci_a::BRW, cfg.brw);
    regs.set(usci_a::MCTLW, cfg.mctlw());
    regs.apply(usci_a::CTLW0, uart_ctlw0::SWRST.clear());

    log_debug!("uart: {} baud, brw {}, brf {}, brs {}", baud, cfg.brw, cfg.brf, cfg.brs);
    Ok(cfg)
}

// ── Transport ──────────────────────────────────────────────────────────────

/// Two-channel DMA UART transfer engine.
pub struct UartTransport<R, TX, RX> {
    regs: R,
    tx_dma: TX,
    rx_dma: RX,
    baud: u32,
    tx_trigger: u8,
    rx_trigger: u8,
}

impl<R, TX, RX> UartTransport<R, TX, RX>
where
    R: Registers,
    TX: DmaChannel,
    RX: DmaChannel,
{
    pub fn init(&mut self, smclk_hz: u32) -> Result<BaudConfig> {
        let cfg = configure(&mut self.regs, smclk_hz, self.baud)?;
        self.tx_dma.setup(&DmaConfig::mem_to_periph(self.tx_trigger))?;
        self.rx_dma.setup(&DmaConfig::periph_to_mem(self.rx_trigger))?;
        Ok(cfg)
    }

    fn arm(&mut self, job: &mut Job<'_, Self>) -> Result<()> {
        let txbuf = self.regs.addr_of(usci_a::TXBUF);
        let rxbuf = self.regs.addr_of(usci_a::RXBUF);

        // SAFETY: the job's buffers outlive the job, which stays queued
        // until every channel it armed is idle or aborted.
        unsafe {
            if job.kind() != JobKind::Write {
                let rx = job.rx_mut();
                self.rx_dma.transfer_periph_to_mem(rxbuf, rx.as_mut_ptr(), rx.len())?;
            }
            if job.kind() != JobKind::Read {
                let tx = job.tx();
                self.tx_dma.transfer_mem_to_periph(tx.as_ptr(), txbuf, tx.len())?;
            }
        }
        Ok(())
    }

    fn rx_error(&self) -> Option<UartError> {
        let status = self.regs.get(usci_a::STATW);
        if uart_statw::OE.is_set(status) {
            Some(UartError::Overrun)
        } else if uart_statw::FE.is_set(status) {
            Some(UartError::Framing)
        } else if uart_statw::PE.is_set(status) {
            Some(UartError::Parity)
        } else {
            None
        }
    }

    fn abort(&mut self) {
        self.tx_dma.abort();
        self.rx_dma.abort();
    }
}

impl<R, TX, RX> Transport for UartTransport<R, TX, RX>
where
    R: Registers,
    TX: DmaChannel,
    RX: DmaChannel,
{
    type Address<'a> = ();
    type Error = UartError;

    fn validate(job: &Job<'_, Self>) -> Result<()> {
        let (tx, rx) = match job.kind() {
            JobKind::Write => (job.tx().len(), None),
            JobKind::Read => (job.rx().len(), None),
            JobKind::WriteRead => (job.tx().len(), Some(job.rx().len())),
        };
        if tx == 0 || rx == Some(0) {
            return Err(Error::NullPtr);
        }
        if tx.max(rx.unwrap_or(0)) > DMA_MAX_TRANSFER_LEN {
            return Err(Error::OutOfRange);
        }
        Ok(())
    }

    fn start(&mut self, job: &mut Job<'_, Self>) -> core::result::Result<(), UartError> {
        if job.kind() != JobKind::Write {
            // Drop a stale character and its error flags.
            let _ = self.regs.get(usci_a::RXBUF);
        }
        job.set_phase(match job.kind() {
            JobKind::Write => Phase::Writing,
            JobKind::Read | JobKind::WriteRead => Phase::Reading,
        });

        if let Err(err) = self.arm(job) {
            log_debug!("uart: dma refused transfer: {}", err);
            self.abort();
            return Err(UartError::Dma);
        }
        Ok(())
    }

    fn advance(&mut self, job: &mut Job<'_, Self>) -> Step<UartError> {
        if job.kind() != JobKind::Write {
            if let Some(err) = self.rx_error() {
                self.abort();
                let _ = self.regs.get(usci_a::RXBUF);
                return Step::Error(err);
            }
        }

        if self.tx_dma.is_busy() || self.rx_dma.is_busy() {
            return Step::Pending;
        }

        job.set_phase(Phase::Completing);
        Step::Done
    }

    fn received_len(job: &Job<'_, Self>) -> usize {
        match job.kind() {
            JobKind::Write => 0,
            JobKind::Read | JobKind::WriteRead => job.rx().len(),
        }
    }
}

// ── Driver ─────────────────────────────────────────────────────────────────

/// UART job driver with a queue of up to `N` jobs.
///
/// Route both DMA channel interrupts (and the eUSCI_A interrupt with
/// `UCRXEIE` if receive errors should abort early) to
/// [`on_interrupt`](Self::on_interrupt).
pub struct Uart<'a, R, TX, RX, const N: usize = JOB_QUEUE_DEPTH>
where
    R: Registers,
    TX: DmaChannel,
    RX: DmaChannel,
{
    sched: TransactionScheduler<'a, UartTransport<R, TX, RX>, N>,
}

impl<'a, R, TX, RX, const N: usize> Uart<'a, R, TX, RX, N>
where
    R: Registers,
    TX: DmaChannel,
    RX: DmaChannel,
{
    pub const fn new(
        regs: R,
        tx_dma: TX,
        rx_dma: RX,
        baud: u32,
        tx_trigger: u8,
        rx_trigger: u8,
    ) -> Self {
        Uart {
            sched: TransactionScheduler::new(UartTransport {
                regs,
                tx_dma,
                rx_dma,
                baud,
                tx_trigger,
                rx_trigger,
            }),
        }
    }

    /// Configure for SMCLK = `smclk_hz` and open the job queue.
    pub fn init(&mut self, smclk_hz: u32) -> Result<BaudConfig> {
        if self.sched.is_initialized() {
            return Err(Error::AlreadyInitialized);
        }
        let cfg = self.sched.transport_mut().init(smclk_hz)?;
        self.sched.set_initialized()?;
        Ok(cfg)
    }

    pub fn write(&self, data: &'a [u8], callback: UartCallback<'a>) -> Result<()> {
        self.sched.enqueue(Job::write((), data, callback))
    }

    pub fn read(&self, buffer: &'a mut [u8], callback: UartCallback<'a>) -> Result<()> {
        self.sched.enqueue(Job::read((), buffer, callback))
    }

    /// Send `tx` while receiving into `rx`; completes once both are done.
    pub fn write_read(
        &self,
        tx: &'a [u8],
        rx: &'a mut [u8],
        callback: UartCallback<'a>,
    ) -> Result<()> {
        self.sched.enqueue(Job::write_read((), tx, rx, callback))
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
