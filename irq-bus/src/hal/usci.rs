//! eUSCI register map (MSP432P4xx).
//!
//! Offsets are byte offsets from the module base; every register is 16 bits
//! wide. Field layouts follow the family user's guide. Only the fields the
//! bus drivers touch are listed.

// Some registers/fields are listed for completeness (status bits the
// drivers only read in tests, alternate base addresses).
#![allow(dead_code)]

use super::register::{Field, RegOffset};

// ── Base addresses ─────────────────────────────────────────────────────────

pub const USCIA0_BASE: usize = 0x4000_1000;
pub const USCIA1_BASE: usize = 0x4000_1400;
pub const USCIA2_BASE: usize = 0x4000_1800;
pub const USCIA3_BASE: usize = 0x4000_1C00;

pub const USCIB0_BASE: usize = 0x4000_2000;
pub const USCIB1_BASE: usize = 0x4000_2400;
pub const USCIB2_BASE: usize = 0x4000_2800;
pub const USCIB3_BASE: usize = 0x4000_2C00;

/// `UCSSELx` value selecting SMCLK (both 2 and 3 select SMCLK).
pub const SSEL_SMCLK: u16 = 3;

/// `UCMODEx` values.
pub mod mode {
    /// 3-pin SPI (eUSCI_A and eUSCI_B).
    pub const SPI_3PIN: u16 = 0;
    /// I2C (eUSCI_B only).
    pub const I2C: u16 = 3;
    /// UART (eUSCI_A only, `UCSYNC = 0`).
    pub const UART: u16 = 0;
}

// ── eUSCI_B (I2C / SPI) ────────────────────────────────────────────────────

pub mod usci_b {
    use super::{Field, RegOffset};

    pub const CTLW0: RegOffset = RegOffset(0x00);
    pub const CTLW1: RegOffset = RegOffset(0x02);
    pub const BRW: RegOffset = RegOffset(0x06);
    pub const STATW: RegOffset = RegOffset(0x08);
    pub const TBCNT: RegOffset = RegOffset(0x0A);
    pub const RXBUF: RegOffset = RegOffset(0x0C);
    pub const TXBUF: RegOffset = RegOffset(0x0E);
    pub const I2CSA: RegOffset = RegOffset(0x20);
    pub const IE: RegOffset = RegOffset(0x2A);
    pub const IFG: RegOffset = RegOffset(0x2C);

    /// `UCBxCTLW0` in I2C mode.
    pub mod i2c_ctlw0 {
        use super::Field;
        pub const SWRST: Field = Field::bit(0);
        pub const TXSTT: Field = Field::bit(1);
        pub const TXSTP: Field = Field::bit(2);
        /// Transmitter (1) / receiver (0).
        pub const TR: Field = Field::bit(4);
        pub const SSEL: Field = Field::new(7, 6);
        pub const SYNC: Field = Field::bit(8);
        pub const MODE: Field = Field::new(10, 9);
        pub const MST: Field = Field::bit(11);
        /// Multi-master environment.
        pub const MM: Field = Field::bit(13);
        /// 10-bit slave address.
        pub const SLA10: Field = Field::bit(14);
        /// 10-bit own address.
        pub const A10: Field = Field::bit(15);
    }

    /// `UCBxCTLW1` in I2C mode.
    pub mod i2c_ctlw1 {
        use super::Field;
        /// Automatic STOP generation (0 = off, STOP issued by software).
        pub const ASTP: Field = Field::new(3, 2);
        /// Clock-low timeout select (0 = disabled).
        pub const CLTO: Field = Field::new(7, 6);
    }

    /// `UCBxIE` / `UCBxIFG` bits in I2C mode.
    pub mod i2c_ifg {
        use super::Field;
        pub const RX0: Field = Field::bit(0);
        pub const TX0: Field = Field::bit(1);
        pub const STT: Field = Field::bit(2);
        pub const STP: Field = Field::bit(3);
        pub const AL: Field = Field::bit(4);
        pub const NACK: Field = Field::bit(5);
        pub const BCNT: Field = Field::bit(6);
        pub const CLTO: Field = Field::bit(7);
    }
}

// ── eUSCI_A (UART / SPI) ───────────────────────────────────────────────────

pub mod usci_a {
    use super::{Field, RegOffset};

    pub const CTLW0: RegOffset = RegOffset(0x00);
    pub const CTLW1: RegOffset = RegOffset(0x02);
    pub const BRW: RegOffset = RegOffset(0x06);
    pub const MCTLW: RegOffset = RegOffset(0x08);
    pub const STATW: RegOffset = RegOffset(0x0A);
    pub const RXBUF: RegOffset = RegOffset(0x0C);
    pub const TXBUF: RegOffset = RegOffset(0x0E);
    pub const IE: RegOffset = RegOffset(0x1A);
    pub const IFG: RegOffset = RegOffset(0x1C);

    /// `UCAxCTLW0` in UART mode.
    pub mod uart_ctlw0 {
        use super::Field;
        pub const SWRST: Field = Field::bit(0);
        /// Receive-error interrupt enable (erroneous characters set RXIFG).
        pub const RXEIE: Field = Field::bit(5);
        pub const SSEL: Field = Field::new(7, 6);
        pub const SYNC: Field = Field::bit(8);
        pub const MODE: Field = Field::new(10, 9);
        /// Two stop bits.
        pub const SPB: Field = Field::bit(11);
        pub const SEVENBIT: Field = Field::bit(12);
        pub const MSB: Field = Field::bit(13);
        pub const PAR: Field = Field::bit(14);
        pub const PEN: Field = Field::bit(15);
    }

    /// `UCAxMCTLW` modulation control.
    pub mod mctlw {
        use super::Field;
        /// Oversampling mode.
        pub const OS16: Field = Field::bit(0);
        /// First modulation stage.
        pub const BRF: Field = Field::new(7, 4);
        /// Second modulation stage.
        pub const BRS: Field = Field::new(15, 8);
    }

    /// `UCAxSTATW` in UART mode.
    pub mod uart_statw {
        use super::Field;
        pub const BUSY: Field = Field::bit(0);
        pub const RXERR: Field = Field::bit(2);
        pub const PE: Field = Field::bit(4);
        pub const OE: Field = Field::bit(5);
        pub const FE: Field = Field::bit(6);
    }
}

// ── SPI mode (shared by eUSCI_A and eUSCI_B) ───────────────────────────────

/// `UCxCTLW0` in SPI mode.
pub mod spi_ctlw0 {
    use super::Field;
    pub const SWRST: Field = Field::bit(0);
    /// STE pin function (0 = disabled in 3-pin mode).
    pub const STEM: Field = Field::bit(1);
    pub const SSEL: Field = Field::new(7, 6);
    pub const SYNC: Field = Field::bit(8);
    pub const MODE: Field = Field::new(10, 9);
    pub const MST: Field = Field::bit(11);
    pub const SEVENBIT: Field = Field::bit(12);
    pub const MSB: Field = Field::bit(13);
    /// Clock polarity (1 = inactive high).
    pub const CKPL: Field = Field::bit(14);
    /// Clock phase (1 = capture on first edge).
    pub const CKPH: Field = Field::bit(15);
}

/// `UCxSTATW` in SPI mode.
pub mod spi_statw {
    use super::Field;
    pub const BUSY: Field = Field::bit(0);
    pub const OE: Field = Field::bit(5);
    pub const FE: Field = Field::bit(6);
}

/// Register offsets that differ between eUSCI_A and eUSCI_B.
///
/// SPI runs on either module type; the driver is handed the matching layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsciLayout {
    pub ctlw0: RegOffset,
    pub brw: RegOffset,
    pub statw: RegOffset,
    pub rxbuf: RegOffset,
    pub txbuf: RegOffset,
    pub ie: RegOffset,
    pub ifg: RegOffset,
}

impl UsciLayout {
    pub const A: UsciLayout = UsciLayout {
        ctlw0: usci_a::CTLW0,
        brw: usci_a::BRW,
        statw: usci_a::STATW,
        rxbuf: usci_a::RXBUF,
        txbuf: usci_a::TXBUF,
        ie: usci_a::IE,
        ifg: usci_a::IFG,
    };

    pub const B: UsciLayout = UsciLayout {
        ctlw0: usci_b::CTLW0,
        brw: usci_b::BRW,
        statw: usci_b::STATW,
        rxbuf: usci_b::RXBUF,
        txbuf: usci_b::TXBUF,
        ie: usci_b::IE,
        ifg: usci_b::IFG,
    };
}
