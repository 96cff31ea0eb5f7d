//! CC430F5137 register blocks touched by the MCU drivers.
//!
//! The traits take whole register values. On hardware they are implemented in the `cc430` module
//! with volatile accesses at the fixed peripheral addresses.

use bitflags::bitflags;

/// Flash controller password, required in the high byte of every `FCTLx` write
pub const FWKEY: u16 = 0xA500;

bitflags! {
    /// Flash memory control register 1 (`FCTL1`), without the password byte
    #[derive(Debug, PartialEq, Eq, Copy, Clone)]
    pub struct Fctl1: u16 {
        /// Segment erase on the next dummy write
        const ERASE = 1 << 1;
        /// Mass erase
        const MERAS = 1 << 2;
        /// Byte/word write
        const WRT = 1 << 6;
        /// Block write
        const BLKWRT = 1 << 7;
    }
}

bitflags! {
    /// Flash memory control register 3 (`FCTL3`), without the password byte
    #[derive(Debug, PartialEq, Eq, Copy, Clone)]
    pub struct Fctl3: u16 {
        /// Flash busy
        const BUSY = 1 << 0;
        /// Flash security key violation
        const KEYV = 1 << 1;
        /// Access violation interrupt flag
        const ACCVIFG = 1 << 2;
        /// Flash ready for the next byte/word
        const WAIT = 1 << 3;
        /// Write/erase lock
        const LOCK = 1 << 4;
        /// Emergency exit
        const EMEX = 1 << 5;
        /// Info segment A lock
        const LOCKA = 1 << 6;
    }
}

/// Flash controller plus the byte-addressed memory it programs.
pub trait FlashRegs {
    /// Write `FWKEY | value` to `FCTL1`
    fn set_fctl1(&mut self, value: Fctl1);
    /// Write `FWKEY | value` to `FCTL3`
    fn set_fctl3(&mut self, value: Fctl3);
    /// Read one byte of flash
    fn read_byte(&self, addr: u16) -> u8;
    /// Write one byte to flash. Depending on `FCTL1` this programs the byte or erases the
    /// segment containing `addr`.
    fn write_byte(&mut self, addr: u16, byte: u8);
}

bitflags! {
    /// Unified clock system control register 4 (`UCSCTL4`): clock source selection
    #[derive(Debug, PartialEq, Eq, Copy, Clone)]
    pub struct Ucsctl4: u16 {
        /// MCLK from DCOCLKDIV (`SELM__DCOCLKDIV`)
        const SELM_DCOCLKDIV = 0x0004;
        /// SMCLK from DCOCLKDIV (`SELS__DCOCLKDIV`)
        const SELS_DCOCLKDIV = 0x0040;
        /// ACLK from VLOCLK (`SELA__VLOCLK`). ACLK runs from XT1 when clear.
        const SELA_VLOCLK = 0x0100;
    }
}

bitflags! {
    /// RTC_D control register 0 (`RTCCTL0`)
    #[derive(Debug, PartialEq, Eq, Copy, Clone)]
    pub struct RtcCtl0: u8 {
        /// RTC ready flag
        const RTCRDYIFG = 1 << 0;
        /// Alarm flag
        const RTCAIFG = 1 << 1;
        /// Counter event flag
        const RTCTEVIFG = 1 << 2;
        /// Oscillator fault flag
        const RTCOFIFG = 1 << 3;
        /// RTC ready interrupt enable
        const RTCRDYIE = 1 << 4;
        /// Alarm interrupt enable
        const RTCAIE = 1 << 5;
        /// Counter event interrupt enable
        const RTCTEVIE = 1 << 6;
        /// Oscillator fault interrupt enable
        const RTCOFIE = 1 << 7;
    }
}

bitflags! {
    /// RTC_D control register 1 (`RTCCTL1`)
    #[derive(Debug, PartialEq, Eq, Copy, Clone)]
    pub struct RtcCtl1: u8 {
        /// Counter event select, bit 0
        const RTCTEV0 = 1 << 0;
        /// Counter event select, bit 1
        const RTCTEV1 = 1 << 1;
        /// Counter event on 32-bit overflow
        const RTCTEV_32BIT = Self::RTCTEV0.bits() | Self::RTCTEV1.bits();
        /// Source select, bit 0
        const RTCSSEL0 = 1 << 2;
        /// Source select, bit 1
        const RTCSSEL1 = 1 << 3;
        /// RTC ready
        const RTCRDY = 1 << 4;
        /// Calendar mode
        const RTCMODE = 1 << 5;
        /// Hold the counter
        const RTCHOLD = 1 << 6;
        /// BCD calendar format
        const RTCBCD = 1 << 7;
    }
}

/// RTC_D in counter mode, together with the clock selection it depends on.
pub trait RtcRegs {
    /// Write `UCSCTL4`
    fn set_ucsctl4(&mut self, value: Ucsctl4);
    /// Read `RTCCTL0`
    fn rtcctl0(&self) -> RtcCtl0;
    /// Write `RTCCTL0`
    fn set_rtcctl0(&mut self, value: RtcCtl0);
    /// Write `RTCCTL1`
    fn set_rtcctl1(&mut self, value: RtcCtl1);
    /// Load the 32-bit counter (`RTCNT4` holds the high byte, `RTCNT1` the low byte)
    fn set_counter(&mut self, ticks: u32);
}

/// Status register low-power control.
pub trait LowPower {
    /// Set `SCG1 | SCG0 | CPUOFF | GIE` in the status register. Returns once an interrupt
    /// handler clears the LPM bits.
    fn enter_lpm3(&mut self);
}

bitflags! {
    /// Timer_A control register (`TAxCTL`)
    #[derive(Debug, PartialEq, Eq, Copy, Clone)]
    pub struct TaCtl: u16 {
        /// Overflow interrupt flag
        const TAIFG = 1 << 0;
        /// Overflow interrupt enable
        const TAIE = 1 << 1;
        /// Clear the counter, divider and count direction
        const TACLR = 1 << 2;
        /// Up mode (`MC_1`), counts to `TAxCCR0`. Stopped (`MC_0`) when clear.
        const MC_UP = 1 << 4;
        /// Continuous mode (`MC_2`)
        const MC_CONTINUOUS = 1 << 5;
        /// ACLK clock source (`TASSEL_1`)
        const TASSEL_ACLK = 1 << 8;
        /// SMCLK clock source (`TASSEL_2`)
        const TASSEL_SMCLK = 1 << 9;
    }
}

bitflags! {
    /// Timer_A capture/compare control register (`TAxCCTLn`)
    #[derive(Debug, PartialEq, Eq, Copy, Clone)]
    pub struct TaCctl: u16 {
        /// Capture/compare interrupt flag
        const CCIFG = 1 << 0;
        /// Capture overflow
        const COV = 1 << 1;
        /// Capture/compare interrupt enable
        const CCIE = 1 << 4;
        /// Capture mode
        const CAP = 1 << 8;
    }
}

/// Timer_A1 registers used for the CCR0 period interrupt.
pub trait TimerA1Regs {
    /// Write `TA1CTL`
    fn set_ctl(&mut self, value: TaCtl);
    /// Write `TA1CCTL0`
    fn set_cctl0(&mut self, value: TaCctl);
    /// Write `TA1CCR0`
    fn set_ccr0(&mut self, value: u16);
}
