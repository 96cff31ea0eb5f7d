//! Real time clock sleep
//!
//! The RTC_D counter is run as a 32-bit counter that overflows after the requested number of
//! seconds, and the core waits in LPM3 for the overflow interrupt. ACLK, which drives the
//! counter, is taken from either the 32.768 kHz XT1 crystal or the ~10 kHz VLO.
//!
//! The application's RTC interrupt handler must call [`on_interrupt`] and wake the CPU on
//! return (`#[interrupt(wake_cpu)]` with `msp430-rt`) so that [`Rtc::sleep`] returns.

use crate::hw_traits::cc430::{LowPower, RtcCtl0, RtcCtl1, RtcRegs, Ucsctl4};

/// ACLK source for the RTC
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ClockSource {
    /// 32.768 kHz crystal
    #[default]
    Xt1,
    /// Internal very low power oscillator
    Vlo,
}

impl ClockSource {
    /// Nominal ACLK cycles per second
    #[inline]
    pub fn ticks_per_second(self) -> u32 {
        match self {
            ClockSource::Xt1 => 32_768,
            ClockSource::Vlo => 10_000,
        }
    }

    fn ucsctl4(self) -> Ucsctl4 {
        let base = Ucsctl4::SELS_DCOCLKDIV | Ucsctl4::SELM_DCOCLKDIV;
        match self {
            ClockSource::Xt1 => base,
            ClockSource::Vlo => base | Ucsctl4::SELA_VLOCLK,
        }
    }
}

/// RTC driven sleep
pub struct Rtc<R: RtcRegs, P: LowPower> {
    regs: R,
    lpm: P,
}

impl<R: RtcRegs, P: LowPower> Rtc<R, P> {
    /// Take the RTC registers and the low power mode control
    pub fn new(regs: R, lpm: P) -> Self {
        Rtc { regs, lpm }
    }

    /// Release the registers and low power mode control
    #[inline]
    pub fn free(self) -> (R, P) {
        (self.regs, self.lpm)
    }

    /// Sleep in LPM3 for `seconds`, clocking the RTC from `source`. Returns immediately when
    /// `seconds` is zero.
    pub fn sleep(&mut self, seconds: u16, source: ClockSource) {
        if seconds == 0 {
            return;
        }

        // At most 32768 * 65535, which fits
        let ticks = u32::MAX - source.ticks_per_second() * u32::from(seconds);

        self.regs.set_ucsctl4(source.ucsctl4());
        self.regs.set_counter(ticks);
        let ctl0 = self.regs.rtcctl0() | RtcCtl0::RTCTEVIE;
        self.regs.set_rtcctl0(ctl0);
        self.regs.set_rtcctl1(RtcCtl1::RTCTEV_32BIT);

        self.lpm.enter_lpm3();
    }
}

/// RTC interrupt service: acknowledge the overflow, hold the counter and zero it.
pub fn on_interrupt<R: RtcRegs>(regs: &mut R) {
    let ctl0 = regs.rtcctl0() - RtcCtl0::RTCTEVIFG;
    regs.set_rtcctl0(ctl0);
    regs.set_rtcctl1(RtcCtl1::RTCHOLD);
    regs.set_counter(0);
}
