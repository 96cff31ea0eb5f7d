//! CC430F5137 register access
//!
//! Zero-sized handles implementing the [`hw_traits::cc430`](crate::hw_traits::cc430) seams with
//! volatile accesses at the device's fixed peripheral addresses. Obtain them once through
//! [`Peripherals::take`].

use crate::hw_traits::cc430::{
    Fctl1, Fctl3, FlashRegs, LowPower, RtcCtl0, RtcCtl1, RtcRegs, TaCctl, TaCtl, TimerA1Regs, Ucsctl4, FWKEY,
};
use core::cell::Cell;
use critical_section::Mutex;

const FCTL1: usize = 0x0140;
const FCTL3: usize = 0x0144;
const UCSCTL4: usize = 0x0168;
const RTCCTL0: usize = 0x04A0;
const RTCCTL1: usize = 0x04A1;
const RTCNT1: usize = 0x04B0;
const TA1CTL: usize = 0x0380;
const TA1CCTL0: usize = 0x0382;
const TA1CCR0: usize = 0x0392;

#[inline(always)]
fn write16(addr: usize, value: u16) {
    unsafe { (addr as *mut u16).write_volatile(value) };
}

#[inline(always)]
fn write8(addr: usize, value: u8) {
    unsafe { (addr as *mut u8).write_volatile(value) };
}

#[inline(always)]
fn read8(addr: usize) -> u8 {
    unsafe { (addr as *const u8).read_volatile() }
}

/// Flash controller and the memory it programs
pub struct Flash {
    _private: (),
}

impl FlashRegs for Flash {
    #[inline]
    fn set_fctl1(&mut self, value: Fctl1) {
        write16(FCTL1, FWKEY | value.bits());
    }

    #[inline]
    fn set_fctl3(&mut self, value: Fctl3) {
        write16(FCTL3, FWKEY | value.bits());
    }

    #[inline]
    fn read_byte(&self, addr: u16) -> u8 {
        read8(usize::from(addr))
    }

    #[inline]
    fn write_byte(&mut self, addr: u16, byte: u8) {
        write8(usize::from(addr), byte);
    }
}

/// RTC_D plus the ACLK source selection in the unified clock system
pub struct RtcD {
    _private: (),
}

impl RtcRegs for RtcD {
    #[inline]
    fn set_ucsctl4(&mut self, value: Ucsctl4) {
        write16(UCSCTL4, value.bits());
    }

    #[inline]
    fn rtcctl0(&self) -> RtcCtl0 {
        RtcCtl0::from_bits_retain(read8(RTCCTL0))
    }

    #[inline]
    fn set_rtcctl0(&mut self, value: RtcCtl0) {
        write8(RTCCTL0, value.bits());
    }

    #[inline]
    fn set_rtcctl1(&mut self, value: RtcCtl1) {
        write8(RTCCTL1, value.bits());
    }

    fn set_counter(&mut self, ticks: u32) {
        // High byte first
        for (i, byte) in ticks.to_le_bytes().iter().enumerate().rev() {
            write8(RTCNT1 + i, *byte);
        }
    }
}

/// Status register low power control
pub struct Lpm {
    _private: (),
}

impl LowPower for Lpm {
    #[inline(always)]
    fn enter_lpm3(&mut self) {
        crate::lpm::enter_lpm3();
    }
}

/// Timer_A1
pub struct TimerA1 {
    _private: (),
}

impl TimerA1Regs for TimerA1 {
    #[inline]
    fn set_ctl(&mut self, value: TaCtl) {
        write16(TA1CTL, value.bits());
    }

    #[inline]
    fn set_cctl0(&mut self, value: TaCctl) {
        write16(TA1CCTL0, value.bits());
    }

    #[inline]
    fn set_ccr0(&mut self, value: u16) {
        write16(TA1CCR0, value);
    }
}

/// Register handles owned by the drivers
pub struct Peripherals {
    /// Flash controller, for [`InfoMemory`](crate::info_mem::InfoMemory)
    pub flash: Flash,
    /// RTC_D, for [`Rtc`](crate::rtc::Rtc)
    pub rtc: RtcD,
    /// Low power mode entry, for [`Rtc`](crate::rtc::Rtc)
    pub lpm: Lpm,
    /// Timer_A1, for [`TimerA1`](crate::timer::TimerA1)
    pub timer_a1: TimerA1,
}

static TAKEN: Mutex<Cell<bool>> = Mutex::new(Cell::new(false));

impl Peripherals {
    /// Hand out the register handles. Returns `None` on every call after the first.
    pub fn take() -> Option<Self> {
        critical_section::with(|cs| {
            let taken = TAKEN.borrow(cs);
            if taken.get() {
                None
            } else {
                taken.set(true);
                Some(Peripherals {
                    flash: Flash { _private: () },
                    rtc: RtcD { _private: () },
                    lpm: Lpm { _private: () },
                    timer_a1: TimerA1 { _private: () },
                })
            }
        })
    }
}
