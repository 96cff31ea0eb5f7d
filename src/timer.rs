//! Timer_A1 millisecond timer
//!
//! Timer_A1 runs in up mode from ACLK and raises the CCR0 interrupt once per period. The
//! application's `TIMER1_A0` handler calls [`TimerA1::on_interrupt`], which runs the registered
//! callback.

use crate::hw_traits::cc430::{TaCctl, TaCtl, TimerA1Regs};

// CCR0 counts per second. One count short of a 16-bit wrap, so 1000 ms is the longest period.
const COUNTS_PER_SECOND: u64 = 65_535;

/// Timer errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    /// The period does not fit the 16-bit compare register
    PeriodTooLong(u32),
}

/// Timer_A1 with an overflow callback
pub struct TimerA1<T: TimerA1Regs> {
    regs: T,
    callback: Option<fn()>,
}

impl<T: TimerA1Regs> TimerA1<T> {
    /// Take the Timer_A1 registers
    pub fn new(regs: T) -> Self {
        TimerA1 {
            regs,
            callback: None,
        }
    }

    /// Release the registers
    #[inline]
    pub fn free(self) -> T {
        self.regs
    }

    /// Function run on every period expiry
    #[inline]
    pub fn set_callback(&mut self, callback: fn()) {
        self.callback = Some(callback);
    }

    /// Start counting periods of `millis` milliseconds
    pub fn start(&mut self, millis: u32) -> Result<(), TimerError> {
        let counts = u64::from(millis) * COUNTS_PER_SECOND / 1000;
        let ccr0 = u16::try_from(counts).map_err(|_| TimerError::PeriodTooLong(millis))?;

        self.regs.set_cctl0(TaCctl::CCIE);
        self.regs.set_ccr0(ccr0);
        self.regs
            .set_ctl(TaCtl::TASSEL_ACLK | TaCtl::MC_UP | TaCtl::TACLR);
        Ok(())
    }

    /// Halt the timer
    #[inline]
    pub fn stop(&mut self) {
        self.regs.set_ctl(TaCtl::empty());
    }

    /// Run the callback. Call from the `TIMER1_A0` interrupt.
    #[inline]
    pub fn on_interrupt(&self) {
        if let Some(callback) = self.callback {
            callback();
        }
    }
}
