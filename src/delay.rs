//! Busy-wait delays for the CC430 core
use embedded_hal::delay::DelayNs;
use msp430::asm;

// nop + decrement + jump
const CYCLES_PER_LOOP: u32 = 4;

/// Delay provider counting MCLK cycles
pub struct Delay {
    freq: u32,
}

impl Delay {
    /// Delay provider for a core running from an `mclk_hz` MCLK
    pub fn new(mclk_hz: u32) -> Self {
        Delay { freq: mclk_hz }
    }

    #[inline]
    fn spin(&mut self, cycles: u64) {
        let loops = cycles / u64::from(CYCLES_PER_LOOP);
        for _ in 0..loops {
            asm::nop();
        }
    }
}

impl DelayNs for Delay {
    #[inline]
    fn delay_ns(&mut self, ns: u32) {
        self.spin(u64::from(ns) * u64::from(self.freq) / 1_000_000_000);
    }

    #[inline]
    fn delay_us(&mut self, us: u32) {
        self.spin(u64::from(us) * u64::from(self.freq) / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        for _ in 0..ms {
            self.delay_us(1000);
        }
    }
}
