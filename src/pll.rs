//! PLL clock configuration
//!
//! The system clock is generated by a PLL fed from either the 12 MHz CLKIN pin or the 32.768 kHz
//! RTC oscillator, selected by a strap at reset. [`Pll::setup`] picks a stored register preset for
//! the requested speed and the active input clock.

use crate::csl::{CslError, CslResult};
use crate::hw_traits::csl::{PllCsl, RegisterBank};

pub use crate::hw_traits::csl::{PllConfig, PllInput};

const CLKIN_HZ: u64 = 12_000_000;
const RTCIN_HZ: u64 = 32_768;

const M_MASK: u16 = 0x0FFF;
const RD_MASK: u16 = 0x0FFF;
const RD_BYPASS: u16 = 1 << 15;
const OD_MASK: u16 = 0x01FF;
const OUT_DIV_EN: u16 = 1 << 9;

impl PllConfig {
    /// 40 MHz from the RTC clock
    pub const RTC_40MHZ: PllConfig = PllConfig::new(0x8988, 0x8000, 0x0806, 0x0201);
    /// 60 MHz from the RTC clock
    pub const RTC_60MHZ: PllConfig = PllConfig::new(0x8724, 0x8000, 0x0806, 0x0000);
    /// 75 MHz from the RTC clock
    pub const RTC_75MHZ: PllConfig = PllConfig::new(0x88ED, 0x8000, 0x0806, 0x0000);
    /// 100 MHz from the RTC clock
    pub const RTC_100MHZ: PllConfig = PllConfig::new(0x8BE8, 0x8000, 0x0806, 0x0000);
    /// 100 MHz from CLKIN
    pub const CLKIN_100MHZ: PllConfig = PllConfig::new(0x833E, 0x0060, 0x0806, 0x0000);

    /// Build a configuration from raw register values
    pub const fn new(pllcntl1: u16, pllincntl: u16, pllcntl2: u16, plloutcntl: u16) -> Self {
        PllConfig {
            pllcntl1,
            pllincntl,
            pllcntl2,
            plloutcntl,
        }
    }

    /// Output frequency in kHz for the given input clock
    pub fn output_khz(&self, input: PllInput) -> u32 {
        let mut clk = match input {
            PllInput::ClkIn => CLKIN_HZ,
            PllInput::RtcIn => RTCIN_HZ,
        };

        if self.pllincntl & RD_BYPASS == 0 {
            clk /= u64::from(self.pllincntl & RD_MASK) + 4;
        }
        clk *= u64::from(self.pllcntl1 & M_MASK) + 4;
        if self.plloutcntl & OUT_DIV_EN != 0 {
            clk /= u64::from(self.plloutcntl & OD_MASK) + 1;
        }

        (clk / 1000) as u32
    }
}

/// CPU speed presets
///
/// Default: 100 MHz
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CpuSpeed {
    /// 40 MHz
    Mhz40,
    /// 60 MHz
    Mhz60,
    /// 75 MHz
    Mhz75,
    /// 100 MHz
    #[default]
    Mhz100,
}

impl CpuSpeed {
    /// Register preset for this speed. Only 100 MHz is available from CLKIN; every speed maps
    /// to it there.
    pub fn preset(self, input: PllInput) -> PllConfig {
        match (input, self) {
            (PllInput::ClkIn, _) => PllConfig::CLKIN_100MHZ,
            (PllInput::RtcIn, CpuSpeed::Mhz40) => PllConfig::RTC_40MHZ,
            (PllInput::RtcIn, CpuSpeed::Mhz60) => PllConfig::RTC_60MHZ,
            (PllInput::RtcIn, CpuSpeed::Mhz75) => PllConfig::RTC_75MHZ,
            (PllInput::RtcIn, CpuSpeed::Mhz100) => PllConfig::RTC_100MHZ,
        }
    }
}

/// PLL driver
pub struct Pll<C: PllCsl> {
    csl: C,
    handle: RegisterBank,
}

impl<C: PllCsl> Pll<C> {
    /// Initialize and reset PLL instance 0. If either step fails the handle stays unmapped
    /// and later calls report `BadHandle`.
    pub fn new(mut csl: C) -> Self {
        let handle = match csl.init() {
            Ok(bank) => match csl.reset() {
                Ok(()) => bank,
                Err(_) => RegisterBank::UNMAPPED,
            },
            Err(_) => RegisterBank::UNMAPPED,
        };
        Pll { csl, handle }
    }

    /// Register bank of the PLL instance
    #[inline]
    pub fn handle(&self) -> RegisterBank {
        self.handle
    }

    /// Release the CSL module
    #[inline]
    pub fn free(self) -> C {
        self.csl
    }

    fn check_handle(&self) -> CslResult {
        if self.handle.is_mapped() {
            Ok(())
        } else {
            Err(CslError::BadHandle)
        }
    }

    /// Write `config` to the PLL registers
    pub fn configure(&mut self, config: &PllConfig) -> CslResult {
        self.check_handle()?;
        self.csl.config(config)
    }

    /// Read back the PLL registers
    pub fn get_config(&mut self) -> CslResult<PllConfig> {
        self.check_handle()?;
        self.csl.get_config()
    }

    /// Current system clock in kHz
    pub fn system_clock_khz(&mut self) -> CslResult<u32> {
        let config = self.get_config()?;
        Ok(config.output_khz(self.csl.input()))
    }

    /// Run the CPU at `speed`: reset the PLL, load the preset for the active input clock and
    /// enable it. Returns the resulting system clock in kHz.
    pub fn setup(&mut self, speed: CpuSpeed) -> CslResult<u32> {
        self.check_handle()?;
        let input = self.csl.input();
        let preset = speed.preset(input);

        self.csl.reset()?;
        self.csl.config(&preset)?;
        self.csl.enable()?;
        Ok(preset.output_khz(input))
    }
}
