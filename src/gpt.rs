//! General-purpose timers
//!
//! Three 32-bit down-counting timers (GPT0 to GPT2) clocked from the system clock through a
//! power-of-two prescaler. The period is split across two 16-bit registers.

use crate::csl::CslResult;
use crate::hw_traits::csl::{GptCsl, GptHwConfig, RegisterBank};

pub use crate::hw_traits::csl::GptInstance;

/// Input clock prescaler
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum Prescale {
    /// Divide by 2
    #[default]
    Div2 = 0,
    /// Divide by 4
    Div4 = 1,
    /// Divide by 8
    Div8 = 2,
    /// Divide by 16
    Div16 = 3,
    /// Divide by 32
    Div32 = 4,
    /// Divide by 64
    Div64 = 5,
    /// Divide by 128
    Div128 = 6,
    /// Divide by 256
    Div256 = 7,
    /// Divide by 512
    Div512 = 8,
    /// Divide by 1024
    Div1024 = 9,
    /// Divide by 2048
    Div2048 = 10,
    /// Divide by 4096
    Div4096 = 11,
    /// Divide by 8192
    Div8192 = 12,
}

impl Prescale {
    /// Clock division factor
    #[inline]
    pub fn divisor(self) -> u32 {
        2 << (self as u16)
    }
}

/// Timer settings
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GptConfig {
    /// Reload the period when the count reaches zero
    pub auto_reload: bool,
    /// Clock prescaler
    pub prescale: Prescale,
    /// Enable the timer
    pub enabled: bool,
    /// Count loaded at start, in prescaled clock ticks
    pub period: u32,
}

impl GptConfig {
    /// Free-running periodic timer with the smallest prescaler
    pub fn periodic(period: u32) -> Self {
        GptConfig {
            auto_reload: true,
            prescale: Prescale::Div2,
            enabled: true,
            period,
        }
    }
}

impl From<&GptConfig> for GptHwConfig {
    fn from(cfg: &GptConfig) -> Self {
        GptHwConfig {
            auto_reload: cfg.auto_reload,
            prescale: cfg.prescale as u16,
            enabled: cfg.enabled,
            period_low: cfg.period as u16,
            period_high: (cfg.period >> 16) as u16,
        }
    }
}

/// One general-purpose timer instance
pub struct Gpt<C: GptCsl> {
    csl: C,
    instance: GptInstance,
    handle: RegisterBank,
}

impl<C: GptCsl> Gpt<C> {
    /// Open and reset `instance`
    pub fn select(mut csl: C, instance: GptInstance) -> CslResult<Self> {
        let handle = csl.open(instance)?;
        csl.reset(instance)?;
        Ok(Gpt {
            csl,
            instance,
            handle,
        })
    }

    /// Timer instance driven by this object
    #[inline]
    pub fn instance(&self) -> GptInstance {
        self.instance
    }

    /// Register bank of the timer, unmapped once closed
    #[inline]
    pub fn handle(&self) -> RegisterBank {
        self.handle
    }

    /// Release the CSL module
    #[inline]
    pub fn free(self) -> C {
        self.csl
    }

    /// Load `config` into the timer registers
    pub fn configure(&mut self, config: &GptConfig) -> CslResult {
        self.csl.config(self.instance, &GptHwConfig::from(config))
    }

    /// Configure a periodic count of `period` ticks
    #[inline]
    pub fn initialize(&mut self, period: u32) -> CslResult {
        self.configure(&GptConfig::periodic(period))
    }

    /// Change the period, keeping the timer periodic and enabled
    #[inline]
    pub fn set_period(&mut self, period: u32) -> CslResult {
        self.initialize(period)
    }

    /// Start counting
    pub fn start(&mut self) -> CslResult {
        self.csl.start(self.instance)
    }

    /// Stop counting and reset the timer registers
    pub fn stop(&mut self) -> CslResult {
        self.csl.stop(self.instance)?;
        self.csl.reset(self.instance)
    }

    /// Current count
    pub fn read(&mut self) -> CslResult<u32> {
        self.csl.count(self.instance)
    }

    /// Close the timer
    pub fn close(&mut self) -> CslResult {
        self.csl.close(self.instance)?;
        self.handle = RegisterBank::UNMAPPED;
        Ok(())
    }

    /// Acknowledge all pending timer interrupts. Call from the timer ISR.
    #[inline]
    pub fn clear_interrupts(&mut self) {
        self.csl.clear_interrupts();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csl::CslError;
    use crate::mock::{FakeCsl, BANK};

    #[test]
    fn select_opens_and_resets() {
        let gpt = Gpt::select(FakeCsl::default(), GptInstance::Gpt1).unwrap();
        assert_eq!(gpt.handle(), BANK);
        assert_eq!(gpt.instance(), GptInstance::Gpt1);
        let csl = gpt.free();
        assert_eq!(csl.calls, ["GPT_open", "GPT_reset"]);
        assert_eq!(csl.gpt_instance, Some(GptInstance::Gpt1));
    }

    #[test]
    fn select_fails_when_open_fails() {
        let res = Gpt::select(FakeCsl::failing("GPT_open", CslError::InUse), GptInstance::Gpt0);
        assert!(matches!(res, Err(CslError::InUse)));
    }

    #[test]
    fn period_is_split_across_two_registers() {
        let mut gpt = Gpt::select(FakeCsl::default(), GptInstance::Gpt0).unwrap();
        gpt.initialize(0x0012_3456).unwrap();
        assert_eq!(
            gpt.csl.gpt_config,
            Some(GptHwConfig {
                auto_reload: true,
                prescale: 0,
                enabled: true,
                period_low: 0x3456,
                period_high: 0x0012,
            })
        );

        gpt.set_period(0xFFFF_0000).unwrap();
        let cfg = gpt.csl.gpt_config.unwrap();
        assert_eq!((cfg.period_high, cfg.period_low), (0xFFFF, 0));
    }

    #[test]
    fn explicit_configuration() {
        let mut gpt = Gpt::select(FakeCsl::default(), GptInstance::Gpt2).unwrap();
        gpt.configure(&GptConfig {
            auto_reload: false,
            prescale: Prescale::Div8192,
            enabled: true,
            period: 100,
        })
        .unwrap();
        let cfg = gpt.free().gpt_config.unwrap();
        assert_eq!(cfg.prescale, 12);
        assert!(!cfg.auto_reload);
        assert_eq!(Prescale::Div8192.divisor(), 8192);
        assert_eq!(Prescale::Div2.divisor(), 2);
    }

    #[test]
    fn run_stop_and_close() {
        let mut gpt = Gpt::select(
            FakeCsl {
                gpt_count: 0xDEAD_BEEF,
                ..Default::default()
            },
            GptInstance::Gpt0,
        )
        .unwrap();
        gpt.start().unwrap();
        assert_eq!(gpt.read(), Ok(0xDEAD_BEEF));
        gpt.clear_interrupts();
        gpt.stop().unwrap();
        gpt.close().unwrap();
        assert_eq!(gpt.handle(), RegisterBank::UNMAPPED);

        let csl = gpt.free();
        assert_eq!(
            csl.calls[2..],
            ["GPT_start", "GPT_getCnt", "GPT_stop", "GPT_reset", "GPT_close"]
        );
        assert_eq!(csl.gpt_irq_cleared, 1);
    }

    #[test]
    fn failed_stop_skips_reset() {
        let mut gpt =
            Gpt::select(FakeCsl::failing("GPT_stop", CslError::Fail), GptInstance::Gpt0).unwrap();
        assert_eq!(gpt.stop(), Err(CslError::Fail));
        assert_eq!(gpt.free().calls, ["GPT_open", "GPT_reset", "GPT_stop"]);
    }
}
