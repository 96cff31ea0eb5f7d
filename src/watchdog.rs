//! Watchdog timer
//!
//! The watchdog must be configured before it can run, which is tracked in the type: [`Wdt::open`]
//! returns an unconfigured watchdog and [`Wdt::configure`] turns it into one that can be started,
//! serviced and stopped.
//!
//! **Note**: once started, the watchdog resets the device unless [`Wdt::service`] is called
//! before the counter runs out.

use crate::csl::CslResult;
use crate::hw_traits::csl::{RegisterBank, WdtCsl, WdtHwConfig};
use core::marker::PhantomData;

mod sealed {
    use super::*;

    pub trait SealedWdtState {}

    impl SealedWdtState for Unconfigured {}
    impl SealedWdtState for Configured {}
}

/// Unconfigured typestate
pub struct Unconfigured;
/// Configured typestate
pub struct Configured;

/// Marker trait for watchdog states
pub trait WdtState: sealed::SealedWdtState {}
impl WdtState for Unconfigured {}
impl WdtState for Configured {}

/// Watchdog timeout settings
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WdtConfig {
    /// Count reloaded on every service
    pub counter: u16,
    /// Prescaler applied to the watchdog clock
    pub prescale: u16,
}

/// Watchdog timer
pub struct Wdt<C: WdtCsl, STATE: WdtState> {
    csl: C,
    handle: RegisterBank,
    _state: PhantomData<STATE>,
}

impl<C: WdtCsl> Wdt<C, Unconfigured> {
    /// Open watchdog instance 0
    pub fn open(mut csl: C) -> CslResult<Self> {
        let handle = csl.open()?;
        Ok(Wdt {
            csl,
            handle,
            _state: PhantomData,
        })
    }

    /// Load the counter and prescaler
    pub fn configure(mut self, config: WdtConfig) -> CslResult<Wdt<C, Configured>> {
        self.csl.config(&WdtHwConfig {
            counter: config.counter,
            prescale: config.prescale,
        })?;
        Ok(Wdt {
            csl: self.csl,
            handle: self.handle,
            _state: PhantomData,
        })
    }
}

impl<C: WdtCsl, STATE: WdtState> Wdt<C, STATE> {
    /// Register bank of the watchdog
    #[inline]
    pub fn handle(&self) -> RegisterBank {
        self.handle
    }

    /// Release the CSL module without closing the watchdog
    #[inline]
    pub fn free(self) -> C {
        self.csl
    }
}

impl<C: WdtCsl> Wdt<C, Configured> {
    /// Start counting down
    #[inline]
    pub fn start(&mut self) -> CslResult {
        self.csl.start()
    }

    /// Reload the counter
    #[inline]
    pub fn service(&mut self) -> CslResult {
        self.csl.service()
    }

    /// Stop counting
    #[inline]
    pub fn stop(&mut self) -> CslResult {
        self.csl.stop()
    }

    /// Close the watchdog and hand back the CSL module
    pub fn close(mut self) -> CslResult<C> {
        self.csl.close()?;
        Ok(self.csl)
    }
}
