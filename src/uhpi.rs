//! Universal Host Port Interface (UHPI)
//!
//! Lets an external host read and write DSP memory over the parallel port (EBSR parallel port
//! mode 0). The bus always runs 16-bit multiplexed with single full-word cycles.

use crate::csl::CslResult;
use crate::debug::{log_failure, NoDebug};
use crate::hw_traits::csl::{EbsrField, RegisterBank, UhpiCsl, UhpiSetup};
use ufmt::uWrite;

pub use crate::hw_traits::csl::UhpiOpMode;

/// UHPI driver
pub struct Uhpi<C: UhpiCsl, L: uWrite = NoDebug> {
    csl: C,
    handle: RegisterBank,
    debug: L,
}

impl<C: UhpiCsl> Uhpi<C, NoDebug> {
    /// Wrap the UHPI CSL module
    pub fn new(csl: C) -> Self {
        Uhpi {
            csl,
            handle: RegisterBank::UNMAPPED,
            debug: NoDebug,
        }
    }
}

impl<C: UhpiCsl, L: uWrite> Uhpi<C, L> {
    /// Send failure messages to `sink`
    pub fn with_debug<L2: uWrite>(self, sink: L2) -> Uhpi<C, L2> {
        Uhpi {
            csl: self.csl,
            handle: self.handle,
            debug: sink,
        }
    }

    /// Register bank of the open instance, unmapped when closed
    #[inline]
    pub fn handle(&self) -> RegisterBank {
        self.handle
    }

    /// Release the CSL module
    #[inline]
    pub fn free(self) -> C {
        self.csl
    }

    /// Open UHPI instance 0 and hand the parallel port pins to it
    pub fn begin(&mut self) -> CslResult {
        self.handle = log_failure(&mut self.debug, self.csl.open(), "begin(): UHPI_open failed")?;
        log_failure(
            &mut self.debug,
            self.csl.set_ebsr(EbsrField::PpMode, 0),
            "begin(): SYS_setEBSR failed",
        )
    }

    /// Close the instance. The handle is only dropped if closing succeeds.
    pub fn end(&mut self) -> CslResult {
        log_failure(&mut self.debug, self.csl.close(), "end(): UHPI_Close failed")?;
        self.handle = RegisterBank::UNMAPPED;
        Ok(())
    }

    /// Set up the host port, optionally raising GPIO interrupts on host accesses
    pub fn config(&mut self, gpio_interrupt: bool) -> CslResult {
        let setup = UhpiSetup {
            op_mode: UhpiOpMode::Muxed16BitSingleFullword,
            gpio_interrupt,
        };
        log_failure(
            &mut self.debug,
            self.csl.config(&setup),
            "config(): UHPI_Config failed",
        )
    }
}
