//! Successive Approximation Register (SAR) analog to digital converter
//!
//! The SAR converts one of six general purpose analog inputs (GPAIN0 to GPAIN5). The board exposes
//! four of them as analog pins:
//!
//! A0 (channel 0), A1 (channel 3), A2 (channel 4), A3 (channel 5)
//!
//! [`Sar::analog_read`] runs a complete single conversion and leaves the converter shut down.
//! The lower level methods ([`Sar::begin`], [`Sar::config_channel`], ...) expose the individual
//! CSL steps for continuous or interrupt driven use.

use crate::csl::{CslError, CslResult};
use crate::debug::{log_failure, NoDebug};
use crate::hw_traits::csl::{RegisterBank, SarChSetup, SarCsl};
use crate::thermistor::AnalogSource;
use ufmt::uWrite;

pub use crate::hw_traits::csl::{Conversion, SarChannel, SarOpMode, SarReference};

/// Largest conversion result of the 10-bit converter
pub const FULL_SCALE: u16 = 0x3FF;

/// Analog pin on the board header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalogPin {
    /// A0, wired to GPAIN0
    A0 = 0,
    /// A1, wired to GPAIN3
    A1 = 1,
    /// A2, wired to GPAIN4
    A2 = 2,
    /// A3, wired to GPAIN5
    A3 = 3,
}

impl AnalogPin {
    /// Pin for a numeric pin id (0 to 3)
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(AnalogPin::A0),
            1 => Some(AnalogPin::A1),
            2 => Some(AnalogPin::A2),
            3 => Some(AnalogPin::A3),
            _ => None,
        }
    }

    /// SAR channel the pin is wired to
    pub fn channel(self) -> SarChannel {
        match self {
            AnalogPin::A0 => SarChannel::Ch0,
            AnalogPin::A1 => SarChannel::Ch3,
            AnalogPin::A2 => SarChannel::Ch4,
            AnalogPin::A3 => SarChannel::Ch5,
        }
    }
}

/// How long to wait for a conversion before giving up.
///
/// Default: wait forever
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PollLimit {
    /// Poll until the converter reports data. A converter that never finishes hangs the caller.
    #[default]
    Unbounded,
    /// Give up with [`AnalogError::Timeout`] after this many status polls
    Polls(u32),
}

/// SAR configuration applied to every channel setup.
///
/// The default configuration matches the stock Energia core:
/// - analog supply as reference
/// - system clock divided by 0x0B
/// - unbounded ready poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SarConfig {
    /// Reference voltage
    pub reference: SarReference,
    /// System clock divider feeding the converter
    pub sys_clk_div: u16,
    /// Ready poll policy used by [`Sar::analog_read`]
    pub poll_limit: PollLimit,
}

impl Default for SarConfig {
    fn default() -> Self {
        SarConfig {
            reference: SarReference::Vin,
            sys_clk_div: 0x0B,
            poll_limit: PollLimit::Unbounded,
        }
    }
}

/// Analog read errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalogError {
    /// Pin id is not one of A0 to A3
    InvalidPin(u8),
    /// A CSL call failed
    Csl(CslError),
    /// The converter did not report data within the configured poll limit
    Timeout,
}

impl From<CslError> for AnalogError {
    #[inline]
    fn from(err: CslError) -> Self {
        AnalogError::Csl(err)
    }
}

/// SAR driver
pub struct Sar<C: SarCsl, L: uWrite = NoDebug> {
    csl: C,
    handle: RegisterBank,
    config: SarConfig,
    debug: L,
}

impl<C: SarCsl> Sar<C, NoDebug> {
    /// Wrap the SAR CSL module. Nothing is touched until [`begin`](Sar::begin) or
    /// [`analog_read`](Sar::analog_read).
    pub fn new(csl: C) -> Self {
        Sar {
            csl,
            handle: RegisterBank::UNMAPPED,
            config: SarConfig::default(),
            debug: NoDebug,
        }
    }
}

impl<C: SarCsl, L: uWrite> Sar<C, L> {
    /// Replace the configuration
    #[inline]
    pub fn with_config(mut self, config: SarConfig) -> Self {
        self.config = config;
        self
    }

    /// Send failure messages to `sink`
    pub fn with_debug<L2: uWrite>(self, sink: L2) -> Sar<C, L2> {
        Sar {
            csl: self.csl,
            handle: self.handle,
            config: self.config,
            debug: sink,
        }
    }

    /// Register bank of the open channel, unmapped when no channel is open
    #[inline]
    pub fn handle(&self) -> RegisterBank {
        self.handle
    }

    /// Release the CSL module
    #[inline]
    pub fn free(self) -> C {
        self.csl
    }

    /// Initialize the SAR module (`SAR_init`)
    pub fn begin(&mut self) -> CslResult {
        log_failure(&mut self.debug, self.csl.init(), "begin(): SAR init failed")
    }

    /// Close the open channel and shut the SAR module down
    pub fn end(&mut self) -> CslResult {
        log_failure(
            &mut self.debug,
            self.csl.chan_close(),
            "end(): SAR_chanClose failed",
        )?;
        self.handle = RegisterBank::UNMAPPED;
        log_failure(&mut self.debug, self.csl.deinit(), "end(): SAR_deInit failed")
    }

    /// Open `channel` and prepare it for conversions
    pub fn config_channel(
        &mut self,
        op_mode: SarOpMode,
        channel: SarChannel,
        conversion: Conversion,
    ) -> CslResult {
        let dbg = &mut self.debug;
        self.handle = log_failure(
            dbg,
            self.csl.chan_open(channel),
            "configChannel(): SAR_chanOpen failed",
        )?;
        log_failure(dbg, self.csl.chan_init(), "configChannel(): SAR_chanInit failed")?;

        let setup = SarChSetup {
            op_mode,
            multi_channel_discharge: false,
            reference: self.config.reference,
            sys_clk_div: self.config.sys_clk_div,
        };
        log_failure(
            dbg,
            self.csl.chan_setup(&setup),
            "configChannel(): SAR_chanSetup failed",
        )?;
        log_failure(
            dbg,
            self.csl.chan_cyc_set(conversion),
            "configChannel(): SAR_chanCycSet failed",
        )?;
        log_failure(
            dbg,
            self.csl.a2d_meas_param_set(channel),
            "configChannel(): SAR_A2DMeasParamSet failed",
        )
    }

    /// Start converting on the configured channel
    pub fn start_conversion(&mut self) -> CslResult {
        log_failure(
            &mut self.debug,
            self.csl.start_conversion(),
            "startConversion(): SAR_startConversion failed",
        )
    }

    /// Stop a continuous conversion
    pub fn stop_conversion(&mut self) -> CslResult {
        log_failure(
            &mut self.debug,
            self.csl.stop_conversion(),
            "stopConversion(): SAR_stopConversion failed",
        )
    }

    /// Whether a conversion result is waiting. A failed status query counts as not ready.
    pub fn is_ready(&mut self) -> bool {
        log_failure(
            &mut self.debug,
            self.csl.data_available(),
            "getStatus(): SAR_getStatus failed",
        )
        .unwrap_or(false)
    }

    /// Read the latest conversion result
    pub fn read_data(&mut self) -> CslResult<u16> {
        log_failure(
            &mut self.debug,
            self.csl.read_data(),
            "readData(): SAR_readData failed",
        )
    }

    /// Return the conversion result if one is waiting, otherwise `WouldBlock`
    pub fn read_nb(&mut self) -> nb::Result<u16, CslError> {
        let ready = log_failure(
            &mut self.debug,
            self.csl.data_available(),
            "readNb(): SAR_getStatus failed",
        )?;
        if ready {
            Ok(self.read_data()?)
        } else {
            Err(nb::Error::WouldBlock)
        }
    }

    fn poll_status(&mut self) -> CslResult<bool> {
        log_failure(
            &mut self.debug,
            self.csl.data_available(),
            "analogRead(): SAR_getStatus failed",
        )
    }

    fn wait_ready(&mut self) -> Result<(), AnalogError> {
        match self.config.poll_limit {
            PollLimit::Unbounded => loop {
                if self.poll_status()? {
                    return Ok(());
                }
            },
            PollLimit::Polls(limit) => {
                for _ in 0..limit {
                    if self.poll_status()? {
                        return Ok(());
                    }
                }
                log_failure(
                    &mut self.debug,
                    Err(AnalogError::Timeout),
                    "analogRead(): SAR conversion timed out",
                )
            }
        }
    }

    // Every step runs even when an earlier one fails
    fn shutdown(&mut self) {
        self.stop_conversion().ok();
        log_failure(
            &mut self.debug,
            self.csl.chan_close(),
            "analogRead(): SAR_chanClose failed",
        )
        .ok();
        self.handle = RegisterBank::UNMAPPED;
        log_failure(
            &mut self.debug,
            self.csl.deinit(),
            "analogRead(): SAR_deInit failed",
        )
        .ok();
    }

    /// One complete polled conversion of `pin`: init, open and set up the channel, convert,
    /// wait for the result, then close the channel and shut the SAR down.
    ///
    /// When the poll limit runs out the conversion is stopped and the SAR shut down before
    /// [`AnalogError::Timeout`] is returned.
    pub fn read_pin(&mut self, pin: AnalogPin) -> Result<u16, AnalogError> {
        self.begin()?;
        self.config_channel(SarOpMode::Polling, pin.channel(), Conversion::Single)?;
        self.start_conversion()?;
        if let Err(err) = self.wait_ready() {
            if err == AnalogError::Timeout {
                self.shutdown();
            }
            return Err(err);
        }
        let sample = self.read_data()?;
        self.end()?;
        Ok(sample)
    }

    /// [`read_pin`](Self::read_pin) by numeric pin id. Ids other than 0 to 3 are rejected
    /// before the converter is touched.
    pub fn analog_read(&mut self, pin_id: u8) -> Result<u16, AnalogError> {
        let pin = AnalogPin::from_id(pin_id).ok_or(AnalogError::InvalidPin(pin_id))?;
        self.read_pin(pin)
    }

    /// Borrow the converter as a sample source bound to `pin`.
    ///
    /// Samples are 10-bit. A [`Thermistor`](crate::thermistor::Thermistor) fed from this source
    /// needs `full_scale` set to [`FULL_SCALE`], since its default is the 12-bit `0xFFF`.
    pub fn input(&mut self, pin: AnalogPin) -> AnalogInput<'_, C, L> {
        AnalogInput { sar: self, pin }
    }
}

/// A [`Sar`] bound to one analog pin
pub struct AnalogInput<'a, C: SarCsl, L: uWrite> {
    sar: &'a mut Sar<C, L>,
    pin: AnalogPin,
}

impl<C: SarCsl, L: uWrite> AnalogSource for AnalogInput<'_, C, L> {
    type Error = AnalogError;

    fn sample(&mut self) -> Result<u16, Self::Error> {
        self.sar.read_pin(self.pin)
    }
}
