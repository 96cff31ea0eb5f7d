//! SPI master
//!
//! Blocking SPI over the CSL `SPI_*` module, wired to the parallel port pins (EBSR parallel port
//! mode 1). Transfers are polled. The bus always talks to chip select 0.
//!
//! Besides the byte-oriented [`Spi::transfer`], the driver implements
//! [`embedded_hal::spi::SpiBus`] for 16-bit words.

use crate::csl::{CslError, CslResult};
use crate::debug::{log_failure, NoDebug};
use crate::hw_traits::csl::{
    EbsrField, RegisterBank, SpiChipSelect, SpiClockPhase, SpiClockPolarity, SpiCsl, SpiHwConfig,
    SpiTransferMode, SpiWordLength,
};
use embedded_hal::spi::{ErrorKind, ErrorType, Mode, Phase, Polarity, SpiBus};
use ufmt::uWrite;

pub use crate::hw_traits::csl::SpiHwConfig as SpiConfig;
pub use embedded_hal::spi::{MODE_0, MODE_1, MODE_2, MODE_3};

/// SPI clock divider
///
/// Default: divide by 128
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ClockDivider {
    /// Divide by 2
    Div2 = 2,
    /// Divide by 4
    Div4 = 4,
    /// Divide by 8
    Div8 = 8,
    /// Divide by 16
    Div16 = 16,
    /// Divide by 32
    Div32 = 32,
    /// Divide by 64
    Div64 = 64,
    /// Divide by 128
    #[default]
    Div128 = 128,
}

/// Order bits are shifted out in by [`Spi::transfer`]
///
/// Default: MSB first
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum BitOrder {
    /// Least significant bit first
    LsbFirst,
    /// Most significant bit first
    #[default]
    MsbFirst,
}

impl Default for SpiHwConfig {
    /// Divide by 128, 8-bit words, one word per frame, word interrupt only, CS0 active low,
    /// no data delay, SPI mode 0.
    fn default() -> Self {
        SpiHwConfig {
            clk_div: ClockDivider::default() as u16,
            word_len: SpiWordLength::_8,
            frame_len: 1,
            word_irq: true,
            frame_irq: false,
            chip_select: SpiChipSelect::Cs0,
            data_delay: 0,
            cs_active_high: false,
            clk_pol: SpiClockPolarity::LowAtIdle,
            clk_phase: SpiClockPhase::FallEdge,
        }
    }
}

/// SPI errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpiError {
    /// A CSL call failed
    Csl(CslError),
}

impl From<CslError> for SpiError {
    #[inline]
    fn from(err: CslError) -> Self {
        SpiError::Csl(err)
    }
}

impl embedded_hal::spi::Error for SpiError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// SPI bus driver
pub struct Spi<C: SpiCsl, L: uWrite = NoDebug> {
    csl: C,
    handle: RegisterBank,
    config: SpiHwConfig,
    order: BitOrder,
    debug: L,
}

impl<C: SpiCsl> Spi<C, NoDebug> {
    /// Wrap the SPI CSL module. Call [`begin`](Spi::begin) before transferring.
    pub fn new(csl: C) -> Self {
        Spi {
            csl,
            handle: RegisterBank::UNMAPPED,
            config: SpiHwConfig::default(),
            order: BitOrder::default(),
            debug: NoDebug,
        }
    }
}

impl<C: SpiCsl, L: uWrite> Spi<C, L> {
    /// Send failure messages to `sink`
    pub fn with_debug<L2: uWrite>(self, sink: L2) -> Spi<C, L2> {
        Spi {
            csl: self.csl,
            handle: self.handle,
            config: self.config,
            order: self.order,
            debug: sink,
        }
    }

    /// Register bank of the open instance, unmapped when closed
    #[inline]
    pub fn handle(&self) -> RegisterBank {
        self.handle
    }

    /// Configuration last written to the hardware
    #[inline]
    pub fn config(&self) -> &SpiConfig {
        &self.config
    }

    /// Release the CSL module
    #[inline]
    pub fn free(self) -> C {
        self.csl
    }

    /// Initialize the module, route it to the parallel port, open chip select 0 in polled mode
    /// and apply the default configuration
    pub fn begin(&mut self) -> Result<(), SpiError> {
        let dbg = &mut self.debug;
        log_failure(dbg, self.csl.init(), "begin(): SPI initialization failed")?;
        log_failure(
            dbg,
            self.csl.set_ebsr(EbsrField::PpMode, 1),
            "begin(): SYS_setEBSR failed",
        )?;
        self.handle = log_failure(
            dbg,
            self.csl.open(SpiChipSelect::Cs0, SpiTransferMode::Polling),
            "begin(): SPI instance open failed",
        )?;

        self.config = SpiHwConfig::default();
        log_failure(
            dbg,
            self.csl.config(&self.config),
            "begin(): SPI instance configuration failed",
        )?;
        Ok(())
    }

    /// Shut the module down and close the instance. The handle is dropped even if closing fails.
    pub fn end(&mut self) -> Result<(), SpiError> {
        log_failure(
            &mut self.debug,
            self.csl.deinit(),
            "end(): SPI instance de-initialization failed",
        )?;
        let res = log_failure(
            &mut self.debug,
            self.csl.close(),
            "end(): SPI instance close failed",
        );
        self.handle = RegisterBank::UNMAPPED;
        Ok(res?)
    }

    fn apply(&mut self, what: &str) -> CslResult {
        log_failure(&mut self.debug, self.csl.config(&self.config), what)
    }

    /// Change the SPI clock divider
    pub fn set_clock_divider(&mut self, divider: ClockDivider) -> Result<(), SpiError> {
        self.config.clk_div = divider as u16;
        Ok(self.apply("setClockDivider(): SPI_config failed")?)
    }

    /// Change clock polarity and phase
    pub fn set_data_mode(&mut self, mode: Mode) -> Result<(), SpiError> {
        self.config.clk_pol = match mode.polarity {
            Polarity::IdleLow => SpiClockPolarity::LowAtIdle,
            Polarity::IdleHigh => SpiClockPolarity::HighAtIdle,
        };
        self.config.clk_phase = match mode.phase {
            Phase::CaptureOnFirstTransition => SpiClockPhase::FallEdge,
            Phase::CaptureOnSecondTransition => SpiClockPhase::RiseEdge,
        };
        Ok(self.apply("setDataMode(): SPI_config failed")?)
    }

    /// Internally connect transmit to receive
    #[inline]
    pub fn set_loopback(&mut self, enable: bool) {
        self.csl.set_loopback(enable);
    }

    /// Bit order used by [`transfer`](Self::transfer)
    #[inline]
    pub fn set_bit_order(&mut self, order: BitOrder) {
        self.order = order;
    }

    #[inline]
    fn ordered(&self, byte: u8) -> u8 {
        match self.order {
            BitOrder::MsbFirst => byte,
            BitOrder::LsbFirst => byte.reverse_bits(),
        }
    }

    /// Send one byte and return the byte received in exchange.
    ///
    /// The bus runs with 8-bit words, so only the low byte of the received word carries data
    /// and the rest is dropped. Use [`SpiBus`] for 16-bit access.
    pub fn transfer(&mut self, byte: u8) -> Result<u8, SpiError> {
        let word = self.exchange(u16::from(self.ordered(byte)))?;
        Ok(self.ordered(word as u8))
    }

    fn exchange(&mut self, out: u16) -> Result<u16, SpiError> {
        log_failure(
            &mut self.debug,
            self.csl.write_words(&[out]),
            "transfer(): SPI write failed",
        )?;
        let mut word = [0u16];
        log_failure(
            &mut self.debug,
            self.csl.read_words(&mut word),
            "transfer(): SPI read failed",
        )?;
        Ok(word[0])
    }

    /// Write a buffer of words. An empty buffer is rejected with `InvalidParams`.
    pub fn write(&mut self, words: &[u16]) -> Result<(), SpiError> {
        if words.is_empty() {
            return Ok(log_failure(
                &mut self.debug,
                Err::<(), _>(CslError::InvalidParams),
                "write(): invalid parameter",
            )?);
        }
        Ok(log_failure(
            &mut self.debug,
            self.csl.write_words(words),
            "write(): SPI write failed",
        )?)
    }

    /// Fill a buffer with received words. An empty buffer is rejected with `InvalidParams`.
    pub fn read(&mut self, words: &mut [u16]) -> Result<(), SpiError> {
        if words.is_empty() {
            return Ok(log_failure(
                &mut self.debug,
                Err::<(), _>(CslError::InvalidParams),
                "read(): invalid parameter",
            )?);
        }
        Ok(log_failure(
            &mut self.debug,
            self.csl.read_words(words),
            "read(): SPI read failed",
        )?)
    }
}

impl<C: SpiCsl, L: uWrite> ErrorType for Spi<C, L> {
    type Error = SpiError;
}

impl<C: SpiCsl, L: uWrite> SpiBus<u16> for Spi<C, L> {
    fn read(&mut self, words: &mut [u16]) -> Result<(), Self::Error> {
        if words.is_empty() {
            return Ok(());
        }
        Spi::read(self, words)
    }

    fn write(&mut self, words: &[u16]) -> Result<(), Self::Error> {
        if words.is_empty() {
            return Ok(());
        }
        Spi::write(self, words)
    }

    fn transfer(&mut self, read: &mut [u16], write: &[u16]) -> Result<(), Self::Error> {
        for i in 0..read.len().max(write.len()) {
            let word = self.exchange(write.get(i).copied().unwrap_or(0))?;
            if let Some(slot) = read.get_mut(i) {
                *slot = word;
            }
        }
        Ok(())
    }

    fn transfer_in_place(&mut self, words: &mut [u16]) -> Result<(), Self::Error> {
        for word in words.iter_mut() {
            *word = self.exchange(*word)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
