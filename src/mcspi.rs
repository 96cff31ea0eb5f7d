//! Multi-channel SPI (McSPI) master
//!
//! The McSPI is routed to serial port 1 (EBSR serial port 1 mode 1). Each of the four chip
//! select channels can be configured; the configuration is always 8-bit full duplex master,
//! undivided clock, mode 0 style idle low clock with even-edge phase, and both directions on
//! SPIDAT0.
//!
//! Word-at-a-time non-blocking access is available through
//! [`embedded_hal_nb::spi::FullDuplex`].

use crate::csl::CslError;
use crate::debug::{log_failure, NoDebug};
use crate::hw_traits::csl::{
    EbsrField, McSpiChannel, McSpiClockPhase, McSpiCsl, McSpiDataLine, McSpiHwConfig, RegisterBank,
};
use crate::spi::SpiError;
use embedded_hal::spi::ErrorType;
use embedded_hal_nb::spi::FullDuplex;
use ufmt::uWrite;

pub use crate::hw_traits::csl::McSpiOpMode;

/// McSPI driver
pub struct McSpi<C: McSpiCsl, L: uWrite = NoDebug> {
    csl: C,
    handle: RegisterBank,
    debug: L,
}

impl<C: McSpiCsl> McSpi<C, NoDebug> {
    /// Wrap the McSPI CSL module
    pub fn new(csl: C) -> Self {
        McSpi {
            csl,
            handle: RegisterBank::UNMAPPED,
            debug: NoDebug,
        }
    }
}

impl<C: McSpiCsl, L: uWrite> McSpi<C, L> {
    /// Send failure messages to `sink`
    pub fn with_debug<L2: uWrite>(self, sink: L2) -> McSpi<C, L2> {
        McSpi {
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

    /// Initialize and open the module in `mode`, then route it to serial port 1
    pub fn begin(&mut self, mode: McSpiOpMode) -> Result<(), SpiError> {
        let dbg = &mut self.debug;
        log_failure(dbg, self.csl.init(), "begin(): McSPI_init failed")?;
        self.handle = log_failure(dbg, self.csl.open(mode), "begin(): McSPI_open failed")?;
        log_failure(
            dbg,
            self.csl.set_ebsr(EbsrField::Sp1Mode, 1),
            "begin(): SYS_setEBSR failed",
        )?;
        Ok(())
    }

    /// Close the module. The handle is dropped even if closing fails.
    pub fn end(&mut self) -> Result<(), SpiError> {
        let res = log_failure(&mut self.debug, self.csl.close(), "end(): McSPI_close failed");
        self.handle = RegisterBank::UNMAPPED;
        Ok(res?)
    }

    /// Configure chip select `chip_select` (0 to 3). Other values are rejected with
    /// `InvalidParams` before the hardware is touched.
    pub fn config(&mut self, chip_select: u8) -> Result<(), SpiError> {
        let channel = match chip_select {
            0 => McSpiChannel::Ch0,
            1 => McSpiChannel::Ch1,
            2 => McSpiChannel::Ch2,
            3 => McSpiChannel::Ch3,
            _ => {
                return Ok(log_failure(
                    &mut self.debug,
                    Err::<(), _>(CslError::InvalidParams),
                    "config(): invalid chip select",
                )?)
            }
        };

        let config = McSpiHwConfig {
            master: true,
            full_duplex: true,
            word_len: 8,
            data_delay: 0,
            clk_div: 0,
            clk_phase: McSpiClockPhase::Even,
            clk_idle_high: false,
            cs_active_high: false,
            rx_input: McSpiDataLine::Dat0,
            tx_output: McSpiDataLine::Dat0,
            channel,
        };
        Ok(log_failure(
            &mut self.debug,
            self.csl.config(&config),
            "config(): McSPI_config failed",
        )?)
    }

    /// Fill `words` with received data. An empty buffer is rejected with `InvalidParams`.
    pub fn read(&mut self, words: &mut [u16]) -> Result<(), SpiError> {
        let res = if words.is_empty() {
            Err(CslError::InvalidParams)
        } else {
            self.csl.read(words)
        };
        Ok(log_failure(&mut self.debug, res, "read(): McSPI_read failed")?)
    }

    /// Transmit `words`. An empty buffer is rejected with `InvalidParams`.
    pub fn write(&mut self, words: &[u16]) -> Result<(), SpiError> {
        let res = if words.is_empty() {
            Err(CslError::InvalidParams)
        } else {
            self.csl.write(words)
        };
        Ok(log_failure(&mut self.debug, res, "write(): McSPI_write failed")?)
    }

    /// Whether the receive register holds a word
    #[inline]
    pub fn is_rx_full(&mut self) -> bool {
        self.csl.rx_full()
    }

    /// Whether the transmit register can take a word
    #[inline]
    pub fn is_tx_empty(&mut self) -> bool {
        self.csl.tx_empty()
    }
}

impl<C: McSpiCsl, L: uWrite> ErrorType for McSpi<C, L> {
    type Error = SpiError;
}

impl<C: McSpiCsl, L: uWrite> FullDuplex<u16> for McSpi<C, L> {
    fn read(&mut self) -> nb::Result<u16, Self::Error> {
        if !self.csl.rx_full() {
            return Err(nb::Error::WouldBlock);
        }
        let mut word = [0u16];
        self.csl.read(&mut word).map_err(SpiError::from)?;
        Ok(word[0])
    }

    fn write(&mut self, word: u16) -> nb::Result<(), Self::Error> {
        if !self.csl.tx_empty() {
            return Err(nb::Error::WouldBlock);
        }
        self.csl.write(&[word]).map_err(SpiError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{FakeCsl, BANK};

    fn open() -> McSpi<FakeCsl> {
        let mut spi = McSpi::new(FakeCsl::default());
        spi.begin(McSpiOpMode::Polling).unwrap();
        spi
    }

    #[test]
    fn begin_opens_and_routes_serial_port_1() {
        let spi = open();
        assert_eq!(spi.handle(), BANK);
        let csl = spi.free();
        assert_eq!(csl.calls, ["McSPI_init", "McSPI_open", "SYS_setEBSR"]);
        assert_eq!(csl.mcspi_mode, Some(McSpiOpMode::Polling));
        assert_eq!(csl.ebsr, [(EbsrField::Sp1Mode, 1)]);
    }

    #[test]
    fn begin_then_end_unmaps_the_handle() {
        let mut spi = open();
        spi.end().unwrap();
        assert_eq!(spi.handle(), RegisterBank::UNMAPPED);
    }

    #[test]
    fn every_chip_select_can_be_configured() {
        let mut spi = open();
        for cs in 0..=3 {
            spi.config(cs).unwrap();
            assert_eq!(spi.csl.mcspi_config.unwrap().channel as u8, cs);
        }
        let cfg = spi.free().mcspi_config.unwrap();
        assert!(cfg.master && cfg.full_duplex);
        assert_eq!(cfg.word_len, 8);
        assert_eq!(cfg.clk_div, 0);
        assert_eq!(cfg.clk_phase, McSpiClockPhase::Even);
        assert!(!cfg.clk_idle_high && !cfg.cs_active_high);
        assert_eq!((cfg.rx_input, cfg.tx_output), (McSpiDataLine::Dat0, McSpiDataLine::Dat0));
    }

    #[test]
    fn out_of_range_chip_select_is_rejected() {
        let mut spi = open();
        assert_eq!(spi.config(4), Err(SpiError::Csl(CslError::InvalidParams)));
        assert!(!spi.free().called("McSPI_config"));
    }

    #[test]
    fn empty_buffers_are_rejected() {
        let mut spi = open();
        assert_eq!(spi.write(&[]), Err(SpiError::Csl(CslError::InvalidParams)));
        assert_eq!(spi.read(&mut []), Err(SpiError::Csl(CslError::InvalidParams)));
        assert!(!spi.free().called("McSPI_write"));
    }

    #[test]
    fn buffered_read_and_write() {
        let mut spi = McSpi::new(FakeCsl {
            rx: vec![0x11, 0x22],
            ..Default::default()
        });
        spi.begin(McSpiOpMode::Interrupt).unwrap();
        spi.write(&[1, 2, 3]).unwrap();
        let mut buf = [0u16; 2];
        spi.read(&mut buf).unwrap();
        assert_eq!(buf, [0x11, 0x22]);
        assert_eq!(spi.free().written, [1, 2, 3]);
    }

    #[test]
    fn full_duplex_waits_on_status_flags() {
        let mut spi = open();
        assert_eq!(FullDuplex::write(&mut spi, 0x5A), Err(nb::Error::WouldBlock));
        assert_eq!(FullDuplex::read(&mut spi), Err(nb::Error::WouldBlock));

        spi.csl.tx_empty = true;
        assert!(spi.is_tx_empty());
        FullDuplex::write(&mut spi, 0x5A).unwrap();

        spi.csl.rx_full = true;
        assert!(spi.is_rx_full());
        assert_eq!(FullDuplex::read(&mut spi), Ok(0x5A));
    }
}
