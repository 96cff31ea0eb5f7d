//! Chip Support Library entry points used by the C5535 drivers.
//!
//! Each trait mirrors the subset of one CSL module that its driver calls. A board crate implements
//! them once (normally by forwarding to the vendor library) and hands the implementation to the
//! driver, which then owns it for as long as the peripheral is in use.

use crate::csl::CslResult;

/// Register-bank base addresses held by an open CSL handle.
///
/// A handle that has never been opened, or has been closed, is unmapped (both addresses zero).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RegisterBank {
    /// Base address of the peripheral register overlay
    pub regs: u32,
    /// Base address of the system control register overlay
    pub sys_regs: u32,
}

impl RegisterBank {
    /// Handle with no register bank behind it
    pub const UNMAPPED: RegisterBank = RegisterBank {
        regs: 0,
        sys_regs: 0,
    };

    /// Whether the handle points at a register bank.
    #[inline]
    pub fn is_mapped(&self) -> bool {
        self.regs != 0 || self.sys_regs != 0
    }
}

/// External bus selection register fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EbsrField {
    /// Parallel port pin mode (`PPMODE`)
    PpMode,
    /// Serial port 1 pin mode (`SP1MODE`)
    Sp1Mode,
}

/// System controller, shared by every driver that muxes external pins.
pub trait SysCtrl {
    /// `SYS_setEBSR`
    fn set_ebsr(&mut self, field: EbsrField, mode: u16) -> CslResult;
}

// ---------------------------------------------------------------------------------------------
// SAR

/// SAR input channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SarChannel {
    /// GPAIN0
    Ch0 = 0,
    /// GPAIN1
    Ch1 = 1,
    /// GPAIN2
    Ch2 = 2,
    /// GPAIN3
    Ch3 = 3,
    /// GPAIN4
    Ch4 = 4,
    /// GPAIN5
    Ch5 = 5,
}

impl SarChannel {
    /// Channel for a raw channel number.
    pub fn from_index(idx: u8) -> Option<Self> {
        match idx {
            0 => Some(SarChannel::Ch0),
            1 => Some(SarChannel::Ch1),
            2 => Some(SarChannel::Ch2),
            3 => Some(SarChannel::Ch3),
            4 => Some(SarChannel::Ch4),
            5 => Some(SarChannel::Ch5),
            _ => None,
        }
    }
}

/// How the SAR signals a finished conversion
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SarOpMode {
    /// Status polled by the CPU
    #[default]
    Polling = 0,
    /// Conversion-done interrupt
    Interrupt = 1,
    /// Results moved by DMA
    Dma = 2,
}

/// SAR reference voltage
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SarReference {
    /// Reference is the analog supply (`CSL_SAR_REF_VIN`)
    #[default]
    Vin,
    /// Internal bandgap reference, 0.8 V
    Bandgap0V8,
    /// Internal bandgap reference, 1.0 V
    Bandgap1V0,
}

/// Conversion cycling
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// Convert back to back until stopped
    Continuous = 0,
    /// Convert once per start
    #[default]
    Single = 1,
}

/// Channel setup passed to `SAR_chanSetup`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SarChSetup {
    /// How conversion completion is signalled
    pub op_mode: SarOpMode,
    /// Discharge the sample capacitor between channels
    pub multi_channel_discharge: bool,
    /// Reference voltage
    pub reference: SarReference,
    /// System clock divider feeding the converter
    pub sys_clk_div: u16,
}

/// SAR module of the CSL
pub trait SarCsl {
    /// `SAR_init`
    fn init(&mut self) -> CslResult;
    /// `SAR_deInit`
    fn deinit(&mut self) -> CslResult;
    /// `SAR_chanOpen`, returns the register bank behind the channel handle
    fn chan_open(&mut self, channel: SarChannel) -> CslResult<RegisterBank>;
    /// `SAR_chanInit`
    fn chan_init(&mut self) -> CslResult;
    /// `SAR_chanSetup`
    fn chan_setup(&mut self, setup: &SarChSetup) -> CslResult;
    /// `SAR_chanCycSet`
    fn chan_cyc_set(&mut self, conversion: Conversion) -> CslResult;
    /// Route `channel` to the converter for a keypad-style measurement (`SAR_A2DMeasParamSet`)
    fn a2d_meas_param_set(&mut self, channel: SarChannel) -> CslResult;
    /// `SAR_startConversion`
    fn start_conversion(&mut self) -> CslResult;
    /// `SAR_stopConversion`
    fn stop_conversion(&mut self) -> CslResult;
    /// `SAR_getStatus`, `true` once data is available
    fn data_available(&mut self) -> CslResult<bool>;
    /// `SAR_readData`
    fn read_data(&mut self) -> CslResult<u16>;
    /// `SAR_chanClose`
    fn chan_close(&mut self) -> CslResult;
}

// ---------------------------------------------------------------------------------------------
// SPI

/// SPI chip select line
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SpiChipSelect {
    /// CS0
    #[default]
    Cs0 = 0,
    /// CS1
    Cs1 = 1,
    /// CS2
    Cs2 = 2,
    /// CS3
    Cs3 = 3,
}

/// How SPI transfers are completed
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SpiTransferMode {
    /// CPU polls for completion
    #[default]
    Polling,
    /// Completion interrupts
    Interrupt,
}

/// SPI word length
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SpiWordLength {
    /// 8-bit words
    #[default]
    _8 = 8,
    /// 16-bit words
    _16 = 16,
    /// 32-bit words
    _32 = 32,
}

/// SCLK level while idle
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SpiClockPolarity {
    /// Low at idle (CPOL = 0)
    #[default]
    LowAtIdle,
    /// High at idle (CPOL = 1)
    HighAtIdle,
}

/// SCLK edge data is shifted on
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SpiClockPhase {
    /// CPHA = 0
    #[default]
    FallEdge,
    /// CPHA = 1
    RiseEdge,
}

/// Register configuration passed to `SPI_config`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpiHwConfig {
    /// SPI clock divider
    pub clk_div: u16,
    /// Word length
    pub word_len: SpiWordLength,
    /// Words per frame
    pub frame_len: u16,
    /// Word-complete interrupt enable
    pub word_irq: bool,
    /// Frame-complete interrupt enable
    pub frame_irq: bool,
    /// Chip select used for transfers
    pub chip_select: SpiChipSelect,
    /// Data delay in SCLK cycles, 0 to 3
    pub data_delay: u8,
    /// Chip select asserted high instead of low
    pub cs_active_high: bool,
    /// Clock polarity
    pub clk_pol: SpiClockPolarity,
    /// Clock phase
    pub clk_phase: SpiClockPhase,
}

/// SPI module of the CSL
pub trait SpiCsl: SysCtrl {
    /// `SPI_init`
    fn init(&mut self) -> CslResult;
    /// `SPI_deInit`
    fn deinit(&mut self) -> CslResult;
    /// `SPI_open`. A null handle is reported as `CslError::BadHandle`.
    fn open(&mut self, cs: SpiChipSelect, mode: SpiTransferMode) -> CslResult<RegisterBank>;
    /// `SPI_close`
    fn close(&mut self) -> CslResult;
    /// `SPI_config`
    fn config(&mut self, config: &SpiHwConfig) -> CslResult;
    /// `SPI_setLoopBackMode`
    fn set_loopback(&mut self, enable: bool);
    /// `SPI_dataTransaction` in write direction
    fn write_words(&mut self, words: &[u16]) -> CslResult;
    /// `SPI_dataTransaction` in read direction
    fn read_words(&mut self, words: &mut [u16]) -> CslResult;
}

// ---------------------------------------------------------------------------------------------
// McSPI

/// McSPI operating mode
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum McSpiOpMode {
    /// Polled transfers
    #[default]
    Polling = 0,
    /// Interrupt driven transfers
    Interrupt = 1,
    /// DMA driven transfers
    Dma = 2,
}

/// McSPI chip select channel
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum McSpiChannel {
    /// Channel 0
    #[default]
    Ch0 = 0,
    /// Channel 1
    Ch1 = 1,
    /// Channel 2
    Ch2 = 2,
    /// Channel 3
    Ch3 = 3,
}

/// McSPI SCLK phase
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum McSpiClockPhase {
    /// Data latched on odd-numbered edges
    Odd,
    /// Data latched on even-numbered edges
    #[default]
    Even,
}

/// McSPI data line selection
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum McSpiDataLine {
    /// SPIDAT0
    #[default]
    Dat0,
    /// SPIDAT1
    Dat1,
}

/// Hardware configuration applied by `McSPI_config`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct McSpiHwConfig {
    /// Master (`true`) or slave
    pub master: bool,
    /// Full duplex (`true`) or half duplex
    pub full_duplex: bool,
    /// Word length in bits
    pub word_len: u8,
    /// Data delay in SCLK cycles
    pub data_delay: u8,
    /// Clock divider field (`CLKD`), 0 divides by 1
    pub clk_div: u8,
    /// Clock phase
    pub clk_phase: McSpiClockPhase,
    /// SCLK idles high
    pub clk_idle_high: bool,
    /// Chip select asserted high instead of low
    pub cs_active_high: bool,
    /// Line sampled for received data
    pub rx_input: McSpiDataLine,
    /// Line driven with transmitted data
    pub tx_output: McSpiDataLine,
    /// Chip select channel the configuration applies to
    pub channel: McSpiChannel,
}

/// McSPI module of the CSL
pub trait McSpiCsl: SysCtrl {
    /// `McSPI_init`
    fn init(&mut self) -> CslResult;
    /// `McSPI_open`. A null handle is reported as `CslError::BadHandle`.
    fn open(&mut self, mode: McSpiOpMode) -> CslResult<RegisterBank>;
    /// `McSPI_close`
    fn close(&mut self) -> CslResult;
    /// `McSPI_config`
    fn config(&mut self, config: &McSpiHwConfig) -> CslResult;
    /// `McSPI_read`
    fn read(&mut self, words: &mut [u16]) -> CslResult;
    /// `McSPI_write`
    fn write(&mut self, words: &[u16]) -> CslResult;
    /// `McSPI_RxFullInt_Chk`
    fn rx_full(&mut self) -> bool;
    /// `McSPI_TxEmptyInt_Chk`
    fn tx_empty(&mut self) -> bool;
}

// ---------------------------------------------------------------------------------------------
// PLL

/// PLL control register values, as written by `PLL_config`
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PllConfig {
    /// PLL control 1: multiplier `M` in bits 0..12
    pub pllcntl1: u16,
    /// PLL input control: reference divider ratio in bits 0..12, bypass in bit 15
    pub pllincntl: u16,
    /// PLL control 2
    pub pllcntl2: u16,
    /// PLL output control: output divider ratio in bits 0..9, divider enable in bit 9
    pub plloutcntl: u16,
}

/// Reference clock feeding the PLL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PllInput {
    /// 12 MHz CLKIN pin
    ClkIn,
    /// 32.768 kHz RTC oscillator
    RtcIn,
}

/// PLL module of the CSL
pub trait PllCsl {
    /// `PLL_init` for instance 0
    fn init(&mut self) -> CslResult<RegisterBank>;
    /// `PLL_reset`
    fn reset(&mut self) -> CslResult;
    /// `PLL_config`
    fn config(&mut self, config: &PllConfig) -> CslResult;
    /// `PLL_getConfig`
    fn get_config(&mut self) -> CslResult<PllConfig>;
    /// `PLL_enable`
    fn enable(&mut self) -> CslResult;
    /// Reference clock currently selected (`CCR2.CLKSELSTAT`)
    fn input(&mut self) -> PllInput;
}

// ---------------------------------------------------------------------------------------------
// UHPI

/// UHPI bus operating mode
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum UhpiOpMode {
    /// 8-bit multiplexed bus
    Muxed8Bit,
    /// 16-bit multiplexed bus, two half-word cycles per access
    Muxed16BitDualHalfword,
    /// 16-bit multiplexed bus, one full-word cycle per access
    #[default]
    Muxed16BitSingleFullword,
    /// 16-bit non-multiplexed bus
    NonMuxed16Bit,
}

/// Setup passed to `UHPI_Config`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UhpiSetup {
    /// Bus mode
    pub op_mode: UhpiOpMode,
    /// Raise GPIO interrupts on host accesses
    pub gpio_interrupt: bool,
}

/// UHPI module of the CSL
pub trait UhpiCsl: SysCtrl {
    /// `UHPI_open` for instance 0. A null handle is reported as `CslError::BadHandle`.
    fn open(&mut self) -> CslResult<RegisterBank>;
    /// `UHPI_Close`
    fn close(&mut self) -> CslResult;
    /// `UHPI_Config`
    fn config(&mut self, setup: &UhpiSetup) -> CslResult;
}

// ---------------------------------------------------------------------------------------------
// GPT

/// General purpose timer instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GptInstance {
    /// GPT0
    Gpt0 = 0,
    /// GPT1
    Gpt1 = 1,
    /// GPT2
    Gpt2 = 2,
}

/// Register configuration passed to `GPT_config`
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GptHwConfig {
    /// Reload the period when the count expires
    pub auto_reload: bool,
    /// Prescaler field, `0..=12` divides the clock by `2 << field`
    pub prescale: u16,
    /// Timer enabled
    pub enabled: bool,
    /// Low word of the period
    pub period_low: u16,
    /// High word of the period
    pub period_high: u16,
}

/// GPT module of the CSL
pub trait GptCsl {
    /// `GPT_open`
    fn open(&mut self, instance: GptInstance) -> CslResult<RegisterBank>;
    /// `GPT_reset`
    fn reset(&mut self, instance: GptInstance) -> CslResult;
    /// `GPT_config`
    fn config(&mut self, instance: GptInstance, config: &GptHwConfig) -> CslResult;
    /// `GPT_start`
    fn start(&mut self, instance: GptInstance) -> CslResult;
    /// `GPT_stop`
    fn stop(&mut self, instance: GptInstance) -> CslResult;
    /// `GPT_getCnt`
    fn count(&mut self, instance: GptInstance) -> CslResult<u32>;
    /// `GPT_close`
    fn close(&mut self, instance: GptInstance) -> CslResult;
    /// Acknowledge all pending timer interrupts (`TIAFR`)
    fn clear_interrupts(&mut self);
}

// ---------------------------------------------------------------------------------------------
// WDT

/// Watchdog counter settings passed to `WDTIM_config`
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WdtHwConfig {
    /// Count loaded on every kick
    pub counter: u16,
    /// Prescaler
    pub prescale: u16,
}

/// Watchdog module of the CSL
pub trait WdtCsl {
    /// `WDTIM_open` for instance 0
    fn open(&mut self) -> CslResult<RegisterBank>;
    /// `WDTIM_config`
    fn config(&mut self, config: &WdtHwConfig) -> CslResult;
    /// `WDTIM_service`
    fn service(&mut self) -> CslResult;
    /// `WDTIM_start`
    fn start(&mut self) -> CslResult;
    /// `WDTIM_stop`
    fn stop(&mut self) -> CslResult;
    /// `WDTIM_close`
    fn close(&mut self) -> CslResult;
}
