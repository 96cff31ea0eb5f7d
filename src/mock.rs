//! Host-side fakes for every hardware seam, used by the unit tests.

use core::cell::Cell;
#[cfg(feature = "debug_msg")]
use core::convert::Infallible;
#[cfg(feature = "debug_msg")]
use std::string::String;
use std::vec::Vec;

use crate::csl::{CslError, CslResult};
use crate::hw_traits::cc430::*;
use crate::hw_traits::csl::*;

// Critical sections on the host only track nesting depth, so tests can check that flash is
// programmed with interrupts masked.
struct TestCs;
critical_section::set_impl!(TestCs);

std::thread_local! {
    static CS_DEPTH: Cell<u32> = const { Cell::new(0) };
}

unsafe impl critical_section::Impl for TestCs {
    unsafe fn acquire() -> critical_section::RawRestoreState {
        CS_DEPTH.with(|d| d.set(d.get() + 1));
    }

    unsafe fn release(_: critical_section::RawRestoreState) {
        CS_DEPTH.with(|d| d.set(d.get() - 1));
    }
}

/// True while the current thread is inside `critical_section::with`.
pub fn interrupts_masked() -> bool {
    CS_DEPTH.with(|d| d.get() > 0)
}

/// Debug sink that keeps everything written to it.
#[cfg(feature = "debug_msg")]
#[derive(Default)]
pub struct Captured(pub String);

#[cfg(feature = "debug_msg")]
impl ufmt::uWrite for Captured {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Infallible> {
        self.0.push_str(s);
        Ok(())
    }
}

/// Register bank handed out by every successful open.
pub const BANK: RegisterBank = RegisterBank {
    regs: 0x7000,
    sys_regs: 0x1C00,
};

/// Scriptable stand-in for the vendor CSL.
///
/// Every entry point is recorded under its CSL name. `fail_on` makes one entry point return an
/// error; everything else succeeds.
#[derive(Default)]
pub struct FakeCsl {
    pub calls: Vec<&'static str>,
    pub fail_on: Option<(&'static str, CslError)>,

    pub ebsr: Vec<(EbsrField, u16)>,

    pub sar_channel: Option<SarChannel>,
    pub sar_setup: Option<SarChSetup>,
    pub sar_cycle: Option<Conversion>,
    pub meas_channel: Option<SarChannel>,
    // `SAR_getStatus` reports busy this many times before data is available
    pub busy_polls: u32,
    pub never_ready: bool,
    pub polls: u32,
    pub sample: u16,

    pub spi_open: Option<(SpiChipSelect, SpiTransferMode)>,
    pub spi_config: Option<SpiHwConfig>,
    pub loopback: bool,
    pub written: Vec<u16>,
    pub rx: Vec<u16>,

    pub mcspi_mode: Option<McSpiOpMode>,
    pub mcspi_config: Option<McSpiHwConfig>,
    pub rx_full: bool,
    pub tx_empty: bool,

    pub pll: PllConfig,
    pub pll_input: Option<PllInput>,

    pub uhpi_setup: Option<UhpiSetup>,

    pub gpt_instance: Option<GptInstance>,
    pub gpt_config: Option<GptHwConfig>,
    pub gpt_count: u32,
    pub gpt_irq_cleared: u32,

    pub wdt_config: Option<WdtHwConfig>,
}

impl FakeCsl {
    pub fn failing(op: &'static str, err: CslError) -> Self {
        FakeCsl {
            fail_on: Some((op, err)),
            ..Default::default()
        }
    }

    fn op(&mut self, name: &'static str) -> CslResult {
        self.calls.push(name);
        match self.fail_on {
            Some((failing, err)) if failing == name => Err(err),
            _ => Ok(()),
        }
    }

    fn open_op(&mut self, name: &'static str) -> CslResult<RegisterBank> {
        self.op(name).map(|_| BANK)
    }

    pub fn called(&self, name: &str) -> bool {
        self.calls.iter().any(|c| *c == name)
    }

    // Pops queued receive words, then falls back to echoing what was written last.
    fn next_rx(&mut self) -> u16 {
        if self.rx.is_empty() {
            self.written.last().copied().unwrap_or(0)
        } else {
            self.rx.remove(0)
        }
    }
}

impl SysCtrl for FakeCsl {
    fn set_ebsr(&mut self, field: EbsrField, mode: u16) -> CslResult {
        self.op("SYS_setEBSR")?;
        self.ebsr.push((field, mode));
        Ok(())
    }
}

impl SarCsl for FakeCsl {
    fn init(&mut self) -> CslResult {
        self.op("SAR_init")
    }
    fn deinit(&mut self) -> CslResult {
        self.op("SAR_deInit")
    }
    fn chan_open(&mut self, channel: SarChannel) -> CslResult<RegisterBank> {
        let bank = self.open_op("SAR_chanOpen")?;
        self.sar_channel = Some(channel);
        Ok(bank)
    }
    fn chan_init(&mut self) -> CslResult {
        self.op("SAR_chanInit")
    }
    fn chan_setup(&mut self, setup: &SarChSetup) -> CslResult {
        self.op("SAR_chanSetup")?;
        self.sar_setup = Some(*setup);
        Ok(())
    }
    fn chan_cyc_set(&mut self, conversion: Conversion) -> CslResult {
        self.op("SAR_chanCycSet")?;
        self.sar_cycle = Some(conversion);
        Ok(())
    }
    fn a2d_meas_param_set(&mut self, channel: SarChannel) -> CslResult {
        self.op("SAR_A2DMeasParamSet")?;
        self.meas_channel = Some(channel);
        Ok(())
    }
    fn start_conversion(&mut self) -> CslResult {
        self.op("SAR_startConversion")
    }
    fn stop_conversion(&mut self) -> CslResult {
        self.op("SAR_stopConversion")
    }
    fn data_available(&mut self) -> CslResult<bool> {
        // Polls are counted without logging to keep call logs readable
        self.polls += 1;
        if let Some(("SAR_getStatus", err)) = self.fail_on {
            return Err(err);
        }
        Ok(!self.never_ready && self.polls > self.busy_polls)
    }
    fn read_data(&mut self) -> CslResult<u16> {
        self.op("SAR_readData")?;
        Ok(self.sample)
    }
    fn chan_close(&mut self) -> CslResult {
        self.op("SAR_chanClose")
    }
}

impl SpiCsl for FakeCsl {
    fn init(&mut self) -> CslResult {
        self.op("SPI_init")
    }
    fn deinit(&mut self) -> CslResult {
        self.op("SPI_deInit")
    }
    fn open(&mut self, cs: SpiChipSelect, mode: SpiTransferMode) -> CslResult<RegisterBank> {
        let bank = self.open_op("SPI_open")?;
        self.spi_open = Some((cs, mode));
        Ok(bank)
    }
    fn close(&mut self) -> CslResult {
        self.op("SPI_close")
    }
    fn config(&mut self, config: &SpiHwConfig) -> CslResult {
        self.op("SPI_config")?;
        self.spi_config = Some(*config);
        Ok(())
    }
    fn set_loopback(&mut self, enable: bool) {
        self.calls.push("SPI_setLoopBackMode");
        self.loopback = enable;
    }
    fn write_words(&mut self, words: &[u16]) -> CslResult {
        self.op("SPI_write")?;
        self.written.extend_from_slice(words);
        Ok(())
    }
    fn read_words(&mut self, words: &mut [u16]) -> CslResult {
        self.op("SPI_read")?;
        for w in words.iter_mut() {
            *w = self.next_rx();
        }
        Ok(())
    }
}

impl McSpiCsl for FakeCsl {
    fn init(&mut self) -> CslResult {
        self.op("McSPI_init")
    }
    fn open(&mut self, mode: McSpiOpMode) -> CslResult<RegisterBank> {
        let bank = self.open_op("McSPI_open")?;
        self.mcspi_mode = Some(mode);
        Ok(bank)
    }
    fn close(&mut self) -> CslResult {
        self.op("McSPI_close")
    }
    fn config(&mut self, config: &McSpiHwConfig) -> CslResult {
        self.op("McSPI_config")?;
        self.mcspi_config = Some(*config);
        Ok(())
    }
    fn read(&mut self, words: &mut [u16]) -> CslResult {
        self.op("McSPI_read")?;
        for w in words.iter_mut() {
            *w = self.next_rx();
        }
        Ok(())
    }
    fn write(&mut self, words: &[u16]) -> CslResult {
        self.op("McSPI_write")?;
        self.written.extend_from_slice(words);
        Ok(())
    }
    fn rx_full(&mut self) -> bool {
        self.rx_full
    }
    fn tx_empty(&mut self) -> bool {
        self.tx_empty
    }
}

impl PllCsl for FakeCsl {
    fn init(&mut self) -> CslResult<RegisterBank> {
        self.open_op("PLL_init")
    }
    fn reset(&mut self) -> CslResult {
        self.op("PLL_reset")
    }
    fn config(&mut self, config: &PllConfig) -> CslResult {
        self.op("PLL_config")?;
        self.pll = *config;
        Ok(())
    }
    fn get_config(&mut self) -> CslResult<PllConfig> {
        self.op("PLL_getConfig")?;
        Ok(self.pll)
    }
    fn enable(&mut self) -> CslResult {
        self.op("PLL_enable")
    }
    fn input(&mut self) -> PllInput {
        self.pll_input.unwrap_or(PllInput::ClkIn)
    }
}

impl UhpiCsl for FakeCsl {
    fn open(&mut self) -> CslResult<RegisterBank> {
        self.open_op("UHPI_open")
    }
    fn close(&mut self) -> CslResult {
        self.op("UHPI_Close")
    }
    fn config(&mut self, setup: &UhpiSetup) -> CslResult {
        self.op("UHPI_Config")?;
        self.uhpi_setup = Some(*setup);
        Ok(())
    }
}

impl GptCsl for FakeCsl {
    fn open(&mut self, instance: GptInstance) -> CslResult<RegisterBank> {
        let bank = self.open_op("GPT_open")?;
        self.gpt_instance = Some(instance);
        Ok(bank)
    }
    fn reset(&mut self, _instance: GptInstance) -> CslResult {
        self.op("GPT_reset")
    }
    fn config(&mut self, _instance: GptInstance, config: &GptHwConfig) -> CslResult {
        self.op("GPT_config")?;
        self.gpt_config = Some(*config);
        Ok(())
    }
    fn start(&mut self, _instance: GptInstance) -> CslResult {
        self.op("GPT_start")
    }
    fn stop(&mut self, _instance: GptInstance) -> CslResult {
        self.op("GPT_stop")
    }
    fn count(&mut self, _instance: GptInstance) -> CslResult<u32> {
        self.op("GPT_getCnt")?;
        Ok(self.gpt_count)
    }
    fn close(&mut self, _instance: GptInstance) -> CslResult {
        self.op("GPT_close")
    }
    fn clear_interrupts(&mut self) {
        self.gpt_irq_cleared += 1;
    }
}

impl WdtCsl for FakeCsl {
    fn open(&mut self) -> CslResult<RegisterBank> {
        self.open_op("WDTIM_open")
    }
    fn config(&mut self, config: &WdtHwConfig) -> CslResult {
        self.op("WDTIM_config")?;
        self.wdt_config = Some(*config);
        Ok(())
    }
    fn service(&mut self) -> CslResult {
        self.op("WDTIM_service")
    }
    fn start(&mut self) -> CslResult {
        self.op("WDTIM_start")
    }
    fn stop(&mut self) -> CslResult {
        self.op("WDTIM_stop")
    }
    fn close(&mut self) -> CslResult {
        self.op("WDTIM_close")
    }
}

/// Start of the emulated info memory
pub const FLASH_BASE: u16 = 0x1800;
const FLASH_LEN: usize = 512;
const SEGMENT: usize = 128;

/// NOR flash behind an `FCTLx` controller: erase sets a segment to `0xFF`, programming can only
/// clear bits, and nothing changes while the controller is locked.
pub struct FakeFlash {
    pub mem: [u8; FLASH_LEN],
    fctl1: Fctl1,
    locked: bool,
    pub erased_segments: Vec<u16>,
    pub programmed: usize,
    // Erase or program operations that happened outside a critical section
    pub unmasked_ops: usize,
}

impl Default for FakeFlash {
    fn default() -> Self {
        FakeFlash {
            mem: [0xFF; FLASH_LEN],
            fctl1: Fctl1::empty(),
            locked: true,
            erased_segments: Vec::new(),
            programmed: 0,
            unmasked_ops: 0,
        }
    }
}

impl FakeFlash {
    fn index(addr: u16) -> usize {
        let idx = usize::from(addr - FLASH_BASE);
        assert!(idx < FLASH_LEN, "access outside info memory: {addr:#06x}");
        idx
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

impl FlashRegs for FakeFlash {
    fn set_fctl1(&mut self, value: Fctl1) {
        self.fctl1 = value;
    }

    fn set_fctl3(&mut self, value: Fctl3) {
        self.locked = value.contains(Fctl3::LOCK);
    }

    fn read_byte(&self, addr: u16) -> u8 {
        self.mem[Self::index(addr)]
    }

    fn write_byte(&mut self, addr: u16, byte: u8) {
        let idx = Self::index(addr);
        if self.locked {
            return;
        }
        if !interrupts_masked() {
            self.unmasked_ops += 1;
        }
        if self.fctl1.contains(Fctl1::ERASE) {
            let start = idx - idx % SEGMENT;
            self.mem[start..start + SEGMENT].fill(0xFF);
            self.erased_segments.push(FLASH_BASE + start as u16);
        } else if self.fctl1.contains(Fctl1::WRT) {
            self.mem[idx] &= byte;
            self.programmed += 1;
        }
    }
}

/// RTC registers that remember what was last written, in order.
#[derive(Default)]
pub struct FakeRtc {
    pub log: Vec<&'static str>,
    pub ucsctl4: Option<Ucsctl4>,
    pub ctl0: Option<RtcCtl0>,
    pub ctl1: Option<RtcCtl1>,
    pub counter: Option<u32>,
}

impl RtcRegs for FakeRtc {
    fn set_ucsctl4(&mut self, value: Ucsctl4) {
        self.log.push("UCSCTL4");
        self.ucsctl4 = Some(value);
    }
    fn rtcctl0(&self) -> RtcCtl0 {
        self.ctl0.unwrap_or(RtcCtl0::empty())
    }
    fn set_rtcctl0(&mut self, value: RtcCtl0) {
        self.log.push("RTCCTL0");
        self.ctl0 = Some(value);
    }
    fn set_rtcctl1(&mut self, value: RtcCtl1) {
        self.log.push("RTCCTL1");
        self.ctl1 = Some(value);
    }
    fn set_counter(&mut self, ticks: u32) {
        self.log.push("RTCNT");
        self.counter = Some(ticks);
    }
}

/// Counts LPM3 entries.
#[derive(Default)]
pub struct FakeLpm {
    pub lpm3_entries: u32,
}

impl LowPower for FakeLpm {
    fn enter_lpm3(&mut self) {
        self.lpm3_entries += 1;
    }
}

/// Timer_A1 registers that remember the last value written.
#[derive(Default)]
pub struct FakeTimerA1 {
    pub ctl: Option<TaCtl>,
    pub cctl0: Option<TaCctl>,
    pub ccr0: Option<u16>,
}

impl TimerA1Regs for FakeTimerA1 {
    fn set_ctl(&mut self, value: TaCtl) {
        self.ctl = Some(value);
    }
    fn set_cctl0(&mut self, value: TaCctl) {
        self.cctl0 = Some(value);
    }
    fn set_ccr0(&mut self, value: u16) {
        self.ccr0 = Some(value);
    }
}
