//! Low Power Mode (LPM) control
//!
//! # LPM3
//! LPM3 turns off the CPU, MCLK, SMCLK and the DCO. ACLK keeps running, so the RTC and
//! Timer_A1 can still wake the core. GPIO pins keep their values.
//!
//! Power draw in LPM3: a few uA.
//!
//! Execution continues after the entry point once an interrupt handler declared with
//! `#[interrupt(wake_cpu)]` returns.

use core::arch::asm;

// Status register:
// SCG1 SCG0 OSC_OFF CPU_OFF GIE N Z C
// 7    6    5       4       3   2 1 0
const SCG1:    u8 = 1<<7;
const SCG0:    u8 = 1<<6;
const CPU_OFF: u8 = 1<<4;
const GIE:     u8 = 1<<3;

/// For each set bit in the bitmask, set the corresponding bit in the status register.
#[inline(always)]
fn set_sr_bits<const MASK: u8>() {
    unsafe { asm!("bis.b #{mask}, SR", "nop", mask = const MASK, options(nomem, nostack)) };
}

/// Enter Low Power Mode 0 (LPM0) with interrupts enabled.
///
/// In LPM0 the CPU and MCLK are disabled.
#[inline(always)]
pub fn enter_lpm0() {
    const LPM0: u8 = CPU_OFF + GIE;
    set_sr_bits::<LPM0>();
}

/// Enter Low Power Mode 3 (LPM3) with interrupts enabled.
#[inline(always)]
pub fn enter_lpm3() {
    const LPM3: u8 = SCG1 + SCG0 + CPU_OFF + GIE;
    set_sr_bits::<LPM3>();
}
