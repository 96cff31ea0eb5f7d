//! Peripheral drivers for a two-chip board: a TMS320C5535 DSP and a CC430F5137 radio
//! microcontroller.
//!
//! # DSP side
//!
//! The C5535 drivers ([`sar`], [`spi`], [`mcspi`], [`pll`], [`uhpi`], [`gpt`], [`watchdog`]) sit
//! on top of TI's Chip Support Library. Each driver is generic over the CSL module it needs
//! (see [`hw_traits::csl`]); the application implements those traits by calling into the vendor
//! library. CSL failures come back as [`csl::CslError`].
//!
//! Drivers take an optional [`ufmt::uWrite`] sink for debug messages. With the `debug_msg`
//! feature enabled, every failed CSL call is reported there.
//!
//! # MCU side
//!
//! The CC430 drivers ([`info_mem`], [`rtc`], [`timer`]) are generic over small register traits
//! in [`hw_traits::cc430`]. On `msp430` targets the `cc430` module implements them against
//! the real registers.
//!
//! [`thermistor`] works with any analog source, including a SAR pin.
//!
//! # Features
//!
//! * `debug_msg`: format driver failure messages into the debug sink
//! * `swap_extended_address`: store the device address in the first byte of its info memory slot

#![cfg_attr(not(test), no_std)]
#![cfg_attr(target_arch = "msp430", feature(asm_experimental_arch))]
#![deny(missing_docs)]

mod debug;

pub mod csl;
pub mod eeprom;
pub mod gpt;
pub mod hw_traits;
pub mod info_mem;
pub mod mcspi;
pub mod pll;
pub mod prelude;
pub mod rtc;
pub mod sar;
pub mod spi;
pub mod thermistor;
pub mod timer;
pub mod uhpi;
pub mod watchdog;

#[cfg(target_arch = "msp430")]
pub mod cc430;
#[cfg(target_arch = "msp430")]
pub mod delay;
#[cfg(target_arch = "msp430")]
pub mod lpm;

#[cfg(test)]
mod mock;

pub use debug::NoDebug;
