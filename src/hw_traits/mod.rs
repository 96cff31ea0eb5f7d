//! Low-level seams the drivers are generic over.
//!
//! `csl` holds the C5535 Chip Support Library entry points, `cc430` the CC430 register blocks.

pub mod cc430;
pub mod csl;
