//! Prelude

pub use crate::eeprom::ByteStore as _c5535_cc430_hal_ByteStore;
pub use crate::thermistor::AnalogSource as _c5535_cc430_hal_AnalogSource;
pub use crate::watchdog::WdtState as _c5535_cc430_hal_WdtState;
