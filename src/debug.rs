//! Debug message sink.
//!
//! Drivers report failed SDK calls through a [`ufmt::uWrite`] sink (usually a serial writer).
//! Messages are only formatted when the `debug_msg` feature is enabled; otherwise the sink is
//! never touched and [`NoDebug`] compiles away entirely.

use core::convert::Infallible;
use ufmt::uWrite;

/// Sink that discards every message. The default sink for all drivers.
#[derive(Default, Clone, Copy)]
pub struct NoDebug;

impl uWrite for NoDebug {
    type Error = Infallible;

    #[inline(always)]
    fn write_str(&mut self, _s: &str) -> Result<(), Self::Error> {
        Ok(())
    }
}

// Write a line to a driver's debug sink (an `&mut impl uWrite`). Errors from the sink are dropped.
macro_rules! debug_msg {
    ($sink:expr, $($arg:tt)*) => {{
        #[cfg(feature = "debug_msg")]
        {
            ufmt::uwriteln!($sink, $($arg)*).ok();
        }
        #[cfg(not(feature = "debug_msg"))]
        {
            let _ = &$sink;
        }
    }};
}

/// Log `what` to `sink` if `res` is an error, then hand `res` back unchanged.
#[inline]
#[cfg_attr(not(feature = "debug_msg"), allow(unused_variables))]
pub(crate) fn log_failure<T, E, W: uWrite>(sink: &mut W, res: Result<T, E>, what: &str) -> Result<T, E> {
    if res.is_err() {
        debug_msg!(sink, "{}", what);
    }
    res
}
