//! Chip Support Library status codes.
//!
//! Every CSL entry point returns a `CSL_Status`, where `CSL_SOK` (0) means success and negative
//! values name a failure. Drivers in this crate turn those codes into [`CslError`] so they can be
//! propagated with `?` while still exposing the raw integer through [`CslError::code()`].

/// Result of a CSL call.
pub type CslResult<T = ()> = Result<T, CslError>;

/// Status code the CSL uses for success.
pub const CSL_SOK: i16 = 0;

/// Failure statuses returned by the Chip Support Library
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CslError {
    /// Generic failure (`CSL_ESYS_FAIL`)
    Fail,
    /// Peripheral or resource already in use (`CSL_ESYS_INUSE`)
    InUse,
    /// IO error (`CSL_ESYS_XIO`)
    Xio,
    /// Buffer or counter overflow (`CSL_ESYS_OVFL`)
    Overflow,
    /// Handle is null or was never opened (`CSL_ESYS_BADHANDLE`)
    BadHandle,
    /// Argument out of range (`CSL_ESYS_INVPARAMS`)
    InvalidParams,
    /// Unsupported command (`CSL_ESYS_INVCMD`)
    InvalidCommand,
    /// Unsupported query (`CSL_ESYS_INVQUERY`)
    InvalidQuery,
    /// Feature not supported by this device (`CSL_ESYS_NOTSUPPORTED`)
    NotSupported,
    /// Module-specific failure code
    Other(i16),
}

impl CslError {
    /// The raw CSL status code for this error.
    pub fn code(self) -> i16 {
        match self {
            CslError::Fail => -1,
            CslError::InUse => -2,
            CslError::Xio => -3,
            CslError::Overflow => -4,
            CslError::BadHandle => -5,
            CslError::InvalidParams => -6,
            CslError::InvalidCommand => -7,
            CslError::InvalidQuery => -8,
            CslError::NotSupported => -9,
            CslError::Other(code) => code,
        }
    }

    /// Interpret a raw CSL status. Returns `None` for `CSL_SOK`.
    pub fn from_code(code: i16) -> Option<Self> {
        let err = match code {
            CSL_SOK => return None,
            -1 => CslError::Fail,
            -2 => CslError::InUse,
            -3 => CslError::Xio,
            -4 => CslError::Overflow,
            -5 => CslError::BadHandle,
            -6 => CslError::InvalidParams,
            -7 => CslError::InvalidCommand,
            -8 => CslError::InvalidQuery,
            -9 => CslError::NotSupported,
            other => CslError::Other(other),
        };
        Some(err)
    }
}

/// Turn a raw CSL status into a `Result`.
#[inline]
pub fn check(code: i16) -> CslResult {
    match CslError::from_code(code) {
        None => Ok(()),
        Some(err) => Err(err),
    }
}

/// Status code of a CSL result, `CSL_SOK` on success.
#[inline]
pub fn status<T>(res: &CslResult<T>) -> i16 {
    match res {
        Ok(_) => CSL_SOK,
        Err(e) => e.code(),
    }
}
