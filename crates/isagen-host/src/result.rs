//! Host-function return values

use crate::error::HostError;
use crate::marshal::StackTypes;

/// What a host function may return: stack values, or a `Result` of them
pub trait HostResult {
    type Types: StackTypes;

    fn into_result(self) -> Result<Self::Types, HostError>;
}

impl<T: StackTypes> HostResult for T {
    type Types = T;

    #[inline(always)]
    fn into_result(self) -> Result<T, HostError> {
        Ok(self)
    }
}

impl<T: StackTypes> HostResult for Result<T, HostError> {
    type Types = T;

    #[inline(always)]
    fn into_result(self) -> Result<T, HostError> {
        self
    }
}
