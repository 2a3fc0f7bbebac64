//! Finite binary64 definition.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// `f64` but it holds only a finite value, so it is totally ordered and safe to serialize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(transparent)]
pub struct FinF64(f64);

impl Eq for FinF64 {}
impl PartialOrd for FinF64 {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for FinF64 {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl std::fmt::Display for FinF64 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Error of constructing [`FinF64`] from a non-finite `f64`.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("finite number expected: {0}")]
pub struct NonFiniteError(pub(crate) f64);

impl TryFrom<f64> for FinF64 {
    type Error = NonFiniteError;
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        value
            .is_finite()
            .then_some(Self(value))
            .ok_or(NonFiniteError(value))
    }
}

impl From<FinF64> for f64 {
    fn from(value: FinF64) -> Self {
        value.as_f64()
    }
}

impl FinF64 {
    /// Creates a new `FinF64` if `float` is finite, otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn new(float: f64) -> Option<Self> {
        Self::try_from(float).ok()
    }

    /// Gets the internal value.
    #[inline]
    #[must_use]
    pub const fn as_f64(self) -> f64 {
        self.0
    }
}
