//! Per-(row, coverage) lookup outcome

use crate::LookupError;

/// Result of resolving one (row, coverage) pair
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome<R> {
    Success(R),
    /// Bad or incomplete input
    Fail(LookupError),
    /// Valid input describing a risk the model does not cover
    NotModelled(LookupError),
    /// Coverage not applicable to the row; nothing is emitted
    Skip,
}

impl<R> LookupOutcome<R> {
    /// Classify a failure by its code range
    pub fn from_error(error: LookupError) -> Self {
        if error.is_not_modelled() {
            LookupOutcome::NotModelled(error)
        } else {
            LookupOutcome::Fail(error)
        }
    }

    /// `Ok(None)` means the pair was skipped
    pub fn from_result(result: Result<Option<R>, LookupError>) -> Self {
        match result {
            Ok(Some(record)) => LookupOutcome::Success(record),
            Ok(None) => LookupOutcome::Skip,
            Err(error) => Self::from_error(error),
        }
    }

    pub fn status(&self) -> Option<LookupStatus> {
        match self {
            LookupOutcome::Success(_) => Some(LookupStatus::Success),
            LookupOutcome::Fail(_) => Some(LookupStatus::Fail),
            LookupOutcome::NotModelled(_) => Some(LookupStatus::NotModelled),
            LookupOutcome::Skip => None,
        }
    }

    pub fn error(&self) -> Option<&LookupError> {
        match self {
            LookupOutcome::Fail(error) | LookupOutcome::NotModelled(error) => Some(error),
            _ => None,
        }
    }

    pub fn record(&self) -> Option<&R> {
        match self {
            LookupOutcome::Success(record) => Some(record),
            _ => None,
        }
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, LookupOutcome::Skip)
    }

    pub fn map<T, F: FnOnce(R) -> T>(self, f: F) -> LookupOutcome<T> {
        match self {
            LookupOutcome::Success(record) => LookupOutcome::Success(f(record)),
            LookupOutcome::Fail(error) => LookupOutcome::Fail(error),
            LookupOutcome::NotModelled(error) => LookupOutcome::NotModelled(error),
            LookupOutcome::Skip => LookupOutcome::Skip,
        }
    }
}

/// Status reported in keys records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LookupStatus {
    Success,
    Fail,
    NotModelled,
}

impl LookupStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            LookupStatus::Success => "success",
            LookupStatus::Fail => "fail",
            LookupStatus::NotModelled => "notmodelled",
        }
    }
}

impl core::fmt::Display for LookupStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
