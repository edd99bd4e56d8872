//! SAT codec error types

use thiserror::Error;

/// SAT codec error type
///
/// The four categories mirror the decode outcomes a terminal has to report
/// back to the UICC: a mandatory object that is absent (or present but
/// semantically empty while its comprehension flag is set), a structural
/// violation of the wire format, a well-formed value the ME cannot act on,
/// and a caller-side contract violation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SatError {
    /// Mandatory tag/length absent, or a comprehension-required field is
    /// semantically empty
    #[error("required value missing: {0}")]
    RequiredValueMissing(&'static str),

    /// Structural violation: bad tag, bad length arithmetic, truncated
    /// buffer, mismatched remaining length
    #[error("command not understood: {0}")]
    CommandNotUnderstood(&'static str),

    /// Well-formed but semantically unsupported value
    #[error("beyond ME capability: {0}")]
    BeyondMeCapability(&'static str),

    /// Programming-contract violation by the caller, not a wire-format
    /// problem
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),
}

impl SatError {
    /// The Terminal Response general result a terminal should transmit for
    /// this decode failure.
    ///
    /// `InvalidParameter` never reaches the SIM and maps onto the generic
    /// not-understood result.
    pub fn general_result(&self) -> crate::response::ResultType {
        use crate::response::ResultType;
        match self {
            SatError::RequiredValueMissing(_) => ResultType::RequiredValuesMissing,
            SatError::CommandNotUnderstood(_) => ResultType::CommandDataNotUnderstood,
            SatError::BeyondMeCapability(_) => ResultType::BeyondMeCapabilities,
            SatError::InvalidParameter(_) => ResultType::CommandDataNotUnderstood,
        }
    }
}

/// SAT codec result type
pub type SatResult<T> = Result<T, SatError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::ResultType;

    #[test]
    fn errors_map_to_terminal_response_results() {
        assert_eq!(
            SatError::RequiredValueMissing("x").general_result(),
            ResultType::RequiredValuesMissing
        );
        assert_eq!(
            SatError::CommandNotUnderstood("x").general_result(),
            ResultType::CommandDataNotUnderstood
        );
        assert_eq!(
            SatError::BeyondMeCapability("x").general_result(),
            ResultType::BeyondMeCapabilities
        );
    }
}
