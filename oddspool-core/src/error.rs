//! Error types for oddspool-core

use thiserror::Error;

/// Result type alias for oddspool operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Error types for core, pool and receipt operations.
///
/// Every variant aborts the operation that raised it; nothing is partially
/// applied. Display strings are the bare variant names so callers can match
/// on them verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Caller is not an oracle of this core
    #[error("OnlyOracle")]
    OnlyOracle,

    /// Caller is not a maintainer of this core
    #[error("OnlyMaintainer")]
    OnlyMaintainer,

    /// Caller is not the owner of the core or pool
    #[error("OnlyOwner")]
    OnlyOwner,

    /// Caller does not own the bet receipt
    #[error("OnlyBetOwner")]
    OnlyBetOwner,

    /// Caller does not own the liquidity deposit
    #[error("LiquidityNotOwned")]
    LiquidityNotOwned,

    /// Receipt burn attempted by someone other than the minting pool
    #[error("OnlyLp")]
    OnlyLp,

    /// Receipt transfer without ownership or approval
    #[error("NotApproved")]
    NotApproved,

    #[error("ConditionNotExists")]
    ConditionNotExists,

    #[error("ConditionAlreadyCreated")]
    ConditionAlreadyCreated,

    /// Condition is already terminal (resolved or canceled)
    #[error("ConditionAlreadyResolved")]
    ConditionAlreadyResolved,

    #[error("ConditionNotStarted")]
    ConditionNotStarted,

    #[error("ConditionStarted")]
    ConditionStarted,

    #[error("ConditionStopped")]
    ConditionStopped,

    /// The bettor's own deadline has passed
    #[error("DeadlineExpired")]
    DeadlineExpired,

    /// Core switch attempted while conditions are still open
    #[error("PaymentLocked")]
    PaymentLocked,

    #[error("BetNotExists")]
    BetNotExists,

    #[error("ReceiptNotExists")]
    ReceiptNotExists,

    #[error("DepositNotExists")]
    DepositNotExists,

    #[error("WrongOutcome")]
    WrongOutcome,

    #[error("SameOutcomes")]
    SameOutcomes,

    #[error("ZeroOdds")]
    ZeroOdds,

    #[error("IncorrectTimestamp")]
    IncorrectTimestamp,

    /// Flat key/value batch with an odd number of entries
    #[error("WrongDataFormat")]
    WrongDataFormat,

    #[error("ZeroAmount")]
    ZeroAmount,

    /// Oracle and DAO fees together exceed 100%
    #[error("WrongFee")]
    WrongFee,

    /// Quoted odds fell below the bettor's minimum
    #[error("SmallOdds")]
    SmallOdds,

    /// Stake would push the reserve ratio past the configured maximum
    #[error("BigDifference")]
    BigDifference,

    /// Condition could not cover the worst-case payout of this stake
    #[error("CantAcceptBet")]
    CantAcceptBet,

    #[error("NoWinNoPrize")]
    NoWinNoPrize,

    #[error("NotEnoughLiquidity")]
    NotEnoughLiquidity,

    #[error("ArithmeticOverflow")]
    ArithmeticOverflow,

    /// Configuration file could not be read
    #[error("Config error: {0}")]
    Io(String),

    /// Serde JSON errors
    #[error("JSON serialization error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_is_variant_name() {
        assert_eq!(CoreError::NoWinNoPrize.to_string(), "NoWinNoPrize");
        assert_eq!(CoreError::ConditionAlreadyResolved.to_string(), "ConditionAlreadyResolved");
        assert_eq!(CoreError::PaymentLocked.to_string(), "PaymentLocked");
    }

    #[test]
    fn test_json_error_conversion() {
        let err: CoreError = serde_json::from_str::<u64>("not json").unwrap_err().into();
        assert!(matches!(err, CoreError::Json(_)));
    }
}
