//! Error types for pre-image transaction construction
//!
//! Two tiers of failure exist:
//!
//! - [`BuilderError`] is returned by the public facade. It is terminal for
//!   the call; the caller may retry with other inputs or another fee policy.
//! - [`VariantError`] describes why one candidate subset could not be priced
//!   by one variant builder. It never leaves the selector: a rejected
//!   candidate simply contributes nothing and the search moves on.
//!
//! # Usage
//!
//! ```
//! use utxo_preimage::error::BuilderError;
//!
//! let error = BuilderError::InsufficientFunds { needed: 50_000, available: 20_000 };
//! assert!(error.to_string().contains("Insufficient funds"));
//! assert!(error.is_input_error());
//! ```

use bitcoin::OutPoint;
use thiserror::Error;

/// Failure of a `pre_image` call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuilderError {
    /// No unspent outputs were supplied
    #[error("No unspent outputs to spend")]
    NoOutputs,

    /// The destination amount is zero
    #[error("Destination amount must be greater than zero")]
    WrongAmount,

    /// The destination amount does not exceed the dust threshold of its script
    #[error("Dust output: {amount} (must be above {dust})")]
    DustAmount { amount: u64, dust: u64 },

    /// The unspent outputs together are worth less than the destination amount
    #[error("Insufficient funds: needed {needed}, available {available}")]
    InsufficientFunds { needed: u64, available: u64 },

    /// The search finished without any candidate that covers amount, fee and dust rules
    #[error("Unable to find suitable unspent outputs for the transaction")]
    UnableToFindSuitableUtxos,

    /// The same outpoint was supplied more than once
    #[error("Duplicate unspent output: {0}")]
    DuplicateOutput(OutPoint),

    /// The input amounts do not fit in a 64-bit sum
    #[error("Total input amount overflows")]
    AmountOverflow,
}

impl BuilderError {
    /// Whether the error was caused by the arguments rather than by the search
    pub fn is_input_error(&self) -> bool {
        !matches!(self, BuilderError::UnableToFindSuitableUtxos)
    }
}

/// Why a variant builder rejected one candidate subset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VariantError {
    /// The selected inputs do not cover the destination amount
    #[error("Selected inputs do not cover the destination amount")]
    NotEnough,

    /// What is left after the destination does not cover the fee
    #[error("Selected inputs do not cover the fee")]
    NotEnoughForFee,

    /// The change output would be above zero but not above the dust threshold
    #[error("Change would be below the dust threshold")]
    NotEnoughForDustThreshold,

    /// The remainder is large enough for a change output, so dropping it is wasteful
    #[error("Remainder is large enough for a change output")]
    ChangeIsEnough,
}

/// Result alias for facade operations
pub type BuilderResult<T> = Result<T, BuilderError>;
