//! UTXO pre-image transaction builder
//!
//! This crate selects which unspent outputs a wallet should spend for a
//! payment and prices the resulting unsigned transaction: inputs, amount to
//! the destination, change, fee and estimated size.
//!
//! # Modules
//!
//! - `types`: Core domain types (unspent outputs, destinations, fee policies)
//! - `error`: Facade and candidate error types
//! - `math`: Transaction size and dust estimation
//! - `pre_image`: Sorting, variant builders, branch-and-bound search and the facade
//! - `config`: Search bounds and result ordering
//! - `logging`: Logging backend and log sanitization helpers
//!
//! # Example
//!
//! ```
//! use utxo_preimage::{
//!     BranchAndBoundPreImageBuilder, Destination, FeePolicy, PreImageBuilder, ScriptType,
//!     StandardSizeCalculator, UnspentOutput,
//! };
//! use bitcoin::{OutPoint, Txid};
//! use std::str::FromStr;
//!
//! let txid = Txid::from_str("3333333333333333333333333333333333333333333333333333333333333333").unwrap();
//! let outputs = vec![
//!     UnspentOutput::new(OutPoint::new(txid, 0), 30_000, ScriptType::P2wpkh),
//!     UnspentOutput::new(OutPoint::new(txid, 1), 80_000, ScriptType::P2wpkh),
//! ];
//!
//! let builder = BranchAndBoundPreImageBuilder::new(StandardSizeCalculator::new());
//! let transaction = builder
//!     .pre_image(
//!         &outputs,
//!         ScriptType::P2wpkh,
//!         Destination::new(50_000, ScriptType::P2wpkh),
//!         FeePolicy::CalculateByRate(2),
//!     )
//!     .unwrap();
//!
//! assert_eq!(transaction.inputs.len(), 1);
//! assert_eq!(transaction.input_total(), transaction.destination + transaction.change + transaction.fee);
//! ```

/// Core domain types
pub mod types;

/// Error types
pub mod error;

/// Size and dust estimation
pub mod math;

/// Pre-image transaction construction
pub mod pre_image;

/// Builder configuration
pub mod config;

/// Logging backend and helpers
pub mod logging;

pub use config::BuilderConfig;
pub use error::{BuilderError, BuilderResult, VariantError};
pub use math::{StandardSizeCalculator, TransactionSizeCalculator};
pub use pre_image::{BranchAndBoundPreImageBuilder, PreImageBuilder, SortOrder};
pub use types::{Destination, FeePolicy, PreImageTransaction, ScriptType, UnspentOutput};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library with the default logging configuration
///
/// Safe to call more than once.
pub fn init() -> Result<(), String> {
    logging::init(&logging::LogConfig::default())
}
