//! Core domain types for pre-image transaction construction
//!
//! This module defines the values that flow through coin selection:
//! the spendable coins handed in by the caller, the payment destination,
//! the fee policy, and the priced, unsigned transaction shape handed back.
//!
//! All amounts are unsigned 64-bit integers in the smallest currency unit
//! (satoshis for Bitcoin). Floating point is never used for balances, fees
//! or dust thresholds.
//!
//! # Example
//!
//! ```
//! use utxo_preimage::types::{Destination, FeePolicy, ScriptType, UnspentOutput};
//! use bitcoin::{OutPoint, Txid};
//! use std::str::FromStr;
//!
//! let utxo = UnspentOutput::new(
//!     OutPoint::new(
//!         Txid::from_str("7967a5185e907a25225574544c31f7b059c1a191d65b53dcc1554d339c4f9efc").unwrap(),
//!         0,
//!     ),
//!     10_000,
//!     ScriptType::P2wpkh,
//! );
//!
//! let destination = Destination::new(5_000, ScriptType::P2tr);
//! let fee = FeePolicy::CalculateByRate(2);
//!
//! assert_eq!(utxo.amount, 10_000);
//! assert!(fee.is_calculation());
//! assert_eq!(destination.script, ScriptType::P2tr);
//! ```

use bitcoin::OutPoint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Spending-script family of an output
///
/// The variant affects both the estimated size of a transaction and the
/// dust threshold of an output. The core only compares and hashes it; the
/// concrete byte sizes belong to the size calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptType {
    /// Legacy pay-to-public-key-hash
    P2pkh,
    /// Pay-to-script-hash (spent as nested SegWit)
    P2sh,
    /// Native SegWit v0 key hash
    P2wpkh,
    /// Native SegWit v0 script hash
    P2wsh,
    /// Taproot key path
    P2tr,
}

impl ScriptType {
    /// Whether spending this script type carries witness data
    pub fn is_segwit(&self) -> bool {
        !matches!(self, ScriptType::P2pkh)
    }
}

impl fmt::Display for ScriptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScriptType::P2pkh => "p2pkh",
            ScriptType::P2sh => "p2sh",
            ScriptType::P2wpkh => "p2wpkh",
            ScriptType::P2wsh => "p2wsh",
            ScriptType::P2tr => "p2tr",
        };
        f.write_str(name)
    }
}

/// A spendable coin owned by the caller
///
/// # Fields
///
/// * `outpoint` - Identity of the coin (transaction id and output index)
/// * `amount` - Value in the smallest currency unit
/// * `script_type` - Script family of the output being spent
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnspentOutput {
    /// Reference to the transaction output (txid and vout)
    pub outpoint: OutPoint,

    /// Value of this output
    pub amount: u64,

    /// Script family, used to price the input
    pub script_type: ScriptType,
}

impl UnspentOutput {
    /// Create a new unspent output
    pub fn new(outpoint: OutPoint, amount: u64, script_type: ScriptType) -> Self {
        Self {
            outpoint,
            amount,
            script_type,
        }
    }

    /// Get a unique identifier for this output
    pub fn id(&self) -> String {
        format!("{}:{}", self.outpoint.txid, self.outpoint.vout)
    }
}

/// Where the payment goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    /// Amount to pay, must be greater than zero
    pub amount: u64,
    /// Script family of the destination output
    pub script: ScriptType,
}

impl Destination {
    /// Create a new destination
    pub fn new(amount: u64, script: ScriptType) -> Self {
        Self { amount, script }
    }
}

/// How the transaction fee is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeePolicy {
    /// A caller-fixed fee, independent of size
    Exactly(u64),
    /// A rate per byte of estimated transaction size
    CalculateByRate(u64),
}

impl FeePolicy {
    /// Whether the fee is derived from the transaction size
    pub fn is_calculation(&self) -> bool {
        matches!(self, FeePolicy::CalculateByRate(_))
    }

    /// Fee for a transaction of `size` bytes
    ///
    /// Returns `None` when the rate-based fee does not fit in a `u64`.
    pub fn fee_for_size(&self, size: u64) -> Option<u64> {
        match *self {
            FeePolicy::Exactly(fee) => Some(fee),
            FeePolicy::CalculateByRate(rate) => size.checked_mul(rate),
        }
    }
}

/// Priced, unsigned transaction shape
///
/// Produced by the variant builders during the search and returned to the
/// caller as the final result. For every value handed out by this crate
/// `input_total() == destination + change + fee` holds exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreImageTransaction {
    /// Inputs spent by the transaction
    pub inputs: Vec<UnspentOutput>,
    /// Amount paid to the destination
    pub destination: u64,
    /// Amount returned to the change script, 0 when there is no change output
    pub change: u64,
    /// Fee paid to miners
    pub fee: u64,
    /// Estimated serialized size in bytes
    pub size: u64,
}

impl PreImageTransaction {
    /// Sum of all input amounts
    pub fn input_total(&self) -> u64 {
        self.inputs.iter().map(|input| input.amount).sum()
    }

    /// Whether a change output has to be created
    pub fn has_change_output(&self) -> bool {
        self.change > 0
    }

    /// Number of outputs the signed transaction will carry
    pub fn output_count(&self) -> usize {
        if self.has_change_output() {
            2
        } else {
            1
        }
    }

    /// Ordering used while searching: lower fee first, then lower change,
    /// then smaller size.
    pub fn is_better_than(&self, other: &PreImageTransaction) -> bool {
        (self.fee, self.change, self.size) < (other.fee, other.change, other.size)
    }
}

impl fmt::Display for PreImageTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "inputs: {} ({} total), destination: {}, change: {}, fee: {}, size: {}",
            self.inputs.len(),
            self.input_total(),
            self.destination,
            self.change,
            self.fee,
            self.size
        )
    }
}
