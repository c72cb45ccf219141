//! Transaction size and dust estimation
//!
//! The pre-image builder never serializes transactions. It only needs to know
//! how large a transaction with a given set of inputs and outputs would be,
//! and how small an output may get before it is not worth spending. Both
//! questions are answered by a [`TransactionSizeCalculator`].
//!
//! [`StandardSizeCalculator`] estimates virtual sizes for Bitcoin script
//! types. The values are approximate for single-key spends; multisig or
//! custom scripts should supply their own calculator.
//!
//! Example:
//! ```
//! use utxo_preimage::math::{StandardSizeCalculator, TransactionSizeCalculator};
//! use utxo_preimage::types::ScriptType;
//!
//! let calculator = StandardSizeCalculator::new();
//! assert_eq!(calculator.dust(ScriptType::P2pkh), 546);
//! assert_eq!(calculator.transaction_size(&[], &[ScriptType::P2wpkh]), 41);
//! ```

use crate::types::{ScriptType, UnspentOutput};

/// Version and locktime fields
const TX_OVERHEAD: u64 = 8;

/// SegWit marker and flag (two witness bytes, rounded up to one vbyte)
const SEGWIT_OVERHEAD: u64 = 1;

/// Size and dust oracle consumed by the selector
///
/// Implementations must be monotonically non-decreasing in the number of
/// inputs and outputs, and the order of `outputs` must not affect the size.
pub trait TransactionSizeCalculator {
    /// Estimated serialized size in bytes of a transaction with exactly
    /// these inputs and outputs of these script types
    fn transaction_size(&self, inputs: &[UnspentOutput], outputs: &[ScriptType]) -> u64;

    /// Minimum value for which an output of this script type is worth
    /// creating
    fn dust(&self, script: ScriptType) -> u64;
}

impl<T: TransactionSizeCalculator + ?Sized> TransactionSizeCalculator for &T {
    fn transaction_size(&self, inputs: &[UnspentOutput], outputs: &[ScriptType]) -> u64 {
        (**self).transaction_size(inputs, outputs)
    }

    fn dust(&self, script: ScriptType) -> u64 {
        (**self).dust(script)
    }
}

/// Gets approximate input size in vbytes for a script type
pub fn get_input_size(script_type: ScriptType) -> u64 {
    match script_type {
        ScriptType::P2pkh => 148,  // Legacy P2PKH
        ScriptType::P2sh => 91,    // Nested SegWit (P2SH-P2WPKH)
        ScriptType::P2wpkh => 68,  // Native SegWit
        ScriptType::P2wsh => 104,  // Native SegWit multisig (depends on script size)
        ScriptType::P2tr => 58,    // Taproot key path
    }
}

/// Gets output size in bytes for a script type
pub fn get_output_size(script_type: ScriptType) -> u64 {
    match script_type {
        ScriptType::P2pkh => 34,
        ScriptType::P2sh => 32,
        ScriptType::P2wpkh => 31,
        ScriptType::P2wsh => 43,
        ScriptType::P2tr => 43,
    }
}

/// Dust threshold for a script type at the default relay policy
pub fn get_dust_threshold(script_type: ScriptType) -> u64 {
    match script_type {
        ScriptType::P2pkh => 546,
        ScriptType::P2sh => 540,
        ScriptType::P2wpkh => 294,
        ScriptType::P2wsh => 330,
        ScriptType::P2tr => 330,
    }
}

/// Length of the variable-length integer used for input and output counts
pub fn compact_size_len(count: usize) -> u64 {
    match count {
        0..=0xfc => 1,
        0xfd..=0xffff => 3,
        0x1_0000..=0xffff_ffff => 5,
        _ => 9,
    }
}

/// Size calculator for standard single-key Bitcoin spends
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardSizeCalculator;

impl StandardSizeCalculator {
    /// Create a new calculator
    pub fn new() -> Self {
        Self
    }
}

impl TransactionSizeCalculator for StandardSizeCalculator {
    fn transaction_size(&self, inputs: &[UnspentOutput], outputs: &[ScriptType]) -> u64 {
        let inputs_size: u64 = inputs
            .iter()
            .map(|input| get_input_size(input.script_type))
            .sum();

        let outputs_size: u64 = outputs.iter().map(|script| get_output_size(*script)).sum();

        let witness = if inputs.iter().any(|input| input.script_type.is_segwit()) {
            SEGWIT_OVERHEAD
        } else {
            0
        };

        TX_OVERHEAD
            + compact_size_len(inputs.len())
            + compact_size_len(outputs.len())
            + witness
            + inputs_size
            + outputs_size
    }

    fn dust(&self, script: ScriptType) -> u64 {
        get_dust_threshold(script)
    }
}
