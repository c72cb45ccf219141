//! Deterministic orderings of unspent outputs
//!
//! Sorting never changes which inputs can be selected, only the order in
//! which the search visits them and, for the final result, the order in
//! which inputs appear in the transaction.

use crate::types::UnspentOutput;
use bitcoin::hashes::Hash;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Ordering applied to a set of unspent outputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Transaction id in displayed byte order, then output index (BIP-69)
    #[default]
    Bip69,
    /// Largest amount first, ties broken by the BIP-69 key
    AmountDescending,
}

/// Compare two outputs by transaction id (displayed byte order), then index
pub fn compare_bip69(a: &UnspentOutput, b: &UnspentOutput) -> Ordering {
    // Txid bytes are stored little-endian; BIP-69 compares the reversed form.
    let a_txid = a.outpoint.txid.to_byte_array();
    let b_txid = b.outpoint.txid.to_byte_array();

    a_txid
        .iter()
        .rev()
        .cmp(b_txid.iter().rev())
        .then_with(|| a.outpoint.vout.cmp(&b.outpoint.vout))
}

/// Compare two outputs by amount descending, then by the BIP-69 key
pub fn compare_amount_descending(a: &UnspentOutput, b: &UnspentOutput) -> Ordering {
    b.amount.cmp(&a.amount).then_with(|| compare_bip69(a, b))
}

/// Sort outputs with the given order
///
/// # Arguments
/// * `inputs` - Outputs to sort
/// * `order` - Ordering to apply
///
/// # Returns
/// * Sorted copy of the outputs
pub fn sort_inputs(inputs: &[UnspentOutput], order: SortOrder) -> Vec<UnspentOutput> {
    let mut sorted = inputs.to_vec();
    sort_in_place(&mut sorted, order);
    sorted
}

/// Sort outputs in place with the given order
pub fn sort_in_place(inputs: &mut [UnspentOutput], order: SortOrder) {
    match order {
        SortOrder::Bip69 => inputs.sort_by(compare_bip69),
        SortOrder::AmountDescending => inputs.sort_by(compare_amount_descending),
    }
}
