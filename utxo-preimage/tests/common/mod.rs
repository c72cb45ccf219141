//! Shared helpers for integration tests

#![allow(dead_code)]

use bitcoin::{OutPoint, Txid};
use std::str::FromStr;
use std::sync::Once;
use utxo_preimage::logging::{self, LogConfig, LogLevel};
use utxo_preimage::{
    BranchAndBoundPreImageBuilder, BuilderResult, Destination, FeePolicy, PreImageBuilder,
    PreImageTransaction, ScriptType, StandardSizeCalculator, UnspentOutput,
};

static GLOBAL_TEST_INIT: Once = Once::new();

/// Initialize logging once for the whole test binary
pub fn init_test_environment() {
    GLOBAL_TEST_INIT.call_once(|| {
        let config = LogConfig {
            level: LogLevel::Error,
            log_file: None,
            include_timestamps: false,
            include_source_location: false,
            json_format: false,
        };

        let _ = logging::init(&config);
    });
}

/// A P2WPKH output whose txid is built from `n`
pub fn utxo(n: u32, amount: u64) -> UnspentOutput {
    let txid = Txid::from_str(&format!("{:064x}", n + 1)).unwrap();
    UnspentOutput::new(OutPoint::new(txid, n % 4), amount, ScriptType::P2wpkh)
}

/// One P2WPKH output per amount
pub fn utxos(amounts: &[u64]) -> Vec<UnspentOutput> {
    amounts
        .iter()
        .enumerate()
        .map(|(i, &amount)| utxo(i as u32, amount))
        .collect()
}

pub fn builder() -> BranchAndBoundPreImageBuilder<StandardSizeCalculator> {
    BranchAndBoundPreImageBuilder::new(StandardSizeCalculator::new())
}

/// Pay `amount` to P2WPKH with P2WPKH change
pub fn pay(
    outputs: &[UnspentOutput],
    amount: u64,
    fee: FeePolicy,
) -> BuilderResult<PreImageTransaction> {
    builder().pre_image(
        outputs,
        ScriptType::P2wpkh,
        Destination::new(amount, ScriptType::P2wpkh),
        fee,
    )
}

/// Sorted amounts of the selected inputs
pub fn selected_amounts(transaction: &PreImageTransaction) -> Vec<u64> {
    let mut amounts: Vec<u64> = transaction.inputs.iter().map(|u| u.amount).collect();
    amounts.sort_unstable();
    amounts
}
