//! Property-based tests for the pre-image builder
//!
//! These tests use quickcheck to check the invariants every successful
//! result must satisfy, whatever inputs and fee policy are requested.

mod common;

use common::{init_test_environment, pay, utxos};
use quickcheck::{Arbitrary, Gen, TestResult};
use quickcheck_macros::quickcheck;
use std::collections::HashSet;
use utxo_preimage::pre_image::sorter::{sort_inputs, SortOrder};
use utxo_preimage::{BuilderError, FeePolicy, UnspentOutput};

const P2WPKH_DUST: u64 = 294;

// A small wallet and a payment request against it
#[derive(Clone, Debug)]
struct Request {
    amounts: Vec<u64>,
    destination: u64,
    fee: FeePolicy,
}

impl Arbitrary for Request {
    fn arbitrary(g: &mut Gen) -> Self {
        let count = usize::arbitrary(g) % 10 + 1;
        let amounts: Vec<u64> = (0..count)
            .map(|_| u64::arbitrary(g) % 200_000 + 300)
            .collect();
        let total: u64 = amounts.iter().sum();

        // Occasionally more than the wallet holds
        let destination = u64::arbitrary(g) % (total + 1_000) + 1;

        let fee = if bool::arbitrary(g) {
            FeePolicy::CalculateByRate(u64::arbitrary(g) % 20 + 1)
        } else {
            FeePolicy::Exactly(u64::arbitrary(g) % 2_000)
        };

        Request {
            amounts,
            destination,
            fee,
        }
    }
}

impl Request {
    fn outputs(&self) -> Vec<UnspentOutput> {
        utxos(&self.amounts)
    }

    fn total(&self) -> u64 {
        self.amounts.iter().sum()
    }
}

#[quickcheck]
fn inputs_balance_outputs_and_fee(request: Request) -> TestResult {
    init_test_environment();

    match pay(&request.outputs(), request.destination, request.fee) {
        Ok(tx) => TestResult::from_bool(
            tx.input_total() == tx.destination + tx.change + tx.fee
                && tx.destination == request.destination,
        ),
        Err(_) => TestResult::discard(),
    }
}

#[quickcheck]
fn change_is_absent_or_above_dust(request: Request) -> TestResult {
    init_test_environment();

    match pay(&request.outputs(), request.destination, request.fee) {
        Ok(tx) => TestResult::from_bool(tx.change == 0 || tx.change > P2WPKH_DUST),
        Err(_) => TestResult::discard(),
    }
}

#[quickcheck]
fn exact_fee_is_never_undercut(request: Request) -> TestResult {
    init_test_environment();

    let fixed = match request.fee {
        FeePolicy::Exactly(fee) => fee,
        FeePolicy::CalculateByRate(_) => return TestResult::discard(),
    };

    match pay(&request.outputs(), request.destination, request.fee) {
        // With a change output the fee is exact; without one it may absorb dust
        Ok(tx) if tx.has_change_output() => TestResult::from_bool(tx.fee == fixed),
        Ok(tx) => TestResult::from_bool(tx.fee >= fixed),
        Err(_) => TestResult::discard(),
    }
}

#[quickcheck]
fn selected_inputs_come_from_the_wallet(request: Request) -> TestResult {
    init_test_environment();

    let outputs = request.outputs();
    match pay(&outputs, request.destination, request.fee) {
        Ok(tx) => {
            let unique: HashSet<_> = tx.inputs.iter().map(|u| u.outpoint).collect();
            TestResult::from_bool(
                !tx.inputs.is_empty()
                    && unique.len() == tx.inputs.len()
                    && tx.inputs.iter().all(|input| outputs.contains(input)),
            )
        }
        Err(_) => TestResult::discard(),
    }
}

#[quickcheck]
fn failures_match_preconditions(request: Request) -> bool {
    init_test_environment();

    match pay(&request.outputs(), request.destination, request.fee) {
        Err(BuilderError::DustAmount { .. }) => request.destination <= P2WPKH_DUST,
        Err(BuilderError::InsufficientFunds { needed, available }) => {
            needed == request.destination && available == request.total() && available < needed
        }
        Err(BuilderError::UnableToFindSuitableUtxos) => {
            request.destination > P2WPKH_DUST && request.total() >= request.destination
        }
        Err(_) => false,
        Ok(_) => request.total() >= request.destination,
    }
}

#[quickcheck]
fn building_is_deterministic(request: Request) -> bool {
    init_test_environment();

    let outputs = request.outputs();
    pay(&outputs, request.destination, request.fee) == pay(&outputs, request.destination, request.fee)
}

#[quickcheck]
fn sorting_is_idempotent(amounts: Vec<u32>) -> bool {
    let outputs = utxos(&amounts.iter().map(|&a| u64::from(a)).collect::<Vec<_>>());

    [SortOrder::Bip69, SortOrder::AmountDescending]
        .iter()
        .all(|&order| {
            let once = sort_inputs(&outputs, order);
            once.len() == outputs.len() && sort_inputs(&once, order) == once
        })
}
