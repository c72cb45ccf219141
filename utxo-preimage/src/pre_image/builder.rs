//! Pre-image transaction builder
//!
//! This is the public entry point of the crate. It validates the request,
//! orders the inputs, runs the branch-and-bound selector and hands back the
//! cheapest transaction shape found.
//!
//! Validation fails fast, in this order:
//!
//! 1. destination amount is zero: [`BuilderError::WrongAmount`]
//! 2. destination amount at or below its dust threshold: [`BuilderError::DustAmount`]
//! 3. no outputs to spend: [`BuilderError::NoOutputs`]
//! 4. the same outpoint twice: [`BuilderError::DuplicateOutput`]
//! 5. total does not fit in a `u64`: [`BuilderError::AmountOverflow`]
//! 6. total below the destination amount: [`BuilderError::InsufficientFunds`]
//!
//! A search that finds nothing yields [`BuilderError::UnableToFindSuitableUtxos`].

use crate::config::BuilderConfig;
use crate::error::{BuilderError, BuilderResult};
use crate::logging::{log_selection, sanitize_for_logging, LogContext, LogLevel};
use crate::math::TransactionSizeCalculator;
use crate::pre_image::selector::BranchAndBoundSelector;
use crate::pre_image::sorter::{sort_in_place, sort_inputs, SortOrder};
use crate::pre_image::variants::SelectionContext;
use crate::types::{Destination, FeePolicy, PreImageTransaction, ScriptType, UnspentOutput};
use std::collections::HashSet;
use std::time::Instant;

/// Builds unsigned transaction shapes from a set of spendable outputs
pub trait PreImageBuilder {
    /// Select inputs and price the transaction
    ///
    /// # Arguments
    /// * `outputs` - Every unspent output the wallet may spend
    /// * `change_script` - Script family of the change output
    /// * `destination` - Amount and script of the payment
    /// * `fee` - Fee policy
    ///
    /// # Returns
    /// * The cheapest transaction found, or the first violated precondition
    fn pre_image(
        &self,
        outputs: &[UnspentOutput],
        change_script: ScriptType,
        destination: Destination,
        fee: FeePolicy,
    ) -> BuilderResult<PreImageTransaction>;
}

/// Pre-image builder backed by branch-and-bound selection
///
/// Holds no per-call state; one instance can serve concurrent calls when
/// its calculator is `Sync`.
///
/// # Example
///
/// ```
/// use utxo_preimage::math::StandardSizeCalculator;
/// use utxo_preimage::pre_image::{BranchAndBoundPreImageBuilder, PreImageBuilder};
/// use utxo_preimage::types::{Destination, FeePolicy, ScriptType, UnspentOutput};
/// use bitcoin::{OutPoint, Txid};
/// use std::str::FromStr;
///
/// let txid = Txid::from_str("1111111111111111111111111111111111111111111111111111111111111111").unwrap();
/// let outputs = vec![UnspentOutput::new(OutPoint::new(txid, 0), 100_000, ScriptType::P2wpkh)];
///
/// let builder = BranchAndBoundPreImageBuilder::new(StandardSizeCalculator::new());
/// let transaction = builder
///     .pre_image(
///         &outputs,
///         ScriptType::P2wpkh,
///         Destination::new(50_000, ScriptType::P2wpkh),
///         FeePolicy::CalculateByRate(1),
///     )
///     .unwrap();
///
/// assert_eq!(transaction.fee, 141);
/// assert_eq!(transaction.change, 100_000 - 50_000 - 141);
/// ```
#[derive(Debug, Clone)]
pub struct BranchAndBoundPreImageBuilder<C: TransactionSizeCalculator> {
    calculator: C,
    config: BuilderConfig,
}

impl<C: TransactionSizeCalculator> BranchAndBoundPreImageBuilder<C> {
    /// Create a builder with the default configuration
    pub fn new(calculator: C) -> Self {
        Self::with_config(calculator, BuilderConfig::default())
    }

    /// Create a builder with a custom configuration
    pub fn with_config(calculator: C, config: BuilderConfig) -> Self {
        Self { calculator, config }
    }

    /// Get the current configuration
    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Get the size calculator
    pub fn calculator(&self) -> &C {
        &self.calculator
    }

    /// Check the preconditions and return the total input amount
    fn validate(&self, outputs: &[UnspentOutput], destination: &Destination) -> BuilderResult<u64> {
        if destination.amount == 0 {
            return Err(BuilderError::WrongAmount);
        }

        let dust = self.calculator.dust(destination.script);
        if destination.amount <= dust {
            return Err(BuilderError::DustAmount {
                amount: destination.amount,
                dust,
            });
        }

        if outputs.is_empty() {
            return Err(BuilderError::NoOutputs);
        }

        let mut seen = HashSet::with_capacity(outputs.len());
        if let Some(duplicate) = outputs.iter().find(|output| !seen.insert(output.outpoint)) {
            return Err(BuilderError::DuplicateOutput(duplicate.outpoint));
        }

        let total = outputs
            .iter()
            .try_fold(0u64, |sum, output| sum.checked_add(output.amount))
            .ok_or(BuilderError::AmountOverflow)?;

        if total < destination.amount {
            return Err(BuilderError::InsufficientFunds {
                needed: destination.amount,
                available: total,
            });
        }

        Ok(total)
    }
}

impl<C: TransactionSizeCalculator> PreImageBuilder for BranchAndBoundPreImageBuilder<C> {
    fn pre_image(
        &self,
        outputs: &[UnspentOutput],
        change_script: ScriptType,
        destination: Destination,
        fee: FeePolicy,
    ) -> BuilderResult<PreImageTransaction> {
        let total = self.validate(outputs, &destination).map_err(|error| {
            log_selection(
                LogLevel::Debug,
                LogContext::Validation,
                &format!("Rejected pre-image request: {}", error),
                None,
            );
            error
        })?;

        let sorted = sort_inputs(outputs, SortOrder::AmountDescending);
        let context = SelectionContext {
            change_script,
            destination,
            fee,
            total_outputs_count: sorted.len(),
        };

        let start = Instant::now();
        log::debug!(
            "Start selection over {} outputs ({} total) for {}",
            sorted.len(),
            total,
            destination.amount
        );

        let selector = BranchAndBoundSelector::new(&self.calculator, context, self.config.limits());
        let outcome = selector.select(&sorted);

        let mut transaction = match outcome.best {
            Some(transaction) if !transaction.inputs.is_empty() => transaction,
            _ => {
                log::debug!(
                    "No suitable outputs after {} tries ({:?})",
                    outcome.tries,
                    outcome.stop
                );
                return Err(BuilderError::UnableToFindSuitableUtxos);
            }
        };

        sort_in_place(&mut transaction.inputs, self.config.result_input_order);

        log::debug!(
            "End selection in {:?} after {} tries with {}",
            start.elapsed(),
            outcome.tries,
            transaction
        );
        if log::log_enabled!(log::Level::Trace) {
            for input in &transaction.inputs {
                log::trace!("Selected {} ({})", sanitize_for_logging(&input.id()), input.amount);
            }
        }

        Ok(transaction)
    }
}
