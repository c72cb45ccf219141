//! Transaction variant builders
//!
//! A variant builder takes one candidate subset of inputs and tries to lay
//! out concrete outputs for it. Exactly two layouts exist:
//!
//! - [`VariantBuilder::TwoOutput`]: destination plus change
//! - [`VariantBuilder::SingleOutput`]: destination only, with any sub-dust
//!   remainder folded into the fee
//!
//! Each either prices the candidate or rejects it with a [`VariantError`].

use crate::error::VariantError;
use crate::math::TransactionSizeCalculator;
use crate::types::{Destination, FeePolicy, PreImageTransaction, ScriptType, UnspentOutput};

/// Per-call parameters shared by every candidate of one search
#[derive(Debug, Clone, Copy)]
pub struct SelectionContext {
    /// Script of the change output
    pub change_script: ScriptType,
    /// Payment destination
    pub destination: Destination,
    /// Fee policy
    pub fee: FeePolicy,
    /// Number of outputs available to the whole call
    pub total_outputs_count: usize,
}

impl SelectionContext {
    /// Whether `selected` spends every output available to the call
    fn is_sweep(&self, selected: &[UnspentOutput]) -> bool {
        selected.len() == self.total_outputs_count
    }
}

/// Output layout strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantBuilder {
    /// Destination and change outputs
    TwoOutput,
    /// Destination output only
    SingleOutput,
}

impl VariantBuilder {
    /// Both builders, in the order they are evaluated
    pub const ALL: [VariantBuilder; 2] = [VariantBuilder::TwoOutput, VariantBuilder::SingleOutput];

    /// Name of this builder
    pub fn name(&self) -> &'static str {
        match self {
            VariantBuilder::TwoOutput => "TwoOutput",
            VariantBuilder::SingleOutput => "SingleOutput",
        }
    }

    /// Price `selected` with this layout
    ///
    /// # Arguments
    /// * `calculator` - Size and dust oracle
    /// * `context` - Parameters of the current search
    /// * `selected` - Candidate inputs
    /// * `current_sum` - Sum of `selected` amounts
    ///
    /// # Returns
    /// * The priced transaction or the reason the candidate does not fit
    pub fn variant<C: TransactionSizeCalculator>(
        &self,
        calculator: &C,
        context: &SelectionContext,
        selected: &[UnspentOutput],
        current_sum: u64,
    ) -> Result<PreImageTransaction, VariantError> {
        match self {
            VariantBuilder::TwoOutput => two_output(calculator, context, selected, current_sum),
            VariantBuilder::SingleOutput => {
                single_output(calculator, context, selected, current_sum)
            }
        }
    }
}

fn two_output<C: TransactionSizeCalculator>(
    calculator: &C,
    context: &SelectionContext,
    selected: &[UnspentOutput],
    current_sum: u64,
) -> Result<PreImageTransaction, VariantError> {
    let destination = context.destination.amount;

    if current_sum < destination {
        return Err(VariantError::NotEnough);
    }

    let change = current_sum - destination;
    let outputs = [context.change_script, context.destination.script];

    let size = calculator.transaction_size(selected, &outputs);
    let fee = context
        .fee
        .fee_for_size(size)
        .ok_or(VariantError::NotEnoughForFee)?;

    if change < fee {
        return Err(VariantError::NotEnoughForFee);
    }
    let change = change - fee;

    // A non-zero change must be worth spending later
    if change != 0 && change <= calculator.dust(context.change_script) {
        return Err(VariantError::NotEnoughForDustThreshold);
    }

    Ok(PreImageTransaction {
        inputs: selected.to_vec(),
        destination,
        change,
        fee,
        size,
    })
}

fn single_output<C: TransactionSizeCalculator>(
    calculator: &C,
    context: &SelectionContext,
    selected: &[UnspentOutput],
    current_sum: u64,
) -> Result<PreImageTransaction, VariantError> {
    let destination = context.destination.amount;

    if current_sum < destination {
        return Err(VariantError::NotEnough);
    }

    let leftover = current_sum - destination;
    let outputs = [context.destination.script];

    let size = calculator.transaction_size(selected, &outputs);
    let sweep = context.fee.is_calculation() && context.is_sweep(selected);

    let fee = match context.fee.fee_for_size(size) {
        Some(fee) => fee,
        // Nothing else left to spend, the whole remainder goes to the fee
        None if sweep => leftover,
        None => return Err(VariantError::NotEnoughForFee),
    };

    if !sweep && leftover < fee {
        return Err(VariantError::NotEnoughForFee);
    }

    let change = leftover.saturating_sub(fee);
    if change >= calculator.dust(context.change_script) {
        return Err(VariantError::ChangeIsEnough);
    }

    // Sub-dust remainder is paid to miners instead of creating an output.
    // On a sweep the fee is capped at what is left.
    let fee = leftover;

    Ok(PreImageTransaction {
        inputs: selected.to_vec(),
        destination,
        change: 0,
        fee,
        size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitcoin::{OutPoint, Txid};
    use std::str::FromStr;

    /// 10 bytes overhead, 100 per input, 50 per output, dust 500
    struct FixedCalculator;

    impl TransactionSizeCalculator for FixedCalculator {
        fn transaction_size(&self, inputs: &[UnspentOutput], outputs: &[ScriptType]) -> u64 {
            10 + 100 * inputs.len() as u64 + 50 * outputs.len() as u64
        }

        fn dust(&self, _script: ScriptType) -> u64 {
            500
        }
    }

    fn outputs(amounts: &[u64]) -> Vec<UnspentOutput> {
        let txid = Txid::from_str(
            "3333333333333333333333333333333333333333333333333333333333333333",
        )
        .unwrap();
        amounts
            .iter()
            .enumerate()
            .map(|(vout, amount)| {
                UnspentOutput::new(OutPoint::new(txid, vout as u32), *amount, ScriptType::P2wpkh)
            })
            .collect()
    }

    fn context(amount: u64, fee: FeePolicy, total_outputs_count: usize) -> SelectionContext {
        SelectionContext {
            change_script: ScriptType::P2wpkh,
            destination: Destination::new(amount, ScriptType::P2wpkh),
            fee,
            total_outputs_count,
        }
    }

    fn price(
        builder: VariantBuilder,
        context: &SelectionContext,
        selected: &[UnspentOutput],
    ) -> Result<PreImageTransaction, VariantError> {
        let sum = selected.iter().map(|u| u.amount).sum();
        builder.variant(&FixedCalculator, context, selected, sum)
    }

    #[test]
    fn test_two_output_with_change() {
        let selected = outputs(&[100_000]);
        let ctx = context(50_000, FeePolicy::CalculateByRate(2), 3);

        let variant = price(VariantBuilder::TwoOutput, &ctx, &selected).unwrap();

        // size 10 + 100 + 2 * 50
        assert_eq!(variant.size, 210);
        assert_eq!(variant.fee, 420);
        assert_eq!(variant.change, 100_000 - 50_000 - 420);
        assert_eq!(variant.input_total(), variant.destination + variant.change + variant.fee);
    }

    #[test]
    fn test_two_output_rejections() {
        let ctx = context(50_000, FeePolicy::CalculateByRate(2), 3);

        let short = outputs(&[49_999]);
        assert_eq!(
            price(VariantBuilder::TwoOutput, &ctx, &short),
            Err(VariantError::NotEnough)
        );

        let no_fee = outputs(&[50_419]);
        assert_eq!(
            price(VariantBuilder::TwoOutput, &ctx, &no_fee),
            Err(VariantError::NotEnoughForFee)
        );

        // change after fee is exactly the dust threshold
        let dust_change = outputs(&[50_920]);
        assert_eq!(
            price(VariantBuilder::TwoOutput, &ctx, &dust_change),
            Err(VariantError::NotEnoughForDustThreshold)
        );

        let zero_change = outputs(&[50_420]);
        assert_eq!(
            price(VariantBuilder::TwoOutput, &ctx, &zero_change).unwrap().change,
            0
        );
    }

    #[test]
    fn test_two_output_exact_fee() {
        let selected = outputs(&[10_000]);
        let ctx = context(5_000, FeePolicy::Exactly(1_234), 1);

        let variant = price(VariantBuilder::TwoOutput, &ctx, &selected).unwrap();
        assert_eq!(variant.fee, 1_234);
        assert_eq!(variant.change, 10_000 - 5_000 - 1_234);
    }

    #[test]
    fn test_two_output_fee_overflow_is_rejected() {
        let selected = outputs(&[10_000]);
        let ctx = context(5_000, FeePolicy::CalculateByRate(u64::MAX), 1);
        assert_eq!(
            price(VariantBuilder::TwoOutput, &ctx, &selected),
            Err(VariantError::NotEnoughForFee)
        );
    }

    #[test]
    fn test_single_output_folds_remainder_into_fee() {
        let selected = outputs(&[30_000, 25_000]);
        let ctx = context(54_000, FeePolicy::CalculateByRate(2), 5);

        let variant = price(VariantBuilder::SingleOutput, &ctx, &selected).unwrap();

        // size 10 + 200 + 50 = 260, fee 520, remainder 480 < dust
        assert_eq!(variant.size, 260);
        assert_eq!(variant.change, 0);
        assert_eq!(variant.fee, 1_000);
        assert_eq!(variant.input_total(), variant.destination + variant.fee);
    }

    #[test]
    fn test_single_output_rejects_large_remainder() {
        let selected = outputs(&[100_000]);
        let ctx = context(50_000, FeePolicy::CalculateByRate(1), 2);
        assert_eq!(
            price(VariantBuilder::SingleOutput, &ctx, &selected),
            Err(VariantError::ChangeIsEnough)
        );
    }

    #[test]
    fn test_single_output_validates_fee_when_not_sweeping() {
        let selected = outputs(&[50_100]);
        let ctx = context(50_000, FeePolicy::CalculateByRate(1), 2);
        assert_eq!(
            price(VariantBuilder::SingleOutput, &ctx, &selected),
            Err(VariantError::NotEnoughForFee)
        );
    }

    #[test]
    fn test_single_output_sweep_skips_fee_check() {
        let selected = outputs(&[50_100]);
        let ctx = context(50_000, FeePolicy::CalculateByRate(1), 1);

        let variant = price(VariantBuilder::SingleOutput, &ctx, &selected).unwrap();
        assert_eq!(variant.change, 0);
        assert_eq!(variant.fee, 100);
        assert_eq!(variant.input_total(), variant.destination + variant.fee);
    }

    #[test]
    fn test_single_output_exact_fee_always_validated() {
        let selected = outputs(&[50_100]);
        let ctx = context(50_000, FeePolicy::Exactly(200), 1);
        assert_eq!(
            price(VariantBuilder::SingleOutput, &ctx, &selected),
            Err(VariantError::NotEnoughForFee)
        );

        let exact = outputs(&[1_000]);
        let ctx = context(1_000, FeePolicy::Exactly(0), 1);
        let variant = price(VariantBuilder::SingleOutput, &ctx, &exact).unwrap();
        assert_eq!((variant.fee, variant.change), (0, 0));
    }
}
