//! Branch-and-bound input selection
//!
//! The selector explores subsets of an amount-sorted input list through
//! binary include/exclude decisions. Every visited node is priced by both
//! variant builders and the best variant seen so far is kept.
//!
//! # Bounds
//!
//! The power set grows as `O(2^n)`, so the walk is bounded:
//!
//! - a try counter stops the search after `max_tries` visited nodes
//! - a wall-clock timeout stops it after `timeout`
//! - a node whose selected value plus all undecided inputs cannot reach the
//!   destination amount is not expanded
//! - input lists longer than `max_inputs` skip the walk and price one greedy
//!   candidate instead
//!
//! Hitting a bound is not an error. The best variant found up to that point
//! is returned, which may be locally rather than globally optimal.
//!
//! The walk uses an explicit stack, so deep input lists cannot overflow the
//! call stack. All state lives in one `select` call.

use crate::math::TransactionSizeCalculator;
use crate::pre_image::variants::{SelectionContext, VariantBuilder};
use crate::types::{PreImageTransaction, UnspentOutput};
use std::time::{Duration, Instant};

/// Default cap on visited search nodes
pub const DEFAULT_MAX_TRIES: usize = 100_000;

/// Default input count above which the greedy fallback is used
pub const DEFAULT_MAX_INPUTS: usize = 1_000;

/// Default wall-clock budget of one search
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Bounds applied to one search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    /// Maximum number of visited nodes
    pub max_tries: usize,
    /// Maximum number of inputs explored by branch and bound
    pub max_inputs: usize,
    /// Maximum duration of the search
    pub timeout: Duration,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_tries: DEFAULT_MAX_TRIES,
            max_inputs: DEFAULT_MAX_INPUTS,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Why a search stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every reachable subset was visited
    Exhausted,
    /// The try counter exceeded `max_tries`
    MaxTries,
    /// The timeout elapsed
    Timeout,
    /// Too many inputs, the greedy candidate was priced instead
    GreedyFallback,
}

/// Result of one search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Best variant found, if any
    pub best: Option<PreImageTransaction>,
    /// Number of visited nodes
    pub tries: usize,
    /// Why the search stopped
    pub stop: StopReason,
}

/// One pending node of the walk
struct State {
    /// Indices of the included inputs
    selected: Vec<usize>,
    /// Next input to decide on
    index: usize,
    /// Sum of the included inputs
    current_value: u64,
    /// Sum of the inputs from `index` onward
    remaining: u64,
}

impl State {
    fn include(&self, inputs: &[UnspentOutput]) -> State {
        let amount = inputs[self.index].amount;
        let mut selected = Vec::with_capacity(self.selected.len() + 1);
        selected.extend_from_slice(&self.selected);
        selected.push(self.index);

        State {
            selected,
            index: self.index + 1,
            current_value: self.current_value + amount,
            remaining: self.remaining - amount,
        }
    }

    fn exclude(self, inputs: &[UnspentOutput]) -> State {
        let amount = inputs[self.index].amount;

        State {
            selected: self.selected,
            index: self.index + 1,
            current_value: self.current_value,
            remaining: self.remaining - amount,
        }
    }
}

/// Branch-and-bound selector for one call
///
/// # Arguments
///
/// * `calculator` - Size and dust oracle
/// * `context` - Destination, change script, fee policy and total output count
/// * `limits` - Search bounds
pub struct BranchAndBoundSelector<'a, C: TransactionSizeCalculator> {
    calculator: &'a C,
    context: SelectionContext,
    limits: SearchLimits,
}

impl<'a, C: TransactionSizeCalculator> BranchAndBoundSelector<'a, C> {
    /// Create a selector for one search
    pub fn new(calculator: &'a C, context: SelectionContext, limits: SearchLimits) -> Self {
        Self {
            calculator,
            context,
            limits,
        }
    }

    /// Search `inputs` for the best variant
    ///
    /// `inputs` should be sorted largest amount first so that high-value
    /// branches are explored early, and their total must fit in a `u64`.
    pub fn select(&self, inputs: &[UnspentOutput]) -> SearchOutcome {
        if inputs.len() > self.limits.max_inputs {
            log::debug!(
                "{} inputs exceed the search limit of {}, using greedy selection",
                inputs.len(),
                self.limits.max_inputs
            );
            return SearchOutcome {
                best: self.greedy_select(inputs),
                tries: 1,
                stop: StopReason::GreedyFallback,
            };
        }

        let start = Instant::now();
        let total: u64 = inputs.iter().map(|input| input.amount).sum();
        let target = self.context.destination.amount;

        let mut best: Option<PreImageTransaction> = None;
        let mut tries = 0usize;
        let mut stop = StopReason::Exhausted;
        let mut stack = vec![State {
            selected: Vec::new(),
            index: 0,
            current_value: 0,
            remaining: total,
        }];

        while let Some(state) = stack.pop() {
            if tries >= self.limits.max_tries {
                log::debug!("Stop selection by max tries ({})", self.limits.max_tries);
                stop = StopReason::MaxTries;
                break;
            }
            tries += 1;

            if start.elapsed() > self.limits.timeout {
                log::debug!("Stop selection by timeout after {} tries", tries);
                stop = StopReason::Timeout;
                break;
            }

            let selected: Vec<UnspentOutput> =
                state.selected.iter().map(|&i| inputs[i].clone()).collect();

            if let Some(variant) = self.best_variant(&selected, state.current_value) {
                if best.as_ref().map_or(true, |current| variant.is_better_than(current)) {
                    best = Some(variant);
                }
            }

            if state.index >= inputs.len() {
                continue;
            }

            // No subset below this node can cover the destination
            if state.current_value + state.remaining < target {
                continue;
            }

            // Pushed last so it is explored first
            let include = state.include(inputs);
            stack.push(state.exclude(inputs));
            stack.push(include);
        }

        log::debug!(
            "Selection finished after {} tries in {:?} ({:?})",
            tries,
            start.elapsed(),
            stop
        );

        SearchOutcome { best, tries, stop }
    }

    /// Price `selected` with both builders and keep the better success
    fn best_variant(
        &self,
        selected: &[UnspentOutput],
        current_value: u64,
    ) -> Option<PreImageTransaction> {
        VariantBuilder::ALL
            .iter()
            .filter_map(|builder| {
                match builder.variant(self.calculator, &self.context, selected, current_value) {
                    Ok(variant) => Some(variant),
                    Err(reason) => {
                        log::trace!(
                            "{} rejected {} inputs: {}",
                            builder.name(),
                            selected.len(),
                            reason
                        );
                        None
                    }
                }
            })
            .fold(None, |best: Option<PreImageTransaction>, variant| match best {
                Some(current) if !variant.is_better_than(&current) => Some(current),
                _ => Some(variant),
            })
    }

    /// Take inputs largest first until they cover the destination, then
    /// price that single candidate
    fn greedy_select(&self, inputs: &[UnspentOutput]) -> Option<PreImageTransaction> {
        let target = self.context.destination.amount;
        let mut sum = 0u64;

        for (count, input) in inputs.iter().enumerate() {
            sum += input.amount;
            if sum >= target {
                return self.best_variant(&inputs[..=count], sum);
            }
        }

        None
    }
}
