//! Pre-image transaction construction
//!
//! # Module Structure
//!
//! - `sorter.rs` - Deterministic input orderings
//! - `variants.rs` - Two-output and single-output variant builders
//! - `selector.rs` - Bounded branch-and-bound search over input subsets
//! - `builder.rs` - Public facade with request validation
//!
//! Data flows from the facade (validate) to the sorter, then to the
//! selector, which prices every visited candidate with both variant
//! builders and keeps the cheapest.

pub mod builder;
pub mod selector;
pub mod sorter;
pub mod variants;

pub use builder::{BranchAndBoundPreImageBuilder, PreImageBuilder};
pub use selector::{BranchAndBoundSelector, SearchLimits, SearchOutcome, StopReason};
pub use sorter::{sort_inputs, SortOrder};
pub use variants::{SelectionContext, VariantBuilder};
