//! Type-driven filtering.
//!
//! ```text
//!  Table ──► Profiler ──► ColumnClassifier ──► FilterPlan (widgets)
//!                                                   │
//!                                 caller-owned FilterSet (parameters)
//!                                                   │
//!  Table ─────────────────────────► FilterComposer ◄┘ ──► FilteredView
//! ```

mod classifier;
mod compose;
mod plan;
mod spec;
mod view;

pub use classifier::{
    ClassifierConfig, ColumnClassifier, DEFAULT_CATEGORICAL_THRESHOLD, FilterKind, SkipReason,
};
pub use compose::FilterComposer;
pub use plan::{ColumnWidget, FilterPlan};
pub use spec::{BoolChoice, EmptySelection, FilterParams, FilterSet, FilterSpec, Predicate};
pub use view::{FilteredView, format_count};
