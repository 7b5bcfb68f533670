//! Type inference and column profiling.

mod statistical;
mod typing;

pub use statistical::Profiler;
pub use typing::{infer_column_type, infer_table};
