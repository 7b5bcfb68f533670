//! Typed table model and derived column profiles.

mod column;
mod table;
mod types;

pub use column::{ColumnProfile, NumericBounds};
pub use table::{Column, Table};
pub use types::{Cell, ColumnType};
