//! Group keys with a total order.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use crate::schema::Cell;

/// A group-by value.
///
/// Manual `Eq`/`Ord`/`Hash` so floats can key a map. Numbers order
/// numerically, text lexically, `false < true`, and the missing group sorts
/// last.
#[derive(Debug, Clone)]
pub(crate) enum GroupKey {
    Bool(bool),
    Number(f64),
    Text(String),
    Missing,
}

impl GroupKey {
    pub(crate) fn from_cell(cell: &Cell) -> Self {
        match cell {
            Cell::Missing => GroupKey::Missing,
            Cell::Bool(b) => GroupKey::Bool(*b),
            // -0.0 and 0.0 are one group.
            Cell::Number(v) => GroupKey::Number(if *v == 0.0 { 0.0 } else { *v }),
            Cell::Text(s) => GroupKey::Text(s.clone()),
        }
    }

    pub(crate) fn into_cell(self) -> Cell {
        match self {
            GroupKey::Missing => Cell::Missing,
            GroupKey::Bool(b) => Cell::Bool(b),
            GroupKey::Number(v) => Cell::Number(v),
            GroupKey::Text(s) => Cell::Text(s),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            GroupKey::Bool(_) => 0,
            GroupKey::Number(_) => 1,
            GroupKey::Text(_) => 2,
            GroupKey::Missing => 3,
        }
    }
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GroupKey {}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (GroupKey::Bool(a), GroupKey::Bool(b)) => a.cmp(b),
            (GroupKey::Number(a), GroupKey::Number(b)) => a.total_cmp(b),
            (GroupKey::Text(a), GroupKey::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl Hash for GroupKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            GroupKey::Bool(b) => b.hash(state),
            GroupKey::Number(v) => v.to_bits().hash(state),
            GroupKey::Text(s) => s.hash(state),
            GroupKey::Missing => {}
        }
    }
}
