use std::collections::HashSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// One entry of a multi-column ordering. `column` is the index into the
/// column descriptor list, which is what the backend receives as the
/// order column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortClause {
    pub column: usize,
    pub dir: SortDirection,
}

impl SortClause {
    pub fn asc(column: usize) -> Self {
        Self {
            column,
            dir: SortDirection::Asc,
        }
    }

    pub fn desc(column: usize) -> Self {
        Self {
            column,
            dir: SortDirection::Desc,
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(format!("unknown sort direction '{other}', expected asc or desc")),
        }
    }
}

/// Parses `column[:dir]`, e.g. `2:desc`. Direction defaults to ascending.
impl FromStr for SortClause {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (column, dir) = match value.split_once(':') {
            Some((column, dir)) => (column, dir.parse::<SortDirection>()?),
            None => (value, SortDirection::Asc),
        };
        let column = column
            .trim()
            .parse::<usize>()
            .map_err(|_| format!("invalid sort column '{}'", column.trim()))?;
        Ok(SortClause { column, dir })
    }
}

/// Turns the grid's single-column sort clicks into a durable multi-column
/// ordering. Most recently touched columns come first; no column appears
/// twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortHistory {
    clauses: Vec<SortClause>,
}

impl SortHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the history from a persisted snapshot. Later duplicates of a
    /// column are dropped so the invariant holds even for hand-edited state.
    pub fn from_clauses(clauses: Vec<SortClause>) -> Self {
        let mut seen = HashSet::new();
        let clauses = clauses
            .into_iter()
            .filter(|clause| seen.insert(clause.column))
            .collect();
        Self { clauses }
    }

    /// Merges the incoming order in front of the remembered history and
    /// returns a snapshot of the result for the current request.
    pub fn update(&mut self, current_order: &[SortClause]) -> Vec<SortClause> {
        let touched: HashSet<usize> = current_order.iter().map(|clause| clause.column).collect();
        self.clauses
            .retain(|clause| !touched.contains(&clause.column));

        let mut merged = Vec::with_capacity(current_order.len() + self.clauses.len());
        let mut seen = HashSet::new();
        for clause in current_order {
            // the grid should never send one column twice, keep the first if it does
            if seen.insert(clause.column) {
                merged.push(*clause);
            }
        }
        merged.append(&mut self.clauses);
        self.clauses = merged;

        self.clauses.clone()
    }

    pub fn clauses(&self) -> &[SortClause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}
