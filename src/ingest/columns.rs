use std::collections::BTreeSet;

use crate::error::{Error, Result};

/// Chooses a subset of a table's columns.
///
/// Columns are added with `pick` and `range`, and `exclude` removes
/// columns regardless of when it is called. `values()` is ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnPicker {
    num_columns: usize,
    picked: BTreeSet<usize>,
    excluded: BTreeSet<usize>,
}

impl ColumnPicker {
    pub fn new(num_columns: usize) -> ColumnPicker {
        ColumnPicker { num_columns, ..Default::default() }
    }

    pub fn num_columns(&self) -> usize {
        self.num_columns
    }

    /// Selected columns, minus exclusions.
    pub fn values(&self) -> Vec<usize> {
        self.picked.difference(&self.excluded).copied().collect()
    }

    pub fn pick(&mut self, cols: &[usize]) -> Result<&mut Self> {
        for &col in cols {
            self.check(col)?;
        }
        self.picked.extend(cols.iter().copied());
        Ok(self)
    }

    pub fn exclude(&mut self, cols: &[usize]) -> &mut Self {
        self.excluded.extend(cols.iter().copied());
        self
    }

    /// Adds `start..end`. A descending range walks down from `start`
    /// (exclusive of `end`); `start == end` adds just `start`.
    pub fn range(&mut self, start: usize, end: usize) -> Result<&mut Self> {
        let cols: Vec<usize> = if start < end {
            (start..end).collect()
        } else if start > end {
            ((end + 1)..=start).rev().collect()
        } else {
            vec![start]
        };
        self.pick(&cols)
    }

    fn check(&self, col: usize) -> Result<()> {
        if col >= self.num_columns {
            return Err(Error::ColumnOutOfRange { col, num_columns: self.num_columns });
        }
        Ok(())
    }
}
