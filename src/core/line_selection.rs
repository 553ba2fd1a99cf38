//! Parsing of user-provided line selections inside a hunk.
//!
//! The `--lines` option of `stage` and `unstage` takes numbers like `"1 3-5,8"`.
//! Numbers are 1-based and count only the changed lines of the hunk (additions and
//! deletions), which is how `git-atlas diff` numbers them. [`LineSelection`] turns
//! that input into indices of [`DiffHunk::lines`].
//!
//! # Supported Formats
//! - **Single numbers**: `1`, `3`
//! - **Space or comma separated**: `1 3 5`, `1,3,5`
//! - **Ranges**: `3-6` (expands to 3,4,5,6)
//! - **Mixed**: `1 3-5,8`
//!
//! Duplicates are removed and the result is sorted. Every number is checked against
//! the hunk's change-line count before a range is expanded.

use crate::core::error::{GitAtlasError, Result};
use crate::core::hunk::DiffHunk;
use std::collections::BTreeSet;

pub struct LineSelection;

impl LineSelection {
    /// Parse `input` into sorted unique numbers within `1..=max`
    pub fn parse(input: &str, max: usize) -> Result<Vec<usize>> {
        let mut numbers = BTreeSet::new();

        for part in input.split([' ', ',']).map(str::trim).filter(|s| !s.is_empty()) {
            match part.split_once('-') {
                Some((start, end)) => {
                    if end.contains('-') {
                        return Err(GitAtlasError::invalid_range_format(part));
                    }
                    let start: usize = start
                        .parse()
                        .map_err(|_| GitAtlasError::invalid_range_number(start))?;
                    let end: usize = end
                        .parse()
                        .map_err(|_| GitAtlasError::invalid_range_number(end))?;
                    if start > end {
                        return Err(GitAtlasError::invalid_range_order(start, end));
                    }
                    Self::validate(&[start, end], max)?;
                    numbers.extend(start..=end);
                }
                None => {
                    let number: usize = part
                        .parse()
                        .map_err(|_| GitAtlasError::invalid_number(part))?;
                    Self::validate(&[number], max)?;
                    numbers.insert(number);
                }
            }
        }

        Ok(numbers.into_iter().collect())
    }

    pub fn validate(numbers: &[usize], max: usize) -> Result<()> {
        for &number in numbers {
            if number == 0 {
                return Err(GitAtlasError::ZeroIndex);
            }
            if number > max {
                return Err(GitAtlasError::line_out_of_range(number, max));
            }
        }
        Ok(())
    }

    /// Map 1-based change-line numbers from `input` to indices into `hunk.lines`
    pub fn resolve(hunk: &DiffHunk, input: &str) -> Result<BTreeSet<usize>> {
        let changes = hunk.change_line_indices();
        let numbers = Self::parse(input, changes.len())?;
        Ok(numbers.into_iter().map(|n| changes[n - 1]).collect())
    }
}
