//! Guess evaluation
//!
//! This module compares a guess row against the hidden target and reports
//! how many pegs are in the right place and how many have the right color
//! in the wrong place.

use serde::{Deserialize, Serialize};

/// Feedback for a single validated row
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[display("{exact} exact, {bad} misplaced")]
pub struct Score {
    /// Pegs matching the target in both color and position
    pub exact: usize,
    /// Pegs whose color appears at another, unmatched target position
    pub bad: usize,
}

impl Score {
    /// Whether this score solves a puzzle with `peg_count` pegs
    pub fn is_solved(&self, peg_count: usize) -> bool {
        self.exact == peg_count
    }
}

/// Scores `guess` against `target`
///
/// Exact matches are counted and consumed first, position by position.
/// Every remaining guess peg then consumes the leftmost remaining target peg
/// of the same color, counting one misplaced peg per hit. A target peg is
/// never matched twice, so duplicate colors are not over-counted.
///
/// Both slices are expected to have the same length; extra pegs on either
/// side are ignored.
pub fn score(target: &[usize], guess: &[usize]) -> Score {
    let mut remaining_target: Vec<Option<usize>> = Vec::with_capacity(target.len());
    let mut remaining_guess: Vec<Option<usize>> = Vec::with_capacity(guess.len());

    let mut exact = 0;
    for (&t, &g) in target.iter().zip(guess) {
        if t == g {
            exact += 1;
            remaining_target.push(None);
            remaining_guess.push(None);
        } else {
            remaining_target.push(Some(t));
            remaining_guess.push(Some(g));
        }
    }

    let mut bad = 0;
    for color in remaining_guess.into_iter().flatten() {
        if let Some(slot) = remaining_target
            .iter_mut()
            .find(|slot| **slot == Some(color))
        {
            *slot = None;
            bad += 1;
        }
    }

    Score { exact, bad }
}
