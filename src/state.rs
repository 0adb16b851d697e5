//! Game state snapshots
//!
//! A [`GameState`] is an immutable picture of one puzzle: the hidden target,
//! every guess row with its feedback, and the progress counters. The engine
//! never edits a snapshot that has been handed out; each action produces a
//! fresh one.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::scoring::Score;

/// Outcome of the current game
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    /// Game is still being played (or has not started)
    #[default]
    #[display("in progress")]
    NotWon,
    /// A validated row matched the target exactly
    #[display("won")]
    Won,
    /// Every row was used without an exact match
    #[display("lost")]
    Lost,
}

/// Snapshot of a single Mastermind game
///
/// The default value is the empty board shown before the first reset: no
/// target, no rows.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameState {
    /// Hidden solution, absent until the first reset
    pub(crate) target: Option<Vec<usize>>,
    /// Per target position, whether the player has peeked at it
    pub(crate) revealed_targets: Vec<bool>,
    /// Number of colors in play
    pub(crate) color_count: usize,
    /// Guess rows, `None` marking an empty cell
    pub(crate) guesses: Vec<Vec<Option<usize>>>,
    /// Exact match count per row, set once the row is validated
    pub(crate) exact_placements: Vec<Option<usize>>,
    /// Misplaced color count per row, parallel to `exact_placements`
    pub(crate) bad_placements: Vec<Option<usize>>,
    /// Rows validated so far, also the index of the active row
    pub(crate) validated_count: usize,
    /// Column of the active row that receives the next color
    pub(crate) selected_index: usize,
    /// Outcome of the game
    pub(crate) won: Outcome,
}

impl GameState {
    /// Builds the board for a fresh game around `target`
    pub(crate) fn new_game(target: Vec<usize>, color_count: usize, guess_count: usize) -> Self {
        let peg_count = target.len();
        Self {
            target: Some(target),
            revealed_targets: vec![false; peg_count],
            color_count,
            guesses: vec![vec![None; peg_count]; guess_count],
            exact_placements: vec![None; guess_count],
            bad_placements: vec![None; guess_count],
            validated_count: 0,
            selected_index: 0,
            won: Outcome::NotWon,
        }
    }

    /// Returns the hidden target, if a game has been started
    pub fn target(&self) -> Option<&[usize]> {
        self.target.as_deref()
    }

    /// Returns the reveal flag of every target position
    pub fn revealed_targets(&self) -> &[bool] {
        &self.revealed_targets
    }

    /// Returns the color of target position `position` if the player revealed it
    pub fn revealed_color(&self, position: usize) -> Option<usize> {
        match (self.revealed_targets.get(position), &self.target) {
            (Some(true), Some(target)) => target.get(position).copied(),
            _ => None,
        }
    }

    /// Returns the number of colors in play
    pub fn color_count(&self) -> usize {
        self.color_count
    }

    /// Returns every guess row
    pub fn guesses(&self) -> &[Vec<Option<usize>>] {
        &self.guesses
    }

    /// Returns the exact match count of every row
    pub fn exact_placements(&self) -> &[Option<usize>] {
        &self.exact_placements
    }

    /// Returns the misplaced color count of every row
    pub fn bad_placements(&self) -> &[Option<usize>] {
        &self.bad_placements
    }

    /// Returns the number of validated rows
    pub fn validated_count(&self) -> usize {
        self.validated_count
    }

    /// Returns the selected column of the active row
    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    /// Returns the outcome of the game
    pub fn won(&self) -> Outcome {
        self.won
    }

    /// Returns the number of pegs per row, zero before the first reset
    pub fn peg_count(&self) -> usize {
        self.target.as_ref().map_or(0, Vec::len)
    }

    /// Returns the number of guess rows
    pub fn guess_count(&self) -> usize {
        self.guesses.len()
    }

    /// Whether the game has reached [`Outcome::Won`] or [`Outcome::Lost`]
    pub fn is_over(&self) -> bool {
        self.won != Outcome::NotWon
    }

    /// Whether a game is running and accepts edits
    pub(crate) fn is_playable(&self) -> bool {
        self.target.is_some() && self.won == Outcome::NotWon
    }

    /// Returns the row the player is currently filling in
    ///
    /// # Returns
    ///
    /// `None` before the first reset and once the game is over.
    pub fn active_row(&self) -> Option<&[Option<usize>]> {
        if self.is_playable() {
            self.guesses.get(self.validated_count).map(Vec::as_slice)
        } else {
            None
        }
    }

    /// Whether the active row is complete and can be validated
    ///
    /// UI layers gate their validate affordance on this flag.
    pub fn validate_enabled(&self) -> bool {
        self.active_row()
            .is_some_and(|row| row.iter().all(Option::is_some))
    }

    /// Returns the feedback recorded for `row`, if it has been validated
    pub fn score(&self, row: usize) -> Option<Score> {
        match (
            self.exact_placements.get(row).copied().flatten(),
            self.bad_placements.get(row).copied().flatten(),
        ) {
            (Some(exact), Some(bad)) => Some(Score { exact, bad }),
            _ => None,
        }
    }

    /// Checks that this snapshot could have been produced by the engine
    ///
    /// # Errors
    ///
    /// Returns a short description of the first broken invariant.
    pub(crate) fn check_consistency(&self) -> Result<(), &'static str> {
        let Some(target) = &self.target else {
            let untouched = self.revealed_targets.is_empty()
                && self.guesses.is_empty()
                && self.exact_placements.is_empty()
                && self.bad_placements.is_empty()
                && self.validated_count == 0
                && self.selected_index == 0
                && self.won == Outcome::NotWon;
            return if untouched {
                Ok(())
            } else {
                Err("board without a target")
            };
        };

        let peg_count = target.len();
        let guess_count = self.guesses.len();

        if peg_count == 0 || self.color_count == 0 || guess_count == 0 {
            return Err("empty game dimensions");
        }
        if self.revealed_targets.len() != peg_count {
            return Err("reveal flags do not match peg count");
        }
        if self.exact_placements.len() != guess_count || self.bad_placements.len() != guess_count
        {
            return Err("placement counts do not match guess count");
        }
        if self.guesses.iter().any(|row| row.len() != peg_count) {
            return Err("guess row length does not match peg count");
        }
        let colors_in_range = target
            .iter()
            .copied()
            .chain(self.guesses.iter().flatten().flatten().copied())
            .all(|color| color < self.color_count);
        if !colors_in_range {
            return Err("color out of range");
        }
        if self.validated_count > guess_count {
            return Err("more rows validated than exist");
        }
        if self.selected_index >= peg_count {
            return Err("selected column out of range");
        }

        // Scored rows form a prefix of the board.
        let scored = (0..guess_count)
            .take_while(|&row| self.score(row).is_some())
            .count();
        if (scored..guess_count).any(|row| {
            self.exact_placements[row].is_some() || self.bad_placements[row].is_some()
        }) {
            return Err("scored row after an unscored one");
        }
        for row in 0..scored {
            let recorded = self.score(row);
            let cells: Option<Vec<usize>> = self.guesses[row].iter().copied().collect();
            let Some(cells) = cells else {
                return Err("validated row has empty cells");
            };
            if recorded != Some(crate::scoring::score(target, &cells)) {
                return Err("recorded score does not match row");
            }
        }

        let solved_rows = (0..scored)
            .filter(|&row| self.score(row).is_some_and(|s| s.is_solved(peg_count)))
            .collect_vec();

        let consistent = match self.won {
            Outcome::Won => {
                scored > 0
                    && solved_rows == [scored - 1]
                    && self.validated_count == guess_count
            }
            Outcome::Lost => {
                solved_rows.is_empty()
                    && scored == guess_count
                    && self.validated_count == guess_count
            }
            Outcome::NotWon => {
                solved_rows.is_empty()
                    && scored == self.validated_count
                    && scored < guess_count
            }
        };
        if consistent {
            Ok(())
        } else {
            Err("outcome does not match validated rows")
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn create_test_state() -> GameState {
        GameState::new_game(vec![0, 1, 2], 4, 3)
    }

    #[test]
    fn test_default_state_has_no_game() {
        let state = GameState::default();
        assert_eq!(state.target(), None);
        assert_eq!(state.peg_count(), 0);
        assert_eq!(state.guess_count(), 0);
        assert_eq!(state.won(), Outcome::NotWon);
        assert!(state.active_row().is_none());
        assert!(!state.validate_enabled());
        assert!(state.check_consistency().is_ok());
    }

    #[test]
    fn test_new_game_dimensions() {
        let state = create_test_state();
        assert_eq!(state.peg_count(), 3);
        assert_eq!(state.guess_count(), 3);
        assert_eq!(state.revealed_targets(), &[false, false, false]);
        assert!(state.guesses().iter().all(|row| row == &[None, None, None]));
        assert_eq!(state.exact_placements(), &[None, None, None]);
        assert_eq!(state.bad_placements(), &[None, None, None]);
        assert!(state.check_consistency().is_ok());
    }

    #[test]
    fn test_validate_enabled_requires_full_row() {
        let mut state = create_test_state();
        state.guesses[0] = vec![Some(0), None, Some(1)];
        assert!(!state.validate_enabled());

        state.guesses[0][1] = Some(3);
        assert!(state.validate_enabled());

        state.won = Outcome::Lost;
        assert!(!state.validate_enabled());
    }

    #[test]
    fn test_revealed_color_only_when_flagged() {
        let mut state = create_test_state();
        assert_eq!(state.revealed_color(2), None);
        state.revealed_targets[2] = true;
        assert_eq!(state.revealed_color(2), Some(2));
        assert_eq!(state.revealed_color(7), None);
    }

    #[test]
    fn test_score_requires_both_counts() {
        let mut state = create_test_state();
        state.exact_placements[0] = Some(1);
        assert_eq!(state.score(0), None);
        state.bad_placements[0] = Some(2);
        assert_eq!(state.score(0), Some(Score { exact: 1, bad: 2 }));
    }

    #[test]
    fn test_consistency_rejects_out_of_range_color() {
        let mut state = create_test_state();
        state.guesses[0][0] = Some(9);
        assert_eq!(state.check_consistency(), Err("color out of range"));
    }

    #[test]
    fn test_consistency_rejects_wrong_score() {
        let mut state = create_test_state();
        state.guesses[0] = vec![Some(0), Some(1), Some(3)];
        state.exact_placements[0] = Some(3);
        state.bad_placements[0] = Some(0);
        state.validated_count = 1;
        assert_eq!(
            state.check_consistency(),
            Err("recorded score does not match row")
        );
    }

    #[test]
    fn test_consistency_accepts_locked_rows_after_win() {
        let mut state = create_test_state();
        state.guesses[0] = vec![Some(0), Some(1), Some(2)];
        state.exact_placements[0] = Some(3);
        state.bad_placements[0] = Some(0);
        state.validated_count = 3;
        state.won = Outcome::Won;
        assert!(state.check_consistency().is_ok());
    }

    #[test]
    fn test_consistency_rejects_unearned_win() {
        let mut state = create_test_state();
        state.won = Outcome::Won;
        state.validated_count = 3;
        assert!(state.check_consistency().is_err());
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(Outcome::NotWon.to_string(), "in progress");
        assert_eq!(Outcome::Lost.to_string(), "lost");
    }
}
