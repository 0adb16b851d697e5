//! Game engine and state transitions
//!
//! This module holds the current [`GameState`] of a Mastermind game and
//! turns player actions into new snapshots. Every action either installs a
//! wholly new snapshot or leaves the current one in place, so a reader
//! never observes a half-applied change.

use std::sync::Arc;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::{
    persist, scoring,
    state::{GameState, Outcome},
};

/// Dimensions and rules of a new game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Config {
    /// Number of pegs in the target and in every guess row
    pub peg_count: usize,
    /// Number of distinct colors in play
    pub color_count: usize,
    /// Whether the target may use the same color more than once
    pub allow_duplicates: bool,
    /// Number of guesses the player gets
    pub guess_count: usize,
}

/// Reasons a [`Config`] cannot start a game
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConfigError {
    /// The peg count is zero
    #[error("at least one peg is required")]
    NoPegs,
    /// The color count is zero
    #[error("at least one color is required")]
    NoColors,
    /// The guess count is zero
    #[error("at least one guess is required")]
    NoGuesses,
    /// A target without repeated colors needs at least as many colors as pegs
    #[error("{peg_count} distinct pegs cannot be drawn from {color_count} colors")]
    NotEnoughColors {
        /// Requested peg count
        peg_count: usize,
        /// Requested color count
        color_count: usize,
    },
}

impl Config {
    /// Checks that a target can be generated for this configuration
    ///
    /// # Errors
    ///
    /// Returns the first rule the configuration breaks.
    pub fn check(&self) -> Result<(), ConfigError> {
        if self.peg_count == 0 {
            Err(ConfigError::NoPegs)
        } else if self.color_count == 0 {
            Err(ConfigError::NoColors)
        } else if self.guess_count == 0 {
            Err(ConfigError::NoGuesses)
        } else if !self.allow_duplicates && self.color_count < self.peg_count {
            Err(ConfigError::NotEnoughColors {
                peg_count: self.peg_count,
                color_count: self.color_count,
            })
        } else {
            Ok(())
        }
    }

    /// Draws a random target satisfying this configuration
    ///
    /// With duplicates every peg is drawn independently; without them the
    /// target is the prefix of a shuffled palette.
    fn generate_target(&self, rng: &mut fastrand::Rng) -> Vec<usize> {
        if self.allow_duplicates {
            (0..self.peg_count)
                .map(|_| rng.usize(0..self.color_count))
                .collect_vec()
        } else {
            let mut palette = (0..self.color_count).collect_vec();
            rng.shuffle(&mut palette);
            palette.truncate(self.peg_count);
            palette
        }
    }
}

/// Errors returned by the engine
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Error {
    /// A reset was requested with a configuration that cannot start a game
    #[error("invalid game configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// Player actions understood by [`GameEngine::apply`]
///
/// Hosts driving the engine from an event loop can deserialize these from
/// their message channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Start a new game
    Reset(Config),
    /// Pick the column of the active row that receives the next color
    SelectSlot {
        /// Row that was touched, must be the active row
        row: usize,
        /// Column that was touched
        col: usize,
    },
    /// Place a color in the selected column
    SetColor(usize),
    /// Submit the active row for scoring
    Validate,
    /// Peek at one target peg
    Reveal(usize),
}

/// Holder of the current game
///
/// The engine owns the only writable copy of the game and hands out
/// read-only snapshots.
#[derive(Debug)]
pub struct GameEngine {
    state: Arc<GameState>,
    rng: fastrand::Rng,
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl GameEngine {
    /// Creates an engine with an empty board and an entropy-seeded generator
    pub fn new() -> Self {
        Self::from_state(GameState::default())
    }

    /// Creates an engine with an empty board and a deterministic generator
    pub fn with_seed(seed: u64) -> Self {
        Self {
            state: Arc::default(),
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Creates an engine resuming `state`
    ///
    /// A state the engine could not have produced is replaced by an empty
    /// board.
    pub fn from_state(state: GameState) -> Self {
        let state = match state.check_consistency() {
            Ok(()) => state,
            Err(reason) => {
                warn!(reason, "discarding inconsistent game");
                GameState::default()
            }
        };
        Self {
            state: Arc::new(state),
            rng: fastrand::Rng::new(),
        }
    }

    /// Returns the current snapshot
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Returns a shared handle to the current snapshot
    ///
    /// The handle keeps pointing at this snapshot after later actions.
    pub fn snapshot(&self) -> Arc<GameState> {
        Arc::clone(&self.state)
    }

    /// Serializes the current snapshot for the host to store
    pub fn save(&self) -> String {
        persist::save(&self.state)
    }

    /// Creates an engine from a saved blob
    ///
    /// Unreadable blobs start from an empty board, see [`persist::restore`].
    pub fn restore(blob: &str) -> Self {
        Self::from_state(persist::restore(blob))
    }

    /// Applies `next` and replaces the current snapshot with the result
    fn update<F: FnOnce(&mut GameState)>(&mut self, next: F) -> &GameState {
        let mut state = GameState::clone(&self.state);
        next(&mut state);
        self.state = Arc::new(state);
        &self.state
    }

    /// Starts a new game with a freshly drawn target
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `config` cannot produce a target.
    /// The current game is kept in that case.
    #[instrument(skip(self))]
    pub fn reset(&mut self, config: Config) -> Result<&GameState, Error> {
        config.check()?;

        let target = config.generate_target(&mut self.rng);
        self.state = Arc::new(GameState::new_game(
            target,
            config.color_count,
            config.guess_count,
        ));
        info!("new game started");
        Ok(self.state.as_ref())
    }

    /// Moves the color cursor to column `col` of the active row
    ///
    /// Ignored unless a game is running and `row` is the active row.
    /// Columns past the end of the row select the last column.
    #[instrument(skip(self))]
    pub fn select_slot(&mut self, row: usize, col: usize) -> &GameState {
        if !self.state.is_playable() || row != self.state.validated_count {
            debug!("slot selection ignored");
            return &self.state;
        }

        let col = col.min(self.state.peg_count().saturating_sub(1));
        self.update(|state| state.selected_index = col)
    }

    /// Writes `color` into the selected column and advances the cursor
    ///
    /// The cursor wraps back to the first column after the last one. Ignored
    /// unless a game is running and `color` is in play.
    #[instrument(skip(self))]
    pub fn set_color(&mut self, color: usize) -> &GameState {
        if !self.state.is_playable() || color >= self.state.color_count {
            debug!("color ignored");
            return &self.state;
        }

        self.update(|state| {
            let peg_count = state.peg_count();
            let row = state.validated_count;
            state.guesses[row][state.selected_index] = Some(color);
            state.selected_index = (state.selected_index + 1) % peg_count;
        })
    }

    /// Scores the active row and advances the game
    ///
    /// An exact match wins and locks every remaining row. Otherwise the next
    /// row becomes active, and the game is lost once no rows remain. Ignored
    /// unless [`GameState::validate_enabled`] holds.
    #[instrument(skip(self))]
    pub fn validate(&mut self) -> &GameState {
        let (Some(target), Some(row)) = (self.state.target(), self.state.active_row()) else {
            debug!("validation ignored");
            return &self.state;
        };
        let Some(guess) = row.iter().copied().collect::<Option<Vec<usize>>>() else {
            debug!("validation ignored, row incomplete");
            return &self.state;
        };

        let score = scoring::score(target, &guess);
        let solved = score.is_solved(target.len());

        let state = self.update(|state| {
            let row = state.validated_count;
            state.exact_placements[row] = Some(score.exact);
            state.bad_placements[row] = Some(score.bad);

            if solved {
                state.won = Outcome::Won;
                state.validated_count = state.guesses.len();
            } else {
                state.validated_count += 1;
                if state.validated_count == state.guesses.len() {
                    state.won = Outcome::Lost;
                }
            }
            state.selected_index = 0;
        });

        debug!(%score, "row validated");
        if state.is_over() {
            info!(outcome = %state.won(), "game finished");
        }
        state
    }

    /// Reveals the target peg at `position`
    ///
    /// Ignored once the game is over, for positions outside the target and
    /// for positions already revealed.
    #[instrument(skip(self))]
    pub fn reveal(&mut self, position: usize) -> &GameState {
        if self.state.is_over() || self.state.revealed_targets.get(position) != Some(&false) {
            debug!("reveal ignored");
            return &self.state;
        }

        self.update(|state| state.revealed_targets[position] = true)
    }

    /// Dispatches `action` to the matching operation
    ///
    /// # Errors
    ///
    /// Only [`Action::Reset`] can fail, see [`GameEngine::reset`].
    pub fn apply(&mut self, action: Action) -> Result<&GameState, Error> {
        match action {
            Action::Reset(config) => self.reset(config),
            Action::SelectSlot { row, col } => Ok(self.select_slot(row, col)),
            Action::SetColor(color) => Ok(self.set_color(color)),
            Action::Validate => Ok(self.validate()),
            Action::Reveal(position) => Ok(self.reveal(position)),
        }
    }
}
