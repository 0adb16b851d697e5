//! # Mastermind Game Library
//!
//! This library provides the core game logic for a single-player
//! Mastermind game: the player guesses a hidden sequence of colored pegs
//! within a limited number of attempts and receives feedback on exact and
//! misplaced colors after every guess. It handles target generation, guess
//! scoring, game state transitions, save/restore of games in progress, and
//! the player-facing options a host persists between sessions.
//!
//! Rendering and platform storage are left to the host, which holds a
//! [`GameEngine`], renders its [`GameState`], and forwards player input.

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::module_name_repetitions)]

pub mod constants;

pub mod engine;
pub mod persist;
pub mod scoring;
pub mod settings;
pub mod state;

pub use engine::{Action, Config, GameEngine};
pub use scoring::Score;
pub use settings::{Settings, SettingsStore};
pub use state::{GameState, Outcome};

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_full_game_from_settings() {
        let mut store = settings::MemoryStore::default();
        let mut settings = Settings::load(&store);
        settings.set_peg_count(4);
        settings.store(&mut store);

        let mut engine = GameEngine::with_seed(17);
        engine
            .reset(Settings::load(&store).config())
            .expect("settings always produce a valid config");
        assert_eq!(engine.state().peg_count(), 4);
        assert_eq!(engine.state().guess_count(), 12);

        let target = engine.state().target().expect("target is set").to_vec();
        let blob = engine.save();
        let mut engine = GameEngine::restore(&blob);

        for color in target {
            engine.apply(Action::SetColor(color)).expect("cannot fail");
        }
        let state = engine.apply(Action::Validate).expect("cannot fail");
        assert_eq!(state.won(), Outcome::Won);
        assert_eq!(state.score(0), Some(Score { exact: 4, bad: 0 }));
    }
}
