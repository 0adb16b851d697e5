//! Saving and restoring games
//!
//! A game is persisted as a JSON object carrying every [`GameState`] field.
//! Loading is tolerant: unknown fields are ignored, missing fields take
//! their defaults, and a blob that cannot be read or describes an
//! impossible board is replaced by an empty game instead of failing.

use thiserror::Error;
use tracing::warn;

use crate::state::GameState;

/// Reasons a saved blob was not accepted
#[derive(Error, Debug)]
pub enum Error {
    /// The blob is not a JSON game object
    #[error("malformed persisted state: {0}")]
    MalformedPersistedState(#[from] serde_json::Error),
    /// The blob parsed but describes a board the engine cannot produce
    #[error("inconsistent persisted state: {0}")]
    Inconsistent(&'static str),
}

/// Serializes `state` for the host to store
///
/// # Panics
///
/// This function panics if serialization fails, which should never happen
/// with the default JSON serializer for a `GameState`.
pub fn save(state: &GameState) -> String {
    serde_json::to_string(state).expect("default serializer cannot fail")
}

/// Parses a blob produced by [`save`]
///
/// # Errors
///
/// Returns [`Error::MalformedPersistedState`] if the blob is not valid JSON
/// for a game, or [`Error::Inconsistent`] if the restored board breaks the
/// game's invariants.
pub fn try_restore(blob: &str) -> Result<GameState, Error> {
    let state: GameState = serde_json::from_str(blob)?;
    state.check_consistency().map_err(Error::Inconsistent)?;
    Ok(state)
}

/// Parses a blob produced by [`save`], falling back to an empty game
pub fn restore(blob: &str) -> GameState {
    try_restore(blob).unwrap_or_else(|error| {
        warn!(%error, "discarding saved game");
        GameState::default()
    })
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::engine::{Config, GameEngine};

    fn create_test_engine() -> GameEngine {
        let mut engine = GameEngine::with_seed(21);
        engine
            .reset(Config {
                peg_count: 4,
                color_count: 8,
                allow_duplicates: true,
                guess_count: 6,
            })
            .expect("test config is valid");
        engine
    }

    #[test]
    fn test_round_trip_through_play() {
        let mut engine = create_test_engine();
        assert_eq!(restore(&engine.save()), *engine.state());

        engine.reveal(1);
        for color in [0, 1, 2, 3] {
            engine.set_color(color);
        }
        engine.validate();
        engine.set_color(5);
        assert_eq!(restore(&engine.save()), *engine.state());

        let target = engine.state().target().expect("target is set").to_vec();
        engine.select_slot(1, 0);
        for color in target {
            engine.set_color(color);
        }
        engine.validate();
        assert!(engine.state().is_over());
        assert_eq!(restore(&engine.save()), *engine.state());
    }

    #[test]
    fn test_round_trip_default_state() {
        let state = GameState::default();
        assert_eq!(try_restore(&save(&state)).expect("valid blob"), state);
    }

    #[test]
    fn test_engine_restore() {
        let engine = create_test_engine();
        let restored = GameEngine::restore(&engine.save());
        assert_eq!(restored.state(), engine.state());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let engine = create_test_engine();
        let mut value: serde_json::Value =
            serde_json::from_str(&engine.save()).expect("save produces JSON");
        value["first_row_color_count"] = serde_json::json!(4);
        value["theme"] = serde_json::json!("dark");

        let restored = try_restore(&value.to_string()).expect("extra fields are fine");
        assert_eq!(restored, *engine.state());
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        assert_eq!(
            try_restore("{}").expect("empty object is the empty game"),
            GameState::default()
        );
    }

    #[test]
    fn test_outcome_uses_screaming_case() {
        let blob = save(&GameState::default());
        assert!(blob.contains(r#""won":"NOT_WON""#));
        let value: serde_json::Value = serde_json::from_str(&blob).expect("save produces JSON");
        assert!(value.get("target").is_none());
        assert_eq!(value["revealed_targets"], serde_json::json!([]));
    }

    #[test]
    fn test_corrupt_blob_falls_back_to_default() {
        for blob in ["", "not json", "[1,2,3]", r#"{"validated_count":"three"}"#] {
            assert!(matches!(
                try_restore(blob),
                Err(Error::MalformedPersistedState(_))
            ));
            assert_eq!(restore(blob), GameState::default());
        }
    }

    #[test]
    fn test_inconsistent_blob_falls_back_to_default() {
        let engine = create_test_engine();
        let mut value: serde_json::Value =
            serde_json::from_str(&engine.save()).expect("save produces JSON");
        value["validated_count"] = serde_json::json!(42);

        let blob = value.to_string();
        assert!(matches!(try_restore(&blob), Err(Error::Inconsistent(_))));
        assert_eq!(restore(&blob), GameState::default());
    }
}
