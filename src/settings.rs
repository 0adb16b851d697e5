//! Player-facing game options
//!
//! This module defines the options a player picks before starting a game,
//! the bounds they are held to, and how they are loaded from and written to
//! a host-provided key-value store. The engine itself never reads settings;
//! the host turns them into a [`Config`] when it starts a game.

use std::collections::HashMap;

use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::{
    constants::{colors, guesses, keys, pegs},
    engine::Config,
};

/// Key-value storage the host wires to its platform preferences
pub trait SettingsStore {
    /// Reads an integer, `None` if the key is missing or not an integer
    fn get_int(&self, key: &str) -> Option<i64>;

    /// Stores an integer under `key`
    fn set_int(&mut self, key: &str, value: i64);

    /// Reads a boolean, `None` if the key is missing or not a boolean
    fn get_bool(&self, key: &str) -> Option<bool>;

    /// Stores a boolean under `key`
    fn set_bool(&mut self, key: &str, value: bool);

    /// Removes `key` from the store
    fn remove(&mut self, key: &str);
}

/// A value held by a [`MemoryStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::From)]
#[serde(untagged)]
pub enum StoredValue {
    /// Integer preference
    Int(i64),
    /// Boolean preference
    Bool(bool),
}

/// In-memory [`SettingsStore`]
///
/// Serializable so a host without a preferences API can keep it in a file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryStore(HashMap<String, StoredValue>);

impl SettingsStore for MemoryStore {
    fn get_int(&self, key: &str) -> Option<i64> {
        match self.0.get(key) {
            Some(StoredValue::Int(value)) => Some(*value),
            _ => None,
        }
    }

    fn set_int(&mut self, key: &str, value: i64) {
        self.0.insert(key.to_owned(), value.into());
    }

    fn get_bool(&self, key: &str) -> Option<bool> {
        match self.0.get(key) {
            Some(StoredValue::Bool(value)) => Some(*value),
            _ => None,
        }
    }

    fn set_bool(&mut self, key: &str, value: bool) {
        self.0.insert(key.to_owned(), value.into());
    }

    fn remove(&mut self, key: &str) {
        self.0.remove(key);
    }
}

/// Options chosen by the player
///
/// Peg and color counts are kept coupled so that a game without repeated
/// colors can always be generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Settings {
    /// Number of pegs per row
    #[garde(range(min = pegs::MIN_COUNT, max = pegs::MAX_COUNT))]
    peg_count: usize,
    /// Number of distinct colors
    #[garde(
        range(min = colors::MIN_COUNT, max = colors::MAX_COUNT),
        custom(at_least_pegs(&self.peg_count))
    )]
    color_count: usize,
    /// Whether the target may repeat colors
    #[garde(skip)]
    allow_duplicates: bool,
    /// Number of guess rows
    #[garde(range(min = guesses::MIN_COUNT, max = guesses::MAX_COUNT))]
    guess_count: usize,
    /// Whether the host should render with color-blind markers
    #[garde(skip)]
    color_blind: bool,
}

/// Validates that there are at least as many colors as pegs
fn at_least_pegs(peg_count: &usize) -> impl FnOnce(&usize, &()) -> garde::Result + '_ {
    move |color_count, _| {
        if color_count < peg_count {
            Err(garde::Error::new(format!(
                "{color_count} colors cannot fill {peg_count} pegs"
            )))
        } else {
            Ok(())
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            peg_count: pegs::DEFAULT_COUNT,
            color_count: colors::DEFAULT_COUNT,
            allow_duplicates: false,
            guess_count: guesses::DEFAULT_COUNT,
            color_blind: false,
        }
    }
}

/// Reads a count from `store`, clamped to `[min, max]`
fn load_count<S: SettingsStore + ?Sized>(
    store: &S,
    key: &str,
    default: usize,
    min: usize,
    max: usize,
) -> usize {
    store.get_int(key).map_or(default, |value| {
        usize::try_from(value).unwrap_or(0).clamp(min, max)
    })
}

impl Settings {
    /// Loads every option from `store`
    ///
    /// Missing keys take their default and out-of-range values are clamped,
    /// so the result always passes validation.
    pub fn load<S: SettingsStore + ?Sized>(store: &S) -> Self {
        let defaults = Self::default();
        let peg_count = load_count(
            store,
            keys::PEG_COUNT,
            defaults.peg_count,
            pegs::MIN_COUNT,
            pegs::MAX_COUNT,
        );
        let color_count = load_count(
            store,
            keys::COLOR_COUNT,
            defaults.color_count,
            colors::MIN_COUNT,
            colors::MAX_COUNT,
        );

        let settings = Self {
            peg_count: peg_count.min(color_count),
            color_count,
            allow_duplicates: store
                .get_bool(keys::ALLOW_DUPLICATES)
                .unwrap_or(defaults.allow_duplicates),
            guess_count: load_count(
                store,
                keys::GUESS_COUNT,
                defaults.guess_count,
                guesses::MIN_COUNT,
                guesses::MAX_COUNT,
            ),
            color_blind: store
                .get_bool(keys::COLOR_BLIND)
                .unwrap_or(defaults.color_blind),
        };
        if settings.peg_count != peg_count {
            tracing::debug!(
                peg_count,
                color_count,
                "stored peg count lowered to color count"
            );
        }
        settings
    }

    /// Writes every option to `store`
    pub fn store<S: SettingsStore + ?Sized>(&self, store: &mut S) {
        store.set_int(keys::PEG_COUNT, self.peg_count as i64);
        store.set_int(keys::COLOR_COUNT, self.color_count as i64);
        store.set_bool(keys::ALLOW_DUPLICATES, self.allow_duplicates);
        store.set_int(keys::GUESS_COUNT, self.guess_count as i64);
        store.set_bool(keys::COLOR_BLIND, self.color_blind);
    }

    /// Returns the configuration for a new game with these options
    pub fn config(&self) -> Config {
        Config {
            peg_count: self.peg_count,
            color_count: self.color_count,
            allow_duplicates: self.allow_duplicates,
            guess_count: self.guess_count,
        }
    }

    /// Returns the number of pegs per row
    pub fn peg_count(&self) -> usize {
        self.peg_count
    }

    /// Returns the number of distinct colors
    pub fn color_count(&self) -> usize {
        self.color_count
    }

    /// Returns whether the target may repeat colors
    pub fn allow_duplicates(&self) -> bool {
        self.allow_duplicates
    }

    /// Returns the number of guess rows
    pub fn guess_count(&self) -> usize {
        self.guess_count
    }

    /// Returns the color-blind rendering preference
    pub fn color_blind(&self) -> bool {
        self.color_blind
    }

    /// Sets the peg count, raising the color count if it falls behind
    pub fn set_peg_count(&mut self, peg_count: usize) {
        self.peg_count = peg_count.clamp(pegs::MIN_COUNT, pegs::MAX_COUNT);
        self.color_count = self.color_count.max(self.peg_count);
    }

    /// Sets the color count, lowering the peg count if it gets ahead
    pub fn set_color_count(&mut self, color_count: usize) {
        self.color_count = color_count.clamp(colors::MIN_COUNT, colors::MAX_COUNT);
        self.peg_count = self.peg_count.min(self.color_count);
    }

    /// Sets whether the target may repeat colors
    pub fn set_allow_duplicates(&mut self, allow_duplicates: bool) {
        self.allow_duplicates = allow_duplicates;
    }

    /// Sets the number of guess rows
    pub fn set_guess_count(&mut self, guess_count: usize) {
        self.guess_count = guess_count.clamp(guesses::MIN_COUNT, guesses::MAX_COUNT);
    }

    /// Sets the color-blind rendering preference
    pub fn set_color_blind(&mut self, color_blind: bool) {
        self.color_blind = color_blind;
    }
}
