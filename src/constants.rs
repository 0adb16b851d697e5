//! Configuration constants for the Mastermind engine
//!
//! This module contains the bounds and defaults of the player-facing
//! settings along with the keys under which they are persisted, so the
//! settings layer and any host UI agree on the same limits.

/// Peg count constants
pub mod pegs {
    /// Fewest pegs a player may choose per row
    pub const MIN_COUNT: usize = 4;
    /// Most pegs a player may choose per row
    pub const MAX_COUNT: usize = 8;
    /// Peg count used when nothing has been stored yet
    pub const DEFAULT_COUNT: usize = 5;
}

/// Color count constants
pub mod colors {
    /// Fewest distinct colors a player may choose
    pub const MIN_COUNT: usize = 4;
    /// Most distinct colors a player may choose
    pub const MAX_COUNT: usize = 10;
    /// Color count used when nothing has been stored yet
    pub const DEFAULT_COUNT: usize = 6;
}

/// Guess count constants
pub mod guesses {
    /// Fewest guess rows a player may choose
    pub const MIN_COUNT: usize = 5;
    /// Most guess rows a player may choose
    pub const MAX_COUNT: usize = 20;
    /// Guess row count used when nothing has been stored yet
    pub const DEFAULT_COUNT: usize = 12;
}

/// Keys used by [`crate::settings::Settings`] in a settings store
pub mod keys {
    /// Number of pegs per row
    pub const PEG_COUNT: &str = "peg_count";
    /// Number of distinct colors
    pub const COLOR_COUNT: &str = "color_count";
    /// Whether the target may repeat colors
    pub const ALLOW_DUPLICATES: &str = "allow_duplicates";
    /// Number of guess rows
    pub const GUESS_COUNT: &str = "guess_count";
    /// Color-blind rendering preference
    pub const COLOR_BLIND: &str = "color_blind";
}
