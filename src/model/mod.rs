/// Effective difficulty attributes under mods.
pub mod attributes;

/// The gamemode of a beatmap or score.
pub mod mode;

/// Mod decoding and its derived properties.
pub mod mods;

/// Hit statistics of recorded and hypothetical plays.
pub mod score;
