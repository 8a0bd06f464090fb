use std::error::Error as StdError;

use thiserror::Error;

use crate::model::mode::GameMode;

/// A boxed error coming out of a collaborator.
pub type BoxedError = Box<dyn StdError + Send + Sync>;

/// Failure of the external engine or beatmap provider.
///
/// Sources are propagated verbatim; this crate performs no retries and
/// substitutes no default values.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The beatmap could not be loaded or converted.
    #[error("failed to load or convert beatmap {map_id}")]
    Beatmap {
        /// The id of the offending map.
        map_id: u32,
        /// The provider's error.
        #[source]
        source: BoxedError,
    },
    /// The engine failed to evaluate.
    #[error("performance engine failed")]
    Engine {
        /// The engine's error.
        #[source]
        source: BoxedError,
    },
}

/// Mod-derived context shared by every evaluation of one score.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ModContext {
    /// The legacy mods bitmask.
    pub bits: u32,
    /// The clock rate of the play.
    pub clock_rate: f64,
    /// Whether the play uses the modern ("lazer") scoring engine.
    pub lazer: bool,
}

/// Hit statistics forwarded to the engine, shaped per evaluation kind.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum HitPayload {
    /// Let the engine derive a plausible judgement split from accuracy.
    Accuracy {
        /// The play's accuracy in `[0.0, 1.0]`.
        accuracy: f64,
        /// The play's combo, if it is to be forwarded.
        combo: Option<u32>,
        /// The play's misses, if they are to be forwarded.
        misses: Option<u32>,
    },
    /// Discrete judgement counts.
    Counts {
        /// Amount of gekis (n320 for osu!mania).
        n_geki: u32,
        /// Amount of katus (n200 for osu!mania).
        n_katu: u32,
        /// Amount of 300s.
        n300: u32,
        /// Amount of 100s.
        n100: u32,
        /// Amount of 50s.
        n50: u32,
        /// The play's combo, if it is to be forwarded.
        combo: Option<u32>,
        /// The play's misses, if they are to be forwarded.
        misses: Option<u32>,
        /// Amount of successfully hit slider ticks and repeats.
        slider_tick_hits: Option<u32>,
        /// Amount of successfully hit slider ends.
        slider_end_hits: Option<u32>,
    },
}

/// A beatmap converted to the requested ruleset at a given clock rate.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvertedBeatmap {
    /// The map's id.
    pub map_id: u32,
    /// The ruleset the map was converted to.
    pub mode: GameMode,
    /// The approach rate.
    pub ar: f64,
    /// The overall difficulty.
    pub od: f64,
    /// The circle size.
    pub cs: f64,
    /// The health drain rate.
    pub hp: f64,
    /// The beats per minute.
    pub bpm: f64,
    /// The amount of hitobjects.
    pub object_count: u32,
}

/// Star rating and maximum combo of a map under mods.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DifficultyRating {
    /// The star rating.
    pub stars: f64,
    /// The maximum achievable combo.
    pub max_combo: u32,
}

/// The external difficulty/performance engine, treated as an opaque
/// numeric oracle.
pub trait PerformanceEngine {
    /// Evaluate the pp value of one play.
    fn evaluate_performance(
        &self,
        map: &ConvertedBeatmap,
        ctx: ModContext,
        hits: Option<&HitPayload>,
    ) -> Result<f64, EngineError>;

    /// Evaluate the star rating and maximum combo of a map.
    fn evaluate_difficulty(
        &self,
        map: &ConvertedBeatmap,
        bits: u32,
        clock_rate: f64,
    ) -> Result<DifficultyRating, EngineError>;
}

/// Provider of beatmaps converted to a requested ruleset.
pub trait BeatmapProvider {
    /// Convert the map with the given id to the requested mode.
    fn convert(
        &self,
        map_id: u32,
        mode: GameMode,
        clock_rate: f64,
    ) -> Result<ConvertedBeatmap, EngineError>;
}
