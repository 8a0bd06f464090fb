//! Scoring support library for osu! score tracking bots.
//!
//! ## Description
//!
//! `osu-scorekit` covers the three computations a score tracker needs before
//! it can talk to a difficulty/performance engine:
//!
//! - decoding which mods are active from a legacy bitmask, an acronym
//!   string, or a structured mod list, and deriving clock rate & co. from
//!   them ([`Mods`]),
//! - recomputing a map's effective difficulty attributes under those mods
//!   ([`BeatmapAttributes::with_mods`]),
//! - orchestrating the current / full-combo / perfect evaluations of a score
//!   against an injected engine ([`ScorePerformance`]).
//!
//! The star rating and pp formulas themselves are *not* part of this crate;
//! they live behind the [`PerformanceEngine`] and [`BeatmapProvider`] traits
//! so that any engine version can be plugged in.
//!
//! ## Usage
//!
//! ```
//! use osu_scorekit::{BeatmapAttributes, Mods};
//!
//! // Decode the mods of a score
//! let mods = Mods::from("HDDT");
//! assert!(mods.clock_rate() > 1.0);
//! assert_eq!(mods.to_string(), "+HDDT");
//!
//! // Adjust the map's base attributes accordingly
//! let attrs = BeatmapAttributes {
//!     ar: 9.0,
//!     od: 8.5,
//!     cs: 4.0,
//!     hp: 5.0,
//! };
//!
//! let effective = attrs.with_mods(&mods);
//! assert!(effective.ar > 9.0);
//! ```

#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::missing_const_for_fn, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate
)]

#[doc(inline)]
pub use self::{
    engine::{
        BeatmapProvider, ConvertedBeatmap, DifficultyRating, EngineError, HitPayload, ModContext,
        PerformanceEngine,
    },
    model::{
        attributes::{BeatmapAttributes, EffectiveAttributes},
        mode::GameMode,
        mods::{ModEntry, ModFlag, ModSettings, Mods},
        score::{HitStatistics, JudgementCounts},
    },
    performance::{PerformanceSummary, ScorePerformance},
};

/// Traits and types at the boundary to the external engine.
pub mod engine;

/// Types used in and around this crate.
pub mod model;

/// Orchestration of the engine calls for one score.
pub mod performance;

mod util;
