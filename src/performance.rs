use tracing::debug;

use crate::{
    engine::{
        BeatmapProvider, DifficultyRating, EngineError, HitPayload, ModContext, PerformanceEngine,
    },
    model::{
        mode::GameMode,
        mods::{ModFlag, Mods},
        score::{HitStatistics, JudgementCounts},
    },
};

/// Performance of one play plus its hypothetical full-combo and perfect
/// variants.
///
/// Produced fresh per call, never cached.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PerformanceSummary {
    /// The pp value of the play as it happened.
    pub pp: f64,
    /// The pp value had every miss been a 300.
    pub fc: f64,
    /// The pp value of a theoretical maximum-skill play.
    pub ss: f64,
}

/// Orchestrates the engine evaluations for one score.
///
/// Borrows an engine and a beatmap provider; all state is per call.
pub struct ScorePerformance<'a, E, P> {
    engine: &'a E,
    provider: &'a P,
}

impl<'a, E: PerformanceEngine, P: BeatmapProvider> ScorePerformance<'a, E, P> {
    /// Mods whose plays are non-competitive; pp is defined as zero for them.
    const PP_EXEMPT: u32 =
        ModFlag::Relax.bit() | ModFlag::Autopilot.bit() | ModFlag::Autoplay.bit();

    /// Create a new calculator on top of the given collaborators.
    pub const fn new(engine: &'a E, provider: &'a P) -> Self {
        Self { engine, provider }
    }

    /// Compute the current, full-combo, and perfect pp values of a score.
    ///
    /// Engine and provider failures propagate as is.
    pub fn calculate(
        &self,
        map_id: u32,
        mode: GameMode,
        mods: &Mods,
        stats: &HitStatistics,
    ) -> Result<PerformanceSummary, EngineError> {
        if mods.intersects(Self::PP_EXEMPT) {
            debug!(%mods, "auto-assisted play, pp defined as zero");

            return Ok(PerformanceSummary::default());
        }

        let ctx = ModContext {
            bits: mods.bits(),
            clock_rate: mods.clock_rate(),
            lazer: mods.is_lazer(),
        };

        let map = self.provider.convert(map_id, mode, ctx.clock_rate)?;

        let pp = self
            .engine
            .evaluate_performance(&map, ctx, Some(&current_payload(stats)))?;

        let fc = self
            .engine
            .evaluate_performance(&map, ctx, Some(&full_combo_payload(stats)))?;

        // A flawless play already is its own perfect play; reusing the value
        // also keeps it bit-identical.
        let ss = if stats.is_perfect(mode) {
            pp
        } else {
            self.engine.evaluate_performance(&map, ctx, None)?
        };

        Ok(PerformanceSummary { pp, fc, ss })
    }

    /// The star rating and maximum combo of a map under the given mods.
    pub fn difficulty(
        &self,
        map_id: u32,
        mode: GameMode,
        mods: &Mods,
    ) -> Result<DifficultyRating, EngineError> {
        let clock_rate = mods.clock_rate();
        let map = self.provider.convert(map_id, mode, clock_rate)?;

        self.engine.evaluate_difficulty(&map, mods.bits(), clock_rate)
    }
}

/// The payload for the play as it happened.
///
/// Recorded plays forward their discrete judgement counts; synthetic ones
/// forward accuracy and combo instead. Misses are forwarded either way.
fn current_payload(stats: &HitStatistics) -> HitPayload {
    match stats {
        HitStatistics::Recorded { counts, combo, .. } => counts_payload(
            *counts,
            Some(*combo),
            Some(counts.misses),
        ),
        HitStatistics::Synthetic {
            accuracy,
            combo,
            misses,
        } => HitPayload::Accuracy {
            accuracy: *accuracy,
            combo: Some(*combo),
            misses: Some(*misses),
        },
    }
}

/// The payload for the hypothetical full combo of the same play.
///
/// Every miss is promoted to a 300; combo and misses are omitted so the
/// engine derives the best possible combo itself.
fn full_combo_payload(stats: &HitStatistics) -> HitPayload {
    match stats {
        HitStatistics::Recorded { counts, .. } => counts_payload(counts.full_combo(), None, None),
        HitStatistics::Synthetic { accuracy, .. } => HitPayload::Accuracy {
            accuracy: *accuracy,
            combo: None,
            misses: None,
        },
    }
}

fn counts_payload(counts: JudgementCounts, combo: Option<u32>, misses: Option<u32>) -> HitPayload {
    HitPayload::Counts {
        n_geki: counts.n_geki,
        n_katu: counts.n_katu,
        n300: counts.n300,
        n100: counts.n100,
        n50: counts.n50,
        combo,
        misses,
        slider_tick_hits: counts.slider_tick_hits,
        slider_end_hits: counts.slider_end_hits,
    }
}
