use crate::util::float_ext::FloatExt;

use super::mode::GameMode;

/// Counts per judgement tier of one play.
///
/// The slider counters are only known for lazer scores of osu!standard.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct JudgementCounts {
    /// Amount of gekis (n320 for osu!mania).
    pub n_geki: u32,
    /// Amount of katus (n200 for osu!mania).
    pub n_katu: u32,
    /// Amount of 300s.
    pub n300: u32,
    /// Amount of 100s.
    pub n100: u32,
    /// Amount of 50s.
    pub n50: u32,
    /// Amount of misses.
    pub misses: u32,
    /// Amount of successfully hit slider ticks and repeats.
    pub slider_tick_hits: Option<u32>,
    /// Amount of successfully hit slider ends.
    pub slider_end_hits: Option<u32>,
}

impl JudgementCounts {
    /// The counts of the same play with every miss promoted to a 300.
    pub fn full_combo(self) -> Self {
        Self {
            n300: self.n300 + self.misses,
            misses: 0,
            ..self
        }
    }
}

/// Hit statistics of a play, either recorded or hypothesized.
#[derive(Clone, Debug, PartialEq)]
pub enum HitStatistics {
    /// Statistics of a real, recorded play.
    Recorded {
        /// The play's judgement counts.
        counts: JudgementCounts,
        /// The play's highest combo.
        combo: u32,
        /// The play's accuracy in `[0.0, 1.0]`.
        accuracy: f64,
    },
    /// A hypothesized accuracy/combo pair for what-if queries; the engine
    /// derives a plausible judgement split from the accuracy alone.
    Synthetic {
        /// The hypothesized accuracy in `[0.0, 1.0]`.
        accuracy: f64,
        /// The hypothesized combo.
        combo: u32,
        /// The hypothesized amount of misses.
        misses: u32,
    },
}

impl HitStatistics {
    /// The play's accuracy in `[0.0, 1.0]`.
    pub fn accuracy(&self) -> f64 {
        match self {
            Self::Recorded { accuracy, .. } | Self::Synthetic { accuracy, .. } => *accuracy,
        }
    }

    /// The play's highest combo.
    pub const fn combo(&self) -> u32 {
        match self {
            Self::Recorded { combo, .. } | Self::Synthetic { combo, .. } => *combo,
        }
    }

    /// The play's amount of misses.
    pub const fn misses(&self) -> u32 {
        match self {
            Self::Recorded { counts, .. } => counts.misses,
            Self::Synthetic { misses, .. } => *misses,
        }
    }

    /// Whether the statistics are hypothesized rather than recorded.
    pub const fn is_synthetic(&self) -> bool {
        matches!(self, Self::Synthetic { .. })
    }

    /// Whether the play is flawless, i.e. already its own perfect play.
    ///
    /// For osu!mania this additionally requires every hit to be a geki.
    pub fn is_perfect(&self, mode: GameMode) -> bool {
        match self {
            Self::Recorded {
                counts, accuracy, ..
            } => {
                FloatExt::eq(*accuracy, 1.0)
                    && counts.n100 == 0
                    && counts.n50 == 0
                    && counts.misses == 0
                    && (mode != GameMode::Mania || (counts.n_katu == 0 && counts.n300 == 0))
            }
            Self::Synthetic {
                accuracy, misses, ..
            } => FloatExt::eq(*accuracy, 1.0) && *misses == 0,
        }
    }
}
