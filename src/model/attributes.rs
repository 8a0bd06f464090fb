use crate::util::float_ext::FloatExt;

use super::mods::{ModFlag, Mods};

/// Base difficulty attributes of a map as authored.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BeatmapAttributes {
    /// The approach rate.
    pub ar: f64,
    /// The overall difficulty.
    pub od: f64,
    /// The circle size.
    pub cs: f64,
    /// The health drain rate.
    pub hp: f64,
}

/// Difficulty attributes as actually experienced under a set of mods.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EffectiveAttributes {
    /// The effective approach rate.
    pub ar: f64,
    /// The effective overall difficulty.
    pub od: f64,
    /// The effective circle size.
    pub cs: f64,
    /// The effective health drain rate.
    pub hp: f64,
    /// The clock rate the values were derived at.
    pub clock_rate: f64,
}

impl BeatmapAttributes {
    /// Recompute the attributes under the given [`Mods`].
    ///
    /// AR and OD are warped through their millisecond windows at the mods'
    /// clock rate before the flat Easy/HardRock multipliers apply. The input
    /// is not validated; out of range results are clamped.
    pub fn with_mods(self, mods: &Mods) -> EffectiveAttributes {
        let clock_rate = mods.clock_rate();
        let ez = mods.contains(ModFlag::Easy);
        let hr = mods.contains(ModFlag::HardRock);

        let mut cs = self.cs;

        if ez {
            cs /= 2.0;
        }

        if hr {
            cs *= 1.3;
        }

        let mut hp = self.hp;

        if ez {
            hp /= 2.0;
        }

        if hr {
            hp *= 1.4;
        }

        let mut od = ms_to_od(od_to_ms(self.od) / clock_rate);

        if ez {
            od /= 2.0;
        }

        if hr {
            od *= 1.4;
        }

        let mut ar = ms_to_ar(ar_to_ms(self.ar) / clock_rate);

        if ez {
            ar /= 2.0;
        }

        if hr {
            ar *= 1.4;
        }

        EffectiveAttributes {
            ar: ar.clamp(0.0, 11.0),
            od: od.round_decimal().clamp(0.0, 11.0),
            cs: cs.clamp(2.0, 7.0),
            hp: hp.clamp(0.0, 10.0),
            clock_rate,
        }
    }
}

/// The hit window in milliseconds for a 300 ("Great") at the given OD.
pub fn od_to_ms(od: f64) -> f64 {
    -6.0 * od + 79.5
}

/// The OD whose 300 hit window is the given amount of milliseconds.
pub fn ms_to_od(ms: f64) -> f64 {
    (79.5 - ms) / 6.0
}

/// The preempt time in milliseconds at the given AR.
pub fn ar_to_ms(ar: f64) -> f64 {
    if ar <= 5.0 {
        1800.0 - 120.0 * ar
    } else {
        1200.0 - 150.0 * (ar - 5.0)
    }
}

/// The AR whose preempt time is the given amount of milliseconds.
///
/// Scans candidates from 0.0 to 11.0 in 0.1 steps. The forward formula is
/// strictly decreasing, so the scan stops at the first candidate whose
/// absolute error grows and returns the previous one.
pub fn ms_to_ar(ms: f64) -> f64 {
    let mut best = 0.0;
    let mut best_diff = (ar_to_ms(best) - ms).abs();

    for i in 1..=110 {
        let candidate = f64::from(i) / 10.0;
        let diff = (ar_to_ms(candidate) - ms).abs();

        if diff > best_diff {
            return best;
        }

        best = candidate;
        best_diff = diff;
    }

    best
}

#[cfg(test)]
mod tests {
    use crate::util::float_ext::FloatExt;

    use super::*;

    #[test]
    fn ar_conversion_roundtrips_on_the_grid() {
        for i in 0..=110 {
            let ar = f64::from(i) / 10.0;

            assert!(
                ms_to_ar(ar_to_ms(ar)).eq(ar),
                "roundtrip mismatch for ar={ar}"
            );
        }
    }

    #[test]
    fn ar_search_pins_reference_values() {
        // preempt values measured at clock rate 1.5
        assert!(ms_to_ar(400.0).eq(10.3));
        assert!(ms_to_ar(300.0).eq(11.0));
        assert!(ms_to_ar(1200.0).eq(5.0));
        assert!(ms_to_ar(2000.0).eq(0.0));
    }

    #[test]
    fn od_window_is_linear() {
        assert!(od_to_ms(9.0).eq(25.5));
        assert!(ms_to_od(25.5).eq(9.0));
        assert!(od_to_ms(0.0).eq(79.5));
    }
}
