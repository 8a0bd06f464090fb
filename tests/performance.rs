use std::cell::RefCell;

use osu_scorekit::{
    BeatmapProvider, ConvertedBeatmap, DifficultyRating, EngineError, GameMode, HitPayload,
    HitStatistics, JudgementCounts, ModContext, ModEntry, ModFlag, Mods, PerformanceEngine,
    ScorePerformance,
};

const MAP_ID: u32 = 2_785_319;

/// Engine stub returning 100, 200, 300, ... so that every evaluation is
/// distinguishable.
#[derive(Default)]
struct StubEngine {
    calls: RefCell<Vec<(ModContext, Option<HitPayload>)>>,
    fail: bool,
}

impl PerformanceEngine for StubEngine {
    fn evaluate_performance(
        &self,
        _: &ConvertedBeatmap,
        ctx: ModContext,
        hits: Option<&HitPayload>,
    ) -> Result<f64, EngineError> {
        if self.fail {
            return Err(EngineError::Engine {
                source: "stub engine failure".into(),
            });
        }

        let mut calls = self.calls.borrow_mut();
        calls.push((ctx, hits.copied()));

        Ok(100.0 * calls.len() as f64)
    }

    fn evaluate_difficulty(
        &self,
        _: &ConvertedBeatmap,
        bits: u32,
        clock_rate: f64,
    ) -> Result<DifficultyRating, EngineError> {
        Ok(DifficultyRating {
            stars: clock_rate * f64::from(bits.count_ones() + 1),
            max_combo: 1_000,
        })
    }
}

#[derive(Default)]
struct StubProvider {
    requests: RefCell<Vec<(u32, GameMode, f64)>>,
    missing: bool,
}

impl BeatmapProvider for StubProvider {
    fn convert(
        &self,
        map_id: u32,
        mode: GameMode,
        clock_rate: f64,
    ) -> Result<ConvertedBeatmap, EngineError> {
        if self.missing {
            return Err(EngineError::Beatmap {
                map_id,
                source: "map not on disk".into(),
            });
        }

        self.requests.borrow_mut().push((map_id, mode, clock_rate));

        Ok(ConvertedBeatmap {
            map_id,
            mode,
            ar: 9.0,
            od: 8.5,
            cs: 4.0,
            hp: 5.0,
            bpm: 180.0,
            object_count: 727,
        })
    }
}

fn recorded(counts: JudgementCounts, combo: u32, accuracy: f64) -> HitStatistics {
    HitStatistics::Recorded {
        counts,
        combo,
        accuracy,
    }
}

#[test]
fn auto_assisted_mods_are_exempt() {
    let engine = StubEngine::default();
    let provider = StubProvider::default();
    let calc = ScorePerformance::new(&engine, &provider);

    for flag in [ModFlag::Relax, ModFlag::Autopilot, ModFlag::Autoplay] {
        let mods = Mods::from(flag.bit());
        let stats = HitStatistics::Synthetic {
            accuracy: 0.99,
            combo: 500,
            misses: 0,
        };

        let summary = calc
            .calculate(MAP_ID, GameMode::Osu, &mods, &stats)
            .unwrap();

        assert_eq!(summary.pp, 0.0);
        assert_eq!(summary.fc, 0.0);
        assert_eq!(summary.ss, 0.0);
    }

    // neither the provider nor the engine were consulted
    assert!(engine.calls.borrow().is_empty());
    assert!(provider.requests.borrow().is_empty());
}

#[test]
fn recorded_score_forwards_discrete_counts() {
    let engine = StubEngine::default();
    let provider = StubProvider::default();
    let calc = ScorePerformance::new(&engine, &provider);

    let counts = JudgementCounts {
        n300: 100,
        n100: 5,
        n50: 1,
        misses: 3,
        slider_tick_hits: Some(40),
        slider_end_hits: Some(20),
        ..Default::default()
    };

    let mods = Mods::from(ModFlag::Hidden.bit());
    let summary = calc
        .calculate(MAP_ID, GameMode::Osu, &mods, &recorded(counts, 200, 0.97))
        .unwrap();

    assert_eq!(summary.pp, 100.0);
    assert_eq!(summary.fc, 200.0);
    assert_eq!(summary.ss, 300.0);

    let calls = engine.calls.borrow();
    assert_eq!(calls.len(), 3);

    // current: discrete counts plus combo and misses
    assert_eq!(
        calls[0].1,
        Some(HitPayload::Counts {
            n_geki: 0,
            n_katu: 0,
            n300: 100,
            n100: 5,
            n50: 1,
            combo: Some(200),
            misses: Some(3),
            slider_tick_hits: Some(40),
            slider_end_hits: Some(20),
        })
    );

    // full combo: misses promoted to 300s, combo and misses omitted
    assert_eq!(
        calls[1].1,
        Some(HitPayload::Counts {
            n_geki: 0,
            n_katu: 0,
            n300: 103,
            n100: 5,
            n50: 1,
            combo: None,
            misses: None,
            slider_tick_hits: Some(40),
            slider_end_hits: Some(20),
        })
    );

    // perfect: no statistics at all
    assert_eq!(calls[2].1, None);
}

#[test]
fn synthetic_score_forwards_accuracy() {
    let engine = StubEngine::default();
    let provider = StubProvider::default();
    let calc = ScorePerformance::new(&engine, &provider);

    let stats = HitStatistics::Synthetic {
        accuracy: 0.99,
        combo: 500,
        misses: 1,
    };

    calc.calculate(MAP_ID, GameMode::Osu, &Mods::from(0), &stats)
        .unwrap();

    let calls = engine.calls.borrow();
    assert_eq!(calls.len(), 3);

    assert_eq!(
        calls[0].1,
        Some(HitPayload::Accuracy {
            accuracy: 0.99,
            combo: Some(500),
            misses: Some(1),
        })
    );

    assert_eq!(
        calls[1].1,
        Some(HitPayload::Accuracy {
            accuracy: 0.99,
            combo: None,
            misses: None,
        })
    );

    assert_eq!(calls[2].1, None);
}

#[test]
fn flawless_play_reuses_current_for_perfect() {
    let engine = StubEngine::default();
    let provider = StubProvider::default();
    let calc = ScorePerformance::new(&engine, &provider);

    let counts = JudgementCounts {
        n300: 100,
        ..Default::default()
    };

    let summary = calc
        .calculate(MAP_ID, GameMode::Osu, &Mods::from(0), &recorded(counts, 150, 1.0))
        .unwrap();

    // only two engine calls happened, ss is bit-identical to pp
    assert_eq!(engine.calls.borrow().len(), 2);
    assert_eq!(summary.pp.to_bits(), summary.ss.to_bits());
    assert_eq!(summary.pp, 100.0);
    assert_eq!(summary.fc, 200.0);
}

#[test]
fn mania_perfect_requires_all_gekis() {
    let engine = StubEngine::default();
    let provider = StubProvider::default();
    let calc = ScorePerformance::new(&engine, &provider);

    // flawless for osu!standard, but mania still has room above a 300
    let counts = JudgementCounts {
        n_geki: 99,
        n300: 1,
        ..Default::default()
    };

    let summary = calc
        .calculate(MAP_ID, GameMode::Mania, &Mods::from(0), &recorded(counts, 100, 1.0))
        .unwrap();

    assert_eq!(engine.calls.borrow().len(), 3);
    assert_eq!(summary.ss, 300.0);
}

#[test]
fn context_is_shared_across_evaluations() {
    let engine = StubEngine::default();
    let provider = StubProvider::default();
    let calc = ScorePerformance::new(&engine, &provider);

    let entries: Vec<ModEntry> = serde_json::from_str(
        r#"[{ "acronym": "CL" }, { "acronym": "DT", "settings": { "speed_change": 1.3 } }]"#,
    )
    .unwrap();

    let mods = Mods::from(entries);
    let stats = HitStatistics::Synthetic {
        accuracy: 0.95,
        combo: 300,
        misses: 2,
    };

    calc.calculate(MAP_ID, GameMode::Taiko, &mods, &stats)
        .unwrap();

    let expected = ModContext {
        bits: ModFlag::DoubleTime.bit(),
        clock_rate: 1.3,
        lazer: true,
    };

    for (ctx, _) in engine.calls.borrow().iter() {
        assert_eq!(*ctx, expected);
    }

    // the map was converted exactly once, at the mods' clock rate
    assert_eq!(
        *provider.requests.borrow(),
        vec![(MAP_ID, GameMode::Taiko, 1.3)]
    );
}

#[test]
fn provider_failure_propagates() {
    let engine = StubEngine::default();
    let provider = StubProvider {
        missing: true,
        ..Default::default()
    };

    let calc = ScorePerformance::new(&engine, &provider);
    let stats = HitStatistics::Synthetic {
        accuracy: 1.0,
        combo: 1,
        misses: 0,
    };

    let err = calc
        .calculate(MAP_ID, GameMode::Osu, &Mods::from(0), &stats)
        .unwrap_err();

    assert!(matches!(err, EngineError::Beatmap { map_id, .. } if map_id == MAP_ID));
    assert!(engine.calls.borrow().is_empty());
}

#[test]
fn engine_failure_propagates() {
    let engine = StubEngine {
        fail: true,
        ..Default::default()
    };

    let provider = StubProvider::default();
    let calc = ScorePerformance::new(&engine, &provider);
    let stats = HitStatistics::Synthetic {
        accuracy: 0.9,
        combo: 100,
        misses: 5,
    };

    let err = calc
        .calculate(MAP_ID, GameMode::Osu, &Mods::from(0), &stats)
        .unwrap_err();

    assert!(matches!(err, EngineError::Engine { .. }));
}

#[test]
fn difficulty_passthrough() {
    let engine = StubEngine::default();
    let provider = StubProvider::default();
    let calc = ScorePerformance::new(&engine, &provider);

    let mods = Mods::from(ModFlag::DoubleTime.bit());
    let rating = calc.difficulty(MAP_ID, GameMode::Osu, &mods).unwrap();

    assert_eq!(rating.max_combo, 1_000);
    assert_eq!(rating.stars, 1.5 * 2.0);
    assert_eq!(
        *provider.requests.borrow(),
        vec![(MAP_ID, GameMode::Osu, 1.5)]
    );
}
