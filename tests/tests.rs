use eddsim::configuration::toon::{self, ParseError, Value};
use eddsim::simulation::integrator::advance;
use eddsim::{
    classify_external_weather, classify_system_state, dimensional_constant, gamma,
    influence_index, n_sphere_volume, AmbientPreset, Brainwave, Scenario, ScenarioScript, Season,
    SymbolicType, Weather, LAYER_COUNT,
};

/// Build a default scenario and advance it a few ticks at fixed dt
pub fn warmed_scenario(ticks: usize, dt: f64) -> Scenario {
    let mut scenario = Scenario::with_defaults();
    for _ in 0..ticks {
        advance(&mut scenario, dt);
    }
    scenario
}

// ==================================================================================
// Scalar field tests
// ==================================================================================

#[test]
fn gamma_matches_reference_values() {
    // sqrt(pi), 3 sqrt(pi) / 4, and 4!
    assert!((gamma(0.5) - 1.7724538509055159).abs() < 1e-10);
    assert!((gamma(2.5) - 1.3293403881791372).abs() < 1e-10);
    assert!((gamma(5.0) - 24.0).abs() < 1e-9);
}

#[test]
fn gamma_reflection_below_half() {
    // Gamma(0.25) and Gamma(-0.5) go through the reflection formula
    assert!((gamma(0.25) - 3.6256099082219083).abs() < 1e-9);
    assert!((gamma(-0.5) - (-3.5449077018110318)).abs() < 1e-8);
}

#[test]
fn n_sphere_volume_pins_gamma_approximation() {
    // 3.14^1.5 / Gamma(2.5), hand-computed
    let v = n_sphere_volume(3.0, 3.14);
    assert!(
        (v - 4.1856053).abs() < 1e-6,
        "volume regression: got {}",
        v
    );
}

#[test]
fn n_sphere_volume_guards_degenerate_inputs() {
    assert_eq!(n_sphere_volume(0.0, 3.14), 0.0);
    assert_eq!(n_sphere_volume(-2.0, 3.14), 0.0);
    // Negative pi constant with a fractional exponent is NaN territory;
    // the guard turns it into zero instead
    assert_eq!(n_sphere_volume(3.0, -1.0), 0.0);
}

#[test]
fn external_weather_reference_cases() {
    assert_eq!(classify_external_weather(0.8, 0.3), Weather::Joy);
    assert_eq!(classify_external_weather(0.5, 1.5), Weather::Anger);
    assert_eq!(classify_external_weather(0.3, 0.1), Weather::Sadness);
    assert_eq!(classify_external_weather(0.6, 0.0), Weather::Calm);
}

#[test]
fn system_state_band_ordering() {
    // Hot and stressed: the anger band wins
    let (wave, season, weather) = classify_system_state(0.9, 0.6, 0.9);
    assert_eq!((wave, season, weather), (Brainwave::Beta, Season::Summer, Weather::Anger));

    // Hot but relaxed: the calm band fires before the joy band by ordering
    let (wave, season, weather) = classify_system_state(0.9, 0.2, 0.9);
    assert_eq!((wave, season, weather), (Brainwave::Theta, Season::Autumn, Weather::Calm));

    // Joy band only fires for moderately-stressed heat; warming trend
    // reads as spring, cooling as summer
    let (wave, season, weather) = classify_system_state(0.8, 0.35, 0.7);
    assert_eq!((wave, season, weather), (Brainwave::Alpha, Season::Spring, Weather::Joy));
    let (_, season, _) = classify_system_state(0.8, 0.35, 0.95);
    assert_eq!(season, Season::Summer);

    // Everything else is winter
    let (wave, season, weather) = classify_system_state(0.3, 0.5, 0.3);
    assert_eq!((wave, season, weather), (Brainwave::Delta, Season::Winter, Weather::Sadness));
}

// ==================================================================================
// Aggregator tests
// ==================================================================================

#[test]
fn dimensional_constant_fallback_is_finite() {
    // Zero core energy and zero potential must hit the bounded fallback
    let pi = dimensional_constant(0.0, 0.0);
    assert_eq!(pi, 69.0 / 22.0);
    assert!(pi.is_finite());

    // A live core with no layer potential degenerates to 22/7 arithmetically
    let pi = dimensional_constant(1.0, 0.0);
    assert!((pi - 22.0 / 7.0).abs() < 1e-12);
}

#[test]
fn aggregates_are_populated_and_finite_after_one_tick() {
    let scenario = warmed_scenario(1, 0.05);
    let aggs = scenario.aggregates.as_ref().expect("aggregates after tick");

    for i in 0..LAYER_COUNT {
        assert!(aggs.pi_n[i].is_finite(), "pi_n[{}] not finite", i);
        assert!(aggs.rho_n[i].is_finite(), "rho_n[{}] not finite", i);
        assert!(aggs.gamma_n[i] >= 0.0, "gamma_n[{}] negative", i);
        assert!(aggs.avg_temp[i] > 0.0);
    }
    assert!(aggs.system_potential.is_finite());
    assert!(aggs.core_mass >= 0.1);
    assert!(aggs.dominant_emotion.is_some());
}

#[test]
fn seeded_population_starts_in_the_autumn_band() {
    let scenario = warmed_scenario(1, 0.05);
    let aggs = scenario.aggregates.as_ref().unwrap();
    assert_eq!(aggs.internal_weather, Weather::Calm);
    assert_eq!(aggs.season, Season::Autumn);
    assert_eq!(aggs.brainwave, Brainwave::Theta);
}

#[test]
fn core_mass_is_floored() {
    let mut scenario = Scenario::with_defaults();
    // Massless inner layer drives the emergent formula to zero -> floor
    for p in scenario.system.particles.iter_mut() {
        if !p.is_core() && p.layer == 0 {
            p.mass_eff = 0.0;
        }
    }
    let aggs = scenario.aggregator.update(
        &scenario.system,
        &mut scenario.ambient,
        &scenario.parameters,
        0.05,
    );
    assert_eq!(aggs.core_mass, 0.1);
}

#[test]
fn influence_index_shape() {
    // Twice the mean temperature, no stress, double mass
    assert!((influence_index(1.0, 0.0, 2.0, 0.5) - 4.0).abs() < 1e-12);
    // Fully stressed particles contribute nothing
    assert_eq!(influence_index(1.0, 1.0, 2.0, 0.5), 0.0);
    // Degenerate mean temperature is guarded
    assert_eq!(influence_index(1.0, 0.0, 2.0, 0.0), 0.0);
}

// ==================================================================================
// Population invariants
// ==================================================================================

#[test]
fn reset_rebuilds_full_roster() {
    let mut scenario = Scenario::with_defaults();
    scenario.reset(None);

    let regulars: Vec<_> = scenario.system.regulars().collect();
    assert_eq!(regulars.len(), 18, "expected 18 regular particles");

    for layer in 0..LAYER_COUNT {
        let mut drive = 0;
        let mut freeze = 0;
        let mut flow = 0;
        for p in scenario.system.layer_regulars(layer) {
            match p.symbol().unwrap() {
                SymbolicType::Drive => drive += 1,
                SymbolicType::Freeze => freeze += 1,
                SymbolicType::Flow => flow += 1,
            }
        }
        assert_eq!(
            (drive, freeze, flow),
            (1, 1, 1),
            "layer {} type census off",
            layer
        );
    }

    assert!(scenario.system.core().is_core());
    assert_eq!(scenario.system.core().position.norm(), 0.0);
}

#[test]
fn seed_lookup_falls_back_to_defaults() {
    use eddsim::System;
    // A roster name resolves to its seed row
    let (t, s, m) = System::seed_for("rage");
    assert_eq!((t, s, m), (0.60 + 0.27, 0.25, 0.90));
    // An unknown name resolves to the type-neutral defaults
    let (t, s, m) = System::seed_for("nonesuch");
    assert_eq!((t, s, m), (0.77, 0.15, 1.0));
}

#[test]
fn core_stays_pinned_at_origin() {
    let mut scenario = Scenario::with_defaults();
    for _ in 0..50 {
        advance(&mut scenario, 0.05);
        let core = scenario.system.core();
        assert_eq!(core.position.norm(), 0.0, "core drifted off origin");
        assert_eq!(core.velocity.norm(), 0.0, "core picked up velocity");
    }
}

#[test]
fn temperature_floor_holds_every_tick() {
    let mut scenario = Scenario::with_defaults();
    for _ in 0..100 {
        advance(&mut scenario, 0.1);
        for p in scenario.system.regulars() {
            assert!(
                p.temperature >= 0.1,
                "{} fell below the temperature floor: {}",
                p.name,
                p.temperature
            );
        }
    }
}

#[test]
fn velocity_respects_thermal_clamp() {
    let mut scenario = Scenario::with_defaults();
    for _ in 0..50 {
        advance(&mut scenario, 0.05);
        for p in scenario.system.regulars() {
            let v_max = 1.35 * (p.temperature + 0.05).sqrt();
            assert!(
                p.velocity.norm() <= v_max + 1e-9,
                "{} exceeds the thermal velocity clamp",
                p.name
            );
        }
    }
}

// ==================================================================================
// Determinism
// ==================================================================================

#[test]
fn fixed_seed_reproduces_trajectories() {
    let mut a = Scenario::with_defaults();
    let mut b = Scenario::with_defaults();

    for _ in 0..50 {
        advance(&mut a, 0.05);
        advance(&mut b, 0.05);
    }

    for (pa, pb) in a.system.particles.iter().zip(b.system.particles.iter()) {
        assert_eq!(pa.temperature, pb.temperature, "{} temperature diverged", pa.name);
        assert_eq!(pa.stress, pb.stress, "{} stress diverged", pa.name);
        assert_eq!(pa.position, pb.position, "{} position diverged", pa.name);
        assert_eq!(pa.velocity, pb.velocity, "{} velocity diverged", pa.name);
    }
}

// ==================================================================================
// Ambient field and presets
// ==================================================================================

#[test]
fn anger_preset_decays_geometrically() {
    let mut scenario = Scenario::with_defaults();
    scenario.apply_preset(AmbientPreset::Anger);
    assert_eq!(scenario.ambient.stress, 2.0);
    assert_eq!(scenario.ambient.display_stress, 2.0);

    // One simulated second at dt = 0.1: stress * 0.75 per tick, ten times
    for _ in 0..10 {
        advance(&mut scenario, 0.1);
    }
    let expected = 2.0 * 0.75f64.powi(10);
    assert!(
        (scenario.ambient.stress - expected).abs() < 1e-9,
        "expected ~{:.6}, got {:.6}",
        expected,
        scenario.ambient.stress
    );
    // The display copy never decays
    assert_eq!(scenario.ambient.display_stress, 2.0);
}

#[test]
fn presets_apply_atomically() {
    let mut scenario = Scenario::with_defaults();
    scenario.apply_preset(AmbientPreset::Joy);
    assert_eq!(
        (scenario.ambient.t_env, scenario.ambient.stress),
        (0.7, 0.5)
    );
    assert_eq!(
        (scenario.ambient.display_t_env, scenario.ambient.display_stress),
        (0.7, 0.5)
    );

    scenario.apply_preset(AmbientPreset::None);
    assert_eq!(
        (scenario.ambient.t_env, scenario.ambient.stress),
        (0.6, 0.0)
    );
}

// ==================================================================================
// Structured-text parser
// ==================================================================================

#[test]
fn parses_nested_mappings_and_sequences() {
    let doc = "\
outer:
  inner: value
  list:
    - one
    - two
";
    let v = toon::parse(doc).expect("parse");
    let inner = v.get("outer").and_then(|o| o.get("inner")).unwrap();
    assert_eq!(inner.as_scalar(), Some("value"));
    let list = v.get("outer").and_then(|o| o.get("list")).unwrap();
    let items = list.as_sequence().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[1].as_scalar(), Some("two"));
}

#[test]
fn parses_tables_and_inline_arrays() {
    let doc = "\
rows[2]{name,score}:
  alpha,1.5
  beta,2.5
vals[3]: 1, 2, 3
";
    let v = toon::parse(doc).expect("parse");
    let table = v.get("rows").and_then(|t| t.as_table()).unwrap();
    assert_eq!(table.headers, vec!["name", "score"]);
    assert_eq!(table.rows[1], vec!["beta", "2.5"]);

    let vals = v.get("vals").and_then(|s| s.as_sequence()).unwrap();
    assert_eq!(vals.len(), 3);
    assert_eq!(vals[0], Value::Scalar("1".into()));
}

#[test]
fn table_row_count_mismatch_is_an_error() {
    let doc = "rows[2]{a,b}:\n  1,2\n";
    match toon::parse(doc) {
        Err(ParseError::CountMismatch {
            expected, found, ..
        }) => {
            assert_eq!((expected, found), (2, 1));
        }
        other => panic!("expected CountMismatch, got {:?}", other),
    }
}

#[test]
fn table_field_count_mismatch_is_an_error() {
    let doc = "rows[1]{a,b}:\n  1,2,3\n";
    assert!(matches!(
        toon::parse(doc),
        Err(ParseError::FieldMismatch { .. })
    ));
}

#[test]
fn inline_array_count_mismatch_is_an_error() {
    let doc = "vals[3]: 1, 2\n";
    assert!(matches!(
        toon::parse(doc),
        Err(ParseError::CountMismatch { .. })
    ));
}

#[test]
fn stray_indentation_is_an_error() {
    let doc = "a: 1\n    b: 2\n";
    assert!(matches!(toon::parse(doc), Err(ParseError::Indent { .. })));
}

#[test]
fn duplicate_keys_are_an_error() {
    let doc = "a: 1\na: 2\n";
    assert!(matches!(
        toon::parse(doc),
        Err(ParseError::DuplicateKey { .. })
    ));
}

#[test]
fn comments_and_blanks_are_ignored() {
    let doc = "\

# leading comment
a: 1

# trailing comment
";
    let v = toon::parse(doc).expect("parse");
    assert_eq!(v.get("a").and_then(|s| s.as_scalar()), Some("1"));
}

// ==================================================================================
// Scenario scripts
// ==================================================================================

#[test]
fn parses_full_scenario_script() {
    let doc = "\
engine:
  coherence: true
metadata:
  - start: 0.0
    title: opening
    narrative: hello there
    timeline:
      - at: 1.0
        ambient:
          temperature: 0.7
          stress: 0.5
        overrides[1]{name,temperature,stress,mass}:
          rage,0.9,0.4,1.1
        highlight[2]: 3, 8
";
    let script = ScenarioScript::parse(doc).expect("script parse");
    assert_eq!(script.engine.as_ref().unwrap().coherence, Some(true));
    assert_eq!(script.segments.len(), 1);

    let segment = &script.segments[0];
    assert_eq!(segment.narrative.as_deref(), Some("hello there"));
    assert_eq!(segment.timeline.len(), 1);

    let frame = &segment.timeline[0];
    assert_eq!(frame.at, 1.0);
    assert_eq!(frame.ambient.as_ref().unwrap().temperature, Some(0.7));
    assert_eq!(frame.overrides[0].name, "rage");
    assert_eq!(frame.overrides[0].mass, 1.1);
    assert_eq!(frame.highlight, Some((3, 8)));
}

#[test]
fn bad_number_in_override_is_an_error() {
    let doc = "\
metadata:
  - start: 0.0
    timeline:
      - at: 0.0
        overrides[1]{name,temperature,stress,mass}:
          rage,hot,0.4,1.1
";
    assert!(matches!(
        ScenarioScript::parse(doc),
        Err(ParseError::NotANumber { .. })
    ));
}

#[test]
fn missing_segment_start_is_an_error() {
    let doc = "\
metadata:
  - title: nameless
";
    assert!(matches!(
        ScenarioScript::parse(doc),
        Err(ParseError::Missing { .. })
    ));
}

#[test]
fn apply_script_failure_leaves_state_untouched() {
    let mut scenario = warmed_scenario(5, 0.05);
    let before: Vec<(f64, f64)> = scenario
        .system
        .particles
        .iter()
        .map(|p| (p.temperature, p.stress))
        .collect();

    let err = scenario.apply_script("metadata:\n  - start: oops\n");
    assert!(err.is_err(), "bad script must not parse");

    let after: Vec<(f64, f64)> = scenario
        .system
        .particles
        .iter()
        .map(|p| (p.temperature, p.stress))
        .collect();
    assert_eq!(before, after, "failed apply must not touch the population");
}

#[test]
fn apply_script_resets_with_system_overrides() {
    let mut scenario = warmed_scenario(5, 0.05);
    let doc = "\
system:
  temperature: 0.5
  stress: 0.1
  mass: 0.5
";
    scenario.apply_script(doc).expect("script applies");
    for p in scenario.system.regulars() {
        assert_eq!(p.temperature, 0.5);
        assert_eq!(p.stress, 0.1);
        assert_eq!(p.m_base, 1.5);
    }
    // Population rebuilt wholesale
    assert_eq!(scenario.system.regulars().count(), 18);
    assert_eq!(scenario.system.t, 0.0);
}

#[test]
fn timeline_keyframes_fire_in_order() {
    let doc = "\
metadata:
  - start: 0.0
    narrative: opening
    timeline:
      - at: 0.0
        ambient:
          temperature: 0.8
          stress: 0.2
      - at: 0.5
        overrides[1]{name,temperature,stress,mass}:
          ease,0.65,0.05,1.0
        highlight[2]: 0, 7
";
    let script = ScenarioScript::parse(doc).expect("script parse");
    let mut scenario = Scenario::from_script(&script);

    // First tick fires the at-0 keyframe and the narrative
    advance(&mut scenario, 0.1);
    assert_eq!(scenario.narrative.as_deref(), Some("opening"));
    assert_eq!(scenario.ambient.display_t_env, 0.8);
    assert_eq!(scenario.ambient.display_stress, 0.2);
    assert!(scenario.highlight.is_none());

    // Walk past t = 0.5: the override keyframe fires
    for _ in 0..6 {
        advance(&mut scenario, 0.1);
    }
    assert_eq!(scenario.highlight, Some((0, 7)));
    let ease = scenario
        .system
        .regulars()
        .find(|p| p.name == "ease")
        .unwrap();
    // The override landed before this tick's thermal step, so the value has
    // moved, but only by a dt-sized amount
    assert!((ease.m_base - 1.0).abs() < 1e-12);
    assert!((ease.temperature - 0.65).abs() < 0.05);
}
