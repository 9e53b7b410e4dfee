//! End-to-end runs of the sketch on synthetic audio.

use spectraflow::audio::FREQUENCY_BANDS;
use spectraflow::params::{ParticleParams, SpawnParams};
use spectraflow::rendering::{scene_labels, tessellate};
use spectraflow::sketch::{AudioMode, Sketch, SketchConfig};

fn fallback_config(seed: u64) -> SketchConfig {
    SketchConfig {
        seed,
        start_in_fallback: true,
        ..Default::default()
    }
}

#[test]
fn fallback_run_is_reproducible_for_a_seed() {
    let mut a = Sketch::new(640.0, 480.0, fallback_config(7));
    let mut b = Sketch::new(640.0, 480.0, fallback_config(7));

    for _ in 0..60 {
        let scene_a = a.frame();
        let scene_b = b.frame();
        assert_eq!(a.stats(), b.stats());
        assert_eq!(tessellate(&scene_a), tessellate(&scene_b));
    }
    assert_eq!(a.particles().particles(), b.particles().particles());
}

#[test]
fn fallback_spawns_and_keeps_particles_on_canvas() {
    let mut sketch = Sketch::new(640.0, 480.0, fallback_config(1));
    assert_eq!(sketch.mode(), AudioMode::Fallback);

    let mut spawned = 0;
    for _ in 0..150 {
        let scene = sketch.frame();
        assert!(scene.prompt.is_none());
        spawned += sketch.stats().spawned;

        let active = sketch.band_states().iter().filter(|s| s.is_active).count();
        assert_eq!(active, usize::from(sketch.dominant_band().is_some()));
    }
    assert!(spawned > 0);

    let max_lifespan = ParticleParams::default().max_lifespan;
    for p in sketch.particles().particles() {
        assert!((0.0..=640.0).contains(&p.position.x));
        assert!((0.0..=480.0).contains(&p.position.y));
        assert!(p.lifespan > 0 && p.lifespan < max_lifespan);
        assert!(FREQUENCY_BANDS.iter().any(|b| b.color == p.color));
    }
}

#[test]
fn burst_cap_bounds_population() {
    let config = SketchConfig {
        spawn: SpawnParams {
            max_burst: Some(2),
            ..Default::default()
        },
        ..fallback_config(3)
    };
    let mut sketch = Sketch::new(640.0, 480.0, config);

    for _ in 0..300 {
        sketch.frame();
        assert!(sketch.stats().spawned <= 2);
    }
    // Particles live 100 frames, at most 2 born per frame
    assert!(sketch.particles().len() <= 200);
}

#[test]
fn idle_until_pointer_pressed() {
    let mut sketch = Sketch::new(640.0, 480.0, SketchConfig::default());
    for _ in 0..10 {
        assert!(sketch.frame().caption().is_some());
    }
    assert!(sketch.particles().is_empty());

    assert!(sketch.pointer_pressed());
    for _ in 0..10 {
        sketch.frame();
    }
    assert_eq!(sketch.mode(), AudioMode::Pending);
    assert!(!sketch.particles().is_empty());
}

#[test]
fn labels_track_prompt_and_legend() {
    let mut sketch = Sketch::new(640.0, 480.0, SketchConfig::default());
    let idle = scene_labels(&sketch.frame());
    // Legend pairs, level caption, prompt
    assert_eq!(idle.len(), FREQUENCY_BANDS.len() * 2 + 2);
    assert!(idle.iter().any(|l| l.text == "Click anywhere to start audio input"));

    sketch.pointer_pressed();
    sketch.toggle_legend();
    let labels = scene_labels(&sketch.frame());
    assert_eq!(labels.len(), 1);
    assert_eq!(labels[0].text, "Audio Level");
}
