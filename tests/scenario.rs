//! End-to-end: hold the scanner, authorize, flash, reveal.

use std::time::Duration;

use omega_access::audio::Cue;
use omega_access::content::Content;
use omega_access::feedback::Feedback;
use omega_access::scan::Button;
use omega_access::scene::{Child, Scene, SceneConfig, ViewState};

const FRAME: Duration = Duration::from_millis(16);

#[derive(Default)]
struct Log {
    cues: Vec<Cue>,
    pulses: Vec<Vec<u32>>,
}

impl Log {
    fn count(&self, cue: Cue) -> usize {
        self.cues.iter().filter(|&&c| c == cue).count()
    }
}

impl Feedback for Log {
    fn cue(&mut self, cue: Cue) {
        self.cues.push(cue);
    }

    fn vibrate(&mut self, pattern_ms: &[u32]) {
        self.pulses.push(pattern_ms.to_vec());
    }
}

fn frames(scene: &mut Scene, fx: &mut Log, count: u32) {
    for _ in 0..count {
        scene.update(FRAME, fx);
    }
}

#[test]
fn hold_to_authorize_then_reveal_message() {
    let mut fx = Log::default();
    let mut scene = Scene::new(SceneConfig::default(), 1280.0, 800.0);
    scene.set_terminal_metrics(600.0, 22.0);

    scene.pointer_down(Button::Primary, &mut fx);
    assert_eq!(fx.pulses, vec![vec![20]]);
    assert_eq!(fx.count(Cue::Ping), 1);
    assert_eq!(fx.count(Cue::Hum), 1);

    frames(&mut scene, &mut fx, 84);
    assert_eq!(scene.state(), ViewState::Authorized);
    assert_eq!(scene.scan().progress(), 100.0);
    assert_eq!(fx.count(Cue::Success), 1);
    assert!(fx.pulses.contains(&vec![100, 50, 200]));
    assert!(fx.pulses.contains(&vec![100, 30, 200]));
    assert!(scene.particles().is_authorized());

    // Flash, then the terminal takes over
    assert_eq!(scene.child(), Child::Scanner);
    frames(&mut scene, &mut fx, 26);
    assert_eq!(scene.child(), Child::Reveal);

    let message = Content::default().message;
    frames(&mut scene, &mut fx, 10);
    let reveal = scene.reveal().unwrap();
    let shown = reveal.revealed();
    assert!(!shown.is_empty());
    assert!(message.starts_with(shown));

    // Run to the end; the alert fires once and the text is complete
    scene.update(Duration::from_secs(60), &mut fx);
    let reveal = scene.reveal().unwrap();
    assert!(reveal.is_done());
    assert_eq!(reveal.revealed(), message);
    assert_eq!(fx.count(Cue::Alert), 1);
    assert_eq!(fx.count(Cue::Success), 1);
}

#[test]
fn early_release_decays_and_repress_restarts() {
    let mut fx = Log::default();
    let mut scene = Scene::new(SceneConfig::default(), 800.0, 600.0);

    scene.pointer_down(Button::Primary, &mut fx);
    frames(&mut scene, &mut fx, 40);
    let held = scene.scan().progress();
    assert!(held > 40.0 && held < 60.0);

    scene.pointer_leave();
    let mut last = held;
    for _ in 0..20 {
        scene.update(FRAME, &mut fx);
        let now = scene.scan().progress();
        assert!(now <= last && now >= 0.0);
        last = now;
    }
    assert_eq!(scene.scan().progress(), 0.0);

    scene.pointer_down(Button::Primary, &mut fx);
    assert_eq!(scene.scan().progress(), 0.0);
    frames(&mut scene, &mut fx, 1);
    assert!((scene.scan().progress() - 1.2).abs() < 1e-4);
    assert_eq!(scene.state(), ViewState::Idle);
}

#[test]
fn secondary_button_never_scans() {
    let mut fx = Log::default();
    let mut scene = Scene::new(SceneConfig::default(), 800.0, 600.0);
    scene.pointer_down(Button::Secondary, &mut fx);
    frames(&mut scene, &mut fx, 200);
    assert_eq!(scene.scan().progress(), 0.0);
    assert!(fx.cues.is_empty());
    assert!(fx.pulses.is_empty());
}
