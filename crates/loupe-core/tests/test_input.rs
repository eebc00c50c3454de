use loupe_core::config::InputConfig;
use loupe_core::input::{ContinuousInputController, ZoomCommand, ZoomDirection};
use loupe_core::timing::ManualClock;

fn controller() -> (ContinuousInputController<ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    let ctl = ContinuousInputController::new(clock.clone(), InputConfig::default());
    (ctl, clock)
}

fn continuous_ticks(cmds: &[ZoomCommand]) -> u32 {
    cmds.iter()
        .map(|c| match c {
            ZoomCommand::Continuous { ticks, .. } => *ticks,
            _ => 0,
        })
        .sum()
}

// ---------------------------------------------------------------------------
// Tap
// ---------------------------------------------------------------------------

#[test]
fn test_tap_fires_single_step_after_double_tap_window() {
    let (mut ctl, clock) = controller();
    assert!(ctl.key_down(ZoomDirection::In).is_empty());
    clock.advance_ms(50);
    assert!(ctl.key_up(ZoomDirection::In).is_empty());

    clock.advance_ms(50);
    assert!(ctl.poll().is_empty(), "tap must wait for a possible second tap");

    clock.advance_ms(201);
    assert_eq!(ctl.poll(), vec![ZoomCommand::Step(ZoomDirection::In)]);
    assert!(!ctl.is_active());
    assert!(ctl.poll().is_empty());
}

#[test]
fn test_late_second_tap_is_two_taps() {
    let (mut ctl, clock) = controller();
    ctl.key_down(ZoomDirection::Out);
    clock.advance_ms(50);
    ctl.key_up(ZoomDirection::Out);

    clock.advance_ms(350);
    // The expired first tap is flushed by the next key-down.
    assert_eq!(
        ctl.key_down(ZoomDirection::Out),
        vec![ZoomCommand::Step(ZoomDirection::Out)]
    );
    clock.advance_ms(50);
    assert!(ctl.key_up(ZoomDirection::Out).is_empty());
    clock.advance_ms(300);
    assert_eq!(ctl.poll(), vec![ZoomCommand::Step(ZoomDirection::Out)]);
}

// ---------------------------------------------------------------------------
// Hold
// ---------------------------------------------------------------------------

#[test]
fn test_hold_emits_ticks_until_release() {
    let (mut ctl, clock) = controller();
    ctl.key_down(ZoomDirection::In);

    clock.advance_ms(100);
    assert!(ctl.poll().is_empty());

    clock.advance_ms(100);
    assert_eq!(
        ctl.poll(),
        vec![ZoomCommand::Continuous {
            direction: ZoomDirection::In,
            ticks: 1
        }]
    );
    assert!(ctl.is_holding());

    clock.advance_ms(120);
    assert_eq!(continuous_ticks(&ctl.poll()), 1);
    clock.advance_ms(10);
    assert!(ctl.poll().is_empty());

    clock.advance_ms(70);
    assert!(ctl.key_up(ZoomDirection::In).is_empty());
    assert!(!ctl.is_active());

    // A hold never produces the tap action afterwards.
    clock.advance_ms(1000);
    assert!(ctl.poll().is_empty());
}

#[test]
fn test_hold_catches_up_missed_ticks() {
    let (mut ctl, clock) = controller();
    ctl.key_down(ZoomDirection::Out);
    clock.advance_ms(560);
    assert_eq!(
        ctl.poll(),
        vec![ZoomCommand::Continuous {
            direction: ZoomDirection::Out,
            ticks: 4
        }]
    );
}

#[test]
fn test_release_emits_overdue_ticks_then_stops() {
    let (mut ctl, clock) = controller();
    ctl.key_down(ZoomDirection::In);
    clock.advance_ms(250);
    let cmds = ctl.key_up(ZoomDirection::In);
    assert_eq!(continuous_ticks(&cmds), 1);
    assert!(!cmds.iter().any(|c| matches!(c, ZoomCommand::Step(_))));
    assert_eq!(ctl.next_deadline(), None);
}

// ---------------------------------------------------------------------------
// Double tap
// ---------------------------------------------------------------------------

#[test]
fn test_double_tap_plus_resets_to_actual_size() {
    let (mut ctl, clock) = controller();
    ctl.key_down(ZoomDirection::In);
    clock.advance_ms(50);
    ctl.key_up(ZoomDirection::In);
    clock.advance_ms(100);
    assert!(ctl.key_down(ZoomDirection::In).is_empty());
    clock.advance_ms(50);
    assert_eq!(ctl.key_up(ZoomDirection::In), vec![ZoomCommand::ResetActualSize]);

    clock.advance_ms(1000);
    assert!(ctl.poll().is_empty(), "double tap must not also fire a tap");
}

#[test]
fn test_double_tap_minus_auto_fits() {
    let (mut ctl, clock) = controller();
    ctl.key_down(ZoomDirection::Out);
    clock.advance_ms(40);
    ctl.key_up(ZoomDirection::Out);
    clock.advance_ms(40);
    ctl.key_down(ZoomDirection::Out);
    clock.advance_ms(40);
    assert_eq!(ctl.key_up(ZoomDirection::Out), vec![ZoomCommand::AutoFit]);
}

#[test]
fn test_second_press_held_becomes_tap_then_hold() {
    let (mut ctl, clock) = controller();
    ctl.key_down(ZoomDirection::In);
    clock.advance_ms(50);
    ctl.key_up(ZoomDirection::In);
    clock.advance_ms(50);
    ctl.key_down(ZoomDirection::In);
    clock.advance_ms(200);
    assert_eq!(
        ctl.poll(),
        vec![
            ZoomCommand::Step(ZoomDirection::In),
            ZoomCommand::Continuous {
                direction: ZoomDirection::In,
                ticks: 1
            },
        ]
    );
    clock.advance_ms(30);
    assert!(ctl.key_up(ZoomDirection::In).is_empty());
}

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

#[test]
fn test_cancel_drops_hold_without_output() {
    let (mut ctl, clock) = controller();
    ctl.key_down(ZoomDirection::In);
    clock.advance_ms(250);
    assert_eq!(continuous_ticks(&ctl.poll()), 1);
    ctl.cancel();
    assert!(!ctl.is_active());
    clock.advance_ms(1000);
    assert!(ctl.poll().is_empty());
    // Stray key-up after cancel is harmless.
    assert!(ctl.key_up(ZoomDirection::In).is_empty());
}

#[test]
fn test_cancel_drops_pending_tap() {
    let (mut ctl, clock) = controller();
    ctl.key_down(ZoomDirection::In);
    clock.advance_ms(30);
    ctl.key_up(ZoomDirection::In);
    ctl.cancel();
    clock.advance_ms(500);
    assert!(ctl.poll().is_empty());
}

#[test]
fn test_other_key_interrupts_press() {
    let (mut ctl, clock) = controller();
    ctl.key_down(ZoomDirection::In);
    clock.advance_ms(100);
    ctl.key_down(ZoomDirection::Out);
    clock.advance_ms(20);
    assert!(ctl.key_up(ZoomDirection::In).is_empty());
    clock.advance_ms(30);
    ctl.key_up(ZoomDirection::Out);
    clock.advance_ms(300);
    assert_eq!(ctl.poll(), vec![ZoomCommand::Step(ZoomDirection::Out)]);
}

#[test]
fn test_custom_thresholds() {
    let clock = ManualClock::new();
    let config = InputConfig {
        hold_threshold_ms: 50,
        tick_interval_ms: 10,
        double_tap_ms: 0,
        hold_step: 1.05,
    };
    let mut ctl = ContinuousInputController::new(clock.clone(), config);
    ctl.key_down(ZoomDirection::In);
    clock.advance_ms(79);
    assert_eq!(continuous_ticks(&ctl.poll()), 3);
}
