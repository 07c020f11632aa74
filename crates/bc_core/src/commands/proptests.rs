//! Scheduler timing and back-pressure properties

use proptest::prelude::*;

use super::action::{Action, MetaSync, Primitive};
use super::dispatcher::{InputEvent, RecordingSink};
use super::game_state::FrameSnapshot;
use super::scheduler::{ClearReason, CommandScheduler};
use super::template::{CommandEntry, SequenceTemplate};

// ========== Strategies ==========

pub fn primitive_strategy() -> impl Strategy<Value = Primitive> {
    prop::sample::select(Primitive::ALL)
}

pub fn meta_strategy() -> impl Strategy<Value = MetaSync> {
    prop::sample::select(MetaSync::ALL)
}

/// Templates made of primitives and waits only.
pub fn plain_template_strategy() -> impl Strategy<Value = SequenceTemplate> {
    let entry = prop_oneof![
        4 => (primitive_strategy(), 0i32..=10).prop_map(|(p, d)| CommandEntry::new(p, d)),
        1 => (0i32..=10).prop_map(CommandEntry::wait),
    ];
    prop::collection::vec(entry, 1..12).prop_map(SequenceTemplate::new)
}

/// Templates that may hold sync points.
pub fn mixed_template_strategy() -> impl Strategy<Value = SequenceTemplate> {
    let entry = prop_oneof![
        3 => (primitive_strategy(), 0i32..=6).prop_map(|(p, d)| CommandEntry::new(p, d)),
        1 => (meta_strategy(), 0i32..=6).prop_map(|(m, d)| CommandEntry::new(m, d)),
    ];
    prop::collection::vec(entry, 1..10).prop_map(SequenceTemplate::new)
}

/// Undamaged frames with arbitrary sync-point inputs.
pub fn calm_snapshot_strategy() -> impl Strategy<Value = FrameSnapshot> {
    (any::<[bool; 4]>(), -20i32..=20, 0i32..=40, 0i32..=40, -10i32..=40).prop_map(
        |(flags, impact, recovery, timer, until_end)| FrameSnapshot {
            took_damage: false,
            recently_did_move: flags[0],
            recently_did_damage: flags[1],
            move_changed: flags[2],
            attack_starting: flags[3],
            ticks_until_impact: impact,
            recovery_frames: recovery,
            frames_until_recovery_ends: until_end,
            move_timer: timer,
        },
    )
}

fn run_to_idle(scheduler: &mut CommandScheduler<RecordingSink>, limit: usize) -> usize {
    let state = FrameSnapshot::default();
    let mut updates = 0;
    while !scheduler.is_idle() && updates < limit {
        scheduler.update(&state);
        updates += 1;
    }
    updates
}

proptest! {
    /// Property: cascades cost no ticks, so completion takes total_delay + 1 updates
    #[test]
    fn prop_plain_sequence_completes_after_total_delay(template in plain_template_strategy()) {
        let expected = template.total_delay() as usize + 1;
        let mut scheduler = CommandScheduler::new(RecordingSink::new());
        prop_assert!(scheduler.install(template));

        let updates = run_to_idle(&mut scheduler, expected + 10);
        prop_assert_eq!(updates, expected);
        prop_assert_eq!(scheduler.last_clear(), Some(ClearReason::Completed));
    }

    /// Property: install while active leaves the live queue untouched
    #[test]
    fn prop_install_while_active_is_rejected(
        first in plain_template_strategy(),
        second in plain_template_strategy(),
        steps in 0usize..12,
    ) {
        let mut scheduler = CommandScheduler::new(RecordingSink::new());
        scheduler.install(first.clone());
        let state = FrameSnapshot::default();
        for _ in 0..steps.min(first.total_delay() as usize) {
            scheduler.update(&state);
        }
        prop_assume!(!scheduler.is_idle());

        let snapshot = |s: &CommandScheduler<RecordingSink>| {
            (s.remaining().to_vec(), s.cursor(), s.elapsed(), s.pending())
        };
        let before = snapshot(&scheduler);
        prop_assert!(!scheduler.install(second));
        let after = snapshot(&scheduler);
        prop_assert_eq!(before, after);
    }

    /// Property: damage mid-sequence idles the scheduler and releases all in the same update
    #[test]
    fn prop_damage_clears_in_same_update(
        template in mixed_template_strategy(),
        frames in prop::collection::vec(calm_snapshot_strategy(), 0..20),
    ) {
        let mut scheduler = CommandScheduler::new(RecordingSink::new());
        scheduler.install(template);
        for frame in &frames {
            scheduler.update(frame);
        }

        scheduler.sink_mut().take_events();
        scheduler.update(&FrameSnapshot::damaged());

        prop_assert!(scheduler.is_idle());
        prop_assert_eq!(scheduler.sink().events().last(), Some(&InputEvent::ReleaseAll));
        prop_assert_eq!(scheduler.last_clear(), Some(ClearReason::Interrupted));
    }

    /// Property: the cursor never moves backwards while a sequence is live,
    /// and the stall ceiling bounds every sequence
    #[test]
    fn prop_cursor_monotonic_and_bounded(
        template in mixed_template_strategy(),
        frames in prop::collection::vec(calm_snapshot_strategy(), 1..40),
    ) {
        let len = template.len();
        let mut scheduler = CommandScheduler::new(RecordingSink::new());
        scheduler.install(template);

        // 엔트리당 최대: 지연 + 카운트다운(≤ ceiling) 또는 폴링(ceiling)
        let limit = len * (scheduler.config().stall_ceiling as usize + 10) * 2;
        let mut last_cursor = 0;
        let mut updates = 0;
        while !scheduler.is_idle() {
            prop_assert!(updates < limit);
            scheduler.update(&frames[updates % frames.len()]);
            if !scheduler.is_idle() {
                prop_assert!(scheduler.cursor() >= last_cursor);
                prop_assert!(scheduler.cursor() < len);
                last_cursor = scheduler.cursor();
            }
            updates += 1;
        }
        prop_assert!(scheduler.last_clear().is_some());
    }
}

#[test]
fn test_meta_actions_never_reach_sink() {
    let template = SequenceTemplate::new(vec![
        CommandEntry::new(Action::Meta(MetaSync::StartupMove), 0),
        CommandEntry::new(Primitive::TapBack, 0),
    ]);
    let mut scheduler = CommandScheduler::new(RecordingSink::new());
    scheduler.install(template);
    run_to_idle(&mut scheduler, 10);
    assert_eq!(scheduler.ignored_dispatches(), 0);
}
