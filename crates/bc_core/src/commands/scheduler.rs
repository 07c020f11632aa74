//! Command Scheduler
//!
//! 프레임 단위로 진행되는 단일 커맨드 큐.
//!
//! ## Per-tick flow
//! ```text
//! update(state)
//!   ├─ elapsed > stall_ceiling → clear (Stalled)
//!   ├─ state.took_damage()    → clear (Interrupted)
//!   └─ while active:
//!        elapsed < target → elapsed += 1, stop
//!        due              → dispatch / resolve, elapsed = 0, cascade
//! ```
//!
//! A sequence that completes on its own is dropped without a release-all, so
//! holds it leaves behind (walk forward) stay held.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::action::{Action, MetaSync};
use super::dispatcher::{ActionDispatcher, InputSink};
use super::game_state::GameStateSource;
use super::meta::{resolve, PendingStep, Resolution};
use super::template::{CommandEntry, SequenceTemplate};
use crate::config::SchedulerConfig;
use crate::debug_flags::command_debug_enabled;

/// Why the scheduler last went idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClearReason {
    /// Every entry dispatched
    Completed,
    /// `clear()` called by the owner
    Explicit,
    /// Damage taken mid-tick
    Interrupted,
    /// No dispatch for longer than the stall ceiling
    Stalled,
    /// A sync point's expected outcome failed (HitConfirm)
    Aborted(MetaSync),
}

/// What one due step did.
enum Step {
    Advanced,
    Pending(PendingStep),
    Waiting,
    Aborted(MetaSync),
}

pub struct CommandScheduler<S: InputSink> {
    sink: S,
    config: SchedulerConfig,
    dispatcher: ActionDispatcher,
    /// 설치된 시퀀스 (설치 후 불변)
    queue: Vec<CommandEntry>,
    /// 다음에 처리할 엔트리 인덱스
    cursor: usize,
    /// 마지막 디스패치 이후 경과 틱
    elapsed: i32,
    /// 커서 위치 엔트리를 대체하는 미해결 동기화 단계
    pending: Option<PendingStep>,
    /// 처리한 update 호출 수
    tick: u64,
    last_clear: Option<ClearReason>,
}

impl<S: InputSink> CommandScheduler<S> {
    pub fn new(sink: S) -> Self {
        Self::with_config(sink, SchedulerConfig::default())
    }

    pub fn with_config(sink: S, config: SchedulerConfig) -> Self {
        Self {
            sink,
            config,
            dispatcher: ActionDispatcher::new(),
            queue: Vec::new(),
            cursor: 0,
            elapsed: 0,
            pending: None,
            tick: 0,
            last_clear: None,
        }
    }

    // ========== Queries ==========

    pub fn is_idle(&self) -> bool {
        self.cursor >= self.queue.len()
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn elapsed(&self) -> i32 {
        self.elapsed
    }

    pub fn pending(&self) -> Option<PendingStep> {
        self.pending
    }

    /// Remaining entries of the live queue, current entry first.
    pub fn remaining(&self) -> &[CommandEntry] {
        self.queue.get(self.cursor..).unwrap_or(&[])
    }

    pub fn current_entry(&self) -> Option<&CommandEntry> {
        self.queue.get(self.cursor)
    }

    /// Number of `update` calls processed.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn last_clear(&self) -> Option<ClearReason> {
        self.last_clear
    }

    /// Meta/unknown actions that reached the dispatcher.
    pub fn ignored_dispatches(&self) -> u64 {
        self.dispatcher.ignored_count()
    }

    // ========== Control ==========

    /// Adopt `template` as the live queue. Rejected (returns `false`, queue untouched)
    /// while a sequence is in flight.
    pub fn install(&mut self, template: impl Into<SequenceTemplate>) -> bool {
        if !self.is_idle() {
            debug!(tick = self.tick, cursor = self.cursor, "install rejected: sequence in flight");
            return false;
        }
        let template = template.into();
        let unknown = template.unknown_actions();
        if !unknown.is_empty() {
            warn!(?unknown, "installing template with unknown actions");
        }
        info!(
            tick = self.tick,
            entries = template.len(),
            total_delay = template.total_delay(),
            "sequence installed"
        );

        self.queue = template.into_entries();
        self.cursor = 0;
        self.elapsed = 0;
        self.pending = None;
        self.last_clear = None;
        true
    }

    /// Force idle and release every held input.
    pub fn clear(&mut self) {
        self.force_clear(ClearReason::Explicit);
    }

    fn force_clear(&mut self, reason: ClearReason) {
        if !self.is_idle() {
            match reason {
                ClearReason::Stalled => warn!(
                    tick = self.tick,
                    cursor = self.cursor,
                    elapsed = self.elapsed,
                    pending = ?self.pending,
                    "sequence stalled; clearing"
                ),
                ClearReason::Interrupted => warn!(
                    tick = self.tick,
                    cursor = self.cursor,
                    "damage taken mid-sequence; clearing"
                ),
                _ => info!(tick = self.tick, cursor = self.cursor, ?reason, "sequence cleared"),
            }
        }
        self.queue.clear();
        self.cursor = 0;
        self.pending = None;
        self.elapsed = 0;
        self.sink.release_all();
        self.last_clear = Some(reason);
    }

    // ========== Tick ==========

    /// Advance one game frame.
    pub fn update<G: GameStateSource + ?Sized>(&mut self, state: &G) {
        let tick = self.tick;
        self.tick += 1;

        if self.elapsed > self.config.stall_ceiling_ticks() {
            self.force_clear(ClearReason::Stalled);
        }

        if state.took_damage() {
            self.force_clear(ClearReason::Interrupted);
        }

        self.run_cascade(tick, state);
    }

    fn run_cascade<G: GameStateSource + ?Sized>(&mut self, tick: u64, state: &G) {
        // Each entry takes at most two steps: resolve into a countdown, then fire.
        let max_steps = self.queue.len() * 2;

        for _ in 0..max_steps {
            if self.is_idle() {
                return;
            }

            let target = self.current_target();
            if self.elapsed < target {
                if command_debug_enabled() {
                    eprintln!(
                        "[BC WAIT] tick={} cursor={} elapsed={} target={} pending={:?}",
                        tick, self.cursor, self.elapsed, target, self.pending
                    );
                }
                self.count_idle_tick();
                return;
            }

            match self.step(tick, state) {
                Step::Advanced => {
                    self.cursor += 1;
                    self.pending = None;
                    self.elapsed = 0;
                    if self.is_idle() {
                        info!(tick, "sequence completed");
                        self.queue.clear();
                        self.cursor = 0;
                        self.last_clear = Some(ClearReason::Completed);
                        return;
                    }
                }
                Step::Pending(pending) => {
                    debug!(tick, cursor = self.cursor, ?pending, "sync point pending");
                    self.pending = Some(pending);
                    self.elapsed = 0;
                }
                Step::Waiting => {
                    self.count_idle_tick();
                    return;
                }
                Step::Aborted(meta) => {
                    self.force_clear(ClearReason::Aborted(meta));
                    return;
                }
            }
        }

        if !self.is_idle() {
            warn!(tick, cursor = self.cursor, max_steps, "cascade bound reached");
        }
    }

    /// Target the elapsed counter must reach before the current step is due.
    fn current_target(&self) -> i32 {
        match (&self.pending, self.queue.get(self.cursor)) {
            (Some(pending), _) => pending.target(),
            (None, Some(entry)) => entry.effective_delay(),
            (None, None) => 0,
        }
    }

    /// A tick passed without a dispatch. Crossing the stall ceiling clears right away.
    fn count_idle_tick(&mut self) {
        self.elapsed = self.elapsed.saturating_add(1);
        if self.elapsed > self.config.stall_ceiling_ticks() {
            self.force_clear(ClearReason::Stalled);
        }
    }

    fn step<G: GameStateSource + ?Sized>(&mut self, tick: u64, state: &G) -> Step {
        if let Some(pending) = self.pending {
            return match pending {
                PendingStep::Countdown { source, raw } => {
                    debug!(
                        tick,
                        cursor = self.cursor,
                        meta = source.as_str(),
                        raw,
                        "countdown finished"
                    );
                    Step::Advanced
                }
                PendingStep::Poll { meta } => self.apply_resolution(tick, meta, true, state),
            };
        }

        let Some(entry) = self.queue.get(self.cursor) else {
            return Step::Advanced;
        };

        match &entry.action {
            Action::Meta(meta) => {
                let meta = *meta;
                self.apply_resolution(tick, meta, false, state)
            }
            action => {
                let sent = self.dispatcher.dispatch(action, &mut self.sink);
                debug!(
                    tick,
                    cursor = self.cursor,
                    action = %action,
                    delay = entry.delay,
                    ?sent,
                    "dispatched"
                );
                Step::Advanced
            }
        }
    }

    fn apply_resolution<G: GameStateSource + ?Sized>(
        &self,
        tick: u64,
        meta: MetaSync,
        polling: bool,
        state: &G,
    ) -> Step {
        let resolution = resolve(meta, state, &self.config);
        debug!(
            tick,
            cursor = self.cursor,
            meta = meta.as_str(),
            ?resolution,
            "sync point evaluated"
        );
        match resolution {
            Resolution::Advance => Step::Advanced,
            Resolution::Poll if polling => Step::Waiting,
            Resolution::Poll => Step::Pending(PendingStep::Poll { meta }),
            Resolution::Abort => Step::Aborted(meta),
            Resolution::Countdown { raw } => {
                Step::Pending(PendingStep::Countdown { source: meta, raw })
            }
        }
    }
}

impl<S: InputSink + Default> Default for CommandScheduler<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S: InputSink + std::fmt::Debug> std::fmt::Debug for CommandScheduler<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandScheduler")
            .field("cursor", &self.cursor)
            .field("len", &self.queue.len())
            .field("elapsed", &self.elapsed)
            .field("pending", &self.pending)
            .field("tick", &self.tick)
            .field("last_clear", &self.last_clear)
            .field("sink", &self.sink)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::action::Primitive;
    use crate::commands::dispatcher::{Button, Direction, HoldDirection, InputEvent, RecordingSink};
    use crate::commands::game_state::FrameSnapshot;

    fn scheduler() -> CommandScheduler<RecordingSink> {
        CommandScheduler::new(RecordingSink::new())
    }

    fn quiet() -> FrameSnapshot {
        FrameSnapshot::default()
    }

    /// Run `n` updates with the same state.
    fn run(s: &mut CommandScheduler<RecordingSink>, state: &FrameSnapshot, n: usize) {
        for _ in 0..n {
            s.update(state);
        }
    }

    #[test]
    fn test_tap_then_delayed_hold() {
        let mut s = scheduler();
        let template =
            SequenceTemplate::from_pairs([(Primitive::TapBack, 0), (Primitive::HoldBack, 2)]);
        assert!(s.install(template));

        // 틱 0: TapBack, 다음 엔트리(지연 2)는 아직
        s.update(&quiet());
        assert_eq!(s.sink().events(), &[InputEvent::Tap(Direction::Back)]);
        assert!(!s.is_idle());
        assert_eq!(s.elapsed(), 1);

        // 틱 1: 대기
        s.update(&quiet());
        assert_eq!(s.sink().events().len(), 1);

        // 틱 2: HoldBack
        s.update(&quiet());
        assert_eq!(
            s.sink().events(),
            &[InputEvent::Tap(Direction::Back), InputEvent::Hold(HoldDirection::Back)]
        );
        assert!(s.is_idle());
        assert_eq!(s.last_clear(), Some(ClearReason::Completed));
    }

    #[test]
    fn test_zero_delay_entries_cascade_in_one_tick() {
        let mut s = scheduler();
        s.install(SequenceTemplate::from_pairs([
            (Primitive::TapDown, 0),
            (Primitive::TapBack, 0),
            (Primitive::HoldBack, 2),
            (Primitive::ReleaseBack, 12),
        ]));

        s.update(&quiet());
        assert_eq!(
            s.sink().events(),
            &[InputEvent::Tap(Direction::Down), InputEvent::Tap(Direction::Back)]
        );
        assert_eq!(s.cursor(), 2);
    }

    #[test]
    fn test_completion_after_total_delay() {
        let template = SequenceTemplate::from_pairs([
            (Primitive::TapDown, 0),
            (Primitive::TapBack, 0),
            (Primitive::HoldBack, 2),
            (Primitive::ReleaseBack, 12),
        ]);
        let mut s = scheduler();
        s.install(template.clone());

        let mut updates = 0;
        while !s.is_idle() {
            s.update(&quiet());
            updates += 1;
        }
        // 마지막 디스패치는 (0-based) 틱 total_delay 에서 일어난다
        assert_eq!(updates as i64, template.total_delay() + 1);
        assert_eq!(s.sink().events().len(), 4);
    }

    #[test]
    fn test_install_rejected_while_active() {
        let mut s = scheduler();
        let mash = SequenceTemplate::from_pairs([(Primitive::Tap1, 4), (Primitive::Tap1, 4)]);
        assert!(s.install(mash));
        s.update(&quiet());

        let before: Vec<CommandEntry> = s.remaining().to_vec();
        let elapsed = s.elapsed();
        assert!(!s.install(SequenceTemplate::from_pairs([(Primitive::Tap2, 0)])));
        assert_eq!(s.remaining(), before.as_slice());
        assert_eq!(s.elapsed(), elapsed);
    }

    #[test]
    fn test_install_accepted_after_completion() {
        let mut s = scheduler();
        s.install(SequenceTemplate::from_pairs([(Primitive::Tap1, 0)]));
        s.update(&quiet());
        assert!(s.is_idle());
        assert!(s.install(SequenceTemplate::from_pairs([(Primitive::Tap2, 0)])));
        assert_eq!(s.last_clear(), None);
    }

    #[test]
    fn test_damage_interrupts_mid_sequence() {
        let mut s = scheduler();
        s.install(SequenceTemplate::new(vec![
            CommandEntry::new(Primitive::HoldBack, 0),
            CommandEntry::new(Primitive::ReleaseBack, 20),
            CommandEntry::wait(1),
        ]));
        run(&mut s, &quiet(), 5);
        assert!(!s.is_idle());

        s.update(&FrameSnapshot::damaged());
        assert!(s.is_idle());
        assert_eq!(s.sink().events().last(), Some(&InputEvent::ReleaseAll));
        assert_eq!(s.last_clear(), Some(ClearReason::Interrupted));
        assert_eq!(s.elapsed(), 0);

        // 취소된 시퀀스는 재개되지 않는다
        run(&mut s, &quiet(), 30);
        assert_eq!(s.sink().count(InputEvent::Release(HoldDirection::Back)), 0);
    }

    #[test]
    fn test_damage_on_due_tick_wins() {
        let mut s = scheduler();
        s.install(SequenceTemplate::from_pairs([(Primitive::Tap1, 2)]));
        run(&mut s, &quiet(), 2);

        s.update(&FrameSnapshot::damaged());
        assert_eq!(s.sink().events(), &[InputEvent::ReleaseAll]);
    }

    #[test]
    fn test_explicit_clear_releases_all() {
        let mut s = scheduler();
        s.install(SequenceTemplate::from_pairs([
            (Primitive::HoldForward, 0),
            (Primitive::ReleaseForward, 50),
        ]));
        s.update(&quiet());
        s.clear();
        assert!(s.is_idle());
        assert_eq!(
            s.sink().events(),
            &[InputEvent::Hold(HoldDirection::Forward), InputEvent::ReleaseAll]
        );
        assert_eq!(s.last_clear(), Some(ClearReason::Explicit));
    }

    #[test]
    fn test_completion_keeps_holds() {
        let mut s = scheduler();
        s.install(SequenceTemplate::from_pairs([(Primitive::HoldForward, 3)]));
        run(&mut s, &quiet(), 4);
        assert!(s.is_idle());
        assert_eq!(s.sink().events(), &[InputEvent::Hold(HoldDirection::Forward)]);
    }

    #[test]
    fn test_hit_confirm_miss_aborts_same_tick() {
        let mut s = scheduler();
        s.install(SequenceTemplate::new(vec![
            CommandEntry::new(Primitive::Tap1, 0),
            CommandEntry::new(MetaSync::HitConfirm, 3),
            CommandEntry::new(Primitive::Tap2, 0),
        ]));
        run(&mut s, &quiet(), 3);
        assert!(!s.is_idle());

        s.update(&quiet());
        assert!(s.is_idle());
        assert_eq!(s.sink().events(), &[InputEvent::Press(Button::One), InputEvent::ReleaseAll]);
        assert_eq!(s.last_clear(), Some(ClearReason::Aborted(MetaSync::HitConfirm)));
    }

    #[test]
    fn test_hit_confirm_success_continues_without_delay() {
        let mut s = scheduler();
        s.install(SequenceTemplate::new(vec![
            CommandEntry::new(Primitive::Tap1, 0),
            CommandEntry::new(MetaSync::HitConfirm, 3),
            CommandEntry::new(Primitive::Tap2, 0),
        ]));
        run(&mut s, &quiet(), 3);

        s.update(&quiet().with_recent_damage());
        assert!(s.is_idle());
        assert_eq!(
            s.sink().events(),
            &[InputEvent::Press(Button::One), InputEvent::Press(Button::Two)]
        );
        assert_eq!(s.last_clear(), Some(ClearReason::Completed));
    }

    #[test]
    fn test_next_move_never_true_stalls_after_ceiling() {
        let mut s = scheduler();
        s.install(SequenceTemplate::new(vec![
            CommandEntry::new(Primitive::Tap1, 0),
            CommandEntry::new(MetaSync::NextMove, 0),
            CommandEntry::new(Primitive::Tap2, 0),
        ]));

        // 틱 0에서 처음 만남
        s.update(&quiet());
        assert_eq!(s.pending(), Some(PendingStep::Poll { meta: MetaSync::NextMove }));

        run(&mut s, &quiet(), 119);
        assert!(!s.is_idle(), "cleared before the ceiling");

        // 틱 120
        s.update(&quiet());
        assert!(s.is_idle());
        assert_eq!(s.last_clear(), Some(ClearReason::Stalled));
        assert_eq!(s.sink().count(InputEvent::Press(Button::Two)), 0);
    }

    #[test]
    fn test_full_recovery_never_true_stalls_after_ceiling() {
        let mut s = scheduler();
        s.install(SequenceTemplate::new(vec![
            CommandEntry::new(Primitive::Tap1, 0),
            CommandEntry::new(MetaSync::FullRecovery, 5),
            CommandEntry::new(Primitive::Tap2, 0),
        ]));
        // 남은 경직 2 < 6: 계속 대기
        let recovering = quiet().with_recovery(10, 8, 2);

        // 틱 5에서 처음 만남
        run(&mut s, &recovering, 6);
        assert_eq!(s.pending(), Some(PendingStep::Poll { meta: MetaSync::FullRecovery }));

        run(&mut s, &recovering, 119);
        assert!(!s.is_idle());

        s.update(&recovering);
        assert!(s.is_idle());
        assert_eq!(s.last_clear(), Some(ClearReason::Stalled));
    }

    #[test]
    fn test_full_recovery_with_long_recovery_advances() {
        let mut s = scheduler();
        s.install(SequenceTemplate::new(vec![
            CommandEntry::new(MetaSync::FullRecovery, 0),
            CommandEntry::new(Primitive::Tap2, 0),
        ]));
        s.update(&quiet().with_recovery(40, 0, 40));
        assert!(s.is_idle());
        assert_eq!(s.sink().events(), &[InputEvent::Press(Button::Two)]);
        assert_eq!(s.last_clear(), Some(ClearReason::Completed));
    }

    #[test]
    fn test_next_move_resolves_on_later_tick() {
        let mut s = scheduler();
        s.install(SequenceTemplate::new(vec![
            CommandEntry::new(MetaSync::NextMove, 0),
            CommandEntry::new(Primitive::Tap2, 0),
        ]));
        run(&mut s, &quiet(), 10);
        assert!(s.sink().events().is_empty());
        assert_eq!(s.cursor(), 0);

        s.update(&quiet().with_move_changed());
        assert_eq!(s.sink().events(), &[InputEvent::Press(Button::Two)]);
        assert!(s.is_idle());
    }

    #[test]
    fn test_punish_confirm_waits_for_move() {
        let mut s = scheduler();
        s.install(SequenceTemplate::new(vec![
            CommandEntry::new(MetaSync::PunishConfirm, 0),
            CommandEntry::new(Primitive::Tap3, 1),
        ]));
        run(&mut s, &quiet(), 4);
        assert_eq!(s.cursor(), 0);

        s.update(&quiet().with_recent_move());
        assert_eq!(s.cursor(), 1);
        assert!(s.sink().events().is_empty());

        s.update(&quiet());
        assert_eq!(s.sink().events(), &[InputEvent::Press(Button::Three)]);
    }

    #[test]
    fn test_startup_move_positive_impact_is_immediately_due() {
        // ticks_until_impact = 5 → raw -5 → 즉시 통과
        let mut s = scheduler();
        s.install(SequenceTemplate::new(vec![
            CommandEntry::new(MetaSync::StartupMove, 0),
            CommandEntry::new(Primitive::Tap1, 0),
        ]));
        s.update(&quiet().with_impact_in(5));
        assert_eq!(s.sink().events(), &[InputEvent::Press(Button::One)]);
        assert!(s.is_idle());
    }

    #[test]
    fn test_startup_move_negative_impact_counts_down() {
        // ticks_until_impact = -4 → raw 4 → 4틱 대기
        let mut s = scheduler();
        s.install(SequenceTemplate::new(vec![
            CommandEntry::new(MetaSync::StartupMove, 0),
            CommandEntry::new(Primitive::Tap1, 0),
        ]));
        s.update(&quiet().with_impact_in(-4));
        assert_eq!(
            s.pending(),
            Some(PendingStep::Countdown { source: MetaSync::StartupMove, raw: 4 })
        );

        // 라이브 값은 처음 한 번만 읽는다
        run(&mut s, &quiet().with_impact_in(-100), 3);
        assert!(s.sink().events().is_empty());

        s.update(&quiet());
        assert_eq!(s.sink().events(), &[InputEvent::Press(Button::One)]);
    }

    #[test]
    fn test_startup_move_beyond_ceiling_stalls() {
        let mut s = scheduler();
        s.install(SequenceTemplate::new(vec![
            CommandEntry::new(MetaSync::StartupMove, 0),
            CommandEntry::new(Primitive::Tap1, 0),
        ]));
        s.update(&quiet().with_impact_in(-200));
        run(&mut s, &quiet(), 119);
        assert!(!s.is_idle());
        s.update(&quiet());
        assert_eq!(s.last_clear(), Some(ClearReason::Stalled));
    }

    #[test]
    fn test_recovery_countdown() {
        let mut s = scheduler();
        s.install(SequenceTemplate::new(vec![
            CommandEntry::new(Primitive::Tap1, 0),
            CommandEntry::new(MetaSync::Recovery, 0),
            CommandEntry::new(Primitive::Tap2, 0),
        ]));
        // 10 - 6 = 4
        s.update(&quiet().with_recovery(0, 0, 10));
        assert_eq!(
            s.pending(),
            Some(PendingStep::Countdown { source: MetaSync::Recovery, raw: 4 })
        );

        run(&mut s, &quiet(), 3);
        assert_eq!(s.sink().count(InputEvent::Press(Button::Two)), 0);
        s.update(&quiet());
        assert_eq!(s.sink().count(InputEvent::Press(Button::Two)), 1);
    }

    #[test]
    fn test_recovery_zero_fires_same_tick() {
        let mut s = scheduler();
        s.install(SequenceTemplate::new(vec![
            CommandEntry::new(MetaSync::Recovery, 0),
            CommandEntry::new(Primitive::Tap2, 0),
        ]));
        s.update(&quiet().with_recovery(0, 0, 2));
        assert_eq!(s.sink().events(), &[InputEvent::Press(Button::Two)]);
    }

    #[test]
    fn test_negative_template_delay_treated_as_zero() {
        let mut s = scheduler();
        s.install(SequenceTemplate::new(vec![
            CommandEntry::new(Primitive::Tap1, 0),
            CommandEntry::new(Primitive::Tap2, -3),
        ]));
        s.update(&quiet());
        assert_eq!(s.sink().events().len(), 2);
    }

    #[test]
    fn test_entry_longer_than_ceiling_is_stalled() {
        let mut s = scheduler();
        s.install(SequenceTemplate::from_pairs([(Primitive::Tap1, 0), (Primitive::Tap2, 121)]));
        run(&mut s, &quiet(), 121);
        assert_eq!(s.last_clear(), Some(ClearReason::Stalled));
        assert_eq!(s.sink().count(InputEvent::Press(Button::Two)), 0);
    }

    #[test]
    fn test_entry_at_ceiling_still_fires() {
        let mut s = scheduler();
        s.install(SequenceTemplate::from_pairs([
            (Primitive::HoldBack, 0),
            (Primitive::ReleaseBack, 120),
        ]));
        run(&mut s, &quiet(), 121);
        assert_eq!(s.last_clear(), Some(ClearReason::Completed));
        assert_eq!(s.sink().count(InputEvent::Release(HoldDirection::Back)), 1);
    }

    #[test]
    fn test_custom_stall_ceiling() {
        let mut s =
            CommandScheduler::with_config(RecordingSink::new(), SchedulerConfig::responsive());
        s.install(SequenceTemplate::new(vec![CommandEntry::new(MetaSync::NextMove, 0)]));
        run(&mut s, &quiet(), 60);
        assert!(!s.is_idle());
        s.update(&quiet());
        assert_eq!(s.last_clear(), Some(ClearReason::Stalled));
    }

    #[cfg(not(feature = "strict_dispatch"))]
    #[test]
    fn test_unknown_action_skipped() {
        let mut s = scheduler();
        s.install(SequenceTemplate::new(vec![
            CommandEntry::new(Action::Unknown("TapSideways".into()), 0),
            CommandEntry::new(Primitive::Tap1, 0),
        ]));
        s.update(&quiet());
        assert_eq!(s.sink().events(), &[InputEvent::Press(Button::One)]);
        assert_eq!(s.ignored_dispatches(), 1);
    }

    #[test]
    fn test_empty_template_is_idle() {
        let mut s = scheduler();
        assert!(s.install(SequenceTemplate::default()));
        assert!(s.is_idle());
        s.update(&quiet());
        assert!(s.sink().events().is_empty());
    }
}
