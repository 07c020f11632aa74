//! Meta-action resolution
//!
//! 동기화 마커를 게임 상태에 대해 평가한다.
//!
//! A sync point never rewrites its template entry. The scheduler keeps a
//! [`PendingStep`] next to the cursor instead: either a poll that is re-evaluated
//! every tick, or a countdown whose target was read from live state once.
//!
//! | Meta          | Holds                              | Fails                  |
//! |---------------|------------------------------------|------------------------|
//! | PunishConfirm | recently did a move → advance      | poll next tick         |
//! | HitConfirm    | recently did damage → advance      | abort the sequence     |
//! | NextMove      | move changed / attack starting     | poll next tick         |
//! | StartupMove   | countdown `-ticks_until_impact`    | -                      |
//! | Recovery      | countdown `until_end - margin`     | -                      |
//! | FullRecovery  | remaining recovery >= margin       | poll next tick         |

use serde::{Deserialize, Serialize};

use super::action::MetaSync;
use super::game_state::GameStateSource;
use crate::config::SchedulerConfig;

/// Outcome of evaluating one sync point against the current tick's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Predicate holds: move past the entry
    Advance,
    /// Predicate false: evaluate again next tick
    Poll,
    /// Expected outcome missed: clear the whole sequence
    Abort,
    /// Replace the entry with a wait of `raw` ticks (raw value kept verbatim)
    Countdown { raw: i32 },
}

/// Override for the entry under the cursor while a sync point is unresolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PendingStep {
    /// Polling sync, re-evaluated once per tick
    Poll { meta: MetaSync },
    /// Wait derived from live state. `raw` is exactly what the state produced.
    Countdown { source: MetaSync, raw: i32 },
}

impl PendingStep {
    /// Ticks after the last dispatch at which this step is due.
    ///
    /// Polls are due on every tick after the one that created them. Countdown
    /// targets at or below zero are due immediately, in the same cascade.
    pub fn target(&self) -> i32 {
        match self {
            PendingStep::Poll { .. } => 1,
            PendingStep::Countdown { raw, .. } => (*raw).max(0),
        }
    }

    pub fn meta(&self) -> MetaSync {
        match self {
            PendingStep::Poll { meta } => *meta,
            PendingStep::Countdown { source, .. } => *source,
        }
    }
}

/// Evaluate `meta` against `state`.
pub fn resolve<G: GameStateSource + ?Sized>(
    meta: MetaSync,
    state: &G,
    config: &SchedulerConfig,
) -> Resolution {
    match meta {
        MetaSync::PunishConfirm => {
            if state.recently_did_move() {
                Resolution::Advance
            } else {
                Resolution::Poll
            }
        }
        MetaSync::HitConfirm => {
            if state.recently_did_damage() {
                Resolution::Advance
            } else {
                Resolution::Abort
            }
        }
        MetaSync::NextMove => {
            if state.move_changed() || state.attack_starting() {
                Resolution::Advance
            } else {
                Resolution::Poll
            }
        }
        MetaSync::StartupMove => {
            Resolution::Countdown { raw: state.ticks_until_impact().saturating_neg() }
        }
        MetaSync::Recovery => {
            let raw = state
                .frames_until_recovery_ends()
                .saturating_sub(config.recovery_margin)
                .saturating_sub(config.input_delay);
            Resolution::Countdown { raw: raw.max(0) }
        }
        MetaSync::FullRecovery => {
            let remaining = state.recovery_frames().saturating_sub(state.move_timer());
            if remaining >= config.full_recovery_margin {
                Resolution::Advance
            } else {
                Resolution::Poll
            }
        }
    }
}
