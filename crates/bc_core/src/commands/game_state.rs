//! Game-state query interface
//!
//! 스케줄러가 매 틱 읽는 관찰값. 실제 메모리 리더는 이 크레이트 밖에 있다.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Read-only per-tick view of the observed match, from the bot's side.
pub trait GameStateSource {
    /// Bot took damage this tick (hard interrupt)
    fn took_damage(&self) -> bool;
    /// Bot executed a move recently
    fn recently_did_move(&self) -> bool;
    /// Bot caused damage recently
    fn recently_did_damage(&self) -> bool;
    /// Bot's move id changed since the previous tick
    fn move_changed(&self) -> bool;
    /// Bot's attack is in its startup
    fn attack_starting(&self) -> bool;
    /// Ticks until the bot's current move connects
    fn ticks_until_impact(&self) -> i32;
    /// Total recovery frames of the bot's current move
    fn recovery_frames(&self) -> i32;
    /// Frames left until the bot can act again
    fn frames_until_recovery_ends(&self) -> i32;
    /// Frames elapsed in the bot's current move
    fn move_timer(&self) -> i32;
}

impl<G: GameStateSource + ?Sized> GameStateSource for &G {
    fn took_damage(&self) -> bool {
        (**self).took_damage()
    }
    fn recently_did_move(&self) -> bool {
        (**self).recently_did_move()
    }
    fn recently_did_damage(&self) -> bool {
        (**self).recently_did_damage()
    }
    fn move_changed(&self) -> bool {
        (**self).move_changed()
    }
    fn attack_starting(&self) -> bool {
        (**self).attack_starting()
    }
    fn ticks_until_impact(&self) -> i32 {
        (**self).ticks_until_impact()
    }
    fn recovery_frames(&self) -> i32 {
        (**self).recovery_frames()
    }
    fn frames_until_recovery_ends(&self) -> i32 {
        (**self).frames_until_recovery_ends()
    }
    fn move_timer(&self) -> i32 {
        (**self).move_timer()
    }
}

/// Plain-data snapshot of every value [`GameStateSource`] exposes.
///
/// Missing fields deserialize to their defaults, so traces only spell out what changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FrameSnapshot {
    pub took_damage: bool,
    pub recently_did_move: bool,
    pub recently_did_damage: bool,
    pub move_changed: bool,
    pub attack_starting: bool,
    pub ticks_until_impact: i32,
    pub recovery_frames: i32,
    pub frames_until_recovery_ends: i32,
    pub move_timer: i32,
}

impl FrameSnapshot {
    pub fn damaged() -> Self {
        Self { took_damage: true, ..Self::default() }
    }

    pub fn with_move_changed(mut self) -> Self {
        self.move_changed = true;
        self
    }

    pub fn with_recent_damage(mut self) -> Self {
        self.recently_did_damage = true;
        self
    }

    pub fn with_recent_move(mut self) -> Self {
        self.recently_did_move = true;
        self
    }

    pub fn with_impact_in(mut self, ticks: i32) -> Self {
        self.ticks_until_impact = ticks;
        self
    }

    /// 경직 관련 값 설정 (recovery, timer, frames-until-end)
    pub fn with_recovery(mut self, recovery_frames: i32, move_timer: i32, until_end: i32) -> Self {
        self.recovery_frames = recovery_frames;
        self.move_timer = move_timer;
        self.frames_until_recovery_ends = until_end;
        self
    }
}

impl GameStateSource for FrameSnapshot {
    fn took_damage(&self) -> bool {
        self.took_damage
    }
    fn recently_did_move(&self) -> bool {
        self.recently_did_move
    }
    fn recently_did_damage(&self) -> bool {
        self.recently_did_damage
    }
    fn move_changed(&self) -> bool {
        self.move_changed
    }
    fn attack_starting(&self) -> bool {
        self.attack_starting
    }
    fn ticks_until_impact(&self) -> i32 {
        self.ticks_until_impact
    }
    fn recovery_frames(&self) -> i32 {
        self.recovery_frames
    }
    fn frames_until_recovery_ends(&self) -> i32 {
        self.frames_until_recovery_ends
    }
    fn move_timer(&self) -> i32 {
        self.move_timer
    }
}
