//! Bot command layer
//!
//! - `action`: 액션 어휘 (primitive / meta)
//! - `template`: (액션, 지연) 시퀀스
//! - `catalog`: 내장 프리셋
//! - `dispatcher`: primitive → InputSink 호출
//! - `meta`: 동기화 지점 해석
//! - `scheduler`: 틱 구동 큐
//! - `builders`: 이름 있는 시퀀스 생성기

pub mod action;
pub mod builders;
pub mod catalog;
pub mod dispatcher;
pub mod game_state;
pub mod meta;
pub mod scheduler;
pub mod template;

#[cfg(test)]
mod proptests;

pub use action::{Action, MetaSync, Primitive};
pub use builders::BotCommands;
pub use catalog::SequenceCatalog;
pub use dispatcher::{
    ActionDispatcher, Button, Direction, HoldDirection, InputEvent, InputSink, RecordingSink,
};
pub use game_state::{FrameSnapshot, GameStateSource};
pub use meta::{resolve, PendingStep, Resolution};
pub use scheduler::{ClearReason, CommandScheduler};
pub use template::{CommandEntry, SequenceTemplate};
