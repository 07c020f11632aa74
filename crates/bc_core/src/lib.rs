//! # bc_core - Frame-driven Bot Command Scheduler
//!
//! 선언적인 (액션, 지연 프레임) 시퀀스를 틱 단위 입력 이벤트로 변환하는 스케줄러.
//!
//! ## Features
//! - One live command queue per bot, advanced once per game frame
//! - Same-tick cascading of zero-delay entries
//! - Reactive sync points (hit confirm, next move, recovery windows) resolved
//!   against live game state
//! - Damage interrupt and stall ceiling as forced cancellation
//! - Serializable templates and a built-in preset catalog
//!
//! ```rust
//! use bc_core::commands::{CommandScheduler, FrameSnapshot, RecordingSink, SequenceCatalog};
//!
//! let mut scheduler = CommandScheduler::new(RecordingSink::default());
//! let backdash = SequenceCatalog::builtin().get("backdash").unwrap().clone();
//! scheduler.install(backdash);
//!
//! let state = FrameSnapshot::default();
//! while !scheduler.is_idle() {
//!     scheduler.update(&state);
//! }
//! assert!(!scheduler.sink().events().is_empty());
//! ```

pub mod commands;
pub mod config;
pub mod debug_flags;
pub mod error;
pub mod simulation;

pub use commands::{
    Action, BotCommands, Button, ClearReason, CommandEntry, CommandScheduler, Direction,
    FrameSnapshot, GameStateSource, HoldDirection, InputEvent, InputSink, MetaSync, PendingStep,
    Primitive, RecordingSink, SequenceCatalog, SequenceTemplate,
};
pub use config::SchedulerConfig;
pub use error::{CommandError, Result};
pub use simulation::{simulate, FrameTrace, SimulationReport, TimedInput};
