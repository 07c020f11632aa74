//! Simulation harness
//!
//! 기록된 프레임 트레이스에 시퀀스를 돌려 틱별 입력을 확인한다.
//! Used by the `simulate` CLI command and by snapshot tests.

use std::fmt;
use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::commands::{
    ClearReason, CommandScheduler, FrameSnapshot, InputEvent, RecordingSink, SequenceTemplate,
};
use crate::config::SchedulerConfig;
use crate::error::{load_data_file, Result};

/// Per-tick game state. Ticks past the end see the last frame again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct FrameTrace {
    frames: Vec<FrameSnapshot>,
}

impl FrameTrace {
    pub fn new(frames: Vec<FrameSnapshot>) -> Self {
        Self { frames }
    }

    /// Trace where every tick sees `frame`.
    pub fn constant(frame: FrameSnapshot) -> Self {
        Self { frames: vec![frame] }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        load_data_file(path.as_ref())
    }

    pub fn get(&self, tick: u64) -> FrameSnapshot {
        let index = usize::try_from(tick).unwrap_or(usize::MAX);
        self.frames.get(index).or_else(|| self.frames.last()).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// One sink call stamped with the update index it happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedInput {
    pub tick: u64,
    pub event: InputEvent,
}

impl fmt::Display for TimedInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tick {:>4}  {:?}", self.tick, self.event)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub events: Vec<TimedInput>,
    /// Tick of the last dispatch, if the sequence ran to the end
    pub completed_at: Option<u64>,
    pub clear_reason: Option<ClearReason>,
    pub ticks_run: u64,
}

impl SimulationReport {
    pub fn completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Events dispatched during `tick`.
    pub fn events_at(&self, tick: u64) -> impl Iterator<Item = &InputEvent> {
        self.events.iter().filter(move |e| e.tick == tick).map(|e| &e.event)
    }
}

/// Run `template` against `trace` until the scheduler goes idle or `max_ticks` pass.
pub fn simulate(
    template: &SequenceTemplate,
    trace: &FrameTrace,
    config: &SchedulerConfig,
    max_ticks: u64,
) -> SimulationReport {
    let mut scheduler = CommandScheduler::with_config(RecordingSink::new(), config.clone());
    scheduler.install(template.clone());

    let mut report = SimulationReport {
        events: Vec::new(),
        completed_at: None,
        clear_reason: None,
        ticks_run: 0,
    };

    for tick in 0..max_ticks {
        if scheduler.is_idle() {
            break;
        }
        let frame = trace.get(tick);
        scheduler.update(&frame);
        report.ticks_run += 1;
        let drained = scheduler.sink_mut().take_events();
        report.events.extend(drained.into_iter().map(|event| TimedInput { tick, event }));

        if scheduler.is_idle() {
            report.clear_reason = scheduler.last_clear();
            if report.clear_reason == Some(ClearReason::Completed) {
                report.completed_at = Some(tick);
            }
        }
    }

    debug!(
        ticks = report.ticks_run,
        events = report.events.len(),
        reason = ?report.clear_reason,
        "simulation finished"
    );
    report
}
