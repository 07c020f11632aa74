//! # Scheduler Configuration
//!
//! 스케줄러 튜닝 상수를 한 곳에서 관리.
//!
//! ```rust
//! use bc_core::config::SchedulerConfig;
//!
//! let config = SchedulerConfig::default();
//! assert_eq!(config.stall_ceiling, 120);
//! let fast = SchedulerConfig::responsive();
//! assert!(fast.stall_ceiling < config.stall_ceiling);
//! ```

use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{load_data_file, CommandError, Result};

/// Default stall ceiling in ticks (2 seconds at 60 fps).
pub const DEFAULT_STALL_CEILING: u32 = 120;

/// Frames shaved off the recovery countdown so the next input lands on the first actionable frame.
pub const DEFAULT_RECOVERY_MARGIN: i32 = 6;

/// Remaining-recovery threshold at or above which FullRecovery lets the sequence continue.
pub const DEFAULT_FULL_RECOVERY_MARGIN: i32 = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SchedulerConfig {
    /// 디스패치 없이 버틸 수 있는 최대 틱 수 (초과 시 강제 clear)
    pub stall_ceiling: u32,
    /// Recovery 카운트다운에서 빼는 프레임 (기본: 6)
    pub recovery_margin: i32,
    /// 입력 지연 보정 (기본: 0)
    pub input_delay: i32,
    /// FullRecovery 통과 기준 잔여 경직 (기본: 6)
    pub full_recovery_margin: i32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            stall_ceiling: DEFAULT_STALL_CEILING,
            recovery_margin: DEFAULT_RECOVERY_MARGIN,
            input_delay: 0,
            full_recovery_margin: DEFAULT_FULL_RECOVERY_MARGIN,
        }
    }
}

impl SchedulerConfig {
    /// Gives up on unresolved sync points after one second.
    pub fn responsive() -> Self {
        Self { stall_ceiling: 60, ..Self::default() }
    }

    /// Long stall ceiling for slow netplay or replays; compensates two frames of input lag.
    pub fn lenient() -> Self {
        Self { stall_ceiling: 240, input_delay: 2, ..Self::default() }
    }

    pub fn validate(&self) -> Result<()> {
        if self.stall_ceiling == 0 {
            return Err(CommandError::InvalidConfig("stall_ceiling must be > 0".into()));
        }
        if self.stall_ceiling > i32::MAX as u32 {
            return Err(CommandError::InvalidConfig(format!(
                "stall_ceiling {} exceeds {}",
                self.stall_ceiling,
                i32::MAX
            )));
        }
        for (name, value) in [
            ("recovery_margin", self.recovery_margin),
            ("input_delay", self.input_delay),
            ("full_recovery_margin", self.full_recovery_margin),
        ] {
            if value < 0 {
                return Err(CommandError::InvalidConfig(format!(
                    "{} must be >= 0, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Load from `.json` / `.yaml` / `.yml`. Missing fields take their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let config: Self = load_data_file(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    pub(crate) fn stall_ceiling_ticks(&self) -> i32 {
        self.stall_ceiling.min(i32::MAX as u32) as i32
    }
}

// ========== Tests ==========
