//! Sequence builders
//!
//! 이름 있는 시퀀스 생성기. 프리셋을 그대로 설치하거나, 호출자가 준
//! 발생 프레임(startup)을 고정 인덱스의 지연값에 끼워 넣고 설치한다.
//!
//! Every builder goes through [`CommandScheduler::install`], so all of them are
//! rejected while a sequence is in flight. `Ok(false)` means rejected.

use rand::Rng;
use tracing::debug;

use super::action::Primitive;
use super::catalog::{self, SequenceCatalog};
use super::dispatcher::InputSink;
use super::game_state::GameStateSource;
use super::scheduler::CommandScheduler;
use super::template::{CommandEntry, SequenceTemplate};
use crate::config::SchedulerConfig;
use crate::error::Result;

/// Startup splice positions (entry index whose delay becomes the startup).
const BLOCK_FULL_SPLICE_INDEX: usize = 1;
const LOW_PARRY_SPLICE_INDEX: usize = 2;

/// Bot-facing command layer: a scheduler plus the preset catalog it installs from.
pub struct BotCommands<S: InputSink> {
    scheduler: CommandScheduler<S>,
    catalog: SequenceCatalog,
}

impl<S: InputSink> BotCommands<S> {
    pub fn new(sink: S) -> Self {
        Self::with_config(sink, SchedulerConfig::default())
    }

    pub fn with_config(sink: S, config: SchedulerConfig) -> Self {
        Self {
            scheduler: CommandScheduler::with_config(sink, config),
            catalog: SequenceCatalog::builtin().clone(),
        }
    }

    /// Use `overrides` on top of the built-in presets.
    pub fn with_catalog(mut self, overrides: &SequenceCatalog) -> Self {
        self.catalog = overrides.merged_over_builtin();
        self
    }

    pub fn scheduler(&self) -> &CommandScheduler<S> {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut CommandScheduler<S> {
        &mut self.scheduler
    }

    pub fn catalog(&self) -> &SequenceCatalog {
        &self.catalog
    }

    pub fn update<G: GameStateSource + ?Sized>(&mut self, state: &G) {
        self.scheduler.update(state);
    }

    pub fn is_idle(&self) -> bool {
        self.scheduler.is_idle()
    }

    pub fn clear(&mut self) {
        self.scheduler.clear();
    }

    /// Install a catalog preset by name.
    pub fn install_preset(&mut self, name: &str) -> Result<bool> {
        let template = self.catalog.require(name)?.clone();
        Ok(self.scheduler.install(template))
    }

    /// Install a preset with the delay at `index` replaced by `startup`.
    /// Splicing only happens while idle.
    pub fn install_spliced(&mut self, name: &str, index: usize, startup: i32) -> Result<bool> {
        let template = self.catalog.require(name)?;
        if !self.scheduler.is_idle() {
            debug!(preset = name, "splice skipped: sequence in flight");
            return Ok(false);
        }
        let spliced = template.with_delay_at(index, startup)?;
        Ok(self.scheduler.install(spliced))
    }

    // ========== Named sequences ==========

    pub fn get_up(&mut self) -> Result<bool> {
        self.install_preset(catalog::GET_UP)
    }

    /// 잡기 풀기 연타: 1 연타 / 2 연타 중 무작위
    pub fn mash_tech<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<bool> {
        let preset = if rng.gen_range(0..2) == 0 {
            catalog::THROW_TECH_1
        } else {
            catalog::THROW_TECH_2
        };
        self.install_preset(preset)
    }

    pub fn backdash(&mut self) -> Result<bool> {
        self.install_preset(catalog::BACKDASH)
    }

    pub fn forwarddash_small(&mut self) -> Result<bool> {
        self.install_preset(catalog::FORWARDDASH_HALF)
    }

    pub fn sidestep_right(&mut self) -> Result<bool> {
        self.install_preset(catalog::SIDESTEP_RIGHT)
    }

    pub fn sidestep_left(&mut self) -> Result<bool> {
        self.install_preset(catalog::SIDESTEP_LEFT)
    }

    pub fn sidestep_up(&mut self) -> Result<bool> {
        self.install_preset(catalog::SIDESTEP_UP)
    }

    pub fn block_and_wait(&mut self) -> Result<bool> {
        self.install_preset(catalog::BLOCK_LONG)
    }

    pub fn throw_tech(&mut self) -> Result<bool> {
        self.install_preset(catalog::THROW_TECH_1)
    }

    /// Hold back until `startup` frames pass, then release.
    pub fn block_mid_full(&mut self, startup: i32) -> Result<bool> {
        self.install_spliced(catalog::BLOCK_MID_FULL, BLOCK_FULL_SPLICE_INDEX, startup)
    }

    pub fn block_low_full(&mut self, startup: i32) -> Result<bool> {
        self.install_spliced(catalog::BLOCK_LOW_FULL, BLOCK_FULL_SPLICE_INDEX, startup)
    }

    pub fn low_parry(&mut self, startup: i32) -> Result<bool> {
        self.install_spliced(catalog::LOW_PARRY, LOW_PARRY_SPLICE_INDEX, startup)
    }

    /// Hold forward after `startup` frames; the hold outlives the sequence.
    pub fn walk_forward(&mut self, startup: i32) -> bool {
        let walk = SequenceTemplate::new(vec![CommandEntry::new(Primitive::HoldForward, startup)]);
        self.scheduler.install(walk)
    }

    pub fn mash_continue(&mut self) -> Result<bool> {
        self.install_preset(catalog::MASH_CONTINUE)
    }
}
