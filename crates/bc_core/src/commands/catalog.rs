//! Preset catalog
//!
//! 범용 시퀀스 프리셋 (백대시, 가드, 잡기 풀기 연타 등).
//! External catalogs use the same shape (`name → [{action, delay}]`) and can be
//! layered over the built-ins with [`SequenceCatalog::merged_over_builtin`].

use std::collections::BTreeMap;
use std::path::Path;

use once_cell::sync::Lazy;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::action::{Action, Primitive};
use super::template::{CommandEntry, SequenceTemplate};
use crate::error::{load_data_file, CommandError, Result};

pub const BACKDASH: &str = "backdash";
pub const FORWARDDASH_HALF: &str = "forwarddash_half";
pub const SIDESTEP_RIGHT: &str = "sidestep_right";
pub const SIDESTEP_LEFT: &str = "sidestep_left";
pub const SIDESTEP_UP: &str = "sidestep_up";
pub const BLOCK_LONG: &str = "block_long";
pub const BLOCK_MID_FULL: &str = "block_mid_full";
pub const BLOCK_LOW_FULL: &str = "block_low_full";
pub const LOW_PARRY: &str = "low_parry";
pub const THROW_TECH_1: &str = "throw_tech_1";
pub const THROW_TECH_12: &str = "throw_tech_12";
pub const THROW_TECH_2: &str = "throw_tech_2";
pub const MASH_CONTINUE: &str = "mash_continue";
pub const GET_UP: &str = "get_up";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct SequenceCatalog {
    templates: BTreeMap<String, SequenceTemplate>,
}

static BUILTIN: Lazy<SequenceCatalog> = Lazy::new(build_builtin);

fn seq(pairs: &[(Primitive, i32)]) -> SequenceTemplate {
    SequenceTemplate::from_pairs(pairs.iter().copied())
}

fn build_builtin() -> SequenceCatalog {
    use Primitive::*;

    let mut catalog = SequenceCatalog::default();
    catalog.insert(BACKDASH, seq(&[(TapDown, 0), (TapBack, 0), (HoldBack, 2), (ReleaseBack, 12)]));
    catalog.insert(FORWARDDASH_HALF, seq(&[(TapForward, 0), (TapForward, 2), (TapBack, 5)]));
    catalog.insert(SIDESTEP_RIGHT, seq(&[(TapRight, 0), (TapBack, 4)]));
    catalog.insert(SIDESTEP_LEFT, seq(&[(TapLeft, 0), (TapBack, 4)]));
    catalog.insert(SIDESTEP_UP, seq(&[(TapUp, 0), (TapBack, 16)]));

    // 가드 유지 후 한 프레임 여유
    let hold_then_wait = |hold: Primitive, release: Primitive, frames: i32| {
        SequenceTemplate::new(vec![
            CommandEntry::new(hold, 0),
            CommandEntry::new(release, frames),
            CommandEntry::new(Action::Wait, 1),
        ])
    };
    catalog.insert(BLOCK_LONG, hold_then_wait(HoldBack, ReleaseBack, 20));
    catalog.insert(BLOCK_MID_FULL, hold_then_wait(HoldBack, ReleaseBack, 120));
    catalog.insert(BLOCK_LOW_FULL, hold_then_wait(HoldDownBack, ReleaseDownBack, 120));

    catalog.insert(
        LOW_PARRY,
        seq(&[(HoldForward, 0), (HoldDown, 0), (ReleaseForward, 120), (ReleaseDown, 0)]),
    );

    catalog.insert(THROW_TECH_1, seq(&[(Tap1, 4); 6]));
    catalog.insert(THROW_TECH_2, seq(&[(Tap2, 4); 6]));
    let alternating: Vec<(Primitive, i32)> = (0..6).flat_map(|_| [(Tap1, 4), (Tap2, 0)]).collect();
    catalog.insert(THROW_TECH_12, seq(&alternating));

    catalog.insert(MASH_CONTINUE, seq(&[(Accept, 4), (Accept, 4)]));
    catalog.insert(GET_UP, seq(&[(TapBack, 1)]));
    catalog
}

impl SequenceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The universal presets shipped with the crate.
    pub fn builtin() -> &'static SequenceCatalog {
        &BUILTIN
    }

    pub fn insert(
        &mut self,
        name: impl Into<String>,
        template: SequenceTemplate,
    ) -> Option<SequenceTemplate> {
        self.templates.insert(name.into(), template)
    }

    pub fn get(&self, name: &str) -> Option<&SequenceTemplate> {
        self.templates.get(name)
    }

    pub fn require(&self, name: &str) -> Result<&SequenceTemplate> {
        self.get(name).ok_or_else(|| CommandError::UnknownPreset { name: name.to_string() })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SequenceTemplate)> {
        self.templates.iter().map(|(name, t)| (name.as_str(), t))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Built-ins with this catalog's entries replacing same-named presets.
    pub fn merged_over_builtin(&self) -> SequenceCatalog {
        let mut merged = Self::builtin().clone();
        for (name, template) in &self.templates {
            merged.templates.insert(name.clone(), template.clone());
        }
        merged
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        load_data_file(path.as_ref())
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
