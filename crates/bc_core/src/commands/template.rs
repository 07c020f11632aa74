//! Sequence templates
//!
//! (액션, 지연 프레임) 쌍의 순서 있는 목록. 순수 데이터.
//!
//! `delay` counts ticks after the previous dispatch. Negative delays are accepted
//! from authored data and treated as zero by the scheduler.

use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::action::Action;
use crate::error::{load_data_file, CommandError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct CommandEntry {
    pub action: Action,
    #[serde(default)]
    pub delay: i32,
}

impl CommandEntry {
    pub fn new(action: impl Into<Action>, delay: i32) -> Self {
        Self { action: action.into(), delay }
    }

    pub fn wait(delay: i32) -> Self {
        Self { action: Action::Wait, delay }
    }

    /// Delay as the scheduler compares it.
    pub fn effective_delay(&self) -> i32 {
        self.delay.max(0)
    }
}

impl<A: Into<Action>> From<(A, i32)> for CommandEntry {
    fn from((action, delay): (A, i32)) -> Self {
        Self::new(action, delay)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct SequenceTemplate {
    entries: Vec<CommandEntry>,
}

impl SequenceTemplate {
    pub fn new(entries: Vec<CommandEntry>) -> Self {
        Self { entries }
    }

    /// Build from parallel `(action, delay)` pairs.
    pub fn from_pairs<A, I>(pairs: I) -> Self
    where
        A: Into<Action>,
        I: IntoIterator<Item = (A, i32)>,
    {
        pairs.into_iter().map(CommandEntry::from).collect()
    }

    pub fn entries(&self) -> &[CommandEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<CommandEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CommandEntry> {
        self.entries.iter()
    }

    /// Sum of effective delays: ticks from install to the last dispatch
    /// when no sync point holds the sequence up.
    pub fn total_delay(&self) -> i64 {
        self.entries.iter().map(|e| e.effective_delay() as i64).sum()
    }

    pub fn has_meta_actions(&self) -> bool {
        self.entries.iter().any(|e| e.action.is_meta())
    }

    /// Names outside the action vocabulary, in template order.
    pub fn unknown_actions(&self) -> Vec<&str> {
        self.entries.iter().filter(|e| e.action.is_unknown()).map(|e| e.action.name()).collect()
    }

    /// Copy with the delay at `index` replaced (startup-frame splice).
    pub fn with_delay_at(&self, index: usize, delay: i32) -> Result<Self> {
        let mut spliced = self.clone();
        match spliced.entries.get_mut(index) {
            Some(entry) => {
                entry.delay = delay;
                Ok(spliced)
            }
            None => Err(CommandError::SpliceOutOfRange { index, len: self.entries.len() }),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        load_data_file(path.as_ref())
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl From<Vec<CommandEntry>> for SequenceTemplate {
    fn from(entries: Vec<CommandEntry>) -> Self {
        Self::new(entries)
    }
}

impl FromIterator<CommandEntry> for SequenceTemplate {
    fn from_iter<T: IntoIterator<Item = CommandEntry>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a SequenceTemplate {
    type Item = &'a CommandEntry;
    type IntoIter = std::slice::Iter<'a, CommandEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
