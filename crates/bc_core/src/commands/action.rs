//! Action vocabulary
//!
//! 시퀀스에 들어가는 모든 태그의 닫힌 집합.
//! - **Primitive**: 입력 싱크로 바로 보낼 수 있는 탭/홀드/릴리즈
//! - **Wait**: 아무것도 하지 않는 지연
//! - **MetaSync**: 게임 상태에 맞춰 진행을 멈추거나 중단하는 동기화 마커
//!
//! On the wire every action is its bare name (`"TapBack"`, `"HitConfirm"`, `"Wait"`).
//! Names outside the vocabulary survive deserialization as [`Action::Unknown`] so
//! that externally authored templates still load; the dispatcher ignores them.

use std::fmt;
use std::str::FromStr;

use schemars::gen::SchemaGenerator;
use schemars::schema::{InstanceType, Schema, SchemaObject};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Directly dispatchable input events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Primitive {
    TapForward,
    TapBack,
    TapUp,
    TapDown,
    TapLeft,
    TapRight,
    Tap1,
    Tap2,
    Tap3,
    Tap4,
    Accept,
    HoldForward,
    HoldBack,
    HoldUp,
    HoldDown,
    ReleaseForward,
    ReleaseBack,
    ReleaseUp,
    ReleaseDown,
    HoldDownBack,
    ReleaseDownBack,
    ReleaseAll,
}

impl Primitive {
    pub const ALL: &'static [Primitive] = &[
        Primitive::TapForward,
        Primitive::TapBack,
        Primitive::TapUp,
        Primitive::TapDown,
        Primitive::TapLeft,
        Primitive::TapRight,
        Primitive::Tap1,
        Primitive::Tap2,
        Primitive::Tap3,
        Primitive::Tap4,
        Primitive::Accept,
        Primitive::HoldForward,
        Primitive::HoldBack,
        Primitive::HoldUp,
        Primitive::HoldDown,
        Primitive::ReleaseForward,
        Primitive::ReleaseBack,
        Primitive::ReleaseUp,
        Primitive::ReleaseDown,
        Primitive::HoldDownBack,
        Primitive::ReleaseDownBack,
        Primitive::ReleaseAll,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Primitive::TapForward => "TapForward",
            Primitive::TapBack => "TapBack",
            Primitive::TapUp => "TapUp",
            Primitive::TapDown => "TapDown",
            Primitive::TapLeft => "TapLeft",
            Primitive::TapRight => "TapRight",
            Primitive::Tap1 => "Tap1",
            Primitive::Tap2 => "Tap2",
            Primitive::Tap3 => "Tap3",
            Primitive::Tap4 => "Tap4",
            Primitive::Accept => "Accept",
            Primitive::HoldForward => "HoldForward",
            Primitive::HoldBack => "HoldBack",
            Primitive::HoldUp => "HoldUp",
            Primitive::HoldDown => "HoldDown",
            Primitive::ReleaseForward => "ReleaseForward",
            Primitive::ReleaseBack => "ReleaseBack",
            Primitive::ReleaseUp => "ReleaseUp",
            Primitive::ReleaseDown => "ReleaseDown",
            Primitive::HoldDownBack => "HoldDownBack",
            Primitive::ReleaseDownBack => "ReleaseDownBack",
            Primitive::ReleaseAll => "ReleaseAll",
        }
    }

    /// Composite primitives issue more than one sink call.
    pub fn is_composite(&self) -> bool {
        matches!(self, Primitive::HoldDownBack | Primitive::ReleaseDownBack)
    }
}

/// Synchronization markers resolved against live game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetaSync {
    /// 최근에 기술을 냈는지 확인될 때까지 대기
    PunishConfirm,
    /// 최근에 대미지를 줬는지 확인, 실패 시 시퀀스 중단
    HitConfirm,
    /// 다음 기술이 나올 때까지 대기
    NextMove,
    /// 현재 기술의 발생(임팩트)까지 카운트다운
    StartupMove,
    /// 경직이 끝나기 직전까지 카운트다운
    Recovery,
    /// 경직이 거의 끝날 때까지 매 틱 폴링
    FullRecovery,
}

impl MetaSync {
    pub const ALL: &'static [MetaSync] = &[
        MetaSync::PunishConfirm,
        MetaSync::HitConfirm,
        MetaSync::NextMove,
        MetaSync::StartupMove,
        MetaSync::Recovery,
        MetaSync::FullRecovery,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetaSync::PunishConfirm => "PunishConfirm",
            MetaSync::HitConfirm => "HitConfirm",
            MetaSync::NextMove => "NextMove",
            MetaSync::StartupMove => "StartupMove",
            MetaSync::Recovery => "Recovery",
            MetaSync::FullRecovery => "FullRecovery",
        }
    }

    /// Polling syncs stay on the current entry until their predicate holds.
    /// The others resolve on first evaluation.
    pub fn is_polling(&self) -> bool {
        matches!(self, MetaSync::PunishConfirm | MetaSync::NextMove | MetaSync::FullRecovery)
    }
}

/// One entry's tag in a sequence template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Action {
    Primitive(Primitive),
    Wait,
    Meta(MetaSync),
    /// Authored tag outside the vocabulary (kept verbatim)
    Unknown(String),
}

impl Action {
    pub const WAIT_NAME: &'static str = "Wait";

    pub fn name(&self) -> &str {
        match self {
            Action::Primitive(p) => p.as_str(),
            Action::Wait => Self::WAIT_NAME,
            Action::Meta(m) => m.as_str(),
            Action::Unknown(name) => name,
        }
    }

    pub fn is_meta(&self) -> bool {
        matches!(self, Action::Meta(_))
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Action::Unknown(_))
    }

    pub fn as_primitive(&self) -> Option<Primitive> {
        match self {
            Action::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_meta(&self) -> Option<MetaSync> {
        match self {
            Action::Meta(m) => Some(*m),
            _ => None,
        }
    }

    /// Every name the vocabulary knows, in declaration order.
    pub fn known_names() -> impl Iterator<Item = &'static str> {
        Primitive::ALL
            .iter()
            .map(Primitive::as_str)
            .chain(std::iter::once(Self::WAIT_NAME))
            .chain(MetaSync::ALL.iter().map(MetaSync::as_str))
    }
}

impl From<Primitive> for Action {
    fn from(p: Primitive) -> Self {
        Action::Primitive(p)
    }
}

impl From<MetaSync> for Action {
    fn from(m: MetaSync) -> Self {
        Action::Meta(m)
    }
}

impl FromStr for Action {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name == Self::WAIT_NAME {
            return Ok(Action::Wait);
        }
        if let Some(p) = Primitive::ALL.iter().find(|p| p.as_str() == name) {
            return Ok(Action::Primitive(*p));
        }
        if let Some(m) = MetaSync::ALL.iter().find(|m| m.as_str() == name) {
            return Ok(Action::Meta(*m));
        }
        Ok(Action::Unknown(name.to_string()))
    }
}

impl From<String> for Action {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(action) => action,
            Err(never) => match never {},
        }
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        match action {
            Action::Unknown(name) => name,
            other => other.name().to_string(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl JsonSchema for Action {
    fn schema_name() -> String {
        "Action".to_string()
    }

    fn json_schema(_gen: &mut SchemaGenerator) -> Schema {
        let schema = SchemaObject {
            instance_type: Some(InstanceType::String.into()),
            enum_values: Some(Action::known_names().map(serde_json::Value::from).collect()),
            ..Default::default()
        };
        schema.into()
    }
}
