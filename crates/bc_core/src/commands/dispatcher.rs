//! Action Dispatcher
//!
//! Primitive action → 입력 싱크 호출 변환.
//! Composite primitives (down-back hold/release) issue both calls in the same
//! dispatch, with nothing interleaved.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::action::{Action, Primitive};
use crate::debug_flags::strict_dispatch_enabled;

/// Tap directions (6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Back,
    Up,
    Down,
    Left,
    Right,
}

/// Directions that can be held and released (4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HoldDirection {
    Forward,
    Back,
    Up,
    Down,
}

/// Face buttons plus the menu accept button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    One,
    Two,
    Three,
    Four,
    Accept,
}

/// Injection side of the bot: one method per primitive category.
///
/// Calls are synchronous and may be repeated (e.g. `release_all` on every clear).
pub trait InputSink {
    fn tap_direction(&mut self, direction: Direction);
    fn tap_button(&mut self, button: Button);
    fn hold_direction(&mut self, direction: HoldDirection);
    fn release_direction(&mut self, direction: HoldDirection);
    fn release_all(&mut self);
}

impl<S: InputSink + ?Sized> InputSink for &mut S {
    fn tap_direction(&mut self, direction: Direction) {
        (**self).tap_direction(direction)
    }

    fn tap_button(&mut self, button: Button) {
        (**self).tap_button(button)
    }

    fn hold_direction(&mut self, direction: HoldDirection) {
        (**self).hold_direction(direction)
    }

    fn release_direction(&mut self, direction: HoldDirection) {
        (**self).release_direction(direction)
    }

    fn release_all(&mut self) {
        (**self).release_all()
    }
}

/// One sink call, as recorded by [`RecordingSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    Tap(Direction),
    Press(Button),
    Hold(HoldDirection),
    Release(HoldDirection),
    ReleaseAll,
}

/// Sink that records every call in order. Used by tests and the simulation harness.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Vec<InputEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[InputEvent] {
        &self.events
    }

    /// Drain recorded events.
    pub fn take_events(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn count(&self, event: InputEvent) -> usize {
        self.events.iter().filter(|e| **e == event).count()
    }

    fn record(&mut self, event: InputEvent) {
        self.events.push(event);
    }
}

impl InputSink for RecordingSink {
    fn tap_direction(&mut self, direction: Direction) {
        self.record(InputEvent::Tap(direction));
    }

    fn tap_button(&mut self, button: Button) {
        self.record(InputEvent::Press(button));
    }

    fn hold_direction(&mut self, direction: HoldDirection) {
        self.record(InputEvent::Hold(direction));
    }

    fn release_direction(&mut self, direction: HoldDirection) {
        self.record(InputEvent::Release(direction));
    }

    fn release_all(&mut self) {
        self.record(InputEvent::ReleaseAll);
    }
}

/// Result of handing one action to the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    /// Number of sink calls issued
    Sent(u8),
    /// `Wait`: nothing to send
    NoOp,
    /// Meta or unknown tag: nothing sent, counted as a fault
    Ignored,
}

/// Total over [`Action`]; only primitives produce sink calls.
#[derive(Debug, Clone, Default)]
pub struct ActionDispatcher {
    ignored: u64,
}

impl ActionDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatch<S: InputSink + ?Sized>(&mut self, action: &Action, sink: &mut S) -> Dispatched {
        match action {
            Action::Primitive(p) => Dispatched::Sent(Self::dispatch_primitive(*p, sink)),
            Action::Wait => Dispatched::NoOp,
            Action::Meta(_) | Action::Unknown(_) => {
                self.ignored += 1;
                warn!(action = %action, "non-primitive action reached the dispatcher; ignored");
                if strict_dispatch_enabled() {
                    panic!("strict dispatch: '{}' is not a primitive action", action);
                }
                Dispatched::Ignored
            }
        }
    }

    /// Issue the sink calls for one primitive. Returns the number of calls.
    pub fn dispatch_primitive<S: InputSink + ?Sized>(primitive: Primitive, sink: &mut S) -> u8 {
        match primitive {
            Primitive::TapForward => sink.tap_direction(Direction::Forward),
            Primitive::TapBack => sink.tap_direction(Direction::Back),
            Primitive::TapUp => sink.tap_direction(Direction::Up),
            Primitive::TapDown => sink.tap_direction(Direction::Down),
            Primitive::TapLeft => sink.tap_direction(Direction::Left),
            Primitive::TapRight => sink.tap_direction(Direction::Right),
            Primitive::Tap1 => sink.tap_button(Button::One),
            Primitive::Tap2 => sink.tap_button(Button::Two),
            Primitive::Tap3 => sink.tap_button(Button::Three),
            Primitive::Tap4 => sink.tap_button(Button::Four),
            Primitive::Accept => sink.tap_button(Button::Accept),
            Primitive::HoldForward => sink.hold_direction(HoldDirection::Forward),
            Primitive::HoldBack => sink.hold_direction(HoldDirection::Back),
            Primitive::HoldUp => sink.hold_direction(HoldDirection::Up),
            Primitive::HoldDown => sink.hold_direction(HoldDirection::Down),
            Primitive::ReleaseForward => sink.release_direction(HoldDirection::Forward),
            Primitive::ReleaseBack => sink.release_direction(HoldDirection::Back),
            Primitive::ReleaseUp => sink.release_direction(HoldDirection::Up),
            Primitive::ReleaseDown => sink.release_direction(HoldDirection::Down),
            Primitive::HoldDownBack => {
                sink.hold_direction(HoldDirection::Back);
                sink.hold_direction(HoldDirection::Down);
                return 2;
            }
            Primitive::ReleaseDownBack => {
                sink.release_direction(HoldDirection::Back);
                sink.release_direction(HoldDirection::Down);
                return 2;
            }
            Primitive::ReleaseAll => sink.release_all(),
        }
        1
    }

    /// Meta/unknown actions seen so far. Non-zero means a template bug.
    pub fn ignored_count(&self) -> u64 {
        self.ignored
    }
}
