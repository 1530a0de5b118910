use crate::consts::*;
use evdev::{EventType, InputEvent, KeyCode};
use std::time::SystemTime;

/// What the tap filter cares about in a raw input event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EventKind {
    KeyPress,
    KeyRelease,
    ButtonPress,
    Ignored,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct KeyEvent {
    pub kind: EventKind,
    pub key: KeyCode,
    pub time: SystemTime,
}

impl KeyEvent {
    /// Narrows an evdev event. Auto-repeat counts as a press, pointer
    /// buttons only matter when they go down.
    pub fn narrow(event_type: EventType, code: u16, value: i32, time: SystemTime) -> Self {
        let kind = if event_type != EventType::KEY || code >= KEY_CNT {
            EventKind::Ignored
        } else if is_button(code) {
            match value {
                PRESS => EventKind::ButtonPress,
                _ => EventKind::Ignored,
            }
        } else {
            match value {
                PRESS | REPEAT => EventKind::KeyPress,
                RELEASE => EventKind::KeyRelease,
                _ => EventKind::Ignored,
            }
        };

        Self {
            kind,
            key: KeyCode(code),
            time,
        }
    }

    pub fn is_ignored(&self) -> bool {
        self.kind == EventKind::Ignored
    }
}

impl From<&InputEvent> for KeyEvent {
    fn from(event: &InputEvent) -> Self {
        Self::narrow(
            event.event_type(),
            event.code(),
            event.value(),
            event.timestamp(),
        )
    }
}
