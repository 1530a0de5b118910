pub(crate) const RELEASE: i32 = 0;
pub(crate) const PRESS: i32 = 1;
pub(crate) const REPEAT: i32 = 2;

/// One past the highest evdev key code.
pub(crate) const KEY_CNT: u16 = 0x300;

/// Pointer, joystick and digitizer buttons share the key event type.
pub(crate) const BTN_MISC: u16 = 0x100;
pub(crate) const BTN_GEAR_UP: u16 = 0x151;

/// Longest hold, in milliseconds, that still counts as a tap.
pub(crate) const ARTIFICIAL_TIMEOUT: u64 = 600;

pub(crate) const DEFAULT_POLL_INTERVAL: u64 = 10;
pub(crate) const MIN_POLL_INTERVAL: u64 = 1;
pub(crate) const MAX_POLL_INTERVAL: u64 = 100;

pub(crate) const VIRTUAL_DEVICE_NAME: &str = "OxideTap";

pub(crate) fn is_button(code: u16) -> bool {
    (BTN_MISC..=BTN_GEAR_UP).contains(&code)
}
