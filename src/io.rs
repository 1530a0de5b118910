use crate::consts::*;
use crate::mappings::Mappings;
use anyhow::{Context, Result};
use colored::{ColoredString, Colorize};
use evdev::uinput::VirtualDevice;
use evdev::{AttributeSet, EventType, InputEvent, KeyCode};
use log::{debug, info};

/// Emits synthetic key events.
pub(crate) trait Injector {
    fn synthesize_key(&mut self, key: KeyCode, is_press: bool) -> Result<()>;

    /// A press immediately followed by a release.
    fn tap(&mut self, key: KeyCode) -> Result<()> {
        self.synthesize_key(key, true)?;
        self.synthesize_key(key, false)
    }

    fn close(self) -> Result<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

/// Every artificial key, the only codes the virtual keyboard may send.
/// The kernel drops events for codes a uinput device did not enable.
pub(crate) fn artificial_keys(mappings: &Mappings) -> AttributeSet<KeyCode> {
    let mut keys = AttributeSet::<KeyCode>::new();
    for (_, artificial) in mappings.iter() {
        keys.insert(artificial);
    }
    keys
}

pub(crate) fn create_virtual_keyboard(keys: &AttributeSet<KeyCode>) -> Result<VirtualDevice> {
    let device = VirtualDevice::builder()
        .context("Failed to open /dev/uinput (sudo modprobe uinput)")?
        .name(VIRTUAL_DEVICE_NAME)
        .with_keys(keys)
        .context("Failed to set virtual keyboard keys")?
        .build()
        .context("Failed to create virtual keyboard")?;
    Ok(device)
}

pub(crate) struct UinputInjector {
    device: VirtualDevice,
}

impl UinputInjector {
    pub fn new(mappings: &Mappings) -> Result<Self> {
        let device = create_virtual_keyboard(&artificial_keys(mappings))?;
        info!("Virtual keyboard created: {}", VIRTUAL_DEVICE_NAME);
        Ok(Self { device })
    }
}

impl Injector for UinputInjector {
    fn synthesize_key(&mut self, key: KeyCode, is_press: bool) -> Result<()> {
        let state = if is_press { PRESS } else { RELEASE };
        // emit() ends every call with its own SYN_REPORT, so the release can
        // never be merged into the press.
        self.device
            .emit(&[InputEvent::new(EventType::KEY.0, key.code(), state)])?;
        log_key(&key, state, "tap");
        Ok(())
    }

    fn close(self) -> Result<()> {
        drop(self.device);
        debug!("Virtual keyboard destroyed");
        Ok(())
    }
}

/// Logs what would have been injected.
pub(crate) struct NoEmit;

impl Injector for NoEmit {
    fn synthesize_key(&mut self, key: KeyCode, is_press: bool) -> Result<()> {
        log_key(&key, if is_press { PRESS } else { RELEASE }, "no-emit");
        Ok(())
    }
}

pub(crate) fn log_key(key: &KeyCode, state: i32, origin: &str) {
    debug!(
        "[{}] {:?} [{}]",
        state_arrow(state),
        key,
        origin.purple(),
    );
}

fn state_arrow(state: i32) -> ColoredString {
    match state {
        PRESS => "↓".green().bold(),
        _ => "↑".red().bold(),
    }
}
