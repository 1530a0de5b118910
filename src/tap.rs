use crate::{
    event::{EventKind, KeyEvent},
    io::Injector,
    mappings::Mappings,
    state::{TapState, TapStore},
};
use anyhow::Result;
use log::{debug, trace};
use std::time::{Duration, SystemTime};

/// Tap decision for a released natural key.
///
/// A hold that was combined with other activity never fires. Otherwise it
/// fires when the hold, truncated to whole milliseconds, was strictly shorter
/// than `timeout`. A release stamped before its press counts as instant.
pub(crate) fn is_tap(state: &TapState, released_at: SystemTime, timeout: Duration) -> bool {
    if state.combo {
        return false;
    }
    let elapsed = released_at
        .duration_since(state.pressed_at)
        .unwrap_or_default();
    elapsed.as_millis() < timeout.as_millis()
}

/// Watches the event stream and turns taps of natural keys into their
/// artificial keys.
pub(crate) struct TapFilter {
    mappings: Mappings,
    store: TapStore,
    timeout: Duration,
}

impl TapFilter {
    pub fn new(mappings: Mappings, timeout: Duration) -> Self {
        let store = TapStore::new(&mappings);
        Self {
            mappings,
            store,
            timeout,
        }
    }

    pub fn on_event(&mut self, event: &KeyEvent, injector: &mut impl Injector) -> Result<()> {
        match event.kind {
            EventKind::KeyPress => self.on_press(event),
            EventKind::ButtonPress => {
                trace!("Button {:?} interrupts held keys", event.key);
                self.store.mark_combo();
            }
            EventKind::KeyRelease => return self.on_release(event, injector),
            EventKind::Ignored => {}
        }
        Ok(())
    }

    fn on_press(&mut self, event: &KeyEvent) {
        match self.store.get_mut(&event.key) {
            Some(state) if !state.held => {
                state.held = true;
                state.pressed_at = event.time;
                debug!("{:?} down, tap window open", event.key);
            }
            // Untracked keys and auto-repeat of a held natural key.
            _ => self.store.mark_combo(),
        }
    }

    fn on_release(&mut self, event: &KeyEvent, injector: &mut impl Injector) -> Result<()> {
        let Some(artificial) = self.mappings.artificial(&event.key) else {
            return Ok(());
        };
        let Some(state) = self.store.get_mut(&event.key) else {
            return Ok(());
        };

        let fire = is_tap(state, event.time, self.timeout);
        *state = TapState {
            held: false,
            combo: false,
            ..*state
        };

        if fire {
            injector.tap(artificial)?;
        } else {
            debug!("{:?} up, no tap", event.key);
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn state(&self, key: evdev::KeyCode) -> Option<&TapState> {
        self.store.get(&key)
    }

    pub fn mappings(&self) -> &Mappings {
        &self.mappings
    }
}
