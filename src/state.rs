use crate::mappings::Mappings;
use evdev::KeyCode;
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapState {
    pub held: bool,
    /// Something else was pressed while this key was held.
    pub combo: bool,
    /// Only meaningful while `held`.
    pub pressed_at: SystemTime,
}

impl Default for TapState {
    fn default() -> Self {
        Self {
            held: false,
            combo: false,
            pressed_at: UNIX_EPOCH,
        }
    }
}

/// Tap state of every natural key, and nothing else.
#[derive(Debug, Clone)]
pub struct TapStore {
    states: HashMap<KeyCode, TapState>,
}

impl TapStore {
    pub fn new(mappings: &Mappings) -> Self {
        Self {
            states: mappings
                .naturals()
                .map(|key| (key, TapState::default()))
                .collect(),
        }
    }

    #[cfg(test)]
    pub fn get(&self, key: &KeyCode) -> Option<&TapState> {
        self.states.get(key)
    }

    pub fn get_mut(&mut self, key: &KeyCode) -> Option<&mut TapState> {
        self.states.get_mut(key)
    }

    pub fn mark_combo(&mut self) {
        for state in self.states.values_mut().filter(|s| s.held) {
            state.combo = true;
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.states.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mappings::parse_pair;

    fn store(args: &[&str]) -> TapStore {
        let mappings = Mappings::from_pairs(args.iter().map(|a| parse_pair(a).unwrap())).unwrap();
        TapStore::new(&mappings)
    }

    #[test]
    fn test_only_naturals_get_state() {
        let store = store(&["66:9", "37:65"]);
        assert_eq!(store.len(), 2);
        assert!(store.get(&KeyCode(66)).is_some());
        assert!(store.get(&KeyCode(9)).is_none());
        assert_eq!(store.get(&KeyCode(37)), Some(&TapState::default()));
    }

    #[test]
    fn test_mark_combo_only_touches_held_keys() {
        let mut store = store(&["66:9", "37:65"]);
        store.get_mut(&KeyCode(66)).unwrap().held = true;
        store.mark_combo();
        assert!(store.get(&KeyCode(66)).unwrap().combo);
        assert!(!store.get(&KeyCode(37)).unwrap().combo);
    }
}
