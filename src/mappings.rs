use crate::consts::*;
use anyhow::{Context, Result, anyhow, bail};
use evdev::KeyCode;
use std::collections::HashMap;

pub(crate) const PAIR_SEP: char = ':';

/// A natural key and the artificial key its taps turn into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Pair {
    pub natural: KeyCode,
    pub artificial: KeyCode,
}

/// Parses `NATURAL:ARTIFICIAL`, both decimal key codes.
pub(crate) fn parse_pair(arg: &str) -> Result<Pair> {
    let (natural, artificial) = arg
        .split_once(PAIR_SEP)
        .ok_or_else(|| anyhow!("could not parse pair '{arg}', expected NATURAL:ARTIFICIAL"))?;

    let natural = parse_code(natural).with_context(|| format!("bad natural code in '{arg}'"))?;
    let artificial =
        parse_code(artificial).with_context(|| format!("bad artificial code in '{arg}'"))?;

    if is_button(natural) {
        bail!("natural code {natural} in '{arg}' is a pointer button, not a key");
    }

    Ok(Pair {
        natural: KeyCode(natural),
        artificial: KeyCode(artificial),
    })
}

fn parse_code(value: &str) -> Result<u16> {
    let code: u16 = value
        .trim()
        .parse()
        .with_context(|| format!("'{value}' is not a key code"))?;
    if code >= KEY_CNT {
        bail!("key code {code} is out of range (0..{KEY_CNT})");
    }
    Ok(code)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Mappings {
    natart: HashMap<KeyCode, KeyCode>,
}

impl Mappings {
    /// Later pairs for the same natural key replace earlier ones.
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = Pair>,
    {
        let mut natart = HashMap::new();
        for pair in pairs {
            natart.insert(pair.natural, pair.artificial);
        }

        if natart.is_empty() {
            bail!("no NATURAL:ARTIFICIAL pairs given");
        }

        Ok(Self { natart })
    }

    pub fn artificial(&self, natural: &KeyCode) -> Option<KeyCode> {
        self.natart.get(natural).copied()
    }

    pub fn naturals(&self) -> impl Iterator<Item = KeyCode> + '_ {
        self.natart.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (KeyCode, KeyCode)> + '_ {
        self.natart.iter().map(|(n, a)| (*n, *a))
    }

    pub fn len(&self) -> usize {
        self.natart.len()
    }
}
