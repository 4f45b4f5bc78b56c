//! Key bindings in the `cmd-shift-p` notation used by keybinding files.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    /// Cmd on macOS, Super/Win elsewhere.
    pub platform: bool,
}

impl Modifiers {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        !(self.ctrl || self.alt || self.shift || self.platform)
    }
}

/// A single key chord such as `ctrl-shift-p` or `f5`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Keystroke {
    pub modifiers: Modifiers,
    /// Lower-cased key name (`p`, `enter`, `f5`).
    pub key: String,
}

impl Keystroke {
    pub fn new(modifiers: Modifiers, key: impl Into<String>) -> Self {
        Self {
            modifiers,
            key: key.into().to_lowercase(),
        }
    }

    pub fn parse(source: &str) -> Result<Self, String> {
        let source = source.trim();
        if source.is_empty() {
            return Err("empty keystroke".to_string());
        }

        // A trailing "-" means the minus key itself ("ctrl--").
        let (mods_part, key) = match source.strip_suffix("--") {
            Some(rest) => (rest, "-"),
            None => match source.rsplit_once('-') {
                Some((mods, key)) => (mods, key),
                None => ("", source),
            },
        };
        if key.is_empty() {
            return Err(format!("keystroke '{source}' has no key"));
        }

        let mut modifiers = Modifiers::none();
        for part in mods_part.split('-').filter(|p| !p.is_empty()) {
            match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => modifiers.ctrl = true,
                "alt" | "option" | "opt" => modifiers.alt = true,
                "shift" => modifiers.shift = true,
                "cmd" | "super" | "win" | "platform" | "meta" => modifiers.platform = true,
                other => return Err(format!("unknown modifier '{other}' in '{source}'")),
            }
        }

        Ok(Self::new(modifiers, key))
    }
}

impl fmt::Display for Keystroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.platform {
            f.write_str("cmd-")?;
        }
        if self.modifiers.ctrl {
            f.write_str("ctrl-")?;
        }
        if self.modifiers.alt {
            f.write_str("alt-")?;
        }
        if self.modifiers.shift {
            f.write_str("shift-")?;
        }
        f.write_str(&self.key)
    }
}

impl FromStr for Keystroke {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Keystroke {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Keystroke> for String {
    fn from(value: Keystroke) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_key() {
        let ks = Keystroke::parse("F5").unwrap();
        assert!(ks.modifiers.is_empty());
        assert_eq!(ks.key, "f5");
    }

    #[test]
    fn test_parse_modifiers() {
        let ks = Keystroke::parse("ctrl-shift-p").unwrap();
        assert!(ks.modifiers.ctrl);
        assert!(ks.modifiers.shift);
        assert!(!ks.modifiers.alt);
        assert_eq!(ks.key, "p");
    }

    #[test]
    fn test_parse_minus_key() {
        let ks = Keystroke::parse("cmd--").unwrap();
        assert!(ks.modifiers.platform);
        assert_eq!(ks.key, "-");
    }

    #[test]
    fn test_parse_rejects_unknown_modifier() {
        assert!(Keystroke::parse("hyper-x").is_err());
        assert!(Keystroke::parse("").is_err());
    }

    #[test]
    fn test_display_is_canonical() {
        let ks = Keystroke::parse("shift-cmd-P").unwrap();
        assert_eq!(ks.to_string(), "cmd-shift-p");
    }
}
