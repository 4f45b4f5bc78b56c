//! Platform capabilities.
//!
//! One implementation is picked at startup by [`detect`]; everything else
//! talks to the trait.

use querypad_core::{Keystroke, Modifiers};

use crate::settings::ModifierStyle;

pub trait PlatformIntegration: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether commands also appear in a native, screen-level menu bar.
    fn has_native_menu_bar(&self) -> bool;

    /// Whether the OS supplies the About entry (so the app shouldn't add one).
    fn handles_about_box(&self) -> bool;

    /// Modifier used for the main shortcuts (Cmd vs Ctrl).
    fn primary_modifier(&self) -> Modifiers;

    /// Human-readable keystroke for palette hints.
    fn format_keystroke(&self, keystroke: &Keystroke) -> String;

    /// Primary modifier + `key`.
    fn primary(&self, key: &str) -> Keystroke {
        Keystroke::new(self.primary_modifier(), key)
    }

    /// Primary modifier + shift + `key`.
    fn primary_shift(&self, key: &str) -> Keystroke {
        let mut modifiers = self.primary_modifier();
        modifiers.shift = true;
        Keystroke::new(modifiers, key)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MacPlatform {
    pub modifier_style: ModifierStyle,
}

impl PlatformIntegration for MacPlatform {
    fn name(&self) -> &'static str {
        "macos"
    }

    fn has_native_menu_bar(&self) -> bool {
        true
    }

    fn handles_about_box(&self) -> bool {
        true
    }

    fn primary_modifier(&self) -> Modifiers {
        match self.modifier_style {
            ModifierStyle::Platform => Modifiers { platform: true, ..Modifiers::none() },
            ModifierStyle::Ctrl => Modifiers { ctrl: true, ..Modifiers::none() },
        }
    }

    fn format_keystroke(&self, keystroke: &Keystroke) -> String {
        // Apple order: Control, Option, Shift, Command
        let mut out = String::new();
        let m = keystroke.modifiers;
        if m.ctrl {
            out.push('⌃');
        }
        if m.alt {
            out.push('⌥');
        }
        if m.shift {
            out.push('⇧');
        }
        if m.platform {
            out.push('⌘');
        }
        out.push_str(&display_key(&keystroke.key));
        out
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopPlatform;

impl PlatformIntegration for DesktopPlatform {
    fn name(&self) -> &'static str {
        "desktop"
    }

    fn has_native_menu_bar(&self) -> bool {
        false
    }

    fn handles_about_box(&self) -> bool {
        false
    }

    fn primary_modifier(&self) -> Modifiers {
        Modifiers { ctrl: true, ..Modifiers::none() }
    }

    fn format_keystroke(&self, keystroke: &Keystroke) -> String {
        let m = keystroke.modifiers;
        let mut parts: Vec<String> = Vec::new();
        if m.ctrl {
            parts.push("Ctrl".into());
        }
        if m.alt {
            parts.push("Alt".into());
        }
        if m.shift {
            parts.push("Shift".into());
        }
        if m.platform {
            parts.push("Super".into());
        }
        parts.push(display_key(&keystroke.key));
        parts.join("+")
    }
}

fn display_key(key: &str) -> String {
    match key {
        "enter" => "Enter".into(),
        "escape" => "Esc".into(),
        "backspace" => "Backspace".into(),
        "delete" => "Del".into(),
        "tab" => "Tab".into(),
        "space" => "Space".into(),
        "up" => "↑".into(),
        "down" => "↓".into(),
        "left" => "←".into(),
        "right" => "→".into(),
        "pageup" => "PgUp".into(),
        "pagedown" => "PgDn".into(),
        other => other.to_uppercase(),
    }
}

/// Pick the implementation for the running OS.
pub fn detect(modifier_style: ModifierStyle) -> Box<dyn PlatformIntegration> {
    if cfg!(target_os = "macos") {
        Box::new(MacPlatform { modifier_style })
    } else {
        Box::new(DesktopPlatform)
    }
}
