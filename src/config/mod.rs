pub mod key;
mod loader;

use std::time::Duration;

use crossterm::event::KeyCode;
use serde::{Deserialize, Serialize};

use crate::confirm::{ConfirmConfig, CycleMode};
use key::{Key, KeyBinding};
pub use loader::load;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub name: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: "Catppuccin Mocha".to_string(),
        }
    }
}

/// Confirmation timing, in config-file-friendly milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutsConfig {
    /// How long the confirmation prompt waits before reverting.
    pub prompt_ms: u64,
    /// How long the success state is shown.
    pub success_ms: u64,
    /// Whether the cycle rests in a distinct completed state after success.
    pub four_phase: bool,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            prompt_ms: 3000,
            success_ms: 2000,
            four_phase: true,
        }
    }
}

impl TimeoutsConfig {
    pub const fn to_confirm_config(&self) -> ConfirmConfig {
        ConfirmConfig {
            prompt_timeout: Duration::from_millis(self.prompt_ms),
            success_display: Duration::from_millis(self.success_ms),
            mode: if self.four_phase {
                CycleMode::FourPhase
            } else {
                CycleMode::ThreePhase
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeybindingsConfig {
    /// Press the button.
    pub press: KeyBinding,
    pub quit: KeyBinding,
    pub suspend: KeyBinding,
}

impl Default for KeybindingsConfig {
    fn default() -> Self {
        Self {
            press: KeyBinding::from(vec![
                Key::new(KeyCode::Enter),
                Key::new(KeyCode::Char(' ')),
            ]),
            quit: Key::new(KeyCode::Char('q')).into(),
            suspend: Key::with_ctrl(KeyCode::Char('z')).into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub timeouts: TimeoutsConfig,
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.theme.name, "Catppuccin Mocha");
        assert_eq!(config.timeouts.prompt_ms, 3000);
        assert_eq!(config.timeouts.success_ms, 2000);
        assert!(config.timeouts.four_phase);
    }

    #[test]
    fn test_partial_config_overrides() {
        let config: AppConfig = toml::from_str(
            r#"
            [theme]
            name = "Catppuccin Latte"

            [timeouts]
            prompt_ms = 5000
            success_ms = 1000
            four_phase = false

            [keybindings]
            press = "Enter"
            quit = "Esc"
            suspend = "ctrl+z"
            "#,
        )
        .unwrap();
        assert_eq!(config.theme.name, "Catppuccin Latte");
        let confirm = config.timeouts.to_confirm_config();
        assert_eq!(confirm.prompt_timeout, Duration::from_millis(5000));
        assert_eq!(confirm.success_display, Duration::from_millis(1000));
        assert_eq!(confirm.mode, CycleMode::ThreePhase);
    }

    #[test]
    fn test_press_binding_accepts_chord_list() {
        let config: AppConfig = toml::from_str(
            r#"
            [keybindings]
            press = ["Enter", "Space"]
            quit = "q"
            suspend = "ctrl+z"
            "#,
        )
        .unwrap();
        assert_eq!(config.keybindings.press.display(), "Enter/Space");
    }
}
