use catppuccin::PALETTE;
use ratatui::style::Color;
use ratatui::widgets::BorderType;

/// Convert a catppuccin color to a ratatui color.
const fn catppuccin_to_color(c: &catppuccin::Color) -> Color {
    Color::Rgb(c.rgb.r, c.rgb.g, c.rgb.b)
}

/// Application color tokens.
///
/// Holds concrete color values rather than a palette reference, so custom
/// themes can be built by setting fields directly. The provided factories
/// cover the four Catppuccin flavors.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    // Base colors
    pub base: Color,
    pub mantle: Color,
    pub crust: Color,

    // Surface colors
    pub surface1: Color,

    // Text colors
    pub text: Color,
    pub subtext0: Color,

    // Accent colors
    pub red: Color,
    pub peach: Color,
    pub green: Color,
    pub teal: Color,
    pub blue: Color,
    pub lavender: Color,

    pub border_type: BorderType,
}

impl Theme {
    const fn from_catppuccin(flavor: &catppuccin::Flavor) -> Self {
        let c = &flavor.colors;
        Self {
            base: catppuccin_to_color(&c.base),
            mantle: catppuccin_to_color(&c.mantle),
            crust: catppuccin_to_color(&c.crust),
            surface1: catppuccin_to_color(&c.surface1),
            text: catppuccin_to_color(&c.text),
            subtext0: catppuccin_to_color(&c.subtext0),
            red: catppuccin_to_color(&c.red),
            peach: catppuccin_to_color(&c.peach),
            green: catppuccin_to_color(&c.green),
            teal: catppuccin_to_color(&c.teal),
            blue: catppuccin_to_color(&c.blue),
            lavender: catppuccin_to_color(&c.lavender),
            border_type: BorderType::Rounded,
        }
    }

    /// Catppuccin Mocha theme (dark).
    #[must_use]
    pub fn catppuccin_mocha() -> Self {
        Self::from_catppuccin(&PALETTE.mocha)
    }

    /// Catppuccin Latte theme (light).
    #[must_use]
    pub fn catppuccin_latte() -> Self {
        Self::from_catppuccin(&PALETTE.latte)
    }

    /// Catppuccin Frappé theme (dark).
    #[must_use]
    pub fn catppuccin_frappe() -> Self {
        Self::from_catppuccin(&PALETTE.frappe)
    }

    /// Catppuccin Macchiato theme (dark).
    #[must_use]
    pub fn catppuccin_macchiato() -> Self {
        Self::from_catppuccin(&PALETTE.macchiato)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::catppuccin_mocha()
    }
}

/// Resolve a theme by its configured name, falling back to Mocha for names
/// we do not recognize.
pub fn theme_from_name(name: &str) -> Theme {
    match name.to_lowercase().as_str() {
        "catppuccin latte" | "latte" => Theme::catppuccin_latte(),
        "catppuccin frappe" | "catppuccin frappé" | "frappe" | "frappé" => {
            Theme::catppuccin_frappe()
        }
        "catppuccin macchiato" | "macchiato" => Theme::catppuccin_macchiato(),
        _ => Theme::catppuccin_mocha(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_from_name_is_case_insensitive() {
        let latte = theme_from_name("Catppuccin Latte");
        assert_eq!(latte.base, Theme::catppuccin_latte().base);
        let also_latte = theme_from_name("LATTE");
        assert_eq!(also_latte.base, latte.base);
    }

    #[test]
    fn test_unknown_theme_falls_back_to_mocha() {
        let theme = theme_from_name("solarized");
        assert_eq!(theme.base, Theme::catppuccin_mocha().base);
    }
}
