//! Theme registry.
//!
//! A theme is a named, fixed palette. The registry is static; settings only
//! store a theme id and resolve it here, falling back to the first theme.

use serde::Serialize;

/// Colour values applied to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    pub bg_gradient_start: &'static str,
    pub bg_gradient_mid: &'static str,
    pub bg_gradient_end: &'static str,
    pub primary: &'static str,
    pub secondary: &'static str,
    pub accent: &'static str,
    pub text_main: &'static str,
    pub text_muted: &'static str,
    pub text_dim: &'static str,
    pub glass_bg: &'static str,
    pub glass_border: &'static str,
    pub glass_shadow: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub id: &'static str,
    pub name: &'static str,
    pub colors: Palette,
}

/// Receives the active palette whenever settings change.
pub trait PaletteSink: Send {
    fn apply_palette(&mut self, theme: &Theme);
}

/// Sink that ignores palette changes.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPalette;

impl PaletteSink for NoPalette {
    fn apply_palette(&mut self, _theme: &Theme) {}
}

impl Palette {
    /// CSS custom properties for this palette, in a stable order.
    pub fn css_variables(&self) -> [(&'static str, &'static str); 12] {
        [
            ("--color-bg-gradient-start", self.bg_gradient_start),
            ("--color-bg-gradient-mid", self.bg_gradient_mid),
            ("--color-bg-gradient-end", self.bg_gradient_end),
            ("--color-primary", self.primary),
            ("--color-secondary", self.secondary),
            ("--color-accent", self.accent),
            ("--color-text-main", self.text_main),
            ("--color-text-muted", self.text_muted),
            ("--color-text-dim", self.text_dim),
            ("--glass-bg", self.glass_bg),
            ("--glass-border", self.glass_border),
            ("--glass-shadow", self.glass_shadow),
        ]
    }

    /// Render as a `:root { ... }` stylesheet block.
    pub fn to_css(&self) -> String {
        let mut css = String::from(":root {\n");
        for (name, value) in self.css_variables() {
            css.push_str(&format!("  {name}: {value};\n"));
        }
        css.push('}');
        css
    }
}

/// Parse `#rrggbb` into its components. Other colour syntaxes yield `None`.
pub fn hex_rgb(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

static THEMES: [Theme; 5] = [
    Theme {
        id: "nebula",
        name: "Nebula",
        colors: Palette {
            bg_gradient_start: "#0f0c29",
            bg_gradient_mid: "#302b63",
            bg_gradient_end: "#24243e",
            primary: "#a18cd1",
            secondary: "#fbc2eb",
            accent: "#00d2ff",
            text_main: "#ffffff",
            text_muted: "rgba(255, 255, 255, 0.7)",
            text_dim: "rgba(255, 255, 255, 0.4)",
            glass_bg: "rgba(255, 255, 255, 0.05)",
            glass_border: "rgba(255, 255, 255, 0.1)",
            glass_shadow: "0 8px 32px 0 rgba(0, 0, 0, 0.37)",
        },
    },
    Theme {
        id: "aurora",
        name: "Aurora",
        colors: Palette {
            bg_gradient_start: "#0b3d2e",
            bg_gradient_mid: "#136a5a",
            bg_gradient_end: "#1b2735",
            primary: "#43e97b",
            secondary: "#38f9d7",
            accent: "#a8ff78",
            text_main: "#f0fff4",
            text_muted: "rgba(240, 255, 244, 0.7)",
            text_dim: "rgba(240, 255, 244, 0.4)",
            glass_bg: "rgba(255, 255, 255, 0.06)",
            glass_border: "rgba(67, 233, 123, 0.2)",
            glass_shadow: "0 8px 32px 0 rgba(0, 20, 10, 0.45)",
        },
    },
    Theme {
        id: "sunset",
        name: "Sunset",
        colors: Palette {
            bg_gradient_start: "#42275a",
            bg_gradient_mid: "#734b6d",
            bg_gradient_end: "#b24592",
            primary: "#ff9a8b",
            secondary: "#ff6a88",
            accent: "#ffd194",
            text_main: "#fff8f0",
            text_muted: "rgba(255, 248, 240, 0.75)",
            text_dim: "rgba(255, 248, 240, 0.45)",
            glass_bg: "rgba(255, 255, 255, 0.08)",
            glass_border: "rgba(255, 154, 139, 0.25)",
            glass_shadow: "0 8px 32px 0 rgba(40, 0, 20, 0.4)",
        },
    },
    Theme {
        id: "ocean",
        name: "Ocean",
        colors: Palette {
            bg_gradient_start: "#000428",
            bg_gradient_mid: "#004e92",
            bg_gradient_end: "#00203f",
            primary: "#4facfe",
            secondary: "#00f2fe",
            accent: "#89f7fe",
            text_main: "#e6f7ff",
            text_muted: "rgba(230, 247, 255, 0.7)",
            text_dim: "rgba(230, 247, 255, 0.4)",
            glass_bg: "rgba(255, 255, 255, 0.05)",
            glass_border: "rgba(79, 172, 254, 0.2)",
            glass_shadow: "0 8px 32px 0 rgba(0, 10, 40, 0.5)",
        },
    },
    Theme {
        id: "midnight",
        name: "Midnight",
        colors: Palette {
            bg_gradient_start: "#000000",
            bg_gradient_mid: "#141414",
            bg_gradient_end: "#232526",
            primary: "#bdc3c7",
            secondary: "#8e9eab",
            accent: "#eef2f3",
            text_main: "#f5f5f5",
            text_muted: "rgba(245, 245, 245, 0.65)",
            text_dim: "rgba(245, 245, 245, 0.35)",
            glass_bg: "rgba(255, 255, 255, 0.04)",
            glass_border: "rgba(255, 255, 255, 0.08)",
            glass_shadow: "0 8px 32px 0 rgba(0, 0, 0, 0.6)",
        },
    },
];

/// Every registered theme. The first entry is the fallback.
pub fn themes() -> &'static [Theme] {
    &THEMES
}

pub fn lookup(id: &str) -> Option<&'static Theme> {
    THEMES.iter().find(|t| t.id == id)
}

/// Resolve `id`, falling back to the first registered theme.
pub fn resolve(id: &str) -> &'static Theme {
    lookup(id).unwrap_or(&THEMES[0])
}
