//! Terminal outputs: themed colouring and the completion bell.

use std::io::Write;
use std::sync::{Arc, Mutex};

use colored::{ColoredString, Colorize};
use nebula_core::theme::hex_rgb;
use nebula_core::{PaletteSink, SoundPlayer, Theme};

type Rgb = (u8, u8, u8);

#[derive(Debug, Clone, Copy, Default)]
struct Colors {
    primary: Option<Rgb>,
    accent: Option<Rgb>,
    dim: Option<Rgb>,
}

/// Palette sink that remembers the active theme's colours for rendering.
#[derive(Debug, Clone)]
pub struct Styler {
    enabled: bool,
    colors: Arc<Mutex<Colors>>,
}

impl Styler {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            colors: Arc::new(Mutex::new(Colors::default())),
        }
    }

    fn colors(&self) -> Colors {
        self.colors.lock().map(|c| *c).unwrap_or_default()
    }

    fn paint(&self, text: &str, rgb: Option<Rgb>) -> ColoredString {
        match (self.enabled, rgb) {
            (true, Some((r, g, b))) => text.truecolor(r, g, b),
            _ => text.normal(),
        }
    }

    pub fn primary(&self, text: &str) -> ColoredString {
        self.paint(text, self.colors().primary)
    }

    pub fn accent(&self, text: &str) -> ColoredString {
        self.paint(text, self.colors().accent)
    }

    pub fn dim(&self, text: &str) -> ColoredString {
        if self.enabled {
            self.paint(text, self.colors().dim).dimmed()
        } else {
            text.normal()
        }
    }

    /// Dimmed and struck through, for finished items.
    pub fn done(&self, text: &str) -> ColoredString {
        if self.enabled {
            self.dim(text).strikethrough()
        } else {
            text.normal()
        }
    }

    /// Paint `text` in an arbitrary `#rrggbb` colour.
    pub fn hex(&self, text: &str, color: &str) -> ColoredString {
        self.paint(text, hex_rgb(color))
    }
}

impl PaletteSink for Styler {
    fn apply_palette(&mut self, theme: &Theme) {
        let colors = Colors {
            primary: hex_rgb(theme.colors.primary),
            accent: hex_rgb(theme.colors.accent),
            dim: hex_rgb(theme.colors.secondary),
        };
        if let Ok(mut active) = self.colors.lock() {
            *active = colors;
        }
        tracing::debug!(theme = theme.id, "palette applied");
    }
}

/// Rings the terminal bell on stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl SoundPlayer for TerminalBell {
    fn play_completion_sound(&mut self) {
        let mut stderr = std::io::stderr();
        let _ = stderr.write_all(b"\x07").and_then(|()| stderr.flush());
    }
}
