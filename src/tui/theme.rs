use ratatui::style::Color;

use crate::model::UiConfig;

/// Colors used across the TUI. Each field can be overridden from
/// `[ui.colors]` in the config file by its field name.
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub panel: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
    pub cyan: Color,
    pub selection_bg: Color,
    pub gauge_empty: Color,
}

const fn rgb(hex: u32) -> Color {
    Color::Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

impl Default for Theme {
    // Ink and sage
    fn default() -> Self {
        Theme {
            background: rgb(0x111614),
            panel: rgb(0x1B2320),
            text: rgb(0xC8D3C5),
            text_bright: rgb(0xF4F1E8),
            highlight: rgb(0xE0A458),
            dim: rgb(0x6F7D74),
            red: rgb(0xE06C5B),
            yellow: rgb(0xE8C872),
            green: rgb(0x8FBF7F),
            cyan: rgb(0x7FB8B0),
            selection_bg: rgb(0x2C3A33),
            gauge_empty: rgb(0x26302B),
        }
    }
}

/// `#rrggbb`, case-insensitive
fn parse_hex_color(value: &str) -> Option<Color> {
    let digits = value.strip_prefix('#')?;
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok().map(rgb)
}

impl Theme {
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();
        for (name, value) in &ui.colors {
            if let (Some(slot), Some(color)) = (theme.slot_mut(name), parse_hex_color(value)) {
                *slot = color;
            }
        }
        theme
    }

    fn slot_mut(&mut self, name: &str) -> Option<&mut Color> {
        Some(match name {
            "background" => &mut self.background,
            "panel" => &mut self.panel,
            "text" => &mut self.text,
            "text_bright" => &mut self.text_bright,
            "highlight" => &mut self.highlight,
            "dim" => &mut self.dim,
            "red" => &mut self.red,
            "yellow" => &mut self.yellow,
            "green" => &mut self.green,
            "cyan" => &mut self.cyan,
            "selection_bg" => &mut self.selection_bg,
            "gauge_empty" => &mut self.gauge_empty,
            _ => return None,
        })
    }

    /// Green when a day or week is done, dim when untouched
    pub fn percentage_color(&self, percentage: u8) -> Color {
        match percentage {
            100 => self.green,
            0 => self.dim,
            _ => self.highlight,
        }
    }
}
