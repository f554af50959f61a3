//! Colors, glyphs and styles for the Triad dashboard.
//!
//! Kanagawa-inspired palette by default, with a high-contrast override for
//! terminals and users that need it.

use ratatui::style::{Color, Modifier, Style};

use triad_types::{Status, ui::UiOptions};

mod colors {
    use super::Color;

    pub const BG_DARK: Color = Color::Rgb(22, 22, 29);
    pub const BG_PANEL: Color = Color::Rgb(31, 31, 40);
    pub const BORDER: Color = Color::Rgb(84, 84, 109);

    pub const TEXT_PRIMARY: Color = Color::Rgb(220, 215, 186);
    pub const TEXT_SECONDARY: Color = Color::Rgb(200, 192, 147);
    pub const TEXT_MUTED: Color = Color::Rgb(114, 113, 105);

    pub const VIOLET: Color = Color::Rgb(149, 127, 184);
    pub const BLUE: Color = Color::Rgb(126, 156, 216);
    pub const CYAN: Color = Color::Rgb(127, 180, 202);
    pub const GREEN: Color = Color::Rgb(152, 187, 108);
    pub const YELLOW: Color = Color::Rgb(230, 195, 132);
    pub const ORANGE: Color = Color::Rgb(255, 160, 102);
    pub const RED: Color = Color::Rgb(255, 93, 98);
}

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg_dark: Color,
    pub bg_panel: Color,
    pub border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub title: Color,
    pub accent: Color,
    pub author: Color,
    pub success: Color,
    pub partial: Color,
    pub error: Color,
    pub loading: Color,
    pub key: Color,
}

impl Palette {
    #[must_use]
    pub fn standard() -> Self {
        Self {
            bg_dark: colors::BG_DARK,
            bg_panel: colors::BG_PANEL,
            border: colors::BORDER,
            text_primary: colors::TEXT_PRIMARY,
            text_secondary: colors::TEXT_SECONDARY,
            text_muted: colors::TEXT_MUTED,
            title: colors::VIOLET,
            accent: colors::CYAN,
            author: colors::BLUE,
            success: colors::GREEN,
            partial: colors::YELLOW,
            error: colors::RED,
            loading: colors::CYAN,
            key: colors::ORANGE,
        }
    }

    #[must_use]
    pub fn high_contrast() -> Self {
        Self {
            bg_dark: Color::Black,
            bg_panel: Color::Black,
            border: Color::Gray,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            text_muted: Color::Gray,
            title: Color::White,
            accent: Color::Cyan,
            author: Color::Cyan,
            success: Color::Green,
            partial: Color::Yellow,
            error: Color::Red,
            loading: Color::Cyan,
            key: Color::Yellow,
        }
    }

    #[must_use]
    pub fn status(&self, status: Status) -> Color {
        match status {
            Status::Success => self.success,
            Status::Partial => self.partial,
            Status::Error => self.error,
        }
    }
}

#[must_use]
pub fn palette(options: UiOptions) -> Palette {
    if options.high_contrast {
        Palette::high_contrast()
    } else {
        Palette::standard()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Glyphs {
    pub bullet: &'static str,
    pub ok: &'static str,
    pub partial: &'static str,
    pub failed: &'static str,
    pub idle: &'static str,
    pub separator: &'static str,
    pub spinner_frames: &'static [&'static str],
}

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const SPINNER_FRAMES_ASCII: &[&str] = &["|", "/", "-", "\\"];

#[must_use]
pub fn glyphs(options: UiOptions) -> Glyphs {
    if options.ascii_only {
        Glyphs {
            bullet: "*",
            ok: "OK",
            partial: "!",
            failed: "X",
            idle: "o",
            separator: "|",
            spinner_frames: SPINNER_FRAMES_ASCII,
        }
    } else {
        Glyphs {
            bullet: "•",
            ok: "✓",
            partial: "◐",
            failed: "✗",
            idle: "○",
            separator: "│",
            spinner_frames: SPINNER_FRAMES,
        }
    }
}

impl Glyphs {
    #[must_use]
    pub fn status(&self, status: Status) -> &'static str {
        match status {
            Status::Success => self.ok,
            Status::Partial => self.partial,
            Status::Error => self.failed,
        }
    }
}

/// When `reduced_motion` is enabled, returns a static glyph instead of cycling.
#[must_use]
pub fn spinner_frame(tick: usize, options: UiOptions) -> &'static str {
    let frames = glyphs(options).spinner_frames;
    if options.reduced_motion {
        frames[0]
    } else {
        frames[tick % frames.len()]
    }
}

pub mod styles {
    use super::{Modifier, Palette, Style};

    #[must_use]
    pub fn panel_title(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.title)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn mode_badge(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.bg_dark)
            .bg(palette.accent)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn label(palette: &Palette) -> Style {
        Style::default().fg(palette.text_muted)
    }

    #[must_use]
    pub fn key_hint(palette: &Palette) -> Style {
        Style::default().fg(palette.text_muted)
    }

    #[must_use]
    pub fn key_highlight(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.key)
            .add_modifier(Modifier::BOLD)
    }
}
