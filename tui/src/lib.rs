//! TUI rendering for Triad using ratatui.

mod input;
mod theme;

pub use input::{InputPump, apply_key, handle_events};
pub use theme::{Glyphs, Palette, glyphs, palette, spinner_frame, styles};

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Padding, Paragraph},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use triad_engine::{App, Panel, StatusLine, Transport};

const HEADER_HEIGHT: u16 = 3;
const STATUS_HEIGHT: u16 = 7;
const TIME_FORMAT: &str = "%H:%M:%S";

/// Main draw function
///
/// Takes `&mut App` because the list panels report their measured scroll
/// limits back to the app.
pub fn draw<T: Transport + 'static>(frame: &mut Frame, app: &mut App<T>) {
    let options = app.ui_options();
    let palette = palette(options);
    let glyphs = glyphs(options);

    let bg_block = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg_block, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(3),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(frame.area());

    let lists = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[1]);

    draw_header(frame, app, chunks[0], &palette, &glyphs);
    draw_users(frame, app, lists[0], &palette, &glyphs);
    draw_posts(frame, app, lists[1], &palette, &glyphs);
    draw_status(frame, app, chunks[2], &palette, &glyphs);
}

fn panel<'a>(title: &'a str, palette: &Palette) -> Block<'a> {
    framed(title, palette, palette.border)
}

fn framed<'a>(title: &'a str, palette: &Palette, border: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(palette.bg_panel))
        .padding(Padding::horizontal(1))
        .title(Span::styled(title, styles::panel_title(palette)))
}

fn draw_header<T: Transport + 'static>(
    frame: &mut Frame,
    app: &App<T>,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let mut spans = vec![
        Span::styled(
            format!(" {} ", app.mode().display_name()),
            styles::mode_badge(palette),
        ),
        Span::raw(" "),
    ];

    for (key, action) in [
        ("l", "load"),
        ("r", "refresh"),
        ("m", "mode"),
        ("j/k", "scroll"),
        ("u/p", "panel"),
        ("q", "quit"),
    ] {
        spans.push(Span::styled(key, styles::key_highlight(palette)));
        spans.push(Span::styled(format!(" {action}  "), styles::key_hint(palette)));
    }

    if let Some(notice) = app.notice() {
        spans.push(Span::styled(
            format!("{} ", glyphs.separator),
            styles::key_hint(palette),
        ));
        spans.push(Span::styled(
            notice.to_string(),
            Style::default().fg(palette.text_secondary),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(panel(" Triad ", palette));
    frame.render_widget(header, area);
}

/// Inner width available for text in a bordered, padded panel.
fn text_width(area: Rect) -> usize {
    usize::from(area.width.saturating_sub(4))
}

/// Border for a list panel, highlighted when it has scroll focus.
fn list_block<'a, T: Transport + 'static>(
    app: &App<T>,
    panel: Panel,
    title: &'a str,
    palette: &Palette,
) -> Block<'a> {
    let border = if app.focus() == panel {
        palette.accent
    } else {
        palette.border
    };
    framed(title, palette, border)
}

/// Render one list panel, scrolled to the app's offset for it.
fn draw_list<T: Transport + 'static>(
    frame: &mut Frame,
    app: &mut App<T>,
    panel: Panel,
    lines: Vec<Line<'static>>,
    title: &str,
    area: Rect,
    palette: &Palette,
) {
    let block = list_block(app, panel, title, palette);
    let inner = block.inner(area);
    let total = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    app.update_scroll_viewport(panel, total.saturating_sub(inner.height), inner.height);
    let offset = app.scroll(panel).offset_from_top();

    let list = Paragraph::new(lines).block(block).scroll((offset, 0));
    frame.render_widget(list, area);
}

fn draw_users<T: Transport + 'static>(
    frame: &mut Frame,
    app: &mut App<T>,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let width = text_width(area).saturating_sub(2);
    let ellipsis = ellipsis(glyphs);
    let lines: Vec<Line<'static>> = app
        .view()
        .users()
        .iter()
        .map(|user| {
            Line::from(vec![
                Span::styled(format!("{} ", glyphs.bullet), styles::label(palette)),
                Span::styled(
                    truncate_with_ellipsis(&user.to_string(), width, ellipsis),
                    Style::default().fg(palette.text_primary),
                ),
            ])
        })
        .collect();

    let title = format!(" Users ({}) ", app.view().users().len());
    draw_list(frame, app, Panel::Users, lines, &title, area, palette);
}

fn draw_posts<T: Transport + 'static>(
    frame: &mut Frame,
    app: &mut App<T>,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let width = text_width(area).saturating_sub(2);
    let ellipsis = ellipsis(glyphs);
    let lines: Vec<Line<'static>> = app
        .view()
        .posts()
        .iter()
        .map(|post| {
            let suffix = format!(" - {} | Comments: {}", post.author, post.comments);
            let title_width = width.saturating_sub(suffix.width());
            Line::from(vec![
                Span::styled(format!("{} ", glyphs.bullet), styles::label(palette)),
                Span::styled(
                    truncate_with_ellipsis(&post.title, title_width, ellipsis),
                    Style::default().fg(palette.text_primary),
                ),
                Span::styled(
                    format!(" - {}", post.author),
                    Style::default().fg(palette.author),
                ),
                Span::styled(
                    format!(" | Comments: {}", post.comments),
                    styles::label(palette),
                ),
            ])
        })
        .collect();

    let title = format!(" Posts ({}) ", app.view().posts().len());
    draw_list(frame, app, Panel::Posts, lines, &title, area, palette);
}

fn draw_status<T: Transport + 'static>(
    frame: &mut Frame,
    app: &App<T>,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let status = app.view().status();
    let (glyph, color) = match status {
        StatusLine::Idle => (glyphs.idle, palette.text_muted),
        StatusLine::Loading => (
            spinner_frame(app.tick_count(), app.ui_options()),
            palette.loading,
        ),
        StatusLine::Reported(report) => (glyphs.status(report.status), palette.status(report.status)),
    };

    let (time, error) = match status.report() {
        Some(report) => (
            report.at.format(TIME_FORMAT).to_string(),
            report.error_display().to_string(),
        ),
        None => ("-".to_string(), "-".to_string()),
    };
    let error_style = if error == "-" {
        Style::default().fg(palette.text_muted)
    } else {
        Style::default().fg(palette.error)
    };

    let counters = app.counters();
    let width = text_width(area);
    let row = |label: &'static str, value: Span<'static>| {
        Line::from(vec![
            Span::styled(format!("{label:<10}"), styles::label(palette)),
            value,
        ])
    };

    let lines = vec![
        row(
            "State",
            Span::styled(
                format!("{glyph} {}", status.label()),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
        ),
        row("Time", Span::styled(time, Style::default().fg(palette.text_secondary))),
        row(
            "Error",
            Span::styled(
                truncate_with_ellipsis(&error, width.saturating_sub(10), ellipsis(glyphs)),
                error_style,
            ),
        ),
        row(
            "Succeeded",
            Span::styled(
                counters.success_count.to_string(),
                Style::default().fg(palette.success),
            ),
        ),
        row(
            "Failed",
            Span::styled(
                counters.failure_count.to_string(),
                Style::default().fg(palette.error),
            ),
        ),
    ];

    frame.render_widget(Paragraph::new(lines).block(panel(" Status ", palette)), area);
}

fn ellipsis(glyphs: &Glyphs) -> &'static str {
    if glyphs.bullet.is_ascii() { "..." } else { "…" }
}

/// Cut `text` to at most `max_width` display columns, marking the cut.
pub fn truncate_with_ellipsis(text: &str, max_width: usize, ellipsis: &str) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let budget = max_width.saturating_sub(ellipsis.width());
    if budget == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push_str(ellipsis);
    out
}
