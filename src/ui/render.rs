use ratatui::{
    layout::{Constraint, Direction, Layout, Margin, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, Tabs, Wrap},
    Frame,
};

use crate::app::{App, Section};
use crate::pitch::PitchPhase;
use crate::theme::Palette;

use super::gradient::{gradient_block, gradient_color};
use super::markdown::render_blocks;
use super::portfolio::{about_lines, education_lines, experience_lines, projects_lines, skills_lines};
use super::text::wrap_text;

/// Main UI rendering function.
pub fn ui(f: &mut Frame, app: &mut App) {
    let palette = app.theme.palette().clone();

    let background = Block::default().style(Style::default().bg(palette.bg_primary()));
    f.render_widget(background, f.size());

    let inner_area = f.size().inner(&Margin {
        horizontal: 1,
        vertical: 0,
    });

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(3),    // Content
            Constraint::Length(1), // Footer
        ])
        .split(inner_area);

    render_tabs(f, app, &palette, chunks[0]);

    if app.section == Section::Pitch {
        render_pitch(f, app, &palette, chunks[1]);
    } else {
        render_section(f, app, &palette, chunks[1]);
    }

    render_footer(f, app, &palette, chunks[2]);
}

fn render_tabs(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let titles: Vec<Line> = Section::all()
        .iter()
        .enumerate()
        .map(|(i, s)| Line::from(format!("{} {}", i + 1, s.title())))
        .collect();

    let (start, end) = palette.accent_gradient();
    let tabs = Tabs::new(titles)
        .select(app.section.index())
        .style(Style::default().fg(palette.muted()))
        .highlight_style(
            Style::default()
                .fg(palette.heading())
                .bg(palette.highlight_bg())
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::styled("│", Style::default().fg(palette.muted())))
        .block(gradient_block(
            &format!(" {} ", app.profile.name),
            Some((format!("{} theme", app.theme.mode().label()), palette.muted())),
            start,
            end,
        ));

    f.render_widget(tabs, area);
}

fn render_section(f: &mut Frame, app: &mut App, palette: &Palette, area: Rect) {
    let width = area.width.saturating_sub(4) as usize;
    let lines = match app.section {
        Section::About => about_lines(&app.profile, palette, width),
        Section::Skills => skills_lines(&app.profile, palette, width),
        Section::Experience => experience_lines(&app.profile, palette, width),
        Section::Education => education_lines(&app.profile, palette, width),
        Section::Projects => projects_lines(&app.profile, app.selected_project, palette, width),
        Section::Pitch => Vec::new(),
    };

    let (start, end) = palette.accent_gradient();
    let block = gradient_block(&format!(" {} ", app.section.title()), None, start, end);
    render_scrolled(f, app, palette, lines, block, area);
}

fn pitch_status(app: &App, palette: &Palette) -> (String, ratatui::style::Color) {
    match app.pitch.phase() {
        PitchPhase::Idle => ("● Ready".to_string(), palette.status_ready()),
        PitchPhase::Requesting => ("● Requesting...".to_string(), palette.status_streaming()),
        PitchPhase::Streaming => ("● Streaming...".to_string(), palette.status_streaming()),
        PitchPhase::Completed => {
            let at = app
                .pitch
                .completed_at()
                .map(|t| format!(" at {}", t.format("%H:%M")))
                .unwrap_or_default();
            (format!("● Done{}", at), palette.status_ready())
        }
        PitchPhase::Failed(_) => ("● Error".to_string(), palette.status_error()),
    }
}

fn render_pitch(f: &mut Frame, app: &mut App, palette: &Palette, area: Rect) {
    let error_text = app.pitch.error().map(|e| e.to_string());
    let error_height = error_text
        .as_ref()
        .map(|text| wrap_text(text, area.width.saturating_sub(4) as usize).len() as u16 + 2)
        .unwrap_or(0);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),               // Pitch output
            Constraint::Length(error_height), // Error banner
            Constraint::Length(3),            // Input box
        ])
        .split(area);

    let width = chunks[0].width.saturating_sub(4) as usize;
    let blocks = app.pitch.document();
    let lines = if blocks.is_empty() && !app.is_streaming() {
        wrap_text(
            "Describe a business problem below and press Enter to get a project pitch.",
            width,
        )
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(palette.muted()))))
        .collect()
    } else {
        render_blocks(&blocks, palette, width)
    };

    let (start, end) = palette.accent_gradient();
    let block = gradient_block(" Project Pitch ", Some(pitch_status(app, palette)), start, end);
    render_scrolled(f, app, palette, lines, block, chunks[0]);

    if let Some(text) = error_text {
        let banner = Paragraph::new(text)
            .style(Style::default().fg(palette.status_error()))
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(palette.status_error()))
                    .title(" Error (Esc to dismiss) "),
            );
        f.render_widget(banner, chunks[1]);
    }

    render_input(f, app, palette, chunks[2]);
}

fn render_input(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let cursor_char = if app.cursor_visible { "▎" } else { " " };
    let cursor_style = Style::default()
        .fg(palette.heading())
        .add_modifier(Modifier::SLOW_BLINK);

    let input_text = if !app.pitch.can_submit() {
        Line::from(Span::styled(
            "Generating pitch... press Ctrl+X to cancel",
            Style::default().fg(palette.muted()),
        ))
    } else {
        let (before, after) = app.input.split_at_cursor();
        Line::from(vec![
            Span::raw(before.to_string()),
            Span::styled(cursor_char, cursor_style),
            Span::raw(after.to_string()),
        ])
    };

    let (start, end) = palette.accent_gradient();
    let input_block = Block::default()
        .borders(Borders::LEFT)
        .border_style(Style::default().fg(gradient_color(start, end, 0.5)))
        .title(" Business problem ")
        .style(Style::default().bg(palette.bg_secondary()));

    let input = Paragraph::new(input_text)
        .style(Style::default().fg(palette.text()))
        .block(input_block)
        .wrap(Wrap { trim: false });

    f.render_widget(input, area);
}

/// Draw pre-wrapped lines in a bordered block with a scrollbar.
fn render_scrolled(
    f: &mut Frame,
    app: &mut App,
    palette: &Palette,
    lines: Vec<Line<'static>>,
    block: Block<'static>,
    area: Rect,
) {
    let viewport = area.height.saturating_sub(2) as usize;
    app.scroll.update(lines.len(), viewport);

    let content = Paragraph::new(lines)
        .block(block)
        .style(Style::default().fg(palette.text()))
        .scroll((app.scroll.offset.min(u16::MAX as usize) as u16, 0));
    f.render_widget(content, area);

    if app.scroll.max > 0 {
        let (start, end) = palette.accent_gradient();
        let position = app.scroll.offset as f32 / app.scroll.max as f32;
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("▲"))
            .end_symbol(Some("▼"))
            .track_symbol(Some("░"))
            .thumb_symbol("█")
            .style(Style::default().fg(gradient_color(start, end, position)));

        f.render_stateful_widget(
            scrollbar,
            area.inner(&Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut app.scroll.scrollbar,
        );
    }
}

fn render_footer(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let hints = match app.section {
        Section::Pitch => "Enter submit · Ctrl+X cancel · Esc dismiss · Tab next · Ctrl+T theme · Ctrl+C quit",
        Section::Projects => "←/→ select · o open link · Tab next · t theme · q quit",
        _ => "Tab/1-6 sections · ↑/↓ scroll · c contact · t theme · q quit",
    };

    let mut spans = vec![Span::styled(hints, Style::default().fg(palette.muted()))];
    if let Some(notice) = &app.notice {
        spans.push(Span::styled("  │  ", Style::default().fg(palette.muted())));
        spans.push(Span::styled(
            notice.clone(),
            Style::default().fg(palette.heading()),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
