//! Line builders for the portfolio sections.

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use crate::profile::Profile;
use crate::theme::Palette;

use super::text::{gradient_line, wrap_spans};

fn heading(text: &str, palette: &Palette) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default()
            .fg(palette.heading())
            .add_modifier(Modifier::BOLD),
    ))
}

fn muted(text: &str, palette: &Palette) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(palette.muted()),
    ))
}

fn paragraph(text: &str, palette: &Palette, width: usize) -> Vec<Line<'static>> {
    let runs = vec![(text.to_string(), Style::default().fg(palette.text()))];
    wrap_spans(&runs, width, Vec::new(), 0)
}

fn bullet(text: &str, palette: &Palette, width: usize) -> Vec<Line<'static>> {
    let runs = vec![(text.to_string(), Style::default().fg(palette.text()))];
    let prefix = vec![Span::styled("• ", Style::default().fg(palette.bullet()))];
    wrap_spans(&runs, width, prefix, 2)
}

pub fn about_lines(profile: &Profile, palette: &Palette, width: usize) -> Vec<Line<'static>> {
    let (start, end) = palette.accent_gradient();
    let mut lines = vec![gradient_line(&profile.name, start, end)];
    lines.extend(paragraph(&profile.headline, palette, width));

    let mut contact = Vec::new();
    if !profile.location.is_empty() {
        contact.push(profile.location.clone());
    }
    if !profile.email.is_empty() {
        contact.push(profile.email.clone());
    }
    if !contact.is_empty() {
        lines.push(muted(&contact.join("  ·  "), palette));
    }

    for para in &profile.bio {
        lines.push(Line::from(""));
        lines.extend(paragraph(para, palette, width));
    }

    lines.push(Line::from(""));
    lines.push(muted("Press c to get in touch.", palette));
    lines
}

pub fn skills_lines(profile: &Profile, palette: &Palette, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (i, group) in profile.skills.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }
        lines.push(heading(&group.category, palette));
        lines.extend(paragraph(&group.items.join(" · "), palette, width));
    }
    lines
}

pub fn experience_lines(profile: &Profile, palette: &Palette, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (i, job) in profile.experience.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }
        lines.push(heading(&format!("{} @ {}", job.role, job.company), palette));
        lines.push(muted(&job.period, palette));
        for highlight in &job.highlights {
            lines.extend(bullet(highlight, palette, width));
        }
    }
    lines
}

pub fn education_lines(profile: &Profile, palette: &Palette, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (i, entry) in profile.education.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }
        lines.push(heading(&entry.degree, palette));
        lines.push(muted(&format!("{}, {}", entry.institution, entry.period), palette));
        if let Some(notes) = &entry.notes {
            lines.extend(paragraph(notes, palette, width));
        }
    }
    lines
}

/// Projects, with the `selected` one highlighted.
pub fn projects_lines(
    profile: &Profile,
    selected: usize,
    palette: &Palette,
    width: usize,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (i, project) in profile.projects.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }

        let marker = if i == selected { "▶ " } else { "  " };
        let mut title_style = Style::default()
            .fg(palette.heading())
            .add_modifier(Modifier::BOLD);
        if i == selected {
            title_style = title_style.bg(palette.highlight_bg());
        }
        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(palette.bullet())),
            Span::styled(project.name.clone(), title_style),
        ]));

        lines.extend(paragraph(&project.summary, palette, width));
        if !project.tech.is_empty() {
            lines.push(muted(&project.tech.join(", "), palette));
        }
        if let Some(link) = &project.link {
            lines.push(Line::from(Span::styled(
                link.clone(),
                Style::default()
                    .fg(palette.bullet())
                    .add_modifier(Modifier::UNDERLINED),
            )));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_about_starts_with_name() {
        let profile = Profile::default();
        let lines = about_lines(&profile, &Palette::dark(), 60);
        assert_eq!(texts(&lines)[0], profile.name);
    }

    #[test]
    fn test_projects_marks_selection() {
        let profile = Profile::default();
        let lines = texts(&projects_lines(&profile, 1, &Palette::dark(), 60));
        assert!(lines.iter().any(|l| l == "▶ Pitchcraft"));
        assert!(lines.iter().any(|l| l == "  Ledgerline"));
    }

    #[test]
    fn test_skills_one_heading_per_group() {
        let profile = Profile::default();
        let lines = texts(&skills_lines(&profile, &Palette::dark(), 80));
        assert!(lines.contains(&"Languages".to_string()));
        assert!(lines.contains(&"Rust · TypeScript · Python · SQL".to_string()));
    }
}
