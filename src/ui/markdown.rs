//! Turn parsed pitch blocks into styled terminal lines.

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use crate::markdown::{Block, Inline};
use crate::theme::Palette;

use super::text::wrap_spans;

fn styled_runs(spans: &[Inline], base: Style, palette: &Palette) -> Vec<(String, Style)> {
    spans
        .iter()
        .map(|span| match span {
            Inline::Plain(text) => (text.clone(), base),
            Inline::Bold(text) => (
                text.clone(),
                base.fg(palette.emphasis()).add_modifier(Modifier::BOLD),
            ),
        })
        .collect()
}

/// Render blocks to lines wrapped at `width`, with a blank line between
/// blocks.
pub fn render_blocks(blocks: &[Block], palette: &Palette, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }

        match block {
            Block::Title(spans) => {
                let base = Style::default()
                    .fg(palette.heading())
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
                lines.extend(wrap_spans(&styled_runs(spans, base, palette), width, Vec::new(), 0));
            }
            Block::Section(spans) => {
                let base = Style::default().fg(palette.heading()).add_modifier(Modifier::BOLD);
                let prefix = vec![Span::styled("▍", base)];
                lines.extend(wrap_spans(&styled_runs(spans, base, palette), width, prefix, 1));
            }
            Block::Subsection(spans) => {
                let base = Style::default()
                    .fg(palette.subheading())
                    .add_modifier(Modifier::BOLD);
                lines.extend(wrap_spans(&styled_runs(spans, base, palette), width, Vec::new(), 0));
            }
            Block::Paragraph(spans) => {
                let base = Style::default().fg(palette.text());
                lines.extend(wrap_spans(&styled_runs(spans, base, palette), width, Vec::new(), 0));
            }
            Block::List(items) => {
                let base = Style::default().fg(palette.text());
                for item in items {
                    let bullet = vec![Span::styled("• ", Style::default().fg(palette.bullet()))];
                    lines.extend(wrap_spans(&styled_runs(item, base, palette), width, bullet, 2));
                }
            }
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::parse;

    fn texts(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_render_blocks_layout() {
        let blocks = parse("# Plan\n## Why\n- one\n- two\nDone **now**");
        let lines = render_blocks(&blocks, &Palette::dark(), 40);
        assert_eq!(
            texts(&lines),
            vec!["Plan", "", "▍Why", "", "• one", "• two", "", "Done now"]
        );
    }

    #[test]
    fn test_render_bold_uses_emphasis_color() {
        let palette = Palette::dark();
        let blocks = parse("**Key** point");
        let lines = render_blocks(&blocks, &palette, 40);
        let bold = &lines[0].spans[0];
        assert_eq!(bold.content.as_ref(), "Key");
        assert_eq!(bold.style.fg, Some(palette.emphasis()));
        assert!(bold.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_render_empty_document() {
        assert!(render_blocks(&[], &Palette::dark(), 40).is_empty());
    }
}
