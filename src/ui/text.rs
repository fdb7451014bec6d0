use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use super::gradient::gradient_color;

/// Wrap text to fit within a given width.
///
/// # Arguments
/// * `text` - The text to wrap
/// * `width` - Maximum width per line
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        let current_width = current_line.chars().count();
        if current_width + word.chars().count() + 1 > width && !current_line.is_empty() {
            lines.push(std::mem::take(&mut current_line));
        }

        if !current_line.is_empty() {
            current_line.push(' ');
        }
        current_line.push_str(word);
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

/// A word with its style and whether whitespace preceded it in the source.
struct Piece {
    text: String,
    style: Style,
    space_before: bool,
}

fn pieces(spans: &[(String, Style)]) -> Vec<Piece> {
    let mut out = Vec::new();
    let mut pending_space = false;

    for (text, style) in spans {
        if text.trim().is_empty() {
            if !text.is_empty() {
                pending_space = true;
            }
            continue;
        }

        let starts_with_space = text.starts_with(char::is_whitespace);
        for (i, word) in text.split_whitespace().enumerate() {
            out.push(Piece {
                text: word.to_string(),
                style: *style,
                space_before: if i == 0 {
                    pending_space || starts_with_space
                } else {
                    true
                },
            });
        }
        pending_space = text.ends_with(char::is_whitespace);
    }

    out
}

/// Word-wrap styled runs into lines of at most `width` columns.
///
/// `prefix` is drawn before the first line and `indent` spaces before each
/// continuation line. Runs that touch without whitespace stay glued, so
/// `**Fast**er` does not gain a space. A word wider than the line gets a line
/// of its own.
pub fn wrap_spans(
    spans: &[(String, Style)],
    width: usize,
    prefix: Vec<Span<'static>>,
    indent: usize,
) -> Vec<Line<'static>> {
    let available = width.saturating_sub(indent).max(1);
    let mut lines = Vec::new();
    let mut current: Vec<Span<'static>> = prefix;
    let mut current_width = 0usize;
    let mut line_empty = true;

    for piece in pieces(spans) {
        let piece_width = piece.text.chars().count();
        let gap = usize::from(!line_empty && piece.space_before);

        if !line_empty && current_width + gap + piece_width > available {
            lines.push(Line::from(std::mem::take(&mut current)));
            current.push(Span::raw(" ".repeat(indent)));
            current_width = 0;
            line_empty = true;
        }

        if !line_empty && piece.space_before {
            current.push(Span::styled(" ", piece.style));
            current_width += 1;
        }

        current_width += piece_width;
        current.push(Span::styled(piece.text, piece.style));
        line_empty = false;
    }

    if !line_empty {
        lines.push(Line::from(current));
    }

    lines
}

/// Color each character of a line along a two-stop gradient.
pub fn gradient_line(text: &str, start: (u8, u8, u8), end: (u8, u8, u8)) -> Line<'static> {
    let chars: Vec<char> = text.chars().collect();
    let total_chars = chars.len();

    if total_chars == 0 {
        return Line::from("");
    }

    let spans: Vec<Span<'static>> = chars
        .iter()
        .enumerate()
        .map(|(i, ch)| {
            let position = i as f32 / total_chars.max(2).saturating_sub(1) as f32;
            Span::styled(
                ch.to_string(),
                Style::default()
                    .fg(gradient_color(start, end, position.min(1.0)))
                    .add_modifier(Modifier::BOLD),
            )
        })
        .collect();

    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_wrap_spans_keeps_glued_runs() {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let spans = vec![
            ("Fast".to_string(), bold),
            ("er than ever".to_string(), Style::default()),
        ];
        let lines = wrap_spans(&spans, 80, Vec::new(), 0);
        assert_eq!(lines.len(), 1);
        assert_eq!(line_text(&lines[0]), "Faster than ever");
    }

    #[test]
    fn test_wrap_spans_prefix_and_indent() {
        let spans = vec![("one two three four".to_string(), Style::default())];
        let lines = wrap_spans(&spans, 11, vec![Span::raw("• ")], 2);
        let texts: Vec<String> = lines.iter().map(line_text).collect();
        assert_eq!(texts, vec!["• one two", "  three", "  four"]);
    }

    #[test]
    fn test_wrap_spans_empty_input() {
        assert!(wrap_spans(&[], 20, Vec::new(), 0).is_empty());
    }

    #[test]
    fn test_gradient_line_one_span_per_char() {
        let line = gradient_line("abc", (0, 0, 0), (255, 255, 255));
        assert_eq!(line.spans.len(), 3);
        assert_eq!(line_text(&line), "abc");
    }
}
