use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{block::Title, Block, Borders},
};

/// Create a gradient color between two RGB values.
///
/// # Arguments
/// * `start` - Starting RGB color
/// * `end` - Ending RGB color
/// * `position` - Position in gradient (0.0 to 1.0)
pub fn gradient_color(start: (u8, u8, u8), end: (u8, u8, u8), position: f32) -> Color {
    let position = position.clamp(0.0, 1.0);
    let r = (start.0 as f32 + (end.0 as f32 - start.0 as f32) * position) as u8;
    let g = (start.1 as f32 + (end.1 as f32 - start.1 as f32) * position) as u8;
    let b = (start.2 as f32 + (end.2 as f32 - start.2 as f32) * position) as u8;
    Color::Rgb(r, g, b)
}

/// Bordered block with a left title in the gradient start color and an
/// optional right-aligned status.
pub fn gradient_block(
    title: &str,
    status: Option<(String, Color)>,
    start: (u8, u8, u8),
    end: (u8, u8, u8),
) -> Block<'static> {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(gradient_color(start, end, 0.5)))
        .title(Title::from(Line::from(Span::styled(
            title.to_string(),
            Style::default()
                .fg(gradient_color(start, end, 0.0))
                .add_modifier(Modifier::BOLD),
        ))));

    if let Some((text, color)) = status {
        block = block.title(
            Title::from(Line::from(Span::styled(
                format!(" {} ", text),
                Style::default().fg(color),
            )))
            .alignment(Alignment::Right),
        );
    }

    block
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_color_endpoints() {
        assert_eq!(gradient_color((0, 0, 0), (200, 100, 50), 0.0), Color::Rgb(0, 0, 0));
        assert_eq!(
            gradient_color((0, 0, 0), (200, 100, 50), 1.0),
            Color::Rgb(200, 100, 50)
        );
    }

    #[test]
    fn test_gradient_color_clamps_position() {
        assert_eq!(
            gradient_color((10, 10, 10), (20, 20, 20), 2.0),
            Color::Rgb(20, 20, 20)
        );
    }
}
