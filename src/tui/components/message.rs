use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::api::Role;
use crate::core::thread::ThreadMessage;
use crate::tui::markdown;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Borders (1 left + 1 right) plus padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Top + bottom borders.
const VERTICAL_OVERHEAD: u16 = 2;

const USER_FG: Color = Color::Green;
const ASSISTANT_FG: Color = Color::Blue;
const ERROR_FG: Color = Color::Red;

/// How a thread message is drawn, derived from its role and persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    User { saved: bool },
    Assistant,
    /// Synthetic assistant message reporting a failed generation.
    Failure,
}

impl Kind {
    fn of(message: &ThreadMessage) -> Self {
        match (message.role, message.is_persisted()) {
            (Role::User, saved) => Kind::User { saved },
            (Role::Assistant, true) => Kind::Assistant,
            (Role::Assistant, false) => Kind::Failure,
        }
    }

    fn color(self) -> Color {
        match self {
            Kind::User { .. } => USER_FG,
            Kind::Assistant => ASSISTANT_FG,
            Kind::Failure => ERROR_FG,
        }
    }

    fn title(self) -> &'static str {
        match self {
            Kind::User { saved: true } => " you ",
            Kind::User { saved: false } => " you (unsaved) ",
            Kind::Assistant => " blogforge ",
            Kind::Failure => " error ",
        }
    }
}

/// A single thread message: bordered block, markdown body, and an image
/// link line when the post came with a generated image.
///
/// Created fresh each frame by `MessageList`, which passes the selection.
pub struct Message<'a> {
    pub message: &'a ThreadMessage,
    pub is_selected: bool,
}

impl<'a> Message<'a> {
    pub fn new(message: &'a ThreadMessage, is_selected: bool) -> Self {
        Self {
            message,
            is_selected,
        }
    }

    fn body(message: &ThreadMessage) -> Text<'static> {
        let kind = Kind::of(message);
        let mut text = match kind {
            // User topics are shown verbatim
            Kind::User { .. } => Text::styled(
                message.content.trim().to_string(),
                Style::default().fg(kind.color()),
            ),
            _ => markdown::render(message.content.trim(), kind.color()),
        };
        if let Some(url) = message.image_url.as_deref() {
            text.lines.push(Line::default());
            text.lines.push(Line::from(vec![
                Span::styled("image ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    url.to_string(),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::UNDERLINED),
                ),
            ]));
        }
        text
    }

    fn paragraph(message: &ThreadMessage) -> Paragraph<'static> {
        Paragraph::new(Self::body(message)).wrap(Wrap { trim: false })
    }

    /// Rendered height at `width`, borders included.
    pub fn calculate_height(message: &ThreadMessage, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            return 1;
        }
        let lines = Self::paragraph(message).line_count(content_width);
        u16::try_from(lines.max(1))
            .unwrap_or(u16::MAX)
            .saturating_add(VERTICAL_OVERHEAD)
    }
}

impl Widget for Message<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let kind = Kind::of(self.message);
        let base = Style::default().fg(kind.color());
        let border_style = if self.is_selected {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            base.add_modifier(Modifier::DIM)
        };

        let mut block = Block::bordered()
            .title(kind.title())
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));
        if self.is_selected {
            let hint = match kind {
                Kind::User { .. } => " e edit  d delete ",
                _ => " d delete ",
            };
            block = block.title_bottom(Line::from(hint).right_aligned());
        }

        let inner = block.inner(area);
        block.render(area, buf);
        Self::paragraph(self.message).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixed_time;

    fn make(role: Role, id: Option<i64>, content: &str) -> ThreadMessage {
        ThreadMessage {
            key: 1,
            id,
            role,
            content: content.to_string(),
            image_url: None,
            created_at: fixed_time(),
        }
    }

    #[test]
    fn test_kind_from_role_and_id() {
        assert_eq!(
            Kind::of(&make(Role::User, None, "x")),
            Kind::User { saved: false }
        );
        assert_eq!(Kind::of(&make(Role::Assistant, Some(2), "x")), Kind::Assistant);
        assert_eq!(Kind::of(&make(Role::Assistant, None, "x")), Kind::Failure);
    }

    #[test]
    fn test_failure_is_red() {
        assert_eq!(Kind::Failure.color(), Color::Red);
        assert_eq!(Kind::Failure.title(), " error ");
    }

    #[test]
    fn test_height_single_line() {
        let msg = make(Role::User, Some(1), "Hello");
        assert_eq!(Message::calculate_height(&msg, 80), 1 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn test_height_wraps() {
        let msg = make(Role::User, Some(1), "Hello world");
        // width 9 leaves 5 content columns: "Hello" | "world"
        assert_eq!(Message::calculate_height(&msg, 9), 2 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn test_height_degenerate_width() {
        let msg = make(Role::User, Some(1), "Hello");
        assert_eq!(Message::calculate_height(&msg, HORIZONTAL_OVERHEAD), 1);
    }

    #[test]
    fn test_image_adds_link_lines() {
        let mut msg = make(Role::Assistant, Some(2), "Post body");
        let without = Message::calculate_height(&msg, 80);
        msg.image_url = Some("http://img/cover.png".into());
        assert_eq!(Message::calculate_height(&msg, 80), without + 2);
    }

    #[test]
    fn test_assistant_content_rendered_as_markdown() {
        let msg = make(Role::Assistant, Some(2), "# Title\n\nBody");
        let body = Message::body(&msg);
        let first: String = body.lines[0].spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(first, "Title");
    }
}
