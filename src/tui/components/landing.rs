//! # Landing Page Component
//!
//! Shown in place of the thread when a new session has no messages yet:
//! a short welcome and the F1-F4 topic suggestions.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;

/// Starter topics, selectable with F1..F4.
pub const SUGGESTIONS: [&str; 4] = [
    "Future of Neural Architectures",
    "Brutalist Design in SaaS",
    "The AI Search Era (GEO)",
    "Autonomous Agentic Ops",
];

pub fn suggestion(index: usize) -> Option<&'static str> {
    SUGGESTIONS.get(index).copied()
}

pub struct LandingPage;

impl LandingPage {
    fn lines() -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(Span::styled(
                "Blogforge",
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("v{}", env!("CARGO_PKG_VERSION")),
                Style::default().fg(Color::DarkGray),
            )),
            Line::default(),
            Line::from("Type a topic below and press Enter to generate a post."),
            Line::default(),
        ];
        for (i, topic) in SUGGESTIONS.iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(format!("F{} ", i + 1), Style::default().fg(Color::Yellow)),
                Span::styled(topic.to_string(), Style::default().fg(Color::Gray)),
            ]));
        }
        lines
    }
}

impl Component for LandingPage {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let lines = Self::lines();
        let [centered] = Layout::vertical([Constraint::Length(lines.len() as u16)])
            .flex(Flex::Center)
            .areas(area);
        frame.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center),
            centered,
        );
    }
}
