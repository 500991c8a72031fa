//! # TitleBar Component
//!
//! Top status bar: app name, the latest status or error, a spinner while
//! a generation is in flight, and the backend address on the right.
//!
//! Stateless. All fields are props taken from `App` each frame; an error
//! takes precedence over the status message and is drawn in red.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;

const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];

pub struct TitleBar<'a> {
    pub status_message: &'a str,
    pub error: Option<&'a str>,
    pub busy: bool,
    pub spinner_frame: usize,
    pub base_url: &'a str,
}

impl TitleBar<'_> {
    fn left(&self) -> Line<'static> {
        let mut spans = vec![Span::styled(
            "Blogforge",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )];
        if self.busy {
            spans.push(Span::styled(
                format!(" {}", SPINNER[self.spinner_frame % SPINNER.len()]),
                Style::default().fg(Color::Yellow),
            ));
        }
        match self.error {
            Some(error) => {
                spans.push(Span::raw(" | "));
                spans.push(Span::styled(
                    error.to_string(),
                    Style::default().fg(Color::Red),
                ));
            }
            None if !self.status_message.is_empty() => {
                spans.push(Span::raw(" | "));
                spans.push(Span::raw(self.status_message.to_string()));
            }
            None => {}
        }
        Line::from(spans)
    }
}

impl Component for TitleBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let url_width = (self.base_url.chars().count() as u16 + 1).min(area.width / 3);
        let [left, right] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(url_width)]).areas(area);

        frame.render_widget(Paragraph::new(self.left()), left);
        frame.render_widget(
            Paragraph::new(Line::styled(
                self.base_url.to_string(),
                Style::default().fg(Color::DarkGray),
            ))
            .right_aligned(),
            right,
        );
    }
}
