//! Blocking yes/no dialog shown before destructive operations.
//!
//! While a confirmation is pending every key goes to it; nothing else in
//! the console reacts until it is answered.

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Clear, Padding, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

const DIALOG_WIDTH: u16 = 48;

/// What happens if the user says yes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingConfirm {
    /// Delete a thread message (by key) and, for user messages, its reply.
    DeleteMessage { key: u64, cascades: bool },
    DeleteSession { chat_id: i64, title: String },
}

impl PendingConfirm {
    pub fn prompt(&self) -> String {
        match self {
            PendingConfirm::DeleteMessage { cascades: true, .. } => {
                "Delete this message and its generated reply?".to_string()
            }
            PendingConfirm::DeleteMessage { .. } => "Delete this message?".to_string(),
            PendingConfirm::DeleteSession { title, .. } => {
                format!("Delete the session \"{title}\" and all of its messages?")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmEvent {
    Accept,
    Reject,
}

impl EventHandler for PendingConfirm {
    type Event = ConfirmEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<ConfirmEvent> {
        match event {
            TuiEvent::Submit | TuiEvent::InputChar('y' | 'Y') => Some(ConfirmEvent::Accept),
            TuiEvent::Escape | TuiEvent::InputChar('n' | 'N') => Some(ConfirmEvent::Reject),
            _ => None,
        }
    }
}

/// Centered overlay rendering a [`PendingConfirm`].
pub struct ConfirmDialog<'a> {
    pub pending: &'a PendingConfirm,
}

impl Component for ConfirmDialog<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = DIALOG_WIDTH.min(area.width);
        // Borders and horizontal padding take 4 columns
        let text_width = width.saturating_sub(4).max(1) as usize;
        let mut lines: Vec<Line> = textwrap::wrap(&self.pending.prompt(), text_width)
            .into_iter()
            .map(|l| Line::from(l.into_owned()))
            .collect();
        lines.push(Line::default());
        lines.push(
            Line::styled(
                "[y] confirm   [n] cancel",
                Style::default().fg(Color::DarkGray),
            )
            .centered(),
        );

        let height = (lines.len() as u16 + 2).min(area.height);
        let [row] = Layout::vertical([Constraint::Length(height)])
            .flex(Flex::Center)
            .areas(area);
        let [dialog] = Layout::horizontal([Constraint::Length(width)])
            .flex(Flex::Center)
            .areas(row);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Red))
            .title(Line::styled(
                " Confirm ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ))
            .padding(Padding::horizontal(1));

        frame.render_widget(Clear, dialog);
        frame.render_widget(Paragraph::new(lines).block(block), dialog);
    }
}
