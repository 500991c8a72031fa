//! # Sidebar Component
//!
//! Left-hand list of chat sessions. Row 0 is always "+ New session"; the
//! remaining rows mirror `App::chats` in backend order.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `SidebarState` lives in `TuiState` and tracks the highlighted row
//! - `Sidebar` is created each frame with borrowed state and chat data

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, List, ListItem, ListState, Padding};
use unicode_width::UnicodeWidthStr;

use crate::api::Chat;
use crate::core::state::SessionRef;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Persistent state for the sidebar.
#[derive(Default)]
pub struct SidebarState {
    /// Highlighted row: 0 = new session, n = chats[n - 1].
    pub selected: usize,
    /// Number of chats at last render, used to clamp navigation.
    chat_count: usize,
    list_state: ListState,
}

impl SidebarState {
    pub fn new() -> Self {
        Self::default()
    }

    fn clamp(&mut self) {
        self.selected = self.selected.min(self.chat_count);
    }

    /// Moves the highlight onto `session`, if it is listed.
    pub fn highlight(&mut self, session: SessionRef, chats: &[Chat]) {
        self.chat_count = chats.len();
        self.selected = match session {
            SessionRef::Unsaved => 0,
            SessionRef::Saved(id) => chats
                .iter()
                .position(|c| c.id == id)
                .map_or(self.selected, |i| i + 1),
        };
        self.clamp();
    }

    /// The chat id under the highlight, if a chat row is highlighted.
    pub fn highlighted_chat(&self, chats: &[Chat]) -> Option<i64> {
        self.selected
            .checked_sub(1)
            .and_then(|i| chats.get(i))
            .map(|c| c.id)
    }

    /// Resolves a row event against the current chat list.
    pub fn resolve(&self, event: SidebarEvent, chats: &[Chat]) -> Option<SidebarAction> {
        match event {
            SidebarEvent::Open => Some(match self.highlighted_chat(chats) {
                Some(id) => SidebarAction::Open(SessionRef::Saved(id)),
                None => SidebarAction::Open(SessionRef::Unsaved),
            }),
            SidebarEvent::New => Some(SidebarAction::Open(SessionRef::Unsaved)),
            SidebarEvent::Delete => self.highlighted_chat(chats).map(SidebarAction::Delete),
        }
    }
}

/// Raw intents from key presses, resolved with [`SidebarState::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarEvent {
    Open,
    New,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarAction {
    Open(SessionRef),
    /// Ask for confirmation, then delete this chat.
    Delete(i64),
}

impl EventHandler for SidebarState {
    type Event = SidebarEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<SidebarEvent> {
        match event {
            TuiEvent::CursorUp => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            TuiEvent::CursorDown => {
                self.selected += 1;
                self.clamp();
                None
            }
            TuiEvent::CursorHome => {
                self.selected = 0;
                None
            }
            TuiEvent::CursorEnd => {
                self.selected = self.chat_count;
                None
            }
            TuiEvent::Submit => Some(SidebarEvent::Open),
            TuiEvent::InputChar('n') => Some(SidebarEvent::New),
            TuiEvent::InputChar('d') => Some(SidebarEvent::Delete),
            _ => None,
        }
    }
}

/// Transient render wrapper for the sidebar.
pub struct Sidebar<'a> {
    pub state: &'a mut SidebarState,
    pub chats: &'a [Chat],
    pub active: SessionRef,
    pub focused: bool,
    pub loaded: bool,
}

impl Component for Sidebar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.state.chat_count = self.chats.len();
        self.state.clamp();

        let border = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border)
            .title(" Sessions ")
            .title_bottom(Line::from(if self.focused { " n new  d delete " } else { "" }).centered())
            .padding(Padding::horizontal(1));

        let inner_width = block.inner(area).width as usize;

        let mut items = Vec::with_capacity(self.chats.len() + 1);
        items.push(self.row(
            "+ New session",
            None,
            self.active == SessionRef::Unsaved,
            0,
            inner_width,
        ));
        for (i, chat) in self.chats.iter().enumerate() {
            let date = chat.created_at.format("%b %d").to_string();
            items.push(self.row(
                &chat.title,
                Some(date),
                self.active == SessionRef::Saved(chat.id),
                i + 1,
                inner_width,
            ));
        }
        if !self.loaded {
            items.push(ListItem::new(Span::styled(
                "loading…",
                Style::default().fg(Color::DarkGray),
            )));
        }

        self.state.list_state.select(Some(self.state.selected));
        frame.render_stateful_widget(List::new(items).block(block), area, &mut self.state.list_state);
    }
}

impl Sidebar<'_> {
    fn row(
        &self,
        title: &str,
        date: Option<String>,
        active: bool,
        index: usize,
        width: usize,
    ) -> ListItem<'static> {
        let mut style = if active {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        if index == self.state.selected && self.focused {
            style = style.add_modifier(Modifier::REVERSED);
        }

        let date_width = date.as_ref().map_or(0, |d| d.width() + 1);
        let title = truncate(title, width.saturating_sub(date_width));
        let pad = width.saturating_sub(title.width() + date_width);

        let mut spans = vec![Span::styled(format!("{title}{}", " ".repeat(pad)), style)];
        if let Some(date) = date {
            spans.push(Span::styled(format!(" {date}"), style.fg(Color::DarkGray)));
        }
        ListItem::new(Line::from(spans))
    }
}

/// Truncates to `max` display columns, ending with "…" when cut.
fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}
