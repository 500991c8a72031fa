//! # MessageList Component
//!
//! Scrollable view of the active thread.
//!
//! ## Responsibilities
//!
//! - Display the thread's messages and the generation placeholder
//! - Keyboard selection of a message for edit/delete
//! - Scrolling, with auto-scroll pinned to the newest message
//! - Layout caching of message heights
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the `Thread` (props).
//! Heights are cached per message and keyed by a fingerprint of everything
//! that affects layout, so edits, reconciliation and deletions only remeasure
//! what changed.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::thread::{Thread, ThreadMessage};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::Message;
use crate::tui::event::TuiEvent;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
/// Height of the "generating" placeholder block, borders included.
const PLACEHOLDER_HEIGHT: u16 = 3;

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Selected message index, only meaningful while the thread has focus
    pub selected_index: Option<usize>,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    /// Message count at last render, used to clamp selection
    message_count: usize,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true,
            selected_index: None,
            viewport_height: 0,
            message_count: 0,
        }
    }

    /// Forget selection and scroll position, e.g. when switching sessions.
    pub fn reset(&mut self) {
        self.scroll_state = ScrollViewState::default();
        self.stick_to_bottom = true;
        self.selected_index = None;
    }

    /// Select the newest message, if there is one.
    pub fn select_last(&mut self, count: usize) {
        self.message_count = count;
        self.selected_index = count.checked_sub(1);
    }

    pub fn selected<'m>(&self, messages: &'m [ThreadMessage]) -> Option<&'m ThreadMessage> {
        self.selected_index.and_then(|i| messages.get(i))
    }

    fn content_height(&self) -> u16 {
        self.layout.total_height()
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.content_height().saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Scroll the viewport so the selected message is fully visible.
    /// If the message is taller than the viewport, align its top edge.
    pub fn scroll_to_selected(&mut self) {
        let Some((top, bottom)) = self.selected_index.and_then(|i| self.layout.span(i)) else {
            return;
        };
        let offset_y = self.scroll_state.offset().y;

        if top < offset_y {
            self.scroll_state.set_offset(Position { x: 0, y: top });
            self.stick_to_bottom = false;
        } else if bottom > offset_y + self.viewport_height {
            let new_y = if bottom - top > self.viewport_height {
                top
            } else {
                bottom.saturating_sub(self.viewport_height)
            };
            self.scroll_state.set_offset(Position { x: 0, y: new_y });
            let max_y = self.content_height().saturating_sub(self.viewport_height);
            self.stick_to_bottom = new_y >= max_y;
        }
    }

    /// Re-engage auto-scroll once the user has scrolled back to the end.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.content_height().saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }
}

/// Requests on the selected message, resolved against the thread by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageListEvent {
    Edit,
    Delete,
}

/// Implemented on the state rather than the transient wrapper: selection
/// and scroll position must survive across frames.
impl EventHandler for MessageListState {
    type Event = MessageListEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<MessageListEvent> {
        match event {
            TuiEvent::CursorUp => {
                self.selected_index = match self.selected_index {
                    Some(i) => Some(i.saturating_sub(1)),
                    None => self.message_count.checked_sub(1),
                };
                self.scroll_to_selected();
                None
            }
            TuiEvent::CursorDown => {
                if let Some(i) = self.selected_index {
                    self.selected_index = Some((i + 1).min(self.message_count.saturating_sub(1)));
                    self.scroll_to_selected();
                }
                None
            }
            TuiEvent::CursorHome => {
                if self.message_count > 0 {
                    self.selected_index = Some(0);
                    self.scroll_to_selected();
                }
                None
            }
            TuiEvent::CursorEnd => {
                self.selected_index = self.message_count.checked_sub(1);
                self.stick_to_bottom = true;
                None
            }
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
                None
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
                None
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
                None
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
                None
            }
            TuiEvent::InputChar('e') => self.selected_index.map(|_| MessageListEvent::Edit),
            TuiEvent::InputChar('d') | TuiEvent::Delete => {
                self.selected_index.map(|_| MessageListEvent::Delete)
            }
            _ => None,
        }
    }
}

/// Scrollable thread view.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub thread: &'a Thread,
    /// Highlight the selected message (thread has focus)
    pub focused: bool,
    pub spinner_frame: usize,
}

impl Component for MessageList<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // scrollbar column
        let messages = self.thread.messages();

        // 1. Update layout cache
        self.state.layout.measure(messages, content_width);
        self.state.message_count = messages.len();
        if let Some(i) = self.state.selected_index
            && i >= messages.len()
        {
            self.state.selected_index = messages.len().checked_sub(1);
        }

        let content_height = self.state.layout.total_height();
        let placeholder = if self.thread.is_loading() {
            PLACEHOLDER_HEIGHT
        } else {
            0
        };
        let canvas_height = content_height.saturating_add(placeholder);

        // 2. Clamp scroll offset
        self.state.viewport_height = area.height;
        if !self.state.stick_to_bottom {
            self.state.clamp_scroll();
        }

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible = self.state.layout.visible_range(scroll_offset, area.height);

        // 3. Render visible messages into the scroll canvas
        let mut scroll_view = ScrollView::new(Size::new(content_width, canvas_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        for i in visible {
            let Some((top, bottom)) = self.state.layout.span(i) else {
                continue;
            };
            let is_selected = self.focused && self.state.selected_index == Some(i);
            let rect = Rect::new(0, top, content_width, bottom - top);
            scroll_view.render_widget(Message::new(&messages[i], is_selected), rect);
        }

        if placeholder > 0 {
            let rect = Rect::new(0, content_height, content_width, placeholder);
            scroll_view.render_widget(generating(self.spinner_frame), rect);
        }

        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

fn generating(spinner_frame: usize) -> Paragraph<'static> {
    let spinner = SPINNER[spinner_frame % SPINNER.len()];
    let style = Style::default().fg(Color::Yellow);
    Paragraph::new(Line::from(vec![
        Span::styled(format!("{spinner} "), style),
        Span::styled(
            "Generating your post…",
            style.add_modifier(Modifier::ITALIC),
        ),
        Span::styled("  esc to cancel", Style::default().fg(Color::DarkGray)),
    ]))
    .block(
        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" blogforge "),
    )
}

/// Cached layout measurements, one entry per message.
#[derive(Default)]
pub struct LayoutCache {
    fingerprints: Vec<u64>,
    heights: Vec<u16>,
    prefix_heights: Vec<u16>,
    content_width: u16,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash of everything that changes a message's rendered height.
    fn fingerprint(message: &ThreadMessage) -> u64 {
        let mut hasher = DefaultHasher::new();
        message.key.hash(&mut hasher);
        message.is_persisted().hash(&mut hasher);
        message.content.hash(&mut hasher);
        message.image_url.hash(&mut hasher);
        hasher.finish()
    }

    /// Number of leading entries still valid for `messages` at `content_width`.
    pub fn reusable_count(&self, messages: &[ThreadMessage], content_width: u16) -> usize {
        if self.content_width != content_width {
            return 0;
        }
        self.fingerprints
            .iter()
            .zip(messages)
            .take_while(|(cached, message)| **cached == Self::fingerprint(message))
            .count()
    }

    /// Remeasures every message after the first stale entry.
    pub fn measure(&mut self, messages: &[ThreadMessage], content_width: u16) {
        let reusable = self.reusable_count(messages, content_width);
        self.fingerprints.truncate(reusable);
        self.heights.truncate(reusable);

        for message in &messages[reusable..] {
            self.fingerprints.push(Self::fingerprint(message));
            self.heights
                .push(Message::calculate_height(message, content_width));
        }
        self.content_width = content_width;
        self.rebuild_prefix_heights();
    }

    fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    /// Top and bottom canvas rows of message `index`.
    pub fn span(&self, index: usize) -> Option<(u16, u16)> {
        let bottom = *self.prefix_heights.get(index)?;
        let top = index
            .checked_sub(1)
            .map_or(0, |prev| self.prefix_heights[prev]);
        Some((top, bottom))
    }

    /// Messages intersecting the viewport plus half a screen either side.
    pub fn visible_range(&self, scroll_offset: u16, viewport_height: u16) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end
    }
}
