//! # InputBox Component
//!
//! Topic entry and message editing.
//!
//! ## Responsibilities
//!
//! - Capture text input (typing, paste, multi-line via Ctrl+J)
//! - Cursor movement across wrapped rows
//! - Submit a new topic, or save an edit of an existing user message
//! - Display the active generation settings in the title
//!
//! ## State Management
//!
//! The buffer, cursor and edit target are internal state. `summary` and
//! `disabled` are props refreshed from `App` every frame. While disabled
//! (a generation is in flight) every event is ignored.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Border (2) + padding (2) consumed horizontally.
const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders.
const VERTICAL_OVERHEAD: u16 = 2;
/// Maximum visible rows before the box scrolls internally.
const MAX_VISIBLE_LINES: u16 = 5;

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A new topic to generate from.
    Submit(String),
    /// Edited content for the thread message with this key.
    SaveEdit { key: u64, content: String },
}

/// One display row: a byte range of the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Row {
    start: usize,
    end: usize,
}

/// Splits `buffer` into display rows of at most `width` columns. Hard
/// newlines always start a row; long lines wrap at character boundaries.
fn layout_rows(buffer: &str, width: usize) -> Vec<Row> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut line_start = 0;
    for line in buffer.split('\n') {
        let mut start = line_start;
        let mut used = 0;
        for (i, ch) in line.char_indices() {
            let w = ch.width().unwrap_or(0);
            if used + w > width && used > 0 {
                rows.push(Row {
                    start,
                    end: line_start + i,
                });
                start = line_start + i;
                used = 0;
            }
            used += w;
        }
        rows.push(Row {
            start,
            end: line_start + line.len(),
        });
        line_start += line.len() + 1;
    }
    rows
}

/// Row containing byte offset `pos`. At a soft wrap the later row wins.
fn row_of(rows: &[Row], pos: usize) -> usize {
    rows.iter().rposition(|r| r.start <= pos).unwrap_or(0)
}

/// Byte offset within `row` closest to display column `col`.
fn offset_at_column(buffer: &str, row: Row, col: usize) -> usize {
    let mut used = 0;
    for (i, ch) in buffer[row.start..row.end].char_indices() {
        let w = ch.width().unwrap_or(0);
        if used + w > col {
            return row.start + i;
        }
        used += w;
    }
    row.end
}

fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map_or(0, |(i, _)| i)
}

fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map_or(text.len(), |c| pos + c.len_utf8())
}

pub struct InputBox {
    pub buffer: String,
    /// Cursor as byte offset into `buffer`.
    cursor: usize,
    /// First visible row when content exceeds the viewport.
    scroll_offset: u16,
    /// Inner width from the last render, used for vertical movement.
    last_width: u16,
    /// Key of the message being edited, if in edit mode.
    editing: Option<u64>,
    /// Settings summary shown in the title (prop).
    pub summary: String,
    /// Ignore all input (prop).
    pub disabled: bool,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
            scroll_offset: 0,
            last_width: 80,
            editing: None,
            summary: String::new(),
            disabled: false,
        }
    }

    pub fn editing(&self) -> Option<u64> {
        self.editing
    }

    /// Loads `content` for editing the message with `key`.
    pub fn begin_edit(&mut self, key: u64, content: &str) {
        self.editing = Some(key);
        self.buffer = content.to_string();
        self.cursor = self.buffer.len();
        self.scroll_offset = 0;
    }

    /// Leaves edit mode, discarding the edited text.
    pub fn cancel_edit(&mut self) {
        if self.editing.take().is_some() {
            self.clear();
        }
    }

    /// Replaces the buffer with a suggested topic.
    pub fn set_text(&mut self, text: &str) {
        self.editing = None;
        self.buffer = text.to_string();
        self.cursor = self.buffer.len();
    }

    fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
        self.scroll_offset = 0;
    }

    fn rows(&self, inner_width: u16) -> Vec<Row> {
        layout_rows(&self.buffer, inner_width as usize)
    }

    /// Height for the current content, clamped to the viewport limits.
    pub fn calculate_height(&self, width: u16) -> u16 {
        let inner = width.saturating_sub(HORIZONTAL_OVERHEAD);
        let rows = self.rows(inner).len() as u16;
        rows.clamp(1, MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
    }

    /// (row, column) of the cursor at `inner_width`.
    fn cursor_cell(&self, inner_width: u16) -> (usize, usize) {
        let rows = self.rows(inner_width);
        let row = row_of(&rows, self.cursor);
        let col = self.buffer[rows[row].start..self.cursor].width();
        (row, col)
    }

    fn move_vertically(&mut self, down: bool) -> bool {
        let rows = self.rows(self.last_width);
        let (row, col) = self.cursor_cell(self.last_width);
        let target = if down {
            row + 1
        } else {
            match row.checked_sub(1) {
                Some(r) => r,
                None => return false,
            }
        };
        match rows.get(target) {
            Some(&r) => {
                self.cursor = offset_at_column(&self.buffer, r, col);
                true
            }
            None => false,
        }
    }

    fn update_scroll(&mut self, inner_width: u16) {
        let (row, _) = self.cursor_cell(inner_width);
        let row = row as u16;
        if row < self.scroll_offset {
            self.scroll_offset = row;
        } else if row >= self.scroll_offset + MAX_VISIBLE_LINES {
            self.scroll_offset = row + 1 - MAX_VISIBLE_LINES;
        }
    }

    fn title(&self) -> Line<'static> {
        let label = if self.editing.is_some() {
            " Edit message (enter save, esc cancel) ".to_string()
        } else {
            format!(" Topic · {} ", self.summary)
        };
        Line::from(label)
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let inner_width = area.width.saturating_sub(HORIZONTAL_OVERHEAD);
        self.last_width = inner_width;
        self.update_scroll(inner_width);

        let border = match (self.disabled, self.editing.is_some()) {
            (true, _) => Style::default().fg(Color::DarkGray),
            (false, true) => Style::default().fg(Color::Yellow),
            (false, false) => Style::default().fg(Color::Green),
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border)
            .title(self.title())
            .padding(Padding::horizontal(1));

        let lines: Vec<Line> = if self.buffer.is_empty() {
            let hint = if self.disabled {
                "Generating… (esc to cancel)"
            } else {
                "Describe a blog topic. Enter to generate, Ctrl+J for a new line"
            };
            vec![Line::styled(
                hint,
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )]
        } else {
            self.rows(inner_width)
                .into_iter()
                .skip(self.scroll_offset as usize)
                .take(MAX_VISIBLE_LINES as usize)
                .map(|r| Line::from(self.buffer[r.start..r.end].to_string()))
                .collect()
        };
        let style = if self.disabled {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };
        frame.render_widget(Paragraph::new(lines).block(block).style(style), area);

        if !self.disabled {
            let (row, col) = self.cursor_cell(inner_width);
            let x = area.x + 2 + (col as u16).min(inner_width);
            let y = area.y + 1 + (row as u16).saturating_sub(self.scroll_offset);
            frame.set_cursor_position((x, y));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<InputEvent> {
        if self.disabled {
            return None;
        }
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
                None
            }
            TuiEvent::Paste(text) => {
                let text = text.replace('\r', "");
                self.buffer.insert_str(self.cursor, &text);
                self.cursor += text.len();
                None
            }
            TuiEvent::Backspace => {
                if self.cursor > 0 {
                    let prev = prev_char_boundary(&self.buffer, self.cursor);
                    self.buffer.drain(prev..self.cursor);
                    self.cursor = prev;
                }
                None
            }
            TuiEvent::Delete => {
                if self.cursor < self.buffer.len() {
                    let next = next_char_boundary(&self.buffer, self.cursor);
                    self.buffer.drain(self.cursor..next);
                }
                None
            }
            TuiEvent::CursorLeft => {
                self.cursor = prev_char_boundary(&self.buffer, self.cursor);
                None
            }
            TuiEvent::CursorRight => {
                if self.cursor < self.buffer.len() {
                    self.cursor = next_char_boundary(&self.buffer, self.cursor);
                }
                None
            }
            TuiEvent::CursorHome => {
                self.cursor = self.buffer[..self.cursor].rfind('\n').map_or(0, |i| i + 1);
                None
            }
            TuiEvent::CursorEnd => {
                self.cursor = self.buffer[self.cursor..]
                    .find('\n')
                    .map_or(self.buffer.len(), |i| self.cursor + i);
                None
            }
            TuiEvent::CursorUp => {
                self.move_vertically(false);
                None
            }
            TuiEvent::CursorDown => {
                self.move_vertically(true);
                None
            }
            TuiEvent::Submit => {
                if let Some(key) = self.editing.take() {
                    let content = std::mem::take(&mut self.buffer);
                    self.clear();
                    return Some(InputEvent::SaveEdit { key, content });
                }
                if self.buffer.trim().is_empty() {
                    return None;
                }
                let text = std::mem::take(&mut self.buffer);
                self.clear();
                Some(InputEvent::Submit(text))
            }
            _ => None,
        }
    }
}
