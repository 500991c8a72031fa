use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, BorderType};

use crate::core::state::App;
use crate::tui::component::Component;
use crate::tui::components::{
    ConfirmDialog, LandingPage, MessageList, Sidebar, TitleBar,
};
use crate::tui::{Focus, TuiState};

/// Sidebar width, shrunk on narrow terminals.
const SIDEBAR_WIDTH: u16 = 30;

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, base_url: &str) {
    use Constraint::{Length, Min};

    // Sync InputBox props with App state
    tui.input_box.summary = app.settings.summary();
    tui.input_box.disabled = app.is_busy();

    let area = frame.area();
    let input_height = tui.input_box.calculate_height(area.width);
    let [title_area, body_area, input_area] =
        Layout::vertical([Length(1), Min(0), Length(input_height)]).areas(area);

    let sidebar_width = SIDEBAR_WIDTH.min(body_area.width / 3);
    let [sidebar_area, thread_area] =
        Layout::horizontal([Length(sidebar_width), Min(0)]).areas(body_area);

    TitleBar {
        status_message: &app.status_message,
        error: app.error.as_deref(),
        busy: app.is_busy() || app.loading_messages,
        spinner_frame: tui.spinner_frame,
        base_url,
    }
    .render(frame, title_area);

    Sidebar {
        state: &mut tui.sidebar,
        chats: app.chats.chats(),
        active: app.session,
        focused: tui.focus == Focus::Sidebar,
        loaded: app.chats.is_loaded(),
    }
    .render(frame, sidebar_area);

    draw_thread(frame, thread_area, app, tui);

    tui.input_box.render(frame, input_area);

    if let Some(pending) = &tui.confirm {
        ConfirmDialog { pending }.render(frame, area);
    }
}

fn draw_thread(frame: &mut Frame, area: Rect, app: &App, tui: &mut TuiState) {
    let focused = tui.focus == Focus::Thread;
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        });
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.thread.is_empty() && !app.loading_messages {
        LandingPage.render(frame, inner);
        return;
    }

    MessageList {
        state: &mut tui.message_list,
        thread: &app.thread,
        focused,
        spinner_frame: tui.spinner_frame,
    }
    .render(frame, inner);
}
