//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Effects
//!
//! Every `Effect` returned by `update()` is performed on a tokio task via
//! `core::effects::perform`; the resulting `Action` comes back over an mpsc
//! channel and is drained once per loop iteration. The generation task's
//! abort handle is kept with its ticket and aborted as soon as the app no
//! longer waits on that ticket (cancel, session switch, delete, quit).
//!
//! ## Redraw Strategy
//!
//! - **Busy**: draws every ~80ms so the spinners animate.
//! - **Idle**: sleeps up to 500ms, only redraws on events, resize, or
//!   background results.

mod component;
mod components;
mod event;
pub mod markdown;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use tokio::task::AbortHandle;

use crate::api::{Backend, Role};
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::effects;
use crate::core::state::{App, SessionRef};
use crate::tui::component::EventHandler;
use crate::tui::components::landing;
use crate::tui::components::{
    ConfirmEvent, InputBox, InputEvent, MessageListEvent, MessageListState, PendingConfirm,
    SidebarAction, SidebarState,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Which pane receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Thread,
    Sidebar,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Input => Focus::Thread,
            Focus::Thread => Focus::Sidebar,
            Focus::Sidebar => Focus::Input,
        }
    }
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub focus: Focus,
    pub sidebar: SidebarState,
    pub message_list: MessageListState,
    pub input_box: InputBox,
    /// Destructive operation awaiting a yes/no answer
    pub confirm: Option<PendingConfirm>,
    pub spinner_frame: usize,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            focus: Focus::Input,
            sidebar: SidebarState::new(),
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
            confirm: None,
            spinner_frame: 0,
        }
    }

    fn focus_input(&mut self) {
        self.focus = Focus::Input;
        self.message_list.selected_index = None;
    }
}

/// Runs actions through `update()` and performs the resulting effects.
struct Dispatcher {
    backend: Arc<dyn Backend>,
    tx: mpsc::Sender<Action>,
    /// In-flight generation task and its ticket
    generation: Option<(u64, AbortHandle)>,
}

impl Dispatcher {
    fn new(backend: Arc<dyn Backend>, tx: mpsc::Sender<Action>) -> Self {
        Self {
            backend,
            tx,
            generation: None,
        }
    }

    /// Applies `action`; returns true when the app should quit.
    fn dispatch(&mut self, app: &mut App, action: Action) -> bool {
        let effect = update(app, action);
        self.abort_stale_generation(app);
        match effect {
            Effect::Quit => true,
            Effect::None => false,
            Effect::Generate { ticket, .. } => {
                let handle = self.spawn(effect);
                self.generation = Some((ticket, handle));
                false
            }
            other => {
                self.spawn(other);
                false
            }
        }
    }

    fn abort_stale_generation(&mut self, app: &App) {
        let stale = self
            .generation
            .as_ref()
            .is_some_and(|(ticket, _)| app.active_ticket() != Some(*ticket));
        if stale && let Some((ticket, handle)) = self.generation.take() {
            debug!("Aborting generation task for ticket {}", ticket);
            handle.abort();
        }
    }

    fn abort_all(&mut self) {
        if let Some((_, handle)) = self.generation.take() {
            handle.abort();
        }
    }

    fn spawn(&self, effect: Effect) -> AbortHandle {
        debug!("Performing {:?}", effect);
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            if let Some(action) = effects::perform(backend.as_ref(), effect).await
                && tx.send(action).is_err()
            {
                warn!("Dropping effect result: receiver gone");
            }
        })
        .abort_handle()
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Keyboard enhancement lets Ctrl+Enter/Shift+Enter be told apart from
        // Enter; terminals without it ignore the request
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Runs the console until the user quits. Must be called from within a
/// tokio runtime.
pub fn run(
    config: ResolvedConfig,
    backend: Arc<dyn Backend>,
    initial_chat: Option<i64>,
) -> std::io::Result<()> {
    let mut app = App::from_config(&config);
    let mut tui = TuiState::new();

    let (tx, rx) = mpsc::channel();
    let mut dispatcher = Dispatcher::new(backend, tx);

    dispatcher.dispatch(&mut app, Action::RefreshChats);
    if let Some(chat_id) = initial_chat {
        info!("Opening chat {} from the command line", chat_id);
        dispatcher.dispatch(&mut app, Action::SelectSession(SessionRef::Saved(chat_id)));
    }

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let start_time = Instant::now();
    let mut needs_redraw = true;

    'main: loop {
        let animating = app.is_busy() || app.loading_messages;
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            tui.spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, dispatcher.backend.base_url()))?;
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if handle_event(&mut app, &mut tui, &mut dispatcher, event) {
                break 'main;
            }
        }

        // Results from background tasks
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if dispatcher.dispatch(&mut app, action) {
                break 'main;
            }
        }
    }

    dispatcher.abort_all();
    ratatui::restore();
    info!("Blogforge shutting down");
    Ok(())
}

/// Routes one terminal event; returns true when the app should quit.
fn handle_event(
    app: &mut App,
    tui: &mut TuiState,
    dispatcher: &mut Dispatcher,
    event: TuiEvent,
) -> bool {
    if matches!(event, TuiEvent::Resize) {
        return false;
    }
    if matches!(event, TuiEvent::ForceQuit) {
        return dispatcher.dispatch(app, Action::Quit);
    }

    // A pending confirmation swallows every key until answered
    if let Some(pending) = tui.confirm.as_mut() {
        let Some(answer) = pending.handle_event(&event) else {
            return false;
        };
        let Some(pending) = tui.confirm.take() else {
            return false;
        };
        if answer == ConfirmEvent::Reject {
            return false;
        }
        let action = match pending {
            PendingConfirm::DeleteMessage { key, .. } => Action::DeleteMessage(key),
            PendingConfirm::DeleteSession { chat_id, .. } => Action::DeleteSession(chat_id),
        };
        return dispatcher.dispatch(app, action);
    }

    match event {
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown => {
            tui.message_list.handle_event(&event);
            false
        }
        TuiEvent::Escape => {
            if app.is_busy() {
                dispatcher.dispatch(app, Action::CancelGeneration)
            } else {
                tui.input_box.cancel_edit();
                tui.focus_input();
                false
            }
        }
        TuiEvent::FocusNext => {
            tui.focus = tui.focus.next();
            match tui.focus {
                Focus::Thread => tui.message_list.select_last(app.thread.len()),
                Focus::Sidebar => {
                    tui.message_list.selected_index = None;
                    tui.sidebar.highlight(app.session, app.chats.chats());
                }
                Focus::Input => {}
            }
            false
        }
        TuiEvent::NewSession => open_session(app, tui, dispatcher, SessionRef::Unsaved),
        TuiEvent::CycleTone => dispatcher.dispatch(app, Action::CycleTone),
        TuiEvent::CycleAudience => dispatcher.dispatch(app, Action::CycleAudience),
        TuiEvent::CycleLength => dispatcher.dispatch(app, Action::CycleLength),
        TuiEvent::Suggestion(index) => {
            if app.thread.is_empty()
                && !app.is_busy()
                && let Some(topic) = landing::suggestion(index)
            {
                tui.input_box.set_text(topic);
                tui.focus_input();
            }
            false
        }
        _ => match tui.focus {
            Focus::Input => handle_input(app, tui, dispatcher, &event),
            Focus::Thread => handle_thread(app, tui, &event),
            Focus::Sidebar => handle_sidebar(app, tui, dispatcher, &event),
        },
    }
}

fn handle_input(
    app: &mut App,
    tui: &mut TuiState,
    dispatcher: &mut Dispatcher,
    event: &TuiEvent,
) -> bool {
    tui.input_box.disabled = app.is_busy();
    match tui.input_box.handle_event(event) {
        Some(InputEvent::Submit(topic)) => {
            tui.message_list.stick_to_bottom = true;
            dispatcher.dispatch(app, Action::Submit(topic))
        }
        Some(InputEvent::SaveEdit { key, content }) => {
            dispatcher.dispatch(app, Action::EditMessage { key, content })
        }
        None => false,
    }
}

fn handle_thread(app: &mut App, tui: &mut TuiState, event: &TuiEvent) -> bool {
    let Some(request) = tui.message_list.handle_event(event) else {
        return false;
    };
    let Some(message) = tui.message_list.selected(app.thread.messages()) else {
        return false;
    };
    if app.is_busy() {
        app.status_message = String::from("Wait for the generation to finish");
        return false;
    }
    match request {
        MessageListEvent::Delete => {
            if let Some(plan) = app.thread.plan_delete(message.key) {
                tui.confirm = Some(PendingConfirm::DeleteMessage {
                    key: message.key,
                    cascades: plan.cascade.is_some(),
                });
            }
        }
        MessageListEvent::Edit => {
            if message.role == Role::User {
                let (key, content) = (message.key, message.content.clone());
                tui.input_box.begin_edit(key, &content);
                tui.focus = Focus::Input;
            } else {
                app.status_message = String::from("Only your own messages can be edited");
            }
        }
    }
    false
}

fn handle_sidebar(
    app: &mut App,
    tui: &mut TuiState,
    dispatcher: &mut Dispatcher,
    event: &TuiEvent,
) -> bool {
    let Some(request) = tui.sidebar.handle_event(event) else {
        return false;
    };
    match tui.sidebar.resolve(request, app.chats.chats()) {
        Some(SidebarAction::Open(session)) => open_session(app, tui, dispatcher, session),
        Some(SidebarAction::Delete(chat_id)) => {
            let title = app
                .chats
                .get(chat_id)
                .map_or_else(|| format!("chat {chat_id}"), |c| c.title.clone());
            tui.confirm = Some(PendingConfirm::DeleteSession { chat_id, title });
            false
        }
        None => false,
    }
}

fn open_session(
    app: &mut App,
    tui: &mut TuiState,
    dispatcher: &mut Dispatcher,
    session: SessionRef,
) -> bool {
    tui.message_list.reset();
    tui.input_box.cancel_edit();
    tui.focus_input();
    dispatcher.dispatch(app, Action::SelectSession(session))
}
