use ratatui::Frame;
use ratatui::layout::Rect;

use super::event::TuiEvent;

/// Something that draws itself into a region of the frame.
///
/// Components get their data as props (struct fields) and may borrow
/// persistent state mutably, so `render` takes `&mut self`: scroll offsets
/// and layout caches are updated during the render pass, the same way
/// ratatui's `StatefulWidget` works.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that reacts to terminal events.
pub trait EventHandler {
    /// The high-level event this component emits.
    type Event;

    /// Handle a low-level `TuiEvent`, optionally producing a high-level one.
    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event>;
}
