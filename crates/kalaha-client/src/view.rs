//! The view seam.
//!
//! The state machine never touches a screen directly: everything the user
//! sees goes through this trait. Implementations range from DOM bindings
//! to a plain terminal printer — the machine pushes snapshots and never
//! hands out mutable references to its own state.

use kalaha_board::RenderedBoard;
use kalaha_protocol::SearchHit;

use crate::MatchPhase;

/// Renders state-machine output.
///
/// All methods are notifications; none may fail or call back into the
/// state machine.
pub trait View: Send + 'static {
    /// Switches the visible screen to the one for `phase`
    /// (login / search / game panes in the reference UI).
    fn show_screen(&mut self, phase: MatchPhase);

    /// Displays a freshly rotated board snapshot.
    fn render_board(&mut self, board: &RenderedBoard);

    /// Replaces the opponent search result list. An empty slice clears it.
    fn render_search_results(&mut self, hits: &[SearchHit]);

    /// Sets the opponent name shown in the match header.
    fn set_opponent_label(&mut self, name: &str);

    /// Enables or disables the move input controls.
    fn set_move_enabled(&mut self, enabled: bool);
}
