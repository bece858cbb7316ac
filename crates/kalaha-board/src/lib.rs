//! Board data model and per-player perspective mapping.
//!
//! The server serializes the board in one fixed absolute orientation: 14
//! pit counts, indices `0..=13`, laid out as 6 small pits + 1 store per
//! side. Each client renders "my pits on the bottom" regardless of which
//! side it was assigned, so the flat wire array must be rotated around the
//! player's starting index before it reaches the view.
//!
//! ```text
//! wire:      [ 0  1  2  3  4  5 | 6 ] [ 7  8  9 10 11 12 | 13 ]
//!              lower row        store   upper row         store
//! ```
//!
//! Which row is "mine" is decided once per match by the first turn
//! indicator the server sends ([`TurnAssignment::resolve`]); the rotation
//! itself ([`render`]) is a pure function and is recomputed on every
//! snapshot, never cached across assignments.

use serde::{Deserialize, Serialize};

/// Number of small (sowable) pits on each side of the board.
pub const PITS_PER_SIDE: usize = 6;

/// Pits per side including the store: the length of one player's row.
pub const SIDE_LEN: usize = PITS_PER_SIDE + 1;

/// Total number of wire slots: two rows of seven.
pub const PIT_COUNT: usize = 2 * SIDE_LEN;

/// Stones placed in each small pit at the start of a match.
pub const INITIAL_STONES: u32 = 6;

// ---------------------------------------------------------------------------
// BoardState
// ---------------------------------------------------------------------------

/// A full board snapshot in the server's absolute orientation.
///
/// Replaced wholesale on every state message; never partially mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardState(pub [u32; PIT_COUNT]);

impl BoardState {
    /// The opening position: every small pit holds [`INITIAL_STONES`],
    /// both stores are empty.
    pub fn initial() -> Self {
        let mut pits = [INITIAL_STONES; PIT_COUNT];
        pits[Side::Lower.store_index()] = 0;
        pits[Side::Upper.store_index()] = 0;
        Self(pits)
    }

    /// The raw wire-ordered counts.
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }
}

impl From<[u32; PIT_COUNT]> for BoardState {
    fn from(pits: [u32; PIT_COUNT]) -> Self {
        Self(pits)
    }
}

// ---------------------------------------------------------------------------
// Side and TurnAssignment
// ---------------------------------------------------------------------------

/// One of the two rows of the board, identified by its starting wire index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    /// Wire indices `0..=6`.
    Lower,
    /// Wire indices `7..=13`.
    Upper,
}

impl Side {
    /// Wire index of this side's first small pit (`0` or `7`).
    pub fn start_index(self) -> usize {
        match self {
            Side::Lower => 0,
            Side::Upper => SIDE_LEN,
        }
    }

    /// Wire index of this side's store.
    pub fn store_index(self) -> usize {
        self.start_index() + PITS_PER_SIDE
    }

    /// The other row.
    pub fn opposite(self) -> Side {
        match self {
            Side::Lower => Side::Upper,
            Side::Upper => Side::Lower,
        }
    }
}

/// Which side of the board the local player occupies.
///
/// Unassigned at the start of every match. Resolved exactly once, by the
/// *first* turn indicator the server sends: a grant seats the player on the
/// lower row (starting index 0), a denial on the upper row (starting
/// index 7). The two starting indices are always complementary because the
/// opponent's side is derived, never stored. Later turn indicators flip
/// whose turn it is but never re-seat anyone; re-seating requires an
/// explicit [`clear`](TurnAssignment::clear) when the match is torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TurnAssignment {
    side: Option<Side>,
}

impl TurnAssignment {
    /// A fresh, unresolved assignment.
    pub fn unassigned() -> Self {
        Self::default()
    }

    /// Resolves the assignment from a turn indicator, first-wins.
    ///
    /// `my_turn` is `true` for a turn grant, `false` for a denial. Returns
    /// the local player's side, whether it was just set or already was.
    pub fn resolve(&mut self, my_turn: bool) -> Side {
        *self.side.get_or_insert(if my_turn {
            Side::Lower
        } else {
            Side::Upper
        })
    }

    /// The local player's side, if the first turn indicator has arrived.
    pub fn user_side(&self) -> Option<Side> {
        self.side
    }

    /// `true` once [`resolve`](Self::resolve) has run.
    pub fn is_assigned(&self) -> bool {
        self.side.is_some()
    }

    /// Returns the assignment to the unresolved state (match teardown).
    pub fn clear(&mut self) {
        self.side = None;
    }
}

// ---------------------------------------------------------------------------
// RenderedBoard
// ---------------------------------------------------------------------------

/// A board snapshot rotated into the local player's perspective.
///
/// Both rows read left to right from the player's point of view and end
/// with the respective store. Derived data: recomputed from
/// ([`BoardState`], [`Side`]) on every update and never stored by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedBoard {
    /// The local player's small pits followed by their store.
    pub own: [u32; SIDE_LEN],
    /// The opponent's small pits followed by their store.
    pub opponent: [u32; SIDE_LEN],
}

impl RenderedBoard {
    /// Stones banked in the local player's store.
    pub fn own_store(&self) -> u32 {
        self.own[PITS_PER_SIDE]
    }

    /// Stones banked in the opponent's store.
    pub fn opponent_store(&self) -> u32 {
        self.opponent[PITS_PER_SIDE]
    }
}

/// Rotates a wire-ordered board into the perspective of the player seated
/// on `user_side`.
///
/// Wire index `user_start + i` maps to `own[i]`, and symmetrically for the
/// opponent row. Requiring a [`Side`] (rather than a possibly-unresolved
/// [`TurnAssignment`]) makes it impossible to render before the first turn
/// indicator has seated the player.
pub fn render(state: &BoardState, user_side: Side) -> RenderedBoard {
    let user_start = user_side.start_index();
    let opponent_start = user_side.opposite().start_index();

    let mut own = [0; SIDE_LEN];
    let mut opponent = [0; SIDE_LEN];
    for i in 0..SIDE_LEN {
        own[i] = state.0[user_start + i];
        opponent[i] = state.0[opponent_start + i];
    }

    RenderedBoard { own, opponent }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reassembles a wire-ordered board from a rendered one — the inverse
    /// of [`render`], used to check the rotation loses nothing.
    fn unrotate(rendered: &RenderedBoard, user_side: Side) -> BoardState {
        let mut pits = [0; PIT_COUNT];
        let user_start = user_side.start_index();
        let opponent_start = user_side.opposite().start_index();
        for i in 0..SIDE_LEN {
            pits[user_start + i] = rendered.own[i];
            pits[opponent_start + i] = rendered.opponent[i];
        }
        BoardState(pits)
    }

    fn sample_board() -> BoardState {
        BoardState([0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13])
    }

    #[test]
    fn test_initial_board_layout() {
        let board = BoardState::initial();
        assert_eq!(
            board.0,
            [6, 6, 6, 6, 6, 6, 0, 6, 6, 6, 6, 6, 6, 0]
        );
    }

    #[test]
    fn test_side_indices_are_complementary() {
        assert_eq!(Side::Lower.start_index(), 0);
        assert_eq!(Side::Upper.start_index(), 7);
        assert_eq!(Side::Lower.store_index(), 6);
        assert_eq!(Side::Upper.store_index(), 13);
        assert_eq!(Side::Lower.opposite(), Side::Upper);
        assert_eq!(Side::Upper.opposite(), Side::Lower);
    }

    #[test]
    fn test_render_lower_side_is_identity_split() {
        let rendered = render(&sample_board(), Side::Lower);
        assert_eq!(rendered.own, [0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(rendered.opponent, [7, 8, 9, 10, 11, 12, 13]);
    }

    #[test]
    fn test_render_upper_side_swaps_rows() {
        let rendered = render(&sample_board(), Side::Upper);
        assert_eq!(rendered.own, [7, 8, 9, 10, 11, 12, 13]);
        assert_eq!(rendered.opponent, [0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_store_accessors() {
        let rendered = render(&sample_board(), Side::Upper);
        assert_eq!(rendered.own_store(), 13);
        assert_eq!(rendered.opponent_store(), 6);
    }

    // Round-trip: render followed by unrotate reconstructs the wire board
    // exactly, for both possible seatings.
    #[test]
    fn test_render_round_trips_for_both_sides() {
        let boards = [
            BoardState::initial(),
            sample_board(),
            BoardState([0, 0, 0, 0, 0, 0, 10, 0, 0, 0, 0, 0, 0, 10]),
            BoardState([72, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
        ];
        for board in boards {
            for side in [Side::Lower, Side::Upper] {
                let rendered = render(&board, side);
                assert_eq!(unrotate(&rendered, side), board);
            }
        }
    }

    #[test]
    fn test_turn_assignment_grant_seats_lower() {
        let mut assignment = TurnAssignment::unassigned();
        assert!(!assignment.is_assigned());
        assert_eq!(assignment.resolve(true), Side::Lower);
        assert_eq!(assignment.user_side(), Some(Side::Lower));
    }

    #[test]
    fn test_turn_assignment_denial_seats_upper() {
        let mut assignment = TurnAssignment::unassigned();
        assert_eq!(assignment.resolve(false), Side::Upper);
        assert_eq!(assignment.user_side(), Some(Side::Upper));
    }

    // First indicator wins: later turn messages change whose turn it is,
    // not who sits where.
    #[test]
    fn test_turn_assignment_is_first_wins() {
        let mut assignment = TurnAssignment::unassigned();
        assignment.resolve(true);
        assert_eq!(assignment.resolve(false), Side::Lower);
        assert_eq!(assignment.user_side(), Some(Side::Lower));

        let mut assignment = TurnAssignment::unassigned();
        assignment.resolve(false);
        assert_eq!(assignment.resolve(true), Side::Upper);
        assert_eq!(assignment.user_side(), Some(Side::Upper));
    }

    #[test]
    fn test_turn_assignment_clear_allows_reseating() {
        let mut assignment = TurnAssignment::unassigned();
        assignment.resolve(false);
        assignment.clear();
        assert!(!assignment.is_assigned());
        assert_eq!(assignment.resolve(true), Side::Lower);
    }
}
