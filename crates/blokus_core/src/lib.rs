//! Blokus core - authoritative rules for four-player corner-contact
//! tile placement on a 20x20 grid.
//!
//! # Architecture
//!
//! - **Board**: dense occupancy grid; cells only ever go from empty to a color
//! - **Validator**: starting-corner and corner-only-contact rules as
//!   composable preconditions
//! - **Registry**: per-color player records and round-robin turn order
//! - **Typestate**: setup, in-progress, and finished phases as distinct types
//! - **Wrapper**: [`AnyGame`], the request handler that validates, commits,
//!   and reports [`GameEvent`]s
//! - **Codec**: compact wire form of the grid and of cell lists
//!
//! # Example
//!
//! ```
//! use blokus_core::{AnyGame, Cell, PlayerColor, RulesConfig, Shape};
//!
//! let mut game = AnyGame::new(RulesConfig {
//!     required_players: 1,
//!     ..RulesConfig::default()
//! });
//! let seat = game.join("alice".to_string(), None).unwrap();
//! assert_eq!(seat.color, PlayerColor::Red);
//!
//! let dispatch = game.submit_placement("alice", 0, Shape::from_pairs(&[(0, 0)]), Cell::new(19, 0));
//! assert!(dispatch.outcome.is_accepted());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod action;
mod board;
mod codec;
mod contracts;
mod events;
mod grid;
mod invariants;
mod phases;
mod piece;
mod registry;
mod rules;
mod snapshot;
mod types;
mod typestate;
mod validator;
mod wrapper;

// Crate-level exports - Geometry and board
pub use board::{Board, BoardError};
pub use grid::{
    BOARD_SIZE, CELL_COUNT, CORNER_OFFSETS, Cell, MAX_COORD, SIDE_OFFSETS, all_cells,
    corner_neighbors, is_on_board, side_neighbors,
};
pub use types::{Occupant, PlayerColor};

// Crate-level exports - Pieces
pub use piece::{Piece, PieceId, Shape, starting_inventory};

// Crate-level exports - Actions and validation
pub use action::{Placement, PlacementAttempt, PlacementError};
pub use contracts::{Contract, OrientationMatches, PieceAvailable, PlacementContract, PlayersTurn};
pub use validator::{
    CellsVacant, CornerContactOnly, CoversStartingCorner, LegalPlacement, NonEmptyFootprint,
    WithinBoard, validate,
};

// Crate-level exports - Invariants
pub use invariants::{
    BlokusInvariants, Invariant, InvariantSet, InvariantViolation, InventoryInvariant,
    MonotonicBoardInvariant, ScoreLedgerInvariant,
};

// Crate-level exports - Players and turns
pub use phases::{GameOverSummary, GamePhase, PlayerScore};
pub use registry::{ClientId, PlayerRecord, PlayerRegistry, RegistrationError, RegistryError};
pub use rules::{
    DEFAULT_FINISH_CONTROL_THRESHOLD, DEFAULT_PIECES_PER_PLAYER, MAX_PIECES_PER_PLAYER, RulesConfig,
    RulesError,
};

// Crate-level exports - Game phases and protocol
pub use events::{Dispatch, GameEvent, Outcome, Seated};
pub use snapshot::{GameSnapshot, PlayerView};
pub use typestate::{GameFinished, GameInProgress, GameResult, GameSetup, Inventories};
pub use wrapper::AnyGame;

// Crate-level exports - Wire codec
pub use codec::{CodecError, decode_cells, encode_cells};
