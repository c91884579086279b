//! Tests for placement legality and rejection behavior.

use blokus_core::{
    AnyGame, Board, Cell, LegalPlacement, Occupant, Outcome, PlacementError, PlayerColor,
    PlayerRegistry, RulesConfig, Shape, validate,
};

fn seated(color: PlayerColor) -> PlayerRegistry {
    let mut registry = PlayerRegistry::new(3);
    registry
        .register_player(format!("{}-client", color), color)
        .expect("Seat is free");
    registry
}

fn opened(color: PlayerColor) -> PlayerRegistry {
    let mut registry = seated(color);
    registry.record_placement(color, 1).expect("Seated");
    registry
}

fn two_player_game() -> AnyGame {
    let mut game = AnyGame::new(RulesConfig {
        required_players: 2,
        ..RulesConfig::default()
    });
    game.join("red".to_string(), None).expect("Join red");
    game.join("green".to_string(), None).expect("Join green");
    game
}

#[test]
fn test_first_move_requires_own_corner() {
    let board = Board::new();
    let corners: Vec<Cell> = PlayerColor::TURN_ORDER
        .iter()
        .map(|c| c.starting_corner())
        .collect();

    for color in PlayerColor::TURN_ORDER {
        let registry = seated(color);
        for corner in &corners {
            let legal = validate(&[*corner], color, &board, &registry);
            assert_eq!(legal, *corner == color.starting_corner(), "{color} at {corner}");
        }
    }
}

#[test]
fn test_first_move_ignores_adjacency() {
    // Even a piece touching nothing is legal if it covers the corner.
    let registry = seated(PlayerColor::Yellow);
    let cells = [Cell::new(19, 19), Cell::new(18, 19), Cell::new(17, 19)];
    assert!(validate(&cells, PlayerColor::Yellow, &Board::new(), &registry));
}

#[test]
fn test_side_contact_beats_corner_contact() {
    let registry = opened(PlayerColor::Red);
    let mut board = Board::new();
    board.mark_occupied(&[Cell::new(19, 0), Cell::new(18, 0)], PlayerColor::Red);

    // (17, 1) touches (18, 0) at a corner, (19, 1) shares an edge with (19, 0).
    let cells = [Cell::new(17, 1), Cell::new(18, 1), Cell::new(19, 1)];
    assert!(matches!(
        LegalPlacement::check(&cells, PlayerColor::Red, &board, &registry),
        Err(PlacementError::SideContact(_))
    ));
}

#[test]
fn test_corner_contact_is_enough() {
    let registry = opened(PlayerColor::Red);
    let mut board = Board::new();
    board.mark_occupied(&[Cell::new(19, 0)], PlayerColor::Red);

    assert!(validate(
        &[Cell::new(18, 1), Cell::new(17, 1)],
        PlayerColor::Red,
        &board,
        &registry
    ));
    assert!(!validate(
        &[Cell::new(16, 1), Cell::new(15, 1)],
        PlayerColor::Red,
        &board,
        &registry
    ));
}

#[test]
fn test_bounds_rejection_is_unconditional() {
    let first = seated(PlayerColor::Red);
    let later = opened(PlayerColor::Red);
    let mut board = Board::new();
    board.mark_occupied(&[Cell::new(19, 4)], PlayerColor::Red);

    for registry in [&first, &later] {
        let cells = [Cell::new(19, 0), Cell::new(20, 5)];
        assert_eq!(
            LegalPlacement::check(&cells, PlayerColor::Red, &board, registry),
            Err(PlacementError::OutOfBounds(Cell::new(20, 5)))
        );
    }
    assert!(!validate(&[Cell::new(-1, 0)], PlayerColor::Green, &Board::new(), &seated(PlayerColor::Green)));
}

#[test]
fn test_footprint_near_coordinate_limits() {
    let domino = Shape::from_pairs(&[(0, 0), (1, 0)]);
    assert_eq!(domino.footprint(Cell::new(i32::MAX, 7)), None);
    assert_eq!(domino.flipped().footprint(Cell::new(i32::MIN, 7)), None);
    assert_eq!(
        domino.footprint(Cell::new(-5, -5)),
        Some(vec![Cell::new(-5, -5), Cell::new(-4, -5)])
    );
}

#[test]
fn test_extreme_anchors_are_rejected_and_play_continues() {
    let mut game = two_player_game();
    let grid_before = game.board().codes();
    let domino = Shape::from_pairs(&[(0, 0), (1, 0)]);
    let cases = [
        (1, domino.clone(), Cell::new(i32::MAX, 0)),
        (1, domino.flipped(), Cell::new(i32::MIN, 0)),
        (1, domino.rotated(), Cell::new(19, i32::MAX)),
        (1, domino.rotated().rotated().rotated(), Cell::new(19, i32::MIN)),
        (1, domino.clone(), Cell::new(-3, -3)),
        (0, Shape::from_pairs(&[(0, 0)]), Cell::new(i32::MIN, i32::MIN)),
        (0, Shape::from_pairs(&[(0, 0)]), Cell::new(i32::MAX, i32::MAX)),
    ];

    for (piece_id, shape, anchor) in cases {
        let dispatch = game.submit_placement("red", piece_id, shape, anchor);
        assert_eq!(
            dispatch.outcome,
            Outcome::Rejected {
                reason: PlacementError::OutOfBounds(anchor)
            },
            "anchor {anchor}"
        );
    }
    assert_eq!(game.board().codes(), grid_before);
    assert_eq!(game.acting_color(), Some(PlayerColor::Red));

    let dispatch = game.submit_placement("red", 1, domino.rotated(), Cell::new(19, 0));
    assert!(dispatch.outcome.is_accepted());
    assert_eq!(game.acting_color(), Some(PlayerColor::Green));
}

#[test]
fn test_rejection_is_idempotent() {
    let mut game = two_player_game();
    let shape = Shape::from_pairs(&[(0, 0)]);
    let grid_before = game.board().codes();

    let first = game.submit_placement("red", 0, shape.clone(), Cell::new(5, 5));
    let grid_between = game.board().codes();
    let second = game.submit_placement("red", 0, shape, Cell::new(5, 5));

    let expected = Outcome::Rejected {
        reason: PlacementError::MissingStartingCorner(Cell::new(19, 0)),
    };
    assert_eq!(first.outcome, expected);
    assert_eq!(second.outcome, expected);
    assert_eq!(grid_before, grid_between);
    assert_eq!(grid_between, game.board().codes());
    assert_eq!(game.acting_color(), Some(PlayerColor::Red));
}

#[test]
fn test_turn_checked_at_commit() {
    let mut game = two_player_game();
    let dispatch = game.submit_placement("green", 0, Shape::from_pairs(&[(0, 0)]), Cell::new(0, 0));
    assert_eq!(
        dispatch.outcome,
        Outcome::Rejected {
            reason: PlacementError::NotYourTurn {
                expected: Some(PlayerColor::Red),
                actual: PlayerColor::Green,
            }
        }
    );
    assert_eq!(game.occupant_at(Cell::new(0, 0)), Ok(Occupant::Empty));
}

#[test]
fn test_occupancy_is_monotonic() {
    let mut game = two_player_game();
    let mut covered: Vec<(Cell, Occupant)> = Vec::new();

    let attempts = [
        ("red", 1, vec![(0, 0), (-1, 0)], Cell::new(19, 0)),
        ("green", 1, vec![(0, 0), (0, 1)], Cell::new(0, 0)),
        // Green is done acting; this must bounce.
        ("green", 0, vec![(0, 0)], Cell::new(1, 2)),
        ("red", 0, vec![(0, 0)], Cell::new(17, 1)),
        // Overlaps red.
        ("green", 0, vec![(0, 0)], Cell::new(19, 0)),
        ("green", 0, vec![(0, 0)], Cell::new(1, 2)),
    ];

    for (client, piece, pairs, anchor) in attempts {
        game.submit_placement(client, piece, Shape::from_pairs(&pairs), anchor);

        for (cell, occupant) in &covered {
            assert_eq!(game.occupant_at(*cell), Ok(*occupant), "cell {cell} changed");
        }
        covered = blokus_core::all_cells()
            .filter_map(|cell| {
                let occupant = game.occupant_at(cell).ok()?;
                (!occupant.is_empty()).then_some((cell, occupant))
            })
            .collect();
    }

    assert_eq!(covered.len(), 6);
    assert_eq!(game.history().len(), 4);
}
