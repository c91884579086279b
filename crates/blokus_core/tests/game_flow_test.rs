//! Tests for turn sequencing, game over, and the wire forms of game state.

use blokus_core::{
    AnyGame, Board, Cell, GameEvent, GamePhase, PlayerColor, PlayerRegistry, RulesConfig, Shape,
    decode_cells, encode_cells,
};

fn four_player_game() -> AnyGame {
    let mut game = AnyGame::new(RulesConfig::default());
    for client in ["p-red", "p-green", "p-blue", "p-yellow"] {
        game.join(client.to_string(), None).expect("Seat available");
    }
    game
}

fn turn_changes(events: &[GameEvent]) -> Vec<PlayerColor> {
    events
        .iter()
        .filter_map(|event| match event {
            GameEvent::TurnChanged { color } => Some(*color),
            _ => None,
        })
        .collect()
}

#[test]
fn test_seats_follow_turn_order() {
    let game = four_player_game();
    let colors: Vec<_> = game.snapshot().players.iter().map(|p| p.color).collect();
    assert_eq!(colors, PlayerColor::TURN_ORDER.to_vec());
    assert_eq!(game.phase(), GamePhase::InProgress);
    assert_eq!(game.acting_color(), Some(PlayerColor::Red));
}

#[test]
fn test_round_robin_skips_finished_players() {
    let mut game = four_player_game();
    let mono = Shape::from_pairs(&[(0, 0)]);

    let dispatch = game.submit_placement("p-red", 0, mono.clone(), Cell::new(19, 0));
    assert_eq!(turn_changes(&dispatch.events), vec![PlayerColor::Green]);

    let events = game.request_finish("p-green").expect("Green is seated");
    assert_eq!(turn_changes(&events), vec![PlayerColor::Blue]);

    let dispatch = game.submit_placement("p-blue", 0, mono, Cell::new(0, 19));
    assert_eq!(turn_changes(&dispatch.events), vec![PlayerColor::Yellow]);

    let events = game.request_finish("p-yellow").expect("Yellow is seated");
    assert_eq!(turn_changes(&events), vec![PlayerColor::Red]);

    // Green is finished: Red hands straight to Blue.
    let dispatch = game.submit_placement(
        "p-red",
        1,
        Shape::from_pairs(&[(0, 0), (-1, 0)]),
        Cell::new(18, 1),
    );
    assert!(dispatch.outcome.is_accepted());
    assert_eq!(turn_changes(&dispatch.events), vec![PlayerColor::Blue]);

    // Yellow is finished: Blue hands straight back to Red.
    let dispatch = game.submit_placement(
        "p-blue",
        1,
        Shape::from_pairs(&[(0, 0), (1, 0)]),
        Cell::new(1, 18),
    );
    assert!(dispatch.outcome.is_accepted());
    assert_eq!(turn_changes(&dispatch.events), vec![PlayerColor::Red]);

    let snapshot = game.snapshot();
    assert!(snapshot.players[1].finished);
    assert!(snapshot.players[3].finished);
    assert_eq!(snapshot.moves_played, 6);
}

#[test]
fn test_draw_detection() {
    let mut registry = PlayerRegistry::new(3);
    for (client, color) in ["a", "b", "c", "d"].into_iter().zip(PlayerColor::TURN_ORDER) {
        registry
            .register_player(client.to_string(), color)
            .expect("Seat is free");
    }
    for (color, points) in PlayerColor::TURN_ORDER.into_iter().zip([12, 12, 9, 5]) {
        registry.record_placement(color, points).expect("Seated");
    }

    let summary = registry.determine_winners();
    assert!(summary.is_draw);
    assert_eq!(summary.winners, vec![PlayerColor::Red, PlayerColor::Green]);
    assert_eq!(summary.max_points, 12);
    assert_eq!(summary.winner(), None);
}

#[test]
fn test_game_over_after_last_pieces() {
    let mut game = AnyGame::new(RulesConfig {
        pieces_per_player: 1,
        required_players: 2,
        ..RulesConfig::default()
    });
    game.join("a".to_string(), Some(PlayerColor::Blue)).expect("Join");
    game.join("b".to_string(), Some(PlayerColor::Yellow)).expect("Join");
    assert_eq!(game.acting_color(), Some(PlayerColor::Blue));

    game.submit_placement("a", 0, Shape::from_pairs(&[(0, 0)]), Cell::new(0, 19));
    let dispatch = game.submit_placement("b", 0, Shape::from_pairs(&[(0, 0)]), Cell::new(19, 19));

    assert!(game.is_over());
    match dispatch.events.last() {
        Some(GameEvent::GameOver { summary }) => {
            assert!(summary.is_draw);
            assert_eq!(summary.winners, vec![PlayerColor::Blue, PlayerColor::Yellow]);
            assert_eq!(summary.max_points, 1);
        }
        other => panic!("expected game over, got {other:?}"),
    }
    assert_eq!(game.snapshot().phase, GamePhase::GameOver);
}

#[test]
fn test_zero_pieces_ends_game_at_start() {
    let mut game = AnyGame::new(RulesConfig {
        pieces_per_player: 0,
        required_players: 1,
        ..RulesConfig::default()
    });
    let seat = game.join("solo".to_string(), None).expect("Join");
    assert!(matches!(seat.events.last(), Some(GameEvent::GameOver { .. })));
    assert!(game.is_over());
}

#[test]
fn test_snapshot_grid_rebuilds_board() {
    let mut game = four_player_game();
    game.submit_placement(
        "p-red",
        2,
        Shape::from_pairs(&[(0, 0), (0, 1), (0, 2)]),
        Cell::new(19, 0),
    );

    let grid = game.snapshot().grid;
    let rebuilt = Board::from_codes(&grid).expect("Valid grid");
    assert_eq!(&rebuilt, game.board());
    assert_eq!(rebuilt.count_of(PlayerColor::Red), 3);

    let json = serde_json::to_string(game.board()).expect("Serialize");
    let parsed: Board = serde_json::from_str(&json).expect("Deserialize");
    assert_eq!(&parsed, game.board());
}

#[test]
fn test_placement_cells_travel_in_wire_form() {
    let mut game = four_player_game();
    let dispatch = game.submit_placement(
        "p-red",
        1,
        Shape::from_pairs(&[(0, 0), (-1, 0)]),
        Cell::new(19, 0),
    );
    let Some(GameEvent::CellsOccupied { cells, color }) = dispatch.events.first() else {
        panic!("expected cells occupied");
    };
    assert_eq!(*color, PlayerColor::Red);

    let bytes = encode_cells(cells);
    assert_eq!(bytes.len(), 4 + 2 * 8);
    assert_eq!(&decode_cells(&bytes).expect("Decode"), cells);
}
