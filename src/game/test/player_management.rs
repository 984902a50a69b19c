//! Player joining, naming and lobby tests

use super::super::{Event, GameRng, GameState, PlayerId, MAX_PLAYERS};
use super::test_utils::*;
use crate::error::GameError;

#[test]
fn test_players_join_in_seat_order() {
    let game = create_lobby(3);

    let names: Vec<_> = game.players().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Player 1", "Player 2", "Player 3"]);
    let ids: Vec<_> = game.players().iter().map(|p| p.id.clone()).collect();
    assert_eq!(ids, vec![pid(0), pid(1), pid(2)]);

    let player = game.player(&pid(1)).unwrap();
    assert!(player.alive());
    assert!(player.role.is_none());
    assert!(player.vote.is_none());
    assert!(!player.seen_role);
}

#[test]
fn test_rejoining_is_a_no_op() {
    let mut rng = GameRng::new(0);
    let game = create_lobby(3);
    let renamed = apply(
        &game,
        Event::UpdatePlayerName {
            player_id: pid(0),
            name: "Alice".to_string(),
        },
        1,
        &mut rng,
    );

    let rejoined = apply(&renamed, Event::PlayerJoin { player_id: pid(0) }, 2, &mut rng);
    assert_eq!(rejoined, renamed);
    assert_eq!(rejoined.player(&pid(0)).unwrap().name, "Alice");
}

#[test]
fn test_joining_a_full_lobby_is_ignored() {
    let mut rng = GameRng::new(0);
    let game = create_lobby(MAX_PLAYERS);
    let next = apply(&game, Event::PlayerJoin { player_id: pid(99) }, 1, &mut rng);

    assert_eq!(next.num_players(), MAX_PLAYERS);
    assert!(next.player(&pid(99)).is_none());
}

#[test]
fn test_joining_a_started_game_is_ignored() {
    let (game, mut rng) = create_test_game(5, 42);
    let next = apply(&game, Event::PlayerJoin { player_id: pid(5) }, 1, &mut rng);
    assert_eq!(next, game);
}

#[test]
fn test_update_player_name() {
    let mut rng = GameRng::new(0);
    let game = create_lobby(5);
    let game = apply(
        &game,
        Event::UpdatePlayerName {
            player_id: pid(3),
            name: "Dana".to_string(),
        },
        1,
        &mut rng,
    );
    assert_eq!(game.player(&pid(3)).unwrap().name, "Dana");

    // Renaming is also allowed once the game is running
    let (game, mut rng) = create_test_game(5, 1);
    let game = apply(
        &game,
        Event::UpdatePlayerName {
            player_id: pid(0),
            name: "Eve".to_string(),
        },
        1,
        &mut rng,
    );
    assert_eq!(game.player(&pid(0)).unwrap().name, "Eve");
}

#[test]
fn test_update_unknown_player_name() {
    let mut rng = GameRng::new(0);
    let game = create_lobby(5);
    let result = super::super::update(
        &game,
        &Event::UpdatePlayerName {
            player_id: PlayerId::from("nobody"),
            name: "Ghost".to_string(),
        },
        1,
        &mut rng,
    );
    assert_eq!(result, Err(GameError::PlayerNotFound));
}

#[test]
fn test_start_game_needs_five_players() {
    let mut rng = ScriptedRandom::new(&[]);
    let game = create_lobby(4);
    let next = apply(&game, Event::StartGame, 1, &mut rng);

    assert_eq!(next, game);
    assert!(!next.is_started());
    assert_eq!(rng.calls, 0);
}

#[test]
fn test_start_game_twice_is_ignored() {
    let (game, mut rng) = create_test_game(6, 42);
    let next = apply(&game, Event::StartGame, 10, &mut rng);
    assert_eq!(next, game);
}

#[test]
fn test_new_game_is_an_empty_lobby() {
    let game = GameState::default();
    assert!(!game.is_started());
    assert!(game.phase().is_none());
    assert_eq!(game.num_players(), 0);
    assert_eq!(game.draw_pile(), 17);
    assert_eq!(game.failed_votes(), 0);
}
