//! What each player learns from their role card

use super::super::{Party, RoleKnowledge};
use super::test_utils::*;
use crate::error::GameError;

#[test]
fn test_liberals_learn_nothing() {
    let game = create_game_in_election(7, 0);
    let knowledge = game.role_knowledge(&pid(0)).unwrap();
    assert_eq!(
        knowledge,
        RoleKnowledge {
            role: Some(Party::Liberal),
            is_hitler: false,
            fascists: vec![],
            hitler: None,
        }
    );
}

#[test]
fn test_fascists_know_each_other_and_hitler() {
    let game = create_game_in_election(7, 0);
    let knowledge = game.role_knowledge(&pid(4)).unwrap();

    assert_eq!(knowledge.role, Some(Party::Fascist));
    assert!(!knowledge.is_hitler);
    assert_eq!(knowledge.fascists, vec![pid(5)]);
    assert_eq!(knowledge.hitler, Some(hitler_seat(7)));
}

#[test]
fn test_hitler_knows_fascist_in_small_games() {
    for num_players in 5..=6 {
        let game = create_game_in_election(num_players, 0);
        let knowledge = game.role_knowledge(&hitler_seat(num_players)).unwrap();

        assert!(knowledge.is_hitler);
        assert_eq!(knowledge.fascists, vec![pid(num_players - 2)]);
        assert_eq!(knowledge.hitler, None);
    }
}

#[test]
fn test_hitler_is_blind_in_large_games() {
    for num_players in 7..=10 {
        let game = create_game_in_election(num_players, 0);
        let knowledge = game.role_knowledge(&hitler_seat(num_players)).unwrap();

        assert!(knowledge.is_hitler);
        assert_eq!(knowledge.role, Some(Party::Fascist));
        assert!(knowledge.fascists.is_empty());
    }
}

#[test]
fn test_role_knowledge_in_the_lobby() {
    let game = create_lobby(5);
    let knowledge = game.role_knowledge(&pid(0)).unwrap();
    assert_eq!(knowledge.role, None);
    assert!(knowledge.fascists.is_empty());

    assert_eq!(game.role_knowledge(&pid(5)), Err(GameError::PlayerNotFound));
}
