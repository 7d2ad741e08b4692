use super::*;
use crate::competitor::Experience;

fn roster() -> Vec<Player> {
    vec![
        Player::new("Ana")
            .with_score(2.0)
            .with_rating(1610.0)
            .with_federation("North")
            .with_experience(Experience::Advanced),
        Player::new("Ben")
            .with_score(1.5)
            .with_rating(1480.0)
            .with_federation("North"),
        Player::new("Cai")
            .with_score(0.5)
            .with_rating(1522.0)
            .with_experience(Experience::Beginner),
        Player::new("Dev").with_score(1.0).with_rating(1390.0).with_federation("South"),
    ]
}

#[test]
fn test_matrix_is_exactly_symmetric() {
    let players = roster();
    let history: HeadToHead = [("Ana", "Ben"), ("Cai", "Ana")].into_iter().collect();
    let matrix = CostMatrix::build(&players, &history, &CostWeights::default());

    for i in 0..players.len() {
        for j in 0..players.len() {
            if i != j {
                assert_eq!(matrix.get(i, j), matrix.get(j, i));
            }
        }
    }
}

#[test]
fn test_zero_weights_reduce_to_score_delta() {
    let players = roster();
    let history: HeadToHead = [("Ana", "Ben"), ("Ana", "Ben")].into_iter().collect();
    let matrix = CostMatrix::build(&players, &history, &CostWeights::score_only());

    for i in 0..players.len() {
        for j in 0..players.len() {
            if i != j {
                assert_eq!(matrix.get(i, j), (players[i].score - players[j].score).abs());
            }
        }
    }
}

#[test]
fn test_every_term_contributes() {
    let players = roster();
    let history: HeadToHead = [("Ana", "Ben"), ("Ben", "Ana")].into_iter().collect();
    let weights = CostWeights {
        rematch_cost: 10.0,
        within_federation_cost: 3.0,
        experience_cost: 2.0,
        elo_cost: 0.01,
    };

    // Ana/Ben: 0.5 score, two meetings, same federation, one tier apart, 130 Elo
    let cost = pair_cost(&players[0], &players[1], &history, &weights);
    let expected = 0.5 + 20.0 + 3.0 + 2.0 + 0.01 * 130.0;
    assert!((cost - expected).abs() < 1e-9);
}

#[test]
fn test_missing_federation_never_matches() {
    let a = Player::new("A");
    let b = Player::new("B");
    assert!(!a.same_federation(&b));

    let weights = CostWeights {
        within_federation_cost: 5.0,
        ..CostWeights::score_only()
    };
    assert_eq!(pair_cost(&a, &b, &HeadToHead::new(), &weights), 0.0);
}

#[test]
fn test_experience_taper() {
    let weights = CostWeights::default();
    assert_eq!(weights.for_round(1, Some(4)).experience_cost, weights.experience_cost);
    assert!((weights.for_round(3, Some(4)).experience_cost - weights.experience_cost * 0.5).abs() < 1e-12);
    assert_eq!(weights.for_round(9, Some(4)).experience_cost, 0.0);
    assert_eq!(weights.for_round(9, None), weights);
}

#[test]
fn test_from_rows_mirrors_upper_triangle() {
    let matrix = CostMatrix::from_rows(&[
        vec![0.0, 1.0, 2.0],
        vec![9.0, 0.0, 3.0],
        vec![9.0, 9.0, 0.0],
    ]);
    assert_eq!(matrix.size(), 3);
    assert_eq!(matrix.get(1, 0), 1.0);
    assert_eq!(matrix.get(2, 1), 3.0);
    assert_eq!(matrix.matching_cost(&[(0, 2)]), 2.0);
}

#[test]
fn test_weights_deserialize_with_defaults() {
    let weights: CostWeights = serde_json::from_str(r#"{"rematch_cost": 4.0}"#).unwrap();
    assert_eq!(weights.rematch_cost, 4.0);
    assert_eq!(weights.within_federation_cost, CostWeights::default().within_federation_cost);
    assert_eq!(weights.elo_cost, CostWeights::default().elo_cost);
}
