use super::*;
use crate::error::TournamentError;
use crate::table::{MemoryWorkbook, Table};
use chrono::TimeZone;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::collections::HashMap;

/// Hands out sequential links and reports whatever outcome was scripted
#[derive(Default)]
struct ScriptedChallenges {
    created: RefCell<Vec<ChallengeRequest>>,
    outcomes: HashMap<String, Outcome>,
    broken_links: Vec<String>,
    /// Refuse the challenge with this 1-based call number
    refuse_call: Option<usize>,
}

impl ChallengeService for ScriptedChallenges {
    fn create_challenge(&self, request: &ChallengeRequest) -> Result<String> {
        let mut created = self.created.borrow_mut();
        if self.refuse_call == Some(created.len() + 1) {
            return Err(TournamentError::Api {
                status: 429,
                body: "Too many requests".into(),
            });
        }
        created.push(request.clone());
        Ok(format!("https://lichess.org/game{}", created.len()))
    }

    fn fetch_result(&self, match_link: &str) -> Result<Outcome> {
        if self.broken_links.iter().any(|l| l == match_link) {
            return Err(TournamentError::Api {
                status: 500,
                body: "unavailable".into(),
            });
        }
        Ok(self.outcomes.get(match_link).copied().unwrap_or_default())
    }
}

fn roster(names: &[&str]) -> Table {
    let mut table = Table::new(&["Player", "Lichess Handle", "Federation"]);
    for name in names {
        table.push(vec![name.to_string(), name.to_lowercase(), String::new()]);
    }
    table
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 5, 18, 0, 0).unwrap()
}

#[test]
fn test_first_round_on_empty_history() {
    let config = TournamentConfig::default();
    let mut book = MemoryWorkbook::new().with_sheet("Leaderboard", roster(&["Ana", "Ben", "Cai", "Dev"]));
    let service = ScriptedChallenges::default();
    let mut rng = StdRng::seed_from_u64(1);

    let mut orchestrator = RoundOrchestrator::new(&config, &mut book, &service);
    assert_eq!(orchestrator.load().unwrap().next_round(), 1);

    let created = orchestrator.create_next_round(&[], now(), &mut rng).unwrap();
    assert_eq!(created.len(), 2);
    assert!(created.iter().all(|m| m.round == 1 && m.outcome == Outcome::Pending));
    assert!(created.iter().all(|m| m.match_link.is_some()));
    assert_eq!(service.created.borrow().len(), 2);

    assert_eq!(orchestrator.load().unwrap().next_round(), 2);
    let games = book.sheet("Games").unwrap();
    assert_eq!(games.len(), 2);
}

#[test]
fn test_refresh_records_results_and_expires_overdue_games() {
    let config = TournamentConfig::default();
    let mut book = MemoryWorkbook::new().with_sheet("Leaderboard", roster(&["Ana", "Ben", "Cai", "Dev"]));
    let mut service = ScriptedChallenges::default();
    let mut rng = StdRng::seed_from_u64(2);

    RoundOrchestrator::new(&config, &mut book, &service)
        .create_next_round(&[], now(), &mut rng)
        .unwrap();

    service
        .outcomes
        .insert("https://lichess.org/game1".into(), Outcome::Draw);

    // Game 2 is still pending and overdue a month later
    let later = now() + chrono::Duration::days(30);
    let summary = RoundOrchestrator::new(&config, &mut book, &service)
        .refresh_results(later)
        .unwrap();
    assert_eq!(
        summary,
        RefreshSummary {
            finished: 1,
            expired: 1,
            failed: 0
        }
    );

    let snapshot = RoundOrchestrator::new(&config, &mut book, &service).load().unwrap();
    let outcomes: Vec<Outcome> = snapshot.matches.iter().map(|m| m.outcome).collect();
    assert_eq!(outcomes, vec![Outcome::Draw, Outcome::Expired]);
}

#[test]
fn test_refresh_survives_fetch_failures() {
    let config = TournamentConfig::default();
    let mut book = MemoryWorkbook::new().with_sheet("Leaderboard", roster(&["Ana", "Ben"]));
    let mut service = ScriptedChallenges::default();
    let mut rng = StdRng::seed_from_u64(3);

    RoundOrchestrator::new(&config, &mut book, &service)
        .create_next_round(&[], now(), &mut rng)
        .unwrap();
    service.broken_links.push("https://lichess.org/game1".into());

    let summary = RoundOrchestrator::new(&config, &mut book, &service)
        .refresh_results(now())
        .unwrap();
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.finished + summary.expired, 0);
}

#[test]
fn test_byes_are_not_refreshed_or_challenged() {
    let config = TournamentConfig::default();
    let mut book = MemoryWorkbook::new().with_sheet("Leaderboard", roster(&["Ana", "Ben", "Cai"]));
    let service = ScriptedChallenges::default();
    let mut rng = StdRng::seed_from_u64(4);

    let created = RoundOrchestrator::new(&config, &mut book, &service)
        .create_next_round(&[], now(), &mut rng)
        .unwrap();
    let bye = created.iter().find(|m| m.is_bye()).unwrap();
    assert_eq!(bye.white, "Cai");
    assert_eq!(bye.match_link, None);
    assert_eq!(service.created.borrow().len(), 1);

    let later = now() + chrono::Duration::days(30);
    let summary = RoundOrchestrator::new(&config, &mut book, &service)
        .refresh_results(later)
        .unwrap();
    assert_eq!(summary.expired, 1);

    let snapshot = RoundOrchestrator::new(&config, &mut book, &service).load().unwrap();
    let bye = snapshot.matches.iter().find(|m| m.is_bye()).unwrap();
    assert_eq!(bye.outcome, Outcome::Pending);
}

#[test]
fn test_unknown_sit_out_writes_nothing() {
    let config = TournamentConfig::default();
    let mut book = MemoryWorkbook::new().with_sheet("Leaderboard", roster(&["Ana", "Ben"]));
    let service = ScriptedChallenges::default();
    let mut rng = StdRng::seed_from_u64(5);

    let err = RoundOrchestrator::new(&config, &mut book, &service)
        .create_next_round(&["Zed".to_string()], now(), &mut rng)
        .unwrap_err();
    assert!(matches!(err, TournamentError::Pairing(_)));
    assert!(book.sheet("Games").is_none());
    assert!(service.created.borrow().is_empty());
}

#[test]
fn test_missing_roster_sheet_is_an_error() {
    let config = TournamentConfig::default();
    let mut book = MemoryWorkbook::new();
    let service = ScriptedChallenges::default();

    let err = RoundOrchestrator::new(&config, &mut book, &service).load().unwrap_err();
    assert!(matches!(err, TournamentError::MissingSheet(sheet) if sheet == "Leaderboard"));
}

#[test]
fn test_failed_challenge_reports_challenges_already_opened() {
    let config = TournamentConfig::default();
    let mut book = MemoryWorkbook::new().with_sheet("Leaderboard", roster(&["Ana", "Ben", "Cai", "Dev"]));
    let service = ScriptedChallenges {
        refuse_call: Some(2),
        ..Default::default()
    };
    let mut rng = StdRng::seed_from_u64(6);

    let err = RoundOrchestrator::new(&config, &mut book, &service)
        .create_next_round(&[], now(), &mut rng)
        .unwrap_err();

    match err {
        TournamentError::RoundAborted {
            round,
            opened,
            source,
        } => {
            assert_eq!(round, 1);
            assert_eq!(opened, vec!["https://lichess.org/game1".to_string()]);
            assert!(matches!(*source, TournamentError::Api { status: 429, .. }));
        }
        other => panic!("expected an aborted round, got {other:?}"),
    }
    assert_eq!(service.created.borrow().len(), 1);
    assert!(book.sheet("Games").is_none());
}

#[test]
fn test_first_challenge_failure_is_returned_as_is() {
    let config = TournamentConfig::default();
    let mut book = MemoryWorkbook::new().with_sheet("Leaderboard", roster(&["Ana", "Ben", "Cai", "Dev"]));
    let service = ScriptedChallenges {
        refuse_call: Some(1),
        ..Default::default()
    };
    let mut rng = StdRng::seed_from_u64(7);

    let err = RoundOrchestrator::new(&config, &mut book, &service)
        .create_next_round(&[], now(), &mut rng)
        .unwrap_err();
    assert!(matches!(err, TournamentError::Api { status: 429, .. }));
    assert!(book.sheet("Games").is_none());
}

#[test]
fn test_roster_player_named_bye_is_refused() {
    let config = TournamentConfig::default();
    let mut book = MemoryWorkbook::new().with_sheet("Leaderboard", roster(&["Ana", "bye"]));
    let service = ScriptedChallenges::default();
    let mut rng = StdRng::seed_from_u64(8);

    let err = RoundOrchestrator::new(&config, &mut book, &service)
        .create_next_round(&[], now(), &mut rng)
        .unwrap_err();
    assert!(matches!(err, TournamentError::BadCell { ref column, .. } if column == "Player"));
    assert!(service.created.borrow().is_empty());
    assert!(book.sheet("Games").is_none());
}
