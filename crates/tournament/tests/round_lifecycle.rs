//! Several rounds of a small event, driven through the public API

use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::collections::HashMap;
use tournament::{
    ChallengeRequest, ChallengeService, MatchRecord, MemoryWorkbook, Opponent, Outcome, Result,
    RoundOrchestrator, Table, TableStore, TournamentConfig, TournamentError, WorkbookFile,
};

/// Stands in for Lichess: numbered links, results set by the test
#[derive(Default)]
struct FakeLichess {
    requests: RefCell<Vec<ChallengeRequest>>,
    results: RefCell<HashMap<String, Outcome>>,
    reject: bool,
}

impl FakeLichess {
    fn finish(&self, record: &MatchRecord, outcome: Outcome) {
        let link = record.match_link.clone().expect("game has a link");
        self.results.borrow_mut().insert(link, outcome);
    }
}

impl ChallengeService for FakeLichess {
    fn create_challenge(&self, request: &ChallengeRequest) -> Result<String> {
        if self.reject {
            return Err(TournamentError::Api {
                status: 401,
                body: "No such token".into(),
            });
        }
        let mut requests = self.requests.borrow_mut();
        requests.push(request.clone());
        Ok(format!("https://lichess.org/g{:07}", requests.len()))
    }

    fn fetch_result(&self, match_link: &str) -> Result<Outcome> {
        Ok(self.results.borrow().get(match_link).copied().unwrap_or_default())
    }
}

const ROSTER: [&str; 4] = ["Ana", "Ben", "Cai", "Dev"];

fn roster_sheet(names: &[&str]) -> Table {
    let mut table = Table::new(&["Player", "Lichess Handle", "Federation", "Experience"]);
    for name in names {
        table.push(vec![
            name.to_string(),
            format!("{}_chess", name.to_lowercase()),
            String::new(),
            String::new(),
        ]);
    }
    table
}

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 5, 18, 0, 0).unwrap()
}

/// Earlier roster entries always win
fn decide(record: &MatchRecord) -> Outcome {
    let rank = |name: &str| ROSTER.iter().position(|n| *n == name).unwrap();
    match &record.black {
        Opponent::Player(black) if rank(black) < rank(&record.white) => Outcome::Black,
        _ => Outcome::White,
    }
}

fn played(record: &MatchRecord, a: &str, b: &str) -> bool {
    record.involves(a) && record.involves(b)
}

#[test]
fn test_two_rounds_without_rematches() {
    let config = TournamentConfig::default();
    let mut book = MemoryWorkbook::new().with_sheet("Leaderboard", roster_sheet(&ROSTER));
    let lichess = FakeLichess::default();
    let mut rng = StdRng::seed_from_u64(11);

    let round_one = RoundOrchestrator::new(&config, &mut book, &lichess)
        .create_next_round(&[], start(), &mut rng)
        .unwrap();
    assert_eq!(round_one.len(), 2);

    let requests = lichess.requests.borrow().clone();
    assert_eq!(requests.len(), 2);
    for request in &requests {
        assert_eq!(request.round, 1);
        assert_eq!(request.clock_secs, 600);
        assert!(request.white_handle.ends_with("_chess"));
        assert!(request.title().starts_with("Round: 1: "));
    }

    for record in &round_one {
        lichess.finish(record, decide(record));
    }
    let summary = RoundOrchestrator::new(&config, &mut book, &lichess)
        .refresh_results(start() + Duration::days(1))
        .unwrap();
    assert_eq!(summary.finished, 2);

    let standings = RoundOrchestrator::new(&config, &mut book, &lichess)
        .update_standings()
        .unwrap();
    let leaders: Vec<f64> = standings.leaderboard().iter().map(|s| s.player.score).collect();
    assert_eq!(leaders, vec![1.0, 1.0, 0.0, 0.0]);

    let leaderboard = book.sheet("Leaderboard").unwrap();
    assert_eq!(leaderboard.len(), 4);
    assert_eq!(leaderboard.header.last().map(String::as_str), Some("Score"));

    let round_two = RoundOrchestrator::new(&config, &mut book, &lichess)
        .create_next_round(&[], start() + Duration::days(2), &mut rng)
        .unwrap();
    assert_eq!(round_two.len(), 2);
    for record in &round_two {
        assert_eq!(record.round, 2);
        assert_eq!(record.games_played, 0);
        assert_eq!(record.score_delta.abs(), 0.0);
        assert!(!round_one
            .iter()
            .any(|earlier| played(earlier, &record.white, record.black.name())));
    }
}

#[test]
fn test_odd_roster_and_sit_outs_get_byes() {
    let config = TournamentConfig::default();
    let mut book = MemoryWorkbook::new().with_sheet("Leaderboard", roster_sheet(&ROSTER));
    let lichess = FakeLichess::default();
    let mut rng = StdRng::seed_from_u64(12);

    let created = RoundOrchestrator::new(&config, &mut book, &lichess)
        .create_next_round(&["Ben".to_string()], start(), &mut rng)
        .unwrap();

    // Ben sits out, leaving three; Dev is last on the roster and takes the parity bye.
    // Bye records follow the games, in roster order.
    let byes: Vec<&str> = created
        .iter()
        .filter(|m| m.is_bye())
        .map(|m| m.white.as_str())
        .collect();
    assert_eq!(byes, vec!["Ben", "Dev"]);
    assert!(!created[0].is_bye());
    assert_eq!(lichess.requests.borrow().len(), 1);

    let games = book.sheet("Games").unwrap();
    assert_eq!(games.len(), 3);
}

#[test]
fn test_rejected_challenge_leaves_history_untouched() {
    let config = TournamentConfig::default();
    let mut book = MemoryWorkbook::new().with_sheet("Leaderboard", roster_sheet(&ROSTER));
    let lichess = FakeLichess {
        reject: true,
        ..Default::default()
    };
    let mut rng = StdRng::seed_from_u64(13);

    let err = RoundOrchestrator::new(&config, &mut book, &lichess)
        .create_next_round(&[], start(), &mut rng)
        .unwrap_err();
    assert!(matches!(err, TournamentError::Api { status: 401, .. }));
    assert!(book.sheet("Games").is_none());
}

#[test]
fn test_workbook_file_round_trip() {
    let path = std::env::temp_dir().join(format!("round-lifecycle-{}.json", std::process::id()));
    let _ = std::fs::remove_file(&path);

    let config = TournamentConfig {
        workbook: path.clone(),
        ..Default::default()
    };
    let mut book = WorkbookFile::new(&config.workbook);
    book.write_table(&config.players_sheet, &roster_sheet(&["Ana", "Ben"]))
        .unwrap();

    let lichess = FakeLichess::default();
    let mut rng = StdRng::seed_from_u64(14);
    RoundOrchestrator::new(&config, &mut book, &lichess)
        .create_next_round(&[], start(), &mut rng)
        .unwrap();

    let reopened = WorkbookFile::new(&path);
    let snapshot = RoundOrchestrator::new(&config, &mut WorkbookFile::new(&path), &lichess)
        .load()
        .unwrap();
    assert_eq!(snapshot.matches.len(), 1);
    assert_eq!(snapshot.next_round(), 2);
    assert!(snapshot.matches[0].involves("Ana") && snapshot.matches[0].involves("Ben"));
    assert!(reopened.read_table("Games").is_ok());

    std::fs::remove_file(&path).unwrap();
}
