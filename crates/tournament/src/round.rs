//! Round orchestration: gather the roster, pair, create games, persist

use chrono::{DateTime, FixedOffset, Utc};
use pairing_core::{Competitor, HeadToHead, Pair, Player};
use rand::Rng;
use tracing::{info, warn};

use crate::challenge::{expires_at, ChallengeRequest, ChallengeService};
use crate::config::TournamentConfig;
use crate::error::{Result, TournamentError};
use crate::records::{MatchRecord, Opponent, Outcome, RosterEntry};
use crate::sheets::{leaderboard_table, matches_from_table, matches_table, roster_from_table};
use crate::standings::{head_to_head, Standings};
use crate::table::TableStore;

/// Consistent view of the tournament at one moment
#[derive(Debug, Clone)]
pub struct TournamentSnapshot {
    pub roster: Vec<RosterEntry>,
    pub matches: Vec<MatchRecord>,
    pub standings: Standings,
    pub head_to_head: HeadToHead,
}

impl TournamentSnapshot {
    /// 1 for an empty history, otherwise one past the last game's round
    pub fn next_round(&self) -> u32 {
        self.matches.last().map_or(1, |m| m.round + 1)
    }
}

/// What a results refresh changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    pub finished: usize,
    pub expired: usize,
    pub failed: usize,
}

/// Drives round creation against a table store and a challenge service
pub struct RoundOrchestrator<'a> {
    config: &'a TournamentConfig,
    store: &'a mut dyn TableStore,
    challenges: &'a dyn ChallengeService,
}

impl<'a> RoundOrchestrator<'a> {
    pub fn new(
        config: &'a TournamentConfig,
        store: &'a mut dyn TableStore,
        challenges: &'a dyn ChallengeService,
    ) -> Self {
        Self {
            config,
            store,
            challenges,
        }
    }

    /// Read roster and games and replay the standings
    pub fn load(&self) -> Result<TournamentSnapshot> {
        let players = self.store.read_table(&self.config.players_sheet)?;
        let roster = roster_from_table(&self.config.players_sheet, &players)?;

        let matches = match self.store.read_table(&self.config.games_sheet) {
            Ok(games) => matches_from_table(&self.config.games_sheet, &games)?,
            Err(TournamentError::MissingSheet(_)) => Vec::new(),
            Err(e) => return Err(e),
        };

        let standings = Standings::replay(
            &roster,
            &matches,
            self.config.initial_rating,
            self.config.k_factor,
        )?;
        let head_to_head = head_to_head(&matches);

        Ok(TournamentSnapshot {
            roster,
            matches,
            standings,
            head_to_head,
        })
    }

    /// Pairings the next round would get, without creating anything
    pub fn preview_pairings(&self, sit_outs: &[String]) -> Result<(u32, Vec<Pair>)> {
        let snapshot = self.load()?;
        let round = snapshot.next_round();
        let pairs = self.pair(&snapshot, round, sit_outs)?;
        Ok((round, pairs))
    }

    fn pair(&self, snapshot: &TournamentSnapshot, round: u32, sit_outs: &[String]) -> Result<Vec<Pair>> {
        let engine = self.config.engine_for_round(round);
        let players = snapshot.standings.players();
        Ok(engine.pair_round(&players, sit_outs, &snapshot.head_to_head)?)
    }

    /// Pair the next round, open its games, and append them to the games sheet.
    ///
    /// Colours are drawn from `rng`; a bye is always black. Nothing is written
    /// unless every pair was paired and created successfully. If a challenge
    /// fails after others were opened, the error is
    /// [`TournamentError::RoundAborted`] carrying their links.
    pub fn create_next_round<R: Rng>(
        &mut self,
        sit_outs: &[String],
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<Vec<MatchRecord>> {
        let mut snapshot = self.load()?;
        let round = snapshot.next_round();
        let pairs = self.pair(&snapshot, round, sit_outs)?;

        let challenge = &self.config.challenge;
        let expires = expires_at(now, challenge.days_until_expired, challenge.timezone()?);

        let mut created = Vec::with_capacity(pairs.len());
        for pair in pairs {
            let record = match (pair.first, pair.second) {
                (Competitor::Real(a), Competitor::Real(b)) => {
                    let (white, black) = if rng.gen_bool(0.5) { (a, b) } else { (b, a) };
                    match self.create_game(round, &white, &black, &snapshot.head_to_head, expires) {
                        Ok(record) => record,
                        Err(e) => return Err(abandon_round(round, &created, e)),
                    }
                }
                (Competitor::Real(player), Competitor::Bye)
                | (Competitor::Bye, Competitor::Real(player)) => MatchRecord {
                    round,
                    white: player.name,
                    black: Opponent::Bye,
                    score_delta: 0.0,
                    games_played: 0,
                    match_link: None,
                    expires: Some(expires),
                    outcome: Outcome::Pending,
                },
                (Competitor::Bye, Competitor::Bye) => continue,
            };
            created.push(record);
        }

        snapshot.matches.extend(created.iter().cloned());
        self.store
            .write_table(&self.config.games_sheet, &matches_table(&snapshot.matches))?;

        info!(round, games = created.len(), "round created");
        Ok(created)
    }

    fn create_game(
        &self,
        round: u32,
        white: &Player,
        black: &Player,
        history: &HeadToHead,
        expires: DateTime<FixedOffset>,
    ) -> Result<MatchRecord> {
        let challenge = &self.config.challenge;
        let request = ChallengeRequest {
            round,
            white_name: white.name.clone(),
            white_handle: white.handle.clone(),
            black_name: black.name.clone(),
            black_handle: black.handle.clone(),
            clock_secs: challenge.clock_secs,
            increment_secs: challenge.increment_secs,
            variant: challenge.variant.clone(),
            rated: challenge.rated,
            expires,
        };
        let link = self.challenges.create_challenge(&request)?;

        Ok(MatchRecord {
            round,
            white: white.name.clone(),
            black: Opponent::Player(black.name.clone()),
            score_delta: white.score - black.score,
            games_played: history.count(&white.name, &black.name),
            match_link: (!link.is_empty()).then_some(link),
            expires: Some(expires),
            outcome: Outcome::Pending,
        })
    }

    /// Pull finished results for pending games and expire overdue ones.
    ///
    /// Byes are left for the organiser to settle. A failed fetch is logged and
    /// the game stays pending.
    pub fn refresh_results(&mut self, now: DateTime<Utc>) -> Result<RefreshSummary> {
        let mut snapshot = self.load()?;
        let mut summary = RefreshSummary::default();

        for record in snapshot.matches.iter_mut() {
            if record.outcome.is_terminal() || record.is_bye() {
                continue;
            }

            if let Some(link) = &record.match_link {
                match self.challenges.fetch_result(link) {
                    Ok(outcome) if outcome.is_terminal() => {
                        info!(white = %record.white, black = %record.black.name(), %outcome, "result recorded");
                        record.outcome = outcome;
                        summary.finished += 1;
                        continue;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!(link = %link, error = %e, "failed to fetch result");
                        summary.failed += 1;
                    }
                }
            }

            if record.expires.is_some_and(|expires| expires < now) {
                warn!(white = %record.white, black = %record.black.name(), "game expired");
                record.outcome = Outcome::Expired;
                summary.expired += 1;
            }
        }

        if summary.finished + summary.expired > 0 {
            self.store
                .write_table(&self.config.games_sheet, &matches_table(&snapshot.matches))?;
        }
        Ok(summary)
    }

    /// Replay the history and rewrite the leaderboard sheet in ranking order
    pub fn update_standings(&mut self) -> Result<Standings> {
        let snapshot = self.load()?;
        self.store.write_table(
            &self.config.players_sheet,
            &leaderboard_table(&snapshot.standings),
        )?;
        Ok(snapshot.standings)
    }
}

/// Wrap a challenge failure with the links of challenges already opened this round
fn abandon_round(round: u32, created: &[MatchRecord], error: TournamentError) -> TournamentError {
    let opened: Vec<String> = created
        .iter()
        .filter_map(|record| record.match_link.clone())
        .collect();
    if opened.is_empty() {
        return error;
    }

    warn!(round, open = opened.len(), error = %error, "round abandoned with open challenges");
    TournamentError::RoundAborted {
        round,
        opened,
        source: Box::new(error),
    }
}

#[cfg(test)]
#[path = "round_tests.rs"]
mod round_tests;
