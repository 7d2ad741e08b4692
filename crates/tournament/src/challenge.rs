//! Remote game hosting: creating challenges and fetching results

use chrono::{DateTime, Duration, FixedOffset, LocalResult, NaiveTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::ChallengeConfig;
use crate::error::{Result, TournamentError};
use crate::records::Outcome;

/// Everything needed to open a challenge between two players
#[derive(Debug, Clone, PartialEq)]
pub struct ChallengeRequest {
    pub round: u32,
    pub white_name: String,
    pub white_handle: String,
    pub black_name: String,
    pub black_handle: String,
    pub clock_secs: u32,
    pub increment_secs: u32,
    pub variant: String,
    pub rated: bool,
    pub expires: DateTime<FixedOffset>,
}

impl ChallengeRequest {
    /// Title shown to the players
    pub fn title(&self) -> String {
        format!(
            "Round: {}: {} vs. {} (expires: {})",
            self.round,
            self.white_name,
            self.black_name,
            self.expires.format("%Y-%m-%d %H:%M:%S %:z")
        )
    }
}

/// A service that hosts the games of a round
pub trait ChallengeService {
    /// Open a challenge and return its URL
    fn create_challenge(&self, request: &ChallengeRequest) -> Result<String>;

    /// Current outcome of the game behind `match_link`
    fn fetch_result(&self, match_link: &str) -> Result<Outcome>;
}

/// Creates no remote games; every result stays pending
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineChallenges;

impl ChallengeService for OfflineChallenges {
    fn create_challenge(&self, request: &ChallengeRequest) -> Result<String> {
        debug!(title = %request.title(), "offline: no challenge created");
        Ok(String::new())
    }

    fn fetch_result(&self, _match_link: &str) -> Result<Outcome> {
        Ok(Outcome::Pending)
    }
}

#[derive(Debug, Deserialize)]
struct ChallengeResponse {
    challenge: ChallengeBody,
}

#[derive(Debug, Deserialize)]
struct ChallengeBody {
    url: String,
}

/// Lichess open-challenge client
pub struct LichessClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl LichessClient {
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    pub fn from_config(config: &ChallengeConfig, token: Option<String>) -> Self {
        Self::new(&config.base_url, token)
    }

    fn authorized(&self, builder: reqwest::blocking::RequestBuilder) -> reqwest::blocking::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

impl ChallengeService for LichessClient {
    fn create_challenge(&self, request: &ChallengeRequest) -> Result<String> {
        let url = format!("{}/api/challenge/open", self.base_url);
        let form = [
            ("clock.limit", request.clock_secs.to_string()),
            ("clock.increment", request.increment_secs.to_string()),
            ("variant", request.variant.clone()),
            ("rated", request.rated.to_string()),
            ("name", request.title()),
            ("users", format!("{},{}", request.white_handle, request.black_handle)),
            ("expiresAt", request.expires.timestamp_millis().to_string()),
        ];

        let response = self.authorized(self.client.post(&url)).form(&form).send()?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().unwrap_or_default();
            return Err(TournamentError::Api { status, body });
        }

        let created: ChallengeResponse = response.json()?;
        info!(url = %created.challenge.url, white = %request.white_name, black = %request.black_name, "challenge created");
        Ok(created.challenge.url)
    }

    fn fetch_result(&self, match_link: &str) -> Result<Outcome> {
        let Some(game_id) = game_id(match_link) else {
            return Ok(Outcome::Pending);
        };
        let url = format!("{}/game/export/{}", self.base_url, game_id);

        let response = self.authorized(self.client.get(&url)).send()?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!(game_id, "game not started yet");
            return Ok(Outcome::Pending);
        }
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().unwrap_or_default();
            return Err(TournamentError::Api { status, body });
        }

        Ok(outcome_from_pgn(&response.text()?))
    }
}

/// Game id from a game or challenge URL: the first path segment
pub fn game_id(match_link: &str) -> Option<&str> {
    let path = match_link.split_once("://").map_or(match_link, |(_, rest)| rest);
    let id = path.split('/').nth(1)?.split(['?', '#']).next()?;
    (!id.is_empty()).then_some(id)
}

/// Outcome from the PGN `Result` tag; unfinished games are pending
pub fn outcome_from_pgn(pgn: &str) -> Outcome {
    let result = pgn
        .lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix("[Result \""))
        .and_then(|rest| rest.split('"').next());

    match result {
        Some("1-0") => Outcome::White,
        Some("0-1") => Outcome::Black,
        Some("1/2-1/2") => Outcome::Draw,
        _ => Outcome::Pending,
    }
}

/// One second before local midnight, `days` calendar days after the most
/// recent midnight in `timezone`. Daylight saving changes in between shift the
/// offset, not the wall-clock time.
pub fn expires_at(now: DateTime<Utc>, days: u32, timezone: Tz) -> DateTime<FixedOffset> {
    let today = now.with_timezone(&timezone).date_naive();
    let end_of_day =
        (today + Duration::days(i64::from(days))).and_time(NaiveTime::MIN) - Duration::seconds(1);

    let expires = match timezone.from_local_datetime(&end_of_day) {
        LocalResult::Single(t) => t,
        LocalResult::Ambiguous(_, later) => later,
        // Skipped by a clock change; read the wall time as UTC
        LocalResult::None => timezone.from_utc_datetime(&end_of_day),
    };
    expires.with_timezone(&expires.offset().fix())
}

#[cfg(test)]
#[path = "challenge_tests.rs"]
mod challenge_tests;
