//! Two-way mapping between typed records and sheet columns

use chrono::DateTime;
use pairing_core::{Experience, BYE_NAME};

use crate::error::{Result, TournamentError};
use crate::records::{MatchRecord, Opponent, Outcome, RosterEntry};
use crate::standings::Standings;
use crate::table::Table;

/// Columns of the roster / leaderboard sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterColumn {
    Player,
    Handle,
    Federation,
    Experience,
    Elo,
    Score,
}

impl RosterColumn {
    pub const ALL: [RosterColumn; 6] = [
        RosterColumn::Player,
        RosterColumn::Handle,
        RosterColumn::Federation,
        RosterColumn::Experience,
        RosterColumn::Elo,
        RosterColumn::Score,
    ];

    pub fn header(self) -> &'static str {
        match self {
            RosterColumn::Player => "Player",
            RosterColumn::Handle => "Lichess Handle",
            RosterColumn::Federation => "Federation",
            RosterColumn::Experience => "Experience",
            RosterColumn::Elo => "Elo",
            RosterColumn::Score => "Score",
        }
    }
}

/// Columns of the games sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamesColumn {
    Round,
    White,
    Black,
    ScoreDelta,
    GamesPlayed,
    MatchLink,
    Outcome,
    Expires,
}

impl GamesColumn {
    pub const ALL: [GamesColumn; 8] = [
        GamesColumn::Round,
        GamesColumn::White,
        GamesColumn::Black,
        GamesColumn::ScoreDelta,
        GamesColumn::GamesPlayed,
        GamesColumn::MatchLink,
        GamesColumn::Outcome,
        GamesColumn::Expires,
    ];

    pub fn header(self) -> &'static str {
        match self {
            GamesColumn::Round => "Round",
            GamesColumn::White => "White",
            GamesColumn::Black => "Black",
            GamesColumn::ScoreDelta => "Score Delta",
            GamesColumn::GamesPlayed => "Games Played",
            GamesColumn::MatchLink => "Match Link",
            GamesColumn::Outcome => "Outcome",
            GamesColumn::Expires => "Expires",
        }
    }
}

/// Column lookup that reports which sheet is missing what
struct Columns<'a> {
    sheet: &'a str,
    table: &'a Table,
}

impl<'a> Columns<'a> {
    fn require(&self, header: &str) -> Result<usize> {
        self.table
            .column(header)
            .ok_or_else(|| TournamentError::MissingColumn {
                sheet: self.sheet.to_string(),
                column: header.to_string(),
            })
    }

    fn bad(&self, row: usize, column: &str, value: &str) -> TournamentError {
        TournamentError::BadCell {
            sheet: self.sheet.to_string(),
            row,
            column: column.to_string(),
            value: value.to_string(),
        }
    }
}

fn optional(cell: &str) -> Option<String> {
    let cell = cell.trim();
    (!cell.is_empty()).then(|| cell.to_string())
}

fn optional_cell(table: &Table, row: usize, column: Option<usize>) -> &str {
    column.map(|c| table.cell(row, c).trim()).unwrap_or("")
}

/// Registered players, in sheet order. Elo and Score cells are ignored.
///
/// The bye placeholder's name is reserved and rejected in any letter case.
pub fn roster_from_table(sheet: &str, table: &Table) -> Result<Vec<RosterEntry>> {
    let cols = Columns { sheet, table };
    let player = cols.require(RosterColumn::Player.header())?;
    let handle = cols.require(RosterColumn::Handle.header())?;
    let federation = cols.require(RosterColumn::Federation.header())?;
    let experience = table.column(RosterColumn::Experience.header());

    let mut entries = Vec::with_capacity(table.len());
    for row in 0..table.len() {
        let name = table.cell(row, player).trim();
        if name.is_empty() {
            continue;
        }
        if name.eq_ignore_ascii_case(BYE_NAME) {
            return Err(cols.bad(row, RosterColumn::Player.header(), name));
        }

        let experience = match experience.map(|c| table.cell(row, c).trim()) {
            None | Some("") => Experience::default(),
            Some(value) => value
                .parse()
                .map_err(|_| cols.bad(row, RosterColumn::Experience.header(), value))?,
        };

        entries.push(RosterEntry {
            name: name.to_string(),
            handle: table.cell(row, handle).trim().to_string(),
            federation: optional(table.cell(row, federation)),
            experience,
        });
    }
    Ok(entries)
}

/// Leaderboard sheet contents, already in leaderboard order
pub fn leaderboard_table(standings: &Standings) -> Table {
    let headers: Vec<&str> = RosterColumn::ALL.iter().map(|c| c.header()).collect();
    let mut table = Table::new(&headers);
    for standing in standings.leaderboard() {
        let player = &standing.player;
        table.push(
            RosterColumn::ALL
                .iter()
                .map(|column| match column {
                    RosterColumn::Player => player.name.clone(),
                    RosterColumn::Handle => player.handle.clone(),
                    RosterColumn::Federation => player.federation.clone().unwrap_or_default(),
                    RosterColumn::Experience => player.experience.label().to_string(),
                    RosterColumn::Elo => format!("{:.1}", player.rating),
                    RosterColumn::Score => player.score.to_string(),
                })
                .collect(),
        );
    }
    table
}

/// Match history, in sheet order
pub fn matches_from_table(sheet: &str, table: &Table) -> Result<Vec<MatchRecord>> {
    let cols = Columns { sheet, table };
    let round = cols.require(GamesColumn::Round.header())?;
    let white = cols.require(GamesColumn::White.header())?;
    let black = cols.require(GamesColumn::Black.header())?;
    let outcome = cols.require(GamesColumn::Outcome.header())?;
    let score_delta = table.column(GamesColumn::ScoreDelta.header());
    let games_played = table.column(GamesColumn::GamesPlayed.header());
    let match_link = table.column(GamesColumn::MatchLink.header());
    let expires = table.column(GamesColumn::Expires.header());

    let mut matches = Vec::with_capacity(table.len());
    for row in 0..table.len() {
        let round_cell = table.cell(row, round).trim();
        if round_cell.is_empty() {
            continue;
        }
        let round_num = round_cell
            .parse::<u32>()
            .map_err(|_| cols.bad(row, GamesColumn::Round.header(), round_cell))?;

        let black_cell = table.cell(row, black).trim();
        let black = if black_cell == BYE_NAME {
            Opponent::Bye
        } else {
            Opponent::Player(black_cell.to_string())
        };

        let outcome_cell = table.cell(row, outcome);
        let outcome = Outcome::parse(outcome_cell)
            .ok_or_else(|| cols.bad(row, GamesColumn::Outcome.header(), outcome_cell))?;

        let delta_cell = optional_cell(table, row, score_delta);
        let score_delta = if delta_cell.is_empty() {
            0.0
        } else {
            delta_cell
                .parse::<f64>()
                .map_err(|_| cols.bad(row, GamesColumn::ScoreDelta.header(), delta_cell))?
        };

        let played_cell = optional_cell(table, row, games_played);
        let games_played = if played_cell.is_empty() {
            0
        } else {
            played_cell
                .parse::<u32>()
                .map_err(|_| cols.bad(row, GamesColumn::GamesPlayed.header(), played_cell))?
        };

        let expires_cell = optional_cell(table, row, expires);
        let expires = if expires_cell.is_empty() {
            None
        } else {
            Some(
                DateTime::parse_from_rfc3339(expires_cell)
                    .map_err(|_| cols.bad(row, GamesColumn::Expires.header(), expires_cell))?,
            )
        };

        matches.push(MatchRecord {
            round: round_num,
            white: table.cell(row, white).trim().to_string(),
            black,
            score_delta,
            games_played,
            match_link: optional(optional_cell(table, row, match_link)),
            expires,
            outcome,
        });
    }
    Ok(matches)
}

/// Games sheet contents for `matches`
pub fn matches_table(matches: &[MatchRecord]) -> Table {
    let headers: Vec<&str> = GamesColumn::ALL.iter().map(|c| c.header()).collect();
    let mut table = Table::new(&headers);
    for record in matches {
        table.push(
            GamesColumn::ALL
                .iter()
                .map(|column| match column {
                    GamesColumn::Round => record.round.to_string(),
                    GamesColumn::White => record.white.clone(),
                    GamesColumn::Black => record.black.name().to_string(),
                    GamesColumn::ScoreDelta => record.score_delta.to_string(),
                    GamesColumn::GamesPlayed => record.games_played.to_string(),
                    GamesColumn::MatchLink => record.match_link.clone().unwrap_or_default(),
                    GamesColumn::Outcome => record.outcome.label().to_string(),
                    GamesColumn::Expires => record
                        .expires
                        .map(|e| e.to_rfc3339())
                        .unwrap_or_default(),
                })
                .collect(),
        );
    }
    table
}

#[cfg(test)]
#[path = "sheets_tests.rs"]
mod sheets_tests;
