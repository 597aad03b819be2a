use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Instant;

use thiserror::Error;
use tracing::{error, info};

use crate::http_client::http_client;
use crate::raw_table::{RawTable, parse_csv};
use crate::session::Session;
use crate::state::Delta;

const DATASET_BASE_URL: &str =
    "https://raw.githubusercontent.com/Rohanr14/PremierLeagueDissection/main";
const MATCHES_FILE: &str = "premier-league-matches-92-23.csv";
const STANDINGS_FILE: &str = "premier-league-standings-92-23.csv";
const SCORERS_FILE: &str = "premier-league-top5-scorers-92-23.csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Matches,
    Standings,
    Scorers,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TableKind::Matches => "matches",
            TableKind::Standings => "standings",
            TableKind::Scorers => "scorers",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSource {
    Url(String),
    Path(PathBuf),
}

impl TableSource {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            TableSource::Url(trimmed.to_string())
        } else {
            TableSource::Path(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Display for TableSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableSource::Url(url) => f.write_str(url),
            TableSource::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sources {
    pub matches: TableSource,
    pub standings: TableSource,
    pub scorers: TableSource,
}

impl Sources {
    pub fn remote_defaults() -> Self {
        Self {
            matches: TableSource::Url(format!("{DATASET_BASE_URL}/{MATCHES_FILE}")),
            standings: TableSource::Url(format!("{DATASET_BASE_URL}/{STANDINGS_FILE}")),
            scorers: TableSource::Url(format!("{DATASET_BASE_URL}/{SCORERS_FILE}")),
        }
    }

    pub fn from_dir(dir: &Path) -> Self {
        Self {
            matches: TableSource::Path(dir.join(MATCHES_FILE)),
            standings: TableSource::Path(dir.join(STANDINGS_FILE)),
            scorers: TableSource::Path(dir.join(SCORERS_FILE)),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{table} table: cannot read {path:?}: {source}")]
    Io {
        table: TableKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{table} table: request to {url} failed: {source}")]
    Http {
        table: TableKind,
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{table} table: {url} answered http {status}")]
    Status {
        table: TableKind,
        url: String,
        status: u16,
    },
    #[error("{table} table: http client unavailable: {reason}")]
    Client { table: TableKind, reason: String },
    #[error("{table} table: invalid csv: {source}")]
    Csv {
        table: TableKind,
        #[source]
        source: csv::Error,
    },
    #[error("{table} table has no data rows")]
    Empty { table: TableKind },
}

impl LoadError {
    pub fn table(&self) -> TableKind {
        match self {
            LoadError::Io { table, .. }
            | LoadError::Http { table, .. }
            | LoadError::Status { table, .. }
            | LoadError::Client { table, .. }
            | LoadError::Csv { table, .. }
            | LoadError::Empty { table } => *table,
        }
    }
}

fn fetch_text(table: TableKind, source: &TableSource) -> Result<String, LoadError> {
    match source {
        TableSource::Path(path) => fs::read_to_string(path).map_err(|source| LoadError::Io {
            table,
            path: path.clone(),
            source,
        }),
        TableSource::Url(url) => {
            let client = http_client().map_err(|err| LoadError::Client {
                table,
                reason: format!("{err:#}"),
            })?;
            let http_err = |source: reqwest::Error| LoadError::Http {
                table,
                url: url.clone(),
                source,
            };
            let resp = client.get(url).send().map_err(http_err)?;
            let status = resp.status();
            if !status.is_success() {
                return Err(LoadError::Status {
                    table,
                    url: url.clone(),
                    status: status.as_u16(),
                });
            }
            resp.text().map_err(http_err)
        }
    }
}

pub fn load_table(table: TableKind, source: &TableSource) -> Result<RawTable, LoadError> {
    let started = Instant::now();
    let text = fetch_text(table, source)?;
    let parsed = parse_csv(&text).map_err(|source| LoadError::Csv { table, source })?;
    if parsed.is_empty() {
        return Err(LoadError::Empty { table });
    }
    info!(
        %table,
        %source,
        rows = parsed.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "table loaded"
    );
    Ok(parsed)
}

/// Fetches all three tables concurrently and only builds a session once every
/// one of them has arrived. The first failure (in table order) is returned.
pub fn load_session(sources: &Sources) -> Result<Session, LoadError> {
    let (matches, (standings, scorers)) = rayon::join(
        || load_table(TableKind::Matches, &sources.matches),
        || {
            rayon::join(
                || load_table(TableKind::Standings, &sources.standings),
                || load_table(TableKind::Scorers, &sources.scorers),
            )
        },
    );
    let matches = matches?;
    let standings = standings?;
    let scorers = scorers?;
    Ok(Session::from_tables(&matches, &standings, &scorers))
}

pub fn spawn_loader(sources: Sources, tx: Sender<Delta>) {
    thread::spawn(move || {
        let _ = tx.send(Delta::Log("[INFO] Loading matches, standings and scorers".to_string()));
        match load_session(&sources) {
            Ok(session) => {
                let summary = format!(
                    "[INFO] Loaded {} matches, {} standings, {} scorer rows ({} fields unreadable)",
                    session.matches().len(),
                    session.standings().len(),
                    session.scorers().len(),
                    session.issues().total()
                );
                let _ = tx.send(Delta::Log(summary));
                let bad_dates = session.issues().bad_dates();
                if bad_dates > 0 {
                    let _ = tx.send(Delta::Log(format!(
                        "[WARN] {bad_dates} match dates could not be read"
                    )));
                }
                let _ = tx.send(Delta::Loaded(Arc::new(session)));
            }
            Err(err) => {
                error!(error = %err, table = %err.table(), "data load failed");
                let _ = tx.send(Delta::LoadFailed(err.to_string()));
            }
        }
    });
}
