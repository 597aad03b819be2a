use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;

use crate::loader::{Sources, TableSource};
use crate::scenes::StoryParams;

/// Guided tour of three decades of Premier League numbers.
#[derive(Parser, Debug, Clone)]
#[command(name = "pl_story", version, about)]
pub struct Config {
    /// Match results table (URL or path)
    #[arg(long, env = "PL_MATCHES_SRC")]
    pub matches: Option<String>,

    /// Final standings table (URL or path)
    #[arg(long, env = "PL_STANDINGS_SRC")]
    pub standings: Option<String>,

    /// Top scorers table (URL or path)
    #[arg(long, env = "PL_SCORERS_SRC")]
    pub scorers: Option<String>,

    /// Directory holding all three CSV files under their published names
    #[arg(long, env = "PL_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Fewest teams a season may have and still appear in trend charts
    #[arg(long, env = "PL_MIN_TEAMS", default_value_t = 19)]
    pub min_teams: usize,

    /// Most teams a season may have and still appear in trend charts
    #[arg(long, env = "PL_MAX_TEAMS", default_value_t = 23)]
    pub max_teams: usize,

    /// Players listed in the goal-contribution ranking
    #[arg(long, env = "PL_TOP_PLAYERS", default_value_t = 10)]
    pub top_players: usize,

    /// Seasons considered "recent" when picking the most competitive one
    #[arg(long, env = "PL_RECENT_SEASONS", default_value_t = 10)]
    pub recent_seasons: usize,

    /// Log file for the terminal front-end
    #[arg(long, env = "PL_LOG_FILE", default_value = "pl_story.log")]
    pub log_file: PathBuf,
}

impl Config {
    /// Reads `.env.local` / `.env` before parsing so either can supply values.
    pub fn load() -> Self {
        load_dotenv();
        Self::parse()
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_teams > self.max_teams {
            bail!(
                "min teams ({}) is above max teams ({})",
                self.min_teams,
                self.max_teams
            );
        }
        if self.top_players == 0 {
            bail!("top players must be at least 1");
        }
        if self.recent_seasons == 0 {
            bail!("recent seasons must be at least 1");
        }
        Ok(())
    }

    /// Explicit per-table sources win over `data_dir`, which wins over the
    /// published remote copies.
    pub fn sources(&self) -> Sources {
        let base = match &self.data_dir {
            Some(dir) => Sources::from_dir(dir),
            None => Sources::remote_defaults(),
        };
        Sources {
            matches: self
                .matches
                .as_deref()
                .map(TableSource::parse)
                .unwrap_or(base.matches),
            standings: self
                .standings
                .as_deref()
                .map(TableSource::parse)
                .unwrap_or(base.standings),
            scorers: self
                .scorers
                .as_deref()
                .map(TableSource::parse)
                .unwrap_or(base.scorers),
        }
    }

    pub fn story_params(&self) -> StoryParams {
        StoryParams {
            team_range: self.min_teams..=self.max_teams,
            top_players: self.top_players,
            recent_seasons: self.recent_seasons,
        }
    }
}

pub fn load_dotenv() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;

    use super::Config;
    use crate::loader::TableSource;

    #[test]
    fn explicit_source_overrides_data_dir() {
        let cfg = Config::try_parse_from([
            "pl_story",
            "--data-dir",
            "data",
            "--scorers",
            "https://example.com/scorers.csv",
        ])
        .expect("args should parse");
        let sources = cfg.sources();
        assert_eq!(
            sources.matches,
            TableSource::Path(PathBuf::from("data/premier-league-matches-92-23.csv"))
        );
        assert_eq!(
            sources.scorers,
            TableSource::Url("https://example.com/scorers.csv".to_string())
        );
    }

    #[test]
    fn inverted_team_range_is_rejected() {
        let cfg = Config::try_parse_from(["pl_story", "--min-teams", "24", "--max-teams", "20"])
            .expect("args should parse");
        assert!(cfg.validate().is_err());
    }
}
