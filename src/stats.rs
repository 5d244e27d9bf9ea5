use crate::app_dirs::AppDirs;
use chrono::{DateTime, Local};
use itertools::Itertools;
use rusqlite::{params, Connection, Result};
use std::path::{Path, PathBuf};

/// One landed whack, as persisted.
#[derive(Debug, Clone)]
pub struct WhackRecord {
    pub character: String,
    pub points: u32,
    pub timestamp: DateTime<Local>,
}

/// One finished session, as persisted.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub difficulty: String,
    pub duration_secs: u64,
    pub score: u32,
    pub hits: u32,
    pub appearances: u32,
    pub played_at: DateTime<Local>,
}

/// Per-character aggregate for the game-over screen.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterSummary {
    pub character: String,
    pub hits: i64,
    pub points: i64,
}

/// Database manager for whack and session history
#[derive(Debug)]
pub struct StatsDb {
    conn: Connection,
}

impl StatsDb {
    /// Initialize the database connection and create tables if needed
    pub fn new() -> Result<Self> {
        let db_path = AppDirs::db_path().unwrap_or_else(|| PathBuf::from("whackr_stats.db"));
        Self::open(&db_path)
    }

    /// Open a database at an explicit path (used by tests).
    pub fn with_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open(path.as_ref())
    }

    fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CANTOPEN),
                    Some(format!("Failed to create directory: {}", e)),
                )
            })?;
        }

        let conn = Connection::open(db_path)?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS whacks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                character TEXT NOT NULL,
                points INTEGER NOT NULL,
                timestamp TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
            [],
        )?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                difficulty TEXT NOT NULL,
                duration_secs INTEGER NOT NULL,
                score INTEGER NOT NULL,
                hits INTEGER NOT NULL,
                appearances INTEGER NOT NULL,
                played_at TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_whacks_character ON whacks(character)",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_sessions_score ON sessions(score)",
            [],
        )?;

        Ok(StatsDb { conn })
    }

    /// Record a landed whack
    pub fn record_whack(&self, whack: &WhackRecord) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO whacks (character, points, timestamp)
            VALUES (?1, ?2, ?3)
            "#,
            params![whack.character, whack.points, whack.timestamp.to_rfc3339()],
        )?;

        Ok(())
    }

    /// Record a finished session
    pub fn record_session(&self, session: &SessionRecord) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO sessions (difficulty, duration_secs, score, hits, appearances, played_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                session.difficulty,
                session.duration_secs,
                session.score,
                session.hits,
                session.appearances,
                session.played_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    /// Highest score across all recorded sessions
    pub fn best_score(&self) -> Result<Option<u32>> {
        let mut stmt = self.conn.prepare("SELECT MAX(score) FROM sessions")?;
        let best: Option<u32> = stmt.query_row([], |row| row.get(0))?;
        Ok(best)
    }

    /// Number of recorded sessions
    pub fn session_count(&self) -> Result<i64> {
        let mut stmt = self.conn.prepare("SELECT COUNT(*) FROM sessions")?;
        let count: i64 = stmt.query_row([], |row| row.get(0))?;
        Ok(count)
    }

    /// Hit and point totals per character, most valuable first
    pub fn character_summary(&self) -> Result<Vec<CharacterSummary>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT character, COUNT(*) as hits, SUM(points) as points
            FROM whacks
            GROUP BY character
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(CharacterSummary {
                character: row.get(0)?,
                hits: row.get(1)?,
                points: row.get(2)?,
            })
        })?;

        let mut summary = Vec::new();
        for row in rows {
            summary.push(row?);
        }

        Ok(summary
            .into_iter()
            .sorted_by_key(|s| std::cmp::Reverse(s.points))
            .collect())
    }
}
