use crate::audio::{sink_for, AudioSink, Cue};
use crate::board::Board;
use crate::session::{SessionConfig, SessionState};
use crate::stats::{SessionRecord, StatsDb, WhackRecord};
use crate::TICK_RATE_MS;
use chrono::Local;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::time::SystemTime;

/// Appearance scheduler states.
///
/// Stopping is modelled as a terminal phase rather than a cancelled timer:
/// ticks delivered to an `Idle` or `Stopped` game are ignored, so a stray
/// late tick can never revive a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No session running.
    Idle,
    /// A target is up in `hole`; it retracts when `remaining_ms` drains.
    Showing { hole: usize, remaining_ms: u64 },
    /// Session over; countdown and appearances are dead.
    Stopped,
}

/// A whack-a-mole session: the board, the countdown, the score, and the
/// appearance scheduler driving them.
#[derive(Debug)]
pub struct Game {
    pub board: Board,
    pub session_config: SessionConfig,
    pub session_state: SessionState,
    pub phase: Phase,
    /// Milliseconds accumulated toward the next 1-second countdown step.
    countdown_acc_ms: u64,
    audio: Box<dyn AudioSink>,
    pub stats_db: Option<StatsDb>,
}

impl Game {
    pub fn new(session_config: SessionConfig) -> Self {
        let audio = sink_for(session_config.silent);
        let stats_db = StatsDb::new().ok();
        Self::with_parts(session_config, audio, stats_db)
    }

    /// Explicit wiring for tests and headless embedding.
    pub fn with_parts(
        session_config: SessionConfig,
        audio: Box<dyn AudioSink>,
        stats_db: Option<StatsDb>,
    ) -> Self {
        Self {
            board: Board::new(),
            session_config,
            session_state: SessionState::default(),
            phase: Phase::Idle,
            countdown_acc_ms: 0,
            audio,
            stats_db,
        }
    }

    /// Resets all session state and kicks off the first appearance and the
    /// countdown. Safe to call again after a session stopped.
    pub fn start(&mut self) {
        self.session_state.reset();
        self.board = Board::new();
        self.countdown_acc_ms = 0;
        self.session_state.seconds_remaining = self.session_config.duration_secs;
        self.session_state.started_at = Some(SystemTime::now());
        self.audio.play(Cue::MusicStart);
        self.show_up();
    }

    /// Chooses a delay and a hole and raises a fresh target.
    ///
    /// Every appearance redraws its own delay, so on hard the rhythm
    /// changes from target to target.
    pub fn show_up(&mut self) {
        let delay = self.session_config.difficulty.delay_ms();
        let hole = self.board.choose_hole();
        self.board.show(hole);
        self.session_state.appearances += 1;
        self.phase = Phase::Showing {
            hole,
            remaining_ms: delay,
        };
    }

    /// Advances the session by one tick (`TICK_RATE_MS`).
    ///
    /// Drives both timers: the 1-second countdown and the current
    /// appearance's deadline. When the deadline drains the target retracts;
    /// if the countdown still has time the next appearance is raised
    /// immediately, otherwise the session stops.
    pub fn on_tick(&mut self) {
        let Phase::Showing { hole, remaining_ms } = self.phase else {
            return;
        };

        self.countdown_acc_ms += TICK_RATE_MS;
        while self.countdown_acc_ms >= 1000 {
            self.countdown_acc_ms -= 1000;
            self.update_timer();
        }

        let remaining = remaining_ms.saturating_sub(TICK_RATE_MS);
        if remaining == 0 {
            self.board.hide(hole);
            if self.session_state.seconds_remaining > 0 {
                self.show_up();
            } else {
                self.stop();
            }
        } else {
            self.phase = Phase::Showing {
                hole,
                remaining_ms: remaining,
            };
        }
    }

    /// Handles a whack aimed at `target`.
    ///
    /// A whack lands only while the appearance in that hole is live; it
    /// swaps the sprite to the hit variant, plays the hit cue, and awards
    /// the bound point value. The target stays up (and stays whackable)
    /// until its deadline. `None` is the degenerate harness path and awards
    /// exactly 1 point.
    ///
    /// Returns the score after the whack.
    pub fn whack(&mut self, target: Option<usize>) -> u32 {
        let Some(index) = target else {
            return self.update_score(1);
        };

        if let Phase::Showing { hole, .. } = self.phase {
            if hole == index {
                if let Some(points) = self.board.register_hit(index) {
                    self.audio.play(Cue::Hit);
                    self.session_state.hits += 1;
                    if let (Some(db), Some(character)) =
                        (&self.stats_db, self.board.holes[index].character())
                    {
                        let _ = db.record_whack(&WhackRecord {
                            character: character.name.to_string(),
                            points,
                            timestamp: Local::now(),
                        });
                    }
                    return self.update_score(points);
                }
            }
        }

        self.session_state.score
    }

    /// Adds `increment` points and returns the new score.
    pub fn update_score(&mut self, increment: u32) -> u32 {
        self.session_state.score += increment;
        self.session_state.score
    }

    /// Resets the score to 0 and returns it.
    pub fn clear_score(&mut self) -> u32 {
        self.session_state.score = 0;
        self.session_state.score
    }

    /// Decrements the countdown by one second when above zero. Calling at
    /// zero is a no-op returning zero; the countdown never goes negative.
    pub fn update_timer(&mut self) -> u64 {
        if self.session_state.seconds_remaining > 0 {
            self.session_state.seconds_remaining -= 1;
        }
        self.session_state.seconds_remaining
    }

    /// Terminates the session: retracts everything, halts ambient audio,
    /// and persists the result. Controls re-enable once the game reports
    /// `has_finished`.
    pub fn stop(&mut self) {
        if self.phase == Phase::Stopped {
            return;
        }
        self.phase = Phase::Stopped;
        self.board.hide_all();
        self.audio.play(Cue::MusicStop);

        if let Some(ref db) = self.stats_db {
            let _ = db.record_session(&SessionRecord {
                difficulty: self.session_config.difficulty.to_string(),
                duration_secs: self.session_config.duration_secs,
                score: self.session_state.score,
                hits: self.session_state.hits,
                appearances: self.session_state.appearances,
                played_at: Local::now(),
            });
        }
        let _ = self.save_results();
    }

    /// Flips silent mode, swapping the audio sink accordingly.
    pub fn set_silent(&mut self, silent: bool) {
        self.session_config.silent = silent;
        self.audio = sink_for(silent);
    }

    pub fn has_started(&self) -> bool {
        self.session_state.started_at.is_some()
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Showing { .. })
    }

    pub fn has_finished(&self) -> bool {
        self.phase == Phase::Stopped
    }

    /// Best score from the stats database, if one is available.
    pub fn best_score(&self) -> Option<u32> {
        self.stats_db
            .as_ref()
            .and_then(|db| db.best_score().ok())
            .flatten()
    }

    /// Appends one CSV line per finished session to log.csv in the config
    /// directory.
    pub fn save_results(&self) -> io::Result<()> {
        if let Some(config_dir) = crate::app_dirs::AppDirs::config_dir() {
            let log_path = config_dir.join("log.csv");

            std::fs::create_dir_all(&config_dir)?;

            // If the log file doesn't exist, we need to emit a header
            let needs_header = !log_path.exists();

            let mut log_file = OpenOptions::new()
                .write(true)
                .append(true)
                .create(true)
                .open(log_path)?;

            if needs_header {
                writeln!(
                    log_file,
                    "date,difficulty,duration_secs,score,hits,appearances"
                )?;
            }

            writeln!(
                log_file,
                "{},{},{},{},{},{}",
                Local::now().format("%c"),
                self.session_config.difficulty,
                self.session_config.duration_secs,
                self.session_state.score,
                self.session_state.hits,
                self.session_state.appearances,
            )?;
        }

        Ok(())
    }
}
