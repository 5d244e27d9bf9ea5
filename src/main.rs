mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Duration,
};
use whackr::{
    config::{Config, ConfigStore, FileConfigStore},
    difficulty::Difficulty,
    game::Game,
    runtime::{CrosstermEventSource, FixedTicker, GameEvent, Runner},
    session::SessionConfig,
    stats::{CharacterSummary, StatsDb},
    TICK_RATE_MS,
};

const MIN_DURATION_SECS: u64 = 5;
const MAX_DURATION_SECS: u64 = 120;
const DURATION_STEP_SECS: u64 = 5;

/// terminal whack-a-mole with difficulty-scaled reaction timing
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Targets pop out of a 3x3 grid of holes; whack them with the 1-9 keys before they duck back down. Difficulty controls how long each one stays up."
)]
pub struct Cli {
    /// difficulty of the session (overrides the saved config)
    #[clap(short, long, value_enum)]
    difficulty: Option<Difficulty>,

    /// session length in seconds (overrides the saved config)
    #[clap(short = 's', long)]
    seconds: Option<u64>,

    /// suppress every sound cue
    #[clap(long)]
    silent: bool,

    /// print the best recorded score and exit
    #[clap(long)]
    best: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Menu,
    Playing,
    GameOver,
}

#[derive(Debug)]
pub struct App {
    pub game: Game,
    pub state: AppState,
    /// Snapshots taken when a session ends, so the game-over screen does
    /// not hit the stats database on every frame.
    pub game_over_best: Option<u32>,
    pub game_over_summary: Vec<CharacterSummary>,
    store: Option<FileConfigStore>,
}

impl App {
    pub fn new(session_config: SessionConfig) -> Self {
        Self {
            game: Game::new(session_config),
            state: AppState::Menu,
            game_over_best: None,
            game_over_summary: Vec::new(),
            store: None,
        }
    }

    pub fn with_store(session_config: SessionConfig, store: FileConfigStore) -> Self {
        Self {
            store: Some(store),
            ..Self::new(session_config)
        }
    }

    pub fn start_session(&mut self) {
        self.game.start();
        self.state = AppState::Playing;
    }

    /// Moves to the game-over screen, snapshotting history for display.
    pub fn finish_session(&mut self) {
        self.game_over_best = self.game.best_score();
        self.game_over_summary = self
            .game
            .stats_db
            .as_ref()
            .and_then(|db| db.character_summary().ok())
            .unwrap_or_default();
        self.state = AppState::GameOver;
    }

    fn persist_config(&self) {
        if let Some(ref store) = self.store {
            let _ = store.save(&Config::from_session_config(&self.game.session_config));
        }
    }

    /// Menu-only settings mutations. Ignored while a session runs, which is
    /// what disables the difficulty/duration controls during play.
    pub fn handle_menu_key(&mut self, code: KeyCode) {
        let config = &mut self.game.session_config;
        match code {
            KeyCode::Left => {
                config.difficulty = config.difficulty.prev();
            }
            KeyCode::Right | KeyCode::Char('d') => {
                config.difficulty = config.difficulty.next();
            }
            KeyCode::Up => {
                config.duration_secs =
                    (config.duration_secs + DURATION_STEP_SECS).min(MAX_DURATION_SECS);
            }
            KeyCode::Down => {
                config.duration_secs = config
                    .duration_secs
                    .saturating_sub(DURATION_STEP_SECS)
                    .max(MIN_DURATION_SECS);
            }
            KeyCode::Char('s') => {
                let silent = !config.silent;
                self.game.set_silent(silent);
            }
            _ => return,
        }
        self.persist_config();
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if cli.best {
        return print_best();
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let stored = store.load();
    let mut session_config = stored
        .to_session_config()
        .map_err(|e| format!("invalid difficulty {:?} in config: {}", stored.difficulty, e))?;

    if let Some(difficulty) = cli.difficulty {
        session_config.difficulty = difficulty;
    }
    if let Some(seconds) = cli.seconds {
        session_config.duration_secs = seconds.clamp(MIN_DURATION_SECS, MAX_DURATION_SECS);
    }
    if cli.silent {
        session_config.silent = true;
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::with_store(session_config, store);
    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn print_best() -> Result<(), Box<dyn Error>> {
    let db = StatsDb::new()?;
    match db.best_score()? {
        Some(best) => println!(
            "best score: {} across {} sessions",
            best,
            db.session_count()?
        ),
        None => println!("no sessions recorded yet"),
    }
    Ok(())
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    loop {
        terminal.draw(|f| ui(app, f))?;

        match runner.step() {
            GameEvent::Tick => {
                if app.state == AppState::Playing {
                    app.game.on_tick();
                    if app.game.has_finished() {
                        app.finish_session();
                    }
                }
            }
            GameEvent::Resize => {}
            GameEvent::Key(key) => {
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.code == KeyCode::Char('c')
                {
                    break;
                }

                match app.state {
                    AppState::Menu => match key.code {
                        KeyCode::Esc => break,
                        KeyCode::Enter | KeyCode::Char(' ') => app.start_session(),
                        code => app.handle_menu_key(code),
                    },
                    AppState::Playing => match key.code {
                        KeyCode::Esc => {
                            app.game.stop();
                            app.finish_session();
                        }
                        KeyCode::Char(c @ '1'..='9') => {
                            let hole = c as usize - '1' as usize;
                            app.game.whack(Some(hole));
                        }
                        _ => {}
                    },
                    AppState::GameOver => match key.code {
                        KeyCode::Esc => break,
                        KeyCode::Char('r') | KeyCode::Enter => app.start_session(),
                        KeyCode::Char('m') => app.state = AppState::Menu,
                        _ => {}
                    },
                }
            }
        }
    }

    Ok(())
}

fn ui(app: &mut App, f: &mut Frame) {
    f.render_widget(&*app, f.area());
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use whackr::audio::SilentSink;
    use whackr::game::Phase;

    fn test_app(difficulty: Difficulty, duration_secs: u64) -> App {
        let session_config = SessionConfig {
            difficulty,
            duration_secs,
            silent: true,
        };
        App {
            game: Game::with_parts(session_config, Box::new(SilentSink), None),
            state: AppState::Menu,
            game_over_best: None,
            game_over_summary: Vec::new(),
            store: None,
        }
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["whackr"]);

        assert_eq!(cli.difficulty, None);
        assert_eq!(cli.seconds, None);
        assert!(!cli.silent);
        assert!(!cli.best);
    }

    #[test]
    fn test_cli_difficulty() {
        let cli = Cli::parse_from(["whackr", "-d", "hard"]);
        assert_eq!(cli.difficulty, Some(Difficulty::Hard));

        let cli = Cli::parse_from(["whackr", "--difficulty", "normal"]);
        assert_eq!(cli.difficulty, Some(Difficulty::Normal));
    }

    #[test]
    fn test_cli_seconds() {
        let cli = Cli::parse_from(["whackr", "-s", "60"]);
        assert_eq!(cli.seconds, Some(60));

        let cli = Cli::parse_from(["whackr", "--seconds", "45"]);
        assert_eq!(cli.seconds, Some(45));
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from(["whackr", "--silent", "--best"]);
        assert!(cli.silent);
        assert!(cli.best);
    }

    #[test]
    fn test_cli_rejects_unknown_difficulty() {
        assert!(Cli::try_parse_from(["whackr", "-d", "nightmare"]).is_err());
    }

    #[test]
    fn test_app_starts_in_menu() {
        let app = test_app(Difficulty::Easy, 10);
        assert_eq!(app.state, AppState::Menu);
        assert!(!app.game.has_started());
    }

    #[test]
    fn test_start_session_enters_playing() {
        let mut app = test_app(Difficulty::Easy, 10);
        app.start_session();
        assert_eq!(app.state, AppState::Playing);
        assert!(app.game.is_running());
        assert_eq!(app.game.session_state.seconds_remaining, 10);
    }

    #[test]
    fn test_finish_session_enters_game_over() {
        let mut app = test_app(Difficulty::Normal, 5);
        app.start_session();
        app.game.stop();
        app.finish_session();
        assert_eq!(app.state, AppState::GameOver);
        // No stats db wired in tests, so no history to show.
        assert_eq!(app.game_over_best, None);
        assert!(app.game_over_summary.is_empty());
    }

    #[test]
    fn test_menu_difficulty_cycling() {
        let mut app = test_app(Difficulty::Easy, 10);
        app.handle_menu_key(KeyCode::Right);
        assert_eq!(app.game.session_config.difficulty, Difficulty::Normal);
        app.handle_menu_key(KeyCode::Right);
        assert_eq!(app.game.session_config.difficulty, Difficulty::Hard);
        app.handle_menu_key(KeyCode::Left);
        assert_eq!(app.game.session_config.difficulty, Difficulty::Normal);
    }

    #[test]
    fn test_menu_duration_clamps() {
        let mut app = test_app(Difficulty::Easy, MAX_DURATION_SECS);
        app.handle_menu_key(KeyCode::Up);
        assert_eq!(app.game.session_config.duration_secs, MAX_DURATION_SECS);

        app.game.session_config.duration_secs = MIN_DURATION_SECS;
        app.handle_menu_key(KeyCode::Down);
        assert_eq!(app.game.session_config.duration_secs, MIN_DURATION_SECS);

        app.game.session_config.duration_secs = 30;
        app.handle_menu_key(KeyCode::Down);
        assert_eq!(app.game.session_config.duration_secs, 25);
    }

    #[test]
    fn test_menu_sound_toggle() {
        let mut app = test_app(Difficulty::Easy, 10);
        assert!(app.game.session_config.silent);
        app.handle_menu_key(KeyCode::Char('s'));
        assert!(!app.game.session_config.silent);
        app.handle_menu_key(KeyCode::Char('s'));
        assert!(app.game.session_config.silent);
    }

    #[test]
    fn test_restart_from_game_over() {
        let mut app = test_app(Difficulty::Normal, 5);
        app.start_session();
        app.game.whack(None);
        app.game.stop();
        app.finish_session();

        app.start_session();
        assert_eq!(app.state, AppState::Playing);
        assert_eq!(app.game.session_state.score, 0);
    }

    #[test]
    fn test_ui_menu_renders_settings() {
        use ratatui::{backend::TestBackend, Terminal};

        let mut app = test_app(Difficulty::Hard, 45);
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal.draw(|f| ui(&mut app, f)).unwrap();

        let buffer = terminal.backend().buffer();
        let content: String = buffer.content.iter().map(|c| c.symbol()).collect();
        assert!(content.contains("W H A C K R"));
        assert!(content.contains("hard"));
        assert!(content.contains("45s"));
    }

    #[test]
    fn test_ui_playing_shows_countdown_and_score() {
        use ratatui::{backend::TestBackend, Terminal};

        let mut app = test_app(Difficulty::Easy, 10);
        app.start_session();

        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| ui(&mut app, f)).unwrap();

        let buffer = terminal.backend().buffer();
        let content: String = buffer.content.iter().map(|c| c.symbol()).collect();
        assert!(content.contains("score"));
        assert!(content.contains("10s"), "countdown should display 10s");
        assert!(content.contains("easy"));
    }

    #[test]
    fn test_ui_playing_shows_live_sprite() {
        use ratatui::{backend::TestBackend, Terminal};

        let mut app = test_app(Difficulty::Easy, 10);
        app.start_session();
        let hole = match app.game.phase {
            Phase::Showing { hole, .. } => hole,
            _ => panic!("not showing"),
        };
        let sprite = app.game.board.holes[hole].character().unwrap().idle_sprite;

        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| ui(&mut app, f)).unwrap();

        let buffer = terminal.backend().buffer();
        let content: String = buffer.content.iter().map(|c| c.symbol()).collect();
        assert!(content.contains(sprite));
    }

    #[test]
    fn test_ui_game_over_renders_final_score() {
        use ratatui::{backend::TestBackend, Terminal};

        let mut app = test_app(Difficulty::Easy, 10);
        app.start_session();
        app.game.update_score(7);
        app.game.stop();
        app.finish_session();

        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| ui(&mut app, f)).unwrap();

        let buffer = terminal.backend().buffer();
        let content: String = buffer.content.iter().map(|c| c.symbol()).collect();
        assert!(content.contains("GAME OVER"));
        assert!(content.contains('7'));
    }

    #[test]
    fn test_duration_constants_are_sane() {
        const _: () = assert!(MIN_DURATION_SECS < MAX_DURATION_SECS);
        const _: () = assert!(DURATION_STEP_SECS > 0);
    }
}
