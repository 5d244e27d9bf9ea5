// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod audio;
pub mod board;
pub mod characters;
pub mod config;
pub mod difficulty;
pub mod game;
pub mod runtime;
pub mod session;
pub mod stats;
pub mod util;

/// Milliseconds per scheduler tick. Appearance deadlines and the 1-second
/// countdown both advance in units of this.
pub const TICK_RATE_MS: u64 = 100;
