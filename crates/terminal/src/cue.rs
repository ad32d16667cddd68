//! Audible result cues.

use std::io::Write;

/// Which sound accompanies a scan result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Success,
    Error,
}

/// Plays result cues on whatever audio path the terminal has.
///
/// Implementations must be cheap and non-blocking; the orchestrator
/// fires exactly one cue per scan result.
pub trait CuePlayer: Send + Sync {
    fn play(&self, cue: Cue);
}

/// Default player: rings the console bell and logs the cue.
#[derive(Debug, Default)]
pub struct ConsoleCue;

impl CuePlayer for ConsoleCue {
    fn play(&self, cue: Cue) {
        tracing::debug!(?cue, "Playing result cue");
        let mut stdout = std::io::stdout();
        let _ = stdout.write_all(b"\x07");
        let _ = stdout.flush();
    }
}
