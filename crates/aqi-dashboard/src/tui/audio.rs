//! Terminal audio cue for the color randomizer.

use std::io::{self, Write};

use aqi_core::{AudioCue, AudioError, Silent};
use tracing::trace;

const BEL: &[u8] = b"\x07";

/// Rings the terminal bell when a spin starts and again when it settles.
///
/// A terminal cannot change playback speed, so rate changes are ignored.
#[derive(Debug, Default)]
pub struct TerminalBell {
    playing: bool,
}

impl TerminalBell {
    pub fn new() -> Self {
        Self::default()
    }

    fn ring() -> Result<(), AudioError> {
        let mut out = io::stdout();
        out.write_all(BEL)
            .and_then(|()| out.flush())
            .map_err(|e| AudioError::Playback(e.to_string()))
    }
}

impl AudioCue for TerminalBell {
    fn start(&mut self) -> Result<(), AudioError> {
        Self::ring()?;
        self.playing = true;
        Ok(())
    }

    fn set_rate(&mut self, rate: f32) {
        trace!(rate, "Bell ignores playback rate");
    }

    fn stop(&mut self) {
        if std::mem::take(&mut self.playing) {
            // Closing chime is best effort
            let _ = Self::ring();
        }
    }
}

/// Audio back-end chosen by the `sound` setting.
pub fn audio_cue(sound: bool) -> Box<dyn AudioCue> {
    if sound {
        Box::new(TerminalBell::new())
    } else {
        Box::new(Silent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_without_start_is_quiet() {
        let mut bell = TerminalBell::new();
        bell.stop();
        assert!(!bell.playing);
    }

    #[test]
    fn test_start_then_stop() {
        let mut bell = TerminalBell::new();
        bell.start().unwrap();
        assert!(bell.playing);
        bell.set_rate(0.5);
        bell.stop();
        assert!(!bell.playing);
    }
}
