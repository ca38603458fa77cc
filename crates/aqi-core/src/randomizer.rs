//! Slot-machine style accent color randomizer.
//!
//! A spin highlights a random palette entry on every tick, slows its audio
//! cue down over the last ticks, then commits one uniformly random final
//! color after a short settle delay.
//!
//! The picker holds no timers of its own. The owner calls
//! [`ColorPicker::advance`] with the current instant (the TUI does so on
//! every frame) and the picker processes whatever deadlines have passed.
//!
//! ```text
//!   spin()                 35 ticks                      +200 ms
//! Idle ----> Spinning [tick, tick, ..., tick] ----> Settling ----> Idle
//!             audio rate 1.0 ......... 0.5                  commit(color)
//! ```

use std::time::{Duration, Instant};

use aqi_types::{PALETTE_SIZE, PaletteColor};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

/// Length of the audio cue.
pub const AUDIO_DURATION: Duration = Duration::from_millis(4275);

/// Pause between the last tick and the final selection.
pub const FINAL_DELAY: Duration = Duration::from_millis(200);

/// Time spent cycling through highlights.
pub const ANIMATION_DURATION: Duration = Duration::from_millis(4275 - 200);

/// Number of highlight ticks per spin.
pub const MAX_TICKS: u32 = 35;

/// Tick from which the audio cue starts slowing down (70% of the ticks).
pub const SLOWDOWN_START: u32 = MAX_TICKS * 7 / 10;

/// Time between highlight ticks.
pub const TICK_PERIOD: Duration = Duration::from_nanos(4_075_000_000 / MAX_TICKS as u64);

/// Error type for picker operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PickerError {
    /// Manual selection is locked while a spin is running.
    #[error("Color selection is locked while the randomizer is spinning")]
    Spinning,
}

/// Error type for audio back-ends.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AudioError {
    /// The output device could not be used.
    #[error("Audio output unavailable: {0}")]
    Unavailable(String),

    /// Playback failed.
    #[error("Audio playback failed: {0}")]
    Playback(String),
}

/// An audio cue that accompanies a spin.
pub trait AudioCue: Send {
    /// Start playback from the beginning at rate 1.0.
    fn start(&mut self) -> Result<(), AudioError>;

    /// Change the playback rate (1.0 is normal speed).
    fn set_rate(&mut self, rate: f32);

    /// Stop playback and reset the rate to 1.0.
    fn stop(&mut self);
}

impl<A: AudioCue + ?Sized> AudioCue for Box<A> {
    fn start(&mut self) -> Result<(), AudioError> {
        (**self).start()
    }

    fn set_rate(&mut self, rate: f32) {
        (**self).set_rate(rate);
    }

    fn stop(&mut self) {
        (**self).stop();
    }
}

/// Audio back-end that plays nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl AudioCue for Silent {
    fn start(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    fn set_rate(&mut self, _rate: f32) {}

    fn stop(&mut self) {}
}

/// Playback rate after `tick` ticks.
///
/// Stays at 1.0 until [`SLOWDOWN_START`], then falls linearly toward 0.5.
#[must_use]
pub fn playback_rate(tick: u32) -> f32 {
    if tick < SLOWDOWN_START {
        return 1.0;
    }
    let progress = (tick - SLOWDOWN_START) as f32 / (MAX_TICKS - SLOWDOWN_START) as f32;
    1.0 - 0.5 * progress.min(1.0)
}

#[derive(Debug)]
struct Spin {
    started_at: Instant,
    ticks: u32,
    highlight: Option<PaletteColor>,
    final_color: PaletteColor,
    audio_playing: bool,
}

impl Spin {
    fn next_tick_at(&self) -> Instant {
        self.started_at + TICK_PERIOD * (self.ticks + 1)
    }

    fn commit_at(&self) -> Instant {
        self.started_at + TICK_PERIOD * MAX_TICKS + FINAL_DELAY
    }

    fn audio_stop_at(&self) -> Instant {
        self.started_at + AUDIO_DURATION
    }
}

/// Accent color state with its randomizer.
///
/// # Example
///
/// ```
/// use std::time::{Duration, Instant};
/// use aqi_core::randomizer::{ColorPicker, Silent};
///
/// let mut picker = ColorPicker::new(Silent);
/// let start = Instant::now();
/// assert!(picker.spin(start));
/// assert!(!picker.spin(start)); // already spinning
///
/// let committed = picker.advance(start + Duration::from_secs(5));
/// assert_eq!(committed, Some(picker.selected()));
/// assert!(!picker.is_spinning());
/// ```
pub struct ColorPicker<A: AudioCue = Box<dyn AudioCue>, R: Rng = StdRng> {
    selected: PaletteColor,
    spin: Option<Spin>,
    audio: A,
    rng: R,
}

impl<A: AudioCue> ColorPicker<A, StdRng> {
    /// Create an idle picker seeded from the OS.
    pub fn new(audio: A) -> Self {
        Self::with_rng(audio, StdRng::from_os_rng())
    }
}

impl<A: AudioCue, R: Rng> ColorPicker<A, R> {
    /// Create an idle picker with a specific random source.
    pub fn with_rng(audio: A, rng: R) -> Self {
        Self {
            selected: PaletteColor::default(),
            spin: None,
            audio,
            rng,
        }
    }

    /// Start with `color` selected.
    #[must_use]
    pub fn with_selected(mut self, color: PaletteColor) -> Self {
        self.selected = color;
        self
    }

    /// Currently selected color.
    pub fn selected(&self) -> PaletteColor {
        self.selected
    }

    /// Whether a spin is in progress.
    pub fn is_spinning(&self) -> bool {
        self.spin.is_some()
    }

    /// Palette entry highlighted by the running spin.
    pub fn highlight(&self) -> Option<PaletteColor> {
        self.spin.as_ref().and_then(|s| s.highlight)
    }

    /// Ticks completed by the running spin.
    pub fn ticks(&self) -> Option<u32> {
        self.spin.as_ref().map(|s| s.ticks)
    }

    /// Select a color directly.
    pub fn select(&mut self, color: PaletteColor) -> Result<(), PickerError> {
        if self.is_spinning() {
            return Err(PickerError::Spinning);
        }
        self.selected = color;
        Ok(())
    }

    /// Start a spin at `now`.
    ///
    /// Returns `false` without side effects if a spin is already running.
    pub fn spin(&mut self, now: Instant) -> bool {
        if self.is_spinning() {
            debug!("Spin requested while spinning, ignoring");
            return false;
        }

        let final_color = self.random_color();

        self.audio.stop();
        let audio_playing = match self.audio.start() {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Audio cue failed, spinning without sound");
                false
            }
        };

        info!("Color randomizer started");
        self.spin = Some(Spin {
            started_at: now,
            ticks: 0,
            highlight: None,
            final_color,
            audio_playing,
        });
        true
    }

    /// Process every deadline that has passed by `now`.
    ///
    /// Returns the committed color exactly once per spin, on the call that
    /// completes it.
    pub fn advance(&mut self, now: Instant) -> Option<PaletteColor> {
        let spin = self.spin.as_mut()?;

        while spin.ticks < MAX_TICKS && now >= spin.next_tick_at() {
            spin.ticks += 1;
            let index = self.rng.random_range(0..PALETTE_SIZE);
            spin.highlight = PaletteColor::from_index(index);
            if spin.audio_playing && (SLOWDOWN_START..MAX_TICKS).contains(&spin.ticks) {
                self.audio.set_rate(playback_rate(spin.ticks));
            }
        }

        if spin.audio_playing && now >= spin.audio_stop_at() {
            self.audio.stop();
            spin.audio_playing = false;
        }

        if spin.ticks < MAX_TICKS || now < spin.commit_at() {
            return None;
        }

        let color = spin.final_color;
        if spin.audio_playing {
            self.audio.stop();
        }
        self.spin = None;
        self.selected = color;
        info!(color = %color, name = color.name(), "Color randomizer committed");
        Some(color)
    }

    /// Abort a running spin and silence the audio cue.
    pub fn cancel(&mut self) {
        if let Some(spin) = self.spin.take() {
            debug!(ticks = spin.ticks, "Color randomizer cancelled");
            if spin.audio_playing {
                self.audio.stop();
            }
        }
    }

    fn random_color(&mut self) -> PaletteColor {
        PaletteColor::from_index(self.rng.random_range(0..PALETTE_SIZE)).unwrap_or_default()
    }
}

impl<A: AudioCue, R: Rng> Drop for ColorPicker<A, R> {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl<A: AudioCue, R: Rng> std::fmt::Debug for ColorPicker<A, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColorPicker")
            .field("selected", &self.selected)
            .field("spin", &self.spin)
            .finish()
    }
}
