//! Slideshow navigation: current position, rotation, and play mode.

use std::path::Path;

use tracing::info;

use crate::error::Error;
use crate::scan::ImageEntry;
use crate::state::PersistedPosition;

/// Whether the show advances on a timer or waits for the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayMode {
    /// Advance only on explicit commands.
    Manual,
    /// Advance automatically after the configured delay.
    AutoPlay,
}

/// Owns the discovered sequence and all mutable session state.
///
/// The sequence is immutable for the lifetime of the controller; every
/// transition below keeps the index valid.
#[derive(Debug)]
pub struct Navigator {
    entries: Vec<ImageEntry>,
    index: usize,
    rotation: u32,
    delay_secs: u64,
    mode: PlayMode,
}

impl Navigator {
    /// Construct a controller over a non-empty sequence.
    ///
    /// `delay_secs == 0` starts the session in manual mode.
    ///
    /// # Errors
    /// Returns [`Error::EmptyScan`] if `entries` is empty.
    pub fn new(entries: Vec<ImageEntry>, root: &Path, delay_secs: u64) -> Result<Self, Error> {
        if entries.is_empty() {
            return Err(Error::EmptyScan(root.display().to_string()));
        }
        Ok(Self {
            entries,
            index: 0,
            rotation: 0,
            delay_secs,
            mode: if delay_secs > 0 {
                PlayMode::AutoPlay
            } else {
                PlayMode::Manual
            },
        })
    }

    /// Number of images in the sequence.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false post-construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current position in the sequence.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// The image at the current position.
    #[must_use]
    pub fn current(&self) -> &ImageEntry {
        &self.entries[self.index]
    }

    /// Current rotation in degrees (0, 90, 180 or 270).
    #[must_use]
    pub const fn rotation(&self) -> u32 {
        self.rotation
    }

    /// Auto-advance delay in whole seconds; 0 means manual.
    #[must_use]
    pub const fn delay_secs(&self) -> u64 {
        self.delay_secs
    }

    /// Current play mode.
    #[must_use]
    pub const fn mode(&self) -> PlayMode {
        self.mode
    }

    /// Whether the shell should have an advance timer pending.
    #[must_use]
    pub const fn wants_auto_advance(&self) -> bool {
        matches!(self.mode, PlayMode::AutoPlay) && self.delay_secs > 0
    }

    /// Borrow the sequence (read-only).
    #[must_use]
    pub fn entries(&self) -> &[ImageEntry] {
        &self.entries
    }

    /// Advance to the next image, wrapping at the end. Resets rotation.
    pub fn next(&mut self) {
        self.index = (self.index + 1) % self.entries.len();
        self.rotation = 0;
    }

    /// Step back to the previous image, wrapping at the start. Resets rotation.
    pub fn previous(&mut self) {
        self.index = (self.index + self.entries.len() - 1) % self.entries.len();
        self.rotation = 0;
    }

    /// Jump to `index`, clamped into bounds. Resets rotation.
    pub fn seek(&mut self, index: usize) {
        self.index = index.min(self.entries.len() - 1);
        self.rotation = 0;
    }

    /// Add `delta_degrees` to the current rotation, modulo 360.
    pub fn rotate(&mut self, delta_degrees: i32) {
        let next = i64::from(self.rotation) + i64::from(delta_degrees);
        self.rotation = u32::try_from(next.rem_euclid(360)).unwrap_or(0);
    }

    /// Set the auto-advance delay. Zero forces manual mode; a positive
    /// value forces auto-play with the new delay.
    pub fn set_delay(&mut self, seconds: u64) {
        self.delay_secs = seconds;
        self.mode = if seconds > 0 {
            PlayMode::AutoPlay
        } else {
            PlayMode::Manual
        };
    }

    /// Flip between manual and auto-play.
    pub fn toggle_auto_play(&mut self) {
        self.mode = match self.mode {
            PlayMode::Manual => PlayMode::AutoPlay,
            PlayMode::AutoPlay => PlayMode::Manual,
        };
    }
}

/// Choose the index to resume at, given a saved position and the freshly
/// discovered sequence.
///
/// Path identity survives insertions and deletions elsewhere in the tree,
/// so it wins over the raw saved index; the raw index is only trusted when
/// the sequence length is unchanged since the save.
#[must_use]
pub fn compute_resume_index(
    persisted: &PersistedPosition,
    root: &Path,
    entries: &[ImageEntry],
) -> usize {
    if let Some(idx) = entries
        .iter()
        .position(|e| e.relative == persisted.last_image_path)
    {
        return idx;
    }

    let filtered_out = root.join(&persisted.last_image_path).is_file();
    if filtered_out {
        info!(
            path = %persisted.last_image_path.display(),
            "saved image still exists but is filtered out; not resuming by path"
        );
    }

    if persisted.total_images == entries.len() && persisted.last_index < entries.len() {
        return persisted.last_index;
    }

    if filtered_out {
        info!("saved image was filtered out and the tree changed; restarting from the beginning");
    } else {
        info!(
            saved = persisted.total_images,
            current = entries.len(),
            "image count changed since last session; restarting from the beginning"
        );
    }
    0
}
