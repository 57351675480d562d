//! Interactive playback controller.
//!
//! [`PlaybackController`] walks the [`PlaybackState`] machine over any
//! line-oriented input and text output, so the same code drives a terminal
//! session and the unit tests below.
//!
//! # Session flow
//!
//! ```text
//! Consent   "yes" ─▶ print manifest ─▶ Browsing
//!           other ─▶ thank-you       ─▶ Done
//! Browsing  "2"   ─▶ Playing(2)
//!           "0" / "99" / "abc" ─▶ error line ─▶ Browsing
//! Playing   artifact present ─▶ print text ─▶ device.play ─▶ "another?"
//!           artifact missing / play error  ─▶ error line  ─▶ Browsing
//! ```
//!
//! End of input is treated as "stop" in every state.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::audio::{AudioDevice, PlaybackError};
use crate::content::Paragraph;
use crate::tts::ArtifactNaming;

use super::locale::Locale;
use super::manifest::Manifest;
use super::state::{PlaybackState, SessionState};

// ---------------------------------------------------------------------------
// BrowseError
// ---------------------------------------------------------------------------

/// Recoverable errors while browsing.  Each one is reported to the operator
/// and the session returns to [`PlaybackState::Browsing`].
#[derive(Debug, Error)]
pub enum BrowseError {
    #[error("input {input:?} is not a number")]
    InvalidInput { input: String, max: usize },

    #[error("selection {selection} is outside 1-{max}")]
    OutOfRange { selection: i64, max: usize },

    #[error("artifact for paragraph {index} missing at {}", .path.display())]
    ArtifactMissing { index: usize, path: PathBuf },

    #[error("playback failed: {0}")]
    Playback(#[from] PlaybackError),
}

/// Parse a browsing response into a 1-based paragraph index in `1..=max`.
///
/// ```
/// use article_narrator::pipeline::{parse_selection, BrowseError};
///
/// assert_eq!(parse_selection(" 2 ", 3).unwrap(), 2);
/// assert!(matches!(parse_selection("0", 3), Err(BrowseError::OutOfRange { .. })));
/// assert!(matches!(parse_selection("abc", 3), Err(BrowseError::InvalidInput { .. })));
/// ```
pub fn parse_selection(input: &str, max: usize) -> Result<usize, BrowseError> {
    let trimmed = input.trim();
    let selection: i64 = trimmed.parse().map_err(|_| BrowseError::InvalidInput {
        input: trimmed.to_string(),
        max,
    })?;

    match usize::try_from(selection) {
        Ok(index) if (1..=max).contains(&index) => Ok(index),
        _ => Err(BrowseError::OutOfRange { selection, max }),
    }
}

// ---------------------------------------------------------------------------
// Console
// ---------------------------------------------------------------------------

/// Line-oriented prompt/response channel.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Write one line.
    pub fn say(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.output, "{line}")
    }

    /// Write `text` without a newline and read the trimmed response.
    /// Returns `None` at end of input.
    pub fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.output.flush()
    }
}

// ---------------------------------------------------------------------------
// PlaybackController
// ---------------------------------------------------------------------------

pub struct PlaybackController {
    paragraphs: Vec<Paragraph>,
    naming: ArtifactNaming,
    manifest: Manifest,
    device: Arc<dyn AudioDevice>,
    locale: Locale,
    display_delay: Duration,
    session: SessionState,
}

impl PlaybackController {
    /// Create a controller for a session with `total_generated` selectable
    /// artifacts.  Labels default to ones derived from `paragraphs`.
    pub fn new(
        paragraphs: Vec<Paragraph>,
        total_generated: usize,
        naming: ArtifactNaming,
        device: Arc<dyn AudioDevice>,
    ) -> Self {
        let manifest = Manifest::from_paragraphs(&paragraphs);
        Self {
            paragraphs,
            naming,
            manifest,
            device,
            locale: Locale::default(),
            display_delay: Duration::ZERO,
            session: SessionState::new(total_generated),
        }
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_manifest(mut self, manifest: Manifest) -> Self {
        self.manifest = manifest;
        self
    }

    /// Pause between manifest lines.
    pub fn with_display_delay(mut self, delay: Duration) -> Self {
        self.display_delay = delay;
        self
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Run the session until it reaches [`PlaybackState::Done`].
    ///
    /// Only I/O failures on the console itself are returned; every browsing
    /// error is reported to the operator and recovered from.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, output: W) -> io::Result<&SessionState> {
        let mut console = Console::new(input, output);
        while !self.session.state.is_terminal() {
            self.step(&mut console)?;
        }
        console.flush()?;

        log::info!(
            "controller: session ended after {} plays, {} recoverable errors",
            self.session.plays,
            self.session.recoverable_errors
        );
        Ok(&self.session)
    }

    /// Advance the state machine by one transition.
    pub fn step<R: BufRead, W: Write>(
        &mut self,
        console: &mut Console<R, W>,
    ) -> io::Result<PlaybackState> {
        let from = self.session.state;
        let next = match from {
            PlaybackState::Consent => self.ask_consent(console)?,
            PlaybackState::Browsing => self.browse(console)?,
            PlaybackState::Playing(index) => self.play(console, index)?,
            PlaybackState::Done => PlaybackState::Done,
        };
        log::debug!("controller: {} → {}", from.label(), next.label());
        self.session.state = next;
        Ok(next)
    }

    // ---- Consent -----------------------------------------------------------

    fn ask_consent<R: BufRead, W: Write>(
        &mut self,
        console: &mut Console<R, W>,
    ) -> io::Result<PlaybackState> {
        let accepted = console
            .prompt(self.locale.consent_prompt())?
            .is_some_and(|answer| self.locale.is_affirmative(&answer));

        if !accepted {
            console.say("")?;
            console.say(self.locale.declined())?;
            return Ok(PlaybackState::Done);
        }

        if self.session.total_generated == 0 {
            console.say(self.locale.no_audio())?;
            return Ok(PlaybackState::Done);
        }

        self.show_manifest(console)?;
        Ok(PlaybackState::Browsing)
    }

    fn show_manifest<R: BufRead, W: Write>(&self, console: &mut Console<R, W>) -> io::Result<()> {
        console.say("")?;
        console.say(self.locale.manifest_heading())?;
        for line in self.manifest.lines(self.session.total_generated) {
            console.say(&line)?;
            console.flush()?;
            if !self.display_delay.is_zero() {
                std::thread::sleep(self.display_delay);
            }
        }
        Ok(())
    }

    // ---- Browsing ----------------------------------------------------------

    fn browse<R: BufRead, W: Write>(
        &mut self,
        console: &mut Console<R, W>,
    ) -> io::Result<PlaybackState> {
        console.say("")?;
        let prompt = self.locale.selection_prompt(self.session.total_generated);
        let Some(response) = console.prompt(&prompt)? else {
            console.say(self.locale.goodbye())?;
            return Ok(PlaybackState::Done);
        };

        match parse_selection(&response, self.session.total_generated) {
            Ok(index) => Ok(PlaybackState::Playing(index)),
            Err(e) => {
                self.report(console, &e)?;
                Ok(PlaybackState::Browsing)
            }
        }
    }

    // ---- Playing -----------------------------------------------------------

    fn play<R: BufRead, W: Write>(
        &mut self,
        console: &mut Console<R, W>,
        index: usize,
    ) -> io::Result<PlaybackState> {
        let artifact = self.naming.artifact(index);
        if !artifact.present {
            let e = BrowseError::ArtifactMissing {
                index,
                path: artifact.path,
            };
            self.report(console, &e)?;
            return Ok(PlaybackState::Browsing);
        }

        console.say(&self.locale.playing(index))?;
        console.say("")?;
        console.say(&self.locale.content_heading(index))?;
        match self.paragraphs.iter().find(|p| p.index == index) {
            Some(paragraph) => console.say(&paragraph.text)?,
            None => log::warn!("controller: no paragraph text for index {index}"),
        }
        console.flush()?;

        if let Err(e) = self.device.play(&artifact.path) {
            self.report(console, &BrowseError::from(e))?;
            return Ok(PlaybackState::Browsing);
        }
        self.session.plays += 1;

        console.say("")?;
        let again = console
            .prompt(self.locale.continue_prompt())?
            .is_some_and(|answer| self.locale.is_affirmative(&answer));

        if again {
            Ok(PlaybackState::Browsing)
        } else {
            console.say(self.locale.goodbye())?;
            Ok(PlaybackState::Done)
        }
    }

    fn report<R: BufRead, W: Write>(
        &mut self,
        console: &mut Console<R, W>,
        error: &BrowseError,
    ) -> io::Result<()> {
        self.session.recoverable_errors += 1;
        log::warn!("controller: {error}");
        console.say(&self.locale.describe(error))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
