//! Playback state machine and per-run session state.
//!
//! [`PlaybackState`] drives the controller's state machine.  [`SessionState`]
//! is everything the controller knows about the current run; it lives only
//! for the process lifetime and is never persisted.

// ---------------------------------------------------------------------------
// PlaybackState
// ---------------------------------------------------------------------------

/// States of the interactive playback loop.
///
/// The state machine transitions are:
///
/// ```text
/// Consent ──declined──────────────────────────▶ Done
///         ──accepted (manifest shown)─────────▶ Browsing
/// Browsing ──valid selection s────────────────▶ Playing(s)
///          ──invalid / out of range───────────▶ Browsing
///          ──end of input─────────────────────▶ Done
/// Playing(s) ──missing artifact / play error──▶ Browsing
///            ──played, continue───────────────▶ Browsing
///            ──played, stop───────────────────▶ Done
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Asking whether the operator wants to listen at all.
    #[default]
    Consent,

    /// Waiting for a paragraph number.
    Browsing,

    /// Playing the artifact for the given 1-based paragraph index.
    Playing(usize),

    /// Terminal; no further input is read.
    Done,
}

impl PlaybackState {
    /// Returns `true` once the session has ended.
    ///
    /// ```
    /// use article_narrator::pipeline::PlaybackState;
    ///
    /// assert!(!PlaybackState::Consent.is_terminal());
    /// assert!(!PlaybackState::Browsing.is_terminal());
    /// assert!(!PlaybackState::Playing(3).is_terminal());
    /// assert!(PlaybackState::Done.is_terminal());
    /// ```
    pub fn is_terminal(&self) -> bool {
        matches!(self, PlaybackState::Done)
    }

    /// A short label for log lines.
    pub fn label(&self) -> &'static str {
        match self {
            PlaybackState::Consent => "Consent",
            PlaybackState::Browsing => "Browsing",
            PlaybackState::Playing(_) => "Playing",
            PlaybackState::Done => "Done",
        }
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// State of one interactive session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Number of artifacts confirmed present after the cache pass.  Valid
    /// selections are `1..=total_generated`.
    pub total_generated: usize,

    /// Current position in the state machine.
    pub state: PlaybackState,

    /// Artifacts played to completion.
    pub plays: usize,

    /// Recoverable errors reported to the operator.
    pub recoverable_errors: usize,
}

impl SessionState {
    pub fn new(total_generated: usize) -> Self {
        Self {
            total_generated,
            state: PlaybackState::Consent,
            plays: 0,
            recoverable_errors: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_consent() {
        assert_eq!(PlaybackState::default(), PlaybackState::Consent);
    }

    #[test]
    fn labels() {
        assert_eq!(PlaybackState::Consent.label(), "Consent");
        assert_eq!(PlaybackState::Browsing.label(), "Browsing");
        assert_eq!(PlaybackState::Playing(2).label(), "Playing");
        assert_eq!(PlaybackState::Done.label(), "Done");
    }

    #[test]
    fn new_session_starts_at_consent() {
        let session = SessionState::new(3);
        assert_eq!(session.state, PlaybackState::Consent);
        assert_eq!(session.total_generated, 3);
        assert_eq!(session.plays, 0);
        assert_eq!(session.recoverable_errors, 0);
    }
}
