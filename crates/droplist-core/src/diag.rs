#![forbid(unsafe_code)]

//! Leveled diagnostic channel.
//!
//! Every widget instance carries a [`Diag`] configured with a verbosity
//! level and an optional message prefix, so diagnostics from several
//! widgets on one page stay distinguishable. Messages route through
//! `tracing`; the level gate is applied here so a widget set to
//! [`DiagLevel::Quiet`] emits nothing regardless of the subscriber's
//! filter.
//!
//! Nothing in the widget panics across the public API: failures are
//! reported through this channel and degrade to no-ops.

use std::sync::Arc;

/// Diagnostic verbosity, per widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum DiagLevel {
    /// Emit nothing.
    Quiet,
    /// Errors only.
    #[default]
    Errors,
    /// Errors and warnings.
    Warnings,
    /// Everything, including per-operation notes.
    Verbose,
}

/// A cheaply cloneable handle to a widget's diagnostic channel.
#[derive(Debug, Clone)]
pub struct Diag {
    level: DiagLevel,
    prefix: Arc<str>,
}

impl Diag {
    /// Create a channel with the given level and message prefix.
    #[must_use]
    pub fn new(level: DiagLevel, prefix: impl Into<Arc<str>>) -> Self {
        Self {
            level,
            prefix: prefix.into(),
        }
    }

    /// The configured verbosity.
    #[inline]
    #[must_use]
    pub const fn level(&self) -> DiagLevel {
        self.level
    }

    /// The configured message prefix.
    #[inline]
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Whether messages at `level` currently pass the gate.
    #[inline]
    #[must_use]
    pub fn allows(&self, level: DiagLevel) -> bool {
        match level {
            DiagLevel::Quiet => false,
            other => self.level >= other,
        }
    }

    /// Report an error. Emitted unless the channel is quiet.
    pub fn error(&self, message: &str) {
        if self.allows(DiagLevel::Errors) {
            tracing::error!(target: "droplist", widget = %self.prefix, "{message}");
        }
    }

    /// Report a warning.
    pub fn warn(&self, message: &str) {
        if self.allows(DiagLevel::Warnings) {
            tracing::warn!(target: "droplist", widget = %self.prefix, "{message}");
        }
    }

    /// Report an informational note, only at verbose level.
    pub fn verbose(&self, message: &str) {
        if self.allows(DiagLevel::Verbose) {
            tracing::debug!(target: "droplist", widget = %self.prefix, "{message}");
        }
    }
}

impl Default for Diag {
    fn default() -> Self {
        Self::new(DiagLevel::default(), "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_gate_is_cumulative() {
        let errors = Diag::new(DiagLevel::Errors, "t");
        assert!(errors.allows(DiagLevel::Errors));
        assert!(!errors.allows(DiagLevel::Warnings));
        assert!(!errors.allows(DiagLevel::Verbose));

        let warnings = Diag::new(DiagLevel::Warnings, "t");
        assert!(warnings.allows(DiagLevel::Errors));
        assert!(warnings.allows(DiagLevel::Warnings));
        assert!(!warnings.allows(DiagLevel::Verbose));

        let verbose = Diag::new(DiagLevel::Verbose, "t");
        assert!(verbose.allows(DiagLevel::Errors));
        assert!(verbose.allows(DiagLevel::Verbose));
    }

    #[test]
    fn quiet_suppresses_everything() {
        let quiet = Diag::new(DiagLevel::Quiet, "t");
        assert!(!quiet.allows(DiagLevel::Errors));
        assert!(!quiet.allows(DiagLevel::Warnings));
        assert!(!quiet.allows(DiagLevel::Verbose));
    }

    #[test]
    fn quiet_is_never_an_emittable_level() {
        let verbose = Diag::new(DiagLevel::Verbose, "t");
        assert!(!verbose.allows(DiagLevel::Quiet));
    }

    #[test]
    fn default_level_is_errors() {
        assert_eq!(DiagLevel::default(), DiagLevel::Errors);
        assert_eq!(Diag::default().level(), DiagLevel::Errors);
    }

    #[test]
    fn gated_messages_route_through_tracing() {
        use std::sync::{Arc, Mutex};
        use tracing_subscriber::layer::{Context, SubscriberExt};
        use tracing_subscriber::registry::Registry;

        struct CaptureLayer {
            events: Arc<Mutex<Vec<(tracing::Level, String)>>>,
        }

        impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for CaptureLayer {
            fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
                self.events.lock().unwrap().push((
                    *event.metadata().level(),
                    event.metadata().target().to_string(),
                ));
            }
        }

        let events = Arc::new(Mutex::new(Vec::new()));
        let subscriber = Registry::default().with(CaptureLayer {
            events: events.clone(),
        });

        tracing::subscriber::with_default(subscriber, || {
            let diag = Diag::new(DiagLevel::Warnings, "w1");
            diag.error("boom");
            diag.warn("careful");
            diag.verbose("suppressed at this level");
        });

        let seen = events.lock().unwrap();
        let levels: Vec<tracing::Level> = seen.iter().map(|(level, _)| *level).collect();
        assert_eq!(levels, vec![tracing::Level::ERROR, tracing::Level::WARN]);
        assert!(seen.iter().all(|(_, target)| target == "droplist"));
    }
}
