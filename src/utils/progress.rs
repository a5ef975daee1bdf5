//! Spinner shown while npm or git run.
//!
//! The spinner draws on stderr so it never mixes with the lines the CLI prints on stdout.
//! When progress is disabled (`--no-progress`, `show_progress = false`, or tests) the
//! spinner is hidden and every call is a no-op.
//!
//! # Examples
//!
//! ```rust
//! use npm2rez::utils::progress::Spinner;
//!
//! let spinner = Spinner::new(false);
//! spinner.set_message("Installing typescript@4.9.5");
//! // run npm install ...
//! spinner.finish_and_clear();
//! ```

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle as IndicatifStyle};
use std::time::Duration;

/// Indeterminate progress indicator for a single long-running step.
#[derive(Clone)]
pub struct Spinner {
    inner: IndicatifBar,
}

impl Spinner {
    /// Create a spinner; a hidden one when `enabled` is false.
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        let bar = if enabled {
            let bar = IndicatifBar::new_spinner();
            bar.set_style(spinner_style());
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        } else {
            IndicatifBar::hidden()
        };
        Self {
            inner: bar,
        }
    }

    /// Create a hidden spinner.
    #[must_use]
    pub fn hidden() -> Self {
        Self::new(false)
    }

    pub fn set_message(&self, msg: impl Into<String>) {
        self.inner.set_message(msg.into());
    }

    pub fn finish_and_clear(&self) {
        self.inner.finish_and_clear();
    }

    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.inner.is_hidden()
    }
}

fn spinner_style() -> IndicatifStyle {
    IndicatifStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| IndicatifStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"])
}
