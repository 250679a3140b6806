//! Progress UI utilities (spinners)
//!
//! Shows what is being fetched on stderr while the tree is built. Hidden when
//! stderr is not a terminal so redirected output stays clean.

use console::Term;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

use crate::builder::FetchObserver;
use crate::cloud::{LoadBalancerStub, PoolStub};

/// Braille spinner frames; the last one doubles as the finished frame,
/// which is never drawn because the spinner is always cleared.
const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Spinner for the fetch phase
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    /// Create a new spinner with a message
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        if !Term::stderr().is_term() {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_strings(TICKS)
            .template("{spinner:.cyan} {msg}")
        {
            bar.set_style(style);
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }

    /// Update the spinner message
    pub fn set_message(&self, message: &str) {
        self.bar.set_message(message.to_string());
    }

    /// Just clear the spinner without message
    pub fn finish_clear(&self) {
        self.bar.finish_and_clear();
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

impl FetchObserver for Spinner {
    fn load_balancers_listed(&self, count: usize) {
        let found = format_count(count, "load balancer", "load balancers");
        self.set_message(&format!("Found {found}"));
    }

    fn fetching_pools(&self, load_balancer: &LoadBalancerStub) {
        self.set_message(&format!("Listing pools of {}", load_balancer.name));
    }

    fn fetching_members(&self, pool: &PoolStub) {
        self.set_message(&format!("Listing members of {}", pool.name));
    }
}

/// Format a count with proper singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_are_single_braille_cells() {
        for tick in TICKS {
            let mut chars = tick.chars();
            let cell = chars.next().expect("non-empty frame");
            assert!(chars.next().is_none(), "{tick}");
            assert!(('\u{2800}'..='\u{28FF}').contains(&cell), "{tick}");
        }
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(1, "pool", "pools"), "1 pool");
        assert_eq!(format_count(0, "pool", "pools"), "0 pools");
        assert_eq!(format_count(3, "pool", "pools"), "3 pools");
    }
}
