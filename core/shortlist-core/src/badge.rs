//! Badge Projector: the active-item count shown on the toolbar affordance.
//!
//! Recomputed from the full list after every mutation. The count is
//! rendered as text when nonzero and cleared when zero.

use std::sync::Mutex;

use tracing::debug;

use crate::types::{active_count, ComparisonItem};

/// Accent color used for the badge background.
pub const BADGE_COLOR: &str = "#4F46E5";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub active_count: usize,
    /// Empty when there is nothing to show.
    pub text: String,
    pub color: &'static str,
}

impl Badge {
    pub fn from_count(active_count: usize) -> Self {
        let text = if active_count > 0 {
            active_count.to_string()
        } else {
            String::new()
        };
        Self {
            active_count,
            text,
            color: BADGE_COLOR,
        }
    }

    pub fn is_cleared(&self) -> bool {
        self.text.is_empty()
    }
}

/// Derives the badge for a list.
pub fn project(items: &[ComparisonItem]) -> Badge {
    Badge::from_count(active_count(items))
}

/// The host that renders the badge.
pub trait BadgeSink: Send + Sync {
    fn render(&self, badge: &Badge);
}

/// Sink for hosts without a visual badge; records the projection in the log.
#[derive(Debug, Default)]
pub struct TracingBadgeSink;

impl BadgeSink for TracingBadgeSink {
    fn render(&self, badge: &Badge) {
        debug!(
            active = badge.active_count,
            text = %badge.text,
            color = badge.color,
            "Badge updated"
        );
    }
}

/// Keeps every rendered badge; used by tests and by hosts that poll.
#[derive(Debug, Default)]
pub struct RecordingBadgeSink {
    rendered: Mutex<Vec<Badge>>,
}

impl RecordingBadgeSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<Badge> {
        self.rendered
            .lock()
            .ok()
            .and_then(|rendered| rendered.last().cloned())
    }

    pub fn history(&self) -> Vec<Badge> {
        self.rendered
            .lock()
            .map(|rendered| rendered.clone())
            .unwrap_or_default()
    }
}

impl BadgeSink for RecordingBadgeSink {
    fn render(&self, badge: &Badge) {
        if let Ok(mut rendered) = self.rendered.lock() {
            rendered.push(badge.clone());
        }
    }
}
