//! Closed-interval arithmetic shared by every stage of the windowing pipeline.

use serde::{Deserialize, Serialize};

/// A closed interval `[min, max]` along one data-space axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
}

impl Domain {
    /// Create a domain from ordered endpoints.
    ///
    /// Panics when `min > max`: an unordered pair here is a caller bug, not a
    /// runtime data condition. Use [`Domain::spanning`] when endpoint order
    /// is unknown (e.g. values that went through a flipped axis transform).
    pub fn new(min: f64, max: f64) -> Self {
        assert!(min <= max, "malformed domain: min {min} > max {max}");
        Self { min, max }
    }

    /// Create a domain from endpoints in either order.
    pub fn spanning(a: f64, b: f64) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// Zero-width domains make [`normalize`] undefined.
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Overlap of two closed intervals, `None` when they are disjoint.
    ///
    /// Symmetric in its arguments; when one interval contains the other the
    /// result is the contained one.
    pub fn intersect(&self, other: &Domain) -> Option<Domain> {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);
        if min <= max {
            Some(Domain { min, max })
        } else {
            None
        }
    }
}

/// Fold [`Domain::intersect`] over a sequence, skipping absent entries.
///
/// Returns `None` when the running intersection becomes empty or when all
/// inputs are absent.
pub fn intersect_all<I>(domains: I) -> Option<Domain>
where
    I: IntoIterator<Item = Option<Domain>>,
{
    let mut acc: Option<Domain> = None;
    for domain in domains.into_iter().flatten() {
        acc = match acc {
            None => Some(domain),
            Some(current) => match current.intersect(&domain) {
                Some(next) => Some(next),
                None => return None,
            },
        };
    }
    acc
}

/// Position of `value` within `domain`: 0 at `min`, 1 at `max`.
///
/// Callers guarantee a non-degenerate domain; a zero-width domain divides by
/// zero here.
pub fn normalize(value: f64, domain: &Domain) -> f64 {
    (value - domain.min) / domain.width()
}
