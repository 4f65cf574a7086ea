// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Time-based ramp-up applied to fluid scrolling that starts near an edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DurationDampening {
    /// Before this many milliseconds into the drag, scroll at the minimum speed.
    pub accelerate_at_ms: u64,
    /// From this many milliseconds on, scroll at full speed.
    pub stop_dampening_at_ms: u64,
}

impl Default for DurationDampening {
    fn default() -> Self {
        Self {
            accelerate_at_ms: 360,
            stop_dampening_at_ms: 1200,
        }
    }
}

/// Tuning for the fluid scroller.
///
/// Thresholds are fractions of the container's size on the axis being
/// scrolled. Speeds are pixels per frame.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AutoScrollConfig {
    /// Start scrolling when the center is this close to an edge.
    pub start_scrolling_from: f64,
    /// Reach full speed when the center is this close to an edge.
    pub max_speed_at: f64,
    /// Full speed.
    pub max_pixel_scroll: f64,
    /// Slowest non-zero speed.
    pub min_scroll: f64,
    /// Ramp-up for drags that begin near an edge.
    pub dampening: DurationDampening,
}

impl Default for AutoScrollConfig {
    fn default() -> Self {
        Self {
            start_scrolling_from: 0.25,
            max_speed_at: 0.05,
            max_pixel_scroll: 28.0,
            min_scroll: 1.0,
            dampening: DurationDampening::default(),
        }
    }
}

impl AutoScrollConfig {
    /// The easing curve applied to both proximity and time.
    #[inline]
    pub fn ease(percentage: f64) -> f64 {
        percentage * percentage
    }
}
