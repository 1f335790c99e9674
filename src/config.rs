// ============================================================================
// spark-effects - Options
// Per-tracker configuration records
// ============================================================================
//
// Every options type has `Default` (the documented defaults), `with_*`
// setters, and deserializes from camelCase JSON with missing fields
// defaulted. Types with constrained fields offer `validate()` for callers
// that want to reject bad configuration.
// Hooks do not validate; they call `sanitized()`, which clamps or replaces
// bad values and logs a warning.
// ============================================================================

use serde::Deserialize;

use crate::error::{EffectsError, Result};
use crate::host::margin::RootMargin;

fn finite_non_negative(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(EffectsError::InvalidNumber { field, value })
    }
}

fn sanitize_number(field: &'static str, value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        tracing::warn!(field, value, fallback, "invalid effect option, using fallback");
        fallback
    }
}

// =============================================================================
// SCROLL REVEAL
// =============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScrollRevealOptions {
    /// Share of the element that must be inside the root, in `[0, 1]`
    pub threshold: f64,
    /// CSS margin shorthand applied to the viewport
    pub root_margin: String,
    /// Stop observing after the first reveal
    pub once: bool,
}

impl Default for ScrollRevealOptions {
    fn default() -> Self {
        Self {
            threshold: 0.15,
            root_margin: "0px 0px -60px 0px".to_string(),
            once: true,
        }
    }
}

impl ScrollRevealOptions {
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_root_margin(mut self, root_margin: impl Into<String>) -> Self {
        self.root_margin = root_margin.into();
        self
    }

    pub fn with_once(mut self, once: bool) -> Self {
        self.once = once;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(EffectsError::ThresholdOutOfRange(self.threshold));
        }
        RootMargin::parse(&self.root_margin)?;
        Ok(())
    }

    /// Threshold clamped into `[0, 1]` (NaN becomes 0) and the parsed
    /// margin, falling back to zero margin on a parse error.
    pub fn sanitized(&self) -> (f64, RootMargin) {
        let threshold = if self.threshold.is_nan() {
            tracing::warn!("scroll reveal threshold is NaN, using 0");
            0.0
        } else {
            let clamped = self.threshold.clamp(0.0, 1.0);
            if clamped != self.threshold {
                tracing::warn!(threshold = self.threshold, clamped, "scroll reveal threshold clamped");
            }
            clamped
        };

        let root_margin = match RootMargin::parse(&self.root_margin) {
            Ok(margin) => margin,
            Err(err) => {
                tracing::warn!(%err, "scroll reveal root margin rejected, using 0px");
                RootMargin::ZERO
            }
        };

        (threshold, root_margin)
    }
}

// =============================================================================
// TILT
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TiltOptions {
    /// Rotation at the element's edge, in degrees
    pub max_tilt: f64,
    /// Uniform scale while hovered
    pub scale: f64,
    /// Transition duration in ms
    #[serde(alias = "speed")]
    pub speed_ms: u32,
}

impl Default for TiltOptions {
    fn default() -> Self {
        Self {
            max_tilt: 8.0,
            scale: 1.02,
            speed_ms: 400,
        }
    }
}

impl TiltOptions {
    pub fn with_max_tilt(mut self, max_tilt: f64) -> Self {
        self.max_tilt = max_tilt;
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_speed_ms(mut self, speed_ms: u32) -> Self {
        self.speed_ms = speed_ms;
        self
    }

    pub fn validate(&self) -> Result<()> {
        finite_non_negative("maxTilt", self.max_tilt)?;
        finite_non_negative("scale", self.scale)
    }

    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        Self {
            max_tilt: sanitize_number("maxTilt", self.max_tilt, defaults.max_tilt),
            scale: sanitize_number("scale", self.scale, defaults.scale),
            speed_ms: self.speed_ms,
        }
    }
}

// =============================================================================
// COUNT UP
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CountUpOptions {
    /// Final displayed value
    pub target: i64,
    #[serde(alias = "duration")]
    pub duration_ms: u32,
}

impl Default for CountUpOptions {
    fn default() -> Self {
        Self {
            target: 0,
            duration_ms: 2000,
        }
    }
}

impl CountUpOptions {
    pub fn new(target: i64) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }

    pub fn with_duration_ms(mut self, duration_ms: u32) -> Self {
        self.duration_ms = duration_ms;
        self
    }
}

// =============================================================================
// STAGGER REVEAL
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StaggerOptions {
    /// Number of items to reveal
    pub count: usize,
    /// Delay between consecutive reveals, in ms
    #[serde(alias = "staggerDelay")]
    pub stagger_delay_ms: u32,
}

impl Default for StaggerOptions {
    fn default() -> Self {
        Self {
            count: 0,
            stagger_delay_ms: 60,
        }
    }
}

impl StaggerOptions {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            ..Self::default()
        }
    }

    pub fn with_stagger_delay_ms(mut self, stagger_delay_ms: u32) -> Self {
        self.stagger_delay_ms = stagger_delay_ms;
        self
    }

    /// Delay of item `index` after the trigger, saturating at `u32::MAX`.
    pub fn delay_for(&self, index: usize) -> u32 {
        u32::try_from(index)
            .ok()
            .and_then(|i| i.checked_mul(self.stagger_delay_ms))
            .unwrap_or(u32::MAX)
    }
}

// =============================================================================
// MAGNETIC HOVER
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MagneticOptions {
    /// Offset at the element's edge, in px
    pub strength: f64,
}

impl Default for MagneticOptions {
    fn default() -> Self {
        Self { strength: 10.0 }
    }
}

impl MagneticOptions {
    pub fn with_strength(mut self, strength: f64) -> Self {
        self.strength = strength;
        self
    }

    pub fn validate(&self) -> Result<()> {
        finite_non_negative("strength", self.strength)
    }

    pub fn sanitized(&self) -> Self {
        Self {
            strength: sanitize_number("strength", self.strength, Self::default().strength),
        }
    }
}
