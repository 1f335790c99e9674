// ============================================================================
// spark-effects - Root Margin
// CSS-shorthand margins that grow or shrink the intersection root
// ============================================================================

use std::fmt;
use std::str::FromStr;

use crate::error::{EffectsError, Result};
use crate::host::geometry::Rect;
use crate::style::css_number;

/// A single margin length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Px(f64),
    /// Percentage of the root's width (left/right) or height (top/bottom)
    Percent(f64),
}

impl Length {
    pub fn resolve(&self, basis: f64) -> f64 {
        match *self {
            Length::Px(px) => px,
            Length::Percent(pct) => basis * pct / 100.0,
        }
    }

    fn parse(token: &str, input: &str) -> Result<Self> {
        let invalid = |reason: String| EffectsError::InvalidRootMargin {
            input: input.to_string(),
            reason,
        };

        let (number, unit) = if let Some(n) = token.strip_suffix("px") {
            (n, "px")
        } else if let Some(n) = token.strip_suffix('%') {
            (n, "%")
        } else if token == "0" {
            (token, "px")
        } else {
            return Err(invalid(format!("{token:?} must be a length in px or %")));
        };

        let value: f64 = number
            .parse()
            .map_err(|_| invalid(format!("{token:?} is not a number")))?;
        if !value.is_finite() {
            return Err(invalid(format!("{token:?} is not finite")));
        }

        Ok(match unit {
            "%" => Length::Percent(value),
            _ => Length::Px(value),
        })
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Px(v) => write!(f, "{}px", css_number(*v)),
            Length::Percent(v) => write!(f, "{}%", css_number(*v)),
        }
    }
}

/// Margins applied around the intersection root (the viewport).
///
/// Positive values grow the root, negative values shrink it, so the default
/// reveal margin `0px 0px -60px 0px` requires an element to be 60px above
/// the bottom edge before it counts as visible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootMargin {
    pub top: Length,
    pub right: Length,
    pub bottom: Length,
    pub left: Length,
}

impl RootMargin {
    pub const ZERO: RootMargin = RootMargin {
        top: Length::Px(0.0),
        right: Length::Px(0.0),
        bottom: Length::Px(0.0),
        left: Length::Px(0.0),
    };

    /// Parse CSS margin shorthand: 1 to 4 whitespace-separated lengths,
    /// expanded in top/right/bottom/left order.
    pub fn parse(input: &str) -> Result<Self> {
        let tokens = input
            .split_whitespace()
            .map(|t| Length::parse(t, input))
            .collect::<Result<Vec<_>>>()?;

        let [top, right, bottom, left] = match tokens.as_slice() {
            [all] => [*all; 4],
            [v, h] => [*v, *h, *v, *h],
            [t, h, b] => [*t, *h, *b, *h],
            [t, r, b, l] => [*t, *r, *b, *l],
            _ => {
                return Err(EffectsError::InvalidRootMargin {
                    input: input.to_string(),
                    reason: format!("expected 1 to 4 lengths, got {}", tokens.len()),
                });
            }
        };

        Ok(Self {
            top,
            right,
            bottom,
            left,
        })
    }

    /// The root rect grown (or shrunk) by these margins.
    pub fn apply(&self, root: Rect) -> Rect {
        let top = self.top.resolve(root.height);
        let right = self.right.resolve(root.width);
        let bottom = self.bottom.resolve(root.height);
        let left = self.left.resolve(root.width);
        Rect::new(
            root.left - left,
            root.top - top,
            root.width + left + right,
            root.height + top + bottom,
        )
    }
}

impl Default for RootMargin {
    fn default() -> Self {
        Self::ZERO
    }
}

impl FromStr for RootMargin {
    type Err = EffectsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_reveal_default() {
        let m = RootMargin::parse("0px 0px -60px 0px").unwrap();
        assert_eq!(m.bottom, Length::Px(-60.0));
        assert_eq!(m.top, Length::Px(0.0));
        assert_eq!(m.to_string(), "0px 0px -60px 0px");
    }

    #[test]
    fn shorthand_expansion() {
        let two: RootMargin = "10px 5%".parse().unwrap();
        assert_eq!(two.top, Length::Px(10.0));
        assert_eq!(two.bottom, Length::Px(10.0));
        assert_eq!(two.left, Length::Percent(5.0));
        assert_eq!(two.right, Length::Percent(5.0));

        let three = RootMargin::parse("1px 2px 3px").unwrap();
        assert_eq!(three.left, Length::Px(2.0));
        assert_eq!(three.bottom, Length::Px(3.0));

        assert_eq!(RootMargin::parse("0").unwrap(), RootMargin::ZERO);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            RootMargin::parse("10em"),
            Err(EffectsError::InvalidRootMargin { .. })
        ));
        assert!(RootMargin::parse("").is_err());
        assert!(RootMargin::parse("1px 2px 3px 4px 5px").is_err());
        assert!(RootMargin::parse("abcpx").is_err());
    }

    #[test]
    fn apply_shrinks_with_negative_margins() {
        let root = Rect::new(0.0, 0.0, 1000.0, 800.0);
        let m = RootMargin::parse("0px 0px -60px 0px").unwrap();
        assert_eq!(m.apply(root), Rect::new(0.0, 0.0, 1000.0, 740.0));

        let pct = RootMargin::parse("10%").unwrap();
        assert_eq!(pct.apply(root), Rect::new(-100.0, -80.0, 1200.0, 960.0));
    }
}
