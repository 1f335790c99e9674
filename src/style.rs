// ============================================================================
// spark-effects - Inline Style Fragments
// ============================================================================

use std::fmt;

/// Format a number the way CSS text expects it: shortest round-trip form,
/// no negative zero, and `0` for anything non-finite.
pub fn css_number(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    // -0.0 + 0.0 == +0.0
    format!("{}", value + 0.0)
}

/// An ordered set of inline style declarations.
///
/// Trackers return these for the caller to merge into an element's style.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleMap {
    entries: Vec<(String, String)>,
}

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property, replacing an earlier value for the same name.
    pub fn set(&mut self, property: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let property = property.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(p, _)| *p == property) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((property, value)),
        }
        self
    }

    pub fn with(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(property, value);
        self
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, v)| (p.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `prop: value; prop: value` as in a `style` attribute.
impl fmt::Display for StyleMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (p, v)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{p}: {v}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_number_formatting() {
        assert_eq!(css_number(50.0), "50");
        assert_eq!(css_number(37.5), "37.5");
        assert_eq!(css_number(-0.0), "0");
        assert_eq!(css_number(f64::NAN), "0");
        assert_eq!(css_number(-8.0), "-8");
    }

    #[test]
    fn set_replaces_in_place() {
        let mut style = StyleMap::new();
        style.set("a", "1").set("b", "2").set("a", "3");
        assert_eq!(style.get("a"), Some("3"));
        assert_eq!(style.len(), 2);
        assert_eq!(style.to_string(), "a: 3; b: 2");
    }
}
