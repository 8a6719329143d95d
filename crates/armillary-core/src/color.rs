//! Color handling for Armillary diagrams
//!
//! [`Color`] wraps the `DynamicColor` type from the color crate so that any CSS
//! color string ("blue", "#ff8000", "rgb(0 128 0)") can be used for edges and
//! backgrounds, and converts it into the `#rrggbb` notation Graphviz expects.

use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::{DynamicColor, Srgb};

/// A parsed CSS color.
///
/// Equality is decided on the resolved sRGB value, so `"red"` and `"#ff0000"`
/// compare equal.
#[derive(Clone, Copy, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl PartialEq for Color {
    fn eq(&self, other: &Self) -> bool {
        self.to_hex() == other.to_hex()
    }
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_hex().hash(state);
    }
}

impl Color {
    /// Parses a CSS color string.
    ///
    /// # Examples
    ///
    /// ```
    /// use armillary_core::color::Color;
    ///
    /// let purple = Color::new("purple").unwrap();
    /// let brown = Color::new("#a52a2a").unwrap();
    /// assert!(Color::new("not-a-color").is_err());
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        DynamicColor::from_str(color_str)
            .map(|color| Self { color })
            .map_err(|err| format!("invalid color `{color_str}`: {err}"))
    }

    /// Returns a copy of this color with the given alpha, clamped to `0.0..=1.0`.
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            color: self.color.with_alpha(alpha.clamp(0.0, 1.0)),
        }
    }

    /// Returns the alpha component of this color.
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }

    /// Returns the color in Graphviz hex notation.
    ///
    /// Opaque colors are written as `#rrggbb`, translucent ones as `#rrggbbaa`.
    ///
    /// ```
    /// use armillary_core::color::Color;
    ///
    /// assert_eq!(Color::new("blue").unwrap().to_hex(), "#0000ff");
    /// assert_eq!(Color::new("red").unwrap().with_alpha(0.0).to_hex(), "#ff000000");
    /// ```
    pub fn to_hex(&self) -> String {
        let rgba = self.color.to_alpha_color::<Srgb>().to_rgba8();
        if rgba.a == u8::MAX {
            format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b, rgba.a)
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    /// Any opaque `#rrggbb` color survives parsing and hex formatting.
    fn check_hex_roundtrip(r: u8, g: u8, b: u8) -> Result<(), TestCaseError> {
        let hex = format!("#{r:02x}{g:02x}{b:02x}");
        let color = Color::new(&hex).map_err(TestCaseError::fail)?;
        prop_assert_eq!(color.to_hex(), hex);
        Ok(())
    }

    /// Alpha always lands in `0.0..=1.0`.
    fn check_alpha_is_clamped(alpha: f32) -> Result<(), TestCaseError> {
        let color = Color::default().with_alpha(alpha);
        prop_assert!((0.0..=1.0).contains(&color.alpha()));
        Ok(())
    }

    proptest! {
        #[test]
        fn hex_roundtrip(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
            check_hex_roundtrip(r, g, b)?;
        }

        #[test]
        fn alpha_is_clamped(alpha in -10.0f32..10.0) {
            check_alpha_is_clamped(alpha)?;
        }
    }
}
