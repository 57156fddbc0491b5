use serde::{Deserialize, Serialize};

/// Straight-alpha RGBA color with `f32` channels in `[0, 1]`.
///
/// Used for framebuffer clears and vertex colors; no premultiplication is
/// applied anywhere in the pipeline.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn black() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    #[inline]
    pub const fn white() -> Self {
        Self::new(1.0, 1.0, 1.0, 1.0)
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }

    /// Returns the color with every RGB channel reduced by `amount`, clamped at zero.
    ///
    /// Alpha is left untouched.
    #[inline]
    pub fn darkened(self, amount: f32) -> Self {
        Self {
            r: (self.r - amount).max(0.0),
            g: (self.g - amount).max(0.0),
            b: (self.b - amount).max(0.0),
            a: self.a,
        }
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[f32; 4]> for Rgba {
    fn from([r, g, b, a]: [f32; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn darkened_clamps_at_zero_and_keeps_alpha() {
        let c = Rgba::new(0.5, 0.1, 1.0, 0.7).darkened(0.25);
        assert_eq!(c, Rgba::new(0.25, 0.0, 0.75, 0.7));
    }

    #[test]
    fn deserializes_from_json_object() {
        let c: Rgba = serde_json::from_str(r#"{"r":1.0,"g":0.5,"b":0.0,"a":1.0}"#).unwrap();
        assert_eq!(c, Rgba::new(1.0, 0.5, 0.0, 1.0));
    }
}
