//! Named per-command attributes, interpolated along generated spans.

use scrawl_math::Vector2;

/// A scalar or 2D vector attribute value.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum AttributeValue {
    Scalar(f32),
    Vector(Vector2),
}

impl AttributeValue {
    /// Number of f32 components this value occupies in a vertex buffer.
    #[inline]
    pub fn components(self) -> usize {
        match self {
            AttributeValue::Scalar(_) => 1,
            AttributeValue::Vector(_) => 2,
        }
    }

    /// Component `i`, or 0.0 past the end (a scalar read as a vector pads
    /// with zero).
    #[inline]
    pub fn component(self, i: usize) -> f32 {
        match (self, i) {
            (AttributeValue::Scalar(s), 0) => s,
            (AttributeValue::Vector(v), 0) => v.x,
            (AttributeValue::Vector(v), 1) => v.y,
            _ => 0.0,
        }
    }

    #[inline]
    pub fn as_scalar(self) -> f32 {
        self.component(0)
    }

    /// Linear interpolation. Mixed variants widen to vectors, padding the
    /// scalar side with zero.
    pub fn lerp(from: AttributeValue, to: AttributeValue, t: f32) -> AttributeValue {
        use AttributeValue::*;
        match (from, to) {
            (Scalar(a), Scalar(b)) => Scalar(a + (b - a) * t),
            _ => {
                let a = Vector2::new(from.component(0), from.component(1));
                let b = Vector2::new(to.component(0), to.component(1));
                Vector(a.lerp(b, t))
            }
        }
    }
}

impl From<f32> for AttributeValue {
    fn from(value: f32) -> AttributeValue {
        AttributeValue::Scalar(value)
    }
}

impl From<Vector2> for AttributeValue {
    fn from(value: Vector2) -> AttributeValue {
        AttributeValue::Vector(value)
    }
}

/// An insertion-ordered map of named attribute values.
///
/// Iteration order is the order keys were first set; the vertex layout pass
/// depends on this being deterministic.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Attributes {
    entries: Vec<(String, AttributeValue)>,
}

impl Attributes {
    pub fn new() -> Attributes {
        Attributes {
            entries: Vec::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<AttributeValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| *v)
    }

    pub fn set(&mut self, key: &str, value: impl Into<AttributeValue>) {
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key.to_string(), value));
        }
    }

    pub fn remove(&mut self, key: &str) {
        self.entries.retain(|(k, _)| k != key);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, AttributeValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The interpolated value of `key` at fraction `t` between two command
    /// attribute sets. A key missing on one side holds the other side's
    /// value constant; missing on both sides yields `None`.
    pub fn interpolate(from: &Attributes, to: &Attributes, key: &str, t: f32) -> Option<AttributeValue> {
        match (from.get(key), to.get(key)) {
            (Some(a), Some(b)) => Some(AttributeValue::lerp(a, b, t)),
            (Some(a), None) => Some(a),
            (None, Some(b)) => Some(b),
            (None, None) => None,
        }
    }
}
