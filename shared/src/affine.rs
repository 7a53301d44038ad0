use crate::error::PathError;

/// A linear function `f(x) = a * x + b` over arc length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineLine {
    pub a: f64,
    pub b: f64,
}

impl AffineLine {
    /// A zero-slope line that returns `value` everywhere.
    pub fn constant(value: f64) -> Self {
        Self { a: 0.0, b: value }
    }

    /// Fits the line through `(length0, value0)` and `(length1, value1)`.
    pub fn from_points(
        length0: f64,
        value0: f64,
        length1: f64,
        value1: f64,
    ) -> Result<Self, PathError> {
        if length1 == length0 {
            return Err(PathError::DegenerateSegment { length: length0 });
        }

        let a = (value1 - value0) / (length1 - length0);
        Ok(Self {
            a,
            b: value0 - a * length0,
        })
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        // 0 * inf is NaN, constants must clamp for any input
        if self.a == 0.0 {
            return self.b;
        }
        self.a * x + self.b
    }
}
