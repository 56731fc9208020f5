use crate::core::types::finite_or_zero;

/// Linear data-to-ratio mapping over `[domain_start, domain_end]`.
///
/// Degenerate domains (equal or non-finite ends) map every value to ratio `0`
/// instead of failing, so per-frame geometry never sees NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
}

impl LinearScale {
    #[must_use]
    pub fn new(domain_start: f64, domain_end: f64) -> Self {
        Self {
            domain_start,
            domain_end,
        }
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn is_degenerate(self) -> bool {
        let span = self.domain_end - self.domain_start;
        !span.is_finite() || span == 0.0
    }

    /// `(value − start) / (end − start)`, or `0` for degenerate input.
    #[must_use]
    pub fn ratio(self, value: f64) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        finite_or_zero((value - self.domain_start) / (self.domain_end - self.domain_start))
    }

    /// Inverse of `ratio`; degenerate domains return the domain start.
    #[must_use]
    pub fn value_at(self, ratio: f64) -> f64 {
        if self.is_degenerate() {
            return finite_or_zero(self.domain_start);
        }
        finite_or_zero(self.domain_start + ratio * (self.domain_end - self.domain_start))
    }

    /// Maps `value` onto `[0, length]` pixels.
    #[must_use]
    pub fn to_pixel(self, value: f64, length: f64) -> f64 {
        finite_or_zero(self.ratio(value) * length)
    }

    /// Maps a pixel offset in `[0, length]` back to a domain value.
    #[must_use]
    pub fn from_pixel(self, pixel: f64, length: f64) -> f64 {
        if !length.is_finite() || length <= 0.0 {
            return finite_or_zero(self.domain_start);
        }
        self.value_at(pixel / length)
    }
}
