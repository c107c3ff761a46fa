//! Composite quadrature rules over sampled (x, y) series
//!
//! Three independent rules are provided:
//! - [`trapezoidal`] - piecewise-linear, accepts non-uniform spacing
//! - [`simpson_1_3`] - piecewise-quadratic, odd point count, uniform spacing
//! - [`simpson_3_8`] - piecewise-cubic, `(n - 1) % 3 == 0`, uniform spacing
//!
//! Each rule reports an unmet precondition as a [`QuadratureError`]. The
//! [`integrate_all`] driver turns those into "unavailable" entries so a rule
//! that does not apply never blocks the other two.
//!
//! Sums are accumulated left to right over the input; the exact summation
//! order is an implementation detail.

use std::fmt;
use thiserror::Error;

/// Absolute tolerance of the uniform-spacing check.
pub const SPACING_ATOL: f64 = 1e-8;

/// Relative tolerance of the uniform-spacing check.
pub const SPACING_RTOL: f64 = 1e-5;

/// Structural precondition failures of a single quadrature rule.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum QuadratureError {
    /// `x` and `y` differ in length.
    #[error("x and y must have the same length ({x} vs {y})")]
    LengthMismatch {
        /// Length of `x`.
        x: usize,
        /// Length of `y`.
        y: usize,
    },

    /// Not enough points for the rule.
    #[error("{method} needs at least {required} points, got {actual}")]
    InsufficientPoints {
        /// Rule that was attempted.
        method: Method,
        /// Minimum point count of the rule.
        required: usize,
        /// Points supplied.
        actual: usize,
    },

    /// Simpson 1/3 needs an odd number of points.
    #[error("Simpson 1/3 needs an odd number of points, got {0}")]
    EvenPointCount(usize),

    /// Simpson 3/8 needs a multiple of three subintervals.
    #[error("Simpson 3/8 needs (points - 1) to be a multiple of 3, got {0} points")]
    IntervalsNotMultipleOfThree(usize),

    /// Consecutive x differences are not all equal.
    #[error("{method} needs equally spaced points (interval {index} differs from the first)")]
    NonUniformSpacing {
        /// Rule that was attempted.
        method: Method,
        /// Index of the first interval that differs.
        index: usize,
    },
}

/// The quadrature rules, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Composite trapezoidal rule.
    Trapezoidal,
    /// Composite Simpson 1/3 rule.
    Simpson13,
    /// Composite Simpson 3/8 rule.
    Simpson38,
}

impl Method {
    /// All methods in evaluation order. Ties in ranking go to the earlier one.
    pub const ALL: [Method; 3] = [Method::Trapezoidal, Method::Simpson13, Method::Simpson38];

    /// Label used in exported tables.
    pub fn label(self) -> &'static str {
        match self {
            Method::Trapezoidal => "Trapecios",
            Method::Simpson13 => "Simpson 1/3",
            Method::Simpson38 => "Simpson 3/8",
        }
    }

    /// Parse a table label or a short command-line name.
    pub fn from_name(name: &str) -> Option<Method> {
        match name.trim().to_lowercase().as_str() {
            "trapecios" | "trapezoidal" | "trapz" | "trap" => Some(Method::Trapezoidal),
            "simpson 1/3" | "simpson13" | "simpson-1-3" | "s13" => Some(Method::Simpson13),
            "simpson 3/8" | "simpson38" | "simpson-3-8" | "s38" => Some(Method::Simpson38),
            _ => None,
        }
    }

    /// Evaluate this rule on `(x, y)`.
    pub fn integrate(self, x: &[f64], y: &[f64]) -> Result<f64, QuadratureError> {
        match self {
            Method::Trapezoidal => trapezoidal(x, y),
            Method::Simpson13 => simpson_1_3(x, y),
            Method::Simpson38 => simpson_3_8(x, y),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn check_points(
    method: Method,
    x: &[f64],
    y: &[f64],
    required: usize,
) -> Result<usize, QuadratureError> {
    if x.len() != y.len() {
        return Err(QuadratureError::LengthMismatch {
            x: x.len(),
            y: y.len(),
        });
    }
    if x.len() < required {
        return Err(QuadratureError::InsufficientPoints {
            method,
            required,
            actual: x.len(),
        });
    }
    Ok(x.len())
}

/// Common step of an equally spaced grid.
///
/// Every interval must satisfy `|d - d0| <= ATOL + RTOL * |d0|`.
fn uniform_step(method: Method, x: &[f64]) -> Result<f64, QuadratureError> {
    let h = x[1] - x[0];
    for (index, pair) in x.windows(2).enumerate().skip(1) {
        let d = pair[1] - pair[0];
        // a NaN difference fails the comparison and is rejected too
        if !((d - h).abs() <= SPACING_ATOL + SPACING_RTOL * h.abs()) {
            return Err(QuadratureError::NonUniformSpacing { method, index });
        }
    }
    Ok(h)
}

/// Composite trapezoidal rule: `sum 0.5 * (y[i] + y[i+1]) * (x[i+1] - x[i])`.
///
/// Exact for piecewise-linear data and valid on non-uniform grids.
///
/// # Errors
///
/// Length mismatch or fewer than 2 points.
pub fn trapezoidal(x: &[f64], y: &[f64]) -> Result<f64, QuadratureError> {
    check_points(Method::Trapezoidal, x, y, 2)?;

    let area: f64 = x
        .windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| 0.5 * (ys[0] + ys[1]) * (xs[1] - xs[0]))
        .sum();

    #[cfg(feature = "tracing")]
    tracing::debug!(result = area, "trapezoidal integral");

    Ok(area)
}

/// Composite Simpson 1/3 rule.
///
/// `(h/3) * (y0 + y[n-1] + 4 * sum(odd interior) + 2 * sum(even interior))`.
/// Exact for polynomials up to degree three.
///
/// # Errors
///
/// Length mismatch, fewer than 3 points, an even point count or
/// non-uniform spacing.
pub fn simpson_1_3(x: &[f64], y: &[f64]) -> Result<f64, QuadratureError> {
    let n = check_points(Method::Simpson13, x, y, 3)?;
    if n % 2 == 0 {
        return Err(QuadratureError::EvenPointCount(n));
    }
    let h = uniform_step(Method::Simpson13, x)?;

    let interior = &y[1..n - 1];
    let odd: f64 = interior.iter().step_by(2).sum();
    let even: f64 = interior.iter().skip(1).step_by(2).sum();
    let area = (h / 3.0) * (y[0] + y[n - 1] + 4.0 * odd + 2.0 * even);

    #[cfg(feature = "tracing")]
    tracing::debug!(result = area, "Simpson 1/3 integral");

    Ok(area)
}

/// Composite Simpson 3/8 rule.
///
/// Weights follow `1, 3, 3, 2, 3, 3, 2, ..., 3, 3, 1` scaled by `3h/8`.
///
/// # Errors
///
/// Length mismatch, fewer than 4 points, `(n - 1)` not a multiple of 3 or
/// non-uniform spacing.
pub fn simpson_3_8(x: &[f64], y: &[f64]) -> Result<f64, QuadratureError> {
    let n = check_points(Method::Simpson38, x, y, 4)?;
    if (n - 1) % 3 != 0 {
        return Err(QuadratureError::IntervalsNotMultipleOfThree(n));
    }
    let h = uniform_step(Method::Simpson38, x)?;

    let weighted: f64 = y
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let w = if i == 0 || i == n - 1 {
                1.0
            } else if i % 3 == 0 {
                2.0
            } else {
                3.0
            };
            w * v
        })
        .sum();
    let area = 3.0 * h / 8.0 * weighted;

    #[cfg(feature = "tracing")]
    tracing::debug!(result = area, "Simpson 3/8 integral");

    Ok(area)
}

/// Result of one rule inside [`IntegrationResults`].
#[derive(Debug, Clone, PartialEq)]
pub struct IntegrationEntry {
    /// Rule that produced this entry.
    pub method: Method,
    /// Integral, or the precondition that made the rule unavailable.
    pub outcome: Result<f64, QuadratureError>,
}

impl IntegrationEntry {
    /// The integral when the rule applied.
    pub fn value(&self) -> Option<f64> {
        self.outcome.as_ref().ok().copied()
    }

    /// Why the rule was unavailable, if it was.
    pub fn unavailable_reason(&self) -> Option<&QuadratureError> {
        self.outcome.as_ref().err()
    }
}

/// Results of all rules over one series, in evaluation order.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegrationResults {
    entries: Vec<IntegrationEntry>,
}

impl IntegrationResults {
    /// Build from explicit entries. Order is kept and used for tie-breaking.
    pub fn from_entries(entries: Vec<IntegrationEntry>) -> Self {
        Self { entries }
    }

    /// All entries in evaluation order.
    pub fn entries(&self) -> &[IntegrationEntry] {
        &self.entries
    }

    /// Iterate over entries.
    pub fn iter(&self) -> impl Iterator<Item = &IntegrationEntry> {
        self.entries.iter()
    }

    /// Value for `method`, `None` when unavailable or not evaluated.
    pub fn get(&self, method: Method) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.method == method)
            .and_then(IntegrationEntry::value)
    }

    /// Methods that produced a value.
    pub fn available(&self) -> impl Iterator<Item = (Method, f64)> + '_ {
        self.entries
            .iter()
            .filter_map(|e| e.value().map(|v| (e.method, v)))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no rule was evaluated.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Evaluate every rule in [`Method::ALL`] order.
///
/// A rule whose precondition fails is recorded as unavailable with its
/// reason; the remaining rules still run.
pub fn integrate_all(x: &[f64], y: &[f64]) -> IntegrationResults {
    let entries = Method::ALL
        .iter()
        .map(|&method| {
            let outcome = method.integrate(x, y);

            #[cfg(feature = "tracing")]
            {
                if let Err(ref reason) = outcome {
                    tracing::warn!(method = %method, %reason, "integration rule unavailable");
                }
            }

            IntegrationEntry { method, outcome }
        })
        .collect();

    IntegrationResults { entries }
}
