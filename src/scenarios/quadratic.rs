//! Quadratic function explorer.
//!
//! Closed form, no time evolution: `f(x) = a·x² + b·x + c` with derivative
//! `f'(x) = 2a·x + b`, sampled across the visible domain, plus an optional
//! tangent line at a chosen point. Coefficients are integer-stepped.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Model;
use crate::engine::{ParamSpec, ParameterSet};
use crate::error::{SimError, SimResult};
use crate::visualization::{Point2, Segment};

/// Parameter names.
pub const A: &str = "a";
/// Parameter names.
pub const B: &str = "b";
/// Parameter names.
pub const C: &str = "c";
/// Parameter names.
pub const TANGENT_X: &str = "tangent_x";
/// Parameter names.
pub const SHOW_TANGENT: &str = "show_tangent";

/// Coefficients of `a·x² + b·x + c`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct QuadraticParams {
    /// Quadratic coefficient.
    pub a: f64,
    /// Linear coefficient.
    pub b: f64,
    /// Constant term.
    pub c: f64,
}

impl QuadraticParams {
    /// Create coefficients.
    #[must_use]
    pub const fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    /// `f(x)`.
    #[must_use]
    pub fn eval(&self, x: f64) -> f64 {
        self.a * x * x + self.b * x + self.c
    }

    /// `f'(x)`.
    #[must_use]
    pub fn derivative(&self, x: f64) -> f64 {
        2.0 * self.a * x + self.b
    }

    /// Sample `f` on `[min, max]` every `step`, both ends included.
    ///
    /// Abscissae are computed as `min + i·step` so the error does not
    /// accumulate across the domain. When `step` does not divide the domain
    /// the final interval is shorter and ends exactly on `max`.
    #[must_use]
    pub fn sample(&self, min: f64, max: f64, step: f64) -> Vec<Point2> {
        if step.is_nan() || step <= 0.0 || min.is_nan() || max.is_nan() || max < min {
            return Vec::new();
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let steps = ((max - min) / step + 1e-9).floor() as usize;
        let mut points: Vec<Point2> = (0..steps)
            .map(|i| {
                let x = min + i as f64 * step;
                Point2::new(x, self.eval(x))
            })
            .collect();
        // The last regular sample either is the right edge up to rounding, or
        // falls short of it and the edge is added.
        let last = min + steps as f64 * step;
        if max - last > step * 1e-9 {
            points.push(Point2::new(last, self.eval(last)));
        }
        points.push(Point2::new(max, self.eval(max)));
        points
    }

    /// Tangent at `x0`, extended to the ends of `[min, max]`.
    #[must_use]
    pub fn tangent(&self, x0: f64, min: f64, max: f64) -> Tangent {
        let y0 = self.eval(x0);
        let slope = self.derivative(x0);
        let line = |x: f64| Point2::new(x, y0 + slope * (x - x0));
        Tangent {
            point: Point2::new(x0, y0),
            slope,
            segment: Segment {
                from: line(min),
                to: line(max),
            },
        }
    }

    /// Display form, e.g. `y = x² + 2x`.
    #[must_use]
    pub fn equation(&self) -> String {
        let mut terms = String::new();
        push_term(&mut terms, self.a, "x²");
        push_term(&mut terms, self.b, "x");
        push_term(&mut terms, self.c, "");
        if terms.is_empty() {
            terms.push('0');
        }
        format!("y = {terms}")
    }

    /// Derivative display form, e.g. `f'(x) = 2x + 2`.
    #[must_use]
    pub fn derivative_equation(&self) -> String {
        let mut terms = String::new();
        push_term(&mut terms, 2.0 * self.a, "x");
        push_term(&mut terms, self.b, "");
        if terms.is_empty() {
            terms.push('0');
        }
        format!("f'(x) = {terms}")
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        #[allow(clippy::cast_possible_truncation)]
        let whole = value as i64;
        whole.to_string()
    } else {
        value.to_string()
    }
}

/// Append `coef·suffix` with a sign separator. Zero terms are skipped and a
/// unit coefficient is elided when a variable follows.
fn push_term(out: &mut String, coef: f64, suffix: &str) {
    if coef == 0.0 {
        return;
    }
    let magnitude = coef.abs();
    let body = if magnitude == 1.0 && !suffix.is_empty() {
        suffix.to_string()
    } else {
        format!("{}{suffix}", format_number(magnitude))
    };
    match (out.is_empty(), coef < 0.0) {
        (true, false) => out.push_str(&body),
        (true, true) => {
            out.push('-');
            out.push_str(&body);
        }
        (false, false) => {
            out.push_str(" + ");
            out.push_str(&body);
        }
        (false, true) => {
            out.push_str(" - ");
            out.push_str(&body);
        }
    }
}

/// Tangent line at a point of the curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tangent {
    /// Point of tangency `(x0, f(x0))`.
    pub point: Point2,
    /// `f'(x0)`.
    pub slope: f64,
    /// Line across the visible domain.
    pub segment: Segment,
}

impl Tangent {
    /// Caption, e.g. `Slope at x=1.0: 4.00`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("Slope at x={:.1}: {:.2}", self.point.x, self.slope)
    }
}

/// Mapping between math and canvas coordinates. Origin at the canvas
/// center, y up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasTransform {
    /// Canvas width (px).
    pub width: f64,
    /// Canvas height (px).
    pub height: f64,
    /// Pixels per unit.
    pub scale: f64,
}

impl CanvasTransform {
    /// Math to canvas.
    #[must_use]
    pub fn to_canvas(&self, p: Point2) -> Point2 {
        Point2::new(
            p.x * self.scale + self.width / 2.0,
            self.height / 2.0 - p.y * self.scale,
        )
    }

    /// Canvas to math.
    #[must_use]
    pub fn to_math(&self, p: Point2) -> Point2 {
        Point2::new(
            (p.x - self.width / 2.0) / self.scale,
            (self.height / 2.0 - p.y) / self.scale,
        )
    }

    /// Visible x range.
    #[must_use]
    pub fn x_domain(&self) -> (f64, f64) {
        let half = self.width / 2.0 / self.scale;
        (-half, half)
    }
}

/// Configuration for the quadratic explorer.
///
/// Coefficient ranges are checked by [`QuadraticConfig::check_ranges`].
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct QuadraticConfig {
    /// Default `a`.
    pub a: f64,
    /// Default `b`.
    pub b: f64,
    /// Default `c`.
    pub c: f64,
    /// Default tangent abscissa.
    pub tangent_x: f64,
    /// Tangent shown by default.
    pub show_tangent: bool,
    /// Canvas width (px).
    #[validate(range(min = 1.0, max = 4096.0))]
    pub canvas_width: f64,
    /// Canvas height (px).
    #[validate(range(min = 1.0, max = 4096.0))]
    pub canvas_height: f64,
    /// Pixels per unit.
    #[validate(range(min = 1.0, max = 1000.0))]
    pub scale: f64,
    /// Sampling step in canvas pixels.
    #[validate(range(min = 0.01, max = 50.0))]
    pub sample_step_px: f64,
}

impl Default for QuadraticConfig {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 2.0,
            c: 0.0,
            tangent_x: 0.0,
            show_tangent: false,
            canvas_width: 400.0,
            canvas_height: 400.0,
            scale: 25.0,
            sample_step_px: 0.1,
        }
    }
}

impl QuadraticConfig {
    fn parameter_set(&self) -> ParameterSet {
        ParameterSet::new(
            "quadratic",
            [
                ParamSpec::new(A, -3.0, 3.0, 1.0, self.a).integral(),
                ParamSpec::new(B, -5.0, 5.0, 1.0, self.b).integral(),
                ParamSpec::new(C, -5.0, 5.0, 1.0, self.c).integral(),
                ParamSpec::new(TANGENT_X, -8.0, 8.0, 0.1, self.tangent_x),
                ParamSpec::new(
                    SHOW_TANGENT,
                    0.0,
                    1.0,
                    1.0,
                    if self.show_tangent { 1.0 } else { 0.0 },
                )
                .integral(),
            ],
        )
    }

    /// Check the defaults against the control ranges.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] for a default outside its range or a
    /// fractional coefficient.
    pub fn check_ranges(&self) -> SimResult<()> {
        let params = self.parameter_set();
        for (name, value) in [(A, self.a), (B, self.b), (C, self.c), (TANGENT_X, self.tangent_x)] {
            let in_range = params.spec(name).is_some_and(|spec| spec.contains(value));
            if !in_range {
                return Err(SimError::config(format!(
                    "Quadratic {name} = {value} is outside its range"
                )));
            }
        }
        for (name, value) in [(A, self.a), (B, self.b), (C, self.c)] {
            if value.fract() != 0.0 {
                return Err(SimError::config(format!(
                    "Quadratic coefficient {name} must be an integer, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Coordinate mapping for the configured canvas.
    #[must_use]
    pub const fn transform(&self) -> CanvasTransform {
        CanvasTransform {
            width: self.canvas_width,
            height: self.canvas_height,
            scale: self.scale,
        }
    }
}

/// Snapshot for the function plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuadraticFrame {
    /// Coefficients.
    pub params: QuadraticParams,
    /// Curve samples in math coordinates.
    pub points: Vec<Point2>,
    /// Tangent, when shown.
    pub tangent: Option<Tangent>,
    /// Equation text.
    pub equation: String,
    /// Derivative text.
    pub derivative: String,
    /// Canvas mapping.
    pub transform: CanvasTransform,
}

/// Quadratic explorer.
#[derive(Debug, Clone)]
pub struct QuadraticModel {
    config: QuadraticConfig,
    params: ParameterSet,
}

impl QuadraticModel {
    /// Create an explorer at the configured coefficients.
    #[must_use]
    pub fn new(config: QuadraticConfig) -> Self {
        let params = config.parameter_set();
        Self { config, params }
    }

    /// Get configuration.
    #[must_use]
    pub const fn config(&self) -> &QuadraticConfig {
        &self.config
    }

    /// Current coefficients.
    #[must_use]
    pub fn coefficients(&self) -> QuadraticParams {
        QuadraticParams::new(
            self.params.value(A),
            self.params.value(B),
            self.params.value(C),
        )
    }

    /// Whether the tangent is shown.
    #[must_use]
    pub fn show_tangent(&self) -> bool {
        self.params.value(SHOW_TANGENT) >= 0.5
    }

    /// Curve samples across the visible domain.
    #[must_use]
    pub fn points(&self) -> Vec<Point2> {
        let transform = self.config.transform();
        let (min, max) = transform.x_domain();
        self.coefficients()
            .sample(min, max, self.config.sample_step_px / transform.scale)
    }

    /// Tangent at the current abscissa, regardless of visibility.
    #[must_use]
    pub fn tangent(&self) -> Tangent {
        let (min, max) = self.config.transform().x_domain();
        self.coefficients()
            .tangent(self.params.value(TANGENT_X), min, max)
    }
}

impl Default for QuadraticModel {
    fn default() -> Self {
        Self::new(QuadraticConfig::default())
    }
}

impl Model for QuadraticModel {
    type Frame = QuadraticFrame;

    fn name(&self) -> &'static str {
        "quadratic"
    }

    fn parameters(&self) -> &ParameterSet {
        &self.params
    }

    fn set_parameter(&mut self, name: &str, value: f64) -> SimResult<f64> {
        self.params.set(name, value)
    }

    fn reset(&mut self) {
        self.params.reset_to_defaults();
    }

    fn frame(&self) -> QuadraticFrame {
        let params = self.coefficients();
        QuadraticFrame {
            params,
            points: self.points(),
            tangent: self.show_tangent().then(|| self.tangent()),
            equation: params.equation(),
            derivative: params.derivative_equation(),
            transform: self.config.transform(),
        }
    }
}
