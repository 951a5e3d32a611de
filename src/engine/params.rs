//! Bounded parameter store.
//!
//! Every model exposes its tunables as a [`ParameterSet`]: an ordered list of
//! named values, each with a declared inclusive range and slider step. Values
//! are only ever written through [`ParameterSet::set`], which clamps them into
//! range, so readers never observe an out-of-range value.

use serde::Serialize;

use crate::error::{SimError, SimResult};

/// Declaration of a single tunable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamSpec {
    /// Parameter name used by `set_parameter`.
    pub name: &'static str,
    /// Inclusive lower bound.
    pub min: f64,
    /// Inclusive upper bound.
    pub max: f64,
    /// Slider step (renderer hint).
    pub step: f64,
    /// Default value.
    pub default: f64,
    /// Round to the nearest integer before clamping.
    pub integral: bool,
}

impl ParamSpec {
    /// Declare a continuous parameter.
    #[must_use]
    pub const fn new(name: &'static str, min: f64, max: f64, step: f64, default: f64) -> Self {
        Self {
            name,
            min,
            max,
            step,
            default,
            integral: false,
        }
    }

    /// Mark the parameter as integer-stepped.
    #[must_use]
    pub const fn integral(mut self) -> Self {
        self.integral = true;
        self
    }

    /// Bring `value` into range: round if integral, then clamp.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        let value = if self.integral { value.round() } else { value };
        value.clamp(self.min, self.max)
    }

    /// Check whether `value` lies in `[min, max]`.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// A declared parameter paired with its current value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamEntry {
    /// Declaration.
    pub spec: ParamSpec,
    /// Current (always in-range) value.
    pub value: f64,
}

/// Validated tunables for one model instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSet {
    model: &'static str,
    entries: Vec<ParamEntry>,
}

impl ParameterSet {
    /// Create a set from declarations, each starting at its (clamped) default.
    #[must_use]
    pub fn new(model: &'static str, specs: impl IntoIterator<Item = ParamSpec>) -> Self {
        let entries = specs
            .into_iter()
            .map(|spec| {
                let value = spec.clamp(spec.default);
                ParamEntry { spec, value }
            })
            .collect();
        Self { model, entries }
    }

    /// Name of the owning model.
    #[must_use]
    pub const fn model(&self) -> &'static str {
        self.model
    }

    /// Get a parameter value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.entry(name).map(|e| e.value)
    }

    /// Get a parameter value, falling back to `0.0` for undeclared names.
    ///
    /// Models use this for their own declared names only.
    #[must_use]
    pub fn value(&self, name: &str) -> f64 {
        self.get(name).unwrap_or_default()
    }

    /// Get a declaration by name.
    #[must_use]
    pub fn spec(&self, name: &str) -> Option<&ParamSpec> {
        self.entry(name).map(|e| &e.spec)
    }

    /// Set a value, clamping it into the declared range.
    ///
    /// Returns the value actually stored.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownParameter`] for an undeclared name and
    /// [`SimError::InvalidParameter`] for NaN or infinite input. The stored
    /// value is unchanged in both cases.
    pub fn set(&mut self, name: &str, value: f64) -> SimResult<f64> {
        let model = self.model;
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.spec.name == name)
            .ok_or_else(|| SimError::unknown_parameter(model, name))?;

        if !value.is_finite() {
            return Err(SimError::InvalidParameter {
                name: name.to_string(),
                value,
            });
        }

        let clamped = entry.spec.clamp(value);
        if clamped != value {
            tracing::debug!(model, name, requested = value, stored = clamped, "parameter clamped");
        }
        entry.value = clamped;
        Ok(clamped)
    }

    /// Restore every parameter to its default.
    pub fn reset_to_defaults(&mut self) {
        for entry in &mut self.entries {
            entry.value = entry.spec.clamp(entry.spec.default);
        }
    }

    /// Iterate over all entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ParamEntry> {
        self.entries.iter()
    }

    /// Number of declared parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set declares no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&self, name: &str) -> Option<&ParamEntry> {
        self.entries.iter().find(|e| e.spec.name == name)
    }
}
