//! Lab configuration with YAML loading and validation.
//!
//! Every model ships with classroom defaults, so an empty document is a valid
//! configuration. Loading is layered:
//! - serde parses the YAML into typed structs, rejecting unknown keys
//! - `validator` checks declared ranges field by field
//! - semantic checks catch combinations no single field can express

use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

use crate::engine::SimTime;
use crate::error::{SimError, SimResult};
use crate::scenarios::{ChemistryConfig, PendulumConfig, PopulationConfig, QuadraticConfig};

/// Top-level configuration for a lab session.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct LabConfig {
    /// Schema version for forward compatibility.
    #[validate(length(min = 1))]
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Master seed for every random draw.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Host display settings.
    #[validate(nested)]
    #[serde(default)]
    pub display: DisplayConfig,

    /// Pendulum defaults.
    #[validate(nested)]
    #[serde(default)]
    pub pendulum: PendulumConfig,

    /// Predator-prey defaults.
    #[validate(nested)]
    #[serde(default)]
    pub population: PopulationConfig,

    /// Chemistry defaults.
    #[validate(nested)]
    #[serde(default)]
    pub chemistry: ChemistryConfig,

    /// Quadratic explorer defaults.
    #[validate(nested)]
    #[serde(default)]
    pub quadratic: QuadraticConfig,
}

fn default_schema_version() -> String {
    "1.0".to_string()
}

const fn default_seed() -> u64 {
    42
}

impl LabConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - YAML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> SimResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> SimResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;

        config.validate()?;
        config.validate_semantic()?;

        Ok(config)
    }

    /// Serialize to YAML.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_yaml(&self) -> SimResult<String> {
        serde_yaml::to_string(self).map_err(|e| SimError::serialization(e.to_string()))
    }

    /// Create a builder for configuration.
    #[must_use]
    pub fn builder() -> LabConfigBuilder {
        LabConfigBuilder::default()
    }

    /// Chemistry settings with the master seed applied.
    #[must_use]
    pub fn chemistry_config(&self) -> ChemistryConfig {
        ChemistryConfig {
            seed: self.seed,
            ..self.chemistry.clone()
        }
    }

    /// Validate semantic constraints beyond schema.
    fn validate_semantic(&self) -> SimResult<()> {
        let p = &self.pendulum;
        if p.pivot_y >= p.canvas_height {
            return Err(SimError::config(format!(
                "Pendulum pivot at y={} lies outside a canvas {} px tall",
                p.pivot_y, p.canvas_height
            )));
        }

        let c = &self.chemistry;
        if 2.0 * c.particle_radius >= c.width.min(c.height) {
            return Err(SimError::config(format!(
                "Particles of radius {} do not fit a {}x{} box",
                c.particle_radius, c.width, c.height
            )));
        }

        self.quadratic.check_ranges()
    }
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            seed: default_seed(),
            display: DisplayConfig::default(),
            pendulum: PendulumConfig::default(),
            population: PopulationConfig::default(),
            chemistry: ChemistryConfig::default(),
            quadratic: QuadraticConfig::default(),
        }
    }
}

/// Configuration builder for programmatic construction.
#[derive(Debug, Default)]
pub struct LabConfigBuilder {
    seed: Option<u64>,
    frame_rate: Option<u32>,
    restart_delay_ms: Option<Option<u64>>,
    pendulum: Option<PendulumConfig>,
    population: Option<PopulationConfig>,
}

impl LabConfigBuilder {
    /// Set the random seed.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the display refresh rate.
    #[must_use]
    pub const fn frame_rate(mut self, hz: u32) -> Self {
        self.frame_rate = Some(hz);
        self
    }

    /// Set the chemistry restart delay; `None` resets in place.
    #[must_use]
    pub const fn restart_delay_ms(mut self, delay: Option<u64>) -> Self {
        self.restart_delay_ms = Some(delay);
        self
    }

    /// Set pendulum defaults.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn pendulum(mut self, config: PendulumConfig) -> Self {
        self.pendulum = Some(config);
        self
    }

    /// Set predator-prey defaults.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn population(mut self, config: PopulationConfig) -> Self {
        self.population = Some(config);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> LabConfig {
        let mut config = LabConfig::default();

        if let Some(seed) = self.seed {
            config.seed = seed;
        }

        if let Some(hz) = self.frame_rate {
            config.display.frame_rate_hz = hz;
        }

        if let Some(delay) = self.restart_delay_ms {
            config.chemistry.restart_delay_ms = delay;
        }

        if let Some(pendulum) = self.pendulum {
            config.pendulum = pendulum;
        }

        if let Some(population) = self.population {
            config.population = population;
        }

        config
    }
}

/// Host display settings.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DisplayConfig {
    /// Animation frames per second.
    #[validate(range(min = 1, max = 240))]
    #[serde(default = "default_frame_rate")]
    pub frame_rate_hz: u32,
}

const fn default_frame_rate() -> u32 {
    60
}

impl DisplayConfig {
    /// Interval between animation frames.
    #[must_use]
    pub fn frame_interval(&self) -> SimTime {
        let hz = u64::from(self.frame_rate_hz.max(1));
        SimTime::from_nanos((1_000_000_000 + hz / 2) / hz)
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            frame_rate_hz: default_frame_rate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = LabConfig::default();

        assert_eq!(config.schema_version, "1.0");
        assert_eq!(config.seed, 42);
        assert_eq!(config.display.frame_rate_hz, 60);
        assert!((config.pendulum.length - 150.0).abs() < f64::EPSILON);
        assert_eq!(config.population.interval_ms, 500);
        assert_eq!(config.chemistry.restart_delay_ms, Some(100));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = LabConfig::builder()
            .seed(12345)
            .frame_rate(30)
            .restart_delay_ms(None)
            .build();

        assert_eq!(config.seed, 12345);
        assert_eq!(config.display.frame_rate_hz, 30);
        assert_eq!(config.chemistry.restart_delay_ms, None);
        assert_eq!(config.chemistry_config().seed, 12345);
    }

    #[test]
    fn test_config_empty_yaml() {
        let config = LabConfig::from_yaml("{}");
        assert!(config.is_ok());
    }

    #[test]
    fn test_config_yaml_parse() {
        let yaml = r"
seed: 7
display:
  frame_rate_hz: 120
pendulum:
  length: 120
  gravity: 3.7
chemistry:
  temperature: 60
  restart_delay_ms: null
quadratic:
  a: -2
  show_tangent: true
";
        let config = LabConfig::from_yaml(yaml).ok();
        assert!(config.is_some());
        let config = config.unwrap_or_default();
        assert_eq!(config.seed, 7);
        assert_eq!(config.display.frame_rate_hz, 120);
        assert!((config.pendulum.length - 120.0).abs() < f64::EPSILON);
        assert!((config.pendulum.gravity - 3.7).abs() < f64::EPSILON);
        assert!((config.chemistry.temperature - 60.0).abs() < f64::EPSILON);
        assert_eq!(config.chemistry.restart_delay_ms, None);
        assert!(config.quadratic.show_tangent);
        // Untouched sections keep their defaults.
        assert!((config.population.birth_rate - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_config_rejects_unknown_section() {
        let result = LabConfig::from_yaml("biology:\n  cells: 4\n");
        assert!(matches!(result, Err(SimError::YamlParse(_))));
    }

    #[test]
    fn test_config_validation_fails_out_of_range() {
        let yaml = r"
pendulum:
  gravity: 50.0
";
        let result = LabConfig::from_yaml(yaml);
        assert!(matches!(result, Err(SimError::Validation(_))));
    }

    #[test]
    fn test_config_validation_bounds_quadratic_sampling() {
        for yaml in [
            "quadratic:\n  canvas_width: 1000000\n",
            "quadratic:\n  sample_step_px: 0.001\n",
            "quadratic:\n  sample_step_px: 500\n",
        ] {
            let result = LabConfig::from_yaml(yaml);
            assert!(matches!(result, Err(SimError::Validation(_))), "{yaml}");
        }
        assert!(LabConfig::from_yaml("quadratic:\n  canvas_width: 4096\n").is_ok());
    }

    #[test]
    fn test_config_validation_fails_frame_rate() {
        let result = LabConfig::from_yaml("display:\n  frame_rate_hz: 0\n");
        assert!(matches!(result, Err(SimError::Validation(_))));
    }

    #[test]
    fn test_config_semantic_fractional_coefficient() {
        let result = LabConfig::from_yaml("quadratic:\n  b: 1.5\n");
        assert!(matches!(result, Err(SimError::Config { .. })));
    }

    #[test]
    fn test_config_semantic_coefficient_range() {
        let result = LabConfig::from_yaml("quadratic:\n  a: -7\n");
        assert!(matches!(result, Err(SimError::Config { .. })));
    }

    #[test]
    fn test_config_semantic_particle_too_large() {
        let yaml = r"
chemistry:
  width: 8
  height: 300
";
        let result = LabConfig::from_yaml(yaml);
        assert!(matches!(result, Err(SimError::Config { .. })));
    }

    #[test]
    fn test_config_semantic_pivot_outside_canvas() {
        let result = LabConfig::from_yaml("pendulum:\n  pivot_y: 400\n");
        assert!(matches!(result, Err(SimError::Config { .. })));
    }

    #[test]
    fn test_config_yaml_round_trip() {
        let config = LabConfig::builder().seed(9).build();
        let yaml = config.to_yaml();
        assert!(yaml.is_ok());
        let parsed = LabConfig::from_yaml(&yaml.unwrap_or_default());
        assert_eq!(parsed.ok().map(|c| c.seed), Some(9));
    }

    #[test]
    fn test_config_load_file() {
        let dir = tempfile::tempdir().ok();
        let Some(dir) = dir else { return };
        let path = dir.path().join("lab.yaml");
        assert!(std::fs::write(&path, "seed: 3\n").is_ok());
        let config = LabConfig::load(&path);
        assert_eq!(config.ok().map(|c| c.seed), Some(3));
    }

    #[test]
    fn test_config_load_missing_file() {
        let result = LabConfig::load("/nonexistent/lab.yaml");
        assert!(matches!(result, Err(SimError::Io(_))));
    }

    #[test]
    fn test_frame_interval() {
        let display = DisplayConfig::default();
        assert_eq!(display.frame_interval(), SimTime::from_nanos(16_666_667));
        let display = DisplayConfig { frame_rate_hz: 50 };
        assert_eq!(display.frame_interval(), SimTime::from_millis(20));
    }
}
