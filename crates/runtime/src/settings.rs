//! JSON run configuration.

use anyhow::{Context, Result};
use engine::{EngineConfig, FuelType};
use serde::Deserialize;
use std::path::Path;

/// Serialized run settings. Every field falls back to the calibrated
/// single-cylinder defaults when omitted.
#[derive(Deserialize)]
pub struct RunSettings {
    #[serde(default = "default_agent_steps")]
    pub agent_steps: usize,
    #[serde(default = "default_ivc")]
    pub ivc: f64,
    #[serde(default = "default_evo")]
    pub evo: f64,
    #[serde(default)]
    pub rpm: Option<f64>,
    #[serde(default)]
    pub mdot: Option<f64>,
    #[serde(default)]
    pub max_minj: Option<f64>,
    #[serde(default)]
    pub max_injections: Option<u32>,
    #[serde(default)]
    pub injection_delay: Option<f64>,
    #[serde(default)]
    pub negative_reward: Option<f64>,
    /// Decision steps at which the calibrated agent injects.
    #[serde(default)]
    pub injection_steps: Vec<usize>,
}

fn default_agent_steps() -> usize {
    101
}

fn default_ivc() -> f64 {
    -100.0
}

fn default_evo() -> f64 {
    100.0
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            agent_steps: default_agent_steps(),
            ivc: default_ivc(),
            evo: default_evo(),
            rpm: None,
            mdot: None,
            max_minj: None,
            max_injections: None,
            injection_delay: None,
            negative_reward: None,
            injection_steps: Vec::new(),
        }
    }
}

impl RunSettings {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing settings file {}", path.display()))
    }

    /// Applies the settings on top of the default engine configuration.
    pub fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = EngineConfig {
            fuel: FuelType::Dodecane,
            agent_steps: self.agent_steps,
            ivc: self.ivc,
            evo: self.evo,
            ..EngineConfig::default()
        };
        if let Some(rpm) = self.rpm {
            config.rpm = rpm;
        }
        if let Some(mdot) = self.mdot {
            config.mdot = mdot;
        }
        if let Some(max_minj) = self.max_minj {
            config.max_minj = max_minj;
        }
        if let Some(delay) = self.injection_delay {
            config.injection_delay = delay;
        }
        if let Some(nr) = self.negative_reward {
            config.negative_reward = nr;
        }
        config.max_injections = self.max_injections;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_the_default_configuration() {
        let settings: RunSettings = serde_json::from_str("{}").unwrap();
        let config = settings.engine_config().unwrap();
        assert_eq!(config.agent_steps, 101);
        assert!((config.ivc + 100.0).abs() < 1e-12);
    }

    #[test]
    fn overrides_land_in_the_engine_config() {
        let text = r#"{
            "agent_steps": 51,
            "rpm": 1800.0,
            "max_injections": 3,
            "injection_steps": [10, 20]
        }"#;
        let settings: RunSettings = serde_json::from_str(text).unwrap();
        let config = settings.engine_config().unwrap();
        assert_eq!(config.agent_steps, 51);
        assert!((config.rpm - 1800.0).abs() < 1e-12);
        assert_eq!(config.max_injections, Some(3));
        assert_eq!(settings.injection_steps, vec![10, 20]);
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let settings: RunSettings = serde_json::from_str(r#"{"agent_steps": 1}"#).unwrap();
        assert!(settings.engine_config().is_err());
    }
}
