use std::{env, path::PathBuf};

use log::info;

use crate::{
    consts::GAS_SAFETY_FACTOR, networks::NetworkCatalog, prelude::Result, readiness::TransferPolicy,
    Error,
};

pub const TESTNET_MODE_VAR: &str = "ARB_BRIDGE_TESTNET_MODE";
pub const CATALOG_PATH_VAR: &str = "ARB_BRIDGE_CATALOG_PATH";
pub const POLICY_PATH_VAR: &str = "ARB_BRIDGE_POLICY_PATH";
pub const GAS_SAFETY_FACTOR_VAR: &str = "ARB_BRIDGE_GAS_SAFETY_FACTOR";

#[derive(Debug, Clone, PartialEq)]
pub struct BridgeConfig {
    pub testnet_mode: bool,
    /// JSON array of additional Orbit chains
    pub catalog_path: Option<PathBuf>,
    /// JSON token policy (disabled and withdraw-only tokens)
    pub policy_path: Option<PathBuf>,
    pub gas_safety_factor: f64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        BridgeConfig {
            testnet_mode: false,
            catalog_path: None,
            policy_path: None,
            gas_safety_factor: GAS_SAFETY_FACTOR,
        }
    }
}

impl BridgeConfig {
    /// Reads the `ARB_BRIDGE_*` variables, loading a `.env` file first if present.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = BridgeConfig::default();

        if let Some(value) = lookup(TESTNET_MODE_VAR) {
            config.testnet_mode = parse_flag(&value)
                .ok_or_else(|| Error::Config(format!("{TESTNET_MODE_VAR}={value:?}")))?;
        }
        config.catalog_path = lookup(CATALOG_PATH_VAR)
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);
        config.policy_path = lookup(POLICY_PATH_VAR)
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);
        if let Some(value) = lookup(GAS_SAFETY_FACTOR_VAR) {
            let factor: f64 = value
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("{GAS_SAFETY_FACTOR_VAR}={value:?}")))?;
            if !factor.is_finite() || factor < 1.0 {
                return Err(Error::Config(format!(
                    "{GAS_SAFETY_FACTOR_VAR} must be at least 1.0, got {factor}"
                )));
            }
            config.gas_safety_factor = factor;
        }

        info!("Bridge config: {:?}", config);
        Ok(config)
    }

    pub fn load_catalog(&self) -> Result<NetworkCatalog> {
        match &self.catalog_path {
            Some(path) => NetworkCatalog::with_custom_chains_file(path),
            None => Ok(NetworkCatalog::builtin()),
        }
    }

    pub fn load_policy(&self) -> Result<TransferPolicy> {
        match &self.policy_path {
            Some(path) => TransferPolicy::from_file(path),
            None => Ok(TransferPolicy::default()),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<BridgeConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        BridgeConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, BridgeConfig::default());
        assert_eq!(config.gas_safety_factor, 1.4);
        assert_eq!(config.load_catalog().unwrap().chains().len(), NetworkCatalog::builtin().chains().len());
        assert_eq!(config.load_policy().unwrap(), TransferPolicy::default());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            (TESTNET_MODE_VAR, "true"),
            (GAS_SAFETY_FACTOR_VAR, "1.5"),
            (CATALOG_PATH_VAR, "/tmp/chains.json"),
        ])
        .unwrap();
        assert!(config.testnet_mode);
        assert_eq!(config.gas_safety_factor, 1.5);
        assert_eq!(config.catalog_path, Some(PathBuf::from("/tmp/chains.json")));
        assert_eq!(config.policy_path, None);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            config_from(&[(TESTNET_MODE_VAR, "maybe")]),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            config_from(&[(GAS_SAFETY_FACTOR_VAR, "0.5")]),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            config_from(&[(GAS_SAFETY_FACTOR_VAR, "abc")]),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_missing_catalog_file() {
        let config = BridgeConfig {
            catalog_path: Some(PathBuf::from("/nonexistent/chains.json")),
            ..BridgeConfig::default()
        };
        assert!(matches!(config.load_catalog(), Err(Error::Io(_))));
    }
}
