//! System configuration with TOML file support.

use reit_types::{AccountId, ReitParams};
use reit_utils::{init_logging, LogFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::SystemError;

/// Configuration for a REIT system.
///
/// Can be loaded from a TOML file via [`ReitConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReitConfig {
    /// Treasury account: holds cash reserves, receives rent and share payments.
    #[serde(default = "default_reit_account")]
    pub reit_account: AccountId,

    /// Registry account: renters approve it to pull rent.
    #[serde(default = "default_registry_account")]
    pub registry_account: AccountId,

    /// Vault account: holds deposits and dividend payouts.
    #[serde(default = "default_vault_account")]
    pub vault_account: AccountId,

    /// Receives the purchase price of acquired properties.
    #[serde(default = "default_operations_wallet")]
    pub operations_wallet: AccountId,

    /// Receives the profit share of each dividend.
    #[serde(default = "default_profits_wallet")]
    pub profits_wallet: AccountId,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub params: ReitParams,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_reit_account() -> AccountId {
    AccountId::new("reit")
}

fn default_registry_account() -> AccountId {
    AccountId::new("registry")
}

fn default_vault_account() -> AccountId {
    AccountId::new("vault")
}

fn default_operations_wallet() -> AccountId {
    AccountId::new("operations")
}

fn default_profits_wallet() -> AccountId {
    AccountId::new("profits")
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ReitConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, SystemError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| SystemError::Config(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, SystemError> {
        toml::from_str(s).map_err(|e| SystemError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, SystemError> {
        toml::to_string_pretty(self).map_err(|e| SystemError::Config(e.to_string()))
    }

    /// Reject configurations no system can be built from.
    pub fn validate(&self) -> Result<(), SystemError> {
        self.params.validate().map_err(SystemError::Config)?;
        let accounts = [
            &self.reit_account,
            &self.registry_account,
            &self.vault_account,
            &self.operations_wallet,
            &self.profits_wallet,
        ];
        for (i, account) in accounts.iter().enumerate() {
            if !account.is_valid() {
                return Err(SystemError::Config(format!("invalid account id '{account}'")));
            }
            if accounts[..i].contains(account) {
                return Err(SystemError::Config(format!("account '{account}' is used twice")));
            }
        }
        Ok(())
    }

    /// Install the global tracing subscriber described by this config.
    ///
    /// A host that already installed its own subscriber keeps it.
    pub fn init_logging(&self) {
        if let Err(e) = init_logging(self.log_format, &self.log_level) {
            tracing::debug!(error = %e, "tracing subscriber already installed");
        }
    }
}

impl Default for ReitConfig {
    fn default() -> Self {
        Self {
            reit_account: default_reit_account(),
            registry_account: default_registry_account(),
            vault_account: default_vault_account(),
            operations_wallet: default_operations_wallet(),
            profits_wallet: default_profits_wallet(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            params: ReitParams::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = ReitConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        let parsed = ReitConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = ReitConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.reit_account.as_str(), "reit");
        assert_eq!(config.log_format, LogFormat::Human);
        assert_eq!(config.params.rent_cycle_secs, 30 * 86_400);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            log_format = "json"
            profits_wallet = "treasury-profits"

            [params]
            dividend_profit_bps = 2500
        "#;
        let config = ReitConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.profits_wallet.as_str(), "treasury-profits");
        assert_eq!(config.params.dividend_profit_bps, 2_500);
        assert_eq!(config.params.vesting_precision, 1_000_000); // default
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "reit_account = \"gypsy-reit\"").unwrap();
        writeln!(file, "[params]").unwrap();
        writeln!(file, "rent_cycle_secs = 604800").unwrap();

        let config = ReitConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.reit_account.as_str(), "gypsy-reit");
        assert_eq!(config.params.rent_cycle_secs, 604_800);
    }

    #[test]
    fn missing_file_returns_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ReitConfig::from_toml_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, SystemError::Config(_)));
    }

    #[test]
    fn validate_rejects_shared_accounts_and_bad_params() {
        let mut config = ReitConfig::default();
        config.vault_account = config.reit_account.clone();
        assert!(matches!(config.validate(), Err(SystemError::Config(_))));

        let mut config = ReitConfig::default();
        config.params.dividend_profit_bps = 20_000;
        assert!(config.validate().is_err());

        let mut config = ReitConfig::default();
        config.operations_wallet = AccountId::new(" ops ");
        assert!(config.validate().is_err());
    }
}
