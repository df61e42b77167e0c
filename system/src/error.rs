use reit_ledger::LedgerError;
use reit_nav::NavError;
use reit_registry::RegistryError;
use reit_types::ErrorKind;
use reit_vault::VaultError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SystemError {
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("vault error: {0}")]
    Vault(#[from] VaultError),

    #[error("treasury error: {0}")]
    Nav(#[from] NavError),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("config error: {0}")]
    Config(String),

    #[error("snapshot error: {0}")]
    Snapshot(String),
}

impl SystemError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Registry(e) => e.kind(),
            Self::Vault(e) => e.kind(),
            Self::Nav(e) => e.kind(),
            Self::Ledger(e) => e.kind(),
            Self::Config(_) | Self::Snapshot(_) => ErrorKind::InvalidConfig,
        }
    }
}
