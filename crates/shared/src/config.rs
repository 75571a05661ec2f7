//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Billing rules (document numbering, GST, limits).
    #[serde(default)]
    pub billing: BillingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Place of supply relative to the seller's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplyType {
    /// Same state: CGST + SGST.
    #[default]
    IntraState,
    /// Different state: IGST only.
    InterState,
}

/// Billing configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BillingConfig {
    /// Invoice number root; the fiscal-year label and sequence are appended.
    #[serde(default = "default_invoice_prefix")]
    pub invoice_prefix: String,
    /// Credit note number prefix.
    #[serde(default = "default_credit_note_prefix")]
    pub credit_note_prefix: String,
    /// CGST percentage for intra-state supply.
    #[serde(default = "default_cgst_percent")]
    pub cgst_percent: Decimal,
    /// SGST percentage for intra-state supply.
    #[serde(default = "default_sgst_percent")]
    pub sgst_percent: Decimal,
    /// IGST percentage for inter-state supply.
    #[serde(default = "default_igst_percent")]
    pub igst_percent: Decimal,
    /// Supply type applied to new invoices.
    #[serde(default)]
    pub supply_type: SupplyType,
    /// Attempts made to allocate a document number before giving up.
    #[serde(default = "default_number_retry_attempts")]
    pub number_retry_attempts: u32,
    /// Maximum invoices accepted by a single bulk settlement.
    #[serde(default = "default_bulk_limit")]
    pub bulk_limit: usize,
}

fn default_invoice_prefix() -> String {
    "SSI/INV".to_string()
}

fn default_credit_note_prefix() -> String {
    "CN-".to_string()
}

fn default_cgst_percent() -> Decimal {
    Decimal::new(9, 0)
}

fn default_sgst_percent() -> Decimal {
    Decimal::new(9, 0)
}

fn default_igst_percent() -> Decimal {
    Decimal::new(18, 0)
}

fn default_number_retry_attempts() -> u32 {
    3
}

fn default_bulk_limit() -> usize {
    100
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            invoice_prefix: default_invoice_prefix(),
            credit_note_prefix: default_credit_note_prefix(),
            cgst_percent: default_cgst_percent(),
            sgst_percent: default_sgst_percent(),
            igst_percent: default_igst_percent(),
            supply_type: SupplyType::default(),
            number_retry_attempts: default_number_retry_attempts(),
            bulk_limit: default_bulk_limit(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TALLY").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_billing_defaults() {
        let billing = BillingConfig::default();
        assert_eq!(billing.invoice_prefix, "SSI/INV");
        assert_eq!(billing.credit_note_prefix, "CN-");
        assert_eq!(billing.cgst_percent, dec!(9));
        assert_eq!(billing.sgst_percent, dec!(9));
        assert_eq!(billing.igst_percent, dec!(18));
        assert_eq!(billing.supply_type, SupplyType::IntraState);
        assert_eq!(billing.number_retry_attempts, 3);
        assert_eq!(billing.bulk_limit, 100);
    }

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("TALLY__DATABASE__URL", Some("sqlite::memory:")),
                ("TALLY__SERVER__PORT", Some("9090")),
                ("TALLY__BILLING__SUPPLY_TYPE", Some("inter_state")),
                ("RUN_MODE", Some("test-nonexistent")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "sqlite::memory:");
                assert_eq!(config.server.port, 9090);
                assert_eq!(config.server.host, "0.0.0.0");
                assert_eq!(config.billing.supply_type, SupplyType::InterState);
                assert_eq!(config.billing.invoice_prefix, "SSI/INV");
            },
        );
    }
}
