use crate::core::cart_store::DEFAULT_STORAGE_KEY;
use crate::core::{ConfigProvider, ProductId};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::{Parser, Subcommand};
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "rocket-cart")]
#[command(about = "Shopping cart backed by a stock-checked product API")]
pub struct CliConfig {
    #[arg(long, default_value = "http://localhost:3333")]
    pub api_url: String,

    #[arg(long, default_value = "./data/storage.json")]
    pub storage_path: String,

    #[arg(long, default_value = DEFAULT_STORAGE_KEY)]
    pub storage_key: String,

    #[arg(long, default_value = "10")]
    pub timeout_seconds: u64,

    #[arg(long, help = "Skip the stock lookup when a product is added for the first time")]
    pub skip_first_add_stock_check: bool,

    #[arg(long, help = "Read settings from a TOML file instead of the flags above")]
    pub config: Option<String>,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Print the current cart
    List,
    /// Add one unit of a product
    Add { product_id: ProductId },
    /// Remove a product entirely
    Remove { product_id: ProductId },
    /// Set the quantity of a product already in the cart
    Update {
        product_id: ProductId,
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
    /// Cap quantities to current stock and drop sold-out products
    Reconcile,
}

impl ConfigProvider for CliConfig {
    fn api_url(&self) -> &str {
        &self.api_url
    }

    fn storage_path(&self) -> &str {
        &self.storage_path
    }

    fn storage_key(&self) -> &str {
        &self.storage_key
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn check_stock_on_first_add(&self) -> bool {
        !self.skip_first_add_stock_check
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_catalog_url("api_url", &self.api_url)?;
        validation::validate_storage_file("storage_path", &self.storage_path)?;
        validation::validate_non_empty_string("storage_key", &self.storage_key)?;
        validation::validate_range("timeout_seconds", self.timeout_seconds, 1, 300)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults_and_subcommand() {
        let config = CliConfig::try_parse_from(["rocket-cart", "add", "3"]).unwrap();

        assert_eq!(config.command, Command::Add { product_id: 3 });
        assert_eq!(config.storage_key(), "@RocketShoes:cart");
        assert!(config.check_stock_on_first_add());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_negative_update_amount() {
        let config = CliConfig::try_parse_from([
            "rocket-cart",
            "--skip-first-add-stock-check",
            "update",
            "2",
            "-1",
        ])
        .unwrap();

        assert_eq!(
            config.command,
            Command::Update {
                product_id: 2,
                amount: -1
            }
        );
        assert!(!config.check_stock_on_first_add());
    }

    #[test]
    fn test_invalid_flags_fail_validation() {
        let config = CliConfig::try_parse_from([
            "rocket-cart",
            "--api-url",
            "ftp://example.com",
            "list",
        ])
        .unwrap();
        assert!(config.validate().is_err());

        let config =
            CliConfig::try_parse_from(["rocket-cart", "--timeout-seconds", "0", "list"]).unwrap();
        assert!(config.validate().is_err());
    }
}
