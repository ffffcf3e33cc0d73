use crate::config::{CheckoutConfig, DEFAULT_ACCESS_URL, DEFAULT_BASE_URL, PollingConfig};
use crate::domain::buyer::BuyerInfo;
use clap::Parser;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about = "Pay for an order with PIX from the terminal", long_about = None)]
pub struct Cli {
    /// Buyer's full name
    #[arg(long)]
    pub name: String,

    /// Buyer's phone number, any formatting
    #[arg(long)]
    pub phone: String,

    /// Buyer's e-mail address
    #[arg(long)]
    pub email: String,

    /// Buyer's CPF, with or without punctuation
    #[arg(long)]
    pub cpf: String,

    /// Checkout backend serving /api/create-payment and /api/payment-status
    #[arg(long, env = "PIX_CHECKOUT_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Seconds between status checks
    #[arg(long, env = "PIX_CHECKOUT_POLL_INTERVAL_SECS", default_value_t = 3)]
    pub poll_interval_secs: u64,

    /// Give up checking after this many seconds
    #[arg(long, env = "PIX_CHECKOUT_POLL_TIMEOUT_SECS", default_value_t = 600)]
    pub poll_timeout_secs: u64,

    /// Per-request HTTP timeout in seconds
    #[arg(long, env = "PIX_CHECKOUT_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Link shown once the payment is confirmed
    #[arg(long, env = "PIX_CHECKOUT_ACCESS_URL", default_value = DEFAULT_ACCESS_URL)]
    pub access_url: String,

    /// Ask a dev-mode backend to mark the charge as paid right away
    #[arg(long)]
    pub simulate: bool,

    /// Run against a built-in gateway that approves after two checks
    #[arg(long, conflicts_with = "simulate")]
    pub demo: bool,

    /// Log level used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    pub fn buyer(&self) -> BuyerInfo {
        BuyerInfo::new(&self.name, &self.phone, &self.email, &self.cpf)
    }

    pub fn config(&self) -> CheckoutConfig {
        CheckoutConfig {
            base_url: self.base_url.clone(),
            polling: PollingConfig {
                interval: Duration::from_secs(self.poll_interval_secs),
                timeout: Duration::from_secs(self.poll_timeout_secs),
            },
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            access_url: self.access_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUYER_ARGS: [&str; 9] = [
        "pix-checkout",
        "--name",
        "Ana",
        "--phone",
        "11987654321",
        "--email",
        "ana@example.com",
        "--cpf",
        "52998224725",
    ];

    #[test]
    fn test_defaults_build_default_config() {
        let cli = Cli::try_parse_from(BUYER_ARGS).unwrap();
        let config = cli.config();
        assert_eq!(config.polling, PollingConfig::default());
        assert_eq!(config.access_url, DEFAULT_ACCESS_URL);
        assert_eq!(cli.buyer().national_id, "52998224725");
    }

    #[test]
    fn test_timing_flags_override_defaults() {
        let mut args = BUYER_ARGS.to_vec();
        args.extend(["--poll-interval-secs", "1", "--poll-timeout-secs", "30"]);
        let config = Cli::try_parse_from(args).unwrap().config();
        assert_eq!(config.polling.interval, Duration::from_secs(1));
        assert_eq!(config.polling.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_demo_conflicts_with_simulate() {
        let mut args = BUYER_ARGS.to_vec();
        args.extend(["--demo", "--simulate"]);
        assert!(Cli::try_parse_from(args).is_err());
    }
}
