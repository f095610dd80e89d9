//! Command-line arguments.

use clap::{Parser, Subcommand};
use handcash::environment::BETA;
use handcash::signer::Method;
use handcash::wallet::AppAction;
use handcash::{CurrencyCode, IsoTimestamp};

#[derive(Debug, Parser)]
#[command(name = "handcash")]
#[command(about = "Call the HandCash Connect API from the command line", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Auth token of the user the app acts for
    #[arg(long, global = true, env = "HANDCASH_AUTH_TOKEN", hide_env_values = true)]
    pub auth_token: Option<String>,

    /// Environment to talk to (beta, iae, prod)
    #[arg(long, global = true, env = "HANDCASH_ENVIRONMENT", default_value = BETA)]
    pub environment: String,

    /// HTTP timeout in seconds
    #[arg(long, global = true, env = "HANDCASH_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(flatten)]
    Api(ApiCommand),

    /// Sign a request offline and print its headers
    Sign {
        /// HTTP method
        #[arg(long, default_value_t = Method::Get)]
        method: Method,

        /// Endpoint path (e.g. /v1/connect/profile/currentUserProfile)
        #[arg(long)]
        endpoint: String,

        /// JSON request body
        #[arg(long)]
        body: Option<String>,

        /// Timestamp to sign instead of the current time
        #[arg(long)]
        timestamp: Option<IsoTimestamp>,
    },

    /// Print the URL a user visits to authorize an app
    AuthorizeUrl {
        /// App id
        app_id: String,
    },
}

/// Subcommands that call the HandCash Connect API.
#[derive(Debug, Subcommand)]
pub enum ApiCommand {
    /// Show the current user's profile
    Profile,

    /// List the current user's friends
    Friends,

    /// Show the permissions granted to the app
    Permissions,

    /// Show the amount the app may still spend
    Balance {
        /// Currency of the fiat balance (defaults to the user's local currency)
        #[arg(long)]
        currency: Option<CurrencyCode>,
    },

    /// Send a payment
    Pay {
        /// Handle, paymail or address of the receiver
        #[arg(long)]
        to: String,

        /// Amount to send
        #[arg(long)]
        amount: f64,

        /// Currency of the amount
        #[arg(long, default_value_t = CurrencyCode::Usd)]
        currency: CurrencyCode,

        /// Note shown to the receiver
        #[arg(long)]
        description: Option<String>,

        /// Action label (tip-group, publish, like)
        #[arg(long)]
        app_action: Option<AppAction>,
    },

    /// Look up a payment by transaction id
    Payment {
        /// Transaction id
        transaction_id: String,
    },
}
