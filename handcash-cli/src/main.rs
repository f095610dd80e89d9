//! `handcash` - command-line client for the HandCash Connect API.
//!
//! # Usage
//!
//! ```bash
//! # Show the profile of the user behind a token
//! HANDCASH_AUTH_TOKEN=<token> handcash profile
//!
//! # Pay one cent to a handle on production
//! handcash --environment prod pay --to mrz --amount 0.01
//!
//! # Sign a request offline
//! handcash --auth-token <token> sign --endpoint /v1/connect/profile/currentUserProfile
//! ```
//!
//! # Environment Variables
//!
//! - `HANDCASH_AUTH_TOKEN` - Auth token of the user
//! - `HANDCASH_ENVIRONMENT` - `beta`, `iae` or `prod` (default: `beta`)
//! - `HANDCASH_TIMEOUT_SECS` - HTTP timeout (default: `30`)
//! - `RUST_LOG` - Log level filter (default: `info`)
//!
//! A `.env` file in the working directory is read first.

mod cli;

use std::time::Duration;

use clap::Parser;
use handcash::signer::{AuthToken, Body, RequestDescriptor, build_signed_request};
use handcash::wallet::{PayParameters, Payment};
use handcash::EnvironmentRegistry;
use handcash_http::{ClientConfig, HandCashClient};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::cli::{ApiCommand, Cli, Command};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()).await {
        tracing::error!("handcash failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let registry = EnvironmentRegistry::known();
    let environment = registry.resolve(&cli.environment)?.clone();
    tracing::debug!(environment = %environment.name, api_url = %environment.api_url, "Resolved environment");

    match cli.command {
        Command::AuthorizeUrl { app_id } => {
            print_json(&environment.redirection_url(&app_id))?;
        }
        Command::Sign {
            method,
            endpoint,
            body,
            timestamp,
        } => {
            let token = auth_token(cli.auth_token)?;
            let body = match body {
                Some(raw) => Body::from_value(serde_json::from_str(&raw)?),
                None => Body::Empty,
            };
            let descriptor = RequestDescriptor::new(method, endpoint).with_body(body);
            let signed =
                build_signed_request(&descriptor, &environment.api_url, &token, timestamp)?;
            print_json(&signed)?;
        }
        Command::Api(command) => {
            let token = auth_token(cli.auth_token)?;
            let config =
                ClientConfig::new(environment).with_timeout(Duration::from_secs(cli.timeout_secs));
            let client = HandCashClient::new(config)?;
            call(&client, &token, command).await?;
        }
    }
    Ok(())
}

async fn call(
    client: &HandCashClient,
    token: &AuthToken,
    command: ApiCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        ApiCommand::Profile => print_json(&client.get_profile(token).await?)?,
        ApiCommand::Friends => print_json(&client.get_friends(token).await?)?,
        ApiCommand::Permissions => print_json(&client.get_permissions(token).await?)?,
        ApiCommand::Balance { currency } => {
            print_json(&client.get_spendable_balance(token, currency).await?)?;
        }
        ApiCommand::Pay {
            to,
            amount,
            currency,
            description,
            app_action,
        } => {
            let mut params = PayParameters::new().with_receiver(Payment::new(to, amount, currency));
            params.description = description;
            params.app_action = app_action;
            let payment = client.pay(token, &params).await?;
            tracing::info!(transaction_id = %payment.transaction_id, "Payment sent");
            print_json(&payment)?;
        }
        ApiCommand::Payment { transaction_id } => {
            print_json(&client.get_payment(token, &transaction_id).await?)?;
        }
    }
    Ok(())
}

fn auth_token(raw: Option<String>) -> Result<AuthToken, Box<dyn std::error::Error>> {
    match raw {
        Some(token) if !token.trim().is_empty() => Ok(AuthToken::new(token)),
        _ => Err("missing auth token: pass --auth-token or set HANDCASH_AUTH_TOKEN".into()),
    }
}

#[allow(clippy::print_stdout)]
fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
