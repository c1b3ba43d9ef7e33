//! Signet CLI - Command-line token utilities
//!
//! Usage:
//!   signet inspect <token>
//!   signet verify <token> [--key <key>] [--issuer <iss>] [--audience <aud>]
//!   signet hash-password <password>

use anyhow::bail;
use base64::Engine;
use clap::{Parser, Subcommand};
use serde_json::Value;
use signet_api::auth::{password, token};
use signet_core::config::AppConfig;

#[derive(Parser)]
#[command(name = "signet")]
#[command(about = "Token utilities for the Signet authentication service")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a token's header and payload without verifying it
    Inspect {
        /// Compact JWS token string
        token: String,
    },
    /// Verify a token against the configured key, issuer, and audience
    Verify {
        /// Compact JWS token string
        token: String,
        /// Signing key (defaults to SIGNET_TOKEN_KEY)
        #[arg(long)]
        key: Option<String>,
        /// Expected issuer (defaults to SIGNET_TOKEN_ISSUER)
        #[arg(long)]
        issuer: Option<String>,
        /// Expected audience (defaults to SIGNET_TOKEN_AUDIENCE)
        #[arg(long)]
        audience: Option<String>,
    },
    /// Hash a password for seeding a credential store
    HashPassword {
        password: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect { token } => inspect(&token),
        Commands::Verify {
            token,
            key,
            issuer,
            audience,
        } => verify(&token, key, issuer, audience),
        Commands::HashPassword { password } => {
            println!("{}", password::hash_password(&password)?);
            Ok(())
        }
    }
}

fn inspect(token: &str) -> anyhow::Result<()> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        bail!("token is not in compact JWS form (expected three dot-separated segments)");
    }

    let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
    let header: Value = serde_json::from_slice(&engine.decode(segments[0])?)?;
    let payload: Value = serde_json::from_slice(&engine.decode(segments[1])?)?;

    println!("header:  {}", serde_json::to_string_pretty(&header)?);
    println!("payload: {}", serde_json::to_string_pretty(&payload)?);
    println!();
    println!("note: contents decoded only, signature NOT verified");

    Ok(())
}

fn verify(
    token: &str,
    key: Option<String>,
    issuer: Option<String>,
    audience: Option<String>,
) -> anyhow::Result<()> {
    let config = AppConfig::from_env()?.token;
    let key = key.unwrap_or(config.signing_key);
    let issuer = issuer.unwrap_or(config.issuer);
    let audience = audience.unwrap_or(config.audience);

    let now = chrono::Utc::now().timestamp();
    match token::decode(token, &issuer, &audience, key.as_bytes(), now) {
        Ok(claims) => {
            println!("token is valid");
            for claim in &claims {
                println!("  {} = {}", claim.kind, claim.value);
            }
            Ok(())
        }
        Err(failure) => bail!("token rejected: {failure}"),
    }
}
