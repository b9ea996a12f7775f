// SPDX-FileCopyrightText: 2022 Profian Inc. <opensource@profian.com>
// SPDX-License-Identifier: AGPL-3.0-only

#![warn(rust_2018_idioms, unused_lifetimes, unused_qualifications, clippy::all)]
#![forbid(unsafe_code)]

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use rolegate::relay::{self, url::Url};
use rolegate::server::{self, OidcConfig, OidcVerifier};
use rolegate::types::DEFAULT_ROLE_CLAIM;

use anyhow::Context as _;
use axum::{Router, Server};
use clap::{Parser, Subcommand};
use confargs::{args, prefix_char_filter, Toml};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Role-gated values API and the OpenID Connect login relay in front of it.
///
/// Any command-line options listed here may be specified by one or
/// more configuration files, which can be used by passing the
/// name of the file on the command-line with the syntax `@config.toml`.
/// The configuration file must contain valid TOML table mapping argument
/// names to their values.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Emit logs as JSON.
    #[arg(long, global = true, env = "ROLEGATE_LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the values API.
    Api(ApiArgs),
    /// Serve the login relay.
    Web(WebArgs),
}

#[derive(clap::Args, Debug)]
struct ApiArgs {
    /// Address to bind to.
    #[arg(long, env = "ROLEGATE_API_ADDR", default_value_t = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 13826))]
    addr: SocketAddr,

    /// OpenID Connect issuer URL.
    #[arg(long, env = "AUTH0_ISSUER")]
    oidc_issuer: Url,

    /// OpenID Connect client ID.
    #[arg(long, env = "AUTH0_CLIENT_ID")]
    oidc_client: String,

    /// OpenID Connect secret.
    #[arg(long, env = "AUTH0_CLIENT_SECRET")]
    oidc_secret: Option<String>,

    /// Claim holding the caller's roles.
    #[arg(long, env = "ROLEGATE_ROLE_CLAIM", default_value = DEFAULT_ROLE_CLAIM)]
    role_claim: String,
}

#[derive(clap::Args, Debug)]
struct WebArgs {
    /// Address to bind to.
    #[arg(long, env = "ROLEGATE_WEB_ADDR", default_value_t = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 5000))]
    addr: SocketAddr,

    /// Identity provider domain.
    #[arg(long, env = "AUTH0_DOMAIN")]
    domain: String,

    /// OpenID Connect client ID.
    #[arg(long, env = "AUTH0_CLIENT_ID")]
    client_id: String,

    /// OpenID Connect secret.
    #[arg(long, env = "AUTH0_CLIENT_SECRET")]
    client_secret: Option<String>,

    /// URL the relay is reachable at.
    #[arg(long, env = "ROLEGATE_PUBLIC_URL", default_value = "http://localhost:5000/")]
    public_url: Url,

    /// Root URL of the values API.
    #[arg(long, env = "ROLEGATE_API_URL", default_value = "http://localhost:13826/")]
    api_url: Url,

    /// Audience the access token is requested for.
    #[arg(long, env = "AUTH0_AUDIENCE", default_value = "http://auth0demoApi")]
    audience: String,

    /// Claim holding the user's roles.
    #[arg(long, env = "ROLEGATE_ROLE_CLAIM", default_value = DEFAULT_ROLE_CLAIM)]
    role_claim: String,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        fmt.json().init()
    } else {
        fmt.init()
    }
}

async fn serve(addr: SocketAddr, app: Router) -> anyhow::Result<()> {
    info!(target: "main", "listening on {addr}");
    Server::try_bind(&addr)
        .with_context(|| format!("failed to bind to {addr}"))?
        .serve(app.into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            debug!(target: "main", "received shutdown signal");
        })
        .await
        .context("server failed")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Args { log_json, command } = args::<Toml>(prefix_char_filter::<'@'>)
        .context("failed to parse config")
        .map(Args::parse_from)?;

    init_tracing(log_json);

    match command {
        Command::Api(ApiArgs {
            addr,
            oidc_issuer,
            oidc_client,
            oidc_secret,
            role_claim,
        }) => {
            let verifier = OidcVerifier::discover(OidcConfig {
                issuer: oidc_issuer,
                client_id: oidc_client,
                client_secret: oidc_secret,
                role_claim,
            })
            .await
            .context("failed to set up OpenID Connect verifier")?;
            serve(addr, server::Builder::new(verifier).build()).await
        }
        Command::Web(WebArgs {
            addr,
            domain,
            client_id,
            client_secret,
            public_url,
            api_url,
            audience,
            role_claim,
        }) => {
            let app = relay::Builder::new(relay::Config {
                domain,
                client_id,
                client_secret,
                audience,
                role_claim,
                public_url,
                api_url,
            })
            .discover()
            .await
            .context("failed to build relay")?;
            serve(addr, app).await
        }
    }
}
