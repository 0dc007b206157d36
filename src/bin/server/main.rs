#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! REST API for the contact-form email service

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use portfolio_contact_api::{
    domain::email::service::DispatchServiceImpl,
    infrastructure::{
        config::MailConfig,
        email::smtp::SmtpMailTransport,
        http::{
            state::{AppConfig, AppState},
            HttpServer, HttpServerConfig,
        },
    },
};

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
pub struct Args {
    /// The HTTP server configuration
    #[clap(flatten)]
    pub server: HttpServerConfig,

    /// The mail provider configuration
    #[clap(flatten)]
    pub mail: MailConfig,
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine in deployed environments; variables come
    // from the process environment there.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let resolved = args.mail.resolve_credentials();

    let config = AppConfig {
        contact_email: args
            .mail
            .contact_email
            .clone()
            .or_else(|| resolved.account_identifier().map(ToString::to_string)),
        default_from: args.mail.default_from.clone(),
    };

    let transport = SmtpMailTransport::new(&args.mail, resolved.credentials())?;
    let dispatch = DispatchServiceImpl::new(Arc::new(transport), resolved.presence());

    let state = AppState::new(config, dispatch);

    HttpServer::new(state, args.server)?.run().await
}
