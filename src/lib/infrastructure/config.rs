//! Mail configuration and credential resolution
//!
//! Credentials come from an ordered list of sources: direct environment
//! variables first, then a JSON configuration blob under the provider
//! namespace. The resolver merges field-wise in priority order and never
//! errors; a missing credential pair is a reportable state, not a failure.

use clap::Parser;
use serde_json::Value;
use tracing::warn;

use crate::domain::email::service::CredentialPresence;

/// Mail provider configuration
#[derive(Clone, Debug, Default, Parser)]
pub struct MailConfig {
    /// The SMTP host
    #[clap(long, env = "SMTP_HOST", default_value = "smtp.gmail.com")]
    pub host: String,

    /// The SMTP submission port; `--port` belongs to the HTTP server
    #[clap(id = "smtp_port", long = "smtp-port", env = "SMTP_PORT", default_value = "465")]
    pub port: u16,

    /// The SMTP account identifier
    #[clap(long, env = "SMTP_USER")]
    pub user: Option<String>,

    /// The SMTP secret (an app password, not the account password)
    #[clap(long, env = "SMTP_PASSWORD")]
    pub password: Option<String>,

    /// A JSON configuration blob carrying credentials under the `smtp`
    /// namespace: `{"smtp": {"user": "...", "password": "..."}}`
    #[clap(long, env = "PROVIDER_CONFIG")]
    pub provider_config: Option<String>,

    /// The sender address used when a request omits `from`
    #[clap(long, env = "DEFAULT_FROM_EMAIL")]
    pub default_from: Option<String>,

    /// The destination address for contact-form mail; falls back to the
    /// account identifier
    #[clap(long, env = "CONTACT_EMAIL")]
    pub contact_email: Option<String>,
}

/// The credential pair needed to authenticate to the mail provider
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportCredentials {
    /// The provider account identifier
    pub account: String,

    /// The provider secret
    pub secret: String,
}

/// One place credentials may come from
pub trait CredentialSource {
    /// The account identifier this source holds, if any
    fn account_identifier(&self) -> Option<String>;

    /// The secret this source holds, if any
    fn secret(&self) -> Option<String>;
}

/// Direct environment-style variables
#[derive(Debug)]
pub struct EnvCredentialSource {
    user: Option<String>,
    password: Option<String>,
}

impl EnvCredentialSource {
    /// Builds the source from the already-parsed configuration
    pub fn new(config: &MailConfig) -> Self {
        Self {
            user: config.user.clone(),
            password: config.password.clone(),
        }
    }
}

impl CredentialSource for EnvCredentialSource {
    fn account_identifier(&self) -> Option<String> {
        non_empty(self.user.clone())
    }

    fn secret(&self) -> Option<String> {
        non_empty(self.password.clone())
    }
}

/// Credentials nested in a JSON configuration blob under the `smtp`
/// namespace
#[derive(Debug)]
pub struct ProviderBlobSource {
    blob: Option<Value>,
}

impl ProviderBlobSource {
    /// Parses the blob string; a malformed blob is logged and treated as
    /// absent.
    pub fn new(raw: Option<&str>) -> Self {
        let blob = raw.and_then(|raw| match serde_json::from_str::<Value>(raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("ignoring malformed PROVIDER_CONFIG blob: {e}");
                None
            }
        });

        Self { blob }
    }

    fn field(&self, name: &str) -> Option<String> {
        non_empty(
            self.blob
                .as_ref()?
                .get("smtp")?
                .get(name)?
                .as_str()
                .map(ToString::to_string),
        )
    }
}

impl CredentialSource for ProviderBlobSource {
    fn account_identifier(&self) -> Option<String> {
        self.field("user")
    }

    fn secret(&self) -> Option<String> {
        self.field("password")
    }
}

/// The field-wise merge of every credential source
#[derive(Clone, Debug, Default)]
pub struct ResolvedCredentials {
    account: Option<String>,
    secret: Option<String>,
}

impl ResolvedCredentials {
    /// The complete credential pair, when both fields resolved
    pub fn credentials(&self) -> Option<TransportCredentials> {
        Some(TransportCredentials {
            account: self.account.clone()?,
            secret: self.secret.clone()?,
        })
    }

    /// The resolved account identifier, if any
    pub fn account_identifier(&self) -> Option<&str> {
        self.account.as_deref()
    }

    /// Which fields were found, for diagnostic reporting
    pub fn presence(&self) -> CredentialPresence {
        CredentialPresence {
            has_account_identifier: self.account.is_some(),
            has_secret: self.secret.is_some(),
        }
    }
}

/// Merges `sources` field-wise: for each field the first source that holds a
/// non-empty value wins. Pure read; never fails.
pub fn resolve_credentials(sources: &[&dyn CredentialSource]) -> ResolvedCredentials {
    ResolvedCredentials {
        account: sources.iter().find_map(|s| s.account_identifier()),
        secret: sources.iter().find_map(|s| s.secret()),
    }
}

impl MailConfig {
    /// Resolves the credential pair from the configured sources in priority
    /// order: direct variables, then the provider blob.
    pub fn resolve_credentials(&self) -> ResolvedCredentials {
        let env = EnvCredentialSource::new(self);
        let blob = ProviderBlobSource::new(self.provider_config.as_deref());

        resolve_credentials(&[&env, &blob])
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
