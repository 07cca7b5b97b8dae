//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the CLI: the registry HTTP client, the persisted console session
//! and tracing. Command handlers receive the composed context and delegate
//! to core sessions and ports.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use regdesk_client::{DefaultRegistryClient, RegistryConfig};
use regdesk_core::ConsoleSession;

use crate::session_store::SessionStore;

/// Fully composed application context for CLI commands.
pub struct CliContext {
    /// Registry API client; implements every core port the handlers use.
    pub client: DefaultRegistryClient,
    /// Persisted console session.
    pub store: SessionStore,
}

impl CliContext {
    /// Compose the context from CLI arguments and environment.
    pub fn build(api_base: Option<String>) -> Result<Self> {
        let config = api_base.map_or_else(RegistryConfig::from_env, RegistryConfig::with_base_url);
        tracing::debug!(base_url = %config.base_url, "connecting to registry");

        Ok(Self {
            client: DefaultRegistryClient::new(&config)?,
            store: SessionStore::detect(),
        })
    }

    /// Load the persisted session, requiring a prior login.
    pub fn authenticated_session(&self) -> Result<ConsoleSession> {
        let session = self.store.load();
        anyhow::ensure!(
            session.is_authenticated(),
            "not logged in; run `regdesk login` first"
        );
        Ok(session)
    }
}

/// Initialize tracing for the CLI process.
///
/// `RUST_LOG` wins when set; `--verbose` bumps the default to debug.
pub fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "regdesk=debug" } else { "regdesk=info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
