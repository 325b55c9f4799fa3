//! Credential store: the provider API key and where it is persisted.

mod backend;
mod store;

pub use backend::{CredentialBackend, FileBackend, KeyringBackend, MemoryBackend};
pub use store::{build_time_default, mask, CredentialStore, API_KEY_ENV, CREDENTIAL_KEY};

use crate::config::{BackendKind, Config};
use std::sync::Arc;

/// Build the backend selected by `config`.
pub fn backend_from_config(config: &Config) -> Arc<dyn CredentialBackend> {
    match config.backend {
        BackendKind::File => Arc::new(FileBackend::new(
            config
                .storage_path
                .clone()
                .unwrap_or_else(FileBackend::default_path),
        )),
        BackendKind::Keyring => Arc::new(KeyringBackend::default()),
        BackendKind::Memory => Arc::new(MemoryBackend::new()),
    }
}
