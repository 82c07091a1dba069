// Wiring of the engine over on-disk storage

use std::sync::Arc;

use tracing::debug;

use docwarden_application::{CallerIdentity, Engine, LoggingEventPublisher};
use docwarden_persistence::{FilesystemBlobStore, JsonFileEntityStore};

use crate::config::DocWardenConfig;
use crate::error::CliResult;
use crate::output::OutputStyle;

/// Engine type used by the binary
pub type DiskEngine = Engine<JsonFileEntityStore, FilesystemBlobStore>;

/// Everything a command needs to run
pub struct AppContext {
    pub engine: DiskEngine,
    pub caller: CallerIdentity,
    pub style: OutputStyle,
}

impl AppContext {
    /// Open the record snapshot and file store under `storage.data_dir`
    pub async fn open(
        config: &DocWardenConfig,
        caller: CallerIdentity,
        style: OutputStyle,
    ) -> CliResult<Self> {
        let records = JsonFileEntityStore::open(config.storage.records_path())?;
        let files = FilesystemBlobStore::open(config.storage.files_dir())
            .await
            .map_err(docwarden_application::ApplicationError::from)?;
        debug!(
            records = %config.storage.records_path().display(),
            files = %config.storage.files_dir().display(),
            "Storage opened"
        );

        let engine = Engine::builder(Arc::new(records), Arc::new(files))
            .settings(config.engine)
            .events(Arc::new(LoggingEventPublisher))
            .build()?;

        Ok(Self {
            engine,
            caller,
            style,
        })
    }
}

/// Caller for this invocation: `--as` if given, else the OS user
pub fn resolve_caller(explicit: Option<&str>) -> CallerIdentity {
    let subject = explicit
        .map(str::to_string)
        .or_else(|| std::env::var("USER").ok())
        .or_else(|| std::env::var("USERNAME").ok())
        .unwrap_or_default();
    CallerIdentity::new(subject)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_caller_wins() {
        assert_eq!(resolve_caller(Some("auditor")).subject(), "auditor");
        assert!(!resolve_caller(Some("  ")).is_authenticated());
    }
}
