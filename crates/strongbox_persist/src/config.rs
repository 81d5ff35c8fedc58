//! Configuration for saving and loading.

/// Configuration for the persistence layer.
///
/// Controls backups, durability, and how strictly payloads are checked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersistConfig {
    /// Copy the previous save to `<file>.bak` before replacing it.
    pub keep_backup: bool,

    /// Flush the temporary file to disk before renaming it into place.
    pub sync: bool,

    /// Treat unread bytes at the end of a payload as an error
    /// instead of a warning.
    pub strict_payloads: bool,
}

impl Default for PersistConfig {
    fn default() -> Self {
        Self {
            keep_backup: true,
            sync: true,
            strict_payloads: false,
        }
    }
}

impl PersistConfig {
    /// Creates a configuration for production shards: backup, sync, strict.
    #[must_use]
    pub fn durable() -> Self {
        Self {
            keep_backup: true,
            sync: true,
            strict_payloads: true,
        }
    }

    /// Creates a configuration for tests and benchmarks: no backup, no sync.
    #[must_use]
    pub fn fast() -> Self {
        Self {
            keep_backup: false,
            sync: false,
            strict_payloads: false,
        }
    }

    /// Builder method to enable/disable the backup copy.
    #[must_use]
    pub fn with_keep_backup(mut self, keep: bool) -> Self {
        self.keep_backup = keep;
        self
    }

    /// Builder method to enable/disable fsync before rename.
    #[must_use]
    pub fn with_sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }

    /// Builder method to enable/disable strict payload checks.
    #[must_use]
    pub fn with_strict_payloads(mut self, strict: bool) -> Self {
        self.strict_payloads = strict;
        self
    }
}
