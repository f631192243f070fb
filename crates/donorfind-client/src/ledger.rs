//! Durable record of donors that have already been auto-enriched.
//!
//! Viewing a donor with no enrichments kicks off enrich and crawl jobs once.
//! The ledger is a directory holding one marker file per claimed donor.
//! A claim creates the marker with `create_new`, which the filesystem
//! performs atomically, so concurrent processes viewing the same donor
//! agree on exactly one winner and never overwrite each other's claims.

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::error::LedgerError;

#[derive(Debug, Clone)]
pub struct AutoEnrichLedger {
    dir: PathBuf,
}

impl AutoEnrichLedger {
    /// Opens the ledger rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Io`] if the directory cannot be created, for
    /// example because a regular file already sits at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| LedgerError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn contains(&self, donor_id: i64) -> bool {
        self.marker(donor_id).exists()
    }

    /// Claims `donor_id` for auto-enrichment.
    ///
    /// Returns `Ok(true)` for the first claim ever made on this ledger and
    /// `Ok(false)` for every later one, across processes.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Io`] if the marker cannot be created for any
    /// reason other than already existing.
    pub fn claim(&self, donor_id: i64) -> Result<bool, LedgerError> {
        let path = self.marker(donor_id);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(source) => Err(LedgerError::Io { path, source }),
        }
    }

    fn marker(&self, donor_id: i64) -> PathBuf {
        self.dir.join(format!("{donor_id}.claimed"))
    }
}
