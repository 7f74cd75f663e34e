//! Caller-owned cache for the loaded sales table.
//!
//! The loaded table is reused across report runs as long as the source file
//! keeps the same identity (path, modification time, length).

use crate::error::LoadError;
use crate::loader::{self, LoadReport};
use crate::types::SalesRecord;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Identity of a source file at the moment it was probed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceStamp {
    pub path: PathBuf,
    pub modified: Option<SystemTime>,
    pub len: u64,
}

impl SourceStamp {
    pub fn probe(path: &Path) -> Result<Self, LoadError> {
        let meta = fs::metadata(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            modified: meta.modified().ok(),
            len: meta.len(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct LoadedSource {
    pub records: Vec<SalesRecord>,
    pub report: LoadReport,
    pub modified_at: Option<DateTime<Utc>>,
}

#[derive(Debug)]
struct CachedSource {
    stamp: SourceStamp,
    source: LoadedSource,
}

#[derive(Debug, Default)]
pub struct SourceCache {
    entry: Option<CachedSource>,
}

impl SourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the table for `path`, reloading it when the file changed or a
    /// different file is requested. A failed reload leaves the cache empty.
    pub fn get_or_load(&mut self, path: &Path) -> Result<&LoadedSource, LoadError> {
        let stamp = SourceStamp::probe(path)?;
        let entry = match self.entry.take() {
            Some(cached) if cached.stamp == stamp => {
                log::debug!("Source cache hit for {}", path.display());
                cached
            }
            _ => {
                log::debug!("Source cache miss for {}", path.display());
                let (records, report) = loader::load_sales(path)?;
                CachedSource {
                    source: LoadedSource {
                        records,
                        report,
                        modified_at: stamp.modified.map(DateTime::<Utc>::from),
                    },
                    stamp,
                }
            }
        };
        Ok(&self.entry.insert(entry).source)
    }

    /// The currently cached table, if any, without touching the filesystem.
    pub fn current(&self) -> Option<&LoadedSource> {
        self.entry.as_ref().map(|c| &c.source)
    }

    pub fn invalidate(&mut self) {
        if self.entry.take().is_some() {
            log::info!("Source cache invalidated");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    const HEADER: &str = "marketplace_key,variant_name,quantity\n";

    fn write_source(path: &Path, body: &str) {
        let mut f = fs::File::create(path).unwrap();
        f.write_all(HEADER.as_bytes()).unwrap();
        f.write_all(body.as_bytes()).unwrap();
    }

    #[test]
    fn reuses_unchanged_source() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sales.csv");
        write_source(&path, "AmazonUS,Rug-Red,10\n");

        let mut cache = SourceCache::new();
        assert_eq!(cache.get_or_load(&path).unwrap().records.len(), 1);
        assert!(cache.get_or_load(&path).unwrap().modified_at.is_some());
        assert_eq!(cache.current().unwrap().report.total_rows, 1);
    }

    #[test]
    fn reloads_when_source_changes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sales.csv");
        write_source(&path, "AmazonUS,Rug-Red,10\n");

        let mut cache = SourceCache::new();
        assert_eq!(cache.get_or_load(&path).unwrap().records.len(), 1);

        // Different length guarantees a new stamp even on coarse mtime clocks.
        write_source(&path, "AmazonUS,Rug-Red,10\nWalmart,Lamp-Gold,3\n");
        let source = cache.get_or_load(&path).unwrap();
        assert_eq!(source.records.len(), 2);
        assert_eq!(source.report.marketplaces, 2);
    }

    #[test]
    fn invalidate_and_failed_reload_clear_entry() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sales.csv");
        write_source(&path, "AmazonUS,Rug-Red,10\n");

        let mut cache = SourceCache::new();
        cache.get_or_load(&path).unwrap();
        cache.invalidate();
        assert!(cache.current().is_none());

        cache.get_or_load(&path).unwrap();
        fs::write(&path, "marketplace_key,quantity\nAmazonUS,1\n").unwrap();
        assert!(matches!(
            cache.get_or_load(&path),
            Err(LoadError::MissingColumn(_))
        ));
        assert!(cache.current().is_none());
    }

    #[test]
    fn missing_source_is_io_error() {
        let dir = tempdir().unwrap();
        let mut cache = SourceCache::new();
        let err = cache.get_or_load(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
