//! Parquet file handling for authorship data

use crate::data::AuthorStore;
use crate::error::{AnalyzerError, Result};
use polars::prelude::*;
use std::path::Path;

pub const AUTHOR_COLUMN: &str = "author";
pub const NAME_COLUMN: &str = "name";
pub const AFFILIATION_COLUMN: &str = "affiliation";
pub const PUB_KEY_COLUMN: &str = "pub_key";

/// Load an authorship table (one row per author and publication) into an AuthorStore
///
/// Rows with a null author are skipped. A null `pub_key` still registers the
/// author, which then ends up as an isolated node. Name and affiliation are
/// taken from the first row that carries them.
pub fn load_authorships(path: &str) -> Result<AuthorStore> {
    log::info!("Reading parquet file: {}", path);

    if !Path::new(path).exists() {
        return Err(AnalyzerError::not_found("authorship table", path));
    }

    let df = LazyFrame::scan_parquet(path, Default::default())?
        .select([
            col(AUTHOR_COLUMN),
            col(NAME_COLUMN),
            col(AFFILIATION_COLUMN),
            col(PUB_KEY_COLUMN),
        ])
        .collect()?;

    log::info!("Loaded {} authorship rows", df.height());

    let authors = df.column(AUTHOR_COLUMN)?.str()?;
    let names = df.column(NAME_COLUMN)?.str()?;
    let affiliations = df.column(AFFILIATION_COLUMN)?.str()?;
    let pub_keys = df.column(PUB_KEY_COLUMN)?.str()?;

    let mut store = AuthorStore::new();
    let mut skipped = 0usize;

    for i in 0..df.height() {
        let Some(author) = authors.get(i) else {
            skipped += 1;
            continue;
        };

        let record = store.entry_mut(author);
        if record.name.is_empty() {
            if let Some(name) = names.get(i) {
                record.name = name.to_string();
            }
        }
        if record.affiliation.is_empty() {
            if let Some(affiliation) = affiliations.get(i) {
                record.affiliation = affiliation.to_string();
            }
        }
        if let Some(key) = pub_keys.get(i) {
            record.pubs.insert(key.to_string());
        }
    }

    if skipped > 0 {
        log::warn!("Skipped {} rows without an author id", skipped);
    }
    log::info!(
        "Collected {} authors with {} distinct authorships",
        store.len(),
        store.authorship_count()
    );

    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn groups_rows_by_author() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("authorships.parquet");

        let mut df = df!(
            AUTHOR_COLUMN => &[Some("homepages/a"), Some("homepages/a"), Some("homepages/b"), Some("homepages/c"), None],
            NAME_COLUMN => &[Some("A"), None, Some("B"), Some("C"), Some("ghost")],
            AFFILIATION_COLUMN => &[None, Some("Uni"), Some(""), None, None],
            PUB_KEY_COLUMN => &[Some("p1"), Some("p2"), Some("p2"), None, Some("p9")],
        )
        .unwrap();
        let mut file = File::create(&path).unwrap();
        ParquetWriter::new(&mut file).finish(&mut df).unwrap();

        let store = load_authorships(path.to_str().unwrap()).unwrap();

        assert_eq!(store.len(), 3);
        let a = store.get("homepages/a").unwrap();
        assert_eq!(a.name, "A");
        assert_eq!(a.affiliation, "Uni");
        assert_eq!(a.pubs.len(), 2);
        assert!(store.get("homepages/c").unwrap().pubs.is_empty());
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = load_authorships("/definitely/not/here.parquet").unwrap_err();
        assert!(matches!(err, AnalyzerError::NotFound { .. }));
    }
}
