//! JSON author dumps

use crate::data::AuthorStore;
use crate::error::{AnalyzerError, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Load an author dump of the form `{id: {name, affiliation, pubs: [..]}}`
pub fn load_author_store(path: impl AsRef<Path>) -> Result<AuthorStore> {
    let path = path.as_ref();
    log::info!("Reading author dump: {}", path.display());

    if !path.exists() {
        return Err(AnalyzerError::not_found("author dump", path.display().to_string()));
    }

    let reader = BufReader::new(File::open(path)?);
    let store: AuthorStore = serde_json::from_reader(reader)?;

    log::info!(
        "Loaded {} authors with {} authorships",
        store.len(),
        store.authorship_count()
    );

    Ok(store)
}

/// Write an author dump in the same shape `load_author_store` reads
pub fn save_author_store(store: &AuthorStore, path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(path.as_ref())?;
    serde_json::to_writer(file, store)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::AuthorRecord;
    use tempfile::TempDir;

    #[test]
    fn missing_dump_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = load_author_store(dir.path().join("authors.json")).unwrap_err();
        assert!(matches!(err, AnalyzerError::NotFound { kind: "author dump", .. }));
    }

    #[test]
    fn dump_survives_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("authors.json");

        let mut store = AuthorStore::new();
        store.insert("homepages/a", AuthorRecord::new("A", "Uni", ["p1", "p2"]));
        store.insert("homepages/b", AuthorRecord::new("B", "", Vec::<String>::new()));
        save_author_store(&store, &path).unwrap();

        assert_eq!(load_author_store(&path).unwrap(), store);
    }
}
