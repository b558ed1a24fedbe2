//! Author records handed over by the ingestion collaborators

pub mod json;
pub mod parquet;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Prefix every author id carries in the bibliographic dump
pub const AUTHOR_ID_PREFIX: &str = "homepages/";

/// One author as produced by ingestion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRecord {
    pub name: String,

    /// Empty when the affiliation is unknown
    #[serde(default)]
    pub affiliation: String,

    /// Distinct publication keys
    #[serde(default)]
    pub pubs: BTreeSet<String>,
}

impl AuthorRecord {
    pub fn new<I, S>(name: &str, affiliation: &str, pubs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.to_string(),
            affiliation: affiliation.to_string(),
            pubs: pubs.into_iter().map(Into::into).collect(),
        }
    }
}

/// Author id -> record, ordered by id so every consumer sees the same order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorStore {
    records: BTreeMap<String, AuthorRecord>,
}

impl AuthorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, replacing any previous record with the same id
    pub fn insert(&mut self, id: impl Into<String>, record: AuthorRecord) -> Option<AuthorRecord> {
        self.records.insert(id.into(), record)
    }

    pub fn get(&self, id: &str) -> Option<&AuthorRecord> {
        self.records.get(id)
    }

    pub(crate) fn entry_mut(&mut self, id: &str) -> &mut AuthorRecord {
        self.records.entry(id.to_string()).or_default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AuthorRecord)> {
        self.records.iter().map(|(id, record)| (id.as_str(), record))
    }

    /// Total number of (author, publication) pairs
    pub fn authorship_count(&self) -> usize {
        self.records.values().map(|r| r.pubs.len()).sum()
    }
}

impl<S: Into<String>> FromIterator<(S, AuthorRecord)> for AuthorStore {
    fn from_iter<T: IntoIterator<Item = (S, AuthorRecord)>>(iter: T) -> Self {
        Self {
            records: iter.into_iter().map(|(id, r)| (id.into(), r)).collect(),
        }
    }
}

/// Public short id of an author (`homepages/12/3456` -> `12/3456`)
pub fn short_id(id: &str) -> &str {
    id.strip_prefix(AUTHOR_ID_PREFIX).unwrap_or(id)
}

/// Profile link of the form `<host>/pid/<short-id>`
pub fn profile_link(host: &str, id: &str) -> String {
    format!("{}/pid/{}", host.trim_end_matches('/'), short_id(id))
}

/// Full author id from a short id given on the command line
pub fn full_id(id: &str) -> String {
    if id.starts_with(AUTHOR_ID_PREFIX) {
        id.to_string()
    } else {
        format!("{}{}", AUTHOR_ID_PREFIX, id)
    }
}
