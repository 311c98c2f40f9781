//! Author resolution: one record per unique identifier

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::data::decode::AuthorSlot;
use crate::data::works::WorkRecord;

/// One unique author, merged from the first work position mentioning it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRecord {
    pub id: String,
    pub display_name: Option<String>,
    pub orcid: Option<String>,
    pub country: Option<String>,
    pub raw_author_name: Option<String>,
    pub institution_id: Option<String>,
    pub institution_display_name: Option<String>,
    pub institution_country_code: Option<String>,
}

impl AuthorRecord {
    fn from_slot(slot: &AuthorSlot) -> Self {
        let institution = slot.institution.clone().unwrap_or_default();
        Self {
            id: slot.id.clone(),
            display_name: slot.display_name.clone(),
            orcid: slot.orcid.clone(),
            country: slot.country.clone(),
            raw_author_name: slot.raw_author_name.clone(),
            institution_id: institution.id,
            institution_display_name: institution.display_name,
            institution_country_code: institution.country_code,
        }
    }
}

/// Deduplicated author records of a works table, keyed by identifier
#[derive(Debug, Clone, Default)]
pub struct AuthorTable {
    records: Vec<AuthorRecord>,
    index: HashMap<String, usize>,
}

impl AuthorTable {
    /// Build a table from records, keeping the first record per identifier
    pub fn from_records(records: Vec<AuthorRecord>) -> Self {
        let mut table = Self::default();
        for record in records {
            table.insert(record);
        }
        table
    }

    fn insert(&mut self, record: AuthorRecord) {
        if self.index.contains_key(&record.id) {
            return;
        }
        self.index.insert(record.id.clone(), self.records.len());
        self.records.push(record);
    }

    pub fn get(&self, id: &str) -> Option<&AuthorRecord> {
        self.index.get(id).map(|&position| &self.records[position])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AuthorRecord> {
        self.records.iter()
    }
}

/// Scan every work position and emit one record per unique valid identifier.
///
/// First occurrence wins for all fields, so the output depends only on the
/// iteration order of the input table.
pub fn resolve_authors(works: &[WorkRecord]) -> AuthorTable {
    let mut table = AuthorTable::default();
    for work in works {
        for slot in &work.authors {
            if !table.contains(&slot.id) {
                table.insert(AuthorRecord::from_slot(slot));
            }
        }
    }
    log::debug!("resolved {} unique authors", table.len());
    table
}

/// Identifier-only extraction, for membership tests during graph construction
pub fn resolve_author_ids(works: &[WorkRecord]) -> HashSet<String> {
    works
        .iter()
        .flat_map(|work| work.authors.iter().map(|slot| slot.id.clone()))
        .collect()
}
