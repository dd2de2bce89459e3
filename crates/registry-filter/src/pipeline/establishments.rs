use super::classification::ClassificationCodes;
use super::layout::{establishment_columns as col, FieldLayout, ESTABLISHMENT_LAYOUT};
use super::normalizer::{normalize_base_id, normalize_classification_code, normalize_status};
use super::stage::{RecordFilter, ResultSet};
use super::Record;
use std::collections::HashSet;

/// Registration status literal for an active establishment.
pub const ACTIVE_STATUS: &str = "02";

/// Keeps active establishments whose primary CNAE is in the configured set.
#[derive(Debug, Clone, Copy)]
pub struct EstablishmentFilter<'a> {
    codes: &'a ClassificationCodes,
}

impl<'a> EstablishmentFilter<'a> {
    pub fn new(codes: &'a ClassificationCodes) -> Self {
        Self { codes }
    }
}

impl RecordFilter for EstablishmentFilter<'_> {
    type Key = (String, String);

    fn layout(&self) -> &'static FieldLayout {
        &ESTABLISHMENT_LAYOUT
    }

    fn normalize(&self, record: &mut Record) {
        record.update(col::BASE_ID, normalize_base_id);
        record.update(col::STATUS, normalize_status);
        record.update(col::PRIMARY_CODE, normalize_classification_code);
    }

    fn retain(&self, record: &Record) -> bool {
        record.get(col::STATUS) == ACTIVE_STATUS
            && self.codes.contains(record.get(col::PRIMARY_CODE))
    }

    fn dedup_key(&self, record: &Record) -> Self::Key {
        (
            record.get(col::BASE_ID).to_string(),
            record.get(col::PRIMARY_CODE).to_string(),
        )
    }
}

/// Distinct base identifiers of the selected establishments. Closed once
/// built; the company stage only reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QualifyingKeys {
    keys: HashSet<String>,
}

impl QualifyingKeys {
    pub fn from_establishments(result: &ResultSet) -> Self {
        result.column(col::BASE_ID).map(str::to_string).collect()
    }

    pub fn contains(&self, base_id: &str) -> bool {
        self.keys.contains(base_id)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl FromIterator<String> for QualifyingKeys {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}
