use super::establishments::QualifyingKeys;
use super::layout::{company_columns as col, FieldLayout, COMPANY_LAYOUT};
use super::normalizer::normalize_base_id;
use super::stage::RecordFilter;
use super::Record;

/// Keeps companies whose base identifier was selected by the establishment
/// stage. One row per base identifier survives deduplication.
#[derive(Debug, Clone, Copy)]
pub struct CompanyFilter<'a> {
    keys: &'a QualifyingKeys,
}

impl<'a> CompanyFilter<'a> {
    pub fn new(keys: &'a QualifyingKeys) -> Self {
        Self { keys }
    }
}

impl RecordFilter for CompanyFilter<'_> {
    type Key = String;

    fn layout(&self) -> &'static FieldLayout {
        &COMPANY_LAYOUT
    }

    fn normalize(&self, record: &mut Record) {
        record.update(col::BASE_ID, normalize_base_id);
    }

    fn retain(&self, record: &Record) -> bool {
        self.keys.contains(record.get(col::BASE_ID))
    }

    fn dedup_key(&self, record: &Record) -> Self::Key {
        record.get(col::BASE_ID).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn company(base_id: &str, name: &str) -> Record {
        let mut values = vec![String::new(); COMPANY_LAYOUT.len()];
        values[col::BASE_ID] = base_id.to_string();
        values[1] = name.to_string();
        Record::new(values)
    }

    #[test]
    fn joins_on_normalized_base_id() {
        let keys: QualifyingKeys = ["00000123".to_string()].into_iter().collect();
        let filter = CompanyFilter::new(&keys);

        let mut matching = company(" 123", "PADARIA BOM PAO LTDA");
        filter.normalize(&mut matching);
        assert_eq!(matching.get(col::BASE_ID), "00000123");
        assert!(filter.retain(&matching));

        let mut other = company("456", "OUTRA LTDA");
        filter.normalize(&mut other);
        assert!(!filter.retain(&other));
    }

    #[test]
    fn empty_key_set_rejects_everything() {
        let keys = QualifyingKeys::default();
        let filter = CompanyFilter::new(&keys);

        let mut record = company("00000000", "");
        filter.normalize(&mut record);
        assert!(!filter.retain(&record));
    }
}
