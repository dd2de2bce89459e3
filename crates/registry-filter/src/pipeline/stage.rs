use super::layout::FieldLayout;
use super::parser::BatchReader;
use super::{PipelineError, Record};
use std::collections::HashSet;
use std::hash::Hash;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One stage of the pipeline: which layout to read, how to normalize a raw
/// row, which rows survive and which key makes two survivors duplicates.
pub trait RecordFilter {
    type Key: Eq + Hash;

    fn layout(&self) -> &'static FieldLayout;

    fn normalize(&self, record: &mut Record);

    fn retain(&self, record: &Record) -> bool;

    fn dedup_key(&self, record: &Record) -> Self::Key;

    /// Runs the filter over `files` in order and returns the concatenated,
    /// deduplicated survivors.
    fn filter_files(
        &self,
        files: &[PathBuf],
        batch_size: usize,
    ) -> Result<FilterOutcome, PipelineError>
    where
        Self: Sized,
    {
        run_filter(self, files, batch_size)
    }
}

/// Rows kept by a stage, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSet {
    layout: &'static FieldLayout,
    rows: Vec<Record>,
}

impl ResultSet {
    pub fn new(layout: &'static FieldLayout) -> Self {
        Self {
            layout,
            rows: Vec::new(),
        }
    }

    pub fn layout(&self) -> &'static FieldLayout {
        self.layout
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows.iter().map(move |row| row.get(index))
    }

    pub(crate) fn extend(&mut self, rows: Vec<Record>) {
        self.rows.extend(rows);
    }

    /// Keeps the first row for each key and drops later ones.
    pub(crate) fn dedup_by_key<K, F>(&mut self, mut key: F)
    where
        K: Eq + Hash,
        F: FnMut(&Record) -> K,
    {
        let mut seen = HashSet::with_capacity(self.rows.len());
        self.rows.retain(|row| seen.insert(key(row)));
    }
}

/// Survivors of a stage plus the counters reported to the operator.
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    pub result: ResultSet,
    pub files_read: usize,
    pub rows_scanned: u64,
    pub rows_matched: u64,
}

fn run_filter<F: RecordFilter>(
    filter: &F,
    files: &[PathBuf],
    batch_size: usize,
) -> Result<FilterOutcome, PipelineError> {
    let layout = filter.layout();
    let mut result = ResultSet::new(layout);
    let mut rows_scanned = 0u64;
    let mut rows_matched = 0u64;

    for path in files {
        let (kept, scanned) = filter_file(filter, path, batch_size)?;
        info!(
            record_type = layout.record_type(),
            file = %path.display(),
            rows_scanned = scanned,
            rows_kept = kept.len(),
            "file filtered"
        );
        rows_scanned += scanned;
        rows_matched += kept.len() as u64;
        result.extend(kept);
    }

    result.dedup_by_key(|record| filter.dedup_key(record));
    debug!(
        record_type = layout.record_type(),
        matched = rows_matched,
        unique = result.len(),
        "duplicates removed"
    );

    Ok(FilterOutcome {
        result,
        files_read: files.len(),
        rows_scanned,
        rows_matched,
    })
}

fn filter_file<F: RecordFilter>(
    filter: &F,
    path: &Path,
    batch_size: usize,
) -> Result<(Vec<Record>, u64), PipelineError> {
    let mut reader = BatchReader::open(path, filter.layout(), batch_size)?;
    let mut kept = Vec::new();
    let mut scanned = 0u64;
    let mut batch_index = 0usize;

    while let Some(batch) = reader.next_batch().map_err(|source| PipelineError::Csv {
        path: path.to_path_buf(),
        source,
    })? {
        scanned += batch.len() as u64;
        let before = kept.len();

        kept.extend(batch.into_iter().filter_map(|mut record| {
            filter.normalize(&mut record);
            filter.retain(&record).then_some(record)
        }));

        debug!(
            file = %path.display(),
            batch = batch_index,
            rows_kept = kept.len() - before,
            "batch processed"
        );
        batch_index += 1;
    }

    Ok((kept, scanned))
}
