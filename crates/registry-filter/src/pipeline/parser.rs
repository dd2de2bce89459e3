use super::layout::FieldLayout;
use super::{PipelineError, Record};
use csv::ByteRecord;
use encoding_rs::WINDOWS_1252;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Lists the regular files in `dir` whose extension equals `extension`, in
/// lexicographic path order. Dot-files are ignored and a missing directory
/// yields an empty list.
pub(crate) fn discover_input_files(
    dir: &Path,
    extension: &str,
) -> Result<Vec<PathBuf>, PipelineError> {
    let read_dir_error = |source: io::Error| PipelineError::ReadDir {
        dir: dir.to_path_buf(),
        source,
    };

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(read_dir_error(err)),
    };

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(&read_dir_error)?.path();
        let hidden = path
            .file_name()
            .and_then(|name| name.to_str())
            .map_or(true, |name| name.starts_with('.'));
        let matches = path.extension().and_then(|ext| ext.to_str()) == Some(extension);

        if !hidden && matches && path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Registry dumps are single-byte Latin text; bytes are decoded with the
/// WHATWG `windows-1252` table, the superset used for "latin1" labels.
pub(crate) fn decode_field(bytes: &[u8]) -> String {
    let (text, _had_errors) = WINDOWS_1252.decode_without_bom_handling(bytes);
    text.into_owned()
}

/// Maps a raw row onto the layout. Fields the layout does not declare, or
/// that the row is too short to carry, become empty strings.
pub(crate) fn project(raw: &ByteRecord, layout: &FieldLayout) -> Record {
    let values = layout
        .fields()
        .iter()
        .map(|field| {
            field
                .position
                .and_then(|position| raw.get(position))
                .map(decode_field)
                .unwrap_or_default()
        })
        .collect();

    Record::new(values)
}

/// Reads a header-less `;`-delimited file in batches of at most
/// `batch_size` projected rows. The raw row buffer is reused for the whole
/// file.
pub(crate) struct BatchReader<R: Read> {
    reader: csv::Reader<R>,
    layout: &'static FieldLayout,
    batch_size: usize,
    raw: ByteRecord,
    exhausted: bool,
}

impl BatchReader<File> {
    pub(crate) fn open(
        path: &Path,
        layout: &'static FieldLayout,
        batch_size: usize,
    ) -> Result<Self, PipelineError> {
        let file = File::open(path).map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_reader(file, layout, batch_size))
    }
}

impl<R: Read> BatchReader<R> {
    pub(crate) fn from_reader(reader: R, layout: &'static FieldLayout, batch_size: usize) -> Self {
        let reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        Self {
            reader,
            layout,
            batch_size: batch_size.max(1),
            raw: ByteRecord::new(),
            exhausted: false,
        }
    }

    /// Returns `Ok(None)` once the input is exhausted.
    pub(crate) fn next_batch(&mut self) -> Result<Option<Vec<Record>>, csv::Error> {
        if self.exhausted {
            return Ok(None);
        }

        let mut batch = Vec::with_capacity(self.batch_size.min(4096));
        while batch.len() < self.batch_size {
            if !self.reader.read_byte_record(&mut self.raw)? {
                self.exhausted = true;
                break;
            }
            batch.push(project(&self.raw, self.layout));
        }

        if batch.is_empty() {
            Ok(None)
        } else {
            Ok(Some(batch))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::layout::{COMPANY_LAYOUT, ESTABLISHMENT_LAYOUT};

    #[test]
    fn decode_field_handles_latin1_bytes() {
        assert_eq!(decode_field(b"PADARIA S\xc3O JO\xc3O"), "PADARIA SÃO JOÃO");
        assert_eq!(decode_field(b"A\xe7\xfacar"), "Açúcar");
    }

    #[test]
    fn project_backfills_missing_columns() {
        let raw = ByteRecord::from(vec!["123", "ACME LTDA"]);
        let record = project(&raw, &COMPANY_LAYOUT);

        assert_eq!(record.len(), COMPANY_LAYOUT.len());
        assert_eq!(record.get(0), "123");
        assert_eq!(record.get(1), "ACME LTDA");
        assert!(record.values()[2..].iter().all(String::is_empty));
    }

    #[test]
    fn project_ignores_extra_columns() {
        let raw = ByteRecord::from(vec!["1", "2", "3", "4", "5", "6", "7", "8", "9"]);
        let record = project(&raw, &COMPANY_LAYOUT);
        assert_eq!(record.len(), 7);
        assert_eq!(record.get(6), "7");
    }

    #[test]
    fn batch_reader_splits_input_into_bounded_batches() {
        let data = "\"1\";\"A\"\n\"2\";\"B\"\n\"3\";\"C\"\n\"4\";\"D\"\n\"5\";\"E\"\n";
        let mut reader = BatchReader::from_reader(data.as_bytes(), &COMPANY_LAYOUT, 2);

        let mut sizes = Vec::new();
        while let Some(batch) = reader.next_batch().expect("batch reads") {
            sizes.push(batch.len());
        }
        assert_eq!(sizes, vec![2, 2, 1]);
        assert!(reader.next_batch().expect("exhausted").is_none());
    }

    #[test]
    fn batch_reader_tolerates_ragged_rows() {
        let data = "\"00000123\";\"0001\"\n\"00000456\";\"0001\";\"91\";\"1\";\"LOJA\";\"02\"\n";
        let mut reader = BatchReader::from_reader(data.as_bytes(), &ESTABLISHMENT_LAYOUT, 10);

        let batch = reader.next_batch().expect("batch reads").expect("rows");
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].get(5), "");
        assert_eq!(batch[1].get(5), "02");
        assert!(batch.iter().all(|record| record.len() == 30));
    }

    #[test]
    fn discover_input_files_filters_and_sorts() {
        let dir = tempfile::tempdir().expect("temp dir");
        for name in ["b.csv", "a.csv", ".hidden.csv", "notes.txt", "c.CSV"] {
            std::fs::write(dir.path().join(name), "").expect("write file");
        }
        std::fs::create_dir(dir.path().join("nested.csv")).expect("create dir");

        let files = discover_input_files(dir.path(), "csv").expect("listing works");
        let names: Vec<_> = files
            .iter()
            .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.csv", "b.csv"]);
    }

    #[test]
    fn discover_input_files_treats_missing_directory_as_empty() {
        let dir = tempfile::tempdir().expect("temp dir");
        let files =
            discover_input_files(&dir.path().join("absent"), "csv").expect("missing dir is empty");
        assert!(files.is_empty());
    }
}
