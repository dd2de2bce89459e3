use super::normalizer::{normalize_classification_code, CLASSIFICATION_CODE_WIDTH};
use crate::config::ConfigError;
use std::collections::BTreeSet;
use std::path::Path;

/// CNAE codes of the food, agribusiness, chemicals and wholesale segments
/// covered by the market study.
const STANDARD_CODES: &[&str] = &[
    "1061902", "0113000", "0131800", "0133404", "0134200", "0141501", "0141502", "0500301",
    "0600002", "0600003", "0710301", "0721901", "0722701", "0723501", "0724301", "0725100",
    "0729401", "0729402", "0729403", "0729404", "0810001", "0810002", "0810003", "0810004",
    "0810005", "0810006", "0810007", "0810008", "0810009", "0810010", "0810099", "0891600",
    "0893200", "0899101", "0899102", "0899103", "0899199", "1041400", "1042200", "1043100",
    "1064300", "1065102", "1065103", "1066000", "1071600", "1072401", "1072402", "1081301",
    "1081302", "1082100", "1091100", "1091101", "1093701", "1096100", "1099607", "1311100",
    "1312000", "1622699", "1922599", "2012600", "2013400", "2013401", "2013402", "2019399",
    "2021500", "2022300", "2029100", "2031200", "2032100", "2051700", "2061400", "2099199",
    "2221800", "2222600", "2223400", "2229302", "2229303", "2229399", "2320600", "2330301",
    "2330302", "2330303", "2330305", "2330399", "2342702", "2391501", "3832700", "3839401",
    "4621400", "4623106", "4623108", "4623109", "4623199", "4637101", "4637102", "4637107",
    "4674500", "4679604", "4679699", "4683400", "4684201", "4684299", "4685100", "4689301",
    "1061901", "1062700", "1063500", "1069400", "1041700", "1042501", "1042502", "1079900",
    "1092900", "1093702",
];

/// Immutable set of primary classification codes an establishment must carry
/// to be selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationCodes {
    codes: BTreeSet<String>,
}

impl ClassificationCodes {
    pub fn standard() -> Self {
        Self::from_codes(STANDARD_CODES.iter().copied())
    }

    /// Codes are normalized the same way as the establishment column, so
    /// `"113000"` and `"0113-0/00"` both select `0113000`.
    pub fn from_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            codes: codes
                .into_iter()
                .map(|code| normalize_classification_code(code.as_ref()))
                .collect(),
        }
    }

    /// Loads one code per line. Blank lines and `#` comments are skipped.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::CodeFile {
            path: path.to_path_buf(),
            source,
        })?;

        let mut codes = BTreeSet::new();
        for (index, line) in contents.lines().enumerate() {
            let token = line.split('#').next().unwrap_or_default().trim();
            if token.is_empty() {
                continue;
            }

            let digits = token.chars().filter(char::is_ascii_digit).count();
            if digits == 0 || digits > CLASSIFICATION_CODE_WIDTH {
                return Err(ConfigError::InvalidCode {
                    path: path.to_path_buf(),
                    line: index + 1,
                    value: token.to_string(),
                });
            }

            codes.insert(normalize_classification_code(token));
        }

        if codes.is_empty() {
            return Err(ConfigError::EmptyCodeFile {
                path: path.to_path_buf(),
            });
        }

        Ok(Self { codes })
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }
}

impl Default for ClassificationCodes {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn standard_set_is_complete_and_well_formed() {
        let codes = ClassificationCodes::standard();
        assert_eq!(codes.len(), STANDARD_CODES.len());
        assert!(codes.contains("1061902"));
        assert!(codes.contains("0113000"));
        assert!(!codes.contains("113000"));
        assert!(codes
            .iter()
            .all(|code| code.len() == 7 && code.chars().all(|c| c.is_ascii_digit())));
    }

    #[test]
    fn from_codes_normalizes_entries() {
        let codes = ClassificationCodes::from_codes(["113000", "1061-9/02"]);
        assert_eq!(codes.iter().collect::<Vec<_>>(), vec!["0113000", "1061902"]);
    }

    #[test]
    fn from_path_skips_comments_and_blank_lines() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "# bakeries\n1061902\n\n  4637107  # wholesale\n").expect("write codes");

        let codes = ClassificationCodes::from_path(file.path()).expect("codes load");
        assert_eq!(codes.iter().collect::<Vec<_>>(), vec!["1061902", "4637107"]);
    }

    #[test]
    fn from_path_rejects_malformed_codes() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "1061902\n10619021").expect("write codes");

        match ClassificationCodes::from_path(file.path()) {
            Err(ConfigError::InvalidCode { line, value, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(value, "10619021");
            }
            other => panic!("expected invalid code error, got {other:?}"),
        }
    }

    #[test]
    fn from_path_rejects_empty_files() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "# nothing selected").expect("write codes");

        assert!(matches!(
            ClassificationCodes::from_path(file.path()),
            Err(ConfigError::EmptyCodeFile { .. })
        ));
    }
}
