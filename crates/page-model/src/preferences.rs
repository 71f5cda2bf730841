use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub allow_empty_output: bool,
    pub allow_overwrite_source: bool,
    pub output_suffix: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            allow_empty_output: false,
            allow_overwrite_source: false,
            output_suffix: "-edited".to_owned(),
        }
    }
}

impl Preferences {
    /// `report.pdf` becomes `report-edited.pdf` next to the source.
    pub fn default_destination(&self, source: &Path) -> PathBuf {
        let stem = source.file_stem().and_then(|name| name.to_str()).unwrap_or("document");
        let extension = source.extension().and_then(|ext| ext.to_str()).unwrap_or("pdf");

        source.with_file_name(format!("{stem}{}.{extension}", self.output_suffix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_destination_appends_suffix() {
        let prefs = Preferences::default();

        let destination = prefs.default_destination(Path::new("/docs/report.pdf"));
        assert_eq!(destination, PathBuf::from("/docs/report-edited.pdf"));
    }

    #[test]
    fn default_destination_without_extension_uses_pdf() {
        let prefs = Preferences { output_suffix: ".v2".to_owned(), ..Preferences::default() };

        let destination = prefs.default_destination(Path::new("scan"));
        assert_eq!(destination, PathBuf::from("scan.v2.pdf"));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let prefs: Preferences =
            serde_json::from_str(r#"{"allow_empty_output":true}"#).expect("partial prefs parse");

        assert!(prefs.allow_empty_output);
        assert!(!prefs.allow_overwrite_source);
        assert_eq!(prefs.output_suffix, "-edited");
    }
}
