use crate::format::{OutputFormat, OutputRequest};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// One file written by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputFile {
    pub path: PathBuf,
    pub format: OutputFormat,
}

pub fn expected_path(output_base: &Path, format: OutputFormat) -> PathBuf {
    let mut raw = output_base.as_os_str().to_os_string();
    raw.push(".");
    raw.push(format.extension());
    PathBuf::from(raw)
}

/// Request-ordered list of the outputs that exist on disk after a successful run.
pub fn collect_outputs(output_base: &Path, request: &OutputRequest) -> Vec<OutputFile> {
    request
        .formats()
        .iter()
        .map(|&format| OutputFile {
            path: expected_path(output_base, format),
            format,
        })
        .filter(|f| f.path.is_file())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_extension_without_replacing() {
        let p = expected_path(Path::new("/tmp/TESS_abc.v1"), OutputFormat::Tsv);
        assert_eq!(p, PathBuf::from("/tmp/TESS_abc.v1.tsv"));
    }

    #[test]
    fn keeps_existing_files_in_request_order() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("out");
        std::fs::write(expected_path(&base, OutputFormat::Tsv), "level\n").unwrap();
        std::fs::write(expected_path(&base, OutputFormat::Txt), "hi").unwrap();

        let req = OutputRequest::new([
            OutputFormat::Tsv,
            OutputFormat::Hocr,
            OutputFormat::Txt,
        ]);
        let got = collect_outputs(&base, &req);
        let formats: Vec<_> = got.iter().map(|f| f.format).collect();
        assert_eq!(formats, vec![OutputFormat::Tsv, OutputFormat::Txt]);
    }
}
