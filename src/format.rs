use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output kinds the engine can write next to the output base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Txt,
    Tsv,
    Box,
    Hocr,
    Osd,
    Pdf,
}

impl OutputFormat {
    /// Engine flag order; independent of the order formats were requested in.
    pub const ALL: [OutputFormat; 6] = [
        OutputFormat::Txt,
        OutputFormat::Box,
        OutputFormat::Pdf,
        OutputFormat::Hocr,
        OutputFormat::Tsv,
        OutputFormat::Osd,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OutputFormat::Txt => "txt",
            OutputFormat::Tsv => "tsv",
            OutputFormat::Box => "box",
            OutputFormat::Hocr => "hocr",
            OutputFormat::Osd => "osd",
            OutputFormat::Pdf => "pdf",
        }
    }

    /// The engine writes `{base}.{extension}`.
    pub fn extension(self) -> &'static str {
        self.name()
    }

    /// Trailing config tokens that make the engine emit this format.
    ///
    /// OSD output is driven by `--psm 0` alone, see [`crate::command`].
    pub fn flags(self) -> &'static [&'static str] {
        match self {
            OutputFormat::Txt => &["txt"],
            OutputFormat::Tsv => &["tsv"],
            OutputFormat::Box => &["batch.nochop", "makebox"],
            OutputFormat::Hocr => &["hocr"],
            OutputFormat::Pdf => &["pdf"],
            OutputFormat::Osd => &[],
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let norm: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let norm = norm.to_ascii_lowercase();
        OutputFormat::ALL
            .into_iter()
            .find(|f| f.name() == norm)
            .ok_or(Error::UnknownFormat(norm))
    }
}

/// Requested formats, in caller order. Duplicates are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRequest(Vec<OutputFormat>);

impl OutputRequest {
    pub fn new(formats: impl IntoIterator<Item = OutputFormat>) -> Self {
        let formats: Vec<_> = formats.into_iter().collect();
        if formats.is_empty() {
            return Self::default();
        }
        Self(formats)
    }

    /// Parses a comma separated list such as `"txt, tsv"`.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut formats = Vec::new();
        for part in raw.split(',') {
            if part.trim().is_empty() {
                continue;
            }
            formats.push(part.parse()?);
        }
        Ok(Self::new(formats))
    }

    pub fn formats(&self) -> &[OutputFormat] {
        &self.0
    }

    pub fn contains(&self, format: OutputFormat) -> bool {
        self.0.contains(&format)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Each distinct requested format once, in engine flag order.
    pub fn distinct(&self) -> impl Iterator<Item = OutputFormat> + '_ {
        OutputFormat::ALL.into_iter().filter(|f| self.contains(*f))
    }
}

impl Default for OutputRequest {
    fn default() -> Self {
        Self(vec![OutputFormat::Txt])
    }
}

impl From<OutputFormat> for OutputRequest {
    fn from(format: OutputFormat) -> Self {
        Self(vec![format])
    }
}

impl FromStr for OutputRequest {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Representation produced for each output file by `image_to_data`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataOutput {
    Bytes,
    #[default]
    String,
    Dict,
}

impl FromStr for DataOutput {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bytes" => Ok(DataOutput::Bytes),
            "string" | "str" => Ok(DataOutput::String),
            "dict" => Ok(DataOutput::Dict),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_case_and_whitespace() {
        let req = OutputRequest::parse(" TSV ,t x t,box").unwrap();
        assert_eq!(
            req.formats(),
            &[OutputFormat::Tsv, OutputFormat::Txt, OutputFormat::Box]
        );
    }

    #[test]
    fn empty_request_defaults_to_txt() {
        assert_eq!(OutputRequest::parse("").unwrap(), OutputRequest::default());
    }

    #[test]
    fn distinct_uses_flag_order() {
        let req = OutputRequest::new([OutputFormat::Tsv, OutputFormat::Txt, OutputFormat::Tsv]);
        let got: Vec<_> = req.distinct().collect();
        assert_eq!(got, vec![OutputFormat::Txt, OutputFormat::Tsv]);
        assert_eq!(req.len(), 3);
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(matches!(
            "docx".parse::<OutputFormat>(),
            Err(Error::UnknownFormat(name)) if name == "docx"
        ));
    }
}
