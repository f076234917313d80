use std::borrow::Cow;
use std::path::Path;

use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};

use super::error::{EncodingAttempt, PipelineError};
use super::model::{CellValue, Table};

// ---------------------------------------------------------------------------
// Candidate encodings
// ---------------------------------------------------------------------------

/// Text encodings a source file may be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceEncoding {
    /// Windows code page 949 (Unified Hangul Code), used by Korean
    /// public-sector exports.
    #[serde(rename = "cp949")]
    Cp949,
    #[serde(rename = "utf-8", alias = "utf8")]
    Utf8,
    #[serde(rename = "euc-kr")]
    EucKr,
}

impl SourceEncoding {
    /// Preference order used when nothing is configured.
    pub const DEFAULT_ORDER: [SourceEncoding; 3] =
        [SourceEncoding::Cp949, SourceEncoding::Utf8, SourceEncoding::EucKr];

    pub fn name(self) -> &'static str {
        match self {
            SourceEncoding::Cp949 => "cp949",
            SourceEncoding::Utf8 => "utf-8",
            SourceEncoding::EucKr => "euc-kr",
        }
    }

    /// encoding_rs follows the WHATWG standard, whose EUC-KR decoder is the
    /// full windows-949 superset.
    fn codec(self) -> &'static Encoding {
        match self {
            SourceEncoding::Cp949 | SourceEncoding::EucKr => encoding_rs::EUC_KR,
            SourceEncoding::Utf8 => encoding_rs::UTF_8,
        }
    }

    /// Strict decode: any malformed sequence rejects this encoding.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        let text: Cow<'_, str> = self
            .codec()
            .decode_without_bom_handling_and_without_replacement(bytes)?;
        Some(text.trim_start_matches('\u{feff}').to_string())
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a delimited text file, trying `encodings` in order.
///
/// The first candidate that decodes cleanly, parses as CSV and carries every
/// column in `required` wins. When none does, every attempt is reported in
/// the returned [`PipelineError::DataUnavailable`].
pub fn load_file(
    path: &Path,
    encodings: &[SourceEncoding],
    required: &[&str],
) -> Result<(Table, SourceEncoding), PipelineError> {
    let bytes = std::fs::read(path).map_err(|e| PipelineError::DataUnavailable {
        path: path.to_path_buf(),
        attempts: Vec::new(),
        io: Some(e.to_string()),
    })?;

    let mut attempts = Vec::with_capacity(encodings.len());

    for &encoding in encodings {
        match try_encoding(&bytes, encoding, required) {
            Ok(table) => {
                log::info!(
                    "Loaded {} rows x {} columns from {} as {}",
                    table.len(),
                    table.columns().len(),
                    path.display(),
                    encoding.name()
                );
                return Ok((table, encoding));
            }
            Err(attempt) => {
                log::warn!("{}: rejected {attempt}", path.display());
                attempts.push(attempt);
            }
        }
    }

    Err(PipelineError::DataUnavailable {
        path: path.to_path_buf(),
        attempts,
        io: None,
    })
}

fn try_encoding(
    bytes: &[u8],
    encoding: SourceEncoding,
    required: &[&str],
) -> Result<Table, EncodingAttempt> {
    let text = encoding
        .decode(bytes)
        .ok_or_else(|| EncodingAttempt::new(encoding.name(), "malformed byte sequence"))?;

    let table = parse_csv(&text)
        .map_err(|e| EncodingAttempt::new(encoding.name(), format!("CSV error: {e}")))?;

    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|c| table.column_index(c).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(EncodingAttempt::new(
            encoding.name(),
            format!("missing columns {missing:?}"),
        ));
    }

    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one record per line.
/// Cell types are inferred per cell (see [`CellValue::parse`]).
pub fn parse_csv(text: &str) -> Result<Table, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(CellValue::parse).collect());
    }

    Ok(Table::new(headers, rows))
}
