//! CSV export of processed call records.
//!
//! Each call produces one standalone file (`call_analysis_<job id>.csv`)
//! with a header row and a single data row, so the download collaborator
//! never contends over a shared table. Quoting follows RFC 4180: fields
//! containing commas, quotes, or newlines are wrapped in double quotes
//! with embedded quotes doubled. The reader reverses the writer exactly,
//! which is what makes re-importing exported rows lossless.

use crate::error::{CallscribeError, Result};
use crate::pipeline::CallResult;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// Column headers of the export record, in order.
pub const CSV_COLUMNS: [&str; 7] = [
    "Client Name",
    "Customer Name",
    "Date of Call",
    "Conversation Transcript",
    "Translated Transcript (English)",
    "Interested in Property",
    "Processing Time (seconds)",
];

/// One exported call record, all fields in their textual form.
///
/// `translation` is the empty string when the record was exported without
/// a translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRecord {
    pub client_name: String,
    pub customer_name: String,
    pub call_date: String,
    pub transcript: String,
    pub translation: String,
    pub interested: String,
    pub processing_time: String,
}

impl From<&CallResult> for ExportRecord {
    fn from(result: &CallResult) -> Self {
        Self {
            client_name: result.client_name.clone(),
            customer_name: result.customer_name.clone(),
            call_date: result.call_date_str(),
            transcript: result.transcript.text.clone(),
            translation: result.translation.clone().unwrap_or_default(),
            interested: result.verdict.as_export_str().to_string(),
            processing_time: result.processing_time_str(),
        }
    }
}

/// Quote a field if it contains a delimiter, quote, or line break.
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Render a record as CSV text (header row + one data row).
pub fn to_csv(record: &ExportRecord) -> String {
    let header = CSV_COLUMNS.join(",");
    let fields = [
        &record.client_name,
        &record.customer_name,
        &record.call_date,
        &record.transcript,
        &record.translation,
        &record.interested,
        &record.processing_time,
    ];
    let row: Vec<String> = fields.iter().map(|f| escape_field(f)).collect();
    format!("{}\n{}\n", header, row.join(","))
}

/// Split one CSV line... except that quoted fields may span lines, so this
/// takes the whole remaining input and consumes exactly one logical row.
///
/// Returns the parsed fields and the unconsumed rest of the input.
fn parse_row(input: &str) -> Result<(Vec<String>, &str)> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut chars = input.char_indices().peekable();
    let mut in_quotes = false;
    let mut rest_at = input.len();

    while let Some((i, c)) = chars.next() {
        if in_quotes {
            match c {
                '"' => {
                    if chars.peek().map(|&(_, next)| next) == Some('"') {
                        field.push('"');
                        chars.next();
                    } else {
                        in_quotes = false;
                    }
                }
                _ => field.push(c),
            }
        } else {
            match c {
                '"' if field.is_empty() => in_quotes = true,
                ',' => {
                    fields.push(std::mem::take(&mut field));
                }
                '\r' => {
                    // Swallow the \n of a \r\n pair.
                    if chars.peek().map(|&(_, next)| next) == Some('\n') {
                        chars.next();
                    }
                    rest_at = i + c.len_utf8()
                        + if input[i + 1..].starts_with('\n') { 1 } else { 0 };
                    fields.push(field);
                    return Ok((fields, &input[rest_at..]));
                }
                '\n' => {
                    fields.push(field);
                    return Ok((fields, &input[i + 1..]));
                }
                _ => field.push(c),
            }
        }
    }

    if in_quotes {
        return Err(CallscribeError::Export {
            message: "unterminated quoted field".to_string(),
        });
    }

    fields.push(field);
    Ok((fields, &input[rest_at..]))
}

/// Parse CSV text produced by [`to_csv`] back into an [`ExportRecord`].
pub fn from_csv(csv: &str) -> Result<ExportRecord> {
    let (header, rest) = parse_row(csv)?;
    if header != CSV_COLUMNS {
        return Err(CallscribeError::Export {
            message: format!("unexpected header: {:?}", header),
        });
    }

    let (fields, _) = parse_row(rest)?;
    if fields.len() != CSV_COLUMNS.len() {
        return Err(CallscribeError::Export {
            message: format!("expected {} fields, got {}", CSV_COLUMNS.len(), fields.len()),
        });
    }

    let mut it = fields.into_iter();
    // Field order mirrors CSV_COLUMNS.
    Ok(ExportRecord {
        client_name: it.next().unwrap_or_default(),
        customer_name: it.next().unwrap_or_default(),
        call_date: it.next().unwrap_or_default(),
        transcript: it.next().unwrap_or_default(),
        translation: it.next().unwrap_or_default(),
        interested: it.next().unwrap_or_default(),
        processing_time: it.next().unwrap_or_default(),
    })
}

/// Write a call result to `results_dir`, returning the file path.
///
/// The directory is created if missing; the filename embeds the job id so
/// concurrent exports never collide.
pub fn write_result(result: &CallResult, results_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(results_dir)?;

    let path = results_dir.join(format!("call_analysis_{}.csv", result.job_id));
    let record = ExportRecord::from(result);
    fs::write(&path, to_csv(&record))?;

    info!("[{}] exported call record to {}", result.job_id, path.display());
    Ok(path)
}

/// Read a previously exported record back from disk.
pub fn read_result(path: &Path) -> Result<ExportRecord> {
    let contents = fs::read_to_string(path)?;
    from_csv(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interest::Verdict;
    use crate::pipeline::CallJob;
    use crate::stt::Transcript;
    use std::time::Duration;
    use tempfile::TempDir;

    fn record() -> ExportRecord {
        ExportRecord {
            client_name: "Asha".to_string(),
            customer_name: "Mr. Rao".to_string(),
            call_date: "2024-11-02".to_string(),
            transcript: "main flat kharidna chahta hoon".to_string(),
            translation: "I want to buy the flat".to_string(),
            interested: "Yes".to_string(),
            processing_time: "12.34".to_string(),
        }
    }

    #[test]
    fn test_to_csv_layout() {
        let csv = to_csv(&record());
        let mut lines = csv.lines();

        assert_eq!(
            lines.next().unwrap(),
            "Client Name,Customer Name,Date of Call,Conversation Transcript,\
             Translated Transcript (English),Interested in Property,Processing Time (seconds)"
        );
        assert_eq!(
            lines.next().unwrap(),
            "Asha,Mr. Rao,2024-11-02,main flat kharidna chahta hoon,\
             I want to buy the flat,Yes,12.34"
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_round_trip_plain_fields() {
        let original = record();
        let parsed = from_csv(&to_csv(&original)).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_round_trip_with_commas_and_quotes() {
        let mut original = record();
        original.transcript = "haan, \"pakka\" lunga, bilkul".to_string();
        original.customer_name = "Rao, Venkat".to_string();

        let parsed = from_csv(&to_csv(&original)).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_round_trip_with_newlines() {
        let mut original = record();
        original.transcript = "pehli baat\ndusri baat".to_string();

        let csv = to_csv(&original);
        let parsed = from_csv(&csv).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_round_trip_empty_translation() {
        let mut original = record();
        original.translation = String::new();

        let parsed = from_csv(&to_csv(&original)).unwrap();
        assert_eq!(parsed.translation, "");
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_from_csv_rejects_bad_header() {
        let csv = "Wrong,Header\nAsha,Rao\n";
        assert!(matches!(from_csv(csv), Err(CallscribeError::Export { .. })));
    }

    #[test]
    fn test_from_csv_rejects_wrong_field_count() {
        let header = CSV_COLUMNS.join(",");
        let csv = format!("{}\nonly,three,fields\n", header);
        assert!(matches!(
            from_csv(&csv),
            Err(CallscribeError::Export { .. })
        ));
    }

    #[test]
    fn test_from_csv_rejects_unterminated_quote() {
        let header = CSV_COLUMNS.join(",");
        let csv = format!("{}\n\"unterminated,a,b,c,d,e,f\n", header);
        assert!(matches!(
            from_csv(&csv),
            Err(CallscribeError::Export { .. })
        ));
    }

    #[test]
    fn test_from_csv_accepts_crlf_line_endings() {
        let header = CSV_COLUMNS.join(",");
        let csv = format!("{}\r\nAsha,Rao,2024-11-02,text,,No,0.10\r\n", header);
        let parsed = from_csv(&csv).unwrap();
        assert_eq!(parsed.client_name, "Asha");
        assert_eq!(parsed.interested, "No");
    }

    #[test]
    fn test_write_and_read_result() {
        let dir = TempDir::new().unwrap();
        let job = CallJob::new("/uploads/call.wav", "Asha", "Mr. Rao").unwrap();
        let result = crate::pipeline::CallResult::new(
            &job,
            Transcript::new("kharidna chahta hoon, property acchi hai", "hi"),
            None,
            Verdict::Interested,
            Duration::from_millis(3456),
        )
        .unwrap();

        let path = write_result(&result, dir.path()).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            format!("call_analysis_{}.csv", job.id)
        );

        let parsed = read_result(&path).unwrap();
        assert_eq!(parsed.client_name, "Asha");
        assert_eq!(parsed.customer_name, "Mr. Rao");
        assert_eq!(parsed.transcript, "kharidna chahta hoon, property acchi hai");
        assert_eq!(parsed.translation, "");
        assert_eq!(parsed.interested, "Yes");
        assert_eq!(parsed.processing_time, "3.46");
    }

    #[test]
    fn test_write_result_creates_results_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");

        let job = CallJob::new("/uploads/call.wav", "Asha", "Mr. Rao").unwrap();
        let result = crate::pipeline::CallResult::new(
            &job,
            Transcript::new("text", "hi"),
            Some("text".to_string()),
            Verdict::NotInterested,
            Duration::ZERO,
        )
        .unwrap();

        let path = write_result(&result, &nested).unwrap();
        assert!(path.exists());
    }
}
