//! CSV export of the headline table.
//!
//! The header row is `source,title,url,extractedOn`; fields containing a
//! comma, quote or newline are quoted with doubled inner quotes (RFC 4180).

use super::{CSV_MIME_TYPE, export_filename};
use crate::error::ExportError;
use crate::models::NewsItem;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

const HEADER: [&str; 4] = ["source", "title", "url", "extractedOn"];

/// Serialize items as UTF-8 CSV, header row first.
///
/// The header is written even when `items` is empty.
pub fn to_delimited_text(items: &[NewsItem]) -> Result<Vec<u8>, ExportError> {
    let mut writer = ::csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(HEADER)?;
    for item in items {
        writer.serialize(item)?;
    }
    writer.flush()?;
    Ok(writer.into_inner().map_err(|e| e.into_error())?)
}

/// Write the CSV export for `date` into `output_dir`, returning its path.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.as_ref().display(), items = items.len()))]
pub async fn write_csv(
    items: &[NewsItem],
    output_dir: impl AsRef<Path>,
    date: NaiveDate,
) -> Result<PathBuf, ExportError> {
    let bytes = to_delimited_text(items)?;
    let path = output_dir.as_ref().join(export_filename(date, "csv"));
    fs::write(&path, &bytes).await?;
    info!(path = %path.display(), bytes = bytes.len(), mime = CSV_MIME_TYPE, "Wrote CSV export");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str) -> NewsItem {
        NewsItem {
            source: "El País".to_string(),
            title: title.to_string(),
            url: "https://elpais.com/a?x=1,2".to_string(),
            extracted_on: NaiveDate::from_ymd_opt(2025, 5, 6).unwrap(),
        }
    }

    #[test]
    fn test_header_only_for_empty_input() {
        let bytes = to_delimited_text(&[]).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "source,title,url,extractedOn\n");
    }

    #[test]
    fn test_plain_row() {
        let bytes = to_delimited_text(&[item("Planta solar")]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            "source,title,url,extractedOn\nEl País,Planta solar,\"https://elpais.com/a?x=1,2\",2025-05-06\n"
        );
    }

    #[test]
    fn test_round_trip_with_delimiter_and_quotes() {
        let items = vec![
            item("Solar, eólica y \"autoconsumo\": récord"),
            item("Línea\ncon salto"),
            item("Sin comas"),
        ];
        let bytes = to_delimited_text(&items).unwrap();

        let mut reader = ::csv::Reader::from_reader(bytes.as_slice());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers, ::csv::StringRecord::from(HEADER.to_vec()));

        let decoded: Vec<NewsItem> = reader.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(decoded, items);
    }

    #[tokio::test]
    async fn test_write_csv_uses_dated_filename() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 5, 6).unwrap();
        let path = write_csv(&[item("Planta solar")], dir.path(), date).await.unwrap();

        assert_eq!(path.file_name().unwrap(), "noticias_energia_2025-05-06.csv");
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("source,title,url,extractedOn\n"));
        assert!(written.contains("Planta solar"));
    }
}
