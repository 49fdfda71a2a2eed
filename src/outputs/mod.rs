//! Export of a run's results.
//!
//! # Submodules
//!
//! - [`csv`]: the headline table as UTF-8 CSV (`source,title,url,extractedOn`)
//! - [`json`]: the full [`RunReport`](crate::models::RunReport), per-source outcomes included
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── noticias_energia_2025-05-06.csv
//! └── noticias_energia_2025-05-06.json   # with --json
//! ```

pub mod csv;
pub mod json;

use chrono::NaiveDate;

/// MIME type of the CSV export.
pub const CSV_MIME_TYPE: &str = "text/csv";

/// `noticias_energia_{date}.{extension}`
pub fn export_filename(date: NaiveDate, extension: &str) -> String {
    format!("noticias_energia_{}.{}", date.format("%Y-%m-%d"), extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_filename_embeds_date() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 9).unwrap();
        assert_eq!(export_filename(date, "csv"), "noticias_energia_2025-01-09.csv");
    }
}
