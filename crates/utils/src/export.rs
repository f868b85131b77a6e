//! CSV export of the ranked table.

use std::{fs::File, path::Path};

use polars::prelude::*;
use valuescore_primitives::Date;

use crate::UtilsError;

/// File name of the ranked table for a run date: `results_YYYY MM DD.csv`.
#[must_use]
pub fn results_file_name(date: Date) -> String {
    format!("results_{}.csv", date.format("%Y %m %d"))
}

/// Write a frame as CSV with a header row.
///
/// # Errors
/// Fails if the file cannot be created or written.
pub fn write_csv(frame: &mut DataFrame, path: impl AsRef<Path>) -> Result<(), UtilsError> {
    let path = path.as_ref();
    let mut file =
        File::create(path).map_err(|source| UtilsError::Io { path: path.to_path_buf(), source })?;
    CsvWriter::new(&mut file).include_header(true).finish(frame)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_uses_spaced_date() {
        let date = Date::from_ymd_opt(2025, 1, 2).unwrap();
        assert_eq!(results_file_name(date), "results_2025 01 02.csv");
    }

    #[test]
    fn writes_header_and_rows() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join(results_file_name(Date::from_ymd_opt(2025, 1, 2).unwrap()));
        let mut frame = df! { "Ticker" => &["005930"], "Score" => &[87.5] }.unwrap();

        write_csv(&mut frame, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().collect::<Vec<_>>(), vec!["Ticker,Score", "005930,87.5"]);
    }
}
