use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};

use anyhow::Context;
use chrono::{Local, NaiveDateTime};
use rust_xlsxwriter::{Format, Workbook};

use crate::{
    configuration::OutputSettings,
    domain::news::{ResultRecord, ResultTable, RESULT_COLUMNS},
};

const FILE_NAME_FORMAT: &str = "%m%d%Y %H%M%S";

/// Characters Excel accepts in a single cell.
pub const MAX_CELL_CHARS: usize = 32_767;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell<'a> {
    Text(Cow<'a, str>),
    Number(f64),
    Boolean(bool),
}

pub fn results_file_name(created_at: NaiveDateTime, extension: &str) -> String {
    format!(
        "{}.{}",
        created_at.format(FILE_NAME_FORMAT),
        extension.trim_start_matches('.')
    )
}

/// Cuts text longer than a cell can hold.
pub fn cell_text(text: &str) -> Cow<'_, str> {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => {
            log::warn!(
                "Cell text of {} characters truncated to {}",
                text.chars().count(),
                MAX_CELL_CHARS
            );
            Cow::Borrowed(&text[..end])
        }
        None => Cow::Borrowed(text),
    }
}

/// One worksheet row, in [`RESULT_COLUMNS`] order.
pub fn row(record: &ResultRecord) -> [Cell<'_>; 6] {
    [
        Cell::Text(cell_text(&record.title)),
        Cell::Text(cell_text(&record.date)),
        Cell::Text(cell_text(&record.description)),
        Cell::Text(cell_text(&record.picture_reference)),
        Cell::Number(record.phrase_match_count as f64),
        Cell::Boolean(record.contains_monetary_mention),
    ]
}

/// Writes the table as a new workbook under `excel_files_path` and returns
/// its path.
pub fn write_results(table: &ResultTable, output: &OutputSettings) -> anyhow::Result<PathBuf> {
    let directory = Path::new(&output.excel_files_path);
    std::fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create {}", directory.display()))?;

    let path = directory.join(results_file_name(
        Local::now().naive_local(),
        &output.excel_files_extension,
    ));

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let header = Format::new().set_bold();

    for (col, name) in (0u16..).zip(RESULT_COLUMNS) {
        worksheet.write_string_with_format(0, col, name, &header)?;
    }

    for (index, record) in (1u32..).zip(table.records()) {
        for (col, cell) in (0u16..).zip(row(record)) {
            match cell {
                Cell::Text(text) => worksheet.write_string(index, col, text)?,
                Cell::Number(number) => worksheet.write_number(index, col, number)?,
                Cell::Boolean(flag) => worksheet.write_boolean(index, col, flag)?,
            };
        }
    }

    workbook
        .save(&path)
        .with_context(|| format!("Failed to save {}", path.display()))?;

    log::info!("Saved {} news to {}", table.len(), path.display());
    Ok(path)
}
