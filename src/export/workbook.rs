use anyhow::{Context, Result};
use rust_xlsxwriter::{ColNum, RowNum, Workbook, Worksheet};
use std::path::Path;
use tracing::info;

use crate::process::record::{GroupedRecords, NormalizedRecord};

/// One sheet per group, `"<STATE> for <Candidate>"`, header in row 1 and
/// one record per row below it. Absent values leave the cell empty.
pub fn write_workbook(
    path: impl AsRef<Path>,
    columns: &[String],
    groups: &GroupedRecords,
) -> Result<()> {
    let path = path.as_ref();
    info!("exporting data to {}", path.display());

    let mut workbook = Workbook::new();
    for (key, records) in groups {
        let sheet_name = key.sheet_name();
        let sheet = workbook.add_worksheet();
        sheet
            .set_name(&sheet_name)
            .with_context(|| format!("naming sheet {:?}", sheet_name))?;

        write_header(sheet, columns)?;
        info!(
            "exporting {} receipt records ({})...",
            records.len(),
            sheet_name
        );
        for (index, record) in records.iter().enumerate() {
            let row = RowNum::try_from(index + 1).context("too many rows for one sheet")?;
            write_record(sheet, row, columns, record)
                .with_context(|| format!("writing row {} of {}", row + 1, sheet_name))?;
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("saving workbook {:?}", path))?;
    Ok(())
}

fn write_header(sheet: &mut Worksheet, columns: &[String]) -> Result<()> {
    for (index, column) in columns.iter().enumerate() {
        sheet.write_string(0, col_num(index)?, column.as_str())?;
    }
    Ok(())
}

fn write_record(
    sheet: &mut Worksheet,
    row: RowNum,
    columns: &[String],
    record: &NormalizedRecord,
) -> Result<()> {
    for (index, column) in columns.iter().enumerate() {
        if let Some(value) = record.get(column) {
            sheet.write_string(row, col_num(index)?, value)?;
        }
    }
    Ok(())
}

fn col_num(index: usize) -> Result<ColNum> {
    ColNum::try_from(index).context("too many columns for one sheet")
}
