//! Result-set writers: aligned table, CSV and JSON.
//!
//! Each writer takes the indices of the rows to emit so that callers can
//! pass the filtered view of a result.

use crate::app::QueryResult;
use crate::error::Result;
use serde_json::{Map, Value};
use std::io::Write;
use unicode_width::UnicodeWidthStr;

/// Print results as an aligned text table.
pub fn write_table(writer: &mut dyn Write, result: &QueryResult, rows: &[usize]) -> Result<()> {
    if let Some(ref err) = result.error {
        writeln!(writer, "Error: {}", err)?;
        return Ok(());
    }
    if result.columns.is_empty() {
        return Ok(());
    }

    let cells: Vec<Vec<String>> = rows
        .iter()
        .filter_map(|i| result.rows.get(*i))
        .map(|row| row.iter().map(|v| v.to_string()).collect())
        .collect();

    // Calculate column widths
    let widths: Vec<usize> = result
        .columns
        .iter()
        .enumerate()
        .map(|(i, col)| {
            let max_data = cells
                .iter()
                .map(|r| r.get(i).map(|s| s.width()).unwrap_or(0))
                .max()
                .unwrap_or(0);
            col.width().max(max_data)
        })
        .collect();

    let header: Vec<String> = result
        .columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| pad(c, *w))
        .collect();
    writeln!(writer, "{}", header.join(" | "))?;

    let sep: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    writeln!(writer, "{}", sep.join("-+-"))?;

    for row in &cells {
        let line: Vec<String> = row.iter().zip(&widths).map(|(v, w)| pad(v, *w)).collect();
        writeln!(writer, "{}", line.join(" | "))?;
    }

    writeln!(writer, "\n({} of {} rows)", cells.len(), result.row_count)?;
    writeln!(writer, "({}ms)", result.elapsed_ms)?;
    Ok(())
}

/// Print results as CSV.
pub fn write_csv(writer: &mut dyn Write, result: &QueryResult, rows: &[usize]) -> Result<()> {
    let header: Vec<String> = result.columns.iter().map(|c| csv_field(c)).collect();
    writeln!(writer, "{}", header.join(","))?;
    for row in rows.iter().filter_map(|i| result.rows.get(*i)) {
        let escaped: Vec<String> = row.iter().map(|v| csv_field(&v.to_string())).collect();
        writeln!(writer, "{}", escaped.join(","))?;
    }
    writer.flush()?;
    Ok(())
}

/// Print results as a JSON array of objects keyed by column name.
pub fn write_json(writer: &mut dyn Write, result: &QueryResult, rows: &[usize]) -> Result<()> {
    let records: Vec<Value> = rows
        .iter()
        .filter_map(|i| result.rows.get(*i))
        .map(|row| -> std::result::Result<Value, serde_json::Error> {
            let mut record = Map::new();
            for (col, val) in result.columns.iter().zip(row) {
                record.insert(col.clone(), serde_json::to_value(val)?);
            }
            Ok(Value::Object(record))
        })
        .collect::<std::result::Result<_, _>>()?;
    serde_json::to_writer_pretty(&mut *writer, &records)?;
    writeln!(writer)?;
    Ok(())
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn pad(value: &str, width: usize) -> String {
    let fill = width.saturating_sub(value.width());
    format!("{}{}", value, " ".repeat(fill))
}
