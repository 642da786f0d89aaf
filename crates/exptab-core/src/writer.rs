//! Output writers for assembled tables

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::assembler::OutputTable;
use crate::error::Result;

/// Destination used when the config does not set `Outfile`
pub const DEFAULT_OUTFILE: &str = "test.csv";

/// Write a table to `path`, picking the format from the file extension:
/// `.json` gets pretty-printed JSON, anything else CSV.
pub fn write_table<P: AsRef<Path>>(table: &OutputTable, path: P) -> Result<()> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if is_json {
        write_json(table, path)
    } else {
        write_csv(table, path)
    }
}

fn write_json(table: &OutputTable, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let json = serde_json::to_string_pretty(table)?;
    writeln!(writer, "{}", json)?;

    writer.flush()?;
    Ok(())
}

fn write_csv(table: &OutputTable, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    let header: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
    writer.write_record(&header)?;

    for row in 0..table.row_count() {
        let record: Vec<String> = table
            .columns
            .iter()
            .map(|c| c.data.get(row).unwrap_or_default())
            .collect();
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}
