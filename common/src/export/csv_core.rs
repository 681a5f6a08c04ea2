//! CSV生成
//!
//! 全フィールドをダブルクォートで囲み、値中の `"` は `""` にする。

use super::ExportTable;
use crate::error::{Error, Result};

pub fn generate_csv_buffer(table: &ExportTable) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .double_quote(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }

    writer
        .into_inner()
        .map_err(|e| Error::Io(std::io::Error::other(e.to_string())))
}
