//! Excel生成（CLI版）
//!
//! ブック本体は共通クレートの `generate_excel_buffer` で組み立て、ここではファイルに書くだけ。

use crate::error::{FleetReportError, Result};
use fleet_report_common::export::excel_core::generate_excel_buffer;
use fleet_report_common::ExportTable;
use std::path::Path;

pub fn generate_excel(table: &ExportTable, output_path: &Path) -> Result<()> {
    let buffer = generate_excel_buffer(table)
        .map_err(|e| FleetReportError::ExcelGeneration(e.to_string()))?;
    std::fs::write(output_path, buffer)?;
    tracing::debug!(rows = table.len(), path = %output_path.display(), "xlsx written");
    Ok(())
}
