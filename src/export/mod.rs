pub mod excel;
pub mod pdf;

use crate::error::{FleetReportError, Result};
use chrono::NaiveDate;
use fleet_report_common::export::csv_core::generate_csv_buffer;
use fleet_report_common::export::file_name;
use fleet_report_common::export::print_core::generate_print_html;
use fleet_report_common::{ExportFormat, ExportTable};
use std::path::{Path, PathBuf};

/// `report-YYYY-MM-DD.<ext>` を出力先ディレクトリに置いたパス
pub fn output_path_for(output_dir: &Path, format: ExportFormat, date: NaiveDate) -> PathBuf {
    output_dir.join(file_name(format, date))
}

fn write_csv(table: &ExportTable, path: &Path) -> Result<()> {
    let buffer =
        generate_csv_buffer(table).map_err(|e| FleetReportError::CsvGeneration(e.to_string()))?;
    std::fs::write(path, buffer)?;
    Ok(())
}

fn write_print(table: &ExportTable, path: &Path, generated_on: &str) -> Result<()> {
    std::fs::write(path, generate_print_html(table, generated_on))?;
    Ok(())
}

/// 1形式を出力
pub fn export_one(
    format: ExportFormat,
    table: &ExportTable,
    output_dir: &Path,
    date: NaiveDate,
) -> Result<PathBuf> {
    let path = output_path_for(output_dir, format, date);
    let generated_on = date.format("%Y-%m-%d").to_string();

    match format {
        ExportFormat::Excel => {
            println!("- Excelを生成中...");
            excel::generate_excel(table, &path)?;
            println!("✔ Excel出力: {}", path.display());
        }
        ExportFormat::Csv => {
            println!("- CSVを生成中...");
            write_csv(table, &path)?;
            println!("✔ CSV出力: {}", path.display());
        }
        ExportFormat::Pdf => {
            println!("- PDFを生成中...");
            pdf::generate_pdf(table, &path, &generated_on)?;
            println!("✔ PDF出力: {}", path.display());
        }
        ExportFormat::Print => {
            println!("- 印刷用HTMLを生成中...");
            write_print(table, &path, &generated_on)?;
            println!("✔ 印刷用HTML: {}（ブラウザで開くと印刷ダイアログが表示されます）", path.display());
        }
    }

    tracing::info!(%format, rows = table.len(), path = %path.display(), "report exported");
    Ok(path)
}

/// 指定形式をまとめて出力し、書いたファイルのパスを返す
pub fn export_report(
    formats: &[ExportFormat],
    table: &ExportTable,
    output_dir: &Path,
    date: NaiveDate,
) -> Result<Vec<PathBuf>> {
    if !output_dir.exists() {
        std::fs::create_dir_all(output_dir)?;
    }

    formats
        .iter()
        .map(|format| export_one(*format, table, output_dir, date))
        .collect()
}
