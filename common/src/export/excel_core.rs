//! Excel生成（共通ライブラリ）
//!
//! 1シート「Report」に見出し行 + 明細行を書き出す。No列は数値セル。

use super::ExportTable;
use crate::error::{Error, Result};
use rust_xlsxwriter::*;

pub const SHEET_NAME: &str = "Report";

/// 列幅の上限（文字数）
const MAX_COLUMN_WIDTH: usize = 60;

fn excel_err(context: &str) -> impl Fn(XlsxError) -> Error + '_ {
    move |e| Error::Excel(format!("{}: {}", context, e))
}

/// Excelをバッファに生成
pub fn generate_excel_buffer(table: &ExportTable) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0x333333))
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xAAAAAA));

    let value_format = Format::new()
        .set_align(FormatAlign::Left)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xCCCCCC));

    let index_format = Format::new()
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xCCCCCC));

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME).map_err(excel_err("シート名設定エラー"))?;

    for (col, header) in table.headers.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, header, &header_format)
            .map_err(excel_err("見出し書き込みエラー"))?;
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        let excel_row = row_idx as u32 + 1;
        for (col, value) in row.iter().enumerate() {
            if col == 0 {
                match value.parse::<f64>() {
                    Ok(number) => worksheet
                        .write_number_with_format(excel_row, 0, number, &index_format)
                        .map_err(excel_err("連番書き込みエラー"))?,
                    Err(_) => worksheet
                        .write_string_with_format(excel_row, 0, value, &index_format)
                        .map_err(excel_err("連番書き込みエラー"))?,
                };
            } else {
                worksheet
                    .write_string_with_format(excel_row, col as u16, value, &value_format)
                    .map_err(excel_err("値書き込みエラー"))?;
            }
        }
    }

    // 列幅は見出しと値の最大文字数から
    for col in 0..table.width() {
        let longest = std::iter::once(&table.headers[col])
            .chain(table.rows.iter().filter_map(|r| r.get(col)))
            .map(|s| s.chars().count())
            .max()
            .unwrap_or(0);
        let width = (longest + 2).clamp(6, MAX_COLUMN_WIDTH) as f64;
        worksheet
            .set_column_width(col as u16, width)
            .map_err(excel_err("列幅設定エラー"))?;
    }

    if !table.headers.is_empty() {
        worksheet
            .set_freeze_panes(1, 0)
            .map_err(excel_err("ウィンドウ枠固定エラー"))?;
    }

    workbook.save_to_buffer().map_err(excel_err("Excel保存エラー"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_non_empty_buffer() {
        let table = ExportTable {
            title: "Drivers Report".to_string(),
            headers: vec!["No".to_string(), "Name".to_string()],
            rows: vec![vec!["1".to_string(), "Jane".to_string()]],
        };
        let buffer = generate_excel_buffer(&table).unwrap();
        // xlsx は zip
        assert_eq!(&buffer[..2], b"PK");
    }

    #[test]
    fn test_generate_header_only() {
        let table = ExportTable {
            title: "Empty".to_string(),
            headers: vec!["No".to_string()],
            rows: vec![],
        };
        assert!(generate_excel_buffer(&table).is_ok());
    }
}
