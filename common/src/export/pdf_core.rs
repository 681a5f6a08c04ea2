//! PDF export core utilities (layout only; drawing lives in the CLI crate).

use super::ExportTable;

/// A4横（mm）
pub const PAGE_WIDTH_MM: f32 = 297.0;
pub const PAGE_HEIGHT_MM: f32 = 210.0;
pub const MARGIN_MM: f32 = 12.0;
pub const ROW_HEIGHT_MM: f32 = 6.0;
pub const HEADER_BLOCK_MM: f32 = 22.0;
pub const FONT_SIZE_PT: f32 = 8.0;
pub const TITLE_SIZE_PT: f32 = 14.0;

/// No列の幅（mm）
const INDEX_COLUMN_MM: f32 = 12.0;
/// 1列の最小幅（mm）
const MIN_COLUMN_MM: f32 = 14.0;

/// Helvetica の平均文字幅の近似（mm）
pub fn approx_text_width_mm(text: &str, font_size_pt: f32) -> f32 {
    text.chars().count() as f32 * font_size_pt * 0.18
}

/// 幅に収まるよう末尾を `...` で切り詰める
pub fn fit_text(text: &str, width_mm: f32, font_size_pt: f32) -> String {
    if approx_text_width_mm(text, font_size_pt) <= width_mm {
        return text.to_string();
    }
    let per_char = font_size_pt * 0.18;
    let max_chars = (width_mm / per_char).floor() as usize;
    if max_chars <= 3 {
        return text.chars().take(max_chars).collect();
    }
    let kept: String = text.chars().take(max_chars - 3).collect();
    format!("{}...", kept)
}

/// WinAnsi の 0x80-0x9F に割り当てられた文字
const WIN_ANSI_EXTRAS: &str = "€‚ƒ„…†‡ˆ‰Š‹ŒŽ‘’“”•–—˜™š›œžŸ";

/// 組み込みフォント（WinAnsi）で描けない文字を `?` に置き換える
///
/// 日本語などはPDFでは表示できない。Excel/CSV/印刷用HTMLはそのまま出す。
pub fn win_ansi_text(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            ' '..='~' | '\u{A0}'..='\u{FF}' => c,
            c if WIN_ANSI_EXTRAS.contains(c) => c,
            _ => '?',
        })
        .collect()
}

/// 表レイアウト計算結果（mm単位）
#[derive(Debug, Clone)]
pub struct PdfTableLayout {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_mm: f32,
    pub row_height_mm: f32,
    pub column_widths_mm: Vec<f32>,
    /// 1ページに載る明細行数（見出し行を除く）
    pub rows_per_page: usize,
}

impl PdfTableLayout {
    /// 列幅は No列を固定、残りを各列の最大文字数に比例して配分
    pub fn for_table(table: &ExportTable) -> Self {
        let usable_width = PAGE_WIDTH_MM - MARGIN_MM * 2.0;
        let usable_height = PAGE_HEIGHT_MM - MARGIN_MM * 2.0 - HEADER_BLOCK_MM;
        // 見出し行の分を1行引く
        let rows_per_page = ((usable_height / ROW_HEIGHT_MM).floor() as usize).saturating_sub(1).max(1);

        let width = table.width();
        let mut column_widths_mm = Vec::with_capacity(width);
        if width > 0 {
            column_widths_mm.push(INDEX_COLUMN_MM);
        }
        if width > 1 {
            let weights: Vec<f32> = (1..width)
                .map(|col| {
                    let longest = std::iter::once(&table.headers[col])
                        .chain(table.rows.iter().filter_map(|r| r.get(col)))
                        .map(|s| s.chars().count())
                        .max()
                        .unwrap_or(1);
                    longest.clamp(4, 40) as f32
                })
                .collect();
            let remaining = (usable_width - INDEX_COLUMN_MM).max(0.0);
            let total: f32 = weights.iter().sum();
            for weight in weights {
                column_widths_mm.push((remaining * weight / total).max(MIN_COLUMN_MM));
            }
        }

        Self {
            page_width_mm: PAGE_WIDTH_MM,
            page_height_mm: PAGE_HEIGHT_MM,
            margin_mm: MARGIN_MM,
            row_height_mm: ROW_HEIGHT_MM,
            column_widths_mm,
            rows_per_page,
        }
    }

    /// 明細行が何ページになるか（0件でも1ページ）
    pub fn page_count(&self, rows: usize) -> usize {
        rows.div_ceil(self.rows_per_page).max(1)
    }

    /// 列の左端X座標（mm）
    pub fn column_x_mm(&self, col: usize) -> f32 {
        self.margin_mm + self.column_widths_mm.iter().take(col).sum::<f32>()
    }
}
