use crate::error::{FleetReportError, Result};
use fleet_report_common::export::pdf_core::{
    fit_text, win_ansi_text, PdfTableLayout, FONT_SIZE_PT, HEADER_BLOCK_MM, TITLE_SIZE_PT,
};
use fleet_report_common::ExportTable;
use printpdf::*;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// セル内の左余白（mm）
const CELL_PADDING_MM: f32 = 1.0;

fn pdf_err(context: &str, e: impl std::fmt::Debug) -> FleetReportError {
    FleetReportError::PdfGeneration(format!("{}: {:?}", context, e))
}

struct PdfWriter {
    doc: PdfDocumentReference,
    font: IndirectFontRef,
    font_bold: IndirectFontRef,
    layout: PdfTableLayout,
    current_page: PdfPageIndex,
    current_layer: PdfLayerIndex,
    /// 上端からの距離（mm）
    y: f32,
}

impl PdfWriter {
    fn new(title: &str, layout: PdfTableLayout) -> Result<Self> {
        let (doc, page, layer) = PdfDocument::new(
            title,
            Mm(layout.page_width_mm),
            Mm(layout.page_height_mm),
            "Layer 1",
        );
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| pdf_err("フォント追加エラー", e))?;
        let font_bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| pdf_err("フォント追加エラー", e))?;
        let y = layout.margin_mm;
        Ok(Self {
            doc,
            font,
            font_bold,
            layout,
            current_page: page,
            current_layer: layer,
            y,
        })
    }

    fn pdf_y(&self) -> f32 {
        self.layout.page_height_mm - self.y
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(
            Mm(self.layout.page_width_mm),
            Mm(self.layout.page_height_mm),
            "Layer 1",
        );
        self.current_page = page;
        self.current_layer = layer;
        self.y = self.layout.margin_mm;
    }

    fn text(&self, s: &str, x: f32, size: f32, bold: bool) {
        let font = if bold { &self.font_bold } else { &self.font };
        let layer = self
            .doc
            .get_page(self.current_page)
            .get_layer(self.current_layer);
        layer.use_text(win_ansi_text(s), size, Mm(x), Mm(self.pdf_y()), font);
    }

    fn hline(&self) {
        let layer = self
            .doc
            .get_page(self.current_page)
            .get_layer(self.current_layer);
        layer.set_outline_thickness(0.4);
        let x1 = self.layout.margin_mm;
        let x2 = self.layout.page_width_mm - self.layout.margin_mm;
        let line = Line {
            points: vec![
                (Point::new(Mm(x1), Mm(self.pdf_y())), false),
                (Point::new(Mm(x2), Mm(self.pdf_y())), false),
            ],
            is_closed: false,
        };
        layer.add_line(line);
    }

    /// タイトル・生成日・ページ番号
    fn page_header(&mut self, title: &str, generated_on: &str, page: usize, pages: usize) {
        let top = self.y;
        self.y += 6.0;
        self.text(title, self.layout.margin_mm, TITLE_SIZE_PT, true);
        self.y += 6.0;
        let meta = format!("Generated {}  |  Page {} of {}", generated_on, page, pages);
        self.text(&meta, self.layout.margin_mm, FONT_SIZE_PT, false);
        self.y = top + HEADER_BLOCK_MM;
    }

    fn row(&mut self, cells: &[String], bold: bool) {
        self.y += self.layout.row_height_mm;
        for (col, cell) in cells.iter().enumerate() {
            let Some(width) = self.layout.column_widths_mm.get(col) else {
                break;
            };
            let fitted = fit_text(cell, width - CELL_PADDING_MM * 2.0, FONT_SIZE_PT);
            let x = self.layout.column_x_mm(col) + CELL_PADDING_MM;
            self.text(&fitted, x, FONT_SIZE_PT, bold);
        }
    }

    fn save(self, output_path: &Path) -> Result<()> {
        let file = File::create(output_path)?;
        self.doc
            .save(&mut BufWriter::new(file))
            .map_err(|e| pdf_err("PDF保存エラー", e))
    }
}

/// 表をA4横のPDFに出力（見出し行は各ページに繰り返す）
pub fn generate_pdf(table: &ExportTable, output_path: &Path, generated_on: &str) -> Result<()> {
    let layout = PdfTableLayout::for_table(table);
    let rows_per_page = layout.rows_per_page;
    let pages = layout.page_count(table.len());
    let mut pdf = PdfWriter::new(&table.title, layout)?;

    for page in 0..pages {
        if page > 0 {
            pdf.new_page();
        }
        pdf.page_header(&table.title, generated_on, page + 1, pages);
        pdf.row(&table.headers, true);
        pdf.y += 1.5;
        pdf.hline();

        let start = page * rows_per_page;
        let end = (start + rows_per_page).min(table.len());
        for cells in &table.rows[start..end] {
            pdf.row(cells, false);
        }
    }

    tracing::debug!(pages, rows = table.len(), path = %output_path.display(), "pdf written");
    pdf.save(output_path)
}
