//! 出力の統合テスト（Excel/CSV/PDF/印刷用HTML）

use calamine::{open_workbook, Reader, Xlsx};
use chrono::NaiveDate;
use fleet_report::export::{self, excel, pdf};
use fleet_report_common::{get_category, project, ExportFormat, RawRecord, ReportSession};
use serde_json::json;
use tempfile::tempdir;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

/// 保険カテゴリで件数ぶん読み込んだセッション
fn insurance_session(count: usize) -> ReportSession {
    let mut session = ReportSession::new(Some("insurance"));
    let category = get_category("insurance").unwrap();
    let rows = (1..=count)
        .map(|i| {
            let record = RawRecord(json!({
                "id": i,
                "vehicle_number": format!("GT-{:04}-24", i),
                "company_name": "Acme Haulage",
                "insurance_company": "Star \"Assurance\"",
                "policy_number": format!("POL-{}", i),
                "expiry_date": "2024-06-15",
            }));
            project(category, &record, today())
        })
        .collect();
    let ticket = session.begin_generation();
    assert!(session.complete_generation(ticket, rows));
    session
}

#[test]
fn test_excel_generation() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output_path = dir.path().join("report.xlsx");
    let table = insurance_session(5).export_table();

    let result = excel::generate_excel(&table, &output_path);
    assert!(result.is_ok(), "Excel生成に失敗: {:?}", result.err());

    let mut workbook: Xlsx<_> = open_workbook(&output_path).expect("xlsxを開けない");
    let range = workbook.worksheet_range("Report").expect("シートがない");
    assert_eq!(range.height(), 6, "見出し1行 + 明細5行");

    let header: Vec<String> = range.rows().next().unwrap().iter().map(|c| c.to_string()).collect();
    assert_eq!(
        header,
        vec![
            "No",
            "Vehicle Number",
            "Company",
            "Insurance Company",
            "Policy Number",
            "Expiry Date",
            "Status"
        ]
    );

    let last: Vec<String> = range.rows().last().unwrap().iter().map(|c| c.to_string()).collect();
    assert_eq!(last[1], "GT-0005-24");
    assert_eq!(last[6], "Expiring Soon");
}

#[test]
fn test_pdf_generation() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output_path = dir.path().join("report.pdf");
    let table = insurance_session(80).export_table();

    let result = pdf::generate_pdf(&table, &output_path, "2024-06-01");
    assert!(result.is_ok(), "PDF生成に失敗: {:?}", result.err());

    let bytes = std::fs::read(&output_path).expect("PDF読み込み失敗");
    assert!(bytes.starts_with(b"%PDF"), "PDFヘッダがない");
}

#[test]
fn test_pdf_generation_empty_table() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output_path = dir.path().join("empty.pdf");
    let table = insurance_session(0).export_table();

    // 0件でも見出しだけのPDFを出す
    let result = pdf::generate_pdf(&table, &output_path, "2024-06-01");
    assert!(result.is_ok(), "空のPDF生成に失敗: {:?}", result.err());
    assert!(output_path.exists());
}

#[test]
fn test_export_all_formats() {
    let dir = tempdir().expect("Failed to create temp dir");
    let out = dir.path().join("nested");
    let table = insurance_session(3).export_table();

    let paths = export::export_report(&ExportFormat::ALL, &table, &out, today())
        .expect("一括出力に失敗");

    let names: Vec<String> = paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "report-2024-06-01.xlsx",
            "report-2024-06-01.csv",
            "report-2024-06-01.pdf",
            "report-2024-06-01.html"
        ]
    );
    for path in &paths {
        assert!(path.exists(), "{} がない", path.display());
    }

    let csv = std::fs::read_to_string(out.join("report-2024-06-01.csv")).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("\"No\",\"Vehicle Number\",\"Company\",\"Insurance Company\",\"Policy Number\",\"Expiry Date\",\"Status\"")
    );
    assert_eq!(
        lines.next(),
        Some("\"1\",\"GT-0001-24\",\"Acme Haulage\",\"Star \"\"Assurance\"\"\",\"POL-1\",\"2024-06-15\",\"Expiring Soon\"")
    );
    assert_eq!(lines.count(), 2);

    let html = std::fs::read_to_string(out.join("report-2024-06-01.html")).unwrap();
    assert!(html.contains("window.print()"));
    assert!(html.contains("Insurance Report"));
}

#[test]
fn test_export_uses_search_not_page() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut session = insurance_session(30);
    session.set_page_size(10).unwrap();
    session.go_to_page(3);
    session.set_search("gt-001");

    let table = session.export_table();
    // GT-0010 〜 GT-0019
    assert_eq!(table.len(), 10);
    assert_eq!(table.rows[0][0], "1");

    let path = export::export_one(ExportFormat::Csv, &table, dir.path(), today()).unwrap();
    let csv = std::fs::read_to_string(path).unwrap();
    assert_eq!(csv.lines().count(), 11);
}

#[test]
fn test_selected_columns_drive_export() {
    let mut session = insurance_session(2);
    session.columns_mut().replace(vec!["status".to_string(), "premium".to_string()]);

    let table = session.export_table();
    assert_eq!(table.headers, vec!["No", "Status", "Premium"]);
    // premium は記録にないのでプレースホルダ
    assert_eq!(table.rows[1], vec!["2", "Expiring Soon", "-"]);
}

#[test]
fn test_pdf_with_non_latin_text() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output_path = dir.path().join("non-latin.pdf");
    let mut table = insurance_session(2).export_table();
    table.rows[0][2] = "東京運輸株式会社".to_string();
    table.rows[1][3] = "Société Générale".to_string();

    let result = pdf::generate_pdf(&table, &output_path, "2024-06-01");
    assert!(result.is_ok(), "PDF生成に失敗: {:?}", result.err());

    // PDFでは置き換わるがCSVでは元の文字のまま
    let csv_path = export::export_one(ExportFormat::Csv, &table, dir.path(), today()).unwrap();
    let csv = std::fs::read_to_string(csv_path).unwrap();
    assert!(csv.contains("東京運輸株式会社"));
}
