//! 印刷用HTML生成
//!
//! ブラウザで開くと印刷ダイアログを出す単体HTML。

use super::ExportTable;

const STYLE: &str = "\
body { font-family: Arial, sans-serif; margin: 24px; color: #222; }
h1 { font-size: 18px; margin: 0 0 4px; }
p.meta { font-size: 11px; color: #666; margin: 0 0 12px; }
table { border-collapse: collapse; width: 100%; font-size: 11px; }
th, td { border: 1px solid #ccc; padding: 4px 6px; text-align: left; }
th { background: #f5f5f5; }
tr:nth-child(even) td { background: #fafafa; }
@media print { body { margin: 0; } }
";

pub fn generate_print_html(table: &ExportTable, generated_on: &str) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape_html(&table.title)));
    html.push_str(&format!("<style>\n{}</style>\n", STYLE));
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!("<h1>{}</h1>\n", escape_html(&table.title)));
    html.push_str(&format!(
        "<p class=\"meta\">Generated {} &middot; {} records</p>\n",
        escape_html(generated_on),
        table.len()
    ));

    html.push_str("<table>\n<thead>\n<tr>");
    for header in &table.headers {
        html.push_str(&format!("<th>{}</th>", escape_html(header)));
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");
    for row in &table.rows {
        html.push_str("<tr>");
        for cell in row {
            html.push_str(&format!("<td>{}</td>", escape_html(cell)));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n");
    html.push_str("<script>window.onload = function () { window.print(); };</script>\n");
    html.push_str("</body>\n</html>\n");
    html
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ExportTable {
        ExportTable {
            title: "Drivers Report".to_string(),
            headers: vec!["No".to_string(), "Name".to_string()],
            rows: vec![
                vec!["1".to_string(), "Jane <JJ>".to_string()],
                vec!["2".to_string(), "-".to_string()],
            ],
        }
    }

    #[test]
    fn test_contains_rows_and_print_call() {
        let html = generate_print_html(&sample(), "2024-06-01");
        assert!(html.contains("<th>No</th><th>Name</th>"));
        assert_eq!(html.matches("<tr>").count(), 3);
        assert!(html.contains("window.print()"));
        assert!(html.contains("2 records"));
    }

    #[test]
    fn test_escapes_markup() {
        let html = generate_print_html(&sample(), "2024-06-01");
        assert!(html.contains("Jane &lt;JJ&gt;"));
        assert!(!html.contains("<JJ>"));
    }
}
