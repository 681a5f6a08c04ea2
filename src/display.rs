//! 端末表示（comfy-table）

use comfy_table::{Cell, Table};
use fleet_report_common::{
    list_categories, renderable_filters, FilterKind, FilterOptions, ReportCategory, ReportSession,
    RowSet,
};

pub const NO_DATA: &str = "No Data Available";

/// カテゴリ一覧
pub fn categories_table() -> Table {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Description"]);
    for category in list_categories() {
        table.add_row(vec![
            Cell::new(category.id),
            Cell::new(category.display_name),
            Cell::new(category.description),
        ]);
    }
    table
}

/// 列一覧（既定列に印）
pub fn fields_table(category: &ReportCategory) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Key", "Label", "Default"]);
    for field in category.available_fields {
        table.add_row(vec![
            Cell::new(field.key),
            Cell::new(field.label),
            Cell::new(if category.is_default(field.key) { "*" } else { "" }),
        ]);
    }
    table
}

/// フィルタ一覧（選択肢つき）
pub fn filters_table(category: &ReportCategory, options: &FilterOptions) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Name", "Label", "Kind", "Options"]);
    for filter in renderable_filters(category) {
        let kind = match filter.kind {
            FilterKind::Text => "text",
            FilterKind::Select => "select",
        };
        let choices = match filter.options {
            Some(source) => {
                let values = options.options_for(source);
                if values.is_empty() {
                    "(none)".to_string()
                } else {
                    values.join(", ")
                }
            }
            None => String::new(),
        };
        table.add_row(vec![
            Cell::new(filter.name),
            Cell::new(filter.label),
            Cell::new(kind),
            Cell::new(choices),
        ]);
    }
    table
}

/// 表示中のページを表にする。行がなければ None
pub fn page_table(session: &ReportSession) -> Option<Table> {
    let rows = session.visible_rows();
    if rows.is_empty() {
        return None;
    }

    let category = session.category();
    let selected = session.columns().selected();
    let info = session.page_info();
    let offset = (info.page - 1) * session.page_size();

    let mut table = Table::new();
    table.set_header(
        std::iter::once("No")
            .chain(selected.iter().map(|key| category.label_for(key)))
            .collect::<Vec<_>>(),
    );
    for (index, row) in rows.iter().enumerate() {
        let mut cells = vec![Cell::new(offset + index + 1)];
        cells.extend(selected.iter().map(|key| Cell::new(row.get(key))));
        table.add_row(cells);
    }
    Some(table)
}

/// ページ表示 + ページ位置の文言
pub fn render_report(session: &ReportSession) -> String {
    if matches!(session.rows(), RowSet::NotGenerated) {
        return "レポートは未生成です".to_string();
    }
    match page_table(session) {
        Some(table) => {
            let info = session.page_info();
            format!(
                "{}\n{}\nPage {} of {} ({} records)",
                session.category().display_name,
                table,
                info.page,
                info.page_count.max(1),
                info.total
            )
        }
        None => NO_DATA.to_string(),
    }
}
