//! 対話式の列選択
//!
//! 確定済みの選択から下書きを作り、Enterで確定・Escで破棄する。

use crate::error::{FleetReportError, Result};
use dialoguer::MultiSelect;
use fleet_report_common::{ColumnSelection, ReportCategory};

/// 選択結果を下書きに反映して確定（None なら破棄）
///
/// 外れた列は取り除き、新しく付いた列は末尾に足す。既存列の並びは保つ。
pub fn apply_picked(
    selection: &mut ColumnSelection,
    category: &ReportCategory,
    picked: Option<Vec<usize>>,
) {
    if !selection.is_open() {
        selection.open();
    }
    let Some(indices) = picked else {
        selection.discard();
        return;
    };

    let wanted: Vec<&str> = indices
        .into_iter()
        .filter_map(|i| category.available_fields.get(i).map(|f| f.key))
        .collect();
    let draft: Vec<String> = selection.draft().map(|d| d.to_vec()).unwrap_or_default();

    for key in &draft {
        if !wanted.contains(&key.as_str()) {
            selection.toggle(key);
        }
    }
    for key in wanted {
        if !draft.iter().any(|k| k == key) {
            selection.toggle(key);
        }
    }
    selection.commit();
}

/// 列選択ダイアログ。確定したら true
pub fn pick_columns(selection: &mut ColumnSelection, category: &ReportCategory) -> Result<bool> {
    selection.open();
    let draft = selection.draft().unwrap_or_default();
    let items: Vec<String> = category
        .available_fields
        .iter()
        .map(|f| format!("{} ({})", f.label, f.key))
        .collect();
    let checked: Vec<bool> = category
        .available_fields
        .iter()
        .map(|f| draft.iter().any(|k| k == f.key))
        .collect();

    let picked = MultiSelect::new()
        .with_prompt("表示する列を選択（Space: 切替 / Enter: 確定 / Esc: キャンセル）")
        .items(&items)
        .defaults(&checked)
        .interact_opt()
        .map_err(|e| FleetReportError::Prompt(e.to_string()))?;

    let committed = picked.is_some();
    apply_picked(selection, category, picked);
    tracing::debug!(committed, columns = ?selection.selected(), "column picker closed");
    Ok(committed)
}
