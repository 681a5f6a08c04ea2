//! 表示・出力する列の選択
//!
//! 確定済みの選択（テーブルが使う）と、列選択ダイアログ内の下書きを分けて持つ。
//! 下書きは開いた時点の確定値から作り、保存で確定、キャンセルで破棄する。

use crate::category::ReportCategory;

/// 1キーをトグル（あれば外し、なければ末尾に追加）
pub fn toggle(selection: &[String], key: &str) -> Vec<String> {
    if selection.iter().any(|k| k == key) {
        selection.iter().filter(|k| *k != key).cloned().collect()
    } else {
        let mut next = selection.to_vec();
        next.push(key.to_string());
        next
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSelection {
    selected: Vec<String>,
    draft: Option<Vec<String>>,
}

impl ColumnSelection {
    pub fn for_category(category: &ReportCategory) -> Self {
        Self {
            selected: category.default_selection(),
            draft: None,
        }
    }

    /// 確定済みの列
    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    /// 編集中の下書き（ダイアログが開いていなければ None）
    pub fn draft(&self) -> Option<&[String]> {
        self.draft.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.draft.is_some()
    }

    /// ダイアログを開く。下書きは常に確定値から作り直す
    pub fn open(&mut self) {
        self.draft = Some(self.selected.clone());
    }

    /// 下書き上でトグル（開いていなければ開いてから）
    pub fn toggle(&mut self, key: &str) {
        let current = self.draft.take().unwrap_or_else(|| self.selected.clone());
        self.draft = Some(toggle(&current, key));
    }

    /// 下書きを確定して閉じる
    pub fn commit(&mut self) {
        if let Some(draft) = self.draft.take() {
            self.selected = draft;
        }
    }

    /// 下書きを破棄して閉じる
    pub fn discard(&mut self) {
        self.draft = None;
    }

    /// 確定値を直接置き換える（CLI の --columns 指定など）
    pub fn replace(&mut self, keys: Vec<String>) {
        self.selected = keys;
        self.draft = None;
    }

    /// カテゴリ既定値に戻す
    pub fn reset(&mut self, category: &ReportCategory) {
        *self = Self::for_category(category);
    }
}
