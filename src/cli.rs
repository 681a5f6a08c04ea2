use clap::{Parser, Subcommand};
use fleet_report_common::{ExportFormat, FilterSlot, FilterState};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fleet-report")]
#[command(about = "車両管理レポート生成ツール（抽出・列選択・出力）", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// レポートカテゴリ一覧
    Categories,

    /// カテゴリで選べる列の一覧
    Fields {
        /// カテゴリID（例: driver）
        #[arg(required = true)]
        category: String,
    },

    /// カテゴリのフィルタと選択肢
    Filters {
        /// カテゴリID
        #[arg(required = true)]
        category: String,
    },

    /// レポートを生成して表示・出力
    Generate {
        /// カテゴリID
        #[arg(required = true)]
        category: String,

        #[command(flatten)]
        filters: FilterArgs,

        /// 表示する列（カンマ区切りのキー）
        #[arg(long, value_delimiter = ',')]
        columns: Option<Vec<String>>,

        /// 列を対話的に選ぶ
        #[arg(long)]
        pick_columns: bool,

        /// 検索語
        #[arg(short, long)]
        search: Option<String>,

        /// 表示ページ（1始まり）
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// 1ページの件数 (10/25/50/100)
        #[arg(long)]
        per_page: Option<usize>,

        /// 出力形式 (excel/csv/pdf/print/all)
        #[arg(short, long)]
        export: Option<ExportTarget>,

        /// 出力先ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// トークンを保存してログイン
    Login {
        /// Bearerトークン
        #[arg(long, required = true)]
        token: String,
    },

    /// 保存済みトークンを削除
    Logout,

    /// 設定を表示/編集
    Config {
        /// APIのベースURLを設定
        #[arg(long)]
        set_base_url: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

/// フィルタ指定
///
/// `--company` などの共通欄はカテゴリごとの項目に振り分けられる
/// （例: ドライバーでは `--year` が氏名検索になる）。
/// 項目名で直接指定するときは `--filter name=value`。
#[derive(clap::Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// 会社
    #[arg(long)]
    pub company: Option<String>,

    /// 子会社
    #[arg(long)]
    pub subsidiary: Option<String>,

    /// 年式（カテゴリによって氏名・ユニット名・登録番号）
    #[arg(long)]
    pub year: Option<String>,

    /// 状態（事故カテゴリではアラート種別）
    #[arg(long)]
    pub status: Option<String>,

    /// アラート状態
    #[arg(long)]
    pub alert_status: Option<String>,

    /// 登録番号（カテゴリによって車両番号・免許番号）
    #[arg(long)]
    pub registration: Option<String>,

    /// 項目名で指定（繰り返し可）: name=value
    #[arg(short, long = "filter", value_parser = parse_key_value)]
    pub filter: Vec<(String, String)>,
}

impl FilterArgs {
    /// フィルタ状態へ反映。このカテゴリで使われない共通欄の名前を返す
    pub fn apply(&self, state: &mut FilterState) -> crate::error::Result<Vec<&'static str>> {
        let slots = [
            ("company", FilterSlot::Company, &self.company),
            ("subsidiary", FilterSlot::Subsidiary, &self.subsidiary),
            ("year", FilterSlot::Year, &self.year),
            ("status", FilterSlot::Status, &self.status),
            ("alert-status", FilterSlot::AlertStatus, &self.alert_status),
            ("registration", FilterSlot::Registration, &self.registration),
        ];

        let mut ignored = Vec::new();
        for (flag, slot, value) in slots {
            if let Some(value) = value {
                if !state.set_slot(slot, value.clone()) {
                    ignored.push(flag);
                }
            }
        }
        for (name, value) in &self.filter {
            state.set(name, value.clone())?;
        }
        Ok(ignored)
    }
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("name=value の形式で指定してください: {}", s)),
    }
}

/// 出力形式の指定（all は全形式）
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportTarget {
    Excel,
    Csv,
    Pdf,
    Print,
    All,
}

impl ExportTarget {
    pub fn formats(&self) -> Vec<ExportFormat> {
        match self {
            ExportTarget::Excel => vec![ExportFormat::Excel],
            ExportTarget::Csv => vec![ExportFormat::Csv],
            ExportTarget::Pdf => vec![ExportFormat::Pdf],
            ExportTarget::Print => vec![ExportFormat::Print],
            ExportTarget::All => ExportFormat::ALL.to_vec(),
        }
    }
}

impl std::str::FromStr for ExportTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(ExportTarget::All),
            other => match other.parse::<ExportFormat>()? {
                ExportFormat::Excel => Ok(ExportTarget::Excel),
                ExportFormat::Csv => Ok(ExportTarget::Csv),
                ExportFormat::Pdf => Ok(ExportTarget::Pdf),
                ExportFormat::Print => Ok(ExportTarget::Print),
            },
        }
    }
}
