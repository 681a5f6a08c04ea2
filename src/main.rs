use anyhow::Context;
use clap::Parser;
use fleet_report::cli::{Cli, Commands, FilterArgs};
use fleet_report::config::Config;
use fleet_report::credentials::SessionStore;
use fleet_report::datasource::HttpDataSource;
use fleet_report::report::{resolve_category, validate_columns, GenerationOutcome, ReportService};
use fleet_report::{display, export, logging, picker};
use fleet_report_common::status::today;
use fleet_report_common::{ExportFormat, ReportSession, PAGE_SIZE_OPTIONS};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

fn service(config: &Config) -> anyhow::Result<ReportService> {
    let source = HttpDataSource::from_config(config)?;
    let credentials = SessionStore::default_location()?;
    Ok(ReportService::new(source, credentials))
}

fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

#[allow(clippy::too_many_arguments)]
async fn generate(
    config: &Config,
    category_id: &str,
    filters: &FilterArgs,
    columns: Option<Vec<String>>,
    pick_columns: bool,
    search: Option<String>,
    page: usize,
    per_page: Option<usize>,
    export_formats: Option<Vec<ExportFormat>>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let category = resolve_category(category_id)?;
    let mut session = ReportSession::new(Some(category.id));

    match per_page {
        Some(size) => session.set_page_size(size)?,
        None => {
            if session.set_page_size(config.default_page_size).is_err() {
                tracing::warn!(
                    size = config.default_page_size,
                    "default_page_size must be one of {:?}; using {}",
                    PAGE_SIZE_OPTIONS,
                    session.page_size()
                );
            }
        }
    }

    for flag in filters.apply(session.filters_mut())? {
        println!("⚠ --{} は {} では使われません", flag, category.display_name);
    }

    if let Some(keys) = columns {
        let keys = validate_columns(category, &keys)?;
        session.columns_mut().replace(keys);
    }
    if pick_columns {
        if !picker::pick_columns(session.columns_mut(), category)? {
            println!("列の選択をキャンセルしました");
        }
    }

    let service = service(config)?;
    let bar = spinner(&format!("{} を取得中...", category.display_name));
    let result = service.generate(&mut session, today()).await;
    bar.finish_and_clear();

    match result? {
        GenerationOutcome::Loaded { rows } => println!("✔ {}件を取得\n", rows),
        GenerationOutcome::Empty => println!("✔ 0件\n"),
        GenerationOutcome::Stale => return Ok(()),
    }

    if let Some(query) = search {
        session.set_search(query);
    }
    session.go_to_page(page);
    println!("{}", display::render_report(&session));

    if let Some(formats) = export_formats {
        let table = session.export_table();
        if table.is_empty() {
            println!("⚠ 出力対象の行がありません（見出しのみ出力します）");
        }
        let output_dir = output
            .or_else(|| config.export_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."));
        println!();
        export::export_report(&formats, &table, &output_dir, today())?;
        println!("\n✅ エクスポート完了");
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let config = Config::load().context("設定ファイルを読み込めません")?;

    match cli.command {
        Commands::Categories => {
            println!("{}", display::categories_table());
        }

        Commands::Fields { category } => {
            let category = resolve_category(&category)?;
            println!("{}\n{}", category.display_name, display::fields_table(category));
            println!("* = 既定で表示される列");
        }

        Commands::Filters { category } => {
            let category = resolve_category(&category)?;
            let service = service(&config)?;
            let bar = spinner("選択肢を取得中...");
            let options = service.load_filter_options(category).await;
            bar.finish_and_clear();
            println!("{}\n{}", category.display_name, display::filters_table(category, &options));
        }

        Commands::Generate {
            category,
            filters,
            columns,
            pick_columns,
            search,
            page,
            per_page,
            export,
            output,
        } => {
            generate(
                &config,
                &category,
                &filters,
                columns,
                pick_columns,
                search,
                page,
                per_page,
                export.map(|target| target.formats()),
                output,
            )
            .await?;
        }

        Commands::Login { token } => {
            if token.trim().is_empty() {
                anyhow::bail!("トークンが空です");
            }
            let store = SessionStore::default_location()?;
            store.login(&token)?;
            println!("✔ ログインしました（{}）", store.path().display());
        }

        Commands::Logout => {
            let store = SessionStore::default_location()?;
            if store.logout()? {
                println!("✔ ログアウトしました");
            } else {
                println!("ログインしていません");
            }
        }

        Commands::Config { set_base_url, show } => {
            let mut config = config;

            if let Some(url) = set_base_url {
                config.set_base_url(url)?;
                println!("✔ ベースURLを設定しました");
            }

            if show {
                let store = SessionStore::default_location()?;
                println!("設定:");
                println!("  ベースURL: {}", config.api_url());
                println!(
                    "  タイムアウト: {}",
                    config
                        .timeout_seconds
                        .map(|s| format!("{}秒", s))
                        .unwrap_or_else(|| "既定".to_string())
                );
                println!("  1ページの件数: {}", config.default_page_size);
                println!(
                    "  出力先: {}",
                    config
                        .export_dir
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| ".".to_string())
                );
                println!(
                    "  トークン: {}",
                    if store.token().is_some() { "保存済み" } else { "未ログイン" }
                );
            }
        }
    }

    Ok(())
}
