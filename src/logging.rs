use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// ログ初期化
///
/// 標準出力はレポート表示に使うので、ログは標準エラーへ。
/// `RUST_LOG` があればそれを優先し、なければ `--verbose` で debug にする。
pub fn init(verbose: bool) {
    let default_level = if verbose {
        "fleet_report=debug,fleet_report_common=debug,info"
    } else {
        "warn,fleet_report=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // 二重初期化（テストなど）は無視
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose),
        )
        .try_init();
}
