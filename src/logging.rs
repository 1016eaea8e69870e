//! tracing の初期化

use tracing_subscriber::EnvFilter;

/// RUST_LOG がないときのフィルタ
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "blueprint=debug,blueprint_mint=debug"
    } else {
        "blueprint_mint=warn"
    }
}

/// stderr へ出力するサブスクライバを登録（RUST_LOG を優先）
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
