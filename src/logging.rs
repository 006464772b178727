use tracing_subscriber::EnvFilter;

/// 默认日志过滤规则，设置了 RUST_LOG 时以其为准
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "docsmith=debug" } else { "docsmith=info" }
}

/// 初始化日志输出，重复调用时忽略
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
