//! 日志工具模块
//!
//! 初始化 tracing 订阅器，并提供启动 / 收尾的日志辅助函数。

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, JobPaths};
use crate::workflow::FabricationReport;

/// 初始化日志
///
/// 默认 info 级别，开启详细日志时为 debug 级别；RUST_LOG 始终优先。
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// 环境里没有 RUST_LOG 时使用的默认过滤级别
pub fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

/// 记录程序启动信息
pub fn log_startup(config: &Config, paths: &JobPaths) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 生产文件输出");
    info!("📄 电路板: {}", config.board_path.display());
    info!("🔖 版本号: {}", config.git_rev);
    info!("📁 输出目录: {}", paths.output_dir.display());
    info!("{}", "=".repeat(60));
}

/// 打印最终统计信息
pub fn print_final_stats(report: &FabricationReport, paths: &JobPaths) {
    info!("\n{}", "=".repeat(60));
    info!("📊 出图完成");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("✅ 共 {} 个文件 (其中 Gerber {} 个)", report.files.len(), report.gerber_count());
    info!("📁 输出目录: {}", paths.output_dir.display());
    info!("{}", "=".repeat(60));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_raises_default_filter_to_debug() {
        assert_eq!(default_directives(false), "info");
        assert_eq!(default_directives(true), "debug");
    }
}
