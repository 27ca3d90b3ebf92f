use anyhow::Result;

use plot_gerbers::config::Config;
use plot_gerbers::orchestrator::App;
use plot_gerbers::utils::logging;

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置（环境变量优先于位置参数）
    let config = Config::from_env()?;

    // 初始化日志（VERBOSE_LOGGING=true 时默认 debug 级别）
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    App::initialize(config).await?.run().await?;

    Ok(())
}
