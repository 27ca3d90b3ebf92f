//! 编排层 - 应用主结构
//!
//! 管理工具链资源和电路板句柄，驱动一次完整的出图流程。

use anyhow::Result;

use crate::config::{Config, JobPaths};
use crate::toolkit::board::BoardFile;
use crate::toolkit::kicad_cli::KicadCliToolkit;
use crate::toolkit::{PcbToolkit, ToolkitCapabilities};
use crate::utils::logging;
use crate::workflow::{FabricationReport, PlotFlow};

/// 应用主结构
pub struct App {
    config: Config,
    paths: JobPaths,
    toolkit: KicadCliToolkit,
    capabilities: ToolkitCapabilities,
    board: BoardFile,
}

impl App {
    /// 初始化应用
    ///
    /// 派生路径、探测工具链能力、加载电路板。加载失败是致命的，
    /// 不会产生任何输出。
    pub async fn initialize(config: Config) -> Result<Self> {
        let paths = JobPaths::derive(&config.board_path)?;

        logging::log_startup(&config, &paths);

        // 能力探测只在启动时做一次
        let toolkit = KicadCliToolkit::new(config.kicad_cli.clone());
        let capabilities = toolkit.probe().await?;

        let board = BoardFile::load(&config.board_path).await?;

        Ok(Self {
            config,
            paths,
            toolkit,
            capabilities,
            board,
        })
    }

    /// 运行出图流程
    pub async fn run(mut self) -> Result<FabricationReport> {
        let flow = PlotFlow::new(
            &self.toolkit,
            self.capabilities,
            &self.config,
            &self.paths,
        );

        let report = flow.run(&mut self.board).await?;

        logging::print_final_stats(&report, &self.paths);

        Ok(report)
    }
}
