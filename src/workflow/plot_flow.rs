//! 生产文件流程 - 流程层
//!
//! 定义"一块板"的完整出图流程，顺序固定：
//! 1. 版本号替换 → 2. 标准九层 Gerber → 3. 内层铜层 → 4. 钻孔文件 → 5. 统计报告
//!
//! 流程层不持有任何工具链资源，只依赖业务能力（services）。

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use tracing::info;

use crate::config::{Config, JobPaths};
use crate::error::{AppError, FileError};
use crate::models::{inner_plot_plan, standard_plot_plan, DrillMarks, PlotOptions};
use crate::services::{DrillReporter, DrillWriter, GerberPlotter};
use crate::toolkit::board::BoardFile;
use crate::toolkit::{PcbToolkit, ToolkitCapabilities};

/// 板级文本对象里的版本号标记
pub const GIT_REV_TOKEN: &str = "${GIT_REV}";

/// 本次运行产出的生产文件列表（只增不减，用于向操作员汇报）
#[derive(Debug, Default)]
pub struct FabricationReport {
    pub files: Vec<PathBuf>,
}

impl FabricationReport {
    /// 按扩展名统计 Gerber 文件数（便于汇报）
    pub fn gerber_count(&self) -> usize {
        self.files
            .iter()
            .filter(|f| f.extension().and_then(|e| e.to_str()) == Some("gbr"))
            .count()
    }
}

/// 出图流程
pub struct PlotFlow<'a, T: PcbToolkit> {
    toolkit: &'a T,
    capabilities: ToolkitCapabilities,
    config: &'a Config,
    paths: &'a JobPaths,
}

impl<'a, T: PcbToolkit> PlotFlow<'a, T> {
    pub fn new(
        toolkit: &'a T,
        capabilities: ToolkitCapabilities,
        config: &'a Config,
        paths: &'a JobPaths,
    ) -> Self {
        Self {
            toolkit,
            capabilities,
            config,
            paths,
        }
    }

    /// 跑完整的出图流程
    ///
    /// 任何一步失败（能力探测回退除外）直接向上传播：没有部分成功状态，
    /// 也不清理已经写出的文件。
    pub async fn run(&self, board: &mut BoardFile) -> Result<FabricationReport> {
        // 输出目录在整个运行期间固定
        tokio::fs::create_dir_all(&self.paths.output_dir)
            .await
            .map_err(|e| {
                AppError::File(FileError::CreateDirFailed {
                    path: self.paths.output_dir.clone(),
                    source: Box::new(e),
                })
            })?;

        // 版本号替换：本系统唯一的内容变换
        board.replace_revision_token(GIT_REV_TOKEN, &self.config.git_rev);

        // 绘制后端从工作副本读取（替换只发生在内存里的板内容上）
        let staged = board.stage(&std::env::temp_dir()).await?;

        let mut popt = PlotOptions::fabrication_defaults(
            self.paths.output_dir.clone(),
            self.config.line_width_mm,
        );
        // 进入绘制循环前再关一次镜像；钻孔形状不画在铜层 / 阻焊层图上，
        // 钻孔数据由单独的钻孔文件承载
        popt.mirror = false;
        popt.drill_marks = DrillMarks::None;

        let plotter = GerberPlotter::new(
            self.toolkit,
            self.capabilities,
            popt.clone(),
            &staged,
            &self.paths.project_name,
            Duration::from_millis(self.config.settle_delay_ms),
        );

        let mut report = FabricationReport::default();

        // 标准九层，与板上内容无关
        info!("Plotting Gerber Layers:");
        for layer in standard_plot_plan() {
            report.files.push(plotter.plot_layer(layer).await?);
        }

        // 内层铜层按板上实际铜层数动态发现
        let copper_count = board.copper_layer_count();
        let inner = inner_plot_plan(copper_count);
        if !inner.is_empty() {
            info!("板上共 {} 层铜，绘制 {} 个内层", copper_count, inner.len());
        }
        for layer in inner {
            report.files.push(plotter.plot_layer(layer).await?);
        }

        // 钻孔文件 + 地图文件
        let drill_writer = DrillWriter::new(self.toolkit, self.capabilities);
        let artifacts = drill_writer
            .write(board, &mut popt, &staged, self.paths)
            .await?;
        report.files.push(artifacts.pth.clone());
        report.files.push(artifacts.npth.clone());

        // 钻孔统计报告
        let reporter = DrillReporter::new(&self.paths.output_dir);
        let report_path = reporter
            .generate(board.path(), &[artifacts.pth, artifacts.npth])
            .await?;
        report.files.push(report_path);

        // 工作副本是内部中间文件，用完即删（输出目录不清理）
        let _ = tokio::fs::remove_file(&staged).await;

        Ok(report)
    }
}
