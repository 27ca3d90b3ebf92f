//! Gerber 绘制服务 - 业务能力层
//!
//! 只负责"绘制一层"的能力，不认识绘制计划，不关心流程顺序。

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use tracing::info;

use crate::models::{Layer, PlotOptions};
use crate::toolkit::{settle, GerberJob, PcbToolkit, ToolkitCapabilities};

/// Gerber 绘制服务
pub struct GerberPlotter<'a, T: PcbToolkit> {
    toolkit: &'a T,
    capabilities: ToolkitCapabilities,
    options: PlotOptions,
    board_file: PathBuf,
    project_name: String,
    settle_delay: Duration,
}

impl<'a, T: PcbToolkit> GerberPlotter<'a, T> {
    pub fn new(
        toolkit: &'a T,
        capabilities: ToolkitCapabilities,
        options: PlotOptions,
        board_file: &Path,
        project_name: impl Into<String>,
        settle_delay: Duration,
    ) -> Self {
        Self {
            toolkit,
            capabilities,
            options,
            board_file: board_file.to_path_buf(),
            project_name: project_name.into(),
            settle_delay,
        }
    }

    /// 绘制一层并返回产物路径
    ///
    /// 每次绘制后等待一个固定的安全余量（见 toolkit::settle）。
    pub async fn plot_layer(&self, layer: Layer) -> Result<PathBuf> {
        let job = GerberJob {
            board_file: self.board_file.clone(),
            output_dir: self.options.output_dir.clone(),
            project_name: self.project_name.clone(),
            layer,
            options: self.options.clone(),
            capabilities: self.capabilities,
        };

        let plot_file = self.toolkit.plot_gerber(&job).await?;
        settle(self.settle_delay).await;

        info!("✓ Plotted {} ({})", plot_file.display(), layer.label());
        Ok(plot_file)
    }
}
