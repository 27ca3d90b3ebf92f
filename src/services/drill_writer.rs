//! 钻孔文件服务 - 业务能力层
//!
//! 配置并触发一次钻孔文件 + 地图文件生成。生产厂商需要钻孔文件，
//! 地图文件则常被要求用于人工核对。

use std::path::Path;

use anyhow::Result;
use tracing::{info, warn};

use crate::config::JobPaths;
use crate::models::{DrillOptions, PlotOptions};
use crate::toolkit::board::BoardFile;
use crate::toolkit::{DrillArtifacts, DrillJob, PcbToolkit, ToolkitCapabilities};

/// 钻孔文件服务
pub struct DrillWriter<'a, T: PcbToolkit> {
    toolkit: &'a T,
    capabilities: ToolkitCapabilities,
}

impl<'a, T: PcbToolkit> DrillWriter<'a, T> {
    pub fn new(toolkit: &'a T, capabilities: ToolkitCapabilities) -> Self {
        Self {
            toolkit,
            capabilities,
        }
    }

    /// 决定钻孔坐标偏移
    ///
    /// 选项启用了辅助原点且工具链暴露该访问时取板上辅助原点，
    /// 否则回退 (0,0)；访问缺失时同时关闭选项，后续配置不再使用它。
    pub fn resolve_offset(&self, board: &BoardFile, popt: &mut PlotOptions) -> (f64, f64) {
        if !popt.use_aux_origin {
            return (0.0, 0.0);
        }
        if !self.capabilities.supports_drill_origin {
            warn!("工具链不支持钻孔原点访问，回退到 (0,0) 并关闭辅助原点选项");
            popt.use_aux_origin = false;
            return (0.0, 0.0);
        }
        board.aux_origin().unwrap_or((0.0, 0.0))
    }

    /// 生成钻孔文件和地图文件
    ///
    /// 返回的 PTH / NPTH 路径按命名约定推算，不核对文件是否真实生成。
    pub async fn write(
        &self,
        board: &BoardFile,
        popt: &mut PlotOptions,
        staged_board: &Path,
        paths: &JobPaths,
    ) -> Result<DrillArtifacts> {
        let offset = self.resolve_offset(board, popt);
        let options = DrillOptions::fabrication_defaults(offset, popt.use_aux_origin);

        info!(
            "生成钻孔文件 (偏移: {:?}, 单位: {})",
            options.offset,
            if options.metric { "mm" } else { "inch" }
        );

        let job = DrillJob {
            board_file: staged_board.to_path_buf(),
            output_dir: paths.output_dir.clone(),
            project_name: paths.project_name.clone(),
            options,
        };

        let artifacts = self.toolkit.write_drill_files(&job).await?;

        info!("✓ Plotted {}", artifacts.pth.display());
        info!("✓ Plotted {}", artifacts.npth.display());

        Ok(artifacts)
    }
}
