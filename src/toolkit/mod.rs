//! 外部 CAD 工具链 - 基础设施层
//!
//! 电路板解析、几何绘制、Gerber / Excellon 编码全部属于外部工具链，
//! 本层只定义调用契约并持有工具链资源，不认识层计划、不处理业务流程。

pub mod board;
pub mod kicad_cli;

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{DrillOptions, Layer, PlotOptions};

/// 工具链能力表
///
/// 启动时探测一次（版本门控），替代运行中反复的动态属性探测。
/// 能力缺失不是错误：线宽设置缺失时静默跳过，钻孔原点访问缺失时
/// 回退到 (0,0) 并关闭辅助原点选项。
#[derive(Debug, Clone, Copy)]
pub struct ToolkitCapabilities {
    /// 工具链是否支持设置绘制线宽
    pub supports_line_width: bool,
    /// 工具链是否暴露钻孔坐标原点（辅助原点）访问
    pub supports_drill_origin: bool,
}

/// 单层 Gerber 绘制任务
#[derive(Debug, Clone)]
pub struct GerberJob {
    /// 实际参与绘制的电路板文件（已完成文本替换的工作副本）
    pub board_file: PathBuf,
    /// 输出目录
    pub output_dir: PathBuf,
    /// 工程名，决定输出文件名前缀
    pub project_name: String,
    /// 要绘制的层
    pub layer: Layer,
    /// 绘制参数
    pub options: PlotOptions,
    /// 启动时探测到的工具链能力
    pub capabilities: ToolkitCapabilities,
}

/// 钻孔文件 + 地图文件生成任务（一次调用产出全部钻孔产物）
#[derive(Debug, Clone)]
pub struct DrillJob {
    pub board_file: PathBuf,
    pub output_dir: PathBuf,
    pub project_name: String,
    pub options: DrillOptions,
}

/// 钻孔生成产物的约定路径
///
/// PTH / NPTH 路径按命名约定记录，不核对文件是否真实生成。
#[derive(Debug, Clone)]
pub struct DrillArtifacts {
    pub pth: PathBuf,
    pub npth: PathBuf,
    pub map: PathBuf,
}

impl DrillArtifacts {
    /// 按命名约定推算钻孔产物路径
    pub fn by_convention(output_dir: &std::path::Path, project_name: &str) -> Self {
        Self {
            pth: output_dir.join(format!("{}-PTH.drl", project_name)),
            npth: output_dir.join(format!("{}-NPTH.drl", project_name)),
            map: output_dir.join(format!("{}-drl_map.pdf", project_name)),
        }
    }
}

/// CAD 工具链调用契约
///
/// 实现者负责：按层生成 Gerber 文件、一次性生成钻孔 + 地图文件、
/// 在启动时报告自身能力。任何失败原样向上传播，本层不做重试。
#[async_trait]
pub trait PcbToolkit: Send + Sync {
    /// 探测工具链能力（启动时调用一次）
    async fn probe(&self) -> AppResult<ToolkitCapabilities>;

    /// 绘制一层 Gerber，返回产物路径
    async fn plot_gerber(&self, job: &GerberJob) -> AppResult<PathBuf>;

    /// 生成钻孔文件和地图文件
    async fn write_drill_files(&self, job: &DrillJob) -> AppResult<DrillArtifacts>;
}

/// 绘制后的等待原语
///
/// 外部工具链在绘制调用返回后仍可能异步收尾输出文件，这里留一个固定的
/// 安全余量。工具链修掉该行为后，删掉这个函数即可，不影响编排逻辑。
pub async fn settle(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
