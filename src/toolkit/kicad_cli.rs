//! kicad-cli 后端
//!
//! 以子进程方式驱动 KiCad 命令行工具，实现 PcbToolkit 契约。
//! 能力差异在启动时按版本号探测一次，运行中不再做动态探测。

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult, ToolkitError};
use crate::models::MapFormat;
use crate::toolkit::{DrillArtifacts, DrillJob, GerberJob, PcbToolkit, ToolkitCapabilities};

/// 子进程执行错误
#[derive(Debug, Error)]
pub enum CliError {
    /// 找不到工具链可执行文件
    #[error("找不到工具链命令: {0}")]
    CommandNotFound(String),

    /// 工具链以非零状态退出
    #[error("工具链退出码 {code}: {stderr}")]
    ProcessFailed { code: i32, stderr: String },

    /// 执行过程中的 IO 错误
    #[error("执行工具链时发生 IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

/// kicad-cli 工具链
#[derive(Debug, Clone)]
pub struct KicadCliToolkit {
    command: String,
}

impl KicadCliToolkit {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// 执行一次工具链命令并捕获标准输出
    async fn run(&self, args: &[String]) -> Result<String, CliError> {
        debug!("执行工具链: {} {}", self.command, args.join(" "));

        let output = Command::new(&self.command)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    CliError::CommandNotFound(self.command.clone())
                } else {
                    CliError::Io(e)
                }
            })?;

        if !output.status.success() {
            return Err(CliError::ProcessFailed {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// 从工具链版本输出里解析 `major.minor.patch`
fn parse_version(output: &str) -> Option<(u32, u32, u32)> {
    for token in output.split_whitespace() {
        let mut parts = token.split('.');
        if let (Some(maj), Some(min), Some(pat)) = (parts.next(), parts.next(), parts.next()) {
            // 补丁号后面可能还跟着构建后缀（如 8.0.4-rc1），只取数字前缀
            let pat: String = pat.chars().take_while(|c| c.is_ascii_digit()).collect();
            if let (Ok(maj), Ok(min), Ok(pat)) = (maj.parse(), min.parse(), pat.parse()) {
                return Some((maj, min, pat));
            }
        }
    }
    None
}

/// 版本号到能力表的映射
///
/// 线宽设置在 7.0 之后被工具链移除（统一改用板内设置），
/// 钻孔坐标原点选择从 7.0 起才在命令行暴露。
fn capabilities_for_version(version: (u32, u32, u32)) -> ToolkitCapabilities {
    let (major, _, _) = version;
    ToolkitCapabilities {
        supports_line_width: major < 7,
        supports_drill_origin: major >= 7,
    }
}

/// 组装单层 Gerber 导出的命令行参数
fn gerber_args(job: &GerberJob) -> Vec<String> {
    let popt = &job.options;
    let mut args = vec![
        "pcb".to_string(),
        "export".to_string(),
        "gerbers".to_string(),
        "--output".to_string(),
        job.output_dir.to_string_lossy().to_string(),
        "--layers".to_string(),
        job.layer.toolkit_name(),
    ];

    if !popt.use_gerber_attributes {
        args.push("--no-x2".to_string());
        args.push("--no-netlist".to_string());
    }
    if popt.subtract_mask_from_silk {
        args.push("--subtract-soldermask".to_string());
    }
    if popt.use_aux_origin {
        args.push("--use-drill-file-origin".to_string());
    }
    if !popt.plot_reference {
        args.push("--exclude-refdes".to_string());
    }
    if !popt.plot_value {
        args.push("--exclude-value".to_string());
    }
    // 板框层默认就不叠加到其它层上（exclude_edge_layer），无需参数。
    // 镜像、负片、自动缩放在生产策略里恒为关闭。
    if job.capabilities.supports_line_width {
        args.push("--line-width".to_string());
        args.push(format!("{}mm", popt.line_width_mm));
    }

    args.push(job.board_file.to_string_lossy().to_string());
    args
}

/// 组装钻孔导出的命令行参数
fn drill_args(job: &DrillJob) -> Vec<String> {
    let dopt = &job.options;
    let mut args = vec![
        "pcb".to_string(),
        "export".to_string(),
        "drill".to_string(),
        "--output".to_string(),
        // 钻孔导出要求目录以分隔符结尾
        format!("{}{}", job.output_dir.to_string_lossy(), std::path::MAIN_SEPARATOR),
        "--format".to_string(),
        "excellon".to_string(),
    ];

    if !dopt.merge_pth_npth {
        args.push("--excellon-separate-th".to_string());
    }
    args.push("--excellon-units".to_string());
    args.push(if dopt.metric { "mm" } else { "in" }.to_string());
    if dopt.minimal_header {
        args.push("--excellon-min-header".to_string());
    }
    if dopt.mirror {
        args.push("--excellon-mirror-y".to_string());
    }
    args.push("--drill-origin".to_string());
    args.push(if dopt.use_aux_origin { "plot" } else { "absolute" }.to_string());

    args.push("--generate-map".to_string());
    args.push("--map-format".to_string());
    args.push(
        match dopt.map_format {
            MapFormat::Pdf => "pdf",
            MapFormat::Gerber => "gerberx2",
            MapFormat::Postscript => "ps",
        }
        .to_string(),
    );

    args.push(job.board_file.to_string_lossy().to_string());
    args
}

/// 把工具链按输入文件名生成的产物挪到按工程名约定的路径上
///
/// 工具链用工作副本的文件名做前缀，这里统一改回工程名前缀。
/// 源文件不存在时不视为错误（产物路径只按约定记录，不做核验）。
async fn rename_artifact(from: &Path, to: &Path) -> AppResult<()> {
    if from == to {
        return Ok(());
    }
    match tokio::fs::rename(from, to).await {
        Ok(()) => Ok(()),
        Err(_) if to.exists() => Ok(()),
        Err(e) => {
            debug!("产物改名失败 {} -> {}: {}", from.display(), to.display(), e);
            Ok(())
        }
    }
}

#[async_trait]
impl PcbToolkit for KicadCliToolkit {
    async fn probe(&self) -> AppResult<ToolkitCapabilities> {
        let output = self
            .run(&["version".to_string()])
            .await
            .map_err(|e| AppError::Toolkit(ToolkitError::ProbeFailed { source: Box::new(e) }))?;

        match parse_version(&output) {
            Some(version) => {
                let caps = capabilities_for_version(version);
                info!(
                    "工具链版本 {}.{}.{} (线宽设置: {}, 钻孔原点: {})",
                    version.0, version.1, version.2, caps.supports_line_width, caps.supports_drill_origin
                );
                Ok(caps)
            }
            None => {
                // 版本号读不出来按能力全无处理，继续运行
                warn!("无法解析工具链版本输出: {:?}", output.trim());
                Ok(ToolkitCapabilities {
                    supports_line_width: false,
                    supports_drill_origin: false,
                })
            }
        }
    }

    async fn plot_gerber(&self, job: &GerberJob) -> AppResult<PathBuf> {
        let args = gerber_args(job);
        self.run(&args)
            .await
            .map_err(|e| AppError::plot_failed(job.layer.file_stem(), e))?;

        // 工具链输出: <工作副本名>-<层名>.gbr，统一改成 <工程名>-<层标识>.gbr
        let staged_stem = job
            .board_file
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("board");
        let cli_layer = job.layer.toolkit_name().replace('.', "_");
        let produced = job
            .output_dir
            .join(format!("{}-{}.gbr", staged_stem, cli_layer));
        let target = job
            .output_dir
            .join(format!("{}-{}.gbr", job.project_name, job.layer.file_stem()));

        rename_artifact(&produced, &target).await?;
        Ok(target)
    }

    async fn write_drill_files(&self, job: &DrillJob) -> AppResult<DrillArtifacts> {
        let args = drill_args(job);
        self.run(&args).await.map_err(AppError::drill_failed)?;

        let staged_stem = job
            .board_file
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("board");
        let produced = DrillArtifacts::by_convention(&job.output_dir, staged_stem);
        let target = DrillArtifacts::by_convention(&job.output_dir, &job.project_name);

        rename_artifact(&produced.pth, &target.pth).await?;
        rename_artifact(&produced.npth, &target.npth).await?;
        rename_artifact(&produced.map, &target.map).await?;

        Ok(target)
    }
}
