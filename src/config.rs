use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult, ConfigError};

/// 程序配置
///
/// 电路板路径和版本号既可以通过环境变量传入，也可以通过位置参数传入，
/// 环境变量优先（与原始调用约定保持一致）。没有子命令、没有配置文件。
#[derive(Clone, Debug)]
pub struct Config {
    /// 电路板文件路径（必填）
    pub board_path: PathBuf,
    /// 版本号，用于替换板上的 ${GIT_REV} 标记（必填，任意文本）
    pub git_rev: String,
    /// CAD 工具链可执行文件
    pub kicad_cli: String,
    /// 每次绘制后的等待时间（毫秒）
    pub settle_delay_ms: u64,
    /// 绘制线宽（毫米），仅在工具链支持时生效
    pub line_width_mm: f64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

/// 可选调节项的环境变量原始值
///
/// 只携带未解析的字符串，解析和默认值统一在 `Config::resolve` 里处理。
#[derive(Clone, Debug, Default)]
pub struct EnvKnobs {
    pub kicad_cli: Option<String>,
    pub settle_delay_ms: Option<String>,
    pub line_width_mm: Option<String>,
    pub verbose_logging: Option<String>,
}

impl EnvKnobs {
    /// 从进程环境读取全部调节项
    fn from_process_env() -> Self {
        Self {
            kicad_cli: std::env::var("KICAD_CLI").ok(),
            settle_delay_ms: std::env::var("PLOT_SETTLE_MS").ok(),
            line_width_mm: std::env::var("PLOT_LINE_WIDTH_MM").ok(),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok(),
        }
    }
}

impl Config {
    /// 从环境变量和命令行位置参数加载配置
    ///
    /// 环境变量 PCB_PATH / PCB_VERSION 优先于位置参数 1 / 2。
    /// 所有环境读取都集中在这里。
    pub fn from_env() -> AppResult<Self> {
        let args: Vec<String> = std::env::args().collect();
        Self::resolve(
            std::env::var("PCB_PATH").ok(),
            std::env::var("PCB_VERSION").ok(),
            &args,
            EnvKnobs::from_process_env(),
        )
    }

    /// 根据已取出的环境变量和参数列表解析配置（便于测试注入）
    ///
    /// 解析失败的调节项退回默认值，不报错。
    pub fn resolve(
        env_path: Option<String>,
        env_rev: Option<String>,
        args: &[String],
        knobs: EnvKnobs,
    ) -> AppResult<Self> {
        let board_path = env_path
            .or_else(|| args.get(1).cloned())
            .ok_or(AppError::Config(ConfigError::MissingBoardPath))?;
        let git_rev = env_rev
            .or_else(|| args.get(2).cloned())
            .ok_or(AppError::Config(ConfigError::MissingRevision))?;

        Ok(Self {
            board_path: PathBuf::from(board_path),
            git_rev,
            kicad_cli: knobs.kicad_cli.unwrap_or_else(|| "kicad-cli".to_string()),
            settle_delay_ms: knobs
                .settle_delay_ms
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            line_width_mm: knobs
                .line_width_mm
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.35),
            verbose_logging: knobs
                .verbose_logging
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        })
    }
}

/// 从电路板路径派生出来的各项路径
///
/// 输出目录在整个运行期间固定不变，所有产物都落在这里。
#[derive(Clone, Debug)]
pub struct JobPaths {
    /// 工程名（文件名去掉扩展名）
    pub project_name: String,
    /// 工程目录（电路板文件所在目录的绝对路径）
    pub project_dir: PathBuf,
    /// 输出目录：<project_dir>/plot
    pub output_dir: PathBuf,
}

impl JobPaths {
    /// 从电路板文件路径派生工程名和输出目录
    ///
    /// 路径无法解析（文件不存在、没有父目录或没有文件名）时返回配置错误。
    pub fn derive(board_path: &Path) -> AppResult<Self> {
        let project_name = board_path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(|s| s.to_string())
            .ok_or_else(|| {
                AppError::Config(ConfigError::InvalidBoardPath {
                    path: board_path.to_path_buf(),
                })
            })?;

        // 父目录转为绝对路径，输出目录与当前工作目录无关
        let parent = match board_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let project_dir = parent.canonicalize().map_err(|_| {
            AppError::Config(ConfigError::InvalidBoardPath {
                path: board_path.to_path_buf(),
            })
        })?;

        let output_dir = project_dir.join("plot");

        Ok(Self {
            project_name,
            project_dir,
            output_dir,
        })
    }
}
