use std::fmt;
use std::path::PathBuf;

/// 应用程序错误类型
#[derive(Debug)]
pub enum AppError {
    /// CAD 工具链相关错误
    Toolkit(ToolkitError),
    /// 文件操作错误
    File(FileError),
    /// 配置错误
    Config(ConfigError),
    /// 其他错误（用于包装第三方库错误）
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Toolkit(e) => write!(f, "工具链错误: {}", e),
            AppError::File(e) => write!(f, "文件错误: {}", e),
            AppError::Config(e) => write!(f, "配置错误: {}", e),
            AppError::Other(msg) => write!(f, "错误: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Toolkit(e) => Some(e),
            AppError::File(e) => Some(e),
            AppError::Config(e) => Some(e),
            AppError::Other(_) => None,
        }
    }
}

/// CAD 工具链相关错误
///
/// 除能力探测以外，任何工具链失败都是致命的：不重试、不清理、不产生部分输出。
#[derive(Debug)]
pub enum ToolkitError {
    /// 加载电路板文件失败
    LoadFailed {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 绘制某一层失败
    PlotFailed {
        layer: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 生成钻孔文件失败
    DrillFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 工具链版本探测失败
    ProbeFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for ToolkitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolkitError::LoadFailed { path, source } => {
                write!(f, "加载电路板失败 ({}): {}", path.display(), source)
            }
            ToolkitError::PlotFailed { layer, source } => {
                write!(f, "绘制层 {} 失败: {}", layer, source)
            }
            ToolkitError::DrillFailed { source } => {
                write!(f, "生成钻孔文件失败: {}", source)
            }
            ToolkitError::ProbeFailed { source } => {
                write!(f, "工具链版本探测失败: {}", source)
            }
        }
    }
}

impl std::error::Error for ToolkitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ToolkitError::LoadFailed { source, .. }
            | ToolkitError::PlotFailed { source, .. }
            | ToolkitError::DrillFailed { source }
            | ToolkitError::ProbeFailed { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
        }
    }
}

/// 文件操作错误
#[derive(Debug)]
pub enum FileError {
    /// 文件不存在
    NotFound { path: PathBuf },
    /// 读取文件失败
    ReadFailed {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 写入文件失败
    WriteFailed {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 创建输出目录失败
    CreateDirFailed {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileError::NotFound { path } => write!(f, "文件不存在: {}", path.display()),
            FileError::ReadFailed { path, source } => {
                write!(f, "读取文件失败 ({}): {}", path.display(), source)
            }
            FileError::WriteFailed { path, source } => {
                write!(f, "写入文件失败 ({}): {}", path.display(), source)
            }
            FileError::CreateDirFailed { path, source } => {
                write!(f, "创建目录失败 ({}): {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileError::ReadFailed { source, .. }
            | FileError::WriteFailed { source, .. }
            | FileError::CreateDirFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 配置错误
#[derive(Debug)]
pub enum ConfigError {
    /// 缺少电路板文件路径（PCB_PATH 或第一个位置参数）
    MissingBoardPath,
    /// 缺少版本号（PCB_VERSION 或第二个位置参数）
    MissingRevision,
    /// 电路板路径无法解析（不存在、没有父目录或没有文件名）
    InvalidBoardPath { path: PathBuf },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingBoardPath => {
                write!(f, "缺少电路板文件路径 (PCB_PATH 或位置参数 1)")
            }
            ConfigError::MissingRevision => {
                write!(f, "缺少版本号 (PCB_VERSION 或位置参数 2)")
            }
            ConfigError::InvalidBoardPath { path } => {
                write!(f, "无法解析电路板路径: {}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ========== 从常见错误类型转换 ==========
// 注意：不需要手动实现 From<AppError> for anyhow::Error，
// anyhow 已经为所有实现了 std::error::Error 的类型提供了自动实现

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: PathBuf::new(), // IO 错误通常不包含路径信息
            source: Box::new(err),
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建电路板加载错误
    pub fn board_load_failed(
        path: impl Into<PathBuf>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Toolkit(ToolkitError::LoadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建绘制失败错误
    pub fn plot_failed(
        layer: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Toolkit(ToolkitError::PlotFailed {
            layer: layer.into(),
            source: Box::new(source),
        })
    }

    /// 创建钻孔生成错误
    pub fn drill_failed(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        AppError::Toolkit(ToolkitError::DrillFailed {
            source: Box::new(source),
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(
        path: impl Into<PathBuf>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
