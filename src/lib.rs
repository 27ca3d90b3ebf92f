//! # Plot Gerbers
//!
//! 从一块电路板批量生成生产文件（Gerber 层、Excellon 钻孔文件、钻孔统计报告）。
//!
//! 重要说明：本流程不绘制图框。图框模板（页面布局文件）并不存储在电路板
//! 数据里，要求外部工具链绘制一个它拿不到的模板会直接导致底层库崩溃，
//! 所以 plot_frame_ref 必须保持关闭。
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Toolkit）
//! - `toolkit/` - 持有外部 CAD 工具链资源，只暴露能力
//! - `BoardFile` - 电路板句柄（加载、文本替换、铜层计数）
//! - `KicadCliToolkit` - 工具链后端（版本探测、绘制、钻孔）
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个任务
//! - `GerberPlotter` - 绘制一层 Gerber 的能力
//! - `DrillWriter` - 生成钻孔 + 地图文件的能力
//! - `DrillReporter` - 写 drill_report.txt 的能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一块板"的完整出图流程
//! - `PlotFlow` - 流程编排（替换 → 标准层 → 内层 → 钻孔 → 报告）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/` - 应用主结构，管理资源并驱动流程
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod toolkit;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::{Config, EnvKnobs, JobPaths};
pub use error::{AppError, AppResult};
pub use models::{inner_plot_plan, standard_plot_plan, Layer, PlotOptions};
pub use orchestrator::App;
pub use toolkit::board::BoardFile;
pub use toolkit::kicad_cli::KicadCliToolkit;
pub use toolkit::{PcbToolkit, ToolkitCapabilities};
pub use workflow::{FabricationReport, PlotFlow, GIT_REV_TOKEN};
