//! 业务能力层：每个服务只描述"我能做什么"，不编排流程

pub mod drill_report;
pub mod drill_writer;
pub mod gerber_plotter;

pub use drill_report::{parse_excellon, DrillReporter, DrillStats, ToolStat};
pub use drill_writer::DrillWriter;
pub use gerber_plotter::GerberPlotter;
