//! 流程层：一块板的完整出图流程

pub mod plot_flow;

pub use plot_flow::{FabricationReport, PlotFlow, GIT_REV_TOKEN};
