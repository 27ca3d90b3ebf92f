//! 数据模型：层计划和绘制参数

pub mod layer;
pub mod plot_options;

pub use layer::{inner_plot_plan, standard_plot_plan, Layer};
pub use plot_options::{DrillMarks, DrillOptions, MapFormat, PlotOptions};
