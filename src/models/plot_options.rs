//! 绘制参数
//!
//! 原始脚本把绘制参数散落在工具链的全局选项对象里，这里收敛成一个显式的
//! 配置结构体，按值传给流程层，进程内没有任何全局状态。

use std::path::PathBuf;

/// 钻孔标记在铜层 / 阻焊层图上的呈现方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrillMarks {
    /// 不画钻孔形状（钻孔数据由单独的钻孔文件承载）
    None,
    Small,
    Full,
}

/// 钻孔地图文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapFormat {
    Pdf,
    Gerber,
    Postscript,
}

/// Gerber 绘制参数
///
/// 注意：plot_frame_ref 必须保持 false。图框模板（页面布局文件）并不存储在
/// 电路板数据里，要求工具链绘制一个不存在的图框会直接导致底层库崩溃，
/// 这是外部工具链的硬性约束。
#[derive(Debug, Clone)]
pub struct PlotOptions {
    /// 输出目录，整个运行期间固定
    pub output_dir: PathBuf,
    /// 是否绘制图框（见上，必须为 false）
    pub plot_frame_ref: bool,
    /// 线宽（毫米），工具链不支持时忽略
    pub line_width_mm: f64,
    /// 自动缩放
    pub auto_scale: bool,
    /// 缩放比例
    pub scale: f64,
    /// 镜像
    pub mirror: bool,
    /// 是否写入 Gerber 属性（X2 格式）
    pub use_gerber_attributes: bool,
    /// 是否把板框层排除在各层图之外
    pub exclude_edge_layer: bool,
    /// 是否以辅助原点作为坐标原点
    pub use_aux_origin: bool,
    /// 负片输出
    pub negative: bool,
    /// 绘制位号（reference）丝印文本
    pub plot_reference: bool,
    /// 绘制值（value）丝印文本
    pub plot_value: bool,
    /// 绘制不可见文本
    pub plot_invisible_text: bool,
    /// 从丝印中减去阻焊开窗，避免丝印压焊盘
    pub subtract_mask_from_silk: bool,
    /// 钻孔标记样式
    pub drill_marks: DrillMarks,
}

impl PlotOptions {
    /// 生产文件（fabrication）的固定绘制策略
    pub fn fabrication_defaults(output_dir: PathBuf, line_width_mm: f64) -> Self {
        Self {
            output_dir,
            plot_frame_ref: false,
            line_width_mm,
            auto_scale: false,
            scale: 1.0,
            mirror: false,
            use_gerber_attributes: false,
            exclude_edge_layer: true,
            use_aux_origin: true,
            negative: false,
            plot_reference: true,
            plot_value: true,
            plot_invisible_text: false,
            subtract_mask_from_silk: true,
            drill_marks: DrillMarks::None,
        }
    }
}

/// 钻孔文件生成参数
#[derive(Debug, Clone)]
pub struct DrillOptions {
    /// 地图文件格式
    pub map_format: MapFormat,
    /// 镜像
    pub mirror: bool,
    /// 精简文件头（false = 完整文件头）
    pub minimal_header: bool,
    /// 坐标原点偏移（毫米），来自辅助原点或 (0,0)
    pub offset: (f64, f64),
    /// 是否以辅助原点作为钻孔坐标原点
    pub use_aux_origin: bool,
    /// 是否把 PTH / NPTH 合并到一个文件（false = 分开两个文件）
    pub merge_pth_npth: bool,
    /// 公制单位
    pub metric: bool,
}

impl DrillOptions {
    /// 生产文件的固定钻孔策略，偏移量由调用方根据辅助原点决定
    pub fn fabrication_defaults(offset: (f64, f64), use_aux_origin: bool) -> Self {
        Self {
            map_format: MapFormat::Pdf,
            mirror: false,
            minimal_header: false,
            offset,
            use_aux_origin,
            merge_pth_npth: false,
            metric: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fabrication_defaults_match_fixed_policy() {
        let popt = PlotOptions::fabrication_defaults(PathBuf::from("/tmp/plot"), 0.35);
        assert!(!popt.plot_frame_ref);
        assert!(!popt.auto_scale);
        assert_eq!(popt.scale, 1.0);
        assert!(!popt.mirror);
        assert!(!popt.use_gerber_attributes);
        assert!(popt.exclude_edge_layer);
        assert!(popt.use_aux_origin);
        assert!(!popt.negative);
        assert!(popt.plot_reference);
        assert!(popt.plot_value);
        assert!(!popt.plot_invisible_text);
        assert!(popt.subtract_mask_from_silk);
        assert_eq!(popt.drill_marks, DrillMarks::None);
    }

    #[test]
    fn test_drill_defaults_keep_pth_npth_separate() {
        let dopt = DrillOptions::fabrication_defaults((0.0, 0.0), false);
        assert_eq!(dopt.map_format, MapFormat::Pdf);
        assert!(!dopt.mirror);
        assert!(!dopt.minimal_header);
        assert!(!dopt.merge_pth_npth);
        assert!(dopt.metric);
    }
}
