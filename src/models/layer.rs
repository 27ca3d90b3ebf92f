//! 层定义与绘制计划
//!
//! 固定的九层标准计划 + 运行时发现的内层铜层。

use std::fmt;

/// 电路板上参与出图的层
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    FCu,
    BCu,
    BMask,
    FMask,
    BPaste,
    FPaste,
    FSilkS,
    BSilkS,
    EdgeCuts,
    /// 内层铜层，编号从 1 开始（In1.Cu、In2.Cu …）
    Inner(u32),
}

impl Layer {
    /// 输出文件名中使用的层标识（如 demo-F_Cu.gbr / demo-inner1.gbr）
    pub fn file_stem(&self) -> String {
        match self {
            Layer::FCu => "F_Cu".to_string(),
            Layer::BCu => "B_Cu".to_string(),
            Layer::BMask => "B_Mask".to_string(),
            Layer::FMask => "F_Mask".to_string(),
            Layer::BPaste => "B_Paste".to_string(),
            Layer::FPaste => "F_Paste".to_string(),
            Layer::FSilkS => "F_SilkS".to_string(),
            Layer::BSilkS => "B_SilkS".to_string(),
            Layer::EdgeCuts => "Edge_Cuts".to_string(),
            Layer::Inner(n) => format!("inner{}", n),
        }
    }

    /// 工具链内部使用的层名
    pub fn toolkit_name(&self) -> String {
        match self {
            Layer::FCu => "F.Cu".to_string(),
            Layer::BCu => "B.Cu".to_string(),
            Layer::BMask => "B.Mask".to_string(),
            Layer::FMask => "F.Mask".to_string(),
            Layer::BPaste => "B.Paste".to_string(),
            Layer::FPaste => "F.Paste".to_string(),
            Layer::FSilkS => "F.Silkscreen".to_string(),
            Layer::BSilkS => "B.Silkscreen".to_string(),
            Layer::EdgeCuts => "Edge.Cuts".to_string(),
            Layer::Inner(n) => format!("In{}.Cu", n),
        }
    }

    /// 人类可读的层描述
    pub fn label(&self) -> &'static str {
        match self {
            Layer::FCu => "Top layer",
            Layer::BCu => "Bottom layer",
            Layer::BMask => "Mask Bottom",
            Layer::FMask => "Mask top",
            Layer::BPaste => "Paste Bottom",
            Layer::FPaste => "Paste Top",
            Layer::FSilkS => "Silk Top",
            Layer::BSilkS => "Silk Bottom",
            Layer::EdgeCuts => "Edges",
            Layer::Inner(_) => "inner",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_stem())
    }
}

/// 标准绘制计划：固定九层，与板上内容无关
pub fn standard_plot_plan() -> [Layer; 9] {
    [
        Layer::FCu,
        Layer::BCu,
        Layer::BMask,
        Layer::FMask,
        Layer::BPaste,
        Layer::FPaste,
        Layer::FSilkS,
        Layer::BSilkS,
        Layer::EdgeCuts,
    ]
}

/// 内层铜层绘制计划
///
/// 只取严格位于第一层和最后一层之间的铜层：
/// 铜层总数为 N 时，内层为 In1.Cu … In(N-2).Cu，共 max(N-2, 0) 层。
pub fn inner_plot_plan(copper_layer_count: u32) -> Vec<Layer> {
    (1..copper_layer_count.saturating_sub(1))
        .map(Layer::Inner)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_plan_is_fixed_nine_layers() {
        let plan = standard_plot_plan();
        assert_eq!(plan.len(), 9);
        assert_eq!(plan[0], Layer::FCu);
        assert_eq!(plan[8], Layer::EdgeCuts);
        // 顺序固定，与板上内容无关
        let stems: Vec<String> = plan.iter().map(|l| l.file_stem()).collect();
        assert_eq!(
            stems,
            vec![
                "F_Cu", "B_Cu", "B_Mask", "F_Mask", "B_Paste", "F_Paste", "F_SilkS", "B_SilkS",
                "Edge_Cuts"
            ]
        );
    }

    #[test]
    fn test_inner_plan_count_is_copper_minus_two() {
        assert!(inner_plot_plan(0).is_empty());
        assert!(inner_plot_plan(1).is_empty());
        assert!(inner_plot_plan(2).is_empty());
        assert_eq!(inner_plot_plan(4), vec![Layer::Inner(1), Layer::Inner(2)]);
        assert_eq!(inner_plot_plan(6).len(), 4);
    }

    #[test]
    fn test_standard_layers_have_labels() {
        for layer in standard_plot_plan() {
            assert!(!layer.label().is_empty());
        }
        assert_eq!(Layer::FCu.label(), "Top layer");
        assert_eq!(Layer::EdgeCuts.label(), "Edges");
    }

    #[test]
    fn test_inner_layer_naming() {
        let layer = Layer::Inner(2);
        assert_eq!(layer.file_stem(), "inner2");
        assert_eq!(layer.toolkit_name(), "In2.Cu");
        assert_eq!(layer.label(), "inner");
    }
}
