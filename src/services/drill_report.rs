//! 钻孔统计报告 - 业务能力层
//!
//! 命令行工具链没有单独的报告原语，这里直接从已生成的 Excellon 文件
//! 里读出刀具表和孔数，写一份纯文本统计报告。

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{info, warn};

use crate::error::AppError;

/// 单把钻头的统计
#[derive(Debug, Clone, PartialEq)]
pub struct ToolStat {
    /// 刀具编号（Excellon T 码）
    pub tool: u32,
    /// 钻头直径（毫米）
    pub diameter_mm: f64,
    /// 孔数
    pub hits: usize,
}

/// 一个钻孔文件的统计
#[derive(Debug, Clone, Default)]
pub struct DrillStats {
    pub tools: Vec<ToolStat>,
}

impl DrillStats {
    pub fn total_hits(&self) -> usize {
        self.tools.iter().map(|t| t.hits).sum()
    }
}

/// 从 Excellon 内容提取刀具表和孔数
///
/// 只认本流程自己生成的格式：文件头里的 `TnCd.ddd` 刀具定义、
/// 正文里的 `Tn` 选刀和 `X...Y...` 坐标行。其余指令一律跳过。
pub fn parse_excellon(content: &str) -> DrillStats {
    let mut stats = DrillStats::default();
    let mut current_tool: Option<usize> = None;

    for line in content.lines() {
        let line = line.trim();

        if let Some(rest) = line.strip_prefix('T') {
            if let Some(c_pos) = rest.find('C') {
                // 文件头: T1C0.300
                let tool = rest[..c_pos].parse::<u32>();
                let diameter = rest[c_pos + 1..].parse::<f64>();
                if let (Ok(tool), Ok(diameter_mm)) = (tool, diameter) {
                    stats.tools.push(ToolStat {
                        tool,
                        diameter_mm,
                        hits: 0,
                    });
                }
            } else if let Ok(tool) = rest.parse::<u32>() {
                // 正文: T1 选刀（T0 表示放回刀具）
                current_tool = stats.tools.iter().position(|t| t.tool == tool);
            }
        } else if line.starts_with('X') || line.starts_with('Y') {
            if let Some(idx) = current_tool {
                stats.tools[idx].hits += 1;
            }
        }
    }

    stats
}

/// 钻孔报告服务
pub struct DrillReporter {
    report_path: PathBuf,
}

impl DrillReporter {
    /// 报告固定写到 <output_dir>/drill_report.txt
    pub fn new(output_dir: &Path) -> Self {
        Self {
            report_path: output_dir.join("drill_report.txt"),
        }
    }

    /// 生成统计报告并返回报告路径
    ///
    /// 钻孔文件路径是按约定记录的，这里对不存在的文件只记一行说明，
    /// 不中断运行。
    pub async fn generate(&self, board_path: &Path, drill_files: &[PathBuf]) -> Result<PathBuf> {
        let mut report = String::new();
        report.push_str(&format!("Drill report for {}\n", board_path.display()));
        report.push_str(&format!(
            "Created on {}\n\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ));

        let mut grand_total = 0usize;

        for drill_file in drill_files {
            let name = drill_file
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            report.push_str(&format!("** {} **\n", name));

            match tokio::fs::read_to_string(drill_file).await {
                Ok(content) => {
                    let stats = parse_excellon(&content);
                    for tool in &stats.tools {
                        report.push_str(&format!(
                            "    T{}  {:.3}mm  {} hits\n",
                            tool.tool, tool.diameter_mm, tool.hits
                        ));
                    }
                    report.push_str(&format!(
                        "    total: {} tools, {} holes\n\n",
                        stats.tools.len(),
                        stats.total_hits()
                    ));
                    grand_total += stats.total_hits();
                }
                Err(_) => {
                    warn!("钻孔文件不存在，报告中记一行说明: {}", drill_file.display());
                    report.push_str("    (file not generated)\n\n");
                }
            }
        }

        report.push_str(&format!("Total: {} holes\n", grand_total));

        tokio::fs::write(&self.report_path, report)
            .await
            .map_err(|e| AppError::file_write_failed(&self.report_path, e))?;

        info!("✓ 钻孔统计报告: {}", self.report_path.display());
        Ok(self.report_path.clone())
    }
}
