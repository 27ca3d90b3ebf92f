//! 电路板文件句柄
//!
//! 持有加载进内存的电路板内容，生命周期覆盖整个进程。这里不做完整的
//! 格式解析（解析属于外部工具链），只做两件最小的文本扫描：
//! 铜层计数、板级文本对象的版本号替换。

use std::path::{Path, PathBuf};

use regex::{Captures, Regex};
use tracing::{debug, info};

use crate::error::{AppError, AppResult, FileError};

/// 加载后的电路板句柄
#[derive(Debug, Clone)]
pub struct BoardFile {
    path: PathBuf,
    content: String,
}

impl BoardFile {
    /// 加载电路板文件
    ///
    /// 加载失败是致命错误：不重试，也不会产生任何输出。
    pub async fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Err(AppError::File(FileError::NotFound {
                path: path.to_path_buf(),
            }));
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AppError::board_load_failed(path, e))?;

        debug!("电路板已加载: {} ({} 字节)", path.display(), content.len());

        Ok(Self {
            path: path.to_path_buf(),
            content,
        })
    }

    /// 原始文件路径
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 当前（可能已被替换修改的）电路板内容
    pub fn content(&self) -> &str {
        &self.content
    }

    /// 铜层数量
    ///
    /// 从板内层表中统计形如 `(0 "F.Cu" signal)` 的条目。
    pub fn copper_layer_count(&self) -> u32 {
        let re = Regex::new(r#"\(\s*\d+\s+"[^"]*\.Cu""#).expect("层表正则不合法");
        re.find_iter(&self.content).count() as u32
    }

    /// 辅助原点（如果板上存了的话），单位毫米
    pub fn aux_origin(&self) -> Option<(f64, f64)> {
        let re = Regex::new(r"\(aux_axis_origin\s+(-?\d+(?:\.\d+)?)\s+(-?\d+(?:\.\d+)?)\)")
            .expect("辅助原点正则不合法");
        let caps = re.captures(&self.content)?;
        let x = caps[1].parse().ok()?;
        let y = caps[2].parse().ok()?;
        Some((x, y))
    }

    /// 替换板级文本对象中的版本号标记
    ///
    /// 只改动包含标记的文本对象，其余内容保持原样。返回替换的条数。
    /// 这是本系统唯一一处自己的内容变换逻辑。
    pub fn replace_revision_token(&mut self, token: &str, git_rev: &str) -> usize {
        let re = Regex::new(r#"(\(gr_text\s+")((?:[^"\\]|\\.)*)(")"#).expect("文本对象正则不合法");
        let mut replaced = 0usize;

        let new_content = re.replace_all(&self.content, |caps: &Captures| {
            let text = &caps[2];
            if text.contains(token) {
                replaced += 1;
                format!("{}{}{}", &caps[1], text.replace(token, git_rev), &caps[3])
            } else {
                caps[0].to_string()
            }
        });

        if replaced > 0 {
            self.content = new_content.into_owned();
            info!("Git Revision Replaced: {} ({} 处)", git_rev, replaced);
        }

        replaced
    }

    /// 把当前内容写成工作副本，供绘制后端使用
    ///
    /// 文件名带时间戳和进程号，避免并行运行互相覆盖。
    pub async fn stage(&self, temp_dir: &Path) -> AppResult<PathBuf> {
        let stem = self
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("board");
        let staged = temp_dir.join(format!(
            "{}_{}_{}.kicad_pcb",
            stem,
            chrono::Local::now().format("%Y%m%d_%H%M%S%3f"),
            std::process::id()
        ));

        tokio::fs::write(&staged, &self.content)
            .await
            .map_err(|e| AppError::file_write_failed(&staged, e))?;

        debug!("工作副本已写入: {}", staged.display());
        Ok(staged)
    }
}
