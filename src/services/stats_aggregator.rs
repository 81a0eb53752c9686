//! 批次统计 - 每个关键词的均值与总体标准差

use crate::models::document::DocumentCounts;
use crate::models::pattern::{MatchCounts, PatternSet};
use std::fmt;
use std::fmt::Write as _;

/// 单个关键词的最终统计
#[derive(Debug, Clone, PartialEq)]
pub struct LabelStats {
    pub label: String,
    pub mean: f64,
    pub std_dev: f64,
}

impl fmt::Display for LabelStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}': Mean = {:.2}, StdDev = {:.2}",
            self.label, self.mean, self.std_dev
        )
    }
}

/// 均值与总体标准差（除以 N）；空序列返回 (0, 0)
pub fn compute_stats(values: &[usize]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
    let variance = values
        .iter()
        .map(|&v| (v as f64 - mean).powi(2))
        .sum::<f64>()
        / n;
    (mean, variance.sqrt())
}

/// 按文献累积每个关键词的命中数
///
/// 标签在创建时固定，与 PatternSet 一致
#[derive(Debug, Clone)]
pub struct StatsAccumulator {
    series: Vec<(String, Vec<usize>)>,
}

impl StatsAccumulator {
    pub fn new(patterns: &PatternSet) -> Self {
        Self {
            series: patterns
                .labels()
                .map(|label| (label.to_string(), Vec::new()))
                .collect(),
        }
    }

    /// 记录一篇文献的结果；缺失的标签按 0 计入
    pub fn record(&mut self, counts: &MatchCounts) {
        for (label, values) in &mut self.series {
            values.push(counts.get(label).unwrap_or(0));
        }
    }

    pub fn documents(&self) -> usize {
        self.series.first().map_or(0, |(_, values)| values.len())
    }

    pub fn values(&self, label: &str) -> Option<&[usize]> {
        self.series
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, values)| values.as_slice())
    }

    pub fn finalize(&self) -> Vec<LabelStats> {
        self.series
            .iter()
            .map(|(label, values)| {
                let (mean, std_dev) = compute_stats(values);
                LabelStats {
                    label: label.clone(),
                    mean,
                    std_dev,
                }
            })
            .collect()
    }
}

/// 报告中单篇文献的段落
pub fn render_document_block(doc: &DocumentCounts) -> String {
    let mut block = format!("Title: '{}'\n", doc.title);
    for (label, count) in doc.counts.iter() {
        let _ = writeln!(block, "  - '{}': {}", label, count);
    }
    block.push_str("---\n");
    block
}

/// 报告末尾的汇总段落
pub fn render_final_block(stats: &[LabelStats]) -> String {
    let mut block = String::from("\nFinal Statistics\n");
    for stat in stats {
        let _ = writeln!(block, "  - {}", stat);
    }
    block
}
