use crate::models::pattern::{MatchCounts, PatternSet};

/// 统计每条规则在文本中的不重叠命中次数
///
/// 返回结果覆盖 PatternSet 的全部标签，未命中为 0
pub fn count_matches(text: &str, patterns: &PatternSet) -> MatchCounts {
    let mut counts = MatchCounts::default();
    for (label, regex) in patterns.iter() {
        counts.push(label, regex.find_iter(text).count());
    }
    counts
}
