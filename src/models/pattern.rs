use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::ConfigError;

/// 配置文件中的一条关键词规则
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSpec {
    pub label: String,
    pub pattern: String,
}

impl PatternSpec {
    pub fn new(label: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            pattern: pattern.into(),
        }
    }
}

/// 编译后的关键词表，整个批次只读共享
#[derive(Debug, Clone)]
pub struct PatternSet {
    entries: Vec<(String, Regex)>,
}

impl PatternSet {
    /// 按配置顺序编译，大小写不敏感
    pub fn compile(specs: &[PatternSpec]) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(specs.len());

        for spec in specs {
            if !seen.insert(spec.label.as_str()) {
                return Err(ConfigError::DuplicateLabel {
                    label: spec.label.clone(),
                });
            }
            let regex = RegexBuilder::new(&spec.pattern)
                .case_insensitive(true)
                .build()
                .map_err(|source| ConfigError::InvalidPattern {
                    label: spec.label.clone(),
                    source,
                })?;
            entries.push((spec.label.clone(), regex));
        }

        Ok(Self { entries })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Regex)> {
        self.entries.iter().map(|(label, re)| (label.as_str(), re))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(label, _)| label.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 单篇文献的关键词命中数，键集合与 PatternSet 一致
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchCounts {
    counts: Vec<(String, usize)>,
}

impl MatchCounts {
    pub fn push(&mut self, label: impl Into<String>, count: usize) {
        self.counts.push((label.into(), count));
    }

    pub fn get(&self, label: &str) -> Option<usize> {
        self.counts
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(label, count)| (label.as_str(), *count))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_rejects_duplicate_label() {
        let specs = vec![
            PatternSpec::new("education", r"\beducation\b"),
            PatternSpec::new("education", r"\beducational\b"),
        ];
        assert!(matches!(
            PatternSet::compile(&specs),
            Err(ConfigError::DuplicateLabel { .. })
        ));
    }

    #[test]
    fn test_compile_rejects_bad_regex() {
        let specs = vec![PatternSpec::new("broken", r"\b(school")];
        assert!(matches!(
            PatternSet::compile(&specs),
            Err(ConfigError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_compile_keeps_order() {
        let specs = vec![
            PatternSpec::new("b", "b"),
            PatternSpec::new("a", "a"),
        ];
        let set = PatternSet::compile(&specs).unwrap();
        assert_eq!(set.labels().collect::<Vec<_>>(), vec!["b", "a"]);
    }
}
