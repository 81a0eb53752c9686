//! 章节格式化 - 把识别出的结构行提升为 Markdown 标题

use crate::services::text_normalizer::collapse_blank_lines;
use regex::Regex;
use std::borrow::Cow;

/// Markdown 最大标题层级
const MAX_HEADING_LEVEL: usize = 6;

pub const ARTICLE_BEGIN: &str = "---BEGIN ARTICLE---";
pub const ARTICLE_END: &str = "---END ARTICLE---";

/// 章节格式化器
#[derive(Debug, Clone)]
pub struct SectionFormatter {
    reference_start: Regex,
    keyword_start: Regex,
    section_numbering: Regex,
}

impl SectionFormatter {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            reference_start: Regex::new(r"(?i)^\s*(References|Bibliography)\s*$")?,
            keyword_start: Regex::new(r"(?i)^\s*(Keywords|Index Terms)\s*:\s*(\S.*)$")?,
            section_numbering: Regex::new(r"^\s*(\d+(?:\.\d+)*)(\.?)\s+([A-Za-z].*)$")?,
        })
    }

    /// 逐行分类，命中第一条规则即返回
    pub fn format_line<'a>(&self, line: &'a str) -> Cow<'a, str> {
        if let Some(caps) = self.reference_start.captures(line) {
            return Cow::Owned(format!("## {}", &caps[1]));
        }

        if let Some(caps) = self.keyword_start.captures(line) {
            return Cow::Owned(format!("## {}: {}", &caps[1], caps[2].trim_end()));
        }

        if let Some(caps) = self.section_numbering.captures(line) {
            let segments = caps[1].split('.').count();
            let trailing_dot = !caps[2].is_empty();
            // 没有任何点号的数字开头（如 "2021 results"）不是章节编号
            if trailing_dot || segments > 1 {
                let depth = segments + 1;
                let level = (depth + 1).min(MAX_HEADING_LEVEL);
                return Cow::Owned(format!("{} {}", "#".repeat(level), caps[3].trim_end()));
            }
        }

        Cow::Borrowed(line)
    }

    pub fn format(&self, text: &str) -> String {
        let lines: Vec<Cow<'_, str>> = text.lines().map(|line| self.format_line(line)).collect();
        collapse_blank_lines(lines.iter().map(|line| line.as_ref()))
    }
}

/// 单篇文章文件内容
pub fn render_article(title: &str, body: &str) -> String {
    format!("# {}\n\n{}", title, body)
}

/// 合并全文文件中的一篇文章
pub fn render_corpus_entry(title: &str, authors: &[String], body: &str) -> String {
    let mut entry = String::with_capacity(body.len() + title.len() + 64);
    entry.push_str(ARTICLE_BEGIN);
    entry.push('\n');
    entry.push_str(&format!("# {}\n", title));
    if !authors.is_empty() {
        entry.push_str(&format!("## Authors: {}\n", authors.join(", ")));
    }
    entry.push_str(body);
    entry.push('\n');
    entry.push_str(ARTICLE_END);
    entry.push_str("\n\n");
    entry
}
