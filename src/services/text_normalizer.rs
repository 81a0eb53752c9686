//! 全文清洗 - 去页眉页脚、去图注、压缩空行
//!
//! 纯启发式规则，允许误删和漏删

use regex::Regex;

/// 页眉/页脚判定规则（整行匹配）
const PAGE_HEADER_RULES: [&str; 6] = [
    // 只有页码
    r"^\s*\d+\s*$",
    // First M.
    r"^\s*[A-Z][a-z]+\s+[A-Z]\.\s*$",
    // M. First
    r"^\s*[A-Z]\.\s+[A-Z][a-z]+\s*$",
    // 以 et al. 结尾的作者行
    r"^.+?\s+et al\.\s*$",
    // 以年份结尾的期刊行
    r"^.+?\s+\d{4}\s*$",
    // Downloaded from ... 下载声明
    r"^(?:.*\s)?Downloaded from\s+.+$",
];

/// 图注：Fig. 3: ... / Figure 12: ...
const FIGURE_CAPTION_RULE: &str = r"^\s*(?:Fig\.|Figure)\s*\d+\s*:";

/// 全文清洗器
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    page_header: Regex,
    figure_caption: Regex,
}

impl TextNormalizer {
    pub fn new() -> Result<Self, regex::Error> {
        let alternation = PAGE_HEADER_RULES
            .iter()
            .map(|rule| format!("(?:{rule})"))
            .collect::<Vec<_>>()
            .join("|");
        Ok(Self {
            page_header: Regex::new(&alternation)?,
            figure_caption: Regex::new(FIGURE_CAPTION_RULE)?,
        })
    }

    pub fn is_page_header(&self, line: &str) -> bool {
        self.page_header.is_match(line)
    }

    pub fn is_figure_caption(&self, line: &str) -> bool {
        self.figure_caption.is_match(line)
    }

    /// 删除页眉页脚和图注所在的行，再压缩空行
    pub fn normalize(&self, text: &str) -> String {
        let kept = text
            .lines()
            .filter(|line| !self.is_page_header(line) && !self.is_figure_caption(line));
        collapse_blank_lines(kept)
    }
}

/// 连续空行压缩为一行，去掉首尾空行
pub fn collapse_blank_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut previous_blank = true;

    for line in lines {
        let blank = line.trim().is_empty();
        if blank && previous_blank {
            continue;
        }
        out.push(if blank { "" } else { line });
        previous_blank = blank;
    }

    while out.last().is_some_and(|line| line.is_empty()) {
        out.pop();
    }

    out.join("\n")
}
