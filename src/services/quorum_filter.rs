//! 投票筛选 - 至少两位审稿人在笔记里投了 YES 才推送条目

use crate::models::item::Note;
use crate::services::html_stripper::HtmlStripper;
use regex::Regex;
use std::sync::Arc;

/// 投票筛选器
///
/// 双重门槛：笔记总数 >= quorum，且匹配投票规则的笔记数 >= quorum
#[derive(Clone)]
pub struct QuorumFilter {
    stripper: Arc<dyn HtmlStripper>,
    vote_pattern: Regex,
    quorum: usize,
}

impl QuorumFilter {
    pub fn new(stripper: Arc<dyn HtmlStripper>, vote_pattern: Regex, quorum: usize) -> Self {
        Self {
            stripper,
            vote_pattern,
            quorum,
        }
    }

    /// 笔记 HTML 转纯文本
    pub fn note_text(&self, note: &Note) -> String {
        self.stripper.strip(note.html.trim()).trim().to_string()
    }

    pub fn is_vote(&self, text: &str) -> bool {
        self.vote_pattern.is_match(text)
    }

    pub fn count_votes(&self, texts: &[String]) -> usize {
        texts.iter().filter(|text| self.is_vote(text)).count()
    }

    pub fn is_selected(&self, texts: &[String]) -> bool {
        texts.len() >= self.quorum && self.count_votes(texts) >= self.quorum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::html_stripper::ScraperStripper;
    use regex::RegexBuilder;

    fn filter() -> QuorumFilter {
        let vote = RegexBuilder::new("^(Y-|YES-)")
            .case_insensitive(true)
            .build()
            .unwrap();
        QuorumFilter::new(Arc::new(ScraperStripper), vote, 2)
    }

    fn texts(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_two_votes_among_three_notes() {
        let f = filter();
        assert!(f.is_selected(&texts(&["Y-approve", "NOTE-ignore", "YES-good"])));
    }

    #[test]
    fn test_single_note_never_selected() {
        let f = filter();
        assert!(!f.is_selected(&texts(&["Y-approve"])));
    }

    #[test]
    fn test_two_votes() {
        let f = filter();
        assert!(f.is_selected(&texts(&["Y-approve", "Y-again"])));
    }

    #[test]
    fn test_one_vote_among_three_notes() {
        let f = filter();
        assert!(!f.is_selected(&texts(&["Y-approve", "maybe", "NO-reject"])));
    }

    #[test]
    fn test_vote_marker_rules() {
        let f = filter();
        assert!(f.is_vote("y-fine"));
        assert!(f.is_vote("yes-fine"));
        assert!(!f.is_vote("Yes fine"));
        assert!(!f.is_vote("I say Y-"));
    }

    #[test]
    fn test_note_text_strips_html() {
        let f = filter();
        let note = Note {
            key: "N1".to_string(),
            html: "  <div data-schema-version=\"8\"><p>YES-solid study</p></div>\n".to_string(),
        };
        assert_eq!(f.note_text(&note), "YES-solid study");
        assert!(f.is_vote(&f.note_text(&note)));
    }
}
