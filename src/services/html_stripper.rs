//! HTML 转纯文本能力
//!
//! 只负责"把一段 HTML 变成可见文本"，可替换实现

use scraper::{Html, Node};

/// 不输出文本内容的元素
const INVISIBLE_ELEMENTS: [&str; 5] = ["head", "script", "style", "template", "noscript"];

/// HTML 转纯文本
pub trait HtmlStripper: Send + Sync {
    /// 返回可见文本；无法解析的标记尽量保留文本，不报错
    fn strip(&self, html: &str) -> String;
}

/// 基于 scraper（html5ever）的默认实现
#[derive(Debug, Default, Clone, Copy)]
pub struct ScraperStripper;

impl HtmlStripper for ScraperStripper {
    fn strip(&self, html: &str) -> String {
        let document = Html::parse_document(html);
        let mut text = String::with_capacity(html.len());

        for node in document.root_element().descendants() {
            let Node::Text(fragment) = node.value() else {
                continue;
            };
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| INVISIBLE_ELEMENTS.contains(&el.name()))
            });
            if !hidden {
                text.push_str(fragment);
            }
        }

        text
    }
}
