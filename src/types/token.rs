use serde::{Deserialize, Serialize};

/// Markdown分词器产生的结构化token
///
/// 只保留分节聚合需要的几类结构，其余块级元素（代码块、HTML等）不产生token。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Token {
    /// 标题开始，携带层级（1-6）
    HeadingOpen { level: u8 },
    /// 紧随结构token之后的行内文本
    Inline { content: String },
    /// 段落开始
    Paragraph,
    /// 列表项开始
    ListItemOpen,
}

impl Token {
    /// 构造行内文本token
    pub fn inline(content: impl Into<String>) -> Self {
        Token::Inline {
            content: content.into(),
        }
    }

    /// 若为非空的行内文本，返回去除首尾空白后的内容
    pub fn inline_text(&self) -> Option<&str> {
        match self {
            Token::Inline { content } => {
                let trimmed = content.trim();
                (!trimmed.is_empty()).then_some(trimmed)
            }
            _ => None,
        }
    }
}
