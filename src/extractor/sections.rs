use std::collections::HashMap;

use serde::Serialize;

use crate::types::token::Token;

/// 第一个二级标题之前内容的归属节名
pub const INTRO_SECTION: &str = "intro";

/// 节名（小写标题文本）到累积正文的映射
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SectionMap {
    sections: HashMap<String, String>,
}

impl SectionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// 向指定节追加一个块，每个块另起一行，同名节按文档顺序拼接
    pub fn append(&mut self, section: &str, content: &str) {
        let entry = self.sections.entry(section.to_string()).or_default();
        entry.push('\n');
        entry.push_str(content);
    }

    pub fn get(&self, section: &str) -> Option<&str> {
        self.sections.get(section).map(String::as_str)
    }

    /// 按顺序返回第一个存在的节
    pub fn first_of(&self, candidates: &[&str]) -> Option<&str> {
        candidates.iter().find_map(|candidate| self.get(candidate))
    }

    /// 所有节名（已排序，便于日志输出）
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.sections.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// 将token序列按最近的二级标题分组
///
/// 每个段落/列表项只看紧随其后的一个token：必须是非空的行内文本，否则跳过。
/// 只有二级标题会移动当前节，其它层级的标题不影响归属。
pub fn aggregate(tokens: &[Token]) -> SectionMap {
    let mut sections = SectionMap::new();
    let mut current_section = INTRO_SECTION.to_string();

    for pair in tokens.windows(2) {
        let Some(content) = pair[1].inline_text() else {
            continue;
        };

        match &pair[0] {
            Token::HeadingOpen { level: 2 } => {
                current_section = content.to_lowercase();
            }
            // 段落和列表项各占一行，每一块都是独立的特性候选
            Token::Paragraph | Token::ListItemOpen => {
                sections.append(&current_section, content)
            }
            _ => {}
        }
    }

    sections
}
