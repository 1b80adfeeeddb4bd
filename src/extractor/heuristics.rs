use std::collections::HashSet;

use regex::Regex;
use serde::Serialize;
use tracing::warn;

use super::sections::{INTRO_SECTION, SectionMap};
use crate::config::ExtractionConfig;

const DESCRIPTION_SECTIONS: &[&str] = &[INTRO_SECTION, "description"];
const PROBLEM_SECTIONS: &[&str] = &["problem", "what it solves"];
const SOLUTION_SECTIONS: &[&str] = &["solution", "how it works"];
const FEATURE_SECTIONS: &[&str] = &["features", "usage"];

/// 从分节和全文中提取出的画像字段
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractedFields {
    pub description: String,
    pub problem: String,
    pub solution: String,
    pub features: Vec<String>,
    pub tech_stack: Vec<String>,
}

/// 技术关键词词表，按声明顺序匹配
#[derive(Debug, Clone)]
pub struct TechVocabulary {
    keywords: Vec<(String, Regex)>,
}

impl TechVocabulary {
    /// 编译词表，空白或无法编译的关键词会被跳过
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Self {
        let keywords = keywords
            .iter()
            .map(|keyword| keyword.as_ref().trim())
            .filter(|keyword| !keyword.is_empty())
            .filter_map(|keyword| {
                match Regex::new(&whole_word_pattern(keyword)) {
                    Ok(regex) => Some((keyword.to_string(), regex)),
                    Err(e) => {
                        warn!(keyword, error = %e, "⚠️ 跳过无法编译的技术关键词");
                        None
                    }
                }
            })
            .collect();

        Self { keywords }
    }

    /// 扫描全文，返回命中的关键词（词表顺序，不是文档顺序）
    pub fn scan(&self, text: &str, limit: usize) -> Vec<String> {
        self.keywords
            .iter()
            .filter(|(_, regex)| regex.is_match(text))
            .map(|(keyword, _)| keyword.clone())
            .take(limit)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

/// 构造大小写不敏感的整词匹配模式
///
/// 关键词首尾不是单词字符时（如 ".NET"）`\b` 不成立，改用显式的非单词字符边界。
fn whole_word_pattern(keyword: &str) -> String {
    let is_word_char = |c: char| c.is_alphanumeric() || c == '_';
    let leading = match keyword.chars().next() {
        Some(c) if is_word_char(c) => r"\b",
        _ => r"(?:^|\W)",
    };
    let trailing = match keyword.chars().last() {
        Some(c) if is_word_char(c) => r"\b",
        _ => r"(?:$|\W)",
    };
    format!("(?i){}{}{}", leading, regex::escape(keyword), trailing)
}

/// 合并连续空白、去除首尾空白并截断到指定字符数
pub fn clean(text: &str, max_length: usize) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(max_length)
        .collect()
}

/// 从 features（或 usage）节拆分出特性列表
///
/// 按换行、连字符、星号切分，保留长度在 (min, max) 开区间内的候选，去重后保留前N条。
pub fn extract_features(sections: &SectionMap, config: &ExtractionConfig) -> Vec<String> {
    let source = sections.first_of(FEATURE_SECTIONS).unwrap_or_default();
    let mut seen = HashSet::new();

    source
        .split(['\n', '-', '*'])
        .map(str::trim)
        .filter(|candidate| {
            let length = candidate.chars().count();
            length > config.feature_min_length && length < config.feature_max_length
        })
        .filter(|candidate| seen.insert(*candidate))
        .take(config.max_features)
        .map(str::to_string)
        .collect()
}

/// 由分节结果和README全文得到画像字段
///
/// problem/solution 只看分节，不做全文兜底；技术栈总是扫描README全文。
pub fn extract(
    sections: &SectionMap,
    readme: &str,
    vocabulary: &TechVocabulary,
    config: &ExtractionConfig,
) -> ExtractedFields {
    let section_text = |candidates: &[&str]| {
        clean(
            sections.first_of(candidates).unwrap_or_default(),
            config.max_text_length,
        )
    };

    ExtractedFields {
        description: section_text(DESCRIPTION_SECTIONS),
        problem: section_text(PROBLEM_SECTIONS),
        solution: section_text(SOLUTION_SECTIONS),
        features: extract_features(sections, config),
        tech_stack: vocabulary.scan(readme, config.max_tech_stack),
    }
}
