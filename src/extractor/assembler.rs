use super::heuristics::{ExtractedFields, clean};
use crate::config::ExtractionConfig;
use crate::types::profile::{ProjectProfile, RawDocument, RepoMetadata};

const FALLBACK_DESCRIPTION: &str = "A powerful open-source project";
const FALLBACK_PROBLEM: &str = "Solves common development challenges";
const FALLBACK_SOLUTION: &str = "With clean, scalable architecture";
const FALLBACK_FEATURES: &[&str] = &[
    "Fast and reliable performance",
    "Well-documented codebase",
    "Open source and community driven",
];
const FALLBACK_TECH_STACK: &[&str] = &["JavaScript", "TypeScript", "Node.js"];
const MISSING_README_PREVIEW: &str = "No README available";

/// 合并提取结果与仓库元数据，得到最终画像
pub fn assemble(
    raw: &RawDocument,
    metadata: &RepoMetadata,
    extracted: ExtractedFields,
    config: &ExtractionConfig,
) -> ProjectProfile {
    let description = raw
        .explicit_description()
        .map(|description| clean(description, config.max_text_length))
        .unwrap_or(extracted.description);

    ProjectProfile {
        name: raw.name.clone(),
        description,
        problem: extracted.problem,
        solution: extracted.solution,
        features: extracted.features,
        tech_stack: extracted.tech_stack,
        stars: metadata.stars,
        url: metadata.url.clone(),
        readme_preview: readme_preview(&raw.readme, config.preview_length),
    }
}

/// 兜底画像
///
/// 所有降级路径共用同一形状；`tech_stack` 为 `None` 时（README根本不可读）使用固定默认列表。
pub fn fallback(
    raw: &RawDocument,
    metadata: &RepoMetadata,
    tech_stack: Option<Vec<String>>,
    config: &ExtractionConfig,
) -> ProjectProfile {
    let description = raw
        .explicit_description()
        .map(|description| clean(description, config.max_text_length))
        .unwrap_or_else(|| FALLBACK_DESCRIPTION.to_string());

    let tech_stack = tech_stack
        .filter(|stack| !stack.is_empty())
        .unwrap_or_else(default_tech_stack);

    let readme_preview = if raw.readme.trim().is_empty() {
        MISSING_README_PREVIEW.to_string()
    } else {
        readme_preview(&raw.readme, config.preview_length)
    };

    ProjectProfile {
        name: raw.name.clone(),
        description,
        problem: FALLBACK_PROBLEM.to_string(),
        solution: FALLBACK_SOLUTION.to_string(),
        features: FALLBACK_FEATURES.iter().map(|f| f.to_string()).collect(),
        tech_stack,
        stars: metadata.stars,
        url: metadata.url.clone(),
        readme_preview,
    }
}

pub fn default_tech_stack() -> Vec<String> {
    FALLBACK_TECH_STACK.iter().map(|t| t.to_string()).collect()
}

/// README前N个字符
pub fn readme_preview(readme: &str, length: usize) -> String {
    readme.chars().take(length).collect()
}
