use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::ExtractionConfig;
use crate::types::profile::{ProjectProfile, RawDocument, RepoMetadata};

pub mod assembler;
pub mod heuristics;
pub mod sections;
pub mod tokenizer;

use heuristics::{ExtractedFields, TechVocabulary};
use tokenizer::{MarkdownTokenizer, Tokenizer};

/// 提取流水线内部的错误，全部在流水线内部恢复，不会返回给调用方
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("README too short: {length} chars (minimum {minimum})")]
    InputTooShort { length: usize, minimum: usize },

    #[error("markdown tokenizer unavailable: {0}")]
    CapabilityUnavailable(String),

    #[error("failed to parse README: {0}")]
    ParseFailure(String),
}

/// 一次提取最终所处的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionState {
    /// 完整流水线执行成功
    Normal,
    /// README缺失或过短
    NoReadme,
    /// 分词器加载失败
    TokenizerUnavailable,
    /// 分词、分节或提取过程中失败
    ExtractionFailed,
}

impl ExtractionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionState::Normal => "normal",
            ExtractionState::NoReadme => "no_readme",
            ExtractionState::TokenizerUnavailable => "tokenizer_unavailable",
            ExtractionState::ExtractionFailed => "extraction_failed",
        }
    }

    pub fn is_degraded(&self) -> bool {
        *self != ExtractionState::Normal
    }
}

impl std::fmt::Display for ExtractionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 提取结果：画像本身，以及用于观测的状态和被吞掉的错误
#[derive(Debug, Clone)]
pub struct ExtractionReport {
    pub profile: ProjectProfile,
    pub state: ExtractionState,
    pub error: Option<ExtractionError>,
}

/// 项目画像提取器
///
/// 分词器在构造时注入；加载失败也会被保存下来，并在每次运行时走降级路径。
/// 提取器本身不持有可变状态，可以在多个请求间共享。
#[derive(Debug)]
pub struct ProfileExtractor {
    tokenizer: Result<Box<dyn Tokenizer>, ExtractionError>,
    vocabulary: TechVocabulary,
    config: ExtractionConfig,
}

impl Default for ProfileExtractor {
    fn default() -> Self {
        Self::new(ExtractionConfig::default())
    }
}

impl ProfileExtractor {
    /// 使用默认的markdown分词器
    pub fn new(config: ExtractionConfig) -> Self {
        Self::with_loader(config, || {
            MarkdownTokenizer::load().map(|tokenizer| Box::new(tokenizer) as Box<dyn Tokenizer>)
        })
    }

    /// 注入指定的分词器
    pub fn with_tokenizer(config: ExtractionConfig, tokenizer: impl Tokenizer + 'static) -> Self {
        Self::with_loader(config, move || Ok(Box::new(tokenizer) as Box<dyn Tokenizer>))
    }

    /// 通过加载函数获取分词器，加载失败统一记为 `CapabilityUnavailable`
    pub fn with_loader<F>(config: ExtractionConfig, loader: F) -> Self
    where
        F: FnOnce() -> Result<Box<dyn Tokenizer>, ExtractionError>,
    {
        let tokenizer = loader().map_err(|e| match e {
            ExtractionError::CapabilityUnavailable(_) => e,
            other => ExtractionError::CapabilityUnavailable(other.to_string()),
        });

        match &tokenizer {
            Ok(tokenizer) => debug!(tokenizer = tokenizer.name(), "✅ markdown tokenizer loaded"),
            Err(e) => error!(
                state = %ExtractionState::TokenizerUnavailable,
                error = %e,
                "💥 markdown tokenizer failed to load"
            ),
        }

        Self {
            tokenizer,
            vocabulary: TechVocabulary::new(config.tech_keywords.as_slice()),
            config,
        }
    }

    pub fn is_tokenizer_available(&self) -> bool {
        self.tokenizer.is_ok()
    }

    /// 执行提取，任何输入都会得到完整的画像
    pub fn run(&self, raw: &RawDocument, metadata: &RepoMetadata) -> ExtractionReport {
        let readme_length = raw.readme.chars().count();
        debug!(name = %raw.name, readme_length, "🔧 extracting project profile");

        if readme_length < self.config.min_readme_length {
            let error = ExtractionError::InputTooShort {
                length: readme_length,
                minimum: self.config.min_readme_length,
            };
            warn!(
                state = %ExtractionState::NoReadme,
                name = %raw.name,
                readme_length,
                "⚠️ Skipping README parse: too short or missing"
            );
            return self.degraded(raw, metadata, ExtractionState::NoReadme, error, None);
        }

        let tokenizer = match &self.tokenizer {
            Ok(tokenizer) => tokenizer.as_ref(),
            Err(e) => {
                error!(
                    state = %ExtractionState::TokenizerUnavailable,
                    name = %raw.name,
                    error = %e,
                    "❌ markdown tokenizer unavailable, using fallback profile"
                );
                let tech_stack = self.scan_tech_stack(&raw.readme);
                return self.degraded(
                    raw,
                    metadata,
                    ExtractionState::TokenizerUnavailable,
                    e.clone(),
                    Some(tech_stack),
                );
            }
        };

        match self.extract_fields(tokenizer, &raw.readme) {
            Ok(fields) => {
                info!(
                    state = %ExtractionState::Normal,
                    name = %raw.name,
                    features = fields.features.len(),
                    tech_stack = fields.tech_stack.len(),
                    "✅ project profile extracted"
                );
                ExtractionReport {
                    profile: assembler::assemble(raw, metadata, fields, &self.config),
                    state: ExtractionState::Normal,
                    error: None,
                }
            }
            Err(e) => {
                error!(
                    state = %ExtractionState::ExtractionFailed,
                    name = %raw.name,
                    tokenizer = tokenizer.name(),
                    error = %e,
                    "❌ README extraction failed, using fallback profile"
                );
                let tech_stack = self.scan_tech_stack(&raw.readme);
                self.degraded(
                    raw,
                    metadata,
                    ExtractionState::ExtractionFailed,
                    e,
                    Some(tech_stack),
                )
            }
        }
    }

    /// 分词 → 分节 → 提取；分词器的panic同样转换为 `ParseFailure`
    fn extract_fields(
        &self,
        tokenizer: &dyn Tokenizer,
        readme: &str,
    ) -> Result<ExtractedFields, ExtractionError> {
        catch_unwind(AssertUnwindSafe(|| {
            let tokens = tokenizer.parse(readme)?;
            debug!(tokens = tokens.len(), "parsed README tokens");

            let sections = sections::aggregate(&tokens);
            debug!(sections = ?sections.keys(), "sections extracted");

            Ok(heuristics::extract(
                &sections,
                readme,
                &self.vocabulary,
                &self.config,
            ))
        }))
        .unwrap_or_else(|payload| Err(ExtractionError::ParseFailure(panic_message(payload))))
    }

    fn scan_tech_stack(&self, readme: &str) -> Vec<String> {
        self.vocabulary.scan(readme, self.config.max_tech_stack)
    }

    fn degraded(
        &self,
        raw: &RawDocument,
        metadata: &RepoMetadata,
        state: ExtractionState,
        error: ExtractionError,
        tech_stack: Option<Vec<String>>,
    ) -> ExtractionReport {
        ExtractionReport {
            profile: assembler::fallback(raw, metadata, tech_stack, &self.config),
            state,
            error: Some(error),
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "tokenizer panicked".to_string()
    }
}

/// 从仓库名称、描述和README得到项目画像
///
/// 不访问网络；star数为0，URL按名称推断。任何输入都不会失败。
pub fn extract_project_info(name: &str, description: Option<&str>, readme: &str) -> ProjectProfile {
    let raw = RawDocument::new(name, description, readme);
    let metadata = RepoMetadata::placeholder(name);
    ProfileExtractor::default().run(&raw, &metadata).profile
}
