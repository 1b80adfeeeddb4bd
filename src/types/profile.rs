use serde::{Deserialize, Serialize};

/// 单次请求提供的原始输入
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDocument {
    /// 仓库名称
    pub name: String,
    /// 仓库托管平台上的描述，可能为空
    pub description: Option<String>,
    /// README原文
    pub readme: String,
}

impl RawDocument {
    pub fn new(name: impl Into<String>, description: Option<&str>, readme: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.map(str::to_string),
            readme: readme.into(),
        }
    }

    /// 调用方显式提供的非空描述
    pub fn explicit_description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .filter(|description| !description.trim().is_empty())
    }
}

/// 仓库托管平台提供的元数据（star数、规范URL）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoMetadata {
    pub stars: u64,
    pub url: String,
}

impl RepoMetadata {
    /// 没有远端元数据时使用的占位值
    pub fn placeholder(name: &str) -> Self {
        Self {
            stars: 0,
            url: format!("https://github.com/{}", name),
        }
    }
}

/// 提取流水线的唯一输出
///
/// 所有字段在任何降级路径下都必须存在，下游的叙事脚本生成器会原样消费它。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectProfile {
    pub name: String,
    pub description: String,
    pub problem: String,
    pub solution: String,
    /// 最多5条，每条长度在10到100个字符之间
    pub features: Vec<String>,
    /// 最多6项，按词表声明顺序排列
    pub tech_stack: Vec<String>,
    pub stars: u64,
    pub url: String,
    /// README前200个字符
    pub readme_preview: String,
}
