use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

/// 默认技术关键词词表，结果按此顺序输出
pub const DEFAULT_TECH_KEYWORDS: &[&str] = &[
    "React",
    "Next.js",
    "Node.js",
    "TypeScript",
    "Tailwind",
    "Docker",
    "PostgreSQL",
    "Redis",
    "AWS",
    "Kubernetes",
    "Prisma",
    "Zod",
    "Clerk",
    "WebRTC",
    "Socket.IO",
    "Kafka",
    "FFmpeg",
    "Pika",
    "ElevenLabs",
];

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Config {
    /// 仓库地址，例如 https://github.com/owner/repo
    pub repo_url: Option<String>,

    /// 本地README路径（离线模式，不访问网络）
    pub readme_path: Option<PathBuf>,

    /// 项目名称，离线模式下使用
    pub project_name: Option<String>,

    /// 项目描述，离线模式下使用
    pub project_description: Option<String>,

    /// 输出路径，未设置时输出到标准输出
    pub output_path: Option<PathBuf>,

    /// 是否同时生成叙事脚本
    pub generate_script: bool,

    /// 提取规则配置
    pub extraction: ExtractionConfig,

    /// GitHub访问配置
    pub github: GitHubConfig,

    /// 是否启用详细日志
    pub verbose: bool,
}

/// 提取规则配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ExtractionConfig {
    /// README最短长度（字符），低于该值直接使用兜底画像
    pub min_readme_length: usize,

    /// 自由文本字段的最大长度
    pub max_text_length: usize,

    /// README预览长度
    pub preview_length: usize,

    /// 特性列表最大条数
    pub max_features: usize,

    /// 特性候选的长度下界（不含）
    pub feature_min_length: usize,

    /// 特性候选的长度上界（不含）
    pub feature_max_length: usize,

    /// 技术栈最大项数
    pub max_tech_stack: usize,

    /// 技术关键词词表
    pub tech_keywords: Vec<String>,
}

/// GitHub访问配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct GitHubConfig {
    /// REST API基地址
    pub api_base_url: String,

    /// 原始文件基地址
    pub raw_base_url: String,

    /// 访问令牌
    pub token: Option<String>,

    /// 依次尝试的README分支
    pub branch_candidates: Vec<String>,

    /// 超时时间（秒）
    pub timeout_seconds: u64,

    pub user_agent: String,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// 获取项目名称，优先使用配置的project_name，否则从README文件名推断
    pub fn get_project_name(&self) -> String {
        if let Some(ref name) = self.project_name
            && !name.trim().is_empty()
        {
            return name.clone();
        }

        self.infer_project_name()
    }

    /// 以README所在目录名作为项目名称
    fn infer_project_name(&self) -> String {
        self.readme_path
            .as_ref()
            .and_then(|path| path.canonicalize().ok())
            .and_then(|path| {
                path.parent()
                    .and_then(|dir| dir.file_name())
                    .map(|name| name.to_string_lossy().to_string())
            })
            .unwrap_or_else(|| "project".to_string())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repo_url: None,
            readme_path: None,
            project_name: None,
            project_description: None,
            output_path: None,
            generate_script: false,
            extraction: ExtractionConfig::default(),
            github: GitHubConfig::default(),
            verbose: false,
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_readme_length: 50,
            max_text_length: 500,
            preview_length: 200,
            max_features: 5,
            feature_min_length: 10,
            feature_max_length: 100,
            max_tech_stack: 6,
            tech_keywords: DEFAULT_TECH_KEYWORDS
                .iter()
                .map(|keyword| keyword.to_string())
                .collect(),
        }
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::from("https://api.github.com"),
            raw_base_url: String::from("https://raw.githubusercontent.com"),
            token: std::env::var("GITHUB_TOKEN")
                .ok()
                .filter(|token| !token.is_empty()),
            branch_candidates: vec!["main".to_string(), "master".to_string()],
            timeout_seconds: 30,
            user_agent: format!("repo-profile/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
