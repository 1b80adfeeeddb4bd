use crate::config::Config;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

const DEFAULT_CONFIG_FILE: &str = "repo-profile.toml";

/// repo-profile - 从仓库元数据和README提取项目画像
#[derive(Parser, Debug)]
#[command(name = "repo-profile")]
#[command(
    about = "Extracts a normalized project profile (description, problem, solution, features, tech stack) from a GitHub repository or a local README."
)]
#[command(version)]
pub struct Args {
    /// 仓库地址，例如 https://github.com/owner/repo
    pub repo_url: Option<String>,

    /// 本地README路径（离线模式）
    #[arg(short, long, conflicts_with = "repo_url")]
    pub readme: Option<PathBuf>,

    /// 项目名称（离线模式）
    #[arg(short, long)]
    pub name: Option<String>,

    /// 项目描述（离线模式）
    #[arg(short, long)]
    pub description: Option<String>,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 输出路径，未指定时输出到标准输出
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 同时生成叙事脚本
    #[arg(long)]
    pub script: bool,

    /// README候选分支，可重复指定，按顺序尝试
    #[arg(long = "branch")]
    pub branches: Vec<String>,

    /// GitHub访问令牌
    #[arg(long)]
    pub github_token: Option<String>,

    /// README最短长度
    #[arg(long)]
    pub min_readme_length: Option<usize>,

    /// 是否启用详细日志
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// 将CLI参数转换为配置
    pub fn into_config(self) -> Result<Config> {
        let mut config = if let Some(config_path) = &self.config {
            // 显式指定的配置文件必须可读
            Config::from_file(config_path)
                .with_context(|| format!("无法读取配置文件 {:?}", config_path))?
        } else {
            let default_config_path = std::env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(DEFAULT_CONFIG_FILE);

            if default_config_path.exists() {
                Config::from_file(&default_config_path)
                    .with_context(|| format!("无法读取默认配置文件 {:?}", default_config_path))?
            } else {
                Config::default()
            }
        };

        // 覆盖配置文件中的设置
        if let Some(repo_url) = self.repo_url {
            config.repo_url = Some(repo_url);
        }
        if let Some(readme) = self.readme {
            config.readme_path = Some(readme);
        }
        if let Some(name) = self.name {
            config.project_name = Some(name);
        }
        if let Some(description) = self.description {
            config.project_description = Some(description);
        }
        if let Some(output) = self.output {
            config.output_path = Some(output);
        }
        if self.script {
            config.generate_script = true;
        }

        // 覆盖GitHub配置
        if !self.branches.is_empty() {
            config.github.branch_candidates = self.branches;
        }
        if let Some(token) = self.github_token.filter(|token| !token.is_empty()) {
            config.github.token = Some(token);
        }

        // 覆盖提取配置
        if let Some(min_readme_length) = self.min_readme_length {
            config.extraction.min_readme_length = min_readme_length;
        }

        config.verbose = config.verbose || self.verbose;

        Ok(config)
    }
}
