use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::extractor::{ExtractionReport, ProfileExtractor};
use crate::github::{GitHubClient, RepoLocator, RepositorySource};
use crate::script::generate_script;
use crate::types::profile::{ProjectProfile, RawDocument, RepoMetadata};

/// 时间跟踪作用域
pub struct TimingScope {
    start_time: Instant,
    phase_start_times: Vec<(&'static str, Instant)>,
    phase_durations: Vec<(&'static str, Duration)>,
}

impl Default for TimingScope {
    fn default() -> Self {
        Self::new()
    }
}

impl TimingScope {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            phase_start_times: Vec::new(),
            phase_durations: Vec::new(),
        }
    }

    /// 开始一个新的阶段计时
    pub fn start_phase(&mut self, phase_name: &'static str) {
        self.phase_start_times.push((phase_name, Instant::now()));
    }

    /// 结束一个阶段的计时
    pub fn end_phase(&mut self, phase_name: &str) -> Option<Duration> {
        let index = self
            .phase_start_times
            .iter()
            .position(|(name, _)| *name == phase_name)?;
        let (name, start_time) = self.phase_start_times.remove(index);
        let duration = start_time.elapsed();
        self.phase_durations.push((name, duration));
        Some(duration)
    }

    pub fn phase_durations(&self) -> &[(&'static str, Duration)] {
        &self.phase_durations
    }

    /// 获取格式化的执行时间报告
    pub fn generate_timing_report(&self) -> String {
        let mut report = format!(
            "总执行时间: {:.3}秒\n",
            self.start_time.elapsed().as_secs_f64()
        );

        for (phase, duration) in &self.phase_durations {
            report.push_str(&format!("- {}: {:.3}秒\n", phase, duration.as_secs_f64()));
        }

        report
    }
}

/// 时间跟踪常量
pub struct TimingKeys;

impl TimingKeys {
    pub const FETCH: &'static str = "fetch";
    pub const EXTRACT: &'static str = "extract";
    pub const OUTPUT: &'static str = "output";
}

/// 输出文档：画像字段平铺，按需附带叙事脚本
#[derive(Debug, Serialize)]
pub struct ProfileOutput<'a> {
    #[serde(flatten)]
    pub profile: &'a ProjectProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
}

/// 从远端仓库获取元数据与README并提取画像
///
/// 元数据获取失败会返回错误；README在所有候选分支上都取不到时按空README处理，
/// 由提取器走兜底画像。
pub async fn profile_repository(
    source: &dyn RepositorySource,
    repo_url: &str,
    config: &Config,
    timing: &mut TimingScope,
) -> Result<ExtractionReport> {
    let locator = RepoLocator::parse(repo_url)?;

    timing.start_phase(TimingKeys::FETCH);
    let repo_info = source
        .fetch_metadata(&locator)
        .await
        .with_context(|| format!("Failed to fetch repo {}", locator))?;

    let readme = match source
        .fetch_readme(&locator, &config.github.branch_candidates)
        .await
    {
        Ok(readme) => readme,
        Err(e) => {
            warn!(repo = %locator, error = %e, "⚠️ README not found, continuing without it");
            String::new()
        }
    };
    timing.end_phase(TimingKeys::FETCH);

    let raw = RawDocument {
        name: repo_info.name,
        description: repo_info.description,
        readme,
    };
    let metadata = RepoMetadata {
        stars: repo_info.stargazers_count,
        url: repo_info.html_url,
    };

    timing.start_phase(TimingKeys::EXTRACT);
    let report = ProfileExtractor::new(config.extraction.clone()).run(&raw, &metadata);
    timing.end_phase(TimingKeys::EXTRACT);

    Ok(report)
}

/// 离线模式：从本地README文件提取画像
pub async fn profile_local_readme(
    path: &Path,
    config: &Config,
    timing: &mut TimingScope,
) -> Result<ExtractionReport> {
    timing.start_phase(TimingKeys::FETCH);
    let readme = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read README: {:?}", path))?;
    timing.end_phase(TimingKeys::FETCH);

    let name = config.get_project_name();
    let raw = RawDocument::new(
        name.as_str(),
        config.project_description.as_deref(),
        readme,
    );

    timing.start_phase(TimingKeys::EXTRACT);
    let report = ProfileExtractor::new(config.extraction.clone())
        .run(&raw, &RepoMetadata::placeholder(&name));
    timing.end_phase(TimingKeys::EXTRACT);

    Ok(report)
}

/// 序列化输出文档
pub fn render_output(profile: &ProjectProfile, config: &Config) -> Result<String> {
    let output = ProfileOutput {
        profile,
        script: config.generate_script.then(|| generate_script(profile)),
    };
    serde_json::to_string_pretty(&output).context("Failed to serialize project profile")
}

/// 启动画像提取工作流
pub async fn launch(config: &Config) -> Result<()> {
    let mut timing = TimingScope::new();

    let report = if let Some(readme_path) = &config.readme_path {
        profile_local_readme(readme_path, config, &mut timing).await?
    } else if let Some(repo_url) = &config.repo_url {
        let client = GitHubClient::new(config.github.clone())?;
        profile_repository(&client, repo_url, config, &mut timing).await?
    } else {
        bail!("Either a repository URL or --readme must be provided");
    };

    info!(
        name = %report.profile.name,
        state = %report.state,
        degraded = report.state.is_degraded(),
        "🎯 project profile ready"
    );

    timing.start_phase(TimingKeys::OUTPUT);
    let output = render_output(&report.profile, config)?;
    match &config.output_path {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create output directory: {:?}", parent))?;
            }
            tokio::fs::write(path, output)
                .await
                .with_context(|| format!("Failed to write profile: {:?}", path))?;
            info!(path = %path.display(), "💾 profile written");
        }
        None => println!("{}", output),
    }
    timing.end_phase(TimingKeys::OUTPUT);

    debug!("{}", timing.generate_timing_report());
    Ok(())
}

// Include tests
#[cfg(test)]
mod tests;
