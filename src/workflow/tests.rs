#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tempfile::TempDir;

    use crate::config::Config;
    use crate::extractor::ExtractionState;
    use crate::github::{FetchError, RepoInfo, RepoLocator, RepositorySource};
    use crate::workflow::{
        TimingKeys, TimingScope, launch, profile_local_readme, profile_repository, render_output,
    };

    const README: &str = r#"# Rocket

Rocket launches containers in seconds.

## What it solves

Slow cold starts on Kubernetes clusters.

## How it works

Snapshots warm containers with Docker checkpoints.

## Features

- Cold starts under a second
- Works with any OCI image
"#;

    /// 固定返回值的数据来源，记录被请求的分支
    struct StubSource {
        info: Option<RepoInfo>,
        readme: Option<String>,
        requested_branches: Mutex<Vec<String>>,
    }

    impl StubSource {
        fn new(readme: Option<&str>) -> Self {
            Self {
                info: Some(RepoInfo {
                    name: "rocket".to_string(),
                    description: Some("Container launcher".to_string()),
                    stargazers_count: 321,
                    html_url: "https://github.com/acme/rocket".to_string(),
                }),
                readme: readme.map(str::to_string),
                requested_branches: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl RepositorySource for StubSource {
        async fn fetch_metadata(&self, locator: &RepoLocator) -> Result<RepoInfo, FetchError> {
            self.info
                .clone()
                .ok_or_else(|| FetchError::NotFound(locator.full_name()))
        }

        async fn fetch_readme(
            &self,
            _locator: &RepoLocator,
            branches: &[String],
        ) -> Result<String, FetchError> {
            self.requested_branches
                .lock()
                .unwrap()
                .extend(branches.iter().cloned());
            self.readme.clone().ok_or(FetchError::ReadmeNotFound {
                tried: branches.to_vec(),
            })
        }
    }

    #[tokio::test]
    async fn test_profile_repository_full_pipeline() {
        let source = StubSource::new(Some(README));
        let config = Config::default();
        let mut timing = TimingScope::new();

        let report = profile_repository(&source, "https://github.com/acme/rocket", &config, &mut timing)
            .await
            .unwrap();
        let profile = report.profile;

        assert_eq!(report.state, ExtractionState::Normal);
        assert_eq!(profile.name, "rocket");
        assert_eq!(profile.description, "Container launcher");
        assert_eq!(profile.problem, "Slow cold starts on Kubernetes clusters.");
        assert_eq!(
            profile.solution,
            "Snapshots warm containers with Docker checkpoints."
        );
        assert_eq!(
            profile.features,
            vec!["Cold starts under a second", "Works with any OCI image"]
        );
        assert_eq!(profile.tech_stack, vec!["Docker", "Kubernetes"]);
        assert_eq!(profile.stars, 321);
        assert_eq!(profile.url, "https://github.com/acme/rocket");

        assert_eq!(
            *source.requested_branches.lock().unwrap(),
            vec!["main", "master"]
        );
        let phases: Vec<&str> = timing.phase_durations().iter().map(|(name, _)| *name).collect();
        assert_eq!(phases, vec![TimingKeys::FETCH, TimingKeys::EXTRACT]);
    }

    #[tokio::test]
    async fn test_missing_readme_degrades_to_fallback() {
        let source = StubSource::new(None);
        let config = Config::default();

        let report = profile_repository(
            &source,
            "https://github.com/acme/rocket",
            &config,
            &mut TimingScope::new(),
        )
        .await
        .unwrap();

        assert_eq!(report.state, ExtractionState::NoReadme);
        assert_eq!(report.profile.description, "Container launcher");
        assert_eq!(report.profile.stars, 321);
        assert_eq!(report.profile.readme_preview, "No README available");
    }

    #[tokio::test]
    async fn test_metadata_failure_propagates() {
        let mut source = StubSource::new(Some(README));
        source.info = None;

        let result = profile_repository(
            &source,
            "https://github.com/acme/rocket",
            &Config::default(),
            &mut TimingScope::new(),
        )
        .await;

        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to fetch repo acme/rocket"));
    }

    #[tokio::test]
    async fn test_invalid_repo_url_is_rejected() {
        let source = StubSource::new(Some(README));

        let result = profile_repository(
            &source,
            "https://example.com/not-github",
            &Config::default(),
            &mut TimingScope::new(),
        )
        .await;

        assert!(result.is_err());
        assert!(source.requested_branches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_custom_branch_candidates_are_used() {
        let source = StubSource::new(Some(README));
        let mut config = Config::default();
        config.github.branch_candidates = vec!["trunk".to_string()];

        profile_repository(
            &source,
            "https://github.com/acme/rocket",
            &config,
            &mut TimingScope::new(),
        )
        .await
        .unwrap();

        assert_eq!(*source.requested_branches.lock().unwrap(), vec!["trunk"]);
    }

    #[tokio::test]
    async fn test_profile_local_readme() {
        let temp_dir = TempDir::new().unwrap();
        let readme_path = temp_dir.path().join("README.md");
        std::fs::write(&readme_path, README).unwrap();

        let mut config = Config::default();
        config.project_name = Some("rocket".to_string());

        let report = profile_local_readme(&readme_path, &config, &mut TimingScope::new())
            .await
            .unwrap();

        assert_eq!(report.state, ExtractionState::Normal);
        assert_eq!(report.profile.name, "rocket");
        assert_eq!(
            report.profile.description,
            "Rocket launches containers in seconds."
        );
        assert_eq!(report.profile.url, "https://github.com/rocket");
        assert_eq!(report.profile.stars, 0);
    }

    #[tokio::test]
    async fn test_profile_local_readme_missing_file() {
        let result = profile_local_readme(
            std::path::Path::new("/nonexistent/README.md"),
            &Config::default(),
            &mut TimingScope::new(),
        )
        .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_render_output_camel_case_and_script() {
        let source = StubSource::new(Some(README));
        let mut config = Config::default();
        let report = profile_repository(
            &source,
            "https://github.com/acme/rocket",
            &config,
            &mut TimingScope::new(),
        )
        .await
        .unwrap();

        let without_script = render_output(&report.profile, &config).unwrap();
        let value: serde_json::Value = serde_json::from_str(&without_script).unwrap();
        assert!(value.get("techStack").is_some());
        assert!(value.get("readmePreview").is_some());
        assert!(value.get("script").is_none());

        config.generate_script = true;
        let with_script = render_output(&report.profile, &config).unwrap();
        let value: serde_json::Value = serde_json::from_str(&with_script).unwrap();
        let script = value["script"].as_str().unwrap();
        assert!(script.contains("Built with Docker, Kubernetes,"));
        assert!(script.contains("it solves Slow cold starts on Kubernetes clusters. in record time."));
    }

    #[tokio::test]
    async fn test_launch_writes_output_file() {
        let temp_dir = TempDir::new().unwrap();
        let readme_path = temp_dir.path().join("README.md");
        std::fs::write(&readme_path, README).unwrap();
        let output_path = temp_dir.path().join("out").join("profile.json");

        let mut config = Config::default();
        config.readme_path = Some(readme_path);
        config.project_name = Some("rocket".to_string());
        config.output_path = Some(output_path.clone());

        launch(&config).await.unwrap();

        let written = std::fs::read_to_string(&output_path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["name"], "rocket");
        assert_eq!(value["techStack"][0], "Docker");
    }

    #[tokio::test]
    async fn test_launch_requires_an_input() {
        let result = launch(&Config::default()).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_timing_scope_records_phases_in_order() {
        let mut timing = TimingScope::new();
        timing.start_phase(TimingKeys::FETCH);
        timing.start_phase(TimingKeys::EXTRACT);
        assert!(timing.end_phase(TimingKeys::EXTRACT).is_some());
        assert!(timing.end_phase(TimingKeys::FETCH).is_some());
        assert!(timing.end_phase(TimingKeys::OUTPUT).is_none());

        let report = timing.generate_timing_report();
        assert!(report.contains("- extract:"));
        assert!(report.contains("- fetch:"));
    }
}
