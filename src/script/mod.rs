use crate::types::profile::ProjectProfile;

const TECH_HIGHLIGHTS: usize = 3;
const DEFAULT_TECH_PHRASE: &str = "cutting-edge tech";
const DEFAULT_PROBLEM_PHRASE: &str = "real-world problems";

/// 根据项目画像生成固定模板的叙事脚本
///
/// 只使用画像中的名称、前三项技术栈和问题描述，不含随机成分，相同输入得到相同脚本。
pub fn generate_script(profile: &ProjectProfile) -> String {
    let tech = profile
        .tech_stack
        .iter()
        .take(TECH_HIGHLIGHTS)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let tech = if tech.is_empty() {
        DEFAULT_TECH_PHRASE
    } else {
        tech.as_str()
    };

    let problem = if profile.problem.trim().is_empty() {
        DEFAULT_PROBLEM_PHRASE
    } else {
        profile.problem.as_str()
    };

    [
        "A new era begins...".to_string(),
        format!("{} isn't just another tool. It's a revolution.", profile.name),
        format!("Built with {},", tech),
        format!("it solves {} in record time.", problem),
        "This isn't code. It's magic.".to_string(),
        "[CODE GLITCH] [MUSIC SWELL]".to_string(),
        "Star the repo. Join the movement.".to_string(),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(tech_stack: &[&str], problem: &str) -> ProjectProfile {
        ProjectProfile {
            name: "rocket".to_string(),
            description: "Launches things".to_string(),
            problem: problem.to_string(),
            solution: String::new(),
            features: vec![],
            tech_stack: tech_stack.iter().map(|t| t.to_string()).collect(),
            stars: 7,
            url: "https://github.com/acme/rocket".to_string(),
            readme_preview: String::new(),
        }
    }

    #[test]
    fn test_script_uses_first_three_technologies() {
        let script = generate_script(&profile(
            &["React", "Next.js", "Node.js", "Docker"],
            "slow deploys",
        ));

        assert!(script.starts_with("A new era begins..."));
        assert!(script.contains("rocket isn't just another tool."));
        assert!(script.contains("Built with React, Next.js, Node.js,"));
        assert!(!script.contains("Docker"));
        assert!(script.contains("it solves slow deploys in record time."));
        assert!(script.ends_with("Star the repo. Join the movement."));
    }

    #[test]
    fn test_script_defaults_for_empty_fields() {
        let script = generate_script(&profile(&[], "  "));

        assert!(script.contains("Built with cutting-edge tech,"));
        assert!(script.contains("it solves real-world problems in record time."));
    }

    #[test]
    fn test_script_is_deterministic() {
        let profile = profile(&["Rust"], "flaky builds");
        assert_eq!(generate_script(&profile), generate_script(&profile));
        assert_eq!(generate_script(&profile).lines().count(), 7);
    }
}
