//! Init command implementation
//!
//! Writes a `hub.toml` holding the built-in defaults and a matching
//! `.env.example` listing every environment variable the config refers to.

use super::output::{Mark, Output};
use crate::utils::toml_config::HubConfig;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of the init operation
#[derive(Debug)]
pub enum InitResult {
    /// Initialization completed successfully
    Success,
    /// hub.toml already exists and `--force` was not given
    AlreadyExists,
    /// An error occurred during initialization
    Error(String),
}

/// Configuration for the init command
pub struct InitConfig {
    /// Directory to initialize
    pub path: PathBuf,
    /// Overwrite existing files
    pub force: bool,
}

const TOML_HEADER: &str = "\
# Agent Hub configuration
#
# Secrets are never stored here: providers name the environment variable
# holding their API key, and the admin password is read from auth.admin_password_env.

";

/// Run the init command
pub fn run(config: InitConfig, output: &Output) -> InitResult {
    output.banner();
    output.section("Initializing Agent Hub");

    let base_path = &config.path;
    let config_path = base_path.join("hub.toml");
    if config_path.exists() && !config.force {
        output.line(Mark::Warn, "hub.toml already exists!");
        output.line(Mark::Note, "Use --force to overwrite existing files");
        return InitResult::AlreadyExists;
    }

    if let Err(e) = fs::create_dir_all(base_path) {
        output.line(
            Mark::Fail,
            &format!("Failed to create {}: {}", base_path.display(), e),
        );
        return InitResult::Error(e.to_string());
    }

    let defaults = HubConfig::default();
    let toml_content = match generate_hub_toml(&defaults) {
        Ok(content) => content,
        Err(e) => {
            output.line(Mark::Fail, &format!("Failed to render hub.toml: {}", e));
            return InitResult::Error(e);
        }
    };
    if let Err(e) = write_file(&config_path, &toml_content, config.force) {
        output.line(Mark::Fail, &format!("Failed to create hub.toml: {}", e));
        return InitResult::Error(e.to_string());
    }
    output.line(Mark::Done, "Created hub.toml");

    let env_path = base_path.join(".env.example");
    if env_path.exists() && !config.force {
        output.line(Mark::Skip, ".env.example (already exists)");
    } else if let Err(e) = write_file(&env_path, &generate_env_example(&defaults), config.force) {
        output.line(Mark::Warn, &format!("Failed to create .env.example: {}", e));
    } else {
        output.line(Mark::Done, "Created .env.example");
    }

    output.line(Mark::Done, "Project initialized");
    output.next_steps(&["cp .env.example .env", "agent-hub"]);

    InitResult::Success
}

fn write_file(path: &Path, content: &str, force: bool) -> std::io::Result<()> {
    if path.exists() && !force {
        return Ok(());
    }
    fs::write(path, content)
}

fn generate_hub_toml(config: &HubConfig) -> Result<String, String> {
    let body = config.to_toml_string().map_err(|e| e.to_string())?;
    Ok(format!("{}{}", TOML_HEADER, body))
}

fn generate_env_example(config: &HubConfig) -> String {
    let provider_envs: BTreeSet<&str> = config
        .providers
        .values()
        .map(|p| p.api_key_env())
        .collect();

    let mut content = String::from("# Provider API keys; agents without a key are skipped\n");
    for env in provider_envs {
        content.push_str(&format!("{}=\n", env));
    }
    content.push_str("\n# Enables /api/keys when set\n");
    content.push_str(&format!("{}=\n", config.auth.admin_password_env));
    content.push_str("\n# Overrides server.log_level\n# RUST_LOG=agent_hub=debug,tower_http=debug\n");
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn init_config(temp_dir: &TempDir, force: bool) -> InitConfig {
        InitConfig {
            path: temp_dir.path().to_path_buf(),
            force,
        }
    }

    #[test]
    fn test_generated_toml_loads_back() {
        let content = generate_hub_toml(&HubConfig::default()).unwrap();
        assert!(content.starts_with("# Agent Hub configuration"));
        let parsed = HubConfig::from_toml_str(&content).unwrap();
        assert_eq!(parsed, HubConfig::default());
    }

    #[test]
    fn test_env_example_lists_every_secret() {
        let content = generate_env_example(&HubConfig::default());
        for env in [
            "OPENAI_API_KEY=",
            "ANTHROPIC_API_KEY=",
            "PERPLEXITY_API_KEY=",
            "HUB_ADMIN_PASSWORD=",
        ] {
            assert!(content.contains(env), "missing {}", env);
        }
    }

    #[test]
    fn test_run_creates_files() {
        let temp_dir = TempDir::new().unwrap();
        let result = run(init_config(&temp_dir, false), &Output::no_color());

        assert!(matches!(result, InitResult::Success));
        assert!(temp_dir.path().join("hub.toml").exists());
        assert!(temp_dir.path().join(".env.example").exists());
    }

    #[test]
    fn test_run_already_exists_without_force() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("hub.toml"), "# mine").unwrap();

        let result = run(init_config(&temp_dir, false), &Output::no_color());

        assert!(matches!(result, InitResult::AlreadyExists));
        let content = fs::read_to_string(temp_dir.path().join("hub.toml")).unwrap();
        assert_eq!(content, "# mine");
    }

    #[test]
    fn test_run_force_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("hub.toml"), "# mine").unwrap();

        let result = run(init_config(&temp_dir, true), &Output::no_color());

        assert!(matches!(result, InitResult::Success));
        let content = fs::read_to_string(temp_dir.path().join("hub.toml")).unwrap();
        assert!(content.contains("[server]"));
    }
}
