//! Default configuration values

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "upm-release.toml";

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "upm-release.yaml";

/// Get list of config file names to search for
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_TOML,
        DEFAULT_CONFIG_YAML,
        ".upm-release.toml",
        ".upm-release.yaml",
    ]
}

/// Default configuration template
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# upm-release configuration

[release]
package_json = "**/Packages/**/package.json"
split_branch = "upm"
title = "{name} {version}"
remote = "origin"

[git]
user_name = "github-actions[bot]"
user_email = "github-actions[bot]@users.noreply.github.com"
fetch_tags = true

[unity]
extra_args = []
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_template_parses_to_defaults() {
        let config: Config = toml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        let defaults = Config::default();
        assert_eq!(config.release.package_json, defaults.release.package_json);
        assert_eq!(config.release.split_branch, defaults.release.split_branch);
        assert_eq!(config.git.user_email, defaults.git.user_email);
    }
}
