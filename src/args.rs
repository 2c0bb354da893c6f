use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::config::Config;

// Global flags:
//   -c / --config      Path to a config.toml file
//   --gateway          Gateway base URL override
//   --plain            Line-oriented client instead of the TUI
//   -d / --debug       Frame-level logging (plain mode also echoes raw JSON)
//   --no-color         Disable coloured terminal output
#[derive(Debug, Clone, Parser)]
#[command(name = "wireline", version, about)]
pub struct Cli {
    /// Path to a config.toml file
    #[arg(short = 'c', long, value_name = "PATH", env = "WIRELINE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Settings directory (default: ~/.wireline)
    #[arg(long, value_name = "DIR", env = "WIRELINE_SETTINGS_DIR")]
    pub settings_dir: Option<String>,

    /// Gateway base URL (http(s):// or ws(s)://)
    #[arg(long = "gateway", value_name = "URL", env = "WIRELINE_GATEWAY")]
    pub gateway: Option<String>,

    /// Use the line-oriented client instead of the full-screen TUI
    #[arg(long, action = ArgAction::SetTrue)]
    pub plain: bool,

    /// Enable frame-level debug logging
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    pub debug: bool,

    /// Disable coloured terminal output
    #[arg(long = "no-color", action = ArgAction::SetTrue, env = "NO_COLOR")]
    pub no_color: bool,
}

impl Cli {
    pub fn config_path(&self) -> Option<PathBuf> {
        if let Some(config) = &self.config {
            return Some(config.clone());
        }
        if let Some(dir) = &self.settings_dir {
            let expanded = shellexpand::tilde(dir);
            return Some(PathBuf::from(expanded.as_ref()).join("config.toml"));
        }
        None
    }

    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(dir) = &self.settings_dir {
            let expanded = shellexpand::tilde(dir);
            config.settings_dir = PathBuf::from(expanded.as_ref());
        }
        if let Some(gateway) = &self.gateway {
            config.gateway_url = Some(gateway.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_flag_overrides_config() {
        let cli = Cli::parse_from(["wireline", "--gateway", "wss://gw.example.com"]);
        let mut config = Config::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.gateway_url.as_deref(), Some("wss://gw.example.com"));
    }

    #[test]
    fn settings_dir_implies_config_path() {
        let cli = Cli::parse_from(["wireline", "--settings-dir", "/tmp/wl"]);
        assert_eq!(
            cli.config_path().unwrap(),
            PathBuf::from("/tmp/wl/config.toml")
        );
    }

    #[test]
    fn explicit_config_path_wins() {
        let cli = Cli::parse_from([
            "wireline",
            "--settings-dir",
            "/tmp/wl",
            "-c",
            "/etc/wireline.toml",
        ]);
        assert_eq!(cli.config_path().unwrap(), PathBuf::from("/etc/wireline.toml"));
    }
}
