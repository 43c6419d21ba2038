use crate::cli_args::Cli;
use crate::language::Language;
use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;

pub const STORE_ENV: &str = "PRGPT_STORE";
pub const OUTPUT_LANGUAGE_ENV: &str = "PRGPT_OUTPUT_LANGUAGE";
pub const CONFIG_ENV: &str = "PRGPT_CONFIG";

/// Final resolved configuration for prgpt.
#[derive(Debug, Clone)]
pub struct Config {
    pub store_path: PathBuf,
    pub output_language: Language,
}

impl Config {
    /// Build the final config from CLI flags, environment, TOML file, and defaults.
    ///
    /// Precedence:
    ///   1. CLI flags (`--store`)
    ///   2. Env vars `PRGPT_STORE`, `PRGPT_OUTPUT_LANGUAGE`
    ///   3. TOML `~/.config/prgpt.toml` (or the file named by `PRGPT_CONFIG`)
    ///   4. Defaults (`~/.config/prgpt/storage.json`, zh-CN)
    pub fn from_sources(cli: &Cli) -> Result<Self> {
        let file_cfg = load_file_config()?.unwrap_or_default();
        resolve(cli.store.clone(), env_var(STORE_ENV), env_var(OUTPUT_LANGUAGE_ENV), file_cfg)
    }
}

fn resolve(
    store_cli: Option<PathBuf>,
    store_env: Option<String>,
    language_env: Option<String>,
    file_cfg: FileConfig,
) -> Result<Config> {
    let store_path = match store_cli
        .or_else(|| store_env.map(PathBuf::from))
        .or(file_cfg.store_path)
    {
        Some(path) => path,
        None => default_store_path().ok_or_else(|| {
            anyhow!("cannot locate a home directory; pass --store or set {STORE_ENV}")
        })?,
    };

    let output_language = match language_env.or(file_cfg.output_language) {
        Some(tag) => tag
            .parse::<Language>()
            .with_context(|| "invalid output language in environment or config file")?,
        None => Language::default(),
    };

    Ok(Config {
        store_path,
        output_language,
    })
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    /// Where profiles and the UI language are kept.
    store_path: Option<PathBuf>,
    /// Default language for generated PR text.
    output_language: Option<String>,
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Return `~/.config/prgpt.toml`
fn config_path() -> Option<PathBuf> {
    if let Some(path) = env_var(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    let home = dirs::home_dir()?;
    Some(home.join(".config").join("prgpt.toml"))
}

fn default_store_path() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    Some(home.join(".config").join("prgpt").join("storage.json"))
}

fn load_file_config() -> Result<Option<FileConfig>> {
    let Some(path) = config_path() else {
        return Ok(None);
    };
    if !path.exists() {
        return Ok(None);
    }

    let data =
        fs::read_to_string(&path).with_context(|| format!("failed to read {:?}", path))?;
    let cfg = toml::from_str::<FileConfig>(&data)
        .with_context(|| format!("failed to parse {:?}", path))?;
    log::debug!("Loaded config file {:?}", path);
    Ok(Some(cfg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_beats_env_beats_file() {
        let file_cfg = FileConfig {
            store_path: Some("/file/storage.json".into()),
            output_language: Some("ja".into()),
        };
        let cfg = resolve(
            Some("/cli/storage.json".into()),
            Some("/env/storage.json".into()),
            Some("en".into()),
            file_cfg,
        )
        .unwrap();
        assert_eq!(cfg.store_path, PathBuf::from("/cli/storage.json"));
        assert_eq!(cfg.output_language, Language::En);

        let file_cfg = FileConfig {
            store_path: Some("/file/storage.json".into()),
            output_language: Some("ja".into()),
        };
        let cfg = resolve(None, None, None, file_cfg).unwrap();
        assert_eq!(cfg.store_path, PathBuf::from("/file/storage.json"));
        assert_eq!(cfg.output_language, Language::Ja);
    }

    #[test]
    fn defaults_to_simplified_chinese() {
        let cfg = resolve(Some("/s.json".into()), None, None, FileConfig::default()).unwrap();
        assert_eq!(cfg.output_language, Language::ZhCn);
    }

    #[test]
    fn rejects_unknown_language() {
        let err = resolve(Some("/s.json".into()), Some("x".into()), Some("fr".into()), FileConfig::default())
            .unwrap_err();
        assert!(format!("{err:#}").contains("fr"));
    }

    #[test]
    fn parses_toml_file() {
        let cfg: FileConfig =
            toml::from_str("store_path = \"/tmp/prgpt.json\"\noutput_language = \"ko\"\n").unwrap();
        assert_eq!(cfg.store_path, Some(PathBuf::from("/tmp/prgpt.json")));
        assert_eq!(cfg.output_language.as_deref(), Some("ko"));
    }
}
