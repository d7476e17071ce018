use anyhow::{anyhow, Result};
use config::Config;
use std::collections::HashMap;
use std::path::Path;

use crate::dialect::Dialect;
use crate::extract::{Technique, TechniqueSelector};

pub struct ProbeConfig {
    /// Path to the directory holding catalog snapshots
    pub data_dir: String,

    /// Built-in dialect name (default: sqlite)
    pub dialect: String,

    /// Optional TOML file with a custom dialect; wins over `dialect`
    pub dialect_file: Option<String>,

    /// Techniques confirmed usable against the target
    pub techniques: Vec<Technique>,

    /// Unrestricted direct access to the target
    pub direct: bool,

    /// SQLite target used by the bundled extractor
    pub target: Option<String>,
}

const EMPTY_CONFIG: &str = r#"### schemaprobe configuration file

### directory for catalog snapshots written by `schemaprobe dump`
# data_dir = "~/.schemaprobe"

### target dialect: built-in name, or a TOML file with custom templates
### the bundled extractor talks to SQLite targets only
# dialect = "sqlite"
# dialect_file = "/path/to/dialect.toml"

### techniques confirmed usable against the target (comma separated)
### union and error return rows directly; boolean, time and stacked are inferential
# techniques = "union,boolean"

### unrestricted direct access to the target
# direct = false

### SQLite database enumerated by the bundled extractor
# target = "/path/to/target.db"
"#;

impl Default for ProbeConfig {
    fn default() -> Self {
        let home_dir = dirs::home_dir()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|| ".".to_string());

        Self {
            data_dir: format!("{}/.schemaprobe", home_dir),
            dialect: "sqlite".to_string(),
            dialect_file: None,
            techniques: Vec::new(),
            direct: false,
            target: None,
        }
    }
}

impl ProbeConfig {
    /// Load the configuration file (creating a template when missing) and
    /// layer `SCHEMAPROBE_*` environment variables on top
    pub fn new(path: &Option<String>) -> Result<ProbeConfig> {
        let mut builder = Config::builder();

        match path {
            Some(p) => {
                if Path::new(p.as_str()).exists() {
                    builder = builder.add_source(config::File::with_name(p.as_str()));
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG)
                        .map_err(|e| anyhow!("Unable to create config file: {}", e))?;
                }
            }
            None => {
                let probe_dir = Self::default().data_dir;
                std::fs::create_dir_all(probe_dir.as_str())
                    .map_err(|e| anyhow!("Unable to create schemaprobe directory: {}", e))?;
                let p = Self::config_file_path();
                if Path::new(p.as_str()).exists() {
                    builder = builder.add_source(config::File::with_name(p.as_str()));
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG).map_err(|e| {
                        anyhow!("Unable to create config file {}: {}", p.as_str(), e)
                    })?;
                }
            }
        }

        // E.g., `SCHEMAPROBE_DIALECT=sqlite schemaprobe dbs`
        builder = builder.add_source(config::Environment::with_prefix("SCHEMAPROBE"));

        let settings = builder
            .build()
            .map_err(|e| anyhow!("Failed to build configuration: {}", e))?;

        let config = settings
            .try_deserialize::<HashMap<String, String>>()
            .map_err(|e| anyhow!("Failed to deserialize configuration: {}", e))?;

        Self::from_map(&config)
    }

    fn from_map(config: &HashMap<String, String>) -> Result<ProbeConfig> {
        let defaults = Self::default();

        let data_dir = config
            .get("data_dir")
            .map(|p| expand_home(p))
            .unwrap_or(defaults.data_dir);

        let dialect = config
            .get("dialect")
            .map(|d| d.trim().to_lowercase())
            .filter(|d| !d.is_empty())
            .unwrap_or(defaults.dialect);

        let dialect_file = config
            .get("dialect_file")
            .filter(|p| !p.trim().is_empty())
            .map(|p| expand_home(p));

        let techniques = match config.get("techniques") {
            Some(list) => parse_techniques(list)?,
            None => defaults.techniques,
        };

        let direct = match config.get("direct") {
            Some(v) => parse_bool(v)
                .ok_or_else(|| anyhow!("Invalid value for 'direct': '{}'", v))?,
            None => defaults.direct,
        };

        let target = config
            .get("target")
            .filter(|p| !p.trim().is_empty())
            .map(|p| expand_home(p));

        Ok(ProbeConfig {
            data_dir,
            dialect,
            dialect_file,
            techniques,
            direct,
            target,
        })
    }

    /// Resolve the configured dialect
    pub fn load_dialect(&self) -> Result<Dialect> {
        Dialect::resolve(&self.dialect, self.dialect_file.as_deref())
    }

    /// Resolve the configured dialect for the bundled SQLite extractor
    ///
    /// Built-in dialects other than `sqlite` query catalogs SQLite does not
    /// have and are rejected. Dialect files are taken as they are.
    pub fn load_target_dialect(&self) -> Result<Dialect> {
        let dialect = self.load_dialect()?;
        if self.dialect_file.is_none() && dialect.name != "sqlite" {
            return Err(anyhow!(
                "The {} dialect cannot run against a SQLite target; use --dialect sqlite or a dialect file",
                dialect.name
            ));
        }
        Ok(dialect)
    }

    /// Technique selector for the configured techniques
    pub fn selector(&self) -> TechniqueSelector {
        TechniqueSelector::new(self.techniques.iter().copied()).with_direct_access(self.direct)
    }

    /// Where `dump` writes the catalog snapshot
    pub fn snapshot_path(&self) -> String {
        format!(
            "{}/catalog-{}.json",
            self.data_dir.trim_end_matches('/'),
            self.dialect
        )
    }

    /// Display configuration summary
    pub fn summary(&self) -> String {
        let techniques = if self.techniques.is_empty() {
            "(none)".to_string()
        } else {
            self.techniques
                .iter()
                .map(|t| t.name())
                .collect::<Vec<_>>()
                .join(", ")
        };
        let strategies = self
            .selector()
            .select_strategies()
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(" -> ");

        let mut lines = vec![
            format!("Data Directory:     {}", self.data_dir),
            format!("Dialect:            {}", self.dialect),
        ];
        if let Some(file) = &self.dialect_file {
            lines.push(format!("Dialect File:       {}", file));
        }
        lines.push(format!("Techniques:         {}", techniques));
        lines.push(format!("Direct Access:      {}", self.direct));
        lines.push(format!("Strategy Order:     {}", strategies));
        lines.push(format!(
            "Target:             {}",
            self.target.as_deref().unwrap_or("(not set)")
        ));

        lines.join("\n")
    }

    /// Get the config file path
    pub fn config_file_path() -> String {
        let home_dir = dirs::home_dir()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|| "~".to_string());
        format!("{}/.schemaprobe/schemaprobe.toml", home_dir)
    }
}

/// Parse a comma-separated technique list
pub fn parse_techniques(list: &str) -> Result<Vec<Technique>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<Technique>().map_err(|e| anyhow!(e)))
        .collect()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn expand_home(path: &str) -> String {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => format!("{}/{}", home.to_string_lossy(), rest),
        _ => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Strategy;
    use tempfile::TempDir;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = ProbeConfig::from_map(&HashMap::new()).unwrap();
        assert_eq!(config.dialect, "sqlite");
        assert_eq!(config.load_target_dialect().unwrap().name, "sqlite");
        assert!(config.techniques.is_empty());
        assert!(!config.direct);
        assert!(config.data_dir.ends_with(".schemaprobe"));
        assert_eq!(config.selector().select_strategies(), vec![Strategy::Inferential]);
    }

    #[test]
    fn test_from_map() {
        let config = ProbeConfig::from_map(&map(&[
            ("data_dir", "/test/dir/"),
            ("dialect", " SQLite "),
            ("techniques", "u, b"),
            ("direct", "no"),
            ("target", "/srv/target.db"),
        ]))
        .unwrap();

        assert_eq!(config.dialect, "sqlite");
        assert_eq!(config.techniques, vec![Technique::Union, Technique::Boolean]);
        assert_eq!(config.target.as_deref(), Some("/srv/target.db"));
        assert_eq!(config.snapshot_path(), "/test/dir/catalog-sqlite.json");
        assert_eq!(
            config.selector().select_strategies(),
            vec![Strategy::Direct, Strategy::Inferential]
        );
        assert_eq!(config.load_dialect().unwrap().name, "sqlite");
    }

    #[test]
    fn test_invalid_values() {
        assert!(ProbeConfig::from_map(&map(&[("techniques", "union,psychic")])).is_err());
        assert!(ProbeConfig::from_map(&map(&[("direct", "maybe")])).is_err());

        let config = ProbeConfig::from_map(&map(&[("dialect", "oracle")])).unwrap();
        assert!(config.load_dialect().is_err());
    }

    #[test]
    fn test_target_dialect_must_run_on_sqlite() {
        let config = ProbeConfig::from_map(&map(&[("dialect", "sybase")])).unwrap();
        assert_eq!(config.load_dialect().unwrap().name, "sybase");
        assert!(config.load_target_dialect().is_err());

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "name = \"custom\"\n\n[templates]\nusers = \"u\"\ndatabases = \"d\"\ntables = \"t\"\ncolumns = \"c\"\n",
        )
        .unwrap();
        let config = ProbeConfig::from_map(&map(&[
            ("dialect", "sybase"),
            ("dialect_file", path.to_str().unwrap()),
        ]))
        .unwrap();
        assert_eq!(config.load_target_dialect().unwrap().name, "custom");
    }

    #[test]
    fn test_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("schemaprobe.toml");
        let path_str = path.to_str().unwrap().to_string();

        // First load writes the commented template
        ProbeConfig::new(&Some(path_str.clone())).unwrap();
        let template = std::fs::read_to_string(&path).unwrap();
        assert!(template.starts_with("### schemaprobe configuration file"));

        std::fs::write(
            &path,
            "dialect = \"sqlite\"\ntechniques = \"error\"\ndata_dir = \"/tmp/probe\"\n",
        )
        .unwrap();
        let config = ProbeConfig::new(&Some(path_str)).unwrap();
        assert_eq!(config.dialect, "sqlite");
        assert_eq!(config.techniques, vec![Technique::Error]);
        assert!(config.summary().contains("Strategy Order:     direct -> inferential"));
    }

    #[test]
    fn test_summary_without_target() {
        let config = ProbeConfig::default();
        let summary = config.summary();
        assert!(summary.contains("Techniques:         (none)"));
        assert!(summary.contains("Target:             (not set)"));
    }
}
