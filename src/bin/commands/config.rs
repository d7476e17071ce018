use clap::Args;
use schemaprobe::dialect::Level;
use schemaprobe::lens::utils::OutputFormat;
use schemaprobe::ProbeConfig;
use serde::Serialize;
use std::path::Path;

/// Arguments for the Config command
#[derive(Args)]
pub struct ConfigArgs {
    /// Also print the dialect's query templates
    #[clap(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Serialize)]
struct ConfigInfo {
    config_file: String,
    data_dir: String,
    dialect: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    dialect_file: Option<String>,
    techniques: Vec<String>,
    direct: bool,
    strategies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<TargetInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    templates: Option<Vec<TemplateInfo>>,
}

#[derive(Debug, Serialize)]
struct TargetInfo {
    path: String,
    exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    size_bytes: Option<u64>,
}

#[derive(Debug, Serialize)]
struct TemplateInfo {
    level: String,
    query: String,
}

const LEVELS: [Level; 6] = [
    Level::Users,
    Level::Databases,
    Level::Tables,
    Level::Columns,
    Level::CurrentDatabase,
    Level::Administrator,
];

pub fn run(config: &ProbeConfig, args: ConfigArgs, output_format: OutputFormat) {
    let ConfigArgs { verbose } = args;

    let templates = if verbose {
        match config.load_dialect() {
            Ok(dialect) => Some(
                LEVELS
                    .iter()
                    .filter_map(|level| {
                        dialect.templates.get(*level).map(|q| TemplateInfo {
                            level: level.description().to_string(),
                            query: q.to_string(),
                        })
                    })
                    .collect(),
            ),
            Err(e) => {
                eprintln!("ERROR: {}", e);
                None
            }
        }
    } else {
        None
    };

    let target = config.target.as_ref().map(|p| {
        let meta = std::fs::metadata(Path::new(p)).ok();
        TargetInfo {
            path: p.clone(),
            exists: meta.is_some(),
            size_bytes: meta.map(|m| m.len()),
        }
    });

    let info = ConfigInfo {
        config_file: ProbeConfig::config_file_path(),
        data_dir: config.data_dir.clone(),
        dialect: config.dialect.clone(),
        dialect_file: config.dialect_file.clone(),
        techniques: config.techniques.iter().map(|t| t.to_string()).collect(),
        direct: config.direct,
        strategies: config
            .selector()
            .select_strategies()
            .iter()
            .map(|s| s.to_string())
            .collect(),
        target,
        templates,
    };

    if output_format.is_json() {
        let out = match output_format {
            OutputFormat::JsonPretty => serde_json::to_string_pretty(&info),
            _ => serde_json::to_string(&info),
        };
        match out {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("ERROR: Failed to serialize to JSON: {}", e),
        }
        return;
    }

    println!("Configuration:");
    println!("  Config file:        {}", info.config_file);
    for line in config.summary().lines() {
        println!("  {}", line);
    }
    if let Some(target) = &info.target {
        if !target.exists {
            println!("  (target file does not exist)");
        }
    }
    if let Some(templates) = &info.templates {
        println!();
        println!("Query templates ({}):", info.dialect);
        for t in templates {
            println!("  {}:", t.level);
            println!("    {}", t.query);
        }
    }
}
