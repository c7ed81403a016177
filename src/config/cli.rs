use super::toml_config::TomlConfig;
use crate::utils::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "boundary-catalog")]
#[command(about = "Catalog of CGMES EQ/TP boundary files and reference lists")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override storage.data_dir from the config file
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// Override storage.backend (file or memory)
    #[arg(long, global = true)]
    pub backend: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Import a boundary file, printing its id
    Import {
        file: PathBuf,
        /// Filename to record instead of the file's own name
        #[arg(long)]
        filename: Option<String>,
    },
    /// Print one boundary with its content
    Get { id: String },
    /// Print all boundaries
    List {
        #[arg(long)]
        infos_only: bool,
    },
    /// Print the ids of all boundaries
    Ids,
    /// Print whether a boundary exists
    Exists { id: String },
    /// Delete a boundary
    Delete { id: String },
    /// Print the most recent boundary of a profile, or of every configured profile
    Last { profile: Option<String> },
    /// Replace the TSO list
    ImportTsos { file: PathBuf },
    /// Print the TSO list
    Tsos,
    /// Replace the business process list
    ImportBusinessProcesses { file: PathBuf },
    /// Print the business process list
    BusinessProcesses,
}

impl CliConfig {
    /// 載入設定檔（若有）並套用命令列覆蓋
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        if let Some(data_dir) = &self.data_dir {
            config.storage.data_dir = data_dir.clone();
        }
        if let Some(backend) = &self.backend {
            config.storage.backend = backend.clone();
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let cli = CliConfig::parse_from([
            "boundary-catalog",
            "--data-dir",
            "/tmp/catalog",
            "--backend",
            "memory",
            "last",
            "EQ",
        ]);

        let config = cli.resolve().unwrap();
        assert_eq!(config.storage.data_dir, "/tmp/catalog");
        assert_eq!(config.storage.backend, "memory");
        assert!(matches!(cli.command, Command::Last { profile: Some(ref p) } if p == "EQ"));
    }

    #[test]
    fn test_import_subcommand() {
        let cli = CliConfig::parse_from([
            "boundary-catalog",
            "import",
            "boundary.xml",
            "--filename",
            "20191106T0930Z__ENTSOE_EQBD_001.xml",
            "-v",
        ]);

        assert!(cli.verbose);
        match cli.command {
            Command::Import { file, filename } => {
                assert_eq!(file, PathBuf::from("boundary.xml"));
                assert_eq!(filename.as_deref(), Some("20191106T0930Z__ENTSOE_EQBD_001.xml"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
