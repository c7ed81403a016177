use boundary_catalog::config::toml_config::BACKEND_MEMORY;
use boundary_catalog::core::{BoundaryStore, ConfigProvider, HeaderReader, ReferenceListStore};
use boundary_catalog::utils::error::ErrorSeverity;
use boundary_catalog::utils::{logger, validation::Validate};
use boundary_catalog::{
    BoundaryContent, BoundaryRecord, CatalogError, CatalogService, CliConfig, Command,
    FileBoundaryStore, FileReferenceListStore, FullModelHeaderReader, InMemoryBoundaryStore,
    InMemoryReferenceListStore, ReferenceListKind, Result,
};
use clap::Parser;
use serde::Serialize;
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if config.json_logging() {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("Resolved config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 建議: {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let result = if config.backend() == BACKEND_MEMORY {
        tracing::warn!("⚠️ Memory backend selected: nothing is kept after this command exits");
        let service = CatalogService::new(
            InMemoryBoundaryStore::new(),
            InMemoryReferenceListStore::new(),
            FullModelHeaderReader,
        )
        .with_profiles(config.profiles().to_vec());
        execute(&service, cli.command).await
    } else {
        tracing::debug!("Using data directory {}", config.data_dir());
        let service = CatalogService::new(
            FileBoundaryStore::new(config.data_dir()),
            FileReferenceListStore::new(config.data_dir()),
            FullModelHeaderReader,
        )
        .with_profiles(config.profiles().to_vec());
        execute(&service, cli.command).await
    };

    match result {
        Ok(Some(output)) => println!("{}", output),
        Ok(None) => {}
        Err(e) => {
            tracing::error!(
                "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 4,      // 查無資料
                ErrorSeverity::Medium => 2,   // 輸入錯誤
                ErrorSeverity::High => 1,     // 配置錯誤
                ErrorSeverity::Critical => 3, // 儲存錯誤
            };
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn execute<S, L, H>(
    service: &CatalogService<S, L, H>,
    command: Command,
) -> Result<Option<String>>
where
    S: BoundaryStore,
    L: ReferenceListStore,
    H: HeaderReader,
{
    let boundaries = service.boundaries();
    let lists = service.reference_lists();

    let output = match command {
        Command::Import { file, filename } => {
            let content = read_input(&file).await?;
            let filename = filename.unwrap_or_else(|| display_name(&file));
            Some(boundaries.import(content, &filename).await?)
        }
        Command::Get { id } => Some(to_json(&boundaries.get(&id).await?.into_content())?),
        Command::List { infos_only: true } => Some(to_json(&boundaries.list_infos().await?)?),
        Command::List { infos_only: false } => {
            let contents: Vec<BoundaryContent> = boundaries
                .list()
                .await?
                .into_iter()
                .map(BoundaryRecord::into_content)
                .collect();
            Some(to_json(&contents)?)
        }
        Command::Ids => Some(to_json(&boundaries.list_ids().await?)?),
        Command::Exists { id } => Some(boundaries.exists(&id).await?.to_string()),
        Command::Delete { id } => {
            boundaries.delete(&id).await?;
            None
        }
        Command::Last { profile: Some(profile) } => {
            Some(to_json(&boundaries.most_recent(&profile).await?.into_content())?)
        }
        Command::Last { profile: None } => {
            tracing::debug!("Selecting latest boundaries for {:?}", service.profiles());
            let latest: Vec<BoundaryContent> = service
                .last_boundaries()
                .await?
                .into_iter()
                .map(BoundaryRecord::into_content)
                .collect();
            Some(to_json(&latest)?)
        }
        Command::ImportTsos { file } => {
            lists.import(ReferenceListKind::Tsos, read_input(&file).await?).await?;
            None
        }
        Command::Tsos => Some(to_json(&lists.get(ReferenceListKind::Tsos).await?)?),
        Command::ImportBusinessProcesses { file } => {
            lists
                .import(ReferenceListKind::BusinessProcesses, read_input(&file).await?)
                .await?;
            None
        }
        Command::BusinessProcesses => {
            Some(to_json(&lists.get(ReferenceListKind::BusinessProcesses).await?)?)
        }
    };

    Ok(output)
}

async fn read_input(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path).await.map_err(|e| {
        CatalogError::malformed(format!("cannot read input file {}: {}", path.display(), e))
    })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
