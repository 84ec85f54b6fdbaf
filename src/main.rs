use clap::Parser;
use cms_import::utils::{logger, validation::Validate};
use cms_import::{
    BlueprintImporter, Cli, Command, ConsoleProgress, EntryImporter, FileEntrySource,
    FileNavSource, ImportConfig, NavImporter, SqliteStore, YamlDir,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting cms-import");

    let config = match ImportConfig::resolve(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to resolve configuration: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    if cli.verbose {
        tracing::debug!("Resolved config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(&cli.command, &config).await {
        tracing::error!("Import failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    println!("✅ Import completed");
    Ok(())
}

async fn run(command: &Command, config: &ImportConfig) -> cms_import::Result<()> {
    let store = SqliteStore::connect(&config.database_url).await?;
    let progress = ConsoleProgress::new();

    match command {
        Command::Entries => {
            let source = FileEntrySource::new(config.collections_dir());
            EntryImporter::new(source, store, progress).run().await
        }
        Command::Blueprints => {
            let blueprints = YamlDir::new(config.blueprints_dir());
            let fieldsets = YamlDir::new(config.fieldsets_dir());
            BlueprintImporter::new(blueprints, fieldsets, store, progress)
                .run()
                .await
        }
        Command::Navs => {
            let source = FileNavSource::new(config.navs_dir(), config.trees_dir());
            NavImporter::new(source, store, progress).run().await
        }
    }
}
