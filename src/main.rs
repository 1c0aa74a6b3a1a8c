//! Oraclust CLI entrypoint.
//!
//! This is the main entrypoint for the oraclust command-line tool.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use oraclust::api::{ApiClient, ClusterApi, ClusterRecord};
use oraclust::cli::{Cli, Commands, OutputFormatter};
use oraclust::config::{find_config_file, ConfigParser, ConfigValidator, ProvisionConfig};
use oraclust::error::{ClusterError, OraclustError, Result};
use oraclust::provisioner::ClusterProvisioner;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Main entrypoint.
fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    // Run async runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<()> {
    let formatter = OutputFormatter::new(cli.output);

    match cli.command {
        Commands::Init { path, force } => cmd_init(&path, force),
        Commands::Validate { warnings } => cmd_validate(cli.config.as_ref(), warnings),
        Commands::Create { yes } => cmd_create(cli.config.as_ref(), yes, &formatter).await,
        Commands::Remove { yes } => cmd_remove(cli.config.as_ref(), yes, &formatter).await,
        Commands::List => cmd_list(cli.config.as_ref(), &formatter).await,
        Commands::Status => cmd_status(cli.config.as_ref(), &formatter).await,
    }
}

/// Initialize a new project.
fn cmd_init(path: &PathBuf, force: bool) -> Result<()> {
    info!("Initializing new Oraclust project in: {}", path.display());

    let config_path = path.join("oraclust.cluster.yaml");
    let env_path = path.join(".env.example");
    let gitignore_path = path.join(".gitignore");

    // Check if files exist
    if !force && config_path.exists() {
        eprintln!("Configuration file already exists: {}", config_path.display());
        eprintln!("Use --force to overwrite.");
        return Ok(());
    }

    // Create directory if needed
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }

    // Write config template
    let config_template = include_str!("../templates/oraclust.cluster.yaml");
    std::fs::write(&config_path, config_template)?;
    eprintln!("Created: {}", config_path.display());

    // Write .env.example
    let env_template = include_str!("../templates/.env.example");
    std::fs::write(&env_path, env_template)?;
    eprintln!("Created: {}", env_path.display());

    // Write .gitignore
    if gitignore_path.exists() {
        let existing = std::fs::read_to_string(&gitignore_path)?;
        if !existing.contains(".env") {
            let mut file = std::fs::OpenOptions::new()
                .append(true)
                .open(&gitignore_path)?;
            writeln!(file, "\n# Oraclust")?;
            writeln!(file, ".env")?;
            eprintln!("Updated: {}", gitignore_path.display());
        }
    } else {
        std::fs::write(&gitignore_path, ".env\n")?;
        eprintln!("Created: {}", gitignore_path.display());
    }

    eprintln!("\nProject initialized successfully!");
    eprintln!("Next steps:");
    eprintln!("  1. Copy .env.example to .env and fill in the passwords");
    eprintln!("  2. Edit oraclust.cluster.yaml with your cluster description");
    eprintln!("  3. Run 'oraclust validate' to check your configuration");
    eprintln!("  4. Run 'oraclust create' to register the cluster");

    Ok(())
}

/// Validate configuration.
fn cmd_validate(config_path: Option<&PathBuf>, show_warnings: bool) -> Result<()> {
    let config_file = resolve_config_path(config_path)?;
    info!("Validating configuration: {}", config_file.display());

    let config = load_config(&config_file)?;
    let validator = ConfigValidator::new();
    let result = validator.validate(&config)?;

    eprintln!("Configuration is valid!");
    if show_warnings && !result.warnings.is_empty() {
        eprintln!("\nWarnings:");
        for warning in &result.warnings {
            eprintln!("  - {warning}");
        }
    }

    // Show summary
    eprintln!("\nConfiguration summary:");
    eprintln!("  API endpoint: {}", config.api.base_url());
    eprintln!("  Cluster alias: {}", config.cluster.alias);
    eprintln!("  Discovery node: {}", config.cluster.node_ip);

    Ok(())
}

/// Provision the configured cluster.
async fn cmd_create(
    config_path: Option<&PathBuf>,
    auto_approve: bool,
    formatter: &OutputFormatter,
) -> Result<()> {
    let config = load_validated_config(config_path)?;

    eprintln!(
        "Cluster '{}' will be discovered from node {} and registered.",
        config.cluster.alias, config.cluster.node_ip
    );

    // Confirm
    if !auto_approve {
        eprint!("Do you want to continue? [y/N]: ");
        std::io::stderr().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            eprintln!("Creation cancelled.");
            return Ok(());
        }
    }

    let api = connect_api(&config).await?;
    let provisioner = ClusterProvisioner::new(&api, &config.cluster);
    let cluster_id = provisioner.provision().await?;

    eprintln!(
        "{}",
        formatter.success(&format!(
            "Cluster '{}' registered with id {cluster_id}.",
            config.cluster.alias
        ))
    );
    Ok(())
}

/// Remove the configured cluster.
async fn cmd_remove(
    config_path: Option<&PathBuf>,
    auto_approve: bool,
    formatter: &OutputFormatter,
) -> Result<()> {
    let config = load_validated_config(config_path)?;

    // Confirm
    if !auto_approve {
        eprint!(
            "This action is IRREVERSIBLE. Type '{}' to confirm: ",
            config.cluster.alias
        );
        std::io::stderr().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if input.trim() != config.cluster.alias {
            eprintln!("Removal cancelled.");
            return Ok(());
        }
    }

    let api = connect_api(&config).await?;
    let provisioner = ClusterProvisioner::new(&api, &config.cluster);
    let cluster_id = provisioner.remove().await?;

    eprintln!(
        "{}",
        formatter.success(&format!(
            "Cluster '{}' (id {cluster_id}) removed.",
            config.cluster.alias
        ))
    );
    Ok(())
}

/// List registered clusters.
async fn cmd_list(config_path: Option<&PathBuf>, formatter: &OutputFormatter) -> Result<()> {
    let config = load_validated_config(config_path)?;
    let api = connect_api(&config).await?;

    let clusters = api.get_clusters().await?;
    eprintln!("{}", formatter.format_clusters(&clusters));
    Ok(())
}

/// Show registration status for the configured alias.
async fn cmd_status(config_path: Option<&PathBuf>, formatter: &OutputFormatter) -> Result<()> {
    let config = load_validated_config(config_path)?;
    let api = connect_api(&config).await?;

    let record = lookup_alias(&api, &config.cluster.alias).await?;
    eprintln!(
        "{}",
        formatter.format_cluster_status(&config.cluster.alias, record.as_ref())
    );
    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Resolves the configuration file path.
fn resolve_config_path(config_path: Option<&PathBuf>) -> Result<PathBuf> {
    config_path.map_or_else(|| find_config_file("."), |path| Ok(path.clone()))
}

/// Loads configuration with `.env` and environment overrides applied.
fn load_config(config_file: &std::path::Path) -> Result<ProvisionConfig> {
    let parser = ConfigParser::new()
        .with_base_path(config_file.parent().unwrap_or_else(|| std::path::Path::new(".")));
    parser.load_dotenv()?;
    parser.load_with_env(config_file)
}

/// Loads and validates the configuration.
fn load_validated_config(config_path: Option<&PathBuf>) -> Result<ProvisionConfig> {
    let config_file = resolve_config_path(config_path)?;
    debug!("Loading configuration from: {}", config_file.display());

    let config = load_config(&config_file)?;
    let validator = ConfigValidator::new();
    validator.validate(&config)?;
    Ok(config)
}

/// Connects and authenticates against the management API.
async fn connect_api(config: &ProvisionConfig) -> Result<ClusterApi> {
    let client = ApiClient::connect(
        &config.api.base_url(),
        &config.api.username,
        &config.api.password,
    )
    .await?;
    Ok(ClusterApi::new(client))
}

/// Resolves an alias, treating "not registered" as an answer rather than an
/// error.
async fn lookup_alias(api: &ClusterApi, alias: &str) -> Result<Option<ClusterRecord>> {
    match api.get_cluster_by_alias(alias).await {
        Ok(record) => Ok(Some(record)),
        Err(OraclustError::Cluster(
            ClusterError::NotFound { .. } | ClusterError::ListEmpty,
        )) => Ok(None),
        Err(e) => Err(e),
    }
}
