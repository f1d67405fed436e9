//! nomake CLI - kind test clusters with ECR or local registry access

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use nomake::commands::cluster::CreateOptions;
use nomake::config::Settings;
use nomake::utils::{dryrun, errors, logger};
use std::io;

#[derive(Parser, Debug)]
#[command(name = "nomake")]
#[command(author, version, about = "Create kind test clusters with registry access", long_about = None)]
struct Cli {
    /// Verbose output (can be used multiple times: -v, -vv, -vvv)
    /// -v: INFO and kind output, -vv: DEBUG, -vvv: TRACE
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Dry-run mode: show what would be done without making changes
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Creates a kind cluster
    Create {
        /// Name of the cluster
        #[arg(long)]
        name: Option<String>,

        /// Configures access to an ECR private registry
        #[arg(long, value_name = "REGISTRY_HOST")]
        ecr: Option<String>,

        /// Configure access to a local Docker registry container
        #[arg(long, value_name = "REGISTRY_NAME")]
        use_local_registry: Option<String>,

        /// Node image to boot the cluster with
        #[arg(long)]
        node_image: Option<String>,
    },

    /// Deletes a kind cluster
    Delete {
        /// Name of the cluster
        #[arg(long)]
        name: Option<String>,
    },

    /// Get cluster configuration
    Config {
        /// Name of the cluster
        #[arg(long)]
        name: Option<String>,

        /// Make the output "evalable"
        #[arg(long)]
        env: bool,
    },

    /// Display list of known clusters
    List {
        /// Also show each cluster's API server
        #[arg(long)]
        wide: bool,
    },

    /// Removes clusters that are not reachable anymore
    Clean {
        /// Force removal of directories
        #[arg(long)]
        force: bool,
    },

    /// Check prerequisites
    Check,

    /// Generate shell completion scripts
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    logger::init(cli.verbose);
    dryrun::set_dry_run(cli.dry_run);
    if cli.dry_run {
        nomake::log_warn!("DRY RUN MODE: No changes will be made");
    }

    if let Err(err) = run(cli) {
        errors::report(&err);
        std::process::exit(errors::exit_code(&err));
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load();
    let verbose = cli.verbose > 0;

    match cli.command {
        Commands::Create {
            name,
            ecr,
            use_local_registry,
            node_image,
        } => nomake::commands::cluster::create(
            CreateOptions {
                name: settings.cluster_name(name),
                ecr,
                local_registry: use_local_registry,
                node_image,
                verbose,
            },
            &settings,
        ),
        Commands::Delete { name } => {
            nomake::commands::cluster::delete(settings.cluster_name(name), verbose, &settings)
        }
        Commands::Config { name, env } => {
            nomake::commands::kubeconfig::config(settings.cluster_name(name), env, &settings)
        }
        Commands::List { wide } => nomake::commands::cluster::list(wide, &settings),
        Commands::Clean { force } => nomake::commands::cluster::clean(force, &settings),
        Commands::Check => nomake::commands::check::check(&settings),
        Commands::Completion { shell } => handle_completion_command(shell),
    }
}

fn handle_completion_command(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "nomake", &mut io::stdout());
    Ok(())
}
