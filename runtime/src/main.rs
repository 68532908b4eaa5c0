use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use studymatch_runtime::cli::profile_args::ProfileArgs;
use studymatch_runtime::cli::{
    config_cmd, eval_cmd, fit_cmd, group_cmd, join_cmd, match_cmd, serve_cmd,
};
use studymatch_runtime::config::StudyMatchConfig;
use studymatch_runtime::model::ClusterId;

#[derive(Parser)]
#[command(name = "studymatch", version, about = "Match learners to study groups")]
struct Cli {
    /// Machine-readable JSON on stdout
    #[arg(long, global = true)]
    json: bool,

    /// Suppress human-readable output
    #[arg(long, short, global = true)]
    quiet: bool,

    #[arg(long, short, global = true)]
    verbose: bool,

    #[arg(long, global = true)]
    no_color: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// State directory (default: ~/.studymatch)
    #[arg(long, global = true, value_name = "DIR")]
    home: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank the study groups in a profile's cluster
    Match {
        #[command(flatten)]
        profile: ProfileArgs,

        /// Show at most N groups
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },
    /// Record that a user joined a study group
    Join {
        #[command(flatten)]
        profile: ProfileArgs,

        #[arg(long)]
        group: String,

        /// Cluster to join (default: the profile's predicted cluster)
        #[arg(long)]
        cluster: Option<ClusterId>,
    },
    /// List the members of a group
    Group {
        name: String,

        #[arg(long)]
        cluster: ClusterId,
    },
    /// Train the model from a JSON array of users and seed the registry
    Fit {
        users: PathBuf,

        #[arg(long)]
        clusters: Option<usize>,

        /// Seed even when the registry already has members
        #[arg(long)]
        force: bool,
    },
    /// Report the share of members in the default group
    Eval,
    /// Serve the JSON API
    Serve {
        #[arg(long)]
        bind: Option<String>,
    },
    /// Print the effective configuration
    Config,
}

fn init_tracing(json: bool) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("studymatch_runtime=info".parse()?);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.json {
        std::env::set_var("STUDYMATCH_JSON", "1");
    }
    if cli.quiet {
        std::env::set_var("STUDYMATCH_QUIET", "1");
    }
    if cli.verbose {
        std::env::set_var("STUDYMATCH_VERBOSE", "1");
    }
    if cli.no_color {
        std::env::set_var("STUDYMATCH_NO_COLOR", "1");
    }
    if let Some(home) = &cli.home {
        std::env::set_var("STUDYMATCH_HOME", home);
    }

    init_tracing(cli.log_json)?;
    let config = StudyMatchConfig::load()?;

    match cli.command {
        Commands::Match { profile, limit } => match_cmd::run(&config, &profile, limit),
        Commands::Join {
            profile,
            group,
            cluster,
        } => join_cmd::run(&config, &profile, &group, cluster),
        Commands::Group { name, cluster } => group_cmd::run(&config, &name, cluster),
        Commands::Fit {
            users,
            clusters,
            force,
        } => fit_cmd::run(&config, &users, clusters, force),
        Commands::Eval => eval_cmd::run(&config),
        Commands::Serve { bind } => serve_cmd::run(&config, bind.as_deref()).await,
        Commands::Config => config_cmd::run(&config),
    }
}
