//! Faculty Scout CLI
//!
//! `discover` lists verified experts at a school, `rank` scores an author's
//! recent papers against a student profile. Results go to stdout as JSON,
//! logs go to stderr.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use faculty_core::{
    FacultyDiscovery, PaperRanker, ScoutConfig, StudentProfile, DEFAULT_LIMIT, VERSION,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "faculty-scout")]
#[command(version, about = "Find faculty experts and rank their papers for a student")]
struct Args {
    /// TOML configuration file (defaults to environment variables)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory of the local faculty index
    #[arg(long, global = true)]
    index_path: Option<PathBuf>,

    /// Contact email for the OpenAlex polite pool
    #[arg(long, global = true)]
    email: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find Computer Science faculty at a school working on a skill
    Discover {
        /// School name, e.g. "University of California, Los Angeles"
        #[arg(long)]
        school: String,

        /// Skill keyword, e.g. "machine learning"
        #[arg(long)]
        skill: String,

        /// Maximum number of experts to print
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,
    },
    /// Rank an author's recent papers for a student profile
    Rank {
        /// Semantic Scholar author id
        #[arg(long)]
        author_id: String,

        /// Name shown in the report
        #[arg(long)]
        professor_name: Option<String>,

        /// Research interest (repeatable)
        #[arg(long = "interest")]
        interests: Vec<String>,

        /// Skill (repeatable)
        #[arg(long = "skill")]
        skills: Vec<String>,

        /// Number of papers to keep
        #[arg(long, default_value_t = 3)]
        top: usize,
    },
}

fn load_config(args: &Args) -> anyhow::Result<ScoutConfig> {
    let mut config = match &args.config {
        Some(path) => ScoutConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?
            .with_env_overrides(),
        None => ScoutConfig::from_env(),
    };
    if let Some(path) = &args.index_path {
        config = config.with_index_path(path);
    }
    if let Some(email) = &args.email {
        config = config.with_contact_email(email);
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // stdout carries the JSON result only
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("faculty-scout v{}", VERSION);

    let config = load_config(&args)?;

    let output = match args.command {
        Command::Discover {
            school,
            skill,
            limit,
        } => {
            let store = config
                .open_store()
                .with_context(|| format!("opening index at {}", config.index_path.display()))?;
            let api = config.openalex_client()?;
            let discovery = FacultyDiscovery::new(store, api);

            let experts = discovery
                .discover(&school, &skill, limit)
                .await
                .with_context(|| format!("discovering {} experts at {}", skill, school))?;
            serde_json::to_string_pretty(&experts)?
        }
        Command::Rank {
            author_id,
            professor_name,
            interests,
            skills,
            top,
        } => {
            let ranker = PaperRanker::new(config.semantic_scholar_client()?);
            let profile = StudentProfile::new(skills, interests);

            let outcome = ranker
                .rank_papers_for_author(&author_id, professor_name.as_deref(), &profile)
                .await
                .top(top);
            serde_json::to_string_pretty(&outcome)?
        }
    };

    println!("{}", output);
    Ok(())
}
