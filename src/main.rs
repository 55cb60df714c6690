use clap::{Parser, Subcommand};
use member_cards::config::{self, CONFIG_FILENAME, CardConfig};
use member_cards::imaging::FsAssetLoader;
use member_cards::members::load_members;
use member_cards::output;
use member_cards::pipeline::CardPipeline;
use member_cards::workspace::{ResetScope, Workspace};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Shared flag for commands that render cards.
#[derive(clap::Args, Clone)]
struct MembersArgs {
    /// JSON file with the member list
    #[arg(long, short)]
    members: PathBuf,
}

#[derive(Parser)]
#[command(name = "member-cards")]
#[command(about = "Render two-sided member ID cards as PDF")]
#[command(long_about = "\
Render two-sided member ID cards as PDF

Each member gets a front (photo, name, role) and a back (tax ID, dates,
congregation, validity) drawn over the workspace's template images.

Workspace structure:

  <root>/
  ├── cards.toml            # Layout and paths (optional, see gen-config)
  ├── templates/
  │   ├── front.png         # Front template, card-sized
  │   └── back.png          # Back template, card-sized
  ├── photos/
  │   └── Ana Souza.jpg     # <name>.jpg, or the member's photo_ref
  └── cards/                # Output
      ├── Ana_Souza.pdf     # One per member
      └── all_cards.pdf     # Batch document

Member list: a JSON array of objects with name, tax_id, role, birth_date,
congregation, baptism_date, valid_until, photo_ref. Dates may be text or
spreadsheet date serials.

Run 'member-cards gen-config' to generate a documented cards.toml.")]
#[command(version)]
struct Cli {
    /// Workspace root directory
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Config file (default: <root>/cards.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log per-member detail (same as RUST_LOG=member_cards=debug)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write one PDF per member
    Cards(MembersArgs),
    /// Write all members into a single PDF
    Batch(MembersArgs),
    /// Write individual cards and the batch document
    Build(MembersArgs),
    /// Check that both templates are present
    Check,
    /// Show templates, photo count, and generated documents
    Status,
    /// Delete generated cards (and with --all, photos and templates)
    Reset {
        #[arg(long)]
        all: bool,
    },
    /// Print a stock cards.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let root = cli.root.as_path();
    let load_config = || resolve_config(root, cli.config.as_deref());

    match cli.command {
        Command::Cards(args) => {
            let members = load_members(&args.members)?;
            let pipeline = CardPipeline::open(root, load_config()?);
            let report = pipeline.generate_all_cards(&members)?;
            output::print_cards_report(&report, root);
        }
        Command::Batch(args) => {
            let members = load_members(&args.members)?;
            let pipeline = CardPipeline::open(root, load_config()?);
            let report = pipeline.generate_batch_pdf(&members)?;
            output::print_batch_report(report.as_ref(), root);
        }
        Command::Build(args) => {
            let members = load_members(&args.members)?;
            let pipeline = CardPipeline::open(root, load_config()?);

            println!("==> Individual cards");
            let report = pipeline.generate_all_cards(&members)?;
            output::print_cards_report(&report, root);

            println!("==> Batch document");
            let batch = pipeline.generate_batch_pdf(&members)?;
            output::print_batch_report(batch.as_ref(), root);
        }
        Command::Check => {
            let workspace = Workspace::new(root, &load_config()?.paths);
            let missing = workspace.missing_templates(&FsAssetLoader::new());
            output::print_template_check(&missing, root);
            if !missing.is_empty() {
                return Err(format!("{} template(s) missing", missing.len()).into());
            }
        }
        Command::Status => {
            let workspace = Workspace::new(root, &load_config()?.paths);
            output::print_status(&workspace.status()?, root);
        }
        Command::Reset { all } => {
            let workspace = Workspace::new(root, &load_config()?.paths);
            let scope = if all { ResetScope::All } else { ResetScope::Output };
            let removed = workspace.reset(scope)?;
            output::print_reset(&removed, root);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log to stderr so stdout stays the command's report.
///
/// `RUST_LOG` wins over `--verbose` when set.
fn init_logging(verbose: bool) {
    let default = if verbose {
        "member_cards=debug"
    } else {
        "member_cards=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// An explicit `--config` must exist; otherwise `<root>/cards.toml` is used
/// when present, stock defaults when not.
fn resolve_config(root: &Path, explicit: Option<&Path>) -> Result<CardConfig, config::ConfigError> {
    match explicit {
        Some(path) => config::load_config_file(path),
        None => {
            tracing::debug!(file = CONFIG_FILENAME, root = %root.display(), "looking for config");
            config::load_config(root)
        }
    }
}
