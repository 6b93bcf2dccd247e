use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use vn_api_gen::config::{self, ApiConfig, ConfigOverrides};
use vn_api_gen::{fetch, output, pipeline, writer::JsonWriter};

fn version_string() -> &'static str {
    let on_tag = env!("VN_API_ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("VN_API_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "vn-api-gen")]
#[command(about = "Generate a static paginated JSON API from a visual-novel dataset")]
#[command(long_about = "\
Generate a static paginated JSON API from a visual-novel dataset

The dataset is a JSON array of objects, fetched once. Every record gets a
detail file, records are listed ten to a page, and developers referenced by
records get their own detail files and listing pages.

Output structure:

  public/
  └── vn/
      ├── posts/
      │   ├── <id>.json            # One per record
      │   ├── index.json           # Listing page 1
      │   ├── page/<n>.json        # Listing pages 2..N
      │   └── search-index/        # Optional word index shards
      └── developers/
          ├── <id>.json            # One per developer, with its posts
          ├── index.json
          └── page/<n>.json

Run with no arguments to build. Run 'vn-api-gen gen-config' to print a
documented vn-api.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (optional; defaults apply when it does not exist)
    #[arg(long, default_value = "vn-api.toml", global = true)]
    config: PathBuf,

    /// Dataset URL or local JSON file (overrides config)
    #[arg(long, global = true)]
    source: Option<String>,

    /// Output directory (overrides config)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Items per listing page (overrides config)
    #[arg(long, global = true)]
    page_size: Option<usize>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch the dataset and write the full JSON tree (default)
    Build,
    /// Fetch the dataset and report what would be generated
    Check,
    /// Print a stock vn-api.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command.as_ref().unwrap_or(&Command::Build) {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            ExitCode::SUCCESS
        }
        Command::Check => match resolve_config(&cli).and_then(|c| check(&c)) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {e}");
                ExitCode::FAILURE
            }
        },
        Command::Build => {
            let site_config = match resolve_config(&cli) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("Error: {e}");
                    return ExitCode::FAILURE;
                }
            };
            build(&site_config)
        }
    }
}

/// Load the config file and apply CLI overrides on top.
fn resolve_config(cli: &Cli) -> Result<ApiConfig, Box<dyn std::error::Error>> {
    let overrides = ConfigOverrides {
        source: cli.source.clone(),
        output_dir: cli.output.as_ref().map(|p| p.to_string_lossy().into_owned()),
        page_size: cli.page_size,
    };
    Ok(config::load_config_with(&cli.config, &overrides)?)
}

fn build(site_config: &ApiConfig) -> ExitCode {
    let root = PathBuf::from(&site_config.output.dir);
    let sample = site_config.output.sample_lines;
    let mut writer = JsonWriter::new(&root);

    let result = pipeline::run_build(site_config, &mut writer, |event| {
        output::print_build_event(&event, &root, sample)
    });

    match result {
        Ok(summary) => {
            output::print_summary(&summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            println!("{}", output::format_total(writer.files_written()));
            ExitCode::FAILURE
        }
    }
}

fn check(site_config: &ApiConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("==> Checking {}", site_config.source.url);
    let records = fetch::fetch_records(&site_config.source.url, site_config.timeout())?;
    let page_size = site_config.page_size()?;
    output::print_plan(&pipeline::plan_site(&records, page_size), page_size.get());
    Ok(())
}
