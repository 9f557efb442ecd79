use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use project_version::config;
use project_version::domain::Component;
use project_version::error::ProjectVersionError;
use project_version::service::{BumpReport, ProjectVersionService};
use project_version::store::FsManifestStore;
use project_version::ui;

#[derive(Parser)]
#[command(
    name = "project-version",
    about = "Show and bump the version in a project's package.json"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(
        short,
        long,
        global = true,
        help = "Workspace root holding package.json (defaults to the current directory)"
    )]
    root: Option<PathBuf>,

    #[arg(short, long, help = "Print version information")]
    version: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the status text for the project (default)
    Show,
    /// Print the path of the project's package.json
    Open,
    /// Print the largest allowed increase for a component
    Max { component: Component },
    /// Increase a version component in package.json
    Bump {
        /// major, minor or patch
        component: Component,

        #[arg(long, default_value_t = 1, help = "Amount to increase by")]
        by: u64,

        #[arg(long, conflicts_with = "by", help = "Ask for the amount interactively")]
        prompt: bool,

        #[arg(
            short,
            long,
            help = "Save package.json instead of printing the rewritten text"
        )]
        write: bool,
    },
}

fn main() -> Result<()> {
    project_version::init_logging();
    let args = Args::parse();

    if args.version {
        println!("project-version {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Load configuration
    let mut config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    let root = match args.root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };

    let command = args.command.unwrap_or(Command::Show);
    if let Command::Bump { write: true, .. } = command {
        config.auto_save_on_version_change = true;
    }

    let mut service = ProjectVersionService::new(FsManifestStore::new(), config, Some(root));
    service.init();

    match command {
        Command::Show => {
            println!("{}", ui::status_line(service.status()));
            if !service.status().is_available() {
                std::process::exit(1);
            }
        }
        Command::Open => match service.open() {
            Ok(path) => println!("{}", path.display()),
            Err(e) => fail(&e),
        },
        Command::Max { component } => {
            require_manifest(&service);
            match service.max_increase(component) {
                Ok(max) => println!("{}", max),
                Err(e) => fail(&e),
            }
        }
        Command::Bump {
            component,
            by,
            prompt,
            ..
        } => {
            require_manifest(&service);

            let by = if prompt {
                match ui::prompt_increase_by(&service, component)? {
                    Some(by) => by,
                    None => {
                        println!("Operation cancelled by user.");
                        return Ok(());
                    }
                }
            } else {
                by
            };

            match service.bump(component, by) {
                Ok(report) => {
                    ui::display_bump(&report);
                    if let BumpReport::Pending { text, .. } = &report {
                        print!("{}", text);
                    }
                }
                Err(e) => fail(&e),
            }
        }
    }

    Ok(())
}

fn require_manifest(service: &ProjectVersionService<FsManifestStore>) {
    if !service.package_file_exists() {
        fail(&ProjectVersionError::ManifestNotFound);
    }
}

fn fail(err: &ProjectVersionError) -> ! {
    ui::display_failure(err);
    std::process::exit(1);
}
