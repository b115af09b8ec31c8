use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use deploydiff_common::{ensure_config, load_config, DeploymentReport, ModuleDiff, NoopFilter};
use deploydiff_core::{diff_bundle, Collaborators, Deployment, DeploymentDiffer};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "deploydiff")]
#[command(author = "deploydiff Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Compare two Maven repository publications of the same release", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare the modules of a group published in two repositories
    Diff {
        /// Left repository root
        left: PathBuf,

        /// Right repository root
        right: PathBuf,

        /// Release version to compare
        version: String,

        /// Dotted group id (overrides the configuration)
        #[arg(short, long)]
        group_id: Option<String>,

        /// Configuration file (defaults to the platform config directory)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Display name of the left repository
        #[arg(long)]
        left_name: Option<String>,

        /// Display name of the right repository
        #[arg(long)]
        right_name: Option<String>,

        /// Allow sibling directories along the group path
        #[arg(long)]
        no_unique_group: bool,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,

        /// Disable ANSI colors in output
        #[arg(long)]
        no_color: bool,
    },

    /// Write the default configuration if none exists
    InitConfig {
        /// Configuration file (defaults to the platform config directory)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

struct DiffArgs {
    left: PathBuf,
    right: PathBuf,
    version: String,
    group_id: Option<String>,
    config: Option<PathBuf>,
    left_name: Option<String>,
    right_name: Option<String>,
    no_unique_group: bool,
    json: bool,
    no_color: bool,
}

fn main() {
    // Initialize tracing to stderr (so JSON output can go cleanly to stdout)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Diff {
            left,
            right,
            version,
            group_id,
            config,
            left_name,
            right_name,
            no_unique_group,
            json,
            no_color,
        } => {
            let args = DiffArgs {
                left,
                right,
                version,
                group_id,
                config,
                left_name,
                right_name,
                no_unique_group,
                json,
                no_color,
            };
            if let Err(e) = run_diff(args) {
                error!("Diff failed: {:#}", e);
                std::process::exit(1);
            }
        }
        Commands::InitConfig { config } => {
            if let Err(e) = run_init_config(config) {
                error!("Init failed: {:#}", e);
                std::process::exit(1);
            }
        }
    }
}

fn run_diff(args: DiffArgs) -> anyhow::Result<()> {
    if !args.left.is_dir() {
        bail!("Left repository does not exist: {}", args.left.display());
    }
    if !args.right.is_dir() {
        bail!("Right repository does not exist: {}", args.right.display());
    }

    let loaded = load_config(args.config.as_deref())?;
    if loaded.exists {
        info!("Using configuration: {}", loaded.path.display());
    }
    let mut config = loaded.config;
    if let Some(name) = args.left_name {
        config.left_name = name;
    }
    if let Some(name) = args.right_name {
        config.right_name = name;
    }
    if args.no_unique_group {
        config.unique_group_path = false;
    }
    let Some(group_id) = args.group_id.or_else(|| config.group_id.clone()) else {
        bail!("No group id given: use --group-id or set 'group_id' in the configuration");
    };

    info!("Comparing {} {}:", group_id, args.version);
    info!("  {}: {}", config.left_name, args.left.display());
    info!("  {}: {}", config.right_name, args.right.display());

    let collaborators = Collaborators::local();
    let group = Deployment::from_config(&config, &args.left, &args.right, args.version.as_str())?
        .resolve_group_id(config.unique_group_path, &group_id, collaborators.lister.as_ref())?;

    let mut report = DeploymentDiffer::new(group.clone(), collaborators.clone()).diff()?;
    for bundle in &config.bundles {
        let bundle_diff = diff_bundle(&group, bundle, collaborators.archives.as_ref(), &NoopFilter)
            .with_context(|| format!("Failed to compare {}", bundle.title))?;
        report.bundles.push(bundle_diff);
    }

    if args.json {
        let output = serde_json::to_string_pretty(&report)?;
        println!("{output}");
        return Ok(());
    }

    let use_color = !args.no_color && std::io::stdout().is_terminal();
    print!("{}", render_summary(&report, use_color));
    Ok(())
}

fn run_init_config(config: Option<PathBuf>) -> anyhow::Result<()> {
    let loaded = ensure_config(config.as_deref())?;
    if loaded.exists {
        println!("Configuration already exists: {}", loaded.path.display());
    } else {
        println!("Wrote default configuration: {}", loaded.path.display());
    }
    Ok(())
}

struct Marks {
    same: &'static str,
    different: &'static str,
    left: &'static str,
    right: &'static str,
    reset: &'static str,
}

impl Marks {
    fn new(use_color: bool) -> Self {
        if use_color {
            Self {
                same: "\x1b[32m",      // Green
                different: "\x1b[31m", // Red
                left: "\x1b[33m",      // Yellow
                right: "\x1b[34m",     // Blue
                reset: "\x1b[0m",
            }
        } else {
            Self {
                same: "",
                different: "",
                left: "",
                right: "",
                reset: "",
            }
        }
    }
}

fn render_summary(report: &DeploymentReport, use_color: bool) -> String {
    let marks = Marks::new(use_color);
    let mut out = String::new();
    let rule = "=".repeat(80);

    out.push_str(&format!("\n{}\n", rule));
    out.push_str(&format!(
        "Deployment Diff: {} {} ({} vs. {})\n",
        report.group_id, report.version, report.left_name, report.right_name
    ));
    out.push_str(&format!("{}\n", rule));

    let mut similar = 0;
    for module in &report.modules {
        if module.module.right.is_none() {
            out.push_str(&format!(
                "{}  <<  {} {}: missing in {}\n",
                marks.left, marks.reset, module.module.name, report.right_name
            ));
            continue;
        }
        let problems = module_problems(module, &report.left_name, &report.right_name);
        if problems.is_empty() {
            similar += 1;
            out.push_str(&format!(
                "{}  ==  {} {}\n",
                marks.same, marks.reset, module.module.name
            ));
        } else {
            out.push_str(&format!(
                "{}  !=  {} {}: {}\n",
                marks.different,
                marks.reset,
                module.module.name,
                problems.join(", ")
            ));
        }
    }
    for name in &report.only_in_right {
        out.push_str(&format!(
            "{}  >>  {} {}: missing in {}\n",
            marks.right, marks.reset, name, report.left_name
        ));
    }
    for bundle in &report.bundles {
        let (mark, symbol) = if bundle.entries.has_same_entries() {
            (marks.same, "==")
        } else {
            (marks.different, "!=")
        };
        out.push_str(&format!(
            "{}  {}  {} {} ({} vs. {})\n",
            mark,
            symbol,
            marks.reset,
            bundle.title,
            bundle.left.display(),
            bundle.right.display()
        ));
    }

    out.push_str(&format!("\n{}\n", rule));
    out.push_str("Summary:\n");
    out.push_str(&format!("  Modules:         {}\n", report.modules.len()));
    out.push_str(&format!("  Similar:         {}\n", similar));
    out.push_str(&format!(
        "  Mismatching:     {}\n",
        report.mismatching_modules().count()
    ));
    out.push_str(&format!(
        "  Only in {}:{}{}\n",
        report.right_name,
        " ".repeat(9usize.saturating_sub(report.right_name.len())),
        report.only_in_right.len()
    ));
    out.push_str(&format!(
        "  Result:          {}\n",
        if report.is_clean() { "clean" } else { "mismatches found" }
    ));
    out.push_str(&format!("{}\n", rule));
    out
}

fn module_problems(module: &ModuleDiff, left_name: &str, right_name: &str) -> Vec<String> {
    let mut problems = Vec::new();
    let counts = [
        (module.only_in_left().len(), format!("file(s) only in {}", left_name)),
        (module.only_in_right().len(), format!("file(s) only in {}", right_name)),
        (
            module.pom.only_in_left.len(),
            format!("dependency(ies) only in {}", left_name),
        ),
        (
            module.pom.only_in_right.len(),
            format!("dependency(ies) only in {}", right_name),
        ),
        (module.pom.mismatches.len(), "dependency mismatch(es)".to_string()),
        (
            module
                .archives
                .iter()
                .filter(|archive| !archive.has_same_entries())
                .count(),
            "archive mismatch(es)".to_string(),
        ),
        (module.archive_failures.len(), "archive failure(s)".to_string()),
    ];
    for (count, label) in counts {
        if count > 0 {
            problems.push(format!("{} {}", count, label));
        }
    }
    problems
}
