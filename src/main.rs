//! Vigil - Web Attack-Surface Crawler and Probe Engine CLI

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tabled::builder::Builder;
use tabled::settings::Style;
use tracing_subscriber::EnvFilter;

use vigil::audit::AuditEngine;
use vigil::config;
use vigil::models::{AuditConfig, ProbeCategory, ResolvedFinding, ScanMode, Severity};
use vigil::report;

/// Vigil - crawl a web property and probe every discovered route
#[derive(Parser)]
#[command(name = "vigil", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover pages and API endpoints from a start URL
    Crawl {
        /// Start URL
        #[arg(short, long)]
        target: String,

        /// Page budget for the crawl
        #[arg(long)]
        max_pages: Option<usize>,

        /// Render pages in a headless browser (requires browser feature)
        #[arg(long)]
        render: bool,

        /// Directory for output artifacts
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Probe a set of URLs from a crawl document or a single target
    Probe {
        /// Targets JSON: flat URL array or {pages, apiEndpoints}
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Single target URL (alternative to --input)
        #[arg(short, long)]
        target: Option<String>,

        /// Probe depth (quick or deep)
        #[arg(short, long, default_value = "quick")]
        mode: String,

        /// Planner service URL
        #[arg(long)]
        planner_url: Option<String>,

        /// Solution service URL
        #[arg(long)]
        solution_url: Option<String>,

        /// Directory for output artifacts
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Crawl a target, then probe everything discovered
    Audit {
        /// Start URL
        #[arg(short, long)]
        target: String,

        /// Probe depth (quick or deep)
        #[arg(short, long, default_value = "quick")]
        mode: String,

        /// Page budget for the crawl
        #[arg(long)]
        max_pages: Option<usize>,

        /// Render pages in a headless browser (requires browser feature)
        #[arg(long)]
        render: bool,

        /// Planner service URL
        #[arg(long)]
        planner_url: Option<String>,

        /// Solution service URL
        #[arg(long)]
        solution_url: Option<String>,

        /// Directory for output artifacts
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// List probe categories
    Categories,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "vigil=debug" } else { "vigil=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

fn print_banner() {
    let banner = r#"
    ╔══════════════════════════════════════╗
    ║  VIGIL v0.1.0                        ║
    ║  Web Crawl + Probe Engine            ║
    ╚══════════════════════════════════════╝
    "#;
    println!("{}", banner.cyan());
}

fn load_base_config(config_path: Option<&PathBuf>) -> Result<AuditConfig, Box<dyn std::error::Error>> {
    if let Some(path) = config_path {
        Ok(config::load_config(path)?)
    } else {
        let default_path = Path::new("config/default.toml");
        if default_path.exists() {
            Ok(config::load_config(default_path)?)
        } else {
            Ok(AuditConfig::default())
        }
    }
}

fn print_summary(findings: &[ResolvedFinding]) {
    let severities = [
        (Severity::Critical, "Critical"),
        (Severity::High, "High"),
        (Severity::Medium, "Medium"),
        (Severity::Low, "Low"),
    ];

    println!("\n{}", "  Findings Summary".bold());
    println!("  {}", "─".repeat(35));

    let mut builder = Builder::default();
    builder.push_record(["Severity", "Count"]);

    for (severity, label) in &severities {
        let count = findings
            .iter()
            .filter(|f| &f.finding.severity == severity)
            .count();
        builder.push_record([label.to_string(), count.to_string()]);
    }
    builder.push_record(["Total".to_string(), findings.len().to_string()]);

    let mut table = builder.build();
    table.with(Style::rounded());
    println!("{table}");

    let count_of = |severity: &Severity| {
        findings
            .iter()
            .filter(|f| &f.finding.severity == severity)
            .count()
    };

    println!(
        "\n  {} {} {} {}",
        format!("{} Critical", count_of(&Severity::Critical)).red().bold(),
        format!("{} High", count_of(&Severity::High)).bright_red(),
        format!("{} Medium", count_of(&Severity::Medium)).yellow(),
        format!("{} Low", count_of(&Severity::Low)).blue(),
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Crawl {
            target,
            max_pages,
            render,
            out_dir,
            config: config_path,
            verbose,
        } => {
            init_tracing(verbose);
            print_banner();

            let mut audit_config = load_base_config(config_path.as_ref())?;
            config::merge_cli_args(
                &mut audit_config,
                Some(target),
                max_pages,
                None,
                render,
                None,
                None,
            );

            println!("  {} {}", "Target:".bold(), audit_config.target.green());
            println!(
                "  {} {}\n",
                "Page budget:".bold(),
                audit_config.max_pages.to_string().cyan()
            );

            let engine = AuditEngine::new(audit_config);
            let outcome = engine.crawl().await?;

            report::json::write_snapshot(&outcome.quick, &out_dir.join("crawl_quick.json"))?;
            report::json::write_snapshot(&outcome.deep, &out_dir.join("crawl_deep.json"))?;

            println!(
                "\n  {} {} pages, {} endpoints",
                "Discovered:".bold(),
                outcome.deep.pages.len().to_string().green(),
                outcome.deep.api_endpoints.len().to_string().green(),
            );
        }

        Commands::Probe {
            input,
            target,
            mode,
            planner_url,
            solution_url,
            out_dir,
            config: config_path,
            verbose,
        } => {
            init_tracing(verbose);
            print_banner();

            let mode: ScanMode = mode.parse().map_err(vigil::error::VigilError::ConfigError)?;
            let mut audit_config = load_base_config(config_path.as_ref())?;
            config::merge_cli_args(
                &mut audit_config,
                target.clone(),
                None,
                Some(mode),
                false,
                planner_url,
                solution_url,
            );

            let (pages, endpoints) = match (&input, &target) {
                (Some(path), _) => report::json::load_targets(path)?,
                (None, Some(url)) => (vec![url.clone()], Vec::new()),
                (None, None) => {
                    return Err("either --input or --target is required".into());
                }
            };

            let engine = AuditEngine::new(audit_config);
            let result = engine.probe(pages, endpoints).await?;

            print_summary(&result.findings);

            report::json::write_findings(&result.findings, &out_dir.join("findings.json"))?;
            report::json::write_fingerprints(
                &result.fingerprints,
                &out_dir.join("fingerprints.json"),
            )?;

            println!(
                "\n  {} {} requests",
                "Completed with".bold(),
                result.total_requests.to_string().cyan()
            );
        }

        Commands::Audit {
            target,
            mode,
            max_pages,
            render,
            planner_url,
            solution_url,
            out_dir,
            config: config_path,
            verbose,
        } => {
            init_tracing(verbose);
            print_banner();

            let mode: ScanMode = mode.parse().map_err(vigil::error::VigilError::ConfigError)?;
            let mut audit_config = load_base_config(config_path.as_ref())?;
            config::merge_cli_args(
                &mut audit_config,
                Some(target),
                max_pages,
                Some(mode),
                render,
                planner_url,
                solution_url,
            );

            println!("  {} {}", "Target:".bold(), audit_config.target.green());
            println!(
                "  {} {:?}\n",
                "Mode:".bold(),
                audit_config.mode
            );

            let engine = AuditEngine::new(audit_config);
            let (outcome, result) = engine.run().await?;

            print_summary(&result.findings);

            report::json::write_snapshot(&outcome.quick, &out_dir.join("crawl_quick.json"))?;
            report::json::write_snapshot(&outcome.deep, &out_dir.join("crawl_deep.json"))?;
            report::json::write_findings(&result.findings, &out_dir.join("findings.json"))?;
            report::json::write_fingerprints(
                &result.fingerprints,
                &out_dir.join("fingerprints.json"),
            )?;
            report::json::write_audit(&result, &out_dir.join("audit.json"))?;

            println!(
                "\n  {} {}",
                "Artifacts saved to:".bold(),
                out_dir.display().to_string().green()
            );
        }

        Commands::Categories => {
            print_banner();
            println!("  {}\n", "Probe Categories:".bold());
            for category in ProbeCategory::ALL {
                println!(
                    "    {} {}",
                    format!("{:24}", category.tag()).cyan().bold(),
                    category.description()
                );
            }
            println!();
        }
    }

    Ok(())
}
