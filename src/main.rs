use std::io::IsTerminal;
use std::io::Read;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use miette::{Context, IntoDiagnostic, Result};

use vigil_core::VigilConfig;
use vigil_review::decision::decide;
use vigil_review::github::{parse_pr_reference, GitHubClient};
use vigil_review::pipeline::ReviewPipeline;
use vigil_review::report;

#[derive(Parser)]
#[command(
    name = "vigil",
    version,
    about = "AI pull-request reviewer",
    long_about = "Vigil reviews code changes with an LLM and publishes the verdict on the pull request.\n\n\
                   Examples:\n  \
                     git diff main | vigil review    Review a diff from stdin\n  \
                     vigil review --file changes.patch\n  \
                     vigil review --pr owner/repo#1 --post\n  \
                     vigil serve                     Speak the line protocol on stdio\n  \
                     vigil init                      Create a .vigil.toml config file"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .vigil.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    format: ReportFormat,
}

#[derive(Subcommand)]
enum Command {
    /// Run an AI-powered review of a diff
    #[command(long_about = "Run an AI-powered review of a diff.\n\n\
        Accepts diffs from stdin, a file, or a GitHub PR. The patch is clamped to the\n\
        configured byte budget before it is sent to the provider. With --post the\n\
        rendered report is published on the PR using the decided review event.\n\n\
        Examples:\n  git diff | vigil review\n  vigil review --pr owner/repo#123 --post")]
    Review {
        /// GitHub PR to review (format: owner/repo#123)
        #[arg(
            long,
            long_help = "GitHub PR to review.\n\nFormat: owner/repo#123\nRequires GITHUB_TOKEN env var."
        )]
        pr: Option<String>,
        /// Read diff from file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,
        /// Post the review to the GitHub PR
        #[arg(
            long,
            long_help = "Post the rendered review to the GitHub PR.\n\nRequires --pr and GITHUB_TOKEN. The review event follows the configured\nposting mode: approve, comment, or request_changes on High findings."
        )]
        post: bool,
    },
    /// Serve the review line protocol on stdio
    #[command(long_about = "Serve the review line protocol on stdio.\n\n\
        Reads one JSON request per line ({\"method\":\"review_diff\",\"params\":{\"patch\":\"...\"}})\n\
        and writes exactly one review result line per recognized request. Set\n\
        VIGIL_ONE_SHOT=1 (or one_shot in .vigil.toml) to close after the first response.")]
    Serve,
    /// Create a default .vigil.toml configuration file
    #[command(long_about = "Create a default .vigil.toml configuration file.\n\n\
        Generates a commented-out template with all available options.\n\
        Fails if .vigil.toml already exists.")]
    Init,
    /// Generate shell completion scripts
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    /// Human-readable summary
    Text,
    /// GitHub-flavored Markdown (the PR comment body)
    Markdown,
    /// Machine-readable JSON matching the review result schema
    Json,
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!("vigil v{version} — AI pull-request reviewer\n");

    println!("Quick start:");
    println!("  vigil init                      Create a .vigil.toml config file");
    println!("  git diff | vigil review         Review your latest changes with AI");
    println!("  vigil review --pr o/r#1 --post  Review and publish on a GitHub PR\n");

    println!("All commands:");
    println!("  review    AI-powered code review (stdin, file, or GitHub PR)");
    println!("  serve     Speak the review line protocol on stdio");
    println!("  init      Create default configuration\n");

    println!("Run 'vigil <command> --help' for details.");
}

fn read_diff_input(file: &Option<PathBuf>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err(format!("reading {}", path.display())),
        None => {
            if std::io::stdin().is_terminal() {
                miette::bail!(miette::miette!(
                    help = "Pipe a diff to vigil, e.g.: git diff | vigil review\n       Or use --file <path> or --pr owner/repo#123",
                    "No diff input"
                ));
            }
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .into_diagnostic()
                .wrap_err("reading stdin")?;
            Ok(input)
        }
    }
}

// Friendlier than the factory's configuration error: points at the exact
// env var for the selected provider.
fn credential_hint(config: &VigilConfig) -> Result<()> {
    let provider = config.llm.provider.to_lowercase();
    let (key, env_var) = match provider.as_str() {
        "anthropic" => (&config.llm.anthropic.api_key, "ANTHROPIC_API_KEY"),
        "gemini" => (&config.llm.gemini.api_key, "GEMINI_API_KEY"),
        _ => (&config.llm.openai.api_key, "OPENAI_API_KEY"),
    };
    if key.is_none() {
        miette::bail!(miette::miette!(
            help = "Set {env_var} or add api_key in your .vigil.toml under [llm.{provider}]",
            "No API key configured for provider '{provider}'"
        ));
    }
    Ok(())
}

fn spinner(message: String) -> Option<indicatif::ProgressBar> {
    if !std::io::stderr().is_terminal() {
        return None;
    }
    let pb = indicatif::ProgressBar::new_spinner();
    pb.set_style(
        indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg} ({elapsed})").unwrap(),
    );
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(120));
    Some(pb)
}

const DEFAULT_CONFIG: &str = r#"# Vigil Configuration
# Environment variables override these values.

[llm]
# provider = "openai"        # openai | anthropic | gemini

[llm.openai]
# model = "gpt-4-turbo-preview"
# api_key = "..."            # or OPENAI_API_KEY

[llm.anthropic]
# model = "claude-3-5-sonnet-20240620"
# api_key = "..."            # or ANTHROPIC_API_KEY

[llm.gemini]
# model = "gemini-2.0-flash"
# api_key = "..."            # or GEMINI_API_KEY

[review]
# max_patch_bytes = 350000
# event = "comment"          # approve | comment | request_changes
# fail_on_high = false       # exit non-zero on High-severity findings
# one_shot = false           # serve: close after the first response
"#;

#[tokio::main]
async fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();

    match cli.command {
        None => {
            print_welcome();
            Ok(())
        }
        Some(Command::Review {
            ref pr,
            ref file,
            post,
        }) => {
            let config = VigilConfig::load(cli.config.as_deref())?;

            let patch = if let Some(pr_ref) = pr {
                let (owner, repo, pr_number) = parse_pr_reference(pr_ref)?;
                let github = GitHubClient::new(None)?;
                github.get_pr_diff(&owner, &repo, pr_number).await?
            } else {
                read_diff_input(file)?
            };

            if patch.trim().is_empty() {
                eprintln!("warning: patch is empty; nothing to review");
                return Ok(());
            }

            credential_hint(&config)?;

            let pipeline = ReviewPipeline::new(&config)?;
            let pb = spinner(format!("Reviewing with {}...", pipeline.provider_name()));
            let result = pipeline.review(&patch).await;
            if let Some(pb) = pb {
                pb.finish_and_clear();
            }

            match cli.format {
                ReportFormat::Text => print!("{}", report::to_text(&result)),
                ReportFormat::Markdown => print!("{}", report::to_markdown(&result)),
                ReportFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&result).into_diagnostic()?
                    );
                }
            }

            let decision = decide(&result, config.review.event, config.review.fail_on_high);

            if post {
                let Some(pr_ref) = pr else {
                    miette::bail!("--post requires --pr");
                };
                let (owner, repo, pr_number) = parse_pr_reference(pr_ref)?;
                let github = GitHubClient::new(None)?;
                let body = report::to_markdown(&result);
                github
                    .post_review(&owner, &repo, pr_number, &body, decision.verdict)
                    .await?;
                eprintln!("Posted review to {pr_ref} (event: {})", decision.verdict);
            }

            if decision.fail_pipeline {
                eprintln!("High severity issues found. Failing pipeline.");
                std::process::exit(1);
            }

            Ok(())
        }
        Some(Command::Serve) => {
            let config = VigilConfig::load(cli.config.as_deref())?;
            credential_hint(&config)?;
            let pipeline = ReviewPipeline::new(&config)?;
            vigil_server::server::serve(&pipeline, config.review.one_shot).await?;
            Ok(())
        }
        Some(Command::Init) => {
            let path = std::path::Path::new(".vigil.toml");
            if path.exists() {
                miette::bail!(".vigil.toml already exists");
            }
            std::fs::write(path, DEFAULT_CONFIG).into_diagnostic()?;
            println!("Created .vigil.toml with default configuration");
            Ok(())
        }
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "vigil", &mut std::io::stdout());
            Ok(())
        }
    }
}
