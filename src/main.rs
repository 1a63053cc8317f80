use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use dev_report::{
    count_rows, report_file_name, write_report, Config, DateWindow, GitHubClient,
    MailCredentials, MailService, RecordKind, RepoRef, ReportPipeline,
};

#[derive(Parser)]
#[command(name = "dev-report")]
#[command(about = "Monthly developer activity reports rendered as Markdown")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the YAML configuration file
    #[arg(long, default_value = "dev-report.yml")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a report for one month
    Generate {
        /// Month (1-12); defaults to the previous month
        #[arg(long, requires = "year")]
        month: Option<u32>,

        /// Four-digit year
        #[arg(long, requires = "month")]
        year: Option<i32>,

        /// Kind of activity to report
        #[arg(long, value_enum, default_value = "merged-prs")]
        kind: RecordKind,

        /// Output file (defaults to <output_dir>/<kind>-<year>-<MM>.md)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Repository to include (owner/repo); replaces the configured list
        #[arg(long = "repo")]
        repos: Vec<String>,

        /// Email the report to the configured recipients
        #[arg(long)]
        email: bool,

        /// GitHub token used as a bearer credential
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        github_token: Option<String>,
    },

    /// List configured repositories
    Repos,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("dev_report=info".parse()?))
        .init();

    let cli = Cli::parse();
    let mut config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Generate {
            month,
            year,
            kind,
            output,
            repos,
            email,
            github_token,
        } => {
            if !repos.is_empty() {
                config.repositories = repos
                    .iter()
                    .map(|r| RepoRef::parse(r))
                    .collect::<Result<Vec<_>>>()?;
            }
            config.github.token = github_token;

            let window = match (month, year) {
                (Some(month), Some(year)) => DateWindow::new(month, year)?,
                _ => DateWindow::previous_month(chrono::Local::now().date_naive())?,
            };

            generate(&config, kind, &window, output, email).await?;
        }
        Commands::Repos => list_repos(&config),
    }

    Ok(())
}

async fn generate(
    config: &Config,
    kind: RecordKind,
    window: &DateWindow,
    output: Option<PathBuf>,
    email: bool,
) -> Result<()> {
    if config.repositories.is_empty() {
        anyhow::bail!("No repositories configured; add them to the config file or pass --repo");
    }

    if config.github.token.is_none() {
        info!("GITHUB_TOKEN not set, using unauthenticated requests");
    }

    let mail = MailService::from_config(&config.mail);
    if email && !mail.is_enabled() {
        anyhow::bail!("--email requires mail.enabled in the config file");
    }

    let github = GitHubClient::new(&config.github)?;
    let pipeline = ReportPipeline::new(github, config);

    let reports = pipeline.collect(kind, window).await?;
    let document = pipeline.render(kind, window, &reports);

    info!(
        repositories = reports.len(),
        records = count_rows(&reports),
        "Report rendered"
    );

    let path = output.unwrap_or_else(|| {
        config
            .report
            .output_dir
            .join(report_file_name(kind, window))
    });
    write_report(&path, &document)?;
    println!(" 📝 Report created @ {}", path.display());

    if email {
        let credentials = MailCredentials {
            client_secret: std::env::var("MAIL_CLIENT_SECRET")
                .context("MAIL_CLIENT_SECRET not set")?,
            refresh_token: std::env::var("MAIL_REFRESH_TOKEN")
                .context("MAIL_REFRESH_TOKEN not set")?,
        };
        let subject = format!(
            "{} {} for {} {}",
            config.report.organization,
            kind.title(),
            window.month_label,
            window.year
        );
        mail.deliver(&credentials, &subject, &document).await?;
        println!(" ✉️  Report emailed to {} recipient(s)", config.mail.recipients.len());
    }

    Ok(())
}

fn list_repos(config: &Config) {
    if config.repositories.is_empty() {
        println!("No repositories configured.");
        return;
    }

    println!("Configured repositories:\n");
    for repo in &config.repositories {
        println!("  {}", repo);
    }
}
