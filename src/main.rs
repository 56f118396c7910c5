// jothida command-line entry point.
// Scores, charts, matching and reports against the Jothida AI backend.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use jothida::api::{ApiClient, ChartData, Language};
use jothida::config::Config;
use jothida::error::{JothidaError, Result};
use jothida::report::generate_report_html;
use jothida::scoring::{ScoringService, UserProfile, calculate_fallback_score, fallback_score_on};
use jothida::storage::TokenStore;

#[derive(Parser)]
#[command(name = "jothida", version, about = "Jothida AI astrology client")]
struct Cli {
    /// Response language: ta, kn or en. Overrides the config file.
    #[arg(long, global = true)]
    lang: Option<Language>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Today's overall score, falling back to the daily score offline.
    Score(BirthArgs),
    /// The deterministic fallback score, no network.
    Fallback {
        #[arg(long)]
        rasi: Option<String>,
        #[arg(long)]
        nakshatra: Option<String>,
        /// Date to score (YYYY-MM-DD), defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Generate a birth chart.
    Chart {
        #[command(flatten)]
        birth: BirthArgs,
        /// Also write an HTML report here.
        #[arg(long)]
        html: Option<PathBuf>,
    },
    /// Porutham matching for two profiles given as JSON files.
    Match {
        #[arg(long)]
        bride: PathBuf,
        #[arg(long)]
        groom: PathBuf,
    },
    /// Render an HTML report from a saved chart JSON file.
    Report {
        #[arg(long)]
        chart: PathBuf,
        /// Profile JSON file for the header.
        #[arg(long)]
        profile: Option<PathBuf>,
        /// Output file, stdout when omitted.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Store an API token.
    Login {
        #[arg(long, env = "JOTHIDA_TOKEN")]
        token: String,
    },
    /// Remove the stored API token.
    Logout,
}

#[derive(Args)]
struct BirthArgs {
    #[arg(long, default_value = "")]
    name: String,
    /// Birth date, YYYY-MM-DD.
    #[arg(long)]
    date: Option<String>,
    /// Birth time, HH:MM.
    #[arg(long)]
    time: Option<String>,
    #[arg(long)]
    place: Option<String>,
    #[arg(long)]
    rasi: Option<String>,
    #[arg(long)]
    nakshatra: Option<String>,
}

impl BirthArgs {
    fn profile(&self) -> UserProfile {
        UserProfile {
            name: self.name.clone(),
            birth_date: self.date.clone(),
            birth_time: self.time.clone(),
            birth_place: self.place.clone(),
            rasi: self.rasi.clone(),
            nakshatra: self.nakshatra.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jothida=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(lang) = cli.lang {
        config.language = lang;
    }

    match cli.command {
        Command::Score(birth) => {
            let profile = birth.profile();
            let service = ScoringService::from_config(Arc::new(client(&config)?), &config);
            let score = service.score_or_fallback(&profile, config.language).await;

            #[derive(Serialize)]
            struct Output<'a> {
                score: jothida::scoring::DisplayScore,
                result: Option<&'a jothida::scoring::UnifiedScoreResult>,
            }
            let cached = service.cached_result(&profile);
            print_json(&Output {
                score,
                result: cached.as_deref(),
            })
        }
        Command::Fallback {
            rasi,
            nakshatra,
            date,
        } => {
            let profile = UserProfile {
                rasi,
                nakshatra,
                ..UserProfile::default()
            };
            let score = match date {
                Some(date) => fallback_score_on(&profile, date),
                None => calculate_fallback_score(&profile),
            };
            println!("{score}");
            Ok(())
        }
        Command::Chart { birth, html } => {
            let profile = birth.profile();
            let details = profile.birth_details()?;
            let chart = client(&config)?
                .generate_jathagam(&details, config.language)
                .await?;
            if let Some(path) = html {
                write_file(&path, &generate_report_html(&profile, &chart))?;
                tracing::info!(path = %path.display(), "report written");
            }
            print_json(&chart)
        }
        Command::Match { bride, groom } => {
            let bride = read_json::<UserProfile>(&bride)?;
            let groom = read_json::<UserProfile>(&groom)?;
            let to_details = |p: &UserProfile| {
                p.birth_details()
                    .map_err(|e| JothidaError::Other(format!("{}: {e}", p.name)))
            };
            let result = client(&config)?
                .check_matching(&to_details(&bride)?, &to_details(&groom)?, config.language)
                .await?;
            tracing::info!(
                matched = result.matched_count(),
                total = result.poruthams.len(),
                "matching complete"
            );
            print_json(&result)
        }
        Command::Report {
            chart,
            profile,
            out,
        } => {
            let chart = read_json::<ChartData>(&chart)?;
            let profile = match profile {
                Some(path) => read_json::<UserProfile>(&path)?,
                None => UserProfile::default(),
            };
            let html = generate_report_html(&profile, &chart);
            match out {
                Some(path) => write_file(&path, &html),
                None => {
                    println!("{html}");
                    Ok(())
                }
            }
        }
        Command::Login { token } => {
            let store = TokenStore::default_location()?;
            store.save(&token)?;
            tracing::info!(path = %store.path().display(), "token saved");
            Ok(())
        }
        Command::Logout => {
            TokenStore::default_location()?.clear()?;
            tracing::info!("token removed");
            Ok(())
        }
    }
}

fn client(config: &Config) -> Result<ApiClient> {
    let token = TokenStore::default_token();
    ApiClient::new(config, token.as_deref())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
