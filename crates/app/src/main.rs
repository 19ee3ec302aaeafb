use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{HttpSummaryClient, ProviderConfig, SummaryGenerator, SummaryService};
use survey_core::model::QuestionSet;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

const DEFAULT_BIND: &str = "127.0.0.1:3000";
const DEFAULT_LOG_FILTER: &str = "info,services=debug,server=debug";

const DEFAULT_QUESTIONS: [&str; 10] = [
    "What is your full name?",
    "What is your highest qualification?",
    "What field of study did you specialize in?",
    "Which institution did you attend?",
    "Are you currently employed?",
    "What is your current job title?",
    "How many years of professional experience do you have?",
    "What are your key skills or areas of expertise?",
    "What are your short-term career goals?",
    "What type of role are you looking for?",
];

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidBind { raw: String },
    InvalidEndpoint { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidBind { raw } => write!(f, "invalid --bind value: {raw}"),
            ArgsError::InvalidEndpoint { raw } => write!(f, "invalid --endpoint value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    questions: QuestionSet,
    generator: Arc<dyn SummaryGenerator>,
}

impl UiApp for DesktopApp {
    fn questions(&self) -> QuestionSet {
        self.questions.clone()
    }

    fn summary_generator(&self) -> Arc<dyn SummaryGenerator> {
        Arc::clone(&self.generator)
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui    [--endpoint <url>] [--questions <path>]");
    eprintln!("  cargo run -p app -- serve [--bind <addr>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  ui calls the provider in-process unless --endpoint is given");
    eprintln!("  --bind {DEFAULT_BIND}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  SURVEY_AI_API_KEY (or OPENROUTER_API_KEY), SURVEY_AI_BASE_URL,");
    eprintln!("  SURVEY_AI_MODEL, SURVEY_AI_REFERER, SURVEY_AI_TITLE, SURVEY_AI_TIMEOUT_SECS,");
    eprintln!("  SURVEY_AI_EMPTY_CONTENT, SURVEY_BIND, SURVEY_ENDPOINT, SURVEY_QUESTIONS_FILE,");
    eprintln!("  RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Serve,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "serve" => Some(Self::Serve),
            _ => None,
        }
    }
}

struct UiArgs {
    endpoint: Option<String>,
    questions_file: Option<String>,
}

struct ServeArgs {
    bind: SocketAddr,
}

fn non_blank_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_endpoint(raw: String) -> Result<String, ArgsError> {
    let trimmed = raw.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_string())
    } else {
        Err(ArgsError::InvalidEndpoint { raw })
    }
}

fn parse_bind(raw: String) -> Result<SocketAddr, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidBind { raw })
}

impl UiArgs {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut endpoint = non_blank_env("SURVEY_ENDPOINT")
            .map(parse_endpoint)
            .transpose()?;
        let mut questions_file = non_blank_env("SURVEY_QUESTIONS_FILE");

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--endpoint" => {
                    endpoint = Some(parse_endpoint(require_value(args, "--endpoint")?)?);
                }
                "--questions" => {
                    questions_file = Some(require_value(args, "--questions")?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            endpoint,
            questions_file,
        })
    }
}

impl ServeArgs {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut bind =
            parse_bind(non_blank_env("SURVEY_BIND").unwrap_or_else(|| DEFAULT_BIND.into()))?;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--bind" => {
                    bind = parse_bind(require_value(args, "--bind")?)?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { bind })
    }
}

fn load_questions(path: Option<&str>) -> Result<QuestionSet, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(QuestionSet::new(DEFAULT_QUESTIONS)?);
    };
    let text = std::fs::read_to_string(path)
        .map_err(|err| format!("failed to read questions file {path}: {err}"))?;
    let questions = QuestionSet::from_lines(&text)
        .map_err(|err| format!("invalid questions file {path}: {err}"))?;
    Ok(questions)
}

fn warn_if_unconfigured() {
    if ProviderConfig::from_env().is_none() {
        warn!("no SURVEY_AI_API_KEY or OPENROUTER_API_KEY set; summary requests will fail");
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand launches the desktop survey.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    match cmd {
        Command::Serve => {
            let parsed = ServeArgs::parse(&mut iter).inspect_err(|_| print_usage())?;
            warn_if_unconfigured();
            let summaries = Arc::new(SummaryService::from_env());
            server::serve(parsed.bind, summaries).await?;
            Ok(())
        }
        Command::Ui => {
            let parsed = UiArgs::parse(&mut iter).inspect_err(|_| print_usage())?;
            let questions = load_questions(parsed.questions_file.as_deref())?;

            let generator: Arc<dyn SummaryGenerator> = match parsed.endpoint {
                Some(endpoint) => {
                    info!(%endpoint, "using remote summary endpoint");
                    Arc::new(HttpSummaryClient::new(&endpoint))
                }
                None => {
                    warn_if_unconfigured();
                    Arc::new(SummaryService::from_env())
                }
            };
            info!(questions = questions.len(), "launching survey window");

            let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
                questions,
                generator,
            });
            let context = build_app_context(&app);

            // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Survey AI")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> impl Iterator<Item = String> {
        values
            .iter()
            .map(|value| (*value).to_string())
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn default_questions_form_a_valid_set() {
        let questions = load_questions(None).unwrap();
        assert_eq!(questions.len(), 10);
        assert_eq!(questions.get(0), Some("What is your full name?"));
        assert_eq!(questions.get(9), Some("What type of role are you looking for?"));
    }

    #[test]
    fn missing_questions_file_is_reported() {
        let err = load_questions(Some("/definitely/not/here.txt")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.txt"));
    }

    #[test]
    fn serve_flags_override_the_bind_address() {
        let parsed = ServeArgs::parse(&mut args(&["--bind", "0.0.0.0:8080"])).unwrap();
        assert_eq!(parsed.bind, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn bad_flags_are_rejected() {
        assert!(matches!(
            ServeArgs::parse(&mut args(&["--bind", "nowhere"])),
            Err(ArgsError::InvalidBind { .. })
        ));
        assert!(matches!(
            ServeArgs::parse(&mut args(&["--bind"])),
            Err(ArgsError::MissingValue { flag: "--bind" })
        ));
        assert!(matches!(
            UiArgs::parse(&mut args(&["--endpoint", "localhost:3000"])),
            Err(ArgsError::InvalidEndpoint { .. })
        ));
        assert!(matches!(
            UiArgs::parse(&mut args(&["--verbose"])),
            Err(ArgsError::UnknownArg(arg)) if arg == "--verbose"
        ));
    }

    #[test]
    fn ui_flags_are_collected() {
        let parsed = UiArgs::parse(&mut args(&[
            "--endpoint",
            "http://127.0.0.1:3000/",
            "--questions",
            "questions.txt",
        ]))
        .unwrap();
        assert_eq!(parsed.endpoint.as_deref(), Some("http://127.0.0.1:3000/"));
        assert_eq!(parsed.questions_file.as_deref(), Some("questions.txt"));
    }
}
