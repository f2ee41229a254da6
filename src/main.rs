use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use gatehouse::api::HttpAuthApi;
use gatehouse::config::{self, ApiConfig, ConfigError};
use gatehouse::forms::{SignInForm, SignUpForm};
use gatehouse::gate::Route;
use gatehouse::pages::Navigator;
use gatehouse::session::AuthContext;
use gatehouse::storage::FileStore;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("no page at path `{0}`")]
    UnknownRoute(String),
}

#[derive(Parser, Debug)]
#[command(name = "gatehouse", about = "Sign up, sign in, and open the gated application page")]
struct Cli {
    /// Auth API base URL. Overrides `GATEHOUSE_API_URL`.
    #[arg(long)]
    api_url: Option<String>,

    /// Token storage file. Overrides `GATEHOUSE_TOKEN_FILE`.
    #[arg(long)]
    token_file: Option<PathBuf>,

    /// `auth` or `users`. Overrides `GATEHOUSE_SIGNUP_ENDPOINT`.
    #[arg(long)]
    signup_endpoint: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit the sign-in form.
    Signin {
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "", env = "GATEHOUSE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Submit the sign-up form.
    Signup {
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "", env = "GATEHOUSE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Open the application page.
    App,
    /// Sign out and return to the sign-in page.
    Signout,
    /// Open the page at a path (`/`, `/signin`, `/signup`, `/application`).
    Open { path: String },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // A missing .env file is fine; the real environment still applies.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let api = HttpAuthApi::new(&config)?;
    let store = FileStore::new(&config.token_file);
    tracing::debug!(base_url = api.base_url(), token_file = %store.path().display(), "config loaded");

    let mut nav = Navigator::new(AuthContext::new(Arc::new(store), Arc::new(api)));

    let view = match cli.command {
        Command::Signin { email, password } => nav.submit_sign_in(SignInForm { email, password }).await,
        Command::Signup { email, name, password } => nav.submit_sign_up(SignUpForm { email, name, password }).await,
        Command::App => nav.open(Route::Application).await,
        Command::Signout => nav.sign_out().await,
        Command::Open { path } => {
            let route = Route::from_path(&path).ok_or(CliError::UnknownRoute(path))?;
            nav.open(route).await
        }
    };

    println!("{view}");
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}

/// CLI flags win over the process environment.
fn load_config(cli: &Cli) -> Result<ApiConfig, ConfigError> {
    let token_file = cli
        .token_file
        .as_ref()
        .map(|path| path.to_string_lossy().into_owned());

    ApiConfig::from_lookup(|key| {
        let flag = match key {
            config::ENV_API_URL => cli.api_url.clone(),
            config::ENV_TOKEN_FILE => token_file.clone(),
            config::ENV_SIGNUP_ENDPOINT => cli.signup_endpoint.clone(),
            _ => None,
        };
        flag.or_else(|| std::env::var(key).ok())
    })
}
