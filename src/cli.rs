use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;

use pushlab::config::{AppConfig, ConfigError, DEFAULT_APP_NAME};

#[allow(clippy::large_enum_variant)]
pub(crate) enum RunOutcome {
    Serve(AppConfig),
    Exit(i32),
}

pub(crate) fn run() -> RunOutcome {
    let cli = Cli::parse();
    if let Some(Command::Init(args)) = cli.command {
        let code = run_init(args);
        return RunOutcome::Exit(code);
    }

    match resolve_config(cli) {
        Ok(config) => RunOutcome::Serve(config),
        Err(err) => {
            tracing::error!("{err}");
            tracing::error!("run `pushlab init` to generate VAPID credentials");
            RunOutcome::Exit(2)
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "pushlab",
    version,
    about = "Web push notification playground"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
    #[arg(long, env = "PUSHLAB_LISTEN", default_value = "127.0.0.1:3000")]
    listen: SocketAddr,
    #[arg(long, env = "PUSHLAB_APP_NAME", default_value = DEFAULT_APP_NAME)]
    app_name: String,
    #[arg(long, env = "WEB_PUSH_PUBLIC_KEY")]
    vapid_public_key: Option<String>,
    /// Contact for the push service: an email address, mailto: or https: URI.
    #[arg(long, env = "WEB_PUSH_EMAIL")]
    vapid_subject: Option<String>,
    #[arg(long, env = "WEB_PUSH_PRIVATE_KEY", hide_env_values = true)]
    vapid_private_key: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a fresh VAPID key pair.
    Init(InitArgs),
}

#[derive(Args, Debug)]
struct InitArgs {
    #[arg(long)]
    subject: Option<String>,
}

/// Push credentials are required to serve; they are validated here, once.
fn resolve_config(cli: Cli) -> Result<AppConfig, ConfigError> {
    let vapid = pushlab::push::load_vapid_config(
        cli.vapid_public_key.as_deref(),
        cli.vapid_subject.as_deref(),
        cli.vapid_private_key.as_deref(),
    )?;

    Ok(AppConfig {
        listen: cli.listen,
        app_name: cli.app_name,
        vapid: Some(vapid),
    })
}

fn run_init(args: InitArgs) -> i32 {
    let credentials = match pushlab::generate_vapid_credentials() {
        Ok(credentials) => credentials,
        Err(err) => {
            tracing::error!("failed to generate VAPID credentials: {err}");
            return 1;
        }
    };
    let (subject, show_subject_note) = match args.subject {
        Some(subject) => (subject, false),
        None => ("mailto:you@example.com".to_string(), true),
    };

    println!("VAPID credentials generated.");
    println!();
    println!("WEB_PUSH_PUBLIC_KEY=\"{}\"", credentials.public_key);
    println!("WEB_PUSH_PRIVATE_KEY=\"{}\"", credentials.private_key);
    println!("WEB_PUSH_EMAIL=\"{subject}\"");
    if show_subject_note {
        println!();
        println!("Note: replace WEB_PUSH_EMAIL with a contact address you control.");
    }
    0
}
