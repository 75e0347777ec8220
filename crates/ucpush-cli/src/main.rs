#![forbid(unsafe_code)]

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};
use ucpush_client::HttpClient;
use ucpush_config::{PublishRequest, ServerConfig, ServerOverrides, ServerSection};
use ucpush_engine::{DeliveryMode, EnvFile, Remote, ResultLink, Variables};

type CliResult = Result<(), Box<dyn Error>>;

#[derive(Debug, Parser)]
#[command(name = "ucpush", about = "Publish component versions to a deployment server")]
#[command(version)]
struct Cli {
    /// Show debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct ServerArgs {
    /// Server URL (overrides [server].url and UCPUSH_URL)
    #[arg(long)]
    url: Option<String>,
    /// User name (overrides [server].user and UCPUSH_USER)
    #[arg(long)]
    user: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a component version from a request file
    Version {
        /// Path to the request file
        #[arg(long, default_value = "ucpush.toml")]
        request: PathBuf,
        /// Name of the link recorded on a pushed version (defaults to [link].name, then $JOB_NAME)
        #[arg(long)]
        link_name: Option<String>,
        /// URL of the link recorded on a pushed version (defaults to [link].url, then $BUILD_URL)
        #[arg(long)]
        link_url: Option<String>,
        /// Extra variables for `$NAME` expansion
        #[arg(long = "var", value_name = "KEY=VALUE")]
        vars: Vec<String>,
        /// File receiving `<component>_VersionId` for later build steps
        #[arg(long, default_value = "ucpush.env")]
        env_file: PathBuf,
        #[command(flatten)]
        server: ServerArgs,
    },
    /// Add files to an existing component version
    Upload {
        #[arg(long)]
        component: String,
        #[arg(long)]
        version: String,
        /// Directory holding the files to upload
        #[arg(long)]
        base_dir: PathBuf,
        /// Include glob, relative to the base directory (repeatable; defaults to **/*)
        #[arg(long)]
        include: Vec<String>,
        /// Exclude glob, relative to the base directory (repeatable)
        #[arg(long)]
        exclude: Vec<String>,
        #[command(flatten)]
        server: ServerArgs,
    },
    /// Validate a request file without contacting the server
    Check {
        /// Path to the request file
        #[arg(long, default_value = "ucpush.toml")]
        request: PathBuf,
        /// Extra variables for `$NAME` expansion
        #[arg(long = "var", value_name = "KEY=VALUE")]
        vars: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Version {
            request,
            link_name,
            link_url,
            vars,
            env_file,
            server,
        } => cmd_version(&request, link_name, link_url, &vars, env_file, &server),
        Command::Upload {
            component,
            version,
            base_dir,
            include,
            exclude,
            server,
        } => cmd_upload(&component, &version, &base_dir, &include, &exclude, &server),
        Command::Check { request, vars } => cmd_check(&request, &vars),
    };

    if let Err(msg) = result {
        eprintln!("error: {msg}");
        process::exit(1);
    }
}

/// Log to stderr, honoring `RUST_LOG` when set.
fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "ucpush_cli=debug,ucpush_engine=debug,ucpush_client=debug"
    } else {
        "ucpush_cli=info,ucpush_engine=info,ucpush_client=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

/// Process environment overlaid with `--var KEY=VALUE` flags.
fn variables(assignments: &[String]) -> Result<Variables, Box<dyn Error>> {
    let mut vars = Variables::from_env();
    for assignment in assignments {
        let Some((key, value)) = assignment.split_once('=') else {
            return Err(format!("invalid --var `{assignment}` — expected KEY=VALUE").into());
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("invalid --var `{assignment}` — the key is empty").into());
        }
        vars.set(key, value);
    }
    Ok(vars)
}

fn server_config(section: Option<&ServerSection>, args: &ServerArgs) -> Result<ServerConfig, Box<dyn Error>> {
    let overrides = ServerOverrides {
        url: args.url.clone(),
        user: args.user.clone(),
    };
    let config = ServerConfig::resolve(section, &overrides, |key| std::env::var(key).ok())?;
    debug!(url = %config.url, user = ?config.user, "resolved server");
    Ok(config)
}

/// First non-blank of the flag, the request file, and a variable.
fn pick(flag: Option<String>, file: Option<&str>, vars: &Variables, fallback: &str) -> String {
    flag.filter(|s| !s.trim().is_empty())
        .or_else(|| file.filter(|s| !s.trim().is_empty()).map(str::to_owned))
        .or_else(|| vars.get(fallback).map(str::to_owned))
        .unwrap_or_default()
}

fn cmd_version(
    request_path: &Path,
    link_name: Option<String>,
    link_url: Option<String>,
    assignments: &[String],
    env_file: PathBuf,
    server: &ServerArgs,
) -> CliResult {
    let request = PublishRequest::from_path(request_path)?;
    let vars = variables(assignments)?;
    let config = server_config(request.server.as_ref(), server)?;
    let client = HttpClient::new(&config);

    let file_link = request.link.as_ref();
    let link = ResultLink {
        name: pick(link_name, file_link.map(|l| l.name.as_str()), &vars, "JOB_NAME"),
        url: pick(link_url, file_link.map(|l| l.url.as_str()), &vars, "BUILD_URL"),
    };

    let mut env = EnvFile::new(env_file);
    let outcome = ucpush_engine::create_version(
        Remote::new(&client),
        &mut env,
        &vars,
        &request.version,
        &link,
    )?;

    if let (Some(version), Some(id)) = (&outcome.version, outcome.version_id) {
        eprintln!("    Created version `{version}` of `{}` ({id})", outcome.component);
        let props = &outcome.properties;
        let total = props.updated.len() + props.created.len();
        if total > 0 {
            eprintln!(
                "        Set {total} version propert{} ({} updated, {} created)",
                if total == 1 { "y" } else { "ies" },
                props.updated.len(),
                props.created.len()
            );
        }
        eprintln!("     Linked `{}` -> {}", link.name, link.url);
    } else {
        eprintln!("  Triggered version import on `{}`", outcome.component);
    }

    for warning in &outcome.warnings {
        eprintln!("warning: {warning}");
    }
    Ok(())
}

fn cmd_upload(
    component: &str,
    version: &str,
    base_dir: &Path,
    include: &[String],
    exclude: &[String],
    server: &ServerArgs,
) -> CliResult {
    let config = server_config(None, server)?;
    let client = HttpClient::new(&config);

    let count =
        ucpush_engine::upload_version_files(&client, component, version, base_dir, include, exclude)?;
    eprintln!("    Uploaded {count} file(s) to version `{version}` of `{component}`");
    Ok(())
}

fn cmd_check(request_path: &Path, assignments: &[String]) -> CliResult {
    let request = PublishRequest::from_path(request_path)?;
    let vars = variables(assignments)?;

    let component = vars.expand(&request.version.component);
    if component.trim().is_empty() {
        return Err(ucpush_engine::EngineError::MissingComponentName.into());
    }
    let mode = DeliveryMode::prepare(&request.version.delivery, &component, &vars)?;

    eprintln!("    Checked request for `{component}` ({} delivery)", mode.name());
    match &mode {
        DeliveryMode::Push { plan, properties } => {
            eprintln!(
                "    Version `{}`, charset {}, {} file(s):",
                plan.version,
                plan.charset,
                plan.files.len()
            );
            for file in &plan.files {
                eprintln!("      {}", file.relative);
            }
            for (name, value) in properties {
                eprintln!("    Property {name}={value}");
            }
        }
        DeliveryMode::Pull { properties } => {
            for (name, value) in properties {
                eprintln!("    Import parameter {name}={value}");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn var_flags_override_environment() {
        let vars = variables(&["UCPUSH_TEST_ONLY=1".to_owned(), "X= a=b ".to_owned()]).unwrap();
        assert_eq!(vars.get("UCPUSH_TEST_ONLY"), Some("1"));
        assert_eq!(vars.get("X"), Some(" a=b "));
    }

    #[test]
    fn var_flag_without_equals_is_rejected() {
        let err = variables(&["NOPE".to_owned()]).unwrap_err();
        assert!(err.to_string().contains("KEY=VALUE"), "error was: {err}");
    }

    #[test]
    fn pick_prefers_flag_then_file_then_variable() {
        let vars = Variables::new().with("JOB_NAME", "from-env");
        assert_eq!(pick(Some("flag".to_owned()), Some("file"), &vars, "JOB_NAME"), "flag");
        assert_eq!(pick(None, Some("file"), &vars, "JOB_NAME"), "file");
        assert_eq!(pick(Some(" ".to_owned()), Some(""), &vars, "JOB_NAME"), "from-env");
        assert_eq!(pick(None, None, &Variables::new(), "JOB_NAME"), "");
    }

    #[test]
    fn check_validates_push_request_offline() {
        let tmp = tempfile::tempdir().unwrap();
        let dist = tmp.path().join("dist");
        std::fs::create_dir_all(&dist).unwrap();
        std::fs::write(dist.join("app.jar"), b"app").unwrap();
        let request = tmp.path().join("ucpush.toml");
        std::fs::write(
            &request,
            format!(
                "[version]\ncomponent = \"svc-a\"\n\n[version.delivery]\ntype = \"Push\"\nversion = \"1.0.0\"\nbase_dir = \"{}\"\n",
                dist.display().to_string().replace('\\', "\\\\")
            ),
        )
        .unwrap();

        cmd_check(&request, &[]).unwrap();
    }

    #[test]
    fn check_rejects_unknown_delivery_type() {
        let tmp = tempfile::tempdir().unwrap();
        let request = tmp.path().join("ucpush.toml");
        std::fs::write(
            &request,
            "[version]\ncomponent = \"svc-a\"\n\n[version.delivery]\ntype = \"Ftp\"\n",
        )
        .unwrap();

        let err = cmd_check(&request, &[]).unwrap_err();
        assert!(err.to_string().contains("'Ftp'"), "error was: {err}");
    }
}
