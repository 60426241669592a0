use anyhow::Context;
use colored::Colorize;
use tracing::debug;

use rtdb_sdk::{ClientConfig, Payload, Query, Reference, Snapshot};

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let root = connect(&cli)?;
    let output = execute(&root, cli.command, cli.format).await?;
    println!("{output}");
    Ok(())
}

fn connect(cli: &Cli) -> anyhow::Result<Reference> {
    let config = match &cli.config {
        Some(path) => ClientConfig::load(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => ClientConfig::default(),
    };
    let config = config
        .apply_env()
        .apply_overrides(cli.host.clone(), cli.auth.clone());
    debug!(host = %config.host, "connecting");
    Ok(Reference::connect(&config)?)
}

/// Run one command against `root` and return the text to print.
pub async fn execute(
    root: &Reference,
    command: Command,
    format: OutputFormat,
) -> anyhow::Result<String> {
    match command {
        Command::Get(args) => {
            let target = resolve(root, &args.path)?;
            let snap = target
                .get(get_query(&args))
                .await
                .with_context(|| format!("get {}", args.path))?;
            render(&snap, format)
        }
        Command::Set(args) => {
            let target = resolve(root, &args.path)?;
            let snap = target
                .set(payload(&args), Query::new())
                .await
                .with_context(|| format!("set {}", args.path))?;
            done("set", &target, &snap, format)
        }
        Command::Update(args) => {
            let target = resolve(root, &args.path)?;
            let snap = target
                .update(payload(&args), Query::new())
                .await
                .with_context(|| format!("update {}", args.path))?;
            done("updated", &target, &snap, format)
        }
        Command::Push(args) => {
            let target = resolve(root, &args.path)?;
            let snap = target
                .push(payload(&args), Query::new())
                .await
                .with_context(|| format!("push {}", args.path))?;
            if format == OutputFormat::Json {
                return render(&snap, format);
            }
            let key = snap
                .child("name")
                .value()
                .and_then(|v| v.as_str())
                .unwrap_or("?")
                .to_string();
            Ok(format!(
                "{} pushed {}/{}",
                "✓".green().bold(),
                display_path(&target),
                key.yellow()
            ))
        }
        Command::Delete(args) => {
            let target = resolve(root, &args.path)?;
            let snap = target
                .delete(Query::new())
                .await
                .with_context(|| format!("delete {}", args.path))?;
            done("deleted", &target, &snap, format)
        }
        Command::Timestamp(args) => {
            let target = resolve(root, &args.path)?;
            let snap = target
                .set_timestamp(&args.key)
                .await
                .with_context(|| format!("timestamp {}/{}", args.path, args.key))?;
            if format == OutputFormat::Json {
                return render(&snap, format);
            }
            let millis = snap.value().and_then(|v| v.as_i64());
            let when = millis
                .and_then(rtdb_sdk::timestamp_to_datetime)
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| snap.raw_json().to_string());
            Ok(format!("{} {} = {}", "✓".green().bold(), args.key.bold(), when.cyan()))
        }
        Command::Rules(args) => {
            let secret = args.secret.as_deref();
            match args.action {
                RulesAction::Get => {
                    let snap = root.get_rules(secret).await.context("reading rules")?;
                    render(&snap, format)
                }
                RulesAction::Set { json } => {
                    let snap = root
                        .set_rules(Payload::json(json), secret)
                        .await
                        .context("writing rules")?;
                    done("rules updated", root, &snap, format)
                }
            }
        }
    }
}

fn resolve(root: &Reference, path: &str) -> anyhow::Result<Reference> {
    if path.trim_matches('/').is_empty() {
        return Ok(root.clone());
    }
    Ok(root.child_path(path, false)?)
}

/// `--query` first, then the typed flags, which win on conflicts.
fn get_query(args: &GetArgs) -> Query {
    let base = args.query.as_deref().map(Query::parse).unwrap_or_default();
    let mut query = Query::new();
    if let Some(child) = &args.order_by {
        query = query.order_by(child);
    }
    if let Some(n) = args.limit_first {
        query = query.limit_to_first(n);
    }
    if let Some(n) = args.limit_last {
        query = query.limit_to_last(n);
    }
    if args.shallow {
        query = query.shallow(true);
    }
    base.merge(&query)
}

fn payload(args: &WriteArgs) -> Payload {
    if args.text {
        Payload::text(args.value.clone())
    } else {
        Payload::json(args.value.clone())
    }
}

fn display_path(target: &Reference) -> String {
    if target.is_root() {
        "/".to_string()
    } else {
        target.path().to_string()
    }
}

fn done(
    verb: &str,
    target: &Reference,
    snap: &Snapshot,
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => render(snap, format),
        OutputFormat::Text => Ok(format!(
            "{} {} {}",
            "✓".green().bold(),
            verb,
            display_path(target).bold()
        )),
    }
}

fn render(snap: &Snapshot, format: OutputFormat) -> anyhow::Result<String> {
    match (format, snap.value()) {
        (OutputFormat::Json, _) => Ok(snap.raw_json().to_string()),
        (OutputFormat::Text, None) => Ok("(no value)".dimmed().to_string()),
        (OutputFormat::Text, Some(value)) => Ok(serde_json::to_string_pretty(value)?),
    }
}
