//! # teliq
//!
//! Command-line client for OneBot-11 endpoints: listen to the event stream,
//! make raw calls, or send a quick text message.

#![deny(unsafe_code)]

mod output;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde_json::Value;
use teliq_actions::{SendGroupMsg, SendPrivateMsg};
use teliq_core::logging::{init_json_subscriber, init_subscriber};
use teliq_session::{Session, SessionConfig, SessionEvent};
use teliq_settings::{LogFormat, TeliqSettings};
use tokio::sync::broadcast::error::RecvError;

/// OneBot-11 client.
#[derive(Parser, Debug)]
#[command(name = "teliq", about = "OneBot-11 client", version)]
struct Cli {
    /// Endpoint URL (overrides settings).
    #[arg(long, global = true)]
    url: Option<String>,

    /// Settings file (defaults to `~/.teliq/settings.json`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter directive (overrides settings).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Print events as JSON lines until interrupted.
    Listen,
    /// Make one call and print its `data`.
    Call {
        /// Action name, e.g. `get_login_info`.
        action: String,
        /// Params object as JSON.
        #[arg(default_value = "{}")]
        params: String,
    },
    /// Send a private text message.
    SendPrivate {
        /// Recipient.
        user_id: i64,
        /// Message text.
        text: String,
    },
    /// Send a group text message.
    SendGroup {
        /// Target group.
        group_id: i64,
        /// Message text.
        text: String,
    },
}

impl Cli {
    fn settings(&self) -> Result<TeliqSettings> {
        let mut settings = match &self.config {
            Some(path) => teliq_settings::load_settings_from_path(path)
                .with_context(|| format!("failed to load settings from {}", path.display()))?,
            None => teliq_settings::load_settings().context("failed to load settings")?,
        };
        if let Some(url) = &self.url {
            settings.connection.url.clone_from(url);
        }
        if let Some(level) = &self.log_level {
            settings.logging.level.clone_from(level);
        }
        settings.validate()?;
        Ok(settings)
    }
}

fn parse_params(raw: &str) -> Result<Value> {
    let params: Value = serde_json::from_str(raw).context("params must be valid JSON")?;
    if !params.is_object() {
        bail!("params must be a JSON object");
    }
    Ok(params)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = cli.settings()?;

    match settings.logging.format {
        LogFormat::Compact => init_subscriber(&settings.logging.level),
        LogFormat::Json => init_json_subscriber(&settings.logging.level),
    }

    let config = SessionConfig::from(&settings.connection);
    let connect_timeout = config.connect_timeout;
    let call_timeout = config.call_timeout;
    let session = Session::websocket(config);
    // Subscribe before connecting so `listen` sees the handshake.
    let events = session.subscribe();
    session.connect();
    session
        .wait_connected(connect_timeout + Duration::from_secs(1))
        .await
        .with_context(|| format!("could not connect to {}", settings.connection.url))?;

    let result = match cli.command {
        Command::Listen => listen(events).await,
        Command::Call { action, params } => {
            let params = parse_params(&params)?;
            let data = session.call_raw(&action, params, call_timeout).await?;
            println!("{}", serde_json::to_string_pretty(&data)?);
            Ok(())
        }
        Command::SendPrivate { user_id, text } => {
            let sent = session
                .call(&SendPrivateMsg::new(user_id, text))
                .await?;
            println!("{}", sent.message_id);
            Ok(())
        }
        Command::SendGroup { group_id, text } => {
            let sent = session
                .call(&SendGroupMsg::new(group_id, text))
                .await?;
            println!("{}", sent.message_id);
            Ok(())
        }
    };

    session.shutdown();
    result
}

async fn listen(mut events: tokio::sync::broadcast::Receiver<SessionEvent>) -> Result<()> {
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted");
                return Ok(());
            }
            received = events.recv() => match received {
                Ok(event) => {
                    if let Some(line) = output::event_line(&event) {
                        println!("{line}");
                    }
                    if matches!(event, SessionEvent::ReconnectExhausted { .. }) {
                        bail!("connection lost");
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event stream lagged");
                }
                Err(RecvError::Closed) => return Ok(()),
            },
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listen_with_global_url() {
        let cli = Cli::parse_from(["teliq", "listen", "--url", "ws://10.0.0.1:3001"]);
        assert_eq!(cli.command, Command::Listen);
        assert_eq!(cli.url.as_deref(), Some("ws://10.0.0.1:3001"));
    }

    #[test]
    fn call_params_default_to_empty_object() {
        let cli = Cli::parse_from(["teliq", "call", "get_login_info"]);
        assert_eq!(
            cli.command,
            Command::Call {
                action: "get_login_info".into(),
                params: "{}".into(),
            }
        );
    }

    #[test]
    fn send_private_args() {
        let cli = Cli::parse_from(["teliq", "--log-level", "debug", "send-private", "10001", "hi"]);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert_eq!(
            cli.command,
            Command::SendPrivate {
                user_id: 10001,
                text: "hi".into(),
            }
        );
    }

    #[test]
    fn send_group_rejects_bad_id() {
        assert!(Cli::try_parse_from(["teliq", "send-group", "abc", "hi"]).is_err());
    }

    #[test]
    fn params_must_be_object() {
        assert!(parse_params(r#"{"user_id": 1}"#).is_ok());
        assert!(parse_params("[1]").is_err());
        assert!(parse_params("not json").is_err());
    }

    #[test]
    fn cli_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"connection": {"url": "ws://file:1"}}"#).unwrap();
        let path_str = path.to_str().unwrap();

        let cli = Cli::parse_from(["teliq", "--config", path_str, "listen"]);
        let settings = cli.settings().unwrap();
        assert_eq!(settings.connection.url, "ws://file:1");

        let cli = Cli::parse_from([
            "teliq", "--config", path_str, "--url", "ws://flag:2", "listen",
        ]);
        assert_eq!(cli.settings().unwrap().connection.url, "ws://flag:2");
    }

    #[test]
    fn invalid_url_flag_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let cli = Cli::parse_from([
            "teliq",
            "--config",
            path.to_str().unwrap(),
            "--url",
            "http://nope",
            "listen",
        ]);
        assert!(cli.settings().is_err());
    }
}
