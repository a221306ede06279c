//! Housing Advisor CLI
//!
//! Reads one message per stdin line and prints one response per stdout line. A line
//! starting with `{` is decoded as a route request (`{message, profile?, recentTurns?}`),
//! anything else is routed as plain text with an empty profile. Logs go to stderr.

use std::io::{self, BufRead, Write};

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use housing_advisor_agent::{AdvisorAgent, RouteRequest};
use housing_advisor_config::{load_settings, LogFormat, Settings};
use housing_advisor_core::Response;

#[derive(Parser, Debug)]
#[command(name = "housing-advisor", version, about = "Housing finance advisor")]
struct Cli {
    #[arg(long, help = "Settings overlay to load (config/{env}.yaml)")]
    env: Option<String>,
    #[arg(long, help = "Domain config YAML; overrides domain_config_path")]
    domain: Option<String>,
    #[arg(long, default_value_t = false, help = "Print only the response content")]
    text: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = load_settings(cli.env.as_deref()).context("Failed to load settings")?;
    if let Some(path) = cli.domain {
        settings.domain_config_path = Some(path);
    }
    init_tracing(&settings);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = ?settings.environment,
        "Starting housing advisor"
    );

    let agent = AdvisorAgent::new(&settings).context("Failed to build advisor engine")?;

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read stdin")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let output = match parse_line(line) {
            Ok(request) => render(&agent.route_request(&request), cli.text)?,
            Err(e) => {
                tracing::warn!(error = %e, "Rejected request line");
                serde_json::json!({ "error": e.to_string() }).to_string()
            }
        };
        writeln!(stdout, "{}", output)?;
        stdout.flush()?;
    }
    Ok(())
}

fn parse_line(line: &str) -> Result<RouteRequest, housing_advisor_agent::AgentError> {
    if line.starts_with('{') {
        RouteRequest::from_json(line)
    } else {
        Ok(RouteRequest::new(line))
    }
}

fn render(response: &Response, text_only: bool) -> anyhow::Result<String> {
    if text_only {
        // one response per line
        return Ok(response.content.replace('\n', " "));
    }
    Ok(serde_json::to_string(response)?)
}

fn init_tracing(settings: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &settings.observability.log_level;
        format!("housing_advisor={}", level).into()
    });

    let fmt_layer = match settings.observability.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(io::stderr)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .boxed(),
    };
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_line_is_message() {
        let request = parse_line("전세 3억").unwrap();
        assert_eq!(request.message, "전세 3억");
        assert!(request.recent_turns.is_empty());
    }

    #[test]
    fn test_json_line_is_request() {
        let request =
            parse_line(r#"{"message":"월소득 500만","profile":{"propertyPrice":500000000}}"#)
                .unwrap();
        assert_eq!(request.profile.property_price, Some(500_000_000));
        assert!(parse_line(r#"{"profile":{}}"#).is_err());
    }

    #[test]
    fn test_render_text_is_single_line() {
        let response = Response::builder("첫 줄\n둘째 줄").build();
        assert_eq!(render(&response, true).unwrap(), "첫 줄 둘째 줄");
        assert!(render(&response, false).unwrap().starts_with('{'));
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from(["housing-advisor", "--env", "production", "--text"]);
        assert_eq!(cli.env.as_deref(), Some("production"));
        assert!(cli.text);
        assert!(cli.domain.is_none());
    }
}
