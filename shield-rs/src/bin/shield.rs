//! CLI tool for classifying messages
//!
//! # Usage
//!
//! ```bash
//! # Classify one message
//! shield classify "WINNER!! Claim your prize now"
//!
//! # Machine-readable verdict, exit code 2 when spam
//! shield classify --json --exit-code "See you at lunch"
//!
//! # One message per line from stdin
//! shield interactive < messages.txt
//!
//! # Show the canonical form the vectorizer sees
//! shield normalize "Don't miss out!!"
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use shield_rs::api::ClassifyResponse;
use shield_rs::logging::init_tracing;
use shield_rs::{ShieldConfig, SpamClassifier, Verdict};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "shield")]
#[command(about = "Classify SMS messages as spam or legitimate", long_about = None)]
struct Cli {
    /// Configuration file (defaults to shield.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at the configured level instead of warnings only
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a single message
    Classify {
        /// Message text
        message: String,
        /// Print the verdict as JSON
        #[arg(long)]
        json: bool,
        /// Exit with status 2 when the message is spam
        #[arg(long)]
        exit_code: bool,
    },
    /// Classify one message per line read from stdin
    Interactive {
        /// Print each verdict as a JSON line
        #[arg(long)]
        json: bool,
    },
    /// Print the canonical form of a message
    Normalize {
        /// Message text
        message: String,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = ShieldConfig::discover(cli.config.as_deref())?;
    if !cli.verbose {
        config.logging.level = "warn".to_string();
    }
    init_tracing(&config.logging)?;

    let classifier = SpamClassifier::load(&config).context("Failed to load classifier")?;

    run(
        cli.command,
        &classifier,
        &mut std::io::stdin().lock(),
        &mut std::io::stdout().lock(),
        &mut std::io::stderr().lock(),
    )
}

/// Execute one command. Verdicts go to `out`, input warnings to `err`.
fn run(
    command: Commands,
    classifier: &SpamClassifier,
    input: &mut impl BufRead,
    out: &mut impl Write,
    err: &mut impl Write,
) -> anyhow::Result<ExitCode> {
    match command {
        Commands::Classify {
            message,
            json,
            exit_code,
        } => match classifier.classify(&message) {
            Ok(verdict) => {
                print_verdict(out, &verdict, json)?;
                if exit_code && verdict.is_spam() {
                    return Ok(ExitCode::from(2));
                }
            }
            Err(e) => {
                writeln!(err, "⚠ {}", e)?;
                return Ok(ExitCode::from(1));
            }
        },
        Commands::Interactive { json } => {
            for line in input.lines() {
                let line = line.context("Failed to read stdin")?;
                match classifier.classify(&line) {
                    Ok(verdict) => print_verdict(out, &verdict, json)?,
                    Err(e) => writeln!(err, "⚠ {}", e)?,
                }
            }
        }
        Commands::Normalize { message } => {
            writeln!(out, "{}", classifier.normalize(&message))?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_verdict(out: &mut impl Write, verdict: &Verdict, json: bool) -> anyhow::Result<()> {
    if json {
        let response = ClassifyResponse::from(*verdict);
        writeln!(out, "{}", serde_json::to_string(&response)?)?;
    } else {
        writeln!(out, "{}", verdict.headline())?;
        writeln!(out, "{}", verdict.rationale)?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/common/mod.rs"]
mod common;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tempfile::TempDir;

    struct Output {
        code: ExitCode,
        stdout: String,
        stderr: String,
    }

    fn execute(command: Commands, stdin: &str) -> Output {
        let dir = TempDir::new().unwrap();
        let classifier = common::classifier(dir.path());
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();

        let code = run(
            command,
            &classifier,
            &mut stdin.as_bytes(),
            &mut stdout,
            &mut stderr,
        )
        .unwrap();

        Output {
            code,
            stdout: String::from_utf8(stdout).unwrap(),
            stderr: String::from_utf8(stderr).unwrap(),
        }
    }

    fn classify(message: &str, json: bool, exit_code: bool) -> Commands {
        Commands::Classify {
            message: message.to_string(),
            json,
            exit_code,
        }
    }

    #[test]
    fn test_cli_parses_global_flags() {
        let cli = Cli::try_parse_from(["shield", "classify", "-v", "--exit-code", "hi"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Classify { exit_code: true, json: false, .. }
        ));

        assert!(Cli::try_parse_from(["shield", "classify"]).is_err());
    }

    #[test]
    fn test_classify_text() {
        let output = execute(classify("See you at home for lunch", false, false), "");
        assert_eq!(output.code, ExitCode::SUCCESS);
        assert_eq!(
            output.stdout,
            "Safe Message\nThis message appears to be legitimate and does not show typical spam indicators.\n"
        );
        assert!(output.stderr.is_empty());
    }

    #[test]
    fn test_blank_classify_warns_and_fails() {
        for message in ["", "   ", "\t\n"] {
            let output = execute(classify(message, false, true), "");
            assert_eq!(output.code, ExitCode::from(1));
            assert!(output.stdout.is_empty());
            assert_eq!(output.stderr, "⚠ Please enter a message to analyze!\n");
        }
    }

    #[test]
    fn test_exit_code_flag() {
        let spam = "WINNER!! Claim your FREE prize now";

        let output = execute(classify(spam, false, true), "");
        assert_eq!(output.code, ExitCode::from(2));
        assert!(output.stdout.starts_with("Spam Detected!\n"));

        // spam without the flag still succeeds
        assert_eq!(execute(classify(spam, false, false), "").code, ExitCode::SUCCESS);

        let output = execute(classify("See you at home for lunch", false, true), "");
        assert_eq!(output.code, ExitCode::SUCCESS);
    }

    #[test]
    fn test_json_output_shape() {
        let output = execute(classify("WINNER!! Claim your FREE prize now", true, false), "");
        assert_eq!(output.code, ExitCode::SUCCESS);
        assert_eq!(output.stdout.lines().count(), 1);

        let body: Value = serde_json::from_str(output.stdout.trim_end()).unwrap();
        let fields: Vec<&str> = body.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(fields.len(), 4);
        assert_eq!(body["label"], "SPAM");
        assert_eq!(body["is_spam"], true);
        assert_eq!(body["headline"], "Spam Detected!");
        assert!(body["rationale"].as_str().unwrap().contains("typical of spam"));
    }

    #[test]
    fn test_interactive_skips_blank_lines() {
        let stdin = "WINNER!! Claim your FREE prize now\n\n   \nSee you at home for lunch";
        let output = execute(Commands::Interactive { json: true }, stdin);

        assert_eq!(output.code, ExitCode::SUCCESS);
        assert_eq!(
            output.stderr,
            "⚠ Please enter a message to analyze!\n".repeat(2)
        );

        let labels: Vec<Value> = output
            .stdout
            .lines()
            .map(|line| serde_json::from_str::<Value>(line).unwrap()["label"].clone())
            .collect();
        assert_eq!(labels, vec![Value::from("SPAM"), Value::from("NOT_SPAM")]);
    }

    #[test]
    fn test_interactive_empty_input() {
        let output = execute(Commands::Interactive { json: false }, "");
        assert_eq!(output.code, ExitCode::SUCCESS);
        assert!(output.stdout.is_empty());
        assert!(output.stderr.is_empty());
    }

    #[test]
    fn test_normalize_command() {
        let output = execute(
            Commands::Normalize {
                message: "Don't worry, I'm fine".to_string(),
            },
            "",
        );
        assert_eq!(output.code, ExitCode::SUCCESS);
        assert_eq!(output.stdout, "nt worri fine\n");
    }
}
