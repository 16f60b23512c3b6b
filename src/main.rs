use std::io::Read;

use anyhow::Context;
use clap::{Parser, Subcommand};
use condition_gate::condition::{ConditionValidator, DEFAULT_MAX_LENGTH};
use condition_gate::{pre_validate_text, sanitize_for_display, ValidationResult};
use dotenv::dotenv;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a substituted condition expression (authoritative check)
    Check {
        /// The expression, or `-` to read it from stdin
        expression: String,

        /// Maximum expression length in characters
        #[arg(long, env = "CONDITION_MAX_LENGTH", default_value_t = DEFAULT_MAX_LENGTH)]
        max_length: usize,

        /// Additional read-only method to allow (repeatable)
        #[arg(long = "allow-method")]
        allow_methods: Vec<String>,
    },
    /// Run the advisory keyword pre-check on raw condition text
    Precheck {
        /// The raw text, or `-` to read it from stdin
        expression: String,
    },
    /// Escape text for display in HTML
    Sanitize {
        /// The text, or `-` to read it from stdin
        text: String,
    },
}

fn read_input(arg: String) -> anyhow::Result<String> {
    if arg != "-" {
        return Ok(arg);
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read from stdin")?;
    Ok(buf.trim_end_matches(['\n', '\r']).to_string())
}

fn report(result: &ValidationResult, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(result)?);
    } else {
        match result {
            ValidationResult::Valid => println!("valid"),
            ValidationResult::Invalid(reason) => println!("invalid: {}", reason),
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    let result = match args.command {
        Commands::Check {
            expression,
            max_length,
            allow_methods,
        } => {
            let expression = read_input(expression)?;
            let validator = allow_methods.into_iter().fold(
                ConditionValidator::new().with_max_length(max_length),
                |validator, method| validator.allow_method(method),
            );
            log::info!(
                "Validating condition (max length {})",
                validator.max_length()
            );
            validator.validate(&expression)
        }
        Commands::Precheck { expression } => pre_validate_text(&read_input(expression)?),
        Commands::Sanitize { text } => {
            let text = read_input(text)?;
            if args.json {
                println!("{}", serde_json::json!({ "text": sanitize_for_display(&text) }));
            } else {
                println!("{}", sanitize_for_display(&text));
            }
            return Ok(());
        }
    };

    report(&result, args.json)?;
    if !result.is_valid() {
        std::process::exit(1);
    }

    Ok(())
}
