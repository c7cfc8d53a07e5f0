//! `sieve` - CLI for pathsieve
//!
//! This binary filters JSON documents read from a file or stdin and writes
//! the filtered documents to stdout as compact JSON.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};

use anyhow::Context;
use clap::Parser;
use serde_json::Value;
use tracing::debug;

use pathsieve::cli::{Cli, Command, ConfigCommand, FilterCommand};
use pathsieve::{emit_value, init_logging, Config, FilteringWriter, JsonWriter};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        Command::Filter(filter_cmd) => handle_filter(config, &filter_cmd),
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

fn handle_filter(mut config: Config, cmd: &FilterCommand) -> anyhow::Result<()> {
    let views = cmd.views();
    if !views.is_empty() {
        // Views given on the command line replace the configured ones.
        config.views = views;
        config.validate()?;
    }

    let input: Box<dyn Read> = match &cmd.input {
        Some(path) => Box::new(
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?,
        ),
        None => Box::new(io::stdin().lock()),
    };

    let stdout = io::stdout().lock();
    let mut out = BufWriter::new(stdout);
    let documents = serde_json::Deserializer::from_reader(BufReader::new(input)).into_iter::<Value>();

    let mut count = 0usize;
    for document in documents {
        let document = document.context("failed to parse input document")?;

        // Filters carry traversal state, so every document gets fresh ones.
        let filter = config.build_filter()?;
        let mut writer = FilteringWriter::new(JsonWriter::new(&mut out), filter);
        emit_value(&document, &mut writer)?;
        let sink = writer.finish()?;

        if config.output.newline && sink.roots() > 0 {
            out.write_all(b"\n")?;
        }
        count += 1;
    }

    out.flush()?;
    debug!(documents = count, "Filtering finished");
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Views]");
                if config.views.is_empty() {
                    println!("  (none: documents pass through unchanged)");
                }
                for (index, view) in config.views.iter().enumerate() {
                    println!("  {index}: {}", serde_json::to_string(view)?);
                }
                println!();
                println!("[Output]");
                println!("  Newline:            {}", config.output.newline);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

