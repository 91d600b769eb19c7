mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(
    name = "tally",
    version,
    about = "Extract and total material quantities from documents"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', action = clap::ArgAction::Count, global = true)]
    verbosity: u8,

    /// Path to a JSON config file
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract, filter and total the materials in a document
    Analyze {
        /// Path to a PDF, a pre-decoded JSON document, or plain text
        input_file: PathBuf,

        /// Rule to apply (falls back to the collection's default)
        #[arg(short, long, value_name = "NAME")]
        rule: Option<String>,

        /// Directory of JSON rule files
        #[arg(long, value_name = "DIR")]
        rules_dir: Option<PathBuf>,

        /// Single-file rule store ({"default": ..., "rules": [...]})
        #[arg(long, value_name = "FILE", conflicts_with = "rules_dir")]
        rules_file: Option<PathBuf>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// List the records the rule excluded
        #[arg(long)]
        verbose: bool,
    },
    /// Print the linearized text of a document (without filtering)
    Extract {
        /// Path to a PDF, a pre-decoded JSON document, or plain text
        input_file: PathBuf,

        /// Output format: text (default) or json (extracted records)
        #[arg(short, long, default_value = "text")]
        output: String,

        /// Write the output to a file instead of stdout
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Inspect and validate rules
    Rules {
        #[command(subcommand)]
        action: RulesAction,
    },
}

#[derive(Subcommand)]
enum RulesAction {
    /// List the rules in the configured collection
    List {
        #[arg(long, value_name = "DIR")]
        rules_dir: Option<PathBuf>,

        #[arg(long, value_name = "FILE", conflicts_with = "rules_dir")]
        rules_file: Option<PathBuf>,
    },
    /// Validate a rule file
    Validate {
        /// Path to JSON rule file
        file: PathBuf,

        /// Also require a unit filter and explicit decimals
        #[arg(long)]
        strict: bool,
    },
    /// Print the rule schema with field descriptions
    Schema,
    /// Print an example rule
    Template,
    /// Show which rule a run would use
    Resolve {
        /// Requested rule name
        name: Option<String>,

        #[arg(long, value_name = "DIR")]
        rules_dir: Option<PathBuf>,

        #[arg(long, value_name = "FILE", conflicts_with = "rules_dir")]
        rules_file: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Analyze {
            input_file,
            rule,
            rules_dir,
            rules_file,
            output,
            verbose,
        } => commands::analyze::run(
            &input_file,
            rule.as_deref(),
            commands::RuleSource::new(rules_dir, rules_file),
            config,
            &output,
            verbose,
        ),
        Commands::Extract {
            input_file,
            output,
            out,
        } => commands::extract::run(&input_file, config, &output, out),
        Commands::Rules { action } => match action {
            RulesAction::List {
                rules_dir,
                rules_file,
            } => commands::rules::list(commands::RuleSource::new(rules_dir, rules_file), config),
            RulesAction::Validate { file, strict } => commands::rules::validate(&file, strict),
            RulesAction::Schema => commands::rules::schema(),
            RulesAction::Template => commands::rules::template(),
            RulesAction::Resolve {
                name,
                rules_dir,
                rules_file,
            } => commands::rules::resolve(
                name.as_deref(),
                commands::RuleSource::new(rules_dir, rules_file),
                config,
            ),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
