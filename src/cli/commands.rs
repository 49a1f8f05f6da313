use crate::config::GenConfig;
use crate::render::Renderer;
use crate::translate::Translator;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

/// Command-line interface for schemabind
///
/// Provides commands for resolving schema documents against a rule
/// configuration and rendering the configured templates.
#[derive(Parser)]
#[command(name = "schemabind")]
#[command(about = "Schema resolution and code generation CLI", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands for schemabind
#[derive(Subcommand)]
pub enum Commands {
    /// Resolve schema documents and render the configured templates
    Generate {
        /// Path to the rule/template configuration file (YAML)
        #[arg(short, long)]
        config: PathBuf,

        /// Input schema documents (operation files or data definitions)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Override the configured output directory
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Perform a dry run: resolve everything but write no files
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Resolve one document and print its model as JSON
    Inspect {
        /// Path to the rule/template configuration file (YAML)
        #[arg(short, long)]
        config: PathBuf,

        /// Input schema document
        input: PathBuf,
    },
}

/// Execute a parsed CLI invocation.
///
/// Failures carry their document context; the binary turns them into a
/// non-zero exit status.
pub fn run_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate {
            config,
            inputs,
            output_dir,
            dry_run,
        } => generate(&config, &inputs, output_dir, dry_run),
        Commands::Inspect { config, input } => inspect(&config, &input),
    }
}

fn generate(
    config_path: &std::path::Path,
    inputs: &[PathBuf],
    output_dir: Option<PathBuf>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let mut config = GenConfig::load(config_path)?;
    if let Some(dir) = output_dir {
        config.output_dir = dir;
    }
    let renderer = Renderer::new(&config);
    let translator = Translator::new(config)?;

    let cwd = std::env::current_dir()?;
    for input in inputs {
        let model = translator.process_file(input, &cwd)?;
        if dry_run {
            info!(
                file = %input.display(),
                schemas = model.types.len(),
                call_classes = model.call_classes.len(),
                "resolved (dry run)"
            );
        } else {
            renderer.render_model(&model)?;
        }
    }
    info!(
        documents = translator.files_processed(),
        "generation finished"
    );
    Ok(())
}

fn inspect(config_path: &std::path::Path, input: &std::path::Path) -> anyhow::Result<()> {
    let config = GenConfig::load(config_path)?;
    let translator = Translator::new(config)?;
    let cwd = std::env::current_dir()?;
    let model = translator.process_file(input, &cwd)?;
    println!("{}", serde_json::to_string_pretty(&*model)?);
    Ok(())
}
