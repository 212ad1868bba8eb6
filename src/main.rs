//! fallwerk CLI: reasoning-benchmark case generation and evaluation.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use fallwerk::domains;
use fallwerk::evaluate::{EvalWorkflow, run_evaluation};
use fallwerk::generator::{CaseGenerator, append_cases};
use fallwerk::oracle::GenerationConfig;
use fallwerk::oracle::ollama::{OllamaConfig, OllamaOracle};

#[derive(Parser)]
#[command(
    name = "fallwerk",
    version,
    about = "Synthesizes grounded reasoning-benchmark cases for German tax law"
)]
struct Cli {
    /// Base URL of the Ollama server.
    #[arg(long, global = true, default_value = "http://localhost:11434")]
    base_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a dataset for the specified domain.
    Generate {
        /// The domain to generate the dataset for.
        #[arg(long, default_value = "joint_assessment")]
        domain: String,

        /// The number of samples to generate.
        #[arg(long, default_value = "10")]
        num_samples: usize,

        /// The directory to append the generated dataset to.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// The maximum depth for reasoning tree expansion.
        #[arg(long, default_value = "2")]
        max_depth: usize,

        /// The model to use for generation.
        #[arg(long, default_value = "llama3.2")]
        model: String,

        /// The temperature to use for generation.
        #[arg(long, default_value = "1.0")]
        temperature: f64,

        /// The top_p to use for nucleus sampling.
        #[arg(long, default_value = "1.0")]
        top_p: f64,

        /// The maximum number of tokens to generate.
        #[arg(long, default_value = "2048")]
        max_tokens: u32,
    },

    /// Evaluate a generated dataset using an oracle-backed workflow.
    Evaluate {
        /// The path to the dataset to evaluate (.json or .jsonl).
        #[arg(long)]
        dataset: PathBuf,

        /// The path to output the evaluation results (.jsonl).
        #[arg(long)]
        output_path: PathBuf,

        /// The evaluation workflow to use: "cot" or "direct".
        #[arg(long, default_value = "cot")]
        workflow: String,

        /// The model to use for evaluation.
        #[arg(long, default_value = "llama3.2")]
        model: String,

        /// The temperature to use for generation.
        #[arg(long, default_value = "1.0")]
        temperature: f64,

        /// The top_p to use for nucleus sampling.
        #[arg(long, default_value = "1.0")]
        top_p: f64,

        /// The maximum number of tokens to generate.
        #[arg(long, default_value = "2048")]
        max_tokens: u32,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            domain,
            num_samples,
            output_dir,
            max_depth,
            model,
            temperature,
            top_p,
            max_tokens,
        } => {
            let domain = domains::domain_by_name(&domain, max_depth).into_diagnostic()?;

            let oracle = OllamaOracle::new(
                OllamaConfig {
                    base_url: cli.base_url,
                    ..Default::default()
                },
                GenerationConfig {
                    model,
                    temperature,
                    top_p,
                    max_tokens,
                },
            );
            oracle.probe().into_diagnostic()?;

            println!(
                "Generating {num_samples} samples for domain '{}' with max depth {max_depth} using model '{}'",
                domain.name(),
                oracle.model()
            );

            let generator = CaseGenerator::new(domain, &oracle);
            let cases = generator.generate(num_samples);
            println!("Generated {} cases", cases.len());

            if let Some(dir) = output_dir {
                let path =
                    append_cases(&dir, generator.domain_name(), &cases).into_diagnostic()?;
                println!("Appended {} cases to {}", cases.len(), path.display());
            }
        }

        Commands::Evaluate {
            dataset,
            output_path,
            workflow,
            model,
            temperature,
            top_p,
            max_tokens,
        } => {
            let oracle = OllamaOracle::new(
                OllamaConfig {
                    base_url: cli.base_url,
                    ..Default::default()
                },
                GenerationConfig {
                    model,
                    temperature,
                    top_p,
                    max_tokens,
                },
            );
            oracle.probe().into_diagnostic()?;

            println!(
                "Evaluating dataset at '{}' using model '{}' with workflow '{workflow}'",
                dataset.display(),
                oracle.model()
            );

            let workflow = EvalWorkflow::new(&oracle, workflow == "cot");
            let report = run_evaluation(&dataset, &output_path, &workflow).into_diagnostic()?;

            println!("Accuracy: {:.2}%", report.accuracy * 100.0);
            println!(
                "Wrote {} evaluated examples to {}",
                report.total,
                output_path.display()
            );
        }
    }

    Ok(())
}
