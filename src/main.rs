use analyst_client::ingestion::LocalFile;
use analyst_client::notify::FileClipboard;
use analyst_client::schema::SchemaPreset;
use analyst_client::{
    Config, Extraction, HttpTransport, Mode, ModeSwitch, ToolContext, ToolResult, Toolbox,
    TracingNotifier,
};
use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::process;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "analyst")]
#[command(version, about = "Ask, summarize and extract with the AI Market Analyst backend")]
struct Cli {
    /// Send every tool to its dedicated endpoint
    #[arg(long, global = true, conflicts_with = "autonomous")]
    manual: bool,
    /// Route requests through the server-side router
    #[arg(long, global = true)]
    autonomous: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a question about the indexed documents
    Qa {
        question: String,
    },
    /// Summarize text or a text file
    Summary(SummaryArgs),
    /// Extract structured fields described by a JSON schema
    Extract(ExtractArgs),
}

#[derive(Args)]
#[command(
    group(
        clap::ArgGroup::new("source")
            .required(true)
            .multiple(false)
            .args(["text", "file"])
    )
)]
struct SummaryArgs {
    /// Text to summarize
    #[arg(long)]
    text: Option<String>,
    /// Path to a text file to summarize (max 5MB)
    #[arg(long)]
    file: Option<String>,
}

#[derive(Args)]
#[command(
    group(
        clap::ArgGroup::new("schema_source")
            .required(true)
            .multiple(false)
            .args(["schema", "example"])
    )
)]
struct ExtractArgs {
    /// Text to extract from; defaults to the example's sample text
    #[arg(long)]
    text: Option<String>,
    /// JSON schema, e.g. '{"company": "string"}'
    #[arg(long)]
    schema: Option<String>,
    /// Use a built-in schema
    #[arg(long, value_enum)]
    example: Option<ExampleArg>,
    /// Write the extracted fields as pretty JSON to this file on success
    #[arg(long)]
    export: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExampleArg {
    Basic,
    Market,
}

impl From<ExampleArg> for SchemaPreset {
    fn from(arg: ExampleArg) -> Self {
        match arg {
            ExampleArg::Basic => SchemaPreset::Basic,
            ExampleArg::Market => SchemaPreset::MarketResearch,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "analyst_client=info,analyst=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let mode = if cli.manual {
        Mode::Manual
    } else if cli.autonomous {
        Mode::Autonomous
    } else {
        config.initial_mode
    };

    let transport = HttpTransport::from_config(&config)?;
    tracing::info!(api_url = %config.api_url, mode = %mode, "Analyst client ready");

    let toolbox = Toolbox::new(ToolContext::new(
        Arc::new(ModeSwitch::new(mode)),
        Arc::new(transport),
        Arc::new(TracingNotifier),
    ));

    let succeeded = match cli.command {
        Commands::Qa { question } => print_outcome(toolbox.qa.submit(question).await),
        Commands::Summary(args) => {
            let text = match (args.text, args.file) {
                (Some(text), _) => text,
                (None, Some(path)) => {
                    let file = LocalFile::open(&path)
                        .await
                        .with_context(|| format!("Cannot open {}", path))?;
                    toolbox.summary.load_file(&file).await?
                }
                (None, None) => unreachable!("clap enforces one input source"),
            };
            print_outcome(toolbox.summary.submit(text).await)
        }
        Commands::Extract(args) => {
            let (schema, sample) = match (args.schema, args.example) {
                (Some(schema), _) => (schema, None),
                (None, Some(example)) => {
                    let loaded = toolbox.extract.load_example(example.into());
                    (loaded.schema, loaded.text)
                }
                (None, None) => unreachable!("clap enforces one schema source"),
            };
            let text = args.text.or(sample).unwrap_or_default();
            let outcome = toolbox.extract.submit(text, schema).await;
            let ok = print_outcome(outcome);
            if let (true, Some(path)) = (ok, args.export) {
                toolbox
                    .extract
                    .export_result(&FileClipboard::new(path))
                    .await?;
            }
            ok
        }
    };

    if !succeeded {
        process::exit(1);
    }
    Ok(())
}

/// Print a finished submission. Returns whether it succeeded.
fn print_outcome(outcome: analyst_client::Result<ToolResult>) -> bool {
    match outcome {
        Ok(ToolResult::Answer {
            answer_text,
            source_documents,
        }) => {
            println!("{}", answer_text);
            if !source_documents.is_empty() {
                let label = if source_documents.len() == 1 { "source" } else { "sources" };
                println!("\n{} {}:", source_documents.len(), label);
                for (idx, doc) in source_documents.iter().enumerate() {
                    println!("  [{}] {}", idx + 1, doc.page_content);
                }
            }
            true
        }
        Ok(result @ ToolResult::Summary { .. }) => {
            println!("{}", result.display_text());
            println!("\n({} words)", result.word_count());
            true
        }
        Ok(result @ ToolResult::Extraction(Extraction::Fields(_))) => {
            println!("{}", result.display_text());
            true
        }
        Ok(result @ ToolResult::Extraction(Extraction::Error { .. })) => {
            eprintln!("{}", result.display_text());
            false
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            false
        }
    }
}
