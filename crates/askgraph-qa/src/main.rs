//! CLI entry point for the askgraph-qa question answering pipeline.
//!
//! Logs go to stderr; stdout carries the generated Cypher, the raw
//! outcome, and the final answer.

use std::io::Write;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use askgraph_graph::{GraphClient, GraphConfig};
use askgraph_llm::{ChatClient, LlmConfig};

use askgraph_qa::config::{self, Settings};
use askgraph_qa::pipeline::Pipeline;
use askgraph_qa::state::PipelineState;

#[derive(Parser)]
#[command(name = "askgraph-qa")]
#[command(about = "Natural-language question answering over the AskGraph knowledge graph")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file prefix (default: askgraph).
    #[arg(short, long, default_value = "askgraph", global = true)]
    config: String,
}

#[derive(Subcommand)]
enum Command {
    /// Answer a natural-language question about the graph.
    Ask {
        /// The question. Read from stdin if not given.
        #[arg(short, long)]
        question: Option<String>,
    },
    /// Print the introspected graph schema and exit.
    Schema,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = config::load_settings(&cli.config)?;

    // Connect to Neo4j. Bad credentials or an unreachable server are fatal.
    let graph = GraphClient::connect(&graph_config(&settings)).await?;

    match cli.command {
        Command::Ask { question } => {
            let question = match question {
                Some(q) => q,
                None => read_question()?,
            };

            let llm = ChatClient::new(LlmConfig::resolve(
                settings.llm.model.clone(),
                settings.llm.api_key.clone(),
                settings.llm.temperature,
            )?);
            let pipeline = Pipeline::new(llm, graph);

            println!("Generating cypher statement:");
            let state = pipeline.generate_cypher(PipelineState::new(question)).await?;
            println!("{}\n", state.cypher_statement().unwrap_or_default());

            println!("Executing cypher statement:");
            let state = pipeline.execute_cypher(state).await;
            println!("{}\n", state.outcome_text());

            let state = pipeline.synthesize_answer(state).await?;
            println!("{}", state.answer().unwrap_or_default());
        }
        Command::Schema => {
            let schema = graph.introspect_schema().await?;
            print!("{}", schema.to_prompt_text());
        }
    }

    Ok(())
}

fn read_question() -> anyhow::Result<String> {
    print!("Ask a question: ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn graph_config(settings: &Settings) -> GraphConfig {
    GraphConfig {
        uri: settings.neo4j.uri.clone(),
        user: settings.neo4j.user.clone(),
        password: settings.neo4j.password.clone(),
        max_connections: settings.neo4j.max_connections,
        fetch_size: settings.neo4j.fetch_size,
    }
}
