use std::sync::Arc;

use clap::Parser;
use futures::StreamExt;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;
use weather_assistant::config::AppConfig;
use weather_assistant::error::{AssistantError, Result};
use weather_assistant::llm::DefaultLlmClient;
use weather_assistant::mcp::McpServer;
use weather_assistant::router::QueryRouter;
use weather_assistant::router::prompt::weather_summary;
use weather_assistant::tools::{GetWeatherTool, ProcessQueryTool, ToolExecutionConfig, ToolManager};
use weather_assistant::weather::{WeatherOutcome, WeatherService};

mod cli;

use crate::cli::{Args, Command, EXAMPLE_PROMPTS};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // stdout 留给 MCP 协议，日志只写 stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("weather_assistant=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = AppConfig::resolve(args.config.as_deref())?;
    tracing::debug!("配置: {:?}", config);

    let http = Arc::new(reqwest::Client::new());
    let weather = WeatherService::open_meteo(
        http.clone(),
        &config.weather.geocoding_url,
        &config.weather.forecast_url,
    );
    let llm = Arc::new(DefaultLlmClient::new(http, config.llm.clone()));
    let router = Arc::new(
        QueryRouter::new(llm, weather.clone()).with_day_offset(config.router.day_offset),
    );

    match args.command {
        Command::Ask { question } => {
            println!("{}", router.answer(&question).await?);
        }
        Command::Weather { city } => match weather.get_weather(&city).await? {
            WeatherOutcome::Ok { snapshot, .. } => {
                println!(
                    "{}",
                    weather_summary(&city, &snapshot, config.router.day_offset)?
                );
            }
            failure => println!("{}", failure.error_message().unwrap_or_default()),
        },
        Command::Demo { concurrency } => run_demo(router, concurrency).await,
        Command::Chat => run_chat(router).await?,
        Command::Serve => {
            let mut tools = ToolManager::new_with_config(ToolExecutionConfig {
                max_concurrency: config.server.max_concurrency,
            });
            tools.register(Box::new(GetWeatherTool::new(weather)));
            tools.register(Box::new(ProcessQueryTool::new(router)));

            let server = Arc::new(McpServer::new(Arc::new(tools), config.server.name));
            server.serve_stdio().await?;
        }
    }

    Ok(())
}

async fn run_demo(router: Arc<QueryRouter>, concurrency: usize) {
    let mut answers = futures::stream::iter(EXAMPLE_PROMPTS)
        .map(|question| {
            let router = router.clone();
            async move { (question, router.answer(question).await) }
        })
        .buffered(concurrency.max(1));

    while let Some((question, answer)) = answers.next().await {
        println!("{}", "═".repeat(62));
        println!("👤 {}", question);
        match answer {
            Ok(text) => println!("🤖 {}\n", text),
            Err(e) => println!("❌ {}\n", e),
        }
    }
}

async fn run_chat(router: Arc<QueryRouter>) -> Result<()> {
    let mut editor = DefaultEditor::new().map_err(readline_error)?;
    println!("Ask a question (Ctrl-D to quit).");

    loop {
        match editor.readline(">> ") {
            Ok(line) => {
                let question = line.trim();
                if question.is_empty() {
                    continue;
                }
                if let Err(e) = editor.add_history_entry(question) {
                    tracing::debug!("写入历史记录失败: {}", e);
                }
                match router.answer(question).await {
                    Ok(text) => println!("{}\n", text),
                    Err(e) => eprintln!("❌ {}\n", e),
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(readline_error(e)),
        }
    }
    Ok(())
}

fn readline_error(e: ReadlineError) -> AssistantError {
    AssistantError::Other(format!("readline: {}", e))
}
