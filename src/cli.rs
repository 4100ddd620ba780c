use clap::{Parser, Subcommand};
use std::path::PathBuf;

const ABOUT: &str = "Weather-aware question answering";

const LONG_ABOUT: &str = "
Answers free-form questions with a language model. Questions that mention the weather are
answered with live data from Open-Meteo for the city named in the question.

The LLM defaults to a local Ollama server (llama3.2:3b). Point it elsewhere with a YAML config
file or the ASSISTANT_LLM_MODEL / ASSISTANT_LLM_BASEURL / ASSISTANT_LLM_APIKEY variables.
";

/// `demo` 子命令依次回答的问题
pub const EXAMPLE_PROMPTS: [&str; 10] = [
    "What's the weather like in Seattle?",
    "Will it rain in New York tomorrow?",
    "Is it sunny in Japan?",
    "What's the temperature in Tokyo?",
    "What is the capital of France?",
    "Who wrote 'To Kill a Mockingbird'?",
    "When did World War II end?",
    "Compare the weather in San Francisco and Las Vegas for the next 3 days",
    "What was the weather like in Portland last week?",
    "Which city has better weather for outdoor activities this weekend: Los Angeles, Santa Barbara, or San Diego?",
];

#[derive(Parser, Debug)]
#[command(version, about = ABOUT, long_about = LONG_ABOUT)]
pub struct Args {
    /// YAML config file
    #[arg(short, long, env = "ASSISTANT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Answer a single question
    Ask { question: String },
    /// Print the weather summary for a city without calling the LLM
    Weather { city: String },
    /// Answer the built-in example prompts
    Demo {
        #[arg(long, default_value_t = 1)]
        concurrency: usize,
    },
    /// Interactive question loop
    Chat,
    /// Serve the tools over MCP on stdin/stdout
    Serve,
}
