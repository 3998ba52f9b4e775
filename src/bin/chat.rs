use std::path::PathBuf;

use anyhow::{Context, anyhow};
use clap::Parser;
use directories::ProjectDirs;
use gemini_chat::client::{
    ChatSession, FileStore, HttpRelayClient, Message,
    render::{LOADING_INDICATOR, render_message, render_transcript},
    session::DEFAULT_CLIENT_MODEL,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

// Baked in at build time; `--backend-url` or the same variable at run time wins.
const DEFAULT_BACKEND_URL: &str = match option_env!("CHAT_BACKEND_URL") {
    Some(url) => url,
    None => "http://localhost:5000",
};

#[derive(Parser)]
#[command(name = "gemini-chat")]
#[command(about = "Terminal chat over the Gemini relay", long_about = None)]
struct Cli {
    /// Base URL of the relay service
    #[arg(long, env = "CHAT_BACKEND_URL", default_value = DEFAULT_BACKEND_URL)]
    backend_url: String,

    /// Model requested from the relay
    #[arg(long, default_value = DEFAULT_CLIENT_MODEL)]
    model: String,

    /// Where the chat history is kept
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Column user messages are aligned against
    #[arg(long, default_value_t = 80)]
    width: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => ProjectDirs::from("", "", "gemini-chat")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| anyhow!("could not determine a data directory, pass --data-dir"))?,
    };

    let store = FileStore::new(&data_dir);
    let relay = HttpRelayClient::new(&cli.backend_url);
    let mut session = ChatSession::open(store, relay, Some(cli.model));

    let mut stdout = tokio::io::stdout();
    print_lines(&mut stdout, &render_transcript(session.messages(), false, cli.width)).await?;
    print_lines(&mut stdout, &["Type a message, /new to start over, /quit to leave.".to_string()]).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await.context("failed to read input")? else {
            break;
        };

        match line.trim() {
            "/quit" => break,
            "/new" => {
                session.reset();
                print_lines(&mut stdout, &["Started a new chat.".to_string()]).await?;
                continue;
            }
            _ => {}
        }

        session.set_input(line);
        let Some(prompt) = session.begin_submit() else {
            continue;
        };
        print_message(&mut stdout, &Message::user(prompt.as_str()), cli.width).await?;
        print_lines(&mut stdout, &[LOADING_INDICATOR.to_string()]).await?;

        let result = session.send(&prompt).await;
        session.complete(result);
        if let Some(reply) = session.conversation().last() {
            print_message(&mut stdout, reply, cli.width).await?;
        }
    }

    Ok(())
}

async fn print_message(
    out: &mut tokio::io::Stdout,
    message: &Message,
    width: usize,
) -> std::io::Result<()> {
    let mut lines = render_message(message, width);
    lines.push(String::new());
    print_lines(out, &lines).await
}

async fn print_lines(out: &mut tokio::io::Stdout, lines: &[String]) -> std::io::Result<()> {
    for line in lines {
        out.write_all(line.as_bytes()).await?;
        out.write_all(b"\n").await?;
    }
    out.flush().await
}
