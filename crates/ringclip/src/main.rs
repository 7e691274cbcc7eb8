use anyhow::Context;
use clap::{Parser, Subcommand};
use ringclip::config;
use ringclip::events::Verb;
use ringclip::sys::server::SOCKET_PATH;
use std::io::Write;
use std::os::unix::net::UnixStream;

#[derive(Parser, Debug)]
#[command(name = "ringclip", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Show the clip ring
    Show,
    /// Hide the clip ring
    Hide,
    /// Flip to the next page of clips
    Next,
    /// Flip to the previous page of clips
    Prev,
    /// Add a clip to the front of the ring
    Add {
        /// Clip text, words are joined with single spaces
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Write the default config file if there is none and print its path
    InitConfig,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Show => send_command(Verb::Show, None),
        Commands::Hide => send_command(Verb::Hide, None),
        Commands::Next => send_command(Verb::Next, None),
        Commands::Prev => send_command(Verb::Prev, None),
        Commands::Add { text } => send_command(Verb::Add, Some(&text.join(" "))),
        Commands::InitConfig => {
            let path = config::write_default_config().context("Failed to write default config")?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn send_command(verb: Verb, arg: Option<&str>) -> anyhow::Result<()> {
    let mut stream = UnixStream::connect(SOCKET_PATH).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to ringclip at {}: {}. Is ringclip-gtk running?",
            SOCKET_PATH,
            e
        )
    })?;

    match arg {
        // one command per line on the wire
        Some(arg) => writeln!(stream, "{} {}", verb, arg.replace('\n', " "))?,
        None => writeln!(stream, "{}", verb)?,
    }
    log::debug!("Sent '{}' to {}", verb, SOCKET_PATH);
    Ok(())
}
