use factorio_tail::{JsonCursorStore, SelfMarkers, default_cursor_path, default_log_path, watch_chat};
use std::env;
use std::path::PathBuf;
use std::process;
use tokio_stream::StreamExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();

    let log_path = match args.len() {
        1 => match default_log_path() {
            Some(path) => path,
            None => {
                eprintln!("Could not resolve the default Factorio log location");
                eprintln!("Usage: {} [log_path]", args[0]);
                process::exit(1);
            }
        },
        2 => PathBuf::from(&args[1]),
        _ => {
            eprintln!("Usage: {} [log_path]", args[0]);
            process::exit(1);
        }
    };

    let store = JsonCursorStore::new(default_cursor_path());

    match watch_chat(&log_path, store, SelfMarkers::default()) {
        Ok(mut chat) => {
            println!("Watching chat in: {}", log_path.display());
            while let Some(batch) = chat.next().await {
                match batch {
                    Ok(messages) => {
                        for msg in messages {
                            println!("{}: {}", msg.player, msg.text);
                        }
                    }
                    Err(e) => {
                        eprintln!("Error reading log: {}", e);
                        process::exit(1);
                    }
                }
            }
        }
        Err(e) => {
            eprintln!("Error setting up chat watcher: {}", e);
            process::exit(1);
        }
    }
}
