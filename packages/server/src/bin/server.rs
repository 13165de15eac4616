//! Line-oriented TCP group chat server.
//!
//! Clients connect with netcat, pick a name and chat with everyone else.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin tcp-chat
//! cargo run --bin tcp-chat -- 2525
//! cargo run --bin tcp-chat -- 2525 --max-clients 4 --status-port 8080
//! ```

use std::{path::PathBuf, process, sync::Arc};

use clap::{Parser, error::ErrorKind};
use tcp_chat_server::{
    infrastructure::{
        banner::Banner,
        registry::{InMemoryChatRegistry, inmemory::DEFAULT_CAPACITY},
    },
    ui::Server,
    usecase::{GetChatStatusUseCase, JoinChatUseCase, LeaveChatUseCase, SendMessageUseCase},
};
use tcp_chat_shared::{
    logger::{setup_file_logger, setup_logger},
    time::{Clock, SystemClock},
};

const USAGE: &str = "[USAGE]: ./TCPChat $port";

#[derive(Parser, Debug)]
#[command(name = "tcp-chat")]
#[command(about = "TCP group chat server for netcat clients", long_about = None)]
struct Args {
    /// Port number to listen on
    #[arg(default_value = "8989")]
    port: u16,

    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    host: String,

    /// Maximum number of simultaneously admitted clients
    #[arg(short = 'm', long, default_value_t = DEFAULT_CAPACITY, value_parser = parse_capacity)]
    max_clients: usize,

    /// ASCII-art file sent in the greeting instead of the built-in logo
    #[arg(short = 'b', long)]
    banner_file: Option<PathBuf>,

    /// Append logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Serve the HTTP status endpoint on this port
    #[arg(long)]
    status_port: Option<u16>,
}

fn parse_capacity(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

/// Unexpected extra arguments, e.g. a second positional
fn is_usage_error(error: &clap::Error) -> bool {
    error.kind() == ErrorKind::UnknownArgument
}

#[tokio::main]
async fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) if is_usage_error(&e) => {
            eprintln!("{}", USAGE);
            process::exit(1);
        }
        Err(e) => {
            let _ = e.print();
            process::exit(1);
        }
    };

    // Initialize tracing
    match &args.log_file {
        Some(path) => {
            if let Err(e) = setup_file_logger(env!("CARGO_BIN_NAME"), "info", path) {
                eprintln!("Failed to open log file {}: {}", path.display(), e);
                process::exit(1);
            }
        }
        None => setup_logger(env!("CARGO_BIN_NAME"), "info"),
    }

    let banner = match &args.banner_file {
        Some(path) => match Banner::load(path) {
            Ok(banner) => banner,
            Err(e) => {
                tracing::error!("{}", e);
                process::exit(1);
            }
        },
        None => Banner::default(),
    };

    // Initialize dependencies in order:
    // 1. Clock
    // 2. Registry
    // 3. UseCases
    // 4. Server

    // 1. Wall clock for timestamps and prompts
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // 2. Create Registry (in-memory, lives for the whole process)
    let registry = Arc::new(InMemoryChatRegistry::new(args.max_clients, clock.clone()));
    tracing::info!("Chat registry created with capacity {}", args.max_clients);

    // 3. Create UseCases
    let join_chat_usecase = Arc::new(JoinChatUseCase::new(registry.clone(), clock.clone()));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(registry.clone(), clock.clone()));
    let leave_chat_usecase = Arc::new(LeaveChatUseCase::new(registry.clone(), clock.clone()));
    let get_chat_status_usecase = Arc::new(GetChatStatusUseCase::new(registry));

    // 4. Create and run the server
    let server = Server::new(
        join_chat_usecase,
        send_message_usecase,
        leave_chat_usecase,
        get_chat_status_usecase,
        banner,
        clock,
    );
    if let Err(e) = server.run(&args.host, args.port, args.status_port).await {
        tracing::error!("Server error: {}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        // テスト項目: 引数なしで既定値が使われる
        // given (前提条件) / when (操作):
        let args = Args::try_parse_from(["tcp-chat"]).unwrap();

        // then (期待する結果):
        assert_eq!(args.port, 8989);
        assert_eq!(args.host, "0.0.0.0");
        assert_eq!(args.max_clients, DEFAULT_CAPACITY);
        assert_eq!(args.status_port, None);
    }

    #[test]
    fn test_extra_positional_is_usage_error() {
        // テスト項目: 2 つ目の位置引数は USAGE を表示するエラーになる
        // given (前提条件) / when (操作):
        let error = Args::try_parse_from(["tcp-chat", "8989", "2525"]).unwrap_err();

        // then (期待する結果):
        assert!(is_usage_error(&error));
    }

    #[test]
    fn test_invalid_flag_value_keeps_its_own_message() {
        // テスト項目: フラグの値が不正な場合は USAGE ではなく原因を表示する
        // given (前提条件):
        let inputs: [&[&str]; 2] = [
            &["tcp-chat", "--max-clients", "0"],
            &["tcp-chat", "--status-port", "http"],
        ];

        for input in inputs {
            // when (操作):
            let error = Args::try_parse_from(input).unwrap_err();

            // then (期待する結果):
            assert!(!is_usage_error(&error), "{input:?}");
            assert!(error.to_string().contains(input[1]), "{input:?}");
        }
    }
}
