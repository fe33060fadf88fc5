//! Mocksh CLI - drive the training sandbox from a terminal
//!
//! Usage:
//!   mocksh -c 'adb logcat -d | grep Secret'   # Execute one command line
//!   mocksh                                    # Interactive REPL
//!
//! The sandbox is a self-contained demo scenario: a seeded filesystem, a
//! leaky logcat buffer, and a small API with one header-trust endpoint.
//! Nothing touches the host system.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::Parser;
use serde_json::json;

use mocksh::{
    HttpRequest, HttpResponse, Route, Shell, ShellContext, StaticResponse, VirtualFs,
    VirtualRouter,
};

/// Mocksh - deterministic mock shell sandbox
#[derive(Parser, Debug)]
#[command(name = "mocksh")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Execute the given command line and exit
    #[arg(short = 'c')]
    command: Option<String>,
}

fn demo_shell() -> Result<Shell> {
    let fs = VirtualFs::from_tree(&json!({
        "/home/user": {
            "readme.txt": "Try `help` to see what this terminal allows.\n",
            "app": {
                "config.json": "{\"apiBase\":\"http://api.local\",\"debug\":false}\n",
                "cache": { "session.tmp": "expired\n" },
            },
        },
        "/system/logs": {
            "boot.log": "kernel up\nradio up\nui up\n",
        },
    }))?;

    let router = VirtualRouter::new()
        .route(
            "GET:/api/items",
            Route::json(json!({"ok": true, "items": ["keyboard", "mouse"]})),
        )
        .route(
            "GET:/internal/debug",
            Route::handler(|req: &HttpRequest, _ctx: &mut ShellContext| {
                match req.headers.get("x-internal-request").map(String::as_str) {
                    Some("true") => {
                        HttpResponse::json(200, &json!({"debug": "build 4711, staging keys loaded"}))
                    }
                    _ => HttpResponse::json(403, &json!({"error": "internal only"})),
                }
            }),
        )
        .route(
            "*",
            StaticResponse::new(json!({"error": "upstream unreachable"})).status(500),
        );

    Ok(Shell::builder()
        .fs(fs)
        .http(router)
        .env("USER", "learner")
        .env("HOME", "/home/user")
        .env(
            "ADB_LOGCAT",
            "I/PurpleApp: service started\nD/Secret: api key = sk-demo-0000\nI/PurpleApp: idle",
        )
        .build())
}

fn print_result(result: &mocksh::ExecResult) {
    print!("{}", result.stdout);
    if !result.stderr.is_empty() {
        eprintln!("{}", result.stderr.trim_end_matches('\n'));
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let shell = demo_shell()?;

    // One-shot mode
    if let Some(command) = args.command {
        let result = shell.exec(&command).await;
        print_result(&result);
        std::process::exit(result.exit_code);
    }

    // REPL: one context for the whole session so `cd` sticks.
    let mut ctx = ShellContext::new()
        .env("USER", "learner")
        .env("HOME", "/home/user")
        .env(
            "ADB_LOGCAT",
            "I/PurpleApp: service started\nD/Secret: api key = sk-demo-0000\nI/PurpleApp: idle",
        );

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        write!(stdout, "$ ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim_end_matches('\n');
        if line == "exit" || line == "quit" {
            break;
        }
        let result = shell.exec_with(line, &mut ctx).await;
        print_result(&result);
    }
    Ok(())
}
