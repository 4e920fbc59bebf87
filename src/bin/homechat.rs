#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::todo)]
#![warn(clippy::panic)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(unreachable_pub)]
#![warn(missing_debug_implementations)]
#![warn(unused_qualifications)]
#![deny(unused_must_use)]

use homechat_server::client::render::{CLEAR_SCREEN, render_feed};
use homechat_server::client::{
    CLEAR_CONFIRMATION, ChatClient, ClientError, Command, HELP, Poller, Session, formulas, is_confirmed,
};
use homechat_server::config::ClientConfig;
use homechat_server::domain::message::Message;
use std::io;
use std::time::Duration;
use time::OffsetDateTime;
use tokio::io::{AsyncWriteExt, Stdout};
use tokio::sync::{mpsc, watch};
use tracing_subscriber::EnvFilter;

type Input = mpsc::Receiver<io::Result<String>>;

/// Reads stdin on a plain thread so a pending read never holds up runtime shutdown.
fn spawn_stdin_reader() -> Input {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in io::stdin().lines() {
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

#[derive(Debug)]
struct Terminal {
    out: Stdout,
}

impl Terminal {
    fn new() -> Self {
        Self { out: tokio::io::stdout() }
    }

    async fn write(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes()).await?;
        self.out.flush().await
    }
}

#[derive(Debug)]
enum Exit {
    Logout,
    Quit,
}

/// Next input line, or `None` on end of input or shutdown.
async fn read_line(input: &mut Input, shutdown: &mut watch::Receiver<bool>) -> io::Result<Option<String>> {
    if *shutdown.borrow() {
        return Ok(None);
    }

    tokio::select! {
        line = input.recv() => line.transpose(),
        _ = shutdown.wait_for(|&s| s) => Ok(None),
    }
}

fn screen(messages: &[Message], user: &str, width: usize, status: Option<&str>) -> String {
    let mut out = String::from(CLEAR_SCREEN);
    out.push_str(&render_feed(messages, user, OffsetDateTime::now_utc(), width));
    if let Some(status) = status {
        out.push_str(status);
        if !status.ends_with('\n') {
            out.push('\n');
        }
    }
    out.push_str("> ");
    out
}

async fn login(
    session: &mut Session,
    client: &ChatClient,
    input: &mut Input,
    term: &mut Terminal,
    shutdown: &mut watch::Receiver<bool>,
    mut preset: Option<String>,
) -> anyhow::Result<bool> {
    loop {
        let candidate = if let Some(name) = preset.take() {
            name
        } else {
            term.write("Enter your username: ").await?;
            match read_line(input, shutdown).await? {
                Some(line) => line,
                None => return Ok(false),
            }
        };

        match session.login(client, &candidate).await {
            Ok(user) => {
                tracing::info!(username = %user.username, "logged in");
                return Ok(true);
            }
            Err(ClientError::Denied(msg)) => term.write(&format!("Access Denied: {msg}\n")).await?,
            Err(e) => term.write(&format!("Error: {e}\n")).await?,
        }
    }
}

async fn chat(
    config: &ClientConfig,
    client: &ChatClient,
    user: &str,
    input: &mut Input,
    term: &mut Terminal,
    shutdown: &mut watch::Receiver<bool>,
) -> anyhow::Result<Exit> {
    let interval = Duration::from_millis(config.poll_interval_ms.max(100));
    let poller = Poller::spawn(client.clone(), interval, shutdown.clone());
    let mut feed = poller.subscribe();
    let mut messages = poller.latest();
    // Command output stays under the feed until the next command replaces it.
    let mut notice: Option<String> = None;

    loop {
        term.write(&screen(&messages, user, config.width, notice.as_deref())).await?;

        tokio::select! {
            changed = feed.changed() => {
                if changed.is_err() {
                    return Ok(Exit::Quit);
                }
                messages = feed.borrow_and_update().clone();
            }
            line = read_line(input, shutdown) => {
                let Some(line) = line? else {
                    return Ok(Exit::Quit);
                };
                let Some(command) = Command::parse(&line) else {
                    continue;
                };

                match command {
                    Command::Send(text) => match client.send_message(user, &text).await {
                        Ok(_) => {
                            notice = None;
                            poller.refresh();
                        }
                        Err(e) => notice = Some(format!("Failed to send message: {e}")),
                    },
                    Command::Clear => {
                        term.write(CLEAR_CONFIRMATION).await?;
                        let answer = read_line(input, shutdown).await?.unwrap_or_default();
                        if is_confirmed(&answer) {
                            notice = Some(match client.delete_all_messages().await {
                                Ok(_) => {
                                    poller.refresh();
                                    "All messages have been deleted".to_string()
                                }
                                Err(e) => format!("Failed to delete messages: {e}"),
                            });
                        }
                    }
                    Command::Refresh => poller.refresh(),
                    Command::Physics(None) => notice = Some(formulas::render_index()),
                    Command::Physics(Some(query)) => {
                        notice = Some(match formulas::find_section(&query) {
                            Some(section) => formulas::render_section(section),
                            None => format!("Unknown section '{query}'.\n{}", formulas::render_index()),
                        });
                    }
                    Command::Logout => return Ok(Exit::Logout),
                    Command::Help => notice = Some(HELP.to_string()),
                    Command::Quit => return Ok(Exit::Quit),
                    Command::Unknown(name) => {
                        notice = Some(format!("Unknown command /{name}. Type /help for commands."));
                    }
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ClientConfig::load();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let client = ChatClient::new(&config.server_url, Duration::from_secs(config.request_timeout_secs))?;
    let mut session = Session::new(config.session_file.clone());
    let mut input = spawn_stdin_reader();
    let mut term = Terminal::new();

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    homechat_server::spawn_signal_handler(shutdown_tx);

    let mut preset = config.username.clone();

    loop {
        if session.current_user().is_none() {
            if let Err(e) = session.resume(&client).await {
                term.write(&format!("Could not reach {}: {e}\n", client.base_url())).await?;
            }

            if session.current_user().is_none()
                && !login(&mut session, &client, &mut input, &mut term, &mut shutdown_rx, preset.take()).await?
            {
                break;
            }
        }

        let Some(user) = session.current_user().map(str::to_string) else {
            continue;
        };

        match chat(&config, &client, &user, &mut input, &mut term, &mut shutdown_rx).await? {
            Exit::Logout => {
                session.logout().await;
                term.write(&format!("{CLEAR_SCREEN}Logged out.\n")).await?;
            }
            Exit::Quit => break,
        }
    }

    term.write("\n").await?;
    Ok(())
}
