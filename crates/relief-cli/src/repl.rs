//! Interactive chat loop over stdin.

use std::io::Write;
use std::process::ExitCode;

use relief_client::render::{
    ask_label, render_context_panel, render_turn, welcome_line, APP_TITLE, INPUT_PLACEHOLDER,
};
use relief_client::{AskOutcome, Role};
use relief_common::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::app::{render_history_item, App};

const HELP: &str = "Commands: /sources  /history  /logout  /quit";

#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Blank,
    Question(&'a str),
    Sources,
    History,
    Logout,
    Quit,
    Help,
    Unknown(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    let line = line.trim();
    if line.is_empty() {
        return Input::Blank;
    }
    if !line.starts_with('/') {
        return Input::Question(line);
    }
    match line {
        "/sources" => Input::Sources,
        "/history" => Input::History,
        "/logout" => Input::Logout,
        "/quit" | "/exit" => Input::Quit,
        "/help" => Input::Help,
        other => Input::Unknown(other),
    }
}

pub async fn run(app: &App) -> Result<ExitCode> {
    let Some(profile) = app.require_profile().await else {
        return Ok(ExitCode::FAILURE);
    };

    println!("{APP_TITLE}");
    println!("{}", welcome_line(&profile));
    println!("{HELP}");
    println!();
    for turn in app.chat.transcript() {
        println!("{}", render_turn(&turn));
    }
    println!("({INPUT_PLACEHOLDER})");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_input(&line) {
            Input::Blank => continue,
            Input::Quit => break,
            Input::Help => println!("{HELP}"),
            Input::Unknown(command) => println!("Unknown command {command}. {HELP}"),
            Input::Sources => println!("{}", render_context_panel(&app.chat.contexts())),
            Input::History => show_history(app).await,
            Input::Logout => {
                app.session.logout();
                println!("Signed out.");
                break;
            }
            Input::Question(question) => ask(app, question).await,
        }
    }

    debug!("chat loop finished");
    Ok(ExitCode::SUCCESS)
}

async fn ask(app: &App, question: &str) {
    app.chat.set_draft(question);
    println!("{}", ask_label(true));

    let before = app.chat.transcript().len();
    let outcome = app.chat.submit(app.session.token().as_deref()).await;

    for turn in app
        .chat
        .transcript()
        .iter()
        .skip(before)
        .filter(|t| t.role == Role::Assistant)
    {
        println!("{}", render_turn(turn));
    }
    if outcome == AskOutcome::Answered {
        println!();
        println!("{}", render_context_panel(&app.chat.contexts()));
    }
}

async fn show_history(app: &App) {
    match app.chat.history(app.session.token().as_deref()).await {
        Ok(items) if items.is_empty() => println!("No questions yet."),
        Ok(items) => {
            for item in &items {
                println!("{}", render_history_item(item));
            }
        }
        Err(e) => println!("Could not load history: {e}"),
    }
}
