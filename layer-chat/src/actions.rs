//! The action loop: pick a dialog, then send, read history or exit.

use chrono::DateTime;

use crate::config::Config;
use crate::dialogs::{self, Target};
use crate::errors::Error;
use crate::messenger::{HistoryMessage, Messenger};
use crate::prompt::Prompt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Send,
    History,
    Exit,
}

impl Action {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "send" | "s" | "1"                        => Some(Self::Send),
            "history" | "get-history" | "h" | "2"     => Some(Self::History),
            "exit" | "quit" | "e" | "q" | "3"         => Some(Self::Exit),
            _ => None,
        }
    }
}

const ACTION_MENU: &str = "Choose an action: [1] send  [2] get-history  [3] exit";

/// Run until the user picks [`Action::Exit`].
///
/// RPC errors inside one action are reported and the loop continues; prompt
/// failures end the run.
pub async fn run<M, P>(messenger: &mut M, prompt: &mut P, config: &Config) -> Result<(), Error>
where
    M: Messenger,
    P: Prompt,
{
    loop {
        let target = dialogs::choose(messenger, prompt, config.dialog_limit).await?;
        let action = ask_action(prompt)?;

        let result = match action {
            Action::Exit => {
                log::info!("Bye");
                return Ok(());
            }
            Action::Send    => send(messenger, prompt, &target).await,
            Action::History => history(messenger, &target, config.history_limit).await,
        };

        match result {
            Ok(()) => {}
            Err(Error::Rpc(e)) => {
                log::warn!("{action:?} on {} failed: {e}", target.peer);
                println!("✗ {e}");
            }
            Err(e) => return Err(e),
        }
    }
}

fn ask_action<P: Prompt>(prompt: &mut P) -> Result<Action, Error> {
    loop {
        let input = prompt.line(ACTION_MENU)?;
        match Action::parse(&input) {
            Some(action) => return Ok(action),
            None         => println!("Unknown action {input:?}"),
        }
    }
}

async fn send<M: Messenger, P: Prompt>(messenger: &mut M, prompt: &mut P, target: &Target) -> Result<(), Error> {
    let text = prompt.line("Please enter the message you want to send:")?;
    if text.is_empty() {
        println!("Nothing to send");
        return Ok(());
    }
    messenger.send_message(&target.peer, &text).await?;
    println!("💬 Sent to {}", target.title);
    Ok(())
}

async fn history<M: Messenger>(messenger: &mut M, target: &Target, limit: i32) -> Result<(), Error> {
    let messages = messenger.history(&target.peer, limit).await?;
    println!("── {} ({} messages) ──", target.title, messages.len());
    print!("{}", render_history(&messages));
    Ok(())
}

/// `[date] id >> text` per message, oldest first; `>>` marks outgoing.
pub fn render_history(messages: &[HistoryMessage]) -> String {
    let mut out = String::new();
    for m in messages.iter().rev() {
        let date = DateTime::from_timestamp(i64::from(m.date), 0)
            .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| m.date.to_string());
        let arrow = if m.outgoing { ">>" } else { "<<" };
        let text = if m.service {
            "(service message)"
        } else if m.text.is_empty() {
            "(media)"
        } else {
            m.text.as_str()
        };
        out.push_str(&format!("[{date}] {} {arrow} {text}\n", m.id));
    }
    out
}
