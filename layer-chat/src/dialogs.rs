//! Dialog list rendering and interactive selection.

use crate::errors::Error;
use crate::messenger::{Dialog, Messenger};
use crate::peer::Peer;
use crate::prompt::Prompt;

/// A dialog the user picked, with a usable peer.
#[derive(Clone, Debug, PartialEq)]
pub struct Target {
    pub title: String,
    pub peer:  Peer,
}

/// One line per dialog: `<index>  <title>`, then kind and unread count.
pub fn render(dialogs: &[Dialog]) -> String {
    let mut out = String::new();
    for (i, d) in dialogs.iter().enumerate() {
        out.push_str(&format!("{i}  {}", d.title));
        match d.kind() {
            Some(kind) => out.push_str(&format!(" [{kind}]")),
            None       => out.push_str(" [unavailable]"),
        }
        if d.unread_count > 0 {
            out.push_str(&format!(" ({} unread)", d.unread_count));
        }
        out.push('\n');
    }
    out
}

/// Resolve user input to a dialog index.
///
/// An in-range index wins; otherwise the first title starting with the input
/// (case-insensitive).
pub fn select(dialogs: &[Dialog], input: &str) -> Option<usize> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(i) = input.parse::<usize>() {
        if i < dialogs.len() {
            return Some(i);
        }
    }
    let needle = input.to_lowercase();
    dialogs.iter().position(|d| d.title.to_lowercase().starts_with(&needle))
}

/// Fetch one page of dialogs, print it and ask until a usable one is picked.
pub async fn choose<M, P>(messenger: &mut M, prompt: &mut P, limit: i32) -> Result<Target, Error>
where
    M: Messenger,
    P: Prompt,
{
    let dialogs = messenger.dialogs(limit).await?;
    if dialogs.is_empty() {
        return Err(Error::NoDialogs);
    }

    println!("Your chat list");
    print!("{}", render(&dialogs));

    loop {
        let input = prompt.line("Select chat by index or name:")?;
        let Some(i) = select(&dialogs, &input) else {
            println!("No chat matches {input:?}");
            continue;
        };
        let dialog = &dialogs[i];
        match &dialog.peer {
            Ok(peer) => {
                log::debug!("Selected {:?} ({peer})", dialog.title);
                return Ok(Target { title: dialog.title.clone(), peer: *peer });
            }
            Err(e) => println!("Cannot open {:?}: {e}", dialog.title),
        }
    }
}
