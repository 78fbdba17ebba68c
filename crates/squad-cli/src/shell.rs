//! Interactive shell: one long-lived session, saved in the background.

use std::{io::Write as _, sync::Arc, time::Duration};

use anyhow::{Result, bail};
use clap::Parser;
use squad_core::{
  debounce::DebouncedSaver,
  session::Session,
  store::{KeyValueStore, RootStore},
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::{cli::Command, commands};

/// One line typed at the prompt, parsed with the same grammar as the
/// command line.
#[derive(Parser, Debug)]
#[command(name = "squad", no_binary_name = true, disable_version_flag = true)]
struct Line {
  #[command(subcommand)]
  command: Command,
}

/// Split a line into words. Single or double quotes group words and a
/// backslash escapes the next character.
pub fn tokenize(line: &str) -> Result<Vec<String>> {
  let mut words = Vec::new();
  let mut word = String::new();
  let mut in_word = false;
  let mut quote: Option<char> = None;
  let mut chars = line.chars();

  while let Some(c) = chars.next() {
    match (quote, c) {
      (_, '\\') => {
        if let Some(next) = chars.next() {
          word.push(next);
          in_word = true;
        }
      }
      (Some(q), c) if c == q => quote = None,
      (Some(_), c) => word.push(c),
      (None, '"' | '\'') => {
        quote = Some(c);
        in_word = true;
      }
      (None, c) if c.is_whitespace() => {
        if in_word {
          words.push(std::mem::take(&mut word));
          in_word = false;
        }
      }
      (None, c) => {
        word.push(c);
        in_word = true;
      }
    }
  }
  if quote.is_some() {
    bail!("unterminated quote");
  }
  if in_word {
    words.push(word);
  }
  Ok(words)
}

pub(crate) fn parse(line: &str) -> Result<Option<Command>> {
  let words = tokenize(line)?;
  match words.first().map(String::as_str) {
    None => Ok(None),
    Some(_) => Ok(Some(Line::try_parse_from(words)?.command)),
  }
}

fn prompt() {
  print!("squad> ");
  let _ = std::io::stdout().flush();
}

/// Read commands from stdin until EOF or `quit`.
pub async fn run<S>(store: Arc<RootStore<S>>, delay: Duration) -> Result<()>
where
  S: KeyValueStore + 'static,
{
  let root = store.load().await;
  let mut session = Session::with_snapshot(root, store.load_snapshot().await);
  let saver = DebouncedSaver::spawn(store.clone(), delay);

  println!("{}", crate::render::status(&session));
  println!("Type a command (e.g. `board`, `player add Ada`), `help`, or `quit`.");
  prompt();

  let mut lines = BufReader::new(tokio::io::stdin()).lines();
  while let Some(line) = lines.next_line().await? {
    if matches!(line.trim(), "quit" | "exit") {
      break;
    }
    match parse(&line) {
      Ok(None) => {}
      Ok(Some(command)) => {
        let before = session.root().clone();
        match commands::execute(&mut session, &store, command).await {
          Ok(output) if !output.is_empty() => println!("{output}"),
          Ok(_) => {}
          Err(e) => eprintln!("error: {e:#}"),
        }
        if session.root() != &before {
          debug!("scheduling save");
          saver.schedule(session.root().clone());
        }
      }
      Err(e) => match e.downcast_ref::<clap::Error>() {
        Some(clap_err) => {
          let _ = clap_err.print();
        }
        None => eprintln!("error: {e}"),
      },
    }
    prompt();
  }

  saver.shutdown().await;
  store.save_snapshot(session.snapshot()).await;
  Ok(())
}
