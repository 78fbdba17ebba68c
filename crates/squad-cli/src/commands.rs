//! Dispatch of parsed commands against an editing session.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, bail};
use squad_core::{
  board::Board,
  engine::Drag,
  player::Player,
  session::Session,
  store::{KeyValueStore, RootStore},
};
use squad_transfer::Format;

use crate::{
  cli::{Command, DraftCommand, ExportArgs, ImportArgs, PlayerCommand, TournamentCommand},
  render,
  resolve,
};

fn current_board(session: &Session) -> Result<&Board> {
  session.board().context("no draft is selected")
}

fn non_blank(name: &str, what: &str) -> Result<()> {
  if name.trim().is_empty() {
    bail!("{what} name cannot be blank");
  }
  Ok(())
}

/// Load state, apply one command, and persist whatever changed, including
/// the undo snapshot so a later `squad undo` can revert this command.
pub async fn run_once<S: KeyValueStore>(store: &RootStore<S>, command: Command) -> Result<String> {
  let root = store.load().await;
  let mut session = Session::with_snapshot(root, store.load_snapshot().await);
  let (root_before, snapshot_before) = (session.root().clone(), session.snapshot().cloned());

  let output = execute(&mut session, store, command).await?;

  if session.root() != &root_before {
    store.save(session.root()).await;
  }
  if session.snapshot() != snapshot_before.as_ref() {
    store.save_snapshot(session.snapshot()).await;
  }
  Ok(output)
}

/// Apply `command` to `session` and return the text to show the user.
pub async fn execute<S: KeyValueStore>(
  session: &mut Session,
  store: &RootStore<S>,
  command: Command,
) -> Result<String> {
  match command {
    Command::Status => Ok(render::status(session)),
    Command::Board { query } => Ok(render::board(&current_board(session)?.filtered(&query))),
    Command::Player(cmd) => player(session, cmd),
    Command::Title { list, text } => {
      let text = text.join(" ");
      session.edit_board(|b| b.rename_list(list, &text));
      let title = current_board(session)?.titles.get(list).to_owned();
      Ok(format!("{list} is now titled {title:?}"))
    }
    Command::Undo => Ok(if session.undo() {
      "undid the last board change".to_owned()
    } else {
      "nothing to undo".to_owned()
    }),
    Command::Tournament(cmd) => tournament(session, cmd),
    Command::Draft(cmd) => draft(session, cmd),
    Command::Import(args) => import(session, args).await,
    Command::Export(args) => export(session, args).await,
    Command::Theme { theme, toggle } => {
      let current = store.load_theme().await;
      let next = if toggle { Some(current.toggled()) } else { theme };
      match next {
        Some(next) => {
          store.save_theme(next).await;
          Ok(format!("theme: {next}"))
        }
        None => Ok(format!("theme: {current}")),
      }
    }
    Command::Shell => bail!("already in a shell"),
  }
}

// ─── Players ──────────────────────────────────────────────────────────────────

fn player(session: &mut Session, cmd: PlayerCommand) -> Result<String> {
  match cmd {
    PlayerCommand::Add { name, notes } => {
      let name = name.trim();
      non_blank(name, "player")?;
      session.edit_board(|b| b.add_player(name, &notes));
      Ok(format!("added {name}"))
    }
    PlayerCommand::Edit { player, name, notes } => {
      let board = current_board(session)?;
      let id = resolve::player(board, &player)?;
      let existing = &board.players[&id];
      let updated = Player {
        id:    id.clone(),
        name:  name.map(|n| n.trim().to_owned()).unwrap_or_else(|| existing.name.clone()),
        notes: notes.unwrap_or_else(|| existing.notes.clone()),
      };
      non_blank(&updated.name, "player")?;
      let shown = updated.name.clone();
      session.edit_board(|b| b.edit_player(updated));
      Ok(format!("updated {shown}"))
    }
    PlayerCommand::Remove { player, hard } => {
      let board = current_board(session)?;
      let id = resolve::player(board, &player)?;
      let name = board.players[&id].name.clone();
      let deletes = hard || board.available_order.contains(&id);
      session.edit_board(|b| if hard { b.remove_player(&id) } else { b.remove_or_release(&id) });
      Ok(if deletes {
        format!("removed {name}")
      } else {
        format!("sent {name} back to available")
      })
    }
    PlayerCommand::Assign { player, bucket } => {
      let id = resolve::player(current_board(session)?, &player)?;
      session.edit_board(|b| b.assign_to_bucket(&id, bucket));
      Ok(format!("moved to {bucket}"))
    }
    PlayerCommand::Release { player } => {
      let id = resolve::player(current_board(session)?, &player)?;
      session.edit_board(|b| b.send_to_available(&id));
      Ok("sent back to available".to_owned())
    }
    PlayerCommand::Move { player, to, index, query } => {
      let board = current_board(session)?;
      let id = resolve::player(board, &player)?;
      let from = board.locate(&id).context("player is not on any list")?;
      let drag = Drag { player_id: id, from, to, index };
      session.edit_board(|b| b.reorder_filtered(&drag, &query));
      Ok(format!("moved to {to}"))
    }
  }
}

// ─── Tournaments and drafts ──────────────────────────────────────────────────

fn tournament(session: &mut Session, cmd: TournamentCommand) -> Result<String> {
  let root = session.root();
  match cmd {
    TournamentCommand::List => Ok(render::tournaments(root)),
    TournamentCommand::Add { name } => {
      session.organize(|r| r.add_tournament(name.as_deref()));
      Ok(render::status(session))
    }
    TournamentCommand::Rename { tournament, name } => {
      non_blank(&name, "tournament")?;
      let id = resolve::tournament(root, &tournament)?;
      session.organize(|r| r.rename_tournament(&id, &name));
      Ok(format!("renamed to {}", name.trim()))
    }
    TournamentCommand::Delete { tournament } => {
      let id = resolve::tournament(root, &tournament)?;
      let name = root.tournaments[&id].name.clone();
      session.organize(|r| r.delete_tournament(&id));
      Ok(format!("deleted {name}\n{}", render::status(session)))
    }
    TournamentCommand::Duplicate { tournament } => {
      let id = resolve::tournament(root, &tournament)?;
      session.organize(|r| r.duplicate_tournament(&id));
      Ok(render::status(session))
    }
    TournamentCommand::Select { tournament } => {
      let id = resolve::tournament(root, &tournament)?;
      session.organize(|r| r.select_tournament(&id));
      Ok(render::status(session))
    }
  }
}

fn draft(session: &mut Session, cmd: DraftCommand) -> Result<String> {
  let root = session.root();
  let tournament_or_current = |needle: Option<String>| match needle {
    Some(needle) => resolve::tournament(root, &needle),
    None => Ok(root.ui.current_tournament_id.clone()),
  };
  match cmd {
    DraftCommand::List { tournament } => {
      let tid = tournament_or_current(tournament)?;
      Ok(render::drafts(root, &tid))
    }
    DraftCommand::Add { name, tournament, copy } => {
      let tid = tournament_or_current(tournament)?;
      let seed = if copy { current_board(session)?.clone() } else { Board::empty() };
      session.organize(|r| r.add_draft_with_board(&tid, name.as_deref(), &seed));
      Ok(render::status(session))
    }
    DraftCommand::Rename { draft, name } => {
      non_blank(&name, "draft")?;
      let id = resolve::draft(root, &draft)?;
      session.organize(|r| r.rename_draft(&id, &name));
      Ok(format!("renamed to {}", name.trim()))
    }
    DraftCommand::Delete { draft } => {
      let id = resolve::draft(root, &draft)?;
      let name = root.drafts[&id].name.clone();
      session.organize(|r| r.delete_draft(&id));
      Ok(format!("deleted {name}\n{}", render::status(session)))
    }
    DraftCommand::Duplicate { draft } => {
      let id = resolve::draft(root, &draft)?;
      session.organize(|r| r.duplicate_draft(&id));
      Ok(render::status(session))
    }
    DraftCommand::Move { draft, tournament } => {
      let id = resolve::draft(root, &draft)?;
      let tid = resolve::tournament(root, &tournament)?;
      session.organize(|r| r.move_draft(&id, &tid));
      Ok(render::status(session))
    }
    DraftCommand::Select { draft } => {
      let id = resolve::draft(root, &draft)?;
      session.organize(|r| r.select_draft(&id));
      Ok(render::status(session))
    }
  }
}

// ─── Import / export ─────────────────────────────────────────────────────────

async fn import(session: &mut Session, args: ImportArgs) -> Result<String> {
  let text = tokio::fs::read_to_string(&args.file)
    .await
    .with_context(|| format!("reading {}", args.file.display()))?;

  match Format::from(args.format) {
    Format::Csv => {
      let players = squad_transfer::csv::parse_players(&text).context("parsing CSV")?;
      let count = players.len();
      session.edit_board(|b| b.add_players(players));
      Ok(format!("imported {count} players"))
    }
    Format::Json => {
      let board = squad_transfer::json::import_board(&text)
        .with_context(|| format!("{} is not a board file", args.file.display()))?;
      let count = board.players.len();
      if args.new_draft {
        let tid = session.root().ui.current_tournament_id.clone();
        session.organize(|r| r.add_draft_with_board(&tid, args.name.as_deref(), &board));
        Ok(format!("imported {count} players into a new draft"))
      } else {
        session.edit_board(|_| board);
        Ok(format!("replaced the board with {count} players"))
      }
    }
    Format::Tournament => {
      let imported = squad_transfer::json::import_tournament(&text)
        .with_context(|| format!("{} is not a tournament bundle", args.file.display()))?;
      let count = imported.drafts.len();
      session.organize(|r| imported.apply_to(r));
      Ok(format!("imported a tournament with {count} drafts\n{}", render::status(session)))
    }
  }
}

fn output_path(out: &Path, format: Format) -> PathBuf {
  if out.is_dir() { out.join(format.default_file_name()) } else { out.to_path_buf() }
}

async fn export(session: &Session, args: ExportArgs) -> Result<String> {
  let format = Format::from(args.format);
  let text = match format {
    Format::Csv => squad_transfer::csv::export_board(current_board(session)?)?,
    Format::Json => squad_transfer::json::export_board(current_board(session)?)?,
    Format::Tournament => {
      let root = session.root();
      let tid = match &args.tournament {
        Some(needle) => resolve::tournament(root, needle)?,
        None => root.ui.current_tournament_id.clone(),
      };
      squad_transfer::json::export_tournament(root, &tid)?
    }
  };

  let Some(out) = args.out else {
    return Ok(text);
  };
  let path = output_path(&out, format);
  tokio::fs::write(&path, text)
    .await
    .with_context(|| format!("writing {}", path.display()))?;
  Ok(format!("wrote {}", path.display()))
}
