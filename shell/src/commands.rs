use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use setlist_core::domain::{SongId, SongQuery, SortBy};
use setlist_core::ports::{KeyValueStore, ShareChannel, ShareTarget};
use setlist_core::services::share::{lyrics_or_placeholder, stage_line};
use setlist_core::services::SetlistService;
use setlist_core::CoreError;

#[derive(Parser)]
#[command(no_binary_name = true)]
pub struct InnerCli {
  #[command(subcommand)]
  pub command: InnerCommand,
}

/// A song reference: position in the last `songs` listing, or a song id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SongRef {
  Listed(usize),
  Id(SongId),
}

fn parse_song_ref(s: &str) -> Result<SongRef, String> {
  if let Ok(n) = s.parse::<usize>() {
    return Ok(SongRef::Listed(n));
  }
  s.parse::<SongId>().map(SongRef::Id).map_err(|_| format!("'{s}' is neither a list number nor a song id"))
}

#[derive(Subcommand)]
pub enum InnerCommand {
  /// Add a song to the catalog.
  Add { name: String, key: String },
  /// Edit a song; omitted fields keep their current value.
  Edit {
    #[arg(value_parser = parse_song_ref)]
    song: SongRef,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    key: Option<String>,
    /// Lyrics text; `\n` starts a new line. Use --lyrics-file when the
    /// lyrics need a literal backslash-n.
    #[arg(long, conflicts_with = "lyrics_file")]
    lyrics: Option<String>,
    #[arg(long)]
    lyrics_file: Option<PathBuf>,
  },
  /// Delete a song from the catalog (and from the setlist).
  Rm {
    #[arg(value_parser = parse_song_ref)]
    song: SongRef,
  },
  /// List the catalog.
  Songs {
    #[arg(default_value = "")]
    search: String,
    #[arg(long)]
    key: Option<String>,
    #[arg(long)]
    sort: Option<SortBy>,
  },
  /// List the distinct keys in the catalog.
  Keys,
  /// Append songs to the setlist.
  Pick {
    #[arg(value_parser = parse_song_ref, required = true)]
    songs: Vec<SongRef>,
  },
  Up { position: usize },
  Down { position: usize },
  /// Remove the song at a setlist position.
  Drop { position: usize },
  /// Show the setlist.
  Setlist,
  Clear,
  /// Save the setlist to history (default date: today).
  Save { date: Option<String> },
  History,
  /// Replace the setlist with a history entry.
  Load { entry: usize },
  /// Delete a history entry.
  Forget { entry: usize },
  /// Print the setlist for copying.
  Copy,
  /// Open the messaging share link.
  Share,
  /// Stage view: numbered song list.
  Stage,
  /// Stage view: lyrics of the song at a setlist position.
  Lyrics { position: usize },
  #[command(alias = "quit")]
  Exit,
}

pub enum Flow {
  Continue,
  Exit,
}

/// Interactive session state on top of the service.
pub struct Shell<S: KeyValueStore, T: ShareTarget> {
  service: SetlistService<S>,
  share: T,
  default_sort: SortBy,
  listing: Vec<SongId>,
}

impl<S: KeyValueStore, T: ShareTarget> Shell<S, T> {
  pub fn new(service: SetlistService<S>, share: T, default_sort: SortBy) -> Self {
    Self { service, share, default_sort, listing: Vec::new() }
  }

  pub fn service(&self) -> &SetlistService<S> {
    &self.service
  }

  pub fn share_target(&self) -> &T {
    &self.share
  }

  /// Parses and runs one input line. Usage errors and recoverable core
  /// errors are written to `out`; only I/O failures bubble up.
  pub fn run_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
    let line = line.trim();
    if line.is_empty() {
      return Ok(Flow::Continue);
    }

    let args = shlex::split(line).unwrap_or_else(|| line.split_whitespace().map(String::from).collect());
    let cli = match InnerCli::try_parse_from(args) {
      Ok(cli) => cli,
      Err(e) => {
        write!(out, "{e}")?;
        return Ok(Flow::Continue);
      }
    };

    match self.execute(cli.command, out) {
      Ok(flow) => Ok(flow),
      Err(e) => match e.downcast::<CoreError>() {
        Ok(core) => {
          tracing::debug!(error = %core, "command failed");
          writeln!(out, "error: {core}")?;
          Ok(Flow::Continue)
        }
        Err(other) => {
          writeln!(out, "error: {other:#}")?;
          Ok(Flow::Continue)
        }
      },
    }
  }

  fn execute<W: Write>(&mut self, command: InnerCommand, out: &mut W) -> Result<Flow> {
    match command {
      InnerCommand::Add { name, key } => {
        let song = self.service.add_song(&name, &key)?;
        writeln!(out, "Added {} ({})", song.name, song.key)?;
      }
      InnerCommand::Edit { song, name, key, lyrics, lyrics_file } => {
        let id = self.resolve(song)?;
        let current = self.service.song(id).cloned().ok_or(CoreError::NotFound(id))?;
        let lyrics = match (lyrics, lyrics_file) {
          (Some(text), _) => text.replace("\\n", "\n"),
          (None, Some(path)) => {
            std::fs::read_to_string(&path).with_context(|| format!("reading lyrics from {}", path.display()))?
          }
          (None, None) => current.lyrics.clone(),
        };
        let name = name.unwrap_or(current.name);
        let key = key.unwrap_or(current.key);
        let song = self.service.update_song(id, &name, &key, &lyrics)?;
        writeln!(out, "Updated {} ({})", song.name, song.key)?;
      }
      InnerCommand::Rm { song } => {
        let id = self.resolve(song)?;
        self.service.delete_song(id)?;
        self.listing.retain(|listed| *listed != id);
        writeln!(out, "Deleted.")?;
      }
      InnerCommand::Songs { search, key, sort } => {
        let query = SongQuery::new(search).with_key(key.unwrap_or_default()).sorted_by(sort.unwrap_or(self.default_sort));
        let songs = self.service.list_songs(&query);
        self.listing = songs.iter().map(|s| s.id).collect();
        if songs.is_empty() {
          writeln!(out, "No songs.")?;
        }
        for (i, song) in songs.iter().enumerate() {
          writeln!(out, "{:>3}. {} ({})", i + 1, song.name, song.key)?;
        }
      }
      InnerCommand::Keys => {
        writeln!(out, "{}", self.service.keys().join(", "))?;
      }
      InnerCommand::Pick { songs } => {
        for song in songs {
          let id = self.resolve(song)?;
          self.service.add_to_setlist(id)?;
        }
        self.print_setlist(out)?;
      }
      InnerCommand::Up { position } => {
        self.service.move_up(to_index(position)?)?;
        self.print_setlist(out)?;
      }
      InnerCommand::Down { position } => {
        self.service.move_down(to_index(position)?)?;
        self.print_setlist(out)?;
      }
      InnerCommand::Drop { position } => {
        self.service.remove_from_setlist(to_index(position)?)?;
        self.print_setlist(out)?;
      }
      InnerCommand::Setlist => self.print_setlist(out)?,
      InnerCommand::Clear => {
        self.service.clear_setlist();
        writeln!(out, "Setlist cleared.")?;
      }
      InnerCommand::Save { date } => {
        let date = date.unwrap_or_else(today);
        let entry = self.service.save_current_setlist(&date)?;
        writeln!(out, "Saved {} songs for {}.", entry.songs.len(), entry.date)?;
      }
      InnerCommand::History => {
        let history = self.service.history();
        if history.is_empty() {
          writeln!(out, "No saved setlists.")?;
        }
        for (i, entry) in history.iter().enumerate() {
          writeln!(out, "{:>3}. {}  {}", i + 1, entry.date, entry.summary())?;
        }
      }
      InnerCommand::Load { entry } => {
        let loaded = self.service.load_setlist_from_history(to_index(entry)?)?;
        for song in &loaded.missing {
          writeln!(out, "Skipped '{}': no longer in the catalog.", song.name)?;
        }
        self.print_setlist(out)?;
      }
      InnerCommand::Forget { entry } => {
        self.service.delete_history_entry(to_index(entry)?)?;
        writeln!(out, "History entry deleted.")?;
      }
      InnerCommand::Copy => {
        self.service.share(&self.share, ShareChannel::Clipboard)?;
        writeln!(out, "Setlist copied.")?;
      }
      InnerCommand::Share => {
        self.service.share(&self.share, ShareChannel::Messaging)?;
      }
      InnerCommand::Stage => {
        for (i, song) in self.service.stage_songs()?.iter().enumerate() {
          writeln!(out, "{:>3}. {}", i + 1, stage_line(song))?;
        }
      }
      InnerCommand::Lyrics { position } => {
        let index = to_index(position)?;
        let songs = self.service.stage_songs()?;
        let song = songs.get(index).ok_or(CoreError::Index { index, len: songs.len() })?;
        writeln!(out, "{}", song.name)?;
        writeln!(out, "Tonalidad: {}", song.key)?;
        writeln!(out)?;
        writeln!(out, "{}", lyrics_or_placeholder(song))?;
      }
      InnerCommand::Exit => return Ok(Flow::Exit),
    }
    Ok(Flow::Continue)
  }

  fn resolve(&self, song: SongRef) -> Result<SongId> {
    match song {
      SongRef::Id(id) => Ok(id),
      SongRef::Listed(n) => match n.checked_sub(1).and_then(|i| self.listing.get(i)) {
        Some(id) => Ok(*id),
        None => bail!("no song #{n} in the last listing, run `songs` first"),
      },
    }
  }

  fn print_setlist<W: Write>(&self, out: &mut W) -> Result<()> {
    let songs = self.service.setlist();
    if songs.is_empty() {
      writeln!(out, "Setlist is empty.")?;
    }
    for (i, song) in songs.iter().enumerate() {
      writeln!(out, "{:>3}. {} ({})", i + 1, song.name, song.key)?;
    }
    Ok(())
  }
}

/// Shell positions are 1-based.
fn to_index(position: usize) -> Result<usize> {
  match position.checked_sub(1) {
    Some(index) => Ok(index),
    None => bail!("positions start at 1"),
  }
}

fn today() -> String {
  chrono::Local::now().format("%Y-%m-%d").to_string()
}
