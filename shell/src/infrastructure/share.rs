use std::cell::RefCell;
use std::io::Write;

use setlist_core::ports::ShareTarget;
use setlist_core::CoreError;

/// A `ShareTarget` for a terminal session.
///
/// There is no clipboard in a plain terminal, so the "copy" request prints
/// the text between markers for the user to select. Links go to the system
/// browser unless `open_browser` is off, in which case they are printed.
pub struct TerminalShare<W: Write> {
  out: RefCell<W>,
  open_browser: bool,
}

impl<W: Write> TerminalShare<W> {
  pub fn new(out: W, open_browser: bool) -> Self {
    Self { out: RefCell::new(out), open_browser }
  }

  pub fn into_inner(self) -> W {
    self.out.into_inner()
  }

  fn print(&self, text: &str) -> Result<(), CoreError> {
    writeln!(self.out.borrow_mut(), "{text}").map_err(|e| CoreError::Share(e.to_string()))
  }
}

impl<W: Write> ShareTarget for TerminalShare<W> {
  fn copy_to_clipboard(&self, text: &str) -> Result<(), CoreError> {
    self.print("----- copy below -----")?;
    self.print(text)?;
    self.print("----------------------")
  }

  fn open_link(&self, url: &str) -> Result<(), CoreError> {
    if self.open_browser {
      webbrowser::open(url).map_err(|e| CoreError::Share(e.to_string()))
    } else {
      self.print(url)
    }
  }
}
