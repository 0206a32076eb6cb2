//! Line-oriented interactive front end.
//!
//! Each line is one command; the form is re-rendered after every change.

use crate::image::{SelectedImage, TryOnProvider};
use crate::prompt::build_prompt;
use crate::session::{render, Event, Slot, TryOnSession, UiState, Uploader};
use std::io::{self, BufRead, Write};

const HELP: &str = "\
Commands:
  person <path>          choose the person photo
  outfit <path>          choose the outfit photo
  clear person|outfit    remove a photo
  details <text>         set extra details (empty to reset)
  generate               generate the try-on image
  save <path>            write the last result to a file
  prompt                 show the prompt that will be sent
  show                   redraw the form
  help                   show this help
  quit                   leave";

/// Interactive console bound to one session and one provider.
pub struct Console<P: TryOnProvider> {
    session: TryOnSession,
    provider: P,
}

impl<P: TryOnProvider> Console<P> {
    /// Creates a console with an empty session.
    pub fn new(provider: P) -> Self {
        Self {
            session: TryOnSession::new(),
            provider,
        }
    }

    /// The session being edited.
    pub fn session(&self) -> &TryOnSession {
        &self.session
    }

    /// Reads commands until `quit` or end of input.
    pub async fn run<R, W>(&mut self, reader: R, mut writer: W) -> io::Result<()>
    where
        R: BufRead,
        W: Write,
    {
        writeln!(writer, "{}", render(&self.session))?;
        writeln!(writer, "Type `help` for commands.")?;
        writer.flush()?;

        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if !self.handle_line(line, &mut writer).await? {
                break;
            }
            writer.flush()?;
        }

        Ok(())
    }

    /// Handles one command. Returns `false` when the console should stop.
    async fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<bool> {
        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };

        match command.to_lowercase().as_str() {
            "person" => self.select(Slot::Person, arg, out)?,
            "outfit" | "look" => self.select(Slot::Outfit, arg, out)?,
            "clear" => match Slot::parse(arg) {
                Some(slot) => {
                    Uploader::for_slot(slot).clear(&mut self.session.slot(slot));
                    writeln!(out, "{}", render(&self.session))?;
                }
                None => writeln!(out, "Usage: clear person|outfit")?,
            },
            "details" => {
                self.session
                    .dispatch(Event::DetailsChanged(arg.to_string()));
                writeln!(out, "{}", render(&self.session))?;
            }
            "generate" => {
                if !self.session.current_state().is_loading() {
                    writeln!(out, "{}", render::render_result(&UiState::Loading))?;
                    out.flush()?;
                }
                self.session.generate(&self.provider).await;
                writeln!(out, "{}", render(&self.session))?;
            }
            "save" => self.save(arg, out)?,
            "prompt" => writeln!(out, "{}", build_prompt(self.session.details()))?,
            "show" => writeln!(out, "{}", render(&self.session))?,
            "help" => writeln!(out, "{HELP}")?,
            "quit" | "exit" => return Ok(false),
            other => writeln!(out, "Unknown command: {other}. Type `help` for commands.")?,
        }

        Ok(true)
    }

    fn select<W: Write>(&mut self, slot: Slot, path: &str, out: &mut W) -> io::Result<()> {
        if path.is_empty() {
            return writeln!(out, "Usage: {slot} <path>");
        }

        match SelectedImage::from_path(path) {
            Ok(image) => {
                Uploader::for_slot(slot).select([image], &mut self.session.slot(slot));
                writeln!(out, "{}", render(&self.session))
            }
            Err(e) => writeln!(out, "Could not read {path}: {e}"),
        }
    }

    fn save<W: Write>(&self, path: &str, out: &mut W) -> io::Result<()> {
        if path.is_empty() {
            return writeln!(out, "Usage: save <path>");
        }

        let Some(image) = self.session.current_state().result() else {
            return writeln!(out, "No generated image to save yet.");
        };

        match image.save(path) {
            Ok(bytes) => writeln!(out, "Saved {path} ({bytes} bytes)"),
            Err(e) => writeln!(out, "Could not save {path}: {e}"),
        }
    }
}
