//! Line-oriented terminal front end: a [`View`] that prints, and the parser
//! for what the player types while in a room.

use std::fmt;
use std::io::Write;

use catchmind::RoomCommand;
use catchmind::View;
use catchmind::protocol::{DEFAULT_COLOR, Ranking, StrokeSegment, image_tag_source};

/// Parsed line of player input.
#[derive(Clone, Debug, PartialEq)]
pub enum InputLine {
    Command(RoomCommand),
    /// `/img <url>`: share an image in chat.
    ShareImage(String),
    Help,
    Empty,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("unknown command `/{0}`; try /help")]
    UnknownCommand(String),
    #[error("`/{command}` needs {what}")]
    MissingArgument {
        command: &'static str,
        what: &'static str,
    },
    #[error("not a coordinate: {0}")]
    InvalidNumber(String),
}

pub const HELP: &str = "\
/start                 start the game
/choose <word>         pick one of the offered words
/word <word>           type your own word instead
/down <x> <y>          start a stroke
/move <x> <y> [color]  extend the stroke
/up                    end the stroke
/clear                 clear the canvas (drawer only)
/img <url>             share an image
/exit                  leave the room
anything else          chat";

/// Parse one input line. Text without a leading `/` is chat.
///
/// # Errors
///
/// Returns an [`InputError`] for an unknown command or bad arguments.
pub fn parse_input(line: &str) -> Result<InputLine, InputError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(InputLine::Empty);
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(InputLine::Command(RoomCommand::Chat(line.to_owned())));
    };
    let (name, args) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    let args = args.trim();

    let command = match name {
        "start" => RoomCommand::Start,
        "choose" => RoomCommand::Choose(required(args, "choose", "a word")?.to_owned()),
        "word" => RoomCommand::ManualWord(required(args, "word", "a word")?.to_owned()),
        "clear" => RoomCommand::ClearCanvas,
        "up" => RoomCommand::PointerUp,
        "exit" | "quit" => RoomCommand::Exit,
        "down" => {
            let mut parts = args.split_whitespace();
            let x = coordinate(parts.next(), "down")?;
            let y = coordinate(parts.next(), "down")?;
            RoomCommand::PointerDown { x, y }
        }
        "move" => {
            let mut parts = args.split_whitespace();
            let x = coordinate(parts.next(), "move")?;
            let y = coordinate(parts.next(), "move")?;
            let color = parts.next().unwrap_or(DEFAULT_COLOR).to_owned();
            RoomCommand::PointerMove { x, y, color }
        }
        "img" => return Ok(InputLine::ShareImage(required(args, "img", "a URL")?.to_owned())),
        "help" => return Ok(InputLine::Help),
        other => return Err(InputError::UnknownCommand(other.to_owned())),
    };
    Ok(InputLine::Command(command))
}

fn required<'a>(args: &'a str, command: &'static str, what: &'static str) -> Result<&'a str, InputError> {
    if args.is_empty() {
        return Err(InputError::MissingArgument { command, what });
    }
    Ok(args)
}

fn coordinate(raw: Option<&str>, command: &'static str) -> Result<f64, InputError> {
    let raw = raw.ok_or(InputError::MissingArgument {
        command,
        what: "x and y",
    })?;
    raw.parse::<f64>()
        .map_err(|_| InputError::InvalidNumber(raw.to_owned()))
}

/// [`View`] that renders every effect as one text line.
pub struct TerminalView<W: Write> {
    out: W,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, args: fmt::Arguments<'_>) {
        if let Err(e) = writeln!(self.out, "{args}") {
            tracing::debug!(error = %e, "terminal write failed");
        }
    }
}

impl<W: Write> View for TerminalView<W> {
    fn draw_segment(&mut self, s: &StrokeSegment) {
        self.line(format_args!(
            "~ stroke ({}, {}) -> ({}, {}) {}",
            s.from_x, s.from_y, s.to_x, s.to_y, s.color
        ));
    }

    fn clear_surface(&mut self) {
        self.line(format_args!("~ canvas cleared"));
    }

    fn append_message(&mut self, sender: &str, content: &str) {
        match image_tag_source(content) {
            Some(url) => self.line(format_args!("{sender} shared an image: {url}")),
            None => self.line(format_args!("{sender}: {content}")),
        }
    }

    fn system_message(&mut self, content: &str) {
        self.line(format_args!("* {content}"));
    }

    fn show_rankings(&mut self, rankings: &[Ranking]) {
        self.line(format_args!("=== GAME OVER ==="));
        for (place, ranking) in rankings.iter().enumerate() {
            self.line(format_args!(
                "{:>2}. {} ({} pts)",
                place + 1,
                ranking.nickname,
                ranking.point
            ));
        }
    }

    fn show_notice(&mut self, message: &str) {
        self.line(format_args!("!! {message}"));
    }

    fn set_round(&mut self, round: u32) {
        self.line(format_args!("--- round {round} ---"));
    }

    fn enter_drawing_role(&mut self, answer: &str) {
        self.line(format_args!("You are drawing. The word is: {answer}"));
    }

    fn enter_guessing_role(&mut self, drawer: &str) {
        self.line(format_args!("{drawer} is drawing. Type your guess."));
    }

    fn reset_turn(&mut self) {}

    fn show_word_candidates(&mut self, candidates: &[String]) {
        self.line(format_args!(
            "Pick a word with /choose: {}",
            candidates.join(", ")
        ));
    }

    fn hide_word_selection(&mut self) {}
}

#[cfg(test)]
#[path = "terminal_test.rs"]
mod tests;
