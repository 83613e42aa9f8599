//! Parsing of driver input lines.

use garden_core::Position;
use std::str::FromStr;
use thiserror::Error;

pub const HELP: &str = "\
Commands:
  tool <name>    select shovel, bucket or a species to plant
  click <x> <y>  use the selected tool on a cell
  info <x> <y>   show cell details
  remove <x> <y> pull up the plant in a cell
  dump <x> <y>   print cell details as JSON
  tick           run one growth tick now
  show           redraw the garden
  help           show this message
  quit           exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Tool(String),
    Click(Position),
    Info(Position),
    Remove(Position),
    Dump(Position),
    Tick,
    Show,
    Help,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command '{0}', type 'help' for a list")]
    Unknown(String),

    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("Invalid coordinate '{0}'")]
    InvalidCoordinate(String),

    #[error("Unexpected argument '{0}'")]
    UnexpectedArgument(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or(CommandError::Empty)?.to_ascii_lowercase();

        let command = match name.as_str() {
            "tool" => {
                let tool = words.next().ok_or(CommandError::MissingArgument("tool name"))?;
                Command::Tool(tool.to_ascii_lowercase())
            }
            "click" => Command::Click(position(&mut words)?),
            "info" => Command::Info(position(&mut words)?),
            "remove" => Command::Remove(position(&mut words)?),
            "dump" => Command::Dump(position(&mut words)?),
            "tick" => Command::Tick,
            "show" => Command::Show,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => return Err(CommandError::Unknown(name)),
        };

        if let Some(extra) = words.next() {
            return Err(CommandError::UnexpectedArgument(extra.to_string()));
        }

        Ok(command)
    }
}

fn position<'a>(words: &mut impl Iterator<Item = &'a str>) -> Result<Position, CommandError> {
    let x = coordinate(words.next().ok_or(CommandError::MissingArgument("x"))?)?;
    let y = coordinate(words.next().ok_or(CommandError::MissingArgument("y"))?)?;
    Ok(Position::new(x, y))
}

fn coordinate(word: &str) -> Result<i32, CommandError> {
    word.parse()
        .map_err(|_| CommandError::InvalidCoordinate(word.to_string()))
}
