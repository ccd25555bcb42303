//! Console command parsing

use std::str::FromStr;

use fitboard_core::Axis;
use thiserror::Error;

/// A parsed console command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Datasets,
    Select(String),
    Vars,
    Log(String),
    Explore(Axis, String),
    Model(String),
    Bind { slot: String, var: String },
    State,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {0} (try `help`)")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),
}

pub const HELP: &str = "\
commands:
  datasets              list the dataset menu
  select <dataset>      select and load a dataset
  vars                  list variable panels
  log <var>             add log_<var>
  x <var> | y <var>     bind an exploratory axis
  model <kind>          choose linear, quadratic or loess
  bind <slot> <var>     bind a model input (predictor, response, quadratic)
  state                 summarize the current state
  help                  show this text
  quit                  exit";

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err(CommandError::Empty);
        };
        let args: Vec<&str> = words.collect();

        // Dataset names may contain spaces
        let rest = || args.join(" ");

        match (head.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("help" | "?", _) => Ok(Command::Help),
            ("datasets", _) => Ok(Command::Datasets),
            ("select", []) => Err(CommandError::Usage("select <dataset>")),
            ("select", _) => Ok(Command::Select(rest())),
            ("vars", _) => Ok(Command::Vars),
            ("log", [var]) => Ok(Command::Log(var.to_string())),
            ("log", _) => Err(CommandError::Usage("log <var>")),
            ("x", [var]) => Ok(Command::Explore(Axis::X, var.to_string())),
            ("y", [var]) => Ok(Command::Explore(Axis::Y, var.to_string())),
            ("x" | "y", _) => Err(CommandError::Usage("x <var> | y <var>")),
            ("model", [kind]) => Ok(Command::Model(kind.to_ascii_lowercase())),
            ("model", _) => Err(CommandError::Usage("model <kind>")),
            ("bind", [slot, var]) => Ok(Command::Bind {
                slot: slot.to_string(),
                var: var.to_string(),
            }),
            ("bind", _) => Err(CommandError::Usage("bind <slot> <var>")),
            ("state", _) => Ok(Command::State),
            ("quit" | "exit" | "q", _) => Ok(Command::Quit),
            (other, _) => Err(CommandError::Unknown(other.to_string())),
        }
    }
}
