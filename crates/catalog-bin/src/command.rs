//! REPL command parsing.
//!
//! Record fields are separated by `|`:
//!
//! ```text
//! add 🐢 | Turtle | A cute turtle. | Something slow
//! edit 🐢 | 🐢 | Tortoise | A slow reptile. | patience
//! delete 🐢
//! delete-at 2 1
//! replace 🐢 | Tortoise | A slow reptile. | patience
//! show 🐢
//! ```

use catalog_engine::{EditOrigin, ItemPosition, Record, RecordId};

/// Help text printed by `help`.
pub const HELP: &str = "\
commands:
  list                                   show the catalog
  show ID                                show one record in full
  add SYMBOL | NAME | DESCRIPTION | USAGE
  edit ID | SYMBOL | NAME | DESCRIPTION | USAGE
  replace SYMBOL | NAME | DESCRIPTION | USAGE
  delete ID                              delete by symbol
  delete-at SECTION ITEM                 delete by on-screen position (1-based)
  layout                                 toggle grid / column
  changes                                show the last change set
  export                                 print the catalog as JSON
  help
  quit";

/// A parsed REPL command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    List,
    Show(RecordId),
    Add(Record),
    Replace(Record),
    Edit { origin: EditOrigin, record: Record },
    Delete(RecordId),
    DeleteAt(ItemPosition),
    Layout,
    Changes,
    Export,
    Help,
    Quit,
}

/// Errors from parsing a command line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),

    #[error("`{command}` needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("`{command}` takes {expected} `|`-separated fields, got {found}")]
    WrongFieldCount {
        command: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("the {0} field must not be empty")]
    EmptyField(&'static str),

    #[error("`{0}` is not a position (sections and items count from 1)")]
    InvalidPosition(String),
}

impl std::str::FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word {
            "" => Err(CommandError::Empty),
            "list" | "ls" => Ok(Command::List),
            "add" => {
                let fields = split_fields("add", rest, 4)?;
                Ok(Command::Add(record_from(&fields)?))
            }
            "show" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument {
                        command: "show",
                        argument: "a record id",
                    });
                }
                Ok(Command::Show(RecordId::from(rest)))
            }
            "replace" => {
                let fields = split_fields("replace", rest, 4)?;
                Ok(Command::Replace(record_from(&fields)?))
            }
            "edit" => {
                let fields = split_fields("edit", rest, 5)?;
                let previous = non_empty("id", fields[0])?;
                Ok(Command::Edit {
                    origin: EditOrigin::Existing(RecordId::from(previous)),
                    record: record_from(&fields[1..])?,
                })
            }
            "delete" | "rm" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument {
                        command: "delete",
                        argument: "a record id",
                    });
                }
                Ok(Command::Delete(RecordId::from(rest)))
            }
            "delete-at" => parse_position(rest).map(Command::DeleteAt),
            "layout" => Ok(Command::Layout),
            "changes" => Ok(Command::Changes),
            "export" => Ok(Command::Export),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn split_fields<'a>(
    command: &'static str,
    rest: &'a str,
    expected: usize,
) -> Result<Vec<&'a str>, CommandError> {
    if rest.is_empty() {
        return Err(CommandError::MissingArgument {
            command,
            argument: "record fields",
        });
    }
    let fields: Vec<&str> = rest.split('|').map(str::trim).collect();
    if fields.len() != expected {
        return Err(CommandError::WrongFieldCount {
            command,
            expected,
            found: fields.len(),
        });
    }
    Ok(fields)
}

fn non_empty<'a>(field: &'static str, value: &'a str) -> Result<&'a str, CommandError> {
    if value.is_empty() {
        Err(CommandError::EmptyField(field))
    } else {
        Ok(value)
    }
}

/// Builds a record from symbol, name, description and usage. Only the
/// symbol is required; an empty name lands in the fallback section.
fn record_from(fields: &[&str]) -> Result<Record, CommandError> {
    let symbol = non_empty("symbol", fields[0])?;
    Ok(Record::new(symbol, fields[1], fields[2], fields[3]))
}

fn parse_position(rest: &str) -> Result<ItemPosition, CommandError> {
    let parts: Vec<&str> = rest.split_whitespace().collect();
    let [section, item] = parts.as_slice() else {
        return Err(CommandError::MissingArgument {
            command: "delete-at",
            argument: "a section and an item",
        });
    };

    let one_based = |s: &str| {
        s.parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .ok_or_else(|| CommandError::InvalidPosition(s.to_string()))
    };
    Ok(ItemPosition::new(one_based(*section)?, one_based(*item)?))
}
