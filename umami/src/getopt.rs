//! Long-option matcher over an argument vector.
//!
//! Each call to [`next`] finds the leftmost unconsumed token that names an
//! unparsed option of one table. Consumed positions are recorded in the
//! [`Ledger`] so later tables never see them again.

use crate::error::{Error, Result};
use crate::group::OptionTable;
use crate::ledger::Ledger;
use crate::option::ArgKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Option `index` of the table matched; `argument` is its value for
    /// options that take one.
    Matched {
        index: usize,
        argument: Option<String>,
    },
    /// `--help` or `-help` was found.
    Help,
    /// No further match in this table.
    End,
}

fn is_help(token: &str) -> bool {
    token == "--help" || token == "-help"
}

fn strip_dashes(token: &str) -> Option<&str> {
    token
        .strip_prefix("--")
        .or_else(|| token.strip_prefix('-'))
}

/// A bare token right after an unconsumed `-option` is taken to be the value
/// of an option some other table owns.
fn follows_foreign_option<S: AsRef<str>>(argv: &[S], pos: usize, ledger: &Ledger) -> bool {
    pos > 1 && !ledger.is_marked(pos - 1) && argv[pos - 1].as_ref().starts_with('-')
}

/// Advance `cursor` to the next option of `table` and consume it.
pub fn next<S: AsRef<str>>(
    argv: &[S],
    cursor: &mut usize,
    ledger: &mut Ledger,
    table: &mut OptionTable,
) -> Result<Token> {
    let argc = argv.len();
    let mut pos = *cursor;

    while pos < argc {
        if ledger.is_marked(pos) {
            pos += 1;
            continue;
        }

        let token = argv[pos].as_ref();
        if is_help(token) {
            ledger.mark(pos);
            *cursor = pos + 1;
            return Ok(Token::Help);
        }

        let Some(name) = strip_dashes(token) else {
            if follows_foreign_option(argv, pos, ledger) {
                pos += 1;
                continue;
            }
            return Err(Error::StrayArgument(token.to_string()));
        };

        let found = (0..table.len()).find(|&i| {
            !table.is_parsed_at(i) && table.get(i).is_some_and(|opt| opt.name() == name)
        });
        if let Some(index) = found {
            let argument = match table.get(index).map(|opt| opt.arg_kind()) {
                Some(ArgKind::Required) => match argv.get(pos + 1).map(|s| s.as_ref()) {
                    Some(value) if !value.starts_with('-') => {
                        ledger.mark(pos + 1);
                        Some(value.to_string())
                    }
                    _ => return Err(Error::MissingArgument(name.to_string())),
                },
                _ => None,
            };
            table.mark_parsed_at(index);
            ledger.mark(pos);
            *cursor = pos + 1 + usize::from(argument.is_some());
            return Ok(Token::Matched { index, argument });
        }

        pos += 1;
    }

    *cursor = argc;
    Ok(Token::End)
}
