//! Line commands read from stdin
//!
//! ```text
//! scroll <px>               move the scrollbar to a pixel position
//! goto <row>                show the page starting at a row
//! total <n>                 the dataset now has n rows
//! params [k=v ...]          replace the extra fetch parameters
//! reload                    drop the buffer and refetch
//! plug | unplug             enable or ignore scroll events
//! send <name> [k=v ...]     send a named request, dispatch its envelope
//! fetch <name> <target> [k=v ...]
//!                           send a named request into a content target
//! quit
//! ```

use std::fmt;
use std::io::BufRead;
use std::sync::mpsc::Sender;

use crate::ajax::QueryParam;
use crate::messages::{AjaxMsg, AppMsg, GridMsg, Msg};
use crate::model::GridId;

#[derive(Debug, Clone, PartialEq)]
pub enum InputCommand {
    Scroll(f64),
    Goto(usize),
    Total(usize),
    Params(Vec<QueryParam>),
    Reload,
    Plug(bool),
    Send {
        name: String,
        params: Vec<QueryParam>,
    },
    Fetch {
        name: String,
        target: String,
        params: Vec<QueryParam>,
    },
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    UnknownCommand(String),
    MissingArgument(&'static str),
    InvalidNumber(String),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::UnknownCommand(c) => write!(f, "unknown command '{}'", c),
            InputError::MissingArgument(what) => write!(f, "missing {}", what),
            InputError::InvalidNumber(s) => write!(f, "not a number: '{}'", s),
        }
    }
}

impl std::error::Error for InputError {}

fn number<T: std::str::FromStr>(arg: Option<&str>, what: &'static str) -> Result<T, InputError> {
    let arg = arg.ok_or(InputError::MissingArgument(what))?;
    arg.parse()
        .map_err(|_| InputError::InvalidNumber(arg.to_string()))
}

fn word(arg: Option<&str>, what: &'static str) -> Result<String, InputError> {
    arg.map(str::to_string)
        .ok_or(InputError::MissingArgument(what))
}

/// Parse one line. Blank lines and `#` comments yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<InputCommand>, InputError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };

    let command = match command {
        "scroll" => InputCommand::Scroll(number(words.next(), "pixel position")?),
        "goto" => InputCommand::Goto(number(words.next(), "row")?),
        "total" => InputCommand::Total(number(words.next(), "row count")?),
        "params" => InputCommand::Params(words.map(QueryParam::from).collect()),
        "reload" => InputCommand::Reload,
        "plug" => InputCommand::Plug(true),
        "unplug" => InputCommand::Plug(false),
        "send" => InputCommand::Send {
            name: word(words.next(), "request name")?,
            params: words.map(QueryParam::from).collect(),
        },
        "fetch" => InputCommand::Fetch {
            name: word(words.next(), "request name")?,
            target: word(words.next(), "target id")?,
            params: words.map(QueryParam::from).collect(),
        },
        "quit" | "exit" => InputCommand::Quit,
        other => return Err(InputError::UnknownCommand(other.to_string())),
    };
    Ok(Some(command))
}

impl InputCommand {
    /// Messages that carry out this command against `grid_id`
    pub fn into_msgs(self, grid_id: &GridId) -> Vec<Msg> {
        let grid_id = grid_id.clone();
        match self {
            InputCommand::Scroll(scroll_top) => vec![Msg::Grid(GridMsg::Scrolled {
                grid_id,
                scroll_top,
            })],
            InputCommand::Goto(offset) => {
                vec![Msg::Grid(GridMsg::RequestOffset { grid_id, offset })]
            }
            InputCommand::Total(total_rows) => vec![Msg::Grid(GridMsg::SetTotalRows {
                grid_id,
                total_rows,
            })],
            InputCommand::Params(params) => {
                vec![Msg::Grid(GridMsg::SetRequestParams { grid_id, params })]
            }
            InputCommand::Reload => vec![Msg::Grid(GridMsg::Reload { grid_id })],
            InputCommand::Plug(enabled) => {
                vec![Msg::Grid(GridMsg::SetScrollEnabled { grid_id, enabled })]
            }
            InputCommand::Send { name, params } => vec![Msg::Ajax(AjaxMsg::Send {
                name,
                params,
                body: None,
            })],
            InputCommand::Fetch {
                name,
                target,
                params,
            } => vec![
                Msg::Ajax(AjaxMsg::RegisterTarget { id: target.clone() }),
                Msg::Ajax(AjaxMsg::SendAndUpdate {
                    name,
                    container: target,
                    params,
                    body: None,
                }),
            ],
            InputCommand::Quit => vec![Msg::App(AppMsg::Quit)],
        }
    }
}

/// Read commands from `reader` on a background thread until EOF or `quit`.
/// EOF sends `Quit` too.
pub fn spawn_reader<R>(reader: R, tx: Sender<Msg>, grid_id: GridId) -> std::thread::JoinHandle<()>
where
    R: BufRead + Send + 'static,
{
    std::thread::spawn(move || {
        for line in reader.lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!("Failed to read input: {}", e);
                    break;
                }
            };
            match parse_command(&line) {
                Ok(Some(command)) => {
                    let quit = command == InputCommand::Quit;
                    for msg in command.into_msgs(&grid_id) {
                        if tx.send(msg).is_err() {
                            return;
                        }
                    }
                    if quit {
                        return;
                    }
                }
                Ok(None) => {}
                Err(e) => eprintln!("{}", e),
            }
        }
        let _ = tx.send(Msg::App(AppMsg::Quit));
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            parse_command("scroll 2400").unwrap(),
            Some(InputCommand::Scroll(2400.0))
        );
        assert_eq!(parse_command("  goto 55 ").unwrap(), Some(InputCommand::Goto(55)));
        assert_eq!(parse_command("total 10").unwrap(), Some(InputCommand::Total(10)));
        assert_eq!(parse_command("").unwrap(), None);
        assert_eq!(parse_command("# note").unwrap(), None);
        assert_eq!(parse_command("quit").unwrap(), Some(InputCommand::Quit));
    }

    #[test]
    fn test_parse_params() {
        assert_eq!(
            parse_command("params sort=name dir=asc").unwrap(),
            Some(InputCommand::Params(vec![
                QueryParam::raw("sort=name"),
                QueryParam::raw("dir=asc"),
            ]))
        );
        assert_eq!(
            parse_command("params").unwrap(),
            Some(InputCommand::Params(vec![]))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse_command("goto").unwrap_err(),
            InputError::MissingArgument("row")
        );
        assert_eq!(
            parse_command("goto x").unwrap_err(),
            InputError::InvalidNumber("x".into())
        );
        assert!(matches!(
            parse_command("jump 3"),
            Err(InputError::UnknownCommand(_))
        ));
        assert!(parse_command("fetch status").is_err());
    }

    #[test]
    fn test_fetch_registers_target_first() {
        let command = parse_command("fetch status panel").unwrap().unwrap();
        let msgs = command.into_msgs(&GridId::new("g"));
        assert!(matches!(
            msgs[0],
            Msg::Ajax(AjaxMsg::RegisterTarget { ref id }) if id == "panel"
        ));
        assert!(matches!(msgs[1], Msg::Ajax(AjaxMsg::SendAndUpdate { .. })));
    }

    #[test]
    fn test_reader_sends_quit_at_eof() {
        let (tx, rx) = std::sync::mpsc::channel();
        let input = std::io::Cursor::new("goto 5\nbogus\n");
        spawn_reader(input, tx, GridId::new("g")).join().unwrap();
        let msgs: Vec<Msg> = rx.try_iter().collect();
        assert_eq!(msgs.len(), 2);
        assert!(matches!(
            msgs[0],
            Msg::Grid(GridMsg::RequestOffset { offset: 5, .. })
        ));
        assert!(matches!(msgs[1], Msg::App(AppMsg::Quit)));
    }
}
