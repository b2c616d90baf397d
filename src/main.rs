mod app;
mod help;
mod jumpto;
mod logging;
use crate::app::App;
use anyhow::Context;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::io;
use std::path::PathBuf;
use swipecal::{CalendarConfig, CalendarDate, CalendarPicker, TimeUnit};
use time::{format_description::BorrowedFormatItem, macros::format_description, Date};

static YMD_FMT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run {
        date: Option<Date>,
        verbosity: u8,
        log_file: Option<PathBuf>,
    },
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut date = None;
        let mut verbosity = 0u8;
        let mut log_file = None;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('v') | Arg::Long("verbose") => verbosity = verbosity.saturating_add(1),
                Arg::Long("log-file") => log_file = Some(PathBuf::from(parser.value()?)),
                Arg::Value(value) if date.is_none() => {
                    let value = value.string()?;
                    match Date::parse(&value, &YMD_FMT) {
                        Ok(d) => date = Some(d),
                        Err(e) => {
                            return Err(lexopt::Error::ParsingFailed {
                                value,
                                error: Box::new(e),
                            })
                        }
                    }
                }
                _ => return Err(arg.unexpected()),
            }
        }
        if verbosity > 0 && log_file.is_none() {
            return Err("--verbose requires --log-file".into());
        }
        Ok(Command::Run {
            date,
            verbosity,
            log_file,
        })
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run {
                date,
                verbosity,
                log_file,
            } => {
                if let Some(path) = log_file {
                    logging::init(verbosity, &path)?;
                }
                let today = CalendarDate::now().start_of(TimeUnit::Days);
                let mut picker = CalendarPicker::new(today, CalendarConfig::default())
                    .context("failed to lay out the current month")?;
                if let Some(date) = date {
                    picker
                        .select_date(&CalendarDate::from_date(date, today.offset()))
                        .with_context(|| format!("cannot show the month of {date}"))?;
                }
                with_terminal(|terminal| {
                    App::new(picker).run(terminal)?;
                    Ok(())
                })
            }
            Command::Help => {
                println!("Usage: swipecal [-v...] [--log-file FILE] [YYYY-MM-DD]");
                println!();
                println!("Swipeable terminal month calendar with day selection");
                println!();
                println!("Options:");
                println!("  -v, --verbose     Log more detail (repeatable; requires --log-file)");
                println!("      --log-file FILE");
                println!("                    Write log messages to FILE");
                println!("  -h, --help        Display this help message and exit");
                println!("  -V, --version     Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = execute!(io::stdout(), EnableMouseCapture)
        .context("failed to enable mouse capture")
        .and_then(|()| func(terminal));
    // Best effort; the terminal is being torn down either way
    let _ = execute!(io::stdout(), DisableMouseCapture);
    ratatui::restore();
    r
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn parse(args: &[&str]) -> Result<Command, lexopt::Error> {
        Command::from_parser(Parser::from_iter(
            std::iter::once("swipecal").chain(args.iter().copied()),
        ))
    }

    #[test]
    fn test_no_args() {
        assert_eq!(
            parse(&[]).unwrap(),
            Command::Run {
                date: None,
                verbosity: 0,
                log_file: None
            }
        );
    }

    #[test]
    fn test_all_options() {
        assert_eq!(
            parse(&["-vv", "--log-file", "cal.log", "2015-10-12"]).unwrap(),
            Command::Run {
                date: Some(date!(2015 - 10 - 12)),
                verbosity: 2,
                log_file: Some(PathBuf::from("cal.log")),
            }
        );
    }

    #[test]
    fn test_help_wins() {
        assert_eq!(parse(&["2015-10-12", "--help"]).unwrap(), Command::Help);
        assert_eq!(parse(&["-V"]).unwrap(), Command::Version);
    }

    #[test]
    fn test_bad_args() {
        assert!(parse(&["2015-13-01"]).is_err());
        assert!(parse(&["2015-10-12", "2015-10-13"]).is_err());
        assert!(parse(&["--log-file"]).is_err());
        assert!(parse(&["--frobnicate"]).is_err());
    }

    #[test]
    fn test_verbose_needs_log_file() {
        assert!(parse(&["-v"]).is_err());
        assert!(parse(&["2015-10-12", "--verbose"]).is_err());
        assert_eq!(
            parse(&["--log-file", "cal.log", "-v"]).unwrap(),
            Command::Run {
                date: None,
                verbosity: 1,
                log_file: Some(PathBuf::from("cal.log")),
            }
        );
    }
}
