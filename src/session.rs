//! Interactive session over a line-based reader
//!
//! Keeps one `Controller` alive across commands so the seen set and the
//! calendar position persist for the whole session.

use std::io::Write;
use std::str::FromStr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::{
    controller::{Controller, NavigationOutcome},
    error::AppResult,
    models::{DiscoveryFilter, GenreSelection, MediaKind, Navigation},
    render,
};

const HELP: &str = "\
Commands:
  discover <genre> [movie|tv] [year=N] [rating=N] [votes=N]
                                random rated title not shown yet
  next | prev | month           move the release calendar
  search <text>                 show the best match
  suggest <text>                up to five matches
  show <movie|tv> <id>          show a specific title
  seen                          titles shown so far
  help                          this text
  quit                          leave the session
";

#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Discover(DiscoveryFilter),
    Navigate(Navigation),
    Search(String),
    Suggest(String),
    Show { kind: MediaKind, id: u64 },
    Seen,
    Help,
    Quit,
}

impl FromStr for SessionCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_lowercase().as_str() {
            "discover" | "d" => parse_discover(rest).map(SessionCommand::Discover),
            "next" | "n" => Ok(SessionCommand::Navigate(Navigation::Next)),
            "prev" | "p" => Ok(SessionCommand::Navigate(Navigation::Previous)),
            "month" | "m" => Ok(SessionCommand::Navigate(Navigation::Current)),
            "search" | "s" => Ok(SessionCommand::Search(rest.to_string())),
            "suggest" => Ok(SessionCommand::Suggest(rest.to_string())),
            "show" => {
                let mut parts = rest.split_whitespace();
                let usage = || "usage: show <movie|tv> <id>".to_string();
                let kind: MediaKind = parts.next().ok_or_else(usage)?.parse()?;
                let id: u64 = parts
                    .next()
                    .ok_or_else(usage)?
                    .parse()
                    .map_err(|_| usage())?;
                Ok(SessionCommand::Show { kind, id })
            }
            "seen" => Ok(SessionCommand::Seen),
            "help" | "?" => Ok(SessionCommand::Help),
            "quit" | "exit" | "q" => Ok(SessionCommand::Quit),
            other => Err(format!("unknown command '{}', try 'help'", other)),
        }
    }
}

const DISCOVER_USAGE: &str = "usage: discover <genre> [movie|tv] [year=N] [rating=N] [votes=N]";

/// `<genre> [movie|tv] [year=N] [rating=N] [votes=N]`, options in any order
fn parse_discover(args: &str) -> Result<DiscoveryFilter, String> {
    let mut parts = args.split_whitespace();
    let genre: GenreSelection = parts.next().ok_or(DISCOVER_USAGE)?.parse()?;
    let mut filter = DiscoveryFilter::new(genre, MediaKind::Movie);

    for part in parts {
        let Some((key, value)) = part.split_once('=') else {
            filter.kind = part.parse()?;
            continue;
        };
        let invalid = || format!("invalid value for {}: '{}'", key, value);
        match key.to_lowercase().as_str() {
            "year" => filter.year = Some(value.parse().map_err(|_| invalid())?),
            "rating" => {
                let rating: f64 = value.parse().map_err(|_| invalid())?;
                if !(0.0..=10.0).contains(&rating) {
                    return Err(invalid());
                }
                filter.min_rating = Some(rating);
            }
            "votes" | "popularity" => {
                filter.min_popularity = Some(value.parse().map_err(|_| invalid())?)
            }
            _ => return Err(format!("unknown option '{}', {}", key, DISCOVER_USAGE)),
        }
    }

    Ok(filter)
}

/// Reads commands line by line until `quit` or end of input
///
/// A failed command prints its message and the session carries on.
pub async fn run_session<R, W>(
    controller: &Controller,
    reader: R,
    writer: &mut W,
    json: bool,
) -> AppResult<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = reader.lines();
    writeln!(writer, "Type 'help' for commands.")?;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<SessionCommand>() {
            Ok(command) => command,
            Err(message) => {
                writeln!(writer, "{}", message)?;
                continue;
            }
        };
        tracing::debug!(command = ?command, "Session command");

        if command == SessionCommand::Quit {
            break;
        }
        if let Err(e) = execute(controller, command, writer, json).await {
            tracing::warn!(error = %e, kind = e.kind(), "Session command failed");
            if json {
                writeln!(writer, "{}", render::error_json(&e))?;
            } else {
                writeln!(writer, "{}", render::error(&e))?;
            }
        }
    }

    Ok(())
}

async fn execute<W: Write>(
    controller: &Controller,
    command: SessionCommand,
    writer: &mut W,
    json: bool,
) -> AppResult<()> {
    match command {
        SessionCommand::Discover(filter) => {
            let found = controller.discover(&filter).await?;
            render::emit(writer, json, &found.presentation, || {
                render::presentation(&found.presentation)
            })
        }
        SessionCommand::Navigate(navigation) => match controller.navigate(navigation).await? {
            NavigationOutcome::Loaded(listing) => render::emit(writer, json, &listing, || {
                render::month(&listing, controller.images())
            }),
            NavigationOutcome::Dropped => Ok(()),
        },
        SessionCommand::Search(query) => {
            let presentation = controller.search(&query).await?;
            render::emit(writer, json, &presentation, || {
                render::presentation(&presentation)
            })
        }
        SessionCommand::Suggest(query) => {
            let hits = controller.suggestions(&query).await;
            render::emit(writer, json, &hits, || render::suggestions(&hits))
        }
        SessionCommand::Show { kind, id } => {
            let presentation = controller.show(kind, id).await?;
            render::emit(writer, json, &presentation, || {
                render::presentation(&presentation)
            })
        }
        SessionCommand::Seen => {
            writeln!(writer, "{} titles shown this session", controller.seen_count())?;
            Ok(())
        }
        SessionCommand::Help => {
            write!(writer, "{}", HELP)?;
            Ok(())
        }
        SessionCommand::Quit => Ok(()),
    }
}
