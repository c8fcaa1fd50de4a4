mod console;
mod loggers;
mod players;
mod setup;
#[cfg(test)]
mod test_util;

use clap::{CommandFactory, Parser};
use connect4::{Game, Players, Turn};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::console::Console;
use crate::setup::{PlayerFactory, PlayerKind, SetupError, UiKind};

const KINDS: &str = "\
Players:
    Random - picks a random possible move each time. The argument is the seed.
    Human  - has a human as the player. The argument is the human's name.
    AI     - has a minimax algorithm as the player. The argument is the depth.
    File   - reads moves from the lines of the file given by the argument.

Loggers (optional):
    StateLogger first|second FILE.txt
                  logs the states of the AI player on that side
    MegaLogger [board=F.txt] [move1=F.txt] [move2=F.txt] [state1=F.txt] [state2=F.txt]
                  logs the requested events to the given .txt files";

/// Play Connect Four between humans, AIs, random and scripted players.
#[derive(Debug, Parser)]
#[command(name = "connect-four", after_help = KINDS)]
struct Cli {
    /// User interface; the only one provided is Console
    ui: String,

    /// Kind of the first (yellow) player
    first_kind: String,

    /// Argument of the first player
    first_arg: String,

    /// Kind of the second (red) player
    second_kind: String,

    /// Argument of the second player
    second_arg: String,

    /// Logger kind followed by its arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    logger: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            debug!(error = %err, "bad command line");
            Cli::command().print_help()?;
            return Ok(());
        }
    };
    match run(cli) {
        Err(err) if err.is::<SetupError>() => {
            println!("{err}");
            Ok(())
        }
        other => other,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let ui = match cli.ui.parse::<UiKind>()? {
        UiKind::Console => Console::stdio(),
    };
    let first_kind: PlayerKind = cli.first_kind.parse()?;
    let second_kind: PlayerKind = cli.second_kind.parse()?;
    let first = ui.create_player(Turn::First, first_kind, &cli.first_arg)?;
    let second = ui.create_player(Turn::Second, second_kind, &cli.second_arg)?;

    let mut game = Game::new(ui, Players::new(first, second));
    if let Some((kind, args)) = cli.logger.split_first() {
        let logger = setup::create_logger(kind.parse()?, args)?;
        game = game.with_logger(logger);
    }

    let outcome = game.play()?;
    info!(winner = outcome.winner_name.as_deref().unwrap_or("nobody"), "finished");
    debug!(outcome = %serde_json::to_string(&outcome)?, "outcome");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_players_and_trailing_logger_words() {
        let cli = Cli::try_parse_from([
            "connect-four",
            "Console",
            "Human",
            "ada",
            "AI",
            "4",
            "MegaLogger",
            "board=b.txt",
            "state2=s.txt",
        ])
        .unwrap();
        assert_eq!(cli.first_arg, "ada");
        assert_eq!(cli.second_kind, "AI");
        assert_eq!(cli.logger, ["MegaLogger", "board=b.txt", "state2=s.txt"]);
    }

    #[test]
    fn logger_is_optional_but_players_are_not() {
        let cli = Cli::try_parse_from(["connect-four", "Console", "Random", "1", "Random", "2"])
            .unwrap();
        assert!(cli.logger.is_empty());
        assert!(Cli::try_parse_from(["connect-four", "Console", "Random", "1", "Random"]).is_err());
    }

    #[test]
    fn setup_errors_are_reported_not_raised() {
        let cli = Cli::try_parse_from(["connect-four", "GUI", "Random", "1", "Random", "2"])
            .unwrap();
        let err = run(cli).unwrap_err();
        assert!(err.is::<SetupError>());

        let trees = std::env::temp_dir().join("connect-four-cli-trees.txt");
        let trees = trees.to_str().unwrap();
        let cli = Cli::try_parse_from([
            "connect-four",
            "Console",
            "Random",
            "1",
            "Random",
            "2",
            "StateLogger",
            "second",
            trees,
        ])
        .unwrap();
        let err = run(cli).unwrap_err();
        assert!(err.is::<SetupError>());
        assert!(err.to_string().contains("Random-2 is not one"));
    }
}
