use anyhow::{anyhow, bail};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Spin,
    Reels(i64),
    Bet(i64),
    Jackpot(f64),
    Add,
    Reset,
    Rules,
    Balance,
    Name(String),
    SaveScore,
    Board,
    ClearBoard,
    Push(String),
    Pull(String),
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  spin | s            spin the reels
  reels <n>           set reel count (3-20, presets 3/5/10)
  bet <n>             set bet per spin
  jackpot <n>         set base jackpot (3-reel value)
  add                 add 100 points
  reset               reset balance to 0
  rules | r           show current jackpot and rules
  balance | b         show balance
  name <text>         set player name
  save                save balance to the local leaderboard
  board | lb          show the local leaderboard
  clear               clear the local leaderboard
  push <user>         save balance to a user's score history
  pull <user>         show a user's score history
  help | ?            this text
  quit | q            exit";

impl Command {
    /// `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> anyhow::Result<Option<Self>> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let command = match word.to_ascii_lowercase().as_str() {
            "" => return Ok(None),
            "spin" | "s" => Self::Spin,
            "reels" => Self::Reels(number(word, rest)?),
            "bet" => Self::Bet(number(word, rest)?),
            "jackpot" => Self::Jackpot(
                rest.parse::<f64>()
                    .map_err(|_| anyhow!("jackpot expects a number, got {rest:?}"))?,
            ),
            "add" => Self::Add,
            "reset" => Self::Reset,
            "rules" | "r" => Self::Rules,
            "balance" | "b" => Self::Balance,
            "name" => Self::Name(rest.to_string()),
            "save" => Self::SaveScore,
            "board" | "lb" => Self::Board,
            "clear" => Self::ClearBoard,
            "push" => Self::Push(required(word, rest)?),
            "pull" => Self::Pull(required(word, rest)?),
            "help" | "?" | "h" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => bail!("unknown command {other:?} (try `help`)"),
        };
        Ok(Some(command))
    }
}

fn number(word: &str, rest: &str) -> anyhow::Result<i64> {
    rest.parse::<i64>()
        .map_err(|_| anyhow!("{word} expects a whole number, got {rest:?}"))
}

fn required(word: &str, rest: &str) -> anyhow::Result<String> {
    if rest.is_empty() {
        bail!("{word} expects a user id");
    }
    Ok(rest.to_string())
}
