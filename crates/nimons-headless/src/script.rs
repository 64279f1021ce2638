//! Chef scripts: one command per line, `#` starts a comment.
//!
//! ```text
//! chef 0        # who the following commands drive
//! north         # face north and step if the tile is free
//! east 5        # repeat count
//! interact
//! wait 3000     # idle for this much game time
//! ```

use nimons_core::id::ChefId;
use nimons_core::map::Direction;
use std::path::Path;

/// Largest repeat count one move line may ask for.
pub const MAX_REPEAT: u64 = 1_000;

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("line {line}: {detail}")]
    Syntax { line: usize, detail: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Chef(ChefId),
    Move(Direction),
    Interact,
    Wait(u64),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    commands: Vec<Command>,
}

impl Script {
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ScriptError> {
        let mut commands = Vec::new();

        for (n, raw) in text.lines().enumerate() {
            let line = raw.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }
            let syntax = |detail: String| ScriptError::Syntax {
                line: n + 1,
                detail,
            };
            let mut words = line.split_whitespace();
            let verb = words.next().unwrap_or_default().to_ascii_lowercase();
            let arg = words.next();
            if let Some(extra) = words.next() {
                return Err(syntax(format!("unexpected '{extra}'")));
            }
            let number = |what: &str| -> Result<u64, ScriptError> {
                let text = arg.ok_or_else(|| syntax(format!("'{verb}' needs {what}")))?;
                text.parse()
                    .map_err(|_| syntax(format!("'{text}' is not a valid {what}")))
            };

            match verb.as_str() {
                "north" | "n" | "south" | "s" | "east" | "e" | "west" | "w" => {
                    let dir = match &verb[..1] {
                        "n" => Direction::North,
                        "s" => Direction::South,
                        "e" => Direction::East,
                        _ => Direction::West,
                    };
                    let times = match arg {
                        Some(_) => number("repeat count")?,
                        None => 1,
                    };
                    if times > MAX_REPEAT {
                        return Err(syntax(format!(
                            "repeat count {times} is above {MAX_REPEAT}"
                        )));
                    }
                    commands.extend((0..times).map(|_| Command::Move(dir)));
                }
                "interact" | "i" => {
                    if arg.is_some() {
                        return Err(syntax("'interact' takes no argument".to_string()));
                    }
                    commands.push(Command::Interact);
                }
                "wait" => commands.push(Command::Wait(number("duration")?)),
                "chef" => {
                    let id = u32::try_from(number("chef number")?)
                        .map_err(|_| syntax("chef number out of range".to_string()))?;
                    commands.push(Command::Chef(ChefId(id)));
                }
                other => return Err(syntax(format!("unknown command '{other}'"))),
            }
        }

        Ok(Self { commands })
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
