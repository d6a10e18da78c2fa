//! Line-oriented host commands read from stdin.
//!
//! The engine has no window, so focus changes and player actions arrive as
//! text lines such as `focus`, `blur`, or `hire dev`.

use std::str::FromStr;

use founder_types::{EmployeeId, OfficeId};

/// One parsed stdin line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    /// The window gained focus.
    Focus,
    /// The window lost focus.
    Blur,
    /// The player paused.
    Pause,
    /// The player resumed.
    Resume,
    /// Set the clock's run flag.
    Run(bool),
    /// Hire an archetype, into the given office or the first one.
    Hire {
        /// Archetype id.
        archetype: String,
        /// Target office.
        office: Option<OfficeId>,
    },
    /// Unlock an office definition.
    Unlock {
        /// Office definition id.
        office: String,
    },
    /// Queue a task definition.
    Queue {
        /// Task definition id.
        task: String,
        /// Target office.
        office: Option<OfficeId>,
    },
    /// Buy the next level of an upgrade.
    Upgrade {
        /// Upgrade id.
        upgrade: String,
        /// Target office for office upgrades.
        office: Option<OfficeId>,
    },
    /// Move an employee.
    Assign {
        /// The employee.
        employee: EmployeeId,
        /// The destination.
        office: OfficeId,
    },
    /// Log a status line.
    Status,
    /// Write the save file now.
    Save,
    /// Save and exit.
    Quit,
}

/// Why a line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The line was blank.
    #[error("empty command")]
    Empty,
    /// The first word is not a command.
    #[error("unknown command: {0}")]
    Unknown(String),
    /// A required argument is missing.
    #[error("{command} needs {argument}")]
    Missing {
        /// The command.
        command: &'static str,
        /// The missing argument.
        argument: &'static str,
    },
    /// An id argument is not a UUID.
    #[error("invalid id: {0}")]
    InvalidId(String),
}

impl HostCommand {
    /// Parse one line.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err(ParseError::Empty);
        };
        let command = match head.to_ascii_lowercase().as_str() {
            "focus" => Self::Focus,
            "blur" => Self::Blur,
            "pause" => Self::Pause,
            "resume" => Self::Resume,
            "run" => Self::Run(true),
            "stop" => Self::Run(false),
            "status" => Self::Status,
            "save" => Self::Save,
            "quit" | "exit" => Self::Quit,
            "hire" => Self::Hire {
                archetype: required(words.next(), "hire", "an archetype")?,
                office: words.next().map(parse_id::<OfficeId>).transpose()?,
            },
            "unlock" => Self::Unlock {
                office: required(words.next(), "unlock", "an office")?,
            },
            "queue" => Self::Queue {
                task: required(words.next(), "queue", "a task")?,
                office: words.next().map(parse_id::<OfficeId>).transpose()?,
            },
            "upgrade" => Self::Upgrade {
                upgrade: required(words.next(), "upgrade", "an upgrade")?,
                office: words.next().map(parse_id::<OfficeId>).transpose()?,
            },
            "assign" => Self::Assign {
                employee: parse_id(&required(words.next(), "assign", "an employee")?)?,
                office: parse_id(&required(words.next(), "assign", "an office")?)?,
            },
            other => return Err(ParseError::Unknown(other.to_owned())),
        };
        Ok(command)
    }
}

fn required(word: Option<&str>, command: &'static str, argument: &'static str) -> Result<String, ParseError> {
    word.map(str::to_owned)
        .ok_or(ParseError::Missing { command, argument })
}

fn parse_id<T>(word: &str) -> Result<T, ParseError>
where
    T: FromStr,
    T::Err: core::fmt::Display,
{
    word.parse()
        .map_err(|err| ParseError::InvalidId(format!("{word}: {err}")))
}
