//! Command-line style argument parsing for plugin commands.
//!
//! A plugin declares its flags as a table of [`FlagSpec`]s. [`parse_flags`]
//! walks the whitespace-separated tokens once, left to right, and either
//! returns every `(field, value)` pair or the first [`CommandError`]. No
//! field is applied until the whole input has been accepted.

use thiserror::Error;

use crate::validate::{is_host, is_port_spec, is_unsigned};

/// Why a command was rejected. Shown to the user as `🚨 <message>`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Input command is too long")]
    InputTooLong,

    #[error("Too many parameters provided")]
    TooManyParameters,

    #[error("Parameter value too long for '{flag}'")]
    ValueTooLong { flag: String },

    #[error("Invalid host format or too many hosts provided")]
    InvalidHosts,

    #[error("Invalid {name} range")]
    InvalidRange { name: &'static str },

    #[error("Invalid {name} value")]
    InvalidValue { name: &'static str },

    #[error("The {name} value exceeds the maximum limit of {max}")]
    ExceedsMaximum { name: &'static str, max: u64 },

    #[error("Missing value for '{flag}' flag")]
    MissingValue { flag: String },

    #[error("Invalid or unrecognized flag: {flag}")]
    UnknownFlag { flag: String },

    #[error("No host provided")]
    NoHost,
}

impl CommandError {
    /// The text sent back to the chat.
    pub fn notice(&self) -> String {
        format!("🚨 {self}")
    }
}

/// Size ceilings applied before any flag is looked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandLimits {
    /// Maximum characters in the argument text.
    pub max_input_chars: usize,
    /// Maximum whitespace-separated tokens.
    pub max_tokens: usize,
    /// Maximum characters in any token that follows a flag.
    pub max_value_chars: usize,
}

impl Default for CommandLimits {
    fn default() -> Self {
        Self {
            max_input_chars: 2000,
            max_tokens: 15,
            max_value_chars: 100,
        }
    }
}

/// How a flag's value is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    /// Comma-separated hostnames or IPv4 addresses, at most `max`.
    HostList { max: usize },
    /// Port list / range syntax, see [`is_port_spec`].
    PortSpec { name: &'static str },
    /// One of a fixed set of literals.
    OneOf {
        name: &'static str,
        allowed: &'static [&'static str],
    },
    /// Non-negative integer, optionally capped.
    Integer { name: &'static str, max: Option<u64> },
}

impl Validator {
    /// Check `raw` and convert it to a [`FlagValue`].
    pub fn validate(&self, raw: &str) -> Result<FlagValue, CommandError> {
        match *self {
            Validator::HostList { max } => {
                let hosts: Vec<&str> = raw.split(',').collect();
                if hosts.len() > max || !hosts.iter().all(|h| is_host(h)) {
                    return Err(CommandError::InvalidHosts);
                }
                Ok(FlagValue::List(hosts.into_iter().map(str::to_owned).collect()))
            }
            Validator::PortSpec { name } => {
                if !is_port_spec(raw) {
                    return Err(CommandError::InvalidRange { name });
                }
                Ok(FlagValue::Text(raw.to_owned()))
            }
            Validator::OneOf { name, allowed } => {
                if !allowed.contains(&raw) {
                    return Err(CommandError::InvalidValue { name });
                }
                Ok(FlagValue::Text(raw.to_owned()))
            }
            Validator::Integer { name, max } => {
                if !is_unsigned(raw) {
                    return Err(CommandError::InvalidValue { name });
                }
                match (raw.parse::<u64>(), max) {
                    (Ok(n), Some(max)) if n > max => Err(CommandError::ExceedsMaximum { name, max }),
                    (Ok(n), _) => Ok(FlagValue::Integer(n)),
                    // All digits but wider than u64.
                    (Err(_), Some(max)) => Err(CommandError::ExceedsMaximum { name, max }),
                    (Err(_), None) => Err(CommandError::InvalidValue { name }),
                }
            }
        }
    }
}

/// Whether a flag stands alone or consumes the next token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Switch,
    Value(Validator),
}

/// One row of a plugin's flag table.
#[derive(Debug, Clone, Copy)]
pub struct FlagSpec<F> {
    /// The parameter this flag sets.
    pub field: F,
    /// Every spelling, e.g. `["-p", "-port"]`.
    pub aliases: &'static [&'static str],
    pub value: ValueKind,
}

/// A validated flag value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValue {
    Switch,
    List(Vec<String>),
    Text(String),
    Integer(u64),
}

impl FlagValue {
    pub fn into_list(self) -> Vec<String> {
        match self {
            FlagValue::List(items) => items,
            FlagValue::Text(s) => vec![s],
            FlagValue::Integer(n) => vec![n.to_string()],
            FlagValue::Switch => Vec::new(),
        }
    }

    pub fn into_text(self) -> String {
        match self {
            FlagValue::Text(s) => s,
            FlagValue::List(items) => items.join(","),
            FlagValue::Integer(n) => n.to_string(),
            FlagValue::Switch => String::new(),
        }
    }

    pub fn as_integer(&self) -> u64 {
        match self {
            FlagValue::Integer(n) => *n,
            _ => 0,
        }
    }
}

/// Tokenize `args` and validate every flag against `table`.
///
/// Order of checks:
/// 1. total length, then token count;
/// 2. per token: the following token's length, then flag lookup, then
///    the flag's validator.
///
/// The first failure is returned; later tokens are not inspected.
pub fn parse_flags<F: Copy>(
    args: &str,
    table: &[FlagSpec<F>],
    limits: CommandLimits,
) -> Result<Vec<(F, FlagValue)>, CommandError> {
    if args.chars().count() > limits.max_input_chars {
        return Err(CommandError::InputTooLong);
    }

    let tokens: Vec<&str> = args.split_whitespace().collect();
    if tokens.len() > limits.max_tokens {
        return Err(CommandError::TooManyParameters);
    }

    let mut parsed = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        let flag = tokens[i];

        if let Some(next) = tokens.get(i + 1)
            && next.chars().count() > limits.max_value_chars
        {
            return Err(CommandError::ValueTooLong { flag: flag.to_owned() });
        }

        let spec = table
            .iter()
            .find(|spec| spec.aliases.contains(&flag))
            .ok_or_else(|| CommandError::UnknownFlag { flag: flag.to_owned() })?;

        match spec.value {
            ValueKind::Switch => {
                parsed.push((spec.field, FlagValue::Switch));
                i += 1;
            }
            ValueKind::Value(validator) => {
                let raw = tokens
                    .get(i + 1)
                    .ok_or_else(|| CommandError::MissingValue { flag: flag.to_owned() })?;
                parsed.push((spec.field, validator.validate(raw)?));
                i += 2;
            }
        }
    }

    Ok(parsed)
}

/// Split a chat message into `(tool, args)` when it is a slash command.
///
/// `"/naabu -host x"` yields `("naabu", "-host x")`. The command word must
/// be followed by whitespace or the end of the message.
pub fn split_command(message: &str) -> Option<(&str, &str)> {
    let rest = message.trim().strip_prefix('/')?;
    let (tool, args) = match rest.find(char::is_whitespace) {
        Some(at) => (&rest[..at], rest[at..].trim_start()),
        None => (rest, ""),
    };
    (!tool.is_empty()).then_some((tool, args))
}

/// Whether `message` invokes `/<tool>`.
pub fn detect(message: &str, tool: &str) -> bool {
    split_command(message).is_some_and(|(name, _)| name == tool)
}
