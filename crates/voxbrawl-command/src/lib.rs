//! Command parsing, registry, and the movement commands.

pub mod movement;
pub mod target;

use std::collections::HashMap;

use tracing::info;
use voxbrawl_game::{CommandError, CommandSender, GameContext};

/// One parsed invocation passed to a command handler.
pub struct CommandContext<'s> {
    /// Whoever issued the command.
    pub sender: &'s CommandSender,
    /// Arguments after the command name.
    pub args: Vec<String>,
}

/// Result returned by a command handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// Whether the command executed successfully.
    pub success: bool,
    /// Messages to send back to the command sender.
    pub messages: Vec<String>,
}

impl CommandResult {
    /// Create a successful result with a single message.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            messages: vec![message.into()],
        }
    }

    /// Successful result with nothing to reply; the effects went through
    /// the event sink.
    pub fn done() -> Self {
        Self {
            success: true,
            messages: Vec::new(),
        }
    }

    /// Create a failed result with a single message.
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            messages: vec![message.into()],
        }
    }
}

impl From<CommandError> for CommandResult {
    fn from(e: CommandError) -> Self {
        Self::err(e.to_string())
    }
}

/// Function pointer type for command handlers.
pub type CommandFn = fn(&mut GameContext, &CommandContext) -> Result<CommandResult, CommandError>;

/// A registered command.
pub struct CommandEntry {
    pub name: String,
    pub aliases: Vec<String>,
    pub description: String,
    pub usage: String,
    /// Restricted to admins and holders of a right named after the command.
    pub admin_only: bool,
    pub handler: CommandFn,
}

/// Registry of available server commands.
pub struct CommandRegistry {
    commands: HashMap<String, CommandEntry>,
    aliases: HashMap<String, String>,
}

impl CommandRegistry {
    /// Create a registry with the movement commands.
    pub fn new() -> Self {
        let mut registry = Self {
            commands: HashMap::new(),
            aliases: HashMap::new(),
        };
        movement::register(&mut registry);
        registry
    }

    /// Register a command under its name and any aliases.
    pub fn register(&mut self, entry: CommandEntry) {
        for alias in &entry.aliases {
            self.aliases.insert(alias.clone(), entry.name.clone());
        }
        self.commands.insert(entry.name.clone(), entry);
    }

    /// Look up a command by name or alias.
    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        let name = self.aliases.get(name).map_or(name, String::as_str);
        self.commands.get(name)
    }

    /// Execute a command by name or alias.
    pub fn execute(&self, game: &mut GameContext, name: &str, ctx: &CommandContext) -> CommandResult {
        if name == "help" {
            return self.help(ctx.sender);
        }
        let Some(entry) = self.get(name) else {
            return CommandResult::err(format!(
                "Unknown command: {name}. Type /help for a list of commands."
            ));
        };
        if !Self::permitted(entry, ctx.sender) {
            return CommandResult::err("You can't use this command");
        }
        info!("{} issued /{} {}", ctx.sender.name, entry.name, ctx.args.join(" "));
        match (entry.handler)(game, ctx) {
            Ok(result) => result,
            Err(e) => e.into(),
        }
    }

    /// Commands the sender may run, one line each, sorted by name.
    pub fn help(&self, sender: &CommandSender) -> CommandResult {
        let mut entries: Vec<&CommandEntry> = self
            .commands
            .values()
            .filter(|e| Self::permitted(e, sender))
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        let mut lines = vec!["Available commands:".to_string()];
        lines.extend(
            entries
                .into_iter()
                .map(|e| format!("  /{} - {}", e.usage, e.description)),
        );
        CommandResult {
            success: true,
            messages: lines,
        }
    }

    /// Get a reference to all registered commands.
    pub fn get_commands(&self) -> &HashMap<String, CommandEntry> {
        &self.commands
    }

    fn permitted(entry: &CommandEntry, sender: &CommandSender) -> bool {
        !entry.admin_only || sender.may(&entry.name)
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a chat or console line into a lower-cased command name and its
/// arguments. The leading `/` is optional. Returns `None` for a blank line.
pub fn parse_command_line(line: &str) -> Option<(String, Vec<String>)> {
    let line = line.trim();
    let line = line.strip_prefix('/').unwrap_or(line);
    let mut parts = line.split_whitespace();
    let name = parts.next()?.to_lowercase();
    Some((name, parts.map(String::from).collect()))
}
