//! Console commands and the command registry.
//!
//! A command is a name bound to a handler that takes the parsed arguments and
//! returns the text to display (empty for nothing).

use std::collections::HashMap;

use bevy::log::warn;

use super::error::validate_name;
use super::{CVarRegistry, ConsoleError, ConsoleResult, Scrollback};

/// The tokens following a command name, plus the line they came from.
#[derive(Debug, Clone)]
pub struct CommandArgs<'a> {
    line: &'a str,
    tokens: Vec<&'a str>,
}

impl<'a> CommandArgs<'a> {
    pub fn new(line: &'a str, tokens: Vec<&'a str>) -> Self {
        Self { line, tokens }
    }

    /// The trimmed input line, command name included. Just the name when the
    /// command was run directly rather than from a line.
    #[inline]
    pub fn raw(&self) -> &str {
        self.line
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token at `index`, counting from the first one after the command name.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).copied()
    }

    /// Like [`get`](Self::get), falling back to `default` past the end.
    #[inline]
    pub fn get_or(&self, index: usize, default: &'a str) -> &str {
        self.get(index).unwrap_or(default)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().copied()
    }

    /// Tokens glued back together with `separator`; inner spacing of the
    /// original line is not preserved.
    pub fn join(&self, separator: &str) -> String {
        self.tokens.join(separator)
    }
}

/// What a command handler can reach while it runs.
pub struct CommandContext<'a> {
    commands: &'a CommandRegistry,
    cvars: &'a mut CVarRegistry,
    scrollback: &'a mut Scrollback,
}

impl<'a> CommandContext<'a> {
    /// Create a context over the console's state.
    pub fn new(
        commands: &'a CommandRegistry,
        cvars: &'a mut CVarRegistry,
        scrollback: &'a mut Scrollback,
    ) -> Self {
        Self {
            commands,
            cvars,
            scrollback,
        }
    }

    /// Get the command registry.
    pub fn commands(&self) -> &CommandRegistry {
        self.commands
    }

    /// Get the CVar registry.
    pub fn cvars(&self) -> &CVarRegistry {
        self.cvars
    }

    /// Get the CVar registry mutably.
    pub fn cvars_mut(&mut self) -> &mut CVarRegistry {
        self.cvars
    }

    /// Get the current scrollback text.
    pub fn scrollback(&self) -> &str {
        self.scrollback.as_str()
    }

    /// Clear the scrollback.
    pub fn clear_scrollback(&mut self) {
        self.scrollback.clear();
    }
}

/// Type alias for command handler functions.
///
/// Handlers receive the parsed arguments and the console context, and return
/// the text to append to the scrollback.
pub type CommandHandler =
    Box<dyn Fn(&CommandArgs<'_>, &mut CommandContext<'_>) -> String + Send + Sync>;

/// Registry of console commands.
///
/// Names are unique and entries are never removed. Enumeration follows
/// registration order.
///
/// # Examples
///
/// ```
/// use bevy_devconsole::core::CommandRegistry;
///
/// let mut commands = CommandRegistry::with_builtins();
/// assert!(commands.register("greet", |args, _ctx| {
///     format!("Hello, {}!\n", args.get_or(0, "World"))
/// }));
///
/// // Duplicate names are rejected
/// assert!(!commands.register("greet", |_, _| String::new()));
/// assert_eq!(commands.list_names(), vec!["help", "clear", "echo", "list", "greet"]);
/// ```
#[derive(Default)]
pub struct CommandRegistry {
    handlers: HashMap<Box<str>, CommandHandler>,
    /// Registration order.
    order: Vec<Box<str>>,
}

impl CommandRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in commands.
    ///
    /// - `help`: list all command names, one per line
    /// - `clear`: clear the scrollback
    /// - `echo`: print the arguments
    /// - `list`: list all CVar names, one per line
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("help", help_command);
        registry.register("clear", clear_command);
        registry.register("echo", echo_command);
        registry.register("list", list_command);
        registry
    }

    /// Register a command.
    ///
    /// Returns `true` if newly registered. Returns `false` without touching the
    /// existing entry if the name is taken, and `false` if the name is empty or
    /// contains whitespace.
    pub fn register<F>(&mut self, name: impl Into<Box<str>>, handler: F) -> bool
    where
        F: Fn(&CommandArgs<'_>, &mut CommandContext<'_>) -> String + Send + Sync + 'static,
    {
        self.register_boxed(name.into(), Box::new(handler))
    }

    /// Register an already boxed handler.
    pub fn register_boxed(&mut self, name: Box<str>, handler: CommandHandler) -> bool {
        if let Err(e) = validate_name(&name) {
            warn!("Console: refusing to register command: {}", e);
            return false;
        }
        if self.handlers.contains_key(&name) {
            warn!("Console: command '{}' is already registered", name);
            return false;
        }

        self.order.push(name.clone());
        self.handlers.insert(name, handler);
        true
    }

    /// Check if a command is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Execute a command.
    ///
    /// Fails with [`ConsoleError::NotFound`] if no command has this name.
    pub fn execute(
        &self,
        name: &str,
        args: &CommandArgs<'_>,
        cvars: &mut CVarRegistry,
        scrollback: &mut Scrollback,
    ) -> ConsoleResult<String> {
        let handler = self
            .handlers
            .get(name)
            .ok_or_else(|| ConsoleError::not_found(name))?;

        let mut ctx = CommandContext::new(self, cvars, scrollback);
        Ok(handler(args, &mut ctx))
    }

    /// Iterate over command names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|name| name.as_ref())
    }

    /// Collect all command names in registration order.
    pub fn list_names(&self) -> Vec<String> {
        self.names().map(str::to_string).collect()
    }

    /// Get the number of registered commands.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Check if no commands are registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.order)
            .finish_non_exhaustive()
    }
}

fn lines<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.fold(String::new(), |mut out, name| {
        out.push_str(name);
        out.push('\n');
        out
    })
}

fn help_command(_args: &CommandArgs<'_>, ctx: &mut CommandContext<'_>) -> String {
    lines(ctx.commands().names())
}

fn clear_command(_args: &CommandArgs<'_>, ctx: &mut CommandContext<'_>) -> String {
    ctx.clear_scrollback();
    ctx.scrollback().to_string()
}

fn echo_command(args: &CommandArgs<'_>, _ctx: &mut CommandContext<'_>) -> String {
    let mut out = String::new();
    for arg in args.iter() {
        out.push_str(arg);
        out.push(' ');
    }
    out.push('\n');
    out
}

fn list_command(_args: &CommandArgs<'_>, ctx: &mut CommandContext<'_>) -> String {
    lines(ctx.cvars().names())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(commands: &CommandRegistry, cvars: &mut CVarRegistry, name: &str, args: Vec<&str>) -> String {
        let mut scrollback = Scrollback::new();
        let args = CommandArgs::new("", args);
        commands.execute(name, &args, cvars, &mut scrollback).unwrap()
    }

    #[test]
    fn test_command_args_basic() {
        let args = CommandArgs::new("echo hello world", vec!["hello", "world"]);
        assert_eq!(args.len(), 2);
        assert_eq!(args.get(0), Some("hello"));
        assert_eq!(args.get(1), Some("world"));
        assert_eq!(args.get(2), None);
        assert_eq!(args.get_or(2, "fallback"), "fallback");
        assert_eq!(args.raw(), "echo hello world");
    }

    #[test]
    fn test_command_args_join() {
        let args = CommandArgs::new("echo hello world", vec!["hello", "world"]);
        assert_eq!(args.join(" "), "hello world");
        assert_eq!(args.iter().collect::<Vec<_>>(), vec!["hello", "world"]);

        let none = CommandArgs::new("echo", vec![]);
        assert!(none.is_empty());
        assert_eq!(none.join(" "), "");
    }

    #[test]
    fn test_register_and_execute() {
        let mut commands = CommandRegistry::new();
        assert!(commands.register("add", |args, _ctx| {
            let sum: i64 = args.iter().filter_map(|a| a.parse::<i64>().ok()).sum();
            format!("{}\n", sum)
        }));

        assert!(commands.contains("add"));
        let mut cvars = CVarRegistry::new();
        assert_eq!(run(&commands, &mut cvars, "add", vec!["1", "2", "3"]), "6\n");
    }

    #[test]
    fn test_duplicate_keeps_first() {
        let mut commands = CommandRegistry::new();
        assert!(commands.register("cmd", |_, _| "first\n".to_string()));
        assert!(!commands.register("cmd", |_, _| "second\n".to_string()));

        let mut cvars = CVarRegistry::new();
        assert_eq!(run(&commands, &mut cvars, "cmd", vec![]), "first\n");
        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn test_invalid_names_rejected() {
        let mut commands = CommandRegistry::new();
        assert!(!commands.register("", |_, _| String::new()));
        assert!(!commands.register("two words", |_, _| String::new()));
        assert!(commands.is_empty());
    }

    #[test]
    fn test_execute_unknown() {
        let commands = CommandRegistry::new();
        let mut cvars = CVarRegistry::new();
        let mut scrollback = Scrollback::new();
        let args = CommandArgs::new("nope", vec![]);

        let result = commands.execute("nope", &args, &mut cvars, &mut scrollback);
        assert!(matches!(result, Err(ConsoleError::NotFound { .. })));
    }

    #[test]
    fn test_builtin_echo() {
        let commands = CommandRegistry::with_builtins();
        let mut cvars = CVarRegistry::new();
        assert_eq!(run(&commands, &mut cvars, "echo", vec!["a", "b", "c"]), "a b c \n");
        assert_eq!(run(&commands, &mut cvars, "echo", vec![]), "\n");
    }

    #[test]
    fn test_builtin_help_and_list() {
        let mut commands = CommandRegistry::with_builtins();
        commands.register("noclip", |_, _| String::new());

        let mut cvars = CVarRegistry::new();
        cvars.register("sv_gravity", 800i32).unwrap();
        cvars.register("cl_fov", 90i32).unwrap();

        assert_eq!(
            run(&commands, &mut cvars, "help", vec![]),
            "help\nclear\necho\nlist\nnoclip\n"
        );
        assert_eq!(run(&commands, &mut cvars, "list", vec![]), "sv_gravity\ncl_fov\n");
    }

    #[test]
    fn test_builtin_clear() {
        let commands = CommandRegistry::with_builtins();
        let mut cvars = CVarRegistry::new();
        let mut scrollback = Scrollback::new();
        scrollback.push_str(">echo hi\nhi \n");

        let args = CommandArgs::new("clear", vec![]);
        let out = commands.execute("clear", &args, &mut cvars, &mut scrollback).unwrap();
        assert_eq!(out, "");
        assert!(scrollback.is_empty());
    }

    #[test]
    fn test_handler_can_write_cvars() {
        let mut commands = CommandRegistry::new();
        commands.register("double", |args, ctx| {
            let Some(name) = args.get(0) else {
                return "Usage: double <cvar>\n".to_string();
            };
            match ctx.cvars().lookup::<i64>(name) {
                Ok(value) => match ctx.cvars_mut().write(name, value * 2) {
                    Ok(()) => String::new(),
                    Err(e) => format!("{}\n", e),
                },
                Err(e) => format!("{}\n", e),
            }
        });

        let mut cvars = CVarRegistry::new();
        cvars.register("count", 21i64).unwrap();
        assert_eq!(run(&commands, &mut cvars, "double", vec!["count"]), "");
        assert_eq!(cvars.lookup::<i64>("count").unwrap(), 42);
        assert_eq!(
            run(&commands, &mut cvars, "double", vec![]),
            "Usage: double <cvar>\n"
        );
    }
}
