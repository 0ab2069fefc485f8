//! The console evaluator.
//!
//! [`Console`] owns both registries and the scrollback, and turns raw input
//! lines into command calls or variable reads/writes.

use bevy::log::{debug, warn};
use bevy::prelude::*;

use super::{
    tokenize, CVarRegistry, CommandArgs, CommandRegistry, ConsoleExpression, ConsoleResult,
    Scrollback,
};

/// Console configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Maximum scrollback size in bytes. `None` keeps everything.
    pub scrollback_limit: Option<usize>,
}

/// What one input line added to the scrollback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineOutput {
    /// The appended text, echo included, before any size trimming.
    pub text: String,
    /// Whether the line cleared the scrollback.
    pub cleared: bool,
}

/// A console instance: commands, variables, and the scrollback they write to.
///
/// # Examples
///
/// ```
/// use bevy_devconsole::core::Console;
///
/// let mut console = Console::new();
/// console.commands_mut().register("greet", |args, _ctx| {
///     format!("Hello, {}!\n", args.get_or(0, "World"))
/// });
///
/// console.process("greet Bob");
/// console.process("sensitivity 5");
/// let out = console.process("sensitivity");
///
/// assert_eq!(out, ">greet Bob\nHello, Bob!\n>sensitivity 5\n>sensitivity\nsensitivity = 5\n");
/// ```
#[derive(Resource, Debug)]
pub struct Console {
    commands: CommandRegistry,
    cvars: CVarRegistry,
    scrollback: Scrollback,
    config: ConsoleConfig,
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

impl Console {
    /// Create a console with the built-in commands and default variables.
    pub fn new() -> Self {
        Self::with_registries(CommandRegistry::with_builtins(), CVarRegistry::with_defaults())
    }

    /// Create a console over existing registries.
    pub fn with_registries(commands: CommandRegistry, cvars: CVarRegistry) -> Self {
        Self {
            commands,
            cvars,
            scrollback: Scrollback::new(),
            config: ConsoleConfig::default(),
        }
    }

    /// Apply a configuration.
    pub fn with_config(mut self, config: ConsoleConfig) -> Self {
        self.set_config(config);
        self
    }

    /// Get the configuration.
    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// Replace the configuration.
    pub fn set_config(&mut self, config: ConsoleConfig) {
        self.scrollback.set_limit(config.scrollback_limit);
        self.config = config;
    }

    /// Get the command registry.
    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    /// Get the command registry mutably.
    pub fn commands_mut(&mut self) -> &mut CommandRegistry {
        &mut self.commands
    }

    /// Get the CVar registry.
    pub fn cvars(&self) -> &CVarRegistry {
        &self.cvars
    }

    /// Get the CVar registry mutably.
    pub fn cvars_mut(&mut self) -> &mut CVarRegistry {
        &mut self.cvars
    }

    /// Get the scrollback.
    pub fn scrollback(&self) -> &Scrollback {
        &self.scrollback
    }

    /// Evaluate one input line and return the whole scrollback.
    ///
    /// Blank lines leave the scrollback untouched. Anything else is echoed
    /// as `>line`, then dispatched to a command, else a variable, else
    /// reported as an invalid token. Bad input never fails the call; it
    /// produces an error line instead.
    pub fn process(&mut self, line: &str) -> &str {
        self.evaluate(line);
        self.scrollback.as_str()
    }

    /// Evaluate one input line and return only what it added.
    ///
    /// Same rules as [`Console::process`]. The returned text is complete even
    /// when the scrollback limit trimmed part of it away. After a `clear`,
    /// only output produced after the clear is reported.
    pub fn evaluate(&mut self, line: &str) -> LineOutput {
        let line = line.trim();
        let Some(expr) = tokenize(line) else {
            return LineOutput::default();
        };

        debug!("Console: > {}", line);
        let echo = format!(">{}\n", line);
        self.scrollback.push_str(&echo);

        let mark = self.scrollback.mark();
        let output = self.dispatch(line, &expr);
        let cleared = self.scrollback.cleared_since(mark);
        if !output.is_empty() {
            self.scrollback.push_str(&output);
        }

        let mut text = if cleared { String::new() } else { echo };
        text.push_str(&output);
        LineOutput { text, cleared }
    }

    /// Run a command directly, without echoing it into the scrollback.
    ///
    /// The command itself may still touch the scrollback (`clear` does).
    pub fn execute(&mut self, name: &str, args: &[&str]) -> ConsoleResult<String> {
        let args = CommandArgs::new(name, args.to_vec());
        self.commands
            .execute(name, &args, &mut self.cvars, &mut self.scrollback)
    }

    fn dispatch(&mut self, line: &str, expr: &ConsoleExpression<'_>) -> String {
        let token = expr.token;

        if self.commands.contains(token) {
            let args = CommandArgs::new(line, expr.arguments.clone());
            return match self
                .commands
                .execute(token, &args, &mut self.cvars, &mut self.scrollback)
            {
                Ok(output) => output,
                Err(e) => format!("{}\n", e),
            };
        }

        if self.cvars.contains(token) {
            if expr.arguments.is_empty() {
                return match self.cvars.lookup_string(token) {
                    Ok(value) => format!("{} = {}\n", token, value),
                    Err(e) => format!("{}\n", e),
                };
            }

            return match self.cvars.write_string(token, &expr.joined_arguments()) {
                Ok(()) => String::new(),
                Err(e) => {
                    warn!("Console: {}", e);
                    format!("Failed to assign to {}\n", token)
                }
            };
        }

        format!("{} is not a valid token\n", token)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::core::{CVar, ConsoleError};

    fn empty_console() -> Console {
        Console::with_registries(CommandRegistry::with_builtins(), CVarRegistry::new())
    }

    #[test]
    fn test_default_console() {
        let console = Console::new();
        assert_eq!(console.commands().list_names(), vec!["help", "clear", "echo", "list"]);
        assert_eq!(
            console.cvars().list_names(),
            vec!["version", "cl_playerName", "sensitivity"]
        );
        assert_eq!(console.cvars().lookup::<i32>("sensitivity").unwrap(), 3);
        assert_eq!(console.cvars().lookup_string("cl_playerName").unwrap(), "PlayerName");
    }

    #[test]
    fn test_blank_line_is_noop() {
        let mut console = Console::new();
        console.process("echo hi");
        let before = console.scrollback().as_str().to_string();

        assert_eq!(console.process(""), before);
        assert_eq!(console.process("   "), before);
        assert_eq!(console.process("\t\n"), before);
    }

    #[test]
    fn test_echo_command() {
        let mut console = Console::new();
        assert_eq!(console.process("echo a b c"), ">echo a b c\na b c \n");
    }

    #[test]
    fn test_input_is_trimmed_before_echo() {
        let mut console = Console::new();
        assert_eq!(console.process("   echo   a    b  "), ">echo   a    b\na b \n");
    }

    #[test]
    fn test_unknown_token() {
        let mut console = Console::new();
        let out = console.process("frobnicate");
        assert!(out.ends_with("frobnicate is not a valid token\n"));
        assert_eq!(out, ">frobnicate\nfrobnicate is not a valid token\n");
    }

    #[test]
    fn test_read_variable() {
        let mut console = Console::new();
        assert_eq!(console.process("sensitivity"), ">sensitivity\nsensitivity = 3\n");
    }

    #[test]
    fn test_assignment_is_silent() {
        let mut console = Console::new();
        assert_eq!(console.process("sensitivity 7"), ">sensitivity 7\n");
        assert_eq!(console.cvars().lookup::<i32>("sensitivity").unwrap(), 7);
    }

    #[test]
    fn test_assignment_failure_preserves_state() {
        let mut console = Console::new();
        console.process("sensitivity notanumber");
        assert!(console
            .scrollback()
            .as_str()
            .ends_with("Failed to assign to sensitivity\n"));

        let out = console.process("sensitivity");
        assert!(out.ends_with("sensitivity = 3\n"));
    }

    #[test]
    fn test_multi_word_assignment_normalizes_spaces() {
        let mut console = Console::new();
        console.process("cl_playerName   Big    Bob");
        assert_eq!(console.cvars().lookup_string("cl_playerName").unwrap(), "Big Bob");
        assert!(console.process("cl_playerName").ends_with("cl_playerName = Big Bob\n"));
    }

    #[test]
    fn test_commands_shadow_variables() {
        let mut console = empty_console();
        console.cvars_mut().register("echo", 1i32).unwrap();

        assert_eq!(console.process("echo"), ">echo\n\n");
        assert_eq!(console.cvars().lookup::<i32>("echo").unwrap(), 1);
    }

    #[test]
    fn test_clear_empties_scrollback() {
        let mut console = Console::new();
        console.process("echo one");
        console.process("sensitivity");
        assert_eq!(console.process("clear"), "");

        assert_eq!(console.process("echo two"), ">echo two\ntwo \n");
    }

    #[test]
    fn test_list_and_help_enumerate() {
        let mut console = Console::new();
        console.cvars_mut().register("a", 1i32).unwrap();
        console.cvars_mut().register("b", 2.5f64).unwrap();
        console.cvars_mut().register("c", true).unwrap();
        console.commands_mut().register("god", |_, _| String::new());
        console.commands_mut().register("noclip", |_, _| String::new());

        let out = console.process("list").to_string();
        assert!(out.ends_with(">list\nversion\ncl_playerName\nsensitivity\na\nb\nc\n"));

        console.process("clear");
        assert_eq!(
            console.process("help"),
            ">help\nhelp\nclear\necho\nlist\ngod\nnoclip\n"
        );
    }

    #[test]
    fn test_duplicate_registration_keeps_first() {
        let mut console = empty_console();
        assert!(console.commands_mut().register("ping", |_, _| "pong\n".to_string()));
        assert!(!console.commands_mut().register("ping", |_, _| "nope\n".to_string()));

        console.cvars_mut().register("fov", 90i32).unwrap();
        let err = console.cvars_mut().register("fov", 120i32).unwrap_err();
        assert!(matches!(err, ConsoleError::DuplicateName { .. }));

        console.process("ping");
        assert!(console.process("fov").ends_with("pong\n>fov\nfov = 90\n"));
    }

    #[test]
    fn test_round_trip_canonical_formatting() {
        let mut console = empty_console();
        console.cvars_mut().register("timescale", 1.0f64).unwrap();
        console.cvars_mut().register("cheats", false).unwrap();

        console.process("timescale 3.0");
        console.process("cheats true");
        assert!(console.process("timescale").ends_with("timescale = 3\n"));
        assert!(console.process("cheats").ends_with("cheats = 1\n"));

        console.process("timescale 0.5");
        assert_eq!(console.cvars().lookup::<f64>("timescale").unwrap(), 0.5);
    }

    #[test]
    fn test_delegate_backed_variable() {
        let store = Arc::new(AtomicI64::new(10));
        let read = Arc::clone(&store);
        let write = Arc::clone(&store);

        let mut console = empty_console();
        let health: CVar<i64> = console
            .cvars_mut()
            .register_delegate(
                "health",
                move || read.load(Ordering::SeqCst).to_string(),
                move |v: &str| {
                    if let Ok(v) = v.parse() {
                        write.store(v, Ordering::SeqCst);
                    }
                },
            )
            .unwrap();

        console.process("health 55");
        assert_eq!(store.load(Ordering::SeqCst), 55);

        store.store(80, Ordering::SeqCst);
        assert!(console.process("health").ends_with("health = 80\n"));
        assert_eq!(health.get(console.cvars()).unwrap(), 80);

        console.process("health lots");
        assert_eq!(store.load(Ordering::SeqCst), 80);
    }

    #[test]
    fn test_execute_directly() {
        let mut console = Console::new();
        assert_eq!(console.execute("echo", &["x", "y"]).unwrap(), "x y \n");
        assert!(console.scrollback().is_empty());

        let err = console.execute("missing", &[]).unwrap_err();
        assert!(matches!(err, ConsoleError::NotFound { .. }));
    }

    #[test]
    fn test_command_sees_trimmed_line() {
        let mut console = empty_console();
        console
            .commands_mut()
            .register("raw", |args, _ctx| format!("[{}]\n", args.raw()));

        assert!(console.process("  raw  a   b ").ends_with("[raw  a   b]\n"));
    }

    #[test]
    fn test_assignment_out_of_range_fails() {
        let mut console = empty_console();
        let fov = console.cvars_mut().register("fov", 90i32).unwrap();
        console.cvars_mut().register("scale", 1.0f32).unwrap();

        assert_eq!(
            console.process("fov 3000000000"),
            ">fov 3000000000\nFailed to assign to fov\n"
        );
        assert_eq!(fov.get(console.cvars()).unwrap(), 90);

        console.process("scale 1e300");
        assert!(console.process("scale").ends_with("Failed to assign to scale\n>scale\nscale = 1\n"));
    }

    #[test]
    fn test_evaluate_reports_untrimmed_text() {
        let mut console = Console::new().with_config(ConsoleConfig {
            scrollback_limit: Some(8),
        });

        let out = console.evaluate("echo hello");
        assert_eq!(out.text, ">echo hello\nhello \n");
        assert!(!out.cleared);
        assert!(console.scrollback().len() <= 8);

        assert_eq!(console.evaluate("   "), LineOutput::default());
    }

    #[test]
    fn test_evaluate_clear() {
        let mut console = Console::new();
        console.process("echo one");

        let out = console.evaluate("clear");
        assert!(out.cleared);
        assert_eq!(out.text, "");
        assert!(console.scrollback().is_empty());
    }

    #[test]
    fn test_scrollback_limit() {
        let mut console = Console::new().with_config(ConsoleConfig {
            scrollback_limit: Some(32),
        });
        for i in 0..20 {
            console.process(&format!("echo {}", i));
        }

        let out = console.scrollback().as_str();
        assert!(out.len() <= 32);
        assert!(out.ends_with(">echo 19\n19 \n"));
        assert!(!out.contains(">echo 0\n"));
    }
}
