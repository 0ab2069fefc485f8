//! An in-process developer console for Bevy.
//!
//! bevy_devconsole provides:
//!
//! - **CVars**: Named, typed, string-backed variables, stored in the registry
//!   or proxied to host getters/setters
//! - **Commands**: Named handlers returning text, plus `help`, `clear`,
//!   `echo` and `list` built-ins
//! - **Console**: A line evaluator that dispatches to commands or variables
//!   and writes everything to a scrollback
//!
//! # Features
//!
//! - `terminal`: stdin/stdout backend for dedicated servers
//! - `declare`: CVar declarations loaded from RON files
//! - `full`: Enable terminal + declare
//!
//! # Quick Start
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_devconsole::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(MinimalPlugins)
//!         .add_plugins(ConsolePlugin)
//!         .add_systems(Startup, setup_console)
//!         .run();
//! }
//!
//! fn setup_console(mut console: ResMut<Console>) {
//!     // Register a variable
//!     let gravity = console.cvars_mut().register("sv_gravity", 800.0f32).unwrap();
//!
//!     // Register a command
//!     console.commands_mut().register("greet", |args, _ctx| {
//!         format!("Hello, {}!\n", args.get_or(0, "World"))
//!     });
//!
//!     // Get and set values
//!     console.process("sv_gravity 1000");
//!     assert_eq!(gravity.get(console.cvars()).unwrap(), 1000.0);
//! }
//! ```

use bevy::prelude::*;

// Core module (always available)
pub mod core;

// Re-export core types at crate root for convenience
pub use crate::core::{
    Console, ConsoleConfig, LineOutput,
    CVar, CVarCell, CVarRegistry, CVarType, CVarValue, ConversionTable,
    CVarDescriptor, DeclaredReport, DescriptorBinding,
    CommandArgs, CommandContext, CommandHandler, CommandRegistry,
    ConsoleError, ConsoleResult,
    ConsoleExpression, tokenize,
    Scrollback, ScrollbackMark,
    ConsoleInputEvent, ConsoleOutputEvent, ConsoleClearEvent,
    ConsoleEventsPlugin,
};

// Terminal backend (feature-gated)
#[cfg(feature = "terminal")]
pub mod terminal;

// Declaration files (feature-gated)
#[cfg(feature = "declare")]
pub mod declare_file;

#[cfg(feature = "declare")]
pub use declare_file::{DeclarationError, DeclarationFile, DeclarationPath, DeclaredCVar};

#[cfg(feature = "terminal")]
pub use terminal::{TerminalConfig, TerminalPlugin};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::core::{
        Console, ConsoleConfig,
        CVar, CVarRegistry, CVarType, CVarValue,
        CVarDescriptor,
        CommandArgs, CommandContext, CommandRegistry,
        ConsoleError, ConsoleResult,
        ConsoleInputEvent, ConsoleOutputEvent, ConsoleClearEvent,
    };
    pub use crate::ConsolePlugin;
}

/// Main console plugin.
///
/// Initialises a default [`Console`] unless one was inserted first, and
/// evaluates every [`ConsoleInputEvent`] in `Update`.
///
/// # Configuration
///
/// ```ignore
/// App::new()
///     .insert_resource(Console::new().with_config(ConsoleConfig {
///         scrollback_limit: Some(64 * 1024),
///     }))
///     .add_plugins(ConsolePlugin);
/// ```
#[derive(Default)]
pub struct ConsolePlugin;

impl Plugin for ConsolePlugin {
    fn build(&self, app: &mut App) {
        // Core: keep a host-provided console, otherwise create one
        app.init_resource::<Console>()
            .add_plugins(crate::core::ConsoleEventsPlugin)
            .add_systems(Update, process_console_input);

        // Declaration files (feature-gated)
        #[cfg(feature = "declare")]
        {
            app.init_resource::<declare_file::DeclarationPath>()
                .add_systems(Startup, declare_file::load_declarations_on_startup);
        }

        // Terminal backend (feature-gated)
        #[cfg(feature = "terminal")]
        {
            app.add_plugins(terminal::TerminalPlugin);
        }
    }
}

/// System that evaluates console input messages.
///
/// Sends the text each line produced as a [`ConsoleOutputEvent`], even when
/// the scrollback limit has already dropped it, and a [`ConsoleClearEvent`]
/// whenever a line cleared the scrollback.
pub fn process_console_input(
    mut console: ResMut<Console>,
    mut input_events: MessageReader<ConsoleInputEvent>,
    mut output_events: MessageWriter<ConsoleOutputEvent>,
    mut clear_events: MessageWriter<ConsoleClearEvent>,
) {
    for event in input_events.read() {
        let output = console.evaluate(&event.line);

        if output.cleared {
            clear_events.write(ConsoleClearEvent);
        }
        if !output.text.is_empty() {
            output_events.write(ConsoleOutputEvent::new(output.text));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test resource collecting console messages.
    #[derive(Resource, Default)]
    struct Collected {
        outputs: Vec<String>,
        clears: usize,
    }

    fn collect(
        mut collected: ResMut<Collected>,
        mut outputs: MessageReader<ConsoleOutputEvent>,
        mut clears: MessageReader<ConsoleClearEvent>,
    ) {
        for event in outputs.read() {
            collected.outputs.push(event.text.clone());
        }
        collected.clears += clears.read().count();
    }

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(ConsolePlugin);
        app.init_resource::<Collected>();
        app.add_systems(PostUpdate, collect);
        app
    }

    fn submit(app: &mut App, line: &str) {
        app.world_mut().write_message(ConsoleInputEvent::new(line));
        app.update();
    }

    #[test]
    fn test_plugin_initialises_default_console() {
        let mut app = test_app();
        app.update();

        let console = app.world().resource::<Console>();
        assert!(console.commands().contains("help"));
        assert!(console.cvars().contains("sensitivity"));
    }

    #[test]
    fn test_plugin_keeps_inserted_console() {
        let mut app = App::new();
        app.insert_resource(Console::with_registries(
            CommandRegistry::new(),
            CVarRegistry::new(),
        ));
        app.add_plugins(MinimalPlugins);
        app.add_plugins(ConsolePlugin);
        app.update();

        let console = app.world().resource::<Console>();
        assert!(console.commands().is_empty());
        assert!(console.cvars().is_empty());
    }

    #[test]
    fn test_input_produces_output() {
        let mut app = test_app();
        submit(&mut app, "echo hello world");
        submit(&mut app, "sensitivity");

        let collected = app.world().resource::<Collected>();
        assert_eq!(
            collected.outputs,
            vec![">echo hello world\nhello world \n", ">sensitivity\nsensitivity = 3\n"]
        );
    }

    #[test]
    fn test_variable_set_via_input() {
        let mut app = test_app();
        app.add_systems(Startup, |mut console: ResMut<Console>| {
            console.cvars_mut().register("test_var", 42i32).unwrap();
        });
        app.update();

        submit(&mut app, "test_var 100");
        submit(&mut app, "test_var oops");

        let console = app.world().resource::<Console>();
        assert_eq!(console.cvars().lookup::<i32>("test_var").unwrap(), 100);

        let collected = app.world().resource::<Collected>();
        assert_eq!(
            collected.outputs,
            vec![">test_var 100\n", ">test_var oops\nFailed to assign to test_var\n"]
        );
    }

    #[test]
    fn test_command_registered_by_system() {
        let mut app = test_app();
        app.add_systems(Startup, |mut console: ResMut<Console>| {
            console.commands_mut().register("count_args", |args, _ctx| {
                format!("{}\n", args.len())
            });
        });
        app.update();

        submit(&mut app, "count_args a b c");

        let collected = app.world().resource::<Collected>();
        assert_eq!(collected.outputs, vec![">count_args a b c\n3\n"]);
    }

    #[test]
    fn test_blank_input_is_silent() {
        let mut app = test_app();
        submit(&mut app, "   ");

        let collected = app.world().resource::<Collected>();
        assert!(collected.outputs.is_empty());
        assert!(app.world().resource::<Console>().scrollback().is_empty());
    }

    #[test]
    fn test_clear_sends_clear_event() {
        let mut app = test_app();
        submit(&mut app, "echo one");
        submit(&mut app, "clear");

        let collected = app.world().resource::<Collected>();
        assert_eq!(collected.clears, 1);
        assert_eq!(collected.outputs, vec![">echo one\none \n"]);
        assert!(app.world().resource::<Console>().scrollback().is_empty());
    }

    #[test]
    fn test_output_survives_scrollback_limit() {
        let mut app = App::new();
        app.insert_resource(Console::new().with_config(ConsoleConfig {
            scrollback_limit: Some(8),
        }));
        app.add_plugins(MinimalPlugins);
        app.add_plugins(ConsolePlugin);
        app.init_resource::<Collected>();
        app.add_systems(PostUpdate, collect);

        submit(&mut app, "echo hello");

        let collected = app.world().resource::<Collected>();
        assert_eq!(collected.outputs, vec![">echo hello\nhello \n"]);
        assert!(app.world().resource::<Console>().scrollback().len() <= 8);
    }

    #[test]
    fn test_unknown_token_via_input() {
        let mut app = test_app();
        submit(&mut app, "frobnicate");

        let collected = app.world().resource::<Collected>();
        assert_eq!(
            collected.outputs,
            vec![">frobnicate\nfrobnicate is not a valid token\n"]
        );
    }
}
