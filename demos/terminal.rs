//! Terminal console example.
//!
//! Demonstrates using bevy_devconsole with stdin/stdout for headless applications
//! like dedicated servers.
//!
//! Run with: `cargo run --example terminal --features terminal`
//!
//! Commands:
//! - `help` - List available commands
//! - `list` - List available variables
//! - `sv_gravity` - Query the gravity value
//! - `sv_gravity 1000` - Set gravity to 1000
//! - `status` - Show server status
//! - `quit` - Exit the application

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bevy::prelude::*;
use bevy_devconsole::{Console, ConsolePlugin, TerminalConfig};

/// Set by the `quit` command.
#[derive(Resource, Clone, Default)]
struct QuitRequested(Arc<AtomicBool>);

fn main() {
    println!("=== Terminal Console Example ===");
    println!("Type commands and press Enter. Type 'quit' to exit.");
    println!();

    // Ensure output is flushed before starting the app
    use std::io::Write;
    let _ = std::io::stdout().flush();

    App::new()
        .add_plugins(MinimalPlugins)
        .add_plugins(ConsolePlugin)
        .insert_resource(TerminalConfig { colored: true })
        .init_resource::<QuitRequested>()
        .add_systems(Startup, setup)
        .add_systems(Update, exit_on_quit)
        .run();
}

fn setup(mut console: ResMut<Console>, quit: Res<QuitRequested>) {
    let cvars = console.cvars_mut();
    for result in [
        cvars.register("sv_gravity", 800.0f32).map(|_| ()),
        cvars.register("sv_maxplayers", 32i32).map(|_| ()),
        cvars.register("sv_hostname", "My Server".to_string()).map(|_| ()),
    ] {
        if let Err(e) = result {
            warn!("{}", e);
        }
    }

    let commands = console.commands_mut();
    commands.register("status", |_args, ctx| {
        let cvars = ctx.cvars();
        let hostname: String = cvars.lookup("sv_hostname").unwrap_or_default();
        let maxplayers: i32 = cvars.lookup("sv_maxplayers").unwrap_or(0);
        let gravity: f32 = cvars.lookup("sv_gravity").unwrap_or(0.0);

        format!(
            "=== Status ===\nHostname: {}\nMax Players: {}\nGravity: {}\n",
            hostname, maxplayers, gravity
        )
    });

    commands.register("say", |args, _ctx| {
        if args.is_empty() {
            "Usage: say <message>\n".to_string()
        } else {
            format!("[SERVER] {}\n", args.join(" "))
        }
    });

    let flag = quit.0.clone();
    commands.register("quit", move |_args, _ctx| {
        flag.store(true, Ordering::SeqCst);
        "Bye!\n".to_string()
    });
}

fn exit_on_quit(quit: Res<QuitRequested>, mut exit: MessageWriter<AppExit>) {
    if quit.0.load(Ordering::SeqCst) {
        exit.write(AppExit::Success);
    }
}
