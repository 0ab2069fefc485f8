//! Minimal headless console example.
//!
//! Demonstrates using bevy_devconsole programmatically without any UI.
//! Useful for testing or custom UI implementations.
//!
//! Run with: `cargo run --example minimal`

use bevy::prelude::*;
use bevy_devconsole::prelude::*;

fn main() {
    App::new()
        .add_plugins(MinimalPlugins)
        .add_plugins(ConsolePlugin)
        .add_systems(Startup, setup)
        .add_systems(Update, process_outputs)
        .add_systems(Update, send_test_commands.run_if(run_once))
        .run();
}

fn setup(mut console: ResMut<Console>) {
    // Register a simple cvar
    if let Err(e) = console.cvars_mut().register("sv_gravity", 800.0f32) {
        warn!("{}", e);
    }

    // Register a command
    console.commands_mut().register("greet", |args, _ctx| {
        format!("Hello, {}!\n", args.get_or(0, "World"))
    });

    println!("Console initialized. Registered: sv_gravity, greet");
}

/// Send some test commands programmatically.
fn send_test_commands(mut events: MessageWriter<ConsoleInputEvent>) {
    println!("\n--- Sending test commands ---");

    // Query a variable
    events.write(ConsoleInputEvent::new("sv_gravity"));

    // Set a variable
    events.write(ConsoleInputEvent::new("sv_gravity 1000"));
    events.write(ConsoleInputEvent::new("sv_gravity heavy"));
    events.write(ConsoleInputEvent::new("sv_gravity"));

    // Run commands
    events.write(ConsoleInputEvent::new("greet Developer"));
    events.write(ConsoleInputEvent::new("list"));
    events.write(ConsoleInputEvent::new("frobnicate"));
}

/// Print console output messages.
fn process_outputs(mut events: MessageReader<ConsoleOutputEvent>) {
    for event in events.read() {
        print!("{}", event.text);
    }
}
