//! Console messages exchanged with the host.
//!
//! - Host -> Console: input lines
//! - Console -> Host: appended output, scrollback clears

use bevy::prelude::*;

/// Message sent when a line is submitted to the console.
///
/// The console system evaluates it with [`Console::process`](super::Console::process).
///
/// # Examples
///
/// ```ignore
/// fn submit_line(mut messages: MessageWriter<ConsoleInputEvent>) {
///     messages.write(ConsoleInputEvent::new("sensitivity 5"));
/// }
/// ```
#[derive(Message, Debug, Clone)]
pub struct ConsoleInputEvent {
    /// The raw input line.
    pub line: String,
}

impl ConsoleInputEvent {
    /// Create a new input message.
    pub fn new(line: impl Into<String>) -> Self {
        Self { line: line.into() }
    }
}

/// Message carrying the text one input line produced.
///
/// Includes the `>line` echo, and is complete even when the scrollback limit
/// dropped part of it. Blank lines produce no message.
#[derive(Message, Debug, Clone)]
pub struct ConsoleOutputEvent {
    /// The appended text.
    pub text: String,
}

impl ConsoleOutputEvent {
    /// Create a new output message.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Message sent when the scrollback was cleared.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct ConsoleClearEvent;

/// Plugin that registers all console messages.
pub struct ConsoleEventsPlugin;

impl Plugin for ConsoleEventsPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<ConsoleInputEvent>()
            .add_message::<ConsoleOutputEvent>()
            .add_message::<ConsoleClearEvent>();
    }
}
