//! Core console types.
//!
//! This module provides the fundamental building blocks:
//! - [`Console`] - Evaluator owning the registries and the scrollback
//! - [`CVarRegistry`] - Typed, string-backed console variables
//! - [`CVar`] - Typed accessor handle for one variable
//! - [`CommandRegistry`] - Console commands and the built-ins
//! - [`CVarDescriptor`] - Declarative variable registration
//! - [`tokenize`] - Input line tokenizer
//! - Messages for communication with the host

mod error;
mod value;
mod cvar;
mod cvar_registry;
mod declare;
mod command;
mod tokenizer;
mod scrollback;
mod events;
mod console;

pub use error::{ConsoleError, ConsoleResult};
pub use value::{canonical, CVarType, CVarValue, ConversionTable, ParseFn};
pub use cvar::{CVar, CVarCell, CVarGetter, CVarSetter};
pub use cvar_registry::CVarRegistry;
pub use declare::{CVarDescriptor, DeclaredReport, DescriptorBinding};
pub use command::{CommandArgs, CommandContext, CommandHandler, CommandRegistry};
pub use tokenizer::{tokenize, ConsoleExpression};
pub use scrollback::{Scrollback, ScrollbackMark};
pub use events::{ConsoleClearEvent, ConsoleEventsPlugin, ConsoleInputEvent, ConsoleOutputEvent};
pub use console::{Console, ConsoleConfig, LineOutput};
