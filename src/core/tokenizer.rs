//! Tokenizer for console input lines.
//!
//! A line is one expression: a token followed by whitespace-separated
//! arguments. There is no quoting, escaping, or nesting.

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleExpression<'a> {
    /// The command or variable name (first word).
    pub token: &'a str,
    /// The remaining words, in order.
    pub arguments: Vec<&'a str>,
}

impl ConsoleExpression<'_> {
    /// Rejoin the arguments with single spaces.
    ///
    /// Runs of whitespace in the original line collapse to one space.
    pub fn joined_arguments(&self) -> String {
        self.arguments.join(" ")
    }
}

/// Tokenize an input line.
///
/// Returns `None` if the line is empty or only whitespace.
///
/// # Examples
///
/// ```
/// use bevy_devconsole::core::tokenize;
///
/// let expr = tokenize("  echo   hello    world ").unwrap();
/// assert_eq!(expr.token, "echo");
/// assert_eq!(expr.arguments, vec!["hello", "world"]);
///
/// assert!(tokenize("   ").is_none());
/// ```
pub fn tokenize(input: &str) -> Option<ConsoleExpression<'_>> {
    let mut words = input.split_whitespace();
    let token = words.next()?;

    Some(ConsoleExpression {
        token,
        arguments: words.collect(),
    })
}
