//! The token-consuming state machine behind [`Registry::parse`].

use tracing::{debug, trace};

use crate::assign::Binding;
use crate::{OptionForm, ParseError, Registry};

const TERMINATOR: &str = "--";

/// How a token is interpreted while option scanning is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    /// Exactly `--`.
    Terminator,
    /// `--name`; the candidate starts at byte 2.
    Long,
    /// `-xyz`; each character from byte 1 on is a candidate.
    ShortBundle,
    Positional,
}

impl TokenKind {
    fn classify(token: &str) -> Self {
        if token == TERMINATOR {
            TokenKind::Terminator
        } else if token.starts_with("--") {
            TokenKind::Long
        } else if token.starts_with('-') && token.len() > 1 {
            TokenKind::ShortBundle
        } else {
            TokenKind::Positional
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Scanning,
    AfterTerminator,
}

/// Per-call state: the cursor, collected positionals, and the mode.
struct ParseState<I> {
    cursor: I,
    positional: Vec<String>,
    mode: Mode,
}

impl<I: Iterator<Item = String>> ParseState<I> {
    fn new(cursor: I) -> Self {
        Self {
            cursor,
            positional: Vec::new(),
            mode: Mode::Scanning,
        }
    }

    /// Switches to [`Mode::AfterTerminator`] and drains the cursor verbatim.
    fn terminate(&mut self) {
        self.mode = Mode::AfterTerminator;
        self.positional.extend(self.cursor.by_ref());
    }
}

impl<T> Registry<T> {
    /// Consumes `tokens`, writing option values into `subject`, and returns
    /// the positional tokens in their original order.
    ///
    /// Tokens are handled left to right:
    ///
    /// - `--` ends option processing; every later token is positional.
    /// - `--name` resolves `name`; a value option takes the next token.
    /// - `-xyz` resolves `x`, `y`, `z` in turn; each value option among them
    ///   takes the next token before the following character is handled.
    /// - Anything else, including a lone `-`, is positional.
    ///
    /// # Errors
    ///
    /// The first failure aborts the parse. Slots written by earlier tokens
    /// keep their new values.
    ///
    /// # Examples
    ///
    /// ```
    /// use argmap_core::{OptionSpec, Registry};
    ///
    /// #[derive(Default)]
    /// struct Args {
    ///     x: bool,
    ///     y: bool,
    ///     name: Option<String>,
    /// }
    ///
    /// let registry = Registry::new(vec![
    ///     OptionSpec::flag("x", |a: &mut Args| &mut a.x),
    ///     OptionSpec::flag("y", |a: &mut Args| &mut a.y),
    ///     OptionSpec::optional("name", |a: &mut Args| &mut a.name),
    /// ])
    /// .unwrap();
    ///
    /// let mut args = Args::default();
    /// let rest = registry
    ///     .parse(&mut args, ["in.txt", "-xy", "--name", "n", "--", "--name"])
    ///     .unwrap();
    ///
    /// assert!(args.x && args.y);
    /// assert_eq!(args.name.as_deref(), Some("n"));
    /// assert_eq!(rest, vec!["in.txt", "--name"]);
    /// ```
    pub fn parse<I, S>(&self, subject: &mut T, tokens: I) -> Result<Vec<String>, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut state = ParseState::new(tokens.into_iter().map(Into::into));

        while state.mode == Mode::Scanning {
            let Some(token) = state.cursor.next() else {
                break;
            };
            let kind = TokenKind::classify(&token);
            trace!(token = %token, ?kind, "Dispatching token");

            match kind {
                TokenKind::Terminator => state.terminate(),
                TokenKind::Long => {
                    self.dispatch(subject, &token[2..], OptionForm::Long, &mut state)?;
                }
                TokenKind::ShortBundle => {
                    let mut buf = [0u8; 4];
                    for c in token[1..].chars() {
                        let candidate = c.encode_utf8(&mut buf);
                        self.dispatch(subject, candidate, OptionForm::Short, &mut state)?;
                    }
                }
                TokenKind::Positional => state.positional.push(token),
            }
        }

        debug!(positional = state.positional.len(), "Parsed command line");
        Ok(state.positional)
    }

    /// Resolves one candidate and applies it, pulling a value token from the
    /// cursor when the descriptor needs one.
    fn dispatch<I>(
        &self,
        subject: &mut T,
        candidate: &str,
        form: OptionForm,
        state: &mut ParseState<I>,
    ) -> Result<(), ParseError>
    where
        I: Iterator<Item = String>,
    {
        let resolved = self.resolve(candidate, form)?;

        match &resolved.descriptor.binding {
            Binding::Flag(setter) => setter.assign(subject, candidate, !resolved.negated),
            Binding::Value { assign, .. } => {
                let raw = state
                    .cursor
                    .next()
                    .ok_or_else(|| ParseError::MissingValue {
                        option: candidate.to_string(),
                    })?;
                assign(subject, candidate, &raw)
            }
        }
    }
}
