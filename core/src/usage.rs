//! Usage text rendering over registry metadata.
//!
//! Pure formatting: reads descriptor names, patterns, and
//! [`OptionHelp`](crate::OptionHelp); never touches a subject.

use std::io;

use crate::registry::OptionDescriptor;
use crate::{ParserConfig, Registry};

const DEFAULT_PLACEHOLDER: &str = "VALUE";

/// Renders the option list of a [`Registry`].
///
/// # Examples
///
/// ```
/// use argmap_core::{OptionSpec, Registry, Usage};
///
/// #[derive(Default)]
/// struct Args {
///     file: Option<String>,
/// }
///
/// let registry = Registry::new(vec![
///     OptionSpec::optional("file", |a: &mut Args| &mut a.file)
///         .names(["file", "f"])
///         .placeholder("FILE")
///         .description("Input file."),
/// ])
/// .unwrap();
///
/// let text = Usage::new(&registry).styled(false).render();
/// assert_eq!(
///     text,
///     "Options\n\n  --file FILE\n  -f FILE\n\n    Input file.\n\n"
/// );
/// ```
pub struct Usage<'r, T> {
    registry: &'r Registry<T>,
    header: Option<String>,
    styled: bool,
}

impl<'r, T> Usage<'r, T> {
    /// A renderer with no header and ANSI styling enabled.
    pub fn new(registry: &'r Registry<T>) -> Self {
        Self {
            registry,
            header: None,
            styled: true,
        }
    }

    /// A renderer using the header and styling from `config`.
    pub fn from_config(registry: &'r Registry<T>, config: &ParserConfig) -> Self {
        Self {
            registry,
            header: config.usage_header.clone(),
            styled: config.styled_usage,
        }
    }

    /// Text printed before the option list, followed by a blank line.
    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    /// Enables or disables ANSI bold and underline.
    pub fn styled(mut self, styled: bool) -> Self {
        self.styled = styled;
        self
    }

    /// Renders the full usage text.
    pub fn render(&self) -> String {
        let mut out = String::new();

        if let Some(ref header) = self.header {
            out.push_str(&format!("{header}\n\n"));
        }

        if !self.registry.is_empty() {
            out.push_str(&format!("{}\n\n", self.bold("Options")));
        }

        for descriptor in self.registry.descriptors() {
            self.render_option(&mut out, descriptor);
        }

        out
    }

    /// Writes the rendered text to `out`.
    pub fn write_to<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(self.render().as_bytes())
    }

    fn render_option(&self, out: &mut String, descriptor: &OptionDescriptor<T>) {
        let mut lines: Vec<String> = descriptor
            .all_names()
            .map(|name| {
                let prefix = if name.chars().count() == 1 { "-" } else { "--" };
                format!("{prefix}{name}")
            })
            .collect();
        if let Some(pattern) = descriptor.pattern() {
            lines.push(format!("--/{pattern}/"));
        }
        if let Some(pattern) = descriptor.short_pattern() {
            lines.push(format!("-/{pattern}/"));
        }

        let placeholder = descriptor
            .takes_value()
            .then(|| {
                descriptor
                    .help()
                    .placeholder
                    .as_deref()
                    .filter(|p| !p.is_empty())
                    .unwrap_or(DEFAULT_PLACEHOLDER)
            });

        for line in &lines {
            out.push_str("  ");
            out.push_str(&self.bold(line));
            if let Some(placeholder) = placeholder {
                out.push(' ');
                out.push_str(&self.underline(placeholder));
            }
            out.push('\n');
        }

        let help = descriptor.help();
        if let Some(description) = help.description.as_deref().filter(|d| !d.is_empty()) {
            out.push_str(&format!("\n    {description}\n"));
        }
        if let Some(default) = help.default_value.as_deref().filter(|d| !d.is_empty()) {
            out.push_str(&format!("\n    Default: {default}\n"));
        }

        out.push('\n');
    }

    fn bold(&self, text: &str) -> String {
        if self.styled {
            format!("\x1b[1m{text}\x1b[22m")
        } else {
            text.to_string()
        }
    }

    fn underline(&self, text: &str) -> String {
        if self.styled {
            format!("\x1b[4m{text}\x1b[24m")
        } else {
            text.to_string()
        }
    }
}
