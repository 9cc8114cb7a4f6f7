//! Candidate name resolution.

use tracing::debug;

use crate::registry::OptionDescriptor;
use crate::{OptionForm, ParseError, Registry};

/// A descriptor matched by a candidate name.
pub struct Resolved<'r, T> {
    pub descriptor: &'r OptionDescriptor<T>,
    /// `true` when the candidate was a generated `no-` alias.
    pub negated: bool,
}

impl<T> Registry<T> {
    /// Maps a candidate name to its descriptor.
    ///
    /// Literal names are checked first across the whole registry in
    /// registration order. Only if none matches are patterns tried, again in
    /// registration order: `pattern` for [`OptionForm::Long`] candidates,
    /// `short_pattern` for [`OptionForm::Short`] ones.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::NoSuchOption`] when nothing matches.
    ///
    /// # Examples
    ///
    /// ```
    /// use argmap_core::{OptionForm, OptionSpec, Registry};
    ///
    /// #[derive(Default)]
    /// struct Args {
    ///     level: Option<i32>,
    /// }
    ///
    /// let registry = Registry::new(vec![
    ///     OptionSpec::optional("level", |a: &mut Args| &mut a.level).short_pattern("[0-9]+"),
    /// ])
    /// .unwrap();
    ///
    /// assert!(registry.resolve("level", OptionForm::Long).is_ok());
    /// assert!(registry.resolve("5", OptionForm::Short).is_ok());
    /// assert!(registry.resolve("5", OptionForm::Long).is_err());
    /// ```
    pub fn resolve(
        &self,
        candidate: &str,
        form: OptionForm,
    ) -> Result<Resolved<'_, T>, ParseError> {
        if let Some(resolved) = self.resolve_literal(candidate) {
            debug!(
                candidate,
                slot = resolved.descriptor.slot(),
                negated = resolved.negated,
                "Resolved option by name"
            );
            return Ok(resolved);
        }

        let matched = self.descriptors().iter().find(|d| match form {
            OptionForm::Long => d.matches_pattern(candidate),
            OptionForm::Short => d.matches_short_pattern(candidate),
        });

        match matched {
            Some(descriptor) => {
                debug!(candidate, %form, slot = descriptor.slot(), "Resolved option by pattern");
                Ok(Resolved {
                    descriptor,
                    negated: false,
                })
            }
            None => Err(ParseError::NoSuchOption {
                name: candidate.to_string(),
                form,
            }),
        }
    }

    fn resolve_literal(&self, candidate: &str) -> Option<Resolved<'_, T>> {
        self.descriptors().iter().find_map(|descriptor| {
            if descriptor.has_name(candidate) {
                Some(Resolved {
                    descriptor,
                    negated: false,
                })
            } else if descriptor.has_opposite_name(candidate) {
                Some(Resolved {
                    descriptor,
                    negated: true,
                })
            } else {
                None
            }
        })
    }
}
