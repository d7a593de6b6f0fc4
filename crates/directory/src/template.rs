use std::fmt;

const PLACEHOLDER: &str = "%s";

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("template {0:?} has no %s placeholder")]
    MissingPlaceholder(String),
    #[error("template {0:?} has more than one %s placeholder")]
    ExtraPlaceholder(String),
}

/// A DN or filter with exactly one `%s` slot for the username.
///
/// The value is inserted verbatim. Usernames must be escaped by the caller
/// (see [`crate::escape()`]) before they reach a filter template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    raw: String,
    slot: usize,
}

impl Template {
    pub fn new(raw: impl Into<String>) -> Result<Self, TemplateError> {
        let raw = raw.into();
        let mut slots = raw.match_indices(PLACEHOLDER).map(|(i, _)| i);

        let Some(slot) = slots.next() else {
            return Err(TemplateError::MissingPlaceholder(raw));
        };
        if slots.next().is_some() {
            return Err(TemplateError::ExtraPlaceholder(raw));
        }

        Ok(Self { raw, slot })
    }

    /// Substitute `value` into the slot.
    #[must_use]
    pub fn fill(&self, value: &str) -> String {
        let (head, tail) = self.raw.split_at(self.slot);
        let tail = &tail[PLACEHOLDER.len()..];

        let mut out = String::with_capacity(head.len() + value.len() + tail.len());
        out.push_str(head);
        out.push_str(value);
        out.push_str(tail);
        out
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl std::str::FromStr for Template {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
