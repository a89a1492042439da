use std::fmt;

/// Human readable text with an optional locale.
///
/// The JSON form carries the text only, so values parsed from JSON never have a locale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct LocalizedText {
    pub locale: Option<String>,
    pub text: String,
}

impl LocalizedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            locale: None,
            text: text.into(),
        }
    }

    pub fn with_locale(locale: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            locale: Some(locale.into()),
            text: text.into(),
        }
    }
}

impl From<&str> for LocalizedText {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for LocalizedText {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl fmt::Display for LocalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
