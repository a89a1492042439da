use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// A name qualified by a namespace index, written `<namespace>:<name>`.
///
/// Namespace 0 is omitted when formatting and optional when parsing, so `FolderType` and
/// `0:FolderType` are the same name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct QualifiedName {
    pub namespace_index: u16,
    pub name: String,
}

impl QualifiedName {
    pub fn new(namespace_index: u16, name: impl Into<String>) -> Self {
        Self {
            namespace_index,
            name: name.into(),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.namespace_index {
            0 => write!(f, "{}", self.name),
            ns => write!(f, "{ns}:{}", self.name),
        }
    }
}

impl FromStr for QualifiedName {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // A prefix that is not a namespace index belongs to the name itself (e.g. `urn:x`)
        if let Some((namespace, name)) = s.split_once(':')
            && let Ok(namespace) = namespace.parse::<u16>()
        {
            return Ok(Self::new(namespace, name));
        }

        Ok(Self::new(0, s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_zero_is_omitted() {
        assert_eq!(QualifiedName::new(1, "TestName").to_string(), "1:TestName");
        assert_eq!(QualifiedName::new(0, "TestName").to_string(), "TestName");
    }

    #[test]
    fn parses_with_and_without_namespace() {
        assert_eq!(
            "1:SomeName".parse::<QualifiedName>().unwrap(),
            QualifiedName::new(1, "SomeName")
        );
        assert_eq!(
            "NoNamespace".parse::<QualifiedName>().unwrap(),
            QualifiedName::new(0, "NoNamespace")
        );
        assert_eq!(
            "urn:thing".parse::<QualifiedName>().unwrap(),
            QualifiedName::new(0, "urn:thing")
        );
    }
}
