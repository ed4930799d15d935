use std::fmt;

/// Category of definition a violation was raised against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefinitionKind {
    Comparison,
    Opcode,
    /// A resolved variant of an opcode, identified by its variation index.
    Variant(usize),
}

/// The definition a rule was checked against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subject {
    pub kind: DefinitionKind,
    pub id: String,
}

impl Subject {
    pub fn comparison(id: impl Into<String>) -> Self {
        Self {
            kind: DefinitionKind::Comparison,
            id: id.into(),
        }
    }

    pub fn opcode(id: impl Into<String>) -> Self {
        Self {
            kind: DefinitionKind::Opcode,
            id: id.into(),
        }
    }

    pub fn variant(id: impl Into<String>, variation: usize) -> Self {
        Self {
            kind: DefinitionKind::Variant(variation),
            id: id.into(),
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DefinitionKind::Comparison => write!(f, "comparison '{}'", self.id),
            DefinitionKind::Opcode => write!(f, "opcode '{}'", self.id),
            DefinitionKind::Variant(variation) => {
                write!(f, "opcode '{}' variant {variation}", self.id)
            }
        }
    }
}

/// A single broken rule: the offending definition, a stable rule code, and a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub subject: Subject,
    pub code: &'static str,
    pub message: String,
}

impl Violation {
    pub fn new(subject: Subject, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            subject,
            code,
            message: message.into(),
        }
    }

    pub fn format_human(&self) -> String {
        format!(
            "{subject} [{code}]: {message}",
            subject = self.subject,
            code = self.code,
            message = self.message
        )
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_human())
    }
}
