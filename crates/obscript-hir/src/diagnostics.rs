//! Diagnostics for a file: syntax errors plus database-level checks.

use obscript_syntax::{ParseError, Severity};
use text_size::TextRange;

/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticSeverity {
    /// Error - the script will not compile.
    Error,
    /// Warning - potential issue.
    Warning,
}

/// A diagnostic code identifying the type of diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    /// A syntax error reported by the parser.
    SyntaxError,
    /// A suspicious construct reported by the parser.
    SyntaxWarning,
    /// Two open files declare the same script name.
    DuplicateScriptName,
}

impl DiagnosticCode {
    /// Returns the string code (e.g., "E101").
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::SyntaxError => "E001",
            Self::SyntaxWarning => "W001",
            Self::DuplicateScriptName => "E101",
        }
    }

    /// Returns the default severity for this diagnostic code.
    #[must_use]
    pub fn severity(&self) -> DiagnosticSeverity {
        match self {
            Self::SyntaxError | Self::DuplicateScriptName => DiagnosticSeverity::Error,
            Self::SyntaxWarning => DiagnosticSeverity::Warning,
        }
    }
}

/// Related information for a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    /// The location of the related information.
    pub range: TextRange,
    /// The message.
    pub message: String,
}

/// A diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The diagnostic code.
    pub code: DiagnosticCode,
    /// The severity level.
    pub severity: DiagnosticSeverity,
    /// The source range where the diagnostic applies.
    pub range: TextRange,
    /// The diagnostic message.
    pub message: String,
    /// Related information (e.g., "also declared here").
    pub related: Vec<RelatedInfo>,
}

impl Diagnostic {
    /// Creates a new diagnostic with the code's default severity.
    pub fn new(code: DiagnosticCode, range: TextRange, message: impl Into<String>) -> Self {
        Self {
            severity: code.severity(),
            code,
            range,
            message: message.into(),
            related: Vec::new(),
        }
    }

    /// Adds related information to the diagnostic.
    #[must_use]
    pub fn with_related(mut self, range: TextRange, message: impl Into<String>) -> Self {
        self.related.push(RelatedInfo {
            range,
            message: message.into(),
        });
        self
    }

    /// Returns true if this is an error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }
}

impl From<&ParseError> for Diagnostic {
    fn from(error: &ParseError) -> Self {
        let code = match error.severity {
            Severity::Error => DiagnosticCode::SyntaxError,
            Severity::Warning => DiagnosticCode::SyntaxWarning,
        };
        Diagnostic::new(code, error.range, error.message.clone())
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let severity = match self.severity {
            DiagnosticSeverity::Error => "error",
            DiagnosticSeverity::Warning => "warning",
        };
        write!(
            f,
            "{severity}[{}]: {} (at {}..{})",
            self.code.code(),
            self.message,
            u32::from(self.range.start()),
            u32::from(self.range.end())
        )
    }
}
