use std::fmt;

use regex::Regex;
use tracing::warn;

use crate::error::{Result, SigformError};

/// Which profile document a record belongs to.
///
/// The two documents share their list shape and differ only in element
/// names and per-record attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocKind {
    Signatures,
    Texts,
}

impl DocKind {
    /// File name under the profile directory.
    pub fn file_name(self) -> &'static str {
        match self {
            DocKind::Signatures => "signatures.xml",
            DocKind::Texts => "texts.xml",
        }
    }

    /// Document element name. Carries no attributes.
    pub fn root_element(self) -> &'static str {
        match self {
            DocKind::Signatures => "signatures",
            DocKind::Texts => "texts",
        }
    }

    /// Per-record element name.
    pub fn item_element(self) -> &'static str {
        match self {
            DocKind::Signatures => "signature",
            DocKind::Texts => "text",
        }
    }
}

impl fmt::Display for DocKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.root_element())
    }
}

/// Scopes a signature to the accounts it applies to.
///
/// `Account` compares the account name verbatim. `Pattern` holds a regular
/// expression matched against the whole account name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AccountFilter {
    /// Applies to every account.
    #[default]
    Any,
    Account(String),
    Pattern(String),
}

impl AccountFilter {
    /// Whether a signature carrying this filter applies to `account`.
    ///
    /// A stored pattern that no longer compiles matches nothing; the record
    /// itself stays intact and editable.
    pub fn matches(&self, account: &str) -> bool {
        match self {
            AccountFilter::Any => true,
            AccountFilter::Account(name) => name == account,
            AccountFilter::Pattern(pattern) => match compile_filter(pattern) {
                Ok(re) => re.is_match(account),
                Err(err) => {
                    warn!(%pattern, %err, "account pattern does not compile, matching nothing");
                    false
                }
            },
        }
    }
}

impl fmt::Display for AccountFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountFilter::Any => Ok(()),
            AccountFilter::Account(name) => f.write_str(name),
            AccountFilter::Pattern(pattern) => write!(f, "/{pattern}/"),
        }
    }
}

/// Compiles an account pattern anchored to the whole account name.
fn compile_filter(pattern: &str) -> std::result::Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{pattern})$"))
}

/// A record in one of the two profile documents.
///
/// Implementations map themselves onto the wire shape (attribute pairs plus
/// a text body) without touching markup; the codec owns all escaping and
/// structure.
pub trait Record: Clone + PartialEq + fmt::Debug {
    const KIND: DocKind;

    /// Fresh record backing a create draft. Blank, so it fails validation
    /// until the caller fills in a name.
    fn blank() -> Self;

    fn name(&self) -> &str;

    fn body(&self) -> &str;

    /// Attributes in serialization order.
    fn attributes(&self) -> Vec<(&'static str, String)>;

    /// Rebuilds a record from parsed attributes and body text. Rejects
    /// unknown or missing attributes.
    fn from_parts(attrs: Vec<(String, String)>, body: String) -> Result<Self>;

    /// Commit-time validation.
    fn validate(&self) -> Result<()>;
}

/// A mail signature.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub account: AccountFilter,
    pub is_default: bool,
    pub body: String,
}

impl Signature {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Signature {
            name: name.into(),
            account: AccountFilter::Any,
            is_default: false,
            body: body.into(),
        }
    }

    pub fn with_account(mut self, account: AccountFilter) -> Self {
        self.account = account;
        self
    }

    pub fn with_default(mut self, is_default: bool) -> Self {
        self.is_default = is_default;
        self
    }

    /// Whether this signature applies to `account`.
    pub fn matches_account(&self, account: &str) -> bool {
        self.account.matches(account)
    }
}

impl Record for Signature {
    const KIND: DocKind = DocKind::Signatures;

    fn blank() -> Self {
        Signature::default()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn body(&self) -> &str {
        &self.body
    }

    fn attributes(&self) -> Vec<(&'static str, String)> {
        let mut attrs = vec![("name", self.name.clone())];
        match &self.account {
            AccountFilter::Any => {}
            AccountFilter::Account(name) => attrs.push(("account", name.clone())),
            AccountFilter::Pattern(pattern) => {
                attrs.push(("account", pattern.clone()));
                attrs.push(("match", "regex".to_string()));
            }
        }
        if self.is_default {
            attrs.push(("default", "true".to_string()));
        }
        attrs
    }

    fn from_parts(attrs: Vec<(String, String)>, body: String) -> Result<Self> {
        let mut name = None;
        let mut account = None;
        let mut is_regex = None;
        let mut is_default = false;
        for (key, value) in attrs {
            match key.as_str() {
                "name" => name = Some(value),
                "account" => account = Some(value),
                "match" => match value.as_str() {
                    "regex" => is_regex = Some(true),
                    "literal" => is_regex = Some(false),
                    other => {
                        return Err(SigformError::Malformed(format!(
                            "unknown match mode '{other}' on <signature>"
                        )))
                    }
                },
                // Only exactly "true" marks the default signature.
                "default" => is_default = value == "true",
                other => {
                    return Err(SigformError::Malformed(format!(
                        "unknown attribute '{other}' on <signature>"
                    )))
                }
            }
        }
        let name = name.ok_or_else(|| {
            SigformError::Malformed("missing 'name' attribute on <signature>".to_string())
        })?;
        let account = match (account, is_regex) {
            (Some(value), Some(true)) => AccountFilter::Pattern(value),
            (Some(value), _) => AccountFilter::Account(value),
            (None, None) => AccountFilter::Any,
            (None, Some(_)) => {
                return Err(SigformError::Malformed(
                    "'match' attribute without 'account' on <signature>".to_string(),
                ))
            }
        };
        Ok(Signature {
            name,
            account,
            is_default,
            body,
        })
    }

    fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(SigformError::MissingName);
        }
        if let AccountFilter::Pattern(pattern) = &self.account {
            compile_filter(pattern).map_err(|source| SigformError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

/// A reusable fixed-form text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedText {
    pub name: String,
    pub body: String,
}

impl FixedText {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        FixedText {
            name: name.into(),
            body: body.into(),
        }
    }
}

impl Record for FixedText {
    const KIND: DocKind = DocKind::Texts;

    fn blank() -> Self {
        FixedText::default()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn body(&self) -> &str {
        &self.body
    }

    fn attributes(&self) -> Vec<(&'static str, String)> {
        vec![("name", self.name.clone())]
    }

    fn from_parts(attrs: Vec<(String, String)>, body: String) -> Result<Self> {
        let mut name = None;
        for (key, value) in attrs {
            match key.as_str() {
                "name" => name = Some(value),
                other => {
                    return Err(SigformError::Malformed(format!(
                        "unknown attribute '{other}' on <text>"
                    )))
                }
            }
        }
        let name = name.ok_or_else(|| {
            SigformError::Malformed("missing 'name' attribute on <text>".to_string())
        })?;
        Ok(FixedText { name, body })
    }

    fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(SigformError::MissingName);
        }
        Ok(())
    }
}
