//! Identifier and validated scalar types for the synchronisation domain.
//!
//! [`TaskId`] doubles as the identity codec: it is embedded in remote issue
//! titles and recovered from arbitrary text with [`TaskId::decode`].

use super::SyncDomainError;
use std::fmt;
use std::str::FromStr;

/// Number of digits in the numeric part of a task identifier.
const TASK_NUMBER_DIGITS: usize = 3;

/// Largest numeric part representable with [`TASK_NUMBER_DIGITS`] digits.
const MAX_TASK_NUMBER: u16 = 999;

/// Work-stream prefix of a task identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskPrefix {
    /// Main product stream.
    Smk,
    /// Planning-system stream.
    Ps,
    /// Time-boxed investigation.
    Spike,
    /// Urgent production fix.
    Hotfix,
}

impl TaskPrefix {
    /// All prefixes accepted by the identity grammar.
    pub const ALL: [Self; 4] = [Self::Smk, Self::Ps, Self::Spike, Self::Hotfix];

    /// Returns the prefix as written in identifiers.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Smk => "SMK",
            Self::Ps => "PS",
            Self::Spike => "SPIKE",
            Self::Hotfix => "HOTFIX",
        }
    }

    /// Splits a known prefix off the start of `candidate`.
    fn strip(candidate: &str) -> Option<(Self, &str)> {
        Self::ALL.into_iter().find_map(|prefix| {
            candidate
                .strip_prefix(prefix.as_str())
                .map(|rest| (prefix, rest))
        })
    }
}

impl fmt::Display for TaskPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier shared by a local task record and its remote issue.
///
/// The textual form is `PREFIX-NNN[LETTER]`, for example `SMK-010` or
/// `HOTFIX-002B`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId {
    prefix: TaskPrefix,
    number: u16,
    suffix: Option<char>,
}

impl TaskId {
    /// Creates a task identifier from validated components.
    ///
    /// # Errors
    ///
    /// Returns [`SyncDomainError::InvalidTaskId`] when the number needs more
    /// than three digits or the suffix is not an uppercase ASCII letter.
    pub fn new(
        prefix: TaskPrefix,
        number: u16,
        suffix: Option<char>,
    ) -> Result<Self, SyncDomainError> {
        let suffix_is_valid = suffix.is_none_or(|letter| letter.is_ascii_uppercase());
        if number > MAX_TASK_NUMBER || !suffix_is_valid {
            let rendered_suffix = suffix.map(String::from).unwrap_or_default();
            return Err(SyncDomainError::InvalidTaskId(format!(
                "{prefix}-{number:03}{rendered_suffix}"
            )));
        }
        Ok(Self {
            prefix,
            number,
            suffix,
        })
    }

    /// Finds the first task identifier embedded in `text`.
    ///
    /// A match must start at a word boundary and carry exactly three digits.
    /// Text without a well-formed identifier yields `None`.
    #[must_use]
    pub fn decode(text: &str) -> Option<Self> {
        let mut previous: Option<char> = None;
        for (offset, current) in text.char_indices() {
            let at_boundary = previous.is_none_or(|prev| !prev.is_alphanumeric());
            previous = Some(current);
            if !at_boundary || !current.is_ascii_uppercase() {
                continue;
            }
            if let Some(found) = text.get(offset..).and_then(Self::match_at) {
                return Some(found);
            }
        }
        None
    }

    /// Formats the identifier for embedding in issue titles.
    #[must_use]
    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Returns the work-stream prefix.
    #[must_use]
    pub const fn prefix(&self) -> TaskPrefix {
        self.prefix
    }

    /// Returns the numeric part.
    #[must_use]
    pub const fn number(&self) -> u16 {
        self.number
    }

    /// Returns the optional trailing letter.
    #[must_use]
    pub const fn suffix(&self) -> Option<char> {
        self.suffix
    }

    /// Matches an identifier anchored at the start of `candidate`.
    fn match_at(candidate: &str) -> Option<Self> {
        let (prefix, after_prefix) = TaskPrefix::strip(candidate)?;
        let mut chars = after_prefix.strip_prefix('-')?.chars();

        let mut number: u16 = 0;
        for _ in 0..TASK_NUMBER_DIGITS {
            let digit = chars.next()?.to_digit(10)?;
            number = number * 10 + u16::try_from(digit).ok()?;
        }

        let suffix = match chars.next() {
            Some(next) if next.is_ascii_digit() => return None,
            Some(next) if next.is_ascii_uppercase() => Some(next),
            _ => None,
        };
        Some(Self {
            prefix,
            number,
            suffix,
        })
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:03}", self.prefix, self.number)?;
        if let Some(letter) = self.suffix {
            write!(f, "{letter}")?;
        }
        Ok(())
    }
}

impl FromStr for TaskId {
    type Err = SyncDomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::match_at(trimmed)
            .filter(|candidate| candidate.to_string() == trimmed)
            .ok_or_else(|| SyncDomainError::InvalidTaskId(value.to_owned()))
    }
}

/// Positive issue number from the remote tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IssueNumber(u64);

impl IssueNumber {
    /// Creates a validated issue number.
    ///
    /// # Errors
    ///
    /// Returns [`SyncDomainError::InvalidIssueNumber`] when the value is zero.
    pub const fn new(value: u64) -> Result<Self, SyncDomainError> {
        if value == 0 {
            return Err(SyncDomainError::InvalidIssueNumber(value));
        }
        Ok(Self(value))
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for IssueNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Normalized remote repository identifier in `owner/repo` format.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryFullName(String);

impl RepositoryFullName {
    /// Creates a validated repository name.
    ///
    /// # Errors
    ///
    /// Returns [`SyncDomainError::InvalidRepository`] if the value does not
    /// contain exactly one slash-delimited owner and repository segment.
    pub fn new(value: impl Into<String>) -> Result<Self, SyncDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        let mut segments = normalized.split('/');
        let owner = segments.next().unwrap_or_default();
        let repo = segments.next().unwrap_or_default();
        let has_more_segments = segments.next().is_some();
        let is_valid = !owner.is_empty()
            && !repo.is_empty()
            && !has_more_segments
            && !normalized.chars().any(char::is_whitespace);

        if !is_valid {
            return Err(SyncDomainError::InvalidRepository(raw));
        }

        Ok(Self(normalized.to_owned()))
    }

    /// Returns the repository name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for RepositoryFullName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for RepositoryFullName {
    type Err = SyncDomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::new(value)
    }
}

impl fmt::Display for RepositoryFullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Number of issues requested per listing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageSize(u32);

impl PageSize {
    /// Largest page the tracker serves in one response.
    pub const MAX: u32 = 100;

    /// Creates a validated page size.
    ///
    /// # Errors
    ///
    /// Returns [`SyncDomainError::InvalidPageSize`] for zero or values above
    /// [`PageSize::MAX`].
    pub const fn new(value: u32) -> Result<Self, SyncDomainError> {
        if value == 0 || value > Self::MAX {
            return Err(SyncDomainError::InvalidPageSize(value));
        }
        Ok(Self(value))
    }

    /// Returns the page size.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(Self::MAX)
    }
}

impl FromStr for PageSize {
    type Err = SyncDomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parsed = value
            .trim()
            .parse::<u32>()
            .map_err(|_| SyncDomainError::InvalidPageSize(0))?;
        Self::new(parsed)
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
