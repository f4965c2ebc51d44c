//! Core tag domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, UserId};

/// A validated, non-empty tag name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct TagName(String);

impl TagName {
    /// Create a tag name.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategoryName] if `name` is an empty string.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a tag name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the non-empty
    /// invariant is violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for TagName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for TagName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TagName::new(s)
    }
}

impl Display for TagName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The record kind a tag categorizes.
///
/// Each kind keeps its own vocabulary: an income category named "Parts" is
/// distinct from an inventory category named "Parts".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagKind {
    Income,
    Expense,
    Inventory,
}

impl TagKind {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Inventory => "inventory",
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
            Self::Inventory => "Inventory",
        }
    }
}

/// A category label scoped to one user and one record kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Hash)]
pub struct Tag {
    pub user_id: UserId,
    pub kind: TagKind,
    pub name: TagName,
}

#[cfg(test)]
mod tag_name_tests {
    use crate::Error;

    use super::TagName;

    #[test]
    fn new_fails_on_empty_string() {
        let tag_name = TagName::new("");

        assert_eq!(tag_name, Err(Error::EmptyCategoryName));
    }

    #[test]
    fn new_fails_on_just_whitespace() {
        let tag_name = TagName::new("\n\t \r");

        assert_eq!(tag_name, Err(Error::EmptyCategoryName));
    }

    #[test]
    fn new_trims_surrounding_whitespace() {
        let tag_name = TagName::new("  Consulting  ").unwrap();

        assert_eq!(tag_name.as_ref(), "Consulting");
    }

    #[test]
    fn new_succeeds_on_non_empty_string() {
        let tag_name = TagName::new("🔥");

        assert!(tag_name.is_ok())
    }
}
