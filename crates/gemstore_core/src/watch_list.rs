use std::collections::BTreeSet;

use crate::ItemRecord;

const COMMENT_PREFIX: char = '#';

/// Item names the user wants to hear about. Matching is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DesiredItemList {
    names: BTreeSet<String>,
}

impl DesiredItemList {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Parses a newline-delimited watch list. Blank lines and `#` comments are dropped.
    pub fn parse(text: &str) -> Self {
        Self::new(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with(COMMENT_PREFIX)),
        )
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

/// Discounted records the user asked for, in discounted-list order.
pub fn match_desired(desired: &DesiredItemList, discounted: &[ItemRecord]) -> Vec<ItemRecord> {
    if desired.is_empty() {
        return Vec::new();
    }
    discounted
        .iter()
        .filter(|record| desired.contains(&record.name))
        .cloned()
        .collect()
}
