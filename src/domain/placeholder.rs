use std::fmt;

/// The placeholder names recognized inside request documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderKind {
    Fullname,
    Address,
    RandomText,
}

impl PlaceholderKind {
    pub const ALL: [PlaceholderKind; 3] = [
        PlaceholderKind::Fullname,
        PlaceholderKind::Address,
        PlaceholderKind::RandomText,
    ];

    /// Canonical name, also used as the CSV column name.
    pub fn as_str(self) -> &'static str {
        match self {
            PlaceholderKind::Fullname => "fullname",
            PlaceholderKind::Address => "address",
            PlaceholderKind::RandomText => "random-text",
        }
    }

    /// Exact match only: `" fullname"` or `"Fullname"` are ordinary strings.
    pub fn from_placeholder(value: &str) -> Option<Self> {
        match value {
            "fullname" => Some(PlaceholderKind::Fullname),
            "address" => Some(PlaceholderKind::Address),
            "random-text" => Some(PlaceholderKind::RandomText),
            _ => None,
        }
    }
}

impl fmt::Display for PlaceholderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
