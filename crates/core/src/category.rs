use serde::{Deserialize, Serialize};

/// Closed set of spending categories. Values outside this set are not an
/// error at the boundary — they signal that the category must be inferred
/// from the item name instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Grocery,
    Household,
    Electronics,
    Entertainment,
    Transport,
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Grocery,
        Category::Household,
        Category::Electronics,
        Category::Entertainment,
        Category::Transport,
        Category::Other,
    ];
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Grocery => write!(f, "grocery"),
            Category::Household => write!(f, "household"),
            Category::Electronics => write!(f, "electronics"),
            Category::Entertainment => write!(f, "entertainment"),
            Category::Transport => write!(f, "transport"),
            Category::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "grocery" => Ok(Category::Grocery),
            "household" => Ok(Category::Household),
            "electronics" => Ok(Category::Electronics),
            "entertainment" => Ok(Category::Entertainment),
            "transport" => Ok(Category::Transport),
            "other" => Ok(Category::Other),
            other => Err(format!("Unknown category: '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn category_roundtrip() {
        for cat in Category::ALL {
            assert_eq!(Category::from_str(&cat.to_string()).unwrap(), cat);
        }
    }

    #[test]
    fn unknown_category_is_err() {
        assert!(Category::from_str("snacks").is_err());
        assert!(Category::from_str("Grocery").is_err());
        assert!(Category::from_str("").is_err());
    }

    #[test]
    fn serde_uses_lowercase() {
        assert_eq!(serde_json::to_string(&Category::Grocery).unwrap(), "\"grocery\"");
        let parsed: Category = serde_json::from_str("\"transport\"").unwrap();
        assert_eq!(parsed, Category::Transport);
    }
}
