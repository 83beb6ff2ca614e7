use serde::{Deserialize, Serialize};

/// The subset of registered fields a single compile call may touch.
///
/// Names are trimmed and de-duplicated; order is kept because bare-term
/// matches are emitted in this order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllowedFields {
    /// Every registered field, in registration order
    #[default]
    All,
    Only(Vec<String>),
}

impl AllowedFields {
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() || normalized.iter().any(|n| n == name) {
                continue;
            }
            normalized.push(name.to_string());
        }
        AllowedFields::Only(normalized)
    }

    pub fn contains(&self, name: &str) -> bool {
        match self {
            AllowedFields::All => true,
            AllowedFields::Only(names) => names.iter().any(|n| n == name),
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for AllowedFields {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        AllowedFields::only(iter)
    }
}
