use std::fmt;

use serde::{Deserialize, Serialize};

/// Phone number in the `+<digits>` form used as the CRM search key.
///
/// Built with [`SearchPhone::normalize`], which never fails. Input without
/// enough digits still yields a value; it just will not match any contact.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchPhone(String);

impl SearchPhone {
    /// Strips every non-digit and prefixes the country code. Ten digits are
    /// taken as a North American number and get `+1`; anything else gets `+`.
    pub fn normalize(raw: &str) -> Self {
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        if digits.len() == 10 {
            Self(format!("+1{digits}"))
        } else {
            Self(format!("+{digits}"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchPhone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
