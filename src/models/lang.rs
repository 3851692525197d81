//! Page language

use serde::{Deserialize, Serialize};
use std::fmt;

/// Page language. Only `cy` selects Welsh; every other code is English.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Lang {
    #[default]
    #[serde(rename = "en")]
    En,
    #[serde(rename = "cy")]
    Cy,
}

impl Lang {
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        if code == "cy" { Lang::Cy } else { Lang::En }
    }

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Cy => "cy",
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_cy_selects_welsh() {
        assert_eq!(Lang::from_code("cy"), Lang::Cy);
        assert_eq!(Lang::from_code("en"), Lang::En);
        assert_eq!(Lang::from_code("CY"), Lang::En);
        assert_eq!(Lang::from_code(""), Lang::En);
    }
}
