use serde::{Deserialize, Serialize};

/// Three-valued go/no-go outcome.
///
/// Variants are ordered from least to most favourable, so `a < b` means
/// `b` is the better outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Decision {
    #[serde(rename = "NO-GO")]
    NoGo,
    #[serde(rename = "GO WITH CAVEATS")]
    GoWithCaveats,
    #[serde(rename = "GO")]
    Go,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Go => "GO",
            Decision::GoWithCaveats => "GO WITH CAVEATS",
            Decision::NoGo => "NO-GO",
        }
    }

    pub fn is_no_go(&self) -> bool {
        matches!(self, Decision::NoGo)
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
