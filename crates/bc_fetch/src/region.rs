use std::fmt;
use std::str::FromStr;

/// Game region. The data repository publishes one version tag per region,
/// at a fixed position in its version list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CountryCode {
    En,
    Jp,
    Kr,
    Tw,
}

/// Sub-locales the EN build ships a dedicated resource pack for.
pub const RES_LOCAL_LANGS: [&str; 5] = ["de", "es", "fr", "it", "th"];

impl CountryCode {
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Jp => "jp",
            Self::Kr => "kr",
            Self::Tw => "tw",
        }
    }

    /// Position of this region's version tag in `latest.txt`.
    pub fn version_index(self) -> usize {
        match self {
            Self::En => 0,
            Self::Jp => 1,
            Self::Kr => 2,
            Self::Tw => 3,
        }
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CountryCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "jp" => Ok(Self::Jp),
            "kr" => Ok(Self::Kr),
            "tw" => Ok(Self::Tw),
            other => Err(format!("unknown region '{other}', expected en/jp/kr/tw")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_index_is_positional() {
        assert_eq!(CountryCode::En.version_index(), 0);
        assert_eq!(CountryCode::Jp.version_index(), 1);
        assert_eq!(CountryCode::Kr.version_index(), 2);
        assert_eq!(CountryCode::Tw.version_index(), 3);
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("JP".parse::<CountryCode>().unwrap(), CountryCode::Jp);
        assert!("us".parse::<CountryCode>().is_err());
    }
}
