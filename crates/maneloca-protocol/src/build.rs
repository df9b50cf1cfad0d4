use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Genome coordinate system a record set was annotated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BuildVersion {
    #[default]
    GRCh37,
    GRCh38,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown genome build '{0}', expected GRCh37 or GRCh38")]
pub struct UnknownBuild(pub String);

impl BuildVersion {
    pub const ALL: [BuildVersion; 2] = [BuildVersion::GRCh37, BuildVersion::GRCh38];

    pub fn name(&self) -> &'static str {
        match self {
            Self::GRCh37 => "GRCh37",
            Self::GRCh38 => "GRCh38",
        }
    }

    /// Lowercase path segment, e.g. `grch38`.
    pub fn route_segment(&self) -> &'static str {
        match self {
            Self::GRCh37 => "grch37",
            Self::GRCh38 => "grch38",
        }
    }

    pub fn from_route_segment(segment: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|version| version.route_segment() == segment)
    }

    /// File name of the annotation resource for this build.
    pub fn resource_name(&self) -> String {
        format!("{}.bed", self.name())
    }
}

impl fmt::Display for BuildVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for BuildVersion {
    type Err = UnknownBuild;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "grch37" | "hg19" | "37" => Ok(Self::GRCh37),
            "grch38" | "hg38" | "38" => Ok(Self::GRCh38),
            _ => Err(UnknownBuild(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_names_and_segments() {
        assert_eq!(BuildVersion::GRCh37.to_string(), "GRCh37");
        assert_eq!(BuildVersion::GRCh38.route_segment(), "grch38");
        assert_eq!(BuildVersion::GRCh38.resource_name(), "GRCh38.bed");
        assert_eq!(BuildVersion::default(), BuildVersion::GRCh37);
    }

    #[test]
    fn test_parse_build_aliases() {
        assert_eq!("GRCh38".parse::<BuildVersion>(), Ok(BuildVersion::GRCh38));
        assert_eq!("hg19".parse::<BuildVersion>(), Ok(BuildVersion::GRCh37));
        let err = "mm10".parse::<BuildVersion>().unwrap_err();
        assert!(err.to_string().contains("mm10"));
    }

    #[test]
    fn test_from_route_segment_is_case_sensitive() {
        assert_eq!(
            BuildVersion::from_route_segment("grch37"),
            Some(BuildVersion::GRCh37)
        );
        assert_eq!(BuildVersion::from_route_segment("GRCh37"), None);
    }

    #[test]
    fn test_serde_uses_display_names() {
        let json = serde_json::to_string(&BuildVersion::GRCh38).unwrap();
        assert_eq!(json, "\"GRCh38\"");
    }
}
