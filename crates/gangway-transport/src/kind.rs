//! Transport kind enumeration

use std::fmt;

/// The remote-access mechanisms gangway can speak.
///
/// The set is closed: the embedded transport wire object has exactly one
/// optional sub-block per kind. "No transport configured" is represented by
/// an empty configured set, not by a sentinel member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TransportKind {
    Ssh,
    Kubernetes,
    Nomad,
}

impl TransportKind {
    /// All kinds, in wire-schema order.
    pub const ALL: [TransportKind; 3] = [
        TransportKind::Ssh,
        TransportKind::Kubernetes,
        TransportKind::Nomad,
    ];

    /// The sub-object key for this kind in the embedded transport wire value.
    pub fn key(&self) -> &'static str {
        match self {
            TransportKind::Ssh => "ssh",
            TransportKind::Kubernetes => "kubernetes",
            TransportKind::Nomad => "nomad",
        }
    }

    /// Look a kind up by its wire key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().find(|k| k.key() == key).copied()
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_round_trip() {
        for kind in TransportKind::ALL {
            assert_eq!(TransportKind::from_key(kind.key()), Some(kind));
        }
        assert_eq!(TransportKind::from_key("docker"), None);
    }

    #[test]
    fn test_display_matches_key() {
        assert_eq!(TransportKind::Kubernetes.to_string(), "kubernetes");
    }
}
