//! Hardware identifier normalization.

use std::fmt;

/// Number of hex digits in an EUI-48 MAC address.
const MAC_HEX_LEN: usize = 12;

/// Normalized hardware identifier used as the grouping key.
///
/// Lower-case hex digits only, no separators.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HardwareKey(String);

impl HardwareKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Colon separated form, e.g. `aa:bb:cc:dd:ee:ff`.
    pub fn to_colon_form(&self) -> String {
        self.0
            .as_bytes()
            .chunks(2)
            .map(|pair| String::from_utf8_lossy(pair).into_owned())
            .collect::<Vec<_>>()
            .join(":")
    }
}

impl fmt::Display for HardwareKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why a hardware identifier could not be turned into a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyRejection {
    /// Empty or whitespace only.
    Missing,
    /// Present but not a 12 digit hex MAC after normalization.
    Malformed(String),
}

impl fmt::Display for KeyRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyRejection::Missing => write!(f, "missing MAC address"),
            KeyRejection::Malformed(raw) => write!(f, "malformed MAC address '{}'", raw),
        }
    }
}

/// Normalize a raw hardware identifier.
///
/// Strips every non-alphanumeric character and lower-cases the rest.
pub fn normalize(hardware_id: &str) -> Result<HardwareKey, KeyRejection> {
    let trimmed = hardware_id.trim();
    if trimmed.is_empty() {
        return Err(KeyRejection::Missing);
    }

    let normalized: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();

    if normalized.len() != MAC_HEX_LEN || !normalized.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(KeyRejection::Malformed(trimmed.to_string()));
    }

    Ok(HardwareKey(normalized))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separators_and_case_collapse() {
        let a = normalize("AA:BB:CC:DD:EE:FF").unwrap();
        let b = normalize("aabbccddeeff").unwrap();
        let c = normalize("aa-bb-cc-dd-ee-ff").unwrap();
        let d = normalize("AABB.CCDD.EEFF").unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(c, d);
        assert_eq!(a.as_str(), "aabbccddeeff");
    }

    #[test]
    fn test_missing() {
        assert_eq!(normalize(""), Err(KeyRejection::Missing));
        assert_eq!(normalize("   "), Err(KeyRejection::Missing));
    }

    #[test]
    fn test_malformed() {
        assert!(matches!(normalize("aa:bb:cc"), Err(KeyRejection::Malformed(_))));
        assert!(matches!(
            normalize("zz:bb:cc:dd:ee:ff"),
            Err(KeyRejection::Malformed(_))
        ));
        assert!(matches!(normalize("::"), Err(KeyRejection::Malformed(_))));
    }

    #[test]
    fn test_colon_form() {
        let key = normalize("AABBCCDDEEFF").unwrap();
        assert_eq!(key.to_colon_form(), "aa:bb:cc:dd:ee:ff");
    }
}
