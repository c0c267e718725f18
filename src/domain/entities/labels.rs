use derive_more::Display;

/// A label that does not name any variant of the enum it was parsed into.
#[derive(Debug, Clone, PartialEq, Display)]
#[display("unknown {kind} '{value}'")]
pub struct UnknownLabel {
    pub kind: &'static str,
    pub value: String,
}

impl std::error::Error for UnknownLabel {}

/// Labels compare case-insensitively and ignore spaces, hyphens and underscores,
/// so "In Progress", "in-progress" and "InProgress" are the same status.
pub fn normalize_label(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Declares a closed set of variants stored and transmitted by display label.
macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) {
            $($variant:ident => $label:literal),+ $(,)?
        }
        default = $default:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant),+
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::domain::entities::labels::UnknownLabel;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = $crate::domain::entities::labels::normalize_label(s);
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| $crate::domain::entities::labels::normalize_label(v.as_str()) == wanted)
                    .ok_or_else(|| $crate::domain::entities::labels::UnknownLabel {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(::serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use labelled_enum;
