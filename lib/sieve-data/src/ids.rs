use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

macro_rules! define_id {
    ($name:ident, $len:literal, $desc:literal) => {
        #[doc = concat!("A ", $desc, " (", stringify!($len), " bytes).")]
        ///
        /// Serialized as a lowercase hex string. The all-zero identifier is considered empty and serializes as `""`.
        #[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
        pub struct $name([u8; $len]);

        impl $name {
            /// Creates an identifier from raw bytes.
            pub const fn from_bytes(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            /// Returns the raw bytes.
            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            /// Returns `true` if every byte is zero.
            pub fn is_empty(&self) -> bool {
                self.0.iter().all(|b| *b == 0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), hex::encode(self.0))
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                if self.is_empty() {
                    serializer.serialize_str("")
                } else {
                    serializer.serialize_str(&hex::encode(self.0))
                }
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                let mut bytes = [0u8; $len];
                if !raw.is_empty() {
                    hex::decode_to_slice(&raw, &mut bytes).map_err(|e| {
                        de::Error::custom(format!("invalid {} '{}': {}", $desc, raw, e))
                    })?;
                }
                Ok(Self(bytes))
            }
        }
    };
}

define_id!(TraceId, 16, "trace identifier");
define_id!(SpanId, 8, "span identifier");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_serde() {
        let id: SpanId = serde_json::from_str(r#""0102030405060708""#).unwrap();
        assert_eq!(id.as_bytes(), &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""0102030405060708""#);
    }

    #[test]
    fn empty_is_zero() {
        let id: TraceId = serde_json::from_str(r#""""#).unwrap();
        assert!(id.is_empty());
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""""#);
    }

    #[test]
    fn wrong_length_is_rejected() {
        assert!(serde_json::from_str::<SpanId>(r#""0102""#).is_err());
    }
}
