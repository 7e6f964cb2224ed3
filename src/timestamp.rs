use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::time::SystemTime;

/// A wire timestamp: integer nanoseconds since the Unix epoch.
///
/// Every timestamp crossing the ledger boundary uses this encoding. A `u64`
/// nanosecond count exceeds the range JSON numbers represent exactly, so the
/// value is serialized as a stringified integer; `1700000000000000000`
/// becomes `"1700000000000000000"` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Ord, Eq, Hash)]
pub struct UnixNanos(u64);

impl Serialize for UnixNanos {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for UnixNanos {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let nanos = s
            .parse::<u64>()
            .map_err(|_| serde::de::Error::custom("timestamp must be a non-negative integer"))?;
        Ok(UnixNanos(nanos))
    }
}

impl Display for UnixNanos {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl UnixNanos {
    pub fn from_nanos(nanos: u64) -> Self {
        Self(nanos)
    }

    pub fn now() -> Self {
        let nanos = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .expect("SystemTime before UNIX epoch?!?")
            .as_nanos() as u64;
        Self(nanos)
    }

    pub fn as_nanos(&self) -> u64 {
        self.0
    }

    /// Truncating conversion to milliseconds, the precision used for all
    /// local date arithmetic and display formatting.
    pub fn as_millis(&self) -> u64 {
        self.0 / 1_000_000
    }
}
