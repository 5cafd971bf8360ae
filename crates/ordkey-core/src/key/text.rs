use crate::{
    key::Key256,
    obs::sink::{self, MetricsEvent},
};
use serde::{Deserialize, Serialize};

/// Width of a fixed string key in bytes.
pub const STRING_KEY_LEN: usize = 32;

///
/// StringKey
///
/// Up to 32 leading bytes of a text value, left-justified and zero-padded.
/// Lossy by construction: any two texts sharing their first 32 bytes map
/// to the same key. Use only for short descriptive index fields.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct StringKey([u8; STRING_KEY_LEN]);

impl StringKey {
    /// Build a key from `text`. Copying stops at the first NUL byte or
    /// after 32 bytes, whichever comes first; the rest stays zero.
    #[must_use]
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let copied = bytes
            .iter()
            .take(STRING_KEY_LEN)
            .take_while(|&&b| b != 0)
            .count();

        let mut key = [0u8; STRING_KEY_LEN];
        key[..copied].copy_from_slice(&bytes[..copied]);

        // counts every byte left behind, whether cut at 32 bytes or at a NUL
        if copied < bytes.len() {
            sink::record(MetricsEvent::StringKeyTruncated {
                discarded: bytes.len() - copied,
            });
        }

        Self(key)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; STRING_KEY_LEN] {
        &self.0
    }

    /// Number of leading non-zero bytes.
    #[must_use]
    pub fn text_len(&self) -> usize {
        self.0.iter().take_while(|&&b| b != 0).count()
    }
}

impl From<&str> for StringKey {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<StringKey> for Key256 {
    fn from(key: StringKey) -> Self {
        Self::from_bytes(key.0)
    }
}

/// Encode `text` into a fixed 32-byte index key.
#[must_use]
pub fn encode_string(text: &str) -> StringKey {
    StringKey::new(text)
}
