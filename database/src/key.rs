use std::fmt::{Debug, Display};

/// Separates a bucket prefix from the entity key
pub const SEPARATOR: u8 = b'/';

/// A fixed namespace shared by every key of one store
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DbBucket(&'static [u8]);

impl DbBucket {
    pub const fn new(prefix: &'static [u8]) -> Self {
        Self(prefix)
    }

    pub fn key(&self, key: impl AsRef<[u8]>) -> DbKey {
        DbKey::new(self.0, key)
    }

    pub fn prefix(&self) -> &'static [u8] {
        self.0
    }
}

impl Debug for DbBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DbBucket({})", String::from_utf8_lossy(self.0))
    }
}

/// A full storage key: `bucket || '/' || key`
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DbKey {
    path: Vec<u8>,
    prefix_len: usize,
}

impl DbKey {
    pub fn new(bucket: &[u8], key: impl AsRef<[u8]>) -> Self {
        let key = key.as_ref();
        let mut path = Vec::with_capacity(bucket.len() + 1 + key.len());
        path.extend_from_slice(bucket);
        path.push(SEPARATOR);
        path.extend_from_slice(key);
        Self { path, prefix_len: bucket.len() + 1 }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.path
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.path
    }

    pub fn bucket(&self) -> &[u8] {
        &self.path[..self.prefix_len - 1]
    }

    pub fn suffix(&self) -> &[u8] {
        &self.path[self.prefix_len..]
    }
}

impl AsRef<[u8]> for DbKey {
    fn as_ref(&self) -> &[u8] {
        &self.path
    }
}

impl Display for DbKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/", String::from_utf8_lossy(self.bucket()))?;
        for b in self.suffix() {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

impl Debug for DbKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DbKey({self})")
    }
}
