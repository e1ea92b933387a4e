//! In-memory backend and the snapshot-dump text format.
//!
//! A snapshot dump is what debug tooling prints when walking the real
//! index database: one entry per line, hex key, a single space, hex
//! value. Blank lines and `#` comments are skipped. The format exists so
//! a few megabytes of a production store can ride along as a text
//! fixture and be reloaded anywhere.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use blockscan_index::{KeyValueStore, ScanIter, StoreError};

/// Ordered in-memory store.
///
/// Scans come back in key order, which keeps tests deterministic; the
/// ingest layer still treats scan order as arbitrary.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one raw entry. Fixture path; nothing in the read side ever
    /// writes.
    pub fn insert(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.entries.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load a snapshot dump from disk.
    pub fn from_dump_path(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::from_dump_reader(File::open(path.as_ref())?)
    }

    /// Parse the line-oriented dump format from any reader.
    pub fn from_dump_reader<R: Read>(reader: R) -> Result<Self, StoreError> {
        let mut store = Self::new();
        for (idx, line) in BufReader::new(reader).lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (key_hex, value_hex) =
                line.split_once(' ').ok_or_else(|| StoreError::Dump {
                    line: idx + 1,
                    reason: "expected `<key-hex> <value-hex>`".into(),
                })?;
            let key = hex::decode(key_hex).map_err(|e| StoreError::Dump {
                line: idx + 1,
                reason: format!("bad key hex: {e}"),
            })?;
            let value = hex::decode(value_hex).map_err(|e| StoreError::Dump {
                line: idx + 1,
                reason: format!("bad value hex: {e}"),
            })?;
            store.entries.insert(key, value);
        }
        tracing::debug!(entries = store.len(), "snapshot loaded");
        Ok(store)
    }

    /// Render the whole store in the dump format, keys ascending.
    /// Inverse of [`MemoryStore::from_dump_reader`].
    pub fn to_dump_string(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.entries {
            out.push_str(&hex::encode(key));
            out.push(' ');
            out.push_str(&hex::encode(value));
            out.push('\n');
        }
        out
    }
}

impl KeyValueStore for MemoryStore {
    fn scan_prefix<'a>(&'a self, prefix: &[u8]) -> Result<ScanIter<'a>, StoreError> {
        let prefix = prefix.to_vec();
        Ok(Box::new(
            self.entries
                .range(prefix.clone()..)
                .take_while(move |(k, _)| k.starts_with(&prefix))
                .map(|(k, v)| Ok((k.clone(), v.clone()))),
        ))
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(store: &MemoryStore, prefix: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)> {
        store
            .scan_prefix(prefix)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn scan_is_ordered_and_prefix_scoped() {
        let mut store = MemoryStore::new();
        store.insert(vec![b'b', 2], vec![20]);
        store.insert(vec![b'b', 1], vec![10]);
        store.insert(vec![b't', 1], vec![99]);
        store.insert(vec![b'a', 9], vec![1]);

        let hits = scan(&store, &[b'b']);
        assert_eq!(hits, vec![(vec![b'b', 1], vec![10]), (vec![b'b', 2], vec![20])]);
        assert!(scan(&store, &[b'z']).is_empty());
    }

    #[test]
    fn dump_round_trips() {
        let mut store = MemoryStore::new();
        store.insert(vec![0x62, 0xAB], vec![0x01, 0x02, 0x03]);
        store.insert(vec![0x62, 0x01], vec![0x05]);

        let dump = store.to_dump_string();
        let reloaded = MemoryStore::from_dump_reader(dump.as_bytes()).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.to_dump_string(), dump);
    }

    #[test]
    fn comments_and_blank_lines_skipped() {
        let dump = "# index snapshot\n\n6201 aabb\n   \n# trailing note\n";
        let store = MemoryStore::from_dump_reader(dump.as_bytes()).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(scan(&store, &[0x62]), vec![(vec![0x62, 0x01], vec![0xAA, 0xBB])]);
    }

    #[test]
    fn malformed_lines_carry_line_numbers() {
        let missing_space = MemoryStore::from_dump_reader("6201aabb\n".as_bytes());
        assert!(matches!(
            missing_space.unwrap_err(),
            StoreError::Dump { line: 1, .. }
        ));

        let bad_hex = MemoryStore::from_dump_reader("6201 aabb\nzz 00\n".as_bytes());
        assert!(matches!(bad_hex.unwrap_err(), StoreError::Dump { line: 2, .. }));
    }
}
