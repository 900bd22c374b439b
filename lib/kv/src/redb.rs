use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableTable, TableDefinition};

use crate::error::KVError;
use crate::traits::KVStore;

const TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("kv");

/// RedbStore is a KVStore implementation backed by redb — a pure-Rust embedded
/// key-value database. All keys are read-write (not read-only).
///
/// redb serializes write transactions, which is what makes `compare_swap`
/// a true atomic conditional update: the read of the current value and
/// the conditional write commit as one unit.
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Open or create a redb database at the given path.
    pub fn open(path: &Path) -> Result<Self, KVError> {
        let db = Database::create(path).map_err(|e| KVError::Storage(e.to_string()))?;

        // Ensure the table exists by doing a write transaction.
        let write_txn = db
            .begin_write()
            .map_err(|e| KVError::Storage(e.to_string()))?;
        {
            let _table = write_txn
                .open_table(TABLE)
                .map_err(|e| KVError::Storage(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| KVError::Storage(e.to_string()))?;

        Ok(Self { db: Arc::new(db) })
    }
}

impl KVStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| KVError::Storage(e.to_string()))?;
        let table = read_txn
            .open_table(TABLE)
            .map_err(|e| KVError::Storage(e.to_string()))?;

        match table.get(key) {
            Ok(Some(val)) => Ok(Some(val.value().to_vec())),
            Ok(None) => Ok(None),
            Err(e) => Err(KVError::Storage(e.to_string())),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| KVError::Storage(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(TABLE)
                .map_err(|e| KVError::Storage(e.to_string()))?;
            table
                .insert(key, value)
                .map_err(|e| KVError::Storage(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| KVError::Storage(e.to_string()))?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), KVError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| KVError::Storage(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(TABLE)
                .map_err(|e| KVError::Storage(e.to_string()))?;
            table
                .remove(key)
                .map_err(|e| KVError::Storage(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| KVError::Storage(e.to_string()))?;
        Ok(())
    }

    fn compare_swap(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        new: &[u8],
    ) -> Result<bool, KVError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| KVError::Storage(e.to_string()))?;

        let matched = {
            let mut table = write_txn
                .open_table(TABLE)
                .map_err(|e| KVError::Storage(e.to_string()))?;

            let current = match table.get(key) {
                Ok(Some(val)) => Some(val.value().to_vec()),
                Ok(None) => None,
                Err(e) => return Err(KVError::Storage(e.to_string())),
            };

            let matched = current.as_deref() == expected;
            if matched {
                table
                    .insert(key, new)
                    .map_err(|e| KVError::Storage(e.to_string()))?;
            }
            matched
        };

        if matched {
            write_txn
                .commit()
                .map_err(|e| KVError::Storage(e.to_string()))?;
        } else {
            write_txn
                .abort()
                .map_err(|e| KVError::Storage(e.to_string()))?;
        }

        Ok(matched)
    }

    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| KVError::Storage(e.to_string()))?;
        let table = read_txn
            .open_table(TABLE)
            .map_err(|e| KVError::Storage(e.to_string()))?;

        let mut results = Vec::new();
        let iter = table
            .range(prefix..)
            .map_err(|e| KVError::Storage(e.to_string()))?;

        for entry in iter {
            let entry = entry.map_err(|e| KVError::Storage(e.to_string()))?;
            let key = entry.0.value().to_string();
            if !key.starts_with(prefix) {
                break;
            }
            let value = entry.1.value().to_vec();
            results.push((key, value));
        }

        Ok(results)
    }

    fn is_readonly(&self, _key: &str) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> (RedbStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = RedbStore::open(&dir.path().join("test.redb")).unwrap();
        (store, dir)
    }

    #[test]
    fn test_get_set_delete() {
        let (store, _dir) = test_store();
        assert_eq!(store.get("a").unwrap(), None);
        store.set("a", b"1").unwrap();
        assert_eq!(store.get("a").unwrap(), Some(b"1".to_vec()));
        store.delete("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
    }

    #[test]
    fn test_compare_swap_insert_if_absent() {
        let (store, _dir) = test_store();
        assert!(store.compare_swap("a", None, b"1").unwrap());
        assert_eq!(store.get("a").unwrap(), Some(b"1".to_vec()));
        // Key now exists, so expected=None must fail.
        assert!(!store.compare_swap("a", None, b"2").unwrap());
        assert_eq!(store.get("a").unwrap(), Some(b"1".to_vec()));
    }

    #[test]
    fn test_compare_swap_stale_expected_rejected() {
        let (store, _dir) = test_store();
        store.set("a", b"1").unwrap();
        assert!(store.compare_swap("a", Some(b"1".as_slice()), b"2").unwrap());
        // "1" is stale now; the swap must not apply.
        assert!(!store.compare_swap("a", Some(b"1".as_slice()), b"3").unwrap());
        assert_eq!(store.get("a").unwrap(), Some(b"2".to_vec()));
    }

    #[test]
    fn test_scan_prefix() {
        let (store, _dir) = test_store();
        store.set("lot:L100", b"a").unwrap();
        store.set("lot:L200", b"b").unwrap();
        store.set("config:item:ring", b"c").unwrap();

        let lots = store.scan("lot:").unwrap();
        assert_eq!(lots.len(), 2);
        assert_eq!(lots[0].0, "lot:L100");
        assert_eq!(lots[1].0, "lot:L200");
    }
}
