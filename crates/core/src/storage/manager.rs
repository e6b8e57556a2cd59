use crate::errors::CoreError;
use crate::models::expense::Expense;

use super::backend::KeyValueStore;

/// High-level storage operations: save/load the expense collection to/from
/// a single key of a key-value store.
pub struct StorageManager;

impl StorageManager {
    /// Serialize the full collection to the persisted JSON array.
    pub fn to_json(expenses: &[Expense]) -> Result<String, CoreError> {
        serde_json::to_string(expenses)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize expenses: {e}")))
    }

    /// Parse a persisted JSON array back into expenses.
    pub fn from_json(json: &str) -> Result<Vec<Expense>, CoreError> {
        let expenses: Vec<Expense> = serde_json::from_str(json)
            .map_err(|e| CoreError::Deserialization(format!("Failed to parse expenses: {e}")))?;
        Ok(expenses)
    }

    /// Load the saved collection.
    ///
    /// Never fails: a missing slot, a store read error or a value that does not
    /// parse all yield an empty collection. Whatever parses is trusted as-is.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Vec<Expense> {
        let raw = match store.get_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(key, "No saved expenses, starting empty");
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "Could not read saved expenses, starting empty");
                return Vec::new();
            }
        };

        match Self::from_json(&raw) {
            Ok(expenses) => {
                tracing::debug!(key, count = expenses.len(), "Loaded saved expenses");
                expenses
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "Saved expenses are unreadable, starting empty");
                Vec::new()
            }
        }
    }

    /// Overwrite the persisted slot with the full collection.
    pub fn save<S: KeyValueStore + ?Sized>(
        store: &mut S,
        key: &str,
        expenses: &[Expense],
    ) -> Result<(), CoreError> {
        let json = Self::to_json(expenses)?;
        store.set_item(key, &json)
    }
}
