//! In-memory [`TodoStore`] backend.
//!
//! # Design
//! A `tokio::sync::RwLock` over a `HashMap` keyed by list id. The write lock
//! stands in for the document store's per-document write serialization:
//! every mutation takes the lock, applies the change, and clones the
//! post-state out before releasing, so concurrent edits to the same list
//! cannot lose updates and a caller never observes a half-applied state.
//! Used by the integration tests; also handy for running the server without
//! a database at hand.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::dal::TodoStore;
use crate::error::Error;
use crate::types::{ListSummary, ToDoList, ToDoListItem};

#[derive(Debug, Default)]
pub struct MemoryStore {
    lists: RwLock<HashMap<String, StoredList>>,
}

#[derive(Debug, Clone)]
struct StoredList {
    name: String,
    items: Vec<ToDoListItem>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StoredList {
    fn to_todo_list(&self, id: &str) -> ToDoList {
        ToDoList {
            id: id.to_string(),
            name: self.name.clone(),
            items: self.items.clone(),
        }
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn list_todo_lists(&self) -> Result<Vec<ListSummary>, Error> {
        let lists = self.lists.read().await;
        let mut summaries: Vec<ListSummary> = lists
            .iter()
            .map(|(id, list)| ListSummary {
                id: id.clone(),
                name: list.name.clone(),
                item_count: list.items.len(),
            })
            .collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(summaries)
    }

    async fn create_todo_list(&self, name: &str) -> Result<String, Error> {
        let id = Uuid::new_v4().simple().to_string();
        self.lists.write().await.insert(
            id.clone(),
            StoredList {
                name: name.to_string(),
                items: Vec::new(),
            },
        );
        Ok(id)
    }

    async fn get_todo_list(&self, id: &str) -> Result<ToDoList, Error> {
        let lists = self.lists.read().await;
        lists
            .get(id)
            .map(|list| list.to_todo_list(id))
            .ok_or(Error::NotFound)
    }

    async fn delete_todo_list(&self, id: &str) -> Result<bool, Error> {
        Ok(self.lists.write().await.remove(id).is_some())
    }

    async fn create_item(&self, list_id: &str, label: &str) -> Result<Option<ToDoList>, Error> {
        let mut lists = self.lists.write().await;
        let Some(list) = lists.get_mut(list_id) else {
            return Ok(None);
        };
        list.items.push(ToDoListItem {
            id: Uuid::new_v4().simple().to_string(),
            label: label.to_string(),
            checked: false,
        });
        Ok(Some(list.to_todo_list(list_id)))
    }

    async fn set_checked_state(
        &self,
        list_id: &str,
        item_id: &str,
        checked: bool,
    ) -> Result<Option<ToDoList>, Error> {
        let mut lists = self.lists.write().await;
        let Some(list) = lists.get_mut(list_id) else {
            return Ok(None);
        };
        let Some(item) = list.items.iter_mut().find(|item| item.id == item_id) else {
            return Ok(None);
        };
        item.checked = checked;
        Ok(Some(list.to_todo_list(list_id)))
    }

    async fn delete_item(&self, list_id: &str, item_id: &str) -> Result<Option<ToDoList>, Error> {
        let mut lists = self.lists.write().await;
        let Some(list) = lists.get_mut(list_id) else {
            return Ok(None);
        };
        list.items.retain(|item| item.id != item_id);
        Ok(Some(list.to_todo_list(list_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_then_get_returns_named_empty_list() {
        let store = MemoryStore::new();
        let id = store.create_todo_list("Groceries").await.unwrap();
        let list = store.get_todo_list(&id).await.unwrap();
        assert_eq!(list.id, id);
        assert_eq!(list.name, "Groceries");
        assert!(list.items.is_empty());
    }

    #[tokio::test]
    async fn get_unknown_list_is_not_found() {
        let store = MemoryStore::new();
        let err = store.get_todo_list("missing").await.unwrap_err();
        assert!(matches!(err, Error::NotFound));
    }

    #[tokio::test]
    async fn delete_unknown_list_returns_false() {
        let store = MemoryStore::new();
        assert!(!store.delete_todo_list("missing").await.unwrap());
    }

    #[tokio::test]
    async fn new_items_start_unchecked() {
        let store = MemoryStore::new();
        let id = store.create_todo_list("Groceries").await.unwrap();
        let list = store.create_item(&id, "Milk").await.unwrap().unwrap();
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].label, "Milk");
        assert!(!list.items[0].checked);
    }

    #[tokio::test]
    async fn create_item_on_unknown_list_is_none() {
        let store = MemoryStore::new();
        assert!(store.create_item("missing", "Milk").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_checked_state_is_idempotent() {
        let store = MemoryStore::new();
        let id = store.create_todo_list("Groceries").await.unwrap();
        let list = store.create_item(&id, "Milk").await.unwrap().unwrap();
        let item_id = list.items[0].id.clone();

        let once = store
            .set_checked_state(&id, &item_id, true)
            .await
            .unwrap()
            .unwrap();
        let twice = store
            .set_checked_state(&id, &item_id, true)
            .await
            .unwrap()
            .unwrap();
        assert!(once.items[0].checked);
        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn set_checked_state_on_unknown_item_is_none() {
        let store = MemoryStore::new();
        let id = store.create_todo_list("Groceries").await.unwrap();
        let result = store.set_checked_state(&id, "missing", true).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn delete_absent_item_returns_unchanged_list() {
        let store = MemoryStore::new();
        let id = store.create_todo_list("Groceries").await.unwrap();
        let before = store.create_item(&id, "Milk").await.unwrap().unwrap();
        let after = store.delete_item(&id, "missing").await.unwrap().unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn summaries_are_sorted_and_count_live_items() {
        let store = MemoryStore::new();
        let b = store.create_todo_list("b").await.unwrap();
        store.create_todo_list("a").await.unwrap();
        store.create_item(&b, "one").await.unwrap();
        store.create_item(&b, "two").await.unwrap();

        let summaries = store.list_todo_lists().await.unwrap();
        let names: Vec<&str> = summaries.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(summaries[1].item_count, 2);

        let list = store.get_todo_list(&b).await.unwrap();
        store.delete_item(&b, &list.items[0].id).await.unwrap();
        let summaries = store.list_todo_lists().await.unwrap();
        assert_eq!(summaries[1].item_count, 1);
    }
}
