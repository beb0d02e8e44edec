//! Data-access layer over the collection of to-do list documents.
//!
//! # Design
//! `ToDoDal` owns a handle to the one collection of list documents and
//! exposes one method per use case. Every method takes an optional
//! `ClientSession` so a future caller can compose several operations into a
//! single causally consistent unit; day-to-day callers pass `None`.
//!
//! Mutations that return the updated list go through the store's atomic
//! find-one-and-update with `ReturnDocument::After`: the mutation and the
//! returned post-state are observed together, so concurrent writers to the
//! same list document cannot produce a lost update and a caller never sees a
//! half-applied state. The list document is the unit of atomicity; no
//! in-process locking is involved.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::ReturnDocument;
use mongodb::{ClientSession, Collection, Database};
use uuid::Uuid;

use crate::error::Error;
use crate::types::{ListSummary, ToDoList};

/// Name of the single collection of list documents.
pub const COLLECTION_NAME: &str = "todo_lists";

/// Seam between the HTTP layer and the persistence backend.
///
/// Handlers only ever see this trait, so tests (and database-less local
/// runs) can substitute [`MemoryStore`](crate::memory::MemoryStore) for the
/// MongoDB-backed [`ToDoDal`].
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Summaries of every list, ordered by name ascending. An empty store
    /// yields an empty vector, not an error.
    async fn list_todo_lists(&self) -> Result<Vec<ListSummary>, Error>;

    /// Create an empty list and return its store-assigned id.
    async fn create_todo_list(&self, name: &str) -> Result<String, Error>;

    async fn get_todo_list(&self, id: &str) -> Result<ToDoList, Error>;

    /// Returns whether exactly one list was removed. A missing list is
    /// `false`, not an error.
    async fn delete_todo_list(&self, id: &str) -> Result<bool, Error>;

    /// Append a fresh unchecked item and return the updated list, or `None`
    /// if the list does not exist.
    async fn create_item(&self, list_id: &str, label: &str) -> Result<Option<ToDoList>, Error>;

    /// Set one item's checked state and return the updated list, or `None`
    /// if the list or the item does not exist.
    async fn set_checked_state(
        &self,
        list_id: &str,
        item_id: &str,
        checked: bool,
    ) -> Result<Option<ToDoList>, Error>;

    /// Remove one item and return the updated list. Removing an absent item
    /// is a no-op returning the unchanged list; `None` only if the list
    /// itself does not exist.
    async fn delete_item(&self, list_id: &str, item_id: &str) -> Result<Option<ToDoList>, Error>;
}

/// MongoDB-backed data-access layer.
#[derive(Debug, Clone)]
pub struct ToDoDal {
    collection: Collection<Document>,
}

impl ToDoDal {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(COLLECTION_NAME),
        }
    }

    pub async fn list_todo_lists(
        &self,
        session: Option<&mut ClientSession>,
    ) -> Result<Vec<ListSummary>, Error> {
        let find = self
            .collection
            .find(doc! {})
            .projection(doc! { "name": 1, "item_count": { "$size": "$items" } })
            .sort(doc! { "name": 1 });
        let mut summaries = Vec::new();
        match session {
            Some(session) => {
                let mut cursor = find.session(&mut *session).await?;
                while let Some(doc) = cursor.next(session).await.transpose()? {
                    summaries.push(ListSummary::from_doc(&doc)?);
                }
            }
            None => {
                let mut cursor = find.await?;
                while let Some(doc) = cursor.try_next().await? {
                    summaries.push(ListSummary::from_doc(&doc)?);
                }
            }
        }
        Ok(summaries)
    }

    pub async fn create_todo_list(
        &self,
        name: &str,
        session: Option<&mut ClientSession>,
    ) -> Result<String, Error> {
        let insert = self
            .collection
            .insert_one(doc! { "name": name, "items": [] });
        let response = match session {
            Some(session) => insert.session(session).await?,
            None => insert.await?,
        };
        Ok(response
            .inserted_id
            .as_object_id()
            .map(|id| id.to_hex())
            .unwrap_or_else(|| response.inserted_id.to_string()))
    }

    pub async fn get_todo_list(
        &self,
        id: &str,
        session: Option<&mut ClientSession>,
    ) -> Result<ToDoList, Error> {
        let Some(object_id) = parse_object_id(id) else {
            return Err(Error::NotFound);
        };
        let find = self.collection.find_one(doc! { "_id": object_id });
        let doc = match session {
            Some(session) => find.session(session).await?,
            None => find.await?,
        };
        match doc {
            Some(doc) => ToDoList::from_doc(&doc),
            None => Err(Error::NotFound),
        }
    }

    pub async fn delete_todo_list(
        &self,
        id: &str,
        session: Option<&mut ClientSession>,
    ) -> Result<bool, Error> {
        let Some(object_id) = parse_object_id(id) else {
            return Ok(false);
        };
        let delete = self.collection.delete_one(doc! { "_id": object_id });
        let response = match session {
            Some(session) => delete.session(session).await?,
            None => delete.await?,
        };
        tracing::debug!(deleted = response.deleted_count, "delete_todo_list");
        Ok(response.deleted_count == 1)
    }

    pub async fn create_item(
        &self,
        list_id: &str,
        label: &str,
        session: Option<&mut ClientSession>,
    ) -> Result<Option<ToDoList>, Error> {
        let Some(object_id) = parse_object_id(list_id) else {
            return Ok(None);
        };
        // Item ids are generated here, not by the store: unique within the
        // list, opaque to callers.
        let update = self
            .collection
            .find_one_and_update(
                doc! { "_id": object_id },
                doc! { "$push": { "items": {
                    "id": Uuid::new_v4().simple().to_string(),
                    "label": label,
                    "checked": false,
                } } },
            )
            .return_document(ReturnDocument::After);
        let doc = match session {
            Some(session) => update.session(session).await?,
            None => update.await?,
        };
        doc.as_ref().map(ToDoList::from_doc).transpose()
    }

    pub async fn set_checked_state(
        &self,
        list_id: &str,
        item_id: &str,
        checked: bool,
        session: Option<&mut ClientSession>,
    ) -> Result<Option<ToDoList>, Error> {
        let Some(object_id) = parse_object_id(list_id) else {
            return Ok(None);
        };
        // The filter must match the item as well as the list so that an
        // unknown item id yields no document rather than a stray update.
        let update = self
            .collection
            .find_one_and_update(
                doc! { "_id": object_id, "items.id": item_id },
                doc! { "$set": { "items.$.checked": checked } },
            )
            .return_document(ReturnDocument::After);
        let doc = match session {
            Some(session) => update.session(session).await?,
            None => update.await?,
        };
        doc.as_ref().map(ToDoList::from_doc).transpose()
    }

    pub async fn delete_item(
        &self,
        list_id: &str,
        item_id: &str,
        session: Option<&mut ClientSession>,
    ) -> Result<Option<ToDoList>, Error> {
        let Some(object_id) = parse_object_id(list_id) else {
            return Ok(None);
        };
        // `$pull` with no matching item leaves the document untouched, so an
        // absent item id comes back as the unchanged list.
        let update = self
            .collection
            .find_one_and_update(
                doc! { "_id": object_id },
                doc! { "$pull": { "items": { "id": item_id } } },
            )
            .return_document(ReturnDocument::After);
        let doc = match session {
            Some(session) => update.session(session).await?,
            None => update.await?,
        };
        doc.as_ref().map(ToDoList::from_doc).transpose()
    }
}

#[async_trait]
impl TodoStore for ToDoDal {
    async fn list_todo_lists(&self) -> Result<Vec<ListSummary>, Error> {
        ToDoDal::list_todo_lists(self, None).await
    }

    async fn create_todo_list(&self, name: &str) -> Result<String, Error> {
        ToDoDal::create_todo_list(self, name, None).await
    }

    async fn get_todo_list(&self, id: &str) -> Result<ToDoList, Error> {
        ToDoDal::get_todo_list(self, id, None).await
    }

    async fn delete_todo_list(&self, id: &str) -> Result<bool, Error> {
        ToDoDal::delete_todo_list(self, id, None).await
    }

    async fn create_item(&self, list_id: &str, label: &str) -> Result<Option<ToDoList>, Error> {
        ToDoDal::create_item(self, list_id, label, None).await
    }

    async fn set_checked_state(
        &self,
        list_id: &str,
        item_id: &str,
        checked: bool,
    ) -> Result<Option<ToDoList>, Error> {
        ToDoDal::set_checked_state(self, list_id, item_id, checked, None).await
    }

    async fn delete_item(&self, list_id: &str, item_id: &str) -> Result<Option<ToDoList>, Error> {
        ToDoDal::delete_item(self, list_id, item_id, None).await
    }
}

/// An id string that cannot be an `ObjectId` cannot match any document, so
/// callers treat it as absent rather than as a parse error. Ids stay opaque
/// to everything above this layer.
fn parse_object_id(id: &str) -> Option<ObjectId> {
    ObjectId::parse_str(id).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_id_hex_round_trips() {
        let id = ObjectId::new();
        let parsed = parse_object_id(&id.to_hex()).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn non_object_id_strings_do_not_parse() {
        assert!(parse_object_id("not-an-id").is_none());
        assert!(parse_object_id("").is_none());
        // Right length, invalid hex.
        assert!(parse_object_id("zzzzzzzzzzzzzzzzzzzzzzzz").is_none());
    }
}
