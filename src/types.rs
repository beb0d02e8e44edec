//! Domain records for to-do lists and their persisted document form.
//!
//! # Design
//! The store persists raw documents; these types are parsed out of them with
//! explicit `from_doc` constructors rather than serde, so a document that
//! fails its shape checks is reported as [`Error::MalformedDocument`] and can
//! never be mistaken for an absent document. Ids are opaque strings: the
//! store's native list id round-trips losslessly through its hex form, and
//! item ids are only meaningful within their owning list.

use mongodb::bson::{Bson, Document};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Read-only projection of a to-do list: everything a list index needs
/// without shipping the items themselves. `item_count` is computed by the
/// store at query time, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListSummary {
    pub id: String,
    pub name: String,
    pub item_count: usize,
}

impl ListSummary {
    pub fn from_doc(doc: &Document) -> Result<Self, Error> {
        // The `$size` projection yields an int32 for any realistic list but
        // the wire type is not guaranteed, so accept both integer widths.
        let item_count = match doc.get("item_count") {
            Some(Bson::Int32(n)) => *n as usize,
            Some(Bson::Int64(n)) => *n as usize,
            _ => return Err(Error::malformed("summary missing item_count")),
        };
        Ok(Self {
            id: doc
                .get_object_id("_id")
                .map_err(|_| Error::malformed("summary missing _id"))?
                .to_hex(),
            name: doc
                .get_str("name")
                .map_err(|_| Error::malformed("summary missing name"))?
                .to_string(),
            item_count,
        })
    }
}

/// A single item inside a to-do list document. Items have no lifecycle of
/// their own; they are created, mutated, and removed only as part of their
/// containing list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToDoListItem {
    pub id: String,
    pub label: String,
    pub checked: bool,
}

impl ToDoListItem {
    pub fn from_doc(item: &Document) -> Result<Self, Error> {
        Ok(Self {
            id: item
                .get_str("id")
                .map_err(|_| Error::malformed("item missing id"))?
                .to_string(),
            label: item
                .get_str("label")
                .map_err(|_| Error::malformed("item missing label"))?
                .to_string(),
            checked: item
                .get_bool("checked")
                .map_err(|_| Error::malformed("item missing checked"))?,
        })
    }
}

/// A complete to-do list with its items in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToDoList {
    pub id: String,
    pub name: String,
    pub items: Vec<ToDoListItem>,
}

impl ToDoList {
    pub fn from_doc(doc: &Document) -> Result<Self, Error> {
        let items = doc
            .get_array("items")
            .map_err(|_| Error::malformed("list missing items"))?
            .iter()
            .map(|entry| {
                entry
                    .as_document()
                    .ok_or_else(|| Error::malformed("list item is not a document"))
                    .and_then(ToDoListItem::from_doc)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            id: doc
                .get_object_id("_id")
                .map_err(|_| Error::malformed("list missing _id"))?
                .to_hex(),
            name: doc
                .get_str("name")
                .map_err(|_| Error::malformed("list missing name"))?
                .to_string(),
            items,
        })
    }
}
