//! Listing writes
//!
//! Updates go through [`ListingPatch`], which names every field a caller may
//! change. Anything else in an update body is rejected.

use crate::error::{Result, TransactError};
use crate::model::{
    from_item, new_id, now_timestamp, to_item, Listing, ListingStatus, Location, NewListing,
};
use passit_db_core::item::key1;
use passit_db_core::{Condition, KeyValueStore, PutRequest, UpdateRequest};
use serde::Deserialize;
use serde_json::Value;

const UPDATABLE_FIELDS: &[&str] = &["subject", "title", "description", "location", "status"];
const IMMUTABLE_FIELDS: &[&str] = &["id", "tutorId", "createdAt", "updatedAt"];

/// Partial update of a listing
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ListingPatch {
    pub subject: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<Location>,
    pub status: Option<ListingStatus>,
}

impl ListingPatch {
    /// Parse an update body, rejecting immutable and unknown fields
    pub fn from_json(body: &Value) -> Result<Self> {
        let Some(fields) = body.as_object() else {
            return Err(TransactError::validation("update body must be a JSON object"));
        };
        for name in fields.keys() {
            if IMMUTABLE_FIELDS.contains(&name.as_str()) {
                return Err(TransactError::validation(format!(
                    "field {} cannot be updated",
                    name
                )));
            }
            if !UPDATABLE_FIELDS.contains(&name.as_str()) {
                return Err(TransactError::validation(format!("unknown field {}", name)));
            }
        }
        serde_json::from_value(body.clone()).map_err(|e| TransactError::validation(e.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.subject.is_none()
            && self.title.is_none()
            && self.description.is_none()
            && self.location.is_none()
            && self.status.is_none()
    }

    fn assignments(&self) -> Result<Vec<(String, Value)>> {
        let mut set = Vec::new();
        if let Some(subject) = &self.subject {
            set.push(("subject".to_string(), Value::from(subject.as_str())));
        }
        if let Some(title) = &self.title {
            set.push(("title".to_string(), Value::from(title.as_str())));
        }
        if let Some(description) = &self.description {
            set.push(("description".to_string(), Value::from(description.as_str())));
        }
        if let Some(location) = &self.location {
            set.push(("location".to_string(), serde_json::to_value(location)?));
        }
        if let Some(status) = self.status {
            set.push(("status".to_string(), serde_json::to_value(status)?));
        }
        Ok(set)
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(TransactError::validation(format!("{} is required", field)));
    }
    Ok(())
}

/// Store a new OPEN listing
pub async fn create_listing<S: KeyValueStore + ?Sized>(
    store: &S,
    table: &str,
    new: NewListing,
) -> Result<Listing> {
    require("subject", &new.subject)?;
    require("title", &new.title)?;
    require("description", &new.description)?;
    require("tutorId", &new.tutor_id)?;

    let timestamp = now_timestamp();
    let listing = Listing {
        id: new_id(),
        subject: new.subject,
        title: new.title,
        description: new.description,
        location: new.location,
        tutor_id: new.tutor_id,
        status: ListingStatus::Open,
        created_at: timestamp.clone(),
        updated_at: Some(timestamp),
    };
    store
        .put_item(PutRequest::new(table, to_item(&listing)?).if_not_exists("id"))
        .await?;
    tracing::info!(listing_id = %listing.id, tutor_id = %listing.tutor_id, "listing created");
    Ok(listing)
}

/// Apply `patch` to the listing `id` if it belongs to `owner`
pub async fn update_listing<S: KeyValueStore + ?Sized>(
    store: &S,
    table: &str,
    id: &str,
    owner: &str,
    patch: &ListingPatch,
) -> Result<Listing> {
    if patch.is_empty() {
        return Err(TransactError::validation("update contains no fields"));
    }
    let mut set = patch.assignments()?;
    set.push(("updatedAt".to_string(), Value::from(now_timestamp())));

    let request = UpdateRequest {
        table_name: table.to_string(),
        key: key1("id", id),
        set,
        condition: Some(Condition::AttributeEquals(
            "tutorId".to_string(),
            Value::from(owner),
        )),
    };
    match store.update_item(request).await {
        Ok(item) => {
            tracing::debug!(listing_id = id, "listing updated");
            from_item(item)
        }
        Err(e) if e.is_conditional_failure() => {
            // Missing listings fail the owner guard too
            match store.get_item(table, &key1("id", id)).await? {
                Some(_) => Err(TransactError::NotOwner {
                    listing_id: id.to_string(),
                    owner: owner.to_string(),
                }),
                None => Err(TransactError::not_found(format!("listing {}", id))),
            }
        }
        Err(e) => Err(e.into()),
    }
}
