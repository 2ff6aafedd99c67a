//! Composite document rendering.
//!
//! Every catalog record stores a markdown rendering of all its other fields
//! in its own `info_md` column. The rendering is regenerated on every
//! mutation so the stored document never drifts from the fields, with one
//! sanctioned exception: between the insert and the identifier patch-back of
//! record creation, the document carries [`PLACEHOLDER_ID`] instead of the
//! real identifier.

use chrono::{DateTime, Utc};

use crate::tags::products_display;
use crate::traits::RecordDraft;

/// Identifier stand-in used in a freshly inserted document before the real
/// identifier is known.
pub const PLACEHOLDER_ID: &str = "TBD";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

fn or_not_set(s: &str) -> &str {
    if s.trim().is_empty() {
        "not set"
    } else {
        s
    }
}

fn or_none(s: &str) -> &str {
    if s.trim().is_empty() {
        "none"
    } else {
        s
    }
}

/// Render the composite document for a record.
///
/// `id` is `None` during the window between insert and patch-back; the
/// document then embeds [`PLACEHOLDER_ID`]. Once the identifier is known the
/// caller re-renders with `Some(id)`, producing the literal `Demo ID: {id}`
/// line the rest of the document pivots on.
pub fn render_info_md(
    id: Option<i64>,
    draft: &RecordDraft,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
) -> String {
    let id_text = match id {
        Some(id) => id.to_string(),
        None => PLACEHOLDER_ID.to_string(),
    };
    let created = match created_at {
        Some(t) => t.format(TIMESTAMP_FORMAT).to_string(),
        None => "not set".to_string(),
    };
    let updated = match updated_at {
        Some(t) => t.format(TIMESTAMP_FORMAT).to_string(),
        None => "not updated".to_string(),
    };
    let products = {
        let joined = products_display(&draft.products);
        if joined.is_empty() {
            "none".to_string()
        } else {
            joined
        }
    };

    format!(
        "# {title}\n\
         \n\
         ## Basic information\n\
         - Demo ID: {id}\n\
         - Owner: {owner}\n\
         - Creator: {creator}\n\
         - Status: {status}\n\
         - Confidentiality: {confidentiality}\n\
         - Registered: {created}\n\
         - Last edited: {updated}\n\
         \n\
         ## Summary\n\
         {summary}\n\
         \n\
         ## Description\n\
         {description}\n\
         \n\
         ## Links\n\
         - Demo URL: {demo_url}\n\
         - Repository URL: {repo_url}\n\
         \n\
         ## Products\n\
         {products}\n\
         \n\
         ## Remarks\n\
         {remarks}\n",
        title = or_not_set(&draft.title),
        id = id_text,
        owner = or_not_set(&draft.owner_email),
        creator = or_not_set(draft.creator_email.as_deref().unwrap_or("")),
        status = draft.status,
        confidentiality = draft.confidentiality,
        created = created,
        updated = updated,
        summary = or_not_set(&draft.summary),
        description = or_not_set(&draft.description_md),
        demo_url = or_none(&draft.demo_url),
        repo_url = or_none(&draft.repo_url),
        products = products,
        remarks = or_none(&draft.remarks),
    )
}
