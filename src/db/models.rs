use bson::{Bson, Document};
use chrono::Utc;
use serde_json::{Map, Value};

/// Collection names in the `Linkedin` database.
pub const USERS: &str = "users";
pub const CONNECTIONS: &str = "connections";
pub const POSTS: &str = "posts";
pub const MESSAGES: &str = "messages";

/// Application-level identifying fields (distinct from the store's `_id`).
pub const USER_ID: &str = "userId";
pub const CONNECTION_ID: &str = "connectionId";
pub const POST_ID: &str = "postId";
pub const MESSAGE_ID: &str = "messageId";

/// Foreign-key style fields used by the listing endpoints.
pub const CONNECTION_OWNER: &str = "user1";
pub const MESSAGE_RECIPIENT: &str = "to";

pub const SKILLS: &str = "skills";
pub const PROFILE_VIEWS: &str = "profileViews";
pub const IS_PREMIUM: &str = "isPremium";
pub const STATUS: &str = "status";
pub const STATUS_CONNECTED: &str = "connected";
pub const LIKES: &str = "likes";
pub const POST_CREATED_AT: &str = "createdAt";
pub const MESSAGE_SENT_AT: &str = "sentAt";

/// Convert a JSON request body into a BSON document, field for field.
pub fn json_to_document(body: Map<String, Value>) -> Document {
    body.into_iter()
        .map(|(key, value)| (key, json_to_bson(value)))
        .collect()
}

/// Convert an arbitrary JSON value into BSON.
///
/// Integers are stored as `Int32` when they fit, then `Int64`; anything
/// wider falls back to `Double`.
pub fn json_to_bson(value: Value) -> Bson {
    match value {
        Value::Null => Bson::Null,
        Value::Bool(b) => Bson::Boolean(b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => i32::try_from(i).map_or(Bson::Int64(i), Bson::Int32),
            None => Bson::Double(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => Bson::String(s),
        Value::Array(items) => Bson::Array(items.into_iter().map(json_to_bson).collect()),
        Value::Object(map) => Bson::Document(json_to_document(map)),
    }
}

/// Set `field` to the current wall-clock time, replacing any client value.
pub fn stamp_now(doc: &mut Document, field: &str) {
    doc.insert(field, bson::DateTime::from_chrono(Utc::now()));
}

/// Render a stored document as client-facing JSON.
///
/// `ObjectId`s become hex strings and datetimes become RFC 3339 strings;
/// everything else uses relaxed extended JSON.
pub fn document_to_json(doc: Document) -> Value {
    bson_to_json(Bson::Document(doc))
}

pub fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => match dt.try_to_rfc3339_string() {
            Ok(s) => Value::String(s),
            Err(_) => Value::from(dt.timestamp_millis()),
        },
        Bson::Document(doc) => Value::Object(
            doc.into_iter()
                .map(|(key, value)| (key, bson_to_json(value)))
                .collect(),
        ),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}

/// Format the id assigned by the store on insert.
pub fn inserted_id_to_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}
