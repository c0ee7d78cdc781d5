/// Product ids are opaque strings. Generated ids are UUIDv7 so they sort by
/// creation time, but clients may supply any non-empty string.
pub type RecordId = String;

/// Generate a fresh record id.
pub fn new_record_id() -> RecordId {
    uuid::Uuid::now_v7().to_string()
}
