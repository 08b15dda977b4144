/// A 128-bit random correlation token rendered as 32 hex characters.
pub fn new_correlation_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
