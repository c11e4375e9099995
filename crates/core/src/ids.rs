use uuid::Uuid;

/// Mint a globally-unique opaque id for receipts, items, and products.
/// No ordering guarantees.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}
