pub mod classify;
pub mod normalizer;
pub mod totals;
pub mod units;

pub use classify::{CategoryRule, LineClassifier};
pub use normalizer::{NormalizedReceipt, Normalizer};
pub use totals::reconcile_totals;
pub use units::normalize_unit;
