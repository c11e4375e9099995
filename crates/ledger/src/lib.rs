pub mod ledger;
pub mod service;
pub mod stats;

pub use ledger::{append, rebuild};
pub use service::{ReceiptService, ServiceError};
pub use stats::{compute_stats, CategoryTotal, MonthSavings, MonthTotal, Stats};
