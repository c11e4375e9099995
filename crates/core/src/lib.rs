pub mod category;
pub mod coerce;
pub mod ids;
pub mod product;
pub mod receipt;

pub use category::Category;
pub use ids::new_id;
pub use product::{PricePoint, Product};
pub use receipt::{Receipt, ReceiptItem, ReceiptTotals, TOTAL_TOLERANCE};
