pub mod changes;
pub mod disputes;
pub mod finance;
pub mod ledger;
pub mod models;
pub mod repository;

pub use changes::{ChangeLog, OrderChange};
pub use disputes::{Dispute, DisputeManager, DisputeReason, DisputeStatus};
pub use finance::{FinancialManager, PlatformReport};
pub use ledger::{OrderLedger, OrderTransition};
pub use models::{Order, OrderItem, OrderStatus, PaymentMethod};
