pub mod guard;
pub mod models;
pub mod reconcile;

pub use guard::check_payment;
pub use reconcile::{reconcile, LedgerResponse, LedgerRow};
