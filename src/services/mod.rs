// Stores and background jobs

pub mod account_store;
pub mod client_store;
pub mod payment_reset;

pub use account_store::AccountStore;
pub use client_store::{ClientStore, ClientsDocument};
pub use payment_reset::{run_payment_reset, PaymentResetService, DEFAULT_RESET_SCHEDULE};
