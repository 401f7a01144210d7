pub mod contract;
pub mod error;
pub mod msg;
pub mod ownership;
pub mod query;
pub mod state;
