pub mod db;
mod entities;
mod logs;
mod metrics;
mod schema;
mod traces;

pub use db::{Store, StoreStatus};
