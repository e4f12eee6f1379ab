//! Service layer: the `HeroStore` contract and its persistence backends.
//! - Handlers only ever see `Arc<dyn HeroStore>`.
//! - Each backend owns its connection lifecycle.

pub mod errors;
pub mod storage;

pub use storage::HeroStore;
