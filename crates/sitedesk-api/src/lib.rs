// sitedesk-api: gateway contract and clients for a hosted Postgres + storage + auth backend

pub mod auth;
pub mod error;
pub mod gateway;
pub mod memory;
pub mod query;
pub mod rest;
pub mod row;
pub mod transport;

pub use auth::{Session, User};
pub use error::Error;
pub use gateway::{Gateway, UploadOptions};
pub use memory::MemoryGateway;
pub use query::{Embed, Filter, Order, Select};
pub use rest::RestGateway;
pub use row::{Row, RowId, to_row};
pub use transport::{TlsMode, TransportConfig};
