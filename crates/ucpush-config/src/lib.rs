//! Parse and validate ucpush request files and server settings.

pub mod properties;
pub mod request;
pub mod server;

pub use properties::parse_properties;
pub use request::{
    CreateComponentBlock, DeliveryBlock, LinkBlock, PublishRequest, RequestError, VersionBlock,
    VersionType,
};
pub use server::{ServerConfig, ServerError, ServerOverrides, ServerSection};
