#![forbid(unsafe_code)]
//! Remote capabilities of the deployment server and their HTTP implementation.

pub mod api;
pub mod error;
pub mod http;

pub use api::{
    ComponentApi, NewComponent, NewPropDef, PropDef, PropSheetDef, PropertyApi, VersionApi,
    VersionFiles,
};
pub use error::ClientError;
pub use http::HttpClient;
