//! The set of remote capabilities an orchestration run works against.

use ucpush_client::{ComponentApi, PropertyApi, VersionApi};

/// Borrowed handles to each remote capability.
#[derive(Clone, Copy)]
pub struct Remote<'a> {
    pub components: &'a dyn ComponentApi,
    pub versions: &'a dyn VersionApi,
    pub properties: &'a dyn PropertyApi,
}

impl<'a> Remote<'a> {
    /// Use one client for every capability.
    pub fn new<C>(client: &'a C) -> Self
    where
        C: ComponentApi + VersionApi + PropertyApi,
    {
        Self {
            components: client,
            versions: client,
            properties: client,
        }
    }
}
