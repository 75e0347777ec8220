//! In-memory deployment server used by engine tests.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use ucpush_client::{
    ClientError, ComponentApi, NewComponent, NewPropDef, PropDef, PropSheetDef, PropertyApi,
    VersionApi, VersionFiles,
};
use ucpush_util::UtilError;
use uuid::Uuid;

use crate::env::EnvStore;

pub const VERSION_ID: &str = "0b6c1f0e-8a53-4c53-9b0e-5d7f2f6a9c11";
const SHEET_ID: &str = "sheet-1";
const SHEET_PATH: &str = "components/fake/versionPropSheetDef";

/// One recorded remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ComponentExists(String),
    CreateComponent { name: String },
    AddTag { component: String, tag: String },
    PropSheetDef(String),
    PropDefs(String),
    CreatePropDef { name: String },
    SetProperty { name: String, value: String },
    CreateVersion { component: String, version: String, files: Vec<String>, charset: String },
    AddFiles { component: String, version: String, files: Vec<String> },
    AddLink { name: String, url: String },
    Import { component: String, properties: BTreeMap<String, String> },
}

#[derive(Debug, Clone, Copy)]
pub enum FailKind {
    Transport,
    Response,
}

#[derive(Default)]
struct State {
    components: BTreeSet<String>,
    prop_defs: Vec<String>,
    version_props: BTreeMap<(String, String, String), String>,
    calls: Vec<Call>,
}

/// Records every call and keeps just enough state to answer consistently.
#[derive(Default)]
pub struct FakeServer {
    state: RefCell<State>,
    failures: BTreeMap<&'static str, FailKind>,
}

impl FakeServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_component(self, name: &str) -> Self {
        self.state.borrow_mut().components.insert(name.to_owned());
        self
    }

    pub fn with_prop_def(self, name: &str) -> Self {
        self.state.borrow_mut().prop_defs.push(name.to_owned());
        self
    }

    /// Make the named trait method fail with the given kind.
    pub fn failing(mut self, method: &'static str, kind: FailKind) -> Self {
        self.failures.insert(method, kind);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn has_component(&self, name: &str) -> bool {
        self.state.borrow().components.contains(name)
    }

    pub fn prop_defs(&self) -> Vec<String> {
        self.state.borrow().prop_defs.clone()
    }

    pub fn version_property(&self, component: &str, version: &str, name: &str) -> Option<String> {
        self.state
            .borrow()
            .version_props
            .get(&(component.to_owned(), version.to_owned(), name.to_owned()))
            .cloned()
    }

    fn record(&self, method: &'static str, call: Call) -> Result<(), ClientError> {
        self.state.borrow_mut().calls.push(call);
        match self.failures.get(method) {
            None => Ok(()),
            Some(FailKind::Transport) => Err(ClientError::Transport {
                operation: method,
                message: "connection refused".to_owned(),
            }),
            Some(FailKind::Response) => Err(ClientError::Response {
                operation: method,
                message: "expected value at line 1 column 1".to_owned(),
            }),
        }
    }
}

fn names(files: &VersionFiles<'_>) -> Vec<String> {
    files.files.iter().map(|f| f.relative.clone()).collect()
}

impl ComponentApi for FakeServer {
    fn component_exists(&self, component: &str) -> Result<bool, ClientError> {
        self.record("component_exists", Call::ComponentExists(component.to_owned()))?;
        Ok(self.has_component(component))
    }

    fn create_component(&self, component: &NewComponent) -> Result<String, ClientError> {
        self.record(
            "create_component",
            Call::CreateComponent {
                name: component.name.clone(),
            },
        )?;
        self.state
            .borrow_mut()
            .components
            .insert(component.name.clone());
        Ok(format!("id-{}", component.name))
    }

    fn add_tag(&self, component: &str, tag: &str) -> Result<(), ClientError> {
        self.record(
            "add_tag",
            Call::AddTag {
                component: component.to_owned(),
                tag: tag.to_owned(),
            },
        )
    }

    fn version_prop_sheet_def(&self, component: &str) -> Result<PropSheetDef, ClientError> {
        self.record("version_prop_sheet_def", Call::PropSheetDef(component.to_owned()))?;
        Ok(PropSheetDef {
            id: SHEET_ID.to_owned(),
            path: SHEET_PATH.to_owned(),
        })
    }

    fn add_version_link(
        &self,
        _component: &str,
        _version: &str,
        link_name: &str,
        link_url: &str,
    ) -> Result<(), ClientError> {
        self.record(
            "add_version_link",
            Call::AddLink {
                name: link_name.to_owned(),
                url: link_url.to_owned(),
            },
        )
    }

    fn import_versions(
        &self,
        component: &str,
        properties: &BTreeMap<String, String>,
    ) -> Result<(), ClientError> {
        self.record(
            "import_versions",
            Call::Import {
                component: component.to_owned(),
                properties: properties.clone(),
            },
        )
    }
}

impl VersionApi for FakeServer {
    fn create_version_with_files(
        &self,
        component: &str,
        version: &str,
        _description: &str,
        files: &VersionFiles<'_>,
    ) -> Result<Uuid, ClientError> {
        self.record(
            "create_version_with_files",
            Call::CreateVersion {
                component: component.to_owned(),
                version: version.to_owned(),
                files: names(files),
                charset: files.charset.name().to_owned(),
            },
        )?;
        Uuid::parse_str(VERSION_ID).map_err(|e| ClientError::Response {
            operation: "create_version_with_files",
            message: e.to_string(),
        })
    }

    fn add_version_files(
        &self,
        component: &str,
        version: &str,
        files: &VersionFiles<'_>,
    ) -> Result<(), ClientError> {
        self.record(
            "add_version_files",
            Call::AddFiles {
                component: component.to_owned(),
                version: version.to_owned(),
                files: names(files),
            },
        )
    }

    fn set_version_property(
        &self,
        component: &str,
        version: &str,
        name: &str,
        value: &str,
    ) -> Result<(), ClientError> {
        self.record(
            "set_version_property",
            Call::SetProperty {
                name: name.to_owned(),
                value: value.to_owned(),
            },
        )?;
        self.state.borrow_mut().version_props.insert(
            (component.to_owned(), version.to_owned(), name.to_owned()),
            value.to_owned(),
        );
        Ok(())
    }
}

impl PropertyApi for FakeServer {
    fn prop_defs(&self, sheet_path: &str) -> Result<Vec<PropDef>, ClientError> {
        self.record("prop_defs", Call::PropDefs(sheet_path.to_owned()))?;
        Ok(self
            .prop_defs()
            .into_iter()
            .map(|name| PropDef { name })
            .collect())
    }

    fn create_prop_def(&self, _sheet: &PropSheetDef, def: &NewPropDef) -> Result<(), ClientError> {
        self.record(
            "create_prop_def",
            Call::CreatePropDef {
                name: def.name.clone(),
            },
        )?;
        self.state.borrow_mut().prop_defs.push(def.name.clone());
        Ok(())
    }
}

/// An env store held in memory, optionally refusing every write.
#[derive(Default)]
pub struct MemoryEnv {
    pub values: BTreeMap<String, String>,
    pub broken: bool,
}

impl EnvStore for MemoryEnv {
    fn put(&mut self, key: &str, value: &str) -> Result<(), UtilError> {
        if self.broken {
            return Err(UtilError::Io {
                path: "memory".to_owned(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            });
        }
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
