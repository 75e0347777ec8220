//! Blocking HTTP implementation of the remote capabilities.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use ucpush_config::ServerConfig;
use ureq::typestate::WithBody;
use ureq::RequestBuilder;
use uuid::Uuid;

use crate::api::{
    ComponentApi, NewComponent, NewPropDef, PropDef, PropSheetDef, PropertyApi, VersionApi,
    VersionFiles,
};
use crate::error::ClientError;

/// Talks to the deployment server's REST API over a `ureq` agent.
pub struct HttpClient {
    agent: ureq::Agent,
    base_url: String,
    authorization: Option<String>,
}

enum Method {
    Get,
    Put,
    Post,
}

enum Payload {
    Empty,
    Json(Vec<u8>),
    Archive(Vec<u8>),
}

#[derive(Deserialize)]
struct IdResponse {
    id: String,
}

impl HttpClient {
    /// Build a client for the given server.
    ///
    /// Non-success statuses are surfaced as `ClientError::Transport` with the
    /// response body, so the agent does not turn them into errors itself.
    pub fn new(config: &ServerConfig) -> Self {
        let agent = ureq::Agent::new_with_config(
            ureq::config::Config::builder()
                .timeout_connect(Some(config.connect_timeout))
                .timeout_global(Some(config.timeout))
                .http_status_as_error(false)
                .build(),
        );

        let authorization = config.user.as_ref().map(|user| {
            let password = config.password.as_deref().unwrap_or_default();
            format!("Basic {}", STANDARD.encode(format!("{user}:{password}")))
        });

        Self {
            agent,
            base_url: config.url.clone(),
            authorization,
        }
    }

    /// Issue a request and return the status code and body text.
    fn request(
        &self,
        operation: &'static str,
        method: &Method,
        path: &str,
        query: &[(&str, &str)],
        payload: Payload,
    ) -> Result<(u16, String), ClientError> {
        let url = format!("{}{path}", self.base_url);
        debug!(operation, %url, "sending request");

        let result = match method {
            Method::Get => self.prepare(self.agent.get(&url), query).call(),
            Method::Put => send(self.prepare(self.agent.put(&url), query), payload),
            Method::Post => send(self.prepare(self.agent.post(&url), query), payload),
        };

        let mut response = result.map_err(|e| ClientError::Transport {
            operation,
            message: e.to_string(),
        })?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ClientError::Transport {
                operation,
                message: e.to_string(),
            })?;
        debug!(operation, status, "received response");
        Ok((status, body))
    }

    /// Like [`Self::request`], but any non-2xx status is a transport error.
    fn expect_success(
        &self,
        operation: &'static str,
        method: &Method,
        path: &str,
        query: &[(&str, &str)],
        payload: Payload,
    ) -> Result<String, ClientError> {
        let (status, body) = self.request(operation, method, path, query, payload)?;
        if !(200..300).contains(&status) {
            return Err(status_error(operation, status, &body));
        }
        Ok(body)
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ClientError> {
        let body = self.expect_success(operation, &Method::Get, path, query, Payload::Empty)?;
        parse_json(operation, &body)
    }

    fn prepare<B>(&self, mut builder: RequestBuilder<B>, query: &[(&str, &str)]) -> RequestBuilder<B> {
        for (key, value) in query {
            builder = builder.query(*key, *value);
        }
        builder = builder.header("Accept", "application/json");
        if let Some(auth) = &self.authorization {
            builder = builder.header("Authorization", auth.as_str());
        }
        builder
    }

    fn upload_files(
        &self,
        operation: &'static str,
        component: &str,
        version: &str,
        files: &VersionFiles<'_>,
        archive: Vec<u8>,
    ) -> Result<(), ClientError> {
        let extensions = files.text_extensions.join(",");
        debug!(
            operation,
            files = files.files.len(),
            bytes = archive.len(),
            "uploading archive"
        );
        self.expect_success(
            operation,
            &Method::Put,
            "/cli/version/addFiles",
            &[
                ("component", component),
                ("version", version),
                ("charset", files.charset.name()),
                ("textExtensions", &extensions),
            ],
            Payload::Archive(archive),
        )?;
        Ok(())
    }
}

/// Build the upload body. Runs before any request so unreadable files fail locally.
fn pack(operation: &'static str, files: &VersionFiles<'_>) -> Result<Vec<u8>, ClientError> {
    ucpush_util::archive::pack_tar_gz(files.files)
        .map_err(|source| ClientError::Payload { operation, source })
}

impl ComponentApi for HttpClient {
    fn component_exists(&self, component: &str) -> Result<bool, ClientError> {
        const OP: &str = "component lookup";
        let (status, body) = self.request(
            OP,
            &Method::Get,
            "/cli/component/info",
            &[("component", component)],
            Payload::Empty,
        )?;
        match status {
            200..=299 => Ok(true),
            404 => Ok(false),
            _ => Err(status_error(OP, status, &body)),
        }
    }

    fn create_component(&self, component: &NewComponent) -> Result<String, ClientError> {
        const OP: &str = "component creation";
        let body = to_json(OP, component)?;
        let response =
            self.expect_success(OP, &Method::Put, "/cli/component/create", &[], Payload::Json(body))?;
        let created: IdResponse = parse_json(OP, &response)?;
        Ok(created.id)
    }

    fn add_tag(&self, component: &str, tag: &str) -> Result<(), ClientError> {
        self.expect_success(
            "component tagging",
            &Method::Put,
            "/cli/component/tag",
            &[("component", component), ("tag", tag)],
            Payload::Empty,
        )?;
        Ok(())
    }

    fn version_prop_sheet_def(&self, component: &str) -> Result<PropSheetDef, ClientError> {
        self.get_json(
            "version property sheet lookup",
            "/cli/component/versionPropSheetDef",
            &[("component", component)],
        )
    }

    fn add_version_link(
        &self,
        component: &str,
        version: &str,
        link_name: &str,
        link_url: &str,
    ) -> Result<(), ClientError> {
        self.expect_success(
            "version link",
            &Method::Put,
            "/cli/version/addLink",
            &[
                ("component", component),
                ("version", version),
                ("linkName", link_name),
                ("link", link_url),
            ],
            Payload::Empty,
        )?;
        Ok(())
    }

    fn import_versions(
        &self,
        component: &str,
        properties: &BTreeMap<String, String>,
    ) -> Result<(), ClientError> {
        const OP: &str = "version import";
        let body = to_json(
            OP,
            &serde_json::json!({
                "component": component,
                "properties": properties,
            }),
        )?;
        self.expect_success(OP, &Method::Put, "/cli/component/integrate", &[], Payload::Json(body))?;
        Ok(())
    }
}

impl VersionApi for HttpClient {
    fn create_version_with_files(
        &self,
        component: &str,
        version: &str,
        description: &str,
        files: &VersionFiles<'_>,
    ) -> Result<Uuid, ClientError> {
        const OP: &str = "version creation";
        const UPLOAD: &str = "version file upload";
        let archive = pack(UPLOAD, files)?;
        let response = self.expect_success(
            OP,
            &Method::Post,
            "/cli/version/createVersion",
            &[
                ("component", component),
                ("name", version),
                ("description", description),
            ],
            Payload::Empty,
        )?;
        let created: IdResponse = parse_json(OP, &response)?;
        let id = Uuid::parse_str(&created.id).map_err(|e| ClientError::Response {
            operation: OP,
            message: format!("version id `{}` is not a UUID: {e}", created.id),
        })?;

        self.upload_files(UPLOAD, component, version, files, archive)?;
        Ok(id)
    }

    fn add_version_files(
        &self,
        component: &str,
        version: &str,
        files: &VersionFiles<'_>,
    ) -> Result<(), ClientError> {
        const UPLOAD: &str = "version file upload";
        let archive = pack(UPLOAD, files)?;
        self.upload_files(UPLOAD, component, version, files, archive)
    }

    fn set_version_property(
        &self,
        component: &str,
        version: &str,
        name: &str,
        value: &str,
    ) -> Result<(), ClientError> {
        self.expect_success(
            "version property update",
            &Method::Put,
            "/cli/version/versionProperties",
            &[
                ("component", component),
                ("version", version),
                ("name", name),
                ("value", value),
                ("isSecure", "false"),
            ],
            Payload::Empty,
        )?;
        Ok(())
    }
}

impl PropertyApi for HttpClient {
    fn prop_defs(&self, sheet_path: &str) -> Result<Vec<PropDef>, ClientError> {
        self.get_json("property definition listing", &prop_defs_path(sheet_path), &[])
    }

    fn create_prop_def(&self, sheet: &PropSheetDef, def: &NewPropDef) -> Result<(), ClientError> {
        const OP: &str = "property definition creation";
        let body = to_json(
            OP,
            &serde_json::json!({
                "definitionGroupId": sheet.id,
                "name": def.name,
                "description": def.description,
                "label": def.label,
                "required": def.required,
                "type": def.prop_type,
                "value": def.default_value,
            }),
        )?;
        self.expect_success(
            OP,
            &Method::Post,
            &prop_defs_path(&sheet.path),
            &[],
            Payload::Json(body),
        )?;
        Ok(())
    }
}

fn send(
    builder: RequestBuilder<WithBody>,
    payload: Payload,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match payload {
        Payload::Empty => builder.send_empty(),
        Payload::Json(bytes) => builder
            .header("Content-Type", "application/json")
            .send(bytes.as_slice()),
        Payload::Archive(bytes) => builder
            .header("Content-Type", "application/gzip")
            .send(bytes.as_slice()),
    }
}

/// `/property/propSheetDef/{path}.-1/propDefs`, with the sheet path as one encoded segment.
fn prop_defs_path(sheet_path: &str) -> String {
    format!(
        "/property/propSheetDef/{}.-1/propDefs",
        urlencoding::encode(sheet_path)
    )
}

fn status_error(operation: &'static str, status: u16, body: &str) -> ClientError {
    let body = body.trim();
    let message = if body.is_empty() {
        format!("HTTP {status}")
    } else {
        format!("HTTP {status}: {body}")
    };
    ClientError::Transport { operation, message }
}

fn parse_json<T: DeserializeOwned>(operation: &'static str, body: &str) -> Result<T, ClientError> {
    serde_json::from_str(body).map_err(|e| ClientError::Response {
        operation,
        message: e.to_string(),
    })
}

fn to_json<T: serde::Serialize>(operation: &'static str, value: &T) -> Result<Vec<u8>, ClientError> {
    serde_json::to_vec(value).map_err(|e| ClientError::Response {
        operation,
        message: e.to_string(),
    })
}
