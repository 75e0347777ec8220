//! Component creation and tagging.

use tracing::info;
use ucpush_client::{ClientError, ComponentApi, NewComponent};
use ucpush_config::{parse_properties, CreateComponentBlock};

use crate::error::EngineError;
use crate::vars::Variables;

/// What `ensure_component` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentSetup {
    /// The component was already there; nothing was changed.
    Existing,
    /// The component was created with this id.
    Created { id: String },
}

/// Build the creation payload for `name`, expanding every string in `block`.
pub fn new_component(name: &str, block: &CreateComponentBlock, vars: &Variables) -> NewComponent {
    let optional = |raw: &str| Some(vars.expand(raw)).filter(|s| !s.trim().is_empty());
    NewComponent {
        name: name.to_owned(),
        description: vars.expand(&block.description),
        template_name: optional(&block.template),
        template_version: optional(&block.template_version),
        source_config_plugin: optional(&block.source_config_plugin),
        import_automatically: block.import_automatically,
        default_version_type: block.default_version_type.as_str().to_owned(),
        properties: parse_properties(&vars.expand(&block.source_properties)),
    }
}

/// Create the component unless it already exists.
///
/// # Errors
/// Returns `EngineError::ComponentCreate` if the lookup or the creation fails.
pub fn ensure_component(
    components: &dyn ComponentApi,
    component: &NewComponent,
) -> Result<ComponentSetup, EngineError> {
    let wrap = |source: ClientError| EngineError::ComponentCreate {
        component: component.name.clone(),
        source,
    };

    if components.component_exists(&component.name).map_err(wrap)? {
        info!(component = %component.name, "component already exists, skipping creation");
        return Ok(ComponentSetup::Existing);
    }

    info!(component = %component.name, "creating component");
    let id = components.create_component(component).map_err(wrap)?;
    info!(component = %component.name, %id, "created component");
    Ok(ComponentSetup::Created { id })
}

/// Apply one tag to a component.
///
/// # Errors
/// Returns `EngineError::ComponentTag` if the server rejects the tag.
pub fn tag_component(
    components: &dyn ComponentApi,
    component: &str,
    tag: &str,
) -> Result<(), EngineError> {
    info!(component, tag, "tagging component");
    components
        .add_tag(component, tag)
        .map_err(|source| EngineError::ComponentTag {
            component: component.to_owned(),
            tag: tag.to_owned(),
            source,
        })
}
