use schemars::schema::{InstanceType, RootSchema, Schema, SchemaObject};
use schemars::schema_for;
use serde_json::json;

use crate::MirrorConfig;

/// JSON schema for `mirror.toml`, for editor tooling and CI validation.
#[must_use]
pub fn json_schema() -> RootSchema {
    schema_for!(MirrorConfig)
}

pub(crate) fn mapping_mode_schema(_generator: &mut schemars::r#gen::SchemaGenerator) -> Schema {
    let schema = SchemaObject {
        instance_type: Some(InstanceType::String.into()),
        enum_values: Some(vec![json!("exact"), json!("allow_incomplete")]),
        ..SchemaObject::default()
    };
    schema.into()
}
