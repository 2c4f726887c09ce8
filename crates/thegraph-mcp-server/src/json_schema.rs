/// Build the JSON schema object advertised for a tool's input type
#[macro_export]
macro_rules! schema_from_type {
    ($type:ty) => {{
        let generator = schemars::generate::SchemaSettings::draft07().into_generator();
        match serde_json::to_value(generator.into_root_schema_for::<$type>()) {
            Ok(serde_json::Value::Object(schema)) => schema,
            _ => serde_json::Map::new(),
        }
    }};
}
