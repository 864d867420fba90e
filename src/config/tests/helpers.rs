//! Shared test helpers for configuration tests.

use ortho_config::MergeComposer;
use serde_json::Value;

use crate::FilterAppConfig;

/// Applies a configuration layer to the composer based on the layer type.
pub fn apply_layer(composer: &mut MergeComposer, layer_type: &str, value: Value) {
    match layer_type {
        "defaults" => composer.push_defaults(value),
        "file" => composer.push_file(value, None),
        "environment" => composer.push_environment(value),
        "cli" => composer.push_cli(value),
        _ => panic!("unknown layer type: {layer_type}"),
    }
}

/// Returns the built-in defaults as a JSON layer.
pub fn base_defaults() -> Value {
    serde_json::to_value(FilterAppConfig::default()).expect("defaults should serialise")
}

/// Merges two JSON values, with `overlay` values taking precedence over `base`.
pub fn merge_json(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                base_map.insert(key, value);
            }
            Value::Object(base_map)
        }
        (_, other) => other,
    }
}

/// Composes a [`FilterAppConfig`] from a sequence of `(layer_type, value)` pairs.
///
/// The built-in defaults always form the base layer; any `defaults` entries
/// are merged over them before the remaining layers are applied in order.
pub fn build_config_from_layers(layers: &[(&str, Value)]) -> FilterAppConfig {
    let mut composer = MergeComposer::new();

    let defaults = layers
        .iter()
        .filter(|(layer_type, _)| *layer_type == "defaults")
        .fold(base_defaults(), |merged, (_, value)| {
            merge_json(merged, value.clone())
        });
    composer.push_defaults(defaults);

    for (layer_type, value) in layers {
        if *layer_type != "defaults" {
            apply_layer(&mut composer, layer_type, value.clone());
        }
    }

    FilterAppConfig::merge_from_layers(composer.layers()).expect("merge should succeed")
}
