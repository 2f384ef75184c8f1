use serde::Serialize;
use serde_json::Value;

/// Serialize CLI overrides, dropping nulls and empty arrays so that unset
/// flags do not clobber values coming from config files
pub fn prune_unset<T: Serialize>(input: T) -> Value {
    let mut value = serde_json::to_value(input).unwrap_or(Value::Null);
    prune_unset_recursive(&mut value);
    value
}

fn prune_unset_recursive(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| match v {
                Value::Null => false,
                Value::Array(arr) => !arr.is_empty(),
                _ => true,
            });

            // Recursively prune nested objects, then drop the ones left empty
            for (_, v) in map.iter_mut() {
                prune_unset_recursive(v);
            }
            map.retain(|_, v| !matches!(v, Value::Object(inner) if inner.is_empty()));
        }
        Value::Array(arr) => {
            for item in arr.iter_mut() {
                prune_unset_recursive(item);
            }
        }
        _ => {}
    }
}
