use std::collections::HashMap;

use tinyjson::JsonValue;

use crate::{
    Real,
    vec::{Vec2u, Vec3},
};

pub type JsonObject = HashMap<String, JsonValue>;

pub fn json_to_real(json: &JsonObject, name: &str, default: Real) -> Real {
    match json.get(name) {
        Some(JsonValue::Number(v)) => *v as Real,
        _ => default,
    }
}

pub fn json_to_u32(json: &JsonObject, name: &str, default: u32) -> u32 {
    match json.get(name) {
        Some(JsonValue::Number(v)) if *v >= 0.0 => *v as u32,
        _ => default,
    }
}

/// Sub-object `name`, or `None` when absent. Any other JSON type is an error.
pub fn json_to_object<'a>(json: &'a JsonObject, name: &str) -> crate::Result<Option<&'a JsonObject>> {
    match json.get(name) {
        None => Ok(None),
        Some(JsonValue::Object(o)) => Ok(Some(o)),
        Some(v) => Err(crate::Error::UncoveredCaseJson("object", v.clone())),
    }
}

fn json_numbers(name: &'static str, values: &[JsonValue], dim: usize) -> crate::Result<Vec<f64>> {
    if values.len() != dim {
        return Err(crate::Error::WrongDimensionJson(name, values.to_vec(), dim));
    }
    values
        .iter()
        .map(|v| match v {
            JsonValue::Number(n) => Ok(*n),
            _ => Err(crate::Error::UncoveredCaseJson(name, v.clone())),
        })
        .collect()
}

struct JsonVec3(Vec3);
impl TryFrom<&JsonValue> for JsonVec3 {
    type Error = crate::Error;

    fn try_from(value: &JsonValue) -> crate::Result<Self> {
        match value {
            JsonValue::Number(v) => {
                let v = *v as Real;
                Ok(Self(Vec3::new(v, v, v)))
            }
            JsonValue::Array(v) => {
                let v = json_numbers("vec3", v, 3)?;
                Ok(Self(Vec3::new(v[0] as Real, v[1] as Real, v[2] as Real)))
            }
            _ => Err(crate::Error::UncoveredCaseJson("vec3", value.clone())),
        }
    }
}

struct JsonVec2u(Vec2u);
impl TryFrom<&JsonValue> for JsonVec2u {
    type Error = crate::Error;

    fn try_from(value: &JsonValue) -> crate::Result<Self> {
        match value {
            JsonValue::Number(v) => {
                let v = v.max(0.0) as u32;
                Ok(Self(Vec2u::new(v, v)))
            }
            JsonValue::Array(v) => {
                let v = json_numbers("vec2u", v, 2)?;
                Ok(Self(Vec2u::new(v[0].max(0.0) as u32, v[1].max(0.0) as u32)))
            }
            _ => Err(crate::Error::UncoveredCaseJson("vec2u", value.clone())),
        }
    }
}

/// Read a 3-vector (array or scalar splat). Absent keys give `default`,
/// malformed values are reported.
pub fn json_to_vec3(json: &JsonObject, name: &str, default: Vec3) -> crate::Result<Vec3> {
    json.get(name)
        .map_or(Ok(default), |v| JsonVec3::try_from(v).map(|v| v.0))
}

pub fn json_to_vec2u(json: &JsonObject, name: &str, default: Vec2u) -> crate::Result<Vec2u> {
    json.get(name)
        .map_or(Ok(default), |v| JsonVec2u::try_from(v).map(|v| v.0))
}

// Merge two JSON
pub fn merge_json(json: &mut JsonObject, add: &JsonObject) -> crate::Result<()> {
    for (name, value) in add {
        let Some(json_child) = json.get_mut(name) else {
            json.insert(name.clone(), value.clone());
            continue;
        };

        // Objects are patched recursively, anything else is replaced
        match (json_child, value) {
            (JsonValue::Object(child), JsonValue::Object(patch)) => merge_json(child, patch)?,
            (child, JsonValue::Object(_)) => {
                return Err(crate::Error::FailedPatchJson(child.clone(), value.clone()));
            }
            (child, _) => *child = value.clone(),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(s: &str) -> JsonObject {
        let parsed: JsonValue = s.parse().unwrap();
        parsed.get::<JsonObject>().unwrap().clone()
    }

    #[test]
    fn json_vec_3() {
        let json = object(r#"{ "v": [1.0, 2.0, 3.0] }"#);
        let v = json_to_vec3(&json, "v", Vec3::new(0.0, 0.0, 0.0)).unwrap();
        assert_eq!(v, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn json_vec_3_float() {
        let json = object(r#"{ "v": 1.0 }"#);
        let v = json_to_vec3(&json, "v", Vec3::new(0.0, 0.0, 0.0)).unwrap();
        assert_eq!(v, Vec3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn json_vec_3_wrong_dimension() {
        let json = object(r#"{ "v": [1.0, 2.0] }"#);
        assert!(matches!(
            json_to_vec3(&json, "v", Vec3::new(0.0, 0.0, 0.0)),
            Err(crate::Error::WrongDimensionJson("vec3", _, 3))
        ));
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let json = object(r#"{ "name": 3, "label": "x" }"#);
        assert_eq!(json_to_vec2u(&json, "size", Vec2u::new(4, 5)).unwrap(), Vec2u::new(4, 5));
        assert!((json_to_real(&json, "power", 8.0) - 8.0).abs() < Real::EPSILON);
        // Wrong type is treated as absent for scalars
        assert_eq!(json_to_u32(&json, "label", 7), 7);
        assert!((json_to_real(&json, "label", 1.5) - 1.5).abs() < Real::EPSILON);
        assert_eq!(json_to_u32(&json, "name", 0), 3);
    }

    #[test]
    fn merge_patches_nested_objects() {
        let mut json = object(r#"{ "camera": { "vfov": 45, "up": [0, 1, 0] }, "time": 1 }"#);
        let patch = object(r#"{ "camera": { "vfov": 60 }, "time": 2, "extra": true }"#);
        merge_json(&mut json, &patch).unwrap();

        let camera = json_to_object(&json, "camera").unwrap().unwrap();
        assert!((json_to_real(camera, "vfov", 0.0) - 60.0).abs() < Real::EPSILON);
        assert!(camera.contains_key("up"));
        assert!((json_to_real(&json, "time", 0.0) - 2.0).abs() < Real::EPSILON);
        assert!(json.contains_key("extra"));
    }

    #[test]
    fn merge_refuses_object_over_scalar() {
        let mut json = object(r#"{ "time": 1 }"#);
        let patch = object(r#"{ "time": { "value": 2 } }"#);
        assert!(merge_json(&mut json, &patch).is_err());
    }
}
