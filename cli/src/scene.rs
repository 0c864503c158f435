//! Parses a JSON scene file into catalog primitives.
//!
//! A scene is a JSON array of records, each with a `kind` naming a catalog
//! entry plus that kind's parameters, e.g.
//! `[{"kind": "rectangle", "width": 4, "height": 2, "fill": true}]`.
//! Vectors are `[x, y]` pairs and point lists are arrays of pairs.

use scrawl::math::vec2;
use scrawl::path::ShapeList;
use scrawl::tessellation::{shape_kind, ParamValue, ShapeParams};
use serde_json::Value;

#[derive(Debug)]
pub enum SceneError {
    Parse(serde_json::Error),
    NotAnArray,
    MissingKind(usize),
    UnknownKind(String),
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::Parse(e) => write!(f, "invalid JSON: {}", e),
            SceneError::NotAnArray => write!(f, "a scene must be a JSON array of primitives"),
            SceneError::MissingKind(i) => write!(f, "primitive #{} has no \"kind\" field", i),
            SceneError::UnknownKind(kind) => write!(f, "unknown shape kind {:?}", kind),
        }
    }
}

impl std::error::Error for SceneError {}

impl From<serde_json::Error> for SceneError {
    fn from(e: serde_json::Error) -> SceneError {
        SceneError::Parse(e)
    }
}

pub struct Primitive {
    pub kind: &'static str,
    pub params: ShapeParams,
}

pub fn parse_scene(input: &str) -> Result<Vec<Primitive>, SceneError> {
    let value: Value = serde_json::from_str(input)?;
    let records = value.as_array().ok_or(SceneError::NotAnArray)?;
    let mut primitives = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        let object = record.as_object().ok_or(SceneError::MissingKind(i))?;
        let kind_name = object
            .get("kind")
            .and_then(Value::as_str)
            .ok_or(SceneError::MissingKind(i))?;
        let kind =
            shape_kind(kind_name).ok_or_else(|| SceneError::UnknownKind(kind_name.to_string()))?;
        let mut params = ShapeParams::new();
        for (key, value) in object {
            if key == "kind" {
                continue;
            }
            if let Some(param) = param_value(value) {
                params.set(key, param);
            } else {
                log::warn!("ignoring field {:?} with unsupported value", key);
            }
        }
        primitives.push(Primitive {
            kind: kind.name,
            params,
        });
    }
    Ok(primitives)
}

/// The merged shape list of every primitive in the scene.
pub fn build_scene(primitives: &[Primitive]) -> ShapeList {
    let mut list = ShapeList::new();
    for primitive in primitives {
        let kind = shape_kind(primitive.kind).expect("validated at parse time");
        list.extend((kind.create_shape_list)(&primitive.params));
    }
    list
}

fn param_value(value: &Value) -> Option<ParamValue> {
    match value {
        Value::Number(n) => Some(ParamValue::Number(n.as_f64()? as f32)),
        Value::Bool(b) => Some(ParamValue::Bool(*b)),
        Value::Array(items) => {
            if let Some(v) = as_pair(items) {
                return Some(ParamValue::Vector(v));
            }
            let points: Option<Vec<_>> = items
                .iter()
                .map(|item| item.as_array().and_then(|pair| as_pair(pair)))
                .collect();
            points.map(ParamValue::Points)
        }
        _ => None,
    }
}

fn as_pair(items: &[Value]) -> Option<scrawl::math::Vector2> {
    if items.len() != 2 {
        return None;
    }
    Some(vec2(
        items[0].as_f64()? as f32,
        items[1].as_f64()? as f32,
    ))
}
