//! Patch DTOs - Modifiche parziali in stile JSON Patch
//!
//! Un documento di patch è una lista di operazioni `{ op, path, value }`
//! applicate in ordine a uno snapshot serializzato in JSON. Il primo
//! segmento del path confronta i nomi dei campi ignorando le maiuscole
//! (`/nombre` e `/Nombre` sono equivalenti). Se un'operazione fallisce, o se
//! il risultato non si deserializza più nel tipo di partenza, l'intera patch
//! viene rifiutata.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    Add,
    Replace,
    Remove,
    Test,
}

impl PatchOp {
    fn as_str(&self) -> &'static str {
        match self {
            PatchOp::Add => "add",
            PatchOp::Replace => "replace",
            PatchOp::Remove => "remove",
            PatchOp::Test => "test",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PatchOperation {
    pub op: PatchOp,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

#[derive(Debug, Error)]
pub enum PatchError {
    #[error("the patch document is empty")]
    Empty,

    #[error("invalid patch path '{0}'")]
    InvalidPath(String),

    #[error("path '{0}' does not exist")]
    UnknownPath(String),

    #[error("operation '{op}' on '{path}' requires a value")]
    MissingValue { op: &'static str, path: String },

    #[error("test failed at '{0}'")]
    TestFailed(String),

    #[error("patched document is invalid: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// Applica le operazioni a una copia di `target` e restituisce il candidato.
/// `target` non viene mai toccato.
pub fn apply_patch<T>(target: &T, operations: &[PatchOperation]) -> Result<T, PatchError>
where
    T: Serialize + DeserializeOwned,
{
    if operations.is_empty() {
        return Err(PatchError::Empty);
    }

    let mut document = serde_json::to_value(target)?;
    for operation in operations {
        apply_operation(&mut document, operation)?;
    }

    Ok(serde_json::from_value(document)?)
}

fn apply_operation(document: &mut Value, operation: &PatchOperation) -> Result<(), PatchError> {
    let path = operation.path.as_str();
    let mut segments = parse_pointer(path)?;
    let Some(last) = segments.pop() else {
        return Err(PatchError::InvalidPath(path.to_string()));
    };

    let parent = navigate(document, &segments, path)?;
    let value = || {
        operation.value.clone().ok_or_else(|| PatchError::MissingValue {
            op: operation.op.as_str(),
            path: path.to_string(),
        })
    };

    match parent {
        Value::Object(map) => {
            let existing = resolve_key(map, &last);
            match operation.op {
                PatchOp::Add => {
                    map.insert(existing.unwrap_or(last), value()?);
                }
                PatchOp::Replace => {
                    let key = existing.ok_or_else(|| PatchError::UnknownPath(path.to_string()))?;
                    map.insert(key, value()?);
                }
                PatchOp::Remove => {
                    let key = existing.ok_or_else(|| PatchError::UnknownPath(path.to_string()))?;
                    map.remove(&key);
                }
                PatchOp::Test => {
                    let key = existing.ok_or_else(|| PatchError::UnknownPath(path.to_string()))?;
                    let expected = value()?;
                    if !map.get(&key).is_some_and(|actual| json_equal(actual, &expected)) {
                        return Err(PatchError::TestFailed(path.to_string()));
                    }
                }
            }
        }
        Value::Array(items) => {
            let len = items.len();
            let index = if last == "-" && operation.op == PatchOp::Add {
                len
            } else {
                last.parse::<usize>()
                    .map_err(|_| PatchError::InvalidPath(path.to_string()))?
            };
            // add può anche accodare (index == len), le altre no
            let in_bounds = if operation.op == PatchOp::Add {
                index <= len
            } else {
                index < len
            };
            if !in_bounds {
                return Err(PatchError::UnknownPath(path.to_string()));
            }

            match operation.op {
                PatchOp::Add => items.insert(index, value()?),
                PatchOp::Replace => items[index] = value()?,
                PatchOp::Remove => {
                    items.remove(index);
                }
                PatchOp::Test => {
                    if !json_equal(&items[index], &value()?) {
                        return Err(PatchError::TestFailed(path.to_string()));
                    }
                }
            }
        }
        _ => return Err(PatchError::UnknownPath(path.to_string())),
    }

    Ok(())
}

/// Spezza un JSON pointer (`/a/b~1c`) nei suoi segmenti
fn parse_pointer(path: &str) -> Result<Vec<String>, PatchError> {
    let Some(rest) = path.strip_prefix('/') else {
        return Err(PatchError::InvalidPath(path.to_string()));
    };

    Ok(rest
        .split('/')
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
        .collect())
}

fn navigate<'a>(
    document: &'a mut Value,
    segments: &[String],
    path: &str,
) -> Result<&'a mut Value, PatchError> {
    let mut current = document;
    for segment in segments {
        current = match current {
            Value::Object(map) => {
                let key = resolve_key(map, segment)
                    .ok_or_else(|| PatchError::UnknownPath(path.to_string()))?;
                map.get_mut(&key)
                    .ok_or_else(|| PatchError::UnknownPath(path.to_string()))?
            }
            Value::Array(items) => {
                let index = segment
                    .parse::<usize>()
                    .map_err(|_| PatchError::InvalidPath(path.to_string()))?;
                items
                    .get_mut(index)
                    .ok_or_else(|| PatchError::UnknownPath(path.to_string()))?
            }
            _ => return Err(PatchError::UnknownPath(path.to_string())),
        };
    }
    Ok(current)
}

/// Uguaglianza per `test`: i numeri si confrontano per valore (`200` == `200.0`)
fn json_equal(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => a == b,
        },
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| json_equal(a, b))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, a)| b.get(key).is_some_and(|b| json_equal(a, b)))
        }
        _ => actual == expected,
    }
}

/// Chiave esistente che corrisponde al segmento: prima esatta, poi case-insensitive
fn resolve_key(map: &Map<String, Value>, segment: &str) -> Option<String> {
    if map.contains_key(segment) {
        return Some(segment.to_string());
    }
    map.keys()
        .find(|key| key.eq_ignore_ascii_case(segment))
        .cloned()
}
