//! Field paths into node values - minimal JSONPath subset
//!
//! Supports:
//! - `a.b.c` and `$.a.b.c` (dot notation)
//! - `a[0].b` and `a.0.b` (array index)
//! - `a[*].b` in editable patterns only (any index)
//!
//! Does NOT support filters, slices or recursive descent.

use serde_json::{Map, Value};

use crate::error::WizardError;

/// A parsed path segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Object field access: .field
    Field(String),
    /// Array index access: [0]
    Index(usize),
}

/// A segment of an editable-path pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSegment {
    Exact(Segment),
    /// `[*]` - any array index
    AnyIndex,
}

/// Whitelisted leaf path, parsed once at layout construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    segments: Vec<PatternSegment>,
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Result<Self, WizardError> {
        let segments = parse_with(pattern, true)?;
        if segments.is_empty() {
            return Err(WizardError::PathUnsupported {
                path: pattern.to_string(),
            });
        }
        Ok(Self {
            source: pattern.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Full-length match; `[*]` matches any index but never a field
    pub fn matches(&self, path: &[Segment]) -> bool {
        self.segments.len() == path.len()
            && self
                .segments
                .iter()
                .zip(path)
                .all(|(pattern, segment)| match (pattern, segment) {
                    (PatternSegment::AnyIndex, Segment::Index(_)) => true,
                    (PatternSegment::AnyIndex, Segment::Field(_)) => false,
                    (PatternSegment::Exact(expected), actual) => expected == actual,
                })
    }
}

/// Parse a path string into segments
///
/// Examples:
/// - "limits.cpu" → [Field("limits"), Field("cpu")]
/// - "containers[0].name" → [Field("containers"), Index(0), Field("name")]
pub fn parse(path: &str) -> Result<Vec<Segment>, WizardError> {
    parse_with(path, false)?
        .into_iter()
        .map(|segment| match segment {
            PatternSegment::Exact(segment) => Ok(segment),
            PatternSegment::AnyIndex => Err(WizardError::PathUnsupported {
                path: path.to_string(),
            }),
        })
        .collect()
}

fn parse_with(path: &str, allow_wildcard: bool) -> Result<Vec<PatternSegment>, WizardError> {
    let unsupported = || WizardError::PathUnsupported {
        path: path.to_string(),
    };

    let body = if let Some(stripped) = path.strip_prefix("$.") {
        stripped
    } else if path == "$" {
        return Ok(vec![]);
    } else {
        path
    };

    if body.is_empty() {
        return Ok(vec![]);
    }

    let mut segments = Vec::new();

    for part in body.split('.') {
        if part.is_empty() {
            return Err(unsupported());
        }

        let Some(bracket_pos) = part.find('[') else {
            // Numeric segment treated as array index (e.g., "items.0")
            match part.parse::<usize>() {
                Ok(index) => segments.push(PatternSegment::Exact(Segment::Index(index))),
                Err(_) => segments.push(PatternSegment::Exact(Segment::Field(part.to_string()))),
            }
            continue;
        };

        let field = &part[..bracket_pos];
        if !field.is_empty() {
            segments.push(PatternSegment::Exact(Segment::Field(field.to_string())));
        }

        // One or more [n] groups: "a[0][1]"
        let mut rest = &part[bracket_pos..];
        while !rest.is_empty() {
            let inner_end = rest.find(']').ok_or_else(unsupported)?;
            if !rest.starts_with('[') {
                return Err(unsupported());
            }
            let inner = &rest[1..inner_end];
            if inner == "*" && allow_wildcard {
                segments.push(PatternSegment::AnyIndex);
            } else {
                let index: usize = inner.parse().map_err(|_| unsupported())?;
                segments.push(PatternSegment::Exact(Segment::Index(index)));
            }
            rest = &rest[inner_end + 1..];
        }
    }

    Ok(segments)
}

/// Write `leaf` at `segments`, leaving sibling fields untouched
///
/// Missing object keys (and null intermediates) become objects. Indices must
/// already exist; traversing through a scalar is an error.
pub fn set(target: &mut Value, segments: &[Segment], leaf: Value) -> Result<(), WizardError> {
    let Some((last, parents)) = segments.split_last() else {
        *target = leaf;
        return Ok(());
    };

    let mut current = target;
    for segment in parents {
        current = step_mut(current, segment, segments)?;
    }

    match last {
        Segment::Field(name) => {
            if current.is_null() {
                *current = Value::Object(Map::new());
            }
            match current {
                Value::Object(map) => {
                    map.insert(name.clone(), leaf);
                    Ok(())
                }
                other => Err(traversal_error(last, other, segments)),
            }
        }
        Segment::Index(idx) => {
            if !has_index(current, *idx) {
                return Err(traversal_error(last, current, segments));
            }
            if let Value::Array(items) = current {
                items[*idx] = leaf;
            }
            Ok(())
        }
    }
}

fn step_mut<'a>(
    current: &'a mut Value,
    segment: &Segment,
    full: &[Segment],
) -> Result<&'a mut Value, WizardError> {
    match segment {
        Segment::Field(name) => {
            if current.is_null() {
                *current = Value::Object(Map::new());
            }
            match current {
                Value::Object(map) => Ok(map.entry(name.clone()).or_insert(Value::Null)),
                other => Err(traversal_error(segment, other, full)),
            }
        }
        Segment::Index(idx) => {
            if !has_index(current, *idx) {
                return Err(traversal_error(segment, current, full));
            }
            match current {
                Value::Array(items) => Ok(&mut items[*idx]),
                other => Err(traversal_error(segment, other, full)),
            }
        }
    }
}

fn has_index(value: &Value, idx: usize) -> bool {
    value.as_array().is_some_and(|items| idx < items.len())
}

fn traversal_error(segment: &Segment, value: &Value, full: &[Segment]) -> WizardError {
    WizardError::InvalidTraversal {
        segment: display_segment(segment),
        value_type: value_type(value).to_string(),
        full_path: display(full),
    }
}

fn display_segment(segment: &Segment) -> String {
    match segment {
        Segment::Field(name) => name.clone(),
        Segment::Index(idx) => format!("[{idx}]"),
    }
}

/// Render segments back to `a.b[0].c` form
pub fn display(segments: &[Segment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Field(name) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(name);
            }
            Segment::Index(idx) => out.push_str(&format!("[{idx}]")),
        }
    }
    out
}

fn value_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
