//! Log format classification.
//!
//! A loaded document is resolved exactly once into a [`ClassifiedLog`]:
//! either a list of [`StandardTree`] records (father/child MCTS logs) or a
//! list of [`LayeredTree`] records (step-indexed expansion logs). The
//! builders then work on these typed variants and never sniff raw JSON.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::FormatError;
use crate::graph::TreeKind;

/// Tree name used for records in a standard list document.
pub const LIST_TREE_NAME: &str = "last_tree";

/// Tree name used for a lone standard object.
pub const SINGLE_TREE_NAME: &str = "single";

/// Fallback problem index when a standard record carries none.
const UNKNOWN_INDEX: &str = "unknown";

/// A document resolved to one of the supported log shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedLog {
    /// Father/child logs, one tree per record holding a `fathers` mapping.
    Standard(Vec<StandardTree>),
    /// Layered step logs, one tree per record.
    Layered(Vec<LayeredTree>),
}

impl ClassifiedLog {
    /// Which tree kind this document holds.
    pub fn kind(&self) -> TreeKind {
        match self {
            ClassifiedLog::Standard(_) => TreeKind::Standard,
            ClassifiedLog::Layered(_) => TreeKind::Layered,
        }
    }

    /// Number of logical trees in the document.
    pub fn len(&self) -> usize {
        match self {
            ClassifiedLog::Standard(trees) => trees.len(),
            ClassifiedLog::Layered(trees) => trees.len(),
        }
    }

    /// True when the document holds no logical trees.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One father/child MCTS record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StandardTree {
    /// Problem index from the record, rendered as text.
    pub problem: String,
    /// Tree name within the problem.
    pub name: String,
    /// `(child, parent)` pairs in log order; `None` marks the root.
    pub fathers: Vec<(String, Option<String>)>,
    /// `(parent, children)` pairs in log order, when the log lists them.
    pub childs: Option<Vec<(String, Vec<String>)>>,
    /// Reward samples keyed by content.
    pub rewards: HashMap<String, Vec<f64>>,
    /// Exploration order, used when `fathers` is empty.
    pub to_explore: Vec<String>,
}

/// One layered step-log record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayeredTree {
    /// Problem index from `idx`, or the record position.
    pub problem: String,
    /// Expansion rounds in log order.
    pub steps: Vec<LayeredStep>,
}

/// One expansion round of a layered record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayeredStep {
    /// Initial task input (step 0 only).
    pub x: Option<String>,
    /// Parent contents active at this step.
    pub ys: Vec<String>,
    /// Generated children.
    pub new_ys: Expansion,
    /// Children carried into the next step.
    pub select_new_ys: Vec<String>,
}

/// The `new_ys` payload of a step.
#[derive(Debug, Clone, PartialEq)]
pub enum Expansion {
    /// A flat list of children of one implicit parent (step 0 shape).
    Flat(Vec<String>),
    /// One child list per entry of `ys`.
    Grouped(Vec<Vec<String>>),
}

impl Default for Expansion {
    fn default() -> Self {
        Expansion::Grouped(Vec::new())
    }
}

impl Expansion {
    /// Number of top-level entries, as listed in the log.
    pub fn len(&self) -> usize {
        match self {
            Expansion::Flat(children) => children.len(),
            Expansion::Grouped(groups) => groups.len(),
        }
    }

    /// True when the payload lists nothing.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True for the per-parent shape.
    pub fn is_grouped(&self) -> bool {
        matches!(self, Expansion::Grouped(_))
    }

    fn from_value(value: Option<&Value>) -> Self {
        let Some(Value::Array(items)) = value else {
            return Expansion::default();
        };
        if items.iter().all(Value::is_array) {
            Expansion::Grouped(
                items
                    .iter()
                    .map(|group| string_list(Some(group)))
                    .collect(),
            )
        } else {
            Expansion::Flat(items.iter().map(content_of).collect())
        }
    }
}

/// Classify a parsed document and extract its logical trees.
pub fn classify(document: &Value) -> Result<ClassifiedLog, FormatError> {
    match document {
        Value::Array(items) => classify_list(items),
        Value::Object(object) => match fathers_holder(object) {
            Some(holder) => {
                let problem = object
                    .get("index")
                    .map(index_text)
                    .unwrap_or_else(|| "0".to_string());
                Ok(ClassifiedLog::Standard(vec![standard_tree(
                    holder,
                    problem,
                    SINGLE_TREE_NAME,
                )]))
            }
            None => Err(FormatError::UnrecognizedShape {
                message: "object has no 'fathers' mapping".to_string(),
            }),
        },
        other => Err(FormatError::UnrecognizedShape {
            message: format!("expected a list or object, found {}", json_type(other)),
        }),
    }
}

fn classify_list(items: &[Value]) -> Result<ClassifiedLog, FormatError> {
    let Some(first) = items.first() else {
        return Err(FormatError::EmptyDocument);
    };

    if is_layered_record(first) {
        let trees = items
            .iter()
            .enumerate()
            .map(|(position, item)| layered_tree(item, position))
            .collect();
        return Ok(ClassifiedLog::Layered(trees));
    }

    let mut trees = Vec::new();
    for (position, item) in items.iter().enumerate() {
        let Value::Object(object) = item else {
            debug!(position, "Skipping non-object record");
            continue;
        };
        let Some(holder) = fathers_holder(object) else {
            debug!(position, "Skipping record without 'fathers' mapping");
            continue;
        };
        let problem = object
            .get("index")
            .map(index_text)
            .unwrap_or_else(|| UNKNOWN_INDEX.to_string());
        trees.push(standard_tree(holder, problem, LIST_TREE_NAME));
    }

    if trees.is_empty() {
        return Err(FormatError::UnrecognizedShape {
            message: "no record has 'steps' with an initial 'x' or a 'fathers' mapping"
                .to_string(),
        });
    }
    Ok(ClassifiedLog::Standard(trees))
}

/// First record has `steps` whose first element carries `x`.
fn is_layered_record(record: &Value) -> bool {
    record
        .get("steps")
        .and_then(Value::as_array)
        .and_then(|steps| steps.first())
        .and_then(Value::as_object)
        .is_some_and(|step| step.contains_key("x"))
}

/// The object holding `fathers`: the record itself or its `data` field.
fn fathers_holder(object: &Map<String, Value>) -> Option<&Map<String, Value>> {
    if object.get("fathers").is_some_and(Value::is_object) {
        return Some(object);
    }
    object
        .get("data")
        .and_then(Value::as_object)
        .filter(|data| data.get("fathers").is_some_and(Value::is_object))
}

fn standard_tree(holder: &Map<String, Value>, problem: String, name: &str) -> StandardTree {
    let fathers = holder
        .get("fathers")
        .and_then(Value::as_object)
        .map(|map| {
            map.iter()
                .map(|(child, parent)| {
                    let parent = match parent {
                        Value::Null => None,
                        other => Some(content_of(other)),
                    };
                    (child.clone(), parent)
                })
                .collect()
        })
        .unwrap_or_default();

    let childs = holder
        .get("childs")
        .and_then(Value::as_object)
        .filter(|map| !map.is_empty())
        .map(|map| {
            map.iter()
                .map(|(parent, children)| (parent.clone(), string_list(Some(children))))
                .collect()
        });

    let rewards = holder
        .get("to_explore_reward")
        .and_then(Value::as_object)
        .map(|map| {
            map.iter()
                .map(|(content, samples)| (content.clone(), reward_samples(samples)))
                .collect()
        })
        .unwrap_or_default();

    StandardTree {
        problem,
        name: name.to_string(),
        fathers,
        childs,
        rewards,
        to_explore: string_list(holder.get("to_explore")),
    }
}

fn layered_tree(item: &Value, position: usize) -> LayeredTree {
    let problem = item
        .get("idx")
        .map(index_text)
        .unwrap_or_else(|| position.to_string());
    let steps = item
        .get("steps")
        .and_then(Value::as_array)
        .map(|steps| steps.iter().map(layered_step).collect())
        .unwrap_or_default();
    LayeredTree { problem, steps }
}

fn layered_step(step: &Value) -> LayeredStep {
    LayeredStep {
        x: step.get("x").filter(|v| !v.is_null()).map(content_of),
        ys: string_list(step.get("ys")),
        new_ys: Expansion::from_value(step.get("new_ys")),
        select_new_ys: string_list(step.get("select_new_ys")),
    }
}

/// Numeric samples of a reward list; non-numbers are ignored.
fn reward_samples(value: &Value) -> Vec<f64> {
    match value {
        Value::Array(items) => items.iter().filter_map(Value::as_f64).collect(),
        other => other.as_f64().into_iter().collect(),
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().map(content_of).collect(),
        _ => Vec::new(),
    }
}

/// Text of a content value; non-strings use their JSON text.
fn content_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn index_text(value: &Value) -> String {
    match value {
        Value::Null => UNKNOWN_INDEX.to_string(),
        other => content_of(other),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
