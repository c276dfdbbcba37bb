//! Placeholder substitution over untyped JSON documents.
//!
//! A string leaf that exactly equals a placeholder name (`fullname`,
//! `address`, `random-text`) is replaced with an independent uniform draw
//! from the matching pool. Every other leaf is copied unchanged, arrays keep
//! their order and objects keep their key set.
//!
//! The walk keeps its own stack of partially rebuilt containers, so nesting
//! depth is bounded by memory rather than by the thread stack.

use rand::Rng;
use serde_json::{Map, Value};

use crate::domain::dataset::PlaceholderDataset;
use crate::domain::placeholder::PlaceholderKind;

/// A container whose children are still being rebuilt.
enum Frame<'a> {
    Sequence {
        items: std::slice::Iter<'a, Value>,
        out: Vec<Value>,
    },
    Mapping {
        entries: serde_json::map::Iter<'a>,
        key: Option<&'a String>,
        out: Map<String, Value>,
    },
}

impl<'a> Frame<'a> {
    fn next_child(&mut self) -> Option<&'a Value> {
        match self {
            Frame::Sequence { items, .. } => items.next(),
            Frame::Mapping { entries, key, .. } => entries.next().map(|(name, value)| {
                *key = Some(name);
                value
            }),
        }
    }

    fn push(&mut self, value: Value) {
        match self {
            Frame::Sequence { out, .. } => out.push(value),
            Frame::Mapping { key, out, .. } => {
                if let Some(name) = key.take() {
                    out.insert(name.clone(), value);
                }
            }
        }
    }

    fn finish(self) -> Value {
        match self {
            Frame::Sequence { out, .. } => Value::Array(out),
            Frame::Mapping { out, .. } => Value::Object(out),
        }
    }
}

/// Returns a copy of `document` with every placeholder leaf replaced by a
/// value sampled from `dataset`. Total over all JSON values.
pub fn fill_placeholders<R: Rng + ?Sized>(
    document: &Value,
    dataset: &PlaceholderDataset,
    rng: &mut R,
) -> Value {
    let mut stack: Vec<Frame<'_>> = Vec::new();
    let mut done = descend(document, dataset, rng, &mut stack);

    loop {
        let child = match (done.take(), stack.last_mut()) {
            (Some(result), None) => return result,
            (Some(result), Some(frame)) => {
                frame.push(result);
                continue;
            }
            (None, Some(frame)) => frame.next_child(),
            // descend() either yields a value or pushes a frame
            (None, None) => return Value::Null,
        };

        done = match child {
            Some(child) => descend(child, dataset, rng, &mut stack),
            None => stack.pop().map(Frame::finish),
        };
    }
}

/// Leaves resolve immediately; containers are pushed and resolve once all
/// of their children have.
fn descend<'a, R: Rng + ?Sized>(
    value: &'a Value,
    dataset: &PlaceholderDataset,
    rng: &mut R,
    stack: &mut Vec<Frame<'a>>,
) -> Option<Value> {
    match value {
        Value::String(text) => Some(substitute(text, dataset, rng)),
        Value::Array(items) => {
            stack.push(Frame::Sequence {
                items: items.iter(),
                out: Vec::with_capacity(items.len()),
            });
            None
        }
        Value::Object(map) => {
            stack.push(Frame::Mapping {
                entries: map.iter(),
                key: None,
                out: Map::with_capacity(map.len()),
            });
            None
        }
        other => Some(other.clone()),
    }
}

fn substitute<R: Rng + ?Sized>(text: &str, dataset: &PlaceholderDataset, rng: &mut R) -> Value {
    match PlaceholderKind::from_placeholder(text) {
        Some(kind) => Value::String(dataset.pool(kind).sample(rng).to_string()),
        None => Value::String(text.to_string()),
    }
}

/// Number of placeholder leaves anywhere in `document`.
pub fn count_placeholders(document: &Value) -> usize {
    let mut pending = vec![document];
    let mut count = 0;

    while let Some(value) = pending.pop() {
        match value {
            Value::String(text) => {
                if PlaceholderKind::from_placeholder(text).is_some() {
                    count += 1;
                }
            }
            Value::Array(items) => pending.extend(items.iter()),
            Value::Object(map) => pending.extend(map.values()),
            _ => {}
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    fn single_value_dataset() -> PlaceholderDataset {
        PlaceholderDataset::new(strings(&["Ann"]), strings(&["1 Oak St"]), strings(&["hi"]))
            .unwrap()
    }

    fn wide_dataset() -> PlaceholderDataset {
        PlaceholderDataset::new(
            strings(&["Ann", "Bea", "Cy", "Dee"]),
            strings(&["1 Oak St", "2 Elm St", "3 Ash Rd"]),
            strings(&["hi", "yo", "hey", "sup", "howdy"]),
        )
        .unwrap()
    }

    /// Same container kinds, lengths and key sets at every level.
    fn same_shape(left: &Value, right: &Value) -> bool {
        match (left, right) {
            (Value::Array(a), Value::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| same_shape(x, y))
            }
            (Value::Object(a), Value::Object(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(key, x)| b.get(key).map_or(false, |y| same_shape(x, y)))
            }
            (Value::String(_), Value::String(_)) => true,
            (a, b) => a == b,
        }
    }

    #[test]
    fn test_object_example() {
        let dataset = single_value_dataset();
        let mut rng = StdRng::seed_from_u64(42);
        let input = json!({"name": "fullname", "note": "random-text", "n": 5});

        let output = fill_placeholders(&input, &dataset, &mut rng);

        assert_eq!(output, json!({"name": "Ann", "note": "hi", "n": 5}));
    }

    #[test]
    fn test_array_example() {
        let dataset = PlaceholderDataset::new(
            strings(&["Ann", "Bea"]),
            strings(&["1 Oak St"]),
            strings(&["hi"]),
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let input = json!(["fullname", "fullname", "other"]);

        let output = fill_placeholders(&input, &dataset, &mut rng);
        let items = output.as_array().unwrap();

        assert_eq!(items.len(), 3);
        for item in &items[..2] {
            let name = item.as_str().unwrap();
            assert!(name == "Ann" || name == "Bea");
        }
        assert_eq!(items[2], json!("other"));
    }

    #[test]
    fn test_nested_example() {
        let dataset = single_value_dataset();
        let mut rng = StdRng::seed_from_u64(42);
        let input = json!({"a": {"b": ["address"]}});

        let output = fill_placeholders(&input, &dataset, &mut rng);

        assert_eq!(output, json!({"a": {"b": ["1 Oak St"]}}));
    }

    #[test]
    fn test_pass_through_leaves() {
        let dataset = wide_dataset();
        let mut rng = StdRng::seed_from_u64(1);
        let input = json!({
            "text": "Fullname",
            "padded": " address",
            "sentence": "my fullname is",
            "int": -3,
            "float": 2.5,
            "yes": true,
            "nothing": null,
            "empty_list": [],
            "empty_map": {}
        });

        let output = fill_placeholders(&input, &dataset, &mut rng);

        assert_eq!(output, input);
    }

    #[test]
    fn test_keys_never_substituted() {
        let dataset = single_value_dataset();
        let mut rng = StdRng::seed_from_u64(42);
        let input = json!({"fullname": "address", "address": 1});

        let output = fill_placeholders(&input, &dataset, &mut rng);

        assert_eq!(output, json!({"fullname": "1 Oak St", "address": 1}));
    }

    #[test]
    fn test_scalar_documents() {
        let dataset = single_value_dataset();
        let mut rng = StdRng::seed_from_u64(42);

        assert_eq!(fill_placeholders(&json!("fullname"), &dataset, &mut rng), json!("Ann"));
        assert_eq!(fill_placeholders(&json!(7), &dataset, &mut rng), json!(7));
        assert_eq!(fill_placeholders(&Value::Null, &dataset, &mut rng), Value::Null);
    }

    #[test]
    fn test_shape_and_pool_membership() {
        let dataset = wide_dataset();
        let mut rng = StdRng::seed_from_u64(99);
        let input = json!({
            "users": [
                {"name": "fullname", "home": "address", "bio": ["random-text", 3, false]},
                {"name": "fullname", "tags": [["address"], {"deep": "random-text"}]}
            ],
            "meta": {"count": 2, "label": "users"}
        });

        let output = fill_placeholders(&input, &dataset, &mut rng);

        assert!(same_shape(&input, &output));
        let users = output["users"].as_array().unwrap();
        for user in users {
            let name = user["name"].as_str().unwrap();
            assert!(dataset.pool(PlaceholderKind::Fullname).contains(name));
        }
        assert!(dataset
            .pool(PlaceholderKind::Address)
            .contains(users[0]["home"].as_str().unwrap()));
        assert!(dataset
            .pool(PlaceholderKind::RandomText)
            .contains(users[0]["bio"][0].as_str().unwrap()));
        assert!(dataset
            .pool(PlaceholderKind::Address)
            .contains(users[1]["tags"][0][0].as_str().unwrap()));
        assert!(dataset
            .pool(PlaceholderKind::RandomText)
            .contains(users[1]["tags"][1]["deep"].as_str().unwrap()));
        assert_eq!(output["meta"], input["meta"]);
    }

    #[test]
    fn test_occurrences_sampled_independently() {
        let dataset = wide_dataset();
        let mut rng = StdRng::seed_from_u64(3);
        let input = Value::Array(vec![json!("fullname"); 64]);

        let output = fill_placeholders(&input, &dataset, &mut rng);
        let distinct: std::collections::HashSet<&str> = output
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item.as_str().unwrap())
            .collect();

        assert!(distinct.len() > 1);
    }

    #[test]
    fn test_same_seed_same_output() {
        let dataset = wide_dataset();
        let input = json!({"a": ["fullname", "address", "random-text"], "b": "fullname"});

        let first = fill_placeholders(&input, &dataset, &mut StdRng::seed_from_u64(42));
        let second = fill_placeholders(&input, &dataset, &mut StdRng::seed_from_u64(42));

        assert_eq!(first, second);
    }

    #[test]
    fn test_deep_nesting() {
        let dataset = single_value_dataset();
        let mut rng = StdRng::seed_from_u64(42);

        let depth = 1_000;
        let mut input = json!("fullname");
        for level in 0..depth {
            input = if level % 2 == 0 {
                Value::Array(vec![input])
            } else {
                json!({ "next": input })
            };
        }

        let output = fill_placeholders(&input, &dataset, &mut rng);
        assert!(same_shape(&input, &output));

        let mut cursor = &output;
        for level in (0..depth).rev() {
            cursor = if level % 2 == 0 { &cursor[0] } else { &cursor["next"] };
        }
        assert_eq!(cursor, &json!("Ann"));
    }

    #[test]
    fn test_count_placeholders() {
        let input = json!({
            "name": "fullname",
            "fullname": 1,
            "list": ["address", "random-text", "other", {"x": "address"}]
        });
        assert_eq!(count_placeholders(&input), 4);
        assert_eq!(count_placeholders(&json!(null)), 0);
    }
}
