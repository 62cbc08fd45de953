//! Serde mirror of the YAML document schema.
//!
//! These types accept the document as loosely as it is usually written:
//! every field is optional, box and port maps may have empty values, and
//! scalar text fields also accept numbers and booleans (`version: 1.2`).
//! Defaults are applied later, when lowering into the semantic model.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, de};

/// Text written as any YAML scalar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Scalar(pub String);

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match serde_yaml::Value::deserialize(deserializer)? {
            serde_yaml::Value::String(text) => Ok(Self(text)),
            serde_yaml::Value::Number(number) => Ok(Self(number.to_string())),
            serde_yaml::Value::Bool(flag) => Ok(Self(flag.to_string())),
            other => Err(de::Error::custom(format!(
                "expected a string, found {}",
                value_kind(&other)
            ))),
        }
    }
}

fn value_kind(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "a boolean",
        serde_yaml::Value::Number(_) => "a number",
        serde_yaml::Value::String(_) => "a string",
        serde_yaml::Value::Sequence(_) => "a list",
        serde_yaml::Value::Mapping(_) => "a mapping",
        serde_yaml::Value::Tagged(_) => "a tagged value",
    }
}

/// A single value or a list of values.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(value) => vec![value],
            Self::Many(values) => values,
        }
    }
}

/// Box name → box definition. A bare `Name:` entry has no definition.
pub(crate) type RawBoxMap = IndexMap<String, Option<RawBox>>;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawDocument {
    #[serde(default)]
    pub diagram: Option<Scalar>,
    #[serde(default)]
    pub title: Option<Scalar>,
    #[serde(default)]
    pub flow: Option<Scalar>,
    #[serde(default)]
    pub dpi: Option<u32>,
    #[serde(default)]
    pub style: Option<RawStyle>,
    #[serde(default)]
    pub boxes: Option<RawBoxMap>,
    #[serde(default)]
    pub edges: Option<Vec<RawEdge>>,
    #[serde(default)]
    pub legend: Option<RawLegend>,
    #[serde(default)]
    pub metadata: Option<RawMetadata>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawStyle {
    #[serde(default)]
    pub font: Option<Scalar>,
    #[serde(default)]
    pub border_weight: Option<OneOrMany<f32>>,
    #[serde(default)]
    pub backgrounds: Option<OneOrMany<Scalar>>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawBox {
    #[serde(default)]
    pub label: Option<Scalar>,
    #[serde(default)]
    pub description: Option<Scalar>,
    #[serde(default)]
    pub technology: Option<Scalar>,
    #[serde(default)]
    pub zoom: Option<Scalar>,
    #[serde(default)]
    pub style: Option<RawBoxStyle>,
    #[serde(default)]
    pub ports: Option<IndexMap<String, Option<RawPort>>>,
    #[serde(default)]
    pub children: Option<RawBoxMap>,
    #[serde(default)]
    pub actors: Option<RawBoxMap>,
    #[serde(default)]
    pub actor: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawBoxStyle {
    #[serde(default)]
    pub background: Option<Scalar>,
    #[serde(default, alias = "colour")]
    pub color: Option<Scalar>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawPort {
    #[serde(default)]
    pub dir: Option<Scalar>,
    #[serde(default)]
    pub label: Option<Scalar>,
    #[serde(default)]
    pub side: Option<Scalar>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawEdge {
    #[serde(default)]
    pub from: Option<Scalar>,
    #[serde(default)]
    pub to: Option<Scalar>,
    #[serde(default)]
    pub label: Option<Scalar>,
    #[serde(default)]
    pub colour: Option<Scalar>,
    #[serde(default)]
    pub style: Option<RawEdgeStyle>,
}

/// `style: dashed` or `style: { color: blue, dashed: true }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawEdgeStyle {
    Keyword(String),
    Options(RawEdgeStyleOptions),
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawEdgeStyleOptions {
    #[serde(default, alias = "colour")]
    pub color: Option<Scalar>,
    #[serde(default)]
    pub dashed: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawLegend {
    #[serde(default)]
    pub edge_colours: Option<IndexMap<String, Scalar>>,
    #[serde(default)]
    pub port_table: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawMetadata {
    #[serde(default)]
    pub author: Option<Scalar>,
    #[serde(default)]
    pub date: Option<Scalar>,
    #[serde(default)]
    pub version: Option<Scalar>,
    #[serde(default)]
    pub status: Option<Scalar>,
    #[serde(default)]
    pub scope: Option<Scalar>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_accepts_numbers_and_bools() {
        let metadata: RawMetadata =
            serde_yaml::from_str("version: 1.2\nstatus: true\nauthor: Ana\n").unwrap();
        assert_eq!(metadata.version, Some(Scalar("1.2".to_string())));
        assert_eq!(metadata.status, Some(Scalar("true".to_string())));
        assert_eq!(metadata.author, Some(Scalar("Ana".to_string())));
        assert_eq!(metadata.date, None);
    }

    #[test]
    fn test_scalar_rejects_lists() {
        let result = serde_yaml::from_str::<RawMetadata>("author: [a, b]\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_bare_box_entries() {
        let boxes: RawBoxMap = serde_yaml::from_str("Inner A:\nInner B:\n  label: B\n").unwrap();
        assert_eq!(boxes.len(), 2);
        assert!(boxes["Inner A"].is_none());
        assert!(boxes["Inner B"].is_some());
    }

    #[test]
    fn test_edge_style_forms() {
        let keyword: RawEdge = serde_yaml::from_str("from: A\nto: B\nstyle: dashed\n").unwrap();
        assert!(matches!(keyword.style, Some(RawEdgeStyle::Keyword(ref k)) if k == "dashed"));

        let options: RawEdge =
            serde_yaml::from_str("from: A\nto: B\nstyle:\n  colour: Blue\n  dashed: true\n")
                .unwrap();
        match options.style {
            Some(RawEdgeStyle::Options(options)) => {
                assert_eq!(options.color, Some(Scalar("Blue".to_string())));
                assert_eq!(options.dashed, Some(true));
            }
            other => panic!("unexpected style {other:?}"),
        }
    }

    #[test]
    fn test_border_weight_single_value() {
        let style: RawStyle = serde_yaml::from_str("borderWeight: 2\n").unwrap();
        let weights = style.border_weight.map(OneOrMany::into_vec);
        assert_eq!(weights, Some(vec![2.0]));
    }
}
