use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

// ──────────────────────────────────────────────────
// Envelope: `[{"output": "..."}]`
// ──────────────────────────────────────────────────

/// Outer wrapping the automation platform puts around a reply.
#[derive(Debug, PartialEq)]
pub(crate) enum Envelope {
  /// First item's `output`, to be decoded further.
  Output(String),
  /// A non-empty array without a usable `output`. The raw body is shown as-is.
  MissingOutput,
  /// No envelope; the raw body itself is the payload.
  Bare,
}

pub(crate) fn decode_envelope(raw: &str) -> Envelope {
  let Ok(Value::Array(items)) = serde_json::from_str::<Value>(raw) else {
    return Envelope::Bare;
  };
  let Some(first) = items.first() else {
    return Envelope::Bare;
  };

  match first.get("output") {
    Some(Value::String(output)) if !output.is_empty() => Envelope::Output(output.clone()),
    Some(nested @ (Value::Object(_) | Value::Array(_))) => Envelope::Output(nested.to_string()),
    _ => Envelope::MissingOutput,
  }
}

// ──────────────────────────────────────────────────
// Payload: JSON directly, or JSON inside a ```json fence
// ──────────────────────────────────────────────────

static JSON_FENCE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"```json[ \t]*\r?\n([\s\S]*?)\r?\n[ \t]*```").expect("static regex")
});

/// Structured payload carried by the working string, if any.
///
/// Bare scalars (`42`, `true`, `null`) are not payloads: the text is shown as
/// written.
pub(crate) fn decode_payload(working: &str) -> Option<Value> {
  let value = serde_json::from_str::<Value>(working.trim()).ok().or_else(|| {
    let fenced = JSON_FENCE.captures(working)?.get(1)?.as_str();
    serde_json::from_str::<Value>(fenced).ok()
  })?;

  match value {
    Value::Object(_) | Value::Array(_) | Value::String(_) => Some(value),
    Value::Null | Value::Bool(_) | Value::Number(_) => None,
  }
}

// ──────────────────────────────────────────────────
// Shapes
// ──────────────────────────────────────────────────

#[derive(Debug, thiserror::Error, PartialEq)]
pub(crate) enum ShapeMismatch {
  #[error("expected a JSON object")]
  NotObject,
  #[error("missing string field `{0}`")]
  MissingField(&'static str),
  #[error("expected a non-empty array of objects")]
  NotSegmentList,
  #[error("no text-bearing field")]
  NoText,
}

/// `{"response": "...", "hasCta": true}`
#[derive(Debug, PartialEq)]
pub(crate) struct SimpleReply {
  pub response: String,
  pub has_cta: bool,
}

impl TryFrom<&Value> for SimpleReply {
  type Error = ShapeMismatch;

  fn try_from(value: &Value) -> Result<Self, Self::Error> {
    let object = value.as_object().ok_or(ShapeMismatch::NotObject)?;
    let response = object
      .get("response")
      .and_then(Value::as_str)
      .ok_or(ShapeMismatch::MissingField("response"))?;
    let has_cta = object
      .get("hasCta")
      .or_else(|| object.get("has_cta"))
      .is_some_and(is_truthy);

    Ok(Self {
      response: response.to_owned(),
      has_cta,
    })
  }
}

/// One element of `[{"text": "...", "cta": true, "buttons": "[CTA_WP]"}, ...]`.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct Segment {
  pub text: Option<String>,
  pub cta: bool,
  pub buttons: Vec<String>,
}

impl From<&Map<String, Value>> for Segment {
  fn from(object: &Map<String, Value>) -> Self {
    let buttons = match object.get("buttons").or_else(|| object.get("botones")) {
      Some(Value::String(single)) => vec![single.clone()],
      Some(Value::Array(many)) => many
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_owned)
        .collect(),
      _ => Vec::new(),
    };

    Self {
      text: object.get("text").and_then(Value::as_str).map(str::to_owned),
      cta: object.get("cta").is_some_and(is_truthy),
      buttons,
    }
  }
}

pub(crate) fn decode_segments(value: &Value) -> Result<Vec<Segment>, ShapeMismatch> {
  let items = value
    .as_array()
    .filter(|items| !items.is_empty())
    .ok_or(ShapeMismatch::NotSegmentList)?;

  items
    .iter()
    .map(|item| {
      item
        .as_object()
        .map(Segment::from)
        .ok_or(ShapeMismatch::NotSegmentList)
    })
    .collect()
}

/// Plain JSON string, or an object with a well-known text field.
pub(crate) fn decode_text(value: &Value) -> Result<String, ShapeMismatch> {
  match value {
    Value::String(text) => Ok(text.clone()),
    Value::Object(object) => ["message", "text", "output"]
      .iter()
      .find_map(|key| object.get(*key).and_then(Value::as_str))
      .map(str::to_owned)
      .ok_or(ShapeMismatch::NoText),
    _ => Err(ShapeMismatch::NoText),
  }
}

/// Reply shapes, in the order they are tried.
#[derive(Debug, PartialEq)]
pub(crate) enum ReplyShape {
  Simple(SimpleReply),
  Segmented(Vec<Segment>),
  Text(String),
  Unrecognized,
}

impl ReplyShape {
  pub(crate) fn decode(value: &Value) -> Self {
    SimpleReply::try_from(value)
      .map(Self::Simple)
      .or_else(|_| decode_segments(value).map(Self::Segmented))
      .or_else(|_| decode_text(value).map(Self::Text))
      .unwrap_or_else(|err| {
        tracing::trace!(reason = %err, "webhook payload matches no known shape");
        Self::Unrecognized
      })
  }
}

fn is_truthy(value: &Value) -> bool {
  match value {
    Value::Bool(flag) => *flag,
    Value::String(text) => !text.is_empty() && text != "false",
    Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
    Value::Array(_) | Value::Object(_) => true,
    Value::Null => false,
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn envelope_variants() {
    assert_eq!(
      decode_envelope(r#"[{"output":"hola"}]"#),
      Envelope::Output("hola".into())
    );
    assert_eq!(decode_envelope(r#"[{"other":1}]"#), Envelope::MissingOutput);
    assert_eq!(decode_envelope(r#"[{"output":""}]"#), Envelope::MissingOutput);
    assert_eq!(decode_envelope("[]"), Envelope::Bare);
    assert_eq!(decode_envelope(r#"{"output":"x"}"#), Envelope::Bare);
    assert_eq!(decode_envelope("texto"), Envelope::Bare);
  }

  #[test]
  fn nested_output_objects_are_reserialized() {
    let Envelope::Output(output) = decode_envelope(r#"[{"output":{"response":"hola"}}]"#) else {
      panic!("expected output");
    };
    assert_eq!(serde_json::from_str::<Value>(&output).unwrap(), json!({"response": "hola"}));
  }

  #[test]
  fn segment_lists_without_output_are_terminal() {
    assert_eq!(
      decode_envelope(r#"[{"text":"a","cta":true,"botones":"[CTA_WP]"}]"#),
      Envelope::MissingOutput
    );
  }

  #[test]
  fn payload_from_fenced_block() {
    let working = "Aquí va:\n```json\n{\"response\":\"hola\"}\n```\nfin";
    assert_eq!(decode_payload(working), Some(json!({"response": "hola"})));
  }

  #[test]
  fn payload_rejects_plain_text_and_scalars() {
    assert_eq!(decode_payload("hola mundo"), None);
    assert_eq!(decode_payload("42"), None);
    assert_eq!(decode_payload("null"), None);
    assert_eq!(decode_payload("```json\n{roto\n```"), None);
  }

  #[test]
  fn simple_accepts_both_flag_spellings() {
    let camel = SimpleReply::try_from(&json!({"response": "a", "hasCta": true})).unwrap();
    let snake = SimpleReply::try_from(&json!({"response": "a", "has_cta": true})).unwrap();
    let absent = SimpleReply::try_from(&json!({"response": "a"})).unwrap();
    assert!(camel.has_cta && snake.has_cta);
    assert!(!absent.has_cta);
    assert_eq!(
      SimpleReply::try_from(&json!({"response": 3})),
      Err(ShapeMismatch::MissingField("response"))
    );
  }

  #[test]
  fn segments_accept_string_or_list_buttons() {
    let segments = decode_segments(&json!([
      {"text": "A", "cta": true, "buttons": "[CTA_WP]"},
      {"text": "B", "cta": "true", "botones": ["[CTA_CLD]", 5]},
      {}
    ]))
    .unwrap();

    assert_eq!(segments[0].buttons, vec!["[CTA_WP]"]);
    assert!(segments[1].cta);
    assert_eq!(segments[1].buttons, vec!["[CTA_CLD]"]);
    assert_eq!(segments[2], Segment::default());
  }

  #[test]
  fn shape_priority() {
    assert!(matches!(
      ReplyShape::decode(&json!({"response": "r", "text": "t"})),
      ReplyShape::Simple(_)
    ));
    assert!(matches!(
      ReplyShape::decode(&json!([{"text": "t"}])),
      ReplyShape::Segmented(_)
    ));
    assert_eq!(
      ReplyShape::decode(&json!({"message": "m", "text": "t"})),
      ReplyShape::Text("m".into())
    );
    assert_eq!(ReplyShape::decode(&json!([1, 2])), ReplyShape::Unrecognized);
    assert_eq!(ReplyShape::decode(&json!([])), ReplyShape::Unrecognized);
    assert_eq!(ReplyShape::decode(&json!({"foo": 1})), ReplyShape::Unrecognized);
  }
}
