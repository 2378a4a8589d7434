//! Turns whatever the automation webhook sends back into one display string
//! plus an optional call-to-action directive.
//!
//! The reply format is not under our control, so every stage is a decoder
//! that either matches or hands over to the next one. [`ResponseNormalizer::normalize`]
//! is total: it always yields non-empty text.

use std::borrow::Cow;

use serde::Serialize;
use tracing::debug;
use utoipa::ToSchema;
use zara_shared::{ContactConfig, CtaDirective};

mod decode;
use decode::{Envelope, ReplyShape, Segment, SimpleReply, decode_envelope, decode_payload};

mod markers;
pub use markers::{MarkerFamily, collapse_whitespace};

/// Display text plus the follow-up actions it should offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct NormalizedReply {
  pub display_text: String,
  pub cta_directive: CtaDirective,
}

impl NormalizedReply {
  fn plain(text: impl Into<String>) -> Self {
    Self {
      display_text: text.into(),
      cta_directive: CtaDirective::None,
    }
  }
}

/// Why a reply fell through to the canned message.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NormalizeError {
  #[error("webhook reply body is empty")]
  EmptyBody,
  #[error("webhook reply has no displayable text")]
  EmptyText,
}

#[derive(Debug, Clone)]
pub struct ResponseNormalizer {
  fallback_text: String,
}

impl ResponseNormalizer {
  /// `fallback_text` must not be blank; it is the last-resort reply.
  pub fn new(fallback_text: impl Into<String>) -> Self {
    Self {
      fallback_text: fallback_text.into(),
    }
  }

  pub fn from_contact(contact: &ContactConfig) -> Self {
    Self::new(contact.fallback_message())
  }

  pub fn fallback_text(&self) -> &str {
    &self.fallback_text
  }

  pub fn normalize(&self, raw_body: &str) -> NormalizedReply {
    match interpret(raw_body) {
      Ok(reply) => reply,
      Err(reason) => {
        debug!(%reason, "using canned fallback reply");
        NormalizedReply::plain(self.fallback_text.clone())
      }
    }
  }
}

// ──────────────────────────────────────────────────
// Pipeline
// ──────────────────────────────────────────────────

/// Interpret a raw webhook body without applying the canned fallback.
pub fn interpret(raw_body: &str) -> Result<NormalizedReply, NormalizeError> {
  if raw_body.trim().is_empty() {
    return Err(NormalizeError::EmptyBody);
  }

  let working: Cow<'_, str> = match decode_envelope(raw_body) {
    Envelope::Output(output) => Cow::Owned(output),
    Envelope::MissingOutput => return Ok(NormalizedReply::plain(raw_body)),
    Envelope::Bare => Cow::Borrowed(raw_body),
  };

  let reply = match decode_payload(&working) {
    None => NormalizedReply::plain(working),
    Some(payload) => match ReplyShape::decode(&payload) {
      ReplyShape::Simple(simple) => resolve_simple(simple),
      ReplyShape::Segmented(segments) => resolve_segments(&segments),
      ReplyShape::Text(text) => NormalizedReply::plain(text),
      ReplyShape::Unrecognized => NormalizedReply::plain(raw_body),
    },
  };

  if reply.display_text.trim().is_empty() {
    return Err(NormalizeError::EmptyText);
  }
  Ok(reply)
}

/// `hasCta` only counts when a known marker backs it up. Messaging markers
/// are looked up before scheduling ones and a simple reply never yields `both`.
fn resolve_simple(reply: SimpleReply) -> NormalizedReply {
  if !reply.has_cta {
    return NormalizedReply::plain(reply.response);
  }

  match MarkerFamily::first_in(&reply.response) {
    Some(family) => NormalizedReply {
      display_text: family.strip_from(&reply.response),
      cta_directive: family.directive(),
    },
    None => NormalizedReply::plain(reply.response),
  }
}

fn resolve_segments(segments: &[Segment]) -> NormalizedReply {
  let display_text = segments
    .iter()
    .filter_map(|segment| segment.text.as_deref())
    .map(str::trim)
    .filter(|text| !text.is_empty())
    .collect::<Vec<_>>()
    .join(" ");

  let buttons = || {
    segments
      .iter()
      .filter(|segment| segment.cta)
      .flat_map(|segment| segment.buttons.iter())
  };
  let messaging = buttons().any(|b| MarkerFamily::Messaging.is_in(b));
  let scheduling = buttons().any(|b| MarkerFamily::Scheduling.is_in(b));

  NormalizedReply {
    display_text,
    cta_directive: CtaDirective::from_flags(messaging, scheduling),
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  const FALLBACK: &str = "Disculpa, tengo problemas técnicos.\nWhatsApp: +52 664 788 0797";

  fn normalize(raw: &str) -> NormalizedReply {
    ResponseNormalizer::new(FALLBACK).normalize(raw)
  }

  fn wrap_output(payload: &serde_json::Value) -> String {
    json!([{ "output": payload.to_string() }]).to_string()
  }

  #[test]
  fn output_array_with_plain_text() {
    let reply = normalize(r#"[{"output":"hello"}]"#);
    assert_eq!(reply.display_text, "hello");
    assert_eq!(reply.cta_directive, CtaDirective::None);
  }

  #[test]
  fn simple_form_strips_messaging_marker() {
    let reply = normalize(r#"[{"output":"{\"response\":\"Hi [CTA_WP] there\",\"hasCta\":true}"}]"#);
    assert_eq!(reply.display_text, "Hi there");
    assert_eq!(reply.cta_directive, CtaDirective::OpenMessagingLink);
  }

  #[test]
  fn simple_form_scheduling_alias() {
    let raw = wrap_output(&json!({"response": "Agendemos una llamada [CTA_CALENDLY]", "has_cta": true}));
    let reply = normalize(&raw);
    assert_eq!(reply.display_text, "Agendemos una llamada");
    assert_eq!(reply.cta_directive, CtaDirective::OpenSchedulingLink);
  }

  #[test]
  fn simple_form_prefers_messaging_when_both_markers_present() {
    let raw = wrap_output(&json!({"response": "Escríbenos [CTA_WA] o agenda [CTA_CLD]", "hasCta": true}));
    let reply = normalize(&raw);
    assert_eq!(reply.cta_directive, CtaDirective::OpenMessagingLink);
    assert_eq!(reply.display_text, "Escríbenos o agenda [CTA_CLD]");
  }

  #[test]
  fn simple_form_flag_without_marker_is_ignored() {
    let raw = wrap_output(&json!({"response": "Con gusto te ayudo", "hasCta": true}));
    let reply = normalize(&raw);
    assert_eq!(reply.display_text, "Con gusto te ayudo");
    assert_eq!(reply.cta_directive, CtaDirective::None);
  }

  #[test]
  fn simple_form_without_flag_keeps_text() {
    let raw = wrap_output(&json!({"response": "Hola [CTA_WP]", "hasCta": false}));
    let reply = normalize(&raw);
    assert_eq!(reply.display_text, "Hola [CTA_WP]");
    assert_eq!(reply.cta_directive, CtaDirective::None);
  }

  #[test]
  fn fenced_json_inside_output() {
    let output = "```json\n{\"response\":\"Te agendo [CTA_CLD]\",\"has_cta\":true}\n```";
    let raw = json!([{ "output": output }]).to_string();
    let reply = normalize(&raw);
    assert_eq!(reply.display_text, "Te agendo");
    assert_eq!(reply.cta_directive, CtaDirective::OpenSchedulingLink);
  }

  #[test]
  fn segmented_form_joins_text_and_reads_buttons() {
    let segments = json!([
      {"text": "Part A", "cta": true, "buttons": "[CTA_CLD]"},
      {"text": "Part B"}
    ]);
    let expected = NormalizedReply {
      display_text: "Part A Part B".into(),
      cta_directive: CtaDirective::OpenSchedulingLink,
    };

    assert_eq!(normalize(&wrap_output(&segments)), expected);
  }

  #[test]
  fn segment_list_without_output_is_shown_raw() {
    let raw = r#"[{"text":"x","cta":true,"buttons":"[CTA_WP]"}]"#;
    let reply = normalize(raw);
    assert_eq!(reply.display_text, raw);
    assert_eq!(reply.cta_directive, CtaDirective::None);
  }

  #[test]
  fn segmented_form_aggregates_both_families() {
    let segments = json!([
      {"text": "Cotiza", "cta": true, "botones": "[CTA_WP]"},
      {"text": "o agenda", "cta": true, "botones": ["[CTA_CALENDLY]"]}
    ]);
    let reply = normalize(&wrap_output(&segments));
    assert_eq!(reply.display_text, "Cotiza o agenda");
    assert_eq!(reply.cta_directive, CtaDirective::Both);
  }

  #[test]
  fn segmented_buttons_need_cta_flag() {
    let segments = json!([
      {"text": "Solo texto", "buttons": "[CTA_WP]"},
      {"text": "más", "cta": true}
    ]);
    let reply = normalize(&wrap_output(&segments));
    assert_eq!(reply.display_text, "Solo texto más");
    assert_eq!(reply.cta_directive, CtaDirective::None);
  }

  #[test]
  fn plain_text_body_is_shown_verbatim() {
    let reply = normalize("not json at all");
    assert_eq!(reply.display_text, "not json at all");
    assert_eq!(reply.cta_directive, CtaDirective::None);
    assert_ne!(reply.display_text, FALLBACK);
  }

  #[test]
  fn empty_body_uses_canned_fallback() {
    for raw in ["", "   \n\t"] {
      let reply = normalize(raw);
      assert_eq!(reply.display_text, FALLBACK);
      assert_eq!(reply.cta_directive, CtaDirective::None);
    }
    assert_eq!(interpret(""), Err(NormalizeError::EmptyBody));
  }

  #[test]
  fn empty_response_field_uses_canned_fallback() {
    let raw = wrap_output(&json!({"response": "  ", "hasCta": false}));
    assert_eq!(interpret(&raw), Err(NormalizeError::EmptyText));
    assert_eq!(normalize(&raw).display_text, FALLBACK);
  }

  #[test]
  fn envelope_without_output_returns_raw_body() {
    let raw = r#"[{"json":{"reply":"hola"}}]"#;
    let reply = normalize(raw);
    assert_eq!(reply.display_text, raw);
    assert_eq!(reply.cta_directive, CtaDirective::None);
  }

  #[test]
  fn unrecognized_object_returns_raw_body() {
    let raw = wrap_output(&json!({"foo": 1}));
    assert_eq!(normalize(&raw).display_text, raw);
  }

  #[test]
  fn known_text_fields_and_bare_objects() {
    assert_eq!(normalize(r#"{"message":"Hola desde n8n"}"#).display_text, "Hola desde n8n");
    let reply = normalize(r#"{"response":"Directo [CTA_WP]","hasCta":true}"#);
    assert_eq!(reply.display_text, "Directo");
    assert_eq!(reply.cta_directive, CtaDirective::OpenMessagingLink);
  }

  #[test]
  fn renormalizing_display_text_is_identity() {
    let first = normalize(r#"[{"output":"{\"response\":\"Hi [CTA_WP] there\",\"hasCta\":true}"}]"#);
    let second = normalize(&first.display_text);
    assert_eq!(second.display_text, first.display_text);
    assert_eq!(second.cta_directive, CtaDirective::None);
  }

  #[test]
  fn normalization_is_total() {
    let inputs = [
      "",
      " ",
      "[",
      "]]",
      "{",
      "null",
      "true",
      "42",
      "[]",
      "[null]",
      "[1]",
      r#"[{"output":null}]"#,
      r#"[{"output":42}]"#,
      r#"[{"output":"```json\n{broken\n```"}]"#,
      r#"[{"output":"[]"}]"#,
      r#"[{"output":"\"\""}]"#,
      r#"[{"output":"[{\"cta\":true}]"}]"#,
      "\u{0}\u{1}\u{fffd}",
      "```json\n```",
      "[CTA_WP]",
    ];

    for raw in inputs {
      let reply = normalize(raw);
      assert!(!reply.display_text.trim().is_empty(), "empty text for {raw:?}");
    }
  }
}
