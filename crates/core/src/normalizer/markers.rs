use std::sync::LazyLock;

use regex::Regex;
use zara_shared::CtaDirective;

/// Literal tags the automation workflow embeds in replies to request a CTA.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerFamily {
  /// Route the visitor to WhatsApp.
  Messaging,
  /// Route the visitor to the booking page.
  Scheduling,
}

impl MarkerFamily {
  /// Lookup order when only one family may win.
  pub const PRIORITY: [Self; 2] = [Self::Messaging, Self::Scheduling];

  /// Accepted spellings, matched case-sensitively.
  #[must_use]
  pub const fn tags(self) -> &'static [&'static str] {
    match self {
      Self::Messaging => &["[CTA_WP]", "[CTA_WA]"],
      Self::Scheduling => &["[CTA_CLD]", "[CTA_CALENDLY]"],
    }
  }

  #[must_use]
  pub const fn directive(self) -> CtaDirective {
    match self {
      Self::Messaging => CtaDirective::OpenMessagingLink,
      Self::Scheduling => CtaDirective::OpenSchedulingLink,
    }
  }

  pub fn is_in(self, text: &str) -> bool {
    self.tags().iter().any(|tag| text.contains(tag))
  }

  /// First family present in `text`, in [`Self::PRIORITY`] order.
  pub fn first_in(text: &str) -> Option<Self> {
    Self::PRIORITY.into_iter().find(|family| family.is_in(text))
  }

  /// Remove every tag of this family and tidy the gaps they leave.
  pub fn strip_from(self, text: &str) -> String {
    let stripped = self
      .tags()
      .iter()
      .fold(text.to_owned(), |acc, tag| acc.replace(tag, ""));
    collapse_whitespace(&stripped)
  }
}

static HORIZONTAL_RUN: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"[ \t]{2,}").expect("static regex"));
static LINE_EDGES: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"[ \t]*\n[ \t]*").expect("static regex"));

/// Squash runs of spaces/tabs, drop spaces around line breaks and trim.
/// Line breaks themselves are kept.
pub fn collapse_whitespace(text: &str) -> String {
  let squashed = HORIZONTAL_RUN.replace_all(text, " ");
  LINE_EDGES.replace_all(&squashed, "\n").trim().to_owned()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn both_spellings_are_recognised() {
    assert!(MarkerFamily::Messaging.is_in("hola [CTA_WP]"));
    assert!(MarkerFamily::Messaging.is_in("hola [CTA_WA]"));
    assert!(MarkerFamily::Scheduling.is_in("[CTA_CLD] agenda"));
    assert!(MarkerFamily::Scheduling.is_in("[CTA_CALENDLY]"));
    assert!(!MarkerFamily::Messaging.is_in("[cta_wp]"));
  }

  #[test]
  fn messaging_wins_when_both_present() {
    assert_eq!(
      MarkerFamily::first_in("[CTA_CLD] y [CTA_WA]"),
      Some(MarkerFamily::Messaging)
    );
    assert_eq!(MarkerFamily::first_in("sin marcas"), None);
  }

  #[test]
  fn strip_only_touches_its_own_family() {
    let text = "Escríbenos [CTA_WP] o agenda [CTA_CLD]";
    assert_eq!(
      MarkerFamily::Messaging.strip_from(text),
      "Escríbenos o agenda [CTA_CLD]"
    );
    assert_eq!(
      MarkerFamily::Scheduling.strip_from("[CTA_CALENDLY] Agenda aquí [CTA_CLD]"),
      "Agenda aquí"
    );
  }

  #[test]
  fn collapse_keeps_line_breaks() {
    assert_eq!(collapse_whitespace("  Hola  \n\n  mundo   feliz "), "Hola\n\nmundo feliz");
  }
}
