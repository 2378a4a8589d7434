use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;
use zara_shared::{ContactConfig, CtaDirective};

/// Link used when a contact channel is not configured.
pub const PLACEHOLDER_LINK: &str = "#";

const MESSAGING_BASE_TEXT: &str =
  "Hola, vengo del sitio web de IAMET y me interesa información sobre soluciones Zebra";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum CtaActionKind {
  OpenMessagingLink,
  OpenSchedulingLink,
}

/// A button the chat widget renders under an assistant reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CtaAction {
  pub kind: CtaActionKind,
  pub label: String,
  pub url: String,
}

/// Builds the outbound WhatsApp and booking links.
#[derive(Debug, Clone)]
pub struct ContactLinks {
  whatsapp_number: Option<String>,
  calendly_url: Option<String>,
}

impl ContactLinks {
  pub fn new(contact: &ContactConfig) -> Self {
    let whatsapp_number = contact
      .whatsapp_number
      .as_deref()
      .map(|number| number.chars().filter(char::is_ascii_digit).collect::<String>())
      .filter(|digits| !digits.is_empty());

    Self {
      whatsapp_number,
      calendly_url: contact.calendly_url.clone(),
    }
  }

  /// WhatsApp deep link with a prefilled greeting, optionally followed by
  /// `context` (typically the assistant reply the button belongs to).
  pub fn messaging_link(&self, context: Option<&str>) -> String {
    let text = match context.map(str::trim).filter(|c| !c.is_empty()) {
      Some(context) => format!("{MESSAGING_BASE_TEXT}. {context}"),
      None => MESSAGING_BASE_TEXT.to_owned(),
    };
    self.whatsapp(&text)
  }

  /// WhatsApp deep link asking for a quote on `product_name`.
  pub fn quote_link(&self, product_name: &str) -> String {
    self.whatsapp(&format!(
      "Hola, me interesa obtener una cotización para {product_name}. ¿Podrían ayudarme con más información?"
    ))
  }

  /// Booking page, optionally prefilled with the topic of interest.
  pub fn scheduling_link(&self, interest: Option<&str>) -> String {
    let Some(base) = self.calendly_url.as_deref() else {
      warn!("Calendly URL not configured");
      return PLACEHOLDER_LINK.to_owned();
    };

    match interest.map(str::trim).filter(|i| !i.is_empty()) {
      Some(interest) => {
        let separator = if base.contains('?') { '&' } else { '?' };
        format!(
          "{base}{separator}text={}&details={}",
          urlencoding::encode(&format!("Consulta sobre {interest}")),
          urlencoding::encode(&format!("Interés en soluciones Zebra para {interest}")),
        )
      }
      None => base.to_owned(),
    }
  }

  /// Buttons to render for a directive, messaging first.
  pub fn actions_for(&self, directive: CtaDirective, context: Option<&str>) -> Vec<CtaAction> {
    let mut actions = Vec::with_capacity(2);
    if directive.offers_messaging() {
      actions.push(CtaAction {
        kind: CtaActionKind::OpenMessagingLink,
        label: "Continuar por WhatsApp".to_owned(),
        url: self.messaging_link(context),
      });
    }
    if directive.offers_scheduling() {
      actions.push(CtaAction {
        kind: CtaActionKind::OpenSchedulingLink,
        label: "Agendar Reunión".to_owned(),
        url: self.scheduling_link(None),
      });
    }
    actions
  }

  fn whatsapp(&self, text: &str) -> String {
    match &self.whatsapp_number {
      Some(number) => format!("https://wa.me/{number}?text={}", urlencoding::encode(text)),
      None => {
        warn!("WhatsApp number not configured");
        PLACEHOLDER_LINK.to_owned()
      }
    }
  }
}
