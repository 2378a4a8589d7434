use serde::Serialize;
use utoipa::ToSchema;

use crate::Catalog;

const QUOTE_KEYWORDS: [&str; 5] = ["precio", "cotización", "costo", "cuánto", "cotizar"];
const CONSULTATION_KEYWORDS: [&str; 5] = ["consulta", "asesoría", "evaluar", "revisar", "analizar"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ConversationKind {
  Quote,
  Consultation,
  General,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ConversationStage {
  Initial,
  Qualifying,
  Recommending,
  Converting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NextAction {
  Whatsapp,
  Calendly,
  Continue,
}

/// Where a visitor stands in the sales conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ConversationFlow {
  #[serde(rename = "type")]
  pub kind: ConversationKind,
  pub stage: ConversationStage,
  pub next_action: NextAction,
  pub product_interest: Option<String>,
}

/// Keyword heuristic over the latest visitor message.
///
/// `history_len` counts the messages already in the conversation log.
pub fn classify(message: &str, history_len: usize, catalog: &Catalog) -> ConversationFlow {
  let lower = message.to_lowercase();
  let mentions = |keywords: &[&str]| keywords.iter().any(|keyword| lower.contains(keyword));

  let wants_quote = mentions(&QUOTE_KEYWORDS);
  let wants_consultation = mentions(&CONSULTATION_KEYWORDS);
  let product_interest = product_mentioned(&lower, catalog);

  let (kind, next_action) = if wants_quote && product_interest.is_some() {
    (ConversationKind::Quote, NextAction::Whatsapp)
  } else if wants_consultation || lower.contains("agendar") {
    (ConversationKind::Consultation, NextAction::Calendly)
  } else {
    (ConversationKind::General, NextAction::Continue)
  };

  let stage = match history_len {
    0 => ConversationStage::Initial,
    _ if wants_quote || wants_consultation => ConversationStage::Converting,
    n if n >= 4 => ConversationStage::Recommending,
    n if n >= 2 => ConversationStage::Qualifying,
    _ => ConversationStage::Initial,
  };

  ConversationFlow {
    kind,
    stage,
    next_action,
    product_interest,
  }
}

/// First product, subcategory or category name contained in `lower`.
fn product_mentioned(lower: &str, catalog: &Catalog) -> Option<String> {
  let products = catalog.all_products().map(|product| product.name.as_str());
  let subcategories = catalog
    .categories()
    .iter()
    .flat_map(|category| category.subcategories())
    .map(|subcategory| subcategory.name.as_str());
  let categories = catalog.categories().iter().map(|category| category.name.as_str());

  products
    .chain(subcategories)
    .chain(categories)
    .find(|name| !name.is_empty() && lower.contains(&name.to_lowercase()))
    .map(str::to_owned)
}
