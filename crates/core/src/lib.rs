mod normalizer;
pub use normalizer::{
  MarkerFamily, NormalizeError, NormalizedReply, ResponseNormalizer, collapse_whitespace, interpret,
};

mod contact;
pub use contact::{ContactLinks, CtaAction, CtaActionKind, PLACEHOLDER_LINK};

mod session;
pub use session::{
  ChatSession, ConversationLog, SESSION_ID_PREFIX, TurnError, generate_session_id, validate_input,
};

mod catalog;
pub use catalog::{Catalog, CatalogError, Category, CategoryContents, Product, Subcategory};

mod intent;
pub use intent::{ConversationFlow, ConversationKind, ConversationStage, NextAction, classify};
