use chrono::Utc;
use rand::Rng;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 9;

/// Correlation id for one chat session: `<prefix>-<unix millis>-<9 base36 chars>`.
///
/// Not a secret and not a security boundary; it only lets the automation side
/// group messages of the same visitor.
pub fn generate_session_id(prefix: &str) -> String {
  let mut rng = rand::rng();
  let suffix: String = (0..SUFFIX_LEN)
    .map(|_| char::from(BASE36[rng.random_range(0..BASE36.len())]))
    .collect();

  format!("{prefix}-{}-{suffix}", Utc::now().timestamp_millis())
}
