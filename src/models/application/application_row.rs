//! The slice of an application this service reads.

use sqlx::FromRow;

/// Only applications in this status accept uploads.
pub const ACCEPTED_STATUS: &str = "Accepted";

#[derive(Debug, FromRow)]
pub struct ApplicationRow {
  pub id: i64,
  pub status: String,
}

impl ApplicationRow {
  /// Exact, case-sensitive match.
  pub fn is_accepted(&self) -> bool {
    self.status == ACCEPTED_STATUS
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn only_exact_accepted_status_passes() {
    let row = |s: &str| ApplicationRow {
      id: 1,
      status: s.to_string(),
    };
    assert!(row("Accepted").is_accepted());
    assert!(!row("accepted").is_accepted());
    assert!(!row("Accepted ").is_accepted());
    assert!(!row("Pending").is_accepted());
  }
}
