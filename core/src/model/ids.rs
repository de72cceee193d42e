// core/src/model/ids.rs

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! row_id {
  ($(#[$meta:meta])* $name:ident) => {
    $(#[$meta])*
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct $name(pub i64);

    impl $name {
      pub fn get(self) -> i64 {
        self.0
      }

      /// Store-generated ids start at 1.
      pub fn is_valid(self) -> bool {
        self.0 > 0
      }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
      }
    }

    impl From<i64> for $name {
      fn from(raw: i64) -> Self {
        $name(raw)
      }
    }
  };
}

row_id!(
  /// Authenticated owner of an order.
  UserId
);
row_id!(OrderId);
row_id!(ProductId);
