//! Small utility helpers used across modules.

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge request payloads. Cuts on a char boundary.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut end = max;
  while !s.is_char_boundary(end) {
    end -= 1;
  }
  format!("{}… ({} bytes total)", &s[..end], s.len())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn short_strings_pass_through() {
    assert_eq!(trunc_for_log("apple", 10), "apple");
  }

  #[test]
  fn truncation_respects_char_boundaries() {
    // "りんご" is 9 bytes; byte 4 falls inside the second char.
    assert_eq!(trunc_for_log("りんご", 4), "り… (9 bytes total)");
  }
}
