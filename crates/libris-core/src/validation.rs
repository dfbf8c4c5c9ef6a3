//! Field-level validation of drafts, and the name normalisation used for
//! duplicate detection.
//!
//! Everything here is pure: no store access. Cross-entity rules (existence,
//! uniqueness, delete guards) live in [`crate::catalog`].

use thiserror::Error;

use crate::entity::{
  AuthorDraft, BookDraft, CategoryDraft, CountryDraft, ReviewDraft, ReviewerDraft,
};

pub const MAX_NAME_LEN: usize = 50;
pub const MAX_FIRST_NAME_LEN: usize = 100;
pub const MAX_LAST_NAME_LEN: usize = 200;
pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_HEADLINE_LEN: usize = 200;
pub const MAX_REVIEW_TEXT_LEN: usize = 2000;
pub const ISBN_LEN: std::ops::RangeInclusive<usize> = 3..=10;
pub const RATING_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("field '{field}' is required")]
  Missing { field: &'static str },

  #[error("field '{field}' must be at most {max} characters, got {len}")]
  TooLong {
    field: &'static str,
    max:   usize,
    len:   usize,
  },

  #[error("isbn must be between 3 and 10 characters, got {0}")]
  IsbnLength(usize),

  #[error("rating must be between 1 and 5, got {0}")]
  Rating(u8),
}

pub type ValidationResult<T = ()> = Result<T, ValidationError>;

// ─── Normalisation ───────────────────────────────────────────────────────────

/// The key two names are compared by: trimmed and case-folded.
///
/// `" France"`, `"FRANCE "` and `"france"` all share one key.
pub fn name_key(name: &str) -> String { name.trim().to_lowercase() }

/// ISBNs are compared exactly, after trimming surrounding whitespace.
pub fn normalize_isbn(isbn: &str) -> String { isbn.trim().to_owned() }

// ─── Field helpers ───────────────────────────────────────────────────────────

fn required(field: &'static str, value: &str, max: usize) -> ValidationResult<String> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Err(ValidationError::Missing { field });
  }
  let len = trimmed.chars().count();
  if len > max {
    return Err(ValidationError::TooLong { field, max, len });
  }
  Ok(trimmed.to_owned())
}

fn required_opt(
  field: &'static str,
  value: Option<&str>,
  max: usize,
) -> ValidationResult<String> {
  required(field, value.ok_or(ValidationError::Missing { field })?, max)
}

fn optional(field: &'static str, value: &str, max: usize) -> ValidationResult<String> {
  let len = value.chars().count();
  if len > max {
    return Err(ValidationError::TooLong { field, max, len });
  }
  Ok(value.to_owned())
}

// ─── Per-kind validation ─────────────────────────────────────────────────────

/// Returns the trimmed country name.
pub fn validate_country(draft: &CountryDraft) -> ValidationResult<String> {
  required_opt("name", draft.name.as_deref(), MAX_NAME_LEN)
}

/// Returns the trimmed category name.
pub fn validate_category(draft: &CategoryDraft) -> ValidationResult<String> {
  required_opt("name", draft.name.as_deref(), MAX_NAME_LEN)
}

/// Returns the trimmed `(first_name, last_name)`.
pub fn validate_author(draft: &AuthorDraft) -> ValidationResult<(String, String)> {
  Ok((
    required("first_name", &draft.first_name, MAX_FIRST_NAME_LEN)?,
    required("last_name", &draft.last_name, MAX_LAST_NAME_LEN)?,
  ))
}

/// Returns the trimmed `(first_name, last_name)`.
pub fn validate_reviewer(draft: &ReviewerDraft) -> ValidationResult<(String, String)> {
  Ok((
    required("first_name", &draft.first_name, MAX_FIRST_NAME_LEN)?,
    required("last_name", &draft.last_name, MAX_LAST_NAME_LEN)?,
  ))
}

/// Returns the trimmed `(title, isbn)`.
pub fn validate_book(draft: &BookDraft) -> ValidationResult<(String, String)> {
  let title = required("title", &draft.title, MAX_TITLE_LEN)?;
  let isbn = normalize_isbn(&draft.isbn);
  if isbn.is_empty() {
    return Err(ValidationError::Missing { field: "isbn" });
  }
  let len = isbn.chars().count();
  if !ISBN_LEN.contains(&len) {
    return Err(ValidationError::IsbnLength(len));
  }
  Ok((title, isbn))
}

/// Returns the trimmed `(headline, review_text)`.
pub fn validate_review(draft: &ReviewDraft) -> ValidationResult<(String, String)> {
  let headline = required("headline", &draft.headline, MAX_HEADLINE_LEN)?;
  let text = optional("review_text", &draft.review_text, MAX_REVIEW_TEXT_LEN)?;
  if !RATING_RANGE.contains(&draft.rating) {
    return Err(ValidationError::Rating(draft.rating));
  }
  Ok((headline, text))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn name_key_ignores_case_and_surrounding_whitespace() {
    assert_eq!(name_key("  France "), "france");
    assert_eq!(name_key("FRANCE"), name_key("france"));
    assert_ne!(name_key("New Zealand"), name_key("NewZealand"));
  }

  #[test]
  fn missing_country_name_is_rejected() {
    let draft = CountryDraft { id: None, name: None };
    assert_eq!(
      validate_country(&draft),
      Err(ValidationError::Missing { field: "name" })
    );

    let blank = CountryDraft { id: None, name: Some("   ".into()) };
    assert!(validate_country(&blank).is_err());
  }

  #[test]
  fn country_name_is_trimmed() {
    let draft = CountryDraft { id: None, name: Some("  Italy ".into()) };
    assert_eq!(validate_country(&draft).unwrap(), "Italy");
  }

  #[test]
  fn overlong_category_name_is_rejected() {
    let draft = CategoryDraft { id: None, name: Some("x".repeat(51)) };
    assert!(matches!(
      validate_category(&draft),
      Err(ValidationError::TooLong { field: "name", max: 50, len: 51 })
    ));
  }

  #[test]
  fn isbn_length_bounds() {
    let mut draft = BookDraft {
      title: "Dune".into(),
      isbn: "12".into(),
      ..Default::default()
    };
    assert_eq!(validate_book(&draft), Err(ValidationError::IsbnLength(2)));

    draft.isbn = " 0441013597 ".into();
    assert_eq!(
      validate_book(&draft).unwrap(),
      ("Dune".to_owned(), "0441013597".to_owned())
    );

    draft.isbn = "04410135971".into();
    assert_eq!(validate_book(&draft), Err(ValidationError::IsbnLength(11)));
  }

  #[test]
  fn rating_outside_one_to_five_is_rejected() {
    let mut draft = ReviewDraft {
      headline: "Great".into(),
      rating: 0,
      ..Default::default()
    };
    assert_eq!(validate_review(&draft), Err(ValidationError::Rating(0)));
    draft.rating = 6;
    assert_eq!(validate_review(&draft), Err(ValidationError::Rating(6)));
    draft.rating = 5;
    assert!(validate_review(&draft).is_ok());
  }
}
