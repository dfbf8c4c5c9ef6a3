//! Integrity-layer tests: `Catalog` over an in-memory `SqliteStore`.

use chrono::NaiveDate;
use libris_core::{
  Catalog, Error, Outcome,
  entity::{
    Author, AuthorDraft, Book, BookDraft, Category, CategoryDraft, Country, CountryDraft,
    EntityKind, EntityRef, Id, NamedKind, Review, ReviewDraft, Reviewer, ReviewerDraft,
  },
};
use rust_decimal::Decimal;

use crate::SqliteStore;

async fn catalog() -> Catalog<SqliteStore> {
  with_store().await.0
}

/// A catalog plus a second handle on its store. Clones share one connection.
async fn with_store() -> (Catalog<SqliteStore>, SqliteStore) {
  let store = SqliteStore::open_in_memory()
    .await
    .expect("in-memory store");
  (Catalog::new(store.clone()), store)
}

/// Run raw SQL against the store's connection, e.g. to install a trigger
/// that makes a write fail.
async fn exec(store: &SqliteStore, sql: &'static str) {
  store
    .conn
    .call(move |conn| {
      conn.execute_batch(sql)?;
      Ok(())
    })
    .await
    .unwrap();
}

// ─── Seed helpers ────────────────────────────────────────────────────────────

async fn country(c: &Catalog<SqliteStore>, name: &str) -> Country {
  c.create_country(CountryDraft { id: None, name: Some(name.into()) })
    .await
    .unwrap()
}

async fn category(c: &Catalog<SqliteStore>, name: &str) -> Category {
  c.create_category(CategoryDraft { id: None, name: Some(name.into()) })
    .await
    .unwrap()
}

async fn author(c: &Catalog<SqliteStore>, last_name: &str, country_id: Id) -> Author {
  c.create_author(AuthorDraft {
    id:         None,
    first_name: "Jo".into(),
    last_name:  last_name.into(),
    country:    Some(EntityRef::from(country_id)),
  })
  .await
  .unwrap()
}

fn book_draft(title: &str, isbn: &str) -> BookDraft {
  BookDraft {
    id:             None,
    title:          title.into(),
    isbn:           isbn.into(),
    date_published: NaiveDate::from_ymd_opt(2001, 9, 1),
  }
}

async fn reviewer(c: &Catalog<SqliteStore>, last_name: &str) -> Reviewer {
  c.create_reviewer(ReviewerDraft {
    id:         None,
    first_name: "Sam".into(),
    last_name:  last_name.into(),
  })
  .await
  .unwrap()
}

fn review_draft(book_id: Id, reviewer_id: Id, rating: u8) -> ReviewDraft {
  ReviewDraft {
    id: None,
    headline: format!("{rating} stars"),
    review_text: "".into(),
    rating,
    book: Some(book_id.into()),
    reviewer: Some(reviewer_id.into()),
  }
}

async fn review(c: &Catalog<SqliteStore>, book_id: Id, reviewer_id: Id, rating: u8) -> Review {
  c.create_review(review_draft(book_id, reviewer_id, rating))
    .await
    .unwrap()
}

/// A country, an author in it, a category, and a book linking the two.
struct Shelf {
  country:  Country,
  author:   Author,
  category: Category,
  book:     Book,
}

async fn shelf(c: &Catalog<SqliteStore>) -> Shelf {
  let country = country(c, "Japan").await;
  let author = author(c, "Murakami", country.id).await;
  let category = category(c, "Fiction").await;
  let book = c
    .create_book(book_draft("Norwegian Wood", "0375704027"), &[author.id], &[category.id])
    .await
    .unwrap();
  Shelf { country, author, category, book }
}

// ─── Duplicate names ─────────────────────────────────────────────────────────

#[tokio::test]
async fn country_names_equal_after_trim_and_case_fold_conflict() {
  let c = catalog().await;
  country(&c, "France").await;

  let err = c
    .create_country(CountryDraft { id: None, name: Some("  FRANCE ".into()) })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::DuplicateName { kind: NamedKind::Country, .. }));
  assert_eq!(err.outcome(), Outcome::Conflict);
  assert_eq!(c.countries().await.unwrap().len(), 1);
}

#[tokio::test]
async fn category_names_equal_after_trim_and_case_fold_conflict() {
  let c = catalog().await;
  category(&c, "Science Fiction").await;

  let err = c
    .create_category(CategoryDraft { id: None, name: Some("science fiction".into()) })
    .await
    .unwrap_err();
  assert_eq!(err.outcome(), Outcome::Conflict);
}

#[tokio::test]
async fn renaming_to_own_name_is_not_a_duplicate() {
  let c = catalog().await;
  let poetry = category(&c, "Poetry").await;

  assert!(!c
    .is_duplicate_name(NamedKind::Category, Some(poetry.id), "poetry")
    .await
    .unwrap());
  let renamed = c
    .update_category(poetry.id, CategoryDraft {
      id:   Some(poetry.id),
      name: Some("POETRY".into()),
    })
    .await
    .unwrap();
  assert_eq!(renamed.name, "POETRY");
}

#[tokio::test]
async fn renaming_to_another_records_name_conflicts() {
  let c = catalog().await;
  country(&c, "Chile").await;
  let peru = country(&c, "Peru").await;

  let err = c
    .update_country(peru.id, CountryDraft { id: Some(peru.id), name: Some("chile".into()) })
    .await
    .unwrap_err();
  assert_eq!(err.outcome(), Outcome::Conflict);
  assert_eq!(c.country(peru.id).await.unwrap().name, "Peru");
}

#[tokio::test]
async fn null_name_is_a_validation_failure() {
  let c = catalog().await;
  let err = c
    .create_country(CountryDraft { id: None, name: None })
    .await
    .unwrap_err();
  assert_eq!(err.outcome(), Outcome::ValidationFailed);
}

// ─── Books ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_book_links_authors_and_categories() {
  let c = catalog().await;
  let s = shelf(&c).await;

  assert_eq!(s.book.isbn, "0375704027");
  let authors = c.authors_of_book(s.book.id).await.unwrap();
  assert_eq!(authors, vec![s.author.clone()]);
  let categories = c.categories_of_book(s.book.id).await.unwrap();
  assert_eq!(categories, vec![s.category.clone()]);
  assert_eq!(c.book_by_isbn(" 0375704027 ").await.unwrap(), s.book);
  assert!(c.book_exists_by_isbn("0375704027").await.unwrap());
}

#[tokio::test]
async fn duplicate_isbn_is_a_conflict_distinct_from_validation() {
  let c = catalog().await;
  let s = shelf(&c).await;

  let err = c
    .create_book(book_draft("Another Title", "0375704027"), &[s.author.id], &[s.category.id])
    .await
    .unwrap_err();
  assert!(matches!(err, Error::DuplicateIsbn(ref isbn) if isbn == "0375704027"));
  assert_eq!(err.outcome(), Outcome::Conflict);
  assert_ne!(err.outcome(), Outcome::ValidationFailed);
  assert_eq!(c.books().await.unwrap().len(), 1);
}

#[tokio::test]
async fn empty_author_or_category_list_is_rejected_before_persisting() {
  let c = catalog().await;
  let country = country(&c, "Italy").await;
  let author = author(&c, "Calvino", country.id).await;
  let category = category(&c, "Fable").await;

  let no_authors = c
    .create_book(book_draft("Cosmicomics", "0156226006"), &[], &[category.id])
    .await
    .unwrap_err();
  assert!(matches!(no_authors, Error::EmptyLinks(EntityKind::Author)));
  assert_eq!(no_authors.outcome(), Outcome::ValidationFailed);

  let no_categories = c
    .create_book(book_draft("Cosmicomics", "0156226006"), &[author.id], &[])
    .await
    .unwrap_err();
  assert_eq!(no_categories.outcome(), Outcome::ValidationFailed);

  assert!(c.books().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_author_id_persists_nothing() {
  let c = catalog().await;
  let country = country(&c, "Italy").await;
  let author = author(&c, "Eco", country.id).await;
  let category = category(&c, "Mystery").await;

  let err = c
    .create_book(
      book_draft("The Name of the Rose", "0156001314"),
      &[author.id, 999],
      &[category.id],
    )
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::ReferenceNotFound { kind: EntityKind::Author, id: 999 }
  ));
  assert_eq!(err.outcome(), Outcome::NotFound);

  assert!(c.books().await.unwrap().is_empty());
  assert!(c.books_by_author(author.id).await.unwrap().is_empty());
  assert!(c.books_in_category(category.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_category_id_is_not_found() {
  let c = catalog().await;
  let country = country(&c, "Italy").await;
  let author = author(&c, "Eco", country.id).await;

  let err = c
    .create_book(book_draft("Baudolino", "0156029065"), &[author.id], &[5])
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::ReferenceNotFound { kind: EntityKind::Category, id: 5 }
  ));
}

#[tokio::test]
async fn update_book_replaces_links() {
  let c = catalog().await;
  let s = shelf(&c).await;
  let other_author = author(&c, "Kawakami", s.country.id).await;
  let other_category = category(&c, "Literary").await;

  let mut draft = book_draft("Norwegian Wood (Vintage)", "0375704027");
  draft.id = Some(s.book.id);
  let updated = c
    .update_book(s.book.id, draft, &[other_author.id], &[other_category.id, s.category.id])
    .await
    .unwrap();
  assert_eq!(updated.title, "Norwegian Wood (Vintage)");

  let authors = c.authors_of_book(s.book.id).await.unwrap();
  assert_eq!(authors, vec![other_author]);
  assert_eq!(c.categories_of_book(s.book.id).await.unwrap().len(), 2);
  // The first author is no longer linked and can now be deleted.
  c.delete_author(s.author.id).await.unwrap();
}

#[tokio::test]
async fn update_book_to_another_books_isbn_conflicts() {
  let c = catalog().await;
  let s = shelf(&c).await;
  let second = c
    .create_book(book_draft("Kafka on the Shore", "1400079276"), &[s.author.id], &[
      s.category.id,
    ])
    .await
    .unwrap();

  let mut draft = book_draft("Kafka on the Shore", "0375704027");
  draft.id = Some(second.id);
  let err = c
    .update_book(second.id, draft, &[s.author.id], &[s.category.id])
    .await
    .unwrap_err();
  assert!(matches!(err, Error::DuplicateIsbn(_)));
}

#[tokio::test]
async fn link_book_adds_links_and_skips_existing_pairs() {
  let c = catalog().await;
  let s = shelf(&c).await;
  let second_category = category(&c, "Romance").await;

  c.link_book(s.book.id, &[s.author.id], &[s.category.id, second_category.id])
    .await
    .unwrap();

  assert_eq!(c.authors_of_book(s.book.id).await.unwrap().len(), 1);
  assert_eq!(c.categories_of_book(s.book.id).await.unwrap().len(), 2);

  let err = c.link_book(s.book.id, &[s.author.id], &[77]).await.unwrap_err();
  assert_eq!(err.outcome(), Outcome::NotFound);
  assert_eq!(c.categories_of_book(s.book.id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn delete_book_removes_its_reviews_and_links() {
  let c = catalog().await;
  let s = shelf(&c).await;
  let critic = reviewer(&c, "Critic").await;
  let r = review(&c, s.book.id, critic.id, 2).await;

  c.delete_book(s.book.id).await.unwrap();

  assert!(!c.exists(EntityKind::Book, s.book.id).await.unwrap());
  assert!(!c.exists(EntityKind::Review, r.id).await.unwrap());
  // With the book gone nothing guards the category or the author any more.
  c.delete_category(s.category.id).await.unwrap();
  c.delete_author(s.author.id).await.unwrap();
}

// ─── Authors ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_author_with_mismatched_ids_fails_before_lookup() {
  let c = catalog().await;

  // Neither author exists, so any lookup would have produced NotFound.
  let err = c
    .update_author(7, AuthorDraft {
      id:         Some(8),
      first_name: "Ann".into(),
      last_name:  "Other".into(),
      country:    Some(EntityRef::from(1)),
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::IdMismatch { path: 7, body: Some(8) }));
  assert_eq!(err.outcome(), Outcome::ValidationFailed);
}

#[tokio::test]
async fn author_requires_a_country_reference() {
  let c = catalog().await;
  let err = c
    .create_author(AuthorDraft {
      id:         None,
      first_name: "No".into(),
      last_name:  "Where".into(),
      country:    None,
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::MissingReference(EntityKind::Country)));
  assert_eq!(err.outcome(), Outcome::ValidationFailed);
}

#[tokio::test]
async fn author_with_unknown_country_is_not_found() {
  let c = catalog().await;
  let err = c
    .create_author(AuthorDraft {
      id:         None,
      first_name: "Lost".into(),
      last_name:  "Soul".into(),
      country:    Some(EntityRef::from(404)),
    })
    .await
    .unwrap_err();
  assert_eq!(err.outcome(), Outcome::NotFound);
  assert!(c.authors().await.unwrap().is_empty());
}

#[tokio::test]
async fn author_country_is_resolved_from_the_store() {
  let c = catalog().await;
  let brazil = country(&c, "Brazil").await;
  let portugal = country(&c, "Portugal").await;
  let a = author(&c, "Saramago", brazil.id).await;
  assert_eq!(a.country, brazil);

  let moved = c
    .update_author(a.id, AuthorDraft {
      id:         Some(a.id),
      first_name: a.first_name.clone(),
      last_name:  a.last_name.clone(),
      country:    Some(EntityRef::from(portugal.id)),
    })
    .await
    .unwrap();
  assert_eq!(moved.country, portugal);
  assert_eq!(c.country_of_author(a.id).await.unwrap(), portugal);
  assert!(c.authors_from_country(brazil.id).await.unwrap().is_empty());
}

// ─── Delete guards ───────────────────────────────────────────────────────────

#[tokio::test]
async fn country_with_authors_cannot_be_deleted_until_they_are_gone() {
  let c = catalog().await;
  let ireland = country(&c, "Ireland").await;
  let joyce = author(&c, "Joyce", ireland.id).await;

  let err = c.delete_country(ireland.id).await.unwrap_err();
  assert!(matches!(
    err,
    Error::HasDependents {
      kind: EntityKind::Country,
      dependent: EntityKind::Author,
      ..
    }
  ));
  assert_eq!(err.outcome(), Outcome::Conflict);
  assert!(c.exists(EntityKind::Country, ireland.id).await.unwrap());

  c.delete_author(joyce.id).await.unwrap();
  c.delete_country(ireland.id).await.unwrap();
  assert!(!c.exists(EntityKind::Country, ireland.id).await.unwrap());
}

#[tokio::test]
async fn linked_category_cannot_be_deleted() {
  let c = catalog().await;
  let s = shelf(&c).await;

  let err = c.delete_category(s.category.id).await.unwrap_err();
  assert_eq!(err.outcome(), Outcome::Conflict);
  assert!(c.exists(EntityKind::Category, s.category.id).await.unwrap());
}

#[tokio::test]
async fn linked_author_cannot_be_deleted() {
  let c = catalog().await;
  let s = shelf(&c).await;

  let err = c.delete_author(s.author.id).await.unwrap_err();
  assert!(matches!(
    err,
    Error::HasDependents {
      kind: EntityKind::Author,
      dependent: EntityKind::Book,
      ..
    }
  ));
}

#[tokio::test]
async fn deleting_missing_entity_is_not_found() {
  let c = catalog().await;
  let err = c.delete_reviewer(12).await.unwrap_err();
  assert!(matches!(err, Error::NotFound { kind: EntityKind::Reviewer, id: 12 }));
}

// ─── Reviewer cascade ────────────────────────────────────────────────────────

#[tokio::test]
async fn deleting_reviewer_removes_all_their_reviews() {
  let c = catalog().await;
  let s = shelf(&c).await;
  let harsh = reviewer(&c, "Harsh").await;
  let kind = reviewer(&c, "Kind").await;
  let r1 = review(&c, s.book.id, harsh.id, 1).await;
  let r2 = review(&c, s.book.id, harsh.id, 2).await;
  let kept = review(&c, s.book.id, kind.id, 5).await;

  c.delete_reviewer(harsh.id).await.unwrap();

  assert!(!c.exists(EntityKind::Reviewer, harsh.id).await.unwrap());
  assert!(!c.exists(EntityKind::Review, r1.id).await.unwrap());
  assert!(!c.exists(EntityKind::Review, r2.id).await.unwrap());
  assert_eq!(c.reviews().await.unwrap(), vec![kept]);
}

#[tokio::test]
async fn failed_reviewer_delete_leaves_reviews_untouched() {
  let (c, store) = with_store().await;
  let s = shelf(&c).await;
  let critic = reviewer(&c, "Critic").await;
  review(&c, s.book.id, critic.id, 3).await;
  review(&c, s.book.id, critic.id, 4).await;

  exec(
    &store,
    "CREATE TRIGGER reviewers_locked BEFORE DELETE ON reviewers
     BEGIN SELECT RAISE(ABORT, 'reviewers are locked'); END;",
  )
  .await;

  let err = c.delete_reviewer(critic.id).await.unwrap_err();
  assert_eq!(err.outcome(), Outcome::PersistenceFailure);
  assert!(c.exists(EntityKind::Reviewer, critic.id).await.unwrap());
  assert_eq!(c.reviews_by_reviewer(critic.id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn failed_review_cascade_keeps_the_reviewer() {
  let (c, store) = with_store().await;
  let s = shelf(&c).await;
  let critic = reviewer(&c, "Critic").await;
  review(&c, s.book.id, critic.id, 3).await;

  exec(
    &store,
    "CREATE TRIGGER reviews_locked BEFORE DELETE ON reviews
     BEGIN SELECT RAISE(ABORT, 'reviews are locked'); END;",
  )
  .await;

  let err = c.delete_reviewer(critic.id).await.unwrap_err();
  assert_eq!(err.outcome(), Outcome::PersistenceFailure);
  assert!(c.exists(EntityKind::Reviewer, critic.id).await.unwrap());
  assert_eq!(c.reviews_by_reviewer(critic.id).await.unwrap().len(), 1);
}

// ─── Reviews ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn review_references_must_exist() {
  let c = catalog().await;
  let s = shelf(&c).await;

  let err = c
    .create_review(review_draft(s.book.id, 31, 4))
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::ReferenceNotFound { kind: EntityKind::Reviewer, id: 31 }
  ));

  let critic = reviewer(&c, "Critic").await;
  let err = c
    .create_review(review_draft(32, critic.id, 4))
    .await
    .unwrap_err();
  assert_eq!(err.outcome(), Outcome::NotFound);

  let mut no_book = review_draft(s.book.id, critic.id, 4);
  no_book.book = None;
  let err = c.create_review(no_book).await.unwrap_err();
  assert!(matches!(err, Error::MissingReference(EntityKind::Book)));

  assert!(c.reviews().await.unwrap().is_empty());
}

#[tokio::test]
async fn review_is_stored_with_resolved_book_and_reviewer() {
  let c = catalog().await;
  let s = shelf(&c).await;
  let critic = reviewer(&c, "Critic").await;
  let r = review(&c, s.book.id, critic.id, 5).await;

  assert_eq!(r.book, s.book);
  assert_eq!(r.reviewer, critic);
  assert_eq!(c.book_of_review(r.id).await.unwrap(), s.book);
  assert_eq!(c.reviewer_of_review(r.id).await.unwrap(), critic);
  assert_eq!(c.reviews_of_book(s.book.id).await.unwrap(), vec![r]);
}

#[tokio::test]
async fn update_review_moves_it_to_another_book() {
  let c = catalog().await;
  let s = shelf(&c).await;
  let other = c
    .create_book(book_draft("After Dark", "0307278735"), &[s.author.id], &[s.category.id])
    .await
    .unwrap();
  let critic = reviewer(&c, "Critic").await;
  let r = review(&c, s.book.id, critic.id, 3).await;

  let mut draft = review_draft(other.id, critic.id, 4);
  draft.id = Some(r.id);
  let updated = c.update_review(r.id, draft).await.unwrap();
  assert_eq!(updated.book, other);
  assert_eq!(updated.rating, 4);
  assert!(c.reviews_of_book(s.book.id).await.unwrap().is_empty());

  c.delete_review(r.id).await.unwrap();
  assert!(c.reviews().await.unwrap().is_empty());
}

#[tokio::test]
async fn rating_out_of_range_is_a_validation_failure() {
  let c = catalog().await;
  let s = shelf(&c).await;
  let critic = reviewer(&c, "Critic").await;
  let err = c
    .create_review(review_draft(s.book.id, critic.id, 6))
    .await
    .unwrap_err();
  assert_eq!(err.outcome(), Outcome::ValidationFailed);
}

// ─── Ratings ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn average_rating_is_the_mean_of_review_ratings() {
  let c = catalog().await;
  let s = shelf(&c).await;
  let critic = reviewer(&c, "Critic").await;
  for rating in [3, 4, 5] {
    review(&c, s.book.id, critic.id, rating).await;
  }
  assert_eq!(c.average_rating(s.book.id).await.unwrap(), Decimal::from(4));
}

#[tokio::test]
async fn average_rating_without_reviews_is_zero() {
  let c = catalog().await;
  let s = shelf(&c).await;
  assert_eq!(c.average_rating(s.book.id).await.unwrap(), Decimal::ZERO);
}

#[tokio::test]
async fn average_rating_of_missing_book_is_not_found() {
  let c = catalog().await;
  let err = c.average_rating(1).await.unwrap_err();
  assert!(matches!(err, Error::NotFound { kind: EntityKind::Book, id: 1 }));
}

// ─── Lookups ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn related_fetch_on_missing_anchor_is_not_found() {
  let c = catalog().await;
  assert_eq!(
    c.authors_from_country(3).await.unwrap_err().outcome(),
    Outcome::NotFound
  );
  assert_eq!(c.reviews_by_reviewer(3).await.unwrap_err().outcome(), Outcome::NotFound);
  assert!(matches!(
    c.book_by_isbn("0000").await.unwrap_err(),
    Error::IsbnNotFound(_)
  ));
}

#[tokio::test]
async fn reviewers_are_listed_by_last_name() {
  let c = catalog().await;
  for name in ["Zola", "Austen", "Melville"] {
    reviewer(&c, name).await;
  }
  let names: Vec<_> = c
    .reviewers()
    .await
    .unwrap()
    .into_iter()
    .map(|r| r.last_name)
    .collect();
  assert_eq!(names, ["Austen", "Melville", "Zola"]);
}
