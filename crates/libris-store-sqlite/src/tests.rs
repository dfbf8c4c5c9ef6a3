//! Integration tests for `SqliteStore` against an in-memory database.
//!
//! These exercise the store directly through change sets; the integrity
//! rules layered on top are covered in `catalog_tests.rs`.

use chrono::NaiveDate;
use libris_core::{
  change::{
    Applied, AuthorRow, BookRow, BookTarget, Change, ChangeSet, ReviewRow, ReviewerRow,
  },
  entity::{EntityKind, Id, NamedKind},
  store::CatalogStore,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn insert(s: &SqliteStore, change: Change) -> Id {
  match s.apply(ChangeSet::single(change)).await.unwrap() {
    Applied::Committed { inserted: Some(id) } => id,
    other => panic!("expected an insert, got {other:?}"),
  }
}

fn book_row(title: &str, isbn: &str) -> BookRow {
  BookRow {
    title:          title.into(),
    isbn:           isbn.into(),
    date_published: NaiveDate::from_ymd_opt(1965, 8, 1),
  }
}

// ─── Countries & names ───────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_get_country() {
  let s = store().await;
  let id = insert(&s, Change::InsertCountry { name: "France".into() }).await;

  let country = s.get_country(id).await.unwrap().unwrap();
  assert_eq!(country.name, "France");
  assert!(s.exists(EntityKind::Country, id).await.unwrap());
  assert!(!s.exists(EntityKind::Country, id + 1).await.unwrap());
}

#[tokio::test]
async fn get_missing_country_returns_none() {
  let s = store().await;
  assert!(s.get_country(42).await.unwrap().is_none());
}

#[tokio::test]
async fn name_key_lookup_ignores_case_and_whitespace() {
  let s = store().await;
  let id = insert(&s, Change::InsertCountry { name: "  Spain ".into() }).await;

  let ids = s.ids_with_name_key(NamedKind::Country, "spain").await.unwrap();
  assert_eq!(ids, vec![id]);

  let none = s.ids_with_name_key(NamedKind::Category, "spain").await.unwrap();
  assert!(none.is_empty());
}

#[tokio::test]
async fn countries_listed_by_name() {
  let s = store().await;
  for name in ["Peru", "Chile", "Norway"] {
    insert(&s, Change::InsertCountry { name: name.into() }).await;
  }
  let names: Vec<_> = s
    .list_countries()
    .await
    .unwrap()
    .into_iter()
    .map(|c| c.name)
    .collect();
  assert_eq!(names, ["Chile", "Norway", "Peru"]);
}

#[tokio::test]
async fn categories_listed_ignoring_case() {
  let s = store().await;
  for name in ["Zebra", "apple", "Mango"] {
    insert(&s, Change::InsertCategory { name: name.into() }).await;
  }
  let names: Vec<_> = s
    .list_categories()
    .await
    .unwrap()
    .into_iter()
    .map(|g| g.name)
    .collect();
  assert_eq!(names, ["apple", "Mango", "Zebra"]);
}

// ─── Authors ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn author_is_read_back_with_its_country() {
  let s = store().await;
  let country_id = insert(&s, Change::InsertCountry { name: "Kenya".into() }).await;
  let author_id = insert(
    &s,
    Change::InsertAuthor(AuthorRow {
      first_name: "Ngugi".into(),
      last_name:  "wa Thiong'o".into(),
      country_id,
    }),
  )
  .await;

  let author = s.get_author(author_id).await.unwrap().unwrap();
  assert_eq!(author.country.id, country_id);
  assert_eq!(author.country.name, "Kenya");

  let in_country = s.authors_in_country(country_id).await.unwrap();
  assert_eq!(in_country.len(), 1);
  assert_eq!(in_country[0].id, author_id);
}

// ─── Books & links ───────────────────────────────────────────────────────────

#[tokio::test]
async fn book_insert_with_links_is_one_unit() {
  let s = store().await;
  let country_id = insert(&s, Change::InsertCountry { name: "USA".into() }).await;
  let author_id = insert(
    &s,
    Change::InsertAuthor(AuthorRow {
      first_name: "Frank".into(),
      last_name:  "Herbert".into(),
      country_id,
    }),
  )
  .await;
  let category_id = insert(&s, Change::InsertCategory { name: "SF".into() }).await;

  let mut set = ChangeSet::new();
  set
    .push(Change::InsertBook(book_row("Dune", "0441013597")))
    .push(Change::LinkAuthor { book: BookTarget::Inserted, author_id })
    .push(Change::LinkCategory { book: BookTarget::Inserted, category_id });
  let Applied::Committed { inserted: Some(book_id) } = s.apply(set).await.unwrap() else {
    panic!("book insert did not commit");
  };

  let book = s.get_book(book_id).await.unwrap().unwrap();
  assert_eq!(book.date_published, NaiveDate::from_ymd_opt(1965, 8, 1));
  assert_eq!(s.authors_of_book(book_id).await.unwrap().len(), 1);
  assert_eq!(s.categories_of_book(book_id).await.unwrap().len(), 1);
  assert_eq!(s.books_by_author(author_id).await.unwrap()[0].id, book_id);
  assert_eq!(s.books_in_category(category_id).await.unwrap()[0].id, book_id);
  assert_eq!(
    s.get_book_by_isbn("0441013597").await.unwrap().map(|b| b.id),
    Some(book_id)
  );
}

#[tokio::test]
async fn failing_link_rolls_back_the_book() {
  let s = store().await;

  let mut set = ChangeSet::new();
  set
    .push(Change::InsertBook(book_row("Orphan", "123")))
    // No such author: the foreign key rejects the link row.
    .push(Change::LinkAuthor { book: BookTarget::Inserted, author_id: 99 });
  assert!(s.apply(set).await.is_err());

  assert!(s.list_books().await.unwrap().is_empty());
  assert!(s.get_book_by_isbn("123").await.unwrap().is_none());
}

#[tokio::test]
async fn dangling_inserted_target_is_rolled_back() {
  let s = store().await;
  let change = Change::LinkCategory { book: BookTarget::Inserted, category_id: 1 };
  let applied = s.apply(ChangeSet::single(change.clone())).await.unwrap();
  assert_eq!(applied, Applied::RolledBack(change));
}

#[tokio::test]
async fn duplicate_link_pair_is_ignored() {
  let s = store().await;
  let country_id = insert(&s, Change::InsertCountry { name: "UK".into() }).await;
  let author_id = insert(
    &s,
    Change::InsertAuthor(AuthorRow {
      first_name: "Mary".into(),
      last_name:  "Shelley".into(),
      country_id,
    }),
  )
  .await;
  let book_id = insert(&s, Change::InsertBook(book_row("Frankenstein", "0486282112"))).await;

  let link = Change::LinkAuthor { book: BookTarget::Existing(book_id), author_id };
  s.apply(ChangeSet::single(link.clone())).await.unwrap();
  let again = s.apply(ChangeSet::single(link)).await.unwrap();

  assert_eq!(again, Applied::Committed { inserted: None });
  assert_eq!(s.authors_of_book(book_id).await.unwrap().len(), 1);
}

// ─── Reviews ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn review_joins_book_and_reviewer() {
  let s = store().await;
  let book_id = insert(&s, Change::InsertBook(book_row("Emma", "0141439580"))).await;
  let reviewer_id = insert(
    &s,
    Change::InsertReviewer(ReviewerRow {
      first_name: "Ada".into(),
      last_name:  "Lovelace".into(),
    }),
  )
  .await;
  let review_id = insert(
    &s,
    Change::InsertReview(ReviewRow {
      headline:    "Witty".into(),
      review_text: "".into(),
      rating:      4,
      book_id,
      reviewer_id,
    }),
  )
  .await;

  let review = s.get_review(review_id).await.unwrap().unwrap();
  assert_eq!(review.rating, 4);
  assert_eq!(review.book.title, "Emma");
  assert_eq!(review.reviewer.last_name, "Lovelace");
  assert_eq!(s.ratings_of_book(book_id).await.unwrap(), vec![4]);
  assert_eq!(s.reviews_by_reviewer(reviewer_id).await.unwrap().len(), 1);
}

// ─── Rollback ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn change_without_effect_rolls_back_the_whole_set() {
  let s = store().await;
  let id = insert(&s, Change::InsertCountry { name: "Ghana".into() }).await;

  let mut set = ChangeSet::new();
  set
    .push(Change::UpdateCountry { id, name: "Gold Coast".into() })
    .push(Change::DeleteCountry(id + 100));
  let applied = s.apply(set).await.unwrap();

  assert_eq!(applied, Applied::RolledBack(Change::DeleteCountry(id + 100)));
  assert_eq!(s.get_country(id).await.unwrap().unwrap().name, "Ghana");
}

#[tokio::test]
async fn unique_name_key_backstops_races() {
  let s = store().await;
  insert(&s, Change::InsertCategory { name: "Poetry".into() }).await;
  let dup = s
    .apply(ChangeSet::single(Change::InsertCategory { name: "POETRY".into() }))
    .await;
  assert!(dup.is_err());
}
