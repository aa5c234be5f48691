//! Test support shared by the domain crates.
//!
//! [`TestDatabase`] needs Docker; everything else is plain Rust.
//!
//! ```ignore
//! #[tokio::test]
//! #[ignore = "requires Docker"]
//! async fn lists_categories() {
//!     let db = TestDatabase::new().await;
//!     let data = TestDataBuilder::from_test_name("lists_categories");
//!     let name = data.name("category", "main");
//! }
//! ```

use std::hash::{BuildHasher, BuildHasherDefault, DefaultHasher};
use uuid::Uuid;

mod postgres;

pub use postgres::TestDatabase;

/// Names and ids derived from a seed, stable across runs of the same test.
///
/// Tests sharing a container still get disjoint names, which matters for
/// tables with unique constraints.
#[derive(Clone, Copy, Debug)]
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn from_test_name(test_name: &str) -> Self {
        Self::new(BuildHasherDefault::<DefaultHasher>::default().hash_one(test_name))
    }

    /// An id that no row will have, for "not found" paths.
    pub fn uuid(&self) -> Uuid {
        Uuid::from_u64_pair(self.seed, self.seed.rotate_left(32))
    }

    /// ```
    /// let data = test_utils::TestDataBuilder::new(7);
    /// assert_eq!(data.name("product", "main"), "test-product-7-main");
    /// ```
    pub fn name(&self, kind: &str, label: &str) -> String {
        format!("test-{kind}-{}-{label}", self.seed)
    }
}

pub mod assertions {
    use uuid::Uuid;

    pub fn assert_uuid_eq(actual: Uuid, expected: Uuid, what: &str) {
        assert_eq!(actual, expected, "{what}: ids differ");
    }

    /// Unwrap with a message naming what was missing.
    #[track_caller]
    pub fn assert_some<T>(value: Option<T>, what: &str) -> T {
        match value {
            Some(v) => v,
            None => panic!("{what}: expected a value, found None"),
        }
    }
}
