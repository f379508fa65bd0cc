// Copyright (C) 2024 The Ghostpir Developers. All rights reserved.
//
// SPDX-License-Identifier: Apache-2.0

//! Durable relational metadata: modules and their quiz questions.
//!
//! This is the first of the two sources of truth the rest of the system
//! must keep coherent with the on-disk chunk layout (see `ghostpir-storage`).
//! The catalog never reasons about chunk bytes; it only tracks which module
//! ids exist and what they claim about themselves.

mod error;
mod models;
mod store;

pub use error::{CatalogError, Result};
pub use models::{Module, ModuleFilter, QuizQuestion};
pub use store::CatalogStore;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_module_returns_monotonic_ids() {
        let store = CatalogStore::open_in_memory().unwrap();
        let a = store
            .add_module("Intro", "math", 1, 2, 9000, "a.txt")
            .unwrap();
        let b = store
            .add_module("Advanced", "math", 2, 3, 12000, "b.txt")
            .unwrap();
        assert!(b > a, "ids must be strictly increasing: {a} then {b}");
    }

    #[test]
    fn list_modules_orders_by_id_and_filters() {
        let store = CatalogStore::open_in_memory().unwrap();
        store.add_module("A", "math", 1, 1, 10, "a.txt").unwrap();
        store.add_module("B", "sci", 2, 1, 10, "b.txt").unwrap();
        store.add_module("C", "math", 3, 1, 10, "c.txt").unwrap();

        let all = store.list_modules(&ModuleFilter::default()).unwrap();
        assert_eq!(
            all.iter().map(|m| m.title.as_str()).collect::<Vec<_>>(),
            vec!["A", "B", "C"]
        );

        let math_only = store
            .list_modules(&ModuleFilter {
                topic: Some("math".to_string()),
                tier: None,
            })
            .unwrap();
        assert_eq!(
            math_only.iter().map(|m| m.title.as_str()).collect::<Vec<_>>(),
            vec!["A", "C"]
        );

        let math_tier_3 = store
            .list_modules(&ModuleFilter {
                topic: Some("math".to_string()),
                tier: Some(3),
            })
            .unwrap();
        assert_eq!(math_tier_3.len(), 1);
        assert_eq!(math_tier_3[0].title, "C");
    }

    #[test]
    fn delete_module_cascades_to_quizzes() {
        let store = CatalogStore::open_in_memory().unwrap();
        let id = store.add_module("A", "math", 1, 1, 10, "a.txt").unwrap();
        store
            .add_quiz(id, "2+2?", &["3".into(), "4".into()], 1)
            .unwrap();

        assert!(store.delete_module(id).unwrap());
        assert!(store.list_quiz(id).unwrap().is_empty());
        assert!(!store.delete_module(id).unwrap(), "second delete is a no-op");
    }

    #[test]
    fn add_quiz_rejects_missing_module() {
        let store = CatalogStore::open_in_memory().unwrap();
        let err = store
            .add_quiz(999, "q", &["a".into(), "b".into()], 0)
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound));
    }

    #[test]
    fn add_quiz_rejects_bad_options() {
        let store = CatalogStore::open_in_memory().unwrap();
        let id = store.add_module("A", "math", 1, 1, 10, "a.txt").unwrap();

        assert!(matches!(
            store.add_quiz(id, "q", &["only one".into()], 0).unwrap_err(),
            CatalogError::Constraint(_)
        ));
        assert!(matches!(
            store
                .add_quiz(id, "q", &["a".into(), "b".into()], 5)
                .unwrap_err(),
            CatalogError::Constraint(_)
        ));
    }

    #[test]
    fn delete_quiz_returns_whether_removed() {
        let store = CatalogStore::open_in_memory().unwrap();
        let module_id = store.add_module("A", "math", 1, 1, 10, "a.txt").unwrap();
        let quiz_id = store
            .add_quiz(module_id, "q", &["a".into(), "b".into()], 0)
            .unwrap();

        assert!(store.delete_quiz(quiz_id).unwrap());
        assert!(!store.delete_quiz(quiz_id).unwrap());
    }

    #[test]
    fn init_is_idempotent() {
        let store = CatalogStore::open_in_memory().unwrap();
        // Re-running schema setup against the same connection must not fail.
        store.add_module("A", "math", 1, 1, 10, "a.txt").unwrap();
    }
}
