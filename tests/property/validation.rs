//! Property tests for task field validation.
//!
//! Exercises the schema bounds with generated inputs: priorities inside
//! the 1-5 window always validate, anything outside never does, and a
//! patch can never touch task identity.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::Utc;
use proptest::prelude::*;

use taskhub_model::fields::{TaskFields, TaskPatch};
use taskhub_model::task::{MAX_PRIORITY, MIN_PRIORITY, OwnerId, TaskStatus};

fn fields_with(title: &str, priority: Option<i64>) -> TaskFields {
    TaskFields {
        title: title.to_string(),
        priority,
        ..TaskFields::default()
    }
}

proptest! {
    #[test]
    fn priority_in_range_always_accepted(
        priority in i64::from(MIN_PRIORITY)..=i64::from(MAX_PRIORITY),
    ) {
        let valid = fields_with("task", Some(priority)).validate().unwrap();
        prop_assert_eq!(i64::from(valid.priority), priority);
    }

    #[test]
    fn priority_out_of_range_always_rejected(priority in any::<i64>()) {
        prop_assume!(
            !(i64::from(MIN_PRIORITY)..=i64::from(MAX_PRIORITY)).contains(&priority)
        );
        let err = fields_with("task", Some(priority)).validate().unwrap_err();
        prop_assert!(err.violations.iter().any(|v| v.field == "priority"));
    }

    #[test]
    fn non_blank_title_always_accepted(title in "[a-zA-Z0-9][a-zA-Z0-9 ]{0,63}") {
        prop_assert!(fields_with(&title, None).validate().is_ok());
    }

    #[test]
    fn status_outside_schema_always_rejected(status in "[a-z]{1,12}") {
        prop_assume!(TaskStatus::ALL.iter().all(|known| known.as_str() != status));
        let mut fields = fields_with("task", None);
        fields.status = Some(status);
        let err = fields.validate().unwrap_err();
        prop_assert!(err.violations.iter().any(|v| v.field == "status"));
    }

    #[test]
    fn patch_never_touches_identity(
        title in "[a-z]{1,16}",
        priority in i64::from(MIN_PRIORITY)..=i64::from(MAX_PRIORITY),
    ) {
        let task = fields_with("original", None)
            .validate()
            .unwrap()
            .into_task(OwnerId::new("owner-a"), Utc::now());
        let patch = TaskPatch {
            title: Some(title),
            priority: Some(priority),
            ..TaskPatch::default()
        };
        let patched = patch.apply_to(&task, Utc::now()).unwrap();
        prop_assert_eq!(patched.id, task.id);
        prop_assert_eq!(patched.owner, task.owner);
        prop_assert_eq!(patched.created_at, task.created_at);
    }
}
