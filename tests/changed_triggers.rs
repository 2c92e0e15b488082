use trigger_registry::listing::{changed_triggers, ListingError, MockChangeProvider};

#[tokio::test]
async fn changed_triggers_deduplicates_first_path_segments() {
    let mut provider = MockChangeProvider::new();
    provider
        .expect_changed_files()
        .withf(|base, head| base == "abc" && head == "def")
        .returning(|_, _| {
            Ok(vec![
                "triggers/join-alert/config.json".to_string(),
                "triggers/join-alert/README.md".to_string(),
                "triggers/focus-mode/room-joined".to_string(),
                "README.md".to_string(),
                ".github/workflows/validate.yml".to_string(),
            ])
        });

    let mut triggers = changed_triggers(&provider, Some("abc"), Some("def"))
        .await
        .expect("listing should succeed");
    triggers.sort();
    assert_eq!(triggers, vec!["focus-mode".to_string(), "join-alert".to_string()]);
}

#[tokio::test]
async fn missing_base_revision_is_fatal() {
    let provider = MockChangeProvider::new();
    let err = changed_triggers(&provider, None, Some("def"))
        .await
        .expect_err("missing base must fail");
    assert!(matches!(err, ListingError::MissingRevisionRange));
}

#[tokio::test]
async fn missing_head_revision_is_fatal() {
    let provider = MockChangeProvider::new();
    let err = changed_triggers(&provider, Some("abc"), None)
        .await
        .expect_err("missing head must fail");
    assert!(matches!(err, ListingError::MissingRevisionRange));
}

#[tokio::test]
async fn provider_failures_propagate() {
    let mut provider = MockChangeProvider::new();
    provider
        .expect_changed_files()
        .returning(|_, _| Err("rate limited".into()));

    let err = changed_triggers(&provider, Some("abc"), Some("def"))
        .await
        .expect_err("provider error must fail the listing");
    assert!(matches!(err, ListingError::Provider(_)));
}
