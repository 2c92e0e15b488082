use trigger_registry::contributors::{
    resolve_contributors, Contributor, ContributorError, MockIdentityProvider,
};

fn profile(id: &str, login: &str) -> Contributor {
    Contributor {
        github_user_id: id.to_string(),
        github_username: login.to_string(),
        github_avatar_url: format!("https://avatars.example/{login}"),
        twitter_username: None,
        name: Some(login.to_uppercase()),
    }
}

#[tokio::test]
async fn logins_are_deduplicated_before_any_profile_fetch() {
    let mut provider = MockIdentityProvider::new();
    provider
        .expect_commit_authors()
        .withf(|path| path == "triggers/join-alert")
        .returning(|_| {
            Ok(vec![
                "alice".to_string(),
                "bob".to_string(),
                "alice".to_string(),
                "alice".to_string(),
            ])
        });
    // Exactly one fetch per distinct login.
    provider
        .expect_user_profile()
        .withf(|login| login == "alice")
        .times(1)
        .returning(|login| Ok(profile("1", login)));
    provider
        .expect_user_profile()
        .withf(|login| login == "bob")
        .times(1)
        .returning(|login| Ok(profile("2", login)));

    let contributors = resolve_contributors(&provider, "join-alert")
        .await
        .expect("resolution should succeed");
    assert_eq!(contributors.len(), 2);
    assert_eq!(contributors[0].github_username, "alice");
    assert_eq!(contributors[1].github_username, "bob");
}

#[tokio::test]
async fn a_failed_profile_fetch_fails_the_whole_resolution() {
    let mut provider = MockIdentityProvider::new();
    provider
        .expect_commit_authors()
        .returning(|_| Ok(vec!["alice".to_string(), "ghost".to_string()]));
    provider
        .expect_user_profile()
        .withf(|login| login == "alice")
        .returning(|login| Ok(profile("1", login)));
    provider
        .expect_user_profile()
        .withf(|login| login == "ghost")
        .returning(|_| Err("404 Not Found".into()));

    let err = resolve_contributors(&provider, "join-alert")
        .await
        .expect_err("partial contributor lists must not be accepted");
    match err {
        ContributorError::Profile { login, .. } => assert_eq!(login, "ghost"),
        other => panic!("expected profile failure, got {other:?}"),
    }
}

#[tokio::test]
async fn history_failure_propagates() {
    let mut provider = MockIdentityProvider::new();
    provider
        .expect_commit_authors()
        .returning(|_| Err("connection reset".into()));

    let err = resolve_contributors(&provider, "join-alert")
        .await
        .expect_err("history failure must fail resolution");
    assert!(matches!(err, ContributorError::History(_)));
}
