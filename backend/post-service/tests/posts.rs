mod common;

use common::{alice, bob, create_post, harness, harness_with};
use post_service::config::Config;
use post_service::domain::models::{EditOutcome, NewPost};
use post_service::store::DocumentStore;
use post_service::ErrorKind;

#[tokio::test]
async fn test_create_post_defaults() {
    let h = harness();
    let post = create_post(&h, &alice()).await;

    assert!(!post.id.is_empty());
    assert_eq!(post.author_handle, "alice");
    assert_eq!(post.author_image_url, "https://img.example.com/alice.png");
    assert_eq!(post.like_count, 0);
    assert_eq!(post.comment_count, 0);
    assert!(post.file_names.is_empty());

    let stored = h.state.posts.get_post(&post.id).await.unwrap();
    assert_eq!(stored.post, post);
    assert!(stored.comments.is_empty());
}

#[tokio::test]
async fn test_create_post_rejects_blank_fields() {
    let h = harness();

    let err = h
        .state
        .posts
        .create_post(
            NewPost {
                title: " ".to_string(),
                body: "".to_string(),
            },
            &alice(),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        post_service::ServiceError::InvalidInput { field: "title", .. }
    ));

    let err = h
        .state
        .posts
        .create_post(
            NewPost {
                title: "ok".to_string(),
                body: "\t".to_string(),
            },
            &alice(),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        post_service::ServiceError::InvalidInput { field: "body", .. }
    ));
    assert_eq!(h.store.writes(), 0);
}

#[tokio::test]
async fn test_list_posts_newest_first() {
    let h = harness();
    let first = create_post(&h, &alice()).await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = create_post(&h, &bob()).await;

    let posts = h.state.posts.list_posts().await.unwrap();
    let ids: Vec<_> = posts.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);
}

#[tokio::test]
async fn test_get_post_lists_comments_newest_first() {
    let h = harness();
    let post = create_post(&h, &alice()).await;
    for body in ["one", "two", "three"] {
        h.state
            .comments
            .add_comment(&post.id, body, &bob())
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let detail = h.state.posts.get_post(&post.id).await.unwrap();

    let bodies: Vec<_> = detail.comments.iter().map(|c| c.body.as_str()).collect();
    assert_eq!(bodies, vec!["three", "two", "one"]);
    assert_eq!(detail.post.comment_count, 3);
}

#[tokio::test]
async fn test_edit_blank_title_names_field_and_writes_nothing() {
    let h = harness();
    let post = create_post(&h, &alice()).await;
    let writes = h.store.writes();

    let err = h
        .state
        .posts
        .edit_post(&post.id, "   ", "new body")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(matches!(
        err,
        post_service::ServiceError::InvalidInput { field: "title", .. }
    ));
    assert_eq!(h.store.writes(), writes);
}

#[tokio::test]
async fn test_edit_unchanged_is_a_no_op() {
    let h = harness();
    let post = create_post(&h, &alice()).await;
    let writes = h.store.writes();

    let outcome = h.state.posts.edit_post(&post.id, "A", "B").await.unwrap();

    assert_eq!(outcome, EditOutcome::Unchanged);
    assert_eq!(h.store.writes(), writes);
    let doc = h.store.get_by_id("posts", &post.id).await.unwrap().unwrap();
    assert_eq!(doc.version, 1);
}

#[tokio::test]
async fn test_edit_touches_only_title_and_body() {
    let h = harness();
    let post = create_post(&h, &alice()).await;
    h.state.likes.like(&post.id, &bob()).await.unwrap();

    let outcome = h
        .state
        .posts
        .edit_post(&post.id, "New title", "B")
        .await
        .unwrap();

    let EditOutcome::Updated(edited) = outcome else {
        panic!("expected an update");
    };
    assert_eq!(edited.title, "New title");
    assert_eq!(edited.like_count, 1);
    assert_eq!(edited.created_at, post.created_at);

    let stored = h.state.posts.get_post(&post.id).await.unwrap().post;
    assert_eq!(stored, edited);
}

#[tokio::test]
async fn test_edit_missing_post() {
    let h = harness();
    let err = h.state.posts.edit_post("missing", "A", "B").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_delete_post_requires_owner() {
    let h = harness();
    let post = create_post(&h, &alice()).await;

    let err = h.state.posts.delete_post(&post.id, &bob()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
    assert!(h.state.posts.get_post(&post.id).await.is_ok());

    h.state.posts.delete_post(&post.id, &alice()).await.unwrap();
    let err = h.state.posts.get_post(&post.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = h.state.posts.delete_post(&post.id, &alice()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_delete_post_cascades_to_children() {
    let h = harness();
    let post = create_post(&h, &alice()).await;
    h.state.likes.like(&post.id, &bob()).await.unwrap();
    h.state
        .comments
        .add_comment(&post.id, "nice", &bob())
        .await
        .unwrap();
    h.state
        .files
        .attach(&post.id, "x.txt", b"x".to_vec(), "text/plain", &bob())
        .await
        .unwrap();

    h.state.posts.delete_post(&post.id, &alice()).await.unwrap();

    assert_eq!(h.store.inner.count("likes"), 0);
    assert_eq!(h.store.inner.count("comments"), 0);
    assert_eq!(h.store.inner.count("files"), 0);
    assert!(h.objects.inner.is_empty());
}

#[tokio::test]
async fn test_delete_post_without_cascade_keeps_children() {
    let mut config = Config::default();
    config.posts.cascade_delete = false;
    let h = harness_with(config);
    let post = create_post(&h, &alice()).await;
    h.state
        .comments
        .add_comment(&post.id, "nice", &bob())
        .await
        .unwrap();

    h.state.posts.delete_post(&post.id, &alice()).await.unwrap();

    assert_eq!(h.store.inner.count("posts"), 0);
    assert_eq!(h.store.inner.count("comments"), 1);
}
