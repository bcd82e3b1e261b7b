use std::sync::Arc;

use halogen::Configuration;
use halogen_sample::curies::Curies;
use halogen_sample::lifecycle::BlogApi;
use halogen_sample::model::{AuthorCreate, BlogStore, CommentCreate, PostCreate};
use halogen_sample::BlogError;
use serde_json::json;

struct Fixture {
    api: BlogApi,
    alice: u64,
    hello: u64,
    draft: u64,
}

fn seeded(config: &Configuration) -> Fixture {
    let store = Arc::new(BlogStore::new());
    let alice = store.create_author(AuthorCreate {
        name: "Alice".to_string(),
        email: "alice@example.com".to_string(),
    });
    let bob = store.create_author(AuthorCreate {
        name: "Bob".to_string(),
        email: "bob@example.com".to_string(),
    });
    let hello = store
        .create_post(PostCreate {
            author_id: alice.id,
            title: "Hello".to_string(),
            body: "First post".to_string(),
            published: true,
        })
        .expect("Failed to create post");
    let draft = store
        .create_post(PostCreate {
            author_id: alice.id,
            title: "Draft".to_string(),
            body: String::new(),
            published: false,
        })
        .expect("Failed to create post");
    store
        .create_comment(CommentCreate {
            post_id: hello.id,
            author_id: bob.id,
            body: "Nice!".to_string(),
        })
        .expect("Failed to create comment");

    Fixture {
        api: BlogApi::new(store, config).expect("Failed to declare representers"),
        alice: alice.id,
        hello: hello.id,
        draft: draft.id,
    }
}

#[test]
fn test_post_without_embeds() {
    let fixture = seeded(&Configuration::new());

    let post = fixture.api.post(fixture.hello, "").expect("Failed to render");

    assert_eq!(
        post,
        json!({
            "id": fixture.hello,
            "title": "Hello",
            "body": "First post",
            "comment_count": 1,
            "_links": {
                "self": { "href": format!("/posts/{}", fixture.hello) },
                "author": { "href": format!("/authors/{}", fixture.alice) },
                "comments": { "href": format!("/posts/{}/comments", fixture.hello) }
            }
        })
    );
}

#[test]
fn test_draft_has_publish_link() {
    let fixture = seeded(&Configuration::new());

    let draft = fixture.api.post(fixture.draft, "").unwrap();
    let published = fixture.api.post(fixture.hello, "").unwrap();

    assert_eq!(
        draft["_links"]["publish"],
        json!({ "href": format!("/posts/{}/publish", fixture.draft), "method": "POST" })
    );
    assert!(published["_links"].get("publish").is_none());
}

#[test]
fn test_nested_embeds() {
    let fixture = seeded(&Configuration::new());

    let shallow = fixture.api.post(fixture.hello, "author,comments").unwrap();
    let deep = fixture.api.post(fixture.hello, "comments.author").unwrap();

    assert_eq!(shallow["_embedded"]["author"]["name"], json!("Alice"));
    assert_eq!(shallow["_embedded"]["comments"][0]["body"], json!("Nice!"));
    assert!(shallow["_embedded"]["comments"][0].get("_embedded").is_none());

    assert!(deep["_embedded"].get("author").is_none());
    assert_eq!(
        deep["_embedded"]["comments"][0]["_embedded"]["author"]["name"],
        json!("Bob")
    );
}

#[test]
fn test_author_email_is_opt_in() {
    let fixture = seeded(&Configuration::new());

    let public = fixture.api.author(fixture.alice, false).unwrap();
    let private = fixture.api.author(fixture.alice, true).unwrap();

    assert!(public.get("email").is_none());
    assert_eq!(private["email"], json!("alice@example.com"));
}

#[test]
fn test_missing_records() {
    let fixture = seeded(&Configuration::new());

    let post = fixture.api.post(999, "").unwrap_err();
    let comments = fixture.api.comments(999, "").unwrap_err();

    assert!(matches!(post, BlogError::NotFound { entity: "Post", id: 999 }));
    assert_eq!(comments.to_string(), "Post 999 not found");
}

#[test]
fn test_comments_listing() {
    let fixture = seeded(&Configuration::new());

    let comments = fixture.api.comments(fixture.hello, "author").unwrap();

    assert_eq!(comments.len(), 1);
    assert_eq!(
        comments[0]["_links"]["post"],
        json!({ "href": format!("/posts/{}", fixture.hello) })
    );
    assert_eq!(comments[0]["_embedded"]["author"]["name"], json!("Bob"));
}

#[test]
fn test_posts_pagination() {
    let fixture = seeded(&Configuration::new());

    let first = fixture.api.posts(1, 1, "").unwrap();
    let last = fixture.api.posts(2, 1, "author").unwrap();

    assert_eq!(first["page"], json!(1));
    assert_eq!(first["count"], json!(1));
    assert_eq!(first["total"], json!(2));
    assert_eq!(
        first["_links"]["next"],
        json!({ "href": "/posts?page=2&per_page=1" })
    );
    assert!(first["_links"].get("prev").is_none());
    assert_eq!(
        first["_links"]["find"],
        json!({ "href": "/posts{/id}", "templated": true })
    );
    assert_eq!(first["_embedded"]["posts"][0]["title"], json!("Hello"));

    assert!(last["_links"].get("next").is_none());
    assert_eq!(
        last["_links"]["prev"],
        json!({ "href": "/posts?page=1&per_page=1" })
    );
    assert_eq!(
        last["_embedded"]["posts"][0]["_embedded"]["author"]["name"],
        json!("Alice")
    );
}

#[test]
fn test_posts_page_past_any_offset_is_empty() {
    let fixture = seeded(&Configuration::new());

    let far = fixture.api.posts(usize::MAX / 2, 10, "").unwrap();

    assert_eq!(far["count"], json!(0));
    assert_eq!(far["_embedded"]["posts"], json!([]));
    assert!(far["_links"].get("next").is_none());
    assert_eq!(
        far["_links"]["prev"],
        json!({ "href": format!("/posts?page={}&per_page=10", usize::MAX / 2 - 1) })
    );
}

#[test]
fn test_author_posts_listing() {
    let fixture = seeded(&Configuration::new());

    let posts = fixture.api.author_posts(fixture.alice, "author").unwrap();
    let missing = fixture.api.author_posts(999, "").unwrap_err();

    let titles: Vec<_> = posts.iter().map(|post| post["title"].clone()).collect();
    assert_eq!(titles, [json!("Hello"), json!("Draft")]);
    assert_eq!(posts[0]["_embedded"]["author"]["name"], json!("Alice"));
    assert!(matches!(missing, BlogError::NotFound { entity: "Author", id: 999 }));
}

#[test]
fn test_curies_only_on_root_documents() {
    let mut config = Configuration::new();
    config.extension(Curies::new("blog", "/docs/{rel}"));
    let fixture = seeded(&config);

    let root = fixture.api.root().unwrap();
    let post = fixture.api.post(fixture.hello, "author").unwrap();

    assert_eq!(root["_links"]["posts"], json!({ "href": "/posts" }));
    assert_eq!(
        root["_links"]["curies"],
        json!([{ "href": "/docs/{rel}", "name": "blog", "templated": true }])
    );
    assert!(post["_links"]["curies"].is_array());
    assert!(post["_embedded"]["author"]["_links"].get("curies").is_none());
}

/// Renders share the representers; each task builds its own documents.
#[tokio::test(flavor = "multi_thread")]
async fn test_concurrent_renders() {
    let fixture = Arc::new(seeded(&Configuration::new()));

    let mut handles = Vec::new();
    for i in 0..16 {
        let fixture = Arc::clone(&fixture);
        handles.push(tokio::spawn(async move {
            let embed = if i % 2 == 0 { "author,comments.author" } else { "" };
            fixture.api.post(fixture.hello, embed)
        }));
    }

    for (i, handle) in handles.into_iter().enumerate() {
        let post = handle
            .await
            .expect("Task panicked")
            .expect("Failed to render");
        assert_eq!(post["title"], json!("Hello"));
        assert_eq!(post.get("_embedded").is_some(), i % 2 == 0);
    }
}
