use cms_blog::cms::{CmsError, ContentSource, Cursor, PrismicClient, QueryOptions};
use cms_blog::content::{ListingState, PostSummary};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEARCH: &str = "/api/v2/documents/search";

fn post(uid: &str, title: &str) -> serde_json::Value {
    json!({
        "id": format!("id-{}", uid),
        "uid": uid,
        "type": "posts",
        "first_publication_date": "2021-03-15T19:25:28+0000",
        "last_publication_date": "2021-03-15T19:25:28+0000",
        "data": {
            "title": title,
            "subtitle": "Pensando em sincronização em vez de ciclos de vida.",
            "author": "Joseph Oliveira"
        }
    })
}

fn page(results: Vec<serde_json::Value>, next_page: Option<String>) -> serde_json::Value {
    json!({
        "page": 1,
        "results_per_page": results.len(),
        "results_size": results.len(),
        "total_results_size": results.len(),
        "total_pages": 1,
        "next_page": next_page,
        "prev_page": null,
        "results": results
    })
}

async fn mount_master_ref(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "refs": [
                {"id": "preview", "ref": "PREVIEW", "label": "Preview", "isMasterRef": false},
                {"id": "master", "ref": "MASTER", "label": "Master", "isMasterRef": true}
            ]
        })))
        .mount(server)
        .await;
}

fn client(server: &MockServer) -> PrismicClient {
    PrismicClient::new(format!("{}/api/v2", server.uri()))
}

#[tokio::test]
async fn query_sends_type_predicate_fetch_fields_and_page_size() {
    let server = MockServer::start().await;
    mount_master_ref(&server).await;

    Mock::given(method("GET"))
        .and(path(SEARCH))
        .and(query_param("ref", "MASTER"))
        .and(query_param("q", r#"[[at(document.type, "posts")]]"#))
        .and(query_param("fetch", "posts.title,posts.subtitle,posts.author"))
        .and(query_param("pageSize", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![post("a", "Post A"), post("b", "Post B")],
            Some(format!("{}{}?page=2", server.uri(), SEARCH)),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let options = QueryOptions {
        document_type: "posts".to_string(),
        fetch: vec!["title".into(), "subtitle".into(), "author".into()],
        page_size: Some(2),
    };
    let result = client(&server).query(&options).await.unwrap();

    assert_eq!(result.results.len(), 2);
    assert_eq!(result.results[0].uid.as_deref(), Some("a"));
    assert!(result.next_page.is_some());
}

#[tokio::test]
async fn get_by_uid_returns_none_when_not_found() {
    let server = MockServer::start().await;
    mount_master_ref(&server).await;

    Mock::given(method("GET"))
        .and(path(SEARCH))
        .and(query_param("q", r#"[[at(my.posts.uid, "nope")]]"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![], None)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(SEARCH))
        .and(query_param("q", r#"[[at(my.posts.uid, "a")]]"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![post("a", "Post A")], None)))
        .mount(&server)
        .await;

    let client = client(&server);
    assert!(client.get_by_uid("posts", "nope").await.unwrap().is_none());

    let found = client.get_by_uid("posts", "a").await.unwrap().unwrap();
    assert_eq!(found.text("title"), "Post A");
}

#[tokio::test]
async fn error_status_is_reported() {
    let server = MockServer::start().await;
    mount_master_ref(&server).await;

    Mock::given(method("GET"))
        .and(path(SEARCH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client(&server)
        .query(&QueryOptions::all("posts"))
        .await
        .unwrap_err();
    assert!(matches!(err, CmsError::Status { status: 500, .. }));
}

#[tokio::test]
async fn missing_master_ref_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"refs": []})))
        .mount(&server)
        .await;

    let err = client(&server)
        .query(&QueryOptions::all("posts"))
        .await
        .unwrap_err();
    assert!(matches!(err, CmsError::NoMasterRef));
}

#[tokio::test]
async fn load_more_follows_cursor_until_exhausted() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![post("c", "Post C")], None)))
        .expect(1)
        .mount(&server)
        .await;

    let first: Vec<PostSummary> = ["a", "b"]
        .iter()
        .map(|uid| PostSummary {
            uid: uid.to_string(),
            first_publication_date: None,
            title: format!("Post {}", uid.to_uppercase()),
            subtitle: String::new(),
            author: "Danilo Vieira".to_string(),
        })
        .collect();
    let cursor = Cursor::new(format!("{}{}?page=2", server.uri(), SEARCH));
    let state = ListingState::initialize(cms_blog::content::PostsPage::new(first, Some(cursor)));

    let client = client(&server);
    let next = state.load_more(&client).await.unwrap();

    let uids: Vec<_> = next.posts().iter().map(|p| p.uid.as_str()).collect();
    assert_eq!(uids, vec!["a", "b", "c"]);
    assert!(!next.has_more());
    assert_eq!(next.posts()[2].author, "Joseph Oliveira");

    // exhausted: no further request is made (the mock expects exactly one)
    let again = next.load_more(&client).await.unwrap();
    assert_eq!(again, next);
}

#[tokio::test]
async fn load_more_failure_propagates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let cursor = Cursor::new(format!("{}{}?page=2", server.uri(), SEARCH));
    let state = ListingState::initialize(cms_blog::content::PostsPage::new(vec![], Some(cursor)));

    let result = state.load_more(&client(&server)).await;
    assert!(matches!(result, Err(CmsError::Status { status: 503, .. })));
}
