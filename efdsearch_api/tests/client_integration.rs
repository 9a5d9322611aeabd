use efdsearch_api::{Client, Error, SearchQuery, Session};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

fn client(server: &MockServer) -> Client {
    Client::with_base_url(&server.uri(), Session::new("tok", "sid")).unwrap()
}

#[tokio::test]
async fn search_reports_success() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("search_results.json");

    Mock::given(method("POST"))
        .and(path("/search/report/data/"))
        .and(header("x-csrftoken", "tok"))
        .and(body_string_contains("report_types"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let result = client(&mock_server)
        .search_reports(&SearchQuery::default())
        .await;
    assert!(result.is_ok());

    let resp = result.unwrap();
    assert_eq!(resp.records_total, 3);
    assert_eq!(resp.data.len(), 3);
    assert_eq!(resp.data[0][0], "JOHN");
}

#[tokio::test]
async fn search_reports_sends_session_cookie() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("search_empty.json");

    Mock::given(method("POST"))
        .and(path("/search/report/data/"))
        .and(header("cookie", "csrftoken=tok; sessionid=sid"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let resp = client(&mock_server)
        .search_reports(&SearchQuery::default())
        .await
        .unwrap();
    assert!(resp.data.is_empty());
}

#[tokio::test]
async fn search_reports_forbidden_is_authentication_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search/report/data/"))
        .respond_with(ResponseTemplate::new(403).set_body_string("CSRF verification failed"))
        .mount(&mock_server)
        .await;

    let result = client(&mock_server)
        .search_reports(&SearchQuery::default())
        .await;
    assert!(matches!(result, Err(Error::AuthenticationRequired)));
}

#[tokio::test]
async fn search_reports_result_not_ok() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("search_error.json");

    Mock::given(method("POST"))
        .and(path("/search/report/data/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let result = client(&mock_server)
        .search_reports(&SearchQuery::default())
        .await;
    assert!(matches!(result, Err(Error::UnexpectedResult(ref r)) if r == "error"));
}

#[tokio::test]
async fn search_reports_malformed_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search/report/data/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not valid json}"))
        .mount(&mock_server)
        .await;

    let result = client(&mock_server)
        .search_reports(&SearchQuery::default())
        .await;
    assert!(matches!(result, Err(Error::RequestFailed)));
}

#[tokio::test]
async fn get_filing_success() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("ptr.html");

    Mock::given(method("GET"))
        .and(path("/search/view/ptr/abc/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let html = client(&mock_server)
        .get_filing("/search/view/ptr/abc/")
        .await
        .unwrap();
    assert!(html.contains("Periodic Transaction Report"));
}

#[tokio::test]
async fn get_filing_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/view/ptr/abc/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let result = client(&mock_server)
        .get_filing("/search/view/ptr/abc/")
        .await;
    assert!(matches!(result, Err(Error::HttpStatus { status: 500, .. })));
}

#[tokio::test]
async fn get_filing_redirect_to_consent_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/view/annual/abc/"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", "/search/home/?next=/search/"),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/home/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<h4>Get Access</h4>"))
        .mount(&mock_server)
        .await;

    let result = client(&mock_server)
        .get_filing("/search/view/annual/abc/")
        .await;
    assert!(matches!(result, Err(Error::AuthenticationRequired)));
}

#[tokio::test]
async fn get_filing_refuses_links_to_other_hosts() {
    let portal = MockServer::start().await;
    let elsewhere = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(0)
        .mount(&elsewhere)
        .await;

    let link = format!("{}/search/view/ptr/abc/", elsewhere.uri());
    let result = client(&portal).get_filing(&link).await;
    assert!(matches!(result, Err(Error::ForeignLink(_))));
}

#[tokio::test]
async fn get_filing_accepts_absolute_portal_links() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/view/ptr/abc/"))
        .and(header("x-csrftoken", "tok"))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("ptr.html")))
        .mount(&mock_server)
        .await;

    let link = format!("{}/search/view/ptr/abc/", mock_server.uri());
    let html = client(&mock_server).get_filing(&link).await.unwrap();
    assert!(html.contains("Periodic Transaction Report"));
}

#[tokio::test]
async fn redirects_to_other_hosts_are_not_followed() {
    let portal = MockServer::start().await;
    let elsewhere = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/view/ptr/abc/"))
        .respond_with(ResponseTemplate::new(302).insert_header(
            "location",
            format!("{}/collect/", elsewhere.uri()).as_str(),
        ))
        .mount(&portal)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&elsewhere)
        .await;

    let result = client(&portal).get_filing("/search/view/ptr/abc/").await;
    assert!(matches!(result, Err(Error::HttpStatus { status: 302, .. })));
}
