//! HTTP-level tests of the CRUD controller with nested resources

mod common;

use acton_crud::prelude::*;
use axum::http::StatusCode;
use common::{assert_hx_redirect, assert_see_other, count, fixture, flash_set};

#[tokio::test]
async fn test_index_renders_full_page_in_default_order() {
    let fixture = fixture();
    let response = fixture.server().get("/countries").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let html = response.text();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<h1>Countries</h1>"));
    assert_eq!(count("<tr", &html), 4);
    let brazil = html.find("Brazil").unwrap();
    let switzerland = html.find("Switzerland").unwrap();
    let germany = html.find("Germany").unwrap();
    assert!(brazil < switzerland && switzerland < germany);
}

#[tokio::test]
async fn test_index_lists_related_entries() {
    let fixture = fixture();
    let html = fixture.server().get("/countries").await.text();
    assert!(html.contains("<td><ul><li>Bern</li><li>Zurich</li></ul></td>"));
    assert!(html.contains("<td>(none)</td>"));
}

#[tokio::test]
async fn test_index_sorted_by_request() {
    let fixture = fixture();
    let html = fixture
        .server()
        .get("/countries?sort=name&sort_dir=desc")
        .await
        .text();
    assert!(html.find("Switzerland").unwrap() < html.find("Brazil").unwrap());
    assert!(html.contains(r#"<a href="/countries?sort=name&amp;sort_dir=asc">Name</a> &uarr;"#));
}

#[tokio::test]
async fn test_unknown_sort_field_is_ignored() {
    let fixture = fixture();
    let response = fixture.server().get("/countries?sort=chatty").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let html = response.text();
    assert!(html.find("Brazil").unwrap() < html.find("Germany").unwrap());
}

#[tokio::test]
async fn test_htmx_request_gets_fragment() {
    let fixture = fixture();
    let html = fixture
        .server()
        .get("/countries")
        .add_header("HX-Request", "true")
        .await
        .text();
    assert!(!html.contains("<!DOCTYPE html>"));
    assert!(html.starts_with("<h1>Countries</h1>"));
}

#[tokio::test]
async fn test_nested_index_is_scoped() {
    let fixture = fixture();
    let html = fixture.server().get("/countries/1/cities").await.text();

    assert!(html.contains("<td>Bern</td>"));
    assert!(html.contains("<td>Zurich</td>"));
    assert!(!html.contains("Berlin"));
    assert!(html.contains(r#"<a href="/countries/1/cities/2" class="action">[Show]</a>"#));
    assert!(html.contains(r#"<a href="/countries/1/cities/new" class="action">[New]</a>"#));
}

#[tokio::test]
async fn test_nested_entity_outside_scope_is_not_found() {
    let fixture = fixture();
    let server = fixture.server();
    assert_eq!(
        server.get("/countries/2/cities/1").await.status_code(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        server.get("/countries/99/cities").await.status_code(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(server.get("/countries/42").await.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_show_json() {
    let fixture = fixture();
    let response = fixture
        .server()
        .get("/countries/1")
        .add_header("Accept", "application/json")
        .await;
    let json: serde_json::Value = response.json();
    assert_eq!(json["id"], 1);
    assert_eq!(json["name"], "Switzerland");
    assert_eq!(json["code"], "CH");
    assert!(json.get("cities").is_none());
}

#[tokio::test]
async fn test_new_form() {
    let fixture = fixture();
    let html = fixture.server().get("/countries/new").await.text();
    assert!(html.contains("<h1>New Country</h1>"));
    assert!(html.contains(r#"action="/countries""#));
    assert!(html.contains(r#"name="country[name]""#));
    assert!(!html.contains("country[cities]"));
}

#[tokio::test]
async fn test_nested_new_form_omits_parent_key() {
    let fixture = fixture();
    let html = fixture.server().get("/countries/1/cities/new").await.text();
    assert!(html.contains(r#"action="/countries/1/cities""#));
    assert!(!html.contains("city[country_id]"));
}

#[tokio::test]
async fn test_association_select_lists_choices() {
    let fixture = fixture();
    let html = fixture.server().get("/people/1/edit").await.text();
    assert!(html.contains(r#"<select name="person[city_id]""#));
    assert!(html.contains(r#"<option value="1" selected>Bern</option>"#));
    assert!(html.find(">Berlin<").unwrap() < html.find(">Zurich<").unwrap());
}

#[tokio::test]
async fn test_create_nested_city() {
    let fixture = fixture();
    let response = fixture
        .server()
        .post("/countries/1/cities")
        .form(&[("city[name]", "Basel")])
        .await;

    assert_see_other(&response, "/countries/1/cities");
    assert_eq!(flash_set(&response).as_deref(), Some("created"));
    assert_eq!(fixture.cities.count().await.unwrap(), 4);
    assert_eq!(fixture.cities.count_where("country_id", 1_i64), 3);
}

#[tokio::test]
async fn test_create_invalid_rerenders_form() {
    let fixture = fixture();
    let response = fixture
        .server()
        .post("/countries/1/cities")
        .form(&[("city[name]", "")])
        .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = response.text();
    assert!(html.contains("<li>Name can't be blank</li>"));
    assert!(flash_set(&response).is_none());
    assert_eq!(fixture.cities.count().await.unwrap(), 3);
}

#[tokio::test]
async fn test_update_via_htmx() {
    let fixture = fixture();
    let response = fixture
        .server()
        .put("/countries/2")
        .add_header("HX-Request", "true")
        .form(&[("country[name]", "Deutschland"), ("country[code]", "de")])
        .await;

    assert_hx_redirect(&response, "/countries");
    assert_eq!(flash_set(&response).as_deref(), Some("updated"));
    let stored = fixture.countries.find(2).await.unwrap().unwrap();
    assert_eq!(stored.name, "Deutschland");
    assert_eq!(stored.code, "DE");
}

#[tokio::test]
async fn test_update_invalid_keeps_entity() {
    let fixture = fixture();
    let response = fixture
        .server()
        .post("/countries/2")
        .form(&[("country[code]", "GERMANY")])
        .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.text().contains("must have 2 or 3 letters"));
    assert_eq!(fixture.countries.find(2).await.unwrap().unwrap().code, "DE");
}

#[tokio::test]
async fn test_destroy_with_dependents_is_blocked() {
    let fixture = fixture();
    let response = fixture
        .server()
        .delete("/countries/1")
        .add_header("HX-Request", "true")
        .await;

    assert_hx_redirect(&response, "/countries/1");
    assert_eq!(flash_set(&response).as_deref(), Some("destroy_blocked"));
    assert_eq!(fixture.countries.count().await.unwrap(), 3);
}

#[tokio::test]
async fn test_destroy_nested_city_with_inhabitants_is_blocked() {
    let fixture = fixture();
    let response = fixture.server().post("/countries/1/cities/1/delete").await;
    assert_see_other(&response, "/countries/1/cities/1");
    assert_eq!(fixture.cities.count().await.unwrap(), 3);
}

#[tokio::test]
async fn test_destroy_without_dependents() {
    let fixture = fixture();
    let response = fixture.server().post("/countries/3/delete").await;

    assert_see_other(&response, "/countries");
    assert_eq!(flash_set(&response).as_deref(), Some("destroyed"));
    assert_eq!(fixture.countries.count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_flash_is_shown_once() {
    let fixture = fixture();
    let response = fixture
        .server()
        .get("/countries/1")
        .add_header("Cookie", "acton_crud_flash=destroy_blocked")
        .await;

    let html = response.text();
    assert!(html.contains(
        r#"<div class="flash alert">The entry could not be deleted because dependent entries exist.</div>"#
    ));
    let cleared = response
        .headers()
        .get_all("set-cookie")
        .iter()
        .any(|v| v.to_str().unwrap().contains("Max-Age=0"));
    assert!(cleared);
}

#[tokio::test]
async fn test_non_numeric_id_is_rejected() {
    let fixture = fixture();
    let response = fixture.server().get("/countries/abc").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}
