//! Shared fixtures for integration tests: countries with nested cities and
//! people living in cities, plus HTMX response assertions.

#![allow(dead_code)]

use std::sync::Arc;

use acton_crud::prelude::*;
use axum::http::header::{LOCATION, SET_COOKIE};
use axum::http::StatusCode;
use axum_test::{TestResponse, TestServer};
use validator::Validate;

#[derive(Debug, Clone, Default, Validate)]
pub struct Country {
    pub id: Option<i64>,
    #[validate(length(min = 1, message = "can't be blank"))]
    pub name: String,
    #[validate(length(min = 2, max = 3, message = "must have 2 or 3 letters"))]
    pub code: String,
}

impl Entity for Country {
    const RESOURCE: &'static str = "countries";
    const PARAM_KEY: &'static str = "country";

    fn columns() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::integer("id"),
            FieldDescriptor::string("name"),
            FieldDescriptor::string("code"),
            FieldDescriptor::relation("cities", "cities"),
        ]
    }

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn get(&self, field: &str) -> Value {
        match field {
            "id" => self.id.into(),
            "name" => self.name.as_str().into(),
            "code" => self.code.as_str().into(),
            _ => Value::Null,
        }
    }

    fn set(&mut self, field: &str, value: Value) {
        match (field, value) {
            ("name", Value::Text(v)) => self.name = v,
            ("code", Value::Text(v)) => self.code = v.to_uppercase(),
            _ => {}
        }
    }

    fn label(&self) -> String {
        self.name.clone()
    }

    fn validate(&self) -> ValidationErrors {
        Validate::validate(self).map_or_else(Into::into, |()| ValidationErrors::new())
    }
}

#[derive(Debug, Clone, Default, Validate)]
pub struct City {
    pub id: Option<i64>,
    #[validate(length(min = 1, message = "can't be blank"))]
    pub name: String,
    pub country_id: Option<i64>,
}

impl Entity for City {
    const RESOURCE: &'static str = "cities";
    const PARAM_KEY: &'static str = "city";

    fn columns() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::integer("id"),
            FieldDescriptor::string("name"),
            FieldDescriptor::association("country_id", "countries"),
        ]
    }

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn get(&self, field: &str) -> Value {
        match field {
            "id" => self.id.into(),
            "name" => self.name.as_str().into(),
            "country_id" => self.country_id.into(),
            _ => Value::Null,
        }
    }

    fn set(&mut self, field: &str, value: Value) {
        match (field, value) {
            ("name", Value::Text(v)) => self.name = v,
            ("country_id", v) => self.country_id = v.as_i64(),
            _ => {}
        }
    }

    fn label(&self) -> String {
        self.name.clone()
    }

    fn validate(&self) -> ValidationErrors {
        Validate::validate(self).map_or_else(Into::into, |()| ValidationErrors::new())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Person {
    pub id: Option<i64>,
    pub name: String,
    pub city_id: Option<i64>,
}

impl Entity for Person {
    const RESOURCE: &'static str = "people";
    const PARAM_KEY: &'static str = "person";

    fn columns() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::integer("id"),
            FieldDescriptor::string("name"),
            FieldDescriptor::association("city_id", "cities"),
        ]
    }

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn get(&self, field: &str) -> Value {
        match field {
            "id" => self.id.into(),
            "name" => self.name.as_str().into(),
            "city_id" => self.city_id.into(),
            _ => Value::Null,
        }
    }

    fn set(&mut self, field: &str, value: Value) {
        match (field, value) {
            ("name", Value::Text(v)) => self.name = v,
            ("city_id", v) => self.city_id = v.as_i64(),
            _ => {}
        }
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}

/// Seeded repositories shared by the routers and the assertions
pub struct Fixture {
    pub countries: InMemoryRepository<Country>,
    pub cities: InMemoryRepository<City>,
    pub people: InMemoryRepository<Person>,
}

fn country(id: i64, name: &str, code: &str) -> Country {
    Country {
        id: Some(id),
        name: name.into(),
        code: code.into(),
    }
}

fn city(id: i64, name: &str, country_id: i64) -> City {
    City {
        id: Some(id),
        name: name.into(),
        country_id: Some(country_id),
    }
}

/// Switzerland (Bern, Zurich), Germany (Berlin), Brazil (no cities);
/// Hans lives in Bern
pub fn fixture() -> Fixture {
    let countries = InMemoryRepository::with_entries([
        country(1, "Switzerland", "CH"),
        country(2, "Germany", "DE"),
        country(3, "Brazil", "BR"),
    ]);
    let cities = InMemoryRepository::with_entries([
        city(1, "Bern", 1),
        city(2, "Zurich", 1),
        city(3, "Berlin", 2),
    ]);
    let people = InMemoryRepository::with_entries([Person {
        id: Some(1),
        name: "Hans".into(),
        city_id: Some(1),
    }]);

    let lookup = cities.clone();
    countries.restrict_dependents("cities", move |id| lookup.count_where("country_id", id));
    let lookup = people.clone();
    cities.restrict_dependents("people", move |id| lookup.count_where("city_id", id));

    Fixture {
        countries,
        cities,
        people,
    }
}

impl Fixture {
    /// Countries at the root, cities nested in countries, people at the root
    pub fn app(&self) -> axum::Router {
        let links = RouteTable::new("").with("countries").with("people");
        let associations = Associations::new()
            .with("countries", Arc::new(self.countries.clone()))
            .with("cities", Arc::new(self.cities.clone()));

        let countries = CrudController::new(self.countries.clone())
            .with_links(links.clone())
            .with_associations(associations.clone())
            .order_by(SortSpec::asc("code"));
        let cities = CrudController::new(self.cities.clone())
            .nested_in("countries", "country_id")
            .with_links(links.clone())
            .with_associations(associations.clone())
            .order_by(SortSpec::asc("name"));
        let people = CrudController::new(self.people.clone())
            .with_links(links)
            .with_associations(associations)
            .order_by(SortSpec::asc("name"));

        axum::Router::new()
            .merge(countries.router())
            .merge(cities.router())
            .merge(people.router())
    }

    pub fn server(&self) -> TestServer {
        TestServer::new(self.app()).unwrap()
    }
}

/// Assert that the response contains an HX-Redirect header with the expected path
pub fn assert_hx_redirect(response: &TestResponse, expected_path: &str) {
    let header = response
        .headers()
        .get("HX-Redirect")
        .expect("HX-Redirect header not found");
    let actual = header.to_str().expect("Invalid HX-Redirect header value");
    assert_eq!(
        actual, expected_path,
        "Expected HX-Redirect to {expected_path}, got {actual}"
    );
}

/// Assert a `303 See Other` to the expected path
pub fn assert_see_other(response: &TestResponse, expected_path: &str) {
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    let actual = response
        .headers()
        .get(LOCATION)
        .expect("Location header not found")
        .to_str()
        .expect("Invalid Location header value");
    assert_eq!(actual, expected_path, "Expected redirect to {expected_path}, got {actual}");
}

/// Flash key set by the response, if any
pub fn flash_set(response: &TestResponse) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|cookie| cookie.strip_prefix("acton_crud_flash="))
        .and_then(|rest| rest.split(';').next())
        .filter(|key| !key.is_empty())
        .map(ToString::to_string)
}

/// Count non-overlapping occurrences of a regex
pub fn count(pattern: &str, html: &str) -> usize {
    regex::Regex::new(pattern).unwrap().find_iter(html).count()
}
