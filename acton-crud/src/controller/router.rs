//! HTTP routing for a [`CrudController`]
//!
//! | Method | Path | Action |
//! |---|---|---|
//! | GET | `/res` | index |
//! | GET | `/res/new` | new |
//! | POST | `/res` | create |
//! | GET | `/res/{id}` | show (JSON with `Accept: application/json`) |
//! | GET | `/res/{id}/edit` | edit |
//! | POST, PUT | `/res/{id}` | update |
//! | DELETE | `/res/{id}` | destroy |
//! | POST | `/res/{id}/delete` | destroy |
//!
//! Nested controllers serve the same routes below `/<parent>/{id}`, with the
//! member id named `{<param_key>_id}` (e.g. `/countries/{id}/cities/{city_id}`).

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::header::ACCEPT;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use axum_htmx::HxRequest;
use tower_http::trace::TraceLayer;

use super::flash::{clear_flash, Flash};
use super::{CrudController, CrudResponse};
use crate::error::CrudError;
use crate::model::Entity;
use crate::persistence::Repository;
use crate::routing::Scope;
use crate::sort::SortParams;
use crate::template::render_page;

type Shared<E, R> = State<Arc<CrudController<E, R>>>;
type FormParams = Form<Vec<(String, String)>>;

impl<E: Entity, R: Repository<E>> CrudController<E, R> {
    /// Build the router serving all actions
    #[must_use]
    pub fn router(self) -> Router {
        let mount = self.config.routes.mount.trim_matches('/');
        let base = if mount.is_empty() {
            self.base_path()
        } else {
            format!("/{mount}{}", self.base_path())
        };
        let member = format!("{base}/{{{}}}", self.member_param());
        tracing::debug!(resource = E::RESOURCE, path = %base, "mounting CRUD routes");

        Router::new()
            .route(&base, get(index::<E, R>).post(create::<E, R>))
            .route(&format!("{base}/new"), get(new_form::<E, R>))
            .route(
                &member,
                get(show::<E, R>)
                    .post(update::<E, R>)
                    .put(update::<E, R>)
                    .delete(destroy::<E, R>),
            )
            .route(&format!("{member}/edit"), get(edit::<E, R>))
            .route(&format!("{member}/delete"), post(destroy::<E, R>))
            .layer(TraceLayer::new_for_http())
            .with_state(Arc::new(self))
    }

    /// The parent segment reuses the parent's own `{id}` parameter name
    fn base_path(&self) -> String {
        match &self.nesting {
            Some(nesting) => format!("/{}/{{id}}/{}", nesting.resource, E::RESOURCE),
            None => format!("/{}", E::RESOURCE),
        }
    }

    fn member_param(&self) -> String {
        match self.nesting {
            Some(_) => format!("{}_id", E::PARAM_KEY),
            None => "id".to_string(),
        }
    }

    /// Scope and entity id from the captured path ids, parent first
    fn split_ids(&self, ids: &[i64]) -> (Scope, Option<i64>) {
        match (&self.nesting, ids.split_first()) {
            (Some(_), Some((parent, rest))) => (self.scope(Some(*parent)), rest.first().copied()),
            _ => (self.scope(None), ids.first().copied()),
        }
    }

    fn member_ids(&self, ids: &[i64]) -> Result<(Scope, i64), CrudError> {
        match self.split_ids(ids) {
            (scope, Some(id)) => Ok((scope, id)),
            (_, None) => Err(CrudError::NotFound {
                resource: E::RESOURCE.to_string(),
                id: 0,
            }),
        }
    }

    /// Turn an action result into an HTTP response
    ///
    /// HTMX requests get bare fragments and `HX-Redirect` headers; other
    /// requests get full pages and `303 See Other`.
    fn respond(&self, response: CrudResponse, htmx: bool, headers: &HeaderMap) -> Result<Response, CrudError> {
        match response {
            CrudResponse::Page {
                title,
                body,
                status,
            } => {
                let flash = Flash::from_headers(headers);
                let shown = flash.map(|f| (f.kind(), f.message(&self.config.messages)));
                let html = render_page(&title, shown, &body, htmx)?;

                let mut response = (status, Html(html)).into_response();
                if flash.is_some() {
                    clear_flash(response.headers_mut());
                }
                Ok(response)
            }
            CrudResponse::Redirect { location, flash } => {
                let mut response = if htmx {
                    (StatusCode::OK, [("HX-Redirect", location.as_str())]).into_response()
                } else {
                    Redirect::to(&location).into_response()
                };
                if let Some(flash) = flash {
                    flash.write_to(response.headers_mut());
                }
                Ok(response)
            }
        }
    }
}

fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"))
}

async fn index<E: Entity, R: Repository<E>>(
    State(ctrl): Shared<E, R>,
    Path(ids): Path<Vec<i64>>,
    HxRequest(htmx): HxRequest,
    Query(params): Query<SortParams>,
    headers: HeaderMap,
) -> Result<Response, CrudError> {
    let (scope, _) = ctrl.split_ids(&ids);
    let response = ctrl.index(&scope, &params).await?;
    ctrl.respond(response, htmx, &headers)
}

async fn show<E: Entity, R: Repository<E>>(
    State(ctrl): Shared<E, R>,
    Path(ids): Path<Vec<i64>>,
    HxRequest(htmx): HxRequest,
    headers: HeaderMap,
) -> Result<Response, CrudError> {
    let (scope, id) = ctrl.member_ids(&ids)?;
    if wants_json(&headers) {
        return Ok(Json(ctrl.show_json(&scope, id).await?).into_response());
    }
    let response = ctrl.show(&scope, id).await?;
    ctrl.respond(response, htmx, &headers)
}

async fn new_form<E: Entity, R: Repository<E>>(
    State(ctrl): Shared<E, R>,
    Path(ids): Path<Vec<i64>>,
    HxRequest(htmx): HxRequest,
    headers: HeaderMap,
) -> Result<Response, CrudError> {
    let (scope, _) = ctrl.split_ids(&ids);
    let response = ctrl.new_form(&scope).await?;
    ctrl.respond(response, htmx, &headers)
}

async fn create<E: Entity, R: Repository<E>>(
    State(ctrl): Shared<E, R>,
    Path(ids): Path<Vec<i64>>,
    HxRequest(htmx): HxRequest,
    headers: HeaderMap,
    Form(params): FormParams,
) -> Result<Response, CrudError> {
    let (scope, _) = ctrl.split_ids(&ids);
    let response = ctrl.create(&scope, &params).await?;
    ctrl.respond(response, htmx, &headers)
}

async fn edit<E: Entity, R: Repository<E>>(
    State(ctrl): Shared<E, R>,
    Path(ids): Path<Vec<i64>>,
    HxRequest(htmx): HxRequest,
    headers: HeaderMap,
) -> Result<Response, CrudError> {
    let (scope, id) = ctrl.member_ids(&ids)?;
    let response = ctrl.edit(&scope, id).await?;
    ctrl.respond(response, htmx, &headers)
}

async fn update<E: Entity, R: Repository<E>>(
    State(ctrl): Shared<E, R>,
    Path(ids): Path<Vec<i64>>,
    HxRequest(htmx): HxRequest,
    headers: HeaderMap,
    Form(params): FormParams,
) -> Result<Response, CrudError> {
    let (scope, id) = ctrl.member_ids(&ids)?;
    let response = ctrl.update(&scope, id, &params).await?;
    ctrl.respond(response, htmx, &headers)
}

async fn destroy<E: Entity, R: Repository<E>>(
    State(ctrl): Shared<E, R>,
    Path(ids): Path<Vec<i64>>,
    HxRequest(htmx): HxRequest,
    headers: HeaderMap,
) -> Result<Response, CrudError> {
    let (scope, id) = ctrl.member_ids(&ids)?;
    let response = ctrl.destroy(&scope, id).await?;
    ctrl.respond(response, htmx, &headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::InMemoryRepository;
    use crate::testing::{test_entries, CrudTestModel};
    use axum::http::header::{LOCATION, SET_COOKIE};
    use axum::http::HeaderValue;

    fn controller() -> CrudController<CrudTestModel, InMemoryRepository<CrudTestModel>> {
        CrudController::new(InMemoryRepository::with_entries(test_entries()))
            .with_spec(crate::format::RenderSpec::only(&["name", "children"]))
    }

    #[test]
    fn test_base_path() {
        assert_eq!(controller().base_path(), "/crud_test_models");
        assert_eq!(
            controller().nested_in("owners", "owner_id").base_path(),
            "/owners/{id}/crud_test_models"
        );
    }

    #[test]
    fn test_split_ids() {
        let root = controller();
        assert_eq!(root.member_param(), "id");
        assert_eq!(root.split_ids(&[4]), (Scope::root(), Some(4)));
        assert_eq!(root.split_ids(&[]), (Scope::root(), None));

        let nested = controller().nested_in("owners", "owner_id");
        assert_eq!(nested.member_param(), "crud_test_model_id");
        assert_eq!(nested.split_ids(&[2, 7]), (Scope::nested("owners", 2), Some(7)));
        assert_eq!(nested.split_ids(&[2]), (Scope::nested("owners", 2), None));
        assert!(matches!(nested.member_ids(&[2]), Err(CrudError::NotFound { .. })));
    }

    #[test]
    fn test_wants_json() {
        let mut headers = HeaderMap::new();
        assert!(!wants_json(&headers));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        assert!(wants_json(&headers));
    }

    #[test]
    fn test_redirect_responses() {
        let ctrl = controller();
        let redirect = || CrudResponse::Redirect {
            location: "/crud_test_models".into(),
            flash: Some(Flash::Created),
        };

        let plain = ctrl.respond(redirect(), false, &HeaderMap::new()).unwrap();
        assert_eq!(plain.status(), StatusCode::SEE_OTHER);
        assert_eq!(plain.headers()[LOCATION], "/crud_test_models");
        assert!(plain.headers()[SET_COOKIE]
            .to_str()
            .unwrap()
            .starts_with("acton_crud_flash=created"));

        let htmx = ctrl.respond(redirect(), true, &HeaderMap::new()).unwrap();
        assert_eq!(htmx.status(), StatusCode::OK);
        assert_eq!(htmx.headers()["HX-Redirect"], "/crud_test_models");
    }

    #[test]
    fn test_page_consumes_flash() {
        let ctrl = controller();
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::COOKIE,
            HeaderValue::from_static("acton_crud_flash=destroyed"),
        );
        let page = CrudResponse::Page {
            title: "List".into(),
            body: String::new(),
            status: StatusCode::OK,
        };
        let response = ctrl.respond(page, true, &headers).unwrap();
        assert!(response.headers()[SET_COOKIE]
            .to_str()
            .unwrap()
            .contains("Max-Age=0"));
    }
}
