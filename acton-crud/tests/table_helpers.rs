//! Rendering helpers used through the public API

mod common;

use acton_crud::prelude::*;
use common::{count, City, Country};

fn countries() -> Vec<Country> {
    vec![
        Country {
            id: Some(1),
            name: "Switzerland".into(),
            code: "CH".into(),
        },
        Country {
            id: Some(2),
            name: "Germany".into(),
            code: "DE".into(),
        },
    ]
}

fn context() -> RenderContext {
    RenderContext::new(ResourceRoutes::new(Country::RESOURCE))
        .with_links(RouteTable::new("").with(Country::RESOURCE))
}

#[test]
fn test_table_with_custom_column_has_no_actions() {
    let entries = countries();
    let spec = RenderSpec::<Country>::only(&["name"])
        .column("Code", |c| format!("<code>{}</code>", c.code));
    let html = render_table(&entries, &spec, None, &context());

    assert_eq!(count(r#"<td class="action">"#, &html), 0);
    assert!(html.contains("<td><code>CH</code></td>"));
}

#[test]
fn test_table_builder_with_actions() {
    let entries = countries();
    let ctx = context();
    let sort = SortSpec::asc("code");
    let html = Table::new(&entries, &ctx)
        .sorted_by(Some(&sort))
        .attrs(&["name", "code"])
        .action_cols()
        .render();

    assert_eq!(count("<tr", &html), 3);
    assert_eq!(count(r#"<td class="action">"#, &html), 6);
    assert!(html.contains(r#"sort=code&amp;sort_dir=desc">Code</a> &darr;</th>"#));
}

#[test]
fn test_mount_prefix_applies_to_links() {
    let entries = countries();
    let ctx = RenderContext::new(ResourceRoutes::new(Country::RESOURCE).with_mount("/admin"));
    let html = render_table(&entries, &RenderSpec::only(&["name"]), None, &ctx);
    assert!(html.contains(r#"href="/admin/countries/2/edit""#));
}

#[test]
fn test_association_label_links_to_parent() {
    let city = City {
        id: Some(5),
        name: "Bern".into(),
        country_id: Some(1),
    };
    let ctx = RenderContext::new(ResourceRoutes::new(City::RESOURCE))
        .with_links(RouteTable::new("").with(Country::RESOURCE))
        .with_associations(AssociationIndex::new().with("countries", vec![(1, "Switzerland".into())]));
    let spec = RenderSpec::<City>::new();
    let field = FieldDescriptor::association("country_id", "countries");

    assert_eq!(
        format_attr(&city, &field, &spec, &ctx),
        r#"<a href="/countries/1">Switzerland</a>"#
    );
    let html = render_attrs(&city, &spec, &ctx);
    assert!(html.contains(r#"<div class="caption">Country</div>"#));
}

#[test]
fn test_empty_table_uses_configured_text() {
    let mut config = CrudConfig::default();
    config.messages.no_entries = "Nothing here".into();
    let ctx = context().with_config(std::sync::Arc::new(config));
    let html = render_table::<Country>(&[], &RenderSpec::new(), None, &ctx);
    assert_eq!(html, r#"<div class="list">Nothing here</div>"#);
}
