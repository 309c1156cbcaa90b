//! Generic entity forms
//!
//! One labeled control per field of a [`RenderSpec`], chosen by the field's
//! type. Controls are named `<param_key>[<field>]` so submissions can be
//! applied with [`assign_params`](crate::model::assign_params).

use super::builder::FormBuilder;
use super::error::ValidationErrors;
use super::field::InputType;
use crate::error::CrudError;
use crate::format::{RenderContext, RenderSpec};
use crate::model::{captionize, Entity, FieldDescriptor, FieldType, ID_FIELD};

/// Where the form for `entity` submits to: its show URL once persisted,
/// the index URL otherwise
#[must_use]
pub fn form_action<E: Entity>(entity: &E, ctx: &RenderContext) -> String {
    entity.id().map_or_else(
        || ctx.routes.index_url(&ctx.scope),
        |id| ctx.routes.show_url(&ctx.scope, id),
    )
}

/// Render the form for `entity`
///
/// A non-empty `errors` collection is summarized above the fields and
/// repeated next to each offending control.
///
/// # Errors
///
/// Returns [`CrudError::MissingAssociation`] when an association field has
/// no collection in the render context.
pub fn render_form<E: Entity>(
    entity: &E,
    spec: &RenderSpec<E>,
    action: &str,
    errors: &ValidationErrors,
    ctx: &RenderContext,
) -> Result<String, CrudError> {
    let settings = &ctx.config.forms;
    let mut form = FormBuilder::new(action, "post")
        .id(format!("{}_form", E::PARAM_KEY))
        .class(E::PARAM_KEY)
        .errors(errors)
        .error_summary();

    if settings.htmx_boost {
        form = form
            .htmx_post(action)
            .htmx_target(settings.htmx_target.clone())
            .htmx_swap("innerHTML");
    }

    for field in spec
        .fields
        .iter()
        .filter(|f| f.field_type.is_editable() && f.name != ID_FIELD)
    {
        form = add_control(form, entity, field, ctx)?;
    }

    Ok(form.submit(ctx.messages().submit.clone()).build())
}

fn add_control<'a, E: Entity>(
    form: FormBuilder<'a>,
    entity: &E,
    field: &FieldDescriptor,
    ctx: &RenderContext,
) -> Result<FormBuilder<'a>, CrudError> {
    let name = format!("{}[{}]", E::PARAM_KEY, field.name);
    let id = format!("{}_{}", E::PARAM_KEY, field.name);
    let label = captionize(&field.name);
    let value = entity.get(&field.name);
    let settings = &ctx.config.forms;

    let builder = match field.field_type {
        FieldType::String => form.field(name, InputType::Text).value(value.to_form_value()),
        FieldType::Text => form
            .textarea(name)
            .rows(settings.textarea_rows)
            .value(value.to_form_value()),
        FieldType::Integer => form
            .field(name, InputType::Number)
            .value(value.to_form_value()),
        FieldType::Float => form
            .field(name, InputType::Number)
            .step("any")
            .value(value.to_form_value()),
        FieldType::Date => form
            .date_select(name, (settings.date_year_start, settings.date_year_end))
            .selected_date(value.as_date()),
        FieldType::Time => form.field(name, InputType::Time).value(value.to_form_value()),
        FieldType::DateTime => form
            .field(name, InputType::DateTimeLocal)
            .value(value.to_form_value()),
        FieldType::Boolean => form
            .checkbox(name)
            .checked(value.as_bool().unwrap_or(false)),
        FieldType::Association { target } => {
            let choices = ctx.associations.choices(target).ok_or_else(|| {
                CrudError::MissingAssociation {
                    field: field.name.clone(),
                }
            })?;
            let mut select = form.select(name).value(value.to_form_value());
            for (choice_id, choice_label) in choices {
                select = select.option(choice_id.to_string(), choice_label.clone());
            }
            select.include_blank()
        }
        FieldType::Relation { .. } => return Ok(form),
    };

    Ok(builder.id(id).label(label).error_key(field.name.clone()).done())
}
