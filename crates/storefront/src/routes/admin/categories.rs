//! Admin category route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use pitchside_core::CategoryId;

use crate::db::{CategoryRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{flash, take_flash};
use crate::routes::admin::products::CategoryOption;
use crate::state::AppState;

/// New category form data.
#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    pub name: String,
}

/// Admin category list template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/categories/index.html")]
pub struct AdminCategoriesTemplate {
    pub categories: Vec<CategoryOption>,
    pub flash: Option<String>,
    pub errors: Vec<String>,
}

async fn list_page(
    state: &AppState,
    flash: Option<String>,
    errors: Vec<String>,
) -> Result<AdminCategoriesTemplate> {
    let categories = CategoryRepository::new(state.pool()).all().await?;
    Ok(AdminCategoriesTemplate {
        categories: categories.iter().map(CategoryOption::from).collect(),
        flash,
        errors,
    })
}

/// Category list with the inline create form.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
) -> Result<AdminCategoriesTemplate> {
    let flash = take_flash(&session).await?;
    list_page(&state, flash, Vec::new()).await
}

/// Create a category.
#[instrument(skip(state, session))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CategoryForm>,
) -> Result<axum::response::Response> {
    use axum::response::IntoResponse;

    let name = form.name.trim();
    if name.is_empty() {
        let page = list_page(&state, None, vec!["Name is required".to_owned()]).await?;
        return Ok(page.into_response());
    }

    match CategoryRepository::new(state.pool()).create(name).await {
        Ok(category) => {
            flash(
                &session,
                format!("Category {} has been created successfully", category.name),
            )
            .await?;
            Ok(Redirect::to("/admin/categories").into_response())
        }
        Err(RepositoryError::Conflict(msg)) => {
            let page = list_page(&state, None, vec![msg]).await?;
            Ok(page.into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Delete a category.
///
/// Categories that still contain products cannot be deleted; the failure is
/// surfaced as a flash message.
#[instrument(skip(state, session))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Redirect> {
    match CategoryRepository::new(state.pool())
        .delete(CategoryId::new(id))
        .await
    {
        Ok(()) => flash(&session, "Category has been deleted successfully").await?,
        Err(RepositoryError::NotFound(msg)) => return Err(AppError::NotFound(msg)),
        Err(RepositoryError::Conflict(msg)) => {
            flash(&session, format!("Category has not been deleted: {msg}")).await?;
        }
        Err(e) => return Err(e.into()),
    }

    Ok(Redirect::to("/admin/categories"))
}
