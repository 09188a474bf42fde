//! HTTP handlers for the blog API.
//!
//! Every response is an [`ApiResponse`] envelope. Failures go through
//! [`AppError`], which picks the status code and `translate` key.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use super::error::{AppError, Scope};
use super::middleware::AuthenticatedUser;
use super::routes::AppState;
use crate::actions::{
    ArticleInput, CategoryInput, CreateArticleAction, CreateCategoryAction, CreateUserAction,
    CreateUserInput, DeleteResourceAction, DeleteUserAction, GetResourceAction,
    ListArticlesAction, ListCategoriesAction, ListUsersAction, LoginAction, LogoutAction,
    UpdateArticleAction, UpdateCategoryAction, UpdateUserAction, UpdateUserInput,
};
use crate::api::{ApiResponse, LoginRequest, TokenData};
use crate::{Article, BlogError, Cache, Category, Repository, SessionStore, User};

const AUTH_LOGIN: Scope = Scope::new("user", "login");
const AUTH_LOGOUT: Scope = Scope::new("user", "logout");

const USER_CREATE: Scope = Scope::new("user", "create");
const USER_LIST: Scope = Scope::new("user", "list");
const USER_GET: Scope = Scope::new("user", "get");
const USER_UPDATE: Scope = Scope::new("user", "update");
const USER_DELETE: Scope = Scope::new("user", "delete");

const CATEGORY_CREATE: Scope = Scope::new("category", "create");
const CATEGORY_LIST: Scope = Scope::new("category", "list");
const CATEGORY_GET: Scope = Scope::new("category", "get");
const CATEGORY_UPDATE: Scope = Scope::new("category", "update");
const CATEGORY_DELETE: Scope = Scope::new("category", "delete");

const ARTICLE_CREATE: Scope = Scope::new("article", "create");
const ARTICLE_LIST: Scope = Scope::new("article", "list");
const ARTICLE_GET: Scope = Scope::new("article", "get");
const ARTICLE_UPDATE: Scope = Scope::new("article", "update");
const ARTICLE_DELETE: Scope = Scope::new("article", "delete");

fn respond<T: Serialize>(status: StatusCode, scope: Scope, data: Option<T>) -> Response {
    (
        status,
        Json(ApiResponse::success(
            scope.success_message(),
            scope.translate("success"),
            data,
        )),
    )
        .into_response()
}

fn body<T>(body: Result<Json<T>, JsonRejection>, scope: Scope) -> Result<T, AppError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| AppError::new(BlogError::BadRequest(rejection.body_text()), scope))
}

fn path_id(path: Result<Path<i64>, PathRejection>, scope: Scope) -> Result<i64, AppError> {
    path.map(|Path(id)| id)
        .map_err(|rejection| AppError::new(BlogError::BadRequest(rejection.body_text()), scope))
}

/// GET /ping
pub async fn ping() -> impl IntoResponse {
    Json(ApiResponse::<()>::success(
        "Hello from GoBlog",
        "hello.from.GoBlog",
        None,
    ))
}

/// Checks credentials and replaces the user's session with a new token.
///
/// POST /api/v1/auths/login
pub async fn login<U, A, G, S, C>(
    State(state): State<AppState<U, A, G, S, C>>,
    request: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, AppError>
where
    U: Repository<User> + Clone + 'static,
    A: Repository<Article> + Clone + 'static,
    G: Repository<Category> + Clone + 'static,
    S: SessionStore + Clone + 'static,
    C: Cache + Clone + 'static,
{
    let request = body(request, AUTH_LOGIN)?;
    let action = LoginAction::new(
        state.users.store().clone(),
        state.gate.sessions().clone(),
        state.gate.jwt().clone(),
        state.hasher.clone(),
    );

    let (_, issued) = action
        .execute(&request.email, &request.password)
        .await
        .map_err(AUTH_LOGIN.err())?;

    Ok(respond(
        StatusCode::ACCEPTED,
        AUTH_LOGIN,
        Some(TokenData {
            token: issued.token,
            expires_at: issued.expires_at,
        }),
    ))
}

/// Drops the caller's session. The presented token stops working at once.
///
/// GET /api/v1/auths/logout
pub async fn logout<U, A, G, S, C>(
    State(state): State<AppState<U, A, G, S, C>>,
    user: AuthenticatedUser,
) -> Result<Response, AppError>
where
    U: Repository<User> + Clone + 'static,
    A: Repository<Article> + Clone + 'static,
    G: Repository<Category> + Clone + 'static,
    S: SessionStore + Clone + 'static,
    C: Cache + Clone + 'static,
{
    LogoutAction::new(state.gate.sessions().clone())
        .execute(user.id)
        .await
        .map_err(AUTH_LOGOUT.err())?;

    Ok(respond::<()>(StatusCode::OK, AUTH_LOGOUT, None))
}

/// POST /api/v1/users
pub async fn create_user<U, A, G, S, C>(
    State(state): State<AppState<U, A, G, S, C>>,
    actor: AuthenticatedUser,
    input: Result<Json<CreateUserInput>, JsonRejection>,
) -> Result<Response, AppError>
where
    U: Repository<User> + Clone + 'static,
    A: Repository<Article> + Clone + 'static,
    G: Repository<Category> + Clone + 'static,
    S: SessionStore + Clone + 'static,
    C: Cache + Clone + 'static,
{
    let input = body(input, USER_CREATE)?;
    let user = CreateUserAction::new(state.users, state.hasher)
        .execute(actor.id, &input)
        .await
        .map_err(USER_CREATE.err())?;

    Ok(respond(StatusCode::CREATED, USER_CREATE, Some(user)))
}

/// GET /api/v1/users
pub async fn list_users<U, A, G, S, C>(
    State(state): State<AppState<U, A, G, S, C>>,
    _actor: AuthenticatedUser,
) -> Result<Response, AppError>
where
    U: Repository<User> + Clone + 'static,
    A: Repository<Article> + Clone + 'static,
    G: Repository<Category> + Clone + 'static,
    S: SessionStore + Clone + 'static,
    C: Cache + Clone + 'static,
{
    let users = ListUsersAction::new(state.users)
        .execute()
        .await
        .map_err(USER_LIST.err())?;

    Ok(respond(StatusCode::OK, USER_LIST, Some(users)))
}

/// GET /api/v1/users/{id}
pub async fn get_user<U, A, G, S, C>(
    State(state): State<AppState<U, A, G, S, C>>,
    _actor: AuthenticatedUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Response, AppError>
where
    U: Repository<User> + Clone + 'static,
    A: Repository<Article> + Clone + 'static,
    G: Repository<Category> + Clone + 'static,
    S: SessionStore + Clone + 'static,
    C: Cache + Clone + 'static,
{
    let id = path_id(id, USER_GET)?;
    let user = GetResourceAction::new(state.users)
        .execute(id)
        .await
        .map_err(USER_GET.err())?;

    Ok(respond(StatusCode::OK, USER_GET, Some(user)))
}

/// PUT /api/v1/users/{id}
pub async fn update_user<U, A, G, S, C>(
    State(state): State<AppState<U, A, G, S, C>>,
    actor: AuthenticatedUser,
    id: Result<Path<i64>, PathRejection>,
    input: Result<Json<UpdateUserInput>, JsonRejection>,
) -> Result<Response, AppError>
where
    U: Repository<User> + Clone + 'static,
    A: Repository<Article> + Clone + 'static,
    G: Repository<Category> + Clone + 'static,
    S: SessionStore + Clone + 'static,
    C: Cache + Clone + 'static,
{
    let id = path_id(id, USER_UPDATE)?;
    let input = body(input, USER_UPDATE)?;
    let user = UpdateUserAction::new(state.users, state.gate.sessions().clone(), state.hasher)
        .execute(actor.id, id, &input)
        .await
        .map_err(USER_UPDATE.err())?;

    Ok(respond(StatusCode::OK, USER_UPDATE, Some(user)))
}

/// DELETE /api/v1/users/{id}
pub async fn delete_user<U, A, G, S, C>(
    State(state): State<AppState<U, A, G, S, C>>,
    _actor: AuthenticatedUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Response, AppError>
where
    U: Repository<User> + Clone + 'static,
    A: Repository<Article> + Clone + 'static,
    G: Repository<Category> + Clone + 'static,
    S: SessionStore + Clone + 'static,
    C: Cache + Clone + 'static,
{
    let id = path_id(id, USER_DELETE)?;
    DeleteUserAction::new(state.users, state.gate.sessions().clone())
        .execute(id)
        .await
        .map_err(USER_DELETE.err())?;

    Ok(respond::<()>(StatusCode::OK, USER_DELETE, None))
}

/// POST /api/v1/categories
pub async fn create_category<U, A, G, S, C>(
    State(state): State<AppState<U, A, G, S, C>>,
    actor: AuthenticatedUser,
    input: Result<Json<CategoryInput>, JsonRejection>,
) -> Result<Response, AppError>
where
    U: Repository<User> + Clone + 'static,
    A: Repository<Article> + Clone + 'static,
    G: Repository<Category> + Clone + 'static,
    S: SessionStore + Clone + 'static,
    C: Cache + Clone + 'static,
{
    let input = body(input, CATEGORY_CREATE)?;
    let category = CreateCategoryAction::new(state.categories)
        .execute(actor.id, &input)
        .await
        .map_err(CATEGORY_CREATE.err())?;

    Ok(respond(StatusCode::CREATED, CATEGORY_CREATE, Some(category)))
}

/// GET /api/v1/categories
pub async fn list_categories<U, A, G, S, C>(
    State(state): State<AppState<U, A, G, S, C>>,
    _actor: AuthenticatedUser,
) -> Result<Response, AppError>
where
    U: Repository<User> + Clone + 'static,
    A: Repository<Article> + Clone + 'static,
    G: Repository<Category> + Clone + 'static,
    S: SessionStore + Clone + 'static,
    C: Cache + Clone + 'static,
{
    let categories = ListCategoriesAction::new(state.categories)
        .execute()
        .await
        .map_err(CATEGORY_LIST.err())?;

    Ok(respond(StatusCode::OK, CATEGORY_LIST, Some(categories)))
}

/// GET /api/v1/categories/{id}
pub async fn get_category<U, A, G, S, C>(
    State(state): State<AppState<U, A, G, S, C>>,
    _actor: AuthenticatedUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Response, AppError>
where
    U: Repository<User> + Clone + 'static,
    A: Repository<Article> + Clone + 'static,
    G: Repository<Category> + Clone + 'static,
    S: SessionStore + Clone + 'static,
    C: Cache + Clone + 'static,
{
    let id = path_id(id, CATEGORY_GET)?;
    let category = GetResourceAction::new(state.categories)
        .execute(id)
        .await
        .map_err(CATEGORY_GET.err())?;

    Ok(respond(StatusCode::OK, CATEGORY_GET, Some(category)))
}

/// PUT /api/v1/categories/{id}
pub async fn update_category<U, A, G, S, C>(
    State(state): State<AppState<U, A, G, S, C>>,
    actor: AuthenticatedUser,
    id: Result<Path<i64>, PathRejection>,
    input: Result<Json<CategoryInput>, JsonRejection>,
) -> Result<Response, AppError>
where
    U: Repository<User> + Clone + 'static,
    A: Repository<Article> + Clone + 'static,
    G: Repository<Category> + Clone + 'static,
    S: SessionStore + Clone + 'static,
    C: Cache + Clone + 'static,
{
    let id = path_id(id, CATEGORY_UPDATE)?;
    let input = body(input, CATEGORY_UPDATE)?;
    let category = UpdateCategoryAction::new(state.categories)
        .execute(actor.id, id, &input)
        .await
        .map_err(CATEGORY_UPDATE.err())?;

    Ok(respond(StatusCode::OK, CATEGORY_UPDATE, Some(category)))
}

/// DELETE /api/v1/categories/{id}
pub async fn delete_category<U, A, G, S, C>(
    State(state): State<AppState<U, A, G, S, C>>,
    _actor: AuthenticatedUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Response, AppError>
where
    U: Repository<User> + Clone + 'static,
    A: Repository<Article> + Clone + 'static,
    G: Repository<Category> + Clone + 'static,
    S: SessionStore + Clone + 'static,
    C: Cache + Clone + 'static,
{
    let id = path_id(id, CATEGORY_DELETE)?;
    DeleteResourceAction::new(state.categories)
        .execute(id)
        .await
        .map_err(CATEGORY_DELETE.err())?;

    Ok(respond::<()>(StatusCode::OK, CATEGORY_DELETE, None))
}

/// POST /api/v1/articles
pub async fn create_article<U, A, G, S, C>(
    State(state): State<AppState<U, A, G, S, C>>,
    actor: AuthenticatedUser,
    input: Result<Json<ArticleInput>, JsonRejection>,
) -> Result<Response, AppError>
where
    U: Repository<User> + Clone + 'static,
    A: Repository<Article> + Clone + 'static,
    G: Repository<Category> + Clone + 'static,
    S: SessionStore + Clone + 'static,
    C: Cache + Clone + 'static,
{
    let input = body(input, ARTICLE_CREATE)?;
    let article = CreateArticleAction::new(state.articles)
        .execute(actor.id, &input)
        .await
        .map_err(ARTICLE_CREATE.err())?;

    Ok(respond(StatusCode::CREATED, ARTICLE_CREATE, Some(article)))
}

/// GET /api/v1/articles
pub async fn list_articles<U, A, G, S, C>(
    State(state): State<AppState<U, A, G, S, C>>,
    _actor: AuthenticatedUser,
) -> Result<Response, AppError>
where
    U: Repository<User> + Clone + 'static,
    A: Repository<Article> + Clone + 'static,
    G: Repository<Category> + Clone + 'static,
    S: SessionStore + Clone + 'static,
    C: Cache + Clone + 'static,
{
    let articles = ListArticlesAction::new(state.articles, state.categories.store().clone())
        .execute()
        .await
        .map_err(ARTICLE_LIST.err())?;

    Ok(respond(StatusCode::OK, ARTICLE_LIST, Some(articles)))
}

/// GET /api/v1/articles/{id}
pub async fn get_article<U, A, G, S, C>(
    State(state): State<AppState<U, A, G, S, C>>,
    _actor: AuthenticatedUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Response, AppError>
where
    U: Repository<User> + Clone + 'static,
    A: Repository<Article> + Clone + 'static,
    G: Repository<Category> + Clone + 'static,
    S: SessionStore + Clone + 'static,
    C: Cache + Clone + 'static,
{
    let id = path_id(id, ARTICLE_GET)?;
    let article = GetResourceAction::new(state.articles)
        .execute(id)
        .await
        .map_err(ARTICLE_GET.err())?;

    Ok(respond(StatusCode::OK, ARTICLE_GET, Some(article)))
}

/// PUT /api/v1/articles/{id}
pub async fn update_article<U, A, G, S, C>(
    State(state): State<AppState<U, A, G, S, C>>,
    actor: AuthenticatedUser,
    id: Result<Path<i64>, PathRejection>,
    input: Result<Json<ArticleInput>, JsonRejection>,
) -> Result<Response, AppError>
where
    U: Repository<User> + Clone + 'static,
    A: Repository<Article> + Clone + 'static,
    G: Repository<Category> + Clone + 'static,
    S: SessionStore + Clone + 'static,
    C: Cache + Clone + 'static,
{
    let id = path_id(id, ARTICLE_UPDATE)?;
    let input = body(input, ARTICLE_UPDATE)?;
    let article = UpdateArticleAction::new(state.articles)
        .execute(actor.id, id, &input)
        .await
        .map_err(ARTICLE_UPDATE.err())?;

    Ok(respond(StatusCode::OK, ARTICLE_UPDATE, Some(article)))
}

/// DELETE /api/v1/articles/{id}
pub async fn delete_article<U, A, G, S, C>(
    State(state): State<AppState<U, A, G, S, C>>,
    _actor: AuthenticatedUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Response, AppError>
where
    U: Repository<User> + Clone + 'static,
    A: Repository<Article> + Clone + 'static,
    G: Repository<Category> + Clone + 'static,
    S: SessionStore + Clone + 'static,
    C: Cache + Clone + 'static,
{
    let id = path_id(id, ARTICLE_DELETE)?;
    DeleteResourceAction::new(state.articles)
        .execute(id)
        .await
        .map_err(ARTICLE_DELETE.err())?;

    Ok(respond::<()>(StatusCode::OK, ARTICLE_DELETE, None))
}
