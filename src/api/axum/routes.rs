use axum::Router;
use axum::routing::{get, post};

use super::handlers;
use crate::{
    Argon2Hasher, Article, Cache, CachedRepository, Category, Repository, SessionGate,
    SessionStore, User,
};

/// Shared state of every route: the three cached resource repositories, the
/// session gate and the password hasher.
#[derive(Clone)]
pub struct AppState<U, A, G, S, C> {
    pub users: CachedRepository<User, U, C>,
    pub articles: CachedRepository<Article, A, C>,
    pub categories: CachedRepository<Category, G, C>,
    pub gate: SessionGate<S>,
    pub hasher: Argon2Hasher,
}

impl<U, A, G, S, C> AppState<U, A, G, S, C>
where
    U: Repository<User> + Clone + 'static,
    A: Repository<Article> + Clone + 'static,
    G: Repository<Category> + Clone + 'static,
    S: SessionStore + Clone + 'static,
    C: Cache + Clone + 'static,
{
    /// Wraps the three stores with one shared cache.
    pub fn new(
        users: U,
        articles: A,
        categories: G,
        cache: C,
        ttl: std::time::Duration,
        gate: SessionGate<S>,
        hasher: Argon2Hasher,
    ) -> Self {
        Self {
            users: CachedRepository::new(users, cache.clone(), ttl),
            articles: CachedRepository::new(articles, cache.clone(), ttl),
            categories: CachedRepository::new(categories, cache, ttl),
            gate,
            hasher,
        }
    }
}

/// The complete application: `/ping` plus everything under `/api/v1`.
pub fn router<U, A, G, S, C>(state: AppState<U, A, G, S, C>) -> Router
where
    U: Repository<User> + Clone + 'static,
    A: Repository<Article> + Clone + 'static,
    G: Repository<Category> + Clone + 'static,
    S: SessionStore + Clone + 'static,
    C: Cache + Clone + 'static,
{
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest(
            "/api/v1",
            Router::new()
                .nest("/auths", auth_routes::<U, A, G, S, C>())
                .merge(resource_routes::<U, A, G, S, C>()),
        )
        .with_state(state)
}

/// `POST /login` is public, `GET /logout` requires a session.
pub fn auth_routes<U, A, G, S, C>() -> Router<AppState<U, A, G, S, C>>
where
    U: Repository<User> + Clone + 'static,
    A: Repository<Article> + Clone + 'static,
    G: Repository<Category> + Clone + 'static,
    S: SessionStore + Clone + 'static,
    C: Cache + Clone + 'static,
{
    Router::new()
        .route("/login", post(handlers::login::<U, A, G, S, C>))
        .route("/logout", get(handlers::logout::<U, A, G, S, C>))
}

/// CRUD routes for users, categories and articles. All of them require a
/// session.
pub fn resource_routes<U, A, G, S, C>() -> Router<AppState<U, A, G, S, C>>
where
    U: Repository<User> + Clone + 'static,
    A: Repository<Article> + Clone + 'static,
    G: Repository<Category> + Clone + 'static,
    S: SessionStore + Clone + 'static,
    C: Cache + Clone + 'static,
{
    Router::new()
        .route(
            "/users",
            get(handlers::list_users::<U, A, G, S, C>).post(handlers::create_user::<U, A, G, S, C>),
        )
        .route(
            "/users/{id}",
            get(handlers::get_user::<U, A, G, S, C>)
                .put(handlers::update_user::<U, A, G, S, C>)
                .delete(handlers::delete_user::<U, A, G, S, C>),
        )
        .route(
            "/categories",
            get(handlers::list_categories::<U, A, G, S, C>)
                .post(handlers::create_category::<U, A, G, S, C>),
        )
        .route(
            "/categories/{id}",
            get(handlers::get_category::<U, A, G, S, C>)
                .put(handlers::update_category::<U, A, G, S, C>)
                .delete(handlers::delete_category::<U, A, G, S, C>),
        )
        .route(
            "/articles",
            get(handlers::list_articles::<U, A, G, S, C>)
                .post(handlers::create_article::<U, A, G, S, C>),
        )
        .route(
            "/articles/{id}",
            get(handlers::get_article::<U, A, G, S, C>)
                .put(handlers::update_article::<U, A, G, S, C>)
                .delete(handlers::delete_article::<U, A, G, S, C>),
        )
}
