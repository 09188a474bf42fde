//! Business operations, one action struct per operation.
//!
//! Actions own cheap clones of their dependencies and expose a single
//! `execute`. Reads and writes of resources go through
//! [`CachedRepository`](crate::CachedRepository), so caching and invalidation
//! are applied uniformly.

mod articles;
mod categories;
mod login;
mod logout;
mod resource;
mod users;

pub use articles::{
    ARTICLES_PER_CATEGORY, ArticleInput, CreateArticleAction, ListArticlesAction,
    UpdateArticleAction,
};
pub use categories::{CategoryInput, CreateCategoryAction, ListCategoriesAction, UpdateCategoryAction};
pub use login::LoginAction;
pub use logout::LogoutAction;
pub use resource::{DeleteResourceAction, GetResourceAction};
pub use users::{
    CreateUserAction, CreateUserInput, DeleteUserAction, ListUsersAction, UpdateUserAction,
    UpdateUserInput,
};
