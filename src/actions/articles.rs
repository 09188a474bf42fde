use serde::Deserialize;

use crate::repository::{Direction, article_columns, category_columns};
use crate::validators::{normalize_tags, validate_content, validate_title};
use crate::{
    Article, ArticleChanges, BlogError, Cache, CachedRepository, Category, Filter, NewArticle,
    Repository,
};

/// Newest articles kept per category in the article listing.
pub const ARTICLES_PER_CATEGORY: i64 = 20;

#[derive(Debug, Clone, Deserialize)]
pub struct ArticleInput {
    pub category_id: i64,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl ArticleInput {
    fn validate(&self) -> Result<(), BlogError> {
        validate_title(&self.title)?;
        validate_content(&self.content)?;
        Ok(())
    }

    fn tags(&self) -> Option<String> {
        self.tags
            .as_deref()
            .map(normalize_tags)
            .filter(|tags| !tags.is_empty())
    }
}

pub struct CreateArticleAction<A, C> {
    articles: CachedRepository<Article, A, C>,
}

impl<A: Repository<Article>, C: Cache> CreateArticleAction<A, C> {
    pub fn new(articles: CachedRepository<Article, A, C>) -> Self {
        CreateArticleAction { articles }
    }

    /// Creates an article authored by `actor`.
    #[tracing::instrument(name = "create_article", skip_all, fields(actor = actor), err)]
    pub async fn execute(&self, actor: i64, input: &ArticleInput) -> Result<Article, BlogError> {
        input.validate()?;

        self.articles
            .create(&NewArticle {
                user_id: actor,
                category_id: input.category_id,
                title: input.title.trim().to_owned(),
                content: input.content.clone(),
                tags: input.tags(),
                description: input.description.clone(),
                image: input.image.clone(),
                created_by: actor,
            })
            .await
    }
}

pub struct UpdateArticleAction<A, C> {
    articles: CachedRepository<Article, A, C>,
}

impl<A: Repository<Article>, C: Cache> UpdateArticleAction<A, C> {
    pub fn new(articles: CachedRepository<Article, A, C>) -> Self {
        UpdateArticleAction { articles }
    }

    /// Replaces the article's editable fields. The author stays the same;
    /// `actor` is recorded as the editor.
    #[tracing::instrument(name = "update_article", skip_all, fields(actor = actor, article_id = id), err)]
    pub async fn execute(
        &self,
        actor: i64,
        id: i64,
        input: &ArticleInput,
    ) -> Result<Article, BlogError> {
        input.validate()?;

        self.articles
            .update(
                id,
                &ArticleChanges {
                    category_id: input.category_id,
                    title: input.title.trim().to_owned(),
                    content: input.content.clone(),
                    tags: input.tags(),
                    description: input.description.clone(),
                    image: input.image.clone(),
                    updated_by: actor,
                },
            )
            .await
    }
}

/// The article listing: for every category with articles, its
/// [`ARTICLES_PER_CATEGORY`] newest articles, categories in id order.
/// Cached as one `articleList` entry.
pub struct ListArticlesAction<A, G, C> {
    articles: CachedRepository<Article, A, C>,
    categories: G,
}

impl<A, G, C> ListArticlesAction<A, G, C>
where
    A: Repository<Article>,
    G: Repository<Category>,
    C: Cache,
{
    pub fn new(articles: CachedRepository<Article, A, C>, categories: G) -> Self {
        ListArticlesAction {
            articles,
            categories,
        }
    }

    #[tracing::instrument(name = "list_articles", skip_all, err)]
    pub async fn execute(&self) -> Result<Vec<Article>, BlogError> {
        let store = self.articles.store();
        let categories = &self.categories;

        self.articles
            .list_with(|| async move {
                let by_id = Filter::new().order_by(category_columns::ID, Direction::Asc);
                let mut grouped = Vec::new();

                for category in categories.list(&by_id).await? {
                    let newest = Filter::new()
                        .eq(article_columns::CATEGORY_ID, category.id)
                        .order_by(article_columns::ID, Direction::Desc)
                        .limit(ARTICLES_PER_CATEGORY);
                    grouped.extend(store.list(&newest).await?);
                }

                Ok(grouped)
            })
            .await
    }
}
