use serde::Deserialize;

use crate::repository::{Direction, Op, category_columns};
use crate::validators::validate_name;
use crate::{
    BlogError, Cache, CachedRepository, Category, CategoryChanges, Filter, NewCategory, Repository,
    ResourceKind,
};

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryInput {
    pub name: String,
}

async fn checked_name<G: Repository<Category>>(
    categories: &G,
    name: &str,
    except: Option<i64>,
) -> Result<String, BlogError> {
    let name = name.trim().to_lowercase();
    validate_name(&name)?;

    let mut filter = Filter::new().eq(category_columns::NAME, name.as_str());
    if let Some(id) = except {
        filter = filter.with(category_columns::ID, Op::Ne, id);
    }
    if categories.find_one(&filter).await?.is_some() {
        return Err(BlogError::AlreadyExists(ResourceKind::Category));
    }

    Ok(name)
}

pub struct CreateCategoryAction<G, C> {
    categories: CachedRepository<Category, G, C>,
}

impl<G: Repository<Category>, C: Cache> CreateCategoryAction<G, C> {
    pub fn new(categories: CachedRepository<Category, G, C>) -> Self {
        CreateCategoryAction { categories }
    }

    #[tracing::instrument(name = "create_category", skip_all, fields(actor = actor), err)]
    pub async fn execute(&self, actor: i64, input: &CategoryInput) -> Result<Category, BlogError> {
        let name = checked_name(self.categories.store(), &input.name, None).await?;
        self.categories
            .create(&NewCategory {
                name,
                created_by: actor,
            })
            .await
    }
}

pub struct UpdateCategoryAction<G, C> {
    categories: CachedRepository<Category, G, C>,
}

impl<G: Repository<Category>, C: Cache> UpdateCategoryAction<G, C> {
    pub fn new(categories: CachedRepository<Category, G, C>) -> Self {
        UpdateCategoryAction { categories }
    }

    #[tracing::instrument(name = "update_category", skip_all, fields(actor = actor, category_id = id), err)]
    pub async fn execute(
        &self,
        actor: i64,
        id: i64,
        input: &CategoryInput,
    ) -> Result<Category, BlogError> {
        let name = checked_name(self.categories.store(), &input.name, Some(id)).await?;
        self.categories
            .update(
                id,
                &CategoryChanges {
                    name,
                    updated_by: actor,
                },
            )
            .await
    }
}

pub struct ListCategoriesAction<G, C> {
    categories: CachedRepository<Category, G, C>,
}

impl<G: Repository<Category>, C: Cache> ListCategoriesAction<G, C> {
    pub fn new(categories: CachedRepository<Category, G, C>) -> Self {
        ListCategoriesAction { categories }
    }

    #[tracing::instrument(name = "list_categories", skip_all, err)]
    pub async fn execute(&self) -> Result<Vec<Category>, BlogError> {
        let filter = Filter::new().order_by(category_columns::ID, Direction::Asc);
        let store = self.categories.store();
        self.categories.list_with(|| store.list(&filter)).await
    }
}
