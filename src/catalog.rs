use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

use crate::error::RecipeError;

/// TheMealDB free-tier API root.
pub const DEFAULT_BASE_URL: &str = "https://www.themealdb.com/api/json/v1/1";

/// Read-only client for the external recipe catalog.
pub struct CatalogClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct CategoriesResponse {
    #[serde(default)]
    categories: Option<Vec<CategoryEntry>>,
}

#[derive(Debug, Deserialize)]
struct CategoryEntry {
    #[serde(rename = "strCategory")]
    name: String,
}

/// The catalog answers `{"meals": null}` for empty result sets.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct MealsResponse<T> {
    #[serde(default)]
    meals: Option<Vec<T>>,
}

/// A meal reference from a filter listing; only the id is needed.
#[derive(Debug, Clone, Deserialize)]
pub struct MealRef {
    #[serde(rename = "idMeal")]
    pub id: String,
}

/// One raw catalog record as returned by `lookup.php`. The named
/// columns are typed; the numbered `strIngredientN`/`strMeasureN`
/// columns stay in the flattened map and are read by slot number.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMeal {
    #[serde(rename = "idMeal")]
    pub id: String,
    #[serde(rename = "strMeal")]
    pub name: String,
    #[serde(rename = "strMealThumb", default)]
    pub thumbnail: Option<String>,
    #[serde(rename = "strInstructions", default)]
    pub instructions: Option<String>,
    #[serde(rename = "strCategory", default)]
    pub category: Option<String>,
    #[serde(rename = "strArea", default)]
    pub area: Option<String>,
    #[serde(rename = "strYoutube", default)]
    pub youtube: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl RawMeal {
    fn text_field(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }

    /// Ingredient column for `slot` (1-based), if present and non-null.
    pub fn ingredient(&self, slot: usize) -> Option<&str> {
        self.text_field(&format!("strIngredient{slot}"))
    }

    /// Measure column for `slot` (1-based), if present and non-null.
    pub fn measure(&self, slot: usize) -> Option<&str> {
        self.text_field(&format!("strMeasure{slot}"))
    }
}

impl CatalogClient {
    /// Client against the public catalog.
    pub fn new(timeout: Option<Duration>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, timeout)
    }

    /// Client against an arbitrary base URL, e.g. a mock server.
    pub fn with_base_url(base_url: impl Into<String>, timeout: Option<Duration>) -> Self {
        let timeout = timeout.unwrap_or(Duration::from_secs(30));
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pepe-nero/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path_and_query: &str) -> Result<T, RecipeError> {
        let url = format!("{}/{}", self.base_url, path_and_query);
        debug!("GET {url}");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RecipeError::HttpStatus(status.as_u16()));
        }

        Ok(response.json().await?)
    }

    /// Source category names from `categories.php`. A body without the
    /// `categories` array counts as an empty listing.
    pub async fn list_categories(&self) -> Result<Vec<String>, RecipeError> {
        let body: CategoriesResponse = self.get_json("categories.php").await?;
        Ok(body
            .categories
            .unwrap_or_default()
            .into_iter()
            .map(|entry| entry.name)
            .collect())
    }

    /// Meal ids for a source category.
    pub async fn filter_by_category(&self, category: &str) -> Result<Vec<MealRef>, RecipeError> {
        let body: MealsResponse<MealRef> =
            self.get_json(&format!("filter.php?c={category}")).await?;
        Ok(body.meals.unwrap_or_default())
    }

    /// Meal ids for a cuisine area.
    pub async fn filter_by_area(&self, area: &str) -> Result<Vec<MealRef>, RecipeError> {
        let body: MealsResponse<MealRef> = self.get_json(&format!("filter.php?a={area}")).await?;
        Ok(body.meals.unwrap_or_default())
    }

    /// Full record for one meal id, `None` when the catalog has no
    /// entry for it.
    pub async fn lookup(&self, id: &str) -> Result<Option<RawMeal>, RecipeError> {
        let body: MealsResponse<RawMeal> = self.get_json(&format!("lookup.php?i={id}")).await?;
        Ok(body.meals.unwrap_or_default().into_iter().next())
    }
}
