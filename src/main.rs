use std::env;
use std::time::Duration;

use pepe_nero::{
    normalize, AppConfig, CatalogClient, Cookbook, FileStore, Recipe, RecipeError, RecipeStore,
    UserRecipe, UserRecipeDraft,
};

const USAGE: &str = "\
Usage: pepe-nero <command> [args]

Commands:
  categories                 list the catalog categories
  list [category]            load recipes (localized category label)
  search <text>              load recipes and filter them by name
  show <id>                  show one recipe in full
  favorites                  list the saved favorites
  toggle <id>                add or remove a favorite
  mine                       list your own recipes
  mine-add <name> <category> <ingredients> <steps> [prep] [difficulty]
  mine-remove <id>           delete one of your own recipes";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = AppConfig::load()?;
    let timeout = Some(Duration::from_secs(config.timeout));

    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(String::as_str).ok_or(USAGE)?;

    match command {
        "categories" => {
            let catalog = CatalogClient::with_base_url(&config.base_url, timeout);
            for name in catalog.list_categories().await? {
                println!("{} ({})", normalize::localized_category(&name), name);
            }
        }
        "list" => {
            let store = store_from(&config);
            match args.get(2) {
                Some(label) => store.set_category(label).await?,
                None => store.load_recipes(None).await?,
            }
            print_recipes(&store.filtered_recipes());
        }
        "search" => {
            let text = args.get(2).ok_or(USAGE)?;
            let store = store_from(&config);
            store.load_recipes(None).await?;
            store.set_search_query(text);
            print_recipes(&store.filtered_recipes());
        }
        "show" => {
            let id = args.get(2).ok_or(USAGE)?;
            let store = store_from(&config);
            match store.recipe_detail(id).await {
                Ok(detail) => {
                    println!("{} — {} ({})", detail.name, detail.category, detail.area);
                    println!("\nIngrédients:");
                    for item in &detail.ingredients {
                        println!("  - {} {}", item.measure, item.ingredient);
                    }
                    println!("\nPréparation:");
                    for (index, step) in detail.instructions.iter().enumerate() {
                        println!("  {}. {step}", index + 1);
                    }
                    if let Some(video) = &detail.video {
                        println!("\nVidéo: {video}");
                    }
                }
                Err(RecipeError::NotFound(_)) => println!("Recette non trouvée"),
                Err(err) => return Err(err.into()),
            }
        }
        "favorites" => {
            let store = store_from(&config);
            store.load_favorites().await?;
            print_recipes(&store.snapshot().favorites);
        }
        "toggle" => {
            let id = args.get(2).ok_or(USAGE)?;
            let catalog = CatalogClient::with_base_url(&config.base_url, timeout);
            let raw = catalog
                .lookup(id)
                .await?
                .ok_or_else(|| RecipeError::NotFound(id.to_string()))?;
            let recipe = normalize::summarize(&raw);

            let store = store_from(&config);
            store.load_favorites().await?;
            store.toggle_favorite(&recipe).await?;
            if store.is_favorite(id) {
                println!("Ajouté aux favoris: {}", recipe.name);
            } else {
                println!("Retiré des favoris: {}", recipe.name);
            }
        }
        "mine" => {
            let cookbook = Cookbook::new(FileStore::new(&config.data_dir));
            for recipe in cookbook.list().await? {
                print_user_recipe(&recipe);
            }
        }
        "mine-add" => {
            let required: Vec<&String> = args.get(2..6).ok_or(USAGE)?.iter().collect();
            let cookbook = Cookbook::new(FileStore::new(&config.data_dir));
            let stored = cookbook
                .add(UserRecipeDraft {
                    name: required[0].clone(),
                    category: required[1].clone(),
                    ingredients: required[2].clone(),
                    steps: required[3].clone(),
                    preparation_time: args.get(6).cloned().unwrap_or_default(),
                    difficulty: args.get(7).cloned().unwrap_or_default(),
                })
                .await?;
            println!("Recette ajoutée ({})", stored.id);
        }
        "mine-remove" => {
            let id = args.get(2).ok_or(USAGE)?;
            let cookbook = Cookbook::new(FileStore::new(&config.data_dir));
            if cookbook.remove(id).await? {
                println!("Recette supprimée");
            } else {
                println!("Recette non trouvée");
            }
        }
        _ => return Err(USAGE.into()),
    }

    Ok(())
}

fn store_from(config: &AppConfig) -> RecipeStore<FileStore> {
    let catalog = CatalogClient::with_base_url(
        &config.base_url,
        Some(Duration::from_secs(config.timeout)),
    );
    RecipeStore::new(catalog, FileStore::new(&config.data_dir), &config.default_area)
}

fn print_recipes(recipes: &[Recipe]) {
    for recipe in recipes {
        println!(
            "{}  {} — {} min, {}, {}",
            recipe.id, recipe.name, recipe.preparation_time, recipe.difficulty, recipe.category
        );
    }
    println!("{} résultats", recipes.len());
}

fn print_user_recipe(recipe: &UserRecipe) {
    println!("{}  {} — {}", recipe.id, recipe.name, recipe.category);
}
