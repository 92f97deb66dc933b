//! Integration tests for the scraper
//!
//! These tests use wiremock to serve a small recipe site and run the full
//! discovery, scrape and statistics cycle end-to-end against an on-disk
//! database.

use recipe_harvest::config::load_config_with_hash;
use recipe_harvest::crawler::run_scrape;
use recipe_harvest::output::{compute_statistics, export_summary};
use recipe_harvest::storage::{open_store, RecipeStore, RunStatus};
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Writes a configuration file pointing at the mock server
fn write_config(dir: &Path, base_url: &str) -> std::path::PathBuf {
    let config = format!(
        r#"
[site]
base-url = "{base_url}"
categories-path = "/categories"
main-category = "Desserts"

[user-agent]
crawler-name = "TestBot"
crawler-version = "1.0.0"
contact-url = "https://example.com/contact"
contact-email = "test@example.com"

[fetcher]
timeout-secs = 5
max-attempts = 2
retry-delay-ms = 10
request-delay-ms = 0

[database]
path = "{db}"

[output]
summary-path = "{summary}"
"#,
        db = dir.join("recipes.db").display(),
        summary = dir.join("statistics.md").display(),
    );

    let config_path = dir.join("recipe-harvest.toml");
    std::fs::write(&config_path, config).expect("Failed to write config");
    config_path
}

async fn mount_html(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

fn recipe_page(
    slug: &str,
    name: &str,
    author: &str,
    ingredients: &[&str],
    steps: &[&str],
    portion: &str,
) -> String {
    let ingredients: String = ingredients
        .iter()
        .map(|i| format!(r#"<div class="ingredient-item">{i}</div>"#))
        .collect();
    let steps: String = steps
        .iter()
        .map(|s| format!(r#"<div class="cooking-stage"><span>Step</span><p>{s}</p></div>"#))
        .collect();

    format!(
        r#"<html><head><link rel="canonical" href="/recipe/{slug}"></head><body>
        <div class="recipe-title">{name}</div>
        <div class="recipe-image"><img src="/img/{slug}.jpg"></div>
        <div class="recipe-description">A {name} recipe.</div>
        <div class="recipe-author">by <a href="/authors/x">{author}</a></div>
        <div class="recipe-portion"><span class="portion-value">{portion}</span></div>
        {ingredients}
        {steps}
        </body></html>"#
    )
}

/// Mounts categories, one main category with two subcategories, and recipes
async fn mount_site(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /drafts/\n"))
        .mount(server)
        .await;

    mount_html(
        server,
        "/categories",
        r#"<html><body><div class="recipe-categories">
            <a class="recipe-categories__item" href="/c/soups"><div class="recipe-categories__text">Soups</div></a>
            <a class="recipe-categories__item" href="/c/desserts"><div class="recipe-categories__text">Desserts</div></a>
        </div></body></html>"#
            .to_string(),
    )
    .await;

    mount_html(
        server,
        "/c/desserts",
        r#"<html><body><div class="recipe-categories">
            <a class="recipe-categories__item" href="/c/desserts/cakes"><div class="recipe-categories__text">Cakes</div></a>
            <a class="recipe-categories__item" href="/c/desserts/pies"><div class="recipe-categories__text">Pies</div></a>
        </div></body></html>"#
            .to_string(),
    )
    .await;

    mount_html(
        server,
        "/c/desserts/cakes",
        r#"<html><body><div class="recipe-list">
            <a class="recipe-list__link" href="/recipe/chocolate-cake">Chocolate cake</a>
            <a class="recipe-list__link" href="/recipe/chocolate-cake?utm_source=list">Chocolate cake</a>
            <a class="recipe-list__link" href="/recipe/sponge">Sponge</a>
        </div></body></html>"#
            .to_string(),
    )
    .await;

    mount_html(
        server,
        "/c/desserts/pies",
        r#"<html><body><div class="recipe-list">
            <a class="recipe-list__link" href="/recipe/apple-pie">Apple pie</a>
            <a class="recipe-list__link" href="/recipe/missing">Missing</a>
            <a class="recipe-list__link" href="/drafts/secret-pie">Secret</a>
        </div></body></html>"#
            .to_string(),
    )
    .await;

    mount_html(
        server,
        "/recipe/chocolate-cake",
        recipe_page(
            "chocolate-cake",
            "Chocolate Cake",
            "Anna",
            &["flour", "sugar", "cocoa", "eggs", "butter"],
            &["Mix.", "Bake.", "Cool."],
            "8 servings",
        ),
    )
    .await;

    mount_html(
        server,
        "/recipe/sponge",
        recipe_page(
            "sponge",
            "Sponge",
            "Anna",
            &["flour", "sugar", "eggs", "milk", "butter", "vanilla", "salt"],
            &["Whisk.", "Fold.", "Bake.", "Cool.", "Slice."],
            "servings",
        ),
    )
    .await;

    mount_html(
        server,
        "/recipe/apple-pie",
        recipe_page(
            "apple-pie",
            "Apple Pie",
            "Bob",
            &["apples", "flour", "butter", "sugar", "cinnamon", "lemon"],
            &["Roll.", "Fill.", "Bake.", "Serve."],
            "6 servings",
        ),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/recipe/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/drafts/secret-pie"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_scrape_and_statistics() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_site(&mock_server).await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = write_config(dir.path(), &base_url);
    let (config, hash) = load_config_with_hash(&config_path).expect("Failed to load config");
    let db_path = config.database.path.clone();
    let summary_path = config.output.summary_path.clone();

    let report = run_scrape(config, &hash).await.expect("Scrape failed");

    assert_eq!(report.discovered, 5);
    assert_eq!(report.saved, 3);
    assert_eq!(report.fetch_failures, 1);
    assert_eq!(report.skipped_robots, 1);
    assert_eq!(report.parse_failures, 0);

    let store = open_store(Path::new(&db_path)).expect("Failed to open store");
    assert_eq!(store.count().unwrap(), 3);

    let cake = store
        .get(&format!("{}/recipe/chocolate-cake", base_url))
        .unwrap()
        .expect("Cake should be stored");
    assert_eq!(cake.name, "Chocolate Cake");
    assert_eq!(cake.category.as_deref(), Some("Desserts"));
    assert_eq!(cake.subcategory.as_deref(), Some("Cakes"));
    assert_eq!(cake.author.as_deref(), Some("Anna"));
    assert_eq!(cake.description.as_deref(), Some("A Chocolate Cake recipe."));
    assert_eq!(
        cake.image_url.as_deref(),
        Some(format!("{}/img/chocolate-cake.jpg", base_url).as_str())
    );
    assert_eq!(cake.ingredients.len(), 5);
    assert_eq!(cake.steps, vec!["Mix.", "Bake.", "Cool."]);
    assert_eq!(cake.portion.as_deref(), Some("8 servings"));

    let sponge = store
        .get(&format!("{}/recipe/sponge", base_url))
        .unwrap()
        .expect("Sponge should be stored");
    assert_eq!(sponge.portion.as_deref(), Some("1 servings"));

    let run = store.latest_run().unwrap().expect("Run should be recorded");
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(run.recipes_saved, 3);
    assert_eq!(run.failures, 2);
    assert_eq!(run.config_hash, hash);

    let stats = compute_statistics(&store).unwrap();
    assert_eq!(stats.total_recipes, 3);
    assert_eq!(stats.avg_ingredients, 6.0);
    assert_eq!(stats.avg_steps, 4.0);
    assert_eq!(stats.top_author, Some(("Anna".to_string(), 2)));
    assert_eq!(stats.largest_portion.as_ref().map(|p| p.portions), Some(8));
    assert_eq!(stats.recipes_by_subcategory.get("Cakes"), Some(&2));
    assert_eq!(stats.recipes_by_subcategory.get("Pies"), Some(&1));

    let exported = export_summary(&store, Path::new(&summary_path)).unwrap();
    assert_eq!(exported, stats);
    let markdown = std::fs::read_to_string(&summary_path).unwrap();
    assert!(markdown.contains("- **Total Recipes**: 3"));
    assert!(markdown.contains("- **Status**: completed"));

    store.close().unwrap();
}

#[tokio::test]
async fn test_rescrape_overwrites_instead_of_duplicating() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<div class="recipe-categories">
                <a class="recipe-categories__item" href="/c/desserts"><div class="recipe-categories__text">Desserts</div></a>
            </div>"#,
        ))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/c/desserts"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<div class="recipe-list"><a class="recipe-list__link" href="/recipe/tart">Tart</a></div>"#,
        ))
        .mount(&mock_server)
        .await;

    // First scrape sees the old description, the second the new one
    Mock::given(method("GET"))
        .and(path("/recipe/tart"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<div class="recipe-title">Tart</div><div class="recipe-description">Old</div>"#,
        ))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/recipe/tart"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<div class="recipe-title">Tart</div><div class="recipe-description">New</div>"#,
        ))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = write_config(dir.path(), &base_url);

    for _ in 0..2 {
        let (config, hash) = load_config_with_hash(&config_path).unwrap();
        let report = run_scrape(config, &hash).await.unwrap();
        assert_eq!(report.saved, 1);
    }

    let (config, _) = load_config_with_hash(&config_path).unwrap();
    let store = open_store(Path::new(&config.database.path)).unwrap();

    let recipes: Vec<_> = store.all().unwrap().collect::<Result<_, _>>().unwrap();
    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0].description.as_deref(), Some("New"));
    assert_eq!(recipes[0].url, format!("{}/recipe/tart", base_url));
}

#[tokio::test]
async fn test_missing_main_category_fails_run() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<div class="recipe-categories">
                <a class="recipe-categories__item" href="/c/soups"><div class="recipe-categories__text">Soups</div></a>
            </div>"#,
        ))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = write_config(dir.path(), &mock_server.uri());
    let (config, hash) = load_config_with_hash(&config_path).unwrap();
    let db_path = config.database.path.clone();

    let result = run_scrape(config, &hash).await;
    assert!(result.is_err());

    let store = open_store(Path::new(&db_path)).unwrap();
    let run = store.latest_run().unwrap().unwrap();
    assert_eq!(run.status, RunStatus::Failed);
    assert_eq!(store.count().unwrap(), 0);
}
