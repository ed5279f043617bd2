//! Storefront demo binary
//!
//! Restores the cart from disk and walks through one shopping session:
//! open a product, swipe, reserve a size until it runs out, build the
//! checkout link and swipe the viewer away.

use std::sync::Arc;
use std::time::Duration;
use storefront::carousel::{CarouselAction, Point};
use storefront::{
    bootstrap, CartPanelView, Catalog, Config, FileKeyValueStore, StorefrontAction,
    StorefrontStore, ViewerView,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let catalog = match &config.catalog_path {
        Some(path) => Catalog::load(path)?,
        None => Catalog::builtin(),
    };
    tracing::info!(
        storage_dir = %config.storage.dir.display(),
        cart_key = %config.storage.cart_key,
        "Configuration loaded"
    );

    let storage = Arc::new(FileKeyValueStore::new(config.storage.dir.clone()));
    let store = bootstrap(&config, catalog, storage);

    println!("=== Storefront session ===\n");
    print_cart(&store).await;

    store
        .send(StorefrontAction::Carousel(CarouselAction::ViewportResized {
            width: config.carousel.fallback_viewport_width,
        }))
        .await?;

    println!("\n>>> Open FK-01");
    store
        .send(StorefrontAction::OpenProduct {
            product: "FK-01".into(),
        })
        .await?;
    print_viewer(&store).await;

    println!("\n>>> Swipe left");
    let mut handle = drag(&store, Point::new(300.0, 400.0), Point::new(80.0, 410.0)).await?;
    print_viewer(&store).await;
    handle.wait().await;
    println!("--- settled");
    print_viewer(&store).await;

    println!("\n>>> Select XL and add to cart twice");
    store
        .send(StorefrontAction::SelectSize {
            size: "XL".to_string(),
        })
        .await?;
    for _ in 0..2 {
        let mut handle = store.send(StorefrontAction::AddToCart).await?;
        handle.wait().await;
    }
    if let Some(error) = store.state(|s| s.cart.last_error.clone()).await {
        println!("Rejected: {error}");
    }
    print_viewer(&store).await;
    print_cart(&store).await;

    println!("\n>>> Swipe down");
    drag(&store, Point::new(200.0, 200.0), Point::new(205.0, 380.0)).await?;
    let open = store.state(|s| s.carousel.is_open()).await;
    println!("Viewer open: {open}");

    store.shutdown(Duration::from_secs(1)).await?;
    println!("\n=== Session complete ===");
    Ok(())
}

/// Presses at `from`, moves to `to` and releases
async fn drag(
    store: &StorefrontStore,
    from: Point,
    to: Point,
) -> Result<vitrine_runtime::EffectHandle, vitrine_runtime::StoreError> {
    store
        .send(StorefrontAction::Carousel(CarouselAction::PointerDown { point: from }))
        .await?;
    store
        .send(StorefrontAction::Carousel(CarouselAction::PointerMove { point: to }))
        .await?;
    store
        .send(StorefrontAction::Carousel(CarouselAction::PointerUp))
        .await
}

async fn print_viewer(store: &StorefrontStore) {
    let env = store.environment();
    let Some(view) = store.state(|s| ViewerView::derive(s, env)).await else {
        println!("(viewer closed)");
        return;
    };

    let current = view.dots.iter().position(|d| d.active).unwrap_or_default();
    println!("{}", view.header);
    println!(
        "  image {}/{}  track {}{}",
        current + 1,
        view.dots.len(),
        view.track.css(),
        if view.track.animated { " (animating)" } else { "" }
    );
    let sizes: Vec<String> = view
        .sizes
        .iter()
        .map(|s| {
            let marker = if s.selected { "*" } else { "" };
            match s.hint {
                Some(hint) => format!("{}{marker} [{hint}]", s.size),
                None => format!("{}{marker} ({})", s.size, s.remaining),
            }
        })
        .collect();
    println!("  sizes: {}", sizes.join("  "));
    match view.add_to_cart.hint {
        Some(hint) => println!("  add to cart: disabled ({hint})"),
        None => println!("  add to cart: enabled"),
    }
}

async fn print_cart(store: &StorefrontStore) {
    let env = store.environment();
    let panel = store.state(|s| CartPanelView::derive(s, env)).await;

    println!("Cart ({})", panel.badge);
    for line in &panel.lines {
        let hint = line.stock_hint.as_deref().unwrap_or_default();
        println!("  {} / {} x{}  {hint}", line.label, line.size, line.quantity);
    }
    if let Some(link) = panel.checkout_link {
        println!("  checkout: {link}");
    }
}
