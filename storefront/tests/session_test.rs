//! End-to-end storefront sessions driven through the real `Store`.
//!
//! Settle delays are shortened through configuration so the deferred
//! callbacks run in test time.

use std::sync::Arc;
use storefront::carousel::{CarouselAction, GesturePhase, Point};
use storefront::{
    bootstrap, CartPanelView, Catalog, Config, Faction, Product, ProductCode, SizeStock,
    StorefrontAction, StorefrontError, StorefrontStore, ViewerView,
};
use vitrine_core::environment::KeyValueStore;
use vitrine_runtime::EffectHandle;
use vitrine_testing::{helpers::init_test_tracing, InMemoryKeyValueStore};

fn test_config() -> Config {
    Config::from_lookup(|key| (key == "STOREFRONT_CAROUSEL_SETTLE_MS").then(|| "20".to_string()))
}

fn store_with(storage: Arc<dyn KeyValueStore>) -> StorefrontStore {
    init_test_tracing();
    bootstrap(&test_config(), Catalog::builtin(), storage)
}

fn new_store() -> StorefrontStore {
    store_with(Arc::new(InMemoryKeyValueStore::new()))
}

async fn send(store: &StorefrontStore, action: StorefrontAction) -> EffectHandle {
    match store.send(action).await {
        Ok(handle) => handle,
        Err(error) => unreachable!("store rejected action: {error}"),
    }
}

async fn open(store: &StorefrontStore, code: &str) {
    send(
        store,
        StorefrontAction::OpenProduct {
            product: code.into(),
        },
    )
    .await;
}

async fn press_and_move(store: &StorefrontStore, dx: f64, dy: f64) {
    let origin = Point::new(200.0, 300.0);
    send(
        store,
        StorefrontAction::Carousel(CarouselAction::PointerDown { point: origin }),
    )
    .await;
    send(
        store,
        StorefrontAction::Carousel(CarouselAction::PointerMove {
            point: Point::new(origin.x + dx, origin.y + dy),
        }),
    )
    .await;
}

async fn release(store: &StorefrontStore) -> EffectHandle {
    send(store, StorefrontAction::Carousel(CarouselAction::PointerUp)).await
}

async fn current_index(store: &StorefrontStore) -> Option<usize> {
    store
        .state(|s| s.carousel.session.as_ref().map(|session| session.index))
        .await
}

async fn current_phase(store: &StorefrontStore) -> Option<GesturePhase> {
    store
        .state(|s| s.carousel.session.as_ref().map(|session| session.phase))
        .await
}

#[tokio::test]
async fn test_swipe_next_commits_after_settle() {
    let store = new_store();
    open(&store, "FK-01").await;

    press_and_move(&store, -150.0, 5.0).await;
    let mut handle = release(&store).await;

    // Index only moves once the settle callback lands
    assert_eq!(current_index(&store).await, Some(0));
    assert!(matches!(
        current_phase(&store).await,
        Some(GesturePhase::Settling { target: Some(_), .. })
    ));

    handle.wait().await;

    assert_eq!(current_index(&store).await, Some(1));
    assert_eq!(current_phase(&store).await, Some(GesturePhase::Idle));
}

#[tokio::test]
async fn test_rubber_band_at_first_image_snaps_back() {
    let store = new_store();
    open(&store, "FK-01").await;

    press_and_move(&store, 100.0, 0.0).await;
    let offset = store
        .state(|s| s.carousel.session.as_ref().map(|x| x.phase.horizontal_offset()))
        .await;
    assert!(offset.is_some_and(|o| (o - 28.0).abs() < 1e-9));

    let mut handle = release(&store).await;
    handle.wait().await;

    assert_eq!(current_index(&store).await, Some(0));
    assert_eq!(current_phase(&store).await, Some(GesturePhase::Idle));
}

#[tokio::test]
async fn test_stale_callback_after_reopen_is_discarded() {
    let store = new_store();
    open(&store, "FK-01").await;

    press_and_move(&store, -200.0, 0.0).await;
    let mut handle = release(&store).await;

    send(&store, StorefrontAction::Carousel(CarouselAction::Close)).await;
    open(&store, "FK-01").await;
    handle.wait().await;

    assert_eq!(current_index(&store).await, Some(0));
    assert_eq!(current_phase(&store).await, Some(GesturePhase::Idle));
    let error = store.state(|s| s.carousel.last_error.clone()).await;
    assert!(matches!(error, Some(StorefrontError::StaleCallback { .. })));
}

#[tokio::test]
async fn test_dot_jump_cancels_pending_settle() {
    let store = new_store();
    open(&store, "FK-01").await;

    press_and_move(&store, -200.0, 0.0).await;
    let mut handle = release(&store).await;
    send(
        &store,
        StorefrontAction::Carousel(CarouselAction::JumpTo { index: 2 }),
    )
    .await;
    handle.wait().await;

    assert_eq!(current_index(&store).await, Some(2));
}

#[tokio::test]
async fn test_vertical_swipe_dismisses() {
    let store = new_store();
    open(&store, "FK-01").await;

    press_and_move(&store, 4.0, 180.0).await;
    release(&store).await;

    assert!(!store.state(|s| s.carousel.is_open()).await);
    let env = store.environment();
    assert!(store.state(|s| ViewerView::derive(s, env)).await.is_none());
}

#[tokio::test]
async fn test_dismiss_during_snap_back_discards_callback() {
    let store = new_store();
    open(&store, "FK-01").await;

    // Snap back is pending when the next gesture starts and dismisses
    press_and_move(&store, 50.0, 0.0).await;
    let mut pending = release(&store).await;
    press_and_move(&store, 0.0, 150.0).await;
    release(&store).await;
    assert!(!store.state(|s| s.carousel.is_open()).await);

    pending.wait().await;

    assert!(!store.state(|s| s.carousel.is_open()).await);
    let error = store.state(|s| s.carousel.last_error.clone()).await;
    assert!(matches!(error, Some(StorefrontError::StaleCallback { .. })));
}

#[tokio::test]
async fn test_swipe_past_last_image_snaps_back() {
    let store = new_store();
    open(&store, "FK-02").await;
    send(
        &store,
        StorefrontAction::Carousel(CarouselAction::StepNext),
    )
    .await;

    press_and_move(&store, -300.0, 0.0).await;
    let mut handle = release(&store).await;
    handle.wait().await;

    assert_eq!(current_index(&store).await, Some(1));
}

#[tokio::test]
async fn test_add_to_cart_until_sold_out() {
    let store = new_store();
    open(&store, "FK-01").await;
    send(
        &store,
        StorefrontAction::SelectSize {
            size: "L".to_string(),
        },
    )
    .await;

    for _ in 0..3 {
        send(&store, StorefrontAction::AddToCart).await;
    }

    let code = ProductCode::new("FK-01");
    assert_eq!(store.state(|s| s.cart.quantity_of(&code, "L")).await, 2);
    let error = store.state(|s| s.cart.last_error.clone()).await;
    assert!(matches!(error, Some(StorefrontError::Unavailable { .. })));

    let env = store.environment();
    let view = store.state(|s| ViewerView::derive(s, env)).await;
    assert!(view.is_some_and(|v| !v.add_to_cart.enabled));
}

#[tokio::test]
async fn test_concurrent_add_to_cart_never_oversells() {
    let store = new_store();
    open(&store, "FK-01").await;
    send(
        &store,
        StorefrontAction::SelectSize {
            size: "M".to_string(),
        },
    )
    .await;

    let tasks: Vec<_> = (0..12)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.send(StorefrontAction::AddToCart).await })
        })
        .collect();
    for task in tasks {
        assert!(matches!(task.await, Ok(Ok(_))));
    }

    let code = ProductCode::new("FK-01");
    assert_eq!(store.state(|s| s.cart.quantity_of(&code, "M")).await, 3);
    assert_eq!(store.state(|s| s.cart.reservations().len()).await, 1);
}

#[tokio::test]
async fn test_cart_survives_restart() {
    let storage = InMemoryKeyValueStore::new();

    let store = store_with(Arc::new(storage.clone()));
    open(&store, "FK-02").await;
    let mut first = send(&store, StorefrontAction::AddToCart).await;
    send(
        &store,
        StorefrontAction::SelectSize {
            size: "L".to_string(),
        },
    )
    .await;
    let mut second = send(&store, StorefrontAction::AddToCart).await;
    first.wait().await;
    second.wait().await;

    assert_eq!(
        storage.raw("feiqui_cart").as_deref(),
        Some(r#"[{"productId":"FK-02","size":"S","quantity":1},{"productId":"FK-02","size":"L","quantity":1}]"#)
    );

    let restarted = store_with(Arc::new(storage.clone()));
    let env = restarted.environment();
    let panel = restarted.state(|s| CartPanelView::derive(s, env)).await;
    assert_eq!(panel.badge, 2);
    assert_eq!(panel.lines[0].label, "RST-01");

    // S is exhausted by the restored reservation
    open(&restarted, "FK-02").await;
    let selected = restarted
        .state(|s| s.carousel.session.as_ref().and_then(|x| x.selected_size.clone()))
        .await;
    assert_eq!(selected.as_deref(), Some("L"));
}

#[tokio::test]
async fn test_corrupt_cart_restores_empty() {
    let storage = InMemoryKeyValueStore::new().with_entry("feiqui_cart", "not json");
    let store = store_with(Arc::new(storage));

    assert!(store.state(|s| s.cart.is_empty()).await);
}

#[tokio::test]
async fn test_clear_persists_empty_cart() {
    let storage = InMemoryKeyValueStore::new();
    let store = store_with(Arc::new(storage.clone()));
    open(&store, "FK-01").await;
    send(&store, StorefrontAction::AddToCart).await;

    let mut handle = send(
        &store,
        StorefrontAction::Cart(storefront::cart::CartAction::Clear),
    )
    .await;
    handle.wait().await;
    store
        .shutdown(std::time::Duration::from_secs(1))
        .await
        .ok();

    assert_eq!(storage.raw("feiqui_cart").as_deref(), Some("[]"));
}

#[tokio::test]
async fn test_single_image_product_never_navigates() {
    init_test_tracing();
    let product = Product {
        code: ProductCode::new("FK-09"),
        faction: Faction::Profetas,
        number: "02".to_string(),
        slug: "pft-02".to_string(),
        drop: None,
        sort: None,
        active: true,
        price_uyu: None,
        images: vec!["/products/profetas/pft-02/1.jpg".to_string()],
        sizes: vec![SizeStock::new("U", 1)],
    };
    let Ok(catalog) = Catalog::new(vec![product]) else {
        unreachable!("single product catalog is valid");
    };
    let store = bootstrap(
        &test_config(),
        catalog,
        Arc::new(InMemoryKeyValueStore::new()),
    );
    open(&store, "FK-09").await;

    let env = store.environment();
    let Some(view) = store.state(|s| ViewerView::derive(s, env)).await else {
        unreachable!("viewer is open");
    };
    assert!(view.at_first && view.at_last);
    assert!(view.slides.iter().all(|s| s.index == 0));
    assert_eq!(view.header, "PFT-02");

    for dx in [-250.0, 250.0] {
        press_and_move(&store, dx, 0.0).await;
        let mut handle = release(&store).await;
        handle.wait().await;
        assert_eq!(current_index(&store).await, Some(0));
    }
}
