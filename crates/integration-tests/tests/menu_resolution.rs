//! Public menu resolution against an in-memory tenant store.

#![allow(clippy::unwrap_used)]

use qresto_integration_tests::{FailAt, MemoryMenuSource, category, product, restaurant};
use qresto_server::services::menu::{MenuResolution, resolve_menu};

fn found(resolution: MenuResolution) -> qresto_server::services::menu::Menu {
    match resolution {
        MenuResolution::Found(menu) => *menu,
        MenuResolution::Unavailable => panic!("expected a menu"),
    }
}

/// El Faro: "Entradas" has only a hidden soup, "Platos" has a visible pizza.
fn el_faro() -> (MemoryMenuSource, qresto_core::ProductId, qresto_core::ProductId) {
    let faro = restaurant("el-faro", "El Faro");
    let entradas = category(&faro, "Entradas", 1);
    let platos = category(&faro, "Platos", 2);
    let pizza = product(&platos, "Pizza", 8500, true, 3);
    let sopa = product(&entradas, "Sopa", 3000, false, 4);
    let ids = (pizza.id, sopa.id);
    (
        MemoryMenuSource::new(vec![faro], vec![platos, entradas], vec![sopa, pizza]),
        ids.0,
        ids.1,
    )
}

#[tokio::test]
async fn test_el_faro_shows_only_visible_products() {
    let (source, pizza_id, _) = el_faro();

    let menu = found(resolve_menu(&source, "el-faro").await);

    assert_eq!(menu.restaurant.name, "El Faro");
    assert_eq!(menu.sections.len(), 1);
    assert_eq!(menu.sections[0].category.name, "Platos");
    assert_eq!(menu.sections[0].products.len(), 1);
    let pizza = &menu.sections[0].products[0];
    assert_eq!(pizza.id, pizza_id);
    assert_eq!(pizza.price.to_string(), "$8.500");
}

#[tokio::test]
async fn test_category_reappears_when_product_shown() {
    let (source, _, sopa_id) = el_faro();
    assert!(source.set_visibility(sopa_id, true));

    let menu = found(resolve_menu(&source, "el-faro").await);

    let names: Vec<&str> = menu
        .sections
        .iter()
        .map(|s| s.category.name.as_str())
        .collect();
    assert_eq!(names, ["Entradas", "Platos"]);
    assert_eq!(menu.product_count(), 2);
}

#[tokio::test]
async fn test_hiding_product_removes_it_from_menu() {
    let (source, pizza_id, _) = el_faro();
    assert!(source.set_visibility(pizza_id, false));

    let menu = found(resolve_menu(&source, "el-faro").await);

    assert!(menu.is_empty());
    assert_eq!(menu.product_count(), 0);
}

#[tokio::test]
async fn test_products_newest_first_within_section() {
    let faro = restaurant("el-faro", "El Faro");
    let platos = category(&faro, "Platos", 0);
    let older = product(&platos, "Lasaña", 9000, true, 5);
    let newer = product(&platos, "Ñoquis", 7000, true, 10);
    let source = MemoryMenuSource::new(vec![faro], vec![platos], vec![older, newer]);

    let menu = found(resolve_menu(&source, "el-faro").await);

    let names: Vec<&str> = menu.sections[0]
        .products
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, ["Ñoquis", "Lasaña"]);
}

#[tokio::test]
async fn test_other_tenants_do_not_leak() {
    let faro = restaurant("el-faro", "El Faro");
    let puerto = restaurant("el-puerto", "El Puerto");
    let platos = category(&faro, "Platos", 0);
    let mariscos = category(&puerto, "Mariscos", 0);
    let pizza = product(&platos, "Pizza", 8500, true, 1);
    let ceviche = product(&mariscos, "Ceviche", 12000, true, 1);
    let source = MemoryMenuSource::new(
        vec![faro, puerto],
        vec![platos, mariscos],
        vec![pizza, ceviche],
    );

    let menu = found(resolve_menu(&source, "el-puerto").await);

    assert_eq!(menu.sections.len(), 1);
    assert_eq!(menu.sections[0].products[0].name, "Ceviche");
}

#[tokio::test]
async fn test_unknown_slug_is_unavailable() {
    let (source, _, _) = el_faro();
    assert!(matches!(
        resolve_menu(&source, "no-existe").await,
        MenuResolution::Unavailable
    ));
}

#[tokio::test]
async fn test_malformed_slug_is_unavailable() {
    let (source, _, _) = el_faro();
    for slug in ["", "El Faro", "el_faro", "../etc"] {
        assert!(
            matches!(resolve_menu(&source, slug).await, MenuResolution::Unavailable),
            "slug {slug:?} should not resolve"
        );
    }
}

#[tokio::test]
async fn test_backend_failures_are_unavailable() {
    for step in [FailAt::Restaurant, FailAt::Categories, FailAt::Products] {
        let (source, _, _) = el_faro();
        let source = source.failing_at(step);
        assert!(
            matches!(resolve_menu(&source, "el-faro").await, MenuResolution::Unavailable),
            "failure at {step:?} should be unavailable"
        );
    }
}

#[tokio::test]
async fn test_restaurant_without_products_is_empty_menu() {
    let faro = restaurant("el-faro", "El Faro");
    let platos = category(&faro, "Platos", 0);
    let source = MemoryMenuSource::new(vec![faro], vec![platos], vec![]);

    let menu = found(resolve_menu(&source, "el-faro").await);
    assert!(menu.is_empty());
}
