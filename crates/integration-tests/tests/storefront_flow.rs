//! Browser-level storefront flow: register, login, add to cart, check out.
//!
//! Uses a cookie-jar reqwest client so the session rides along like a real
//! browser; redirects (303) are followed automatically.

use minimart_integration_tests::TestContext;

async fn seed_widget(ctx: &TestContext) {
    let response = ctx
        .client
        .post(format!("{}/api/product/create", ctx.product_url))
        .form(&[
            ("name", "Widget"),
            ("slug", "widget"),
            ("image", "widget.png"),
            ("price", "19.99"),
        ])
        .send()
        .await
        .expect("create product");
    assert_eq!(response.status(), 200);
}

fn browser() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("client")
}

#[tokio::test]
async fn home_page_lists_products() {
    let ctx = TestContext::spawn().await;
    seed_widget(&ctx).await;
    let storefront = ctx.spawn_storefront().await;

    let page = browser()
        .get(&storefront)
        .send()
        .await
        .expect("home")
        .text()
        .await
        .expect("body");

    assert!(page.contains("Widget"));
    assert!(page.contains("$19.99"));
}

#[tokio::test]
async fn home_page_degrades_when_catalog_is_down() {
    let ctx = TestContext::spawn().await;
    let storefront = {
        // Point the storefront at a dead catalog port
        let broken = TestContext {
            client: ctx.client.clone(),
            user_url: ctx.user_url.clone(),
            product_url: "http://127.0.0.1:1".to_owned(),
            order_url: ctx.order_url.clone(),
        };
        broken.spawn_storefront().await
    };

    let response = browser().get(&storefront).send().await.expect("home");
    assert_eq!(response.status(), 200);

    let page = response.text().await.expect("body");
    assert!(page.contains("Failed to retrieve products"));
}

#[tokio::test]
async fn register_login_add_to_cart_and_checkout() {
    let ctx = TestContext::spawn().await;
    seed_widget(&ctx).await;
    let storefront = ctx.spawn_storefront().await;
    let browser = browser();

    // Register; the redirect lands on the login page with a success banner
    let page = browser
        .post(format!("{storefront}/register"))
        .form(&[
            ("username", "alice"),
            ("email", "alice@example.com"),
            ("first_name", "Alice"),
            ("last_name", "Smith"),
            ("password", "pw123"),
        ])
        .send()
        .await
        .expect("register")
        .text()
        .await
        .expect("body");
    assert!(page.contains("Registration successful"));

    // Login; the redirect lands on the home page greeting the user
    let page = browser
        .post(format!("{storefront}/login"))
        .form(&[("username", "alice"), ("password", "pw123")])
        .send()
        .await
        .expect("login")
        .text()
        .await
        .expect("body");
    assert!(page.contains("Hi, Alice"));
    assert!(page.contains("Cart (0)"));

    // Add to cart from the product page
    let page = browser
        .post(format!("{storefront}/product/widget"))
        .send()
        .await
        .expect("add to cart")
        .text()
        .await
        .expect("body");
    assert!(page.contains("Item added to your cart."));
    assert!(page.contains("Cart (1)"));

    // Checkout redirects to the thank-you page
    let page = browser
        .get(format!("{storefront}/checkout"))
        .send()
        .await
        .expect("checkout")
        .text()
        .await
        .expect("body");
    assert!(page.contains("Thank you for your order!"));

    // Back home the cart is empty again
    let page = browser
        .get(&storefront)
        .send()
        .await
        .expect("home")
        .text()
        .await
        .expect("body");
    assert!(page.contains("Cart (0)"));
}

#[tokio::test]
async fn add_to_cart_requires_login() {
    let ctx = TestContext::spawn().await;
    seed_widget(&ctx).await;
    let storefront = ctx.spawn_storefront().await;

    // Anonymous add-to-cart bounces to the login page
    let page = browser()
        .post(format!("{storefront}/product/widget"))
        .send()
        .await
        .expect("add to cart")
        .text()
        .await
        .expect("body");

    assert!(page.contains("Log in"));
}

#[tokio::test]
async fn duplicate_registration_shows_username_taken() {
    let ctx = TestContext::spawn().await;
    let storefront = ctx.spawn_storefront().await;
    let browser = browser();

    let form = [
        ("username", "alice"),
        ("email", "alice@example.com"),
        ("first_name", "Alice"),
        ("last_name", "Smith"),
        ("password", "pw123"),
    ];

    let response = browser
        .post(format!("{storefront}/register"))
        .form(&form)
        .send()
        .await
        .expect("register");
    assert_eq!(response.status(), 200);

    let page = browser
        .post(format!("{storefront}/register"))
        .form(&form)
        .send()
        .await
        .expect("register again")
        .text()
        .await
        .expect("body");

    assert!(page.contains("Username already exists"));
}
