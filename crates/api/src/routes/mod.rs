//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! # Auth
//! POST   /api/auth/register              - Create a shopper account
//! POST   /api/auth/login                 - Exchange credentials for a bearer token
//! POST   /api/auth/verify-password       - Re-check the acting account's password (auth)
//! GET    /api/auth/profile               - Acting account's profile (auth)
//! PUT    /api/auth/profile               - Update name/address/phone (auth)
//!
//! # Users (admin)
//! GET    /api/users                      - Accounts with cart, wishlist and feedback
//! GET    /api/users/{id}/cart            - One account's cart
//! GET    /api/users/{id}/wishlist        - One account's wishlist
//! GET    /api/users/{id}/feedback        - One account's feedback
//! PUT    /api/users/{id}/role            - Change role (not own account)
//! DELETE /api/users/{id}                 - Delete account (not own account)
//!
//! # Products
//! GET    /api/products                   - Search, filter, sort, paginate
//! GET    /api/products/{id}              - Product detail
//! POST   /api/products                   - Create (admin)
//! PUT    /api/products/{id}              - Partial update (admin)
//! DELETE /api/products/{id}              - Delete (admin)
//! POST   /api/products/{id}/feedback     - Rate a product (auth)
//!
//! # Cart (auth)
//! GET    /api/cart                       - Cart lines
//! POST   /api/cart                       - Add units
//! POST   /api/cart/add                   - Add one unit ({productId})
//! POST   /api/cart/update                - Set quantity >= 1 ({productId, quantity})
//! POST   /api/cart/remove                - Remove a line ({productId})
//! DELETE /api/cart/clear                 - Empty the cart
//! PUT    /api/cart/{productId}           - Set quantity (0 removes)
//! DELETE /api/cart/{productId}           - Remove a line
//!
//! # Wishlist (auth)
//! GET    /api/wishlist                   - Wishlist products
//! POST   /api/wishlist, /api/wishlist/add - Add a product
//! POST   /api/wishlist/remove            - Remove a product ({productId})
//! DELETE /api/wishlist/{productId}       - Remove a product
//!
//! # Feedback
//! POST   /api/feedback                   - Rate a product (auth)
//! GET    /api/feedback, /api/feedback/admin - All feedback (admin)
//! GET    /api/feedback/product/{id}      - Feedback for a product
//! DELETE /api/feedback/{id}              - Delete feedback (admin)
//!
//! # Orders
//! POST   /api/orders                     - Place an order (auth)
//! GET    /api/orders, /api/orders/my     - Acting account's orders (auth)
//! GET    /api/orders/admin               - All orders (admin)
//! PUT    /api/orders/admin/{id}/status   - Change status (admin)
//! DELETE /api/orders/{id}                - Delete an order record (admin)
//! ```

pub mod auth;
pub mod cart;
pub mod feedback;
pub mod orders;
pub mod products;
pub mod users;
pub mod wishlist;

use axum::{
    Json, Router,
    routing::{delete, get, post, put},
};
use serde::Serialize;

use crate::state::AppState;

/// Plain confirmation body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/verify-password", post(auth::verify_password))
        .route("/profile", get(auth::profile).put(auth::update_profile))
}

/// Create the user administration routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::index))
        .route("/{id}", delete(users::destroy))
        .route("/{id}/cart", get(users::cart))
        .route("/{id}/wishlist", get(users::wishlist))
        .route("/{id}/feedback", get(users::feedback))
        .route("/{id}/role", put(users::change_role))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::destroy),
        )
        .route("/{id}/feedback", post(products::submit_feedback))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).post(cart::add))
        .route("/add", post(cart::add_one))
        .route("/update", post(cart::update_line))
        .route("/remove", post(cart::remove_line))
        .route("/clear", delete(cart::clear))
        .route("/{product_id}", put(cart::update).delete(cart::remove))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show).post(wishlist::add))
        .route("/add", post(wishlist::add))
        .route("/remove", post(wishlist::remove_by_body))
        .route("/{product_id}", delete(wishlist::remove))
}

/// Create the feedback routes router.
pub fn feedback_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(feedback::index).post(feedback::submit))
        .route("/admin", get(feedback::index))
        .route("/product/{product_id}", get(feedback::for_product))
        .route("/{id}", delete(feedback::destroy))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::mine).post(orders::place))
        .route("/my", get(orders::mine))
        .route("/admin", get(orders::index))
        .route("/admin/{id}/status", put(orders::update_status))
        .route("/{id}", delete(orders::destroy))
}

/// Create all `/api` routes except `/api/auth`, which is mounted separately
/// behind the auth rate limiter.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/users", user_routes())
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/wishlist", wishlist_routes())
        .nest("/feedback", feedback_routes())
        .nest("/orders", order_routes())
}
