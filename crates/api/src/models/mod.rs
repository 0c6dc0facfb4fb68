//! Domain and wire types for the API.
//!
//! Row types derive `sqlx::FromRow` and are serialized straight to JSON with
//! camelCase field names. Request bodies live next to the entity they create.

pub mod account;
pub mod cart;
pub mod feedback;
pub mod order;
pub mod product;

pub use account::{Account, AccountDetails, AccountSummary, NewAccount, ProfileUpdate};
pub use cart::{AddToCart, CartEntry, CartLineUpdate, CartProduct, SetQuantity};
pub use feedback::{
    AccountFeedback, Feedback, FeedbackWithAuthor, FeedbackWithRefs, SubmitFeedback,
};
pub use order::{Order, OrderItem, OrderLineRequest, OrderWithAccount, PlaceOrder, UpdateStatus};
pub use product::{
    NewProduct, Product, ProductPage, ProductQuery, ProductSummary, ProductUpdate, StockSnapshot,
};
