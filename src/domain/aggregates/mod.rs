//! Aggregates module
pub mod account;
pub mod cart;
pub mod catalog;
pub mod feedback;
pub mod invoice;
pub mod payment;
pub mod wishlist;

pub use account::{Account, AuthToken, EmployeeForm, LoginForm, NewAccount, RegisterForm, Role};
pub use cart::{Cart, CartError, CartLine, CartView};
pub use catalog::{
    AddCartLine, Brand, CatalogAttribute, CatalogQuery, Color, Image, ImageForm, Model, ModelForm, Product,
    ProductForm, ProductSelection, SelectionError, SelectionView, Size, SortOrder, Supplier,
};
pub use feedback::{Comment, CommentForm, CommentThread, FeedbackError, NewComment, NewReview, RatingSummary, Review, ReviewForm};
pub use invoice::{Actor, CheckoutForm, CreatePayment, Invoice, InvoiceFilter, InvoiceStatus, InvoiceView, PaymentMethod, PaymentRedirect, StatusUpdate};
pub use payment::PaymentReturn;
pub use wishlist::{AddWishlistItem, Wishlist, WishlistError, WishlistItem};
