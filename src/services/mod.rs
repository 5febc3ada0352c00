//! Services
//!
//! Business logic for the storefront, kept behind the HTTP layer:
//! - `login_guard`: sliding-window tracking of failed login attempts
//! - `password`: argon2 hashing and the password strength policy
//! - `user`: accounts, paginated listing, and the throttled login flow
//! - `seller`: product listings
//! - `order`: orders with their own credentials

pub mod login_guard;
pub mod order;
pub mod password;
pub mod seller;
pub mod user;

pub use login_guard::{start_sweeper, LoginAttemptGuard, SweeperHandle};
pub use order::{NewOrder, OrderService, OrderServiceError};
pub use seller::{SellerService, SellerServiceError};
pub use user::{LoginOutcome, UserPage, UserService, UserServiceError};
