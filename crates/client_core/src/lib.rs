//! Client library for the sneaker storefront admin API: session handling,
//! the remote order gateway, and the order dashboard state machine.

pub mod auth;
pub mod dashboard;
pub mod error;
pub mod gateway;
pub mod mapper;
pub mod session;

pub use auth::{validate_new_password, AuthClient};
pub use dashboard::{OrderAction, OrderDashboard, PendingMutation, Settled};
pub use error::{AuthError, DashboardError, GatewayError, PasswordError, SessionError};
pub use gateway::{ApiClient, HttpOrderGateway, OrderGateway, DEFAULT_API_BASE_URL};
pub use mapper::{to_display, DateStyle, DEFAULT_DATE_FORMAT};
pub use session::{FileTokenStore, MemoryTokenStore, Session, SessionClaims, TokenStore};
