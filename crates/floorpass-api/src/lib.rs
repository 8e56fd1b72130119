// floorpass-api: Async Rust client for the Floorpass booking service.

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod payments;
pub mod retry;
pub mod transport;

// Endpoint groups: inherent `ApiClient` methods only.
mod bookings;
mod session;
mod spaces;
mod staff;

pub use auth::{MemoryTokenStore, SessionListener, TokenPair, TokenStore, TokenStoreError};
pub use client::{ApiClient, RequestOptions};
pub use error::{Error, ErrorResponse};
pub use models::{
    ApiResponse, Booking, BookingQuery, BookingStatus, CreateBookingInput, CreateOrderRequest,
    CustomerDetails, GatewayCallback, Paginated, Pagination, PaymentOrder, PaymentStatus,
    PaymentVerification, PromoValidation, Space, User, UserRole,
};
pub use payments::to_minor_units;
pub use retry::{RetryPolicy, with_retry};
pub use transport::{TlsMode, TransportConfig};
