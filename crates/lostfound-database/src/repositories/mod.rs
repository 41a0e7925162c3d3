//! PostgreSQL implementations of the store traits.

pub mod item;
pub mod matching;
pub mod metrics;
pub mod notification;
pub mod user;

pub use item::ItemRepository;
pub use matching::MatchRepository;
pub use metrics::MetricsRepository;
pub use notification::NotificationRepository;
pub use user::UserRepository;
