pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::{Cart, CartItem, CartLine, Order, OrderItem, Payment};
pub use errors::CommerceError;
pub use ports::{CartRepository, OrderRepository, PaymentRepository};
pub use services::CommerceService;
pub use value_objects::{OrderStatus, PaymentStatus};
