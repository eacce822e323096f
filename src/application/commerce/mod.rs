//! Cart, order and payment use cases

mod cart;
mod orders;
mod payments;

pub use cart::{
  AddToCartCommand, AddToCartUseCase, CartLineDto, CartResponse, GetCartUseCase,
  RemoveFromCartUseCase,
};
pub use orders::{CreateOrderUseCase, GetOrderUseCase, ListOrdersUseCase, OrderDto, OrderItemDto};
pub use payments::{CreatePaymentCommand, CreatePaymentUseCase, ListPaymentsUseCase, PaymentDto};
