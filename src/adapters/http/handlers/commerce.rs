use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use uuid::Uuid;

use crate::adapters::http::{
  dtos::{AddToCartRequest, CreatePaymentRequest, RemoveFromCartRequest},
  errors::ApiError,
  middleware::AuthUser,
};
use crate::application::commerce::{
  AddToCartCommand, AddToCartUseCase, CreateOrderUseCase, CreatePaymentCommand,
  CreatePaymentUseCase, GetCartUseCase, GetOrderUseCase, ListOrdersUseCase, ListPaymentsUseCase,
  RemoveFromCartUseCase,
};

/// GET /api/v1/cart
pub async fn get_cart_handler(
  use_case: web::Data<Arc<GetCartUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user()?;
  Ok(HttpResponse::Ok().json(use_case.execute(user.id).await?))
}

/// POST /api/v1/cart/add
pub async fn add_to_cart_handler(
  request: web::Json<AddToCartRequest>,
  use_case: web::Data<Arc<AddToCartUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user()?;
  let cart = use_case
    .execute(AddToCartCommand {
      user_id: user.id,
      item_id: request.item_id,
      quantity: request.quantity,
    })
    .await?;
  Ok(HttpResponse::Ok().json(cart))
}

/// POST /api/v1/cart/remove
pub async fn remove_from_cart_handler(
  request: web::Json<RemoveFromCartRequest>,
  use_case: web::Data<Arc<RemoveFromCartUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user()?;
  let cart = use_case.execute(user.id, request.item_id).await?;
  Ok(HttpResponse::Ok().json(cart))
}

/// POST /api/v1/orders
///
/// Turns the current cart into an order and empties the cart.
pub async fn create_order_handler(
  use_case: web::Data<Arc<CreateOrderUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user()?;
  let order = use_case.execute(user.id).await?;
  Ok(HttpResponse::Created().json(order))
}

/// GET /api/v1/orders
pub async fn list_orders_handler(
  use_case: web::Data<Arc<ListOrdersUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user()?;
  Ok(HttpResponse::Ok().json(use_case.execute(user.id).await?))
}

/// GET /api/v1/orders/{id}
pub async fn get_order_handler(
  order_id: web::Path<Uuid>,
  use_case: web::Data<Arc<GetOrderUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user()?;
  let order = use_case.execute(user.id, order_id.into_inner()).await?;
  Ok(HttpResponse::Ok().json(order))
}

/// POST /api/v1/payments
pub async fn create_payment_handler(
  request: web::Json<CreatePaymentRequest>,
  use_case: web::Data<Arc<CreatePaymentUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user()?;
  let request = request.into_inner();
  let payment = use_case
    .execute(CreatePaymentCommand {
      user_id: user.id,
      order_id: request.order_id,
      amount: request.amount,
      status: request.status,
    })
    .await?;
  Ok(HttpResponse::Created().json(payment))
}

/// GET /api/v1/payments
pub async fn list_payments_handler(
  use_case: web::Data<Arc<ListPaymentsUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let user = http_req.authenticated_user()?;
  Ok(HttpResponse::Ok().json(use_case.execute(user.id).await?))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::adapters::http::handlers::testing::{CUSTOMER_BIN, auth_service, bearer};
  use crate::adapters::http::middleware::AuthMiddleware;
  use crate::domain::commerce::CommerceService;
  use crate::test_support::{InMemoryCatalog, InMemoryCommerce};
  use actix_web::{
    App,
    http::StatusCode,
    test::{self, TestRequest},
  };
  use rust_decimal_macros::dec;

  #[actix_web::test]
  async fn test_cart_to_order_to_payment() {
    let catalog = InMemoryCatalog::default();
    let seller = catalog.seed_company("ТОО Альфа", Some("940140000385"));
    let cable = catalog.seed_item(seller.id, "Кабель", dec!(100.00));
    let commerce = InMemoryCommerce::default();
    let service = Arc::new(CommerceService::new(
      Arc::new(commerce.clone()),
      Arc::new(commerce.clone()),
      Arc::new(commerce),
      Arc::new(catalog),
    ));

    let auth = auth_service();
    let token = bearer(&auth, CUSTOMER_BIN).await;

    let app = test::init_service(
      App::new().service(
        web::scope("")
          .wrap(AuthMiddleware::new(auth))
          .app_data(web::Data::new(Arc::new(GetCartUseCase::new(service.clone()))))
          .app_data(web::Data::new(Arc::new(AddToCartUseCase::new(service.clone()))))
          .app_data(web::Data::new(Arc::new(RemoveFromCartUseCase::new(service.clone()))))
          .app_data(web::Data::new(Arc::new(CreateOrderUseCase::new(service.clone()))))
          .app_data(web::Data::new(Arc::new(GetOrderUseCase::new(service.clone()))))
          .app_data(web::Data::new(Arc::new(CreatePaymentUseCase::new(service.clone()))))
          .app_data(web::Data::new(Arc::new(ListPaymentsUseCase::new(service))))
          .route("/cart", web::get().to(get_cart_handler))
          .route("/cart/add", web::post().to(add_to_cart_handler))
          .route("/cart/remove", web::post().to(remove_from_cart_handler))
          .route("/orders", web::post().to(create_order_handler))
          .route("/orders/{id}", web::get().to(get_order_handler))
          .route("/payments", web::post().to(create_payment_handler))
          .route("/payments", web::get().to(list_payments_handler)),
      ),
    )
    .await;

    let req = TestRequest::post()
      .uri("/orders")
      .insert_header(("Authorization", token.clone()))
      .to_request();
    assert_eq!(
      test::call_service(&app, req).await.status(),
      StatusCode::BAD_REQUEST
    );

    let req = TestRequest::post()
      .uri("/cart/add")
      .insert_header(("Authorization", token.clone()))
      .set_json(serde_json::json!({ "item_id": cable.id, "quantity": 3 }))
      .to_request();
    let cart: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(cart["total"], "300.00");

    let req = TestRequest::post()
      .uri("/orders")
      .insert_header(("Authorization", token.clone()))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let order: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(order["total_amount"], "300.00");
    let order_id = order["id"].as_str().unwrap().to_string();

    let req = TestRequest::get()
      .uri("/cart")
      .insert_header(("Authorization", token.clone()))
      .to_request();
    let cart: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert!(cart["items"].as_array().unwrap().is_empty());

    let req = TestRequest::get()
      .uri(&format!("/orders/{}", order_id))
      .insert_header(("Authorization", token.clone()))
      .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = TestRequest::post()
      .uri("/payments")
      .insert_header(("Authorization", token.clone()))
      .set_json(serde_json::json!({ "order_id": order_id, "amount": "300.00" }))
      .to_request();
    assert_eq!(
      test::call_service(&app, req).await.status(),
      StatusCode::CREATED
    );

    let req = TestRequest::get()
      .uri("/payments")
      .insert_header(("Authorization", token))
      .to_request();
    let payments: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(payments.as_array().unwrap().len(), 1);
  }
}
