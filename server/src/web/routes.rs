// attire-server/src/web/routes.rs

use actix_web::web;

use super::handlers::{order_handlers, product_handlers, review_handlers, user_handlers};

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

// Called in `main.rs` to configure services for the Actix App.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      .route("/health", web::get().to(health_check_handler))
      // Catalog
      .service(
        web::scope("/products")
          .route("", web::post().to(product_handlers::create_product_handler))
          .route("", web::get().to(product_handlers::list_products_handler))
          .route(
            "/{product}",
            web::get().to(product_handlers::get_product_handler),
          )
          .route(
            "/{product}/image",
            web::patch().to(product_handlers::update_product_image_handler),
          )
          .route(
            "/{product}/status",
            web::patch().to(product_handlers::update_product_status_handler),
          )
          .route(
            "/{product}/discount",
            web::patch().to(product_handlers::update_product_discount_handler),
          )
          .route(
            "/{product}/stock",
            web::patch().to(product_handlers::update_product_stock_handler),
          )
          .route(
            "/{product}",
            web::delete().to(product_handlers::delete_product_handler),
          ),
      )
      // Orders
      .service(
        web::scope("/orders")
          .route("", web::post().to(order_handlers::place_order_handler))
          .route("", web::get().to(order_handlers::list_orders_handler))
          .route(
            "/user/{userId}",
            web::get().to(order_handlers::orders_by_user_handler),
          )
          .route(
            "/product/{productId}",
            web::get().to(order_handlers::orders_by_product_handler),
          )
          .route(
            "/{orderId}/status",
            web::patch().to(order_handlers::update_order_status_handler),
          )
          .route(
            "/{orderId}",
            web::delete().to(order_handlers::delete_order_handler),
          ),
      )
      // Purchased lines, flattened across orders
      .service(
        web::scope("/order-lines")
          .route("", web::get().to(order_handlers::list_lines_handler))
          .route(
            "/order/{orderId}",
            web::get().to(order_handlers::lines_by_order_handler),
          )
          .route(
            "/user/{userId}",
            web::get().to(order_handlers::lines_by_user_handler),
          )
          .route(
            "/product/{productId}",
            web::get().to(order_handlers::lines_by_product_handler),
          ),
      )
      // Reviews
      .service(
        web::scope("/reviews")
          .route("", web::post().to(review_handlers::submit_review_handler))
          .route("", web::get().to(review_handlers::list_reviews_handler))
          .route(
            "/{reviewId}",
            web::patch().to(review_handlers::amend_review_handler),
          )
          .route(
            "/{reviewId}",
            web::delete().to(review_handlers::delete_review_handler),
          ),
      )
      // Profile mutations that fan out into reviews
      .service(
        web::scope("/users")
          .route(
            "/{userId}/name",
            web::patch().to(user_handlers::rename_user_handler),
          )
          .route(
            "/{userId}/image",
            web::patch().to(user_handlers::update_user_image_handler),
          ),
      ),
  );
}
