use actix_web::{error::JsonPayloadError, web, HttpRequest, HttpResponse, Responder};
use common::{
    errors::WalletError,
    ledger::WalletLedger,
    utils::{UpdateWalletRequest, UpdateWalletResponse},
};
use tracing::{info, warn};

use crate::{error::ApiError, metrics};

pub struct AppState {
    pub ledger: WalletLedger,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(health_check)
        .service(metrics_export)
        .service(list_users)
        .service(update_wallet)
        .service(fetch_transactions);
}

/// Body fields that fail to parse come back as structured invalid arguments.
fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    match err {
        JsonPayloadError::Deserialize(e) => {
            let position = format!(" at line {} column {}", e.line(), e.column());
            let message = e.to_string();
            let detail = message.strip_suffix(&position).unwrap_or(&message);
            warn!("Rejected wallet request body: {}", detail);
            ApiError(WalletError::invalid_argument(detail)).into()
        }
        other => other.into(),
    }
}

#[actix_web::get("/health")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().content_type("text/plain").body("OK")
}

#[actix_web::get("/metrics")]
async fn metrics_export() -> impl Responder {
    match metrics::gather_text() {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/plain; version=0.0.4")
            .body(body),
        Err(e) => {
            warn!("Failed to encode metrics: {}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Fetch all users with their wallet balance
#[actix_web::get("/users")]
async fn list_users(app_state: web::Data<AppState>) -> impl Responder {
    let AppState { ledger } = &**app_state;
    HttpResponse::Ok().json(ledger.list_users().await)
}

/// Deposit into or withdraw from a user's wallet
#[actix_web::post("/wallet/{user_id}")]
async fn update_wallet(
    path: web::Path<i64>,
    req: web::Json<UpdateWalletRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    let req = req.into_inner();
    let AppState { ledger } = &**app_state;
    info!(user_id = %user_id, tx_type = %req.tx_type, "Wallet update request arrived");

    match ledger.update_wallet(user_id, req.amount, &req.tx_type).await {
        Ok(update) => {
            metrics::record_wallet_update(update.tx_type, req.amount);
            Ok(HttpResponse::Ok().json(UpdateWalletResponse {
                message: update.message(),
                balance: update.balance,
            }))
        }
        Err(err) => {
            warn!(
                user_id = %user_id,
                amount = %req.amount,
                reason = err.category(),
                "Wallet update rejected: {}",
                err
            );
            metrics::record_wallet_failure(&err);
            Err(err.into())
        }
    }
}

/// Fetch all transactions for a specific user
#[actix_web::get("/transactions/{user_id}")]
async fn fetch_transactions(
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    let AppState { ledger } = &**app_state;

    let transactions = ledger.fetch_transactions(user_id).await?;
    Ok(HttpResponse::Ok().json(transactions))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};

    use super::*;

    fn app_state() -> web::Data<AppState> {
        web::Data::new(AppState {
            ledger: WalletLedger::seeded(),
        })
    }

    fn update(user_id: i64, body: Value) -> test::TestRequest {
        test::TestRequest::post()
            .uri(&format!("/wallet/{}", user_id))
            .set_json(body)
    }

    #[actix_web::test]
    async fn test_list_users() {
        let app =
            test::init_service(App::new().app_data(app_state()).configure(configure)).await;

        let req = test::TestRequest::get().uri("/users").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(
            body,
            json!([
                {"id": 1, "name": "Alice", "email": "alice@example.com", "phone": "1234567890", "balance": 100.0},
                {"id": 2, "name": "Bob", "email": "bob@example.com", "phone": "9876543210", "balance": 200.0}
            ])
        );
    }

    #[actix_web::test]
    async fn test_deposit_overdraw_and_history() {
        let app =
            test::init_service(App::new().app_data(app_state()).configure(configure)).await;

        let req = update(1, json!({"amount": 50, "type": "deposit"})).to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(
            body,
            json!({"message": "Wallet updated successfully for user 1", "balance": 150.0})
        );

        let req = update(1, json!({"amount": 200, "type": "withdraw"})).to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(
            body,
            json!({"error": "insufficient_funds", "detail": "Insufficient balance"})
        );

        let req = test::TestRequest::get().uri("/transactions/1").to_request();
        let history: Value = test::call_and_read_body_json(&app, req).await;
        let history = history.as_array().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0]["user_id"], 1);
        assert_eq!(history[0]["amount"], json!(50.0));
        assert_eq!(history[0]["type"], "deposit");

        let req = test::TestRequest::get().uri("/users").to_request();
        let users: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(users[0]["balance"], json!(150.0));
    }

    #[actix_web::test]
    async fn test_withdraw() {
        let app =
            test::init_service(App::new().app_data(app_state()).configure(configure)).await;

        let req = update(2, json!({"amount": 75.5, "type": "withdraw"})).to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["balance"], json!(124.5));
    }

    #[actix_web::test]
    async fn test_unknown_user_is_404() {
        let app =
            test::init_service(App::new().app_data(app_state()).configure(configure)).await;

        let req = update(99, json!({"amount": 1, "type": "deposit"})).to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body, json!({"error": "not_found", "detail": "User not found"}));

        let req = test::TestRequest::get().uri("/transactions/99").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_invalid_type_and_negative_amount_are_400() {
        let app =
            test::init_service(App::new().app_data(app_state()).configure(configure)).await;

        let req = update(1, json!({"amount": 5, "type": "transfer"})).to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(
            body,
            json!({"error": "invalid_argument", "detail": "Invalid transaction type"})
        );

        let req = update(1, json!({"amount": -5, "type": "deposit"})).to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "invalid_argument");

        let req = test::TestRequest::get().uri("/transactions/1").to_request();
        let history: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(history, json!([]));
    }

    #[actix_web::test]
    async fn test_malformed_body_is_400() {
        let app =
            test::init_service(App::new().app_data(app_state()).configure(configure)).await;

        let req = update(1, json!({"type": "deposit"})).to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(
            body,
            json!({"error": "invalid_argument", "detail": "missing field `amount`"})
        );
    }

    #[actix_web::test]
    async fn test_unrepresentable_amounts_are_structured_400() {
        let app =
            test::init_service(App::new().app_data(app_state()).configure(configure)).await;

        let req = update(1, json!({"amount": 1e30, "type": "deposit"})).to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(
            body,
            json!({"error": "invalid_argument", "detail": "Amount out of range"})
        );

        let req = update(1, json!({"amount": 1e-30, "type": "deposit"})).to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(
            body,
            json!({"error": "invalid_argument", "detail": "Amount has too many decimal places"})
        );

        // neither request touched the wallet
        let req = test::TestRequest::get().uri("/transactions/1").to_request();
        let history: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(history, json!([]));

        let req = test::TestRequest::get().uri("/users").to_request();
        let users: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(users[0]["balance"], json!(100.0));
    }

    #[actix_web::test]
    async fn test_non_integer_user_id_is_404() {
        let app =
            test::init_service(App::new().app_data(app_state()).configure(configure)).await;

        let req = test::TestRequest::get().uri("/transactions/alice").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_health_and_metrics() {
        let app =
            test::init_service(App::new().app_data(app_state()).configure(configure)).await;

        let req = update(2, json!({"amount": 1, "type": "deposit"})).to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/health").to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(&body[..], b"OK");

        let req = test::TestRequest::get().uri("/metrics").to_request();
        let body = test::call_and_read_body(&app, req).await;
        let text = std::str::from_utf8(&body).unwrap();
        assert!(text.contains("wallet_updates_total"));
    }
}
