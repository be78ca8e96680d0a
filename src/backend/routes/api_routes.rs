/**
 * API Routes
 *
 * Everything under `/api/v1`.
 *
 * ## Auth (public)
 * - `POST /auth/signup`, `/auth/verify-otp`, `/auth/resend-otp`, `/auth/login`, `/auth/logout`
 *
 * ## Protected (behind `auth_middleware`)
 * - `GET/PATCH /user/me`, `PATCH /user/avatar`, `PATCH /user/password`, `GET /user/all`
 * - `POST /conversation/start`, `GET /conversation`
 * - `POST /message/send`
 */

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use crate::backend::auth::handlers::{login, logout, resend_otp, signup, verify_otp};
use crate::backend::messaging::{list_conversations, send_message, start_conversation};
use crate::backend::middleware::auth_middleware;
use crate::backend::server::state::AppState;
use crate::backend::users::{get_me, list_users, update_avatar, update_me, update_password};

pub fn configure_api_routes(state: AppState) -> Router<AppState> {
    let auth = Router::new()
        .route("/signup", post(signup))
        .route("/verify-otp", post(verify_otp))
        .route("/resend-otp", post(resend_otp))
        .route("/login", post(login))
        .route("/logout", post(logout));

    let user = Router::new()
        .route("/me", get(get_me).patch(update_me))
        .route("/avatar", patch(update_avatar))
        .route("/password", patch(update_password))
        .route("/all", get(list_users));

    let protected = Router::new()
        .nest("/user", user)
        .route("/conversation", get(list_conversations))
        .route("/conversation/start", post(start_conversation))
        .route("/message/send", post(send_message))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new().nest("/auth", auth).merge(protected)
}
