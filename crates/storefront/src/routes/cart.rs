//! Checkout and order confirmation.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use minimart_core::wire::{OrderSnapshot, UserSummary};

use crate::middleware::{RequireUser, set_cached_order, take_cached_order};
use crate::state::AppState;

/// Thank-you page template.
#[derive(Template, WebTemplate)]
#[template(path = "order/thank_you.html")]
pub struct ThankYouTemplate {
    pub user: Option<UserSummary>,
    pub cart_count: i64,
    pub order: OrderSnapshot,
}

/// Check out the current order and move to the thank-you page.
///
/// An empty or missing order sends the user home with a banner instead.
#[instrument(skip(state, session, current))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    RequireUser(current): RequireUser,
) -> Response {
    // Confirm against the ledger rather than trusting the cached snapshot
    let order = match state.orders().get(&current.api_key).await {
        Ok(Some(order)) => order,
        Ok(None) => return Redirect::to("/?error=empty_cart").into_response(),
        Err(e) => {
            tracing::error!("Error fetching order before checkout: {e}");
            return Redirect::to("/?error=unavailable").into_response();
        }
    };

    if order.is_empty() {
        return Redirect::to("/?error=empty_cart").into_response();
    }

    match state.orders().checkout(&current.api_key).await {
        Ok(Some(closed)) => {
            // The thank-you page pops this snapshot
            if let Err(e) = set_cached_order(&session, &closed).await {
                tracing::error!("Failed to cache closed order: {e}");
            }
            Redirect::to("/order/thank-you").into_response()
        }
        Ok(None) => Redirect::to("/?error=empty_cart").into_response(),
        Err(e) => {
            tracing::error!("Error processing checkout: {e}");
            Redirect::to("/?error=unavailable").into_response()
        }
    }
}

/// Render the order confirmation and drop the order from the session.
#[instrument(skip(session, current))]
pub async fn thank_you(session: Session, RequireUser(current): RequireUser) -> Response {
    match take_cached_order(&session).await {
        Ok(Some(order)) => ThankYouTemplate {
            user: Some(current.user),
            cart_count: 0,
            order,
        }
        .into_response(),
        _ => Redirect::to("/").into_response(),
    }
}
