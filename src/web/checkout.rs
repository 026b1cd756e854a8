//! Checkout, gateway returns and the shopper's own orders.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Redirect;
use axum::Json;
use serde::Serialize;

use super::extract::{Bearer, ValidatedJson};
use super::{AppResult, AppState};
use crate::domain::aggregates::invoice::placed_event;
use crate::domain::aggregates::{Actor, CheckoutForm, CreatePayment, InvoiceStatus, InvoiceView, PaymentReturn};
use crate::domain::events;
use crate::{Id, Session, StorefrontError};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutOutcome {
    pub invoice: InvoiceView,
    /// Gateway page to send the shopper to; absent for cash on delivery.
    pub redirect_url: Option<String>,
}

pub async fn checkout(State(s): State<AppState>, auth: Bearer, ValidatedJson(form): ValidatedJson<CheckoutForm>) -> AppResult<(StatusCode, Json<CheckoutOutcome>)> {
    let session = auth.session(&s.api);
    if session.cart().await?.is_empty() {
        return Err(StorefrontError::EmptyCart);
    }

    // The shopper's pick decides the gateway; the invoice reply may not echo it.
    let method = form.payment_method;
    let mut invoice = session.place_invoice(&form.normalized()).await?;
    invoice.payment_method = method;
    placed_event(&invoice).log();

    let redirect_url = match method.gateway() {
        None => None,
        Some(gateway) => {
            let return_url = format!("{}/payment/{}-return", s.config.public_url, gateway.to_lowercase());
            let payment = CreatePayment { invoice_id: invoice.id, amount: invoice.total().amount(), return_url };
            Some(session.create_payment(gateway, &payment).await?.pay_url)
        }
    };
    Ok((StatusCode::CREATED, Json(CheckoutOutcome { invoice: invoice.view(Actor::Customer), redirect_url })))
}

pub async fn momo_return(State(s): State<AppState>, Query(params): Query<Vec<(String, String)>>) -> Redirect {
    finish_payment(&s, PaymentReturn::momo(params)).await
}

pub async fn vnpay_return(State(s): State<AppState>, Query(params): Query<Vec<(String, String)>>) -> Redirect {
    finish_payment(&s, PaymentReturn::vnpay(params)).await
}

/// Successful returns are forwarded upstream for verification; failed ones
/// go straight to the failure page.
async fn finish_payment(s: &AppState, ret: PaymentReturn) -> Redirect {
    ret.event().log();
    let frontend = &s.config.frontend_url;
    if !ret.is_success() {
        return failure_redirect(frontend, &ret.failure_reason());
    }
    match s.api.confirm_payment_return(&ret).await {
        Ok(()) => {
            let invoice = ret.invoice_id().map(|id| id.to_string()).unwrap_or_default();
            redirect_with(frontend, "/checkout/success", &[("invoiceId", &invoice)])
        }
        Err(e) => {
            tracing::error!(error = %e, invoice_id = ?ret.invoice_id(), "payment confirmation rejected");
            failure_redirect(frontend, &e.to_string())
        }
    }
}

fn failure_redirect(frontend: &str, reason: &str) -> Redirect {
    redirect_with(frontend, "/checkout/failure", &[("reason", reason)])
}

fn redirect_with(frontend: &str, path: &str, params: &[(&str, &str)]) -> Redirect {
    let target = format!("{frontend}{path}");
    match reqwest::Url::parse_with_params(&target, params) {
        Ok(url) => Redirect::to(url.as_str()),
        Err(e) => {
            tracing::warn!(error = %e, url = %target, "invalid redirect target");
            Redirect::to(path)
        }
    }
}

pub async fn my_orders(State(s): State<AppState>, auth: Bearer) -> AppResult<Json<Vec<InvoiceView>>> {
    let invoices = auth.session(&s.api).my_invoices().await?;
    Ok(Json(invoices.iter().map(|i| i.view(Actor::Customer)).collect()))
}

pub async fn cancel_order(State(s): State<AppState>, auth: Bearer, Path(id): Path<Id>) -> AppResult<Json<InvoiceView>> {
    change_status(auth.session(&s.api), id, InvoiceStatus::Cancelled, Actor::Customer).await.map(Json)
}

pub async fn confirm_received(State(s): State<AppState>, auth: Bearer, Path(id): Path<Id>) -> AppResult<Json<InvoiceView>> {
    change_status(auth.session(&s.api), id, InvoiceStatus::Received, Actor::Customer).await.map(Json)
}

/// Checks the move locally first; a move the lifecycle forbids never reaches the upstream.
pub(crate) async fn change_status(session: Session<'_>, id: Id, to: InvoiceStatus, actor: Actor) -> AppResult<InvoiceView> {
    let mut invoice = session.invoice(id).await?;
    invoice.transition(to, actor)?;
    session.set_invoice_status(id, to).await?;
    events::log_all(invoice.take_events());
    Ok(invoice.view(actor))
}
