use actix_web::{web, HttpRequest, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::contact::{
        ContactListQuery, ContactMutationResponse, ContactResponse, NewContactForm, ReplyRequest,
        UpdateContactStatusRequest,
    },
    errors::AppError,
    utils::get_client_ip::request_origin,
    AppState,
};

#[instrument(skip(req, state, form))]
pub async fn submit_contact(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: web::Json<NewContactForm>,
) -> Result<impl Responder, AppError> {
    let origin = request_origin(&req, state.trust_forwarded_for);
    let response = state
        .contacts()?
        .submit_contact(form.into_inner(), origin)
        .await?;
    Ok(HttpResponse::Created().json(response))
}

#[instrument(skip(state, query))]
pub async fn list_contacts(
    state: web::Data<AppState>,
    query: web::Query<ContactListQuery>,
) -> Result<impl Responder, AppError> {
    let response = state.contacts()?.list_contacts(&query).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[instrument(skip(state))]
pub async fn get_contact(
    contact_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let contact = state.contacts()?.get_contact(&contact_id).await?;
    Ok(HttpResponse::Ok().json(ContactResponse { contact }))
}

#[instrument(skip(state, data))]
pub async fn update_contact_status(
    contact_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<UpdateContactStatusRequest>,
) -> Result<impl Responder, AppError> {
    let contact = state
        .contacts()?
        .update_status(&contact_id, data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ContactMutationResponse {
        message: "Contact status updated successfully".to_string(),
        contact,
    }))
}

#[instrument(skip(state, data))]
pub async fn reply_to_contact(
    contact_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<ReplyRequest>,
) -> Result<impl Responder, AppError> {
    let contact = state
        .contacts()?
        .reply_to_contact(&contact_id, data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ContactMutationResponse {
        message: "Reply sent successfully".to_string(),
        contact,
    }))
}

#[instrument(skip(state))]
pub async fn delete_contact(
    contact_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.contacts()?.delete_contact(&contact_id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Contact deleted successfully"
    })))
}

#[instrument(skip(state))]
pub async fn contact_stats(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let stats = state.contacts()?.contact_stats().await?;
    Ok(HttpResponse::Ok().json(stats))
}
