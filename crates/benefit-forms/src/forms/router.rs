use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::assembler::MissingDocument;
use super::catalog::{BenefitCatalog, CatalogError, SubmissionGateway, SubmissionReceipt};
use super::domain::WalletDocument;
use super::service::{ApplicantContext, BenefitFormService, FormServiceError};

/// Router builder exposing schema compilation and application submission.
pub fn benefit_form_router<C, G>(service: Arc<BenefitFormService<C, G>>) -> Router
where
    C: BenefitCatalog + 'static,
    G: SubmissionGateway + 'static,
{
    Router::new()
        .route(
            "/api/v1/benefits/:benefit_id/schema",
            post(schema_handler::<C, G>),
        )
        .route(
            "/api/v1/benefits/:benefit_id/applications",
            post(submit_handler::<C, G>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SchemaRequest {
    #[serde(default)]
    pub(crate) wallet: Vec<WalletDocument>,
    #[serde(default)]
    pub(crate) prefill: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SchemaResponse {
    pub(crate) schema: Value,
    pub(crate) ui_schema: Value,
    pub(crate) form_data: Map<String, Value>,
    pub(crate) missing_documents: Vec<MissingDocument>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitRequest {
    pub(crate) form_data: Map<String, Value>,
    #[serde(default)]
    pub(crate) wallet: Vec<WalletDocument>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmitResponse {
    pub(crate) receipt: SubmissionReceipt,
}

pub(crate) async fn schema_handler<C, G>(
    State(service): State<Arc<BenefitFormService<C, G>>>,
    Path(benefit_id): Path<String>,
    axum::Json(request): axum::Json<SchemaRequest>,
) -> Response
where
    C: BenefitCatalog + 'static,
    G: SubmissionGateway + 'static,
{
    let applicant = ApplicantContext {
        wallet: request.wallet,
        profile: request.prefill,
    };

    match service.compile(&benefit_id, &applicant) {
        Ok(view) => {
            let body = SchemaResponse {
                schema: view.form.schema_value(),
                ui_schema: view.form.ui_value(),
                form_data: view.prefill,
                missing_documents: view.missing_documents,
            };
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_handler<C, G>(
    State(service): State<Arc<BenefitFormService<C, G>>>,
    Path(benefit_id): Path<String>,
    axum::Json(request): axum::Json<SubmitRequest>,
) -> Response
where
    C: BenefitCatalog + 'static,
    G: SubmissionGateway + 'static,
{
    let applicant = ApplicantContext {
        wallet: request.wallet,
        profile: Map::new(),
    };

    match service.submit(&benefit_id, &applicant, &request.form_data) {
        Ok(receipt) => (StatusCode::ACCEPTED, axum::Json(SubmitResponse { receipt })).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: FormServiceError) -> Response {
    let status = match &error {
        FormServiceError::Catalog(CatalogError::UnknownBenefit(_)) => StatusCode::NOT_FOUND,
        FormServiceError::Catalog(CatalogError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
        FormServiceError::Submission(_) => StatusCode::UNPROCESSABLE_ENTITY,
        FormServiceError::Gateway(_) => StatusCode::BAD_GATEWAY,
    };

    let body = json!({ "error": error.to_string() });
    (status, axum::Json(body)).into_response()
}
