//! OpenAPI document for the Claimdesk API.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use claimdesk_core::{
    ChangeLogEntry, Claim, Envelope, UserAccount, UserRole,
};

use crate::error::{ApiError, ErrorCode};
use crate::routes::health::HealthResponse;
use crate::types::{
    CreateUserRequest, LoginRequest, LoginResponse, UpdateClaimRequest, UpdateUserRequest,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::claim::list_claims,
        crate::routes::claim::get_claim,
        crate::routes::claim::update_claim,
        crate::routes::history::claim_history,
        crate::routes::history::history_all,
        crate::routes::user::login,
        crate::routes::user::list_users,
        crate::routes::user::create_user,
        crate::routes::user::update_user,
        crate::routes::user::delete_user,
        crate::routes::health::health,
    ),
    components(schemas(
        Claim,
        ChangeLogEntry,
        UserAccount,
        UserRole,
        Envelope<Claim>,
        Envelope<Vec<Claim>>,
        Envelope<Vec<ChangeLogEntry>>,
        Envelope<UserAccount>,
        Envelope<Vec<UserAccount>>,
        Envelope<LoginResponse>,
        UpdateClaimRequest,
        LoginRequest,
        LoginResponse,
        CreateUserRequest,
        UpdateUserRequest,
        ApiError,
        ErrorCode,
        HealthResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "Claims", description = "Claim search and field-level updates"),
        (name = "History", description = "Per-field change-log views"),
        (name = "Users", description = "Login and account management"),
        (name = "Health", description = "Service health"),
    ),
    info(
        title = "Claimdesk API",
        description = "REST API for billing-claims administration"
    )
)]
pub struct ApiDoc;

/// Registers the bearer-token security scheme.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_builds() {
        let doc = ApiDoc::openapi();
        let json = doc.to_json().expect("document serializes");
        assert!(json.contains("/api/claims/{id}/history"));
        assert!(json.contains("bearer_auth"));
    }
}
