//! `/api/users` handlers.
//!
//! Fields come from the query string or a urlencoded form body. The query string
//! wins when both carry the same field, and the first occurrence of a repeated
//! field wins. Application-level failures answer 200 with `success:false`; store
//! failures answer 500 through [`ApiError`].
use axum::{
    async_trait,
    extract::{FromRequest, Query, Request, State},
    http::header,
    Form,
};
use models::{Hero, HeroPatch};
use service::errors::ServiceError;
use tracing::{debug, info};
use utoipa::IntoParams;

use crate::errors::{ApiError, ParamsRejection};
use crate::metrics;
use crate::response::{Action, ApiResponse, DATA_NOT_EXIST, MISSING_USER_ID};
use crate::routes::ServerState;

#[derive(Debug, Default, Clone, PartialEq, Eq, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HeroParams {
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub name_alias: Option<String>,
    pub company: Option<String>,
}

impl HeroParams {
    /// Keep the first value seen for each known field; unknown keys are ignored.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "user_id" => &mut params.user_id,
                "user_name" => &mut params.user_name,
                "name_alias" => &mut params.name_alias,
                "company" => &mut params.company,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        params
    }

    /// Record for an insert; omitted fields are stored empty.
    fn into_hero(self, user_id: String) -> Hero {
        Hero {
            user_id,
            user_name: self.user_name.unwrap_or_default(),
            name_alias: self.name_alias.unwrap_or_default(),
            company: self.company.unwrap_or_default(),
        }
    }

    fn into_patch(self) -> HeroPatch {
        HeroPatch { user_name: self.user_name, name_alias: self.name_alias, company: self.company }
    }
}

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"))
}

#[async_trait]
impl<S: Send + Sync> FromRequest<S> for HeroParams {
    type Rejection = ParamsRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Query(mut pairs) = Query::<Vec<(String, String)>>::try_from_uri(req.uri())
            .map_err(|e| ParamsRejection(e.body_text()))?;
        // any other body type is ignored, as if no body was sent
        if is_form(&req) {
            let Form(body) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| ParamsRejection(e.body_text()))?;
            pairs.extend(body);
        }
        Ok(Self::from_pairs(pairs))
    }
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    responses(
        (status = 200, description = "All heroes", body = crate::response::ApiResponse),
        (status = 500, description = "Store failure", body = crate::response::ApiResponse)
    )
)]
pub async fn list_users(State(state): State<ServerState>) -> Result<ApiResponse, ApiError> {
    let result = state.store.list_all().await;
    metrics::observe("list", &result);
    let heroes = result?;
    debug!(count = heroes.len(), "listed heroes");
    Ok(ApiResponse::data(heroes))
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    params(HeroParams),
    responses(
        (status = 200, description = "Inserted or overwritten", body = crate::response::ApiResponse),
        (status = 500, description = "Store failure", body = crate::response::ApiResponse)
    )
)]
pub async fn create_user(
    State(state): State<ServerState>,
    mut params: HeroParams,
) -> Result<ApiResponse, ApiError> {
    let Some(user_id) = params.user_id.take() else {
        return Ok(ApiResponse::failure(MISSING_USER_ID));
    };
    let result = state.store.put(params.into_hero(user_id.clone())).await;
    metrics::observe("insert", &result);
    result?;
    info!(%user_id, backend = %state.store.backend(), "hero inserted");
    Ok(ApiResponse::action(Action::Insert))
}

#[utoipa::path(
    put,
    path = "/api/users",
    tag = "users",
    params(HeroParams),
    responses(
        (status = 200, description = "Updated, or `success:false` when the hero does not exist", body = crate::response::ApiResponse),
        (status = 500, description = "Store failure", body = crate::response::ApiResponse)
    )
)]
pub async fn update_user(
    State(state): State<ServerState>,
    mut params: HeroParams,
) -> Result<ApiResponse, ApiError> {
    let Some(user_id) = params.user_id.take() else {
        return Ok(ApiResponse::failure(MISSING_USER_ID));
    };
    let result = state.store.patch(&user_id, params.into_patch()).await;
    metrics::observe("update", &result);
    match result {
        Ok(_) => {
            info!(%user_id, backend = %state.store.backend(), "hero updated");
            Ok(ApiResponse::action(Action::Update))
        }
        Err(ServiceError::NotFound(_)) => {
            debug!(%user_id, "update of missing hero");
            Ok(ApiResponse::failure(DATA_NOT_EXIST))
        }
        Err(e) => Err(e.into()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/users",
    tag = "users",
    params(HeroParams),
    responses(
        (status = 200, description = "Deleted, whether or not the hero existed", body = crate::response::ApiResponse),
        (status = 500, description = "Store failure", body = crate::response::ApiResponse)
    )
)]
pub async fn delete_user(
    State(state): State<ServerState>,
    params: HeroParams,
) -> Result<ApiResponse, ApiError> {
    let Some(user_id) = params.user_id else {
        return Ok(ApiResponse::failure(MISSING_USER_ID));
    };
    let result = state.store.delete(&user_id).await;
    metrics::observe("delete", &result);
    let existed = result?;
    info!(%user_id, existed, backend = %state.store.backend(), "hero deleted");
    Ok(ApiResponse::action(Action::Delete))
}
