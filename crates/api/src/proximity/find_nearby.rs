use crate::error::CouponError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use coupon_ledger_api_structs::find_nearby::*;
use coupon_ledger_domain::{
    proximity::rank_nearby, ProximityQuery, ProximityQueryError, RankedCollaborator,
};
use coupon_ledger_infra::CouponContext;

pub async fn find_nearby_controller(
    query: web::Query<QueryParams>,
    ctx: web::Data<CouponContext>,
) -> Result<HttpResponse, CouponError> {
    let usecase = FindNearbyUseCase {
        lat: query.lat,
        lon: query.lon,
        radius_km: query.radius,
    };

    execute(usecase, &ctx)
        .await
        .map(|ranked| HttpResponse::Ok().json(APIResponse::new(ranked)))
        .map_err(CouponError::from)
}

#[derive(Debug)]
pub struct FindNearbyUseCase {
    pub lat: f64,
    pub lon: f64,
    pub radius_km: Option<f64>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    StorageError,
    InvalidQuery(ProximityQueryError),
}

impl From<UseCaseError> for CouponError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
            UseCaseError::InvalidQuery(e) => Self::BadClientData(e.to_string()),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for FindNearbyUseCase {
    type Response = Vec<RankedCollaborator>;
    type Error = UseCaseError;

    const NAME: &'static str = "FindNearby";

    async fn execute(&mut self, ctx: &CouponContext) -> Result<Self::Response, Self::Error> {
        let query = ProximityQuery::new(self.lat, self.lon, self.radius_km)
            .map_err(UseCaseError::InvalidQuery)?;

        let collaborators = ctx
            .repos
            .collaborator_repo
            .find_all_with_branches()
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(rank_nearby(&query, collaborators))
    }
}
