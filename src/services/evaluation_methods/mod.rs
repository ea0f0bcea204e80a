pub mod create;
pub mod delete;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::evaluation_methods::requests::{
    CreateEvaluationMethodRequest, EvaluationMethodListParams, UpdateEvaluationMethodRequest,
};

crate::services::define_service!(
    /// 评价方式管理
    EvaluationMethodService
);

impl EvaluationMethodService {
    pub async fn list_evaluation_methods(
        &self,
        request: &HttpRequest,
        query: EvaluationMethodListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_evaluation_methods(self, request, query).await
    }

    pub async fn get_evaluation_method(
        &self,
        request: &HttpRequest,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        list::get_evaluation_method(self, request, id).await
    }

    pub async fn create_evaluation_method(
        &self,
        request: &HttpRequest,
        body: CreateEvaluationMethodRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_evaluation_method(self, request, body).await
    }

    pub async fn update_evaluation_method(
        &self,
        request: &HttpRequest,
        id: i64,
        body: UpdateEvaluationMethodRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_evaluation_method(self, request, id, body).await
    }

    pub async fn delete_evaluation_method(
        &self,
        request: &HttpRequest,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_evaluation_method(self, request, id).await
    }
}

/// 权重 (0, 100]，满分 > 0
pub(crate) fn validate_weight_and_full_score(weight: f64, full_score: f64) -> Result<(), &'static str> {
    if !weight.is_finite() || weight <= 0.0 || weight > 100.0 {
        return Err("Weight must be greater than 0 and at most 100");
    }
    if !full_score.is_finite() || full_score <= 0.0 {
        return Err("Full score must be greater than 0");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_bounds() {
        assert!(validate_weight_and_full_score(100.0, 50.0).is_ok());
        assert!(validate_weight_and_full_score(0.0, 50.0).is_err());
        assert!(validate_weight_and_full_score(100.5, 50.0).is_err());
        assert!(validate_weight_and_full_score(30.0, 0.0).is_err());
    }
}
