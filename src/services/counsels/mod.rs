pub mod list;
pub mod manage;

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::errors::Result;
use crate::models::counsels::{
    entities::Counsel,
    requests::{CounselListParams, CreateCounselRequest, UpdateCounselRequest},
};
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_teacher;
use crate::storage::Storage;

crate::services::define_service!(
    /// 学生咨询记录
    ///
    /// 非共享记录只有撰写教师与管理员可见，修改与删除限撰写教师或管理员。
    CounselService
);

impl CounselService {
    pub async fn list_counsels(
        &self,
        request: &HttpRequest,
        query: CounselListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_counsels(self, request, query).await
    }

    pub async fn get_counsel(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        list::get_counsel(self, request, id).await
    }

    pub async fn create_counsel(
        &self,
        request: &HttpRequest,
        body: CreateCounselRequest,
    ) -> ActixResult<HttpResponse> {
        manage::create_counsel(self, request, body).await
    }

    pub async fn update_counsel(
        &self,
        request: &HttpRequest,
        id: i64,
        body: UpdateCounselRequest,
    ) -> ActixResult<HttpResponse> {
        manage::update_counsel(self, request, id, body).await
    }

    pub async fn delete_counsel(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        manage::delete_counsel(self, request, id).await
    }
}

/// 查看者身份：管理员不受可见性限制，教师以教师档案ID区分
pub(crate) enum Viewer {
    Admin,
    Teacher(Option<i64>),
}

impl Viewer {
    pub(crate) async fn resolve(storage: &Arc<dyn Storage>, user: &User) -> Result<Self> {
        if user.is_admin() {
            return Ok(Viewer::Admin);
        }
        let teacher = current_teacher(storage, user).await?;
        Ok(Viewer::Teacher(teacher.map(|t| t.id)))
    }

    /// 列表过滤用的教师ID；没有教师档案的账号只能看到共享记录
    pub(crate) fn visibility_filter(&self) -> Option<i64> {
        match self {
            Viewer::Admin => None,
            Viewer::Teacher(id) => Some(id.unwrap_or(0)),
        }
    }

    pub(crate) fn is_author(&self, counsel: &Counsel) -> bool {
        matches!(self, Viewer::Teacher(Some(id)) if *id == counsel.teacher_id)
    }

    pub(crate) fn can_view(&self, counsel: &Counsel) -> bool {
        matches!(self, Viewer::Admin) || counsel.is_shared || self.is_author(counsel)
    }

    pub(crate) fn can_modify(&self, counsel: &Counsel) -> bool {
        matches!(self, Viewer::Admin) || self.is_author(counsel)
    }
}

fn counsel_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::CounselNotFound,
        "Counsel record not found",
    ))
}
