/*!
 * 班主任访问控制中间件
 *
 * 必须放在 RequireJWT 之后，用于 `/classrooms/{id}/...` 下修改名单的路由。
 * 管理员直接放行；教师须是路径中班级的班主任，否则返回 403。
 *
 * ```rust,ignore
 * web::resource("/{id}/students")
 *     .route(web::post().to(add_student).wrap(RequireHomeroom))
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, warn};

use crate::{
    errors::Result,
    models::{ErrorCode, classrooms::entities::Classroom, users::entities::User},
    storage::Storage,
};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireHomeroom;

enum HomeroomCheck {
    Allowed,
    ClassroomMissing,
    Denied,
}

// 账号是否为该班级班主任
async fn check_homeroom(
    storage: &Arc<dyn Storage>,
    user: &User,
    classroom_id: i64,
) -> Result<HomeroomCheck> {
    let Some(classroom) = storage.get_classroom_by_id(classroom_id).await? else {
        return Ok(HomeroomCheck::ClassroomMissing);
    };
    if user.is_admin() {
        return Ok(HomeroomCheck::Allowed);
    }
    let teacher = storage.get_teacher_by_user_id(user.id).await?;
    Ok(match teacher {
        Some(t) if is_homeroom_of(&classroom, t.id) => HomeroomCheck::Allowed,
        _ => HomeroomCheck::Denied,
    })
}

fn reject<B>(
    req: ServiceRequest,
    status: StatusCode,
    code: ErrorCode,
    message: &str,
) -> std::result::Result<ServiceResponse<EitherBody<B>>, Error> {
    Ok(req.into_response(create_error_response(status, code, message).map_into_right_body()))
}

pub(crate) fn is_homeroom_of(classroom: &Classroom, teacher_id: i64) -> bool {
    classroom.homeroom_teacher_id == Some(teacher_id)
}

impl<S, B> Transform<S, ServiceRequest> for RequireHomeroom
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireHomeroomMiddleware<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireHomeroomMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireHomeroomMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireHomeroomMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<std::result::Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();

        Box::pin(async move {
            let user = req.extensions().get::<User>().cloned();
            let Some(user) = user else {
                return reject(
                    req,
                    StatusCode::UNAUTHORIZED,
                    ErrorCode::Unauthorized,
                    "Authentication required",
                );
            };

            let Some(classroom_id) = req
                .match_info()
                .get("id")
                .and_then(|s| s.parse::<i64>().ok())
                .filter(|id| *id > 0)
            else {
                return reject(
                    req,
                    StatusCode::BAD_REQUEST,
                    ErrorCode::BadRequest,
                    "Missing or invalid classroom id",
                );
            };

            let Some(storage) = req
                .app_data::<web::Data<Arc<dyn Storage>>>()
                .map(|data| data.get_ref().clone())
            else {
                return reject(
                    req,
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::InternalServerError,
                    "Storage not configured",
                );
            };

            match check_homeroom(&storage, &user, classroom_id).await {
                Ok(HomeroomCheck::Allowed) => {
                    debug!("User {} may manage classroom {}", user.id, classroom_id);
                    Ok(srv.call(req).await?.map_into_left_body())
                }
                Ok(HomeroomCheck::ClassroomMissing) => reject(
                    req,
                    StatusCode::NOT_FOUND,
                    ErrorCode::ClassroomNotFound,
                    "Classroom not found",
                ),
                Ok(HomeroomCheck::Denied) => reject(
                    req,
                    StatusCode::FORBIDDEN,
                    ErrorCode::ClassroomPermissionDenied,
                    "Only the homeroom teacher can manage this classroom",
                ),
                Err(e) => {
                    warn!("Homeroom check failed for classroom {}: {}", classroom_id, e);
                    reject(
                        req,
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorCode::InternalServerError,
                        "Internal server error",
                    )
                }
            }
        })
    }
}
