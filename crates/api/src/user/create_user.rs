use crate::error::MingleError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use mingle_notify_api_structs::create_user::*;
use mingle_notify_domain::User;
use mingle_notify_infra::MingleContext;

pub async fn create_user_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<MingleContext>,
) -> Result<HttpResponse, MingleError> {
    let body = body.0;
    let usecase = CreateUserUseCase {
        username: body.username,
        full_name: body.full_name,
        email: body.email,
        segments: body.segments,
    };

    execute(usecase, &ctx)
        .await
        .map(|user| HttpResponse::Created().json(APIResponse::new(user)))
        .map_err(MingleError::from)
}

#[derive(Debug)]
pub struct CreateUserUseCase {
    pub username: String,
    pub full_name: String,
    pub email: Option<String>,
    pub segments: Vec<String>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    UsernameTaken(String),
    StorageError,
}

impl From<UseCaseError> for MingleError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::UsernameTaken(username) => Self::Conflict(format!(
                "A user with username: {}, already exists.",
                username
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateUserUseCase {
    type Response = User;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateUser";

    async fn execute(&mut self, ctx: &MingleContext) -> Result<Self::Response, Self::Error> {
        if ctx
            .repos
            .users
            .find_by_username(&self.username)
            .await
            .is_some()
        {
            return Err(UseCaseError::UsernameTaken(self.username.clone()));
        }

        let mut user = User::new(
            &self.username,
            &self.full_name,
            ctx.sys.get_timestamp_millis(),
        );
        user.email = self.email.clone();
        user.segments = self.segments.clone();

        ctx.repos
            .users
            .insert(&user)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(user)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use mingle_notify_infra::setup_context;

    #[actix_web::test]
    async fn creates_user() {
        let ctx = setup_context().await;
        let usecase = CreateUserUseCase {
            username: "ana".into(),
            full_name: "Ana Berg".into(),
            email: Some("ana@example.com".into()),
            segments: vec!["hosts".into()],
        };

        let res = execute(usecase, &ctx).await;
        assert!(res.is_ok());
        let user = res.unwrap();
        assert!(ctx.repos.users.find(&user.id).await.is_some());
    }

    #[actix_web::test]
    async fn rejects_duplicate_username() {
        let ctx = setup_context().await;
        let usecase = CreateUserUseCase {
            username: "ana".into(),
            full_name: "Ana Berg".into(),
            email: None,
            segments: vec![],
        };
        execute(usecase, &ctx).await.unwrap();

        let usecase = CreateUserUseCase {
            username: "ana".into(),
            full_name: "Another Ana".into(),
            email: None,
            segments: vec![],
        };
        let res = execute(usecase, &ctx).await;
        assert_eq!(res.unwrap_err(), UseCaseError::UsernameTaken("ana".into()));
    }
}
