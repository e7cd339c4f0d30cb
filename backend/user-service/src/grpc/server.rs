use tonic::{Request, Response, Status};

use storefront_common::{ServiceError, User, UserCreate, UserRepository};

// Generated protobuf code (from backend/proto/services/user_service.proto)
pub mod proto {
    tonic::include_proto!("storefront.user_service.v1");
}

use proto::user_service_server::{UserService, UserServiceServer};
use proto::*;

impl From<User> for proto::User {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

#[derive(Clone)]
pub struct UserServiceImpl {
    users: UserRepository,
}

impl UserServiceImpl {
    pub fn new(users: UserRepository) -> Self {
        Self { users }
    }

    pub fn into_server(self) -> UserServiceServer<Self> {
        UserServiceServer::new(self)
    }
}

#[tonic::async_trait]
impl UserService for UserServiceImpl {
    async fn create_user(
        &self,
        request: Request<UserCreateRequest>,
    ) -> Result<Response<proto::User>, Status> {
        let req = request.into_inner();
        if req.name.is_empty() {
            return Err(ServiceError::missing_field("name").into());
        }
        if req.email.is_empty() {
            return Err(ServiceError::missing_field("email").into());
        }

        let user = self
            .users
            .create(UserCreate {
                name: req.name,
                email: req.email,
            })
            .await;

        Ok(Response::new(user.into()))
    }

    async fn get_user(
        &self,
        request: Request<GetUserRequest>,
    ) -> Result<Response<proto::User>, Status> {
        let req = request.into_inner();
        let user = self
            .users
            .get(&req.user_id)
            .await
            .ok_or_else(|| ServiceError::NotFound("User".to_string()))?;

        Ok(Response::new(user.into()))
    }

    async fn list_users(
        &self,
        _request: Request<ListUsersRequest>,
    ) -> Result<Response<ListUsersResponse>, Status> {
        let users: Vec<proto::User> = self
            .users
            .list_all()
            .await
            .into_iter()
            .map(Into::into)
            .collect();
        tracing::info!(count = users.len(), "listed users via gRPC");

        Ok(Response::new(ListUsersResponse { users }))
    }

    async fn user_exists(
        &self,
        request: Request<UserExistsRequest>,
    ) -> Result<Response<UserExistsResponse>, Status> {
        let req = request.into_inner();
        let exists = self.users.contains(&req.user_id).await;
        tracing::info!(user_id = %req.user_id, exists, "checked user existence via gRPC");

        Ok(Response::new(UserExistsResponse { exists }))
    }
}
