use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::database::models::User;
use crate::database::{build_update_params, FieldWhitelist, QueryExecutor, SqlParam};
use crate::services::error::ServiceError;

/// Profile fields a user may change, in `users/updateUserById` parameter order
pub const USER_UPDATE_FIELDS: FieldWhitelist = FieldWhitelist::new(&["firstname", "lastname", "email"]);

#[derive(Debug, Clone)]
pub struct UserQueries {
    pub get_by_id: &'static str,
    pub update: &'static str,
}

impl Default for UserQueries {
    fn default() -> Self {
        Self {
            get_by_id: "users/getUserById",
            update: "users/updateUserById",
        }
    }
}

#[derive(Clone)]
pub struct UserService {
    db: Arc<dyn QueryExecutor>,
    queries: Arc<UserQueries>,
}

impl UserService {
    pub fn new(db: Arc<dyn QueryExecutor>) -> Self {
        Self::with_queries(db, UserQueries::default())
    }

    pub fn with_queries(db: Arc<dyn QueryExecutor>, queries: UserQueries) -> Self {
        Self {
            db,
            queries: Arc::new(queries),
        }
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, user_id: Uuid) -> Result<User, ServiceError> {
        self.db
            .execute(self.queries.get_by_id, vec![SqlParam::value(user_id.to_string())])
            .await?
            .first()?
            .ok_or(ServiceError::UserNotFound)
    }

    /// Users edit only their own profile. The identity check needs no fetch:
    /// the target id is the ownership key.
    #[instrument(skip(self, patch))]
    pub async fn update_user(&self, actor_id: Uuid, user_id: Uuid, patch: &Map<String, Value>) -> Result<User, ServiceError> {
        if actor_id != user_id {
            warn!(actor_id = %actor_id, "refused profile update of another user");
            return Err(ServiceError::Unauthorized);
        }

        let params = build_update_params(user_id.to_string(), &USER_UPDATE_FIELDS, patch);
        let user: User = self
            .db
            .execute(self.queries.update, params)
            .await?
            .first()?
            .ok_or(ServiceError::UserNotFound)?;

        info!(user_id = %user.id, "user updated");
        Ok(user)
    }
}
