use tracing::warn;
use uuid::Uuid;

use crate::database::models::{CartItem, Product};
use crate::services::error::ServiceError;

/// An entity with a single owning user
pub trait Owned {
    fn owner_id(&self) -> Uuid;
}

impl Owned for CartItem {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

impl Owned for Product {
    fn owner_id(&self) -> Uuid {
        self.seller_id
    }
}

/// Check a fetched entity against the acting user.
///
/// Absence wins over ownership: a missing entity reports `not_found` whatever
/// the actor, so nonexistent ids never reveal authorization details.
pub fn ensure_owner<T: Owned>(entity: Option<T>, actor_id: Uuid, not_found: ServiceError) -> Result<T, ServiceError> {
    let entity = entity.ok_or(not_found)?;
    if entity.owner_id() != actor_id {
        warn!(actor_id = %actor_id, owner_id = %entity.owner_id(), "ownership check failed");
        return Err(ServiceError::Unauthorized);
    }
    Ok(entity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(owner: Uuid) -> CartItem {
        CartItem {
            id: Uuid::new_v4(),
            user_id: owner,
            product_id: Uuid::new_v4(),
            quantity: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn owner_passes() {
        let owner = Uuid::new_v4();
        let checked = ensure_owner(Some(item(owner)), owner, ServiceError::ItemNotFound).unwrap();
        assert_eq!(checked.user_id, owner);
    }

    #[test]
    fn other_user_is_unauthorized() {
        let err = ensure_owner(Some(item(Uuid::new_v4())), Uuid::new_v4(), ServiceError::ItemNotFound).unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized));
    }

    #[test]
    fn missing_entity_reports_not_found_for_any_actor() {
        let err = ensure_owner::<CartItem>(None, Uuid::new_v4(), ServiceError::ItemNotFound).unwrap_err();
        assert!(matches!(err, ServiceError::ItemNotFound));
    }
}
