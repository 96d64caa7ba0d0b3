use async_graphql::Context;

use crate::{
    auth::Claims,
    errors::{AppError, AppResult},
};

pub fn require_owner_or_admin(claims: &Claims, resource_owner: &str) -> AppResult<()> {
    if !claims.is_admin() && claims.sub != resource_owner {
        return Err(AppError::Unauthorized(
            "You can only access your own resources".to_string(),
        ));
    }
    Ok(())
}

/// User whose answers a caller may list. Admins may list anyone's, everybody else only their own.
pub fn answer_listing_owner(claims: &Claims) -> Option<&str> {
    if claims.is_admin() {
        None
    } else {
        Some(claims.sub.as_str())
    }
}

pub fn extract_claims_from_context(ctx: &Context<'_>) -> AppResult<Claims> {
    ctx.data::<Claims>()
        .cloned()
        .map_err(|_| AppError::Unauthorized("Authentication required".to_string()))
}
