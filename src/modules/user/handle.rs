use actix_web::{post, web};

use crate::api::{error, success};
use crate::modules::user::{model, service::UserService};
use crate::utils::ValidatedJson;

#[post("/signup")]
pub async fn sign_up(
    user_service: web::Data<UserService>,
    user_data: ValidatedJson<model::SignUpModel>,
) -> Result<success::Success<()>, error::Error> {
    user_service.sign_up(user_data.0).await?;
    Ok(success::Success::ok(None).message("User created successfully"))
}

#[post("/login")]
pub async fn sign_in(
    user_service: web::Data<UserService>,
    user_data: ValidatedJson<model::SignInModel>,
) -> Result<success::Success<model::SignInResponse>, error::Error> {
    let token = user_service.sign_in(user_data.0).await?;
    Ok(success::Success::ok(Some(model::SignInResponse { token }))
        .message("Authentication successful"))
}
