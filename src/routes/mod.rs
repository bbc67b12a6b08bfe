pub mod access;
pub mod auth;
pub mod description_lists;
pub mod descriptions;
pub mod health;
pub mod task_categories;
pub mod tasks;
pub mod users;

use actix_web::{error, web, HttpRequest};

use crate::error::AppError;

fn malformed(err: impl std::fmt::Display, req: &HttpRequest) -> actix_web::Error {
    log::debug!("Rejected malformed request to {}: {}", req.path(), err);
    AppError::BadRequest(err.to_string()).into()
}

/// Registers every route of the service.
///
/// The application must also carry `web::Data<SqlitePool>` and `web::Data<TokenService>`.
/// Within each scope the literal paths are registered before the `{id}` patterns.
pub fn config(cfg: &mut web::ServiceConfig) {
    let json = web::JsonConfig::default()
        .error_handler(|err: error::JsonPayloadError, req| malformed(err, req));
    let form = web::FormConfig::default()
        .error_handler(|err: error::UrlencodedError, req| malformed(err, req));
    let query = web::QueryConfig::default()
        .error_handler(|err: error::QueryPayloadError, req| malformed(err, req));
    let path =
        web::PathConfig::default().error_handler(|err: error::PathError, req| malformed(err, req));

    cfg.app_data(json)
        .app_data(form)
        .app_data(query)
        .app_data(path)
        .service(health::health)
        .service(
            web::scope("/api")
                .service(health::root)
                .service(web::scope("/authorize").service(auth::login_for_access_token))
                .service(
                    web::scope("/users")
                        .service(users::get_users)
                        .service(users::login_user)
                        .service(users::create_user)
                        .service(users::get_me),
                )
                .service(
                    web::scope("/taskcategories")
                        .service(task_categories::get_task_categories)
                        .service(task_categories::create_task_category)
                        .service(task_categories::get_task_category)
                        .service(task_categories::update_task_category)
                        .service(task_categories::delete_task_category),
                )
                .service(
                    web::scope("/tasks")
                        .service(tasks::get_template_tasks)
                        .service(tasks::create_task)
                        .service(tasks::get_user_tasks)
                        .service(tasks::delete_user_task)
                        .service(tasks::copy_task_for_user)
                        .service(tasks::get_user_task)
                        .service(tasks::get_template_task)
                        .service(tasks::update_task)
                        .service(description_lists::get_user_task_lists)
                        .service(description_lists::get_template_task_lists)
                        .service(description_lists::create_description_list),
                )
                .service(
                    web::scope("/descriptionlists")
                        .service(description_lists::get_user_list)
                        .service(description_lists::get_template_list)
                        .service(description_lists::update_description_list)
                        .service(description_lists::delete_description_list)
                        .service(descriptions::get_user_list_descriptions)
                        .service(descriptions::get_template_list_descriptions)
                        .service(descriptions::create_description),
                )
                .service(
                    web::scope("/descriptions")
                        .service(descriptions::update_description)
                        .service(descriptions::delete_description),
                ),
        );
}
