use std::sync::Arc;
use poem::handler;
use poem::web::{Data, Form, Json, Path, Query, Redirect};
use crate::errors::ServiceError;
use crate::services::{validation, DirectoryService};
use crate::types::dto::records::{EditRecordPayload, NewRecordPayload, RecordResponse};
use crate::types::internal::auth::AuthenticatedUser;
use super::{redirect_with_message, MessageQuery};

/// List active records; no auth, directory browsing is public
#[handler]
pub async fn list_users(
    Data(service): Data<&Arc<DirectoryService>>,
) -> poem::Result<Json<Vec<RecordResponse>>> {
    let records = service.list_records().await?;
    Ok(Json(records.into_iter().map(RecordResponse::from).collect()))
}

/// Record detail by id, reachable in any deletion state; no auth
#[handler]
pub async fn about_user(
    Data(service): Data<&Arc<DirectoryService>>,
    Path(id): Path<String>,
) -> poem::Result<Json<RecordResponse>> {
    let record = service.record_detail(&id).await?;
    Ok(Json(record.into()))
}

/// Soft delete a record; a missing id is a success like any other
#[handler]
pub async fn delete_user(
    Data(service): Data<&Arc<DirectoryService>>,
    Path(id): Path<String>,
) -> poem::Result<Redirect> {
    service.delete_record(&id).await?;
    Ok(redirect_with_message("/users", "User deleted."))
}

/// Record-creation form placeholder; sits behind the auth gate
#[handler]
pub async fn add_user_form(
    Data(user): Data<&AuthenticatedUser>,
    Query(query): Query<MessageQuery>,
) -> String {
    match query.message {
        Some(message) => format!("Add user (signed in as {})\n{}", user.username, message),
        None => format!("Add user (signed in as {})", user.username),
    }
}

/// Create a directory record
#[handler]
pub async fn new_user(
    Data(service): Data<&Arc<DirectoryService>>,
    Form(payload): Form<NewRecordPayload>,
) -> poem::Result<Redirect> {
    if let Err(message) = validation::validate(&validation::new_record_rules(), &payload.fields())
    {
        return Ok(redirect_with_message("/users/add-user", message));
    }

    match service.create_record(&payload.name, &payload.email).await {
        Ok(_) => Ok(redirect_with_message("/users", "User added.")),
        Err(ServiceError::Conflict(message)) => {
            Ok(redirect_with_message("/users/add-user", &message))
        }
        Err(err) => Err(err.into()),
    }
}

/// Edit form data source: the record to edit, 404 if the id is unknown
#[handler]
pub async fn edit_form(
    Data(service): Data<&Arc<DirectoryService>>,
    Path(id): Path<String>,
) -> poem::Result<Json<RecordResponse>> {
    let record = service.record_detail(&id).await?;
    Ok(Json(record.into()))
}

/// Replace a record's email
#[handler]
pub async fn edit_detail(
    Data(service): Data<&Arc<DirectoryService>>,
    Form(payload): Form<EditRecordPayload>,
) -> poem::Result<Redirect> {
    if let Err(message) = validation::validate(&validation::edit_record_rules(), &payload.fields())
    {
        let edit_view = format!("/users/edit/{}", payload.id);
        return Ok(redirect_with_message(&edit_view, message));
    }

    match service.edit_record_email(&payload.id, &payload.email).await {
        Ok(_) => Ok(redirect_with_message("/users", "User details updated.")),
        Err(ServiceError::Conflict(message)) => {
            let edit_view = format!("/users/edit/{}", payload.id);
            Ok(redirect_with_message(&edit_view, &message))
        }
        Err(err) => Err(err.into()),
    }
}
