use axum::extract::rejection::QueryRejection;
use axum::extract::{FromRequestParts, Query as AxumQuery};
use axum::http::request::Parts;
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;

use crate::handler::{Error, ErrorKind};

/// [`axum::extract::Query`] with readable rejections.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct Query<T>(pub T);

impl<T> Query<T> {
    /// Returns the inner query parameters.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match AxumQuery::<T>::from_request_parts(parts, state).await {
            Ok(AxumQuery(query)) => Ok(Query(query)),
            Err(rejection) => Err(query_error(rejection)),
        }
    }
}

fn query_error(rejection: QueryRejection) -> Error<'static> {
    tracing::debug!(
        target: "portal_server::extract::query",
        error = %rejection,
        "Query parameter parsing failed"
    );

    let QueryRejection::FailedToDeserializeQueryString(err) = rejection else {
        return ErrorKind::BadRequest.with_message("Invalid query parameters");
    };

    let error_message = err.body_text();
    match field_name(&error_message) {
        Some(field) if error_message.contains("missing field") => ErrorKind::BadRequest
            .with_message(format!("Missing required query parameter '{field}'")),
        Some(field) if error_message.contains("duplicate field") => ErrorKind::BadRequest
            .with_message(format!("Query parameter '{field}' was provided more than once")),
        _ => ErrorKind::BadRequest
            .with_message("Invalid query parameters")
            .with_context(error_message),
    }
}

/// Extracts the backquoted field name from a serde error message.
fn field_name(error_message: &str) -> Option<String> {
    let start = error_message.find('`')? + 1;
    let end = error_message[start..].find('`')?;
    Some(error_message[start..start + end].to_owned())
}

impl<T> aide::OperationInput for Query<T>
where
    T: schemars::JsonSchema,
{
    fn operation_input(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) {
        AxumQuery::<T>::operation_input(ctx, operation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_name_is_read_from_backquotes() {
        assert_eq!(
            field_name("Failed to deserialize query string: missing field `code`"),
            Some("code".to_owned())
        );
        assert_eq!(field_name("no field here"), None);
    }
}
