use serde::Deserialize;

#[derive(Deserialize)]
/// Request payload for the source code delete endpoint.
/// The id arrives as the raw form value and is validated server-side.
pub struct DeleteSourceCodeRequest {
    pub id: String,
}
