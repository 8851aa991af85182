use serde::Serialize;

pub mod contact;

#[derive(Serialize)]
pub struct ApiError<'a> {
    pub error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<&'a str>,
}

#[derive(Serialize)]
pub struct ApiOk {
    pub ok: bool,
}
