use serde::Serialize;

#[derive(Default, Serialize)]
pub struct SimpleResponse {
    pub success: bool,
    pub err: String,
}

impl SimpleResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            err: "".to_string(),
        }
    }
}

#[derive(Default, Serialize)]
pub struct CreatedResponse {
    pub success: bool,
    pub err: String,
    pub id: String,
}

impl CreatedResponse {
    pub fn ok(id: String) -> Self {
        Self {
            success: true,
            err: "".to_string(),
            id,
        }
    }
}

#[derive(Default, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub err: String,
    pub url: String,
}

impl UploadResponse {
    pub fn ok(url: String) -> Self {
        Self {
            success: true,
            err: "".to_string(),
            url,
        }
    }
}

#[macro_export]
macro_rules! impl_err_response {
    ( $( $type:ty),+ $(,)? ) => {
        $(
            impl $type {
                pub fn err<S: ToString>(err: S) -> Self {
                    Self {
                        success: false,
                        err: err.to_string(),
                        ..Default::default()
                    }
                }
            }
        )+
    };
}

impl_err_response! {
    SimpleResponse,
    CreatedResponse,
    UploadResponse,
}
