use serde::Deserialize;

/// Form payload for user signup
///
/// Fields default to empty strings so that an absent form field is
/// reported by the validation gate as "required" rather than failing
/// deserialization.
#[derive(Debug, Deserialize)]
pub struct SignupPayload {
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub password: String,
}

impl SignupPayload {
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("username", self.username.as_str()),
            ("email", self.email.as_str()),
            ("password", self.password.as_str()),
        ]
    }
}

/// Form payload for user login
#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,
}

impl LoginPayload {
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("username", self.username.as_str()),
            ("password", self.password.as_str()),
        ]
    }
}
