use serde::{Deserialize, Serialize};

// -- Session --

/// Claims carried by the `username` session cookie.
///
/// `sub` is the username the session asserts; `exp` matches the cookie's
/// `Expires` attribute (seconds since the epoch).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

// -- Prescriptions --

/// Body of `POST /prescription`.
///
/// Unknown fields (a client-supplied `id` or `owner` included) are ignored;
/// the server assigns both.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePrescriptionRequest {
    pub name: String,
    #[serde(default)]
    pub directions: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
}

/// Body of `PUT /prescription/{id}`. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePrescriptionRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub directions: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
}

// -- Errors --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_ignores_client_id_and_owner() {
        let req: CreatePrescriptionRequest = serde_json::from_str(
            r#"{"id":"forged","owner":"mallory","name":"Tylenol","time":"Daily"}"#,
        )
        .unwrap();

        assert_eq!(req.name, "Tylenol");
        assert_eq!(req.directions, None);
        assert_eq!(req.time.as_deref(), Some("Daily"));
    }

    #[test]
    fn create_request_requires_name() {
        let result = serde_json::from_str::<CreatePrescriptionRequest>(r#"{"directions":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn update_request_accepts_any_subset() {
        let req: UpdatePrescriptionRequest = serde_json::from_str(r#"{"time":"Nightly"}"#).unwrap();
        assert_eq!(req.name, None);
        assert_eq!(req.time.as_deref(), Some("Nightly"));

        let empty: UpdatePrescriptionRequest = serde_json::from_str("{}").unwrap();
        assert!(empty.name.is_none() && empty.directions.is_none() && empty.time.is_none());
    }
}
