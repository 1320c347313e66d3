use crate::common::errors::AppError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub struct JsonUtil;

impl JsonUtil {
    pub fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, AppError> {
        serde_json::from_value(value).map_err(|e| AppError::InvalidInput(e.to_string()))
    }

    pub fn to_value<T: Serialize>(value: T) -> Result<Value, AppError> {
        serde_json::to_value(value).map_err(|e| AppError::InvalidInput(e.to_string()))
    }

    // Decodes a standard-alphabet base64 string holding a JSON document.
    pub fn from_base64<T: DeserializeOwned>(encoded: &str) -> Result<T, AppError> {
        let decoded = STANDARD.decode(encoded.trim())?;
        serde_json::from_slice(&decoded).map_err(|e| AppError::InvalidInput(e.to_string()))
    }

    pub fn to_base64<T: Serialize>(value: &T) -> Result<String, AppError> {
        let bytes =
            serde_json::to_vec(value).map_err(|e| AppError::InvalidInput(e.to_string()))?;
        Ok(STANDARD.encode(bytes))
    }
}
