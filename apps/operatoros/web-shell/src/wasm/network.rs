use super::*;

/// Form-encoded POSTs against the server's page endpoints.
#[derive(Debug, Clone)]
pub(super) struct HttpApi {
    chat_endpoint: String,
    goal_endpoint: String,
    rating_endpoint: String,
}

impl HttpApi {
    pub(super) fn from_config(config: &ClientConfig) -> Self {
        Self {
            chat_endpoint: config.chat_endpoint.clone(),
            goal_endpoint: config.goal_endpoint.clone(),
            rating_endpoint: config.rating_endpoint.clone(),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl OperatorApi for HttpApi {
    async fn ai_chat(&self, form: &ChatForm) -> Result<ChatReply, ApiError> {
        let response = post_form(&self.chat_endpoint, form.fields()).await?;
        decode_json_response(response).await
    }

    async fn create_goal(&self, form: &GoalForm) -> Result<(), ApiError> {
        let response = post_form(&self.goal_endpoint, form.fields()).await?;
        ApiError::check_status(response.status())
    }

    async fn rate_response(&self, submission: &RatingSubmission) -> Result<RatingReply, ApiError> {
        let response = post_form(&self.rating_endpoint, &submission.to_fields()).await?;
        decode_json_response(response).await
    }
}

pub(super) fn form_data_from_fields(fields: &FormFields) -> Result<web_sys::FormData, ApiError> {
    let form_data = web_sys::FormData::new()
        .map_err(|_| ApiError::Network("failed to create request form data".to_string()))?;
    for (name, value) in fields.iter() {
        form_data
            .append_with_str(name, value)
            .map_err(|_| ApiError::Network(format!("failed to append form field {name}")))?;
    }
    Ok(form_data)
}

pub(super) async fn post_form(
    url: &str,
    fields: &FormFields,
) -> Result<gloo_net::http::Response, ApiError> {
    let body = form_data_from_fields(fields)?;
    let request = Request::post(url).body(body).map_err(map_network_error)?;
    let response = request.send().await.map_err(map_network_error)?;
    tracing::debug!(url, status = response.status(), "form post completed");
    Ok(response)
}

pub(super) fn map_network_error(error: gloo_net::Error) -> ApiError {
    ApiError::Network(error.to_string())
}

/// Error replies from these endpoints still carry a JSON body, so the body is
/// decoded first and the status only decides the error when decoding fails.
pub(super) async fn decode_json_response<T: for<'de> serde::Deserialize<'de>>(
    response: gloo_net::http::Response,
) -> Result<T, ApiError> {
    let status = response.status();
    let raw = response.text().await.map_err(map_network_error)?;
    match decode_json(&raw) {
        Ok(decoded) => Ok(decoded),
        Err(error) => {
            ApiError::check_status(status)?;
            Err(error)
        }
    }
}

pub(super) async fn write_clipboard_text(text: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or_else(|| "window is unavailable".to_string())?;
    let navigator = window.navigator();
    let clipboard = js_sys::Reflect::get(&navigator, &JsValue::from_str("clipboard"))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
        .ok_or_else(|| "clipboard API is unavailable".to_string())?
        .dyn_into::<web_sys::Clipboard>()
        .map_err(|_| "navigator.clipboard is not a Clipboard".to_string())?;
    JsFuture::from(clipboard.write_text(text))
        .await
        .map(|_| ())
        .map_err(|error| {
            error
                .as_string()
                .unwrap_or_else(|| "clipboard write was rejected".to_string())
        })
}
