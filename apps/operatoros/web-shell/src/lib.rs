#[cfg(any(target_arch = "wasm32", test))]
mod markup;
#[cfg(target_arch = "wasm32")]
mod wasm_constants;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use chrono::{DateTime, Utc};
    use gloo_net::http::Request;
    use gloo_timers::future::sleep;
    use operatoros_client_core::api::{
        ApiError, ChatReply, ConversationId, OperatorApi, RatingReply, RatingSubmission,
        decode_json,
    };
    use operatoros_client_core::export::{ExportFormat, ExportPayload, render_export};
    use operatoros_client_core::form::{ChatForm, FormFields, GoalForm};
    use operatoros_client_core::format::{self, DEFAULT_CURRENCY, DEFAULT_PERCENT_DECIMALS};
    use operatoros_client_core::history::HistoryStorage;
    use operatoros_client_core::search::filter_visibility;
    use operatoros_client_core::session::{ChatResponseView, CurrentUser, FormKind};
    use operatoros_client_core::upload::SelectedFile;
    use operatoros_client_core::{
        ClientConfig, ClientSession, ClientState, Notification, PageSurface, Severity,
    };
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use serde::Serialize;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::{JsFuture, spawn_local};
    use web_sys::{
        Document, Element, HtmlButtonElement, HtmlElement, HtmlFormElement, HtmlInputElement,
        HtmlTextAreaElement, KeyboardEvent,
    };
    use web_time::Duration;

    use crate::markup::*;
    use crate::wasm_constants::*;

    mod dom;
    mod lifecycle;
    mod listeners;
    mod network;
    mod storage;

    use dom::*;
    use lifecycle::*;
    use listeners::*;
    use network::*;
    use storage::*;

    type ShellSession = ClientSession<HttpApi, DomPage, LocalStorage>;
    type EventHandler = Closure<dyn FnMut(web_sys::Event)>;

    thread_local! {
        static SESSION: RefCell<Option<Rc<ShellSession>>> = const { RefCell::new(None) };
        static DIAGNOSTICS: RefCell<BootDiagnostics> = RefCell::new(BootDiagnostics::default());
        static LISTENERS_WIRED: Cell<bool> = const { Cell::new(false) };
        static EVENT_HANDLERS: RefCell<Vec<EventHandler>> = const { RefCell::new(Vec::new()) };
        static SCROLL_OBSERVER: RefCell<Option<ScrollObserver>> = const { RefCell::new(None) };
        static TIMESTAMP_LOOP_GENERATION: Cell<u64> = const { Cell::new(0) };
    }

    #[derive(Debug, Clone, Default, Serialize)]
    struct BootDiagnostics {
        phase: String,
        detail: String,
        last_error: Option<String>,
        config_source: String,
        history_entries: usize,
        event_handlers: usize,
        service_worker: Option<String>,
        current_user: Option<CurrentUser>,
    }

    /// Current session handle. The `RefCell` borrow ends before the caller
    /// uses it, so async work can hold the `Rc` across awaits.
    fn session() -> Option<Rc<ShellSession>> {
        SESSION.with(|slot| slot.borrow().clone())
    }

    #[wasm_bindgen(start)]
    pub fn start() {
        console_error_panic_hook::set_once();
        install_console_tracing();
        set_boot_phase("booting", "initializing OperatorOS client runtime");
        if let Err(error) = boot_when_ready() {
            set_boot_error(&error);
        }
    }

    #[wasm_bindgen]
    pub fn boot_diagnostics_json() -> String {
        DIAGNOSTICS.with(|state| {
            serde_json::to_string(&*state.borrow()).unwrap_or_else(|_| {
                "{\"phase\":\"error\",\"detail\":\"diagnostics serialization failed\"}".to_string()
            })
        })
    }

    #[wasm_bindgen]
    pub fn history_json() -> String {
        let entries = session().map(|session| session.history()).unwrap_or_default();
        serde_json::to_string(&entries).unwrap_or_else(|_| "[]".to_string())
    }

    #[wasm_bindgen]
    pub fn show_notification(message: String, severity: Option<String>) {
        let severity = severity
            .as_deref()
            .map(Severity::parse_lenient)
            .unwrap_or_default();
        match session() {
            Some(session) => {
                session.notify(message, severity);
            }
            None => tracing::warn!(%message, "notification dropped before boot"),
        }
    }

    #[wasm_bindgen]
    pub fn copy_to_clipboard(text: String) {
        spawn_local(async move {
            let copied = write_clipboard_text(&text).await;
            if let Err(error) = &copied {
                tracing::warn!(%error, "clipboard write failed");
            }
            let Some(session) = session() else {
                return;
            };
            match copied {
                Ok(()) => session.notify(CLIPBOARD_SUCCESS_MESSAGE, Severity::Success),
                Err(_) => session.notify(CLIPBOARD_FAILURE_MESSAGE, Severity::Danger),
            };
        });
    }

    #[wasm_bindgen]
    pub fn format_currency(amount: f64, currency: Option<String>) -> String {
        format::format_currency(amount, currency.as_deref().unwrap_or(DEFAULT_CURRENCY))
    }

    #[wasm_bindgen]
    pub fn format_percentage(value: f64, decimals: Option<u32>) -> String {
        let decimals = decimals.map_or(DEFAULT_PERCENT_DECIMALS, |decimals| decimals as usize);
        format::format_percentage(value, decimals)
    }

    #[wasm_bindgen]
    pub fn format_relative_time(timestamp: String) -> Option<String> {
        format::relative_label(&timestamp, now_utc())
    }

    #[wasm_bindgen]
    pub fn validate_email(email: String) -> bool {
        format::validate_email(&email)
    }

    #[wasm_bindgen]
    pub fn format_file_size(bytes: f64) -> String {
        format::format_file_size(bytes.max(0.0) as u64)
    }

    /// Seeded from `Math.random`; ids are for DOM keys, not secrets.
    #[wasm_bindgen]
    pub fn generate_id(length: Option<usize>) -> String {
        let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
        let mut rng = SmallRng::seed_from_u64(seed ^ js_sys::Date::now() as u64);
        format::generate_id(&mut rng, length.unwrap_or(format::DEFAULT_ID_LENGTH))
    }

    /// Serializes `data` and starts a browser download. Throws on an
    /// unsupported `kind`.
    #[wasm_bindgen]
    pub fn export_data(data: JsValue, filename: String, kind: Option<String>) -> Result<(), JsValue> {
        let format = match kind.as_deref() {
            Some(kind) => kind
                .parse::<ExportFormat>()
                .map_err(|error| js_sys::Error::new(&error.to_string()))?,
            None => ExportFormat::Json,
        };
        let raw = js_sys::JSON::stringify(&data)
            .map_err(|_| js_sys::Error::new("export data is not JSON-serializable"))?;
        let raw = String::from(raw);
        let value: serde_json::Value = serde_json::from_str(&raw)
            .map_err(|error| js_sys::Error::new(&error.to_string()))?;
        let payload =
            render_export(&value, format).map_err(|error| js_sys::Error::new(&error.to_string()))?;
        download_payload(&payload, &filename)
    }

    #[wasm_bindgen]
    pub fn clear_history() {
        if let Some(session) = session() {
            session.clear_history();
        }
    }

    #[wasm_bindgen]
    pub fn rate_response(conversation_id: String, rating: u8) {
        let Some(session) = session() else {
            return;
        };
        spawn_local(async move {
            let _ = session
                .rate_response(ConversationId::new(conversation_id), rating)
                .await;
        });
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::boot_diagnostics_json;

#[cfg(not(target_arch = "wasm32"))]
pub fn boot_diagnostics_json() -> String {
    "{\"phase\":\"native\",\"detail\":\"client diagnostics only available on wasm\"}".to_string()
}
