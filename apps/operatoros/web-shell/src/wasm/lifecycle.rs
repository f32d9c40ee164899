use std::io;

use tracing_subscriber::fmt::MakeWriter;

use super::*;

/// Buffers one formatted event and forwards it to the console method that
/// matches its level.
pub(super) struct ConsoleWriter {
    level: tracing::Level,
    buffer: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.buffer);
        let line = line.trim_end();
        if line.is_empty() {
            return;
        }
        let line = JsValue::from_str(line);
        match self.level {
            tracing::Level::ERROR => web_sys::console::error_1(&line),
            tracing::Level::WARN => web_sys::console::warn_1(&line),
            tracing::Level::INFO => web_sys::console::info_1(&line),
            _ => web_sys::console::debug_1(&line),
        }
    }
}

pub(super) struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter {
            level: tracing::Level::INFO,
            buffer: Vec::new(),
        }
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        ConsoleWriter {
            level: *meta.level(),
            buffer: Vec::new(),
        }
    }
}

pub(super) fn install_console_tracing() {
    let max_level = if cfg!(debug_assertions) {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let installed = tracing_subscriber::fmt()
        .with_writer(ConsoleMakeWriter)
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .with_max_level(max_level)
        .try_init();
    if installed.is_err() {
        web_sys::console::warn_1(&JsValue::from_str("tracing subscriber was already installed"));
    }
}

pub(super) fn set_boot_phase(phase: &str, detail: &str) {
    DIAGNOSTICS.with(|state| {
        let mut state = state.borrow_mut();
        state.phase = phase.to_string();
        state.detail = detail.to_string();
        if phase != "error" {
            state.last_error = None;
        }
    });
    tracing::debug!(phase, detail, "boot phase");
}

pub(super) fn set_boot_error(message: &str) {
    DIAGNOSTICS.with(|state| {
        let mut state = state.borrow_mut();
        state.phase = "error".to_string();
        state.detail = "startup failed".to_string();
        state.last_error = Some(message.to_string());
    });
    tracing::error!(error = message, "OperatorOS client failed to start");
}

/// Boots now, or on `DOMContentLoaded` when the document is still parsing.
pub(super) fn boot_when_ready() -> Result<(), String> {
    let document = document()?;
    if document.ready_state() != "loading" {
        return boot();
    }
    set_boot_phase("waiting", "document is still loading");
    let ready = Closure::once_into_js(|| {
        if let Err(error) = boot() {
            set_boot_error(&error);
        }
    });
    document
        .add_event_listener_with_callback("DOMContentLoaded", ready.unchecked_ref())
        .map_err(|_| "failed to wait for DOMContentLoaded".to_string())
}

fn boot() -> Result<(), String> {
    set_boot_phase("config", "reading page configuration");
    install_session()?;

    set_boot_phase("listeners", "wiring page listeners");
    let handlers = wire_listeners()?;
    let tooltips = init_tooltips();
    install_global_surface()?;
    register_service_worker();

    DIAGNOSTICS.with(|state| state.borrow_mut().event_handlers = handlers);
    set_boot_phase("ready", "OperatorOS client ready");
    tracing::info!(handlers, tooltips, "OperatorOS client initialized");
    Ok(())
}

/// Page-provided overrides from `window.__OPERATOROS_CONFIG__`, plus where
/// the effective config came from.
pub(super) fn read_page_config() -> (ClientConfig, &'static str) {
    let Some(window) = web_sys::window() else {
        return (ClientConfig::default(), "default");
    };
    let Ok(value) = js_sys::Reflect::get(&window, &JsValue::from_str(CONFIG_GLOBAL)) else {
        return (ClientConfig::default(), "default");
    };
    if value.is_undefined() || value.is_null() {
        return (ClientConfig::default(), "default");
    }
    let raw = match js_sys::JSON::stringify(&value) {
        Ok(raw) => String::from(raw),
        Err(_) => {
            tracing::warn!("page config is not JSON-serializable; using defaults");
            return (ClientConfig::default(), "invalid");
        }
    };
    match ClientConfig::from_json(&raw) {
        Ok(config) => (config, "page"),
        Err(error) => {
            tracing::warn!(%error, "ignoring page config");
            (ClientConfig::default(), "invalid")
        }
    }
}

/// Builds the session for this document. Also used to rebuild it when a
/// back-forward cache restore follows a `pagehide` teardown.
pub(super) fn install_session() -> Result<(), String> {
    let (config, config_source) = read_page_config();
    let current_user = current_user_from_nav();
    let state = ClientState::new(&config, LocalStorage, current_user.clone());
    let timestamp_refresh = config.timestamp_refresh();
    let session = ClientSession::new(config.clone(), HttpApi::from_config(&config), DomPage, state);
    let history_entries = session.history().len();

    SESSION.with(|slot| *slot.borrow_mut() = Some(Rc::new(session)));
    DIAGNOSTICS.with(|state| {
        let mut state = state.borrow_mut();
        state.config_source = config_source.to_string();
        state.history_entries = history_entries;
        state.current_user = current_user;
    });
    start_timestamp_loop(timestamp_refresh);
    install_scroll_animations();
    Ok(())
}

pub(super) fn teardown_session() {
    let dropped = SESSION.with(|slot| slot.borrow_mut().take());
    TIMESTAMP_LOOP_GENERATION.with(|current| current.set(current.get().wrapping_add(1)));
    if let Some(observer) = SCROLL_OBSERVER.with(|slot| slot.borrow_mut().take()) {
        observer.disconnect();
    }
    if dropped.is_some() {
        set_boot_phase("suspended", "session torn down on pagehide");
    }
}

pub(super) fn register_service_worker() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let navigator = window.navigator();
    let supported = js_sys::Reflect::has(&navigator, &JsValue::from_str("serviceWorker"))
        .unwrap_or(false);
    if !supported {
        record_service_worker("unsupported");
        return;
    }
    let path = session()
        .map(|session| session.config().service_worker_path.clone())
        .unwrap_or_default();
    if path.is_empty() {
        record_service_worker("disabled");
        return;
    }
    let registration = navigator.service_worker().register(&path);
    spawn_local(async move {
        match JsFuture::from(registration).await {
            Ok(_) => {
                tracing::info!(%path, "service worker registered");
                record_service_worker("registered");
            }
            Err(error) => {
                tracing::info!(%path, error = ?error, "service worker registration failed");
                record_service_worker("failed");
            }
        }
    });
}

fn record_service_worker(status: &str) {
    DIAGNOSTICS.with(|state| state.borrow_mut().service_worker = Some(status.to_string()));
}

fn set_surface_function(surface: &js_sys::Object, name: &str, function: JsValue) -> Result<(), String> {
    js_sys::Reflect::set(surface, &JsValue::from_str(name), &function)
        .map(|_| ())
        .map_err(|_| format!("failed to expose OperatorOS.{name}"))
}

fn optional_string(value: &JsValue) -> Option<String> {
    value.as_string().filter(|value| !value.is_empty())
}

/// `window.OperatorOS`, for inline page scripts.
pub(super) fn install_global_surface() -> Result<(), String> {
    let window = web_sys::window().ok_or_else(|| "window is unavailable".to_string())?;
    let surface = js_sys::Object::new();

    set_surface_function(
        &surface,
        "showNotification",
        Closure::<dyn Fn(JsValue, JsValue)>::new(|message: JsValue, severity: JsValue| {
            let message = message.as_string().unwrap_or_default();
            show_notification(message, optional_string(&severity));
        })
        .into_js_value(),
    )?;
    set_surface_function(
        &surface,
        "copyToClipboard",
        Closure::<dyn Fn(JsValue)>::new(|text: JsValue| {
            copy_to_clipboard(text.as_string().unwrap_or_default());
        })
        .into_js_value(),
    )?;
    set_surface_function(
        &surface,
        "formatCurrency",
        Closure::<dyn Fn(f64, JsValue) -> String>::new(|amount: f64, currency: JsValue| {
            format_currency(amount, optional_string(&currency))
        })
        .into_js_value(),
    )?;
    set_surface_function(
        &surface,
        "formatPercentage",
        Closure::<dyn Fn(f64, JsValue) -> String>::new(|value: f64, decimals: JsValue| {
            let decimals = decimals
                .as_f64()
                .filter(|decimals| decimals.is_finite() && *decimals >= 0.0)
                .map(|decimals| decimals as u32);
            format_percentage(value, decimals)
        })
        .into_js_value(),
    )?;
    set_surface_function(
        &surface,
        "validateEmail",
        Closure::<dyn Fn(JsValue) -> bool>::new(|email: JsValue| {
            validate_email(email.as_string().unwrap_or_default())
        })
        .into_js_value(),
    )?;
    set_surface_function(
        &surface,
        "exportData",
        Closure::<dyn Fn(JsValue, JsValue, JsValue) -> Result<(), JsValue>>::new(
            |data: JsValue, filename: JsValue, kind: JsValue| {
                let filename = filename.as_string().unwrap_or_else(|| "export".to_string());
                export_data(data, filename, optional_string(&kind))
            },
        )
        .into_js_value(),
    )?;
    set_surface_function(
        &surface,
        "clearHistory",
        Closure::<dyn Fn()>::new(clear_history).into_js_value(),
    )?;
    set_surface_function(
        &surface,
        "rateResponse",
        Closure::<dyn Fn(JsValue, JsValue)>::new(|conversation_id: JsValue, rating: JsValue| {
            let conversation_id = conversation_id
                .as_string()
                .or_else(|| conversation_id.as_f64().map(|id| id.to_string()))
                .unwrap_or_default();
            let rating = rating.as_f64().unwrap_or(0.0).clamp(0.0, f64::from(u8::MAX)) as u8;
            rate_response(conversation_id, rating);
        })
        .into_js_value(),
    )?;

    js_sys::Reflect::set(&window, &JsValue::from_str(SURFACE_GLOBAL), &surface)
        .map(|_| ())
        .map_err(|_| "failed to expose window.OperatorOS".to_string())
}
