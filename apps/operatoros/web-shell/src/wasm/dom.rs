use super::*;

pub(super) fn document() -> Result<Document, String> {
    web_sys::window()
        .ok_or_else(|| "window is unavailable".to_string())?
        .document()
        .ok_or_else(|| "document is unavailable".to_string())
}

pub(super) fn element_by_id(id: &str) -> Option<Element> {
    document().ok()?.get_element_by_id(id)
}

pub(super) fn html_element_by_id(id: &str) -> Option<HtmlElement> {
    element_by_id(id)?.dyn_into::<HtmlElement>().ok()
}

pub(super) fn query_all(selector: &str) -> Vec<Element> {
    let Ok(document) = document() else {
        return Vec::new();
    };
    let Ok(nodes) = document.query_selector_all(selector) else {
        tracing::warn!(selector, "invalid selector");
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|index| nodes.get(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub(super) fn query_all_html(selector: &str) -> Vec<HtmlElement> {
    query_all(selector)
        .into_iter()
        .filter_map(|element| element.dyn_into::<HtmlElement>().ok())
        .collect()
}

pub(super) fn now_utc() -> DateTime<Utc> {
    let millis = js_sys::Date::now();
    if !millis.is_finite() {
        return DateTime::<Utc>::UNIX_EPOCH;
    }
    DateTime::from_timestamp_millis(millis.floor() as i64).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

pub(super) fn current_pathname() -> String {
    let Some(window) = web_sys::window() else {
        return "/".to_string();
    };
    match window.location().pathname() {
        Ok(pathname) if !pathname.trim().is_empty() => pathname,
        _ => "/".to_string(),
    }
}

pub(super) fn current_user_from_nav() -> Option<CurrentUser> {
    let label = document()
        .ok()?
        .query_selector(NAV_USER_SELECTOR)
        .ok()
        .flatten()?
        .text_content();
    CurrentUser::from_nav_label(label.as_deref())
}

/// Text-valued entries of a form, in document order. File entries are
/// skipped.
pub(super) fn collect_form_fields(form: &HtmlFormElement) -> Result<FormFields, String> {
    let form_data = web_sys::FormData::new_with_form(form)
        .map_err(|_| "failed to read form data".to_string())?;
    let entries = js_sys::try_iter(&form_data)
        .map_err(|_| "form data is not iterable".to_string())?
        .ok_or_else(|| "form data is not iterable".to_string())?;

    let mut fields = FormFields::new();
    for entry in entries {
        let entry = entry.map_err(|_| "failed to iterate form data".to_string())?;
        let pair: js_sys::Array = entry
            .dyn_into()
            .map_err(|_| "form data entry is not an array".to_string())?;
        if let (Some(name), Some(value)) = (pair.get(0).as_string(), pair.get(1).as_string()) {
            fields.push(name, value);
        }
    }
    Ok(fields)
}

fn form_submit_button(form: FormKind) -> Option<HtmlButtonElement> {
    let form_id = match form {
        FormKind::Chat => CHAT_FORM_ID,
        FormKind::Goal => GOAL_FORM_ID,
    };
    element_by_id(form_id)?
        .query_selector(SUBMIT_BUTTON_SELECTOR)
        .ok()
        .flatten()?
        .dyn_into::<HtmlButtonElement>()
        .ok()
}

pub(super) fn ensure_notification_container() -> Result<HtmlElement, String> {
    if let Some(existing) = html_element_by_id(NOTIFICATION_CONTAINER_ID) {
        return Ok(existing);
    }
    let document = document()?;
    let body = document
        .body()
        .ok_or_else(|| "document body is unavailable".to_string())?;
    let container = document
        .create_element("div")
        .map_err(|_| "failed to create notification container".to_string())?
        .dyn_into::<HtmlElement>()
        .map_err(|_| "notification container is not HtmlElement".to_string())?;
    container.set_id(NOTIFICATION_CONTAINER_ID);
    container.set_class_name(TOAST_CONTAINER_CLASS);
    container
        .style()
        .set_property("z-index", TOAST_CONTAINER_Z_INDEX)
        .map_err(|_| "failed to style notification container".to_string())?;
    body.append_child(&container)
        .map_err(|_| "failed to append notification container".to_string())?;
    install_toast_dismiss_handler(&container);
    Ok(container)
}

fn append_toast(notification: &Notification) -> Result<(), String> {
    let container = ensure_notification_container()?;
    let toast = document()?
        .create_element("div")
        .map_err(|_| "failed to create toast".to_string())?;
    toast.set_id(&notification.element_id());
    toast.set_class_name(&notification.class_name());
    let _ = toast.set_attribute("role", "alert");
    toast.set_inner_html(&toast_html(notification));
    container
        .append_child(&toast)
        .map_err(|_| "failed to append toast".to_string())?;
    Ok(())
}

fn schedule_toast_expiry(notification: &Notification) {
    let id = notification.id;
    let element_id = notification.element_id();
    let ttl = notification.ttl;
    spawn_local(async move {
        sleep(ttl).await;
        if let Some(session) = session() {
            session.expire_notification(id);
        }
        // Already gone when the user dismissed it first.
        if let Some(toast) = element_by_id(&element_id) {
            toast.remove();
        }
    });
}

pub(super) fn set_element_display(element: &Element, display: &str) {
    if let Ok(element) = element.clone().dyn_into::<HtmlElement>() {
        let _ = element.style().set_property("display", display);
    }
}

pub(super) fn apply_search_filter(raw_query: &str) {
    let candidates = query_all(SEARCHABLE_SELECTOR);
    let texts: Vec<String> = candidates
        .iter()
        .map(|element| element.text_content().unwrap_or_default())
        .collect();
    let visibility = filter_visibility(texts.iter().map(String::as_str), raw_query);
    for (element, visible) in candidates.iter().zip(visibility) {
        set_element_display(element, if visible { "" } else { "none" });
    }
}

pub(super) fn refresh_timestamps() {
    let now = now_utc();
    for element in query_all(TIMESTAMP_SELECTOR) {
        let Some(raw) = element.get_attribute(TIMESTAMP_ATTRIBUTE) else {
            continue;
        };
        if let Some(label) = format::relative_label(&raw, now) {
            element.set_text_content(Some(&label));
        }
    }
}

pub(super) fn show_upload_summary(input: &HtmlInputElement, summary_html: &str) -> Result<(), String> {
    let Some(parent) = input.parent_element() else {
        return Ok(());
    };
    if let Ok(Some(existing)) = parent.query_selector(".alert") {
        existing.remove();
    }
    let summary = document()?
        .create_element("div")
        .map_err(|_| "failed to create upload summary".to_string())?;
    summary.set_class_name(UPLOAD_SUMMARY_CLASS);
    summary.set_inner_html(summary_html);
    input
        .insert_adjacent_element("afterend", &summary)
        .map_err(|_| "failed to insert upload summary".to_string())?;
    Ok(())
}

pub(super) fn scroll_into_view(element: &Element, block: web_sys::ScrollLogicalPosition) {
    let options = web_sys::ScrollIntoViewOptions::new();
    options.set_behavior(web_sys::ScrollBehavior::Smooth);
    options.set_block(block);
    element.scroll_into_view_with_scroll_into_view_options(&options);
}

fn bootstrap_namespace() -> Option<JsValue> {
    let window = web_sys::window()?;
    let bootstrap = js_sys::Reflect::get(&window, &JsValue::from_str("bootstrap")).ok()?;
    if bootstrap.is_undefined() || bootstrap.is_null() {
        None
    } else {
        Some(bootstrap)
    }
}

fn bootstrap_static_call(component: &str, method: &str, element: &Element) -> Option<JsValue> {
    let bootstrap = bootstrap_namespace()?;
    let class = js_sys::Reflect::get(&bootstrap, &JsValue::from_str(component)).ok()?;
    let function = js_sys::Reflect::get(&class, &JsValue::from_str(method))
        .ok()?
        .dyn_into::<js_sys::Function>()
        .ok()?;
    let result = function.call1(&class, element).ok()?;
    if result.is_undefined() || result.is_null() {
        None
    } else {
        Some(result)
    }
}

/// `bootstrap.Modal.getInstance(element)?.hide()`.
pub(super) fn hide_bootstrap_modal(element: &Element) {
    let Some(modal) = bootstrap_static_call("Modal", "getInstance", element) else {
        return;
    };
    let hidden = js_sys::Reflect::get(&modal, &JsValue::from_str("hide"))
        .ok()
        .and_then(|hide| hide.dyn_into::<js_sys::Function>().ok())
        .map(|hide| hide.call0(&modal));
    if !matches!(hidden, Some(Ok(_))) {
        tracing::debug!("bootstrap modal hide was unavailable");
    }
}

pub(super) fn init_tooltips() -> usize {
    if bootstrap_namespace().is_none() {
        return 0;
    }
    query_all(TOOLTIP_SELECTOR)
        .iter()
        .filter(|element| bootstrap_static_call("Tooltip", "getOrCreateInstance", element).is_some())
        .count()
}

pub(super) fn download_payload(payload: &ExportPayload, filename: &str) -> Result<(), JsValue> {
    let document = document().map_err(|error| js_sys::Error::new(&error))?;
    let body = document
        .body()
        .ok_or_else(|| js_sys::Error::new("document body is unavailable"))?;

    let parts = js_sys::Array::new();
    parts.push(&JsValue::from_str(&payload.content));
    let options = web_sys::BlobPropertyBag::new();
    options.set_type(payload.mime_type);
    let blob = web_sys::Blob::new_with_str_sequence_and_options(&parts, &options)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)?;

    let link = document
        .create_element("a")?
        .dyn_into::<web_sys::HtmlAnchorElement>()?;
    link.set_href(&url);
    link.set_download(filename);
    link.style().set_property("display", "none")?;
    body.append_child(&link)?;
    link.click();
    link.remove();
    web_sys::Url::revoke_object_url(&url)?;
    Ok(())
}

pub(super) fn rating_star_index(target: &Element) -> Option<usize> {
    let star = target.closest("i").ok().flatten()?;
    query_all(RATING_STAR_SELECTOR)
        .iter()
        .position(|candidate| candidate == &star)
}

/// [`PageSurface`] over the server-rendered page.
#[derive(Debug, Default)]
pub(super) struct DomPage;

impl PageSurface for DomPage {
    fn show_notification(&self, notification: &Notification) {
        if let Err(error) = append_toast(notification) {
            tracing::warn!(%error, "failed to render toast");
            return;
        }
        schedule_toast_expiry(notification);
    }

    fn set_form_busy(&self, form: FormKind, busy: bool) {
        let Some(button) = form_submit_button(form) else {
            return;
        };
        button.set_disabled(busy);
        button.set_inner_html(&submit_label_html(form, busy));
    }

    fn hide_chat_response(&self) {
        if let Some(panel) = element_by_id(RESPONSE_PANEL_ID) {
            let _ = panel.class_list().add_1(HIDDEN_CLASS);
        }
    }

    fn render_chat_response(&self, view: &ChatResponseView) {
        let (Some(panel), Some(provider), Some(content)) = (
            element_by_id(RESPONSE_PANEL_ID),
            element_by_id(RESPONSE_PROVIDER_ID),
            element_by_id(RESPONSE_CONTENT_ID),
        ) else {
            tracing::debug!("response panel is not on this page");
            return;
        };
        provider.set_text_content(Some(&view.provider));
        content.set_inner_html(&view.html);
        let _ = panel.class_list().remove_1(HIDDEN_CLASS);
        let _ = panel.class_list().add_1(FADE_IN_CLASS);
        scroll_into_view(&panel, web_sys::ScrollLogicalPosition::Nearest);
    }

    fn bind_rating(&self, conversation_id: &ConversationId) -> usize {
        if let Some(row) = element_by_id(RATING_STARS_ID) {
            let _ = row.set_attribute("data-conversation-id", conversation_id.as_str());
        }
        query_all(RATING_STAR_SELECTOR).len()
    }

    fn paint_rating(&self, highlights: &[bool]) {
        for (star, lit) in query_all(RATING_STAR_SELECTOR).iter().zip(highlights) {
            let classes = star.class_list();
            let _ = if *lit {
                classes.add_1(RATING_LIT_CLASS)
            } else {
                classes.remove_1(RATING_LIT_CLASS)
            };
        }
    }

    fn clear_prompt_input(&self) {
        let prompt = element_by_id(CHAT_FORM_ID)
            .and_then(|form| form.query_selector(PROMPT_INPUT_SELECTOR).ok().flatten())
            .and_then(|prompt| prompt.dyn_into::<HtmlTextAreaElement>().ok());
        if let Some(prompt) = prompt {
            prompt.set_value("");
        }
    }

    fn close_goal_modal(&self) {
        if let Some(modal) = element_by_id(GOAL_MODAL_ID) {
            hide_bootstrap_modal(&modal);
        }
    }

    fn schedule_reload(&self, delay: Duration) {
        spawn_local(async move {
            sleep(delay).await;
            if let Some(window) = web_sys::window() {
                if window.location().reload().is_err() {
                    tracing::warn!("page reload failed");
                }
            }
        });
    }
}
